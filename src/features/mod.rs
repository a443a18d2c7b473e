// Event-driven features
pub mod welcome;
