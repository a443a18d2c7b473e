// Utility functions module
pub mod channels;
pub mod config;
