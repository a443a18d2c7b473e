pub mod greeting;
pub mod guild;
