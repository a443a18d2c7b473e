// External storage
pub mod config_store;
