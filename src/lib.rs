pub mod backends;
pub mod config_loader;
pub mod error;
pub mod operator;
pub mod persistence;
pub mod pipeline;
pub mod prompts;
pub mod transport;
