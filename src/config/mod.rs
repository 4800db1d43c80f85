// src/config/mod.rs
pub mod app;
pub mod weights;

pub use app::{AppConfig, ConfigError, LogFormat, TwitchCredentials};
pub use weights::{load_weights_default, load_weights_from};
