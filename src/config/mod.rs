#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use crate::domain::endpoints::Endpoints;
pub use toml_config::ClientConfig;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, LogFormat};
