// Configuration management module
// Handles the TOML configuration file and settings validation

pub mod settings;

pub use settings::{ChunkingConfig, Config, ConfigError, KbConfig, LlmConfig, OllamaConfig};

/// Get the default configuration directory path
#[inline]
pub fn get_config_dir() -> Result<std::path::PathBuf, ConfigError> {
    Config::default_config_dir()
}
