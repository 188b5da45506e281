//! Persistent storage: the viewer's TOML configuration file.

pub mod config;

pub use config::{
    config_file_path, load_config, load_config_from, read_config_file, save_config_to,
    ConfigError, ViewerConfig,
};
