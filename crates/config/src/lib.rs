//! Configuration loading and application directories.
//!
//! Config file: `skillforge.toml`, searched in `./` then the user config
//! directory (`~/.config/skillforge/` on Linux). Application data (the
//! SQLite database) lives in the user data directory unless overridden.

pub mod loader;
pub mod schema;

pub use {
    loader::{
        clear_config_dir, clear_data_dir, config_dir, data_dir, discover_and_load, load_config,
        set_config_dir, set_data_dir,
    },
    schema::{ServerConfig, SkillForgeConfig},
};
