//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod corrections;
pub mod extract;

use std::path::Path;

use conduce_core::models::config::ConduceConfig;

/// Load configuration for a command invocation.
///
/// An explicit `--config` path must exist and parse. Without one, defaults
/// are used, with the correction store placed in the user data directory
/// rather than the working directory.
pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<ConduceConfig> {
    match config_path {
        Some(path) => {
            let path = Path::new(path);
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Ok(ConduceConfig::from_file(path)?)
        }
        None => {
            let mut config = ConduceConfig::default();
            config.corrections.path = corrections::default_store_path();
            Ok(config)
        }
    }
}
