// src/pipeline/validate.rs

use std::path::Path;

use crate::error::Result;
use crate::models::Config;

/// Load and validate a configuration file, logging the effective settings.
pub fn run_validate(config_path: &Path) -> Result<Config> {
    log::info!("Validating configuration at {}", config_path.display());

    let config = Config::load(config_path)?;
    config.validate()?;

    log::info!("Configuration OK");
    log::info!("  remote.base_url: {}", config.remote.base_url);
    log::info!("  remote.user_agent: {}", config.remote.user_agent);
    log::info!("  remote.per_page: {}", config.remote.per_page);
    log::info!("  remote.hard_cap: {}", config.remote.hard_cap);
    log::info!("  sitemap.batch_size: {}", config.sitemap.batch_size);

    if config.content.root_dir.is_dir() {
        log::info!("  content.root_dir: {}", config.content.root_dir.display());
    } else {
        log::warn!(
            "  content.root_dir {} does not exist; legacy posts will be empty",
            config.content.root_dir.display()
        );
    }

    Ok(config)
}
