//! Boot-time configuration
//!
//! `lamp.toml` is compiled into the image and already checked by build.rs.
//! Parsing it again here keeps the firmware honest if that check is ever
//! bypassed: any error falls back to the built-in defaults.

use defmt::*;

use matrixlamp_core::config::{parse_config, LampConfig};
use matrixlamp_plugins::PluginCatalog;

/// Embedded configuration; edit lamp.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../lamp.toml");

/// Parse and validate the embedded configuration
pub fn load() -> LampConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse lamp.toml: {}", e);
            error!("Using default configuration");
            return LampConfig::default();
        }
    };

    if let Err(e) = config.validate() {
        error!("Invalid lamp.toml: {}", e);
        error!("Using default configuration");
        return LampConfig::default();
    }

    if let Some(id) = config
        .plugins
        .order
        .iter()
        .find(|id| !PluginCatalog::knows(id.as_str()))
    {
        error!("Unknown plugin '{}' in lamp.toml", id.as_str());
        error!("Using default configuration");
        return LampConfig::default();
    }

    info!(
        "Config: frame {}ms, budget {}ms, debounce {}ms, auto-cycle {}s",
        config.scheduler.frame_interval_ms,
        config.scheduler.tick_budget_ms,
        config.scheduler.debounce_ms,
        config.scheduler.auto_cycle_s
    );
    config
}
