use lease_schedule_core::config::EngineConfig;
use std::fs;

use super::file::resolve_path;

/// Load engine settings from a TOML file, or the defaults when no file is given.
pub fn load_config(path: Option<&str>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let config: EngineConfig = toml::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    config.validate()?;
    tracing::debug!(path = %canonical.display(), "loaded engine config");
    Ok(config)
}
