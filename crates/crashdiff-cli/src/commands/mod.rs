pub mod check_config;
pub mod diff;

use crashdiff_core::config::DiffConfig;
use std::path::Path;

/// Load a configuration file; `.json` files are read as JSON, anything else
/// as YAML.
pub fn load_config(path: &Path) -> Result<DiffConfig, Box<dyn std::error::Error>> {
    let text = read_file(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        DiffConfig::from_json_str(&text)?
    } else {
        DiffConfig::from_yaml_str(&text)?
    };
    Ok(config)
}

pub fn read_file(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e).into())
}
