/* src/server/core/rust/src/config/loader.rs */

use std::path::Path;

use super::RoutingConfig;
use crate::errors::ConfigError;

/// Read a JSON routing config from disk.
pub fn load_routing_config(path: &Path) -> Result<RoutingConfig, ConfigError> {
  let content = std::fs::read_to_string(path)
    .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
  RoutingConfig::from_json_str(&content)
}
