/* src/cli/core/src/config/loader.rs */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use localeroute::{RoutingConfig, RoutingEngine};

/// Looked up in this order in every directory.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["localeroute.toml", "localeroute.json"];

/// Walk upward from `start` to find a routing config, like Cargo.toml discovery
pub fn find_config(start: &Path) -> Result<PathBuf> {
  let mut dir =
    start.canonicalize().with_context(|| format!("failed to canonicalize {}", start.display()))?;
  loop {
    for name in CONFIG_FILE_NAMES {
      let candidate = dir.join(name);
      if candidate.is_file() {
        return Ok(candidate);
      }
    }
    if !dir.pop() {
      bail!(
        "{} not found (searched upward from {})",
        CONFIG_FILE_NAMES.join(" or "),
        start.display()
      );
    }
  }
}

/// Parse TOML or JSON by extension. Does not validate.
pub fn load_config(path: &Path) -> Result<RoutingConfig> {
  let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
  if is_json {
    return Ok(localeroute::load_routing_config(path)?);
  }
  let content =
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Load and validate into a ready engine.
pub fn load_engine(path: &Path) -> Result<RoutingEngine> {
  let config = load_config(path)?;
  RoutingEngine::new(config).with_context(|| format!("invalid routing config {}", path.display()))
}
