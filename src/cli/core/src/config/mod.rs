/* src/cli/core/src/config/mod.rs */

mod loader;


pub use loader::{CONFIG_FILE_NAMES, find_config, load_config, load_engine};
