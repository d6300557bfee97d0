/* src/server/core/rust/src/config/mod.rs */

mod loader;
mod pathnames;
mod types;


pub use loader::load_routing_config;
pub use pathnames::{ExternalPathname, PathnameEntry, PathnameTable};
pub use types::{
  DomainConfig, LocaleCookieConfig, LocaleCookieSetting, LocalePrefixConfig, MatcherConfig,
  RoutingConfig,
};
