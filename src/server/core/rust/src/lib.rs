/* src/server/core/rust/src/lib.rs */

//! Request-time locale routing: pick a locale per request, translate localized
//! pathnames, and decide between redirect, rewrite, and pass-through.
//!
//! Build a [`RoutingEngine`] once from a [`RoutingConfig`], then call
//! [`RoutingEngine::route`] per request. The engine holds no mutable state.

pub mod accept_language;
pub mod config;
pub mod context;
pub mod cookie;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod links;
pub mod locale;
pub mod negotiate;
pub mod pathnames;
pub mod template;

mod path;

// Re-exports for ergonomic use
pub use accept_language::{LanguageRange, best_match, parse_accept_language};
pub use config::{
  DomainConfig, ExternalPathname, LocaleCookieConfig, LocaleCookieSetting, LocalePrefixConfig,
  MatcherConfig, PathnameEntry, PathnameTable, RoutingConfig, load_routing_config,
};
pub use context::{LocaleContext, ResolvedRoute};
pub use cookie::{CookieWrite, SameSite, parse_cookie_header};
pub use domain::{DomainRecord, DomainRegistry};
pub use engine::{REDIRECT_STATUS, RouteOutcome, RouteRequest, RoutingDecision, RoutingEngine};
pub use errors::{ConfigError, MissingParameterError, TemplateError};
pub use links::{AlternateLink, AlternateLinkBuilder, Origin, X_DEFAULT, format_link_header};
pub use locale::{LocalePrefixMode, LocalePrefixes, LocaleSet, PrefixMatch};
pub use negotiate::{LocaleSource, NegotiateContext, Negotiated, negotiate};
pub use pathnames::{LocalizedPathname, PathnameIndex};
pub use template::{ParamValue, Params, PathTemplate, Segment};
