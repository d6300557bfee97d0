/* src/server/core/rust/src/engine/decision.rs */

use serde::Serialize;

use crate::context::LocaleContext;
use crate::cookie::CookieWrite;
use crate::links::{AlternateLink, format_link_header};

/// 307: method and body are preserved, and clients must not cache the locale choice.
pub const REDIRECT_STATUS: u16 = 307;

/// What the hosting boundary should do with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoutingDecision {
  /// `to` is a path for same-host redirects, an absolute URL across domains.
  Redirect { to: String, status: u16 },
  /// Serve `internal_path` (relative to the base path) with the resolved locale.
  Rewrite { internal_path: String },
  /// Outside the engine's scope; forward untouched.
  PassThrough,
}

impl RoutingDecision {
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Redirect { .. } => "redirect",
      Self::Rewrite { .. } => "rewrite",
      Self::PassThrough => "pass_through",
    }
  }
}

/// Full result of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteOutcome {
  pub decision: RoutingDecision,
  /// Resolved-locale marker for downstream collaborators. `None` on pass-through.
  pub context: Option<LocaleContext>,
  pub cookie: Option<CookieWrite>,
  pub alternate_links: Vec<AlternateLink>,
}

impl RouteOutcome {
  pub(crate) fn pass_through() -> Self {
    Self {
      decision: RoutingDecision::PassThrough,
      context: None,
      cookie: None,
      alternate_links: Vec::new(),
    }
  }

  pub fn locale(&self) -> Option<&str> {
    self.context.as_ref().map(LocaleContext::locale)
  }

  /// `Link` header value, `None` when no alternates apply.
  pub fn link_header(&self) -> Option<String> {
    (!self.alternate_links.is_empty()).then(|| format_link_header(&self.alternate_links))
  }
}
