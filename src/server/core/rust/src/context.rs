/* src/server/core/rust/src/context.rs */

use serde::Serialize;

use crate::negotiate::LocaleSource;
use crate::template::Params;

/// Route identity resolved for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
  pub locale: String,
  /// Registered internal template, when one matched.
  pub internal_template: Option<String>,
  /// Internal path with parameters filled in.
  pub internal_path: String,
  pub params: Params,
}

impl ResolvedRoute {
  /// Template to translate for links: the registered template, else the literal path.
  pub fn link_template(&self) -> &str {
    self.internal_template.as_deref().unwrap_or(&self.internal_path)
  }
}

/// Immutable per-request handle handed to downstream rendering.
///
/// Created by the engine for each request and passed explicitly (request
/// extensions, function arguments). There is no ambient "current locale".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleContext {
  route: ResolvedRoute,
  source: LocaleSource,
  domain: Option<String>,
}

impl LocaleContext {
  pub(crate) fn new(route: ResolvedRoute, source: LocaleSource, domain: Option<String>) -> Self {
    Self { route, source, domain }
  }

  pub fn locale(&self) -> &str {
    &self.route.locale
  }

  pub fn route(&self) -> &ResolvedRoute {
    &self.route
  }

  pub fn source(&self) -> LocaleSource {
    self.source
  }

  /// Configured domain that served the request, if any.
  pub fn domain(&self) -> Option<&str> {
    self.domain.as_deref()
  }
}
