/* src/server/core/rust/src/engine/request.rs */

use crate::cookie::parse_cookie_header;

/// Request fields the engine reads. Built by the hosting boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRequest {
  /// Connection scheme, `http` when unknown.
  pub scheme: String,
  /// `Host` header value.
  pub host: String,
  /// `x-forwarded-host`, preferred over `host` when present.
  pub forwarded_host: Option<String>,
  /// `x-forwarded-proto`, preferred over `scheme` when present.
  pub forwarded_proto: Option<String>,
  pub path: String,
  /// Query string without the leading `?`.
  pub query: Option<String>,
  /// Cookies in header order.
  pub cookies: Vec<(String, String)>,
  pub accept_language: Option<String>,
}

impl RouteRequest {
  pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
    Self { scheme: "http".to_string(), host: host.into(), path: path.into(), ..Self::default() }
  }

  pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
    self.scheme = scheme.into();
    self
  }

  pub fn with_query(mut self, query: impl Into<String>) -> Self {
    let query = query.into();
    self.query = (!query.is_empty()).then_some(query);
    self
  }

  pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.cookies.push((name.into(), value.into()));
    self
  }

  /// Append every pair from a raw `Cookie` header.
  pub fn with_cookie_header(mut self, header: &str) -> Self {
    self.cookies.extend(parse_cookie_header(header));
    self
  }

  pub fn with_accept_language(mut self, header: impl Into<String>) -> Self {
    self.accept_language = Some(header.into());
    self
  }

  pub fn with_forwarded_host(mut self, host: impl Into<String>) -> Self {
    self.forwarded_host = Some(host.into());
    self
  }

  pub fn with_forwarded_proto(mut self, proto: impl Into<String>) -> Self {
    self.forwarded_proto = Some(proto.into());
    self
  }

  /// First `x-forwarded-host` entry, else `host`.
  pub fn effective_host(&self) -> &str {
    self
      .forwarded_host
      .as_deref()
      .and_then(|h| h.split(',').next())
      .map(str::trim)
      .filter(|h| !h.is_empty())
      .unwrap_or(&self.host)
  }

  /// First `x-forwarded-proto` entry, else the connection scheme.
  pub fn effective_scheme(&self) -> &str {
    let scheme = self
      .forwarded_proto
      .as_deref()
      .and_then(|p| p.split(',').next())
      .map(str::trim)
      .filter(|p| !p.is_empty())
      .unwrap_or(&self.scheme);
    if scheme.is_empty() { "http" } else { scheme }
  }

  /// Value of the first cookie named `name`.
  pub fn cookie(&self, name: &str) -> Option<&str> {
    self.cookies.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
  }

  pub(crate) fn query_suffix(&self) -> String {
    self.query.as_deref().map(|q| format!("?{q}")).unwrap_or_default()
  }
}
