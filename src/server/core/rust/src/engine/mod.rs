/* src/server/core/rust/src/engine/mod.rs */

//! Per-request state machine:
//! Start -> DomainClassified -> LocaleResolved -> PathResolved -> Decided.

mod decision;
mod request;


pub use decision::{REDIRECT_STATUS, RouteOutcome, RoutingDecision};
pub use request::RouteRequest;

use crate::config::{LocaleCookieConfig, MatcherConfig, RoutingConfig};
use crate::context::{LocaleContext, ResolvedRoute};
use crate::cookie::CookieWrite;
use crate::domain::{DomainRecord, DomainRegistry};
use crate::errors::{ConfigError, MissingParameterError};
use crate::links::{AlternateLink, AlternateLinkBuilder, Origin};
use crate::locale::{LocalePrefixMode, LocalePrefixes, LocaleSet, PrefixMatch};
use crate::negotiate::{LocaleSource, NegotiateContext, negotiate};
use crate::path::{compose, decode, normalize, strip_base};
use crate::pathnames::{LocalizedPathname, PathnameIndex};
use crate::template::Params;

/// How the path after the locale prefix relates to the pathname index.
enum PathResolution<'a> {
  /// Matched the locale's external template.
  Localized { entry: &'a LocalizedPathname, params: Params },
  /// Matched an internal template whose external form differs for this locale.
  Internal { entry: &'a LocalizedPathname, params: Params },
  /// Not a localized route; served as-is.
  Unmatched,
}

/// Immutable routing tables plus policy. Build once, share across requests.
#[derive(Debug, Clone)]
pub struct RoutingEngine {
  locales: LocaleSet,
  prefixes: LocalePrefixes,
  domains: DomainRegistry,
  pathnames: PathnameIndex,
  cookie: Option<LocaleCookieConfig>,
  detection: bool,
  alternate_links: bool,
  base_path: String,
  trailing_slash: bool,
  matcher: MatcherConfig,
}

impl RoutingEngine {
  /// Validate `config` and build the lookup tables.
  pub fn new(config: RoutingConfig) -> Result<Self, ConfigError> {
    let locales = LocaleSet::new(config.locales, config.default_locale)?;
    let prefixes =
      LocalePrefixes::new(config.locale_prefix.mode, &locales, &config.locale_prefix.prefixes)?;
    let domains = DomainRegistry::new(&config.domains, &locales)?;
    let pathnames = PathnameIndex::new(&config.pathnames, &locales)?;
    let base_path = validate_base_path(&config.base_path)?;

    Ok(Self {
      locales,
      prefixes,
      domains,
      pathnames,
      cookie: config.locale_cookie.config().cloned(),
      detection: config.locale_detection,
      alternate_links: config.alternate_links,
      base_path,
      trailing_slash: config.trailing_slash,
      matcher: config.matcher,
    })
  }

  pub fn locales(&self) -> &LocaleSet {
    &self.locales
  }

  pub fn prefixes(&self) -> &LocalePrefixes {
    &self.prefixes
  }

  pub fn domains(&self) -> &DomainRegistry {
    &self.domains
  }

  pub fn pathnames(&self) -> &PathnameIndex {
    &self.pathnames
  }

  pub fn base_path(&self) -> &str {
    &self.base_path
  }

  pub fn cookie_config(&self) -> Option<&LocaleCookieConfig> {
    self.cookie.as_ref()
  }

  pub fn detection_enabled(&self) -> bool {
    self.detection
  }

  pub fn link_builder(&self) -> AlternateLinkBuilder<'_> {
    AlternateLinkBuilder {
      locales: &self.locales,
      prefixes: &self.prefixes,
      domains: &self.domains,
      pathnames: &self.pathnames,
      base_path: &self.base_path,
      trailing_slash: self.trailing_slash,
    }
  }

  /// Evaluate one request. Never fails: anomalies degrade to pass-through or defaults.
  pub fn route(&self, request: &RouteRequest) -> RouteOutcome {
    let outcome = self.evaluate(request);
    tracing::debug!(
      host = request.effective_host(),
      path = %request.path,
      locale = outcome.locale().unwrap_or("-"),
      decision = outcome.decision.kind(),
      "routed request"
    );
    outcome
  }

  /// Alternates for an internal route as seen from `origin`.
  pub fn alternate_links(
    &self,
    internal: &str,
    params: &Params,
    origin: Origin<'_>,
  ) -> Result<Vec<AlternateLink>, MissingParameterError> {
    let current = self.domains.classify(origin.host);
    self.link_builder().build(internal, params, origin, current)
  }

  /// Href a locale switcher should use to show `internal` in `locale`.
  ///
  /// Same-host targets are paths; when another domain serves the locale the
  /// result is an absolute URL on that domain.
  pub fn localized_path(
    &self,
    internal: &str,
    params: &Params,
    locale: &str,
    origin: Origin<'_>,
  ) -> Result<String, MissingParameterError> {
    let current = self.domains.classify(origin.host);
    let target = if self.domains.is_empty() {
      None
    } else {
      self.domains.best_domain_for(locale, current).or(current)
    };
    let default_locale =
      target.map_or(self.locales.default_locale(), |d| d.default_locale.as_str());

    let external = self.pathnames.to_external(internal, locale, params)?;
    let prefix = self
      .prefixes
      .requires_prefix(locale, default_locale)
      .then(|| self.prefixes.prefix_for(locale));
    let path = compose(&self.base_path, prefix.as_deref(), &external, self.trailing_slash);

    Ok(match target {
      Some(d) if current.is_none_or(|c| c.host != d.host) => {
        format!("{}://{}{path}", origin.scheme, d.host)
      }
      _ => path,
    })
  }

  fn evaluate(&self, request: &RouteRequest) -> RouteOutcome {
    let decoded = decode(&normalize(&request.path));
    let Some(path) = strip_base(&decoded, &self.base_path) else {
      return RouteOutcome::pass_through();
    };
    if self.matcher.excludes(path) {
      return RouteOutcome::pass_through();
    }

    // DomainClassified
    let domain = self.domains.classify(request.effective_host());
    let all = self.locales.as_slice();
    let candidates = domain.map_or(all, |d| d.candidates(all));
    let default_locale =
      domain.map_or(self.locales.default_locale(), |d| d.default_locale.as_str());

    // prefixes are parsed against every locale so foreign-domain locales can be redirected
    let prefix = match self.prefixes.parse(path) {
      Some(m) if !candidates.contains(&m.locale) => {
        if let Some(target) = self.domains.best_domain_for(&m.locale, domain) {
          return self.switch_domain(request, target, &m);
        }
        None
      }
      other => other,
    };

    // LocaleResolved
    let cookie_locale = self.cookie.as_ref().and_then(|c| request.cookie(&c.name));
    let negotiated = negotiate(&NegotiateContext {
      prefix_locale: prefix.as_ref().map(|m| m.locale.as_str()),
      cookie_locale,
      accept_language: request.accept_language.as_deref(),
      default_locale,
      candidates,
      detection: self.detection,
    });
    let locale = negotiated.locale.as_str();

    // PathResolved
    let rest = prefix.as_ref().map_or(path, |m| m.rest.as_str());
    let resolution = self.resolve_path(locale, rest);
    let external = external_path(locale, rest, &resolution);
    let route = resolved_route(locale, rest, &resolution);

    // Decided
    let needs_prefix = self.prefixes.requires_prefix(locale, default_locale);
    let prefix_ok = match &prefix {
      Some(m) => needs_prefix && m.canonical,
      None => !needs_prefix,
    };
    let decision = if prefix_ok && external == rest {
      RoutingDecision::Rewrite { internal_path: route.internal_path.clone() }
    } else {
      let locale_prefix = needs_prefix.then(|| self.prefixes.prefix_for(locale));
      let path = compose(&self.base_path, locale_prefix.as_deref(), &external, self.trailing_slash);
      RoutingDecision::Redirect {
        to: format!("{path}{}", request.query_suffix()),
        status: REDIRECT_STATUS,
      }
    };

    self.finish(request, decision, route, negotiated.source, domain)
  }

  /// Prefix names a locale the current domain does not serve: send it to the domain that does.
  fn switch_domain(
    &self,
    request: &RouteRequest,
    target: &DomainRecord,
    prefix: &PrefixMatch,
  ) -> RouteOutcome {
    let locale = prefix.locale.as_str();
    let resolution = self.resolve_path(locale, &prefix.rest);
    let external = external_path(locale, &prefix.rest, &resolution);
    let route = resolved_route(locale, &prefix.rest, &resolution);

    let locale_prefix = self
      .prefixes
      .requires_prefix(locale, &target.default_locale)
      .then(|| self.prefixes.prefix_for(locale));
    let path = compose(&self.base_path, locale_prefix.as_deref(), &external, self.trailing_slash);
    let to = format!(
      "{}://{}{path}{}",
      request.effective_scheme(),
      target.host,
      request.query_suffix()
    );

    tracing::debug!(locale, target = %target.host, "locale served by another domain");
    self.finish(
      request,
      RoutingDecision::Redirect { to, status: REDIRECT_STATUS },
      route,
      LocaleSource::Prefix,
      Some(target),
    )
  }

  fn resolve_path(&self, locale: &str, rest: &str) -> PathResolution<'_> {
    if let Some((entry, params)) = self.pathnames.match_external(locale, rest) {
      return PathResolution::Localized { entry, params };
    }
    if let Some((entry, params)) = self.pathnames.match_internal(rest) {
      return PathResolution::Internal { entry, params };
    }
    PathResolution::Unmatched
  }

  fn finish(
    &self,
    request: &RouteRequest,
    decision: RoutingDecision,
    route: ResolvedRoute,
    source: LocaleSource,
    domain: Option<&DomainRecord>,
  ) -> RouteOutcome {
    let cookie = self.cookie_write(&route.locale);
    let alternate_links = self.alternate_links_for(request, &route, domain);
    let context = LocaleContext::new(route, source, domain.map(|d| d.host.clone()));
    RouteOutcome { decision, context: Some(context), cookie, alternate_links }
  }

  fn cookie_write(&self, locale: &str) -> Option<CookieWrite> {
    if !self.detection {
      return None;
    }
    let config = self.cookie.as_ref()?;
    let path = config.path.clone().unwrap_or_else(|| {
      if self.base_path.is_empty() { "/".to_string() } else { self.base_path.clone() }
    });
    Some(CookieWrite {
      name: config.name.clone(),
      value: locale.to_string(),
      path,
      max_age: config.max_age,
      same_site: config.same_site,
      secure: config.secure,
    })
  }

  fn alternate_links_for(
    &self,
    request: &RouteRequest,
    route: &ResolvedRoute,
    domain: Option<&DomainRecord>,
  ) -> Vec<AlternateLink> {
    if !self.alternate_links || self.prefixes.mode() == LocalePrefixMode::Never {
      return Vec::new();
    }
    let origin = Origin { scheme: request.effective_scheme(), host: request.effective_host() };
    match self.link_builder().build(route.link_template(), &route.params, origin, domain) {
      Ok(links) => links,
      Err(err) => {
        tracing::warn!(%err, path = %request.path, "skipping alternate links");
        Vec::new()
      }
    }
  }
}

/// External path the locale should be served under.
fn external_path(locale: &str, rest: &str, resolution: &PathResolution<'_>) -> String {
  match resolution {
    PathResolution::Internal { entry, params } => {
      entry.external(locale).substitute(params).unwrap_or_else(|_| rest.to_string())
    }
    PathResolution::Localized { .. } | PathResolution::Unmatched => rest.to_string(),
  }
}

fn resolved_route(locale: &str, rest: &str, resolution: &PathResolution<'_>) -> ResolvedRoute {
  match resolution {
    PathResolution::Localized { entry, params } | PathResolution::Internal { entry, params } => {
      ResolvedRoute {
        locale: locale.to_string(),
        internal_template: Some(entry.internal().as_str().to_string()),
        internal_path: entry.internal().substitute(params).unwrap_or_else(|_| rest.to_string()),
        params: params.clone(),
      }
    }
    PathResolution::Unmatched => ResolvedRoute {
      locale: locale.to_string(),
      internal_template: None,
      internal_path: rest.to_string(),
      params: Params::new(),
    },
  }
}

fn validate_base_path(base_path: &str) -> Result<String, ConfigError> {
  if base_path.is_empty() || base_path == "/" {
    return Ok(String::new());
  }
  if !base_path.starts_with('/') || base_path.ends_with('/') {
    return Err(ConfigError::InvalidBasePath(base_path.to_string()));
  }
  Ok(base_path.to_string())
}
