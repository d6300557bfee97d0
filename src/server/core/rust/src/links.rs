/* src/server/core/rust/src/links.rs */

use serde::Serialize;

use crate::domain::{DomainRecord, DomainRegistry};
use crate::errors::MissingParameterError;
use crate::locale::{LocalePrefixMode, LocalePrefixes, LocaleSet};
use crate::path::compose;
use crate::pathnames::PathnameIndex;
use crate::template::Params;

pub const X_DEFAULT: &str = "x-default";

/// One `hreflang` alternate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlternateLink {
  pub hreflang: String,
  pub href: String,
}

/// Scheme and host the request arrived on.
#[derive(Debug, Clone, Copy)]
pub struct Origin<'a> {
  pub scheme: &'a str,
  pub host: &'a str,
}

/// Computes per-locale canonical URLs for a resolved route.
///
/// Borrowed from a `RoutingEngine` via `RoutingEngine::link_builder`.
#[derive(Debug, Clone, Copy)]
pub struct AlternateLinkBuilder<'a> {
  pub(crate) locales: &'a LocaleSet,
  pub(crate) prefixes: &'a LocalePrefixes,
  pub(crate) domains: &'a DomainRegistry,
  pub(crate) pathnames: &'a PathnameIndex,
  pub(crate) base_path: &'a str,
  pub(crate) trailing_slash: bool,
}

impl AlternateLinkBuilder<'_> {
  /// Links for every locale in configuration order, then `x-default` when applicable.
  ///
  /// With domains configured each locale is served from
  /// `best_domain_for(locale, current)`; locales no domain serves are left out.
  pub fn build(
    &self,
    internal: &str,
    params: &Params,
    origin: Origin<'_>,
    current: Option<&DomainRecord>,
  ) -> Result<Vec<AlternateLink>, MissingParameterError> {
    let mut links = Vec::with_capacity(self.locales.len() + 1);

    for locale in self.locales.iter() {
      let (host, default_locale) = if self.domains.is_empty() {
        (origin.host, self.locales.default_locale())
      } else {
        match self.domains.best_domain_for(locale, current) {
          Some(d) => (d.host.as_str(), d.default_locale.as_str()),
          None => continue,
        }
      };
      let external = self.pathnames.to_external(internal, locale, params)?;
      let prefix = self
        .prefixes
        .requires_prefix(locale, default_locale)
        .then(|| self.prefixes.prefix_for(locale));
      let path = compose(self.base_path, prefix.as_deref(), &external, self.trailing_slash);
      links.push(AlternateLink {
        hreflang: locale.to_string(),
        href: format!("{}://{host}{path}", origin.scheme),
      });
    }

    if self.includes_x_default(internal) {
      let default_locale =
        current.map_or(self.locales.default_locale(), |d| d.default_locale.as_str());
      let external = self.pathnames.to_external(internal, default_locale, params)?;
      let path = compose(self.base_path, None, &external, self.trailing_slash);
      links.push(AlternateLink {
        hreflang: X_DEFAULT.to_string(),
        href: format!("{}://{}{path}", origin.scheme, origin.host),
      });
    }

    Ok(links)
  }

  /// `x-default` needs an unprefixed URL that stays reachable: any path under
  /// `as-needed`, only the root under `always`, never under `never`.
  fn includes_x_default(&self, internal: &str) -> bool {
    match self.prefixes.mode() {
      LocalePrefixMode::AsNeeded => true,
      LocalePrefixMode::Always => internal == "/",
      LocalePrefixMode::Never => false,
    }
  }
}

/// Render links as a `Link` header value.
pub fn format_link_header(links: &[AlternateLink]) -> String {
  links
    .iter()
    .map(|l| format!("<{}>; rel=\"alternate\"; hreflang=\"{}\"", l.href, l.hreflang))
    .collect::<Vec<_>>()
    .join(", ")
}
