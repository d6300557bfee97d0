/* src/server/core/rust/src/negotiate.rs */

use serde::Serialize;

use crate::accept_language::best_match;

/// Signals available for one request, already bounded to a candidate set.
#[derive(Debug, Clone, Copy)]
pub struct NegotiateContext<'a> {
  pub prefix_locale: Option<&'a str>,
  pub cookie_locale: Option<&'a str>,
  pub accept_language: Option<&'a str>,
  /// Domain default, or the global default when no domain applies.
  pub default_locale: &'a str,
  pub candidates: &'a [String],
  pub detection: bool,
}

/// Which signal decided the locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocaleSource {
  Prefix,
  Cookie,
  AcceptLanguage,
  Default,
}

impl LocaleSource {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Prefix => "prefix",
      Self::Cookie => "cookie",
      Self::AcceptLanguage => "accept_language",
      Self::Default => "default",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiated {
  pub locale: String,
  pub source: LocaleSource,
}

/// Resolution chain: path prefix -> cookie -> Accept-Language -> default.
///
/// Cookie and header are consulted only when detection is enabled. Values
/// outside `candidates` are skipped rather than rejected.
pub fn negotiate(ctx: &NegotiateContext<'_>) -> Negotiated {
  if let Some(locale) = ctx.prefix_locale.and_then(|p| candidate(ctx.candidates, p)) {
    return Negotiated { locale: locale.to_string(), source: LocaleSource::Prefix };
  }

  if ctx.detection {
    if let Some(locale) = ctx.cookie_locale.and_then(|c| candidate(ctx.candidates, c)) {
      tracing::trace!(locale, "locale from cookie");
      return Negotiated { locale: locale.to_string(), source: LocaleSource::Cookie };
    }
    if let Some(locale) = ctx.accept_language.and_then(|h| best_match(h, ctx.candidates)) {
      tracing::trace!(locale, "locale from accept-language");
      return Negotiated { locale: locale.to_string(), source: LocaleSource::AcceptLanguage };
    }
  }

  Negotiated { locale: ctx.default_locale.to_string(), source: LocaleSource::Default }
}

fn candidate<'a>(candidates: &'a [String], value: &str) -> Option<&'a str> {
  candidates.iter().find(|c| *c == value).map(String::as_str)
}
