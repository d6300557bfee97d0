/* src/server/core/rust/src/config/types.rs */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::pathnames::PathnameTable;
use crate::cookie::{DEFAULT_COOKIE_MAX_AGE, DEFAULT_COOKIE_NAME, SameSite};
use crate::errors::ConfigError;
use crate::locale::LocalePrefixMode;

/// Static routing configuration supplied by the hosting application.
///
/// Multi-word keys also accept their camelCase spelling so JSON written for
/// JavaScript tooling loads unchanged.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutingConfig {
  pub locales: Vec<String>,
  #[serde(alias = "defaultLocale")]
  pub default_locale: String,
  #[serde(default, alias = "localePrefix")]
  pub locale_prefix: LocalePrefixConfig,
  #[serde(default = "default_true", alias = "localeDetection")]
  pub locale_detection: bool,
  #[serde(default, alias = "localeCookie")]
  pub locale_cookie: LocaleCookieSetting,
  #[serde(default)]
  pub domains: Vec<DomainConfig>,
  #[serde(default)]
  pub pathnames: PathnameTable,
  #[serde(default = "default_true", alias = "alternateLinks")]
  pub alternate_links: bool,
  #[serde(default, alias = "basePath")]
  pub base_path: String,
  #[serde(default, alias = "trailingSlash")]
  pub trailing_slash: bool,
  #[serde(default)]
  pub matcher: MatcherConfig,
}

impl RoutingConfig {
  /// Minimal config: prefix `always`, detection on, cookie on, links on.
  pub fn new(locales: Vec<String>, default_locale: impl Into<String>) -> Self {
    Self {
      locales,
      default_locale: default_locale.into(),
      locale_prefix: LocalePrefixConfig::default(),
      locale_detection: true,
      locale_cookie: LocaleCookieSetting::default(),
      domains: Vec::new(),
      pathnames: PathnameTable::default(),
      alternate_links: true,
      base_path: String::new(),
      trailing_slash: false,
      matcher: MatcherConfig::default(),
    }
  }

  pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
    Ok(serde_json::from_str(content)?)
  }
}

fn default_true() -> bool {
  true
}

/// `"as-needed"` or `{ mode = "as-needed", prefixes = { en-US = "/us" } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "LocalePrefixRepr")]
pub struct LocalePrefixConfig {
  pub mode: LocalePrefixMode,
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub prefixes: BTreeMap<String, String>,
}

impl From<LocalePrefixMode> for LocalePrefixConfig {
  fn from(mode: LocalePrefixMode) -> Self {
    Self { mode, prefixes: BTreeMap::new() }
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LocalePrefixRepr {
  Mode(LocalePrefixMode),
  Table {
    #[serde(default)]
    mode: LocalePrefixMode,
    #[serde(default)]
    prefixes: BTreeMap<String, String>,
  },
}

impl From<LocalePrefixRepr> for LocalePrefixConfig {
  fn from(repr: LocalePrefixRepr) -> Self {
    match repr {
      LocalePrefixRepr::Mode(mode) => mode.into(),
      LocalePrefixRepr::Table { mode, prefixes } => Self { mode, prefixes },
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocaleCookieConfig {
  #[serde(default = "default_cookie_name")]
  pub name: String,
  #[serde(default = "default_cookie_max_age", alias = "maxAge")]
  pub max_age: u64,
  /// Defaults to the base path, or `/`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub path: Option<String>,
  #[serde(default, alias = "sameSite")]
  pub same_site: SameSite,
  #[serde(default)]
  pub secure: bool,
}

impl Default for LocaleCookieConfig {
  fn default() -> Self {
    Self {
      name: default_cookie_name(),
      max_age: default_cookie_max_age(),
      path: None,
      same_site: SameSite::default(),
      secure: false,
    }
  }
}

fn default_cookie_name() -> String {
  DEFAULT_COOKIE_NAME.to_string()
}

fn default_cookie_max_age() -> u64 {
  DEFAULT_COOKIE_MAX_AGE
}

/// `false`, `true`, or a cookie table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "CookieRepr", into = "CookieRepr")]
pub enum LocaleCookieSetting {
  Disabled,
  Enabled(LocaleCookieConfig),
}

impl Default for LocaleCookieSetting {
  fn default() -> Self {
    Self::Enabled(LocaleCookieConfig::default())
  }
}

impl LocaleCookieSetting {
  pub fn config(&self) -> Option<&LocaleCookieConfig> {
    match self {
      Self::Disabled => None,
      Self::Enabled(c) => Some(c),
    }
  }
}

#[derive(Clone, Deserialize, Serialize)]
#[serde(untagged)]
enum CookieRepr {
  Flag(bool),
  Table(LocaleCookieConfig),
}

impl From<CookieRepr> for LocaleCookieSetting {
  fn from(repr: CookieRepr) -> Self {
    match repr {
      CookieRepr::Flag(false) => Self::Disabled,
      CookieRepr::Flag(true) => Self::default(),
      CookieRepr::Table(c) => Self::Enabled(c),
    }
  }
}

impl From<LocaleCookieSetting> for CookieRepr {
  fn from(setting: LocaleCookieSetting) -> Self {
    match setting {
      LocaleCookieSetting::Disabled => Self::Flag(false),
      LocaleCookieSetting::Enabled(c) => Self::Table(c),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DomainConfig {
  #[serde(alias = "domain")]
  pub host: String,
  #[serde(alias = "defaultLocale")]
  pub default_locale: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub locales: Option<Vec<String>>,
}

/// Which requests the engine handles at all.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatcherConfig {
  /// Path prefixes left untouched, e.g. `/api`.
  #[serde(default)]
  pub exclude: Vec<String>,
  /// Leave paths whose last segment contains a dot (`/favicon.ico`) untouched.
  #[serde(default = "default_true", alias = "skipFiles")]
  pub skip_files: bool,
}

impl Default for MatcherConfig {
  fn default() -> Self {
    Self { exclude: Vec::new(), skip_files: true }
  }
}

impl MatcherConfig {
  /// True when `path` (relative to the base path) is outside the engine's scope.
  pub fn excludes(&self, path: &str) -> bool {
    let excluded = self.exclude.iter().any(|prefix| {
      let prefix = prefix.trim_end_matches('/');
      !prefix.is_empty()
        && path.starts_with(prefix)
        && matches!(path.as_bytes().get(prefix.len()), None | Some(b'/'))
    });
    excluded || (self.skip_files && path.rsplit('/').next().is_some_and(|last| last.contains('.')))
  }
}
