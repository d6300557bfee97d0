/* src/server/core/rust/src/locale.rs */

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Whether external paths carry a locale segment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocalePrefixMode {
  /// Every locale is prefixed, including the default.
  #[default]
  Always,
  /// Every locale except the (domain) default is prefixed.
  AsNeeded,
  /// No prefix ever; the locale comes from detection alone.
  Never,
}

impl LocalePrefixMode {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Always => "always",
      Self::AsNeeded => "as-needed",
      Self::Never => "never",
    }
  }
}

/// Ordered, non-empty set of supported locales plus the global default.
#[derive(Debug, Clone)]
pub struct LocaleSet {
  locales: Vec<String>,
  default: String,
}

impl LocaleSet {
  pub fn new(locales: Vec<String>, default: impl Into<String>) -> Result<Self, ConfigError> {
    let default = default.into();
    if locales.is_empty() {
      return Err(ConfigError::EmptyLocales);
    }
    let mut seen = HashSet::new();
    for locale in &locales {
      if locale.is_empty() {
        return Err(ConfigError::EmptyLocale);
      }
      if !seen.insert(locale.to_ascii_lowercase()) {
        return Err(ConfigError::DuplicateLocale(locale.clone()));
      }
    }
    if !locales.contains(&default) {
      return Err(ConfigError::UnknownDefaultLocale { default, locales });
    }
    Ok(Self { locales, default })
  }

  pub fn default_locale(&self) -> &str {
    &self.default
  }

  pub fn as_slice(&self) -> &[String] {
    &self.locales
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.locales.iter().map(String::as_str)
  }

  pub fn contains(&self, locale: &str) -> bool {
    self.locales.iter().any(|l| l == locale)
  }

  pub fn len(&self) -> usize {
    self.locales.len()
  }

  pub fn is_empty(&self) -> bool {
    self.locales.is_empty()
  }
}

/// A locale segment found at the start of a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatch {
  pub locale: String,
  /// False when the prefix only matched ignoring ASCII case (`/DE` for `/de`).
  pub canonical: bool,
  /// Remainder of the path after the prefix, always starting with `/`.
  pub rest: String,
}

/// Prefix policy plus the external prefix of every locale.
#[derive(Debug, Clone)]
pub struct LocalePrefixes {
  mode: LocalePrefixMode,
  by_locale: BTreeMap<String, String>,
  /// (prefix, locale), longest prefix first.
  lookup: Vec<(String, String)>,
}

impl LocalePrefixes {
  pub fn new(
    mode: LocalePrefixMode,
    locales: &LocaleSet,
    custom: &BTreeMap<String, String>,
  ) -> Result<Self, ConfigError> {
    for locale in custom.keys() {
      if !locales.contains(locale) {
        return Err(ConfigError::UnknownPrefixLocale(locale.clone()));
      }
    }

    let mut by_locale = BTreeMap::new();
    let mut seen = HashSet::new();
    for locale in locales.iter() {
      let prefix = match custom.get(locale) {
        Some(p) => {
          let p = p.trim_end_matches('/');
          if !p.starts_with('/') || p.len() < 2 || p.contains("//") {
            return Err(ConfigError::InvalidPrefix {
              locale: locale.to_string(),
              prefix: p.to_string(),
            });
          }
          p.to_string()
        }
        None => format!("/{locale}"),
      };
      if !seen.insert(prefix.to_ascii_lowercase()) {
        return Err(ConfigError::DuplicatePrefix(prefix));
      }
      by_locale.insert(locale.to_string(), prefix);
    }

    let mut lookup: Vec<(String, String)> =
      by_locale.iter().map(|(l, p)| (p.clone(), l.clone())).collect();
    lookup.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

    Ok(Self { mode, by_locale, lookup })
  }

  pub fn mode(&self) -> LocalePrefixMode {
    self.mode
  }

  /// External prefix for `locale`, e.g. `/de`. Unknown locales get `/{locale}`.
  pub fn prefix_for(&self, locale: &str) -> String {
    self.by_locale.get(locale).cloned().unwrap_or_else(|| format!("/{locale}"))
  }

  /// Whether paths for `locale` must carry a prefix, given the applicable default.
  pub fn requires_prefix(&self, locale: &str, default_locale: &str) -> bool {
    match self.mode {
      LocalePrefixMode::Always => true,
      LocalePrefixMode::AsNeeded => locale != default_locale,
      LocalePrefixMode::Never => false,
    }
  }

  /// Find the locale prefix at the start of a normalized path.
  ///
  /// Comparison ignores ASCII case and requires a segment boundary, and longer
  /// prefixes are tried first so `/en-gb/x` never resolves to `/en`.
  pub fn parse(&self, path: &str) -> Option<PrefixMatch> {
    for (prefix, locale) in &self.lookup {
      let Some(head) = path.get(..prefix.len()) else {
        continue;
      };
      if !head.eq_ignore_ascii_case(prefix) {
        continue;
      }
      let tail = &path[prefix.len()..];
      if !(tail.is_empty() || tail.starts_with('/')) {
        continue;
      }
      let rest = if tail.is_empty() || tail == "/" { "/".to_string() } else { tail.to_string() };
      return Some(PrefixMatch { locale: locale.clone(), canonical: head == prefix.as_str(), rest });
    }
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn set(locales: &[&str], default: &str) -> LocaleSet {
    LocaleSet::new(locales.iter().map(|s| s.to_string()).collect(), default).unwrap()
  }

  #[test]
  fn locale_set_validation() {
    assert!(matches!(LocaleSet::new(vec![], "en"), Err(ConfigError::EmptyLocales)));
    assert!(matches!(
      LocaleSet::new(vec!["en".into(), "EN".into()], "en"),
      Err(ConfigError::DuplicateLocale(l)) if l == "EN"
    ));
    assert!(matches!(
      LocaleSet::new(vec!["en".into()], "de"),
      Err(ConfigError::UnknownDefaultLocale { .. })
    ));
    let s = set(&["en", "de"], "de");
    assert_eq!(s.default_locale(), "de");
    assert_eq!(s.iter().collect::<Vec<_>>(), ["en", "de"]);
  }

  #[test]
  fn prefix_mode_rules() {
    let s = set(&["en", "de"], "en");
    let always = LocalePrefixes::new(LocalePrefixMode::Always, &s, &BTreeMap::new()).unwrap();
    let needed = LocalePrefixes::new(LocalePrefixMode::AsNeeded, &s, &BTreeMap::new()).unwrap();
    let never = LocalePrefixes::new(LocalePrefixMode::Never, &s, &BTreeMap::new()).unwrap();
    assert!(always.requires_prefix("en", "en"));
    assert!(!needed.requires_prefix("en", "en"));
    assert!(needed.requires_prefix("de", "en"));
    assert!(!never.requires_prefix("de", "en"));
  }

  #[test]
  fn parse_prefix() {
    let s = set(&["en", "de"], "en");
    let p = LocalePrefixes::new(LocalePrefixMode::Always, &s, &BTreeMap::new()).unwrap();

    let m = p.parse("/de/about").unwrap();
    assert_eq!((m.locale.as_str(), m.canonical, m.rest.as_str()), ("de", true, "/about"));

    let m = p.parse("/de").unwrap();
    assert_eq!(m.rest, "/");

    let m = p.parse("/DE/about").unwrap();
    assert!(!m.canonical);

    assert_eq!(p.parse("/deutsch"), None);
    assert_eq!(p.parse("/"), None);
  }

  #[test]
  fn longest_prefix_wins() {
    let s = set(&["en", "en-gb"], "en");
    let p = LocalePrefixes::new(LocalePrefixMode::Always, &s, &BTreeMap::new()).unwrap();
    assert_eq!(p.parse("/en-gb/shop").unwrap().locale, "en-gb");
    assert_eq!(p.parse("/en/shop").unwrap().locale, "en");
  }

  #[test]
  fn custom_prefixes() {
    let s = set(&["en-US", "de-AT"], "en-US");
    let custom = BTreeMap::from([("en-US".to_string(), "/us".to_string())]);
    let p = LocalePrefixes::new(LocalePrefixMode::AsNeeded, &s, &custom).unwrap();
    assert_eq!(p.prefix_for("en-US"), "/us");
    assert_eq!(p.prefix_for("de-AT"), "/de-AT");
    assert_eq!(p.parse("/us/x").unwrap().locale, "en-US");
    assert_eq!(p.parse("/en-US/x"), None);
  }

  #[test]
  fn custom_prefix_validation() {
    let s = set(&["en", "de"], "en");
    let unknown = BTreeMap::from([("fr".to_string(), "/fr".to_string())]);
    assert!(matches!(
      LocalePrefixes::new(LocalePrefixMode::Always, &s, &unknown),
      Err(ConfigError::UnknownPrefixLocale(_))
    ));
    let bad = BTreeMap::from([("en".to_string(), "us".to_string())]);
    assert!(matches!(
      LocalePrefixes::new(LocalePrefixMode::Always, &s, &bad),
      Err(ConfigError::InvalidPrefix { .. })
    ));
    let clash = BTreeMap::from([("en".to_string(), "/de".to_string())]);
    assert!(matches!(
      LocalePrefixes::new(LocalePrefixMode::Always, &s, &clash),
      Err(ConfigError::DuplicatePrefix(_))
    ));
  }
}
