/* src/server/core/rust/src/domain.rs */

use std::collections::HashSet;

use serde::Serialize;

use crate::config::DomainConfig;
use crate::errors::ConfigError;
use crate::locale::LocaleSet;

/// A hostname and the locales it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainRecord {
  /// Lowercased host, optionally with `:port`.
  pub host: String,
  pub default_locale: String,
  /// `None` means the domain serves the full locale set.
  pub locales: Option<Vec<String>>,
}

impl DomainRecord {
  pub fn supports(&self, locale: &str) -> bool {
    match &self.locales {
      Some(list) => list.iter().any(|l| l == locale),
      None => true,
    }
  }

  pub fn is_unrestricted(&self) -> bool {
    self.locales.is_none()
  }

  /// Locales negotiable on this domain.
  pub fn candidates<'a>(&'a self, all: &'a [String]) -> &'a [String] {
    self.locales.as_deref().unwrap_or(all)
  }

  fn is_restricted_to_include(&self, locale: &str) -> bool {
    self.locales.as_ref().is_some_and(|list| list.iter().any(|l| l == locale))
  }
}

/// Ordered domain records, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct DomainRegistry {
  domains: Vec<DomainRecord>,
}

impl DomainRegistry {
  pub fn new(configs: &[DomainConfig], locales: &LocaleSet) -> Result<Self, ConfigError> {
    let mut seen = HashSet::new();
    let mut domains = Vec::with_capacity(configs.len());

    for config in configs {
      let host = config.host.trim().to_ascii_lowercase();
      if host.is_empty() {
        return Err(ConfigError::EmptyDomainHost);
      }
      if !seen.insert(host.clone()) {
        return Err(ConfigError::DuplicateDomain(host));
      }
      if let Some(list) = &config.locales {
        for locale in list {
          if !locales.contains(locale) {
            return Err(ConfigError::UnknownDomainLocale { host, locale: locale.clone() });
          }
        }
      }
      let record = DomainRecord {
        host,
        default_locale: config.default_locale.clone(),
        locales: config.locales.clone(),
      };
      if !locales.contains(&record.default_locale) || !record.supports(&record.default_locale) {
        return Err(ConfigError::DomainDefaultNotSupported {
          host: record.host,
          default: record.default_locale,
        });
      }
      domains.push(record);
    }

    Ok(Self { domains })
  }

  pub fn is_empty(&self) -> bool {
    self.domains.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &DomainRecord> {
    self.domains.iter()
  }

  /// Find the record for a request host.
  ///
  /// Exact match ignoring ASCII case, then the same host without its port.
  pub fn classify(&self, host: &str) -> Option<&DomainRecord> {
    let host = host.trim().to_ascii_lowercase();
    if let Some(found) = self.domains.iter().find(|d| d.host == host) {
      return Some(found);
    }
    let bare = strip_port(&host)?;
    self.domains.iter().find(|d| d.host == bare)
  }

  /// Domain that should serve `locale` when switching away from `current`.
  ///
  /// Priority, first match in registry order within each tier:
  /// 1. `current` if it supports the locale
  /// 2. a domain whose default is the locale
  /// 3. a restricted domain listing the locale
  /// 4. `current` if it serves every locale
  /// 5. any domain serving every locale
  pub fn best_domain_for(
    &self,
    locale: &str,
    current: Option<&DomainRecord>,
  ) -> Option<&DomainRecord> {
    let current = current.and_then(|c| self.domains.iter().find(|d| d.host == c.host));

    if let Some(cur) = current.filter(|c| c.supports(locale)) {
      return Some(cur);
    }
    if let Some(found) = self.domains.iter().find(|d| d.default_locale == locale) {
      return Some(found);
    }
    if let Some(found) = self.domains.iter().find(|d| d.is_restricted_to_include(locale)) {
      return Some(found);
    }
    if let Some(cur) = current.filter(|c| c.is_unrestricted()) {
      return Some(cur);
    }
    self.domains.iter().find(|d| d.is_unrestricted())
  }
}

fn strip_port(host: &str) -> Option<&str> {
  let (bare, port) = host.rsplit_once(':')?;
  (!port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) && !bare.ends_with(']'))
    .then_some(bare)
}
