/* src/server/core/rust/src/pathnames.rs */

use std::collections::{BTreeMap, HashSet};

use crate::config::{ExternalPathname, PathnameTable};
use crate::errors::{ConfigError, MissingParameterError};
use crate::locale::LocaleSet;
use crate::template::{Params, PathTemplate};

/// One internal template with its external template for every locale.
#[derive(Debug, Clone)]
pub struct LocalizedPathname {
  internal: PathTemplate,
  external: BTreeMap<String, PathTemplate>,
}

impl LocalizedPathname {
  pub fn internal(&self) -> &PathTemplate {
    &self.internal
  }

  /// External template for `locale`, falling back to the internal template.
  pub fn external(&self, locale: &str) -> &PathTemplate {
    self.external.get(locale).unwrap_or(&self.internal)
  }
}

/// Ordered pathname templates. First match wins on every lookup.
#[derive(Debug, Clone, Default)]
pub struct PathnameIndex {
  entries: Vec<LocalizedPathname>,
}

impl PathnameIndex {
  pub fn new(table: &PathnameTable, locales: &LocaleSet) -> Result<Self, ConfigError> {
    let mut entries = Vec::with_capacity(table.0.len());
    let mut seen = HashSet::new();

    for entry in table.iter() {
      let internal = parse(&entry.internal)?;
      if !seen.insert(internal.as_str().to_string()) {
        return Err(ConfigError::DuplicateTemplate(entry.internal.clone()));
      }
      let signature = internal.param_signature();

      let mut external = BTreeMap::new();
      match &entry.external {
        ExternalPathname::Shared(template) => {
          let parsed = parse(template)?;
          for locale in locales.iter() {
            check_signature(&internal, &parsed, &signature, locale)?;
            external.insert(locale.to_string(), parsed.clone());
          }
        }
        ExternalPathname::PerLocale(map) => {
          for (locale, template) in map {
            if !locales.contains(locale) {
              return Err(ConfigError::UnknownPathnameLocale {
                internal: entry.internal.clone(),
                locale: locale.clone(),
              });
            }
            let parsed = parse(template)?;
            check_signature(&internal, &parsed, &signature, locale)?;
            external.insert(locale.clone(), parsed);
          }
        }
      }

      entries.push(LocalizedPathname { internal, external });
    }

    Ok(Self { entries })
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = &LocalizedPathname> {
    self.entries.iter()
  }

  /// Entry registered for an internal template string.
  pub fn get(&self, internal: &str) -> Option<&LocalizedPathname> {
    self.entries.iter().find(|e| e.internal.as_str() == internal)
  }

  /// First entry whose external template for `locale` matches `path`.
  pub fn match_external(&self, locale: &str, path: &str) -> Option<(&LocalizedPathname, Params)> {
    self.entries.iter().find_map(|e| e.external(locale).match_path(path).map(|p| (e, p)))
  }

  /// First entry whose internal template matches `path`.
  pub fn match_internal(&self, path: &str) -> Option<(&LocalizedPathname, Params)> {
    self.entries.iter().find_map(|e| e.internal.match_path(path).map(|p| (e, p)))
  }

  /// Translate an internal template (or plain internal path) to `locale`'s external path.
  ///
  /// Unregistered internal paths are substituted as they are, so links to
  /// non-localized routes still work.
  pub fn to_external(
    &self,
    internal: &str,
    locale: &str,
    params: &Params,
  ) -> Result<String, MissingParameterError> {
    if let Some(entry) = self.get(internal) {
      return entry.external(locale).substitute(params);
    }
    match PathTemplate::parse(internal) {
      Ok(template) => template.substitute(params),
      Err(_) => Ok(internal.to_string()),
    }
  }
}

fn parse(template: &str) -> Result<PathTemplate, ConfigError> {
  PathTemplate::parse(template)
    .map_err(|source| ConfigError::InvalidTemplate { template: template.to_string(), source })
}

fn check_signature(
  internal: &PathTemplate,
  external: &PathTemplate,
  signature: &[String],
  locale: &str,
) -> Result<(), ConfigError> {
  if external.param_signature() == signature {
    return Ok(());
  }
  Err(ConfigError::ParameterMismatch {
    internal: internal.to_string(),
    external: external.to_string(),
    locale: locale.to_string(),
  })
}
