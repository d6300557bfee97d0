/* src/cli/core/src/check.rs */

use std::path::Path;

use localeroute::RoutingEngine;

use crate::ui;

/// A later template that can never match for `locale` because an earlier one wins.
#[derive(Debug, PartialEq, Eq)]
pub struct Shadowed {
  pub locale: String,
  pub template: String,
  pub shadowed_by: String,
}

/// Templates that first-match-wins ordering makes unreachable.
///
/// Detection is structural: a later template is reported when an earlier one
/// matches its source text, so `[param]` segments count as any value.
pub fn find_shadowed(engine: &RoutingEngine) -> Vec<Shadowed> {
  let entries: Vec<_> = engine.pathnames().iter().collect();
  let mut found = Vec::new();
  for locale in engine.locales().iter() {
    for (idx, later) in entries.iter().enumerate() {
      let template = later.external(locale);
      let winner = entries[..idx]
        .iter()
        .map(|earlier| earlier.external(locale))
        .find(|earlier| earlier.match_path(template.as_str()).is_some());
      if let Some(winner) = winner {
        found.push(Shadowed {
          locale: locale.to_string(),
          template: template.as_str().to_string(),
          shadowed_by: winner.as_str().to_string(),
        });
      }
    }
  }
  found
}

pub fn run_check(engine: &RoutingEngine, path: &Path) {
  ui::banner("check");
  ui::ok(&format!("{} is valid", path.display()));

  let locales = engine.locales();
  let list: Vec<_> = locales.iter().collect();
  ui::field("locales", &format!("{} (default {})", list.join(", "), locales.default_locale()));
  ui::field("prefix", engine.prefixes().mode().as_str());
  ui::field("detection", if engine.detection_enabled() { "on" } else { "off" });
  ui::field("cookie", engine.cookie_config().map_or("off", |c| c.name.as_str()));
  if !engine.base_path().is_empty() {
    ui::field("base path", engine.base_path());
  }

  if !engine.domains().is_empty() {
    ui::field("domains", &engine.domains().iter().count().to_string());
    for domain in engine.domains().iter() {
      let served = domain.locales.as_ref().map_or_else(|| "all".to_string(), |l| l.join(", "));
      let host = ui::highlight(&domain.host);
      ui::detail(&format!("{host}  default {}  serves {served}", domain.default_locale));
    }
  }

  ui::field("pathnames", &engine.pathnames().len().to_string());
  let shadowed = find_shadowed(engine);
  if !shadowed.is_empty() {
    ui::blank();
  }
  for s in &shadowed {
    ui::warn(&format!(
      "[{}] {} is unreachable, {} is declared first",
      s.locale, s.template, s.shadowed_by
    ));
  }
  ui::blank();
}

#[cfg(test)]
mod tests {
  use localeroute::{ExternalPathname, RoutingConfig};

  use super::*;

  fn engine(entries: &[(&str, &str)]) -> RoutingEngine {
    let mut config = RoutingConfig::new(vec!["en".into(), "de".into()], "en");
    for (internal, external) in entries {
      config.pathnames.push(*internal, ExternalPathname::Shared((*external).to_string()));
    }
    RoutingEngine::new(config).unwrap()
  }

  #[test]
  fn literal_before_dynamic_is_fine() {
    let engine = engine(&[("/news/just-in", "/news/just-in"), ("/news/[slug]", "/news/[slug]")]);
    assert!(find_shadowed(&engine).is_empty());
  }

  #[test]
  fn dynamic_before_literal_is_reported_per_locale() {
    let engine = engine(&[("/news/[slug]", "/news/[slug]"), ("/news/just-in", "/news/just-in")]);
    let shadowed = find_shadowed(&engine);
    assert_eq!(shadowed.len(), 2);
    assert_eq!(
      shadowed[0],
      Shadowed {
        locale: "en".into(),
        template: "/news/just-in".into(),
        shadowed_by: "/news/[slug]".into(),
      }
    );
  }
}
