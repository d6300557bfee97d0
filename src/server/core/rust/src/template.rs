/* src/server/core/rust/src/template.rs */

//! Pathname templates: `/news/[slug]`, `/docs/[...path]`.
//!
//! A template is a list of segments. Matching is positional: literals compare
//! exactly, `[name]` consumes one segment, a trailing `[...name]` consumes one
//! or more. Substitution is the inverse.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::errors::{MissingParameterError, TemplateError};

fn param_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r"^\[(\.\.\.)?([A-Za-z_][A-Za-z0-9_-]*)\]$").expect("parameter segment regex")
  })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  Literal(String),
  Param(String),
  CatchAll(String),
}

/// Value captured for one dynamic segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
  Single(String),
  /// Catch-all capture, one entry per path segment.
  Many(Vec<String>),
}

impl ParamValue {
  fn render(&self) -> Option<String> {
    match self {
      Self::Single(v) if v.is_empty() => None,
      Self::Single(v) => Some(v.clone()),
      Self::Many(vs) if vs.is_empty() => None,
      Self::Many(vs) => Some(vs.join("/")),
    }
  }
}

impl From<&str> for ParamValue {
  fn from(v: &str) -> Self {
    Self::Single(v.to_string())
  }
}

impl From<String> for ParamValue {
  fn from(v: String) -> Self {
    Self::Single(v)
  }
}

impl From<Vec<String>> for ParamValue {
  fn from(vs: Vec<String>) -> Self {
    Self::Many(vs)
  }
}

pub type Params = BTreeMap<String, ParamValue>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
  source: String,
  segments: Vec<Segment>,
}

impl PathTemplate {
  pub fn parse(template: &str) -> Result<Self, TemplateError> {
    if !template.starts_with('/') {
      return Err(TemplateError::MissingLeadingSlash);
    }
    let trimmed = if template.len() > 1 { template.trim_end_matches('/') } else { template };

    let mut segments = Vec::new();
    let mut seen = HashSet::new();
    for raw in split_segments(trimmed) {
      if raw.is_empty() {
        return Err(TemplateError::EmptySegment);
      }
      if let Some(Segment::CatchAll(name)) = segments.last() {
        return Err(TemplateError::CatchAllNotLast(name.clone()));
      }
      let segment = if raw.starts_with('[') || raw.ends_with(']') {
        let caps =
          param_re().captures(raw).ok_or_else(|| TemplateError::MalformedParameter(raw.into()))?;
        let name = caps[2].to_string();
        if !seen.insert(name.clone()) {
          return Err(TemplateError::DuplicateParameter(name));
        }
        if caps.get(1).is_some() { Segment::CatchAll(name) } else { Segment::Param(name) }
      } else if raw.contains(['[', ']']) {
        return Err(TemplateError::MalformedParameter(raw.into()));
      } else {
        Segment::Literal(raw.to_string())
      };
      segments.push(segment);
    }

    let source = if segments.is_empty() { "/".to_string() } else { trimmed.to_string() };
    Ok(Self { source, segments })
  }

  pub fn as_str(&self) -> &str {
    &self.source
  }

  pub fn segments(&self) -> &[Segment] {
    &self.segments
  }

  pub fn is_static(&self) -> bool {
    self.segments.iter().all(|s| matches!(s, Segment::Literal(_)))
  }

  /// Parameter names in sorted order, catch-alls marked with a leading `...`.
  pub fn param_signature(&self) -> Vec<String> {
    let mut names: Vec<String> = self
      .segments
      .iter()
      .filter_map(|s| match s {
        Segment::Literal(_) => None,
        Segment::Param(n) => Some(n.clone()),
        Segment::CatchAll(n) => Some(format!("...{n}")),
      })
      .collect();
    names.sort();
    names
  }

  /// Match a normalized path (leading slash, no trailing slash except root).
  pub fn match_path(&self, path: &str) -> Option<Params> {
    let parts = split_segments(path);
    let mut params = Params::new();
    let mut idx = 0;

    for segment in &self.segments {
      match segment {
        Segment::Literal(lit) => {
          if parts.get(idx) != Some(&lit.as_str()) {
            return None;
          }
          idx += 1;
        }
        Segment::Param(name) => {
          let value = parts.get(idx).filter(|v| !v.is_empty())?;
          params.insert(name.clone(), ParamValue::Single((*value).to_string()));
          idx += 1;
        }
        Segment::CatchAll(name) => {
          let rest = &parts[idx.min(parts.len())..];
          if rest.is_empty() || rest.iter().any(|s| s.is_empty()) {
            return None;
          }
          let values = rest.iter().map(|s| s.to_string()).collect();
          params.insert(name.clone(), ParamValue::Many(values));
          idx = parts.len();
        }
      }
    }

    (idx == parts.len()).then_some(params)
  }

  /// Fill every placeholder from `params`. Extra entries are ignored.
  pub fn substitute(&self, params: &Params) -> Result<String, MissingParameterError> {
    if self.segments.is_empty() {
      return Ok("/".to_string());
    }
    let mut out = String::new();
    for segment in &self.segments {
      out.push('/');
      match segment {
        Segment::Literal(lit) => out.push_str(lit),
        Segment::Param(name) | Segment::CatchAll(name) => {
          let value = params.get(name).and_then(ParamValue::render).ok_or_else(|| {
            MissingParameterError { template: self.source.clone(), param: name.clone() }
          })?;
          out.push_str(&value);
        }
      }
    }
    Ok(out)
  }
}

impl fmt::Display for PathTemplate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.source)
  }
}

fn split_segments(path: &str) -> Vec<&str> {
  let body = path.strip_prefix('/').unwrap_or(path);
  if body.is_empty() { Vec::new() } else { body.split('/').collect() }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tpl(s: &str) -> PathTemplate {
    PathTemplate::parse(s).unwrap()
  }

  fn params(pairs: &[(&str, ParamValue)]) -> Params {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
  }

  #[test]
  fn parse_root_and_literals() {
    assert!(tpl("/").segments().is_empty());
    assert_eq!(tpl("/about/").as_str(), "/about");
    assert!(tpl("/news/just-in").is_static());
  }

  #[test]
  fn parse_rejects_bad_templates() {
    assert_eq!(PathTemplate::parse("about"), Err(TemplateError::MissingLeadingSlash));
    assert_eq!(PathTemplate::parse("/a//b"), Err(TemplateError::EmptySegment));
    assert_eq!(
      PathTemplate::parse("/a/[b"),
      Err(TemplateError::MalformedParameter("[b".into()))
    );
    assert_eq!(
      PathTemplate::parse("/a/x[b]"),
      Err(TemplateError::MalformedParameter("x[b]".into()))
    );
    assert_eq!(
      PathTemplate::parse("/[id]/[id]"),
      Err(TemplateError::DuplicateParameter("id".into()))
    );
    assert_eq!(
      PathTemplate::parse("/[...rest]/tail"),
      Err(TemplateError::CatchAllNotLast("rest".into()))
    );
  }

  #[test]
  fn match_literal_requires_exact_segments() {
    let t = tpl("/about");
    assert_eq!(t.match_path("/about"), Some(Params::new()));
    assert_eq!(t.match_path("/About"), None);
    assert_eq!(t.match_path("/about/team"), None);
    assert_eq!(t.match_path("/"), None);
  }

  #[test]
  fn match_root() {
    assert_eq!(tpl("/").match_path("/"), Some(Params::new()));
    assert_eq!(tpl("/").match_path("/x"), None);
  }

  #[test]
  fn match_param_takes_one_segment() {
    let t = tpl("/news/[slug]");
    assert_eq!(t.match_path("/news/hello"), Some(params(&[("slug", "hello".into())])));
    assert_eq!(t.match_path("/news"), None);
    assert_eq!(t.match_path("/news/a/b"), None);
  }

  #[test]
  fn match_catch_all_takes_the_rest() {
    let t = tpl("/docs/[...path]");
    assert_eq!(
      t.match_path("/docs/a/b/c"),
      Some(params(&[("path", vec!["a".to_string(), "b".into(), "c".into()].into())]))
    );
    assert_eq!(t.match_path("/docs"), None);
  }

  #[test]
  fn substitute_fills_placeholders() {
    let t = tpl("/users/[id]/files/[...path]");
    let p = params(&[("id", "42".into()), ("path", vec!["a".to_string(), "b.txt".into()].into())]);
    assert_eq!(t.substitute(&p).unwrap(), "/users/42/files/a/b.txt");
  }

  #[test]
  fn substitute_reports_missing_parameter() {
    let t = tpl("/news/[slug]");
    let err = t.substitute(&Params::new()).unwrap_err();
    assert_eq!(err.param, "slug");
    assert_eq!(err.template, "/news/[slug]");

    let t = tpl("/docs/[...path]");
    let err = t.substitute(&params(&[("path", ParamValue::Many(vec![]))])).unwrap_err();
    assert_eq!(err.param, "path");
  }

  #[test]
  fn signature_ignores_order() {
    assert_eq!(tpl("/[a]/x/[b]").param_signature(), tpl("/y/[b]/[a]").param_signature());
    assert_ne!(tpl("/[a]/[...b]").param_signature(), tpl("/[a]/[b]").param_signature());
  }
}
