/* src/server/core/rust/src/cookie.rs */

use serde::{Deserialize, Serialize};

pub const DEFAULT_COOKIE_NAME: &str = "locale";
/// One year.
pub const DEFAULT_COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 365;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
  Strict,
  #[default]
  Lax,
  None,
}

impl SameSite {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Strict => "Strict",
      Self::Lax => "Lax",
      Self::None => "None",
    }
  }
}

/// Instruction for the hosting boundary to persist the resolved locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CookieWrite {
  pub name: String,
  pub value: String,
  pub path: String,
  pub max_age: u64,
  pub same_site: SameSite,
  pub secure: bool,
}

impl CookieWrite {
  /// Render as a `Set-Cookie` header value.
  pub fn to_header_value(&self) -> String {
    let mut out = format!(
      "{}={}; Path={}; Max-Age={}; SameSite={}",
      self.name,
      self.value,
      self.path,
      self.max_age,
      self.same_site.as_str()
    );
    // browsers reject SameSite=None without Secure
    if self.secure || self.same_site == SameSite::None {
      out.push_str("; Secure");
    }
    out
  }
}

/// Split a `Cookie` header into ordered `(name, value)` pairs.
pub fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
  header
    .split(';')
    .filter_map(|pair| {
      let (k, v) = pair.trim().split_once('=')?;
      let k = k.trim();
      if k.is_empty() {
        return None;
      }
      let v = v.trim();
      let v = v.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(v);
      Some((k.to_string(), v.to_string()))
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn header_value_defaults() {
    let write = CookieWrite {
      name: "locale".into(),
      value: "de".into(),
      path: "/".into(),
      max_age: DEFAULT_COOKIE_MAX_AGE,
      same_site: SameSite::Lax,
      secure: false,
    };
    assert_eq!(write.to_header_value(), "locale=de; Path=/; Max-Age=31536000; SameSite=Lax");
  }

  #[test]
  fn same_site_none_forces_secure() {
    let write = CookieWrite {
      name: "locale".into(),
      value: "en".into(),
      path: "/shop".into(),
      max_age: 60,
      same_site: SameSite::None,
      secure: false,
    };
    assert!(write.to_header_value().ends_with("SameSite=None; Secure"));
  }

  #[test]
  fn parse_multiple_pairs() {
    let pairs = parse_cookie_header("other=1; locale=zh; foo=bar");
    assert_eq!(pairs[1], ("locale".to_string(), "zh".to_string()));
    assert_eq!(pairs.len(), 3);
  }

  #[test]
  fn parse_skips_garbage_and_unquotes() {
    let pairs = parse_cookie_header(r#"; novalue; =x; locale="de""#);
    assert_eq!(pairs, vec![("locale".to_string(), "de".to_string())]);
  }
}
