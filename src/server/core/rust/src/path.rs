/* src/server/core/rust/src/path.rs */

use percent_encoding::percent_decode_str;

/// Leading slash, no empty segments, no trailing slash except for the root.
///
/// Collapsing `//` keeps redirect targets from turning into protocol-relative URLs.
pub(crate) fn normalize(path: &str) -> String {
  let mut out = String::with_capacity(path.len() + 1);
  for segment in path.split('/').filter(|s| !s.is_empty()) {
    out.push('/');
    out.push_str(segment);
  }
  if out.is_empty() { "/".to_string() } else { out }
}

/// Percent-decode each segment of a normalized path so it compares against configured templates.
///
/// A segment stays encoded when decoding fails or would yield a delimiter or control character.
pub(crate) fn decode(path: &str) -> String {
  if !path.contains('%') {
    return path.to_string();
  }
  let mut out = String::with_capacity(path.len());
  for segment in path.split('/').skip(1) {
    out.push('/');
    match percent_decode_str(segment).decode_utf8() {
      Ok(decoded) if !decoded.contains(is_reserved) => out.push_str(&decoded),
      _ => out.push_str(segment),
    }
  }
  out
}

fn is_reserved(c: char) -> bool {
  matches!(c, '/' | '?' | '#' | '%') || c.is_control()
}

/// Path relative to `base`, or `None` when the request lies outside it.
pub(crate) fn strip_base<'a>(path: &'a str, base: &str) -> Option<&'a str> {
  if base.is_empty() {
    return Some(path);
  }
  let rest = path.strip_prefix(base)?;
  match rest {
    "" => Some("/"),
    r if r.starts_with('/') => Some(r),
    _ => None,
  }
}

/// Join base path, optional locale prefix and a normalized path.
pub(crate) fn compose(
  base: &str,
  prefix: Option<&str>,
  rest: &str,
  trailing_slash: bool,
) -> String {
  let mut out = String::with_capacity(base.len() + rest.len() + 8);
  out.push_str(base);
  if let Some(prefix) = prefix {
    out.push_str(prefix);
  }
  if rest != "/" {
    out.push_str(rest);
  }
  if out.is_empty() {
    return "/".to_string();
  }
  if trailing_slash && !out.ends_with('/') {
    out.push('/');
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalize_paths() {
    assert_eq!(normalize(""), "/");
    assert_eq!(normalize("/"), "/");
    assert_eq!(normalize("//"), "/");
    assert_eq!(normalize("/about/"), "/about");
    assert_eq!(normalize("about"), "/about");
    assert_eq!(normalize("//evil.com//x"), "/evil.com/x");
  }

  #[test]
  fn decode_segments() {
    assert_eq!(decode("/de/%C3%BCber-uns"), "/de/über-uns");
    assert_eq!(decode("/de/über-uns"), "/de/über-uns");
    assert_eq!(decode("/a%20b"), "/a b");
    assert_eq!(decode("/a%2Fb/c"), "/a%2Fb/c");
    assert_eq!(decode("/x%3Fy"), "/x%3Fy");
    assert_eq!(decode("/bad%FF"), "/bad%FF");
    assert_eq!(decode("/"), "/");
  }

  #[test]
  fn strip_base_path() {
    assert_eq!(strip_base("/de/x", ""), Some("/de/x"));
    assert_eq!(strip_base("/shop", "/shop"), Some("/"));
    assert_eq!(strip_base("/shop/de", "/shop"), Some("/de"));
    assert_eq!(strip_base("/shopping", "/shop"), None);
    assert_eq!(strip_base("/other", "/shop"), None);
  }

  #[test]
  fn compose_paths() {
    assert_eq!(compose("", None, "/", false), "/");
    assert_eq!(compose("", Some("/de"), "/", false), "/de");
    assert_eq!(compose("", Some("/de"), "/about", false), "/de/about");
    assert_eq!(compose("/shop", None, "/", false), "/shop");
    assert_eq!(compose("/shop", Some("/de"), "/x", true), "/shop/de/x/");
    assert_eq!(compose("", None, "/", true), "/");
  }
}
