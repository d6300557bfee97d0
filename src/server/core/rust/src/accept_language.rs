/* src/server/core/rust/src/accept_language.rs */

//! `Accept-Language` parsing and RFC 4647 matching against a candidate list.

/// One weighted language range from the header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRange {
  pub tag: String,
  pub quality: f32,
}

/// Parse a header into ranges ordered by descending quality.
///
/// Malformed entries are dropped individually; ties keep header order.
/// Ranges with `q=0` and the `*` wildcard never select a locale and are dropped.
pub fn parse_accept_language(header: &str) -> Vec<LanguageRange> {
  let mut ranges = Vec::new();
  for part in header.split(',') {
    let part = part.trim();
    if part.is_empty() {
      continue;
    }
    let mut pieces = part.split(';');
    let tag = pieces.next().unwrap_or("").trim();
    if tag == "*" || !is_language_range(tag) {
      continue;
    }

    let mut quality = Some(1.0_f32);
    for param in pieces {
      let Some((key, value)) = param.split_once('=') else {
        continue;
      };
      if key.trim().eq_ignore_ascii_case("q") {
        quality = value.trim().parse::<f32>().ok().filter(|q| (0.0..=1.0).contains(q));
      }
    }
    match quality {
      Some(q) if q > 0.0 => ranges.push(LanguageRange { tag: tag.to_string(), quality: q }),
      _ => {}
    }
  }

  ranges.sort_by(|a, b| b.quality.total_cmp(&a.quality));
  ranges
}

fn is_language_range(tag: &str) -> bool {
  !tag.is_empty()
    && tag
      .split('-')
      .all(|sub| (1..=8).contains(&sub.len()) && sub.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Best candidate for the header, or `None` when nothing acceptable matches.
///
/// Each range in preference order is tried with basic filtering (the candidate
/// equals the range or extends it with `-subtag`), then truncated from the
/// right and tried again, so `de-AT` reaches `de`. Comparison ignores ASCII
/// case; the candidate is returned as configured.
pub fn best_match<'a>(header: &str, candidates: &'a [String]) -> Option<&'a str> {
  parse_accept_language(header).iter().find_map(|range| match_range(&range.tag, candidates))
}

fn match_range<'a>(range: &str, candidates: &'a [String]) -> Option<&'a str> {
  let mut current = range.to_ascii_lowercase();
  loop {
    if let Some(found) = basic_filter(&current, candidates) {
      return Some(found);
    }
    let cut = current.rfind('-')?;
    current.truncate(cut);
    // a dangling single-character subtag (e.g. the `x` of `x-private`) is not a language
    if let Some(idx) = current.rfind('-') {
      if current.len() - idx == 2 {
        current.truncate(idx);
      }
    }
  }
}

fn basic_filter<'a>(range: &str, candidates: &'a [String]) -> Option<&'a str> {
  if let Some(exact) = candidates.iter().find(|c| c.eq_ignore_ascii_case(range)) {
    return Some(exact);
  }
  candidates
    .iter()
    .find(|c| {
      c.len() > range.len()
        && c.as_bytes()[range.len()] == b'-'
        && c[..range.len()].eq_ignore_ascii_case(range)
    })
    .map(String::as_str)
}
