/* src/server/core/rust/src/config/pathnames.rs */

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// External form of one internal pathname.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ExternalPathname {
  /// Same external template for every locale.
  Shared(String),
  /// Per-locale external templates; missing locales use the internal template.
  PerLocale(BTreeMap<String, String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathnameEntry {
  pub internal: String,
  pub external: ExternalPathname,
}

/// Internal template -> external template(s), in declaration order.
///
/// Order decides ties: when an external path matches several templates, the
/// first declared entry wins. Declare literal paths (`/news/just-in`) before
/// the dynamic templates they overlap (`/news/[slug]`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathnameTable(pub Vec<PathnameEntry>);

impl PathnameTable {
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &PathnameEntry> {
    self.0.iter()
  }

  pub fn push(&mut self, internal: impl Into<String>, external: ExternalPathname) {
    self.0.push(PathnameEntry { internal: internal.into(), external });
  }
}

impl<'de> Deserialize<'de> for PathnameTable {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    deserializer.deserialize_map(TableVisitor)
  }
}

struct TableVisitor;

impl<'de> Visitor<'de> for TableVisitor {
  type Value = PathnameTable;

  fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("a table of internal pathnames to external pathnames")
  }

  fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
    let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
    while let Some((internal, external)) = map.next_entry::<String, ExternalPathname>()? {
      entries.push(PathnameEntry { internal, external });
    }
    Ok(PathnameTable(entries))
  }
}

impl Serialize for PathnameTable {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.0.len()))?;
    for entry in &self.0 {
      map.serialize_entry(&entry.internal, &entry.external)?;
    }
    map.end()
  }
}
