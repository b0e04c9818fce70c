//! Domain identifier tables.
//!
//! A domain table maps localized identifiers (struct names, fields,
//! functions, enum variants) to their canonical English names, e.g.
//! "\u{9a7e}\u{9a76}\u{5458}" -> "Driver". The canonicalizer substitutes
//! them as whole words so mixed-locale sources parse against one vocabulary.

use rustc_hash::FxHashMap;

/// Localized identifier -> canonical English name.
#[derive(Debug, Clone, Default)]
pub struct DomainTable {
    entries: FxHashMap<String, String>,
    /// Keys sorted longest-first so overlapping identifiers substitute
    /// greedily.
    ordered: Vec<String>,
}

impl DomainTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, localized: impl Into<String>, canonical: impl Into<String>) {
        let key = localized.into();
        if !self.entries.contains_key(&key) {
            self.ordered.push(key.clone());
            self.ordered.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
        }
        self.entries.insert(key, canonical.into());
    }

    pub fn get(&self, localized: &str) -> Option<&str> {
        self.entries.get(localized).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in substitution order (longest first).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(|s| s.as_str())
    }
}

impl FromIterator<(String, String)> for DomainTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut table = DomainTable::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}
