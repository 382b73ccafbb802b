//! Case-insensitive header mapping with right-biased merge.

use std::collections::BTreeMap;

/// Header name/value pairs keyed by case-folded name.
///
/// The name is remembered in the casing it was last inserted with and handed
/// to the transport that way; `UreqTransport` sends names lowercased, which
/// HTTP treats as equivalent. Iteration order is by folded name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: BTreeMap<String, (String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing any existing entry with the same name in
    /// any casing. Returns the replaced value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        self.entries
            .insert(name.to_ascii_lowercase(), (name, value.into()))
            .map(|(_, old)| old)
    }

    /// Builder-style `insert`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries
            .remove(&name.to_ascii_lowercase())
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, value)` pairs in their inserted casing.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.values().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Merge `overrides` over `self`. On a name collision the entry from
    /// `overrides` wins, casing included.
    pub fn merged(&self, overrides: &Headers) -> Headers {
        let mut out = self.clone();
        for (key, entry) in &overrides.entries {
            out.entries.insert(key.clone(), entry.clone());
        }
        out
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }
}

impl<N, V> FromIterator<(N, V)> for Headers
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl<N, V, const K: usize> From<[(N, V); K]> for Headers
where
    N: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(N, V); K]) -> Self {
        pairs.into_iter().collect()
    }
}
