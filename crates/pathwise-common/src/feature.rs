//! Case-insensitive feature identifiers and the sets built from them.
//!
//! Every identifier is stored upper-cased and trimmed, so "tp53" from a
//! pathway catalog and "TP53" from a spreadsheet column compare equal.

use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Borrow;
use std::collections::hash_set;
use std::collections::HashSet;
use std::fmt;

use crate::error::PathwiseError;

/// A normalized (upper-cased) feature identifier, e.g. a gene symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct FeatureId(String);

impl FeatureId {
    /// Normalize a raw token. Returns None for blank tokens.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for FeatureId {
    type Error = PathwiseError;

    fn try_from(raw: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| PathwiseError::invalid("blank feature identifier"))
    }
}

impl From<FeatureId> for String {
    fn from(id: FeatureId) -> Self {
        id.0
    }
}

impl Borrow<str> for FeatureId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A deduplicated set of normalized feature identifiers. Deserializes from a
/// list of raw tokens through [`FeatureSet::from_raw`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureSet {
    ids: HashSet<FeatureId>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw identifiers, normalizing and deduplicating them.
    /// Blank identifiers are skipped.
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .filter_map(|id| FeatureId::parse(id.as_ref()))
            .collect()
    }

    pub fn insert(&mut self, id: FeatureId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: &FeatureId) -> bool {
        self.ids.contains(id)
    }

    /// Lookup by raw token; the token is normalized first.
    pub fn contains_raw(&self, raw: &str) -> bool {
        FeatureId::parse(raw).is_some_and(|id| self.ids.contains(&id))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, FeatureId> {
        self.ids.iter()
    }

    /// Size of `self ∩ other`. Iterates over the smaller of the two sets.
    pub fn intersection_count(&self, other: &FeatureSet) -> usize {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.ids.iter().filter(|id| large.ids.contains(*id)).count()
    }

    /// Elements of `self` that are also in `other`.
    pub fn intersection(&self, other: &FeatureSet) -> FeatureSet {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .ids
            .iter()
            .filter(|id| large.ids.contains(*id))
            .cloned()
            .collect()
    }

    /// Identifiers in ascending order, for deterministic output.
    pub fn sorted(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.ids.iter().map(FeatureId::as_str).collect();
        out.sort_unstable();
        out
    }
}

impl<'de> Deserialize<'de> for FeatureSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        Ok(Self::from_raw(raw))
    }
}

impl FromIterator<FeatureId> for FeatureSet {
    fn from_iter<T: IntoIterator<Item = FeatureId>>(iter: T) -> Self {
        Self { ids: iter.into_iter().collect() }
    }
}

impl Extend<FeatureId> for FeatureSet {
    fn extend<T: IntoIterator<Item = FeatureId>>(&mut self, iter: T) {
        self.ids.extend(iter);
    }
}

impl<'a> IntoIterator for &'a FeatureSet {
    type Item = &'a FeatureId;
    type IntoIter = hash_set::Iter<'a, FeatureId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}
