//! Scope identity model and result collection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A resolved scope: one node of the scope tree.
///
/// Both fields come straight from the identity record (`id` is the row id,
/// `name` the row value). Scopes are only handed out after a successful
/// fetch, so an instance always refers to a row that existed at query time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct Scope {
    pub id: i64,
    pub name: String,
}

impl Scope {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// An ordered collection of scopes as returned by a query.
///
/// Order is whatever the producing query established: explicit ordering
/// criteria when given, otherwise backend row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scopes {
    scopes: Vec<Scope>,
}

impl Scopes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scope> {
        self.scopes.iter()
    }

    pub fn first(&self) -> Option<&Scope> {
        self.scopes.first()
    }

    pub fn get(&self, index: usize) -> Option<&Scope> {
        self.scopes.get(index)
    }

    /// Scope ids in collection order.
    pub fn ids(&self) -> Vec<i64> {
        self.scopes.iter().map(|s| s.id).collect()
    }

    /// Scope ids as a set, for membership tests and narrowing.
    pub fn id_set(&self) -> HashSet<i64> {
        self.scopes.iter().map(|s| s.id).collect()
    }

    /// Scope names in collection order.
    pub fn names(&self) -> Vec<&str> {
        self.scopes.iter().map(|s| s.name.as_str()).collect()
    }

    /// Keep only the scopes whose id appears in `keep`, preserving order.
    pub fn filter_by_ids(&self, keep: &HashSet<i64>) -> Scopes {
        self.scopes
            .iter()
            .filter(|s| keep.contains(&s.id))
            .cloned()
            .collect()
    }
}

impl From<Vec<Scope>> for Scopes {
    fn from(scopes: Vec<Scope>) -> Self {
        Self { scopes }
    }
}

impl FromIterator<Scope> for Scopes {
    fn from_iter<I: IntoIterator<Item = Scope>>(iter: I) -> Self {
        Self {
            scopes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Scopes {
    type Item = Scope;
    type IntoIter = std::vec::IntoIter<Scope>;

    fn into_iter(self) -> Self::IntoIter {
        self.scopes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Scopes {
    type Item = &'a Scope;
    type IntoIter = std::slice::Iter<'a, Scope>;

    fn into_iter(self) -> Self::IntoIter {
        self.scopes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Scopes {
        Scopes::from(vec![
            Scope::new(3, "gamma"),
            Scope::new(1, "alpha"),
            Scope::new(2, "beta"),
        ])
    }

    #[test]
    fn test_accessors_preserve_order() {
        let scopes = sample();
        assert_eq!(scopes.len(), 3);
        assert_eq!(scopes.ids(), vec![3, 1, 2]);
        assert_eq!(scopes.names(), vec!["gamma", "alpha", "beta"]);
        assert_eq!(scopes.first().map(|s| s.id), Some(3));
    }

    #[test]
    fn test_filter_by_ids_keeps_order() {
        let scopes = sample();
        let keep: HashSet<i64> = [2, 3].into_iter().collect();
        let filtered = scopes.filter_by_ids(&keep);
        assert_eq!(filtered.ids(), vec![3, 2]);
    }

    #[test]
    fn test_filter_by_empty_set_is_empty() {
        let scopes = sample();
        let filtered = scopes.filter_by_ids(&HashSet::new());
        assert!(filtered.is_empty());
    }
}
