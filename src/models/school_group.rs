//! School groups (routes) and the adjacency they induce.
//!
//! A school group lists schools that one instructor can reasonably serve
//! on the same day. Two schools are adjacent when they share at least one
//! group. Adjacency is symmetric but deliberately not transitive: A~B and
//! B~C do not make A~C unless some group contains both.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::normalize::normalize_label;

/// A named route of schools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolGroup {
    /// Route name.
    pub name: String,
    /// Member schools (normalized).
    pub schools: BTreeSet<String>,
}

/// Symmetric adjacency lookup derived from school groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolAdjacency {
    neighbors: BTreeMap<String, BTreeSet<String>>,
}

impl SchoolGroup {
    /// Creates an empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schools: BTreeSet::new(),
        }
    }

    /// Adds a member school.
    pub fn with_school(mut self, school: &str) -> Self {
        self.schools.insert(normalize_label(school));
        self
    }
}

impl SchoolAdjacency {
    /// Builds the adjacency relation from a list of groups.
    pub fn from_groups(groups: &[SchoolGroup]) -> Self {
        let mut neighbors: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for group in groups {
            for school in &group.schools {
                let entry = neighbors.entry(school.clone()).or_default();
                entry.extend(group.schools.iter().filter(|s| *s != school).cloned());
            }
        }
        Self { neighbors }
    }

    /// Whether two schools share a group. A school is related to itself.
    pub fn related(&self, a: &str, b: &str) -> bool {
        a == b
            || self
                .neighbors
                .get(a)
                .is_some_and(|n| n.contains(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_adjacency() -> SchoolAdjacency {
        SchoolAdjacency::from_groups(&[
            SchoolGroup::new("Rota 1").with_school("A").with_school("B"),
            SchoolGroup::new("Rota 2").with_school("B").with_school("C"),
        ])
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let adj = sample_adjacency();
        assert!(adj.related("A", "B"));
        assert!(adj.related("B", "A"));
        assert!(adj.related("C", "B"));
    }

    #[test]
    fn test_adjacency_is_not_transitive() {
        let adj = sample_adjacency();
        assert!(!adj.related("A", "C"));
        assert!(!adj.related("A", "D"));
        assert!(adj.related("D", "D"));
    }
}
