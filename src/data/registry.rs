// registry.rs - Sorted union of taxon identifiers across parsed genes

use crate::data::gene::TaxonSequenceMap;
use serde::Serialize;
use std::collections::BTreeSet;

/// Every taxon seen in at least one parsed gene, in sorted order.
///
/// Drives row order for concatenation and display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaxonRegistry {
    taxa: BTreeSet<String>,
}

impl TaxonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union the taxon keys of all gene maps
    pub fn from_maps<'a, I>(maps: I) -> Self
    where
        I: IntoIterator<Item = &'a TaxonSequenceMap>,
    {
        let mut registry = Self::new();
        for map in maps {
            for taxon in map.keys() {
                registry.insert(taxon);
            }
        }
        registry
    }

    pub fn insert(&mut self, taxon: &str) -> bool {
        self.taxa.insert(taxon.to_string())
    }

    pub fn remove(&mut self, taxon: &str) -> bool {
        self.taxa.remove(taxon)
    }

    pub fn contains(&self, taxon: &str) -> bool {
        self.taxa.contains(taxon)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.taxa.iter().map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.taxa.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.taxa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taxa.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.taxa.iter().cloned().collect()
    }
}
