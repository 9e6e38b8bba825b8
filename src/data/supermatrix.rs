// supermatrix.rs - Concatenated multi-gene alignment keyed by taxon

use crate::error::{ConcatError, ConcatResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Range;

/// Gap character used for padding and absent taxa
pub const GAP: char = '-';
/// Unknown-residue character
pub const UNKNOWN: char = '?';

/// True for the gap and unknown placeholders
#[inline]
pub fn is_missing(c: u8) -> bool {
    c == GAP as u8 || c == UNKNOWN as u8
}

/// Taxon → concatenated sequence.
///
/// All rows have the same length once built by the concatenation engine.
/// The owner may rename or remove rows afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Supermatrix {
    rows: BTreeMap<String, String>,
}

impl Supermatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, taxon: impl Into<String>, sequence: impl Into<String>) {
        self.rows.insert(taxon.into(), sequence.into());
    }

    pub fn get(&self, taxon: &str) -> Option<&str> {
        self.rows.get(taxon).map(String::as_str)
    }

    pub fn contains(&self, taxon: &str) -> bool {
        self.rows.contains_key(taxon)
    }

    /// Slice of one taxon's row, `None` if the taxon or range is absent
    pub fn segment(&self, taxon: &str, span: Range<usize>) -> Option<&[u8]> {
        self.rows.get(taxon)?.as_bytes().get(span)
    }

    /// Move a row to a new name without touching its sequence.
    pub fn rename_taxon(&mut self, old: &str, new: &str) -> ConcatResult<()> {
        let new = new.trim();
        if new.is_empty() {
            return Err(ConcatError::EmptyTaxonName);
        }
        if !self.rows.contains_key(old) {
            return Err(ConcatError::TaxonNotFound(old.to_string()));
        }
        if new == old {
            return Ok(());
        }
        if self.rows.contains_key(new) {
            return Err(ConcatError::DuplicateTaxon(new.to_string()));
        }
        if let Some(seq) = self.rows.remove(old) {
            self.rows.insert(new.to_string(), seq);
        }
        Ok(())
    }

    pub fn remove_taxon(&mut self, taxon: &str) -> ConcatResult<String> {
        self.rows
            .remove(taxon)
            .ok_or_else(|| ConcatError::TaxonNotFound(taxon.to_string()))
    }

    /// Keep only rows whose taxon matches the predicate; returns removed names
    pub fn retain_taxa<F>(&mut self, mut keep: F) -> Vec<String>
    where
        F: FnMut(&str) -> bool,
    {
        let removed: Vec<String> = self
            .rows
            .keys()
            .filter(|taxon| !keep(taxon))
            .cloned()
            .collect();
        for taxon in &removed {
            self.rows.remove(taxon);
        }
        removed
    }

    pub fn taxa(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Length of the first row (all rows agree after construction)
    pub fn alignment_length(&self) -> usize {
        self.rows.values().next().map(|s| s.len()).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
