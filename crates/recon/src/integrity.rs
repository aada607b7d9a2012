//! Self-consistency check over reconciliation counts.
//!
//! The engine/docs intersection can be derived twice: engine total minus
//! engine-only, and docs total minus docs-only. Whenever the two disagree,
//! some identifier was counted more than once on one side.

use std::collections::HashSet;
use std::ops::Add;

use serde::Serialize;
use thiserror::Error;

use crate::model::{Identifier, ReconSummary};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityCounts {
    pub engine_total: usize,
    pub engine_only: usize,
    pub docs_total: usize,
    pub docs_only: usize,
}

impl IntegrityCounts {
    pub fn from_summary(summary: &ReconSummary, total_doc_count: usize) -> Self {
        Self {
            engine_total: summary.defined_only.len() + summary.defined_and_documented.len(),
            engine_only: summary.defined_only.len(),
            docs_total: total_doc_count,
            docs_only: summary.documented_only.len(),
        }
    }

    /// Intersection size as seen from the engine side.
    pub fn engine_intersection(&self) -> i64 {
        self.engine_total as i64 - self.engine_only as i64
    }

    /// Intersection size as seen from the documentation side.
    pub fn docs_intersection(&self) -> i64 {
        self.docs_total as i64 - self.docs_only as i64
    }

    pub fn is_consistent(&self) -> bool {
        self.engine_intersection() == self.docs_intersection()
    }
}

impl Add for IntegrityCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            engine_total: self.engine_total + rhs.engine_total,
            engine_only: self.engine_only + rhs.engine_only,
            docs_total: self.docs_total + rhs.docs_total,
            docs_only: self.docs_only + rhs.docs_only,
        }
    }
}

impl std::iter::Sum for IntegrityCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Repeated values found in one input list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateListing {
    pub label: String,
    /// Length of the inspected list.
    pub total: usize,
    pub duplicates: Vec<Identifier>,
}

impl DuplicateListing {
    pub fn scan(label: impl Into<String>, items: &[Identifier]) -> Self {
        Self {
            label: label.into(),
            total: items.len(),
            duplicates: find_duplicates(items),
        }
    }
}

#[derive(Debug, Clone, Error, Serialize)]
#[error(
    "the set of parsed entities is not distinct: engine-side intersection is {}, documentation-side intersection is {}",
    .counts.engine_intersection(),
    .counts.docs_intersection()
)]
pub struct IntegrityFault {
    pub counts: IntegrityCounts,
    pub listings: Vec<DuplicateListing>,
}

impl IntegrityFault {
    pub fn with_listings(mut self, listings: Vec<DuplicateListing>) -> Self {
        self.listings = listings;
        self
    }
}

/// Every element whose first occurrence lies earlier in the list.
///
/// A value occurring `n` times is reported `n - 1` times, in list order.
pub fn find_duplicates(items: &[Identifier]) -> Vec<Identifier> {
    let mut seen: HashSet<&str> = HashSet::new();
    items
        .iter()
        .filter(|item| !seen.insert(item.as_str()))
        .cloned()
        .collect()
}

pub fn check_counts(counts: IntegrityCounts) -> Result<(), IntegrityFault> {
    if counts.is_consistent() {
        Ok(())
    } else {
        Err(IntegrityFault {
            counts,
            listings: Vec::new(),
        })
    }
}

pub fn check_integrity(summary: &ReconSummary, total_doc_count: usize) -> Result<(), IntegrityFault> {
    check_counts(IntegrityCounts::from_summary(summary, total_doc_count))
}
