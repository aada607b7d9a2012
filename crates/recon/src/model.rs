use serde::Serialize;

use crate::integrity::{IntegrityCounts, IntegrityFault};

/// A bare, case-sensitive name captured by an extraction rule.
pub type Identifier = String;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Identifiers extracted from one source unit, in extraction order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineGroup {
    /// File name of the source unit. Only used for reporting.
    pub source: String,
    pub identifiers: Vec<Identifier>,
}

impl EngineGroup {
    pub fn new(source: impl Into<String>, identifiers: Vec<Identifier>) -> Self {
        Self {
            source: source.into(),
            identifiers,
        }
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    DefinedOnly,
    DefinedAndDocumented,
    DocumentedOnly,
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DefinedOnly => write!(f, "defined_only"),
            Self::DefinedAndDocumented => write!(f, "defined_and_documented"),
            Self::DocumentedOnly => write!(f, "documented_only"),
        }
    }
}

/// An engine-side identifier together with the source unit it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineEntity {
    pub name: Identifier,
    pub source: String,
}

/// Three-way partition of one category.
///
/// `defined_only` and `defined_and_documented` hold one entry per engine-side
/// occurrence (duplicates are kept so the integrity check can see them).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub defined_only: Vec<EngineEntity>,
    pub defined_and_documented: Vec<EngineEntity>,
    pub documented_only: Vec<Identifier>,
}

impl ReconSummary {
    pub fn count(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::DefinedOnly => self.defined_only.len(),
            Bucket::DefinedAndDocumented => self.defined_and_documented.len(),
            Bucket::DocumentedOnly => self.documented_only.len(),
        }
    }

    /// Names in `bucket`, in bucket order.
    pub fn names(&self, bucket: Bucket) -> Vec<&str> {
        match bucket {
            Bucket::DefinedOnly => self.defined_only.iter().map(|e| e.name.as_str()).collect(),
            Bucket::DefinedAndDocumented => self
                .defined_and_documented
                .iter()
                .map(|e| e.name.as_str())
                .collect(),
            Bucket::DocumentedOnly => self.documented_only.iter().map(String::as_str).collect(),
        }
    }

    /// Whether anything is defined in the engine but undocumented.
    pub fn has_gaps(&self) -> bool {
        !self.defined_only.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Audit output
// ---------------------------------------------------------------------------

/// Result of running one category through the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub name: String,
    pub suffix: String,
    pub fail_on_undocumented: bool,
    /// Primary group first, then one group per helper file (after overload filtering).
    pub groups: Vec<EngineGroup>,
    pub doc_names: Vec<Identifier>,
    pub summary: ReconSummary,
}

impl CategoryReport {
    pub fn primary_count(&self) -> usize {
        self.groups.first().map_or(0, EngineGroup::len)
    }

    pub fn helper_count(&self) -> usize {
        self.groups.iter().skip(1).map(EngineGroup::len).sum()
    }

    pub fn doc_count(&self) -> usize {
        self.doc_names.len()
    }

    /// Undocumented entities that fail the run under this category's policy.
    pub fn is_failing(&self) -> bool {
        self.fail_on_undocumented && self.summary.has_gaps()
    }
}

/// Final outcome of an audit, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Clean,
    Undocumented,
    IntegrityFault,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clean => write!(f, "clean"),
            Self::Undocumented => write!(f, "undocumented"),
            Self::IntegrityFault => write!(f, "integrity_fault"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub name: String,
    pub categories: Vec<CategoryReport>,
    /// Counts combined over every category.
    pub integrity: IntegrityCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<IntegrityFault>,
    pub helper_files: Vec<String>,
}

impl AuditReport {
    pub fn category(&self, name: &str) -> Option<&CategoryReport> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Integrity faults take precedence over documentation gaps.
    pub fn verdict(&self) -> Verdict {
        if self.fault.is_some() {
            Verdict::IntegrityFault
        } else if self.categories.iter().any(CategoryReport::is_failing) {
            Verdict::Undocumented
        } else {
            Verdict::Clean
        }
    }
}
