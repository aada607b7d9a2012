//! `scriptdoc-recon`: documentation coverage audit for script engines.
//!
//! Extracts identifiers from engine sources with configurable rules,
//! reconciles them against a documentation summary, and self-checks the
//! resulting counts. IO goes through [`sources::SourceLoader`].

pub mod config;
pub mod docs;
pub mod engine;
pub mod error;
pub mod integrity;
pub mod model;
pub mod overload;
pub mod reconcile;
pub mod rules;
pub mod sources;

pub use config::AuditConfig;
pub use engine::run;
pub use error::ReconError;
pub use integrity::{IntegrityCounts, IntegrityFault};
pub use model::{
    AuditReport, Bucket, CategoryReport, EngineGroup, Identifier, ReconSummary, Verdict,
};
pub use sources::{FsLoader, MemoryLoader, SourceLoader};
