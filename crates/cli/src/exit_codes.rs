//! CLI Exit Code Registry
//!
//! This is the single source of truth for all `scriptdoc` exit codes.
//! CI workflows gate on them, so they are part of the shell contract.
//!
//! | Code | Meaning                                                    |
//! |------|------------------------------------------------------------|
//! | 0    | Clean: nothing undocumented that fails the run             |
//! | 1    | Undocumented entities in a failing-policy category         |
//! | 2    | Integrity fault (takes precedence over 1)                  |
//! | 3    | An input is missing or malformed                           |
//! | 4    | Configuration invalid                                      |
//! | 5    | Report could not be serialized                             |
//! | 64   | Bad command-line usage                                     |
//!
//! Code 2 is deliberately not clap's usage code: `main` parses with
//! `try_parse` and remaps usage errors to [`EXIT_USAGE`].

use scriptdoc_recon::{ReconError, Verdict};

// =============================================================================
// Audit outcomes (0-2)
// =============================================================================

/// Success - every failing-policy category is fully documented.
pub const EXIT_SUCCESS: u8 = 0;

/// At least one entity of a failing-policy category is undocumented.
pub const EXIT_UNDOCUMENTED: u8 = 1;

/// Engine-side and documentation-side intersection counts disagree.
pub const EXIT_INTEGRITY: u8 = 2;

// =============================================================================
// Errors (3+)
// =============================================================================

/// An input file or directory could not be read, or the doc summary is malformed.
pub const EXIT_READ: u8 = 3;

/// Configuration file could not be parsed or failed validation.
pub const EXIT_CONFIG: u8 = 4;

/// The report could not be serialized for output.
pub const EXIT_OUTPUT: u8 = 5;

/// Usage error - bad arguments (EX_USAGE from sysexits.h).
pub const EXIT_USAGE: u8 = 64;

pub fn verdict_exit_code(verdict: Verdict) -> u8 {
    match verdict {
        Verdict::Clean => EXIT_SUCCESS,
        Verdict::Undocumented => EXIT_UNDOCUMENTED,
        Verdict::IntegrityFault => EXIT_INTEGRITY,
    }
}

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    if err.is_read_error() {
        EXIT_READ
    } else {
        EXIT_CONFIG
    }
}
