//! Integrity-failure diagnostic.
//!
//! Lays out the engine and documentation sets as two overlapping spans so
//! the two derivations of the intersection sit side by side:
//!
//! ```text
//! +-------------------+-------------------+-------------------+
//! |   defined only    |   intersection    |  documented only  |
//! |         2         |      3 or 4       |         1         |
//! +-------------------+-------------------+-------------------+
//! └───────────── Engine: 5 ───────────────┘
//!                     └────────────── Docs: 5 ────────────────┘
//! ```

use scriptdoc_recon::integrity::{DuplicateListing, IntegrityCounts};
use scriptdoc_recon::IntegrityFault;

use crate::report::{paint, Tone};

const CELL: usize = 19;

pub fn render_fault(fault: &IntegrityFault, color: bool) -> String {
    let counts = &fault.counts;
    let mut output = String::new();

    output.push_str(&paint(&format!("ERROR: {fault}"), Tone::Bad, color));
    output.push('\n');
    output.push_str(&format!(
        "There are {} entities in the engine, {} of them only in the engine, so the intersection is {}.\n",
        counts.engine_total,
        counts.engine_only,
        counts.engine_intersection()
    ));
    output.push_str(&format!(
        "There are {} entities in the docs, {} of them only in the docs, so the intersection is {}.\n",
        counts.docs_total,
        counts.docs_only,
        counts.docs_intersection()
    ));
    output.push_str("Some entries appear twice.\n\n");

    output.push_str(&render_diagram(counts));
    output.push('\n');

    for listing in &fault.listings {
        output.push_str(&render_listing(listing));
    }
    output
}

pub fn render_diagram(counts: &IntegrityCounts) -> String {
    let rule = format!("+{}+{}+{}+\n", "-".repeat(CELL), "-".repeat(CELL), "-".repeat(CELL));
    let intersection = format!(
        "{} or {}",
        counts.engine_intersection(),
        counts.docs_intersection()
    );
    let span_width = 2 * CELL + 3;

    let mut output = String::new();
    output.push_str(&rule);
    output.push_str(&row(["defined only", "intersection", "documented only"]));
    let engine_only = counts.engine_only.to_string();
    let docs_only = counts.docs_only.to_string();
    output.push_str(&row([engine_only.as_str(), intersection.as_str(), docs_only.as_str()]));
    output.push_str(&rule);
    output.push_str(&span(&format!("Engine: {}", counts.engine_total), span_width));
    output.push('\n');
    output.push_str(&" ".repeat(CELL + 1));
    output.push_str(&span(&format!("Docs: {}", counts.docs_total), span_width));
    output.push('\n');
    output
}

fn row(cells: [&str; 3]) -> String {
    let [a, b, c] = cells;
    format!("|{a:^w$}|{b:^w$}|{c:^w$}|\n", w = CELL)
}

/// `└── label ──┘`, `width` characters wide.
fn span(label: &str, width: usize) -> String {
    let label = format!(" {label} ");
    let dashes = width.saturating_sub(2 + label.chars().count());
    let left = dashes / 2;
    format!(
        "└{}{label}{}┘",
        "─".repeat(left),
        "─".repeat(dashes - left)
    )
}

fn render_listing(listing: &DuplicateListing) -> String {
    format!(
        "Duplicate {} (sum: {}): {}\n",
        listing.label,
        listing.total,
        listing.duplicates.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptdoc_recon::integrity::check_counts;

    fn counts() -> IntegrityCounts {
        IntegrityCounts {
            engine_total: 5,
            engine_only: 2,
            docs_total: 5,
            docs_only: 1,
        }
    }

    #[test]
    fn diagram_lines_align() {
        let diagram = render_diagram(&counts());
        let lines: Vec<&str> = diagram.lines().collect();
        assert_eq!(lines.len(), 6);
        let width = lines[0].chars().count();
        for line in &lines[..4] {
            assert_eq!(line.chars().count(), width);
        }
        assert_eq!(lines[4].chars().count(), 2 * CELL + 3);
        assert_eq!(lines[5].chars().count(), width);
        assert!(lines[2].contains("3 or 4"));
        assert!(lines[4].contains("Engine: 5"));
        assert!(lines[5].contains("Docs: 5"));
    }

    #[test]
    fn fault_lists_duplicates() {
        let fault = check_counts(counts()).unwrap_err().with_listings(vec![
            DuplicateListing::scan("documented functions", &["A".to_string(), "A".to_string()]),
            DuplicateListing::scan("C4Script.cpp functions", &["B".to_string()]),
        ]);
        let text = render_fault(&fault, false);
        assert!(text.starts_with("ERROR: the set of parsed entities is not distinct"));
        assert!(text.contains("so the intersection is 3."));
        assert!(text.contains("so the intersection is 4."));
        assert!(text.contains("Duplicate documented functions (sum: 2): A\n"));
        assert!(text.contains("Duplicate C4Script.cpp functions (sum: 1): \n"));
    }

    #[test]
    fn span_centers_label() {
        assert_eq!(span("x", 9), "└── x ──┘");
    }
}
