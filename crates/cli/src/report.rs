//! Output formatting for audit reports

use owo_colors::OwoColorize;
use serde::Serialize;

use scriptdoc_recon::config::AuditConfig;
use scriptdoc_recon::rules::RuleSpec;
use scriptdoc_recon::{AuditReport, Bucket, CategoryReport, Verdict};

use crate::diagram::render_fault;
use crate::exit_codes::verdict_exit_code;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Bad,
    Warn,
}

/// Color `text` for a summary line. Plain when `color` is off.
pub fn paint(text: &str, tone: Tone, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match tone {
        Tone::Good => text.black().on_green().to_string(),
        Tone::Bad => text.black().on_red().to_string(),
        Tone::Warn => text.black().on_yellow().to_string(),
    }
}

// ============================================================================
// Text
// ============================================================================

pub fn render_text(report: &AuditReport, color: bool) -> String {
    let mut output = String::new();

    for category in &report.categories {
        render_listings(&mut output, &report.name, category);
    }

    output.push('\n');
    for category in &report.categories {
        let undocumented = category.summary.count(Bucket::DefinedOnly);
        let tone = if undocumented == 0 { Tone::Good } else { Tone::Bad };
        let line = format!("{undocumented} {} are undocumented.", category.name);
        output.push_str(&format!(" * {}\n", paint(&line, tone, color)));
    }
    for category in &report.categories {
        let undefined = category.summary.count(Bucket::DocumentedOnly);
        let tone = if undefined == 0 { Tone::Good } else { Tone::Warn };
        let line = format!(
            "{undefined} {} are documented but undefined in the engine.",
            category.name
        );
        output.push_str(&format!(" * {}\n", paint(&line, tone, color)));
    }
    let both: Vec<String> = report
        .categories
        .iter()
        .map(|c| format!("{} {}", c.summary.count(Bucket::DefinedAndDocumented), c.name))
        .collect();
    output.push_str(&format!(
        " * {} are defined and documented.\n",
        join_and(&both)
    ));

    render_statistics(&mut output, report);

    match report.fault {
        Some(ref fault) => output.push_str(&render_fault(fault, color)),
        None => output.push_str("All entities processed.\n"),
    }

    output
}

fn render_listings(output: &mut String, name: &str, category: &CategoryReport) {
    let suffix = &category.suffix;

    output.push_str(&format!(
        "\nThe following {name} {} are defined in the engine but not documented:\n\n",
        category.name
    ));
    for entity in &category.summary.defined_only {
        output.push_str(&format!(
            "\tDefined in {}: {}{suffix}\n",
            entity.source, entity.name
        ));
    }

    output.push_str(&format!(
        "\nThe following {name} {} are documented but not defined in the engine:\n\n",
        category.name
    ));
    for doc in &category.summary.documented_only {
        output.push_str(&format!("\t{doc}{suffix}\n"));
    }
}

fn render_statistics(output: &mut String, report: &AuditReport) {
    let mut lines = Vec::new();
    for category in &report.categories {
        if let Some(primary) = category.groups.first() {
            lines.push(format!(
                "{} defined {} in {}",
                primary.len(),
                category.name,
                primary.source
            ));
        }
        if category.groups.len() > 1 {
            lines.push(format!(
                "{} defined {} in {} helper file(s)",
                category.helper_count(),
                category.name,
                category.groups.len() - 1
            ));
        }
    }
    for category in &report.categories {
        lines.push(format!("{} documented {}", category.doc_count(), category.name));
    }

    output.push_str("\nStatistics: There are\n");
    for line in lines {
        output.push_str(&format!(" * {line}\n"));
    }
    output.push('\n');
}

/// "a", "a and b", "a, b and c"
fn join_and(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

// ============================================================================
// JSON
// ============================================================================

#[derive(Serialize)]
struct JsonReport<'a> {
    tool_version: &'static str,
    verdict: Verdict,
    exit_code: u8,
    #[serde(flatten)]
    report: &'a AuditReport,
}

pub fn render_json(report: &AuditReport) -> Result<String, serde_json::Error> {
    let verdict = report.verdict();
    serde_json::to_string_pretty(&JsonReport {
        tool_version: env!("CARGO_PKG_VERSION"),
        verdict,
        exit_code: verdict_exit_code(verdict),
        report,
    })
}

// ============================================================================
// Rules listing
// ============================================================================

pub fn render_rules(config: &AuditConfig) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", config.name));
    output.push_str(&format!("  docs:    {}\n", config.docs));
    output.push_str(&format!("  primary: {}\n", config.primary));
    if let Some(ref helpers) = config.helpers {
        output.push_str(&format!("  helpers: {}/*.{}", helpers.dir, helpers.extension));
        if !helpers.exclude.is_empty() {
            output.push_str(&format!(" (excluding {})", helpers.exclude.join(", ")));
        }
        output.push('\n');
    }

    for category in &config.categories {
        output.push_str(&format!(
            "\n[{}] doc list '{}', undocumented {}\n",
            category.name,
            category.doc_list(),
            if category.fail_on_undocumented { "fails the run" } else { "is reported only" }
        ));
        for (i, rule) in category.primary_rules.iter().enumerate() {
            output.push_str(&format!("  primary #{}: {}\n", i + 1, describe_rule(rule)));
        }
        for (i, rule) in category.helper_rules.iter().enumerate() {
            output.push_str(&format!("  helper  #{}: {}\n", i + 1, describe_rule(rule)));
        }
    }
    output
}

fn describe_rule(rule: &RuleSpec) -> String {
    let mut text = format!("{}  [capture {}]", rule.pattern, rule.capture);
    for p in &rule.exclude_preceded_by {
        text.push_str(&format!("\n               not preceded by {p}"));
    }
    text
}
