use tracing::{debug, info};

use crate::config::{AuditConfig, CategoryConfig};
use crate::docs::DocSummary;
use crate::error::ReconError;
use crate::integrity::{check_counts, DuplicateListing, IntegrityCounts};
use crate::model::{AuditReport, CategoryReport, EngineGroup, Identifier};
use crate::overload::filter_overloads;
use crate::reconcile::reconcile;
use crate::rules::{compile_all, extract};
use crate::sources::{file_name, join, select_helper_files, SourceLoader};

/// Raw text of one source unit.
struct SourceText {
    name: String,
    text: String,
}

/// Run the audit per config. Every input is read before any extraction.
pub fn run(config: &AuditConfig, loader: &dyn SourceLoader) -> Result<AuditReport, ReconError> {
    info!("Loading {}", file_name(&config.docs));
    let docs = DocSummary::from_json(&loader.read(&config.docs)?, config.docs.as_str())?;

    info!("Loading {}", file_name(&config.primary));
    let primary = SourceText {
        name: file_name(&config.primary),
        text: loader.read(&config.primary)?,
    };

    let helpers = load_helpers(config, loader)?;
    if config.helpers.is_some() {
        info!("Loaded {} helper file(s)", helpers.len());
    }

    let mut categories = Vec::with_capacity(config.categories.len());
    for category in &config.categories {
        let report = run_category(category, &primary, &helpers, &docs)?;
        info!(
            category = %report.name,
            engine = report.summary.defined_only.len() + report.summary.defined_and_documented.len(),
            documented = report.doc_count(),
            "Reconciled {}",
            report.name
        );
        categories.push(report);
    }

    Ok(finish(
        &config.name,
        categories,
        helpers.into_iter().map(|h| h.name).collect(),
    ))
}

fn load_helpers(
    config: &AuditConfig,
    loader: &dyn SourceLoader,
) -> Result<Vec<SourceText>, ReconError> {
    let Some(ref helpers) = config.helpers else {
        return Ok(Vec::new());
    };

    let all = loader.list(&helpers.dir)?;
    let selected = select_helper_files(&all, &helpers.extension, &helpers.exclude);
    debug!(
        dir = %helpers.dir,
        listed = all.len(),
        selected = selected.len(),
        "helper directory scanned"
    );

    selected
        .into_iter()
        .map(|name| {
            info!("Loading {name}");
            let text = loader.read(&join(&helpers.dir, &name))?;
            Ok(SourceText { name, text })
        })
        .collect()
}

fn run_category(
    category: &CategoryConfig,
    primary: &SourceText,
    helpers: &[SourceText],
    docs: &DocSummary,
) -> Result<CategoryReport, ReconError> {
    let primary_rules = compile_all(&category.primary_rules)?;
    let primary_group = EngineGroup::new(primary.name.as_str(), extract(&primary.text, &primary_rules));

    let mut helper_groups = Vec::new();
    if !category.helper_rules.is_empty() {
        let helper_rules = compile_all(&category.helper_rules)?;
        for helper in helpers {
            helper_groups.push(EngineGroup::new(
                helper.name.as_str(),
                extract(&helper.text, &helper_rules),
            ));
        }
    }

    let doc_names = docs.names(category.doc_list())?;
    Ok(audit_category(category, primary_group, helper_groups, doc_names))
}

/// Overload-filter the helper groups against the primary group, then reconcile.
pub fn assemble_groups(primary: EngineGroup, helpers: Vec<EngineGroup>) -> Vec<EngineGroup> {
    let mut groups = Vec::with_capacity(helpers.len() + 1);
    for helper in helpers {
        let kept = filter_overloads(&helper.identifiers, &primary.identifiers);
        if kept.len() != helper.len() {
            debug!(
                source = %helper.source,
                overloads = helper.len() - kept.len(),
                "dropped helper redefinitions of engine names"
            );
        }
        groups.push(EngineGroup::new(helper.source, kept));
    }
    groups.insert(0, primary);
    groups
}

pub fn audit_category(
    category: &CategoryConfig,
    primary: EngineGroup,
    helpers: Vec<EngineGroup>,
    doc_names: Vec<Identifier>,
) -> CategoryReport {
    let groups = assemble_groups(primary, helpers);
    let summary = reconcile(&groups, &doc_names);
    CategoryReport {
        name: category.name.clone(),
        suffix: category.suffix.clone(),
        fail_on_undocumented: category.fail_on_undocumented,
        groups,
        doc_names,
        summary,
    }
}

/// Combine category reports and run the integrity check over their summed counts.
pub fn finish(name: &str, categories: Vec<CategoryReport>, helper_files: Vec<String>) -> AuditReport {
    let integrity: IntegrityCounts = categories
        .iter()
        .map(|c| IntegrityCounts::from_summary(&c.summary, c.doc_count()))
        .sum();

    let fault = check_counts(integrity)
        .err()
        .map(|fault| fault.with_listings(duplicate_listings(&categories)));

    AuditReport {
        name: name.to_string(),
        categories,
        integrity,
        fault,
        helper_files,
    }
}

/// Duplicate scans over every input list, for the integrity diagnostic.
pub fn duplicate_listings(categories: &[CategoryReport]) -> Vec<DuplicateListing> {
    let mut listings = Vec::new();
    for category in categories {
        listings.push(DuplicateListing::scan(
            format!("documented {}", category.name),
            &category.doc_names,
        ));
        if let Some(primary) = category.groups.first() {
            listings.push(DuplicateListing::scan(
                format!("{} {}", primary.source, category.name),
                &primary.identifiers,
            ));
        }
        if category.groups.len() > 1 {
            let helper: Vec<Identifier> = category.groups[1..]
                .iter()
                .flat_map(|g| g.identifiers.iter().cloned())
                .collect();
            listings.push(DuplicateListing::scan(
                format!("helper file {}", category.name),
                &helper,
            ));
        }
    }
    listings
}
