use std::collections::HashSet;

use crate::model::{EngineEntity, EngineGroup, Identifier, ReconSummary};

/// Partition engine groups and a documentation list into three buckets.
///
/// Engine identifiers are visited group by group, each in extraction order,
/// and land in `defined_only` or `defined_and_documented` once per occurrence.
/// Documented names missing from every group land in `documented_only`, in
/// documentation order.
pub fn reconcile(groups: &[EngineGroup], doc_names: &[Identifier]) -> ReconSummary {
    let documented: HashSet<&str> = doc_names.iter().map(String::as_str).collect();
    let defined: HashSet<&str> = groups
        .iter()
        .flat_map(|g| g.identifiers.iter().map(String::as_str))
        .collect();

    let mut summary = ReconSummary::default();

    for group in groups {
        for name in &group.identifiers {
            let entity = EngineEntity {
                name: name.clone(),
                source: group.source.clone(),
            };
            if documented.contains(name.as_str()) {
                summary.defined_and_documented.push(entity);
            } else {
                summary.defined_only.push(entity);
            }
        }
    }

    summary.documented_only = doc_names
        .iter()
        .filter(|name| !defined.contains(name.as_str()))
        .cloned()
        .collect();

    summary
}
