// Property-based tests for reconciliation and integrity logic.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use scriptdoc_recon::config::CategoryConfig;
use scriptdoc_recon::engine::{audit_category, finish};
use scriptdoc_recon::integrity::{check_integrity, find_duplicates};
use scriptdoc_recon::model::{Bucket, EngineGroup, Identifier, Verdict};
use scriptdoc_recon::overload::filter_overloads;
use scriptdoc_recon::reconcile::reconcile;
use scriptdoc_recon::rules::RuleSpec;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Names from a small alphabet so lists collide often.
fn arb_names(max: usize) -> impl Strategy<Value = Vec<Identifier>> {
    prop::collection::vec(
        prop::sample::select(vec!["Foo", "Bar", "Baz", "Log", "Sin", "Cos"]).prop_map(String::from),
        0..max,
    )
}

fn arb_groups() -> impl Strategy<Value = Vec<EngineGroup>> {
    prop::collection::vec(arb_names(6), 1..4).prop_map(|lists| {
        lists
            .into_iter()
            .enumerate()
            .map(|(i, ids)| EngineGroup::new(format!("file{i}.c"), ids))
            .collect()
    })
}

/// Distinct names, split into disjoint engine groups and a docs list that
/// shares some of them.
fn arb_distinct() -> impl Strategy<Value = (Vec<EngineGroup>, Vec<Identifier>)> {
    (
        prop::collection::hash_set("[A-Z][a-z]{1,6}", 0..12),
        prop::collection::vec(0usize..3, 12),
        prop::collection::vec(any::<bool>(), 12),
    )
        .prop_map(|(names, owner, documented)| {
            let mut groups: Vec<EngineGroup> =
                (0..3).map(|i| EngineGroup::new(format!("file{i}.c"), Vec::new())).collect();
            let mut docs = Vec::new();
            for (i, name) in names.into_iter().enumerate() {
                // Slot 0 acts as "docs only", the rest as engine owners.
                match (owner[i], documented[i]) {
                    (0, _) => docs.push(name),
                    (g, true) => {
                        groups[g].identifiers.push(name.clone());
                        docs.push(name);
                    }
                    (g, false) => groups[g].identifiers.push(name),
                }
            }
            (groups, docs)
        })
}

fn multiplicity(items: impl IntoIterator<Item = Identifier>) -> HashMap<Identifier, usize> {
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

fn category(name: &str, fail: bool) -> CategoryConfig {
    CategoryConfig {
        name: name.into(),
        doc_list: None,
        suffix: String::new(),
        fail_on_undocumented: fail,
        primary_rules: vec![RuleSpec::new(r"(\w+)", 1)],
        helper_rules: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    /// Every engine occurrence lands in exactly one engine-side bucket.
    #[test]
    fn engine_occurrences_partition(groups in arb_groups(), docs in arb_names(8)) {
        let summary = reconcile(&groups, &docs);
        let total: usize = groups.iter().map(EngineGroup::len).sum();
        prop_assert_eq!(
            summary.count(Bucket::DefinedOnly) + summary.count(Bucket::DefinedAndDocumented),
            total
        );

        let documented: HashSet<&str> = docs.iter().map(String::as_str).collect();
        for e in &summary.defined_only {
            prop_assert!(!documented.contains(e.name.as_str()));
        }
        for e in &summary.defined_and_documented {
            prop_assert!(documented.contains(e.name.as_str()));
        }
    }

    /// Documented names absent from the engine are exactly `documented_only`.
    #[test]
    fn documented_only_is_complement(groups in arb_groups(), docs in arb_names(8)) {
        let summary = reconcile(&groups, &docs);
        let defined: HashSet<&str> = groups
            .iter()
            .flat_map(|g| g.identifiers.iter().map(String::as_str))
            .collect();

        let expected: Vec<&str> = docs
            .iter()
            .map(String::as_str)
            .filter(|n| !defined.contains(n))
            .collect();
        prop_assert_eq!(summary.names(Bucket::DocumentedOnly), expected);

        let only: HashSet<&str> = summary.names(Bucket::DocumentedOnly).into_iter().collect();
        for name in summary.names(Bucket::DefinedAndDocumented) {
            prop_assert!(!only.contains(name));
        }
    }
}

// ---------------------------------------------------------------------------
// Overload filter
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn filtering_is_idempotent(candidates in arb_names(10), known in arb_names(6)) {
        let once = filter_overloads(&candidates, &known);
        let twice = filter_overloads(&once, &known);
        prop_assert_eq!(&once, &twice);
        for name in &once {
            prop_assert!(!known.contains(name));
        }
    }
}

// ---------------------------------------------------------------------------
// Integrity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    /// Distinct inputs always pass the count check.
    #[test]
    fn distinct_inputs_are_consistent((groups, docs) in arb_distinct()) {
        let summary = reconcile(&groups, &docs);
        prop_assert!(check_integrity(&summary, docs.len()).is_ok());
    }

    /// A documented name defined in a second file always faults.
    #[test]
    fn documented_cross_file_duplicate_faults((mut groups, mut docs) in arb_distinct()) {
        let name = "Duplicated".to_string();
        groups[0].identifiers.push(name.clone());
        groups[1].identifiers.push(name.clone());
        docs.push(name);
        let summary = reconcile(&groups, &docs);
        prop_assert!(check_integrity(&summary, docs.len()).is_err());
    }

    /// A repeated documentation entry for a defined name always faults.
    #[test]
    fn documented_repeat_in_docs_faults((mut groups, mut docs) in arb_distinct()) {
        let name = "Repeated".to_string();
        groups[2].identifiers.push(name.clone());
        docs.push(name.clone());
        docs.push(name);
        let summary = reconcile(&groups, &docs);
        prop_assert!(check_integrity(&summary, docs.len()).is_err());
    }

    /// The check passes iff shared names have equal total multiplicity on both sides.
    #[test]
    fn count_check_matches_multiplicities(groups in arb_groups(), docs in arb_names(8)) {
        let engine = multiplicity(groups.iter().flat_map(|g| g.identifiers.iter().cloned()));
        let documented = multiplicity(docs.iter().cloned());

        let (mut from_engine, mut from_docs) = (0usize, 0usize);
        for (name, e) in &engine {
            if let Some(d) = documented.get(name) {
                from_engine += e;
                from_docs += d;
            }
        }

        let summary = reconcile(&groups, &docs);
        prop_assert_eq!(check_integrity(&summary, docs.len()).is_ok(), from_engine == from_docs);
    }

    #[test]
    fn duplicates_count_later_occurrences(items in arb_names(12)) {
        let distinct: HashSet<&String> = items.iter().collect();
        prop_assert_eq!(find_duplicates(&items).len(), items.len() - distinct.len());
    }
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    /// Clean iff no function is undocumented and integrity holds; faults win.
    #[test]
    fn verdict_precedence(
        fn_groups in arb_groups(),
        fn_docs in arb_names(8),
        consts in arb_names(6),
        const_docs in arb_names(6),
    ) {
        let mut fn_groups = fn_groups.into_iter();
        let primary = fn_groups.next().unwrap_or_else(|| EngineGroup::new("C4Script.cpp", Vec::new()));
        let functions = audit_category(&category("functions", true), primary, fn_groups.collect(), fn_docs);
        let constants = audit_category(
            &category("constants", false),
            EngineGroup::new("C4Script.cpp", consts),
            Vec::new(),
            const_docs,
        );

        let undocumented = functions.summary.has_gaps();
        let report = finish("C4Script", vec![functions, constants], Vec::new());
        let consistent = report.integrity.is_consistent();

        let expected = if !consistent {
            Verdict::IntegrityFault
        } else if undocumented {
            Verdict::Undocumented
        } else {
            Verdict::Clean
        };
        prop_assert_eq!(report.verdict(), expected);
        prop_assert_eq!(report.fault.is_some(), !consistent);
    }
}
