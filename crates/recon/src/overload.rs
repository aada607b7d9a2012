use std::collections::HashSet;

use crate::model::Identifier;

/// Drop helper-file declarations that redefine a name the primary source already defines.
///
/// Order and multiplicity of the survivors are kept; this is a membership
/// filter, not a dedup.
pub fn filter_overloads(candidates: &[Identifier], known: &[Identifier]) -> Vec<Identifier> {
    let known: HashSet<&str> = known.iter().map(String::as_str).collect();
    candidates
        .iter()
        .filter(|c| !known.contains(c.as_str()))
        .cloned()
        .collect()
}
