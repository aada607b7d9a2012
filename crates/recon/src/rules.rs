//! Pattern extraction: ordered `(pattern, capture)` rules applied to a text buffer.
//!
//! The `regex` crate has no lookaround, so "not immediately preceded by X"
//! conditions are carried as separate `exclude_preceded_by` patterns. Each is
//! compiled end-anchored and tested against the text before a match start.
//! A match dropped this way does not consume input: the search resumes one
//! character after its start, so a shorter match inside it can still count.
//!
//! Rules use the JavaScript-style dialect the engine scripts were audited
//! with: `\w`, `\d` and `\b` are ASCII-only (`[A-Za-z0-9_]`, `[0-9]`), while
//! `\s` stays Unicode-aware. Patterns are rewritten to ASCII classes before
//! compilation, so `global func Größe()` never yields an identifier.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::model::Identifier;

/// Rule as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    pub pattern: String,
    #[serde(default = "default_capture")]
    pub capture: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_preceded_by: Vec<String>,
}

fn default_capture() -> usize {
    1
}

impl RuleSpec {
    pub fn new(pattern: impl Into<String>, capture: usize) -> Self {
        Self {
            pattern: pattern.into(),
            capture,
            exclude_preceded_by: Vec::new(),
        }
    }

    pub fn excluding(mut self, preceded_by: impl Into<String>) -> Self {
        self.exclude_preceded_by.push(preceded_by.into());
        self
    }

    pub fn compile(&self) -> Result<ExtractionRule, ReconError> {
        let mut rule = ExtractionRule::new(&self.pattern, self.capture)?;
        for p in &self.exclude_preceded_by {
            rule = rule.excluding_preceded_by(p)?;
        }
        Ok(rule)
    }
}

/// Compiled extraction rule.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    pattern: String,
    regex: Regex,
    capture: usize,
    preceded_by: Vec<Regex>,
}

/// Rewrite `\w`, `\W`, `\d`, `\D` and `\b` to their ASCII forms.
///
/// Escaped backslashes and all other escapes pass through untouched. Inside a
/// bracket class the POSIX spellings are used, since groups are not allowed there.
fn ascii_classes(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut chars = pattern.chars().peekable();
    let mut depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let Some(next) = chars.next() else {
                    out.push(c);
                    break;
                };
                let ascii = match (next, depth > 0) {
                    ('w', false) => "[[:word:]]",
                    ('W', false) => "[^[:word:]]",
                    ('d', false) => "[0-9]",
                    ('D', false) => "[^0-9]",
                    ('b', false) => r"(?-u:\b)",
                    ('w', true) => "[:word:]",
                    ('W', true) => "[:^word:]",
                    ('d', true) => "[:digit:]",
                    ('D', true) => "[:^digit:]",
                    _ => {
                        out.push(c);
                        out.push(next);
                        continue;
                    }
                };
                out.push_str(ascii);
            }
            '[' => {
                out.push(c);
                if depth > 0 && chars.peek() == Some(&':') {
                    // POSIX class such as `[:word:]`; copy through its closing `]`.
                    for p in chars.by_ref() {
                        out.push(p);
                        if p == ']' {
                            break;
                        }
                    }
                    continue;
                }
                depth += 1;
                if chars.peek() == Some(&'^') {
                    out.push('^');
                    chars.next();
                }
                // A leading `]` is a literal member.
                if chars.peek() == Some(&']') {
                    out.push(']');
                    chars.next();
                }
            }
            ']' if depth > 0 => {
                out.push(c);
                depth -= 1;
            }
            _ => out.push(c),
        }
    }
    out
}

fn build(pattern: &str) -> Result<Regex, ReconError> {
    RegexBuilder::new(&ascii_classes(pattern))
        .multi_line(true)
        .build()
        .map_err(|e| ReconError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

impl ExtractionRule {
    /// Compile `pattern` (multi-line mode) recording capture group `capture`.
    pub fn new(pattern: &str, capture: usize) -> Result<Self, ReconError> {
        let regex = build(pattern)?;
        let groups = regex.captures_len() - 1;
        if groups == 0 {
            return Err(ReconError::ConfigValidation(format!(
                "pattern `{pattern}` has no capture group"
            )));
        }
        if capture > groups {
            return Err(ReconError::ConfigValidation(format!(
                "pattern `{pattern}` has {groups} capture group(s), capture {capture} requested"
            )));
        }
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            capture,
            preceded_by: Vec::new(),
        })
    }

    /// Drop matches whose preceding text ends with `pattern`.
    pub fn excluding_preceded_by(mut self, pattern: &str) -> Result<Self, ReconError> {
        self.preceded_by.push(build(&format!(r"(?:{pattern})\z"))?);
        Ok(self)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn is_excluded(&self, prefix: &str) -> bool {
        self.preceded_by.iter().any(|re| re.is_match(prefix))
    }

    /// All non-overlapping captures of this rule in `buffer`, in buffer order.
    pub fn find_all<'a>(&'a self, buffer: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let mut at = 0;
        std::iter::from_fn(move || loop {
            if at > buffer.len() {
                return None;
            }
            let caps = self.regex.captures_at(buffer, at)?;
            let whole = caps.get(0)?;
            if self.is_excluded(&buffer[..whole.start()]) {
                at = step(buffer, whole.start());
                continue;
            }
            at = if whole.is_empty() {
                step(buffer, whole.end())
            } else {
                whole.end()
            };
            if let Some(m) = caps.get(self.capture) {
                return Some(m.as_str());
            }
        })
    }
}

/// Byte offset of the character after `i`, or past the end.
fn step(buffer: &str, i: usize) -> usize {
    buffer[i..]
        .chars()
        .next()
        .map_or(buffer.len() + 1, |c| i + c.len_utf8())
}

/// Apply `rules` in declaration order, concatenating their captures.
pub fn extract(buffer: &str, rules: &[ExtractionRule]) -> Vec<Identifier> {
    let mut out = Vec::new();
    for rule in rules {
        let before = out.len();
        out.extend(rule.find_all(buffer).map(str::to_string));
        tracing::debug!(pattern = rule.pattern(), matches = out.len() - before, "rule applied");
    }
    out
}

/// Compile a list of rule specs.
pub fn compile_all(specs: &[RuleSpec]) -> Result<Vec<ExtractionRule>, ReconError> {
    specs.iter().map(RuleSpec::compile).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper_rule() -> ExtractionRule {
        RuleSpec::new(r"global func (\w*)\s?\(", 1)
            .excluding(r"//\s?internal\r?\n")
            .excluding(r"//\s?")
            .compile()
            .unwrap()
    }

    #[test]
    fn rules_apply_in_declaration_order() {
        let buffer = "b1 a1 b2 a2";
        let rules = vec![
            ExtractionRule::new(r"a(\d)", 1).unwrap(),
            ExtractionRule::new(r"b(\d)", 1).unwrap(),
        ];
        assert_eq!(extract(buffer, &rules), vec!["1", "2", "1", "2"]);
    }

    #[test]
    fn duplicates_are_preserved() {
        let rules = vec![ExtractionRule::new(r"fn (\w+)", 1).unwrap()];
        assert_eq!(extract("fn a fn b fn a", &rules), vec!["a", "b", "a"]);
    }

    #[test]
    fn selects_requested_capture_group() {
        let rules = vec![ExtractionRule::new(r"(\w+)=(\w+)", 2).unwrap()];
        assert_eq!(extract("x=1 y=2", &rules), vec!["1", "2"]);
    }

    #[test]
    fn internal_marker_excludes_declaration() {
        let src = "global func Shown() {}\n// internal\nglobal func Hidden() {}\n";
        assert_eq!(extract(src, &[helper_rule()]), vec!["Shown"]);
    }

    #[test]
    fn internal_marker_with_crlf() {
        let src = "//internal\r\nglobal func Hidden() {}\r\nglobal func Shown(){}\r\n";
        assert_eq!(extract(src, &[helper_rule()]), vec!["Shown"]);
    }

    #[test]
    fn commented_out_declaration_is_excluded() {
        let src = "//global func Old() {}\n// global func Older() {}\nglobal func New() {}\n";
        assert_eq!(extract(src, &[helper_rule()]), vec!["New"]);
    }

    #[test]
    fn marker_two_lines_up_does_not_exclude() {
        let src = "// internal\n\nglobal func Visible() {}\n";
        assert_eq!(extract(src, &[helper_rule()]), vec!["Visible"]);
    }

    #[test]
    fn multi_line_anchors() {
        let rules = vec![ExtractionRule::new(r#"^\t\{"(\w+)""#, 1).unwrap()];
        let src = "static C4ScriptConstDef C4ScriptConstMap[] = {\n\t{\"A\", 1},\n\t{\"B\", 2},\n};";
        assert_eq!(extract(src, &rules), vec!["A", "B"]);
    }

    #[test]
    fn word_class_is_ascii_only() {
        let src = "global func Größe() {}\nglobal func Ok() {}\n";
        assert_eq!(extract(src, &[helper_rule()]), vec!["Ok"]);

        let rules = vec![ExtractionRule::new(r#"AddFunc\(pEngine, +"(\w+)", +Fn\w+\);"#, 1).unwrap()];
        assert!(extract("AddFunc(pEngine, \"Ärger\", FnÄrger);", &rules).is_empty());
    }

    #[test]
    fn digit_and_boundary_are_ascii_only() {
        let rules = vec![ExtractionRule::new(r"\b(\d+)\b", 1).unwrap()];
        assert_eq!(extract("12 ٣ é7 34", &rules), vec!["12", "7", "34"]);
    }

    #[test]
    fn ascii_classes_inside_brackets() {
        assert_eq!(ascii_classes(r"[\w<>():]+"), "[[:word:]<>():]+");
        assert_eq!(ascii_classes(r"[^\d]\\w"), r"[^[:digit:]]\\w");
        assert_eq!(ascii_classes(r"[]\w]\s"), r"[][:word:]]\s");

        let rules = vec![ExtractionRule::new(r"\{([\w<>():]+)\}", 1).unwrap()];
        assert_eq!(extract("{C4D_All} {Größe}", &rules), vec!["C4D_All"]);
    }

    #[test]
    fn excluded_match_is_retried_one_char_later() {
        let rules = vec![RuleSpec::new(r"(\w+)\(", 1).excluding("//").compile().unwrap()];
        assert_eq!(extract("//Foo(", &rules), vec!["oo"]);
        assert_eq!(extract("Bar( //Foo(", &rules), vec!["Bar", "oo"]);
    }

    #[test]
    fn empty_matches_advance() {
        let rules = vec![ExtractionRule::new(r"(x*)", 1).unwrap()];
        assert_eq!(extract("axé", &rules), vec!["", "x", "", ""]);
    }

    #[test]
    fn no_matches_yields_empty() {
        let rules = vec![ExtractionRule::new(r"AddFunc\((\w+)\)", 1).unwrap()];
        assert!(extract("nothing here", &rules).is_empty());
    }

    #[test]
    fn rejects_pattern_without_group() {
        let err = ExtractionRule::new(r"\w+", 1).unwrap_err();
        assert!(err.to_string().contains("no capture group"));
    }

    #[test]
    fn rejects_out_of_range_capture() {
        let err = ExtractionRule::new(r"(\w+)", 2).unwrap_err();
        assert!(err.to_string().contains("capture 2"));
    }

    #[test]
    fn rejects_bad_regex() {
        let err = ExtractionRule::new(r"(unclosed", 1).unwrap_err();
        assert!(matches!(err, ReconError::InvalidPattern { .. }));
    }
}
