use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::rules::{compile_all, RuleSpec};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    pub name: String,
    /// Documentation summary JSON.
    pub docs: String,
    /// Primary engine source file.
    pub primary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helpers: Option<HelperConfig>,
    /// Processed in declaration order.
    #[serde(rename = "category", default)]
    pub categories: Vec<CategoryConfig>,
}

// ---------------------------------------------------------------------------
// Helper files
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HelperConfig {
    pub dir: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    /// File names skipped before extraction.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_extension() -> String {
    "c".into()
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    pub name: String,
    /// List in the documentation summary. Defaults to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_list: Option<String>,
    /// Appended to names in listings, e.g. `()` for functions.
    #[serde(default)]
    pub suffix: String,
    /// Whether undocumented entities of this category fail the run.
    #[serde(default)]
    pub fail_on_undocumented: bool,
    pub primary_rules: Vec<RuleSpec>,
    /// Rules for helper files. Empty means the category only draws from the primary source.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub helper_rules: Vec<RuleSpec>,
}

impl CategoryConfig {
    pub fn doc_list(&self) -> &str {
        self.doc_list.as_deref().unwrap_or(&self.name)
    }
}

/// Built-in configuration for the LegacyClonk C4Script engine layout.
pub const C4SCRIPT_CONFIG: &str = r#"
name = "C4Script"
docs = ".github/workflows/C4ScriptDocAnalyzer/lcdocs_summary.json"
primary = "src/C4Script.cpp"

[helpers]
dir = "planet/System.c4g"
extension = "c"
exclude = ["C4.c"]

[[category]]
name = "functions"
suffix = "()"
fail_on_undocumented = true

[[category.primary_rules]]
pattern = 'AddFunc\(pEngine, +"(\w+)", +Fn\w+(, +(false|true))?\);'
capture = 1

[[category.primary_rules]]
pattern = 'new\sC4Aul\w+<\w+,\s?\w+>\s*\{pEngine,\s"(\w+)"'
capture = 1

[[category.helper_rules]]
pattern = 'global func (\w*)\s?\('
capture = 1
exclude_preceded_by = ['//\s?internal\r?\n', '//\s?']

[[category]]
name = "constants"
fail_on_undocumented = false

[[category.primary_rules]]
pattern = '^\t\{\s?"(\w+)",\s*\w+,\s*[\w<>():]+\s*\}(,|\r?\n\};)(\s*//(\s*[\w()/-;,]+)+)?'
capture = 1
"#;

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl AuditConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: AuditConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn c4script() -> Result<Self, ReconError> {
        Self::from_toml(C4SCRIPT_CONFIG)
    }

    pub fn to_toml(&self) -> Result<String, ReconError> {
        toml::to_string_pretty(self).map_err(|e| ReconError::ConfigParse(e.to_string()))
    }

    /// Make undocumented entities of every category fail the run.
    pub fn strict(mut self) -> Self {
        for category in &mut self.categories {
            category.fail_on_undocumented = true;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.categories.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least one [[category]] is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.name.as_str()) {
                return Err(ReconError::ConfigValidation(format!(
                    "duplicate category '{}'",
                    category.name
                )));
            }
            if category.primary_rules.is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "category '{}': at least one primary rule is required",
                    category.name
                )));
            }
            if !category.helper_rules.is_empty() && self.helpers.is_none() {
                return Err(ReconError::ConfigValidation(format!(
                    "category '{}' has helper rules but no [helpers] section",
                    category.name
                )));
            }
            compile_all(&category.primary_rules)?;
            compile_all(&category.helper_rules)?;
        }

        if let Some(ref helpers) = self.helpers {
            if helpers.extension.trim_start_matches('.').is_empty() {
                return Err(ReconError::ConfigValidation(
                    "helpers.extension must not be empty".into(),
                ));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
