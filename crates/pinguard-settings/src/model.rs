use serde::{Deserialize, Serialize};

/// `pinguard.toml` schema v1.
///
/// Top-level keys are permissive for forward compatibility; rule tables are strict.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PinguardConfigV1 {
    /// Optional schema string for tooling (`pinguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// When to fail the check: `error` (default) or `warning`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// Resolved dependency tree (JSON), relative to the repo root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree: Option<String>,

    #[serde(default)]
    pub rules: RuleTables,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleTables {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ban_dynamic_versions: Option<BanDynamicVersionsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_files_exist: Option<FileRuleConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_files_dont_exist: Option<FileRuleConfig>,
}

/// `[rules.ban_dynamic_versions]`. Unset keys keep the profile's value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BanDynamicVersionsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// `info`, `warning` or `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_snapshots: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_latest: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_release: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_ranges: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_ranges_with_identical_bounds: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_optionals: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_scopes: Option<Vec<String>>,

    /// `group[:artifact[:version[:type[:scope[:classifier]]]]]` patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignores: Option<Vec<String>>,
}

/// `[rules.require_files_exist]` / `[rules.require_files_dont_exist]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileRuleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Paths relative to the repo root. An empty string is a null entry.
    #[serde(default)]
    pub files: Vec<String>,

    #[serde(default)]
    pub allow_nulls: bool,

    #[serde(default)]
    pub satisfy_any: bool,

    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,
}

fn default_case_sensitive() -> bool {
    true
}
