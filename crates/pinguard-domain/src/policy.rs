use crate::error::ConfigError;
use crate::resolve::DependencySelector;
use pinguard_types::Severity;

/// Scopes a dependency can legally carry.
pub const KNOWN_SCOPES: &[&str] = &["compile", "provided", "runtime", "test", "system", "import"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Error,
    Warning,
}

/// Allowances for the dynamic-version rule. Every toggle is independent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DynamicVersionPolicy {
    pub allow_snapshots: bool,
    pub allow_latest: bool,
    pub allow_release: bool,
    pub allow_ranges: bool,
    /// Only meaningful while `allow_ranges` is false.
    pub allow_ranges_with_identical_bounds: bool,
    pub exclude_optionals: bool,
    pub excluded_scopes: Vec<String>,
    /// `group[:artifact[:version[:type[:scope[:classifier]]]]]` patterns.
    pub ignores: Vec<String>,
}

impl DynamicVersionPolicy {
    /// Selector the resolver should apply while building the tree.
    pub fn selector(&self) -> DependencySelector {
        DependencySelector::new(self.excluded_scopes.iter().cloned(), self.exclude_optionals)
    }
}

/// Options shared by the file existence rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileRulePolicy {
    /// Empty entries stand for "no file given".
    pub files: Vec<String>,
    pub allow_nulls: bool,
    pub satisfy_any: bool,
    pub case_sensitive: bool,
}

impl FileRulePolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.files.is_empty() && !self.allow_nulls {
            return Err(ConfigError::EmptyFileList);
        }
        Ok(())
    }
}

/// A rule's options plus how its failures are reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RulePolicy<T> {
    pub severity: Severity,
    /// Custom text printed above the rule's own failure message.
    pub message: Option<String>,
    pub options: T,
}

impl<T> RulePolicy<T> {
    pub fn new(severity: Severity, options: T) -> Self {
        Self {
            severity,
            message: None,
            options,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub fail_on: FailOn,
    /// Resolved dependency tree document, relative to the repo root.
    pub tree: Option<String>,
    pub dynamic_versions: Option<RulePolicy<DynamicVersionPolicy>>,
    pub require_files_exist: Option<RulePolicy<FileRulePolicy>>,
    pub require_files_dont_exist: Option<RulePolicy<FileRulePolicy>>,
}
