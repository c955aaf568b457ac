use pinguard_domain::policy::{DynamicVersionPolicy, EffectiveConfig, FailOn, RulePolicy};
use pinguard_types::Severity;

pub const DEFAULT_PROFILE: &str = "strict";

/// Preset profiles are opinionated defaults.
///
/// File rules have no preset: they only run when a repo config lists files.
pub fn preset(profile: &str) -> Option<EffectiveConfig> {
    match profile {
        "strict" => Some(strict_profile()),
        "warn" => Some(warn_profile()),
        "compat" => Some(compat_profile()),
        _ => None,
    }
}

/// Severity file rules get when the config does not set one.
pub fn default_severity(cfg: &EffectiveConfig) -> Severity {
    cfg.dynamic_versions
        .as_ref()
        .map(|rule| rule.severity)
        .unwrap_or(Severity::Error)
}

fn strict_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        fail_on: FailOn::Error,
        tree: None,
        dynamic_versions: Some(RulePolicy::new(
            Severity::Error,
            DynamicVersionPolicy::default(),
        )),
        require_files_exist: None,
        require_files_dont_exist: None,
    }
}

fn warn_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "warn".to_string(),
        fail_on: FailOn::Warning,
        tree: None,
        dynamic_versions: Some(RulePolicy::new(
            Severity::Warning,
            DynamicVersionPolicy::default(),
        )),
        require_files_exist: None,
        require_files_dont_exist: None,
    }
}

fn compat_profile() -> EffectiveConfig {
    // Snapshots and pinned single-point ranges are common in older builds.
    EffectiveConfig {
        profile: "compat".to_string(),
        fail_on: FailOn::Error,
        tree: None,
        dynamic_versions: Some(RulePolicy::new(
            Severity::Error,
            DynamicVersionPolicy {
                allow_snapshots: true,
                allow_ranges_with_identical_bounds: true,
                ..Default::default()
            },
        )),
        require_files_exist: None,
        require_files_dont_exist: None,
    }
}
