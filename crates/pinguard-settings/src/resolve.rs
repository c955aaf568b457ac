use crate::model::{BanDynamicVersionsConfig, FileRuleConfig, PinguardConfigV1};
use crate::presets;
use anyhow::Context;
use pinguard_domain::Auditor;
use pinguard_domain::policy::{
    DynamicVersionPolicy, EffectiveConfig, FailOn, FileRulePolicy, RulePolicy,
};
use pinguard_types::{Severity, ids};

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub tree: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: PinguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| presets::DEFAULT_PROFILE.to_string());

    let mut effective = presets::preset(&profile).with_context(|| {
        format!("unknown profile: {profile} (expected strict|warn|compat)")
    })?;
    let default_severity = presets::default_severity(&effective);

    effective.tree = overrides.tree.clone().or(cfg.tree.clone());

    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    if let Some(table) = &cfg.rules.ban_dynamic_versions {
        effective.dynamic_versions =
            apply_dynamic_versions(effective.dynamic_versions.take(), table, default_severity)
                .with_context(|| {
                    format!("invalid configuration for {}", ids::CHECK_DEPS_BAN_DYNAMIC_VERSIONS)
                })?;
    }

    if let Some(table) = &cfg.rules.require_files_exist {
        effective.require_files_exist = file_rule(table, default_severity).with_context(|| {
            format!("invalid configuration for {}", ids::CHECK_FILES_REQUIRE_EXIST)
        })?;
    }

    if let Some(table) = &cfg.rules.require_files_dont_exist {
        effective.require_files_dont_exist =
            file_rule(table, default_severity).with_context(|| {
                format!("invalid configuration for {}", ids::CHECK_FILES_REQUIRE_ABSENT)
            })?;
    }

    Ok(ResolvedConfig { effective })
}

fn apply_dynamic_versions(
    preset: Option<RulePolicy<DynamicVersionPolicy>>,
    table: &BanDynamicVersionsConfig,
    default_severity: Severity,
) -> anyhow::Result<Option<RulePolicy<DynamicVersionPolicy>>> {
    if table.enabled == Some(false) {
        return Ok(None);
    }

    let mut rule = preset
        .unwrap_or_else(|| RulePolicy::new(default_severity, DynamicVersionPolicy::default()));

    if let Some(sev) = table.severity.as_deref() {
        rule.severity = parse_severity(sev)?;
    }
    if let Some(message) = &table.message {
        rule.message = Some(message.clone());
    }

    let p = &mut rule.options;
    let toggles = [
        (&mut p.allow_snapshots, table.allow_snapshots),
        (&mut p.allow_latest, table.allow_latest),
        (&mut p.allow_release, table.allow_release),
        (&mut p.allow_ranges, table.allow_ranges),
        (
            &mut p.allow_ranges_with_identical_bounds,
            table.allow_ranges_with_identical_bounds,
        ),
        (&mut p.exclude_optionals, table.exclude_optionals),
    ];
    for (field, value) in toggles {
        if let Some(v) = value {
            *field = v;
        }
    }
    if let Some(scopes) = &table.excluded_scopes {
        p.excluded_scopes = scopes.clone();
    }
    if let Some(ignores) = &table.ignores {
        p.ignores = ignores.clone();
    }

    // Compile once so bad patterns and scopes fail here rather than mid-run.
    Auditor::new(&rule.options)?;

    Ok(Some(rule))
}

fn file_rule(
    table: &FileRuleConfig,
    default_severity: Severity,
) -> anyhow::Result<Option<RulePolicy<FileRulePolicy>>> {
    if table.enabled == Some(false) {
        return Ok(None);
    }

    let severity = match table.severity.as_deref() {
        Some(sev) => parse_severity(sev)?,
        None => default_severity,
    };
    let options = FileRulePolicy {
        files: table.files.clone(),
        allow_nulls: table.allow_nulls,
        satisfy_any: table.satisfy_any,
        case_sensitive: table.case_sensitive,
    };
    options.validate()?;

    Ok(Some(RulePolicy {
        severity,
        message: table.message.clone(),
        options,
    }))
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "info" => Ok(Severity::Info),
        "warning" | "warn" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => anyhow::bail!("unknown severity: {other} (expected info|warning|error)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}
