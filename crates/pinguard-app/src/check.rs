//! The `check` use case: resolve config, audit the dependency tree, check files, produce a report.

use anyhow::Context;
use camino::Utf8Path;
use pinguard_domain::fingerprint::{
    cache_id, fingerprint_for_file, fingerprint_for_violation, files_cache_id,
};
use pinguard_domain::report::compute_verdict;
use pinguard_domain::{
    Auditor, DynamicKind, DynamicVersionPolicy, FileRulePolicy,
    RulePolicy, Violation,
};
use pinguard_repo::{FileChecker, FileFailure, FileRuleKind, TreeFileResolver};
use pinguard_settings::{Overrides, ResolvedConfig};
use pinguard_types::{
    Finding, Location, PinguardData, PinguardReport, RepoPath, SCHEMA_REPORT_V1, Severity,
    Verdict, ids,
};
use serde_json::json;
use time::OffsetDateTime;

use crate::report::tool_meta;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Repository root path. Tree and file paths are resolved against it.
    pub repo_root: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: PinguardReport,
    pub resolved_config: ResolvedConfig,
}

/// Run every enabled rule and assemble the report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Empty config is allowed; the default profile applies.
    let cfg = if input.config_text.trim().is_empty() {
        pinguard_settings::PinguardConfigV1::default()
    } else {
        pinguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = pinguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;
    let effective = &resolved.effective;

    let mut findings = Vec::new();
    let mut data = PinguardData {
        profile: effective.profile.clone(),
        ..Default::default()
    };

    if let Some(rule) = &effective.dynamic_versions {
        let tree = effective.tree.as_deref().with_context(|| {
            format!(
                "rule {} needs a dependency tree; set `tree` in the config or pass --tree",
                ids::CHECK_DEPS_BAN_DYNAMIC_VERSIONS
            )
        })?;
        check_dynamic_versions(input.repo_root, tree, rule, &mut findings, &mut data)?;
    }

    if effective.require_files_exist.is_some() || effective.require_files_dont_exist.is_some() {
        let checker = FileChecker::new(input.repo_root).context("prepare file checks")?;
        let rules = [
            (FileRuleKind::RequireExist, &effective.require_files_exist),
            (FileRuleKind::RequireAbsent, &effective.require_files_dont_exist),
        ];
        for (kind, rule) in rules {
            if let Some(rule) = rule {
                check_files(&checker, kind, rule, &mut findings, &mut data)?;
            }
        }
    }

    let verdict = compute_verdict(&findings, effective.fail_on);
    data.findings_total = findings.len() as u32;

    let report = PinguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict,
        findings,
        data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map a verdict to the process exit code: 0 pass/warn, 2 fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass | Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}

fn check_dynamic_versions(
    repo_root: &Utf8Path,
    tree: &str,
    rule: &RulePolicy<DynamicVersionPolicy>,
    findings: &mut Vec<Finding>,
    data: &mut PinguardData,
) -> anyhow::Result<()> {
    let check_id = ids::CHECK_DEPS_BAN_DYNAMIC_VERSIONS;
    let auditor = Auditor::new(&rule.options)
        .with_context(|| format!("invalid configuration for {check_id}"))?;

    let resolver = TreeFileResolver::new(repo_root.join(tree));
    let audit = auditor.run(&resolver, None)?;
    data.rules_evaluated.push(check_id.to_string());
    data.dependencies_scanned += audit.nodes_visited;
    data.cache_id = Some(cache_id(auditor.policy(), audit.root.as_ref()));

    if audit.unrecognized_constraints > 0 {
        tracing::warn!(
            count = audit.unrecognized_constraints,
            "some version constraints could not be classified"
        );
    }

    let location = Location {
        path: RepoPath::new(tree),
        line: None,
    };
    for violation in &audit.violations {
        findings.push(violation_finding(check_id, rule.severity, &location, violation));
    }

    if let Some(text) = audit.render_message() {
        let message = with_custom_message(rule.message.as_deref(), text);
        log_rule_failure(check_id, rule.severity, &message);
    }
    Ok(())
}

fn violation_finding(
    check_id: &str,
    severity: Severity,
    location: &Location,
    violation: &Violation,
) -> Finding {
    let kind = violation.kind();
    let dependency = violation.dependency();
    Finding {
        severity,
        check_id: check_id.to_string(),
        code: kind.code().to_string(),
        message: violation.message(),
        location: Some(location.clone()),
        help: Some(dynamic_help(kind).to_string()),
        fingerprint: Some(fingerprint_for_violation(check_id, kind.code(), violation)),
        data: json!({
            "dependency": dependency.coordinate.to_string(),
            "scope": dependency.scope,
            "optional": dependency.optional,
            "constraint": violation.constraint().to_string(),
            "path": violation.path().iter().map(ToString::to_string).collect::<Vec<_>>(),
        }),
    }
}

fn dynamic_help(kind: DynamicKind) -> &'static str {
    match kind {
        DynamicKind::Latest | DynamicKind::Release => {
            "Replace the alias with the exact version the build resolves today."
        }
        DynamicKind::Snapshot => {
            "Depend on a released version, or allow snapshots for this profile."
        }
        DynamicKind::Range => {
            "Pin a single version, or use a single-point range such as [1.0] if ranges must stay."
        }
    }
}

fn check_files(
    checker: &FileChecker,
    kind: FileRuleKind,
    rule: &RulePolicy<FileRulePolicy>,
    findings: &mut Vec<Finding>,
    data: &mut PinguardData,
) -> anyhow::Result<()> {
    let check_id = kind.check_id();
    tracing::debug!(
        cache_id = %files_cache_id(&rule.options.files),
        "checking {} file(s) for {check_id}",
        rule.options.files.len()
    );
    let outcome = checker.check(kind, &rule.options)?;
    data.rules_evaluated.push(check_id.to_string());
    data.files_checked += outcome.checked;

    if outcome.passed {
        return Ok(());
    }

    for failure in &outcome.failures {
        let code = failure.code(kind);
        let (message, location) = match failure {
            FileFailure::Null => (failure.to_string(), None),
            FileFailure::Path { entry, absolute } => {
                let message = match kind {
                    FileRuleKind::RequireExist => format!("Required file is missing: {absolute}"),
                    FileRuleKind::RequireAbsent => format!("File should not exist: {absolute}"),
                };
                let location = Location {
                    path: RepoPath::new(entry),
                    line: None,
                };
                (message, Some(location))
            }
        };
        findings.push(Finding {
            severity: rule.severity,
            check_id: check_id.to_string(),
            code: code.to_string(),
            message,
            location,
            help: Some(file_help(kind, failure).to_string()),
            fingerprint: Some(fingerprint_for_file(check_id, code, failure.entry())),
            data: json!({ "file": failure.entry() }),
        });
    }

    if let Some(message) = outcome.failure_message(rule.message.as_deref()) {
        log_rule_failure(check_id, rule.severity, &message);
    }
    Ok(())
}

fn file_help(kind: FileRuleKind, failure: &FileFailure) -> &'static str {
    match (kind, failure) {
        (_, FileFailure::Null) => "Remove the empty entry or set allow_nulls = true.",
        (FileRuleKind::RequireExist, _) => "Add the file, or drop it from the rule's file list.",
        (FileRuleKind::RequireAbsent, _) => "Delete the file, or drop it from the rule's file list.",
    }
}

fn with_custom_message(custom: Option<&str>, text: String) -> String {
    match custom {
        Some(custom) => format!("{custom}\n{text}"),
        None => text,
    }
}

fn log_rule_failure(check_id: &str, severity: Severity, message: &str) {
    match severity {
        Severity::Error => tracing::error!("Rule {check_id} failed with message:\n{message}"),
        Severity::Warning | Severity::Info => {
            tracing::warn!("Rule {check_id} failed with message:\n{message}")
        }
    }
}
