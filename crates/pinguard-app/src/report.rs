use anyhow::Context;
use pinguard_render::{
    RenderableData, RenderableFinding, RenderableLocation, RenderableReport, RenderableSeverity,
    RenderableVerdictStatus,
};
use pinguard_types::{
    Finding, PinguardData, PinguardReport, SCHEMA_REPORT_V1, Severity, ToolMeta, Verdict, ids,
};
use time::OffsetDateTime;

pub(crate) fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "pinguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

pub fn parse_report_json(text: &str) -> anyhow::Result<PinguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse pinguard report")
}

pub fn serialize_report(report: &PinguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &PinguardReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Warn => RenderableVerdictStatus::Warn,
            Verdict::Fail => RenderableVerdictStatus::Fail,
        },
        findings: report.findings.iter().map(renderable_finding).collect(),
        data: RenderableData {
            profile: report.data.profile.clone(),
            dependencies_scanned: report.data.dependencies_scanned,
            files_checked: report.data.files_checked,
            findings_total: report.data.findings_total,
        },
    }
}

fn renderable_finding(f: &Finding) -> RenderableFinding {
    RenderableFinding {
        severity: match f.severity {
            Severity::Info => RenderableSeverity::Info,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Error => RenderableSeverity::Error,
        },
        check_id: f.check_id.clone(),
        code: f.code.clone(),
        message: f.message.clone(),
        location: f.location.as_ref().map(|loc| RenderableLocation {
            path: loc.path.as_str().to_string(),
            line: loc.line,
        }),
        help: f.help.clone(),
    }
}

/// A passing report with no rules evaluated.
pub fn empty_report(profile: &str) -> PinguardReport {
    let now = OffsetDateTime::now_utc();
    PinguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at: now,
        finished_at: now,
        verdict: Verdict::Pass,
        findings: Vec::new(),
        data: PinguardData {
            profile: profile.to_string(),
            ..Default::default()
        },
    }
}

/// Report written when the run itself failed (bad config, unreadable tree, I/O).
pub fn runtime_error_report(message: &str) -> PinguardReport {
    let mut report = empty_report("unknown");
    report.verdict = Verdict::Fail;
    report.findings.push(Finding {
        severity: Severity::Error,
        check_id: ids::CHECK_TOOL_RUNTIME.to_string(),
        code: ids::CODE_RUNTIME_ERROR.to_string(),
        message: message.to_string(),
        location: None,
        help: Some("Fix the tool error and re-run pinguard.".to_string()),
        fingerprint: None,
        data: serde_json::Value::Null,
    });
    report.data.findings_total = 1;
    report
}
