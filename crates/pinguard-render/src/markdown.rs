use crate::RenderableReport;

pub fn render_markdown(report: &RenderableReport) -> String {
    let summary = [
        format!("- Verdict: **{}**", report.verdict),
        format!("- Profile: `{}`", report.data.profile),
        format!("- Dependencies scanned: {}", report.data.dependencies_scanned),
        format!("- Files checked: {}", report.data.files_checked),
        format!("- Findings: {}", report.data.findings_total),
    ];

    let mut out = String::from("# Pinguard report\n\n");
    for line in summary {
        out.push_str(&line);
        out.push('\n');
    }
    out.push('\n');

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    out.push_str("## Findings\n\n");
    for f in &report.findings {
        out.push_str(&format!(
            "- [{}] `{}` / `{}`: {}",
            f.severity.tag(),
            f.check_id,
            f.code,
            f.message
        ));
        if let Some(loc) = &f.location {
            out.push_str(&format!(" (`{loc}`)"));
        }
        out.push('\n');

        if let Some(help) = &f.help {
            out.push_str(&format!("  - help: {help}\n"));
        }
    }

    out
}
