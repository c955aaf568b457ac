//! The `explain` use case: look up rule/code documentation.

use pinguard_types::explain::{self, Explanation};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found an explanation for the identifier.
    Found(Explanation),
    /// Unknown identifier; includes available check_ids and codes.
    NotFound {
        identifier: String,
        available_check_ids: &'static [&'static str],
        available_codes: &'static [&'static str],
    },
}

/// Look up an explanation for a check_id or code.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_check_ids: explain::all_check_ids(),
            available_codes: explain::all_codes(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = heading(exp.title, '=');
    out.push_str(exp.description);
    out.push_str("\n\n");

    out.push_str(&heading("Remediation", '-'));
    out.push_str(exp.remediation);
    out.push_str("\n\n");

    out.push_str(&heading("Examples", '-'));
    out.push_str(&fenced("Before (violation):", exp.examples.before));
    out.push('\n');
    out.push_str(&fenced("After (fixed):", exp.examples.after));
    out
}

fn heading(title: &str, rule: char) -> String {
    let underline: String = std::iter::repeat_n(rule, title.chars().count()).collect();
    format!("{title}\n{underline}\n\n")
}

fn fenced(label: &str, body: &str) -> String {
    format!("{label}\n```\n{body}\n```\n")
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(
    identifier: &str,
    check_ids: &[&'static str],
    codes: &[&'static str],
) -> String {
    let bullets = |items: &[&str]| -> String {
        items.iter().map(|item| format!("  - {item}\n")).collect()
    };
    format!(
        "Unknown check_id or code: {identifier}\n\nAvailable check_ids:\n{}\nAvailable codes:\n{}",
        bullets(check_ids),
        bullets(codes)
    )
}
