//! Explain registry for rules and codes.
//!
//! Maps rule IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a rule or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule/code.
    pub title: &'static str,
    /// What the rule does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after configuration examples.
    pub examples: ExamplePair,
}

/// Before and after examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Input that would trigger a finding.
    pub before: &'static str,
    /// Input that passes the rule.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        ids::CHECK_DEPS_BAN_DYNAMIC_VERSIONS => Some(explain_ban_dynamic_versions()),
        ids::CHECK_FILES_REQUIRE_EXIST => Some(explain_require_exist()),
        ids::CHECK_FILES_REQUIRE_ABSENT => Some(explain_require_absent()),

        ids::CODE_LATEST_VERSION => Some(explain_latest_version()),
        ids::CODE_RELEASE_VERSION => Some(explain_release_version()),
        ids::CODE_SNAPSHOT_VERSION => Some(explain_snapshot_version()),
        ids::CODE_VERSION_RANGE => Some(explain_version_range()),
        ids::CODE_MISSING_FILE => Some(explain_missing_file()),
        ids::CODE_UNEXPECTED_FILE => Some(explain_unexpected_file()),
        ids::CODE_NULL_FILE => Some(explain_null_file()),

        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_DEPS_BAN_DYNAMIC_VERSIONS,
        ids::CHECK_FILES_REQUIRE_EXIST,
        ids::CHECK_FILES_REQUIRE_ABSENT,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_LATEST_VERSION,
        ids::CODE_RELEASE_VERSION,
        ids::CODE_SNAPSHOT_VERSION,
        ids::CODE_VERSION_RANGE,
        ids::CODE_MISSING_FILE,
        ids::CODE_UNEXPECTED_FILE,
        ids::CODE_NULL_FILE,
    ]
}

// --- Rule-level explanations ---

fn explain_ban_dynamic_versions() -> Explanation {
    Explanation {
        title: "Ban Dynamic Versions",
        description: "\
Detects dependencies whose version has to be resolved at build time.

A version is dynamic when it is:
- a version range such as `[1.0,2.0)`
- one of the floating placeholders `LATEST` or `RELEASE`
- a pre-release ending in `-SNAPSHOT`

Dynamic versions make builds non-reproducible: the same sources can pull a
different artifact tomorrow. Every violation is reported with the path of
dependencies that brought it in.",
        remediation: "\
Pin the dependency to a single fixed version, or relax the policy explicitly:

    [rules.ban_dynamic_versions]
    allow_snapshots = true
    allow_ranges_with_identical_bounds = true
    ignores = [\"com.example:*\"]

Ignored artifacts use `group[:artifact[:version[:type[:scope[:classifier]]]]]`
patterns where any segment may be `*`.",
        examples: ExamplePair {
            before: r#"com.example:lib:jar:[1.0,2.0) (compile)
com.example:tool:jar:LATEST (compile)"#,
            after: r#"com.example:lib:jar:1.4.2 (compile)
com.example:tool:jar:3.0.1 (compile)"#,
        },
    }
}

fn explain_require_exist() -> Explanation {
    Explanation {
        title: "Require Files Exist",
        description: "\
Fails when any of the listed files is missing (or, with `satisfy_any`, when
none of them exists).

Matching is case-sensitive by default. With `case_sensitive = false` only the
file name is compared ignoring case; the parent directory must match exactly.",
        remediation: "\
Create the missing files, or fix the paths in the rule configuration.",
        examples: ExamplePair {
            before: r#"[rules.require_files_exist]
files = ["LICENSE", "NOTICE"]   # NOTICE is missing"#,
            after: r#"[rules.require_files_exist]
files = ["LICENSE"]"#,
        },
    }
}

fn explain_require_absent() -> Explanation {
    Explanation {
        title: "Require Files Don't Exist",
        description: "\
Fails when any of the listed files exists. Useful for keeping generated or
local-only files out of a build.",
        remediation: "\
Delete the listed files before building, or drop them from the rule.",
        examples: ExamplePair {
            before: r#"[rules.require_files_dont_exist]
files = ["debug.log"]   # debug.log is present"#,
            after: r#"# debug.log removed from the working tree"#,
        },
    }
}

// --- Code-level explanations ---

fn explain_latest_version() -> Explanation {
    let mut exp = explain_ban_dynamic_versions();
    exp.title = "LATEST Version";
    exp.examples = ExamplePair {
        before: "com.example:tool:jar:LATEST (compile)",
        after: "com.example:tool:jar:3.0.1 (compile)",
    };
    exp
}

fn explain_release_version() -> Explanation {
    let mut exp = explain_ban_dynamic_versions();
    exp.title = "RELEASE Version";
    exp.examples = ExamplePair {
        before: "com.example:tool:jar:RELEASE (compile)",
        after: "com.example:tool:jar:3.0.1 (compile)",
    };
    exp
}

fn explain_snapshot_version() -> Explanation {
    let mut exp = explain_ban_dynamic_versions();
    exp.title = "Snapshot Version";
    exp.examples = ExamplePair {
        before: "com.example:lib:jar:1.1-SNAPSHOT (compile)",
        after: "com.example:lib:jar:1.1 (compile)",
    };
    exp
}

fn explain_version_range() -> Explanation {
    let mut exp = explain_ban_dynamic_versions();
    exp.title = "Version Range";
    exp.examples = ExamplePair {
        before: "com.example:lib:jar:[1.0,2.0) (compile)",
        after: "com.example:lib:jar:1.4.2 (compile)\n# or, with allow_ranges_with_identical_bounds:\ncom.example:lib:jar:[1.4.2] (compile)",
    };
    exp
}

fn explain_missing_file() -> Explanation {
    let mut exp = explain_require_exist();
    exp.title = "Missing File";
    exp
}

fn explain_unexpected_file() -> Explanation {
    let mut exp = explain_require_absent();
    exp.title = "Unexpected File";
    exp
}

fn explain_null_file() -> Explanation {
    Explanation {
        title: "Empty File Name",
        description: "\
A file rule lists an empty file name while `allow_nulls` is disabled.",
        remediation: "\
Remove the empty entry, or set `allow_nulls = true` to treat it as satisfied.",
        examples: ExamplePair {
            before: r#"[rules.require_files_exist]
files = ["LICENSE", ""]"#,
            after: r#"[rules.require_files_exist]
files = ["LICENSE"]"#,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_check_id() {
        assert!(lookup_explanation(ids::CHECK_DEPS_BAN_DYNAMIC_VERSIONS).is_some());
        assert!(lookup_explanation(ids::CHECK_FILES_REQUIRE_EXIST).is_some());
        assert!(lookup_explanation(ids::CHECK_FILES_REQUIRE_ABSENT).is_some());
    }

    #[test]
    fn lookup_unknown_returns_none() {
        assert!(lookup_explanation("unknown.check").is_none());
        assert!(lookup_explanation("unknown_code").is_none());
    }

    #[test]
    fn every_listed_identifier_has_an_explanation() {
        for id in all_check_ids().iter().chain(all_codes()) {
            assert!(
                lookup_explanation(id).is_some(),
                "identifier {} should be in registry",
                id
            );
        }
    }
}
