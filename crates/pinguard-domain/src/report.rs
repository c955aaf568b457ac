use crate::classify::DynamicKind;
use crate::model::{Coordinate, Dependency};
use crate::policy::FailOn;
use crate::version::VersionConstraint;
use pinguard_types::{Finding, Severity, Verdict};
use std::fmt;

/// A banned dynamic version together with the path that reached it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    dependency: Dependency,
    path: Vec<Coordinate>,
    constraint: VersionConstraint,
    kind: DynamicKind,
}

impl Violation {
    pub fn new(
        dependency: Dependency,
        path: Vec<Coordinate>,
        constraint: VersionConstraint,
        kind: DynamicKind,
    ) -> Self {
        Self {
            dependency,
            path,
            constraint,
            kind,
        }
    }

    pub fn dependency(&self) -> &Dependency {
        &self.dependency
    }

    /// Entered ancestors from the root's direct dependency down to the parent.
    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    pub fn constraint(&self) -> &VersionConstraint {
        &self.constraint
    }

    pub fn kind(&self) -> DynamicKind {
        self.kind
    }

    /// `A -> B`, or `None` for a direct dependency.
    pub fn dump_path(&self) -> Option<String> {
        dump_path(&self.path)
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dependency {}", self.dependency)?;
        if let Some(via) = self.dump_path() {
            write!(f, " via {via}")?;
        }
        write!(
            f,
            " is referenced with a banned dynamic version {}",
            self.constraint
        )
    }
}

pub fn dump_path(path: &[Coordinate]) -> Option<String> {
    if path.is_empty() {
        return None;
    }
    Some(
        path.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> "),
    )
}

/// Outcome of one audit. Pass/fail is left to the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuditReport {
    /// Root of the audited tree.
    pub root: Option<Coordinate>,
    pub violations: Vec<Violation>,
    /// Non-root nodes handed to the classifier or the exclusion filter.
    pub nodes_visited: u32,
    pub unrecognized_constraints: u32,
}

impl AuditReport {
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Aggregated failure text, or `None` when nothing was found.
    pub fn render_message(&self) -> Option<String> {
        if self.violations.is_empty() {
            return None;
        }
        let count = self.violations.len();
        let noun = if count == 1 {
            "dependency"
        } else {
            "dependencies"
        };
        let mut lines = Vec::with_capacity(count + 1);
        lines.push(format!("Found {count} {noun} with dynamic versions:"));
        lines.extend(self.violations.iter().map(Violation::message));
        Some(lines.join("\n"))
    }
}

pub fn compute_verdict(findings: &[Finding], fail_on: FailOn) -> Verdict {
    let has_error = findings.iter().any(|f| f.severity == Severity::Error);
    if has_error {
        return Verdict::Fail;
    }

    let has_warn = findings.iter().any(|f| f.severity == Severity::Warning);
    if has_warn {
        return match fail_on {
            FailOn::Warning => Verdict::Fail,
            FailOn::Error => Verdict::Warn,
        };
    }

    Verdict::Pass
}
