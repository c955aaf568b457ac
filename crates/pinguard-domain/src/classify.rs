//! Decides whether a version constraint is a banned dynamic version.
//!
//! Rules are evaluated in a fixed order (aliases, then the snapshot suffix,
//! then ranges); the first rule that applies decides.

use crate::policy::DynamicVersionPolicy;
use crate::version::{VersionAlias, VersionConstraint};
use pinguard_types::ids;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DynamicKind {
    Latest,
    Release,
    Snapshot,
    Range,
}

impl DynamicKind {
    /// Finding code reported for this kind.
    pub fn code(self) -> &'static str {
        match self {
            DynamicKind::Latest => ids::CODE_LATEST_VERSION,
            DynamicKind::Release => ids::CODE_RELEASE_VERSION,
            DynamicKind::Snapshot => ids::CODE_SNAPSHOT_VERSION,
            DynamicKind::Range => ids::CODE_VERSION_RANGE,
        }
    }
}

impl fmt::Display for DynamicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DynamicKind::Latest => "LATEST alias",
            DynamicKind::Release => "RELEASE alias",
            DynamicKind::Snapshot => "snapshot version",
            DynamicKind::Range => "version range",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// A plain fixed version.
    Fixed,
    /// Dynamic, but permitted by the policy.
    Allowed(DynamicKind),
    Banned(DynamicKind),
    /// Neither a fixed version nor a range.
    Unrecognized,
}

struct DynamicRule {
    kind: DynamicKind,
    applies: fn(&VersionConstraint) -> bool,
    allowed: fn(&VersionConstraint, &DynamicVersionPolicy) -> bool,
}

const RULES: [DynamicRule; 4] = [
    DynamicRule {
        kind: DynamicKind::Latest,
        applies: is_latest,
        allowed: latest_allowed,
    },
    DynamicRule {
        kind: DynamicKind::Release,
        applies: is_release,
        allowed: release_allowed,
    },
    DynamicRule {
        kind: DynamicKind::Snapshot,
        applies: is_snapshot,
        allowed: snapshot_allowed,
    },
    DynamicRule {
        kind: DynamicKind::Range,
        applies: is_range,
        allowed: range_allowed,
    },
];

fn is_latest(c: &VersionConstraint) -> bool {
    matches!(c, VersionConstraint::Alias(VersionAlias::Latest))
}

fn latest_allowed(_: &VersionConstraint, p: &DynamicVersionPolicy) -> bool {
    p.allow_latest
}

fn is_release(c: &VersionConstraint) -> bool {
    matches!(c, VersionConstraint::Alias(VersionAlias::Release))
}

fn release_allowed(_: &VersionConstraint, p: &DynamicVersionPolicy) -> bool {
    p.allow_release
}

fn is_snapshot(c: &VersionConstraint) -> bool {
    c.fixed_version().is_some_and(|v| v.is_snapshot())
}

fn snapshot_allowed(_: &VersionConstraint, p: &DynamicVersionPolicy) -> bool {
    p.allow_snapshots
}

fn is_range(c: &VersionConstraint) -> bool {
    c.range().is_some()
}

fn range_allowed(c: &VersionConstraint, p: &DynamicVersionPolicy) -> bool {
    let single_point = c.range().is_some_and(|r| r.has_identical_bounds());
    (p.allow_ranges_with_identical_bounds && single_point) || p.allow_ranges
}

/// Classify `constraint` under `policy`.
///
/// An unrecognized constraint is never a violation, but it means the resolver
/// handed over data it should not have, so it is logged as a warning.
pub fn classify(constraint: &VersionConstraint, policy: &DynamicVersionPolicy) -> Classification {
    if let VersionConstraint::Unrecognized(raw) = constraint {
        tracing::warn!("Unexpected version constraint found: '{raw}'");
        return Classification::Unrecognized;
    }

    for rule in &RULES {
        if (rule.applies)(constraint) {
            return if (rule.allowed)(constraint, policy) {
                Classification::Allowed(rule.kind)
            } else {
                Classification::Banned(rule.kind)
            };
        }
    }

    Classification::Fixed
}

pub fn is_banned(constraint: &VersionConstraint, policy: &DynamicVersionPolicy) -> bool {
    matches!(classify(constraint, policy), Classification::Banned(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(text: &str) -> VersionConstraint {
        VersionConstraint::from_resolver(text)
    }

    #[test]
    fn everything_dynamic_is_banned_by_default() {
        let p = DynamicVersionPolicy::default();
        assert_eq!(classify(&c("LATEST"), &p), Classification::Banned(DynamicKind::Latest));
        assert_eq!(classify(&c("RELEASE"), &p), Classification::Banned(DynamicKind::Release));
        assert_eq!(
            classify(&c("1.0-SNAPSHOT"), &p),
            Classification::Banned(DynamicKind::Snapshot)
        );
        assert_eq!(classify(&c("[1.0,2.0)"), &p), Classification::Banned(DynamicKind::Range));
        assert_eq!(classify(&c("1.0"), &p), Classification::Fixed);
    }

    #[test]
    fn each_toggle_only_affects_its_own_rule() {
        let p = DynamicVersionPolicy {
            allow_latest: true,
            ..Default::default()
        };
        assert!(!is_banned(&c("LATEST"), &p));
        assert!(is_banned(&c("RELEASE"), &p));

        let p = DynamicVersionPolicy {
            allow_release: true,
            ..Default::default()
        };
        assert!(is_banned(&c("LATEST"), &p));
        assert!(!is_banned(&c("RELEASE"), &p));

        let p = DynamicVersionPolicy {
            allow_snapshots: true,
            ..Default::default()
        };
        assert!(!is_banned(&c("2.1-SNAPSHOT"), &p));
        assert!(is_banned(&c("[2.1]"), &p));

        let p = DynamicVersionPolicy {
            allow_ranges: true,
            ..Default::default()
        };
        assert!(!is_banned(&c("[1.0,2.0)"), &p));
        assert!(is_banned(&c("1.0-SNAPSHOT"), &p));
    }

    #[test]
    fn single_point_ranges_follow_identical_bounds_toggle() {
        let p = DynamicVersionPolicy {
            allow_ranges_with_identical_bounds: true,
            ..Default::default()
        };
        assert_eq!(classify(&c("[1.0]"), &p), Classification::Allowed(DynamicKind::Range));
        assert!(!is_banned(&c("[1.0,1.0]"), &p));
        assert!(is_banned(&c("[1.0,2.0)"), &p));
        assert!(is_banned(&c("[1.0,1.0)"), &p));

        let p = DynamicVersionPolicy::default();
        assert!(is_banned(&c("[1.0]"), &p));
    }

    #[test]
    fn snapshot_suffix_is_case_sensitive() {
        let p = DynamicVersionPolicy::default();
        assert!(!is_banned(&c("1.0-snapshot"), &p));
    }

    #[test]
    fn unrecognized_constraint_is_not_banned() {
        let p = DynamicVersionPolicy::default();
        assert_eq!(classify(&c("[1.0"), &p), Classification::Unrecognized);
        assert_eq!(classify(&c(""), &p), Classification::Unrecognized);
    }

    #[test]
    fn kinds_map_to_codes() {
        assert_eq!(DynamicKind::Latest.code(), ids::CODE_LATEST_VERSION);
        assert_eq!(DynamicKind::Range.code(), ids::CODE_VERSION_RANGE);
    }
}
