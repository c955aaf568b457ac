//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Snapshot and single-point range classification
//! - Determinism of repeated audits
//! - Ancestor paths reported for violations
//! - Exclusion patterns never hiding descendants

use crate::classify::{Classification, classify, is_banned};
use crate::engine::audit_tree;
use crate::model::DependencyNode;
use crate::policy::DynamicVersionPolicy;
use crate::test_support::{leaf, node, project};
use crate::version::VersionConstraint;
use proptest::prelude::*;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

fn arb_fixed_version() -> impl Strategy<Value = String> {
    (0u32..20, 0u32..20, 0u32..20).prop_map(|(a, b, c)| format!("{a}.{b}.{c}"))
}

/// Fixed versions, snapshots, aliases and ranges.
fn arb_version_text() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_fixed_version(),
        arb_fixed_version().prop_map(|v| format!("{v}-SNAPSHOT")),
        Just("LATEST".to_string()),
        Just("RELEASE".to_string()),
        (arb_fixed_version(), arb_fixed_version()).prop_map(|(a, b)| format!("[{a},{b})")),
        arb_fixed_version().prop_map(|v| format!("[{v}]")),
    ]
}

fn arb_policy() -> impl Strategy<Value = DynamicVersionPolicy> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(snapshots, latest, release, ranges, identical)| DynamicVersionPolicy {
            allow_snapshots: snapshots,
            allow_latest: latest,
            allow_release: release,
            allow_ranges: ranges,
            allow_ranges_with_identical_bounds: identical,
            ..Default::default()
        })
}

/// Trees up to three levels deep; artifact names are unique per position.
fn arb_tree() -> impl Strategy<Value = DependencyNode> {
    let leaf_strategy = arb_version_text();
    let mid = (arb_version_text(), prop::collection::vec(leaf_strategy, 0..4));
    prop::collection::vec(
        (arb_version_text(), prop::collection::vec(mid, 0..4)),
        0..5,
    )
    .prop_map(|direct| {
        let children = direct
            .into_iter()
            .enumerate()
            .map(|(i, (version, mids))| {
                let grandchildren = mids
                    .into_iter()
                    .enumerate()
                    .map(|(j, (version, leaves))| {
                        let leaves = leaves
                            .into_iter()
                            .enumerate()
                            .map(|(k, version)| {
                                leaf(&format!("org.leaf:l{i}-{j}-{k}:{version}"), "compile")
                            })
                            .collect();
                        node(&format!("org.mid:m{i}-{j}:{version}"), "compile", leaves)
                    })
                    .collect();
                node(&format!("com.top:t{i}:{version}"), "compile", grandchildren)
            })
            .collect();
        project(children)
    })
}

fn depth_of(artifact: &str) -> usize {
    if artifact.starts_with('t') {
        1
    } else if artifact.starts_with('m') {
        2
    } else {
        3
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn snapshot_is_banned_iff_not_allowed(version in arb_fixed_version(), policy in arb_policy()) {
        let constraint = VersionConstraint::from_resolver(&format!("{version}-SNAPSHOT"));
        prop_assert_eq!(is_banned(&constraint, &policy), !policy.allow_snapshots);
    }

    #[test]
    fn single_point_ranges_pass_with_identical_bounds(version in arb_fixed_version(), policy in arb_policy()) {
        let policy = DynamicVersionPolicy {
            allow_ranges_with_identical_bounds: true,
            ..policy
        };
        let short = VersionConstraint::from_resolver(&format!("[{version}]"));
        let long = VersionConstraint::from_resolver(&format!("[{version},{version}]"));
        prop_assert!(!is_banned(&short, &policy));
        prop_assert!(!is_banned(&long, &policy));
    }

    #[test]
    fn fixed_versions_are_never_banned(version in arb_fixed_version(), policy in arb_policy()) {
        let constraint = VersionConstraint::from_resolver(&version);
        prop_assert_eq!(classify(&constraint, &policy), Classification::Fixed);
    }

    #[test]
    fn audit_is_idempotent(tree in arb_tree(), policy in arb_policy()) {
        let first = audit_tree(&tree, &policy).expect("policy");
        let second = audit_tree(&tree, &policy).expect("policy");
        prop_assert_eq!(first.violation_count(), second.violation_count());
        prop_assert_eq!(first.render_message(), second.render_message());
    }

    #[test]
    fn violation_paths_match_depth(tree in arb_tree(), policy in arb_policy()) {
        let report = audit_tree(&tree, &policy).expect("policy");
        for v in &report.violations {
            let artifact = &v.dependency().coordinate.artifact;
            prop_assert_eq!(v.path().len(), depth_of(artifact) - 1);

            // Ancestors are named after the prefix of the violating node's position.
            let position = &artifact[1..];
            for (idx, ancestor) in v.path().iter().enumerate() {
                let prefix: Vec<&str> = position.split('-').take(idx + 1).collect();
                prop_assert_eq!(&ancestor.artifact[1..], prefix.join("-"));
            }
        }
    }

    #[test]
    fn ignored_nodes_never_violate_but_children_do(tree in arb_tree()) {
        let all = audit_tree(&tree, &DynamicVersionPolicy::default()).expect("policy");
        let ignoring_top = DynamicVersionPolicy {
            ignores: vec!["com.top".to_string()],
            ..Default::default()
        };
        let report = audit_tree(&tree, &ignoring_top).expect("policy");

        prop_assert!(report
            .violations
            .iter()
            .all(|v| v.dependency().coordinate.group != "com.top"));
        // Nothing that was reported below a kept top-level node disappears.
        for v in all.violations.iter().filter(|v| v.dependency().coordinate.group != "com.top") {
            prop_assert!(report.violations.contains(v));
        }
    }
}

#[test]
fn lone_root_never_violates() {
    let tree = project(vec![]);
    for policy in [DynamicVersionPolicy::default(), crate::test_support::allow_everything()] {
        let report = audit_tree(&tree, &policy).expect("policy");
        assert!(report.is_clean());
    }
}
