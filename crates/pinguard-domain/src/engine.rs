use crate::classify::{Classification, classify};
use crate::error::{AuditError, ConfigError};
use crate::matcher::ArtifactMatcher;
use crate::model::{Coordinate, Dependency, DependencyNode};
use crate::policy::{DynamicVersionPolicy, KNOWN_SCOPES};
use crate::report::{AuditReport, Violation};
use crate::resolve::{CollectRequest, DependencyResolver};
use crate::walker::{AncestorPath, DependencyVisitor, VisitAction, walk};
use std::collections::BTreeSet;

/// A dynamic-version policy compiled for repeated audits.
///
/// Holds no per-run state; one `Auditor` may audit any number of trees.
#[derive(Clone, Debug)]
pub struct Auditor {
    policy: DynamicVersionPolicy,
    matcher: ArtifactMatcher,
    excluded_scopes: BTreeSet<String>,
}

impl Auditor {
    pub fn new(policy: &DynamicVersionPolicy) -> Result<Self, AuditError> {
        let mut excluded_scopes = BTreeSet::new();
        for scope in &policy.excluded_scopes {
            if !KNOWN_SCOPES.contains(&scope.as_str()) {
                return Err(ConfigError::UnknownScope(scope.clone()).into());
            }
            excluded_scopes.insert(scope.clone());
        }
        let matcher = ArtifactMatcher::new(policy.ignores.as_slice())?;

        if policy.allow_ranges && policy.allow_ranges_with_identical_bounds {
            tracing::debug!(
                "allow_ranges_with_identical_bounds has no effect while allow_ranges is set"
            );
        }

        Ok(Self {
            policy: policy.clone(),
            matcher,
            excluded_scopes,
        })
    }

    pub fn policy(&self) -> &DynamicVersionPolicy {
        &self.policy
    }

    /// Scope, optional flag and ignore patterns, in that order.
    pub fn is_excluded(&self, dependency: &Dependency) -> bool {
        self.excluded_scopes.contains(&dependency.scope)
            || (self.policy.exclude_optionals && dependency.optional)
            || self.matcher.matches(dependency)
    }

    pub fn collect_request(&self, root: Option<Coordinate>) -> CollectRequest {
        CollectRequest {
            root,
            selector: self.policy.selector(),
        }
    }

    pub fn audit(&self, root: &DependencyNode) -> AuditReport {
        let mut collector = DynamicVersionCollector {
            auditor: self,
            report: AuditReport {
                root: Some(root.coordinate().clone()),
                ..AuditReport::default()
            },
        };
        walk(root, &mut collector);
        collector.report
    }

    /// Collect the tree for `root` through `resolver` and audit it.
    pub fn run<R>(&self, resolver: &R, root: Option<Coordinate>) -> Result<AuditReport, AuditError>
    where
        R: DependencyResolver + ?Sized,
    {
        self.collect_and_audit(resolver, &self.collect_request(root))
    }

    fn collect_and_audit<R>(
        &self,
        resolver: &R,
        request: &CollectRequest,
    ) -> Result<AuditReport, AuditError>
    where
        R: DependencyResolver + ?Sized,
    {
        let tree = resolver
            .collect(request)
            .map_err(|source| AuditError::Resolution {
                root: request.root_label(),
                source,
            })?;
        Ok(self.audit(&tree))
    }
}

struct DynamicVersionCollector<'a> {
    auditor: &'a Auditor,
    report: AuditReport,
}

impl<'t> DependencyVisitor<'t> for DynamicVersionCollector<'_> {
    fn visit_enter(&mut self, node: &'t DependencyNode, path: &AncestorPath<'t>) -> VisitAction {
        self.report.nodes_visited += 1;
        tracing::debug!(depth = path.child_depth(), "Inspecting dependency {}", node.dependency);

        if self.auditor.is_excluded(&node.dependency) {
            tracing::debug!("Skipping excluded dependency {}", node.dependency);
            return VisitAction::Continue;
        }

        match classify(&node.version_constraint, &self.auditor.policy) {
            Classification::Banned(kind) => {
                self.report.violations.push(Violation::new(
                    node.dependency.clone(),
                    path.coordinates().cloned().collect(),
                    node.version_constraint.clone(),
                    kind,
                ));
                VisitAction::SkipChildren
            }
            Classification::Unrecognized => {
                self.report.unrecognized_constraints += 1;
                VisitAction::Continue
            }
            Classification::Fixed | Classification::Allowed(_) => VisitAction::Continue,
        }
    }
}

/// Audit an already-resolved tree under `policy`.
pub fn audit_tree(
    root: &DependencyNode,
    policy: &DynamicVersionPolicy,
) -> Result<AuditReport, AuditError> {
    Ok(Auditor::new(policy)?.audit(root))
}

/// One complete run: compile the policy, collect the tree, walk it.
///
/// Configuration problems surface before the resolver is called.
pub fn run_audit<R>(
    resolver: &R,
    request: &CollectRequest,
    policy: &DynamicVersionPolicy,
) -> Result<AuditReport, AuditError>
where
    R: DependencyResolver + ?Sized,
{
    Auditor::new(policy)?.collect_and_audit(resolver, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::DynamicKind;
    use crate::resolve::ResolutionError;
    use crate::test_support::{
        allow_everything, leaf, node, optional_leaf, policy_with_ignores, project,
    };
    use std::cell::Cell;

    fn audit(tree: &DependencyNode, policy: &DynamicVersionPolicy) -> AuditReport {
        audit_tree(tree, policy).expect("valid policy")
    }

    struct FixedResolver {
        tree: DependencyNode,
        calls: Cell<u32>,
    }

    impl DependencyResolver for FixedResolver {
        fn collect(&self, request: &CollectRequest) -> Result<DependencyNode, ResolutionError> {
            self.calls.set(self.calls.get() + 1);
            Ok(request.selector.prune(self.tree.clone()))
        }
    }

    struct FailingResolver;

    impl DependencyResolver for FailingResolver {
        fn collect(&self, _: &CollectRequest) -> Result<DependencyNode, ResolutionError> {
            Err(ResolutionError::new("repository unreachable"))
        }
    }

    #[test]
    fn empty_tree_has_no_violations() {
        let report = audit(&project(vec![]), &DynamicVersionPolicy::default());
        assert!(report.is_clean());
        assert_eq!(report.nodes_visited, 0);
        assert_eq!(report.render_message(), None);
    }

    #[test]
    fn transitive_latest_reports_path_through_parent() {
        let tree = project(vec![node(
            "com.example:a:1.0",
            "compile",
            vec![leaf("com.example:b:LATEST", "compile")],
        )]);
        let report = audit(&tree, &DynamicVersionPolicy::default());

        assert_eq!(report.violation_count(), 1);
        let v = &report.violations[0];
        assert_eq!(v.kind(), DynamicKind::Latest);
        assert_eq!(v.dump_path().as_deref(), Some("com.example:a:jar:1.0"));
        assert_eq!(
            report.render_message().as_deref(),
            Some(
                "Found 1 dependency with dynamic versions:\n\
                 Dependency com.example:b:jar:LATEST (compile) via com.example:a:jar:1.0 \
                 is referenced with a banned dynamic version LATEST"
            )
        );
    }

    #[test]
    fn ranges_follow_allow_ranges() {
        let tree = project(vec![leaf("com.example:foo:[1.0,2.0)", "compile")]);
        assert_eq!(audit(&tree, &DynamicVersionPolicy::default()).violation_count(), 1);

        let allowed = DynamicVersionPolicy {
            allow_ranges: true,
            ..Default::default()
        };
        assert!(audit(&tree, &allowed).is_clean());
    }

    #[test]
    fn single_point_range_is_allowed_with_identical_bounds() {
        let tree = project(vec![leaf("com.example:foo:[1.0]", "compile")]);
        let policy = DynamicVersionPolicy {
            allow_ranges_with_identical_bounds: true,
            ..Default::default()
        };
        assert!(audit(&tree, &policy).is_clean());
        assert_eq!(audit(&tree, &DynamicVersionPolicy::default()).violation_count(), 1);
    }

    #[test]
    fn ignored_group_is_not_reported() {
        let tree = project(vec![leaf("com.example:foo:LATEST", "compile")]);
        let report = audit(&tree, &policy_with_ignores(&["com.example:*"]));
        assert!(report.is_clean());
        assert_eq!(report.nodes_visited, 1);
    }

    #[test]
    fn excluded_node_children_are_still_audited() {
        let tree = project(vec![node(
            "com.example:ignored:LATEST",
            "compile",
            vec![leaf("org.other:lib:RELEASE", "compile")],
        )]);
        let report = audit(&tree, &policy_with_ignores(&["com.example"]));

        assert_eq!(report.violation_count(), 1);
        let v = &report.violations[0];
        assert_eq!(v.dependency().coordinate.artifact, "lib");
        assert_eq!(
            v.dump_path().as_deref(),
            Some("com.example:ignored:jar:LATEST")
        );
    }

    #[test]
    fn banned_node_subtree_is_not_descended() {
        let tree = project(vec![node(
            "com.example:a:LATEST",
            "compile",
            vec![leaf("com.example:b:RELEASE", "compile")],
        )]);
        let report = audit(&tree, &DynamicVersionPolicy::default());
        assert_eq!(report.violation_count(), 1);
        assert_eq!(report.violations[0].dependency().coordinate.artifact, "a");
        assert_eq!(report.nodes_visited, 1);
    }

    #[test]
    fn sibling_violations_do_not_leak_into_each_other_paths() {
        let tree = project(vec![node(
            "com.example:a:1.0",
            "compile",
            vec![
                leaf("com.example:b:LATEST", "compile"),
                leaf("com.example:c:1.0-SNAPSHOT", "compile"),
                node(
                    "com.example:d:1.0",
                    "compile",
                    vec![leaf("com.example:e:RELEASE", "compile")],
                ),
            ],
        )]);
        let report = audit(&tree, &DynamicVersionPolicy::default());

        let paths: Vec<(String, Option<String>)> = report
            .violations
            .iter()
            .map(|v| (v.dependency().coordinate.artifact.clone(), v.dump_path()))
            .collect();
        assert_eq!(
            paths,
            vec![
                ("b".to_string(), Some("com.example:a:jar:1.0".to_string())),
                ("c".to_string(), Some("com.example:a:jar:1.0".to_string())),
                (
                    "e".to_string(),
                    Some("com.example:a:jar:1.0 -> com.example:d:jar:1.0".to_string())
                ),
            ]
        );
    }

    #[test]
    fn excluded_scopes_and_optionals_apply_to_direct_dependencies() {
        let tree = project(vec![
            leaf("com.example:t:LATEST", "test"),
            optional_leaf("com.example:o:LATEST", "compile"),
            leaf("com.example:c:LATEST", "compile"),
        ]);
        let policy = DynamicVersionPolicy {
            excluded_scopes: vec!["test".to_string()],
            exclude_optionals: true,
            ..Default::default()
        };
        let report = audit(&tree, &policy);
        assert_eq!(report.violation_count(), 1);
        assert_eq!(report.violations[0].dependency().coordinate.artifact, "c");
    }

    #[test]
    fn unrecognized_constraint_is_counted_not_reported() {
        let tree = project(vec![leaf("com.example:foo:[1.0", "compile")]);
        let report = audit(&tree, &DynamicVersionPolicy::default());
        assert!(report.is_clean());
        assert_eq!(report.unrecognized_constraints, 1);
    }

    #[test]
    fn allow_everything_passes_dynamic_tree() {
        let tree = project(vec![
            leaf("g:a:LATEST", "compile"),
            leaf("g:b:RELEASE", "compile"),
            leaf("g:c:1-SNAPSHOT", "compile"),
            leaf("g:d:(,2.0]", "compile"),
        ]);
        assert!(audit(&tree, &allow_everything()).is_clean());
    }

    #[test]
    fn invalid_policy_fails_before_resolution() {
        let resolver = FixedResolver {
            tree: project(vec![]),
            calls: Cell::new(0),
        };
        let policy = policy_with_ignores(&["a:b:c:d:e:f:g"]);
        let err = run_audit(&resolver, &CollectRequest::default(), &policy)
            .expect_err("invalid pattern");
        assert!(matches!(
            err,
            AuditError::Configuration(ConfigError::InvalidPattern { .. })
        ));
        assert_eq!(resolver.calls.get(), 0);

        let policy = DynamicVersionPolicy {
            excluded_scopes: vec!["testing".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            Auditor::new(&policy),
            Err(AuditError::Configuration(ConfigError::UnknownScope(s))) if s == "testing"
        ));
    }

    #[test]
    fn resolution_failure_names_the_root() {
        let auditor = Auditor::new(&DynamicVersionPolicy::default()).expect("policy");
        let root = Coordinate::parse("com.example:project:1.0").expect("coords");
        let err = auditor.run(&FailingResolver, Some(root)).expect_err("failure");
        assert_eq!(
            err.to_string(),
            "could not retrieve dependency metadata for com.example:project:jar:1.0"
        );
        assert_eq!(
            std::error::Error::source(&err).map(ToString::to_string).as_deref(),
            Some("repository unreachable")
        );
    }

    #[test]
    fn run_applies_selector_to_transitive_dependencies() {
        let tree = project(vec![node(
            "com.example:a:1.0",
            "compile",
            vec![leaf("com.example:b:LATEST", "test")],
        )]);
        let resolver = FixedResolver {
            tree,
            calls: Cell::new(0),
        };
        let policy = DynamicVersionPolicy {
            excluded_scopes: vec!["test".to_string()],
            ..Default::default()
        };
        let report = Auditor::new(&policy)
            .expect("policy")
            .run(&resolver, None)
            .expect("run");
        assert!(report.is_clean());
        assert_eq!(report.nodes_visited, 1);
        assert_eq!(resolver.calls.get(), 1);
        assert_eq!(
            report.root.map(|c| c.to_string()).as_deref(),
            Some("com.example:project:jar:1.0")
        );
    }

    #[test]
    fn repeated_audits_are_identical() {
        let tree = project(vec![
            leaf("g:a:LATEST", "compile"),
            node("g:b:1", "compile", vec![leaf("g:c:[1,2)", "runtime")]),
        ]);
        let auditor = Auditor::new(&DynamicVersionPolicy::default()).expect("policy");
        let first = auditor.audit(&tree);
        let second = auditor.audit(&tree);
        assert_eq!(first, second);
        assert_eq!(first.render_message(), second.render_message());
    }
}
