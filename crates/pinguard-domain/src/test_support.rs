use crate::model::{Coordinate, Dependency, DependencyNode};
use crate::policy::DynamicVersionPolicy;

pub fn dependency(coords: &str, scope: &str) -> Dependency {
    let coordinate = Coordinate::parse(coords).expect("test coordinates");
    Dependency::new(coordinate, scope)
}

pub fn node(coords: &str, scope: &str, children: Vec<DependencyNode>) -> DependencyNode {
    DependencyNode::new(dependency(coords, scope), children)
}

pub fn leaf(coords: &str, scope: &str) -> DependencyNode {
    node(coords, scope, Vec::new())
}

pub fn optional_leaf(coords: &str, scope: &str) -> DependencyNode {
    DependencyNode::new(dependency(coords, scope).optional(true), Vec::new())
}

/// A project root with the given direct dependencies.
pub fn project(children: Vec<DependencyNode>) -> DependencyNode {
    node("com.example:project:1.0", "", children)
}

pub fn allow_everything() -> DynamicVersionPolicy {
    DynamicVersionPolicy {
        allow_snapshots: true,
        allow_latest: true,
        allow_release: true,
        allow_ranges: true,
        ..Default::default()
    }
}

pub fn policy_with_ignores(ignores: &[&str]) -> DynamicVersionPolicy {
    DynamicVersionPolicy {
        ignores: ignores.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}
