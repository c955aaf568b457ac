//! Boundary towards the dependency resolver that produces the tree.

use crate::model::{Coordinate, Dependency, DependencyNode};
use std::collections::BTreeSet;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Failure reported by a resolver. Carried through unchanged; never retried here.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ResolutionError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl ResolutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Pruning the resolver applies while collecting the tree.
///
/// Scope and optional exclusions only apply to transitive dependencies (depth >= 2);
/// direct dependencies of the root are always kept and filtered by the auditor instead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencySelector {
    excluded_scopes: BTreeSet<String>,
    exclude_optionals: bool,
}

impl DependencySelector {
    pub fn new<I, S>(excluded_scopes: I, exclude_optionals: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded_scopes: excluded_scopes.into_iter().map(Into::into).collect(),
            exclude_optionals,
        }
    }

    /// `depth` is 1 for direct dependencies of the root.
    pub fn select(&self, dependency: &Dependency, depth: usize) -> bool {
        if depth < 2 {
            return true;
        }
        if self.excluded_scopes.contains(&dependency.scope) {
            return false;
        }
        !(self.exclude_optionals && dependency.optional)
    }

    /// Drop every deselected node together with its subtree.
    pub fn prune(&self, root: DependencyNode) -> DependencyNode {
        self.prune_children(root, 1)
    }

    fn prune_children(&self, mut node: DependencyNode, child_depth: usize) -> DependencyNode {
        node.children = std::mem::take(&mut node.children)
            .into_iter()
            .filter(|child| self.select(&child.dependency, child_depth))
            .map(|child| self.prune_children(child, child_depth + 1))
            .collect();
        node
    }
}

/// What to collect: the project root (if the caller knows it) and the selector to apply.
#[derive(Clone, Debug, Default)]
pub struct CollectRequest {
    pub root: Option<Coordinate>,
    pub selector: DependencySelector,
}

impl CollectRequest {
    /// Name used in error messages.
    pub fn root_label(&self) -> String {
        self.root
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "project".to_string())
    }
}

impl fmt::Display for CollectRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root_label())
    }
}

/// Produces an already-resolved dependency tree. Implementations own I/O and retries.
pub trait DependencyResolver {
    fn collect(&self, request: &CollectRequest) -> Result<DependencyNode, ResolutionError>;
}
