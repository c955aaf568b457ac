use crate::version::VersionConstraint;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_EXTENSION: &str = "jar";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid artifact coordinates '{text}', expected group:artifact[:type[:classifier]]:version")]
pub struct CoordinateParseError {
    pub text: String,
}

/// Artifact coordinates as reported by the resolver.
///
/// `version` is the constraint text exactly as requested (`1.0`, `[1.0,2.0)`, `LATEST`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub extension: String,
    pub classifier: String,
    pub version: String,
}

impl Coordinate {
    pub fn new(group: &str, artifact: &str, version: &str) -> Self {
        Self {
            group: group.to_string(),
            artifact: artifact.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            classifier: String::new(),
            version: version.to_string(),
        }
    }

    /// Parse `group:artifact[:type[:classifier]]:version`.
    pub fn parse(text: &str) -> Result<Self, CoordinateParseError> {
        let err = || CoordinateParseError {
            text: text.to_string(),
        };
        let parts: Vec<&str> = text.trim().split(':').collect();
        let (group, artifact, extension, classifier, version) = match parts.as_slice() {
            [g, a, v] => (*g, *a, DEFAULT_EXTENSION, "", *v),
            [g, a, t, v] => (*g, *a, *t, "", *v),
            [g, a, t, c, v] => (*g, *a, *t, *c, *v),
            _ => return Err(err()),
        };
        if group.is_empty() || artifact.is_empty() {
            return Err(err());
        }
        Ok(Self {
            group: group.to_string(),
            artifact: artifact.to_string(),
            extension: if extension.is_empty() {
                DEFAULT_EXTENSION.to_string()
            } else {
                extension.to_string()
            },
            classifier: classifier.to_string(),
            version: version.to_string(),
        })
    }

    /// Same group and artifact; version and packaging are ignored.
    pub fn same_artifact(&self, other: &Coordinate) -> bool {
        self.group == other.group && self.artifact == other.artifact
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.extension)?;
        if !self.classifier.is_empty() {
            write!(f, ":{}", self.classifier)?;
        }
        write!(f, ":{}", self.version)
    }
}

/// A coordinate together with how it is used: scope and optionality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dependency {
    pub coordinate: Coordinate,
    /// Empty for the tree root.
    pub scope: String,
    pub optional: bool,
}

impl Dependency {
    pub fn new(coordinate: Coordinate, scope: &str) -> Self {
        Self {
            coordinate,
            scope: scope.to_string(),
            optional: false,
        }
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}{})",
            self.coordinate,
            self.scope,
            if self.optional { "?" } else { "" }
        )
    }
}

/// One artifact occurrence in a resolved tree. Children are owned; there are no back-edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencyNode {
    pub dependency: Dependency,
    pub version_constraint: VersionConstraint,
    pub children: Vec<DependencyNode>,
}

impl DependencyNode {
    /// Build a node, deriving the constraint from the coordinate's version text.
    pub fn new(dependency: Dependency, children: Vec<DependencyNode>) -> Self {
        let version_constraint = VersionConstraint::from_resolver(&dependency.coordinate.version);
        Self {
            dependency,
            version_constraint,
            children,
        }
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.dependency.coordinate
    }

    /// Number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }
}
