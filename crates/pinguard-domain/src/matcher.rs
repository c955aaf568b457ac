//! Artifact exclusion patterns: `group[:artifact[:version[:type[:scope[:classifier]]]]]`.

use crate::error::ConfigError;
use crate::model::Dependency;
use crate::version::{Version, VersionConstraint, VersionRange};
use globset::{Glob, GlobMatcher};

const MAX_SEGMENTS: usize = 6;
const VERSION_SEGMENT: usize = 2;
const GLOB_META: [char; 5] = ['*', '?', '[', '{', '\\'];

#[derive(Clone, Debug)]
enum Segment {
    Any,
    Glob(GlobMatcher),
    Version(Version),
    Range(VersionRange),
}

impl Segment {
    fn matches(&self, value: &str) -> bool {
        match self {
            Segment::Any => true,
            Segment::Glob(glob) => glob.is_match(value),
            Segment::Version(version) => {
                if version.as_str() == value {
                    return true;
                }
                match VersionConstraint::from_resolver(value) {
                    VersionConstraint::Fixed(v) => v == *version,
                    _ => false,
                }
            }
            Segment::Range(range) => {
                if range.as_str() == value {
                    return true;
                }
                match VersionConstraint::from_resolver(value) {
                    VersionConstraint::Fixed(v) => range.contains(&v),
                    _ => false,
                }
            }
        }
    }
}

#[derive(Clone, Debug)]
struct ArtifactPattern {
    segments: Vec<Segment>,
}

impl ArtifactPattern {
    fn parse(pattern: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(invalid("pattern is empty".to_string()));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() > MAX_SEGMENTS {
            return Err(invalid(format!(
                "expected at most {MAX_SEGMENTS} ':'-separated segments, found {}",
                parts.len()
            )));
        }

        let mut segments = Vec::with_capacity(parts.len());
        for (idx, part) in parts.iter().enumerate() {
            let segment = if *part == "*" {
                Segment::Any
            } else if idx == VERSION_SEGMENT && part.starts_with(['[', '(']) {
                Segment::Range(VersionRange::parse(part).map_err(|e| invalid(e.to_string()))?)
            } else if idx == VERSION_SEGMENT && !part.is_empty() && !part.contains(GLOB_META) {
                Segment::Version(Version::new(*part))
            } else {
                let glob = Glob::new(part).map_err(|e| invalid(e.to_string()))?;
                Segment::Glob(glob.compile_matcher())
            };
            segments.push(segment);
        }

        Ok(Self { segments })
    }

    fn matches(&self, dependency: &Dependency) -> bool {
        let c = &dependency.coordinate;
        let fields = [
            c.group.as_str(),
            c.artifact.as_str(),
            c.version.as_str(),
            c.extension.as_str(),
            dependency.scope.as_str(),
            c.classifier.as_str(),
        ];
        self.segments
            .iter()
            .zip(fields)
            .all(|(segment, value)| segment.matches(value))
    }
}

/// Compiled list of exclusion patterns; a dependency is excluded when any pattern matches.
#[derive(Clone, Debug, Default)]
pub struct ArtifactMatcher {
    patterns: Vec<ArtifactPattern>,
}

impl ArtifactMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| ArtifactPattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, dependency: &Dependency) -> bool {
        self.patterns.iter().any(|p| p.matches(dependency))
    }
}
