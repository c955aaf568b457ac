use camino::{Utf8Path, Utf8PathBuf};
use pinguard_domain::model::DEFAULT_EXTENSION;
use pinguard_domain::{
    CollectRequest, Coordinate, Dependency, DependencyNode, DependencyResolver, ResolutionError,
};
use serde::Deserialize;

const DEFAULT_SCOPE: &str = "compile";

/// Deepest tree accepted, counting the root as level 1.
pub const MAX_TREE_DEPTH: usize = 256;

/// One node of the tree document, as written by the build tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeNodeDto {
    group_id: String,
    artifact_id: String,
    version: String,
    #[serde(default, rename = "type")]
    extension: Option<String>,
    #[serde(default)]
    classifier: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    children: Vec<TreeNodeDto>,
}

impl TreeNodeDto {
    fn into_node(self, is_root: bool) -> Result<DependencyNode, ResolutionError> {
        if self.group_id.trim().is_empty() || self.artifact_id.trim().is_empty() {
            return Err(ResolutionError::new(format!(
                "tree node '{}:{}:{}' is missing groupId or artifactId",
                self.group_id, self.artifact_id, self.version
            )));
        }

        let coordinate = Coordinate {
            group: self.group_id,
            artifact: self.artifact_id,
            extension: non_empty(self.extension).unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
            classifier: self.classifier.unwrap_or_default(),
            version: self.version,
        };
        let scope = if is_root {
            self.scope.unwrap_or_default()
        } else {
            non_empty(self.scope).unwrap_or_else(|| DEFAULT_SCOPE.to_string())
        };
        let dependency = Dependency::new(coordinate, &scope).optional(self.optional);

        let children = self
            .children
            .into_iter()
            .map(|child| child.into_node(false))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DependencyNode::new(dependency, children))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Deepest `{`/`[` nesting in a JSON text, stopping early once `limit` is passed.
fn json_nesting(text: &str, limit: usize) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
                if deepest > limit {
                    break;
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Parse a tree document. Selectors are not applied.
///
/// Each tree level takes two JSON levels (the node object and its `children`
/// array), so serde_json's own recursion limit is replaced by [`MAX_TREE_DEPTH`].
pub fn parse_tree_json(text: &str) -> Result<DependencyNode, ResolutionError> {
    let max_nesting = 2 * MAX_TREE_DEPTH;
    if json_nesting(text, max_nesting) > max_nesting {
        return Err(ResolutionError::new(format!(
            "dependency tree is nested deeper than {MAX_TREE_DEPTH} levels"
        )));
    }

    let invalid = |e: serde_json::Error| ResolutionError::with_source("invalid dependency tree document", e);
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let dto = TreeNodeDto::deserialize(&mut de).map_err(invalid)?;
    de.end().map_err(invalid)?;
    dto.into_node(true)
}

/// Resolver backed by a JSON tree exported by the build tool.
#[derive(Clone, Debug)]
pub struct TreeFileResolver {
    path: Utf8PathBuf,
}

impl TreeFileResolver {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn load(&self) -> Result<DependencyNode, ResolutionError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            ResolutionError::with_source(format!("read dependency tree {}", self.path), e)
        })?;
        parse_tree_json(&text).map_err(|e| {
            ResolutionError::with_source(format!("parse dependency tree {}", self.path), e)
        })
    }
}

impl DependencyResolver for TreeFileResolver {
    fn collect(&self, request: &CollectRequest) -> Result<DependencyNode, ResolutionError> {
        let tree = self.load()?;

        if let Some(expected) = &request.root {
            let actual = tree.coordinate();
            if !actual.same_artifact(expected) || actual.version != expected.version {
                return Err(ResolutionError::new(format!(
                    "dependency tree {} is rooted at {actual}, expected {expected}",
                    self.path
                )));
            }
        }

        let tree = request.selector.prune(tree);
        tracing::debug!(
            nodes = tree.descendant_count(),
            "Loaded dependency tree for {}",
            tree.dependency.coordinate
        );
        Ok(tree)
    }
}
