//! Depth-first traversal of a resolved tree with an explicit ancestor path.

use crate::model::{Coordinate, DependencyNode};
use std::ops::{Deref, DerefMut};

/// What the walker does after a node has been entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitAction {
    /// Push the node onto the path and walk its children.
    Continue,
    /// Leave the node off the path and skip its subtree.
    SkipChildren,
}

pub trait DependencyVisitor<'t> {
    /// `path` holds the entered ancestors of `node`, root excluded.
    fn visit_enter(&mut self, node: &'t DependencyNode, path: &AncestorPath<'t>) -> VisitAction;

    fn visit_leave(&mut self, _node: &'t DependencyNode) {}
}

/// Ancestors of the node currently being visited, outermost first.
#[derive(Debug, Default)]
pub struct AncestorPath<'t> {
    nodes: Vec<&'t DependencyNode>,
}

impl<'t> AncestorPath<'t> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth a child of the innermost ancestor sits at (1 = direct dependency of the root).
    pub fn child_depth(&self) -> usize {
        self.nodes.len() + 1
    }

    pub fn nodes(&self) -> &[&'t DependencyNode] {
        &self.nodes
    }

    pub fn coordinates(&self) -> impl Iterator<Item = &'t Coordinate> + '_ {
        self.nodes.iter().map(|n| n.coordinate())
    }

    /// Push `node`; it is popped again when the returned frame drops.
    pub fn enter(&mut self, node: &'t DependencyNode) -> PathFrame<'_, 't> {
        self.nodes.push(node);
        PathFrame { path: self }
    }
}

/// Scope of one pushed node. Only frames pop, so a node is popped exactly once
/// and only if it was pushed.
pub struct PathFrame<'p, 't> {
    path: &'p mut AncestorPath<'t>,
}

impl<'t> Deref for PathFrame<'_, 't> {
    type Target = AncestorPath<'t>;

    fn deref(&self) -> &Self::Target {
        self.path
    }
}

impl DerefMut for PathFrame<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.path
    }
}

impl Drop for PathFrame<'_, '_> {
    fn drop(&mut self) {
        self.path.nodes.pop();
    }
}

/// Visit every node below `root` in document order. The root itself is neither
/// visited nor placed on the path.
pub fn walk<'t, V>(root: &'t DependencyNode, visitor: &mut V)
where
    V: DependencyVisitor<'t> + ?Sized,
{
    let mut path = AncestorPath::default();
    walk_children(root, &mut path, visitor);
}

fn walk_children<'t, V>(node: &'t DependencyNode, path: &mut AncestorPath<'t>, visitor: &mut V)
where
    V: DependencyVisitor<'t> + ?Sized,
{
    for child in &node.children {
        if visitor.visit_enter(child, path) == VisitAction::Continue {
            let mut frame = path.enter(child);
            walk_children(child, &mut frame, visitor);
        }
        visitor.visit_leave(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{leaf, node};

    #[derive(Default)]
    struct Recorder {
        entered: Vec<(String, Vec<String>)>,
        left: Vec<String>,
        skip: Vec<&'static str>,
    }

    impl<'t> DependencyVisitor<'t> for Recorder {
        fn visit_enter(&mut self, node: &'t DependencyNode, path: &AncestorPath<'t>) -> VisitAction {
            let name = node.coordinate().artifact.clone();
            let ancestors = path.coordinates().map(|c| c.artifact.clone()).collect();
            let action = if self.skip.iter().any(|s| *s == name) {
                VisitAction::SkipChildren
            } else {
                VisitAction::Continue
            };
            self.entered.push((name, ancestors));
            action
        }

        fn visit_leave(&mut self, node: &'t DependencyNode) {
            self.left.push(node.coordinate().artifact.clone());
        }
    }

    fn sample() -> DependencyNode {
        node(
            "g:root:1",
            "",
            vec![
                node(
                    "g:a:1",
                    "compile",
                    vec![leaf("g:b:1", "compile"), leaf("g:c:1", "compile")],
                ),
                node("g:d:1", "compile", vec![leaf("g:e:1", "compile")]),
            ],
        )
    }

    fn entered(rec: &Recorder) -> Vec<(&str, Vec<&str>)> {
        rec.entered
            .iter()
            .map(|(n, p)| (n.as_str(), p.iter().map(String::as_str).collect()))
            .collect()
    }

    #[test]
    fn root_is_not_visited_and_order_is_preserved() {
        let tree = sample();
        let mut rec = Recorder::default();
        walk(&tree, &mut rec);

        assert_eq!(
            entered(&rec),
            vec![
                ("a", vec![]),
                ("b", vec!["a"]),
                ("c", vec!["a"]),
                ("d", vec![]),
                ("e", vec!["d"]),
            ]
        );
        assert_eq!(rec.left, vec!["b", "c", "a", "e", "d"]);
    }

    #[test]
    fn skipped_nodes_are_not_pushed() {
        let tree = node(
            "g:root:1",
            "",
            vec![node(
                "g:a:1",
                "compile",
                vec![
                    node("g:b:1", "compile", vec![leaf("g:x:1", "compile")]),
                    leaf("g:c:1", "compile"),
                ],
            )],
        );
        let mut rec = Recorder {
            skip: vec!["b"],
            ..Default::default()
        };
        walk(&tree, &mut rec);

        assert_eq!(
            entered(&rec),
            vec![("a", vec![]), ("b", vec!["a"]), ("c", vec!["a"])]
        );
        assert_eq!(rec.left, vec!["b", "c", "a"]);
    }

    #[test]
    fn lone_root_visits_nothing() {
        let tree = leaf("g:root:1", "");
        let mut rec = Recorder::default();
        walk(&tree, &mut rec);
        assert!(rec.entered.is_empty());
        assert!(rec.left.is_empty());
    }

    #[test]
    fn frame_pops_on_drop() {
        let a = leaf("g:a:1", "compile");
        let b = leaf("g:b:1", "compile");
        let mut path = AncestorPath::default();
        {
            let mut outer = path.enter(&a);
            assert_eq!(outer.len(), 1);
            {
                let inner = outer.enter(&b);
                assert_eq!(inner.child_depth(), 3);
            }
            assert_eq!(outer.len(), 1);
        }
        assert!(path.is_empty());
    }
}
