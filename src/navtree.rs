//! Navigation tree construction.
//!
//! Turns the flat set of `(logical path, Metadata)` pairs collected during
//! scanning into an ordered tree mirroring the directory hierarchy:
//!
//! ```text
//! (root)
//! ├── intro                    nav_weight 10
//! ├── concepts                 nav_weight 20
//! │   ├── concepts/immutability    nav_weight 10
//! │   └── concepts/recursion       nav_weight 20
//! └── tooling                  nav_weight 30
//! ```
//!
//! ## Ordering
//!
//! Siblings sort by `nav_weight` ascending; ties break by full logical path,
//! lexicographic. The tie-break makes ordering deterministic across runs for
//! the same input set. Weights are compared only within a sibling group —
//! equal weights under different parents are unrelated.
//!
//! ## Synthetic nodes
//!
//! A page at `concepts/recursion` with no page at `concepts` still gets a
//! `concepts` node: metadata `None`, title taken from the path segment. Such
//! index-less sections participate in ordering with the default weight 0.
//!
//! ## Failure semantics
//!
//! Two pages mapping to the same logical path make sibling ordering
//! undefined, so construction fails fast with [`NavTreeError::DuplicatePage`]
//! and no partial tree is returned. Missing or malformed `nav_weight` is not
//! an error here; pages without one order at the effective weight 0.

use crate::frontmatter::Metadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavTreeError {
    #[error("duplicate page path: {0}")]
    DuplicatePage(String),
}

/// One node of the navigation tree.
///
/// The root node has an empty `segment` and `path`; it carries metadata only
/// if the content root itself has an index page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavNode {
    /// Last path segment (`recursion` for `concepts/recursion`).
    pub segment: String,
    /// Full logical path from the content root.
    pub path: String,
    /// Metadata of the page at this path, `None` for synthetic nodes.
    pub meta: Option<Metadata>,
    pub children: Vec<NavNode>,
}

impl NavNode {
    fn new(segment: &str, path: &str) -> Self {
        Self {
            segment: segment.to_string(),
            path: path.to_string(),
            meta: None,
            children: Vec::new(),
        }
    }

    /// Display title: `linkTitle`, then `title`, then the path segment.
    pub fn title(&self) -> &str {
        match &self.meta {
            Some(m) if !m.nav_title().is_empty() => m.nav_title(),
            _ => &self.segment,
        }
    }

    fn weight(&self) -> i64 {
        self.meta.as_ref().map(|m| m.weight()).unwrap_or(0)
    }

    /// Find the node at `path`, if any.
    pub fn find(&self, path: &str) -> Option<&NavNode> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(path))
    }

    /// Breadcrumb trail from the root down to `path`, as `(title, path)`
    /// pairs. The root itself is not included. Returns `None` when the path
    /// is not in the tree.
    pub fn breadcrumbs(&self, path: &str) -> Option<Vec<(String, String)>> {
        let mut trail = Vec::new();
        let mut node = self;
        'outer: while node.path != path {
            for child in &node.children {
                if child.path == path || path.starts_with(&format!("{}/", child.path)) {
                    trail.push((child.title().to_string(), child.path.clone()));
                    node = child;
                    continue 'outer;
                }
            }
            return None;
        }
        Some(trail)
    }

    /// Previous and next sibling of the node at `path`, in nav order.
    pub fn siblings(&self, path: &str) -> (Option<&NavNode>, Option<&NavNode>) {
        let Some(parent) = self.parent_of(path) else {
            return (None, None);
        };
        let Some(idx) = parent.children.iter().position(|c| c.path == path) else {
            return (None, None);
        };
        let prev = idx.checked_sub(1).map(|i| &parent.children[i]);
        let next = parent.children.get(idx + 1);
        (prev, next)
    }

    fn parent_of(&self, path: &str) -> Option<&NavNode> {
        if self.children.iter().any(|c| c.path == path) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.parent_of(path))
    }

    /// Depth-first traversal in nav order, excluding the root.
    pub fn walk(&self) -> Vec<&NavNode> {
        let mut nodes = Vec::new();
        fn recurse<'a>(node: &'a NavNode, out: &mut Vec<&'a NavNode>) {
            for child in &node.children {
                out.push(child);
                recurse(child, out);
            }
        }
        recurse(self, &mut nodes);
        nodes
    }
}

/// Build the navigation tree from collected `(path, Metadata)` pairs.
///
/// Fails fast on duplicate paths; otherwise always succeeds.
pub fn build(pages: &[(String, Metadata)]) -> Result<NavNode, NavTreeError> {
    let mut seen = BTreeSet::new();
    for (path, _) in pages {
        if !seen.insert(path.as_str()) {
            return Err(NavTreeError::DuplicatePage(path.clone()));
        }
    }

    let mut root = NavNode::new("", "");
    for (path, meta) in pages {
        if path.is_empty() {
            root.meta = Some(meta.clone());
            continue;
        }
        insert(&mut root, path, meta);
    }
    sort_children(&mut root);
    Ok(root)
}

fn insert(root: &mut NavNode, path: &str, meta: &Metadata) {
    let mut node = root;
    let mut walked = String::new();
    for segment in path.split('/') {
        if !walked.is_empty() {
            walked.push('/');
        }
        walked.push_str(segment);

        let pos = node.children.iter().position(|c| c.segment == segment);
        let idx = match pos {
            Some(i) => i,
            None => {
                node.children.push(NavNode::new(segment, &walked));
                node.children.len() - 1
            }
        };
        node = &mut node.children[idx];
    }
    node.meta = Some(meta.clone());
}

fn sort_children(node: &mut NavNode) {
    node.children
        .sort_by(|a, b| a.weight().cmp(&b.weight()).then(a.path.cmp(&b.path)));
    for child in &mut node.children {
        sort_children(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::Metadata;

    fn meta(title: &str, weight: i64) -> Metadata {
        Metadata {
            title: title.to_string(),
            nav_weight: Some(weight),
            ..Metadata::default()
        }
    }

    fn pages(entries: &[(&str, &str, i64)]) -> Vec<(String, Metadata)> {
        entries
            .iter()
            .map(|(path, title, weight)| (path.to_string(), meta(title, *weight)))
            .collect()
    }

    // =========================================================================
    // Ordering
    // =========================================================================

    #[test]
    fn siblings_ordered_by_nav_weight() {
        let tree = build(&pages(&[("a", "A", 10), ("b", "B", 5)])).unwrap();
        let titles: Vec<&str> = tree.children.iter().map(|c| c.title()).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[test]
    fn weight_ties_break_by_path() {
        let tree = build(&pages(&[("b", "B", 5), ("a", "A", 5)])).unwrap();
        let paths: Vec<&str> = tree.children.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "b"]);
    }

    #[test]
    fn ordering_is_deterministic_across_builds() {
        let input = pages(&[("c", "C", 5), ("a", "A", 5), ("b", "B", 5)]);
        let first = build(&input).unwrap();
        for _ in 0..5 {
            let again = build(&input).unwrap();
            let a: Vec<&str> = first.children.iter().map(|c| c.path.as_str()).collect();
            let b: Vec<&str> = again.children.iter().map(|c| c.path.as_str()).collect();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn negative_weights_sort_first() {
        let tree = build(&pages(&[("a", "A", 0), ("b", "B", -10)])).unwrap();
        assert_eq!(tree.children[0].path, "b");
    }

    #[test]
    fn nested_siblings_sorted_independently() {
        let tree = build(&pages(&[
            ("part/ch2", "Ch2", 20),
            ("part/ch1", "Ch1", 10),
            ("part", "Part", 1),
        ]))
        .unwrap();
        let part = tree.find("part").unwrap();
        let titles: Vec<&str> = part.children.iter().map(|c| c.title()).collect();
        assert_eq!(titles, vec!["Ch1", "Ch2"]);
    }

    // =========================================================================
    // Synthetic nodes
    // =========================================================================

    #[test]
    fn missing_intermediate_gets_synthetic_node() {
        let tree = build(&pages(&[("concepts/recursion", "Recursion", 10)])).unwrap();
        let concepts = tree.find("concepts").unwrap();
        assert!(concepts.meta.is_none());
        assert_eq!(concepts.title(), "concepts");
        assert_eq!(concepts.children.len(), 1);
    }

    #[test]
    fn synthetic_node_upgraded_when_page_arrives() {
        let tree = build(&pages(&[
            ("concepts/recursion", "Recursion", 10),
            ("concepts", "Concepts", 5),
        ]))
        .unwrap();
        let concepts = tree.find("concepts").unwrap();
        assert_eq!(concepts.title(), "Concepts");
        assert_eq!(concepts.children.len(), 1);
    }

    #[test]
    fn root_index_page_attaches_to_root() {
        let tree = build(&pages(&[("", "Home", 0), ("a", "A", 1)])).unwrap();
        assert_eq!(tree.meta.as_ref().unwrap().title, "Home");
        assert_eq!(tree.children.len(), 1);
    }

    // =========================================================================
    // Duplicates
    // =========================================================================

    #[test]
    fn duplicate_paths_abort() {
        let result = build(&pages(&[("a", "First", 1), ("a", "Second", 2)]));
        assert!(matches!(result, Err(NavTreeError::DuplicatePage(p)) if p == "a"));
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    #[test]
    fn breadcrumbs_walk_to_leaf() {
        let tree = build(&pages(&[
            ("part", "Part One", 1),
            ("part/ch1", "Chapter 1", 1),
            ("part/ch1/sec", "Section", 1),
        ]))
        .unwrap();
        let trail = tree.breadcrumbs("part/ch1/sec").unwrap();
        let titles: Vec<&str> = trail.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(titles, vec!["Part One", "Chapter 1", "Section"]);
    }

    #[test]
    fn breadcrumbs_missing_path_is_none() {
        let tree = build(&pages(&[("a", "A", 1)])).unwrap();
        assert!(tree.breadcrumbs("nope").is_none());
    }

    #[test]
    fn siblings_prev_next() {
        let tree = build(&pages(&[("a", "A", 1), ("b", "B", 2), ("c", "C", 3)])).unwrap();
        let (prev, next) = tree.siblings("b");
        assert_eq!(prev.unwrap().path, "a");
        assert_eq!(next.unwrap().path, "c");

        let (prev, next) = tree.siblings("a");
        assert!(prev.is_none());
        assert_eq!(next.unwrap().path, "b");

        let (prev, next) = tree.siblings("c");
        assert_eq!(prev.unwrap().path, "b");
        assert!(next.is_none());
    }

    #[test]
    fn walk_visits_in_nav_order() {
        let tree = build(&pages(&[
            ("b", "B", 2),
            ("a", "A", 1),
            ("a/inner", "Inner", 1),
        ]))
        .unwrap();
        let paths: Vec<&str> = tree.walk().iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "a/inner", "b"]);
    }
}
