use std::collections::BTreeSet;
use std::fmt;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

/// Level of a node in the catalog hierarchy.
///
/// Never stored on the node: it follows from the number of parent hops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Root of one source location (depth 0)
    Catalog,
    /// Grouping of documents, e.g. a manual section (depth 1)
    Category,
    /// A single document (depth 2, leaf)
    Document,
}

impl NodeKind {
    pub fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            0 => Some(Self::Catalog),
            1 => Some(Self::Category),
            2 => Some(Self::Document),
            _ => None,
        }
    }

    /// Catalog and category nodes only organize, they have nothing to render.
    pub fn is_organizational(self) -> bool {
        !matches!(self, Self::Document)
    }
}

/// Data payload for catalog tree nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Display label
    pub title: String,
    /// Lookup key handed to the provider: location, category key or document id
    pub key: String,
    /// Alternate lookup keys for host-side search
    pub synonyms: BTreeSet<String>,
}

impl NodeData {
    pub fn catalog(location: &str) -> Self {
        Self {
            title: format!("Man pages: {location}"),
            key: location.to_string(),
            synonyms: BTreeSet::from(["man".to_string(), location.to_string()]),
        }
    }

    pub fn category(key: &str) -> Self {
        Self {
            title: format!("Section {key}"),
            key: key.to_string(),
            synonyms: BTreeSet::from([key.to_string()]),
        }
    }

    pub fn document(id: &str) -> Self {
        Self {
            title: id.to_string(),
            key: id.to_string(),
            synonyms: BTreeSet::new(),
        }
    }

    /// True if `needle` names this node by title, key or synonym.
    pub fn answers_to(&self, needle: &str) -> bool {
        self.title == needle || self.key == needle || self.synonyms.contains(needle)
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Catalog data for this node
    pub data: NodeData,
    /// Index of parent node in the arena, None for catalog roots
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    pub children: Vec<Index>,
}

/// Arena holding every catalog tree of one catalog.
///
/// Nodes reference each other by generational index, so a parent link can never
/// dangle and dropping the arena releases all trees at once.
#[derive(Debug, Default)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Root nodes in creation order
    roots: Vec<Index>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.roots.push(node_idx);
        }

        node_idx
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn parent(&self, idx: Index) -> Option<Index> {
        self.get_node(idx).and_then(|n| n.parent)
    }

    pub fn children(&self, idx: Index) -> &[Index] {
        self.get_node(idx)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Number of parent hops up to the root, None for unknown indices.
    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self, idx: Index) -> Option<usize> {
        let mut node = self.get_node(idx)?;
        let mut depth = 0;
        while let Some(parent_idx) = node.parent {
            node = self.get_node(parent_idx)?;
            depth += 1;
        }
        Some(depth)
    }

    pub fn kind(&self, idx: Index) -> Option<NodeKind> {
        self.depth(idx).and_then(NodeKind::from_depth)
    }

    /// Walks the parent chain to the owning root.
    #[instrument(level = "trace", skip(self))]
    pub fn root_of(&self, idx: Index) -> Option<Index> {
        let mut current = idx;
        loop {
            match self.get_node(current)?.parent {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    /// First child of `parent` answering to `needle`.
    pub fn find_child(&self, parent: Index, needle: &str) -> Option<Index> {
        self.children(parent).iter().copied().find(|&child| {
            self.get_node(child)
                .map(|n| n.data.answers_to(needle))
                .unwrap_or(false)
        })
    }

    /// Pre-order traversal of the tree below (and including) `start`.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self, start: Index) -> TreeIterator {
        TreeIterator::new(self, start)
    }

    /// Document titles below `start`, left to right.
    pub fn leaf_nodes(&self, start: Index) -> Vec<String> {
        self.iter(start)
            .filter(|(_, node)| node.children.is_empty() && node.parent.is_some())
            .map(|(_, node)| node.data.title.clone())
            .collect()
    }

    pub fn to_tree_string(&self, root: Index) -> Tree<String> {
        fn build_tree(arena: &TreeArena, node_idx: Index, parent_tree: &mut Tree<String>) {
            for &child_idx in arena.children(node_idx) {
                if let Some(child) = arena.get_node(child_idx) {
                    let mut child_tree = Tree::new(child.data.title.clone());
                    build_tree(arena, child_idx, &mut child_tree);
                    parent_tree.push(child_tree);
                }
            }
        }

        match self.get_node(root) {
            Some(node) => {
                let mut tree = Tree::new(node.data.title.clone());
                build_tree(self, root, &mut tree);
                tree
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena, start: Index) -> Self {
        Self {
            arena,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> (TreeArena, Index) {
        let mut arena = TreeArena::new();
        let root = arena.insert_node(NodeData::catalog("/usr/share/man"), None);
        let section = arena.insert_node(NodeData::category("1"), Some(root));
        arena.insert_node(NodeData::document("ls"), Some(section));
        arena.insert_node(NodeData::document("cat"), Some(section));
        (arena, root)
    }

    #[test]
    fn given_nodes_when_computing_kind_then_follows_depth() {
        let (arena, root) = small_tree();
        let section = arena.children(root)[0];
        let page = arena.children(section)[0];

        assert_eq!(arena.kind(root), Some(NodeKind::Catalog));
        assert_eq!(arena.kind(section), Some(NodeKind::Category));
        assert_eq!(arena.kind(page), Some(NodeKind::Document));
        assert_eq!(arena.root_of(page), Some(root));
    }

    #[test]
    fn given_tree_when_iterating_then_visits_left_to_right() {
        let (arena, root) = small_tree();

        let titles: Vec<_> = arena.iter(root).map(|(_, n)| n.data.title.clone()).collect();

        assert_eq!(
            titles,
            vec!["Man pages: /usr/share/man", "Section 1", "ls", "cat"]
        );
        assert_eq!(arena.leaf_nodes(root), vec!["ls", "cat"]);
    }

    #[test]
    fn given_category_synonym_when_finding_child_then_matches() {
        let (arena, root) = small_tree();

        assert!(arena.find_child(root, "1").is_some());
        assert!(arena.find_child(root, "Section 1").is_some());
        assert!(arena.find_child(root, "8").is_none());
    }

    #[test]
    fn given_tree_when_rendering_termtree_then_contains_all_titles() {
        let (arena, root) = small_tree();

        let rendered = arena.to_tree_string(root).to_string();

        assert!(rendered.starts_with("Man pages: /usr/share/man"));
        assert!(rendered.contains("Section 1"));
        assert!(rendered.contains("cat"));
    }
}
