//! Arena-backed syntax tree
//!
//! Nodes live in a single `Vec` and refer to their children by [`NodeId`].
//! A node is never mutated once allocated: rewriting appends new nodes and
//! hands back their ids, so an id is a stable identity for the duration of a
//! traversal. Unreachable nodes are dropped by [`SyntaxTree::compact`].
//!
//! The tree is lossless. Concatenating every leaf's leading trivia, text and
//! trailing trivia in order reproduces the parsed source.

use std::fmt::{self, Write as _};

use biome_text_size::TextRange;

use super::kind::SyntaxKind;
use super::trivia::Trivia;

/// Index of a node in its [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Token payload: literal text plus the trivia around it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaf {
    pub text: String,
    pub leading: Trivia,
    pub trailing: Trivia,
    /// Source range of `text`; `None` for synthesized tokens
    pub range: Option<TextRange>,
}

impl Leaf {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_leading(mut self, trivia: Trivia) -> Self {
        self.leading = trivia;
        self
    }

    pub fn with_trailing(mut self, trivia: Trivia) -> Self {
        self.trailing = trivia;
        self
    }

    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = Some(range);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Element {
    Branch(Vec<NodeId>),
    Leaf(Leaf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeData {
    kind: SyntaxKind,
    element: Element,
}

/// Node arena with a designated root
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    root: Option<NodeId>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root of the tree. An arena that never had a root set reports a
    /// zero id, which callers only see on a tree they built by hand.
    pub fn root(&self) -> NodeId {
        self.root.unwrap_or(NodeId(0))
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// Number of nodes in the arena, reachable or not
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.nodes[id.index()].kind
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.index()].element, Element::Leaf(_))
    }

    /// Children of a branch; empty for leaves
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.index()].element {
            Element::Branch(children) => children,
            Element::Leaf(_) => &[],
        }
    }

    pub fn leaf(&self, id: NodeId) -> Option<&Leaf> {
        match &self.nodes[id.index()].element {
            Element::Leaf(leaf) => Some(leaf),
            Element::Branch(_) => None,
        }
    }

    /// Literal text of a leaf, empty for branches
    pub fn token_text(&self, id: NodeId) -> &str {
        self.leaf(id).map_or("", |leaf| leaf.text.as_str())
    }

    /// First child with the given kind
    pub fn child_of_kind(&self, id: NodeId, kind: SyntaxKind) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.kind(child) == kind)
    }

    pub fn alloc_leaf(&mut self, kind: SyntaxKind, leaf: Leaf) -> NodeId {
        self.alloc(NodeData {
            kind,
            element: Element::Leaf(leaf),
        })
    }

    pub fn alloc_node(&mut self, kind: SyntaxKind, children: Vec<NodeId>) -> NodeId {
        self.alloc(NodeData {
            kind,
            element: Element::Branch(children),
        })
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(data);
        id
    }

    /// Same kind, new children. Returns `id` itself when nothing changed.
    pub fn replace_children(&mut self, id: NodeId, children: Vec<NodeId>) -> NodeId {
        if self.children(id) == children.as_slice() {
            return id;
        }
        let kind = self.kind(id);
        self.alloc_node(kind, children)
    }

    /// Copy a leaf, edit the copy and allocate it. Branches come back as is.
    pub fn update_leaf(&mut self, id: NodeId, edit: impl FnOnce(&mut Leaf)) -> NodeId {
        let Some(leaf) = self.leaf(id) else {
            return id;
        };
        let mut leaf = leaf.clone();
        edit(&mut leaf);
        if self.leaf(id) == Some(&leaf) {
            return id;
        }
        let kind = self.kind(id);
        self.alloc_leaf(kind, leaf)
    }

    /// Rewrite the first leaf under `id`, copying the path down to it
    pub fn update_first_leaf(&mut self, id: NodeId, edit: impl FnOnce(&mut Leaf)) -> NodeId {
        self.update_edge_leaf(id, Edge::First, edit)
    }

    /// Rewrite the last leaf under `id`, copying the path down to it
    pub fn update_last_leaf(&mut self, id: NodeId, edit: impl FnOnce(&mut Leaf)) -> NodeId {
        self.update_edge_leaf(id, Edge::Last, edit)
    }

    fn update_edge_leaf(
        &mut self,
        id: NodeId,
        edge: Edge,
        edit: impl FnOnce(&mut Leaf),
    ) -> NodeId {
        if self.is_leaf(id) {
            return self.update_leaf(id, edit);
        }
        let mut children = self.children(id).to_vec();
        let position = match edge {
            Edge::First => children.iter().position(|&c| self.first_leaf(c).is_some()),
            Edge::Last => children.iter().rposition(|&c| self.last_leaf(c).is_some()),
        };
        let Some(position) = position else {
            return id;
        };
        children[position] = self.update_edge_leaf(children[position], edge, edit);
        self.replace_children(id, children)
    }

    pub fn leading_trivia(&self, id: NodeId) -> Option<&Trivia> {
        self.first_leaf(id)
            .and_then(|leaf| self.leaf(leaf))
            .map(|leaf| &leaf.leading)
    }

    pub fn trailing_trivia(&self, id: NodeId) -> Option<&Trivia> {
        self.last_leaf(id)
            .and_then(|leaf| self.leaf(leaf))
            .map(|leaf| &leaf.trailing)
    }

    pub fn first_leaf(&self, id: NodeId) -> Option<NodeId> {
        if self.is_leaf(id) {
            return Some(id);
        }
        self.children(id)
            .iter()
            .find_map(|&child| self.first_leaf(child))
    }

    pub fn last_leaf(&self, id: NodeId) -> Option<NodeId> {
        if self.is_leaf(id) {
            return Some(id);
        }
        self.children(id)
            .iter()
            .rev()
            .find_map(|&child| self.last_leaf(child))
    }

    /// Every node under `id` (inclusive), depth-first pre-order
    pub fn descendants(&self, id: NodeId) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![id],
        }
    }

    /// Leaves under `id`, left to right
    pub fn leaves(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(id).filter(|&node| self.is_leaf(node))
    }

    /// Source range covered by the parsed leaves under `id`
    pub fn range(&self, id: NodeId) -> Option<TextRange> {
        self.leaves(id)
            .filter_map(|leaf| self.leaf(leaf).and_then(|leaf| leaf.range))
            .reduce(TextRange::cover)
    }

    /// Lossless text of the subtree
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for leaf in self.leaves(id).filter_map(|leaf| self.leaf(leaf)) {
            let _ = write!(out, "{}{}{}", leaf.leading, leaf.text, leaf.trailing);
        }
        out
    }

    /// Copy the nodes reachable from the root into a fresh arena, in
    /// pre-order, and drop the rest.
    pub fn compact(&self) -> SyntaxTree {
        let mut compacted = SyntaxTree::new();
        let root = self.copy_into(self.root(), &mut compacted);
        compacted.set_root(root);
        compacted
    }

    fn copy_into(&self, id: NodeId, target: &mut SyntaxTree) -> NodeId {
        let data = &self.nodes[id.index()];
        match &data.element {
            Element::Leaf(leaf) => target.alloc_leaf(data.kind, leaf.clone()),
            Element::Branch(children) => {
                // Reserve the parent slot first so ids stay in pre-order.
                let slot = target.alloc_node(data.kind, Vec::new());
                let copied = children
                    .iter()
                    .map(|&child| self.copy_into(child, target))
                    .collect();
                target.nodes[slot.index()].element = Element::Branch(copied);
                slot
            }
        }
    }

    /// Drop every node allocated after the arena held `len` nodes
    pub(crate) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    /// Indented outline of kinds and token texts, for tests and `--debug`
    pub fn debug_dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    fn dump_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        match self.leaf(id) {
            Some(leaf) => {
                let _ = writeln!(out, "{indent}{} {:?}", self.kind(id), leaf.text);
            }
            None => {
                let _ = writeln!(out, "{indent}{}", self.kind(id));
                for &child in self.children(id) {
                    self.dump_into(child, depth + 1, out);
                }
            }
        }
    }

    /// Structural equality of two subtrees, ignoring ids and ranges
    pub fn same_shape(&self, a: NodeId, other: &SyntaxTree, b: NodeId) -> bool {
        if self.kind(a) != other.kind(b) {
            return false;
        }
        match (self.leaf(a), other.leaf(b)) {
            (Some(x), Some(y)) => {
                x.text == y.text && x.leading == y.leading && x.trailing == y.trailing
            }
            (None, None) => {
                let (xs, ys) = (self.children(a), other.children(b));
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .zip(ys)
                        .all(|(&x, &y)| self.same_shape(x, other, y))
            }
            _ => false,
        }
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nodes.is_empty() {
            return Ok(());
        }
        f.write_str(&self.text(self.root()))
    }
}

#[derive(Clone, Copy)]
enum Edge {
    First,
    Last,
}

/// Pre-order iterator over a subtree
pub struct Preorder<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::trivia::TriviaPiece;

    fn sample() -> SyntaxTree {
        let mut tree = SyntaxTree::new();
        let ret = tree.alloc_leaf(
            SyntaxKind::ReturnKw,
            Leaf::new("return").with_trailing(Trivia::spaces(1)),
        );
        let one = tree.alloc_leaf(SyntaxKind::IntegerLiteral, Leaf::new("1"));
        let expr = tree.alloc_node(SyntaxKind::SequenceExpr, vec![one]);
        let stmt = tree.alloc_node(SyntaxKind::ReturnStmt, vec![ret, expr]);
        let eof = tree.alloc_leaf(
            SyntaxKind::Eof,
            Leaf::new("").with_leading(Trivia::newlines(1)),
        );
        let root = tree.alloc_node(SyntaxKind::SourceFile, vec![stmt, eof]);
        tree.set_root(root);
        tree
    }

    #[test]
    fn test_text_is_lossless() {
        let tree = sample();
        assert_eq!(tree.to_string(), "return 1\n");
    }

    #[test]
    fn test_preorder() {
        let tree = sample();
        let kinds: Vec<_> = tree
            .descendants(tree.root())
            .map(|id| tree.kind(id))
            .collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::SourceFile,
                SyntaxKind::ReturnStmt,
                SyntaxKind::ReturnKw,
                SyntaxKind::SequenceExpr,
                SyntaxKind::IntegerLiteral,
                SyntaxKind::Eof,
            ]
        );
    }

    #[test]
    fn test_replace_children_reuses_unchanged_node() {
        let mut tree = sample();
        let root = tree.root();
        let children = tree.children(root).to_vec();
        let count = tree.node_count();
        assert_eq!(tree.replace_children(root, children), root);
        assert_eq!(tree.node_count(), count);
    }

    #[test]
    fn test_update_first_leaf_copies_path() {
        let mut tree = sample();
        let root = tree.root();
        let stmt = tree.children(root)[0];
        let new_stmt = tree.update_first_leaf(stmt, |leaf| {
            leaf.leading = Trivia::from_pieces([TriviaPiece::LineComment("// hi".into())]);
        });
        assert_ne!(new_stmt, stmt);
        assert_eq!(tree.text(new_stmt), "// hireturn 1");
        // The original subtree is untouched.
        assert_eq!(tree.text(stmt), "return 1");
    }

    #[test]
    fn test_compact_drops_garbage() {
        let mut tree = sample();
        let root = tree.root();
        let stmt = tree.children(root)[0];
        let eof = tree.children(root)[1];
        let renamed = tree.update_first_leaf(stmt, |leaf| leaf.text = "yield".into());
        let new_root = tree.replace_children(root, vec![renamed, eof]);
        tree.set_root(new_root);

        let compacted = tree.compact();
        assert_eq!(compacted.node_count(), 6);
        assert_eq!(compacted.root(), NodeId(0));
        assert_eq!(compacted.to_string(), "yield 1\n");
    }

    #[test]
    fn test_debug_dump() {
        let tree = sample();
        insta::assert_snapshot!(tree.debug_dump(tree.root()), @r###"
        SourceFile
          ReturnStmt
            ReturnKw "return"
            SequenceExpr
              IntegerLiteral "1"
          Eof ""
        "###);
    }
}
