//! Syntax tree arena.
//!
//! Nodes live in a single `Vec` and refer to each other by stable
//! [`NodeId`] indices: parent, previous/next sibling, first/last child.
//! Each node is simultaneously a member of its parent's ordered child
//! chain and the root of its own subtree. Linking happens only through
//! [`SyntaxTree::add`], [`SyntaxTree::insert`] and [`SyntaxTree::remove`];
//! detached nodes are never freed, they just become unreachable from the
//! parse result.

use vesper_lexer::{Bracket, Operator};

/// Structural violation of the tree invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("given node is not a child of this node")]
    NotAChild,

    #[error("insert position is not attached to any parent")]
    DetachedPosition,
}

/// Stable index of a node within its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a node represents.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Wrapper for a parse unit or a multi-statement section.
    Scope,
    /// A bracketed region; children are the parsed sections in order.
    Content(Bracket),
    Identifier(String),
    Number(f64),
    /// A binary operation; children are the left and right operands.
    Operator(Operator),
    /// Prefix `++`; single child is the operand.
    Increment,
    /// Prefix `--`; single child is the operand.
    Decrement,
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    previous: Option<NodeId>,
    next: Option<NodeId>,
    first: Option<NodeId>,
    last: Option<NodeId>,
}

/// Arena of syntax nodes.
#[derive(Debug, Default)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh, detached node.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            parent: None,
            previous: None,
            next: None,
            first: None,
            last: None,
        });
        id
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn previous(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].previous
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].next
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].first
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].last
    }

    /// Append `child` to the end of `parent`'s child chain.
    ///
    /// The child must be detached; re-parenting an attached node without
    /// removing it first corrupts its old chain, so that is the caller's
    /// responsibility.
    pub fn add(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.nodes[child.index()].parent.is_none(),
            "added node must be detached"
        );

        let last = self.nodes[parent.index()].last;

        let node = &mut self.nodes[child.index()];
        node.parent = Some(parent);
        node.previous = last;
        node.next = None;

        if let Some(last) = last {
            self.nodes[last.index()].next = Some(child);
        }

        let parent = &mut self.nodes[parent.index()];
        if parent.first.is_none() {
            parent.first = Some(child);
        }
        parent.last = Some(child);
    }

    /// Splice `child` into the chain immediately before `position`.
    ///
    /// The child inherits `position`'s parent and former left neighbor.
    /// Fails if `position` is detached.
    pub fn insert(&mut self, position: NodeId, child: NodeId) -> Result<(), TreeError> {
        let Some(parent) = self.nodes[position.index()].parent else {
            return Err(TreeError::DetachedPosition);
        };
        let left = self.nodes[position.index()].previous;

        let node = &mut self.nodes[child.index()];
        node.parent = Some(parent);
        node.previous = left;
        node.next = Some(position);

        self.nodes[position.index()].previous = Some(child);

        match left {
            Some(left) => self.nodes[left.index()].next = Some(child),
            None => self.nodes[parent.index()].first = Some(child),
        }

        Ok(())
    }

    /// Splice `child` out of `parent`'s chain and fully detach it.
    ///
    /// Fails before any mutation when `child` does not belong to `parent`.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if self.nodes[child.index()].parent != Some(parent) {
            return Err(TreeError::NotAChild);
        }

        let (left, right) = {
            let node = &self.nodes[child.index()];
            (node.previous, node.next)
        };

        match left {
            Some(left) => self.nodes[left.index()].next = right,
            None => self.nodes[parent.index()].first = right,
        }
        match right {
            Some(right) => self.nodes[right.index()].previous = left,
            None => self.nodes[parent.index()].last = left,
        }

        let node = &mut self.nodes[child.index()];
        node.parent = None;
        node.previous = None;
        node.next = None;

        Ok(())
    }

    /// The children of `parent`, in chain order.
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        Children {
            tree: self,
            cursor: self.nodes[parent.index()].first,
        }
    }

    pub fn child_count(&self, parent: NodeId) -> usize {
        self.children(parent).count()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Iterator over one node's child chain.
pub struct Children<'a> {
    tree: &'a SyntaxTree,
    cursor: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.cursor?;
        self.cursor = self.tree.nodes[id.index()].next;
        Some(id)
    }
}
