// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Resolved syntax tree nodes.
//!
//! The tree keeps only what remapping needs: scope-introducing declarations
//! (types, methods, lambdas), identifier leaves ([`NodeKind::SimpleName`]) and
//! grouping nodes for everything else. Every node carries a [`NodeId`] unique
//! within its unit and the byte [`Span`] it covers in the unit's source text.
//!
//! Trees are usually produced by a front end. [`UnitBuilder`] builds a tree
//! and its source text together, which is how tests and small tools create
//! consistent units.

use serde::{Deserialize, Serialize};

use tugremap_core::patch::{apply_edits, EditResult, NodeId, RenameEdit, Span};

// ============================================================================
// Nodes
// ============================================================================

/// What a node represents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Root of a compilation unit.
    Unit,
    /// Class, interface, enum or record declaration.
    TypeDeclaration,
    /// Anonymous class body.
    AnonymousClass,
    /// Method or constructor declaration. Opens a parameter frame.
    MethodDeclaration,
    /// Lambda expression. Opens a parameter frame.
    LambdaExpression,
    /// Any other grouping: blocks, statements, expressions.
    Block,
    /// An identifier occurrence.
    SimpleName { identifier: String },
}

impl NodeKind {
    /// Whether entering this node opens a parameter frame.
    pub fn opens_frame(&self) -> bool {
        matches!(self, NodeKind::MethodDeclaration | NodeKind::LambdaExpression)
    }
}

/// A node of the resolved syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub span: Span,
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(id: NodeId, span: Span, kind: NodeKind) -> Self {
        Node {
            id,
            span,
            kind,
            children: Vec::new(),
        }
    }

    /// The identifier text of a [`NodeKind::SimpleName`] node.
    pub fn identifier(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::SimpleName { identifier } => Some(identifier),
            _ => None,
        }
    }

    /// Find a node by id in this subtree.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    /// A copy of this subtree with `edits` applied.
    ///
    /// Renamed identifiers take their new text and every span is shifted to
    /// match source text edited with the same edits. Edits naming nodes
    /// outside this subtree still shift spans that follow them.
    pub fn with_renames(&self, edits: &[RenameEdit]) -> Node {
        Node {
            id: self.id,
            span: Span::new(shift(self.span.start, edits), shift(self.span.end, edits)),
            kind: match &self.kind {
                NodeKind::SimpleName { identifier } => NodeKind::SimpleName {
                    identifier: edits
                        .iter()
                        .find(|edit| edit.node == self.id)
                        .map_or_else(|| identifier.clone(), |edit| edit.new_name.clone()),
                },
                kind => kind.clone(),
            },
            children: self
                .children
                .iter()
                .map(|child| child.with_renames(edits))
                .collect(),
        }
    }
}

/// Map a pre-edit offset to its post-edit position.
fn shift(offset: u64, edits: &[RenameEdit]) -> u64 {
    let delta: i64 = edits
        .iter()
        .filter(|edit| !edit.span.is_empty() && edit.span.end <= offset)
        .map(|edit| edit.new_name.len() as i64 - edit.span.len() as i64)
        .sum();
    (offset as i64 + delta).max(0) as u64
}

// ============================================================================
// Compilation Unit
// ============================================================================

/// One source file: its path, text and resolved tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub path: String,
    pub source: String,
    pub root: Node,
}

impl CompilationUnit {
    /// Find a node by id.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        self.root.find(id)
    }

    /// The unit after applying `edits` to both the source text and the tree.
    ///
    /// Node ids are preserved, so bindings keyed by node id stay valid.
    pub fn with_renames(&self, edits: &[RenameEdit]) -> EditResult<CompilationUnit> {
        let source = apply_edits(&self.source, edits)?;
        Ok(CompilationUnit {
            path: self.path.clone(),
            source,
            root: self.root.with_renames(edits),
        })
    }
}

// ============================================================================
// Unit Builder
// ============================================================================

/// Builds a [`CompilationUnit`] and its source text in one pass.
///
/// Text is appended in order; [`open`](Self::open) starts a node at the
/// current offset and [`close`](Self::close) ends the innermost open node
/// there. Node ids are allocated sequentially, the root being `node_0`.
///
/// ```ignore
/// let mut b = UnitBuilder::new("Foo.java");
/// b.text("class ");
/// let class_name = b.name("a");
/// b.text(" {}");
/// let unit = b.finish();
/// ```
#[derive(Debug)]
pub struct UnitBuilder {
    path: String,
    source: String,
    next_id: u32,
    open: Vec<Node>,
}

impl UnitBuilder {
    pub fn new(path: impl Into<String>) -> Self {
        UnitBuilder {
            path: path.into(),
            source: String::new(),
            next_id: 1,
            open: vec![Node::new(NodeId::new(0), Span::new(0, 0), NodeKind::Unit)],
        }
    }

    fn offset(&self) -> u64 {
        self.source.len() as u64
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn attach(&mut self, node: Node) {
        if let Some(parent) = self.open.last_mut() {
            parent.children.push(node);
        }
    }

    /// Append source text that belongs to no new node.
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.source.push_str(text);
        self
    }

    /// Append an identifier leaf under the innermost open node.
    pub fn name(&mut self, identifier: &str) -> NodeId {
        let id = self.allocate();
        let start = self.offset();
        self.source.push_str(identifier);
        let node = Node::new(
            id,
            Span::new(start, self.offset()),
            NodeKind::SimpleName {
                identifier: identifier.to_string(),
            },
        );
        self.attach(node);
        id
    }

    /// Start a node of `kind` at the current offset.
    pub fn open(&mut self, kind: NodeKind) -> NodeId {
        let id = self.allocate();
        let start = self.offset();
        self.open.push(Node::new(id, Span::new(start, start), kind));
        id
    }

    /// End the innermost open node at the current offset.
    ///
    /// The root stays open until [`finish`](Self::finish); closing it is a no-op.
    pub fn close(&mut self) -> &mut Self {
        if self.open.len() > 1 {
            if let Some(mut node) = self.open.pop() {
                node.span = Span::new(node.span.start, self.offset());
                self.attach(node);
            }
        }
        self
    }

    /// Close every open node and return the unit.
    pub fn finish(mut self) -> CompilationUnit {
        while self.open.len() > 1 {
            self.close();
        }
        let end = self.offset();
        let mut root = self
            .open
            .pop()
            .unwrap_or_else(|| Node::new(NodeId::new(0), Span::new(0, 0), NodeKind::Unit));
        root.span = Span::new(0, end);
        CompilationUnit {
            path: self.path,
            source: self.source,
            root,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
