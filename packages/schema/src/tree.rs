use std::ops::Index;
use webwriter_parser::{CompositeExpression, Expression, NodeExpression, Quantifier, SimpleExpression, Span};

/// Index of a node inside a `ResolvedTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedKind {
    /// Bound to a concrete node type. `recursive` marks a node type already
    /// being expanded further up, whose content is not expanded again.
    Node { node: String, recursive: bool },
    /// A name the schema does not know, kept as written
    Unresolved { name: String },
    Sequence,
    Alternation,
}

/// One node of a resolved content expression
///
/// `raw` and `span` refer to the text the node was parsed from: the resolved
/// expression for the root's subtree, or the content of the nearest enclosing
/// `Node` ancestor.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNode {
    pub kind: ResolvedKind,
    pub quantifier: Quantifier,
    pub raw: String,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl ResolvedNode {
    pub fn node_type(&self) -> Option<&str> {
        match &self.kind {
            ResolvedKind::Node { node, .. } => Some(node),
            _ => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self.kind, ResolvedKind::Unresolved { .. })
    }
}

/// Content expression bound to a schema
///
/// Nodes live in a flat arena; parents are stored as ids so upward lookups
/// never need owning back-references.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTree {
    nodes: Vec<ResolvedNode>,
}

impl ResolvedTree {
    pub(crate) fn from_nodes(nodes: Vec<ResolvedNode>) -> Self {
        Self { nodes }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> Option<&ResolvedNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    /// Parent, grandparent, and so on up to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Nearest enclosing node type
    pub fn enclosing_node(&self, id: NodeId) -> Option<&str> {
        self.ancestors(id)
            .find_map(|a| self.get(a).and_then(ResolvedNode::node_type))
    }

    /// Pre-order listing: the root followed by all descendants
    pub fn values(&self) -> Vec<&ResolvedNode> {
        self.preorder().into_iter().map(|id| &self[id]).collect()
    }

    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        if self.nodes.is_empty() {
            return out;
        }
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    /// Leaves whose names the schema does not know
    pub fn unresolved(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&id| self[id].is_unresolved())
            .collect()
    }

    /// Convert back to an expression tree
    pub fn to_expression(&self) -> Expression {
        self.expression_at(self.root())
    }

    fn expression_at(&self, id: NodeId) -> Expression {
        let node = &self[id];
        let quantifier = node.quantifier;
        let raw = node.raw.clone();
        let span = node.span.clone();
        let mut children = node.children.iter().map(|&c| self.expression_at(c));

        match &node.kind {
            ResolvedKind::Node { node, .. } => Expression::Node(NodeExpression {
                node: node.clone(),
                content: children.next().map(Box::new),
                quantifier,
                raw,
                span,
            }),
            ResolvedKind::Unresolved { name } => Expression::Simple(SimpleExpression {
                content: name.clone(),
                quantifier,
                raw,
                span,
            }),
            ResolvedKind::Sequence => Expression::Sequence(CompositeExpression {
                content: children.collect(),
                quantifier,
                raw,
                span,
            }),
            ResolvedKind::Alternation => Expression::Alternation(CompositeExpression {
                content: children.collect(),
                quantifier,
                raw,
                span,
            }),
        }
    }
}

impl Index<NodeId> for ResolvedTree {
    type Output = ResolvedNode;

    fn index(&self, id: NodeId) -> &ResolvedNode {
        &self.nodes[id.0]
    }
}
