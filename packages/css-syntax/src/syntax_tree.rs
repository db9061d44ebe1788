use std::ops::Range;
use webwriter_parser::Quantifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    Literal,
    String,
    DataType,
    PropertyReference,
    FunctionCall,
    /// `[ ... ]` carrying the multiplier that applies to its single child
    Group,
    OrderedSequence,
    UnorderedSequence,
    Subset,
    Alternation,
}

impl SyntaxKind {
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            SyntaxKind::Literal
                | SyntaxKind::String
                | SyntaxKind::DataType
                | SyntaxKind::PropertyReference
        )
    }
}

/// Multiplier suffix of a term: quantifier, `#` separator and `!` marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Multiplier {
    pub quantifier: Quantifier,
    pub separator: Option<char>,
    pub required: bool,
}

impl Multiplier {
    pub fn is_default(&self) -> bool {
        self.quantifier.is_default() && self.separator.is_none() && !self.required
    }
}

/// Concrete syntax tree of a value definition
///
/// `span` covers the node including its multiplier. `name` holds the
/// identifier of leaves and function calls.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub span: Range<usize>,
    pub name: Option<String>,
    pub multiplier: Multiplier,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: SyntaxKind, span: Range<usize>) -> Self {
        Self {
            kind,
            span,
            name: None,
            multiplier: Multiplier::default(),
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    /// Depth-first walk calling `enter` before and `leave` after a node's
    /// children. Children are skipped when `enter` returns false.
    pub fn walk<V: SyntaxVisitor>(&self, visitor: &mut V) {
        if visitor.enter(self) {
            for child in &self.children {
                child.walk(visitor);
            }
        }
        visitor.leave(self);
    }
}

pub trait SyntaxVisitor {
    fn enter(&mut self, node: &SyntaxNode) -> bool;

    fn leave(&mut self, _node: &SyntaxNode) {}
}
