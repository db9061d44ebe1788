use crate::quantifier::Quantifier;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Byte range into the parsed input
pub type Span = Range<usize>;

/// Parsed content expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Expression {
    /// A node-type or group name, not bound to a schema yet
    Simple(SimpleExpression),
    /// A name bound to a concrete node type by the resolver
    Node(NodeExpression),
    Sequence(CompositeExpression),
    /// Exactly one member matches
    Alternation(CompositeExpression),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleExpression {
    pub content: String,
    pub quantifier: Quantifier,
    pub raw: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeExpression {
    pub node: String,
    /// The node type's own content model, if it declares one
    pub content: Option<Box<Expression>>,
    pub quantifier: Quantifier,
    pub raw: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeExpression {
    pub content: Vec<Expression>,
    pub quantifier: Quantifier,
    pub raw: String,
    pub span: Span,
}

impl Expression {
    pub fn quantifier(&self) -> &Quantifier {
        match self {
            Expression::Simple(e) => &e.quantifier,
            Expression::Node(e) => &e.quantifier,
            Expression::Sequence(e) | Expression::Alternation(e) => &e.quantifier,
        }
    }

    pub fn quantifier_mut(&mut self) -> &mut Quantifier {
        match self {
            Expression::Simple(e) => &mut e.quantifier,
            Expression::Node(e) => &mut e.quantifier,
            Expression::Sequence(e) | Expression::Alternation(e) => &mut e.quantifier,
        }
    }

    /// Exact source text this expression was parsed from, quantifier included
    pub fn raw(&self) -> &str {
        match self {
            Expression::Simple(e) => &e.raw,
            Expression::Node(e) => &e.raw,
            Expression::Sequence(e) | Expression::Alternation(e) => &e.raw,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Expression::Simple(e) => &e.span,
            Expression::Node(e) => &e.span,
            Expression::Sequence(e) | Expression::Alternation(e) => &e.span,
        }
    }

    pub(crate) fn set_source(&mut self, raw: String, span: Span) {
        match self {
            Expression::Simple(e) => {
                e.raw = raw;
                e.span = span;
            }
            Expression::Node(e) => {
                e.raw = raw;
                e.span = span;
            }
            Expression::Sequence(e) | Expression::Alternation(e) => {
                e.raw = raw;
                e.span = span;
            }
        }
    }

    /// Leaf name: the referenced name of a simple expression or the bound node type
    pub fn name(&self) -> Option<&str> {
        match self {
            Expression::Simple(e) => Some(&e.content),
            Expression::Node(e) => Some(&e.node),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Expression] {
        match self {
            Expression::Simple(_) => &[],
            Expression::Node(e) => match &e.content {
                Some(child) => std::slice::from_ref(child.as_ref()),
                None => &[],
            },
            Expression::Sequence(e) | Expression::Alternation(e) => &e.content,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Expression::Sequence(_) | Expression::Alternation(_))
    }

    /// Pre-order listing of this expression and all descendants
    pub fn values(&self) -> Vec<&Expression> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            out.push(expr);
            stack.extend(expr.children().iter().rev());
        }
        out
    }
}
