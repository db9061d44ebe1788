use crate::ast::*;
use std::fmt::{self, Write};

/// Serializer converts an expression tree back to canonical source
///
/// Unlike `Expression::raw`, which keeps the author's spelling, the output is
/// normalized: single spaces between sequence items, parentheses only where
/// they are needed to reparse the same tree.
pub struct Serializer {
    alternation_separator: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            alternation_separator: " | ".to_string(),
        }
    }

    pub fn with_alternation_separator(separator: &str) -> Self {
        Self {
            alternation_separator: separator.to_string(),
        }
    }

    pub fn serialize(&self, expr: &Expression) -> String {
        let mut output = String::new();
        self.serialize_expression(expr, &mut output);
        output
    }

    fn serialize_expression(&self, expr: &Expression, output: &mut String) {
        match expr {
            Expression::Simple(s) => {
                let _ = write!(output, "{}{}", s.content, s.quantifier);
            }
            Expression::Node(n) => {
                let _ = write!(output, "{}{}", n.node, n.quantifier);
            }
            Expression::Sequence(c) | Expression::Alternation(c) => {
                let quantified = !c.quantifier.is_default();
                if quantified {
                    output.push('(');
                }
                self.serialize_members(expr, &c.content, output);
                if quantified {
                    let _ = write!(output, "){}", c.quantifier);
                }
            }
        }
    }

    fn serialize_members(&self, parent: &Expression, content: &[Expression], output: &mut String) {
        let separator = match parent {
            Expression::Alternation(_) => self.alternation_separator.as_str(),
            _ => " ",
        };

        for (i, child) in content.iter().enumerate() {
            if i > 0 {
                output.push_str(separator);
            }

            let bare = match child {
                Expression::Simple(_) | Expression::Node(_) => true,
                // Alternation binds tighter than sequence
                Expression::Alternation(_) => matches!(parent, Expression::Sequence(_)),
                Expression::Sequence(_) => false,
            };

            if bare || !child.quantifier().is_default() {
                self.serialize_expression(child, output);
            } else {
                output.push('(');
                self.serialize_expression(child, output);
                output.push(')');
            }
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Source text of an expression, exactly as it was written
pub fn serialize(expr: &Expression) -> String {
    expr.raw().to_string()
}

/// Canonical form, see [`Serializer`]
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Serializer::default().serialize(self))
    }
}
