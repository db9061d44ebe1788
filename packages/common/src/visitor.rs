use webwriter_parser::ast::*;

/// Visitor pattern for traversing expression trees immutably
///
/// This trait provides default implementations that walk the entire tree.
/// Override specific visit_* methods to perform custom actions on nodes.
pub trait Visitor: Sized {
    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr);
    }

    fn visit_simple(&mut self, _simple: &SimpleExpression) {
        // Leaf node, no children to walk
    }

    fn visit_node(&mut self, node: &NodeExpression) {
        walk_node(self, node);
    }

    fn visit_sequence(&mut self, sequence: &CompositeExpression) {
        walk_composite(self, sequence);
    }

    fn visit_alternation(&mut self, alternation: &CompositeExpression) {
        walk_composite(self, alternation);
    }
}

/// Mutable visitor pattern for transforming expression trees
///
/// Similar to Visitor, but provides mutable access to nodes.
pub trait VisitorMut: Sized {
    fn visit_expression_mut(&mut self, expr: &mut Expression) {
        walk_expression_mut(self, expr);
    }

    fn visit_simple_mut(&mut self, _simple: &mut SimpleExpression) {
        // Leaf node, no children to walk
    }

    fn visit_node_mut(&mut self, node: &mut NodeExpression) {
        walk_node_mut(self, node);
    }

    fn visit_sequence_mut(&mut self, sequence: &mut CompositeExpression) {
        walk_composite_mut(self, sequence);
    }

    fn visit_alternation_mut(&mut self, alternation: &mut CompositeExpression) {
        walk_composite_mut(self, alternation);
    }
}

pub fn walk_expression<V: Visitor>(visitor: &mut V, expr: &Expression) {
    match expr {
        Expression::Simple(simple) => visitor.visit_simple(simple),
        Expression::Node(node) => visitor.visit_node(node),
        Expression::Sequence(sequence) => visitor.visit_sequence(sequence),
        Expression::Alternation(alternation) => visitor.visit_alternation(alternation),
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &NodeExpression) {
    if let Some(content) = &node.content {
        visitor.visit_expression(content);
    }
}

pub fn walk_composite<V: Visitor>(visitor: &mut V, composite: &CompositeExpression) {
    for child in &composite.content {
        visitor.visit_expression(child);
    }
}

pub fn walk_expression_mut<V: VisitorMut>(visitor: &mut V, expr: &mut Expression) {
    match expr {
        Expression::Simple(simple) => visitor.visit_simple_mut(simple),
        Expression::Node(node) => visitor.visit_node_mut(node),
        Expression::Sequence(sequence) => visitor.visit_sequence_mut(sequence),
        Expression::Alternation(alternation) => visitor.visit_alternation_mut(alternation),
    }
}

pub fn walk_node_mut<V: VisitorMut>(visitor: &mut V, node: &mut NodeExpression) {
    if let Some(content) = &mut node.content {
        visitor.visit_expression_mut(content);
    }
}

pub fn walk_composite_mut<V: VisitorMut>(visitor: &mut V, composite: &mut CompositeExpression) {
    for child in &mut composite.content {
        visitor.visit_expression_mut(child);
    }
}

/// Collects every leaf name referenced by an expression, in source order
#[derive(Debug, Default)]
pub struct ReferenceCollector {
    pub names: Vec<String>,
}

impl ReferenceCollector {
    pub fn collect(expr: &Expression) -> Vec<String> {
        let mut collector = Self::default();
        collector.visit_expression(expr);
        collector.names
    }
}

impl Visitor for ReferenceCollector {
    fn visit_simple(&mut self, simple: &SimpleExpression) {
        self.names.push(simple.content.clone());
    }

    fn visit_node(&mut self, node: &NodeExpression) {
        self.names.push(node.node.clone());
        walk_node(self, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webwriter_parser::{parse, Quantifier};

    #[test]
    fn test_collects_references_in_order() {
        let expr = parse("title (paragraph | figure)* footer").expect("Failed to parse");
        assert_eq!(
            ReferenceCollector::collect(&expr),
            vec!["title", "paragraph", "figure", "footer"]
        );
    }

    struct MakeOptional;

    impl VisitorMut for MakeOptional {
        fn visit_simple_mut(&mut self, simple: &mut SimpleExpression) {
            simple.quantifier = Quantifier::ZERO_OR_ONE;
        }
    }

    #[test]
    fn test_visitor_mut_rewrites_leaves() {
        let mut expr = parse("a b").expect("Failed to parse");
        MakeOptional.visit_expression_mut(&mut expr);
        for child in expr.children() {
            assert!(child.quantifier().is_optional());
        }
    }
}
