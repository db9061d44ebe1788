/// Content expression resolution
///
/// Binds the leaves of a content expression to concrete node types of a
/// schema and expands each node type's own content beneath it.
use crate::schema::{ResolutionOutcome, Schema};
use crate::tree::{NodeId, ResolvedKind, ResolvedNode, ResolvedTree};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, instrument};
use webwriter_common::{CommonError, CommonResult, ResolverConfig};
use webwriter_parser::{parse, Expression, ParseError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Invalid content expression for node type '{node}': {source}")]
    NodeContent {
        node: String,
        #[source]
        source: ParseError,
    },

    #[error("Content of node type '{node}' is nested deeper than {max_depth} levels")]
    DepthExceeded { node: String, max_depth: usize },
}

impl From<ResolveError> for CommonError {
    fn from(e: ResolveError) -> Self {
        CommonError::Resolve(e.to_string())
    }
}

/// Resolves expressions against one schema
///
/// Parsed node contents are memoized per resolver, so reuse a resolver when
/// resolving many expressions against the same schema.
pub struct Resolver<'s> {
    schema: &'s Schema,
    config: ResolverConfig,
    contents: HashMap<String, Option<Expression>>,
}

impl<'s> Resolver<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self::with_config(schema, ResolverConfig::default())
    }

    pub fn with_config(schema: &'s Schema, config: ResolverConfig) -> Self {
        Self {
            schema,
            config,
            contents: HashMap::new(),
        }
    }

    #[instrument(level = "debug", skip_all, fields(expression = %expr.raw()))]
    pub fn resolve(&mut self, expr: &Expression) -> Result<ResolvedTree, ResolveError> {
        let mut nodes = Vec::new();
        let mut ancestors = Vec::new();
        self.resolve_into(&mut nodes, expr, None, &mut ancestors)?;
        Ok(ResolvedTree::from_nodes(nodes))
    }

    /// Map a leaf name to its node type, logging group tie-breaks
    pub fn lookup(&self, name: &str) -> ResolutionOutcome<'s> {
        let outcome = self.schema.lookup_with(name, self.config.group_tie_break);
        if let ResolutionOutcome::GroupAmbiguous {
            group,
            candidates,
            chosen,
        } = outcome
        {
            debug!(group, chosen, candidates = candidates.len(), "group resolved by tie-break");
        }
        outcome
    }

    fn resolve_into(
        &mut self,
        nodes: &mut Vec<ResolvedNode>,
        expr: &Expression,
        parent: Option<NodeId>,
        ancestors: &mut Vec<String>,
    ) -> Result<NodeId, ResolveError> {
        let id = NodeId::new(nodes.len());
        let kind = match expr {
            Expression::Simple(_) | Expression::Node(_) => {
                let name = expr.name().unwrap_or_default();
                match self.lookup(name).node() {
                    Some(node) => ResolvedKind::Node {
                        node: node.to_string(),
                        recursive: ancestors.iter().any(|a| a == node),
                    },
                    None => ResolvedKind::Unresolved {
                        name: name.to_string(),
                    },
                }
            }
            Expression::Sequence(_) => ResolvedKind::Sequence,
            Expression::Alternation(_) => ResolvedKind::Alternation,
        };

        nodes.push(ResolvedNode {
            kind: kind.clone(),
            quantifier: *expr.quantifier(),
            raw: expr.raw().to_string(),
            span: expr.span().clone(),
            parent,
            children: Vec::new(),
        });

        match kind {
            ResolvedKind::Node {
                node,
                recursive: false,
            } => {
                if let Some(content) = self.content_of(&node)? {
                    if ancestors.len() >= self.config.max_depth {
                        return Err(ResolveError::DepthExceeded {
                            node,
                            max_depth: self.config.max_depth,
                        });
                    }
                    ancestors.push(node);
                    let child = self.resolve_into(nodes, &content, Some(id), ancestors)?;
                    ancestors.pop();
                    nodes[id.index()].children.push(child);
                }
            }
            ResolvedKind::Node {
                node,
                recursive: true,
            } => {
                debug!(node = %node, "recursive content reference not expanded");
            }
            ResolvedKind::Sequence | ResolvedKind::Alternation => {
                for child in expr.children() {
                    let child = self.resolve_into(nodes, child, Some(id), ancestors)?;
                    nodes[id.index()].children.push(child);
                }
            }
            ResolvedKind::Unresolved { .. } => {}
        }

        Ok(id)
    }

    /// Parsed content expression of a node type
    fn content_of(&mut self, node: &str) -> Result<Option<Expression>, ResolveError> {
        if let Some(cached) = self.contents.get(node) {
            return Ok(cached.clone());
        }

        let content = match self.schema.get(node).and_then(|s| s.content_expression()) {
            Some(source) => Some(parse(source).map_err(|source| ResolveError::NodeContent {
                node: node.to_string(),
                source,
            })?),
            None => None,
        };
        self.contents.insert(node.to_string(), content.clone());
        Ok(content)
    }
}

/// Resolve an expression against a schema
pub fn resolve(schema: &Schema, expr: &Expression) -> Result<ResolvedTree, ResolveError> {
    Resolver::new(schema).resolve(expr)
}

/// Parse a content expression and resolve it against a schema
pub fn resolve_content(schema: &Schema, source: &str) -> CommonResult<ResolvedTree> {
    let expr = parse(source)?;
    Ok(Resolver::new(schema).resolve(&expr)?)
}

/// Pre-order listing of a resolved tree
pub fn values(tree: &ResolvedTree) -> Vec<&ResolvedNode> {
    tree.values()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::NodeSpec;

    fn schema() -> Schema {
        Schema::new()
            .with_node("doc", NodeSpec::new().with_content("heading block*"))
            .with_node("paragraph", NodeSpec::new().with_group("block").with_content("text*"))
            .with_node("blockquote", NodeSpec::new().with_group("block").with_content("block+"))
            .with_node("heading", NodeSpec::new().with_content("text*"))
            .with_node("text", NodeSpec::new().with_group("inline"))
    }

    #[test]
    fn test_node_content_becomes_single_child() {
        let schema = schema();
        let expr = parse("doc").expect("Failed to parse");
        let tree = resolve(&schema, &expr).expect("Failed to resolve");

        let root = &tree[tree.root()];
        assert_eq!(root.node_type(), Some("doc"));
        assert_eq!(root.children.len(), 1);

        let content = tree.children(tree.root())[0];
        assert_eq!(tree[content].kind, ResolvedKind::Sequence);
        assert_eq!(tree.parent(content), Some(tree.root()));
    }

    #[test]
    fn test_group_resolves_to_first_declared_member() {
        let schema = schema();
        let expr = parse("doc").expect("Failed to parse");
        let tree = resolve(&schema, &expr).expect("Failed to resolve");

        let bound: Vec<_> = tree.values().iter().filter_map(|n| n.node_type()).collect();
        assert_eq!(bound, vec!["doc", "heading", "text", "paragraph", "text"]);
    }

    #[test]
    fn test_recursive_group_terminates() {
        let schema = Schema::new()
            .with_node("blockquote", NodeSpec::new().with_group("block").with_content("block+"))
            .with_node("paragraph", NodeSpec::new().with_group("block"));
        let expr = parse("blockquote").expect("Failed to parse");
        let tree = resolve(&schema, &expr).expect("Failed to resolve");

        // blockquote > block+ resolves back to blockquote
        assert_eq!(tree.len(), 2);
        let child = tree.children(tree.root())[0];
        assert_eq!(
            tree[child].kind,
            ResolvedKind::Node {
                node: "blockquote".to_string(),
                recursive: true,
            }
        );
        assert_eq!(tree[child].raw, "block+");
    }

    #[test]
    fn test_self_reference_is_bound_but_not_expanded() {
        let schema = Schema::new()
            .with_node("list", NodeSpec::new().with_content("item+"))
            .with_node("item", NodeSpec::new().with_content("paragraph list?"))
            .with_node("paragraph", NodeSpec::new());
        let expr = parse("list").expect("Failed to parse");
        let tree = resolve(&schema, &expr).expect("Failed to resolve");

        let inner = tree
            .preorder()
            .into_iter()
            .find(|&id| matches!(tree[id].kind, ResolvedKind::Node { recursive: true, .. }))
            .expect("nested list should be marked recursive");
        assert_eq!(tree[inner].node_type(), Some("list"));
        assert!(tree[inner].children.is_empty());
        assert_eq!(tree.enclosing_node(inner), Some("item"));
    }

    #[test]
    fn test_invalid_node_content_is_reported() {
        let schema = Schema::new().with_node("broken", NodeSpec::new().with_content("a |"));
        let expr = parse("broken").expect("Failed to parse");
        let result = resolve(&schema, &expr);
        assert!(matches!(
            result,
            Err(ResolveError::NodeContent { ref node, .. }) if node == "broken"
        ));
    }

    #[test]
    fn test_depth_limit() {
        let schema = Schema::new()
            .with_node("a", NodeSpec::new().with_content("b"))
            .with_node("b", NodeSpec::new().with_content("c"))
            .with_node("c", NodeSpec::new().with_content("d"))
            .with_node("d", NodeSpec::new());
        let expr = parse("a").expect("Failed to parse");
        let config = ResolverConfig {
            max_depth: 2,
            ..ResolverConfig::default()
        };
        let result = Resolver::with_config(&schema, config).resolve(&expr);
        assert!(matches!(result, Err(ResolveError::DepthExceeded { max_depth: 2, .. })));
    }
}
