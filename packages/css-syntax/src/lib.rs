pub mod builder;
pub mod cache;
pub mod definition;
pub mod parser;
pub mod properties;
pub mod syntax_tree;
pub mod tokenizer;

pub use builder::TreeBuilder;
pub use cache::{CacheEntry, CacheKey, DefinitionCache};
pub use definition::{DataRange, DefinitionKind, ValueDefinition};
pub use parser::{parse_syntax, SyntaxParser};
pub use properties::{PropertySpec, PropertyTable, SyntaxFailure, SyntaxSpec};
pub use syntax_tree::{Multiplier, SyntaxKind, SyntaxNode, SyntaxVisitor};

use tracing::debug;
use webwriter_parser::{Location, ParseError, ParseResult};

/// Parse CSS value definition syntax into a `ValueDefinition`
///
/// With a cache, every referenced data type and property is registered as a
/// pending entry, and the result is stored under `name`.
pub fn parse_value_definition(
    source: &str,
    mut cache: Option<&mut DefinitionCache>,
    name: Option<CacheKey>,
) -> ParseResult<ValueDefinition> {
    debug!(name = ?name, "parsing value definition");
    let tree = parse_syntax(source)?;

    let mut builder = TreeBuilder::new(source, cache.as_deref_mut());
    tree.walk(&mut builder);
    let mut root = builder.finish().ok_or_else(|| {
        ParseError::invalid_syntax(
            Location::from_span(source, 0..source.len()),
            "value definition is empty",
        )
    })?;

    if let Some(key) = name {
        root.name = Some(key.name().to_string());
        if let Some(cache) = cache {
            cache.fill(key, root.clone());
        }
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use webwriter_parser::Quantifier;

    #[test]
    fn test_group_multiplier_moves_to_content() {
        let def = parse_value_definition("[ <length> | auto ]{1,2}", None, None).expect("Failed to parse");
        assert!(matches!(def.kind, DefinitionKind::Alternation { .. }));
        assert_eq!(def.quantifier, Quantifier::bounded(1, 2).expect("valid"));
        assert_eq!(def.raw, "[ <length> | auto ]{1,2}");
    }

    #[test]
    fn test_group_around_multiplied_term_wraps() {
        let def = parse_value_definition("[ <length>+ ]#", None, None).expect("Failed to parse");
        let DefinitionKind::OrderedSequence { content } = &def.kind else {
            panic!("expected sequence, got {:?}", def.kind);
        };
        assert_eq!(def.separator, Some(','));
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].quantifier, Quantifier::ONE_OR_MORE);
    }

    #[test]
    fn test_data_type_range_is_split() {
        let def = parse_value_definition("<number [0,1]>", None, None).expect("Failed to parse");
        let DefinitionKind::DataType { name, range } = &def.kind else {
            panic!("expected data type");
        };
        assert_eq!(name, "number");
        assert_eq!(range.and_then(|r| r.max), Some(1.0));
    }

    #[test]
    fn test_named_root_fills_cache() {
        let mut cache = DefinitionCache::new();
        let key = CacheKey::property("width");
        let def = parse_value_definition("auto | <length-percentage>", Some(&mut cache), Some(key.clone()))
            .expect("Failed to parse");
        assert_eq!(def.name.as_deref(), Some("width"));
        assert!(cache.definition(&key).is_some());
        assert_eq!(
            cache.get(&CacheKey::syntax("length-percentage")),
            Some(&CacheEntry::Pending)
        );
    }
}
