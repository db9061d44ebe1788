use std::collections::BTreeMap;
use webwriter_common::CssConfig;
use webwriter_css_syntax::{
    parse_value_definition, CacheEntry, CacheKey, DefinitionCache, DefinitionKind, PropertySpec,
    PropertyTable, ValueDefinition,
};
use webwriter_parser::{ParseError, Quantifier};

fn assert_raw_matches(source: &str, def: &ValueDefinition) {
    assert_eq!(&source[def.span.clone()], def.raw, "raw of {:?}", def.kind);
    for child in def.children() {
        assert_raw_matches(source, child);
    }
}

fn properties(entries: &[(&str, &str)]) -> BTreeMap<String, PropertySpec> {
    entries
        .iter()
        .map(|(name, syntax)| {
            (
                name.to_string(),
                PropertySpec {
                    syntax: syntax.to_string(),
                    forbidden_idents: Vec::new(),
                },
            )
        })
        .collect()
}

#[test]
fn test_comma_separated_data_type() {
    let def = parse_value_definition("<length>#", None, None).expect("Failed to parse");

    let DefinitionKind::DataType { name, range } = &def.kind else {
        panic!("expected data type, got {:?}", def.kind);
    };
    assert_eq!(name, "length");
    assert!(range.is_none());
    assert_eq!(def.quantifier, Quantifier::ONE_OR_MORE);
    assert_eq!(def.separator, Some(','));
}

#[test]
fn test_bounded_group() {
    let def = parse_value_definition("[ <length> | auto ]{1,4}", None, None).expect("Failed to parse");

    let DefinitionKind::Alternation { content } = &def.kind else {
        panic!("expected alternation, got {:?}", def.kind);
    };
    assert_eq!(content.len(), 2);
    assert_eq!(def.quantifier, Quantifier::bounded(1, 4).expect("valid"));
}

#[test]
fn test_raw_matches_source_at_every_level() {
    let sources = [
        "<bg-image> || <bg-position> [ / <bg-size> ]? || <repeat-style> || <attachment>",
        "repeat( [ <integer [1,∞]> ] , [ <line-names>? <track-size> ]+ <line-names>? )",
        "normal | [ stylistic( <feature-value-name> ) || styleset( <feature-value-name># ) ]",
        "inset? && <length>{2,4} && <color>?",
        "[ <length-percentage>+ ]#{1,2}",
    ];
    for source in sources {
        let def = parse_value_definition(source, None, None).expect("Failed to parse");
        assert_raw_matches(source, &def);
    }
}

#[test]
fn test_precedence_of_combinators() {
    let def = parse_value_definition("a b | c && d || e", None, None).expect("Failed to parse");
    let DefinitionKind::Alternation { content } = &def.kind else {
        panic!("expected alternation");
    };
    assert!(matches!(content[0].kind, DefinitionKind::OrderedSequence { .. }));
    let DefinitionKind::Subset { content: subset } = &content[1].kind else {
        panic!("expected subset");
    };
    assert!(matches!(subset[0].kind, DefinitionKind::UnorderedSequence { .. }));
}

#[test]
fn test_inverted_range_is_rejected() {
    let result = parse_value_definition("<integer>{5,2}", None, None);
    assert!(matches!(
        result,
        Err(ParseError::QuantifierRange { min: 5, max: 2, .. })
    ));
}

#[test]
fn test_required_group() {
    let def = parse_value_definition("[ a? b? ]!", None, None).expect("Failed to parse");
    assert!(def.required);
    assert!(matches!(def.kind, DefinitionKind::OrderedSequence { .. }));
}

#[test]
fn test_quoted_literals_and_delimiters() {
    let def = parse_value_definition("<keyframe-selector># '{' <declaration-list> '}'", None, None)
        .expect("Failed to parse");
    let DefinitionKind::OrderedSequence { content } = &def.kind else {
        panic!("expected sequence");
    };
    assert!(matches!(&content[1].kind, DefinitionKind::String { content } if content == "{"));
    assert!(matches!(&content[3].kind, DefinitionKind::String { content } if content == "}"));
}

#[test]
fn test_canonical_form_reparses_identically() {
    let source = "[ <length> | auto ]{1,4} && [ a || b ]";
    let def = parse_value_definition(source, None, None).expect("Failed to parse");
    let canonical = def.to_string();
    let reparsed = parse_value_definition(&canonical, None, None).expect("Failed to reparse");
    assert_eq!(reparsed.to_string(), canonical);
}

#[test]
fn test_self_referential_property_terminates() {
    let table = PropertyTable::build(
        properties(&[("nested", "none | <'nested'> <'outer'>?"), ("outer", "<'nested'>#")]),
        BTreeMap::new(),
        &CssConfig::default(),
    );

    assert!(table.errors().is_empty());
    assert!(table.definition("nested").is_some());
    assert!(table.definition("outer").is_some());
    assert_eq!(table.cache().len(), 2);
}

#[test]
fn test_each_name_gets_one_entry() {
    let mut cache = DefinitionCache::new();
    let key = CacheKey::syntax("shadow");
    cache.set(key.clone(), CacheEntry::InProgress);
    parse_value_definition(
        "<shadow> , <shadow> | <length> <length>",
        Some(&mut cache),
        Some(key.clone()),
    )
    .expect("Failed to parse");

    assert_eq!(cache.len(), 2);
    assert!(cache.definition(&key).is_some());
    assert_eq!(cache.pending(), vec![&CacheKey::syntax("length")]);
}

#[test]
fn test_standard_table() {
    let table = PropertyTable::standard();

    assert!(table.errors().is_empty(), "failures: {:?}", table.errors());
    for property in ["width", "background", "transform", "grid-template-columns", "animation"] {
        assert!(table.definition(property).is_some(), "missing {}", property);
    }
    assert!(table.syntax_definition("length-percentage").is_some());
    assert_eq!(
        table.cache().get(&CacheKey::syntax("length")),
        Some(&CacheEntry::Basic)
    );
    assert!(table.forbidden_idents("animation-name").contains(&"none".to_string()));
}

#[test]
fn test_diagnostics_off_parses_what_properties_reach() {
    let config = CssConfig {
        startup_diagnostics: false,
        ..CssConfig::default()
    };
    let table = PropertyTable::from_json(
        r#"{ "width": { "syntax": "auto | <length-percentage>" } }"#,
        r#"{
            "length-percentage": { "syntax": "<length> | <percentage>" },
            "unused": { "syntax": "[ broken" }
        }"#,
        &config,
    )
    .expect("valid json");

    assert!(table.errors().is_empty());
    assert!(table.syntax_definition("length-percentage").is_some());
    assert!(table.cache().get(&CacheKey::syntax("unused")).is_none());
}
