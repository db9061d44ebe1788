use webwriter_common::CssConfig;
use webwriter_css_syntax::PropertyTable;
use webwriter_css_value::{property_options, CssCompositeValue, Suggestion, ValueError, ValueMatcher};

fn table(properties: &str, syntaxes: &str) -> PropertyTable {
    PropertyTable::from_json(properties, syntaxes, &CssConfig::default()).expect("valid json")
}

fn keyword(k: &str) -> Suggestion {
    Suggestion::Keyword(k.to_string())
}

fn data_type(name: &str) -> Suggestion {
    Suggestion::DataType(name.to_string())
}

fn accepts(table: &PropertyTable, property: &str, css_text: &str) -> bool {
    let definition = table.definition(property).expect("known property");
    let values = CssCompositeValue::parse(css_text).expect("Failed to parse value");
    ValueMatcher::new(table.cache())
        .with_forbidden_idents(table.forbidden_idents(property))
        .matches(definition, values.values())
}

#[test]
fn test_alternation_yields_only_the_matched_branch() {
    let table = table(
        r#"{ "edge": { "syntax": "[ start <length> ] | [ end <percentage> ]" } }"#,
        "{}",
    );

    let options = property_options(&table, "edge", "start").expect("known property");
    assert_eq!(options, vec![data_type("length")]);

    let options = property_options(&table, "edge", "").expect("known property");
    assert_eq!(options, vec![keyword("start"), keyword("end")]);
}

#[test]
fn test_subset_offers_unconsumed_children() {
    let table = table(r#"{ "mix": { "syntax": "a || b || c" } }"#, "{}");

    let options = property_options(&table, "mix", "b").expect("known property");
    assert_eq!(options, vec![keyword("a"), keyword("c")]);

    let options = property_options(&table, "mix", "c a b").expect("known property");
    assert!(options.is_empty());
}

#[test]
fn test_unordered_sequence_requires_every_child() {
    let table = table(r#"{ "pair": { "syntax": "<length> && <color>" } }"#, "{}");

    assert!(accepts(&table, "pair", "2px red"));
    assert!(accepts(&table, "pair", "#fff 2px"));
    assert!(!accepts(&table, "pair", "2px"));
    assert_eq!(
        property_options(&table, "pair", "2px").expect("known property"),
        vec![data_type("color")]
    );
}

#[test]
fn test_recursive_syntaxes_terminate() {
    let table = table(
        r#"{
            "left": { "syntax": "<left-loop>" },
            "right": { "syntax": "<right-loop>" }
        }"#,
        r#"{
            "left-loop": { "syntax": "<left-loop> x | y" },
            "right-loop": { "syntax": "x <right-loop> | y" }
        }"#,
    );
    assert!(table.errors().is_empty());

    assert!(accepts(&table, "left", "y"));
    assert!(accepts(&table, "left", "y x"));
    assert!(accepts(&table, "left", "y x x x"));
    assert!(!accepts(&table, "left", "x y"));
    assert_eq!(
        property_options(&table, "left", "y x").expect("known property"),
        vec![keyword("x")]
    );
    assert!(accepts(&table, "right", "x x y"));
    assert!(!accepts(&table, "right", "x x"));
    assert_eq!(
        property_options(&table, "right", "x").expect("known property"),
        vec![keyword("x"), keyword("y")]
    );
}

#[test]
fn test_unknown_property() {
    let table = table("{}", "{}");
    assert!(matches!(
        property_options(&table, "nope", ""),
        Err(ValueError::UnknownProperty(ref name)) if name == "nope"
    ));
}

#[test]
fn test_standard_width_options() {
    let options = property_options(PropertyTable::standard(), "width", "").expect("known property");
    for expected in [keyword("auto"), data_type("length"), data_type("percentage"), keyword("min-content")] {
        assert!(options.contains(&expected), "missing {:?} in {:?}", expected, options);
    }
    assert!(options.contains(&Suggestion::Function("fit-content".to_string())));
}

#[test]
fn test_standard_border_excludes_consumed_style() {
    let options = property_options(PropertyTable::standard(), "border", "solid").expect("known property");
    assert!(options.contains(&data_type("length")));
    assert!(options.contains(&keyword("thin")));
    assert!(options.contains(&data_type("color")));
    assert!(!options.contains(&keyword("dotted")));
}

#[test]
fn test_standard_properties_accept_values() {
    let table = PropertyTable::standard();
    assert!(accepts(table, "width", "fit-content(20em)"));
    assert!(accepts(table, "opacity", "0.5"));
    assert!(accepts(table, "opacity", "50%"));
    assert!(!accepts(table, "opacity", "red"));
    assert!(accepts(table, "font-weight", "400"));
    assert!(!accepts(table, "font-weight", "1001"));
    assert!(accepts(table, "border-style", "solid dashed"));
    assert!(accepts(table, "transform", "rotate(45deg) translateX(10px)"));
    assert!(accepts(table, "animation-name", "slide-in, none"));
    assert!(accepts(table, "background-color", "var(--accent)"));
}

#[test]
fn test_standard_list_continuation() {
    let options = property_options(PropertyTable::standard(), "animation-name", "slide-in").expect("known property");
    assert_eq!(options, vec![Suggestion::Delimiter(",".to_string())]);
}
