use std::time::{Duration, Instant};
use webwriter_parser::{parse, serialize, Bound, Expression, ParseError, Quantifier};

fn assert_raw_round_trip(source: &str, expr: &Expression) {
    for node in expr.values() {
        assert_eq!(
            &source[node.span().clone()],
            node.raw(),
            "raw text must equal the input slice for {:?}",
            node
        );
    }
}

fn names(expr: &Expression) -> Vec<&str> {
    expr.children().iter().filter_map(|c| c.name()).collect()
}

#[test]
fn test_paragraph_figure_table_footer() {
    let source = "p (figure | table)* footer?";
    let expr = parse(source).expect("Failed to parse");

    let Expression::Sequence(seq) = &expr else {
        panic!("expected a sequence, got {:?}", expr);
    };
    assert_eq!(seq.content.len(), 3);
    assert_eq!(seq.content[0].name(), Some("p"));
    assert!(seq.content[0].quantifier().is_default());

    let Expression::Alternation(alt) = &seq.content[1] else {
        panic!("expected an alternation, got {:?}", seq.content[1]);
    };
    assert_eq!(alt.quantifier, Quantifier::ZERO_OR_MORE);
    assert_eq!(alt.raw, "(figure | table)*");
    assert_eq!(names(&seq.content[1]), vec!["figure", "table"]);

    assert_eq!(seq.content[2].name(), Some("footer"));
    assert_eq!(*seq.content[2].quantifier(), Quantifier::ZERO_OR_ONE);

    assert_eq!(seq.raw, source);
    assert_raw_round_trip(source, &expr);
}

#[test]
fn test_group_quantifier_on_sequence() {
    let source = "(a b)+ c";
    let expr = parse(source).expect("Failed to parse");

    let Expression::Sequence(outer) = &expr else {
        panic!("expected a sequence");
    };
    let Expression::Sequence(inner) = &outer.content[0] else {
        panic!("expected an inner sequence");
    };
    assert_eq!(inner.quantifier.min, 1);
    assert_eq!(inner.quantifier.max, Bound::Infinite);
    assert_eq!(inner.raw, "(a b)+");
    assert_eq!(names(&outer.content[0]), vec!["a", "b"]);
    assert_eq!(outer.content[1].name(), Some("c"));
    assert_raw_round_trip(source, &expr);
}

#[test]
fn test_group_quantifier_wraps_quantified_inner() {
    let source = "(a?)+";
    let expr = parse(source).expect("Failed to parse");

    let Expression::Sequence(wrapper) = &expr else {
        panic!("expected a wrapping sequence, got {:?}", expr);
    };
    assert_eq!(wrapper.quantifier, Quantifier::ONE_OR_MORE);
    assert_eq!(wrapper.content.len(), 1);
    assert_eq!(*wrapper.content[0].quantifier(), Quantifier::ZERO_OR_ONE);
    assert_eq!(wrapper.content[0].raw(), "a?");
    assert_raw_round_trip(source, &expr);
}

#[test]
fn test_unquantified_group_is_transparent() {
    let expr = parse("(heading)").expect("Failed to parse");
    assert_eq!(expr.name(), Some("heading"));
    assert_eq!(expr.raw(), "(heading)");
}

#[test]
fn test_alternation_binds_tighter_than_sequence() {
    let expr = parse("a b | c d").expect("Failed to parse");
    let Expression::Sequence(seq) = &expr else {
        panic!("expected a sequence");
    };
    assert_eq!(seq.content.len(), 3);
    assert!(matches!(seq.content[1], Expression::Alternation(_)));
}

#[test]
fn test_group_followed_by_alternation_inside_sequence() {
    let source = "(a)|(b) c";
    let expr = parse(source).expect("Failed to parse");
    let Expression::Sequence(seq) = &expr else {
        panic!("expected a sequence, got {:?}", expr);
    };
    assert!(matches!(seq.content[0], Expression::Alternation(_)));
    assert_eq!(seq.content[1].name(), Some("c"));
    assert_raw_round_trip(source, &expr);
}

#[test]
fn test_group_followed_by_item() {
    let expr = parse("(a) b").expect("Failed to parse");
    assert!(matches!(expr, Expression::Sequence(_)));
}

#[test]
fn test_multiline_expression() {
    let source = "title\n  (paragraph | list)+\n  footer";
    let expr = parse(source).expect("Failed to parse");
    assert_eq!(expr.children().len(), 3);
    assert_raw_round_trip(source, &expr);
}

#[test]
fn test_deeply_nested_round_trip() {
    let source = "((a | b){2,3} (c d?)*)? e";
    let expr = parse(source).expect("Failed to parse");
    assert_raw_round_trip(source, &expr);
    for node in expr.values() {
        let q = node.quantifier();
        assert!(q.max.admits(q.min), "min must not exceed max");
    }
}

#[test]
fn test_range_error_rejects_inverted_bounds() {
    let result = parse("a{5,2}");
    assert!(matches!(
        result,
        Err(ParseError::QuantifierRange { min: 5, max: 2, .. })
    ));
}

#[test]
fn test_trailing_pipe_reports_end_of_input() {
    let result = parse("a |");
    if let Err(e) = &result {
        eprintln!("Parse error: {}", e);
    }
    let Err(ParseError::Syntax { found, location, .. }) = result else {
        panic!("expected syntax error");
    };
    assert_eq!(found, "end of input");
    assert_eq!(location.start.column, 4);
}

#[test]
fn test_canonical_form_reparses_to_same_shape() {
    let sources = [
        "p (figure | table)* footer?",
        "(a b)+ c",
        "((a | b) | c)*",
        "(x?){2}",
    ];
    for source in sources {
        let expr = parse(source).expect("Failed to parse");
        assert_eq!(serialize(&expr), source);
        let canonical = expr.to_string();
        let reparsed = parse(&canonical).expect("Failed to reparse canonical form");
        assert_eq!(reparsed.to_string(), canonical, "{}", source);
    }
}

#[test]
fn test_sequence_of_quantified_names() {
    let source = "paragraph heading* list?";
    let expr = parse(source).expect("Failed to parse");
    let Expression::Sequence(seq) = &expr else {
        panic!("expected a sequence, got {:?}", expr);
    };
    let shape: Vec<_> = seq
        .content
        .iter()
        .map(|c| {
            assert!(matches!(c, Expression::Simple(_)), "{:?}", c);
            (c.name().unwrap_or_default(), *c.quantifier())
        })
        .collect();
    assert_eq!(
        shape,
        vec![
            ("paragraph", Quantifier::ONE),
            ("heading", Quantifier::ZERO_OR_MORE),
            ("list", Quantifier::ZERO_OR_ONE),
        ]
    );
    assert_raw_round_trip(source, &expr);
}

#[test]
fn test_alternation_of_two_names() {
    let expr = parse("bold | italic").expect("Failed to parse");
    let Expression::Alternation(alt) = &expr else {
        panic!("expected an alternation, got {:?}", expr);
    };
    assert_eq!(alt.content.len(), 2);
    for child in &alt.content {
        assert!(matches!(child, Expression::Simple(_)));
        assert_eq!(*child.quantifier(), Quantifier::ONE);
    }
    assert_eq!(names(&expr), vec!["bold", "italic"]);
}

#[test]
fn test_bounded_repetition() {
    let expr = parse("widget{2,4}").expect("Failed to parse");
    let Expression::Simple(simple) = &expr else {
        panic!("expected a simple expression, got {:?}", expr);
    };
    assert_eq!(simple.content, "widget");
    assert_eq!(simple.quantifier.min, 2);
    assert_eq!(simple.quantifier.max, Bound::Finite(4));

    assert!(matches!(
        parse("widget{5,2}"),
        Err(ParseError::QuantifierRange { min: 5, max: 2, .. })
    ));
}

#[test]
fn test_unlexable_input_is_rejected() {
    for (source, found) in [("a & b", "'&'"), ("list-item+", "'-'"), ("(a b) !", "'!'")] {
        match parse(source) {
            Err(ParseError::Syntax { found: actual, .. }) => assert_eq!(actual, found, "{}", source),
            other => panic!("{} should fail, got {:?}", source, other),
        }
    }
}

#[test]
fn test_deep_nesting_parses_in_linear_time() {
    let depth = 30;
    let source = format!("{}a{}", "(".repeat(depth), " b)".repeat(depth));

    let started = Instant::now();
    let expr = parse(&source).expect("Failed to parse");
    assert!(
        started.elapsed() < Duration::from_secs(1),
        "took {:?}",
        started.elapsed()
    );

    assert_raw_round_trip(&source, &expr);
    let mut levels = 0;
    let mut node = &expr;
    while let Expression::Sequence(seq) = node {
        levels += 1;
        node = &seq.content[0];
    }
    assert_eq!(levels, depth);
    assert_eq!(node.name(), Some("a"));
}

#[test]
fn test_deep_nesting_failure_is_fast() {
    let source = format!("{}a b{}", "(".repeat(40), ")".repeat(39));

    let started = Instant::now();
    assert!(matches!(parse(&source), Err(ParseError::Syntax { .. })));
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_expression_serializes_to_json() {
    let expr = parse("a | b").expect("Failed to parse");
    let json = serde_json::to_value(&expr).expect("Failed to serialize");
    assert_eq!(json["type"], "alternation");
    assert_eq!(json["content"][0]["content"], "a");
}
