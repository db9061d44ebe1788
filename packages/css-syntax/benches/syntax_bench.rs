use criterion::{black_box, criterion_group, criterion_main, Criterion};
use webwriter_common::CssConfig;
use webwriter_css_syntax::{parse_value_definition, PropertyTable};

fn parse_background_layer(c: &mut Criterion) {
    let source = "<bg-image> || <bg-position> [ / <bg-size> ]? || <repeat-style> || <attachment> || <box> || <box>";

    c.bench_function("parse_background_layer", |b| {
        b.iter(|| parse_value_definition(black_box(source), None, None))
    });
}

fn parse_track_repeat(c: &mut Criterion) {
    let source = "repeat( [ <integer [1,∞]> ] , [ <line-names>? <track-size> ]+ <line-names>? )";

    c.bench_function("parse_track_repeat", |b| {
        b.iter(|| parse_value_definition(black_box(source), None, None))
    });
}

fn build_standard_table(c: &mut Criterion) {
    let properties = include_str!("../data/properties.json");
    let syntaxes = include_str!("../data/syntaxes.json");
    let config = CssConfig::default();

    c.bench_function("build_standard_table", |b| {
        b.iter(|| PropertyTable::from_json(black_box(properties), black_box(syntaxes), &config))
    });
}

criterion_group!(
    benches,
    parse_background_layer,
    parse_track_repeat,
    build_standard_table
);
criterion_main!(benches);
