use criterion::{black_box, criterion_group, criterion_main, Criterion};
use webwriter_css_syntax::PropertyTable;
use webwriter_css_value::{property_options, CssCompositeValue, ValueMatcher};

fn parse_shorthand(c: &mut Criterion) {
    let source = "url(bg.png) no-repeat, linear-gradient(to right, #fff 0%, rgba(0, 0, 0, 0.5) 100%) center / cover";

    c.bench_function("parse_shorthand", |b| b.iter(|| CssCompositeValue::parse(black_box(source))));
}

fn match_transform_list(c: &mut Criterion) {
    let table = PropertyTable::standard();
    let definition = match table.definition("transform") {
        Some(definition) => definition,
        None => return,
    };
    let values = match CssCompositeValue::parse("translateX(10px) rotate(45deg) scale(1.5) skewY(5deg)") {
        Ok(values) => values,
        Err(_) => return,
    };
    let matcher = ValueMatcher::new(table.cache());

    c.bench_function("match_transform_list", |b| {
        b.iter(|| matcher.matches(black_box(definition), black_box(values.values())))
    });
}

fn border_options(c: &mut Criterion) {
    let table = PropertyTable::standard();

    c.bench_function("border_options", |b| {
        b.iter(|| property_options(table, black_box("border"), black_box("1px solid")))
    });
}

criterion_group!(benches, parse_shorthand, match_transform_list, border_options);
criterion_main!(benches);
