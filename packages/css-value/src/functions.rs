use crate::error::{ValueError, ValueResult};
use crate::value::{CssColorValue, CssStyleValue, CssUnitValue, UnitCategory};
use std::fmt;

pub const TRANSFORM_FUNCTION_NAMES: &[&str] = &[
    "translate", "translateX", "translateY", "translateZ", "translate3d", "rotate", "rotateX",
    "rotateY", "rotateZ", "rotate3d", "scale", "scaleX", "scaleY", "scaleZ", "scale3d", "skew",
    "skewX", "skewY", "matrix", "matrix3d", "perspective",
];

pub const MATH_FUNCTION_NAMES: &[&str] = &[
    "calc", "min", "max", "clamp", "round", "mod", "rem", "sin", "cos", "tan", "asin", "acos",
    "atan", "atan2", "pow", "sqrt", "hypot", "log", "exp", "abs", "sign", "calc-size", "anchor",
    "anchor-size",
];

pub const FILTER_FUNCTION_NAMES: &[&str] = &[
    "blur", "brightness", "contrast", "drop-shadow", "grayscale", "hue-rotate", "invert",
    "opacity", "saturate", "sepia",
];

pub const COLOR_FUNCTION_NAMES: &[&str] = &[
    "rgb", "rgba", "hsl", "hsla", "hwb", "lab", "lch", "oklch", "oklab", "color", "color-mix",
    "color-contrast", "device-cmyk", "light-dark",
];

pub const IMAGE_FUNCTION_NAMES: &[&str] = &[
    "linear-gradient", "radial-gradient", "conic-gradient", "repeating-linear-gradient",
    "repeating-radial-gradient", "repeating-conic-gradient", "image", "image-set", "cross-fade",
    "element", "paint",
];

pub const COUNTER_FUNCTION_NAMES: &[&str] = &[
    "counter", "counters", "symbols", "target-counter", "target-counters", "target-text", "leader",
];

pub const SHAPE_FUNCTION_NAMES: &[&str] =
    &["shape", "circle", "ellipse", "inset", "rect", "xywh", "polygon", "path"];

pub const REFERENCE_FUNCTION_NAMES: &[&str] = &["attr", "env", "url", "var"];

pub const GRID_FUNCTION_NAMES: &[&str] = &["fit-content", "minmax", "repeat"];

pub const FONT_FUNCTION_NAMES: &[&str] = &[
    "stylistic", "styleset", "character-variant", "swash", "ornaments", "annotation",
];

pub const EASING_FUNCTION_NAMES: &[&str] = &["linear", "cubic-bezier", "steps"];

pub const ANIMATION_FUNCTION_NAMES: &[&str] = &["scroll", "view"];

const COLOR_SPACES: &[&str] = &[
    "srgb", "srgb-linear", "display-p3", "a98-rgb", "prophoto-rgb", "rec2020", "lab", "oklab",
    "xyz", "xyz-d50", "xyz-d65", "hsl", "hwb", "lch", "oklch",
];
const HUE_INTERPOLATIONS: &[&str] = &["shorter", "longer", "increasing", "decreasing"];
const SYMBOLS_TYPES: &[&str] = &["cyclic", "numeric", "alphabetic", "symbolic", "fixed"];
const STEP_POSITIONS: &[&str] = &["jump-start", "jump-end", "jump-none", "jump-both", "start", "end"];
const FILL_RULES: &[&str] = &["nonzero", "evenodd"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionFamily {
    Transform,
    Math,
    Filter,
    Color,
    Image,
    Counter,
    Shape,
    Reference,
    Grid,
    Font,
    Easing,
    Animation,
}

impl FunctionFamily {
    const ALL: [FunctionFamily; 12] = [
        FunctionFamily::Transform,
        FunctionFamily::Math,
        FunctionFamily::Filter,
        FunctionFamily::Color,
        FunctionFamily::Image,
        FunctionFamily::Counter,
        FunctionFamily::Shape,
        FunctionFamily::Reference,
        FunctionFamily::Grid,
        FunctionFamily::Font,
        FunctionFamily::Easing,
        FunctionFamily::Animation,
    ];

    pub fn names(&self) -> &'static [&'static str] {
        match self {
            FunctionFamily::Transform => TRANSFORM_FUNCTION_NAMES,
            FunctionFamily::Math => MATH_FUNCTION_NAMES,
            FunctionFamily::Filter => FILTER_FUNCTION_NAMES,
            FunctionFamily::Color => COLOR_FUNCTION_NAMES,
            FunctionFamily::Image => IMAGE_FUNCTION_NAMES,
            FunctionFamily::Counter => COUNTER_FUNCTION_NAMES,
            FunctionFamily::Shape => SHAPE_FUNCTION_NAMES,
            FunctionFamily::Reference => REFERENCE_FUNCTION_NAMES,
            FunctionFamily::Grid => GRID_FUNCTION_NAMES,
            FunctionFamily::Font => FONT_FUNCTION_NAMES,
            FunctionFamily::Easing => EASING_FUNCTION_NAMES,
            FunctionFamily::Animation => ANIMATION_FUNCTION_NAMES,
        }
    }

    /// Family of a known function name. Transform names are case-sensitive, the rest are not.
    pub fn of(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|family| family.names().contains(&name))
            .or_else(|| {
                let lower = name.to_ascii_lowercase();
                Self::ALL
                    .into_iter()
                    .filter(|family| *family != FunctionFamily::Transform)
                    .find(|family| family.names().contains(&lower.as_str()))
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    pub color: CssStyleValue,
    pub amount: Option<CssUnitValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientKind {
    Linear,
    Radial,
    Conic,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GradientStop {
    Color {
        color: CssStyleValue,
        positions: Vec<CssUnitValue>,
    },
    /// A lone position between two color stops
    Hint(CssUnitValue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatCount {
    AutoFill,
    AutoFit,
    Count(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearStop {
    pub output: f64,
    pub positions: Vec<CssUnitValue>,
}

/// What a recognised function means, beyond its raw arguments
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionValue {
    /// No typed interpretation: transforms, images, and functions whose
    /// arguments contain a substitution or math function
    Plain,
    Math {
        /// Inner expression as written
        expression: String,
    },
    Filter {
        amount: Option<CssUnitValue>,
    },
    DropShadow {
        color: Option<CssStyleValue>,
        offset_x: CssUnitValue,
        offset_y: CssUnitValue,
        blur: Option<CssUnitValue>,
    },
    ColorMix {
        color_space: String,
        hue_interpolation: Option<String>,
        stops: [ColorStop; 2],
    },
    LightDark {
        light: CssStyleValue,
        dark: CssStyleValue,
    },
    Gradient {
        kind: GradientKind,
        repeating: bool,
        /// Direction, shape or interpolation arguments before the first stop
        prelude: Vec<CssStyleValue>,
        stops: Vec<GradientStop>,
    },
    Counter {
        name: String,
        separator: Option<String>,
        style: Option<CssStyleValue>,
    },
    Symbols {
        kind: String,
        symbols: Vec<CssStyleValue>,
    },
    Circle {
        radius: Option<CssStyleValue>,
        position: Vec<CssStyleValue>,
    },
    Ellipse {
        radii: Vec<CssStyleValue>,
        position: Vec<CssStyleValue>,
    },
    /// `inset()`, `rect()` or `xywh()`
    Rect {
        edges: Vec<CssStyleValue>,
        round: Vec<CssStyleValue>,
    },
    Polygon {
        fill_rule: Option<String>,
        points: Vec<(CssStyleValue, CssStyleValue)>,
    },
    Path {
        fill_rule: Option<String>,
        path: String,
    },
    Url {
        url: String,
    },
    Var {
        name: String,
        fallback: Vec<CssStyleValue>,
    },
    Attr {
        name: String,
        kind: Option<String>,
        fallback: Vec<CssStyleValue>,
    },
    Env {
        name: String,
        fallback: Vec<CssStyleValue>,
    },
    FitContent {
        limit: CssUnitValue,
    },
    MinMax {
        min: Box<CssStyleValue>,
        max: Box<CssStyleValue>,
    },
    Repeat {
        count: RepeatCount,
        tracks: Vec<CssStyleValue>,
    },
    Linear {
        stops: Vec<LinearStop>,
    },
    CubicBezier {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Steps {
        count: u32,
        position: Option<String>,
    },
    /// Font feature alternates such as `styleset(ss01, ss02)`
    Glyph {
        features: Vec<String>,
    },
    Scroll {
        scroller: Option<String>,
        axis: Option<String>,
    },
    View {
        axis: Option<String>,
        inset: Vec<CssStyleValue>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CssFunctionValue {
    pub name: String,
    pub family: FunctionFamily,
    /// Parsed arguments, commas included as separators. Empty for math functions.
    pub arguments: Vec<CssStyleValue>,
    pub value: FunctionValue,
    pub raw: String,
}

impl CssFunctionValue {
    /// `var()`, `env()` or `attr()`
    pub fn is_substitution(&self) -> bool {
        ["var", "env", "attr"].iter().any(|name| self.is_named(name))
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for CssFunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Interpret the arguments of a non-math function
pub(crate) fn interpret(name: &str, family: FunctionFamily, args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let lower = name.to_ascii_lowercase();
    let name = lower.as_str();
    match name {
        "var" => return interpret_var(args),
        "env" => return interpret_env(args),
        "attr" => return interpret_attr(args),
        "url" => return interpret_url(args),
        _ => {}
    }
    if args.iter().any(|arg| arg.is_substitution() || arg.is_math()) {
        return Ok(FunctionValue::Plain);
    }

    match family {
        FunctionFamily::Filter if name == "drop-shadow" => interpret_drop_shadow(args),
        FunctionFamily::Filter => interpret_filter(name, args),
        FunctionFamily::Color => match name {
            "color-mix" => interpret_color_mix(args),
            "light-dark" => interpret_light_dark(args),
            _ => Ok(FunctionValue::Plain),
        },
        FunctionFamily::Image if name.ends_with("-gradient") => interpret_gradient(name, args),
        FunctionFamily::Counter => match name {
            "counter" | "counters" => interpret_counter(name, args),
            "symbols" => interpret_symbols(args),
            _ => Ok(FunctionValue::Plain),
        },
        FunctionFamily::Shape => match name {
            "circle" => interpret_circle(args),
            "ellipse" => interpret_ellipse(args),
            "inset" | "rect" | "xywh" => interpret_rect(name, args),
            "polygon" => interpret_polygon(args),
            "path" => interpret_path(args),
            _ => Ok(FunctionValue::Plain),
        },
        FunctionFamily::Grid => match name {
            "fit-content" => interpret_fit_content(args),
            "minmax" => interpret_minmax(args),
            _ => interpret_repeat(args),
        },
        FunctionFamily::Easing => match name {
            "linear" => interpret_linear(args),
            "cubic-bezier" => interpret_cubic_bezier(args),
            _ => interpret_steps(args),
        },
        FunctionFamily::Font => interpret_glyph(name, args),
        FunctionFamily::Animation if name == "scroll" => interpret_scroll(args),
        FunctionFamily::Animation => interpret_view(args),
        _ => Ok(FunctionValue::Plain),
    }
}

// Helper functions

/// Split arguments on commas
fn split_commas(args: &[CssStyleValue]) -> Vec<&[CssStyleValue]> {
    if args.is_empty() {
        return Vec::new();
    }
    args.split(|arg| arg.is_separator(',')).collect()
}

fn numeric<'a>(function: &str, value: &'a CssStyleValue, categories: &[UnitCategory]) -> ValueResult<&'a CssUnitValue> {
    match value.as_numeric() {
        Some(n) if categories.contains(&n.category()) || n.is_zero() => Ok(n),
        _ => Err(ValueError::invalid_arguments(
            function,
            format!("unexpected argument '{}'", value),
        )),
    }
}

fn plain_number(function: &str, value: &CssStyleValue) -> ValueResult<f64> {
    numeric(function, value, &[UnitCategory::Number]).map(|n| n.value)
}

fn keyword<'a>(function: &str, value: &'a CssStyleValue) -> ValueResult<&'a str> {
    value.as_keyword().ok_or_else(|| {
        ValueError::invalid_arguments(function, format!("expected an identifier, found '{}'", value))
    })
}

fn is_color(value: &CssStyleValue) -> bool {
    match value {
        CssStyleValue::Color(_) => true,
        CssStyleValue::Keyword(k) => CssColorValue::from_keyword(k).is_some(),
        CssStyleValue::Function(f) => f.family == FunctionFamily::Color,
        _ => false,
    }
}

fn count(function: &str, args: &[&[CssStyleValue]], allowed: std::ops::RangeInclusive<usize>) -> ValueResult<()> {
    if allowed.contains(&args.len()) {
        Ok(())
    } else {
        Err(ValueError::invalid_arguments(
            function,
            format!("expected {} to {} arguments, found {}", allowed.start(), allowed.end(), args.len()),
        ))
    }
}

/// Split `[shape] [at <position>]` on the `at` keyword
fn split_at_keyword<'a>(args: &'a [CssStyleValue], word: &str) -> (&'a [CssStyleValue], &'a [CssStyleValue]) {
    match args.iter().position(|arg| arg.as_keyword() == Some(word)) {
        Some(i) => (&args[..i], &args[i + 1..]),
        None => (args, &[]),
    }
}

fn one(function: &str, group: &[CssStyleValue]) -> ValueResult<CssStyleValue> {
    match group {
        [value] => Ok(value.clone()),
        _ => Err(ValueError::invalid_arguments(function, "expected a single value per argument")),
    }
}

// Reference functions

fn interpret_var(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    match args {
        [CssStyleValue::VariableReference(name), rest @ ..] => Ok(FunctionValue::Var {
            name: name.clone(),
            fallback: fallback("var", rest)?,
        }),
        _ => Err(ValueError::invalid_arguments("var", "expected a custom property name")),
    }
}

fn fallback(function: &str, rest: &[CssStyleValue]) -> ValueResult<Vec<CssStyleValue>> {
    match rest.split_first() {
        None => Ok(Vec::new()),
        Some((comma, values)) if comma.is_separator(',') => Ok(values.to_vec()),
        Some((other, _)) => Err(ValueError::invalid_arguments(
            function,
            format!("expected ',' before the fallback, found '{}'", other),
        )),
    }
}

fn interpret_env(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let name = args
        .first()
        .ok_or_else(|| ValueError::invalid_arguments("env", "expected an environment variable name"))?;
    let name = keyword("env", name)?.to_string();
    let rest = &args[1..];
    let fallback_start = rest.iter().position(|arg| arg.is_separator(',')).unwrap_or(rest.len());
    if let Some(index) = rest[..fallback_start].iter().find(|arg| !arg.as_numeric().is_some_and(|n| n.is_integer())) {
        return Err(ValueError::invalid_arguments("env", format!("unexpected index '{}'", index)));
    }
    Ok(FunctionValue::Env {
        name,
        fallback: fallback("env", &rest[fallback_start..])?,
    })
}

fn interpret_attr(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let (name, rest) = match args {
        [CssStyleValue::Keyword(name), rest @ ..] => (name.clone(), rest),
        _ => return Err(ValueError::invalid_arguments("attr", "expected an attribute name")),
    };
    let (kind, rest) = match rest {
        [CssStyleValue::Keyword(kind), rest @ ..] => (Some(kind.clone()), rest),
        [CssStyleValue::Function(f), rest @ ..] if f.is_named("type") => (Some(f.raw.clone()), rest),
        _ => (None, rest),
    };
    Ok(FunctionValue::Attr {
        name,
        kind,
        fallback: fallback("attr", rest)?,
    })
}

fn interpret_url(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    match args {
        [CssStyleValue::String(url), ..] => Ok(FunctionValue::Url { url: url.clone() }),
        _ => Err(ValueError::invalid_arguments("url", "expected a quoted url")),
    }
}

// Filters

fn interpret_filter(name: &str, args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let categories: &[UnitCategory] = match name {
        "blur" => &[UnitCategory::Length],
        "hue-rotate" => &[UnitCategory::Angle],
        _ => &[UnitCategory::Number, UnitCategory::Percent],
    };
    let amount = match args {
        [] => None,
        [value] => Some(numeric(name, value, categories)?.clone()),
        _ => return Err(ValueError::invalid_arguments(name, "expected at most one argument")),
    };
    Ok(FunctionValue::Filter { amount })
}

fn interpret_drop_shadow(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let color = args.iter().find(|arg| is_color(arg)).cloned();
    let lengths = args
        .iter()
        .filter(|arg| !is_color(arg))
        .map(|arg| numeric("drop-shadow", arg, &[UnitCategory::Length]).cloned())
        .collect::<ValueResult<Vec<_>>>()?;
    match lengths.as_slice() {
        [x, y] => Ok(FunctionValue::DropShadow {
            color,
            offset_x: x.clone(),
            offset_y: y.clone(),
            blur: None,
        }),
        [x, y, blur] => Ok(FunctionValue::DropShadow {
            color,
            offset_x: x.clone(),
            offset_y: y.clone(),
            blur: Some(blur.clone()),
        }),
        _ => Err(ValueError::invalid_arguments("drop-shadow", "expected two or three lengths")),
    }
}

// Colors

fn color_stop(function: &str, group: &[CssStyleValue]) -> ValueResult<ColorStop> {
    let (color, rest) = match group {
        [color, rest @ ..] if is_color(color) => (color.clone(), rest),
        [first, ..] => return Err(ValueError::invalid_arguments(function, format!("expected a color, found '{}'", first))),
        [] => return Err(ValueError::invalid_arguments(function, "expected a color")),
    };
    let amount = match rest {
        [] => None,
        [amount] => Some(numeric(function, amount, &[UnitCategory::Percent])?.clone()),
        _ => return Err(ValueError::invalid_arguments(function, "expected a color and a percentage")),
    };
    Ok(ColorStop { color, amount })
}

fn interpret_color_mix(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let groups = split_commas(args);
    count("color-mix", &groups, 3..=3)?;

    let method: Vec<&str> = groups[0]
        .iter()
        .map(|value| keyword("color-mix", value))
        .collect::<ValueResult<_>>()?;
    let (color_space, hue_interpolation) = match method.as_slice() {
        ["in", space] => (*space, None),
        ["in", space, hue, "hue"] if HUE_INTERPOLATIONS.contains(hue) => (*space, Some(hue.to_string())),
        _ => return Err(ValueError::invalid_arguments("color-mix", "expected 'in <color-space>'")),
    };
    if !COLOR_SPACES.contains(&color_space) {
        return Err(ValueError::invalid_arguments(
            "color-mix",
            format!("unknown color space '{}'", color_space),
        ));
    }

    Ok(FunctionValue::ColorMix {
        color_space: color_space.to_string(),
        hue_interpolation,
        stops: [color_stop("color-mix", groups[1])?, color_stop("color-mix", groups[2])?],
    })
}

fn interpret_light_dark(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let groups = split_commas(args);
    count("light-dark", &groups, 2..=2)?;
    let light = one("light-dark", groups[0])?;
    let dark = one("light-dark", groups[1])?;
    if !is_color(&light) || !is_color(&dark) {
        return Err(ValueError::invalid_arguments("light-dark", "expected two colors"));
    }
    Ok(FunctionValue::LightDark { light, dark })
}

// Images

fn interpret_gradient(name: &str, args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let kind = if name.ends_with("linear-gradient") {
        GradientKind::Linear
    } else if name.ends_with("radial-gradient") {
        GradientKind::Radial
    } else {
        GradientKind::Conic
    };
    let positions: &[UnitCategory] = match kind {
        GradientKind::Conic => &[UnitCategory::Angle, UnitCategory::Percent],
        _ => &[UnitCategory::Length, UnitCategory::Percent],
    };

    let mut groups = split_commas(args).into_iter().peekable();
    let prelude = match groups.peek() {
        Some(first) if first.first().is_some_and(|value| !is_color(value)) => {
            groups.next().map(<[CssStyleValue]>::to_vec).unwrap_or_default()
        }
        _ => Vec::new(),
    };

    let mut stops = Vec::new();
    for group in groups {
        let stop = match group {
            [color, rest @ ..] if is_color(color) => GradientStop::Color {
                color: color.clone(),
                positions: rest
                    .iter()
                    .map(|value| numeric(name, value, positions).cloned())
                    .collect::<ValueResult<_>>()?,
            },
            [hint] => GradientStop::Hint(numeric(name, hint, positions)?.clone()),
            _ => return Err(ValueError::invalid_arguments(name, "expected a color stop")),
        };
        stops.push(stop);
    }
    let colors = stops.iter().filter(|s| matches!(s, GradientStop::Color { .. })).count();
    if colors < 2 {
        return Err(ValueError::invalid_arguments(name, "expected at least two color stops"));
    }

    Ok(FunctionValue::Gradient {
        kind,
        repeating: name.starts_with("repeating-"),
        prelude,
        stops,
    })
}

// Counters

fn interpret_counter(name: &str, args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let groups = split_commas(args);
    let counter_name = |group: &[CssStyleValue]| -> ValueResult<String> { Ok(keyword(name, &one(name, group)?)?.to_string()) };
    match (name, groups.as_slice()) {
        ("counter", [counter]) => Ok(FunctionValue::Counter {
            name: counter_name(counter)?,
            separator: None,
            style: None,
        }),
        ("counter", [counter, style]) => Ok(FunctionValue::Counter {
            name: counter_name(counter)?,
            separator: None,
            style: Some(one(name, style)?),
        }),
        ("counters", [counter, separator, style @ ..]) if style.len() <= 1 => {
            let separator = match one(name, separator)? {
                CssStyleValue::String(s) => s,
                other => return Err(ValueError::invalid_arguments(name, format!("expected a string separator, found '{}'", other))),
            };
            Ok(FunctionValue::Counter {
                name: counter_name(counter)?,
                separator: Some(separator),
                style: style.first().map(|group| one(name, group)).transpose()?,
            })
        }
        _ => Err(ValueError::invalid_arguments(name, "wrong number of arguments")),
    }
}

fn interpret_symbols(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let (kind, symbols) = match args {
        [CssStyleValue::Keyword(kind), rest @ ..] if SYMBOLS_TYPES.contains(&kind.as_str()) => (kind.clone(), rest),
        _ => ("symbolic".to_string(), args),
    };
    let valid = |value: &CssStyleValue| match value {
        CssStyleValue::String(_) => true,
        CssStyleValue::Function(f) => f.is_named("url") || f.family == FunctionFamily::Image,
        _ => false,
    };
    if symbols.is_empty() || !symbols.iter().all(valid) {
        return Err(ValueError::invalid_arguments("symbols", "expected strings or images"));
    }
    Ok(FunctionValue::Symbols {
        kind,
        symbols: symbols.to_vec(),
    })
}

// Shapes

fn interpret_circle(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let (radius, position) = split_at_keyword(args, "at");
    let radius = match radius {
        [] => None,
        [value] => Some(value.clone()),
        _ => return Err(ValueError::invalid_arguments("circle", "expected a single radius")),
    };
    Ok(FunctionValue::Circle {
        radius,
        position: position.to_vec(),
    })
}

fn interpret_ellipse(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let (radii, position) = split_at_keyword(args, "at");
    if !matches!(radii.len(), 0 | 2) {
        return Err(ValueError::invalid_arguments("ellipse", "expected two radii"));
    }
    Ok(FunctionValue::Ellipse {
        radii: radii.to_vec(),
        position: position.to_vec(),
    })
}

fn interpret_rect(name: &str, args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let (edges, round) = split_at_keyword(args, "round");
    let allowed = if name == "inset" { 1..=4 } else { 4..=4 };
    if !allowed.contains(&edges.len()) {
        return Err(ValueError::invalid_arguments(
            name,
            format!("expected {} to {} values, found {}", allowed.start(), allowed.end(), edges.len()),
        ));
    }
    Ok(FunctionValue::Rect {
        edges: edges.to_vec(),
        round: round.to_vec(),
    })
}

fn fill_rule(groups: &mut Vec<&[CssStyleValue]>) -> Option<String> {
    match groups.first() {
        Some([CssStyleValue::Keyword(rule)]) if FILL_RULES.contains(&rule.as_str()) => {
            let rule = rule.clone();
            groups.remove(0);
            Some(rule)
        }
        _ => None,
    }
}

fn interpret_polygon(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let mut groups = split_commas(args);
    let fill_rule = fill_rule(&mut groups);
    let points = groups
        .into_iter()
        .map(|group| match group {
            [x, y] => Ok((x.clone(), y.clone())),
            _ => Err(ValueError::invalid_arguments("polygon", "expected pairs of coordinates")),
        })
        .collect::<ValueResult<Vec<_>>>()?;
    if points.is_empty() {
        return Err(ValueError::invalid_arguments("polygon", "expected at least one point"));
    }
    Ok(FunctionValue::Polygon { fill_rule, points })
}

fn interpret_path(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let mut groups = split_commas(args);
    let fill_rule = fill_rule(&mut groups);
    match groups.as_slice() {
        [[CssStyleValue::String(path)]] => Ok(FunctionValue::Path {
            fill_rule,
            path: path.clone(),
        }),
        _ => Err(ValueError::invalid_arguments("path", "expected a path string")),
    }
}

// Grid

fn interpret_fit_content(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    match args {
        [value] => Ok(FunctionValue::FitContent {
            limit: numeric("fit-content", value, &[UnitCategory::Length, UnitCategory::Percent])?.clone(),
        }),
        _ => Err(ValueError::invalid_arguments("fit-content", "expected a length or percentage")),
    }
}

fn interpret_minmax(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let groups = split_commas(args);
    count("minmax", &groups, 2..=2)?;
    Ok(FunctionValue::MinMax {
        min: Box::new(one("minmax", groups[0])?),
        max: Box::new(one("minmax", groups[1])?),
    })
}

fn interpret_repeat(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let Some(comma) = args.iter().position(|arg| arg.is_separator(',')) else {
        return Err(ValueError::invalid_arguments("repeat", "expected a count and a track list"));
    };
    let count = match &args[..comma] {
        [CssStyleValue::Keyword(k)] if k == "auto-fill" => RepeatCount::AutoFill,
        [CssStyleValue::Keyword(k)] if k == "auto-fit" => RepeatCount::AutoFit,
        [CssStyleValue::Numeric(n)] if n.is_integer() && n.value >= 1.0 => RepeatCount::Count(n.value as u32),
        _ => return Err(ValueError::invalid_arguments("repeat", "expected a positive integer, auto-fill or auto-fit")),
    };
    let tracks = args[comma + 1..].to_vec();
    if tracks.is_empty() {
        return Err(ValueError::invalid_arguments("repeat", "expected a track list"));
    }
    Ok(FunctionValue::Repeat { count, tracks })
}

// Easing

fn interpret_linear(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let stops = split_commas(args)
        .into_iter()
        .map(|group| match group {
            [output, positions @ ..] if positions.len() <= 2 => Ok(LinearStop {
                output: plain_number("linear", output)?,
                positions: positions
                    .iter()
                    .map(|p| numeric("linear", p, &[UnitCategory::Percent]).cloned())
                    .collect::<ValueResult<_>>()?,
            }),
            _ => Err(ValueError::invalid_arguments("linear", "expected a number and up to two percentages")),
        })
        .collect::<ValueResult<Vec<_>>>()?;
    if stops.is_empty() {
        return Err(ValueError::invalid_arguments("linear", "expected at least one stop"));
    }
    Ok(FunctionValue::Linear { stops })
}

fn interpret_cubic_bezier(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let groups = split_commas(args);
    count("cubic-bezier", &groups, 4..=4)?;
    let points = groups
        .iter()
        .map(|group| plain_number("cubic-bezier", &one("cubic-bezier", group)?))
        .collect::<ValueResult<Vec<_>>>()?;
    let (x1, y1, x2, y2) = (points[0], points[1], points[2], points[3]);
    if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
        return Err(ValueError::invalid_arguments("cubic-bezier", "x coordinates must be between 0 and 1"));
    }
    Ok(FunctionValue::CubicBezier { x1, y1, x2, y2 })
}

fn interpret_steps(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let groups = split_commas(args);
    count("steps", &groups, 1..=2)?;
    let count = match one("steps", groups[0])? {
        CssStyleValue::Numeric(n) if n.is_integer() && n.value >= 1.0 => n.value as u32,
        other => return Err(ValueError::invalid_arguments("steps", format!("expected a positive integer, found '{}'", other))),
    };
    let position = match groups.get(1) {
        Some(group) => {
            let value = one("steps", group)?;
            let position = keyword("steps", &value)?;
            if !STEP_POSITIONS.contains(&position) {
                return Err(ValueError::invalid_arguments("steps", format!("unknown step position '{}'", position)));
            }
            Some(position.to_string())
        }
        None => None,
    };
    Ok(FunctionValue::Steps { count, position })
}

// Fonts and timelines

fn interpret_glyph(name: &str, args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let features = split_commas(args)
        .into_iter()
        .map(|group| Ok(keyword(name, &one(name, group)?)?.to_string()))
        .collect::<ValueResult<Vec<_>>>()?;
    if features.is_empty() {
        return Err(ValueError::invalid_arguments(name, "expected a feature name"));
    }
    Ok(FunctionValue::Glyph { features })
}

fn interpret_scroll(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let mut scroller = None;
    let mut axis = None;
    for value in args {
        match keyword("scroll", value)? {
            k @ ("nearest" | "root" | "self") if scroller.is_none() => scroller = Some(k.to_string()),
            k @ ("block" | "inline" | "x" | "y") if axis.is_none() => axis = Some(k.to_string()),
            k => return Err(ValueError::invalid_arguments("scroll", format!("unexpected '{}'", k))),
        }
    }
    Ok(FunctionValue::Scroll { scroller, axis })
}

fn interpret_view(args: &[CssStyleValue]) -> ValueResult<FunctionValue> {
    let is_axis = |value: &CssStyleValue| matches!(value.as_keyword(), Some("block" | "inline" | "x" | "y"));
    let (axis, inset) = match args {
        [first, rest @ ..] if is_axis(first) => (first.as_keyword().map(str::to_string), rest),
        [init @ .., last] if is_axis(last) => (last.as_keyword().map(str::to_string), init),
        _ => (None, args),
    };
    if inset.len() > 2 {
        return Err(ValueError::invalid_arguments("view", "expected at most two inset values"));
    }
    Ok(FunctionValue::View {
        axis,
        inset: inset.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(value: f64, unit: &str) -> CssStyleValue {
        CssStyleValue::Numeric(CssUnitValue::new(value, unit))
    }

    fn k(keyword: &str) -> CssStyleValue {
        CssStyleValue::Keyword(keyword.to_string())
    }

    const COMMA: CssStyleValue = CssStyleValue::Separator(',');

    #[test]
    fn test_family_lookup() {
        assert_eq!(FunctionFamily::of("translateX"), Some(FunctionFamily::Transform));
        assert_eq!(FunctionFamily::of("translatex"), None);
        assert_eq!(FunctionFamily::of("RGB"), Some(FunctionFamily::Color));
        assert_eq!(FunctionFamily::of("calc"), Some(FunctionFamily::Math));
        assert_eq!(FunctionFamily::of("frobnicate"), None);
    }

    #[test]
    fn test_filter_amount() {
        let value = interpret("blur", FunctionFamily::Filter, &[n(2.0, "px")]).expect("valid blur");
        assert_eq!(value, FunctionValue::Filter { amount: Some(CssUnitValue::new(2.0, "px")) });

        assert!(interpret("blur", FunctionFamily::Filter, &[n(2.0, "deg")]).is_err());
        assert!(interpret("opacity", FunctionFamily::Filter, &[n(50.0, "percent")]).is_ok());
    }

    #[test]
    fn test_steps() {
        let value = interpret("steps", FunctionFamily::Easing, &[n(4.0, "number"), COMMA, k("jump-end")])
            .expect("valid steps");
        assert_eq!(
            value,
            FunctionValue::Steps {
                count: 4,
                position: Some("jump-end".to_string())
            }
        );
        assert!(interpret("steps", FunctionFamily::Easing, &[n(0.0, "number")]).is_err());
    }

    #[test]
    fn test_cubic_bezier_range() {
        let args = [n(0.1, "number"), COMMA, n(2.0, "number"), COMMA, n(1.5, "number"), COMMA, n(1.0, "number")];
        assert!(matches!(
            interpret("cubic-bezier", FunctionFamily::Easing, &args),
            Err(ValueError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_repeat() {
        let args = [k("auto-fill"), COMMA, n(1.0, "fr")];
        let value = interpret("repeat", FunctionFamily::Grid, &args).expect("valid repeat");
        assert!(matches!(value, FunctionValue::Repeat { count: RepeatCount::AutoFill, ref tracks } if tracks.len() == 1));
    }

    #[test]
    fn test_var_fallback() {
        let args = [CssStyleValue::VariableReference("--gap".to_string()), COMMA, n(4.0, "px")];
        let value = interpret("var", FunctionFamily::Reference, &args).expect("valid var");
        assert_eq!(
            value,
            FunctionValue::Var {
                name: "--gap".to_string(),
                fallback: vec![n(4.0, "px")]
            }
        );
        assert!(interpret("var", FunctionFamily::Reference, &[k("gap")]).is_err());
    }
}
