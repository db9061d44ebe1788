use crate::functions::{CssFunctionValue, FunctionFamily};
use std::fmt;

pub const CSS_WIDE_KEYWORDS: &[&str] = &["initial", "inherit", "unset", "revert", "revert-layer"];

pub const LENGTH_UNITS: &[&str] = &[
    "px", "pt", "cm", "mm", "em", "rem", "ch", "ex", "ic", "lh", "rcap", "rch", "rex", "ric",
    "rlh", "vh", "vw", "vmax", "vmin", "vb", "vi", "cap", "cqw", "cqh", "cqi", "cqb", "cqmin",
    "cqmax", "Q", "in", "pc", "svh", "svw", "lvh", "lvw", "dvh", "dvw",
];
pub const ANGLE_UNITS: &[&str] = &["deg", "grad", "rad", "turn"];
pub const TIME_UNITS: &[&str] = &["s", "ms"];
pub const FREQUENCY_UNITS: &[&str] = &["Hz", "kHz"];
pub const RESOLUTION_UNITS: &[&str] = &["dpi", "dpcm", "dppx", "x"];
pub const FLEX_UNITS: &[&str] = &["fr"];

pub const SYSTEM_COLORS: &[&str] = &[
    "AccentColor", "AccentColorText", "ActiveText", "ButtonBorder", "ButtonFace", "ButtonText",
    "Canvas", "CanvasText", "Field", "FieldText", "GrayText", "Highlight", "HighlightText",
    "LinkText", "Mark", "MarkText", "SelectedItem", "SelectedItemText", "VisitedText",
];

pub const DEPRECATED_SYSTEM_COLORS: &[&str] = &[
    "ActiveBorder", "ActiveCaption", "AppWorkspace", "Background", "ButtonHighlight",
    "ButtonShadow", "CaptionText", "InactiveBorder", "InactiveCaption", "InactiveCaptionText",
    "InfoBackground", "InfoText", "Menu", "MenuText", "Scrollbar", "ThreeDDarkShadow",
    "ThreeDFace", "ThreeDHighlight", "ThreeDLightShadow", "ThreeDShadow", "Window",
    "WindowFrame", "WindowText",
];

/// Dimension family of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitCategory {
    Number,
    Percent,
    Length,
    Angle,
    Time,
    Frequency,
    Resolution,
    Flex,
    Unknown,
}

/// A number with its unit. Unitless numbers have the unit `"number"`, `%` is `"percent"`.
#[derive(Debug, Clone, PartialEq)]
pub struct CssUnitValue {
    pub value: f64,
    pub unit: String,
}

impl CssUnitValue {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    pub fn number(value: f64) -> Self {
        Self::new(value, "number")
    }

    pub fn percent(value: f64) -> Self {
        Self::new(value, "percent")
    }

    /// Parse `12`, `50%` or `1.5em`
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(number) = text.strip_suffix('%') {
            return number.parse().ok().map(Self::percent);
        }
        let split = text
            .char_indices()
            .find(|&(i, c)| c.is_ascii_alphabetic() && !Self::is_exponent(text, i))
            .map(|(i, _)| i)
            .unwrap_or(text.len());
        let value = text[..split].parse().ok()?;
        match &text[split..] {
            "" => Some(Self::number(value)),
            unit => Some(Self::new(value, unit)),
        }
    }

    /// `e` in `1e3` is an exponent, in `1em` it starts the unit
    fn is_exponent(text: &str, i: usize) -> bool {
        let bytes = text.as_bytes();
        if !matches!(bytes[i], b'e' | b'E') || i == 0 || !bytes[i - 1].is_ascii_digit() {
            return false;
        }
        match bytes.get(i + 1) {
            Some(b'+' | b'-') => bytes.get(i + 2).is_some_and(|b| b.is_ascii_digit()),
            Some(b) => b.is_ascii_digit(),
            None => false,
        }
    }

    pub fn category(&self) -> UnitCategory {
        let unit = self.unit.as_str();
        match unit {
            "number" => UnitCategory::Number,
            "percent" => UnitCategory::Percent,
            _ if LENGTH_UNITS.iter().any(|u| u.eq_ignore_ascii_case(unit)) => UnitCategory::Length,
            _ if ANGLE_UNITS.contains(&unit) => UnitCategory::Angle,
            _ if TIME_UNITS.contains(&unit) => UnitCategory::Time,
            _ if FREQUENCY_UNITS.contains(&unit) => UnitCategory::Frequency,
            _ if RESOLUTION_UNITS.contains(&unit) => UnitCategory::Resolution,
            _ if FLEX_UNITS.contains(&unit) => UnitCategory::Flex,
            _ => UnitCategory::Unknown,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.category() == UnitCategory::Number && self.value.fract() == 0.0
    }

    pub fn is_zero(&self) -> bool {
        self.category() == UnitCategory::Number && self.value == 0.0
    }
}

impl fmt::Display for CssUnitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit.as_str() {
            "number" => write!(f, "{}", self.value),
            "percent" => write!(f, "{}%", self.value),
            unit => write!(f, "{}{}", self.value, unit),
        }
    }
}

/// A color as written, with its sRGB channels when they can be computed
#[derive(Debug, Clone, PartialEq)]
pub struct CssColorValue {
    pub text: String,
    /// `None` for system colors and `currentcolor`
    pub rgba: Option<[u8; 4]>,
    pub system: bool,
}

impl CssColorValue {
    /// Parse a hex, named, system or functional color
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if Self::is_system_color(text) {
            return Some(Self {
                text: text.to_string(),
                rgba: None,
                system: true,
            });
        }
        if text.eq_ignore_ascii_case("currentcolor") {
            return Some(Self {
                text: text.to_string(),
                rgba: None,
                system: false,
            });
        }
        let color = text.parse::<csscolorparser::Color>().ok()?;
        Some(Self {
            text: text.to_string(),
            rgba: Some(color.to_rgba8()),
            system: false,
        })
    }

    /// Color named by a bare identifier. Hex digits without their `#`, as in
    /// `add` or `cafe`, are ordinary words.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        if keyword.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Self::parse(keyword)
    }

    pub fn is_system_color(text: &str) -> bool {
        SYSTEM_COLORS
            .iter()
            .chain(DEPRECATED_SYSTEM_COLORS)
            .any(|c| c.eq_ignore_ascii_case(text))
    }
}

impl fmt::Display for CssColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// One classified token of a concrete CSS value
#[derive(Debug, Clone, PartialEq)]
pub enum CssStyleValue {
    /// An identifier, including the CSS-wide keywords
    Keyword(String),
    /// Content of a quoted string, unescaped
    String(String),
    Numeric(CssUnitValue),
    Color(CssColorValue),
    /// `--name`
    VariableReference(String),
    /// `,` or `/`
    Separator(char),
    Function(Box<CssFunctionValue>),
}

impl CssStyleValue {
    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            CssStyleValue::Keyword(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_numeric(&self) -> Option<&CssUnitValue> {
        match self {
            CssStyleValue::Numeric(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<&CssColorValue> {
        match self {
            CssStyleValue::Color(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&CssFunctionValue> {
        match self {
            CssStyleValue::Function(f) => Some(f.as_ref()),
            _ => None,
        }
    }

    pub fn is_separator(&self, separator: char) -> bool {
        matches!(self, CssStyleValue::Separator(c) if *c == separator)
    }

    pub fn is_css_wide_keyword(&self) -> bool {
        self.as_keyword()
            .is_some_and(|k| CSS_WIDE_KEYWORDS.iter().any(|w| w.eq_ignore_ascii_case(k)))
    }

    /// `var()`, `env()` or `attr()`, which may stand for any value
    pub fn is_substitution(&self) -> bool {
        self.as_function().is_some_and(|f| f.is_substitution())
    }

    pub fn is_math(&self) -> bool {
        self.as_function()
            .is_some_and(|f| f.family == FunctionFamily::Math)
    }
}

impl fmt::Display for CssStyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssStyleValue::Keyword(k) => write!(f, "{}", k),
            CssStyleValue::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            CssStyleValue::Numeric(n) => write!(f, "{}", n),
            CssStyleValue::Color(c) => write!(f, "{}", c),
            CssStyleValue::VariableReference(name) => write!(f, "{}", name),
            CssStyleValue::Separator(c) => write!(f, "{}", c),
            CssStyleValue::Function(func) => write!(f, "{}", func),
        }
    }
}
