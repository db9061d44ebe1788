use crate::error::{ValueError, ValueResult};
use crate::functions::{interpret, CssFunctionValue, FunctionFamily, FunctionValue};
use crate::tokenizer::{tokenize, ValueToken};
use crate::value::{CssColorValue, CssStyleValue, CssUnitValue};
use std::fmt;
use std::ops::Range;
use tracing::debug;
use webwriter_common::CssConfig;
use webwriter_parser::{Location, ParseError};

/// The classified values of one CSS property value string, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CssCompositeValue {
    values: Vec<CssStyleValue>,
    unrecognized: Vec<String>,
    important: bool,
}

impl CssCompositeValue {
    /// Parse with the default configuration, dropping unknown functions
    pub fn parse(css_text: &str) -> ValueResult<Self> {
        Self::parse_with(css_text, &CssConfig::default())
    }

    pub fn parse_with(css_text: &str, config: &CssConfig) -> ValueResult<Self> {
        debug!(value = css_text, "parsing composite value");
        let tokens = tokenize(css_text).map_err(|span| {
            ParseError::syntax(
                vec!["a CSS value".to_string()],
                format!("'{}'", &css_text[span.clone()]),
                Location::from_span(css_text, span),
            )
        })?;

        let mut parser = ValueParser {
            source: css_text,
            tokens,
            pos: 0,
            drop_unknown_functions: config.drop_unknown_functions,
            unrecognized: Vec::new(),
            enclosing: Vec::new(),
            important: false,
        };
        let values = parser.parse_values(false)?;
        Ok(Self {
            values,
            unrecognized: parser.unrecognized,
            important: parser.important,
        })
    }

    pub fn values(&self) -> &[CssStyleValue] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CssStyleValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names of the functions that were dropped because they are not known
    pub fn unrecognized(&self) -> &[String] {
        &self.unrecognized
    }

    /// Whether the value ends with `!important`
    pub fn is_important(&self) -> bool {
        self.important
    }
}

impl IntoIterator for CssCompositeValue {
    type Item = CssStyleValue;
    type IntoIter = std::vec::IntoIter<CssStyleValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a CssCompositeValue {
    type Item = &'a CssStyleValue;
    type IntoIter = std::slice::Iter<'a, CssStyleValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for CssCompositeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if value.is_separator(',') {
                write!(f, ",")?;
                continue;
            }
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", value)?;
        }
        if self.important {
            write!(f, " !important")?;
        }
        Ok(())
    }
}

struct ValueParser<'src> {
    source: &'src str,
    tokens: Vec<(ValueToken<'src>, Range<usize>)>,
    pos: usize,
    drop_unknown_functions: bool,
    unrecognized: Vec<String>,
    /// Names of the functions whose arguments are being parsed
    enclosing: Vec<&'src str>,
    important: bool,
}

impl<'src> ValueParser<'src> {
    /// Values up to the end of input, or up to and including the closing `)` when nested
    fn parse_values(&mut self, nested: bool) -> ValueResult<Vec<CssStyleValue>> {
        let mut values = Vec::new();
        while let Some((token, span)) = self.advance() {
            let value = match token {
                ValueToken::Whitespace => continue,
                ValueToken::Comma => CssStyleValue::Separator(','),
                ValueToken::Slash => CssStyleValue::Separator('/'),
                ValueToken::RParen if nested => return Ok(values),
                ValueToken::Url(text) => url_token(text),
                ValueToken::Function(name) => match self.parse_function(name, span)? {
                    Some(value) => value,
                    None => continue,
                },
                ValueToken::DashedIdent(name) => CssStyleValue::VariableReference(name.to_string()),
                ValueToken::Ident(name) => CssStyleValue::Keyword(name.to_string()),
                ValueToken::Percentage(text) | ValueToken::Dimension(text) | ValueToken::Number(text) => {
                    let number = CssUnitValue::parse(text).ok_or_else(|| ValueError::InvalidNumber(text.to_string()))?;
                    CssStyleValue::Numeric(number)
                }
                ValueToken::Hash(text) => {
                    let color = CssColorValue::parse(text).ok_or_else(|| ValueError::InvalidColor(text.to_string()))?;
                    CssStyleValue::Color(color)
                }
                ValueToken::String(text) => CssStyleValue::String(unquote(text)),
                ValueToken::Delim("!") if !nested => {
                    self.parse_important(span)?;
                    continue;
                }
                ValueToken::LParen | ValueToken::RParen | ValueToken::Delim(_) => {
                    return Err(ParseError::syntax(
                        vec!["a CSS value".to_string()],
                        token.to_string(),
                        self.location(span),
                    )
                    .into())
                }
            };
            values.push(value);
        }

        if nested {
            let end = self.source.len();
            return Err(ParseError::syntax(vec!["')'".to_string()], "end of input", self.location(end..end)).into());
        }
        Ok(values)
    }

    /// `!important`, which may only end the value
    fn parse_important(&mut self, span: Range<usize>) -> ValueResult<()> {
        self.skip_whitespace();
        match self.advance() {
            Some((ValueToken::Ident(flag), _)) if flag.eq_ignore_ascii_case("important") => {}
            Some((token, span)) => {
                return Err(ParseError::syntax(vec!["'important'".to_string()], token.to_string(), self.location(span)).into())
            }
            None => {
                let end = self.source.len();
                return Err(ParseError::syntax(vec!["'important'".to_string()], "end of input", self.location(end..end)).into());
            }
        }
        self.skip_whitespace();
        if let Some((token, span)) = self.advance() {
            return Err(ParseError::syntax(vec!["end of input".to_string()], token.to_string(), self.location(span)).into());
        }
        debug!(at = span.start, "value is marked important");
        self.important = true;
        Ok(())
    }

    /// `None` when an unknown function was dropped
    fn parse_function(&mut self, name: &'src str, span: Range<usize>) -> ValueResult<Option<CssStyleValue>> {
        let start = span.start;
        // attr( name type(<syntax>) ) carries a value-definition syntax, kept as written
        if name.eq_ignore_ascii_case("type") && self.enclosing.last().is_some_and(|f| f.eq_ignore_ascii_case("attr")) {
            let end = self.skip_arguments()?;
            return Ok(Some(CssStyleValue::Function(Box::new(CssFunctionValue {
                name: name.to_string(),
                family: FunctionFamily::Reference,
                arguments: Vec::new(),
                value: FunctionValue::Plain,
                raw: self.source[start..end].to_string(),
            }))));
        }
        let Some(family) = FunctionFamily::of(name) else {
            let end = self.skip_arguments()?;
            if !self.drop_unknown_functions {
                return Err(ValueError::UnknownFunction {
                    name: name.to_string(),
                    location: self.location(start..end),
                });
            }
            debug!(function = name, "dropping unknown CSS function");
            self.unrecognized.push(name.to_string());
            return Ok(None);
        };

        if family == FunctionFamily::Math {
            let end = self.skip_arguments()?;
            let expression = self.source[span.end..end - 1].trim().to_string();
            return Ok(Some(CssStyleValue::Function(Box::new(CssFunctionValue {
                name: name.to_string(),
                family,
                arguments: Vec::new(),
                value: FunctionValue::Math { expression },
                raw: self.source[start..end].to_string(),
            }))));
        }

        self.enclosing.push(name);
        let arguments = self.parse_values(true);
        self.enclosing.pop();
        let arguments = arguments?;
        let raw = &self.source[start..self.last_end()];
        if family == FunctionFamily::Color && !matches!(name, "color-mix" | "light-dark") {
            if let Some(color) = CssColorValue::parse(raw) {
                return Ok(Some(CssStyleValue::Color(color)));
            }
        }

        let value = interpret(name, family, &arguments)?;
        Ok(Some(CssStyleValue::Function(Box::new(CssFunctionValue {
            name: name.to_string(),
            family,
            arguments,
            value,
            raw: raw.to_string(),
        }))))
    }

    /// Skip to the matching `)` and return the offset after it
    fn skip_arguments(&mut self) -> ValueResult<usize> {
        let mut depth = 1;
        while let Some((token, span)) = self.advance() {
            match token {
                ValueToken::LParen | ValueToken::Function(_) => depth += 1,
                ValueToken::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(span.end);
                    }
                }
                _ => {}
            }
        }
        let end = self.source.len();
        Err(ParseError::syntax(vec!["')'".to_string()], "end of input", self.location(end..end)).into())
    }

    // Helper methods

    fn skip_whitespace(&mut self) {
        while matches!(self.tokens.get(self.pos), Some((ValueToken::Whitespace, _))) {
            self.pos += 1;
        }
    }

    fn advance(&mut self) -> Option<(ValueToken<'src>, Range<usize>)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn last_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|(_, span)| span.end)
            .unwrap_or(0)
    }

    fn location(&self, span: Range<usize>) -> Location {
        Location::from_span(self.source, span)
    }
}

/// Unquoted `url(...)` token
fn url_token(text: &str) -> CssStyleValue {
    let url = text[4..text.len() - 1].trim().to_string();
    CssStyleValue::Function(Box::new(CssFunctionValue {
        name: "url".to_string(),
        family: FunctionFamily::Reference,
        arguments: Vec::new(),
        value: FunctionValue::Url { url },
        raw: text.to_string(),
    }))
}

/// Strip the quotes of a string token and resolve backslash escapes
fn unquote(text: &str) -> String {
    let inner = &text[1..text.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            c => out.push(c),
        }
    }
    out
}
