use serde::{Deserialize, Serialize};
use std::fmt;
use webwriter_parser::{Quantifier, Span};

/// Numeric range restriction of a data type, as in `<length [0,∞]>`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DataRange {
    /// `None` is unbounded
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl DataRange {
    /// Parse `[min,max]`, where either bound may be `∞`, `-∞` or `−∞`
    pub fn parse(text: &str) -> Option<Self> {
        let inner = text.trim().strip_prefix('[')?.strip_suffix(']')?;
        let (min, max) = inner.split_once(',')?;
        Some(Self {
            min: Self::bound(min)?,
            max: Self::bound(max)?,
        })
    }

    fn bound(text: &str) -> Option<Option<f64>> {
        match text.trim() {
            "∞" | "+∞" | "-∞" | "−∞" => Some(None),
            number => number.parse::<f64>().ok().map(Some),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

impl fmt::Display for DataRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |b: Option<f64>, negative: bool| match b {
            Some(n) => n.to_string(),
            None if negative => "-∞".to_string(),
            None => "∞".to_string(),
        };
        write!(f, "[{},{}]", bound(self.min, true), bound(self.max, false))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DefinitionKind {
    /// A keyword or delimiter that must appear as written
    Literal { content: String },
    /// A quoted literal such as `'{'`
    String { content: String },
    DataType {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range: Option<DataRange>,
    },
    PropertyReference { name: String },
    FunctionCall {
        name: String,
        content: Vec<ValueDefinition>,
    },
    /// Juxtaposition: all children, in order
    OrderedSequence { content: Vec<ValueDefinition> },
    /// `&&`: all children, any order
    UnorderedSequence { content: Vec<ValueDefinition> },
    /// `||`: at least one child, any order, each at most once
    Subset { content: Vec<ValueDefinition> },
    /// `|`: exactly one child
    Alternation { content: Vec<ValueDefinition> },
}

/// Parsed CSS value definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueDefinition {
    #[serde(flatten)]
    pub kind: DefinitionKind,
    pub quantifier: Quantifier,
    /// Separator between repetitions, `,` for `#`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<char>,
    /// Set by `!`: a group that must not match empty
    #[serde(default)]
    pub required: bool,
    pub raw: String,
    pub span: Span,
    /// Property or syntax name, on roots parsed under a name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ValueDefinition {
    pub fn new(kind: DefinitionKind, raw: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            quantifier: Quantifier::default(),
            separator: None,
            required: false,
            raw: raw.into(),
            span,
            name: None,
        }
    }

    pub fn children(&self) -> &[ValueDefinition] {
        match &self.kind {
            DefinitionKind::FunctionCall { content, .. }
            | DefinitionKind::OrderedSequence { content }
            | DefinitionKind::UnorderedSequence { content }
            | DefinitionKind::Subset { content }
            | DefinitionKind::Alternation { content } => content,
            _ => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<ValueDefinition>> {
        match &mut self.kind {
            DefinitionKind::FunctionCall { content, .. }
            | DefinitionKind::OrderedSequence { content }
            | DefinitionKind::UnorderedSequence { content }
            | DefinitionKind::Subset { content }
            | DefinitionKind::Alternation { content } => Some(content),
            _ => None,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(
            self.kind,
            DefinitionKind::OrderedSequence { .. }
                | DefinitionKind::UnorderedSequence { .. }
                | DefinitionKind::Subset { .. }
                | DefinitionKind::Alternation { .. }
        )
    }

    pub fn has_default_multiplier(&self) -> bool {
        self.quantifier.is_default() && self.separator.is_none() && !self.required
    }

    /// Names of referenced data types and properties, in pre-order
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(def) = stack.pop() {
            match &def.kind {
                DefinitionKind::DataType { name, .. } | DefinitionKind::PropertyReference { name } => {
                    out.push(name.as_str())
                }
                _ => {}
            }
            stack.extend(def.children().iter().rev());
        }
        out
    }

    fn write_multiplier(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.separator == Some(',') {
            write!(f, "#")?;
            if self.quantifier != Quantifier::ONE_OR_MORE {
                write!(f, "{}", self.quantifier)?;
            }
        } else {
            write!(f, "{}", self.quantifier)?;
        }
        if self.required {
            write!(f, "!")?;
        }
        Ok(())
    }
}

/// Canonical value definition syntax
impl fmt::Display for ValueDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let combinator = match &self.kind {
            DefinitionKind::Literal { content } => {
                write!(f, "{}", content)?;
                return self.write_multiplier(f);
            }
            DefinitionKind::String { content } => {
                write!(f, "'{}'", content)?;
                return self.write_multiplier(f);
            }
            DefinitionKind::DataType { name, range } => {
                match range {
                    Some(range) => write!(f, "<{} {}>", name, range)?,
                    None => write!(f, "<{}>", name)?,
                }
                return self.write_multiplier(f);
            }
            DefinitionKind::PropertyReference { name } => {
                write!(f, "<'{}'>", name)?;
                return self.write_multiplier(f);
            }
            DefinitionKind::FunctionCall { name, content } => {
                write!(f, "{}(", name)?;
                for child in content {
                    write!(f, " {}", child)?;
                }
                write!(f, " )")?;
                return self.write_multiplier(f);
            }
            DefinitionKind::OrderedSequence { .. } => " ",
            DefinitionKind::UnorderedSequence { .. } => " && ",
            DefinitionKind::Subset { .. } => " || ",
            DefinitionKind::Alternation { .. } => " | ",
        };

        let bracketed = !self.has_default_multiplier();
        if bracketed {
            write!(f, "[ ")?;
        }
        for (i, child) in self.children().iter().enumerate() {
            if i > 0 {
                write!(f, "{}", combinator)?;
            }
            if child.is_composite() && child.has_default_multiplier() {
                write!(f, "[ {} ]", child)?;
            } else {
                write!(f, "{}", child)?;
            }
        }
        if bracketed {
            write!(f, " ]")?;
            self.write_multiplier(f)?;
        }
        Ok(())
    }
}
