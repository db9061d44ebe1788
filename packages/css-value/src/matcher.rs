use crate::composite::CssCompositeValue;
use crate::error::{ValueError, ValueResult};
use crate::functions::FunctionFamily;
use crate::value::{CssColorValue, CssStyleValue, CssUnitValue, UnitCategory};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::debug;
use webwriter_css_syntax::{CacheKey, DataRange, DefinitionCache, DefinitionKind, PropertyTable, ValueDefinition};

const DEFAULT_MAX_DEPTH: usize = 64;

/// A continuation that may follow an entered prefix of values
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suggestion {
    Keyword(String),
    /// A basic data type such as `length`, to be filled in by the user
    DataType(String),
    Function(String),
    Delimiter(String),
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suggestion::Keyword(k) | Suggestion::Delimiter(k) => write!(f, "{}", k),
            Suggestion::DataType(name) => write!(f, "<{}>", name),
            Suggestion::Function(name) => write!(f, "{}()", name),
        }
    }
}

/// Index sets reached after a match, one per way of consuming values
type Ends = BTreeSet<usize>;

/// Matches classified values against value definitions
///
/// Every combinator yields the set of positions where a match of it can end,
/// so alternatives and permutations backtrack without re-reading the input.
/// References are expanded through the cache.
pub struct ValueMatcher<'a> {
    cache: &'a DefinitionCache,
    forbidden_idents: &'a [String],
    max_depth: usize,
}

impl<'a> ValueMatcher<'a> {
    pub fn new(cache: &'a DefinitionCache) -> Self {
        Self {
            cache,
            forbidden_idents: &[],
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Identifiers that `<custom-ident>` must not accept
    pub fn with_forbidden_idents(mut self, idents: &'a [String]) -> Self {
        self.forbidden_idents = idents;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Whether the values form a complete match of the definition
    pub fn matches(&self, definition: &ValueDefinition, values: &[CssStyleValue]) -> bool {
        let mut run = Run::new(self, values, false);
        run.match_definition(definition, 0).contains(&values.len())
    }

    /// Options that may follow `values`, once all of them are consumed
    ///
    /// An empty prefix yields every option that may start the value.
    pub fn suggestions(&self, definition: &ValueDefinition, values: &[CssStyleValue]) -> Vec<Suggestion> {
        let mut run = Run::new(self, values, true);
        run.match_definition(definition, 0);
        debug!(
            definition = %definition,
            values = values.len(),
            suggestions = run.suggestions.len(),
            "computed value suggestions"
        );
        run.suggestions
    }
}

/// Options for a property given the already entered value text
pub fn property_options(table: &PropertyTable, property: &str, css_text: &str) -> ValueResult<Vec<Suggestion>> {
    let definition = table
        .definition(property)
        .ok_or_else(|| ValueError::UnknownProperty(property.to_string()))?;
    let values = CssCompositeValue::parse(css_text)?;
    let matcher = ValueMatcher::new(table.cache()).with_forbidden_idents(table.forbidden_idents(property));
    Ok(matcher.suggestions(definition, values.values()))
}

/// Ends found so far for a reference under expansion
#[derive(Default)]
struct Seed {
    ends: Ends,
    reentered: bool,
}

struct Run<'a, 'v> {
    cache: &'a DefinitionCache,
    forbidden_idents: &'a [String],
    max_depth: usize,
    values: &'v [CssStyleValue],
    record: bool,
    suggestions: Vec<Suggestion>,
    /// References being expanded, by the position they started at
    seeds: HashMap<(CacheKey, usize), Seed>,
    /// Ranges of enclosing ranged data types
    ranges: Vec<DataRange>,
    depth: usize,
}

impl<'a, 'v> Run<'a, 'v> {
    fn new(matcher: &ValueMatcher<'a>, values: &'v [CssStyleValue], record: bool) -> Self {
        Self {
            cache: matcher.cache,
            forbidden_idents: matcher.forbidden_idents,
            max_depth: matcher.max_depth,
            values,
            record,
            suggestions: Vec::new(),
            seeds: HashMap::new(),
            ranges: Vec::new(),
            depth: 0,
        }
    }

    fn match_definition(&mut self, definition: &ValueDefinition, pos: usize) -> Ends {
        let mut ends = if definition.has_default_multiplier() {
            self.match_once(definition, pos)
        } else {
            self.match_repeated(definition, pos)
        };
        if definition.required {
            ends.remove(&pos);
        }
        ends
    }

    /// Repetitions within the quantifier, separated by the `#` separator
    fn match_repeated(&mut self, definition: &ValueDefinition, pos: usize) -> Ends {
        let quantifier = definition.quantifier;
        let mut result = Ends::new();
        if quantifier.min == 0 {
            result.insert(pos);
        }

        let values = self.values;
        let mut frontier = Ends::from([pos]);
        let mut count = 0;
        while !frontier.is_empty() && quantifier.allows_more(count) {
            let mut next = Ends::new();
            for &p in &frontier {
                let start = match definition.separator {
                    Some(separator) if count > 0 => match values.get(p) {
                        Some(value) if value.is_separator(separator) => p + 1,
                        Some(_) => continue,
                        None => {
                            self.suggest(Suggestion::Delimiter(separator.to_string()));
                            continue;
                        }
                    },
                    _ => p,
                };
                next.extend(self.match_once(definition, start));
            }
            count += 1;

            // Positions already reached with enough repetitions need no second visit
            if count >= quantifier.min {
                next.retain(|p| !result.contains(p));
                result.extend(next.iter().copied());
            }
            frontier = next;
        }
        result
    }

    fn match_once(&mut self, definition: &ValueDefinition, pos: usize) -> Ends {
        match &definition.kind {
            DefinitionKind::Literal { content } => self.match_literal(content, pos),
            DefinitionKind::String { content } => self.match_literal(content, pos),
            DefinitionKind::DataType { name, range } => self.match_data_type(name, range.as_ref(), pos),
            DefinitionKind::PropertyReference { name } => self
                .match_reference(CacheKey::property(name), None, pos)
                .unwrap_or_default(),
            DefinitionKind::FunctionCall { name, content } => self.match_function(name, content, pos),
            DefinitionKind::OrderedSequence { content } => self.match_sequence(content, pos),
            DefinitionKind::Alternation { content } => {
                let mut ends = Ends::new();
                for branch in content {
                    ends.extend(self.match_definition(branch, pos));
                }
                ends
            }
            DefinitionKind::UnorderedSequence { content } => self.match_permutation(content, true, pos),
            DefinitionKind::Subset { content } => self.match_permutation(content, false, pos),
        }
    }

    fn match_sequence(&mut self, content: &[ValueDefinition], pos: usize) -> Ends {
        let mut positions = Ends::from([pos]);
        for child in content {
            let mut next = Ends::new();
            for &p in &positions {
                next.extend(self.match_definition(child, p));
            }
            positions = next;
            if positions.is_empty() {
                break;
            }
        }
        positions
    }

    /// `&&` when `all`, otherwise `||`
    fn match_permutation(&mut self, content: &[ValueDefinition], all: bool, pos: usize) -> Ends {
        let mut memo = HashMap::new();
        let remaining: Vec<usize> = (0..content.len()).collect();
        self.permute(content, all, remaining, pos, &mut memo)
    }

    fn permute(
        &mut self,
        content: &[ValueDefinition],
        all: bool,
        remaining: Vec<usize>,
        pos: usize,
        memo: &mut HashMap<(Vec<usize>, usize), Ends>,
    ) -> Ends {
        if let Some(ends) = memo.get(&(remaining.clone(), pos)) {
            return ends.clone();
        }

        let mut ends = Ends::new();
        let consumed_any = remaining.len() < content.len();
        if remaining.is_empty() || (!all && consumed_any) {
            ends.insert(pos);
        }
        for (i, &child) in remaining.iter().enumerate() {
            let rest: Vec<usize> = remaining
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &c)| c)
                .collect();
            for end in self.match_definition(&content[child], pos) {
                ends.extend(self.permute(content, all, rest.clone(), end, memo));
            }
        }

        memo.insert((remaining, pos), ends.clone());
        ends
    }

    fn match_literal(&mut self, content: &str, pos: usize) -> Ends {
        let delimiter = !content.starts_with(|c: char| c.is_alphabetic() || c == '-');
        let values = self.values;
        let Some(value) = values.get(pos) else {
            self.suggest(if delimiter {
                Suggestion::Delimiter(content.to_string())
            } else {
                Suggestion::Keyword(content.to_string())
            });
            return Ends::new();
        };

        let accepted = match value {
            CssStyleValue::Keyword(k) => content.eq_ignore_ascii_case(k),
            CssStyleValue::Separator(c) => content.len() == c.len_utf8() && content.starts_with(*c),
            value => !delimiter && value.is_substitution(),
        };
        single(accepted, pos)
    }

    fn match_data_type(&mut self, name: &str, range: Option<&DataRange>, pos: usize) -> Ends {
        if let Some(ends) = self.match_reference(CacheKey::syntax(name), range, pos) {
            return ends;
        }
        let values = self.values;
        let Some(value) = values.get(pos) else {
            self.suggest(match name.strip_suffix("()") {
                Some(function) => Suggestion::Function(function.to_string()),
                None => Suggestion::DataType(name.to_string()),
            });
            return Ends::new();
        };
        single(self.primitive(name, range, value), pos)
    }

    /// Expand a cached definition. `None` when the key has no parsed definition.
    /// Left recursion grows a seed: a reference re-entered at the position it
    /// started from sees the ends found so far, and its definition is matched
    /// again until no new end appears.
    fn match_reference(&mut self, key: CacheKey, range: Option<&DataRange>, pos: usize) -> Option<Ends> {
        let cache = self.cache;
        let definition = cache.definition(&key)?;
        let guard = (key, pos);
        if let Some(seed) = self.seeds.get_mut(&guard) {
            seed.reentered = true;
            return Some(seed.ends.clone());
        }
        if self.depth >= self.max_depth {
            debug!(reference = %guard.0, pos, "reference nesting too deep");
            return Some(Ends::new());
        }

        self.seeds.insert(guard.clone(), Seed::default());
        self.depth += 1;
        if let Some(range) = range {
            self.ranges.push(*range);
        }
        let mut ends = self.match_definition(definition, pos);
        while let Some(seed) = self.seeds.get_mut(&guard) {
            if !seed.reentered || ends.is_subset(&seed.ends) {
                break;
            }
            seed.ends.extend(ends.iter().copied());
            seed.reentered = false;
            debug!(reference = %guard.0, pos, ends = seed.ends.len(), "growing left-recursive match");
            ends = self.match_definition(definition, pos);
        }
        if range.is_some() {
            self.ranges.pop();
        }
        self.depth -= 1;
        if let Some(seed) = self.seeds.remove(&guard) {
            ends.extend(seed.ends);
        }
        Some(ends)
    }

    fn match_function(&mut self, name: &str, content: &[ValueDefinition], pos: usize) -> Ends {
        let values = self.values;
        let Some(value) = values.get(pos) else {
            self.suggest(Suggestion::Function(name.to_string()));
            return Ends::new();
        };

        let accepted = match value {
            CssStyleValue::Function(f) if f.is_named(name) => {
                f.family == FunctionFamily::Math
                    || (f.is_named("url") && f.arguments.is_empty())
                    || self.match_arguments(content, &f.arguments)
            }
            CssStyleValue::Color(color) => color
                .text
                .get(..name.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(name))
                && color.text[name.len()..].starts_with('('),
            _ => false,
        };
        single(accepted, pos)
    }

    /// Whether function arguments fully match the function's content
    fn match_arguments(&mut self, content: &[ValueDefinition], arguments: &[CssStyleValue]) -> bool {
        let mut run = Run {
            cache: self.cache,
            forbidden_idents: self.forbidden_idents,
            max_depth: self.max_depth,
            values: arguments,
            record: false,
            suggestions: Vec::new(),
            seeds: HashMap::new(),
            ranges: Vec::new(),
            depth: self.depth,
        };
        run.match_sequence(content, 0).contains(&arguments.len())
    }

    /// Whether a single value is an instance of a basic data type
    fn primitive(&self, name: &str, range: Option<&DataRange>, value: &CssStyleValue) -> bool {
        if value.is_substitution() {
            return true;
        }
        let range = range.or(self.ranges.last());
        let in_range = |n: &CssUnitValue| range.map_or(true, |r| r.contains(n.value));
        let numeric = |categories: &[UnitCategory], zero: bool| match value {
            CssStyleValue::Numeric(n) => {
                (categories.contains(&n.category()) || (zero && n.is_zero())) && in_range(n)
            }
            other => other.is_math(),
        };

        match name {
            "length" => numeric(&[UnitCategory::Length], true),
            "percentage" => numeric(&[UnitCategory::Percent], false),
            "length-percentage" => numeric(&[UnitCategory::Length, UnitCategory::Percent], true),
            "number" => numeric(&[UnitCategory::Number], false),
            "integer" => match value {
                CssStyleValue::Numeric(n) => n.is_integer() && in_range(n),
                other => other.is_math(),
            },
            "zero" => value.as_numeric().is_some_and(CssUnitValue::is_zero),
            "angle" => numeric(&[UnitCategory::Angle], true),
            "angle-percentage" => numeric(&[UnitCategory::Angle, UnitCategory::Percent], true),
            "time" => numeric(&[UnitCategory::Time], false),
            "frequency" => numeric(&[UnitCategory::Frequency], false),
            "resolution" => numeric(&[UnitCategory::Resolution], false),
            "flex" => numeric(&[UnitCategory::Flex], false),
            "color" | "named-color" | "hex-color" | "system-color" | "deprecated-system-color" => is_color(value),
            "string" => matches!(value, CssStyleValue::String(_)),
            "url" => is_url(value),
            "image" => {
                is_url(value)
                    || value
                        .as_function()
                        .is_some_and(|f| f.family == FunctionFamily::Image)
            }
            "custom-ident" => value.as_keyword().is_some_and(|k| {
                !value.is_css_wide_keyword()
                    && !k.eq_ignore_ascii_case("default")
                    && !self.forbidden_idents.iter().any(|f| f.eq_ignore_ascii_case(k))
            }),
            "dashed-ident" => matches!(value, CssStyleValue::VariableReference(_)),
            "ident" => value.as_keyword().is_some(),
            "declaration-value" | "declaration-list" | "any-value" => true,
            other => match other.strip_suffix("()") {
                Some(function) => value.as_function().is_some_and(|f| f.is_named(function)),
                None => false,
            },
        }
    }

    fn suggest(&mut self, suggestion: Suggestion) {
        if self.record && !self.suggestions.contains(&suggestion) {
            self.suggestions.push(suggestion);
        }
    }
}

fn single(accepted: bool, pos: usize) -> Ends {
    if accepted {
        Ends::from([pos + 1])
    } else {
        Ends::new()
    }
}

fn is_color(value: &CssStyleValue) -> bool {
    match value {
        CssStyleValue::Color(_) => true,
        CssStyleValue::Keyword(k) => CssColorValue::from_keyword(k).is_some(),
        CssStyleValue::Function(f) => f.family == FunctionFamily::Color,
        _ => false,
    }
}

fn is_url(value: &CssStyleValue) -> bool {
    value.as_function().is_some_and(|f| f.is_named("url"))
}
