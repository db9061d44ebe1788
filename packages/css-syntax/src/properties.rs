use crate::cache::{CacheEntry, CacheKey, DefinitionCache};
use crate::definition::ValueDefinition;
use crate::parse_value_definition;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use webwriter_common::CssConfig;
use webwriter_parser::ParseError;

const PROPERTIES_JSON: &str = include_str!("../data/properties.json");
const SYNTAXES_JSON: &str = include_str!("../data/syntaxes.json");

/// Shared syntaxes resolved before everything else, so that the syntaxes
/// referring to them find a finished definition
pub const SYNTAX_SEQUENCE: &[&str] = &[
    "length-percentage",
    "visual-box",
    "box",
    "line-names",
    "name-repeat",
    "masking-mode",
    "mask-source",
    "target",
    "cubic-bezier-timing-function",
    "step-timing-function",
    "single-animation-iteration-count",
    "single-animation-direction",
    "single-animation-fill-mode",
    "single-animation-play-state",
    "bg-position",
    "transition-behavior-value",
    "single-animation-timeline",
    "single-transition-property",
    "easing-function",
    "shape-box",
    "quote",
    "display-outside",
    "counter-style-name",
    "mask-reference",
    "paint-box",
];

/// Property syntaxes replaced with a version the matcher understands
const PROPERTY_OVERRIDES: &[(&str, &str)] =
    &[("offset-path", "none | <url> | <basic-shape> || <coord-box>")];

const SYNTAX_OVERRIDES: &[(&str, &str)] = &[(
    "keyframe-block",
    "<keyframe-selector># '{' <declaration-list> '}'",
)];

/// Syntaxes shadowed by a property of the same name
const EXCLUDED_SYNTAXES: &[&str] = &["offset-path"];

const RESERVED_IDENTS: &[&str] = &["unset", "initial", "inherit", "none"];

const LIST_STYLE_IDENTS: &[&str] = &[
    "unset", "initial", "inherit", "none", "inline", "outside", "disc", "circle", "square",
    "decimal", "cjk-decimal", "decimal-leading-zero", "lower-roman", "upper-roman", "lower-greek",
    "lower-alpha", "lower-latin", "upper-alpha", "upper-latin", "arabic-indic", "armenian",
    "bengali", "cambodian", "cjk-earthly-branch", "cjk-heavenly-stem", "cjk-ideographic",
    "devanagari", "ethiopic-numeric", "georgian", "gujarati", "gurmukhi", "hebrew", "hiragana",
    "hiragana-iroha", "japanese-formal", "japanese-informal", "kannada", "katakana",
    "katakana-iroha", "khmer", "korean-hangul-formal", "korean-hanja-formal",
    "korean-hanja-informal", "lao", "lower-armenian", "malayalam", "mongolian", "myanmar", "oriya",
    "persian", "simp-chinese-formal", "simp-chinese-informal", "tamil", "telugu", "thai", "tibetan",
    "trad-chinese-formal", "trad-chinese-informal", "upper-armenian", "disclosure-open",
    "disclosure-closed",
];

/// Identifiers a property's `<custom-ident>` may not take
const FORBIDDEN_IDENTS: &[(&str, &[&str])] = &[
    ("animation-name", RESERVED_IDENTS),
    ("counter-reset", RESERVED_IDENTS),
    ("counter-increment", RESERVED_IDENTS),
    ("view-transition-name", RESERVED_IDENTS),
    ("list-style-type", LIST_STYLE_IDENTS),
    ("grid-row-start", &["span"]),
    ("grid-row-end", &["span"]),
    ("grid-column-start", &["span"]),
    ("grid-column-end", &["span"]),
    (
        "will-change",
        &["unset", "initial", "inherit", "will-change", "auto", "scroll-position", "contents"],
    ),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySpec {
    pub syntax: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forbidden_idents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxSpec {
    pub syntax: String,
}

/// A bundled syntax that did not parse
#[derive(Debug, Clone)]
pub struct SyntaxFailure {
    pub key: CacheKey,
    pub syntax: String,
    pub error: ParseError,
}

/// CSS properties and named syntaxes with their parsed value definitions
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    properties: BTreeMap<String, PropertySpec>,
    syntaxes: BTreeMap<String, SyntaxSpec>,
    cache: DefinitionCache,
    errors: Vec<SyntaxFailure>,
}

static STANDARD: Lazy<PropertyTable> = Lazy::new(|| {
    PropertyTable::from_json(PROPERTIES_JSON, SYNTAXES_JSON, &CssConfig::default()).unwrap_or_else(
        |e| {
            warn!(error = %e, "bundled property data is malformed");
            PropertyTable::default()
        },
    )
});

impl PropertyTable {
    /// The table built from the bundled property data, on first use
    pub fn standard() -> &'static PropertyTable {
        &STANDARD
    }

    pub fn from_json(properties: &str, syntaxes: &str, config: &CssConfig) -> serde_json::Result<Self> {
        let properties = serde_json::from_str(properties)?;
        let syntaxes = serde_json::from_str(syntaxes)?;
        Ok(Self::build(properties, syntaxes, config))
    }

    /// Apply the data overrides and parse the definitions
    ///
    /// With startup diagnostics every syntax is parsed, sequenced ones first,
    /// and the failures are logged. Otherwise only what the properties reach
    /// is parsed.
    pub fn build(
        mut properties: BTreeMap<String, PropertySpec>,
        mut syntaxes: BTreeMap<String, SyntaxSpec>,
        config: &CssConfig,
    ) -> Self {
        for (name, syntax) in PROPERTY_OVERRIDES {
            if let Some(spec) = properties.get_mut(*name) {
                spec.syntax = syntax.to_string();
            }
        }
        for (name, idents) in FORBIDDEN_IDENTS {
            if let Some(spec) = properties.get_mut(*name) {
                if spec.forbidden_idents.is_empty() {
                    spec.forbidden_idents = idents.iter().map(|s| s.to_string()).collect();
                }
            }
        }
        for name in EXCLUDED_SYNTAXES {
            syntaxes.remove(*name);
        }
        for (name, syntax) in SYNTAX_OVERRIDES {
            if let Some(spec) = syntaxes.get_mut(*name) {
                spec.syntax = syntax.to_string();
            }
        }

        let mut cache = DefinitionCache::new();
        let mut errors = Vec::new();

        if config.startup_diagnostics {
            let sequenced = SYNTAX_SEQUENCE
                .iter()
                .filter_map(|name| syntaxes.get_key_value(*name));
            let rest = syntaxes
                .iter()
                .filter(|(name, _)| !SYNTAX_SEQUENCE.contains(&name.as_str()));
            for (name, spec) in sequenced.chain(rest) {
                parse_entry(&mut cache, CacheKey::syntax(name), &spec.syntax, &mut errors);
            }
        }
        for (name, spec) in &properties {
            parse_entry(&mut cache, CacheKey::property(name), &spec.syntax, &mut errors);
        }

        let failures = cache.drain_pending(|key| match key {
            CacheKey::Syntax(name) => syntaxes.get(name).map(|s| s.syntax.as_str()),
            CacheKey::Property(name) => properties.get(name).map(|s| s.syntax.as_str()),
        });
        for (key, error) in failures {
            let syntax = match &key {
                CacheKey::Syntax(name) => syntaxes.get(name).map(|s| s.syntax.clone()),
                CacheKey::Property(name) => properties.get(name).map(|s| s.syntax.clone()),
            };
            errors.push(SyntaxFailure {
                key,
                syntax: syntax.unwrap_or_default(),
                error,
            });
        }

        if config.startup_diagnostics {
            for failure in &errors {
                debug!(key = %failure.key, error = %failure.error, "syntax failed to parse");
            }
            if errors.is_empty() {
                info!(
                    properties = properties.len(),
                    syntaxes = syntaxes.len(),
                    "all value definition syntaxes parsed"
                );
            } else {
                warn!(
                    failed = errors.len(),
                    total = properties.len() + syntaxes.len(),
                    "{} value definition syntaxes failed to parse",
                    errors.len()
                );
            }
        }

        Self {
            properties,
            syntaxes,
            cache,
            errors,
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.get(name)
    }

    pub fn syntax(&self, name: &str) -> Option<&SyntaxSpec> {
        self.syntaxes.get(name)
    }

    /// Parsed value definition of a property
    pub fn definition(&self, property: &str) -> Option<&Arc<ValueDefinition>> {
        self.cache.definition(&CacheKey::property(property))
    }

    /// Parsed value definition of a named syntax such as `length-percentage`
    pub fn syntax_definition(&self, name: &str) -> Option<&Arc<ValueDefinition>> {
        self.cache.definition(&CacheKey::syntax(name))
    }

    pub fn cache(&self) -> &DefinitionCache {
        &self.cache
    }

    pub fn errors(&self) -> &[SyntaxFailure] {
        &self.errors
    }

    pub fn forbidden_idents(&self, property: &str) -> &[String] {
        self.properties
            .get(property)
            .map(|spec| spec.forbidden_idents.as_slice())
            .unwrap_or(&[])
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}

fn parse_entry(
    cache: &mut DefinitionCache,
    key: CacheKey,
    syntax: &str,
    errors: &mut Vec<SyntaxFailure>,
) {
    if matches!(
        cache.get(&key),
        Some(CacheEntry::Done(_) | CacheEntry::Failed(_) | CacheEntry::InProgress)
    ) {
        return;
    }

    cache.set(key.clone(), CacheEntry::InProgress);
    if let Err(error) = parse_value_definition(syntax, Some(&mut *cache), Some(key.clone())) {
        cache.set(key.clone(), CacheEntry::Failed(error.clone()));
        errors.push(SyntaxFailure {
            key,
            syntax: syntax.to_string(),
            error,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(properties: &[(&str, &str)], syntaxes: &[(&str, &str)]) -> PropertyTable {
        let properties = properties
            .iter()
            .map(|(k, v)| {
                (
                    k.to_string(),
                    PropertySpec {
                        syntax: v.to_string(),
                        forbidden_idents: Vec::new(),
                    },
                )
            })
            .collect();
        let syntaxes = syntaxes
            .iter()
            .map(|(k, v)| (k.to_string(), SyntaxSpec { syntax: v.to_string() }))
            .collect();
        PropertyTable::build(properties, syntaxes, &CssConfig::default())
    }

    #[test]
    fn test_property_reference_resolves() {
        let table = table(
            &[("flex-basis", "content | <'width'>"), ("width", "auto | <length>")],
            &[],
        );
        assert!(table.definition("flex-basis").is_some());
        assert!(table.definition("width").is_some());
        assert!(table.errors().is_empty());
    }

    #[test]
    fn test_overrides_apply() {
        let table = table(
            &[("offset-path", "none | <offset-path> || <coord-box>")],
            &[
                ("offset-path", "<ray()> | <url>"),
                ("keyframe-block", "<keyframe-selector># {\n <declaration-list>\n}"),
            ],
        );
        assert_eq!(
            table.property("offset-path").map(|p| p.syntax.as_str()),
            Some("none | <url> | <basic-shape> || <coord-box>")
        );
        assert!(table.syntax("offset-path").is_none());
        assert!(table.syntax_definition("keyframe-block").is_some());
        assert!(table.errors().is_empty());
    }

    #[test]
    fn test_forbidden_idents_are_attached() {
        let table = table(&[("grid-row-start", "auto | <custom-ident>")], &[]);
        assert_eq!(table.forbidden_idents("grid-row-start"), ["span".to_string()]);
        assert!(table.forbidden_idents("color").is_empty());
    }

    #[test]
    fn test_failures_are_collected() {
        let table = table(&[("broken", "[ a | b")], &[("also-broken", "a {4,1}")]);
        assert_eq!(table.errors().len(), 2);
        assert!(matches!(
            table.cache().get(&CacheKey::property("broken")),
            Some(CacheEntry::Failed(_))
        ));
    }
}
