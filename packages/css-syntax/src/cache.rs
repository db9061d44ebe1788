use crate::definition::ValueDefinition;
use crate::parse_value_definition;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use webwriter_parser::ParseError;

/// Name of a cached definition. Properties and syntaxes live in separate namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheKey {
    /// A `<data-type>` defined in the syntax table
    Syntax(String),
    /// A `<'property'>` defined in the property table
    Property(String),
}

impl CacheKey {
    pub fn syntax(name: impl Into<String>) -> Self {
        CacheKey::Syntax(name.into())
    }

    pub fn property(name: impl Into<String>) -> Self {
        CacheKey::Property(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            CacheKey::Syntax(name) | CacheKey::Property(name) => name,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Syntax(name) => write!(f, "<{}>", name),
            CacheKey::Property(name) => write!(f, "<'{}'>", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    /// Referenced, not parsed yet
    Pending,
    /// Its syntax is being parsed
    InProgress,
    Done(Arc<ValueDefinition>),
    /// No syntax of its own: a basic data type such as `<length>`
    Basic,
    /// Its syntax failed to parse
    Failed(ParseError),
}

/// Memo table of parsed definitions
///
/// Every reference registers a `Pending` placeholder before anything parses
/// it, so each name is parsed at most once and cyclic grammars terminate.
#[derive(Debug, Clone, Default)]
pub struct DefinitionCache {
    entries: Vec<(CacheKey, CacheEntry)>,
    index: HashMap<CacheKey, usize>,
}

impl DefinitionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn definition(&self, key: &CacheKey) -> Option<&Arc<ValueDefinition>> {
        match self.get(key) {
            Some(CacheEntry::Done(def)) => Some(def),
            _ => None,
        }
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.index.contains_key(key)
    }

    /// Add a `Pending` placeholder unless the key is known. Returns whether it was added.
    pub fn register(&mut self, key: CacheKey) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, CacheEntry::Pending));
        true
    }

    pub fn set(&mut self, key: CacheKey, entry: CacheEntry) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = entry,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, entry));
            }
        }
    }

    /// Back-fill a parsed definition
    pub fn fill(&mut self, key: CacheKey, definition: ValueDefinition) {
        self.set(key, CacheEntry::Done(Arc::new(definition)));
    }

    pub fn pending(&self) -> Vec<&CacheKey> {
        self.entries
            .iter()
            .filter(|(_, entry)| matches!(entry, CacheEntry::Pending))
            .map(|(key, _)| key)
            .collect()
    }

    /// Resolve every pending entry, including those discovered on the way.
    ///
    /// `lookup` yields the syntax text for a key, or `None` for a basic type.
    /// Returns the keys whose syntax failed to parse.
    pub fn drain_pending<'s, F>(&mut self, mut lookup: F) -> Vec<(CacheKey, ParseError)>
    where
        F: FnMut(&CacheKey) -> Option<&'s str>,
    {
        let mut failures = Vec::new();
        let mut cursor = 0;
        while cursor < self.entries.len() {
            if !matches!(self.entries[cursor].1, CacheEntry::Pending) {
                cursor += 1;
                continue;
            }

            let key = self.entries[cursor].0.clone();
            self.entries[cursor].1 = CacheEntry::InProgress;
            match lookup(&key) {
                None => {
                    debug!(key = %key, "no syntax, treating as basic type");
                    self.entries[cursor].1 = CacheEntry::Basic;
                }
                Some(syntax) => {
                    if let Err(e) = parse_value_definition(syntax, Some(&mut *self), Some(key.clone())) {
                        self.set(key.clone(), CacheEntry::Failed(e.clone()));
                        failures.push((key, e));
                    }
                }
            }
            cursor += 1;
        }
        failures
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CacheKey, &CacheEntry)> {
        self.entries.iter().map(|(key, entry)| (key, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut cache = DefinitionCache::new();
        assert!(cache.register(CacheKey::syntax("length")));
        assert!(!cache.register(CacheKey::syntax("length")));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&CacheKey::syntax("length")), Some(&CacheEntry::Pending));
    }

    #[test]
    fn test_namespaces_are_separate() {
        let mut cache = DefinitionCache::new();
        cache.register(CacheKey::syntax("color"));
        cache.register(CacheKey::property("color"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_drain_marks_unknown_names_basic() {
        let mut cache = DefinitionCache::new();
        cache.register(CacheKey::syntax("length"));
        let failures = cache.drain_pending(|_| None);
        assert!(failures.is_empty());
        assert_eq!(cache.get(&CacheKey::syntax("length")), Some(&CacheEntry::Basic));
        assert!(cache.pending().is_empty());
    }

    #[test]
    fn test_drain_follows_new_references() {
        let mut cache = DefinitionCache::new();
        cache.register(CacheKey::syntax("a"));
        cache.drain_pending(|key| match key.name() {
            "a" => Some("<b> | none"),
            "b" => Some("<length> <b>?"),
            _ => None,
        });
        assert!(cache.definition(&CacheKey::syntax("a")).is_some());
        assert!(cache.definition(&CacheKey::syntax("b")).is_some());
        assert_eq!(cache.get(&CacheKey::syntax("length")), Some(&CacheEntry::Basic));
    }

    #[test]
    fn test_drain_records_failures() {
        let mut cache = DefinitionCache::new();
        cache.register(CacheKey::syntax("broken"));
        let failures = cache.drain_pending(|_| Some("[ a |"));
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            cache.get(&CacheKey::syntax("broken")),
            Some(CacheEntry::Failed(_))
        ));
    }
}
