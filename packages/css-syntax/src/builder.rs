use crate::cache::{CacheKey, DefinitionCache};
use crate::definition::{DataRange, DefinitionKind, ValueDefinition};
use crate::syntax_tree::{Multiplier, SyntaxKind, SyntaxNode, SyntaxVisitor};
use std::ops::Range;

/// A group's multiplier, waiting for the node it applies to
#[derive(Debug, Clone)]
struct GroupQuantification {
    multiplier: Multiplier,
    span: Range<usize>,
}

struct Frame {
    definition: ValueDefinition,
    groups: Vec<GroupQuantification>,
}

/// Streams a syntax tree into a `ValueDefinition`
///
/// Leaves are appended to the innermost open composite, or become the root.
/// Composites open a frame that is closed when the walk leaves them.
pub struct TreeBuilder<'a> {
    source: &'a str,
    cache: Option<&'a mut DefinitionCache>,
    frames: Vec<Frame>,
    /// Enclosing groups not yet applied, outermost first
    group_quantification: Vec<GroupQuantification>,
    root: Option<ValueDefinition>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(source: &'a str, cache: Option<&'a mut DefinitionCache>) -> Self {
        Self {
            source,
            cache,
            frames: Vec::new(),
            group_quantification: Vec::new(),
            root: None,
        }
    }

    pub fn finish(self) -> Option<ValueDefinition> {
        self.root
    }

    fn raw(&self, span: &Range<usize>) -> String {
        self.source[span.clone()].to_string()
    }

    fn leaf(&mut self, node: &SyntaxNode) -> ValueDefinition {
        let name = node.name.clone().unwrap_or_default();
        let kind = match node.kind {
            SyntaxKind::String => DefinitionKind::String { content: name },
            SyntaxKind::DataType => {
                let (name, range) = split_range(&name);
                self.register(CacheKey::syntax(&name));
                DefinitionKind::DataType { name, range }
            }
            SyntaxKind::PropertyReference => {
                self.register(CacheKey::property(&name));
                DefinitionKind::PropertyReference { name }
            }
            _ => DefinitionKind::Literal { content: name },
        };
        self.with_multiplier(ValueDefinition::new(kind, self.raw(&node.span), node.span.clone()), node)
    }

    fn composite(&self, node: &SyntaxNode) -> ValueDefinition {
        let kind = match node.kind {
            SyntaxKind::FunctionCall => DefinitionKind::FunctionCall {
                name: node.name.clone().unwrap_or_default(),
                content: Vec::new(),
            },
            SyntaxKind::UnorderedSequence => DefinitionKind::UnorderedSequence { content: Vec::new() },
            SyntaxKind::Subset => DefinitionKind::Subset { content: Vec::new() },
            SyntaxKind::Alternation => DefinitionKind::Alternation { content: Vec::new() },
            _ => DefinitionKind::OrderedSequence { content: Vec::new() },
        };
        self.with_multiplier(ValueDefinition::new(kind, self.raw(&node.span), node.span.clone()), node)
    }

    fn with_multiplier(&self, mut definition: ValueDefinition, node: &SyntaxNode) -> ValueDefinition {
        definition.quantifier = node.multiplier.quantifier;
        definition.separator = node.multiplier.separator;
        definition.required = node.multiplier.required;
        definition
    }

    fn register(&mut self, key: CacheKey) {
        if let Some(cache) = self.cache.as_deref_mut() {
            cache.register(key);
        }
    }

    /// Apply a pending group multiplier. An unmultiplied node takes it over;
    /// otherwise the node is wrapped in a one-element ordered sequence.
    fn apply_group(&self, definition: ValueDefinition, group: GroupQuantification) -> ValueDefinition {
        let raw = self.raw(&group.span);
        if group.multiplier.is_default() || definition.has_default_multiplier() {
            let mut definition = definition;
            if !group.multiplier.is_default() {
                definition.quantifier = group.multiplier.quantifier;
                definition.separator = group.multiplier.separator;
                definition.required = group.multiplier.required;
            }
            definition.raw = raw;
            definition.span = group.span;
            return definition;
        }

        let mut wrapper = ValueDefinition::new(
            DefinitionKind::OrderedSequence {
                content: vec![definition],
            },
            raw,
            group.span,
        );
        wrapper.quantifier = group.multiplier.quantifier;
        wrapper.separator = group.multiplier.separator;
        wrapper.required = group.multiplier.required;
        wrapper
    }

    fn attach(&mut self, definition: ValueDefinition, groups: Vec<GroupQuantification>) {
        let definition = groups
            .into_iter()
            .rev()
            .fold(definition, |def, group| self.apply_group(def, group));
        match self.frames.last_mut().and_then(|f| f.definition.children_mut()) {
            Some(content) => content.push(definition),
            None => self.root = Some(definition),
        }
    }
}

impl SyntaxVisitor for TreeBuilder<'_> {
    fn enter(&mut self, node: &SyntaxNode) -> bool {
        match node.kind {
            SyntaxKind::Group => {
                self.group_quantification.push(GroupQuantification {
                    multiplier: node.multiplier,
                    span: node.span.clone(),
                });
                true
            }
            kind if kind.is_leaf() => {
                let groups = std::mem::take(&mut self.group_quantification);
                let definition = self.leaf(node);
                self.attach(definition, groups);
                false
            }
            _ => {
                let groups = std::mem::take(&mut self.group_quantification);
                let definition = self.composite(node);
                self.frames.push(Frame { definition, groups });
                true
            }
        }
    }

    fn leave(&mut self, node: &SyntaxNode) {
        if node.kind.is_leaf() || node.kind == SyntaxKind::Group {
            return;
        }
        if let Some(frame) = self.frames.pop() {
            self.attach(frame.definition, frame.groups);
        }
    }
}

/// Split `number [0,∞]` into the data type name and its range
fn split_range(text: &str) -> (String, Option<DataRange>) {
    match text.find('[') {
        Some(i) => (text[..i].trim().to_string(), DataRange::parse(&text[i..])),
        None => (text.to_string(), None),
    }
}
