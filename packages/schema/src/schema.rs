//! Node-type declarations that content expressions are resolved against.

use serde::de::{self, MapAccess};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use webwriter_common::{GroupTieBreak, ReferenceCollector};
use crate::resolver::ResolveError;
use webwriter_parser::parse;

/// Declaration of one node type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    /// Whitespace-separated group names this node type belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Content expression describing the node's children
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl NodeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.group.as_deref().unwrap_or_default().split_whitespace()
    }

    /// Content expression, if it is not blank
    pub fn content_expression(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// How a name maps onto the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome<'a> {
    /// The name is a node type, or a group with a single member
    Resolved { node: &'a str },
    /// The name is a group with several members; `chosen` is its representative
    GroupAmbiguous {
        group: &'a str,
        candidates: &'a [String],
        chosen: &'a str,
    },
    /// The name is neither a node type nor a group
    Unchanged,
}

impl<'a> ResolutionOutcome<'a> {
    pub fn node(&self) -> Option<&'a str> {
        match self {
            ResolutionOutcome::Resolved { node } => Some(node),
            ResolutionOutcome::GroupAmbiguous { chosen, .. } => Some(chosen),
            ResolutionOutcome::Unchanged => None,
        }
    }
}

/// A reference in some node type's content that names nothing in the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownReference {
    pub node: String,
    pub name: String,
}

/// Ordered node-type declarations
///
/// Declaration order matters: it decides which node type represents a
/// group shared by several node types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    nodes: Vec<(String, NodeSpec)>,
    index: HashMap<String, usize>,
    /// group name -> member node types in declaration order
    groups: HashMap<String, Vec<String>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, name: impl Into<String>, spec: NodeSpec) -> Self {
        self.insert(name, spec);
        self
    }

    /// Add a node type. Redeclaring a name replaces its spec in place.
    pub fn insert(&mut self, name: impl Into<String>, spec: NodeSpec) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&i) => self.nodes[i].1 = spec,
            None => {
                self.index.insert(name.clone(), self.nodes.len());
                self.nodes.push((name, spec));
            }
        }
        self.rebuild_groups();
    }

    fn rebuild_groups(&mut self) {
        self.groups.clear();
        for (name, spec) in &self.nodes {
            for group in spec.groups() {
                let members = self.groups.entry(group.to_string()).or_default();
                if !members.contains(name) {
                    members.push(name.clone());
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&NodeSpec> {
        self.index.get(name).map(|&i| &self.nodes[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeSpec)> {
        self.nodes.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Member node types of a group, in declaration order
    pub fn group_members(&self, group: &str) -> &[String] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or_default()
    }

    /// Map a name to its representative node type with the default tie-break
    pub fn lookup(&self, name: &str) -> ResolutionOutcome<'_> {
        self.lookup_with(name, GroupTieBreak::default())
    }

    /// Node type names take precedence over group names.
    pub fn lookup_with(&self, name: &str, tie_break: GroupTieBreak) -> ResolutionOutcome<'_> {
        if let Some(&i) = self.index.get(name) {
            return ResolutionOutcome::Resolved {
                node: self.nodes[i].0.as_str(),
            };
        }

        let Some((group, candidates)) = self.groups.get_key_value(name) else {
            return ResolutionOutcome::Unchanged;
        };
        let chosen = match tie_break {
            GroupTieBreak::FirstDeclared => candidates.first(),
            GroupTieBreak::LastDeclared => candidates.last(),
        };
        match (chosen, candidates.len()) {
            (None, _) => ResolutionOutcome::Unchanged,
            (Some(node), 1) => ResolutionOutcome::Resolved {
                node: node.as_str(),
            },
            (Some(chosen), _) => ResolutionOutcome::GroupAmbiguous {
                group: group.as_str(),
                candidates: candidates.as_slice(),
                chosen: chosen.as_str(),
            },
        }
    }

    /// References in node content expressions that name no node type or group
    pub fn unknown_references(&self) -> Result<Vec<UnknownReference>, ResolveError> {
        let mut unknown = Vec::new();
        for (node, spec) in self.iter() {
            let Some(content) = spec.content_expression() else {
                continue;
            };
            let expr = parse(content).map_err(|source| ResolveError::NodeContent {
                node: node.to_string(),
                source,
            })?;
            for name in ReferenceCollector::collect(&expr) {
                if matches!(self.lookup(&name), ResolutionOutcome::Unchanged) {
                    unknown.push(UnknownReference {
                        node: node.to_string(),
                        name,
                    });
                }
            }
        }
        Ok(unknown)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl FromIterator<(String, NodeSpec)> for Schema {
    fn from_iter<I: IntoIterator<Item = (String, NodeSpec)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (name, spec) in iter {
            schema.insert(name, spec);
        }
        schema
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for (name, spec) in &self.nodes {
            map.serialize_entry(name, spec)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SchemaVisitor)
    }
}

/// Reads the node map entry by entry so declaration order survives
struct SchemaVisitor;

impl<'de> de::Visitor<'de> for SchemaVisitor {
    type Value = Schema;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of node type names to node specs")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Schema, A::Error> {
        let mut schema = Schema::new();
        while let Some((name, spec)) = access.next_entry::<String, NodeSpec>()? {
            schema.insert(name, spec);
        }
        Ok(schema)
    }
}
