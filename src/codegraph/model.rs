use std::collections::HashMap;

use serde::Deserialize;

/// Kind of code entity; unrecognized tags degrade to `Unknown`.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String")]
pub enum NodeType {
    Function,
    Method,
    Class,
    Interface,
    Module,
    Variable,
    Constant,
    TypeDefinition,
    Unknown,
}

impl NodeType {
    pub const ALL: [NodeType; 9] = [
        NodeType::Function,
        NodeType::Method,
        NodeType::Class,
        NodeType::Interface,
        NodeType::Module,
        NodeType::Variable,
        NodeType::Constant,
        NodeType::TypeDefinition,
        NodeType::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Function => "Function",
            Self::Method => "Method",
            Self::Class => "Class",
            Self::Interface => "Interface",
            Self::Module => "Module",
            Self::Variable => "Variable",
            Self::Constant => "Constant",
            Self::TypeDefinition => "TypeDefinition",
            Self::Unknown => "Unknown",
        }
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "Function" => Self::Function,
            "Method" => Self::Method,
            "Class" => Self::Class,
            "Interface" => Self::Interface,
            "Module" => Self::Module,
            "Variable" => Self::Variable,
            "Constant" => Self::Constant,
            "TypeDefinition" => Self::TypeDefinition,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String")]
pub enum LinkType {
    Calls,
    Imports,
    Inherits,
    References,
    Implements,
    Contains,
    DependsOn,
    Unknown,
}

impl LinkType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Calls => "Calls",
            Self::Imports => "Imports",
            Self::Inherits => "Inherits",
            Self::References => "References",
            Self::Implements => "Implements",
            Self::Contains => "Contains",
            Self::DependsOn => "DependsOn",
            Self::Unknown => "Unknown",
        }
    }
}

impl From<String> for LinkType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "Calls" => Self::Calls,
            "Imports" => Self::Imports,
            "Inherits" => Self::Inherits,
            "References" => Self::References,
            "Implements" => Self::Implements,
            "Contains" => Self::Contains,
            "DependsOn" => Self::DependsOn,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CodeNode {
    pub id: String,
    pub name: String,
    pub node_type: NodeType,
    pub file_path: String,
    pub line_range: (usize, usize),
    pub content: String,
    pub summary: Option<String>,
    pub metadata: HashMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeLink {
    pub source: String,
    pub target: String,
    pub link_type: LinkType,
}

#[derive(Clone, Debug, Default)]
pub struct CodeGraph {
    pub nodes: HashMap<String, CodeNode>,
    pub links: Vec<CodeLink>,
}

impl CodeGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Links touching the given node in either direction.
    pub fn links_of<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a CodeLink> {
        self.links
            .iter()
            .filter(move |link| link.source == node_id || link.target == node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_type_tags_fall_back_to_unknown() {
        assert_eq!(NodeType::from("Macro".to_owned()), NodeType::Unknown);
        assert_eq!(LinkType::from("Overrides".to_owned()), LinkType::Unknown);
    }

    #[test]
    fn known_tags_round_trip_through_labels() {
        for node_type in NodeType::ALL {
            assert_eq!(NodeType::from(node_type.label().to_owned()), node_type);
        }
    }
}
