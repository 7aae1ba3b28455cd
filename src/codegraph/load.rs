use std::collections::HashMap;
use std::fs;
use std::io;

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

use super::model::{CodeGraph, CodeLink, CodeNode, LinkType, NodeType};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read graph document {path}: {source}")]
    Fetch {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("graph document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Raw document records, deliberately permissive: the pipeline writes extra
/// fields the viewer ignores. An empty `nodes` map is a valid empty graph.
#[derive(Debug, Deserialize)]
struct RawDocument {
    nodes: HashMap<String, RawNode>,
    #[serde(default)]
    outgoing_edges: HashMap<String, Vec<RawEdge>>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    name: Option<String>,
    node_type: Option<NodeType>,
    #[serde(default)]
    file_path: String,
    line_range: Option<(usize, usize)>,
    #[serde(default)]
    content: String,
    summary: Option<String>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    to_id: Option<String>,
    relationship_type: Option<LinkType>,
}

/// `Fetch` and `Parse` failures are terminal for the session; anything
/// wrong with an individual record degrades to a skipped entry.
pub fn load_code_graph(path: &str) -> Result<CodeGraph, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Fetch {
        path: path.to_owned(),
        source,
    })?;
    let graph = parse_code_graph(&raw)?;
    info!(
        "loaded code graph from {path}: {} nodes, {} links",
        graph.node_count(),
        graph.link_count()
    );
    Ok(graph)
}

/// Duplicate node ids resolve last-write-wins; nameless records are
/// skipped; dangling links are dropped so every later lookup is total.
pub(crate) fn parse_code_graph(raw: &str) -> Result<CodeGraph, LoadError> {
    let document: RawDocument = serde_json::from_str(raw)?;

    let mut nodes = HashMap::with_capacity(document.nodes.len());
    for (id, record) in document.nodes {
        let Some(name) = record.name else {
            warn!("node {id}: missing `name`, skipping record");
            continue;
        };

        let line_range = match record.line_range.unwrap_or((0, 0)) {
            (start, end) if start <= end => (start, end),
            (start, end) => {
                warn!("node {id}: line range {start}-{end} is reversed, swapping");
                (end, start)
            }
        };

        nodes.insert(
            id.clone(),
            CodeNode {
                id,
                name,
                node_type: record.node_type.unwrap_or(NodeType::Unknown),
                file_path: record.file_path,
                line_range,
                content: record.content,
                summary: record.summary,
                metadata: record.metadata,
            },
        );
    }

    let mut links = Vec::new();
    let mut dropped = 0usize;
    for (source, edges) in document.outgoing_edges {
        for edge in edges {
            let Some(target) = edge.to_id else {
                dropped += 1;
                continue;
            };

            if !nodes.contains_key(&source) || !nodes.contains_key(&target) {
                dropped += 1;
                continue;
            }

            links.push(CodeLink {
                source: source.clone(),
                target,
                link_type: edge.relationship_type.unwrap_or(LinkType::Unknown),
            });
        }
    }

    if dropped > 0 {
        warn!("dropped {dropped} dangling or incomplete links from the document");
    }

    links.sort_by(|a, b| {
        a.source
            .cmp(&b.source)
            .then_with(|| a.target.cmp(&b.target))
    });

    Ok(CodeGraph { nodes, links })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn node_json(name: &str, node_type: &str) -> String {
        format!(
            r#"{{ "name": "{name}", "node_type": "{node_type}", "file_path": "src/lib.rs",
                  "line_range": [1, 4], "content": "fn {name}() {{}}" }}"#
        )
    }

    #[test]
    fn parses_nodes_and_outgoing_edges() {
        let raw = format!(
            r#"{{ "nodes": {{ "a": {a}, "b": {b} }},
                  "outgoing_edges": {{ "a": [ {{ "to_id": "b", "relationship_type": "Calls" }} ] }} }}"#,
            a = node_json("alpha", "Function"),
            b = node_json("beta", "Class"),
        );

        let graph = parse_code_graph(&raw).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.nodes["a"].name, "alpha");
        assert_eq!(graph.nodes["b"].node_type, NodeType::Class);
        assert_eq!(
            graph.links,
            vec![CodeLink {
                source: "a".to_owned(),
                target: "b".to_owned(),
                link_type: LinkType::Calls,
            }]
        );
    }

    #[test]
    fn duplicate_node_ids_resolve_last_write_wins() {
        let raw = format!(
            r#"{{ "nodes": {{ "a": {first}, "a": {second} }}, "outgoing_edges": {{}} }}"#,
            first = node_json("first", "Function"),
            second = node_json("second", "Class"),
        );

        let graph = parse_code_graph(&raw).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.nodes["a"].name, "second");
        assert_eq!(graph.nodes["a"].node_type, NodeType::Class);
    }

    #[test]
    fn dangling_links_are_dropped_at_load() {
        let raw = format!(
            r#"{{ "nodes": {{ "a": {a} }},
                  "outgoing_edges": {{
                      "a": [ {{ "to_id": "missing", "relationship_type": "Calls" }} ],
                      "ghost": [ {{ "to_id": "a", "relationship_type": "Imports" }} ]
                  }} }}"#,
            a = node_json("alpha", "Function"),
        );

        let graph = parse_code_graph(&raw).unwrap();
        assert!(graph.links.is_empty());
    }

    #[test]
    fn unknown_tags_degrade_instead_of_failing() {
        let raw = format!(
            r#"{{ "nodes": {{ "a": {a}, "b": {b} }},
                  "outgoing_edges": {{ "a": [ {{ "to_id": "b", "relationship_type": "Shadows" }} ] }} }}"#,
            a = node_json("alpha", "Widget"),
            b = node_json("beta", "Function"),
        );

        let graph = parse_code_graph(&raw).unwrap();
        assert_eq!(graph.nodes["a"].node_type, NodeType::Unknown);
        assert_eq!(graph.links[0].link_type, LinkType::Unknown);
    }

    #[test]
    fn reversed_line_ranges_are_swapped() {
        let raw = r#"{ "nodes": { "a": { "name": "alpha", "node_type": "Function",
                          "file_path": "x.rs", "line_range": [9, 3], "content": "" } },
                       "outgoing_edges": {} }"#;

        let graph = parse_code_graph(raw).unwrap();
        assert_eq!(graph.nodes["a"].line_range, (3, 9));
    }

    #[test]
    fn nameless_record_is_skipped_without_blocking_the_rest() {
        let raw = format!(
            r#"{{ "nodes": {{
                      "a": {a},
                      "broken": {{ "node_type": "Function", "file_path": "x.rs",
                                   "line_range": [1, 2], "content": "" }}
                  }},
                  "outgoing_edges": {{ "a": [ {{ "to_id": "broken", "relationship_type": "Calls" }} ] }} }}"#,
            a = node_json("alpha", "Function"),
        );

        let graph = parse_code_graph(&raw).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert!(graph.nodes.contains_key("a"));
        // Links into the skipped record drop as dangling.
        assert!(graph.links.is_empty());
    }

    #[test]
    fn empty_node_set_is_a_valid_empty_graph() {
        let graph = parse_code_graph(r#"{ "nodes": {}, "outgoing_edges": {} }"#).unwrap();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn document_without_a_nodes_map_is_a_parse_error() {
        assert!(matches!(
            parse_code_graph(r#"{ "outgoing_edges": {} }"#),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        assert!(matches!(
            parse_code_graph(r#"{ "nodes": [1, 2, 3] }"#),
            Err(LoadError::Parse(_))
        ));
        assert!(matches!(
            parse_code_graph("not json"),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_a_fetch_error() {
        let missing = std::env::temp_dir().join("codegraph-explorer-no-such-document.json");
        match load_code_graph(missing.to_str().unwrap()) {
            Err(LoadError::Fetch { path, .. }) => assert!(path.ends_with("document.json")),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[test]
    fn loads_document_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "nodes": {{ "a": {} }}, "outgoing_edges": {{}} }}"#,
            node_json("alpha", "Function")
        )
        .unwrap();

        let graph = load_code_graph(file.path().to_str().unwrap()).unwrap();
        assert_eq!(graph.node_count(), 1);
    }
}
