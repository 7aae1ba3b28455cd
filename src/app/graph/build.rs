use std::collections::HashMap;

use eframe::egui::vec2;

use crate::codegraph::CodeGraph;

use super::super::{Scene, SceneLink, SceneNode};

const GOLDEN_ANGLE: f32 = 2.399_963;

impl Scene {
    /// Node order is the sorted id order so a given document always seeds
    /// the same layout; initial positions follow a phyllotaxis spiral.
    pub(in crate::app) fn from_graph(graph: &CodeGraph) -> Self {
        let mut ids = graph.nodes.keys().cloned().collect::<Vec<_>>();
        ids.sort_unstable();

        let mut index_by_id = HashMap::with_capacity(ids.len());
        let mut nodes = Vec::with_capacity(ids.len());
        for (index, id) in ids.into_iter().enumerate() {
            let record = &graph.nodes[&id];
            let radius = 10.0 * ((index as f32) + 0.5).sqrt();
            let angle = (index as f32) * GOLDEN_ANGLE;

            index_by_id.insert(id.clone(), index);
            nodes.push(SceneNode {
                id,
                name: record.name.clone(),
                node_type: record.node_type,
                pos: vec2(angle.cos(), angle.sin()) * radius,
                vel: vec2(0.0, 0.0),
                pin: None,
            });
        }

        let links = graph
            .links
            .iter()
            .filter_map(|link| {
                let source = *index_by_id.get(&link.source)?;
                let target = *index_by_id.get(&link.target)?;
                Some(SceneLink {
                    source,
                    target,
                    link_type: link.link_type,
                })
            })
            .collect();

        Self {
            nodes,
            links,
            index_by_id,
        }
    }
}
