use eframe::egui::{Vec2, vec2};

use super::super::Scene;
use super::quadtree::QuadNode;
use super::{CENTER_STRENGTH, CHARGE_STRENGTH, LINK_DISTANCE};

const BARNES_HUT_THETA: f32 = 0.9;
/// Squared distance floor for the repulsion terms.
const MIN_DISTANCE_SQ: f32 = 1.0;

/// Deterministic nudge for exactly coincident endpoints.
fn jiggle(seed: usize) -> Vec2 {
    let angle = ((seed as f32) * 0.618_034 + 0.37) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin()) * 1e-3
}

/// Spring per link toward `LINK_DISTANCE`, strength and bias weighted by
/// endpoint degree.
pub(super) fn apply_link_springs(scene: &mut Scene, alpha: f32) {
    let node_count = scene.nodes.len();
    if node_count == 0 || scene.links.is_empty() {
        return;
    }

    let mut degree = vec![0.0_f32; node_count];
    for link in &scene.links {
        degree[link.source] += 1.0;
        degree[link.target] += 1.0;
    }

    for (link_index, link) in scene.links.iter().enumerate() {
        let (source, target) = (link.source, link.target);
        if source == target {
            continue;
        }

        let mut delta = (scene.nodes[target].pos + scene.nodes[target].vel)
            - (scene.nodes[source].pos + scene.nodes[source].vel);
        if delta.length_sq() < 1e-8 {
            delta = jiggle(link_index);
        }

        let distance = delta.length();
        let strength = 1.0 / degree[source].min(degree[target]).max(1.0);
        let displacement = (distance - LINK_DISTANCE) / distance * alpha * strength;
        let bias = degree[source] / (degree[source] + degree[target]);

        let correction = delta * displacement;
        scene.nodes[target].vel -= correction * bias;
        scene.nodes[source].vel += correction * (1.0 - bias);
    }
}

/// All-pairs repulsion, approximated through a Barnes-Hut quadtree.
pub(super) fn apply_many_body(scene: &mut Scene, alpha: f32) {
    if scene.nodes.len() < 2 {
        return;
    }

    let positions = scene
        .nodes
        .iter()
        .map(|node| node.pos)
        .collect::<Vec<_>>();

    let Some(quadtree) = QuadNode::build(&positions) else {
        return;
    };

    for (index, node) in scene.nodes.iter_mut().enumerate() {
        let mut push = Vec2::ZERO;
        accumulate_repulsion(&quadtree, index, &positions, alpha, &mut push);
        node.vel += push;
    }
}

fn accumulate_repulsion(
    quad: &QuadNode,
    index: usize,
    positions: &[Vec2],
    alpha: f32,
    push: &mut Vec2,
) {
    if quad.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if quad.is_leaf() {
        for &other in &quad.indices {
            if other == index {
                continue;
            }

            let mut delta = point - positions[other];
            if delta.length_sq() < 1e-8 {
                delta = jiggle(index ^ other);
            }
            let distance_sq = delta.length_sq().max(MIN_DISTANCE_SQ);
            *push += delta * (-CHARGE_STRENGTH * alpha / distance_sq);
        }
        return;
    }

    let delta = point - quad.center_of_mass;
    let distance_sq = delta.length_sq().max(MIN_DISTANCE_SQ);
    let can_approximate =
        !quad.bounds.contains(point) && (quad.bounds.side_length() / distance_sq.sqrt()) < BARNES_HUT_THETA;

    if can_approximate {
        *push += delta * (-CHARGE_STRENGTH * quad.mass * alpha / distance_sq);
        return;
    }

    for child in quad.children.iter().flatten() {
        accumulate_repulsion(child, index, positions, alpha, push);
    }
}

/// Weak attractor toward the viewport center.
pub(super) fn apply_centering(scene: &mut Scene, center: Vec2, alpha: f32) {
    for node in &mut scene.nodes {
        node.vel += (center - node.pos) * (CENTER_STRENGTH * alpha);
    }
}
