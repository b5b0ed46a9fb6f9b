//! Velocity-based forces and the integration step.
//!
//! Each force reads the arena and adds to node velocities; [`step`] applies
//! them in a fixed order and then integrates positions. The step works on a
//! copy of the arena, so a caller only ever observes fully integrated ticks.

use rayon::prelude::*;

use super::grid::SpatialGrid;
use crate::engine::params::{CenterParams, ChargeParams, CollisionParams, ForceParams, LinkParams};
use crate::model::layout::{Link, Node};

const JIGGLE: f64 = 1e-6;

/// Advances the arena by one tick at the given `alpha`.
///
/// Forces run in the order link, many-body, center, collision; then
/// velocities decay and free nodes move. Pinned nodes are held at their pin
/// and have zero velocity, but still exert forces on the others.
pub fn step(
    nodes: &[Node],
    links: &[Link],
    params: &ForceParams,
    alpha: f64,
    center: [f64; 2],
) -> Vec<Node> {
    let mut next = nodes.to_vec();
    apply_links(&mut next, links, &params.link, alpha);
    apply_charge(&mut next, &params.charge, alpha);
    apply_center(&mut next, &params.center, center);
    apply_collision(&mut next, &params.collision);
    integrate(&mut next, params.cooling.velocity_decay);
    next
}

/// Separation for two coincident nodes, stable for a given pair.
fn jiggle(i: usize, j: usize) -> f64 {
    if i < j { -JIGGLE } else { JIGGLE }
}

/// Spring force pulling linked nodes towards `distance · (1 − similarity)`.
fn apply_links(nodes: &mut [Node], links: &[Link], params: &LinkParams, alpha: f64) {
    if links.is_empty() {
        return;
    }

    let mut degree = vec![0usize; nodes.len()];
    for link in links {
        degree[link.source] += 1;
        degree[link.target] += 1;
    }

    for _ in 0..params.iterations {
        for (i, link) in links.iter().enumerate() {
            let (s, t) = (link.source, link.target);
            let strength = 1.0 / degree[s].min(degree[t]) as f64;
            let bias = degree[s] as f64 / (degree[s] + degree[t]) as f64;
            let target_distance = params.distance * (1.0 - link.similarity);

            let mut dx = nodes[t].x + nodes[t].vx - nodes[s].x - nodes[s].vx;
            let dy = nodes[t].y + nodes[t].vy - nodes[s].y - nodes[s].vy;
            if dx == 0.0 && dy == 0.0 {
                dx = jiggle(i, i + 1);
            }
            let l = dx.hypot(dy);
            let f = (l - target_distance) / l * alpha * strength;
            let (fx, fy) = (dx * f, dy * f);

            nodes[t].vx -= fx * bias;
            nodes[t].vy -= fy * bias;
            nodes[s].vx += fx * (1.0 - bias);
            nodes[s].vy += fy * (1.0 - bias);
        }
    }
}

/// Pairwise repulsion, accumulated in parallel over nodes.
fn apply_charge(nodes: &mut [Node], params: &ChargeParams, alpha: f64) {
    if params.strength == 0.0 || nodes.len() < 2 {
        return;
    }

    let positions: Vec<[f64; 2]> = nodes.iter().map(Node::position).collect();
    let dmin2 = params.distance_min * params.distance_min;
    let scale = params.strength * alpha;

    let deltas: Vec<[f64; 2]> = (0..positions.len())
        .into_par_iter()
        .map(|i| {
            let [xi, yi] = positions[i];
            let mut dv = [0.0, 0.0];
            for (j, &[xj, yj]) in positions.iter().enumerate() {
                if i == j {
                    continue;
                }
                let mut dx = xj - xi;
                let dy = yj - yi;
                if dx == 0.0 && dy == 0.0 {
                    dx = jiggle(i, j);
                }
                let mut l2 = dx * dx + dy * dy;
                if l2 < dmin2 {
                    l2 = (dmin2 * l2).sqrt();
                }
                let w = scale / l2;
                dv[0] += dx * w;
                dv[1] += dy * w;
            }
            dv
        })
        .collect();

    for (node, dv) in nodes.iter_mut().zip(deltas) {
        node.vx += dv[0];
        node.vy += dv[1];
    }
}

/// Translates every node so the centroid moves towards `center`.
fn apply_center(nodes: &mut [Node], params: &CenterParams, center: [f64; 2]) {
    if nodes.is_empty() {
        return;
    }
    let n = nodes.len() as f64;
    let (sx, sy) = nodes
        .iter()
        .fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
    let shift_x = (center[0] - sx / n) * params.strength;
    let shift_y = (center[1] - sy / n) * params.strength;
    for node in nodes {
        node.x += shift_x;
        node.y += shift_y;
    }
}

/// Pushes apart nodes whose predicted circles (radius plus margin) overlap.
fn apply_collision(nodes: &mut [Node], params: &CollisionParams) {
    if nodes.len() < 2 || params.strength == 0.0 {
        return;
    }

    let radii: Vec<f64> = nodes.iter().map(|n| n.radius + params.margin).collect();
    let max_radius = radii.iter().copied().fold(0.0, f64::max);
    if max_radius <= 0.0 {
        return;
    }

    for _ in 0..params.iterations {
        let predicted: Vec<[f64; 2]> = nodes.iter().map(|n| [n.x + n.vx, n.y + n.vy]).collect();
        let grid = SpatialGrid::from_positions(&predicted, 2.0 * max_radius);

        for i in 0..nodes.len() {
            let ri = radii[i];
            let ri2 = ri * ri;
            let xi = nodes[i].x + nodes[i].vx;
            let yi = nodes[i].y + nodes[i].vy;

            for j in grid.candidates(predicted[i]) {
                if j <= i {
                    continue;
                }
                let rj = radii[j];
                let r = ri + rj;
                let mut dx = xi - nodes[j].x - nodes[j].vx;
                let dy = yi - nodes[j].y - nodes[j].vy;
                let mut l2 = dx * dx + dy * dy;
                if l2 >= r * r {
                    continue;
                }
                if dx == 0.0 && dy == 0.0 {
                    dx = jiggle(i, j);
                    l2 = dx * dx;
                }
                let l = l2.sqrt();
                let f = (r - l) / l * params.strength;
                let (fx, fy) = (dx * f, dy * f);
                let rj2 = rj * rj;
                let w = rj2 / (ri2 + rj2);

                nodes[i].vx += fx * w;
                nodes[i].vy += fy * w;
                nodes[j].vx -= fx * (1.0 - w);
                nodes[j].vy -= fy * (1.0 - w);
            }
        }
    }
}

fn integrate(nodes: &mut [Node], velocity_decay: f64) {
    let keep = 1.0 - velocity_decay;
    for node in nodes {
        match node.pinned {
            Some([fx, fy]) => {
                node.x = fx;
                node.y = fy;
                node.vx = 0.0;
                node.vy = 0.0;
            }
            None => {
                node.vx *= keep;
                node.vy *= keep;
                node.x += node.vx;
                node.y += node.vy;
            }
        }
    }
}
