//! One-dimensional k-means over a single descriptor.
//!
//! Compounds are partitioned along one normalized feature. Initialization
//! is deterministic (evenly spaced centroids), so the same input order and
//! `k` always give the same partition.

use std::collections::HashMap;

use log::{debug, warn};

use super::config::ClusterConfig;
use super::error::Error;
use crate::model::compound::Compound;
use crate::model::layout::{Cluster, Clustering};

/// Partitions `compounds` along `config.feature` into `config.k` clusters.
///
/// Feature values are min-max scaled to `[0, 1]` over the compounds that
/// have one; when every value is equal they all scale to `0.5`. Centroids
/// start evenly spaced on `[0, 1]` (a single centroid sits at `0.5`). Each
/// round assigns every point to the nearest centroid (lowest id on ties)
/// and moves each non-empty cluster's centroid to its mean; empty clusters
/// keep their centroid. Iteration stops once no assignment changes or after
/// `config.max_iterations` rounds.
///
/// # Errors
///
/// Returns [`Error::InvalidClusterCount`] if `config.k == 0`.
pub fn cluster(compounds: &[Compound], config: &ClusterConfig) -> Result<Clustering, Error> {
    config.validate()?;
    let k = config.k;

    let mut points: Vec<(&str, f64)> = Vec::with_capacity(compounds.len());
    let mut excluded = Vec::new();
    for compound in compounds {
        match compound.descriptor(config.feature) {
            Some(v) => points.push((compound.id.as_str(), v)),
            None => excluded.push(compound.id.clone()),
        }
    }

    if !excluded.is_empty() {
        warn!(
            "{} compounds lack '{}' and are excluded from clustering",
            excluded.len(),
            config.feature
        );
    }

    let normalized = normalize(points.iter().map(|(_, v)| *v));
    let mut centroids = initial_centroids(k);
    let mut assignments: Vec<usize> = Vec::new();
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        let next: Vec<usize> = normalized.iter().map(|&x| nearest(&centroids, x)).collect();
        converged = next == assignments;
        assignments = next;
        iterations += 1;

        update_centroids(&mut centroids, &normalized, &assignments);

        if converged {
            break;
        }
    }

    if converged {
        debug!("k-means converged after {iterations} iterations");
    } else {
        warn!("k-means stopped at the iteration cap ({iterations}) without converging");
    }

    let mut clusters: Vec<Cluster> = (0..k)
        .map(|id| Cluster {
            id,
            members: Vec::new(),
        })
        .collect();
    let mut by_id = HashMap::with_capacity(points.len());
    for ((id, _), &c) in points.iter().zip(&assignments) {
        clusters[c].members.push(id.to_string());
        by_id.insert(id.to_string(), c);
    }

    Ok(Clustering {
        feature: config.feature,
        k,
        clusters,
        assignments: by_id,
        excluded,
        iterations,
        converged,
    })
}

fn normalize(values: impl Iterator<Item = f64> + Clone) -> Vec<f64> {
    let (min, max) = values
        .clone()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    values
        .map(|v| if range > 0.0 { (v - min) / range } else { 0.5 })
        .collect()
}

fn initial_centroids(k: usize) -> Vec<f64> {
    if k == 1 {
        return vec![0.5];
    }
    (0..k).map(|i| i as f64 / (k - 1) as f64).collect()
}

fn nearest(centroids: &[f64], x: f64) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = (x - c).abs();
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

fn update_centroids(centroids: &mut [f64], points: &[f64], assignments: &[usize]) {
    let mut sums = vec![0.0; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];
    for (&x, &c) in points.iter().zip(assignments) {
        sums[c] += x;
        counts[c] += 1;
    }
    for ((centroid, sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
        if count > 0 {
            *centroid = sum / count as f64;
        }
    }
}
