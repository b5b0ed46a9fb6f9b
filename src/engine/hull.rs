use std::collections::HashMap;

use crate::model::layout::{Clustering, Hull};

fn cross(o: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

/// Convex hull of `points` by Andrew's monotone chain.
///
/// Returns the hull vertices counter-clockwise (y-up) starting from the
/// lowest-x point, or `None` when fewer than three points are given or all
/// points are collinear.
pub fn convex_hull(points: &[[f64; 2]]) -> Option<Vec<[f64; 2]>> {
    if points.len() < 3 {
        return None;
    }

    let mut sorted: Vec<[f64; 2]> = points
        .iter()
        .copied()
        .filter(|p| p[0].is_finite() && p[1].is_finite())
        .collect();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    sorted.dedup();
    if sorted.len() < 3 {
        return None;
    }

    let mut lower: Vec<[f64; 2]> = Vec::with_capacity(sorted.len());
    for &p in &sorted {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<[f64; 2]> = Vec::with_capacity(sorted.len());
    for &p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);

    (lower.len() >= 3).then_some(lower)
}

/// Hulls of every cluster with at least three positioned members.
///
/// Members missing from `positions` are skipped.
pub fn hulls(clustering: &Clustering, positions: &HashMap<String, [f64; 2]>) -> Vec<Hull> {
    clustering
        .clusters
        .iter()
        .filter_map(|cluster| {
            let points: Vec<[f64; 2]> = cluster
                .members
                .iter()
                .filter_map(|id| positions.get(id).copied())
                .collect();
            convex_hull(&points).map(|points| Hull {
                cluster: cluster.id,
                points,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::layout::Cluster;
    use crate::model::types::Feature;

    #[test]
    fn triangle_is_its_own_hull() {
        let hull = convex_hull(&[[0.0, 0.0], [4.0, 0.0], [0.0, 3.0]]).unwrap();
        assert_eq!(hull, vec![[0.0, 0.0], [4.0, 0.0], [0.0, 3.0]]);
    }

    #[test]
    fn interior_points_are_dropped() {
        let square = [
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 2.0],
            [0.0, 2.0],
            [1.0, 1.0],
            [1.0, 0.0],
        ];
        let hull = convex_hull(&square).unwrap();
        assert_eq!(hull, vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]);
    }

    #[test]
    fn hull_is_counter_clockwise() {
        let hull = convex_hull(&[[3.0, 1.0], [0.0, 0.0], [1.0, 4.0], [2.0, 2.0]]).unwrap();
        let area2: f64 = (0..hull.len())
            .map(|i| {
                let (a, b) = (hull[i], hull[(i + 1) % hull.len()]);
                a[0] * b[1] - b[0] * a[1]
            })
            .sum();
        assert!(area2 > 0.0);
    }

    #[test]
    fn too_few_or_collinear_points_have_no_hull() {
        assert!(convex_hull(&[[0.0, 0.0], [1.0, 1.0]]).is_none());
        assert!(convex_hull(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]).is_none());
        assert!(convex_hull(&[[1.0, 1.0], [1.0, 1.0], [1.0, 1.0]]).is_none());
    }

    #[test]
    fn clusters_below_three_members_are_skipped() {
        let clustering = Clustering {
            feature: Feature::Potency,
            k: 2,
            clusters: vec![
                Cluster {
                    id: 0,
                    members: vec!["a".into(), "b".into(), "c".into()],
                },
                Cluster {
                    id: 1,
                    members: vec!["d".into(), "e".into()],
                },
            ],
            assignments: HashMap::new(),
            excluded: Vec::new(),
            iterations: 1,
            converged: true,
        };
        let positions = HashMap::from([
            ("a".to_string(), [0.0, 0.0]),
            ("b".to_string(), [10.0, 0.0]),
            ("c".to_string(), [5.0, 8.0]),
            ("d".to_string(), [50.0, 50.0]),
            ("e".to_string(), [60.0, 50.0]),
        ]);
        let hulls = hulls(&clustering, &positions);
        assert_eq!(hulls.len(), 1);
        assert_eq!(hulls[0].cluster, 0);
        assert_eq!(hulls[0].points.len(), 3);
    }
}
