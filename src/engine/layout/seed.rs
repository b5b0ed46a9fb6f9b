//! Initial node placement and node sizing.

use std::f64::consts::PI;

use crate::model::compound::Compound;
use crate::model::types::Feature;

const INITIAL_RADIUS: f64 = 10.0;

/// Deterministic phyllotaxis position of the `i`-th node around `center`.
///
/// Successive nodes spiral outwards at the golden angle, so no two seeds
/// coincide and the layout needs no random jitter to start.
pub fn phyllotaxis(i: usize, center: [f64; 2]) -> [f64; 2] {
    let golden_angle = PI * (3.0 - 5f64.sqrt());
    let r = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
    let angle = i as f64 * golden_angle;
    [center[0] + r * angle.cos(), center[1] + r * angle.sin()]
}

/// Square-root scale from molecular weight to a pixel radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    domain: Option<[f64; 2]>,
    range: [f64; 2],
}

impl RadiusScale {
    /// Fits the scale to the extent of weights present in `compounds`.
    ///
    /// `range` may be given in either order; the smaller bound is the
    /// minimum radius.
    pub fn fit(compounds: &[Compound], range: [f64; 2]) -> Self {
        let range = [range[0].min(range[1]), range[0].max(range[1])];
        let domain = compounds
            .iter()
            .filter_map(|c| c.descriptor(Feature::Weight))
            .fold(None, |acc: Option<[f64; 2]>, w| match acc {
                None => Some([w, w]),
                Some([lo, hi]) => Some([lo.min(w), hi.max(w)]),
            });
        Self { domain, range }
    }

    /// Radius for a weight; missing weights get the minimum radius and a
    /// degenerate domain maps to the middle of the range.
    pub fn radius(&self, weight: Option<f64>) -> f64 {
        let [r0, r1] = self.range;
        let (Some([d0, d1]), Some(w)) = (self.domain, weight.filter(|w| w.is_finite())) else {
            return r0;
        };
        let (s0, s1, sw) = (signed_sqrt(d0), signed_sqrt(d1), signed_sqrt(w));
        let t = if s1 > s0 { (sw - s0) / (s1 - s0) } else { 0.5 };
        (r0 + t * (r1 - r0)).max(r0).min(r1)
    }
}

fn signed_sqrt(x: f64) -> f64 {
    x.signum() * x.abs().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::compound::Descriptors;

    fn weighted(id: &str, weight: Option<f64>) -> Compound {
        Compound::new(id).with_descriptors(Descriptors {
            weight,
            ..Default::default()
        })
    }

    #[test]
    fn seeds_are_distinct_and_finite() {
        let seeds: Vec<_> = (0..50).map(|i| phyllotaxis(i, [400.0, 300.0])).collect();
        for (i, a) in seeds.iter().enumerate() {
            assert!(a[0].is_finite() && a[1].is_finite());
            for b in &seeds[i + 1..] {
                assert!((a[0] - b[0]).hypot(a[1] - b[1]) > 1e-3);
            }
        }
    }

    #[test]
    fn radius_spans_range() {
        let compounds = vec![weighted("a", Some(100.0)), weighted("b", Some(400.0))];
        let scale = RadiusScale::fit(&compounds, [8.0, 25.0]);
        assert!((scale.radius(Some(100.0)) - 8.0).abs() < 1e-12);
        assert!((scale.radius(Some(400.0)) - 25.0).abs() < 1e-12);
        // sqrt(225) = 15 lies halfway between 10 and 20
        assert!((scale.radius(Some(225.0)) - 16.5).abs() < 1e-12);
    }

    #[test]
    fn radius_clamps_and_handles_missing() {
        let compounds = vec![weighted("a", Some(100.0)), weighted("b", Some(400.0))];
        let scale = RadiusScale::fit(&compounds, [8.0, 25.0]);
        assert_eq!(scale.radius(Some(10_000.0)), 25.0);
        assert_eq!(scale.radius(None), 8.0);
        assert_eq!(scale.radius(Some(f64::NAN)), 8.0);
    }

    #[test]
    fn degenerate_domain_uses_midpoint() {
        let compounds = vec![weighted("a", Some(300.0)), weighted("b", Some(300.0))];
        let scale = RadiusScale::fit(&compounds, [8.0, 24.0]);
        assert_eq!(scale.radius(Some(300.0)), 16.0);
    }

    #[test]
    fn no_weights_gives_minimum() {
        let scale = RadiusScale::fit(&[weighted("a", None)], [8.0, 25.0]);
        assert_eq!(scale.radius(Some(300.0)), 8.0);
    }

    #[test]
    fn reversed_range_is_reordered() {
        let compounds = vec![weighted("a", Some(100.0)), weighted("b", Some(400.0))];
        let scale = RadiusScale::fit(&compounds, [25.0, 8.0]);
        assert!((scale.radius(Some(100.0)) - 8.0).abs() < 1e-9);
        assert!((scale.radius(Some(400.0)) - 25.0).abs() < 1e-9);
        assert!((scale.radius(Some(1_000.0)) - 25.0).abs() < 1e-9);
        assert!((scale.radius(None) - 8.0).abs() < 1e-9);
    }
}
