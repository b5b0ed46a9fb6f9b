//! Per-compound neighbor lists and the aligned similarity matrix.
//!
//! A [`SimilarityIndex`] is built either from fingerprints, in which case
//! every unordered pair is computed once and stored identically in both
//! directions, or from a precomputed neighbor map, in which case the two
//! directions of a pair may disagree and are combined according to a
//! [`Reconcile`] policy whenever a single value is needed.

use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};
use rayon::prelude::*;

use super::config::Reconcile;
use super::error::Error;
use super::similarity::similarity;
use crate::model::compound::Compound;
use crate::model::graph::{Neighbor, NeighborMap, SimilarityEdge, SimilarityMatrix};

/// Two stored directions closer than this are considered equal.
const AGREEMENT_EPS: f64 = 1e-9;

/// Where the similarity values of an index came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerprintSource {
    /// Computed pairwise from compound fingerprints.
    Computed,
    /// Taken from a caller-supplied neighbor map.
    Precomputed,
}

/// Sorted neighbor lists for every compound that takes part in similarity.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    ids: Vec<String>,
    neighbors: HashMap<String, Vec<Neighbor>>,
    excluded: Vec<String>,
    source: FingerprintSource,
}

impl SimilarityIndex {
    /// Computes neighbor lists from compound fingerprints.
    ///
    /// Compounds without a fingerprint are skipped and listed in
    /// [`excluded`](Self::excluded). Each list holds every other
    /// fingerprinted compound, sorted by descending similarity with ties in
    /// input order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateCompound`] if two compounds share an
    /// identifier and [`Error::LengthMismatch`] if two fingerprints differ
    /// in bit length.
    pub fn from_fingerprints(compounds: &[Compound]) -> Result<Self, Error> {
        ensure_unique(compounds.iter().map(|c| c.id.as_str()))?;

        let (members, excluded): (Vec<&Compound>, Vec<&Compound>) =
            compounds.iter().partition(|c| c.has_fingerprint());
        let fingerprints: Vec<_> = members
            .iter()
            .filter_map(|c| c.fingerprint.as_ref())
            .collect();
        let n = fingerprints.len();

        if !excluded.is_empty() {
            warn!(
                "{} of {} compounds have no fingerprint and are excluded from similarity",
                excluded.len(),
                compounds.len()
            );
        }

        // upper[i][j - i - 1] holds the similarity of pair (i, j), j > i
        let upper: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                ((i + 1)..n)
                    .map(|j| similarity(fingerprints[i], fingerprints[j]))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("computed {} pairwise similarities", n * n.saturating_sub(1) / 2);

        let mut neighbors = HashMap::with_capacity(n);
        for i in 0..n {
            let mut list: Vec<Neighbor> = (0..n)
                .filter(|&j| j != i)
                .map(|j| {
                    let s = if i < j {
                        upper[i][j - i - 1]
                    } else {
                        upper[j][i - j - 1]
                    };
                    Neighbor::new(members[j].id.clone(), s)
                })
                .collect();
            sort_descending(&mut list);
            neighbors.insert(members[i].id.clone(), list);
        }

        info!("built similarity index over {n} fingerprinted compounds");

        Ok(Self {
            ids: members.iter().map(|c| c.id.clone()).collect(),
            neighbors,
            excluded: excluded.iter().map(|c| c.id.clone()).collect(),
            source: FingerprintSource::Computed,
        })
    }

    /// Adopts a precomputed neighbor map for the given compound set.
    ///
    /// Entries naming compounds outside the set, and self-references, are
    /// dropped. Compounds without an entry are listed in
    /// [`excluded`](Self::excluded). Lists are re-sorted descending with a
    /// stable sort, so equal scores keep their stored order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateCompound`] for repeated identifiers and
    /// [`Error::InvalidSimilarity`] for values that are non-finite or outside
    /// `[0, 1]`.
    pub fn from_neighbor_map(compounds: &[Compound], map: &NeighborMap) -> Result<Self, Error> {
        ensure_unique(compounds.iter().map(|c| c.id.as_str()))?;

        let known: HashSet<&str> = compounds.iter().map(|c| c.id.as_str()).collect();
        let unknown_keys = map.keys().filter(|k| !known.contains(k.as_str())).count();
        if unknown_keys > 0 {
            warn!("ignoring {unknown_keys} neighbor lists for compounds outside the set");
        }

        let mut ids = Vec::new();
        let mut excluded = Vec::new();
        let mut neighbors = HashMap::new();
        let mut dropped = 0usize;

        for compound in compounds {
            let Some(entries) = map.get(&compound.id) else {
                excluded.push(compound.id.clone());
                continue;
            };

            let mut list = Vec::with_capacity(entries.len());
            for entry in entries {
                if !(entry.similarity.is_finite() && (0.0..=1.0).contains(&entry.similarity)) {
                    return Err(Error::invalid_similarity(
                        &compound.id,
                        &entry.id,
                        entry.similarity,
                    ));
                }
                if entry.id == compound.id || !known.contains(entry.id.as_str()) {
                    dropped += 1;
                    continue;
                }
                list.push(entry.clone());
            }
            sort_descending(&mut list);

            ids.push(compound.id.clone());
            neighbors.insert(compound.id.clone(), list);
        }

        if dropped > 0 {
            debug!("dropped {dropped} neighbor entries outside the compound set");
        }
        if !excluded.is_empty() {
            warn!(
                "{} of {} compounds have no neighbor list and are excluded from similarity",
                excluded.len(),
                compounds.len()
            );
        }

        Ok(Self {
            ids,
            neighbors,
            excluded,
            source: FingerprintSource::Precomputed,
        })
    }

    #[inline]
    pub fn source(&self) -> FingerprintSource {
        self.source
    }

    /// Compounds that have a neighbor list, in input order.
    #[inline]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Compounds left out of similarity, in input order.
    #[inline]
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn neighbors(&self, id: &str) -> Option<&[Neighbor]> {
        self.neighbors.get(id).map(Vec::as_slice)
    }

    /// Similarity of `to` as stored in `from`'s own list.
    pub fn lookup(&self, from: &str, to: &str) -> Option<f64> {
        self.neighbors
            .get(from)?
            .iter()
            .find(|n| n.id == to)
            .map(|n| n.similarity)
    }

    /// Single similarity for a pair, combining both stored directions.
    ///
    /// Returns `Ok(None)` when neither direction holds the pair.
    pub fn pair(&self, a: &str, b: &str, reconcile: Reconcile) -> Result<Option<f64>, Error> {
        combine(a, b, self.lookup(a, b), self.lookup(b, a), reconcile)
    }

    /// Neighbors of `id` at or above `threshold`, most similar first.
    pub fn similar_to(&self, id: &str, threshold: f64) -> Vec<&Neighbor> {
        self.neighbors(id)
            .unwrap_or_default()
            .iter()
            .filter(|n| n.similarity >= threshold)
            .collect()
    }

    /// Number of neighbors of `id` at or above `threshold`.
    pub fn neighbor_count(&self, id: &str, threshold: f64) -> usize {
        self.neighbors(id)
            .unwrap_or_default()
            .iter()
            .filter(|n| n.similarity >= threshold)
            .count()
    }

    /// Builds the similarity matrix aligned to `order`.
    ///
    /// `order` may include compounds without a neighbor list; their
    /// off-diagonal cells are `0`. Pairs absent in both directions are `0`.
    /// The diagonal is always `1`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateCompound`] if `order` repeats an identifier,
    /// or [`Error::InvalidSimilarity`] under [`Reconcile::Strict`] when two
    /// stored directions disagree.
    pub fn matrix<S: AsRef<str>>(
        &self,
        order: &[S],
        reconcile: Reconcile,
    ) -> Result<SimilarityMatrix, Error> {
        ensure_unique(order.iter().map(AsRef::as_ref))?;

        let table = self.lookup_table();
        let get = |from: &str, to: &str| table.get(from).and_then(|row| row.get(to)).copied();

        let n = order.len();
        let mut values = vec![0.0; n * n];
        let mut disagreements = 0usize;

        for (i, a) in order.iter().map(AsRef::as_ref).enumerate() {
            values[i * n + i] = 1.0;
            for (j, b) in order.iter().map(AsRef::as_ref).enumerate() {
                if i == j {
                    continue;
                }
                let (forward, backward) = (get(a, b), get(b, a));
                if let (Some(f), Some(r)) = (forward, backward) {
                    if (f - r).abs() > AGREEMENT_EPS {
                        disagreements += 1;
                    }
                }
                values[i * n + j] = combine(a, b, forward, backward, reconcile)?.unwrap_or(0.0);
            }
        }

        if disagreements > 0 {
            warn!(
                "{} matrix cells had disagreeing stored directions; combined with {:?}",
                disagreements, reconcile
            );
        }

        Ok(SimilarityMatrix::from_parts(
            order.iter().map(|s| s.as_ref().to_string()).collect(),
            values,
        ))
    }

    /// Unique unordered pairs with similarity at or above `threshold`.
    ///
    /// Pairs are emitted in the order they are first met walking the
    /// neighbor lists in input order, so each pair appears exactly once
    /// regardless of which direction stores it.
    pub fn edges(&self, threshold: f64, reconcile: Reconcile) -> Result<Vec<SimilarityEdge>, Error> {
        let table = self.lookup_table();
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut edges = Vec::new();

        for id in &self.ids {
            for neighbor in self.neighbors(id).unwrap_or_default() {
                let key = if id.as_str() <= neighbor.id.as_str() {
                    (id.as_str(), neighbor.id.as_str())
                } else {
                    (neighbor.id.as_str(), id.as_str())
                };
                if !seen.insert(key) {
                    continue;
                }
                let backward = table
                    .get(neighbor.id.as_str())
                    .and_then(|row| row.get(id.as_str()))
                    .copied();
                let value = combine(id, &neighbor.id, Some(neighbor.similarity), backward, reconcile)?
                    .unwrap_or(0.0);
                if value >= threshold {
                    edges.push(SimilarityEdge::new(id.as_str(), neighbor.id.as_str(), value));
                }
            }
        }

        debug!("{} edges at threshold {threshold}", edges.len());
        Ok(edges)
    }

    /// Exports the index as a neighbor map.
    pub fn to_neighbor_map(&self) -> NeighborMap {
        self.neighbors.clone()
    }

    fn lookup_table(&self) -> HashMap<&str, HashMap<&str, f64>> {
        self.neighbors
            .iter()
            .map(|(id, list)| {
                let mut row = HashMap::with_capacity(list.len());
                for n in list {
                    row.entry(n.id.as_str()).or_insert(n.similarity);
                }
                (id.as_str(), row)
            })
            .collect()
    }
}

fn combine(
    a: &str,
    b: &str,
    forward: Option<f64>,
    backward: Option<f64>,
    reconcile: Reconcile,
) -> Result<Option<f64>, Error> {
    let value = match (forward, backward) {
        (Some(f), Some(r)) => match reconcile {
            Reconcile::Average => 0.5 * (f + r),
            Reconcile::PreferForward => f,
            Reconcile::Strict if (f - r).abs() > AGREEMENT_EPS => {
                return Err(Error::invalid_similarity(b, a, r));
            }
            Reconcile::Strict => f,
        },
        (Some(f), None) => f,
        (None, Some(r)) => r,
        (None, None) => return Ok(None),
    };
    Ok(Some(value))
}

fn sort_descending(list: &mut [Neighbor]) {
    list.sort_by(|x, y| y.similarity.total_cmp(&x.similarity));
}

fn ensure_unique<'a>(ids: impl Iterator<Item = &'a str>) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(Error::DuplicateCompound(id.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fingerprint::Fingerprint;

    fn compound(id: &str, bits: Option<&str>) -> Compound {
        let c = Compound::new(id);
        match bits {
            Some(b) => c.with_fingerprint(b.parse::<Fingerprint>().unwrap()),
            None => c,
        }
    }

    fn series() -> Vec<Compound> {
        vec![
            compound("A", Some("11110000")),
            compound("B", Some("11100000")),
            compound("C", Some("00001111")),
            compound("D", None),
            compound("E", Some("11110001")),
        ]
    }

    #[test]
    fn lists_are_sorted_and_exclude_self() {
        let index = SimilarityIndex::from_fingerprints(&series()).unwrap();
        let a = index.neighbors("A").unwrap();
        assert_eq!(a.len(), 3);
        assert!(a.iter().all(|n| n.id != "A"));
        assert!(a.windows(2).all(|w| w[0].similarity >= w[1].similarity));
        assert_eq!(a[0].id, "E");
        assert_eq!(a[2].id, "C");
    }

    #[test]
    fn unfingerprinted_compounds_are_reported() {
        let index = SimilarityIndex::from_fingerprints(&series()).unwrap();
        assert_eq!(index.excluded(), &["D".to_string()]);
        assert_eq!(index.len(), 4);
        assert!(index.neighbors("D").is_none());
        assert_eq!(index.source(), FingerprintSource::Computed);
    }

    #[test]
    fn ties_keep_input_order() {
        let compounds = vec![
            compound("X", Some("1000")),
            compound("P", Some("0100")),
            compound("Q", Some("0010")),
        ];
        let index = SimilarityIndex::from_fingerprints(&compounds).unwrap();
        let ids: Vec<_> = index.neighbors("X").unwrap().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["P", "Q"]);
    }

    #[test]
    fn computed_index_is_symmetric() {
        let index = SimilarityIndex::from_fingerprints(&series()).unwrap();
        for a in index.ids() {
            for b in index.ids() {
                if a != b {
                    assert_eq!(index.lookup(a, b), index.lookup(b, a));
                }
            }
        }
    }

    #[test]
    fn length_mismatch_propagates() {
        let compounds = vec![compound("A", Some("1100")), compound("B", Some("110"))];
        let err = SimilarityIndex::from_fingerprints(&compounds).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { .. }));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let compounds = vec![compound("A", Some("1")), compound("A", Some("1"))];
        let err = SimilarityIndex::from_fingerprints(&compounds).unwrap_err();
        assert!(matches!(err, Error::DuplicateCompound(id) if id == "A"));
    }

    #[test]
    fn matrix_diagonal_and_range() {
        let compounds = series();
        let index = SimilarityIndex::from_fingerprints(&compounds).unwrap();
        let order: Vec<&str> = compounds.iter().map(|c| c.id.as_str()).collect();
        let m = index.matrix(&order, Reconcile::Average).unwrap();

        assert_eq!(m.len(), 5);
        for i in 0..m.len() {
            assert_eq!(m.get(i, i), 1.0);
            for j in 0..m.len() {
                assert!((0.0..=1.0).contains(&m.get(i, j)));
            }
        }
        // D has no fingerprint
        let d = m.index_of("D").unwrap();
        assert!(m.row(d).iter().enumerate().all(|(j, v)| j == d || *v == 0.0));
        assert!((m.get(0, 1) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn matrix_rejects_duplicate_order() {
        let index = SimilarityIndex::from_fingerprints(&series()).unwrap();
        assert!(index.matrix(&["A", "B", "A"], Reconcile::Average).is_err());
    }

    fn one_sided_map() -> (Vec<Compound>, NeighborMap) {
        let compounds = vec![compound("A", None), compound("B", None), compound("C", None)];
        let mut map = NeighborMap::new();
        map.insert(
            "A".into(),
            vec![Neighbor::new("B", 0.8), Neighbor::new("ZZ", 0.9)],
        );
        map.insert("B".into(), vec![Neighbor::new("A", 0.6), Neighbor::new("C", 0.3)]);
        (compounds, map)
    }

    #[test]
    fn neighbor_map_drops_unknown_and_reports_missing() {
        let (compounds, map) = one_sided_map();
        let index = SimilarityIndex::from_neighbor_map(&compounds, &map).unwrap();
        assert_eq!(index.neighbors("A").unwrap().len(), 1);
        assert_eq!(index.excluded(), &["C".to_string()]);
        assert_eq!(index.source(), FingerprintSource::Precomputed);
    }

    #[test]
    fn matrix_falls_back_to_reverse_direction() {
        let (compounds, map) = one_sided_map();
        let index = SimilarityIndex::from_neighbor_map(&compounds, &map).unwrap();
        let m = index.matrix(&["A", "B", "C"], Reconcile::Average).unwrap();
        // C -> B only stored as B -> C
        assert!((m.get(2, 1) - 0.3).abs() < 1e-12);
        // A -> C stored nowhere
        assert_eq!(m.get(0, 2), 0.0);
    }

    #[test]
    fn reconcile_policies() {
        let (compounds, map) = one_sided_map();
        let index = SimilarityIndex::from_neighbor_map(&compounds, &map).unwrap();

        let avg = index.matrix(&["A", "B"], Reconcile::Average).unwrap();
        assert!((avg.get(0, 1) - 0.7).abs() < 1e-12);
        assert_eq!(avg.get(0, 1), avg.get(1, 0));

        let fwd = index.matrix(&["A", "B"], Reconcile::PreferForward).unwrap();
        assert!((fwd.get(0, 1) - 0.8).abs() < 1e-12);
        assert!((fwd.get(1, 0) - 0.6).abs() < 1e-12);

        let err = index.matrix(&["A", "B"], Reconcile::Strict).unwrap_err();
        assert!(matches!(err, Error::InvalidSimilarity { .. }));
    }

    #[test]
    fn out_of_range_stored_similarity_is_rejected() {
        let compounds = vec![compound("A", None), compound("B", None)];
        let mut map = NeighborMap::new();
        map.insert("A".into(), vec![Neighbor::new("B", 1.5)]);
        let err = SimilarityIndex::from_neighbor_map(&compounds, &map).unwrap_err();
        assert!(matches!(err, Error::InvalidSimilarity { value, .. } if value == 1.5));
    }

    #[test]
    fn edges_are_unique_and_thresholded() {
        let index = SimilarityIndex::from_fingerprints(&series()).unwrap();
        let edges = index.edges(0.65, Reconcile::Average).unwrap();
        // A-B 0.75, A-E 0.8, B-E 0.6 (below), C-E 0.125
        assert_eq!(edges.len(), 2);
        assert!(edges.contains(&SimilarityEdge::new("A", "B", 0.75)));
        assert!(edges.contains(&SimilarityEdge::new("A", "E", 0.8)));
    }

    #[test]
    fn similar_to_and_neighbor_count() {
        let index = SimilarityIndex::from_fingerprints(&series()).unwrap();
        let similar: Vec<_> = index.similar_to("A", 0.65).iter().map(|n| n.id.clone()).collect();
        assert_eq!(similar, vec!["E".to_string(), "B".to_string()]);
        assert_eq!(index.neighbor_count("A", 0.65), 2);
        assert_eq!(index.neighbor_count("D", 0.0), 0);
        assert!(index.similar_to("missing", 0.0).is_empty());
    }

    #[test]
    fn edges_agree_with_pairwise_lookup_on_a_large_set() {
        let mut state = 0x2545_f491_u64;
        let compounds: Vec<Compound> = (0..300)
            .map(|i| {
                let bits: String = (0..24)
                    .map(|_| {
                        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                        if (state >> 33) % 3 == 0 { '1' } else { '0' }
                    })
                    .collect();
                compound(&format!("C{i:03}"), Some(bits.as_str()))
            })
            .collect();
        let index = SimilarityIndex::from_fingerprints(&compounds).unwrap();
        let edges = index.edges(0.5, Reconcile::Average).unwrap();

        let mut expected = 0;
        for (i, a) in index.ids().iter().enumerate() {
            for b in &index.ids()[i + 1..] {
                let value = index.pair(a, b, Reconcile::Average).unwrap().unwrap_or(0.0);
                if value >= 0.5 {
                    expected += 1;
                    let edge = SimilarityEdge::new(a.as_str(), b.as_str(), value);
                    let found = edges
                        .iter()
                        .find(|e| e.source == edge.source && e.target == edge.target)
                        .unwrap();
                    assert!((found.similarity - value).abs() < 1e-12);
                }
            }
        }
        assert!(expected > 0);
        assert_eq!(edges.len(), expected);
    }

    #[test]
    fn edges_combine_both_stored_directions() {
        let (compounds, map) = one_sided_map();
        let index = SimilarityIndex::from_neighbor_map(&compounds, &map).unwrap();
        let edges = index.edges(0.65, Reconcile::Average).unwrap();
        assert_eq!(edges.len(), 1);
        assert!((edges[0].similarity - 0.7).abs() < 1e-12);

        let forward = index.edges(0.0, Reconcile::PreferForward).unwrap();
        let ab = forward.iter().find(|e| e.source == "A" && e.target == "B").unwrap();
        assert!((ab.similarity - 0.8).abs() < 1e-12);
    }
}
