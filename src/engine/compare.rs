//! Lookups and side-by-side comparisons over a compound set.

use crate::model::compound::Compound;
use crate::model::types::Feature;

/// Descriptors compared by [`descriptor_difference`], in row/column order.
pub const GRID_FEATURES: [Feature; 5] = [
    Feature::Weight,
    Feature::LogP,
    Feature::LogD,
    Feature::Pka,
    Feature::Tpsa,
];

/// Pairwise property grid: `cells[row][col] = |a[col] - b[row]|`.
pub type DifferenceGrid = [[Option<f64>; 5]; 5];

/// Compound with the highest potency. Missing potency counts as 0 and the
/// first compound wins ties.
pub fn most_potent(compounds: &[Compound]) -> Option<&Compound> {
    let potency = |c: &Compound| c.descriptor(Feature::Potency).unwrap_or(0.0);
    compounds
        .iter()
        .reduce(|best, c| if potency(c) > potency(best) { c } else { best })
}

/// Compounds whose id contains `query`, ignoring case. A blank query
/// matches nothing.
pub fn search<'a>(compounds: &'a [Compound], query: &str) -> Vec<&'a Compound> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    compounds
        .iter()
        .filter(|c| c.id.to_lowercase().contains(&query))
        .collect()
}

/// First compound whose id equals `query`, ignoring case.
pub fn find_exact<'a>(compounds: &'a [Compound], query: &str) -> Option<&'a Compound> {
    let query = query.trim();
    compounds.iter().find(|c| c.id.eq_ignore_ascii_case(query))
}

/// Absolute descriptor differences between two compounds over
/// [`GRID_FEATURES`]. Cells where either value is missing are `None`.
pub fn descriptor_difference(a: &Compound, b: &Compound) -> DifferenceGrid {
    let mut cells = [[None; 5]; 5];
    for (row, &row_feature) in GRID_FEATURES.iter().enumerate() {
        for (col, &col_feature) in GRID_FEATURES.iter().enumerate() {
            cells[row][col] = a
                .descriptor(col_feature)
                .zip(b.descriptor(row_feature))
                .map(|(x, y)| (x - y).abs());
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::compound::Descriptors;

    fn potent(id: &str, potency: Option<f64>) -> Compound {
        Compound::new(id).with_descriptors(Descriptors {
            potency,
            ..Default::default()
        })
    }

    #[test]
    fn most_potent_picks_first_maximum() {
        let compounds = vec![
            potent("a", Some(6.0)),
            potent("b", Some(7.5)),
            potent("c", Some(7.5)),
            potent("d", None),
        ];
        assert_eq!(most_potent(&compounds).unwrap().id, "b");
        assert!(most_potent(&[]).is_none());
    }

    #[test]
    fn missing_potency_counts_as_zero() {
        let compounds = vec![potent("a", None), potent("b", Some(-1.0))];
        assert_eq!(most_potent(&compounds).unwrap().id, "a");
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let compounds = vec![
            Compound::new("CHEMBL101"),
            Compound::new("chembl202"),
            Compound::new("Aspirin"),
        ];
        let hits: Vec<_> = search(&compounds, "Chembl").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(hits, vec!["CHEMBL101", "chembl202"]);
        assert!(search(&compounds, "  ").is_empty());
        assert_eq!(find_exact(&compounds, "aspirin").unwrap().id, "Aspirin");
        assert!(find_exact(&compounds, "aspir").is_none());
    }

    #[test]
    fn difference_grid_cells() {
        let a = Compound::new("a").with_descriptors(Descriptors {
            weight: Some(300.0),
            log_p: Some(2.0),
            ..Default::default()
        });
        let b = Compound::new("b").with_descriptors(Descriptors {
            weight: Some(250.0),
            log_p: Some(3.5),
            ..Default::default()
        });
        let grid = descriptor_difference(&a, &b);
        assert_eq!(grid[0][0], Some(50.0));
        assert_eq!(grid[1][1], Some(1.5));
        // row log_p of b against column weight of a
        assert_eq!(grid[1][0], Some(296.5));
        assert_eq!(grid[2][0], None);
        assert_eq!(grid[0][4], None);
    }
}
