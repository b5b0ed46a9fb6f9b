use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use super::{Document, Error};
use crate::model::graph::{Neighbor, NeighborMap};

#[derive(Debug, Serialize, Deserialize)]
struct NeighborRecord {
    compound: String,
    similarity: f64,
}

/// Reads a neighbor map of the form `{ name: [{compound, similarity}] }`.
///
/// Values are taken as stored; range checking happens when the map is
/// turned into a similarity index.
pub fn read_neighbor_map<R: Read>(reader: R) -> Result<NeighborMap, Error> {
    let raw: HashMap<String, Vec<NeighborRecord>> =
        serde_json::from_reader(reader).map_err(|e| Error::json(Document::NeighborMap, e))?;
    Ok(raw
        .into_iter()
        .map(|(id, list)| {
            let list = list
                .into_iter()
                .map(|r| Neighbor::new(r.compound, r.similarity))
                .collect();
            (id, list)
        })
        .collect())
}

/// Writes a neighbor map with keys in sorted order and lists as given.
pub fn write_neighbor_map<W: Write>(writer: W, map: &NeighborMap) -> Result<(), Error> {
    let sorted: BTreeMap<&str, Vec<NeighborRecord>> = map
        .iter()
        .map(|(id, list)| {
            let records = list
                .iter()
                .map(|n| NeighborRecord {
                    compound: n.id.clone(),
                    similarity: n.similarity,
                })
                .collect();
            (id.as_str(), records)
        })
        .collect();
    serde_json::to_writer_pretty(writer, &sorted).map_err(|e| Error::json(Document::NeighborMap, e))
}

/// Reads a JSON array of compound identifiers.
pub fn read_order<R: Read>(reader: R) -> Result<Vec<String>, Error> {
    serde_json::from_reader(reader).map_err(|e| Error::json(Document::Ordering, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_score_lists() {
        let json = r#"{
            "A": [{"compound": "B", "similarity": 0.8}, {"compound": "C", "similarity": 0.1}],
            "B": []
        }"#;
        let map = read_neighbor_map(json.as_bytes()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["A"], vec![Neighbor::new("B", 0.8), Neighbor::new("C", 0.1)]);
        assert!(map["B"].is_empty());
    }

    #[test]
    fn written_map_reads_back_with_sorted_keys() {
        let map = NeighborMap::from([
            ("b".to_string(), vec![Neighbor::new("a", 0.5)]),
            ("a".to_string(), vec![Neighbor::new("b", 0.5)]),
        ]);
        let mut buf = Vec::new();
        write_neighbor_map(&mut buf, &map).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.find("\"a\"").unwrap() < text.find("\"b\"").unwrap());
        assert_eq!(read_neighbor_map(text.as_bytes()).unwrap(), map);
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let err = read_neighbor_map(r#"{"A": [{"compound": "B"}]}"#.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            Error::Json {
                document: Document::NeighborMap,
                ..
            }
        ));
    }

    #[test]
    fn reads_ordering() {
        let order = read_order(r#"["C", "A"]"#.as_bytes()).unwrap();
        assert_eq!(order, vec!["C", "A"]);
    }
}
