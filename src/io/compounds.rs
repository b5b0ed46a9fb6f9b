use std::io::Read;

use log::{debug, warn};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::{Document, Error};
use crate::model::compound::{Compound, Descriptors};
use crate::model::fingerprint::Fingerprint;

/// Potency assigned to values reported as below the detection limit.
const BELOW_DETECTION_POTENCY: f64 = 5.0;

#[derive(Debug, Deserialize)]
struct CompoundRecord {
    #[serde(rename = "ID", default, deserialize_with = "flexible_u64")]
    row: Option<u64>,
    #[serde(default, deserialize_with = "flexible_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "flexible_f64")]
    weight: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64")]
    log_p: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64")]
    log_d: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pka: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64")]
    tpsa: Option<f64>,
    #[serde(default, deserialize_with = "potency")]
    potency: Option<f64>,
    #[serde(default, deserialize_with = "flexible_string")]
    smiles: Option<String>,
    #[serde(default)]
    fingerprint: Option<String>,
}

/// Reads a JSON array of compound records.
///
/// Records are keyed by `name`; a numeric `ID` is kept as the compound's
/// row number. Numeric descriptors may be numbers, numeric strings, empty
/// strings or `null`. A string `potency` is interpreted with
/// [`parse_potency`].
///
/// # Errors
///
/// Returns [`Error::Json`] for malformed JSON and [`Error::Record`] for a
/// record without a name or with an unparsable fingerprint.
pub fn read_compounds<R: Read>(reader: R) -> Result<Vec<Compound>, Error> {
    let records: Vec<CompoundRecord> =
        serde_json::from_reader(reader).map_err(|e| Error::json(Document::Compounds, e))?;

    let compounds = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| into_compound(index, record))
        .collect::<Result<Vec<_>, _>>()?;

    let without_fp = compounds.iter().filter(|c| !c.has_fingerprint()).count();
    if without_fp > 0 && without_fp < compounds.len() {
        warn!("{without_fp} of {} compounds have no fingerprint", compounds.len());
    }
    debug!("Read {} compound records", compounds.len());
    Ok(compounds)
}

fn into_compound(index: usize, record: CompoundRecord) -> Result<Compound, Error> {
    let name = record
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| Error::record(Document::Compounds, index, "missing compound name"))?;

    let fingerprint = match record.fingerprint.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(bits) => Some(bits.parse::<Fingerprint>().map_err(|e| {
            Error::record(Document::Compounds, index, format!("'{name}': {e}"))
        })?),
    };

    Ok(Compound {
        id: name.clone(),
        name,
        row: record.row,
        descriptors: Descriptors {
            weight: record.weight,
            log_p: record.log_p,
            log_d: record.log_d,
            pka: record.pka,
            tpsa: record.tpsa,
            potency: record.potency,
        },
        fingerprint,
        smiles: record.smiles.filter(|s| !s.trim().is_empty()),
    })
}

/// Interprets a reported potency string.
///
/// A leading `<` means below the detection limit and yields `5.0`;
/// otherwise the first run of digits and dots is parsed. Returns `None`
/// when no number can be found.
pub fn parse_potency(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.starts_with('<') {
        return Some(BELOW_DETECTION_POTENCY);
    }
    let start = raw.find(|c: char| c.is_ascii_digit() || c == '.')?;
    let rest = &raw[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    leading_number(&rest[..end])
}

/// Longest prefix of a digits-and-dots run that parses as a float.
fn leading_number(run: &str) -> Option<f64> {
    (1..=run.len())
        .rev()
        .find_map(|end| run[..end].parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn number_from(value: Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn flexible_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(number_from))
}

fn flexible_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn flexible_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

fn potency<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| match v {
        Value::String(s) => parse_potency(&s),
        other => number_from(other),
    }))
}
