//! JSON reading and writing for compound sets, neighbor maps and results.
//!
//! Every reader takes any [`std::io::Read`] and every writer any
//! [`std::io::Write`]; callers choose buffering.

use std::fmt;

mod compounds;
pub mod error;
mod neighbors;
mod output;

pub use compounds::{parse_potency, read_compounds};
pub use error::Error;
pub use neighbors::{read_neighbor_map, read_order, write_neighbor_map};
pub use output::{write_analysis, write_matrix};

/// Kinds of JSON document handled by this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    Compounds,
    NeighborMap,
    Ordering,
    Analysis,
    Matrix,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Document::Compounds => write!(f, "compound"),
            Document::NeighborMap => write!(f, "neighbor map"),
            Document::Ordering => write!(f, "ordering"),
            Document::Analysis => write!(f, "analysis"),
            Document::Matrix => write!(f, "matrix"),
        }
    }
}
