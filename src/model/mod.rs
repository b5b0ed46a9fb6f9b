//! Core data structures describing compound sets and the derived similarity graph.
//!
//! This module provides the types that flow through `compound-atlas`:
//!
//! - [`compound`] – Compounds with their named descriptors and optional fingerprint.
//! - [`fingerprint`] – Fixed-length packed binary fingerprints.
//! - [`types`] – The closed set of descriptor keys usable for clustering.
//! - [`graph`] – Neighbor lists, similarity edges and the aligned similarity matrix.
//! - [`layout`] – Clusters, layout-time nodes and links, and boundary hulls.
//! - [`analysis`] – The bundled result of one full analysis pass.
//!
//! Compounds are owned by the caller and never mutated by the engine; every
//! derived structure refers to them by identifier or by index into the
//! caller's slice.

pub mod analysis;
pub mod compound;
pub mod fingerprint;
pub mod graph;
pub mod layout;
pub mod types;
