//! # PDB Metrics Core Library
//!
//! Ingestion of fixed-column PDB structure files and derivation of per-model
//! geometric descriptors: secondary-structure coverage, alpha- and beta-carbon
//! separations, per-axis extents and bounding-box volume.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout so that parsing and analysis stay
//! independent of each other.
//!
//! - **[`core`]: The Foundation.** Immutable data models (`Atom`, `Model`,
//!   `StructureDocument`), the PDB record classifier and reader, and pure
//!   geometry helpers.
//!
//! - **[`engine`]: The Logic Core.** Analysis configuration, the per-model
//!   metrics calculator, error types and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Entry points that take raw structure
//!   input (a file path or in-memory text) and return a report keyed by
//!   identifier and model, including parallel batch processing. Arbitrary
//!   readers go through [`core::io::traits::StructureFile`] directly.

pub mod core;
pub mod engine;
pub mod workflows;
