//! # Core Module
//!
//! Fundamental building blocks for reading macromolecular structure files and
//! describing their geometry.
//!
//! ## Architecture
//!
//! - **Structural Representation** ([`models`]) - Atoms, models, and the parsed
//!   document, plus the state machine that assembles them
//! - **File I/O** ([`io`]) - Fixed-column record classification and the PDB reader
//! - **Geometry** ([`utils`]) - Distances, axis separations and bounding boxes
//!
//! Everything in this module is synchronous and free of shared state, so
//! independent files can be processed on separate threads.

pub mod io;
pub mod models;
pub mod utils;
