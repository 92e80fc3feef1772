//! # Models Module
//!
//! Data structures describing a parsed structure file.
//!
//! - [`atom`] - Single atoms and the designators that mark residue positions
//! - [`model`] - One conformation: atoms in file order plus marker index lists
//! - [`secondary`] - File-wide `HELIX` / `SHEET` residue spans
//! - [`document`] - The complete, read-only parse result
//! - [`builder`] - The state machine that turns records into a document
//!
//! Models own their atoms exclusively; nothing in this module hands out
//! mutable access once a document has been built.

pub mod atom;
pub mod builder;
pub mod document;
pub mod model;
pub mod secondary;
