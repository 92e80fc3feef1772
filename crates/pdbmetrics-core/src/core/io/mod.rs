//! Provides input functionality for macromolecular structure files.
//!
//! The [`records`] module classifies single lines of a PDB file into typed
//! records, and [`pdb`] drives those records through the model builder to
//! produce a [`StructureDocument`](crate::core::models::document::StructureDocument).
//! The [`traits`] module defines the shared reading interface.

pub mod pdb;
pub mod records;
pub mod traits;
