//! # Workflows Module
//!
//! High-level entry points that take structure input and return metric
//! reports.
//!
//! - **Analysis Workflow** ([`analyze`]) - Reads one or many structures, builds
//!   their documents and computes per-model metrics, optionally in parallel.
//!
//! Failures stay as local as possible: an unreadable file only fails its own
//! entry in a batch, and a model without usable geometry only fails its own
//! row in a report.

pub mod analyze;
