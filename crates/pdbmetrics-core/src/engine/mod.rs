//! # Engine Module
//!
//! The analysis layer that sits between parsed documents and the public
//! workflows.
//!
//! - [`config`] - Analysis configuration and its builder
//! - [`metrics`] - Per-model geometric descriptors
//! - [`error`] - Error types for analysis and batch processing
//! - [`progress`] - Progress events for long-running batches
//!
//! Metrics are always computed per model. The document-wide secondary-structure
//! total is an input to each model's ratio, never a per-model quantity.

pub mod config;
pub mod error;
pub mod metrics;
pub mod progress;
