use crate::core::io::pdb::PdbError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::config::ConfigError;

/// The atom set a geometric operation needed but did not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AtomSet {
    AlphaCarbons,
    BetaCarbons,
    AllAtoms,
}

impl fmt::Display for AtomSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AtomSet::AlphaCarbons => "alpha-carbon atoms",
            AtomSet::BetaCarbons => "beta-carbon atoms",
            AtomSet::AllAtoms => "atoms",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricsError {
    #[error("No {set} available for geometry calculation")]
    EmptyGeometry { set: AtomSet },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to read structure '{identifier}': {source}")]
    Read {
        identifier: String,
        #[source]
        source: PdbError,
    },

    #[error("Invalid analysis configuration: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// The identifier of the structure that failed, if the error is tied to one.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            EngineError::Read { identifier, .. } => Some(identifier),
            EngineError::Config(_) => None,
        }
    }
}
