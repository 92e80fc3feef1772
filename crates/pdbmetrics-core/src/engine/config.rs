use crate::core::io::traits::ReadOptions;
use crate::core::models::atom::AtomDesignators;
use thiserror::Error;

pub const DEFAULT_PRECISION: u32 = 4;
pub const MAX_PRECISION: u32 = 12;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Decimal digits kept in reported metrics.
    pub precision: u32,
    pub strict_spans: bool,
    pub designators: AtomDesignators,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            strict_spans: false,
            designators: AtomDesignators::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            designators: self.designators.clone(),
            strict_spans: self.strict_spans,
        }
    }
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    precision: Option<u32>,
    strict_spans: Option<bool>,
    alpha_designator: Option<String>,
    beta_designator: Option<String>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn precision(mut self, digits: u32) -> Self {
        self.precision = Some(digits);
        self
    }
    pub fn strict_spans(mut self, strict: bool) -> Self {
        self.strict_spans = Some(strict);
        self
    }
    pub fn alpha_designator(mut self, name: impl Into<String>) -> Self {
        self.alpha_designator = Some(name.into());
        self
    }
    pub fn beta_designator(mut self, name: impl Into<String>) -> Self {
        self.beta_designator = Some(name.into());
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let precision = self.precision.unwrap_or(DEFAULT_PRECISION);
        if precision > MAX_PRECISION {
            return Err(ConfigError::InvalidParameter {
                name: "precision",
                reason: format!("must be at most {}, got {}", MAX_PRECISION, precision),
            });
        }

        let defaults = AtomDesignators::default();
        let designators = AtomDesignators::new(
            self.alpha_designator.as_deref().unwrap_or(&defaults.alpha),
            self.beta_designator.as_deref().unwrap_or(&defaults.beta),
        );
        for (name, value) in [
            ("alpha_designator", &designators.alpha),
            ("beta_designator", &designators.beta),
        ] {
            if value.is_empty() || value.len() > 4 {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("atom names must be 1-4 characters, got '{}'", value),
                });
            }
        }
        if designators.alpha == designators.beta {
            return Err(ConfigError::InvalidParameter {
                name: "beta_designator",
                reason: format!("must differ from the alpha designator '{}'", designators.alpha),
            });
        }

        Ok(AnalysisConfig {
            precision,
            strict_spans: self.strict_spans.unwrap_or(false),
            designators,
        })
    }
}
