use crate::cli::{AnalyzeArgs, ConfigArgs, ReportFormat};
use crate::error::{CliError, Result};
use crate::fetch::{DEFAULT_BASE_URL, FetchSettings, Fetcher};
use pdbmetrics::engine::config::{AnalysisConfig, AnalysisConfigBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialAnalysisConfig {
    precision: Option<u32>,
    strict_spans: Option<bool>,
    alpha_designator: Option<String>,
    beta_designator: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialFetchConfig {
    base_url: Option<String>,
    cache_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialReportConfig {
    format: Option<ReportFormat>,
}

/// Settings read from the optional TOML file, before CLI flags are applied.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialAppConfig {
    analysis: Option<PartialAnalysisConfig>,
    fetch: Option<PartialFetchConfig>,
    report: Option<PartialReportConfig>,
}

/// Fully resolved settings for the `analyze` command.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub fetch: FetchSettings,
    pub format: ReportFormat,
}

impl PartialAppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads the file named by `--config` (if any) and applies `-S` overrides.
    pub fn load(args: &ConfigArgs) -> Result<Self> {
        let mut partial = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        partial.apply_set_values(&args.set_values)?;
        Ok(partial)
    }

    pub fn merge_with_analyze(mut self, args: &AnalyzeArgs) -> Result<AppConfig> {
        let fetch = self.fetch_settings(&args.config)?;
        let analysis_file = self.analysis.take().unwrap_or_default();
        let report_file = self.report.take().unwrap_or_default();

        let mut builder = AnalysisConfigBuilder::new()
            .strict_spans(args.strict_spans || analysis_file.strict_spans.unwrap_or(false));
        if let Some(precision) = args.precision.or(analysis_file.precision) {
            builder = builder.precision(precision);
        }
        if let Some(alpha) = analysis_file.alpha_designator {
            builder = builder.alpha_designator(alpha);
        }
        if let Some(beta) = analysis_file.beta_designator {
            builder = builder.beta_designator(beta);
        }
        let analysis = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(AppConfig {
            analysis,
            fetch,
            format: args.format.or(report_file.format).unwrap_or_default(),
        })
    }

    /// Resolves download settings: CLI flag, then file value, then default.
    pub fn fetch_settings(&mut self, args: &ConfigArgs) -> Result<FetchSettings> {
        let fetch_file = self.fetch.take().unwrap_or_default();
        let cache_dir = match args.cache_dir.clone().or(fetch_file.cache_dir) {
            Some(dir) => dir,
            None => Fetcher::default_cache_dir()?,
        };
        Ok(FetchSettings {
            base_url: fetch_file
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            cache_dir,
            refresh: args.refresh,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key.trim() {
                "analysis.precision" => {
                    self.analysis
                        .get_or_insert_with(Default::default)
                        .precision = Some(parse_value(key, value_str)?);
                }
                "analysis.strict-spans" => {
                    self.analysis
                        .get_or_insert_with(Default::default)
                        .strict_spans = Some(parse_value(key, value_str)?);
                }
                "analysis.alpha-designator" => {
                    self.analysis
                        .get_or_insert_with(Default::default)
                        .alpha_designator = Some(value_str.to_string());
                }
                "analysis.beta-designator" => {
                    self.analysis
                        .get_or_insert_with(Default::default)
                        .beta_designator = Some(value_str.to_string());
                }
                "fetch.base-url" => {
                    self.fetch.get_or_insert_with(Default::default).base_url =
                        Some(value_str.to_string());
                }
                "fetch.cache-dir" => {
                    self.fetch.get_or_insert_with(Default::default).cache_dir =
                        Some(PathBuf::from(value_str));
                }
                "report.format" => {
                    let format = match value_str.trim().to_ascii_lowercase().as_str() {
                        "text" => ReportFormat::Text,
                        "tsv" => ReportFormat::Tsv,
                        other => {
                            return Err(CliError::Config(format!(
                                "Invalid value for {}: '{}'. Expected 'text' or 'tsv'.",
                                key, other
                            )));
                        }
                    };
                    self.report.get_or_insert_with(Default::default).format = Some(format);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unknown configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: '{}'", key, value))
    })
}
