use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::document::StructureDocument;
use crate::engine::config::AnalysisConfig;
use crate::engine::error::EngineError;
use crate::engine::metrics::ModelMetrics;
use crate::engine::progress::{Progress, ProgressReporter};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Where a structure comes from, together with the identifier it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureSource {
    Path { identifier: String, path: PathBuf },
    Text { identifier: String, text: String },
}

impl StructureSource {
    /// A file source identified by the file stem (`data/1MBN.pdb` → `1MBN`).
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let identifier = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::Path {
            identifier,
            path: path.to_path_buf(),
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            StructureSource::Path { identifier, .. } | StructureSource::Text { identifier, .. } => {
                identifier
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelReport {
    /// 0-based position of the model in the file.
    pub index: usize,
    pub serial: usize,
    pub atom_count: usize,
    pub metrics: ModelMetrics,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructureReport {
    pub identifier: String,
    pub secondary_structure_residues: usize,
    pub models: Vec<ModelReport>,
}

impl StructureReport {
    /// Computes metrics for every model of `document`.
    ///
    /// A descriptor that cannot be computed (for example, the alpha-carbon
    /// distance of a model without alpha-carbons) records its error in that
    /// model's [`ModelMetrics`]; other descriptors and models are unaffected.
    pub fn from_document(
        identifier: &str,
        document: &StructureDocument,
        config: &AnalysisConfig,
    ) -> Self {
        let total = document.secondary_structure_residues();
        let models = document
            .models()
            .iter()
            .enumerate()
            .map(|(index, model)| {
                let metrics = ModelMetrics::compute(model, total, config.precision);
                for e in metrics.errors() {
                    warn!("{} model {}: {}", identifier, model.serial(), e);
                }
                ModelReport {
                    index,
                    serial: model.serial(),
                    atom_count: model.atom_count(),
                    metrics,
                }
            })
            .collect();

        Self {
            identifier: identifier.to_string(),
            secondary_structure_residues: total,
            models,
        }
    }

    /// Models with at least one descriptor that could not be computed.
    pub fn failed_model_count(&self) -> usize {
        self.models
            .iter()
            .filter(|r| !r.metrics.is_complete())
            .count()
    }
}

/// Reads and analyzes a single structure.
#[instrument(skip_all, fields(identifier = %source.identifier()))]
pub fn run(source: &StructureSource, config: &AnalysisConfig) -> Result<StructureReport, EngineError> {
    let options = config.read_options();
    let document = match source {
        StructureSource::Path { path, .. } => PdbFile::read_from_path(path, &options),
        StructureSource::Text { text, .. } => PdbFile::read_from_str(text, &options),
    }
    .map_err(|source_err| EngineError::Read {
        identifier: source.identifier().to_string(),
        source: source_err,
    })?;

    if document.is_empty() {
        warn!("{} contains no ATOM records.", source.identifier());
    }

    Ok(StructureReport::from_document(
        source.identifier(),
        &document,
        config,
    ))
}

/// Analyzes independent structures in parallel.
///
/// Results are returned in the order of `sources`. Each structure is read and
/// analyzed by one worker with no shared mutable state, so a failure in one
/// entry never affects another.
#[instrument(skip_all, name = "analysis_batch", fields(count = sources.len()))]
pub fn run_batch(
    sources: &[StructureSource],
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Vec<Result<StructureReport, EngineError>> {
    info!("Analyzing {} structure(s).", sources.len());
    reporter.report(Progress::BatchStart {
        total: sources.len() as u64,
    });

    let results: Vec<_> = sources
        .par_iter()
        .map(|source| {
            let result = run(source, config);
            match &result {
                Ok(report) => {
                    let failed_models = report.failed_model_count();
                    if failed_models > 0 {
                        reporter.report(Progress::Message(format!(
                            "{}: {} of {} model(s) lack usable geometry",
                            report.identifier,
                            failed_models,
                            report.models.len()
                        )));
                    }
                    reporter.report(Progress::StructureFinished {
                        identifier: report.identifier.clone(),
                        models: report.models.len(),
                    });
                }
                Err(e) => {
                    warn!("{}", e);
                    reporter.report(Progress::StructureFailed {
                        identifier: source.identifier().to_string(),
                    });
                }
            }
            result
        })
        .collect();

    reporter.report(Progress::BatchFinish);
    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(
        "Batch finished: {} succeeded, {} failed.",
        results.len() - failed,
        failed
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::AnalysisConfigBuilder;
    use crate::engine::error::{AtomSet, MetricsError};
    use crate::engine::metrics::AxisExtents;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn atom_line(name: &str, residue: isize, x: f64, y: f64, z: f64) -> String {
        format!(
            "ATOM      1 {:<4} ALA A{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00           C  ",
            format!(" {}", name),
            residue,
            x,
            y,
            z
        )
    }

    fn helix_line(start: isize, end: isize) -> String {
        format!(
            "HELIX    1   1 ALA A {:>4}  ALA A {:>4}  1                                   2    ",
            start, end
        )
    }

    fn text_source(identifier: &str, lines: &[String]) -> StructureSource {
        StructureSource::Text {
            identifier: identifier.to_string(),
            text: lines.join("\n"),
        }
    }

    fn two_alpha_carbons() -> Vec<String> {
        vec![
            atom_line("CA", 10, 0.0, 0.0, 0.0),
            atom_line("CA", 11, 3.0, 4.0, 0.0),
        ]
    }

    mod single_structure {
        use super::*;

        #[test]
        fn two_alpha_carbons_without_annotations() {
            let source = text_source("TEST", &two_alpha_carbons());
            let report = run(&source, &AnalysisConfig::default()).unwrap();

            assert_eq!(report.identifier, "TEST");
            assert_eq!(report.models.len(), 1);
            let metrics = report.models[0].metrics;
            assert_eq!(metrics.alpha_carbon_distance, Ok(5.0));
            assert_eq!(metrics.secondary_structure_ratio, 0.0);
        }

        #[test]
        fn helix_over_both_residues_gives_ratio_one() {
            let mut lines = vec![helix_line(10, 11)];
            lines.extend(two_alpha_carbons());
            let report = run(&text_source("TEST", &lines), &AnalysisConfig::default()).unwrap();
            assert_eq!(report.secondary_structure_residues, 2);
            assert_eq!(report.models[0].metrics.secondary_structure_ratio, 1.0);
        }

        #[test]
        fn each_model_uses_only_its_own_atoms() {
            let lines = vec![
                "MODEL        1".to_string(),
                atom_line("CA", 1, 0.0, 0.0, 0.0),
                atom_line("CA", 2, 3.0, 4.0, 0.0),
                "ENDMDL".to_string(),
                "MODEL        2".to_string(),
                atom_line("CA", 1, 0.0, 0.0, 0.0),
                atom_line("CA", 2, 6.0, 8.0, 0.0),
                "ENDMDL".to_string(),
            ];
            let report = run(&text_source("NMR", &lines), &AnalysisConfig::default()).unwrap();

            assert_eq!(report.models.len(), 2);
            let distances: Vec<_> = report
                .models
                .iter()
                .map(|m| m.metrics.alpha_carbon_distance)
                .collect();
            assert_eq!(distances, vec![Ok(5.0), Ok(10.0)]);
            assert_eq!(report.models[1].serial, 2);
            assert_eq!(report.models[1].index, 1);
        }

        #[test]
        fn model_without_alpha_carbons_fails_alone() {
            let lines = vec![
                "MODEL        1".to_string(),
                atom_line("N", 1, 0.0, 0.0, 0.0),
                atom_line("CB", 1, 1.0, 0.0, 0.0),
                "ENDMDL".to_string(),
                "MODEL        2".to_string(),
                atom_line("CA", 1, 0.0, 0.0, 0.0),
                atom_line("CB", 1, 1.0, 1.0, 1.0),
                "ENDMDL".to_string(),
            ];
            let report = run(&text_source("MIX", &lines), &AnalysisConfig::default()).unwrap();

            assert_eq!(report.failed_model_count(), 1);
            assert_eq!(
                report.models[0].metrics.alpha_carbon_distance,
                Err(MetricsError::EmptyGeometry {
                    set: AtomSet::AlphaCarbons
                })
            );
            let second = report.models[1].metrics;
            assert!(second.is_complete());
            assert_eq!(second.alpha_carbon_distance, Ok(0.0));
            assert_eq!(second.beta_carbon_distance, Some(0.0));
            assert_eq!(second.volume, Ok(1.0));
        }

        #[test]
        fn model_without_alpha_carbons_still_reports_ratio_and_volume() {
            let lines = vec![
                helix_line(1, 2),
                atom_line("N", 1, 0.0, 0.0, 0.0),
                atom_line("CB", 1, 2.0, 3.0, 4.0),
            ];
            let report = run(&text_source("NOCA", &lines), &AnalysisConfig::default()).unwrap();

            let metrics = report.models[0].metrics;
            assert_eq!(metrics.secondary_structure_ratio, 0.0);
            assert_eq!(metrics.volume, Ok(24.0));
            assert!(metrics.extents.is_err());
            assert_eq!(report.failed_model_count(), 1);
        }

        #[test]
        fn malformed_coordinate_fails_the_structure() {
            let mut bad = atom_line("CA", 2, 0.0, 0.0, 0.0);
            bad.replace_range(46..54, "  zz.zzz");
            let lines = vec![atom_line("CA", 1, 0.0, 0.0, 0.0), bad];
            let err = run(&text_source("BAD", &lines), &AnalysisConfig::default()).unwrap_err();
            assert_eq!(err.identifier(), Some("BAD"));
            assert!(err.to_string().contains("line 2"));
        }

        #[test]
        fn precision_controls_rounding() {
            let lines = vec![
                atom_line("CA", 1, 0.0, 0.0, 0.0),
                atom_line("CA", 2, 1.0, 1.0, 1.0),
            ];
            let config = AnalysisConfigBuilder::new().precision(2).build().unwrap();
            let report = run(&text_source("P", &lines), &config).unwrap();
            let metrics = report.models[0].metrics;
            assert_eq!(metrics.alpha_carbon_distance, Ok(1.73));
            assert_eq!(
                metrics.extents,
                Ok(AxisExtents {
                    x: 1.0,
                    y: 1.0,
                    z: 1.0
                })
            );
        }

        #[test]
        fn empty_structure_gives_empty_report() {
            let report = run(
                &text_source("EMPTY", &["REMARK nothing here".to_string()]),
                &AnalysisConfig::default(),
            )
            .unwrap();
            assert!(report.models.is_empty());
        }

        #[test]
        fn running_twice_is_bit_identical() {
            let lines = vec![
                helix_line(1, 1),
                atom_line("CA", 1, 1.111, -2.222, 3.333),
                atom_line("CB", 1, 0.5, 0.25, -0.125),
                atom_line("CA", 2, 4.444, 5.555, -6.666),
                atom_line("CB", 2, 7.75, 8.875, 9.0),
            ];
            let source = text_source("DET", &lines);
            let a = run(&source, &AnalysisConfig::default()).unwrap();
            let b = run(&source, &AnalysisConfig::default()).unwrap();
            let a = a.models[0].metrics;
            let b = b.models[0].metrics;
            assert_eq!(a.volume.unwrap().to_bits(), b.volume.unwrap().to_bits());
            assert_eq!(
                a.alpha_carbon_distance.unwrap().to_bits(),
                b.alpha_carbon_distance.unwrap().to_bits()
            );
            assert_eq!(a, b);
        }
    }

    mod sources {
        use super::*;
        use std::io::Write;

        #[test]
        fn identifier_comes_from_file_stem() {
            let source = StructureSource::from_path("data/1MBN.pdb");
            assert_eq!(source.identifier(), "1MBN");
        }

        #[test]
        fn path_sources_are_read_from_disk() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("256B.pdb");
            let mut file = std::fs::File::create(&path).unwrap();
            for line in two_alpha_carbons() {
                writeln!(file, "{}", line).unwrap();
            }
            drop(file);

            let report = run(&StructureSource::from_path(&path), &AnalysisConfig::default()).unwrap();
            assert_eq!(report.identifier, "256B");
            assert_eq!(report.models[0].metrics.alpha_carbon_distance, Ok(5.0));
        }

        #[test]
        fn missing_file_is_a_read_error() {
            let dir = tempfile::tempdir().unwrap();
            let source = StructureSource::from_path(dir.path().join("NONE.pdb"));
            let err = run(&source, &AnalysisConfig::default()).unwrap_err();
            assert!(matches!(err, EngineError::Read { ref identifier, .. } if identifier == "NONE"));
        }
    }

    mod batch {
        use super::*;

        #[test]
        fn results_keep_input_order_and_isolate_failures() {
            let mut bad = atom_line("CA", 1, 0.0, 0.0, 0.0);
            bad.replace_range(30..38, "????????");
            let sources = vec![
                text_source("A", &two_alpha_carbons()),
                text_source("B", &[bad]),
                text_source("C", &two_alpha_carbons()),
            ];

            let results = run_batch(&sources, &AnalysisConfig::default(), &ProgressReporter::new());

            assert_eq!(results.len(), 3);
            assert_eq!(results[0].as_ref().unwrap().identifier, "A");
            assert!(results[1].is_err());
            assert_eq!(results[2].as_ref().unwrap().identifier, "C");
        }

        #[test]
        fn progress_is_reported_per_structure() {
            let finished = AtomicUsize::new(0);
            let failed = AtomicUsize::new(0);
            let reporter = ProgressReporter::with_callback(Box::new(|event| match event {
                Progress::StructureFinished { .. } => {
                    finished.fetch_add(1, Ordering::SeqCst);
                }
                Progress::StructureFailed { .. } => {
                    failed.fetch_add(1, Ordering::SeqCst);
                }
                _ => {}
            }));
            let sources: Vec<_> = (0..8)
                .map(|i| text_source(&format!("S{i}"), &two_alpha_carbons()))
                .collect();

            let results = run_batch(&sources, &AnalysisConfig::default(), &reporter);
            drop(reporter);

            assert!(results.iter().all(Result::is_ok));
            assert_eq!(finished.load(Ordering::SeqCst), 8);
            assert_eq!(failed.load(Ordering::SeqCst), 0);
        }

        #[test]
        fn models_without_geometry_produce_a_message() {
            let messages = std::sync::Mutex::new(Vec::new());
            let reporter = ProgressReporter::with_callback(Box::new(|event| {
                if let Progress::Message(msg) = event {
                    messages.lock().unwrap().push(msg);
                }
            }));
            let sources = vec![text_source("NOCA", &[atom_line("N", 1, 0.0, 0.0, 0.0)])];

            let results = run_batch(&sources, &AnalysisConfig::default(), &reporter);
            drop(reporter);

            assert!(results[0].is_ok());
            assert_eq!(
                messages.into_inner().unwrap(),
                vec!["NOCA: 1 of 1 model(s) lack usable geometry".to_string()]
            );
        }

        #[test]
        fn empty_batch_returns_nothing() {
            let results = run_batch(&[], &AnalysisConfig::default(), &ProgressReporter::new());
            assert!(results.is_empty());
        }
    }
}
