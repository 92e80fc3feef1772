use crate::cli::ReportFormat;
use crate::error::Result;
use pdbmetrics::engine::error::MetricsError;
use pdbmetrics::engine::metrics::{AxisExtents, ModelMetrics};
use pdbmetrics::workflows::analyze::StructureReport;
use serde::Serialize;
use std::io::Write;

const NOT_AVAILABLE: &str = "n/a";

/// Writes `reports` in the requested format, formatting every value with
/// `precision` decimal digits.
pub fn write_report<W: Write>(
    writer: W,
    reports: &[StructureReport],
    format: ReportFormat,
    precision: u32,
) -> Result<()> {
    match format {
        ReportFormat::Text => write_text(writer, reports, precision),
        ReportFormat::Tsv => write_tsv(writer, reports, precision),
    }
}

fn fixed(value: f64, precision: u32) -> String {
    format!("{:.*}", precision as usize, value)
}

/// Formats a fallible metric, keeping its error for the caller to render.
fn cell<T>(
    value: &std::result::Result<T, MetricsError>,
    format: impl FnOnce(&T) -> String,
) -> std::result::Result<String, MetricsError> {
    value.as_ref().map(format).map_err(|e| *e)
}

fn text_value(value: std::result::Result<String, MetricsError>) -> String {
    value.unwrap_or_else(|e| format!("{NOT_AVAILABLE} ({e})"))
}

fn write_text<W: Write>(mut writer: W, reports: &[StructureReport], precision: u32) -> Result<()> {
    for report in reports {
        let id = &report.identifier;
        for model in &report.models {
            let serial = model.serial;
            let metrics = &model.metrics;
            let cb = metrics
                .beta_carbon_distance
                .map_or_else(|| NOT_AVAILABLE.to_string(), |d| fixed(d, precision));
            let extent = |axis: fn(&AxisExtents) -> f64| {
                text_value(cell(&metrics.extents, |e| fixed(axis(e), precision)))
            };

            for (label, value) in [
                ("Secondary structure ratio", fixed(metrics.secondary_structure_ratio, precision)),
                (
                    "C-alpha distance",
                    text_value(cell(&metrics.alpha_carbon_distance, |d| fixed(*d, precision))),
                ),
                ("C-beta distance", cb),
                ("X size", extent(|e| e.x)),
                ("Y size", extent(|e| e.y)),
                ("Z size", extent(|e| e.z)),
                ("Volume", text_value(cell(&metrics.volume, |v| fixed(*v, precision)))),
            ] {
                writeln!(writer, "{id}\t{serial}\t{label}\t{value}")?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct TsvRow<'a> {
    identifier: &'a str,
    model: usize,
    atoms: usize,
    secondary_structure_ratio: String,
    alpha_carbon_distance: String,
    beta_carbon_distance: String,
    x_size: String,
    y_size: String,
    z_size: String,
    volume: String,
    error: String,
}

impl<'a> TsvRow<'a> {
    /// Metrics that could not be computed leave an empty cell and are named
    /// in the `error` column.
    fn new(
        identifier: &'a str,
        model: usize,
        atoms: usize,
        metrics: &ModelMetrics,
        precision: u32,
    ) -> Self {
        let extent = |axis: fn(&AxisExtents) -> f64| {
            cell(&metrics.extents, |e| fixed(axis(e), precision)).unwrap_or_default()
        };
        let error = metrics
            .errors()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");

        Self {
            identifier,
            model,
            atoms,
            secondary_structure_ratio: fixed(metrics.secondary_structure_ratio, precision),
            alpha_carbon_distance: cell(&metrics.alpha_carbon_distance, |d| fixed(*d, precision))
                .unwrap_or_default(),
            beta_carbon_distance: metrics
                .beta_carbon_distance
                .map(|d| fixed(d, precision))
                .unwrap_or_default(),
            x_size: extent(|e| e.x),
            y_size: extent(|e| e.y),
            z_size: extent(|e| e.z),
            volume: cell(&metrics.volume, |v| fixed(*v, precision)).unwrap_or_default(),
            error,
        }
    }
}

fn write_tsv<W: Write>(writer: W, reports: &[StructureReport], precision: u32) -> Result<()> {
    let mut tsv = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);

    for report in reports {
        for model in &report.models {
            tsv.serialize(TsvRow::new(
                &report.identifier,
                model.serial,
                model.atom_count,
                &model.metrics,
                precision,
            ))?;
        }
    }
    tsv.flush()?;
    Ok(())
}
