use super::error::{AtomSet, MetricsError};
use crate::core::models::model::Model;
use crate::core::utils::geometry::{self, BoundingBox, round_to};
use nalgebra::Vector3;
use serde::Serialize;

/// Per-axis size of a model, in Angstroms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisExtents {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<Vector3<f64>> for AxisExtents {
    fn from(v: Vector3<f64>) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Descriptors of a single model, rounded for reporting.
///
/// Each geometric descriptor is computed independently: a model without
/// alpha-carbons still has a ratio (`0.0`) and, if it has any atoms, a volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelMetrics {
    /// Secondary-structure residues divided by the model's alpha-carbon count.
    pub secondary_structure_ratio: f64,
    /// Distance between the first and last alpha-carbon.
    pub alpha_carbon_distance: Result<f64, MetricsError>,
    /// Distance between the first and last beta-carbon, if the model has any.
    pub beta_carbon_distance: Option<f64>,
    /// Larger of the alpha- and beta-carbon terminal separations on each axis.
    pub extents: Result<AxisExtents, MetricsError>,
    /// Volume of the axis-aligned box enclosing every atom of the model.
    pub volume: Result<f64, MetricsError>,
}

impl ModelMetrics {
    /// Computes every descriptor of `model` and rounds them to `precision` digits.
    ///
    /// Rounding happens only here; all intermediate values keep full precision.
    /// The alpha-carbon distance and the extents fail with
    /// [`MetricsError::EmptyGeometry`] when the model has no alpha-carbons; the
    /// volume fails only when the model has no atoms at all.
    pub fn compute(model: &Model, secondary_structure_residues: usize, precision: u32) -> Self {
        let round = |value: f64| round_to(value, precision);

        Self {
            secondary_structure_ratio: round(secondary_structure_ratio(
                model,
                secondary_structure_residues,
            )),
            alpha_carbon_distance: alpha_carbon_distance(model).map(round),
            beta_carbon_distance: beta_carbon_distance(model).ok().map(round),
            extents: axis_extents(model).map(|e| AxisExtents {
                x: round(e.x),
                y: round(e.y),
                z: round(e.z),
            }),
            volume: bounding_box(model).map(|bbox| round(bbox.volume())),
        }
    }

    /// Distinct errors of the descriptors that could not be computed.
    pub fn errors(&self) -> Vec<MetricsError> {
        let mut errors = Vec::new();
        for err in [
            self.alpha_carbon_distance.err(),
            self.extents.err(),
            self.volume.err(),
        ]
        .into_iter()
        .flatten()
        {
            if !errors.contains(&err) {
                errors.push(err);
            }
        }
        errors
    }

    pub fn is_complete(&self) -> bool {
        self.alpha_carbon_distance.is_ok() && self.extents.is_ok() && self.volume.is_ok()
    }
}

/// `secondary_structure_residues / n_CA`, or `0.0` when the model has no
/// alpha-carbons. The value is not clamped: a file-wide total can exceed the
/// residue count of a single model.
pub fn secondary_structure_ratio(model: &Model, secondary_structure_residues: usize) -> f64 {
    match model.alpha_carbon_count() {
        0 => 0.0,
        n => secondary_structure_residues as f64 / n as f64,
    }
}

pub fn alpha_carbon_distance(model: &Model) -> Result<f64, MetricsError> {
    let (first, last) = model.alpha_carbon_termini().ok_or(MetricsError::EmptyGeometry {
        set: AtomSet::AlphaCarbons,
    })?;
    Ok(geometry::distance(&first.position, &last.position))
}

pub fn beta_carbon_distance(model: &Model) -> Result<f64, MetricsError> {
    let (first, last) = model.beta_carbon_termini().ok_or(MetricsError::EmptyGeometry {
        set: AtomSet::BetaCarbons,
    })?;
    Ok(geometry::distance(&first.position, &last.position))
}

/// Per-axis terminal separation: the larger of the alpha-carbon and
/// beta-carbon separations on each axis. Models without beta-carbons use the
/// alpha-carbon separation alone.
pub fn axis_extents(model: &Model) -> Result<Vector3<f64>, MetricsError> {
    let (ca_first, ca_last) = model.alpha_carbon_termini().ok_or(MetricsError::EmptyGeometry {
        set: AtomSet::AlphaCarbons,
    })?;
    let ca_sep = geometry::axis_separation(&ca_first.position, &ca_last.position);

    Ok(match model.beta_carbon_termini() {
        Some((cb_first, cb_last)) => {
            ca_sep.sup(&geometry::axis_separation(&cb_first.position, &cb_last.position))
        }
        None => ca_sep,
    })
}

pub fn bounding_box(model: &Model) -> Result<BoundingBox, MetricsError> {
    BoundingBox::from_points(model.positions()).ok_or(MetricsError::EmptyGeometry {
        set: AtomSet::AllAtoms,
    })
}
