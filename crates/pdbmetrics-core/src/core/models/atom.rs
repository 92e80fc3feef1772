use nalgebra::Point3;

/// Coarse classification of an atom by its name, used to pick the residue
/// position markers out of the full atom list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AtomKind {
    /// The alpha-carbon designator (conventionally `CA`).
    AlphaCarbon,
    /// The beta-carbon designator (conventionally `CB`).
    BetaCarbon,
    /// Any other atom name. Kept in the model but not used as a marker.
    #[default]
    Other,
}

/// Atom names that mark the alpha- and beta-carbon of a residue.
///
/// Names are compared after trimming, and comparison is case-sensitive since
/// PDB atom names are upper case by convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomDesignators {
    pub alpha: String,
    pub beta: String,
}

impl Default for AtomDesignators {
    fn default() -> Self {
        Self {
            alpha: "CA".to_string(),
            beta: "CB".to_string(),
        }
    }
}

impl AtomDesignators {
    pub fn new(alpha: &str, beta: &str) -> Self {
        Self {
            alpha: alpha.trim().to_string(),
            beta: beta.trim().to_string(),
        }
    }

    pub fn kind_of(&self, name: &str) -> AtomKind {
        let name = name.trim();
        if name == self.alpha {
            AtomKind::AlphaCarbon
        } else if name == self.beta {
            AtomKind::BetaCarbon
        } else {
            AtomKind::Other
        }
    }
}

/// A single atom read from an `ATOM` record.
///
/// Atoms are created once by the reader and never modified afterwards; the
/// [`Model`](super::model::Model) that contains them owns them exclusively.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The atom name (e.g., "CA", "N", "CB").
    pub name: String,
    /// The residue sequence number the atom belongs to.
    pub residue_number: isize,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    pub fn new(name: &str, residue_number: isize, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            residue_number,
            position,
        }
    }
}
