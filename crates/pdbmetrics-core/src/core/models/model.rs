use super::atom::{Atom, AtomKind};
use nalgebra::Point3;

/// One conformation of a structure: the atoms of a single `MODEL` block, or of
/// the whole file when it carries no model boundaries.
///
/// The model owns its atoms in file order and keeps two index lists into them
/// for the alpha- and beta-carbon markers. Neither the atoms nor the index lists
/// are ever reordered, so both marker lists follow residue order as written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    serial: usize,
    atoms: Vec<Atom>,
    alpha_indices: Vec<usize>,
    beta_indices: Vec<usize>,
    first_residue: Option<isize>,
    last_residue: Option<isize>,
}

impl Model {
    pub(crate) fn new(serial: usize) -> Self {
        Self {
            serial,
            ..Default::default()
        }
    }

    pub(crate) fn push_atom(&mut self, atom: Atom, kind: AtomKind) {
        let index = self.atoms.len();
        match kind {
            AtomKind::AlphaCarbon => {
                self.alpha_indices.push(index);
                self.first_residue.get_or_insert(atom.residue_number);
                self.last_residue = Some(atom.residue_number);
            }
            AtomKind::BetaCarbon => self.beta_indices.push(index),
            AtomKind::Other => {}
        }
        self.atoms.push(atom);
    }

    /// The model serial number, taken from the `MODEL` record when present and
    /// otherwise the 1-based position of the model in the file.
    pub fn serial(&self) -> usize {
        self.serial
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn alpha_carbons(&self) -> impl ExactSizeIterator<Item = &Atom> + DoubleEndedIterator {
        self.alpha_indices.iter().map(|&i| &self.atoms[i])
    }

    pub fn beta_carbons(&self) -> impl ExactSizeIterator<Item = &Atom> + DoubleEndedIterator {
        self.beta_indices.iter().map(|&i| &self.atoms[i])
    }

    pub fn alpha_carbon_count(&self) -> usize {
        self.alpha_indices.len()
    }

    pub fn beta_carbon_count(&self) -> usize {
        self.beta_indices.len()
    }

    /// Residue number of the first alpha-carbon in the model.
    pub fn first_residue(&self) -> Option<isize> {
        self.first_residue
    }

    /// Residue number of the last alpha-carbon in the model.
    pub fn last_residue(&self) -> Option<isize> {
        self.last_residue
    }

    pub fn positions(&self) -> impl ExactSizeIterator<Item = &Point3<f64>> {
        self.atoms.iter().map(|atom| &atom.position)
    }

    /// First and last alpha-carbon atoms, or `None` if the model has none.
    /// With a single alpha-carbon both ends are the same atom.
    pub fn alpha_carbon_termini(&self) -> Option<(&Atom, &Atom)> {
        termini(&self.atoms, &self.alpha_indices)
    }

    /// First and last beta-carbon atoms, or `None` if the model has none.
    pub fn beta_carbon_termini(&self) -> Option<(&Atom, &Atom)> {
        termini(&self.atoms, &self.beta_indices)
    }
}

fn termini<'a>(atoms: &'a [Atom], indices: &[usize]) -> Option<(&'a Atom, &'a Atom)> {
    let first = *indices.first()?;
    let last = *indices.last()?;
    Some((&atoms[first], &atoms[last]))
}
