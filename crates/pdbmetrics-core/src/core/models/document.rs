use super::model::Model;

/// The result of reading one structure file.
///
/// A document holds the completed models in file order together with the
/// file-wide secondary-structure residue total. It is produced once by
/// [`StructureBuilder`](super::builder::StructureBuilder) and is read-only
/// afterwards; analysis code only ever borrows it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructureDocument {
    pub(crate) models: Vec<Model>,
    pub(crate) secondary_structure_residues: usize,
    pub(crate) helix_count: usize,
    pub(crate) sheet_count: usize,
    pub(crate) skipped_records: usize,
}

impl StructureDocument {
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn model(&self, index: usize) -> Option<&Model> {
        self.models.get(index)
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Sum of `end - start + 1` over every `HELIX` and `SHEET` span in the file.
    pub fn secondary_structure_residues(&self) -> usize {
        self.secondary_structure_residues
    }

    pub fn helix_count(&self) -> usize {
        self.helix_count
    }

    pub fn sheet_count(&self) -> usize {
        self.sheet_count
    }

    /// Records that were read but dropped: malformed annotation lines and atoms
    /// found outside any model block.
    pub fn skipped_records(&self) -> usize {
        self.skipped_records
    }

    pub fn atom_count(&self) -> usize {
        self.models.iter().map(Model::atom_count).sum()
    }
}
