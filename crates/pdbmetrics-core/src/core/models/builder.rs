use super::atom::{Atom, AtomDesignators};
use super::document::StructureDocument;
use super::model::Model;
use super::secondary::{SecondaryStructureKind, SecondaryStructureSpan};
use crate::core::io::records::Record;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// No model is open.
    Idle,
    /// Atoms are being accumulated into the current model.
    InModel,
    /// An `END` record (or the end of input) was reached. Further records are ignored.
    Done,
}

/// Assembles a [`StructureDocument`] from classified records in file order.
///
/// A model opens on `MODEL` and is sealed on `ENDMDL`. A file that never
/// contains a `MODEL` record gets one implicit model, opened by its first atom
/// and sealed at the end of input. Secondary-structure spans are accumulated
/// in every state because the format does not scope them to a model.
pub struct StructureBuilder {
    designators: AtomDesignators,
    state: BuilderState,
    current: Model,
    document: StructureDocument,
    saw_model_start: bool,
    stray_atoms: usize,
}

impl Default for StructureBuilder {
    fn default() -> Self {
        Self::new(AtomDesignators::default())
    }
}

impl StructureBuilder {
    pub fn new(designators: AtomDesignators) -> Self {
        Self {
            designators,
            state: BuilderState::Idle,
            current: Model::default(),
            document: StructureDocument::default(),
            saw_model_start: false,
            stray_atoms: 0,
        }
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == BuilderState::Done
    }

    pub fn apply(&mut self, record: Record) -> &mut Self {
        match record {
            Record::Atom(atom) => self.add_atom(atom),
            Record::Helix(span) | Record::Sheet(span) => self.add_span(span),
            Record::ModelStart { serial } => self.start_model(serial),
            Record::ModelEnd => self.end_model(),
            Record::End => self.end_input(),
            Record::Unrecognized => self,
        }
    }

    pub fn start_model(&mut self, serial: Option<usize>) -> &mut Self {
        match self.state {
            BuilderState::Done => return self,
            BuilderState::InModel => {
                warn!(
                    "MODEL record found while model {} is still open; sealing it without ENDMDL.",
                    self.current.serial()
                );
                self.seal();
            }
            BuilderState::Idle => {}
        }
        self.saw_model_start = true;
        let serial = serial.unwrap_or(self.document.models.len() + 1);
        self.current = Model::new(serial);
        self.state = BuilderState::InModel;
        self
    }

    pub fn end_model(&mut self) -> &mut Self {
        match self.state {
            BuilderState::InModel => self.seal(),
            BuilderState::Idle => warn!("ENDMDL record found with no open model; ignoring it."),
            BuilderState::Done => {}
        }
        self
    }

    pub fn add_atom(&mut self, atom: Atom) -> &mut Self {
        match self.state {
            BuilderState::Done => return self,
            BuilderState::Idle if self.saw_model_start => {
                self.stray_atoms += 1;
                self.document.skipped_records += 1;
                return self;
            }
            BuilderState::Idle => {
                debug!("No MODEL record before the first atom; opening an implicit model.");
                self.current = Model::new(self.document.models.len() + 1);
                self.state = BuilderState::InModel;
            }
            BuilderState::InModel => {}
        }
        let kind = self.designators.kind_of(&atom.name);
        self.current.push_atom(atom, kind);
        self
    }

    pub fn add_span(&mut self, span: SecondaryStructureSpan) -> &mut Self {
        if self.state == BuilderState::Done {
            return self;
        }
        self.document.secondary_structure_residues += span.residue_count();
        match span.kind() {
            SecondaryStructureKind::Helix => self.document.helix_count += 1,
            SecondaryStructureKind::Sheet => self.document.sheet_count += 1,
        }
        self
    }

    /// Counts a record the reader decided to drop.
    pub fn skip_record(&mut self) -> &mut Self {
        self.document.skipped_records += 1;
        self
    }

    pub fn end_input(&mut self) -> &mut Self {
        if self.state == BuilderState::InModel {
            self.seal();
        }
        self.state = BuilderState::Done;
        self
    }

    pub fn build(mut self) -> StructureDocument {
        self.end_input();
        if self.stray_atoms > 0 {
            warn!(
                "Skipped {} atom record(s) found outside MODEL/ENDMDL blocks.",
                self.stray_atoms
            );
        }
        self.document
    }

    fn seal(&mut self) {
        let model = std::mem::take(&mut self.current);
        debug!(
            "Sealed model {} with {} atoms ({} alpha-carbons, {} beta-carbons).",
            model.serial(),
            model.atom_count(),
            model.alpha_carbon_count(),
            model.beta_carbon_count()
        );
        self.document.models.push(model);
        self.state = BuilderState::Idle;
    }
}
