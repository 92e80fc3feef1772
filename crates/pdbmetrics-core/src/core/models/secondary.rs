use std::fmt;

/// The structural motif a secondary-structure annotation describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecondaryStructureKind {
    Helix,
    Sheet,
}

impl fmt::Display for SecondaryStructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecondaryStructureKind::Helix => write!(f, "HELIX"),
            SecondaryStructureKind::Sheet => write!(f, "SHEET"),
        }
    }
}

/// A contiguous residue range contributed by a `HELIX` or `SHEET` record.
///
/// Spans are file-wide: the PDB format does not nest annotation records inside
/// `MODEL` blocks, so they are never attributed to a single model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SecondaryStructureSpan {
    kind: SecondaryStructureKind,
    start: isize,
    end: isize,
}

impl SecondaryStructureSpan {
    /// Creates a span, or `None` when `end < start`.
    pub fn new(kind: SecondaryStructureKind, start: isize, end: isize) -> Option<Self> {
        (end >= start).then_some(Self { kind, start, end })
    }

    pub fn kind(&self) -> SecondaryStructureKind {
        self.kind
    }

    pub fn start(&self) -> isize {
        self.start
    }

    pub fn end(&self) -> isize {
        self.end
    }

    /// Number of residues covered, `end - start + 1`.
    pub fn residue_count(&self) -> usize {
        (self.end - self.start) as usize + 1
    }
}
