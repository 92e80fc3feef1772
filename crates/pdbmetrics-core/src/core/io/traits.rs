use crate::core::models::atom::AtomDesignators;
use crate::core::models::document::StructureDocument;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Options that change how records are turned into a document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReadOptions {
    /// Atom names treated as the alpha- and beta-carbon markers.
    pub designators: AtomDesignators,
    /// When set, a malformed `HELIX`/`SHEET` record aborts the read instead of
    /// being skipped.
    pub strict_spans: bool,
}

/// Defines the interface for reading structure file formats.
///
/// Implementors only provide [`read_from`](StructureFile::read_from); reading
/// from a path or an in-memory string is derived from it.
pub trait StructureFile {
    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads a structure document from a buffered reader.
    ///
    /// The reader is consumed sequentially, once, from start to finish (or up
    /// to the format's end-of-data marker).
    ///
    /// # Errors
    ///
    /// Returns an error if a load-bearing record is malformed or the reader fails.
    fn read_from(
        reader: &mut impl BufRead,
        options: &ReadOptions,
    ) -> Result<StructureDocument, Self::Error>;

    /// Reads a structure document from in-memory text.
    fn read_from_str(text: &str, options: &ReadOptions) -> Result<StructureDocument, Self::Error> {
        let mut reader = text.as_bytes();
        Self::read_from(&mut reader, options)
    }

    /// Reads a structure document from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(
        path: P,
        options: &ReadOptions,
    ) -> Result<StructureDocument, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, options)
    }
}
