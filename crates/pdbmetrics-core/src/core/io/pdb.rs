use super::records::{self, ParseError};
use super::traits::{ReadOptions, StructureFile};
use crate::core::models::builder::StructureBuilder;
use crate::core::models::document::StructureDocument;
use std::borrow::Cow;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Reader for the fixed-column PDB format.
///
/// Only the records needed for structure metrics are interpreted: `ATOM`,
/// `HELIX`, `SHEET`, `MODEL`, `ENDMDL` and `END`. Everything else is ignored.
///
/// A malformed `ATOM` record is fatal, since every metric depends on the
/// coordinates. A malformed `HELIX`/`SHEET` record is skipped with a warning
/// unless [`ReadOptions::strict_spans`] is set.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
        options: &ReadOptions,
    ) -> Result<StructureDocument, Self::Error> {
        let mut builder = StructureBuilder::new(options.designators.clone());

        let mut buf = Vec::new();
        let mut line_num = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_num += 1;
            let line = decode_line(&buf);

            match records::classify(&line, line_num) {
                Ok(record) => {
                    builder.apply(record);
                }
                Err(err) if err.record.is_annotation() && !options.strict_spans => {
                    warn!("Skipping malformed secondary-structure record: {}", err);
                    builder.skip_record();
                }
                Err(err) => return Err(err.into()),
            }

            if builder.is_done() {
                debug!("END record on line {}; stopping.", line_num);
                break;
            }
        }

        let document = builder.build();
        debug!(
            "Read {} model(s), {} atoms, {} secondary-structure residues ({} helices, {} sheets).",
            document.model_count(),
            document.atom_count(),
            document.secondary_structure_residues(),
            document.helix_count(),
            document.sheet_count()
        );
        Ok(document)
    }
}

/// Strips the line ending and decodes one raw line.
///
/// Free-text records (`REMARK`, `AUTHOR`, ...) occasionally carry Latin-1 or
/// other non-UTF-8 bytes. Each such byte becomes a single `?` so the fixed
/// column offsets of the rest of the line are preserved.
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    match std::str::from_utf8(raw) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(
            raw.iter()
                .map(|&b| if b.is_ascii() { b as char } else { '?' })
                .collect(),
        ),
    }
}
