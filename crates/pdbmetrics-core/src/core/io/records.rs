use crate::core::models::atom::Atom;
use crate::core::models::secondary::{SecondaryStructureKind, SecondaryStructureSpan};
use nalgebra::Point3;
use phf::{Map, phf_map};
use std::fmt;
use thiserror::Error;

/// A fixed column range of a PDB line.
///
/// `start` and `end` are 0-based, end-exclusive byte offsets; `label` is the
/// 1-based inclusive range as written in the format documentation and is used
/// in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub start: usize,
    pub end: usize,
    pub label: &'static str,
}

impl Columns {
    pub const fn new(start: usize, end: usize, label: &'static str) -> Self {
        Self { start, end, label }
    }

    fn slice<'a>(&self, line: &'a str) -> &'a str {
        line.get(self.start..self.end)
            .or_else(|| line.get(self.start..))
            .unwrap_or("")
            .trim()
    }
}

impl fmt::Display for Columns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

pub const RECORD_NAME: Columns = Columns::new(0, 6, "1-6");

pub const ATOM_NAME: Columns = Columns::new(12, 16, "13-16");
pub const ATOM_RESIDUE_NUMBER: Columns = Columns::new(22, 26, "23-26");
pub const ATOM_X: Columns = Columns::new(30, 38, "31-38");
pub const ATOM_Y: Columns = Columns::new(38, 46, "39-46");
pub const ATOM_Z: Columns = Columns::new(46, 54, "47-54");

pub const HELIX_START: Columns = Columns::new(21, 25, "22-25");
pub const HELIX_END: Columns = Columns::new(33, 37, "34-37");

pub const SHEET_START: Columns = Columns::new(22, 26, "23-26");
pub const SHEET_END: Columns = Columns::new(33, 37, "34-37");

pub const MODEL_SERIAL: Columns = Columns::new(10, 14, "11-14");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Atom,
    Helix,
    Sheet,
    Model,
    EndModel,
    End,
}

impl RecordKind {
    /// Annotation records may be dropped on a parse failure without
    /// invalidating the coordinates of the file.
    pub fn is_annotation(self) -> bool {
        matches!(self, RecordKind::Helix | RecordKind::Sheet)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Atom => "ATOM",
            RecordKind::Helix => "HELIX",
            RecordKind::Sheet => "SHEET",
            RecordKind::Model => "MODEL",
            RecordKind::EndModel => "ENDMDL",
            RecordKind::End => "END",
        };
        f.write_str(name)
    }
}

static RECORD_KINDS: Map<&'static str, RecordKind> = phf_map! {
    "ATOM" => RecordKind::Atom,
    "HELIX" => RecordKind::Helix,
    "SHEET" => RecordKind::Sheet,
    "MODEL" => RecordKind::Model,
    "ENDMDL" => RecordKind::EndModel,
    "END" => RecordKind::End,
};

/// One classified line of a PDB file.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Atom(Atom),
    Helix(SecondaryStructureSpan),
    Sheet(SecondaryStructureSpan),
    ModelStart { serial: Option<usize> },
    ModelEnd,
    End,
    Unrecognized,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("Parse error on line {line} ({record} record): {kind}")]
pub struct ParseError {
    pub line: usize,
    pub record: RecordKind,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: Columns, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: Columns, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: Columns },
    #[error("Span ends at residue {end} before it starts at residue {start}")]
    InvalidSpan { start: isize, end: isize },
}

/// Classifies one line of a PDB file.
///
/// `line_number` is 1-based and only used for error reporting. Lines whose
/// record name is not one of `ATOM`, `HELIX`, `SHEET`, `MODEL`, `ENDMDL` or
/// `END` classify as [`Record::Unrecognized`].
pub fn classify(line: &str, line_number: usize) -> Result<Record, ParseError> {
    let Some(&kind) = RECORD_KINDS.get(RECORD_NAME.slice(line)) else {
        return Ok(Record::Unrecognized);
    };
    let fields = FieldReader {
        line,
        line_number,
        record: kind,
    };

    match kind {
        RecordKind::Atom => {
            let name = fields.required_str(ATOM_NAME)?;
            let residue_number = fields.int(ATOM_RESIDUE_NUMBER)?;
            let position = Point3::new(
                fields.float(ATOM_X)?,
                fields.float(ATOM_Y)?,
                fields.float(ATOM_Z)?,
            );
            Ok(Record::Atom(Atom::new(name, residue_number, position)))
        }
        RecordKind::Helix => fields
            .span(SecondaryStructureKind::Helix, HELIX_START, HELIX_END)
            .map(Record::Helix),
        RecordKind::Sheet => fields
            .span(SecondaryStructureKind::Sheet, SHEET_START, SHEET_END)
            .map(Record::Sheet),
        RecordKind::Model => Ok(Record::ModelStart {
            serial: MODEL_SERIAL.slice(line).parse().ok(),
        }),
        RecordKind::EndModel => Ok(Record::ModelEnd),
        RecordKind::End => Ok(Record::End),
    }
}

struct FieldReader<'a> {
    line: &'a str,
    line_number: usize,
    record: RecordKind,
}

impl<'a> FieldReader<'a> {
    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            line: self.line_number,
            record: self.record,
            kind,
        }
    }

    fn required_str(&self, columns: Columns) -> Result<&'a str, ParseError> {
        let value = columns.slice(self.line);
        if value.is_empty() {
            return Err(self.error(ParseErrorKind::MissingRequiredField { columns }));
        }
        Ok(value)
    }

    fn int(&self, columns: Columns) -> Result<isize, ParseError> {
        let value = self.required_str(columns)?;
        value.parse().map_err(|_| {
            self.error(ParseErrorKind::InvalidInt {
                columns,
                value: value.into(),
            })
        })
    }

    fn float(&self, columns: Columns) -> Result<f64, ParseError> {
        let value = self.required_str(columns)?;
        match value.parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => Ok(parsed),
            _ => Err(self.error(ParseErrorKind::InvalidFloat {
                columns,
                value: value.into(),
            })),
        }
    }

    fn span(
        &self,
        kind: SecondaryStructureKind,
        start_columns: Columns,
        end_columns: Columns,
    ) -> Result<SecondaryStructureSpan, ParseError> {
        let start = self.int(start_columns)?;
        let end = self.int(end_columns)?;
        SecondaryStructureSpan::new(kind, start, end)
            .ok_or_else(|| self.error(ParseErrorKind::InvalidSpan { start, end }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATOM_LINE: &str =
        "ATOM      2  CA  MET A   1      38.198  19.582  28.998  1.00 31.47           C  ";
    const HELIX_LINE: &str =
        "HELIX    1   1 SER A   14  GLY A   26  1                                  13    ";
    const SHEET_LINE: &str =
        "SHEET    1   A 5 THR A 107  ARG A 110  0                                        ";

    mod atoms {
        use super::*;

        #[test]
        fn reads_fixed_column_fields() {
            let record = classify(ATOM_LINE, 1).unwrap();
            let Record::Atom(atom) = record else {
                panic!("expected an atom record, got {record:?}");
            };
            assert_eq!(atom.name, "CA");
            assert_eq!(atom.residue_number, 1);
            assert_eq!(atom.position, Point3::new(38.198, 19.582, 28.998));
        }

        #[test]
        fn coordinates_without_separating_spaces_are_read_by_column() {
            let line = "ATOM      1  CA  GLY A1000    -100.123-200.456-300.789  1.00  0.00           C  ";
            let Record::Atom(atom) = classify(line, 1).unwrap() else {
                panic!("expected an atom record");
            };
            assert_eq!(atom.residue_number, 1000);
            assert_eq!(atom.position, Point3::new(-100.123, -200.456, -300.789));
        }

        #[test]
        fn line_truncated_after_z_is_accepted() {
            let line = &ATOM_LINE[..54];
            assert!(matches!(classify(line, 1), Ok(Record::Atom(_))));
        }

        #[test]
        fn malformed_coordinate_names_line_and_columns() {
            let line = ATOM_LINE.replacen("19.582", "19.5x2", 1);
            let err = classify(&line, 42).unwrap_err();
            assert_eq!(err.line, 42);
            assert_eq!(err.record, RecordKind::Atom);
            assert_eq!(
                err.kind,
                ParseErrorKind::InvalidFloat {
                    columns: ATOM_Y,
                    value: "19.5x2".into()
                }
            );
            assert!(err.to_string().contains("39-46"));
        }

        #[test]
        fn non_finite_coordinate_is_rejected() {
            let line = ATOM_LINE.replacen("  28.998", "     NaN", 1);
            let err = classify(&line, 3).unwrap_err();
            assert!(matches!(err.kind, ParseErrorKind::InvalidFloat { columns, .. } if columns == ATOM_Z));
        }

        #[test]
        fn malformed_residue_number_is_an_int_error() {
            let line = ATOM_LINE.replacen("A   1", "A   ?", 1);
            let err = classify(&line, 7).unwrap_err();
            assert!(matches!(
                err.kind,
                ParseErrorKind::InvalidInt { columns, .. } if columns == ATOM_RESIDUE_NUMBER
            ));
        }

        #[test]
        fn short_line_reports_missing_field() {
            let err = classify("ATOM      2  CA  MET A   1", 9).unwrap_err();
            assert_eq!(
                err.kind,
                ParseErrorKind::MissingRequiredField { columns: ATOM_X }
            );
        }

        #[test]
        fn missing_atom_name_is_an_error() {
            let line = ATOM_LINE.replacen(" CA ", "    ", 1);
            let err = classify(&line, 2).unwrap_err();
            assert_eq!(
                err.kind,
                ParseErrorKind::MissingRequiredField { columns: ATOM_NAME }
            );
        }

        #[test]
        fn hetatm_is_not_an_atom_record() {
            let line = ATOM_LINE.replacen("ATOM  ", "HETATM", 1);
            assert_eq!(classify(&line, 1).unwrap(), Record::Unrecognized);
        }
    }

    mod annotations {
        use super::*;

        #[test]
        fn helix_reads_start_and_end_residues() {
            let Record::Helix(span) = classify(HELIX_LINE, 1).unwrap() else {
                panic!("expected a helix record");
            };
            assert_eq!(span.start(), 14);
            assert_eq!(span.end(), 26);
            assert_eq!(span.residue_count(), 13);
        }

        #[test]
        fn sheet_reads_its_own_column_layout() {
            let Record::Sheet(span) = classify(SHEET_LINE, 1).unwrap() else {
                panic!("expected a sheet record");
            };
            assert_eq!(span.start(), 107);
            assert_eq!(span.end(), 110);
            assert_eq!(span.kind(), SecondaryStructureKind::Sheet);
        }

        #[test]
        fn inverted_span_is_an_error() {
            let line = HELIX_LINE.replacen("GLY A   26", "GLY A    2", 1);
            let err = classify(&line, 5).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::InvalidSpan { start: 14, end: 2 });
            assert!(err.record.is_annotation());
        }

        #[test]
        fn malformed_span_number_is_an_error() {
            let line = HELIX_LINE.replacen("A   14", "A   1X", 1);
            let err = classify(&line, 5).unwrap_err();
            assert_eq!(err.record, RecordKind::Helix);
            assert!(matches!(err.kind, ParseErrorKind::InvalidInt { .. }));
        }
    }

    mod boundaries {
        use super::*;

        #[test]
        fn model_reads_serial() {
            assert_eq!(
                classify("MODEL        1", 1).unwrap(),
                Record::ModelStart { serial: Some(1) }
            );
            assert_eq!(
                classify("MODEL       12                                                                  ", 1)
                    .unwrap(),
                Record::ModelStart { serial: Some(12) }
            );
        }

        #[test]
        fn model_without_serial_is_still_a_model_start() {
            assert_eq!(classify("MODEL", 1).unwrap(), Record::ModelStart { serial: None });
        }

        #[test]
        fn end_records_are_distinguished() {
            assert_eq!(classify("ENDMDL", 1).unwrap(), Record::ModelEnd);
            assert_eq!(classify("END", 1).unwrap(), Record::End);
            assert_eq!(classify("END   ", 1).unwrap(), Record::End);
        }

        #[test]
        fn unknown_and_empty_lines_are_unrecognized() {
            assert_eq!(classify("", 1).unwrap(), Record::Unrecognized);
            assert_eq!(classify("REMARK   2 RESOLUTION.", 1).unwrap(), Record::Unrecognized);
            assert_eq!(classify("TER      10      MET A   1", 1).unwrap(), Record::Unrecognized);
        }
    }
}
