use crate::core::io::traits::StructureFile;
use crate::core::models::atom::RecordKind;
use crate::core::models::builder::StructureBuilder;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must reach column 54)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_coordinate(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Reader for the fixed-column Protein Data Bank format.
///
/// Only coordinate records are interpreted. Every `MODEL` of an ensemble is read, each
/// into its own set of chains. For alternate locations the conformer with the highest
/// occupancy is kept.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error> {
        let mut builder = StructureBuilder::new();
        let mut seen_atom_records = false;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let record_type = slice_and_trim(&line, 0, 6);
            match record_type {
                "ATOM" | "HETATM" => {
                    if line.len() < 54 {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }
                    seen_atom_records = true;

                    let serial_str = slice_and_trim(&line, 6, 11);
                    let name_str = slice_and_trim(&line, 12, 16);
                    let res_name_str = slice_and_trim(&line, 17, 20);
                    let chain_id_str = slice_and_trim(&line, 21, 22);
                    let res_seq_str = slice_and_trim(&line, 22, 26);
                    let insertion_code = line.get(26..27).and_then(|s| s.chars().next());
                    let element_str = slice_and_trim(&line, 76, 78);

                    if name_str.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }
                    // Large structures overflow the five serial columns; the serial is
                    // informational only, so fall back to the running atom count.
                    let serial: usize = serial_str
                        .parse()
                        .unwrap_or_else(|_| builder.atom_count() + 1);
                    let res_seq: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "23-26".into(),
                            value: res_seq_str.into(),
                        },
                    })?;
                    let x = parse_coordinate(&line, line_num, 30, 38)?;
                    let y = parse_coordinate(&line, line_num, 38, 46)?;
                    let z = parse_coordinate(&line, line_num, 46, 54)?;
                    let occupancy = if slice_and_trim(&line, 54, 60).is_empty() {
                        1.0
                    } else {
                        parse_coordinate(&line, line_num, 54, 60)?
                    };

                    let record = if record_type == "HETATM" {
                        RecordKind::Hetero
                    } else {
                        RecordKind::Atom
                    };
                    let insertion_code = insertion_code.filter(|c| !c.is_whitespace());
                    let element = (!element_str.is_empty()).then_some(element_str);

                    builder
                        .start_chain(chain_id_str)
                        .start_residue(res_seq, insertion_code, res_name_str);
                    builder.add_atom(
                        serial,
                        name_str,
                        element,
                        record,
                        occupancy,
                        Point3::new(x, y, z),
                    );
                }
                "MODEL" => {
                    builder.start_model();
                }
                "END" => break,
                _ => {}
            }
        }

        if !seen_atom_records {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        Ok(builder.build())
    }
}
