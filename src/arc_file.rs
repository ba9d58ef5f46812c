use anyhow::{Context, Result};
use log::debug;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::atom::{Atom, Structure};

/// Fewer fields than this and the line is not an atom record.
const MIN_ATOM_FIELDS: usize = 6;

/// How to treat a numeric field that does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumericPolicy {
    /// Substitute zero and keep going.
    #[default]
    Lenient,
    /// Fail with [`ArcParsingError::InvalidNumber`].
    Strict,
}

#[derive(Debug)]
pub enum ArcParsingError {
    InvalidNumber {
        line: usize,
        field: usize,
        value: String,
    },
    DuplicateAtomId {
        line: usize,
        id: i64,
    },
    IO(io::Error),
}

impl std::fmt::Display for ArcParsingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { line, field, value } => {
                write!(f, "line {line}: field {field} is not a number: '{value}'")
            }
            Self::DuplicateAtomId { line, id } => write!(f, "line {line}: duplicate atom id {id}"),
            Self::IO(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArcParsingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IO(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ArcParsingError {
    fn from(err: io::Error) -> Self {
        Self::IO(err)
    }
}

/// A parsed `.arc` snapshot: `id element x y z type [bond ...]` per line.
#[derive(Debug)]
pub struct ArcFile {
    structure: Structure,
    pub skipped_lines: usize,
    pub substituted_fields: usize,
}

struct FieldParser {
    policy: NumericPolicy,
    line: usize,
    substituted: usize,
}

impl FieldParser {
    fn parse<T>(&mut self, fields: &[&str], field: usize) -> Result<T, ArcParsingError>
    where
        T: FromStr + Default,
    {
        let value = fields[field];
        match (value.parse::<T>(), self.policy) {
            (Ok(n), _) => Ok(n),
            (Err(_), NumericPolicy::Lenient) => {
                debug!("line {}: field {} '{value}' read as 0", self.line, field + 1);
                self.substituted += 1;
                Ok(T::default())
            }
            (Err(_), NumericPolicy::Strict) => Err(ArcParsingError::InvalidNumber {
                line: self.line,
                field: field + 1,
                value: value.to_string(),
            }),
        }
    }
}

impl ArcFile {
    pub fn parse(reader: impl BufRead, policy: NumericPolicy) -> Result<Self, ArcParsingError> {
        let mut atoms = Vec::new();
        let mut lines_of_atoms = Vec::new();
        let mut skipped_lines = 0;
        let mut fields_parser = FieldParser {
            policy,
            line: 0,
            substituted: 0,
        };
        for (cnt, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            let line = String::from_utf8_lossy(&line);
            let fields = line.split_whitespace().collect::<Vec<_>>();
            if fields.len() < MIN_ATOM_FIELDS {
                skipped_lines += 1;
                continue;
            }
            fields_parser.line = cnt + 1;
            let id = fields_parser.parse::<i64>(&fields, 0)?;
            let position = [
                fields_parser.parse::<f64>(&fields, 2)?,
                fields_parser.parse::<f64>(&fields, 3)?,
                fields_parser.parse::<f64>(&fields, 4)?,
            ];
            let bonds = (MIN_ATOM_FIELDS..fields.len())
                .map(|j| fields_parser.parse::<i64>(&fields, j))
                .collect::<Result<Vec<_>, _>>()?;
            atoms.push(Atom::new(id, fields[1], position, fields[5], bonds));
            lines_of_atoms.push(cnt + 1);
        }
        let structure =
            Structure::new(atoms).map_err(|err| ArcParsingError::DuplicateAtomId {
                line: lines_of_atoms[err.index],
                id: err.id,
            })?;
        debug!(
            "parsed {} atoms, skipped {} lines",
            structure.len(),
            skipped_lines
        );
        Ok(Self {
            structure,
            skipped_lines,
            substituted_fields: fields_parser.substituted,
        })
    }

    pub fn read(path: &Path, policy: NumericPolicy) -> Result<Self> {
        let reader = BufReader::new(
            File::open(path).context(format!("Failed to open molecule file: {}", path.to_string_lossy()))?,
        );
        Self::parse(reader, policy).context(format!("Reading {}", path.to_string_lossy()))
    }

    #[inline]
    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn into_structure(self) -> Structure {
        self.structure
    }
}
