//! Weight Tables
//!
//! Parsers for the VocaLink `valacdos.txt` weight table and the
//! `scsubtab.txt` sort code substitution table.

use std::collections::HashMap;
use std::str::FromStr;

use super::ModulusError;

/// Number of weights per row: six sort code digits, eight account digits
pub const WEIGHT_COUNT: usize = 14;

/// Check method named in a weight row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModulusMethod {
    Mod10,
    Mod11,
    DoubleAlternate,
}

impl FromStr for ModulusMethod {
    type Err = ModulusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MOD10" => Ok(ModulusMethod::Mod10),
            "MOD11" => Ok(ModulusMethod::Mod11),
            "DBLAL" => Ok(ModulusMethod::DoubleAlternate),
            other => Err(ModulusError::UnknownMethod(other.to_string())),
        }
    }
}

/// One row of the weight table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightRow {
    pub start: u32,
    pub end: u32,
    pub method: ModulusMethod,
    pub weights: [i32; WEIGHT_COUNT],
    pub exception: Option<u8>,
}

impl WeightRow {
    pub fn covers(&self, sort_code: u32) -> bool {
        self.start <= sort_code && sort_code <= self.end
    }

    fn parse(line: &str, line_number: usize) -> Result<Self, ModulusError> {
        let malformed = |reason: &str| ModulusError::MalformedRow {
            line: line_number,
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 + WEIGHT_COUNT && fields.len() != 4 + WEIGHT_COUNT {
            return Err(malformed("unexpected field count"));
        }

        let start = parse_sort_code(fields[0]).ok_or_else(|| malformed("bad start sort code"))?;
        let end = parse_sort_code(fields[1]).ok_or_else(|| malformed("bad end sort code"))?;
        if start > end {
            return Err(malformed("start sort code after end sort code"));
        }

        let method = fields[2].parse()?;

        let mut weights = [0i32; WEIGHT_COUNT];
        for (slot, field) in weights.iter_mut().zip(&fields[3..3 + WEIGHT_COUNT]) {
            *slot = field.parse().map_err(|_| malformed("bad weight"))?;
        }

        let exception = match fields.get(3 + WEIGHT_COUNT) {
            Some(field) => Some(field.parse().map_err(|_| malformed("bad exception"))?),
            None => None,
        };

        Ok(Self {
            start,
            end,
            method,
            weights,
            exception,
        })
    }
}

/// The full set of weight rows, in file order
#[derive(Debug, Clone, Default)]
pub struct WeightTable {
    rows: Vec<WeightRow>,
}

impl WeightTable {
    /// Parse a table in `valacdos.txt` format. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, ModulusError> {
        let rows = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| WeightRow::parse(line, index + 1))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rows })
    }

    /// Rows applying to a sort code, first check first
    pub fn lookup(&self, sort_code: u32) -> Vec<&WeightRow> {
        self.rows.iter().filter(|row| row.covers(sort_code)).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Sort code substitutions used by exception 5
#[derive(Debug, Clone, Default)]
pub struct SubstitutionTable {
    substitutions: HashMap<u32, u32>,
}

impl SubstitutionTable {
    /// Parse a table in `scsubtab.txt` format: `original substitute` per line
    pub fn parse(text: &str) -> Result<Self, ModulusError> {
        let mut substitutions = HashMap::new();

        for (index, line) in text.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [] => continue,
                [original, substitute] => {
                    let malformed = || ModulusError::MalformedRow {
                        line: index + 1,
                        reason: "bad substitution sort code".to_string(),
                    };
                    let original = parse_sort_code(original).ok_or_else(malformed)?;
                    let substitute = parse_sort_code(substitute).ok_or_else(malformed)?;
                    substitutions.insert(original, substitute);
                }
                _ => {
                    return Err(ModulusError::MalformedRow {
                        line: index + 1,
                        reason: "expected two sort codes".to_string(),
                    })
                }
            }
        }

        Ok(Self { substitutions })
    }

    pub fn substitute(&self, sort_code: u32) -> Option<u32> {
        self.substitutions.get(&sort_code).copied()
    }
}

fn parse_sort_code(field: &str) -> Option<u32> {
    if field.len() == 6 && field.bytes().all(|b| b.is_ascii_digit()) {
        field.parse().ok()
    } else {
        None
    }
}
