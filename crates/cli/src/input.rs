//! Matrix JSON input: an array of rows, each entry an integer or a `"p/q"` string.

use anyhow::{bail, Context, Result};
use kirchhoff::{InputMatrix, Rational};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum Entry {
    Int(i64),
    Text(String),
}

impl Entry {
    fn to_rational(&self) -> Result<Rational> {
        match self {
            Entry::Int(v) => Ok(Rational::from_integer((*v).into())),
            Entry::Text(s) => {
                let trimmed = s.trim();
                let value: Rational = trimmed
                    .parse()
                    .with_context(|| format!("not a rational: {s:?}"))?;
                Ok(value)
            }
        }
    }
}

/// Parse a matrix from JSON text.
pub fn parse_matrix(text: &str) -> Result<InputMatrix> {
    let raw: Vec<Vec<Entry>> = serde_json::from_str(text).context("matrix must be a JSON array of rows")?;
    if raw.is_empty() {
        bail!("matrix has no rows");
    }
    let rows = raw
        .iter()
        .enumerate()
        .map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(|(c, e)| e.to_rational().with_context(|| format!("entry ({r}, {c})")))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(InputMatrix::from_rows(rows)?)
}

/// Read and parse a matrix file.
pub fn read_matrix(path: &Path) -> Result<InputMatrix> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_matrix(&text).with_context(|| format!("parsing {}", path.display()))
}
