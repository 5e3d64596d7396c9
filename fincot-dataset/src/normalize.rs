//! Normalization of raw table cells and answer strings.
//!
//! Financial filings format numbers inconsistently: currency markers,
//! thousands separators, percent signs, and accounting-style parentheses
//! for negatives all appear in the same column. [`clean_value`] reduces
//! these to a [`NormalizedValue`] so downstream serialization and scoring
//! see uniform data.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

/// Matches an optionally negated numeric body, with or without wrapping
/// parentheses, anchored at the start of the cleaned string.
const NUMERIC_PATTERN: &str = r"^-?\(?\s*(-?\d+\.?\d*)\s*\)?";

static NUMERIC_RE: OnceLock<Regex> = OnceLock::new();

fn numeric_re() -> &'static Regex {
    NUMERIC_RE.get_or_init(|| Regex::new(NUMERIC_PATTERN).expect("numeric pattern is valid"))
}

/// The result of normalizing one raw string value.
///
/// Serializes untagged: numbers as JSON numbers, text as JSON strings, and
/// missing values as JSON null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedValue {
    /// A recognized numeric value, sign-corrected.
    Number(f64),
    /// Text that carried no leading numeric body, stripped of currency and
    /// percent markers.
    Text(String),
    /// Absent or empty input.
    Missing,
}

impl NormalizedValue {
    /// Returns the numeric value if this is a [`NormalizedValue::Number`].
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns `true` if the input was absent or empty.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl fmt::Display for NormalizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Missing => write!(f, "no value"),
        }
    }
}

/// Normalize one raw cell or answer string.
///
/// Currency markers (`$`, `£`), percent signs, and thousands-separating
/// commas are stripped and the result trimmed. A leading numeric body is
/// parsed to a float, negated when the stripped text carries a minus sign
/// or an accounting-style parenthesis. Strings without a leading number
/// come back as [`NormalizedValue::Text`]; absent or empty input becomes
/// [`NormalizedValue::Missing`].
#[must_use]
pub fn clean_value(value: Option<&str>) -> NormalizedValue {
    let Some(raw) = value else {
        return NormalizedValue::Missing;
    };
    if raw.is_empty() {
        return NormalizedValue::Missing;
    }

    let stripped = raw
        .replace('$', "")
        .replace('£', "")
        .replace('%', "")
        .replace(',', "")
        .trim()
        .to_string();

    let Some(captures) = numeric_re().captures(&stripped) else {
        return NormalizedValue::Text(stripped);
    };

    match captures[1].parse::<f64>() {
        Ok(number) => {
            let negate = stripped.contains('-') || stripped.contains('(');
            NormalizedValue::Number(if negate { -number.abs() } else { number })
        }
        Err(err) => {
            warn!("Could not convert '{}' to a number: {}", stripped, err);
            NormalizedValue::Text(stripped)
        }
    }
}

/// One structured table row: the row label plus its cells in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Label from the row's first column.
    pub label: String,
    /// Remaining cells, keyed by their column header.
    pub cells: Vec<(String, NormalizedValue)>,
}

impl Serialize for TableRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len() + 1))?;
        map.serialize_entry("row_label", &self.label)?;
        for (header, value) in &self.cells {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

/// Parse a raw table into structured, normalized rows.
///
/// The first row is taken as the header row; its first cell is discarded
/// since data rows carry their own label in that position. Every remaining
/// cell is passed through [`clean_value`]. Rows shorter than the header are
/// padded with missing values, and an empty table or empty header row
/// yields no output.
pub fn parse_table(table: &[Vec<String>]) -> Vec<TableRow> {
    let Some(headers) = table.first() else {
        warn!("Cannot parse an empty table");
        return Vec::new();
    };
    if headers.is_empty() {
        warn!("Cannot parse a table with an empty header row");
        return Vec::new();
    }

    let column_headers = &headers[1..];
    let mut rows = Vec::with_capacity(table.len() - 1);
    for raw_row in &table[1..] {
        let Some(label) = raw_row.first() else {
            continue;
        };
        let cells = column_headers
            .iter()
            .enumerate()
            .map(|(column, header)| {
                let value = raw_row.get(column + 1).map(String::as_str);
                (header.clone(), clean_value(value))
            })
            .collect();
        rows.push(TableRow {
            label: label.clone(),
            cells,
        });
    }
    debug!("Parsed {} rows from the table", rows.len());
    rows
}
