use serde::Serialize;

use crate::error::RecordError;

/// A single (timestamp, value) pair fed into the window.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub timestamp: f64,
    pub value: f64,
}

impl Observation {
    pub fn new(timestamp: f64, value: f64) -> Self {
        Observation { timestamp, value }
    }
}

// parse a "<timestamp>\t<cost>" record
pub fn parse_record(line: &str) -> Result<Observation, RecordError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return Err(RecordError::FieldCount { found: 0 });
    }

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != 2 {
        return Err(RecordError::FieldCount { found: fields.len() });
    }

    let timestamp = parse_field("timestamp", fields[0])?;
    let value = parse_field("cost", fields[1])?;
    Ok(Observation::new(timestamp, value))
}

fn parse_field(field: &'static str, text: &str) -> Result<f64, RecordError> {
    let parsed = text
        .trim()
        .parse::<f64>()
        .map_err(|_| RecordError::InvalidNumber {
            field,
            text: text.to_string(),
        })?;

    if !parsed.is_finite() {
        return Err(RecordError::NonFinite { field });
    }
    Ok(parsed)
}
