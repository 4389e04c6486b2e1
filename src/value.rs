// src/value.rs
//! Cell values of a ranked entry and how each column kind is displayed.

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Column content kinds understood by the ranking engine.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentsKind {
    Category,
    Json,
    String,
    Integer,
    Double,
    Date,
    Interval,
}

/// One cell of an entry's value-tuple.
///
/// `Absent` replaces the engine's null; Category, Json and String columns all
/// carry `Text`. Dates are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Absent,
    Integer(i64),
    Double(f64),
    Text(String),
    Date(f64),
    Interval(f64, f64),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Convert a decoded JSON cell according to the kind of its column.
    pub fn from_json(json: &serde_json::Value, kind: ContentsKind) -> Result<Value, ValueError> {
        use serde_json::Value as Json;

        if json.is_null() {
            return Ok(Value::Absent);
        }

        let mismatch = || ValueError::KindMismatch {
            kind,
            found: json.to_string(),
        };

        match kind {
            ContentsKind::Category | ContentsKind::String => match json {
                Json::String(s) => Ok(Value::Text(s.clone())),
                _ => Err(mismatch()),
            },
            // Json columns hold arbitrary documents; keep the text of non-strings.
            ContentsKind::Json => match json {
                Json::String(s) => Ok(Value::Text(s.clone())),
                other => Ok(Value::Text(other.to_string())),
            },
            ContentsKind::Integer => json.as_i64().map(Value::Integer).ok_or_else(mismatch),
            ContentsKind::Double => json.as_f64().map(Value::Double).ok_or_else(mismatch),
            ContentsKind::Date => json.as_f64().map(Value::Date).ok_or_else(mismatch),
            ContentsKind::Interval => match json {
                Json::Array(pair) if pair.len() == 2 => {
                    let start = pair[0].as_f64().ok_or_else(mismatch)?;
                    let end = pair[1].as_f64().ok_or_else(mismatch)?;
                    Ok(Value::Interval(start, end))
                }
                _ => Err(mismatch()),
            },
        }
    }
}

/// Display string for a present value of a column of the given kind.
pub fn format_value(value: &Value, kind: ContentsKind) -> String {
    match (kind, value) {
        (_, Value::Absent) => String::new(),
        (ContentsKind::Date, Value::Date(ms)) | (ContentsKind::Date, Value::Double(ms)) => {
            format_date(*ms)
        }
        (_, Value::Integer(i)) => i.to_string(),
        (_, Value::Double(d)) => format_double(*d),
        (_, Value::Text(s)) => s.clone(),
        (_, Value::Date(ms)) => format_date(*ms),
        (_, Value::Interval(start, end)) => {
            format!("[{} : {}]", format_double(*start), format_double(*end))
        }
    }
}

fn format_double(d: f64) -> String {
    if d.is_finite() && d.fract() == 0.0 && d.abs() < 1e15 {
        format!("{}", d as i64)
    } else {
        d.to_string()
    }
}

fn format_date(ms: f64) -> String {
    match chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ms as i64) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format_double(ms),
    }
}

/// Format a number with three significant digits, scaling large magnitudes
/// with a K/M/B/T suffix.
pub fn significant_digits(x: f64) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    if !x.is_finite() {
        return x.to_string();
    }

    if x.abs() < 1e-3 {
        return format!("{:.2e}", x);
    }

    // round before scaling so 999.6 reads 1K, not 1000
    let step = 10f64.powi(x.abs().log10().floor() as i32 - 2);
    let rounded = (x / step).round() * step;
    let abs = rounded.abs();
    let (scaled, suffix) = if abs >= 1e12 {
        (rounded / 1e12, "T")
    } else if abs >= 1e9 {
        (rounded / 1e9, "B")
    } else if abs >= 1e6 {
        (rounded / 1e6, "M")
    } else if abs >= 1e3 {
        (rounded / 1e3, "K")
    } else {
        (rounded, "")
    };

    // digits after the decimal point needed for 3 significant ones
    let magnitude = scaled.abs().log10().floor() as i32;
    let decimals = (2 - magnitude).max(0) as usize;
    let mut text = format!("{:.*}", decimals, scaled);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    text.push_str(suffix);
    text
}
