// src/top_list.rs
//! Decoding of a ranking-engine result into typed entries.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, RenderError};
use crate::heavy_hitters::{render_rows, DisplayRow, Entry};
use crate::schema::Schema;
use crate::value::Value;

/// A heavy-hitters result: the ranked entries, the schema of their values and
/// the row count of the full table they were drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct TopList {
    pub heavy_hitters_id: String,
    pub schema: Schema,
    pub row_count: u64,
    /// `None` when the engine reported only a total.
    pub rows: Option<Vec<Entry>>,
}

/* ─── wire shape ─── */
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawTopList {
    heavy_hitters_id: String,
    schema: Schema,
    row_count: u64,
    #[serde(default)]
    rows: Option<Vec<RawEntry>>,
}

#[derive(Serialize, Deserialize, Debug)]
struct RawEntry {
    values: Vec<serde_json::Value>,
    count: u64,
}

impl TopList {
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let raw: RawTopList = serde_json::from_str(text)?;

        let rows = match raw.rows {
            None => None,
            Some(raw_rows) => {
                let mut rows = Vec::with_capacity(raw_rows.len());
                for (i, raw_entry) in raw_rows.into_iter().enumerate() {
                    rows.push(decode_entry(i, raw_entry, &raw.schema)?);
                }
                Some(rows)
            }
        };

        Ok(Self {
            heavy_hitters_id: raw.heavy_hitters_id,
            schema: raw.schema,
            row_count: raw.row_count,
            rows,
        })
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path)?;
        let list = Self::from_json_str(&text)?;
        tracing::info!(
            path = %path.display(),
            id = %list.heavy_hitters_id,
            entries = list.rows.as_ref().map_or(0, Vec::len),
            total = list.row_count,
            "loaded ranked list"
        );
        Ok(list)
    }

    pub fn entries(&self) -> Option<&[Entry]> {
        self.rows.as_deref()
    }

    pub fn display_rows(&self) -> Result<Vec<DisplayRow<'_>>, RenderError> {
        render_rows(self.entries(), self.row_count)
    }
}

fn decode_entry(row: usize, raw: RawEntry, schema: &Schema) -> Result<Entry, LoadError> {
    if raw.values.len() != schema.len() {
        return Err(LoadError::Arity {
            row,
            expected: schema.len(),
            found: raw.values.len(),
        });
    }

    let values = raw
        .values
        .iter()
        .zip(schema.iter())
        .map(|(json, col)| {
            Value::from_json(json, col.kind).map_err(|source| LoadError::Value {
                row,
                column: col.name.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Entry::new(values, raw.count))
}
