// src/cells.rs
//! Display cells for heavy-hitter rows, shared by the viewer and the exports.

use crate::data_range::DataRange;
use crate::error::RenderError;
use crate::heavy_hitters::{DisplayRow, RowKind};
use crate::schema::Schema;
use crate::top_list::TopList;
use crate::value::{format_value, significant_digits, ContentsKind};

/// Shown in every value column of the rest row.
pub const WILDCARD: &str = "*";
pub const DEFAULT_MISSING_MARKER: &str = "missing";

/// One display row, formatted except for missing cells and the range bar.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    pub rank: usize,
    /// `None` marks an absent value.
    pub values: Vec<Option<String>>,
    pub count: u64,
    pub percentage: String,
    pub range: DataRange,
    pub aggregate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTable {
    pub headers: Vec<String>,
    /// Kind of each value column, in schema order.
    pub kinds: Vec<ContentsKind>,
    pub rows: Vec<RenderedRow>,
    pub total: u64,
}

pub fn header_row(schema: &Schema) -> Vec<String> {
    let mut headers = Vec::with_capacity(schema.len() + 4);
    headers.push("Rank".to_string());
    headers.extend(schema.names().map(str::to_string));
    headers.push("Count".to_string());
    headers.push("Percentage %".to_string());
    headers.push("Position".to_string());
    headers
}

pub fn render_row(row: &DisplayRow<'_>, schema: &Schema, total: u64) -> RenderedRow {
    let values = match row.kind {
        RowKind::Aggregate => vec![Some(WILDCARD.to_string()); schema.len()],
        RowKind::Entry(entry) => schema
            .iter()
            .enumerate()
            .map(|(j, col)| match entry.values.get(j) {
                Some(v) if !v.is_absent() => Some(format_value(v, col.kind)),
                _ => None,
            })
            .collect(),
    };

    RenderedRow {
        rank: row.rank,
        values,
        count: row.count,
        percentage: significant_digits(row.percentage),
        range: DataRange::new(row.position, row.count, total),
        aggregate: row.is_aggregate(),
    }
}

pub fn render_table(list: &TopList) -> Result<RenderedTable, RenderError> {
    let rows: Vec<RenderedRow> = list
        .display_rows()?
        .iter()
        .map(|r| render_row(r, &list.schema, list.row_count))
        .collect();

    Ok(RenderedTable {
        headers: header_row(&list.schema),
        kinds: list.schema.iter().map(|c| c.kind).collect(),
        rows,
        total: list.row_count,
    })
}

impl RenderedRow {
    /// All cells as text; the range column reads `start..end`.
    pub fn text_cells(&self, missing_marker: &str) -> Vec<String> {
        let mut out = Vec::with_capacity(self.values.len() + 4);
        out.push(self.rank.to_string());
        out.extend(
            self.values
                .iter()
                .map(|v| v.clone().unwrap_or_else(|| missing_marker.to_string())),
        );
        out.push(self.count.to_string());
        out.push(self.percentage.clone());
        out.push(format!(
            "{}..{}",
            self.range.position,
            self.range.position + self.range.count
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heavy_hitters::Entry;
    use crate::schema::ColumnDescription;
    use crate::value::Value;

    fn list(rows: Option<Vec<Entry>>, total: u64) -> TopList {
        TopList {
            heavy_hitters_id: "hh".into(),
            schema: Schema::new(vec![
                ColumnDescription::new("city", ContentsKind::String),
                ColumnDescription::new("score", ContentsKind::Double),
            ]),
            row_count: total,
            rows,
        }
    }

    #[test]
    fn headers_frame_the_schema() {
        let table = render_table(&list(None, 1)).unwrap();
        assert_eq!(
            table.headers,
            vec!["Rank", "city", "score", "Count", "Percentage %", "Position"]
        );
        assert_eq!(table.kinds, vec![ContentsKind::String, ContentsKind::Double]);
    }

    #[test]
    fn rest_row_shows_wildcards() {
        let entries = vec![Entry::new(vec![Value::Text("Oslo".into()), Value::Double(1.5)], 60)];
        let table = render_table(&list(Some(entries), 100)).unwrap();
        assert_eq!(table.rows.len(), 2);

        let rest = &table.rows[1];
        assert!(rest.aggregate);
        assert_eq!(rest.text_cells("missing"), vec!["2", "*", "*", "40", "40", "60..100"]);
    }

    #[test]
    fn absent_values_use_the_marker() {
        let entries = vec![Entry::new(vec![Value::Absent, Value::Double(2.0)], 10)];
        let table = render_table(&list(Some(entries), 10)).unwrap();
        let row = &table.rows[0];
        assert_eq!(row.values, vec![None, Some("2".to_string())]);
        assert_eq!(row.text_cells("NA"), vec!["1", "NA", "2", "10", "100", "0..10"]);
    }

    #[test]
    fn short_value_tuples_read_as_missing() {
        let entries = vec![Entry::new(vec![Value::Text("x".into())], 4)];
        let table = render_table(&list(Some(entries), 4)).unwrap();
        assert_eq!(table.rows[0].values[1], None);
    }

    #[test]
    fn inconsistent_counts_propagate() {
        let entries = vec![Entry::new(vec![Value::Absent, Value::Absent], 11)];
        assert!(render_table(&list(Some(entries), 10)).is_err());
    }
}
