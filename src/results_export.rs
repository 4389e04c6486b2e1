//! CSV, JSON, text and xlsx renditions of a rendered heavy-hitters table.
//! Missing cells:
//!   • CSV writes empty fields
//!   • JSON writes `null`
//!   • text and xlsx show the configured marker

use std::path::Path;

use anyhow::Result;
use unicode_segmentation::UnicodeSegmentation;

use crate::cells::{RenderedRow, RenderedTable};
use crate::value::ContentsKind;

/// RFC-4180 CSV escaping
pub fn escape_csv(field: &str) -> String {
    let needs_quotes = field.contains(',') || field.contains('"')
        || field.contains('\n') || field.contains('\r');
    if needs_quotes {
        let escaped = field.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        field.to_owned()
    }
}

/// Export the **entire** table as CSV (RFC-4180)
pub fn export_csv(table: &RenderedTable) -> String {
    let mut csv_lines = Vec::with_capacity(table.rows.len() + 1);

    /* header */
    csv_lines.push(
        table.headers.iter()
            .map(|h| escape_csv(h))
            .collect::<Vec<_>>()
            .join(","),
    );

    /* rows */
    for row in &table.rows {
        csv_lines.push(
            row.text_cells("")
                .iter()
                .map(|c| escape_csv(c))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    csv_lines.join("\r\n")
}

/// Object keys for every header. A value column whose name is already taken
/// (by a fixed column, the `aggregate` flag or an earlier column) gets a
/// `_2`, `_3`, ... suffix.
pub fn json_keys(headers: &[String]) -> Vec<String> {
    let n_values = headers.len().saturating_sub(4);
    let mut taken: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i == 0 || *i > n_values)
        .map(|(_, h)| h.clone())
        .collect();
    taken.push("aggregate".to_string());

    let mut keys = headers.to_vec();
    for key in keys.iter_mut().take(n_values + 1).skip(1) {
        let mut candidate = key.clone();
        let mut n = 2;
        while taken.contains(&candidate) {
            candidate = format!("{key}_{n}");
            n += 1;
        }
        taken.push(candidate.clone());
        *key = candidate;
    }
    keys
}

/// Array of objects keyed by header; numbers stay numbers.
pub fn rows_to_json(table: &RenderedTable) -> serde_json::Value {
    use serde_json::{json, Map, Value};

    let keys = json_keys(&table.headers);
    let n_values = keys.len().saturating_sub(4);
    let mut result = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let mut obj = Map::new();
        obj.insert(keys[0].clone(), json!(row.rank));
        for (j, key) in keys[1..=n_values].iter().enumerate() {
            let value = row.values.get(j)
                .and_then(|v| v.clone())
                .map(Value::String)
                .unwrap_or(Value::Null);
            obj.insert(key.clone(), value);
        }
        obj.insert(keys[n_values + 1].clone(), json!(row.count));
        obj.insert(keys[n_values + 2].clone(), json!(row.percentage));
        obj.insert(
            keys[n_values + 3].clone(),
            json!({ "start": row.range.position, "count": row.range.count }),
        );
        obj.insert("aggregate".to_string(), json!(row.aggregate));
        result.push(Value::Object(obj));
    }
    json!(result)
}

fn display_width(s: &str) -> usize {
    s.graphemes(true).count()
}

fn pad(out: &mut String, text: &str, width: usize) {
    out.push_str(text);
    for _ in display_width(text)..width {
        out.push(' ');
    }
}

/// Plain aligned table, one line per row.
pub fn format_as_table(table: &RenderedTable, missing: &str) -> String {
    let rows: Vec<Vec<String>> = table.rows.iter().map(|r| r.text_cells(missing)).collect();

    // Calculate column widths
    let mut widths: Vec<usize> = table.headers.iter().map(|h| display_width(h)).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(display_width(cell));
            }
        }
    }

    let mut output = String::new();

    // Header
    for (i, header) in table.headers.iter().enumerate() {
        if i > 0 { output.push_str(" | "); }
        pad(&mut output, header, widths[i]);
    }
    output.push('\n');

    // Separator
    for (i, &width) in widths.iter().enumerate() {
        if i > 0 { output.push_str("-+-"); }
        output.push_str(&"-".repeat(width));
    }
    output.push('\n');

    // Rows
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i > 0 { output.push_str(" | "); }
            pad(&mut output, cell, widths.get(i).copied().unwrap_or(0));
        }
        output.push('\n');
    }

    output
}

/// Numeric value for a spreadsheet cell; only integer and double columns
/// qualify, everything else stays text.
fn numeric_cell(kind: Option<ContentsKind>, text: &str) -> Option<f64> {
    match kind {
        Some(ContentsKind::Integer | ContentsKind::Double) => {
            text.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

pub fn write_xlsx(path: &Path, table: &RenderedTable, missing: &str) -> Result<()> {
    use rust_xlsxwriter::{Format, Workbook};

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let bold_format = Format::new().set_bold();
    let missing_format = Format::new().set_italic();

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, header, &bold_format)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let r = row_idx as u32 + 1;
        worksheet.write(r, 0, row.rank as u32)?;
        for (j, value) in row.values.iter().enumerate() {
            let c = j as u16 + 1;
            match value {
                None => {
                    worksheet.write_with_format(r, c, missing, &missing_format)?;
                }
                Some(text) if row.aggregate => {
                    worksheet.write(r, c, text)?;
                }
                Some(text) => match numeric_cell(table.kinds.get(j).copied(), text) {
                    Some(num) => {
                        worksheet.write(r, c, num)?;
                    }
                    None => {
                        worksheet.write(r, c, text)?;
                    }
                },
            }
        }
        let c = row.values.len() as u16 + 1;
        worksheet.write(r, c, row.count as f64)?;
        worksheet.write(r, c + 1, row.range.fraction_width() * 100.0)?;
        worksheet.write(r, c + 2, row.range.position as f64)?;
    }

    for col in 0..table.headers.len() {
        worksheet.set_column_width(col as u16, 15.0)?;
    }

    workbook.save(path)?;
    Ok(())
}
