// src/heavy_hitters.rs
//! Merge a descending-count list of heavy hitters with the synthetic "rest"
//! row and compute rank, position and share for every displayed row.

use crate::error::RenderError;
use crate::value::Value;

/// A ranked value combination and how often it occurs.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub values: Vec<Value>,
    pub count: u64,
}

impl Entry {
    pub fn new(values: Vec<Value>, count: u64) -> Self {
        Self { values, count }
    }
}

/// What a display row stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowKind<'a> {
    Entry(&'a Entry),
    /// Every row of the table not covered by a listed entry.
    Aggregate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRow<'a> {
    pub kind: RowKind<'a>,
    /// 1-based, the aggregate takes a rank slot of its own.
    pub rank: usize,
    pub count: u64,
    /// Sum of the counts of every row shown before this one.
    pub position: u64,
    pub percentage: f64,
}

impl DisplayRow<'_> {
    pub fn is_aggregate(&self) -> bool {
        matches!(self.kind, RowKind::Aggregate)
    }
}

/// The synthetic rest row: its count and the output slot it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateRow {
    pub count: u64,
    pub insertion_index: usize,
}

/// Rows not covered by `entries`; an absent list leaves the whole table.
pub fn aggregate_count(entries: Option<&[Entry]>, total: u64) -> Result<u64, RenderError> {
    let Some(entries) = entries else { return Ok(total) };

    let listed: u128 = entries.iter().map(|e| u128::from(e.count)).sum();
    if listed > u128::from(total) {
        return Err(RenderError::InconsistentCounts { listed, total });
    }
    Ok(total - listed as u64)
}

/// Slot of the rest row: before the first entry whose count does not exceed
/// its own, or after the last entry.
pub fn insertion_index(entries: Option<&[Entry]>, rest: u64) -> usize {
    let Some(entries) = entries else { return 0 };
    entries
        .iter()
        .position(|e| rest >= e.count)
        .unwrap_or(entries.len())
}

/// The rest row, or `None` when the listed entries cover the whole table.
pub fn aggregate_row(entries: Option<&[Entry]>, total: u64) -> Result<Option<AggregateRow>, RenderError> {
    let count = aggregate_count(entries, total)?;
    if count == 0 {
        return Ok(None);
    }
    Ok(Some(AggregateRow {
        count,
        insertion_index: insertion_index(entries, count),
    }))
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f64 / total as f64
    }
}

/// Produce the display rows for a ranked list against the table's total row
/// count. Entries are assumed sorted by descending count.
pub fn render_rows<'a>(
    entries: Option<&'a [Entry]>,
    total: u64,
) -> Result<Vec<DisplayRow<'a>>, RenderError> {
    let rest = aggregate_row(entries, total).inspect_err(|e| {
        tracing::warn!(total, error = %e, "ranked list disagrees with table size");
    })?;
    let listed = entries.unwrap_or_default();

    let mut rows = Vec::with_capacity(listed.len() + 1);
    let mut rank = 0usize;
    let mut position = 0u64;
    let mut emit = |kind: RowKind<'a>, count: u64| {
        rank += 1;
        rows.push(DisplayRow {
            kind,
            rank,
            count,
            position,
            percentage: percentage(count, total),
        });
        position += count;
    };

    for (i, entry) in listed.iter().enumerate() {
        if let Some(agg) = rest.filter(|a| a.insertion_index == i) {
            emit(RowKind::Aggregate, agg.count);
        }
        emit(RowKind::Entry(entry), entry.count);
    }
    if let Some(agg) = rest.filter(|a| a.insertion_index >= listed.len()) {
        emit(RowKind::Aggregate, agg.count);
    }

    tracing::debug!(rows = rows.len(), total, "rendered heavy hitters");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tag: &str, count: u64) -> Entry {
        Entry::new(vec![Value::Text(tag.to_string())], count)
    }

    fn layout(rows: &[DisplayRow<'_>]) -> Vec<(String, u64, u64)> {
        rows.iter()
            .map(|r| {
                let label = match r.kind {
                    RowKind::Aggregate => "*".to_string(),
                    RowKind::Entry(e) => match &e.values[0] {
                        Value::Text(s) => s.clone(),
                        other => format!("{other:?}"),
                    },
                };
                (label, r.count, r.position)
            })
            .collect()
    }

    #[test]
    fn rest_sorts_last_when_smallest() {
        let list = vec![entry("v1", 50), entry("v2", 30)];
        let rows = render_rows(Some(&list[..]), 100).unwrap();
        assert_eq!(
            layout(&rows),
            vec![
                ("v1".into(), 50, 0),
                ("v2".into(), 30, 50),
                ("*".into(), 20, 80),
            ]
        );
        assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn rest_sorts_first_when_largest() {
        let list = vec![entry("v1", 10), entry("v2", 5)];
        let rows = render_rows(Some(&list[..]), 100).unwrap();
        assert_eq!(
            layout(&rows),
            vec![
                ("*".into(), 85, 0),
                ("v1".into(), 10, 85),
                ("v2".into(), 5, 95),
            ]
        );
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].percentage, 85.0);
    }

    #[test]
    fn rest_lands_between_entries() {
        let list = vec![entry("v1", 60), entry("v2", 10), entry("v3", 5)];
        let rows = render_rows(Some(&list[..]), 100).unwrap();
        let labels: Vec<_> = layout(&rows).into_iter().map(|(l, _, _)| l).collect();
        assert_eq!(labels, vec!["v1", "*", "v2", "v3"]);
        assert_eq!(rows[1].position, 60);
        assert_eq!(rows[2].position, 85);
    }

    #[test]
    fn full_coverage_has_no_rest_row() {
        let list = vec![entry("v1", 40)];
        let rows = render_rows(Some(&list[..]), 40).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].is_aggregate());
        assert_eq!(rows[0].percentage, 100.0);
    }

    #[test]
    fn absent_list_is_a_single_rest_row() {
        let rows = render_rows(None, 200).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_aggregate());
        assert_eq!((rows[0].rank, rows[0].count, rows[0].position), (1, 200, 0));
    }

    #[test]
    fn empty_list_is_a_single_rest_row() {
        let rows = render_rows(Some(&[][..]), 7).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_aggregate());
        assert_eq!(rows[0].count, 7);
    }

    #[test]
    fn rest_precedes_entries_it_ties_with() {
        let list = vec![entry("v1", 30)];
        let rows = render_rows(Some(&list[..]), 60).unwrap();
        assert_eq!(
            layout(&rows),
            vec![("*".into(), 30, 0), ("v1".into(), 30, 30)]
        );
    }

    #[test]
    fn zero_total_yields_zero_percentages() {
        let rows = render_rows(Some(&[][..]), 0).unwrap();
        assert!(rows.is_empty());

        let list = vec![entry("v1", 0)];
        let rows = render_rows(Some(&list[..]), 0).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].percentage, 0.0);
    }

    #[test]
    fn overcounted_list_is_an_error() {
        let list = vec![entry("v1", 70), entry("v2", 40)];
        let err = render_rows(Some(&list[..]), 100).unwrap_err();
        assert_eq!(err, RenderError::InconsistentCounts { listed: 110, total: 100 });
    }

    #[test]
    fn aggregate_row_reports_its_slot() {
        let list = vec![entry("v1", 50), entry("v2", 30)];
        assert_eq!(
            aggregate_row(Some(&list[..]), 100).unwrap(),
            Some(AggregateRow { count: 20, insertion_index: 2 })
        );
        assert_eq!(aggregate_row(Some(&list[..]), 80).unwrap(), None);
        assert_eq!(
            aggregate_row(None, 5).unwrap(),
            Some(AggregateRow { count: 5, insertion_index: 0 })
        );
    }

    #[test]
    fn rendering_is_repeatable() {
        let list = vec![entry("v1", 9), entry("v2", 4), entry("v3", 4)];
        let first = render_rows(Some(&list[..]), 30).unwrap();
        let second = render_rows(Some(&list[..]), 30).unwrap();
        assert_eq!(first, second);
    }
}
