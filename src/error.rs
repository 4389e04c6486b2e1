//! Typed errors for rendering and decoding ranked lists.

use crate::value::ContentsKind;

/// Errors raised while turning a ranked list into display rows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The ranking engine listed more occurrences than the table holds.
    #[error("ranked entries account for {listed} rows but the table only has {total}")]
    InconsistentCounts { listed: u128, total: u64 },
}

/// A single cell that does not match its column's kind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    #[error("expected a {kind:?} value, found {found}")]
    KindMismatch { kind: ContentsKind, found: String },
}

/// Errors raised while decoding a ranking-engine result.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not read ranked list: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed ranked list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("row {row} has {found} values but the schema has {expected} columns")]
    Arity {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}, column {column}: {source}")]
    Value {
        row: usize,
        column: String,
        #[source]
        source: ValueError,
    },
}
