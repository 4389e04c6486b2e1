// src/schema.rs
use serde::{Deserialize, Serialize};

use crate::value::ContentsKind;

/// One column of the ranked value-tuples.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ColumnDescription {
    pub name: String,
    pub kind: ContentsKind,
}

/// Ordered column descriptors, one per value in every entry.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Schema {
    pub columns: Vec<ColumnDescription>,
}

impl ColumnDescription {
    pub fn new(name: impl Into<String>, kind: ContentsKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl Schema {
    pub fn new(columns: Vec<ColumnDescription>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDescription> {
        self.columns.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}
