
// src/lib.rs
// Heavy-hitters rendering shared by the viewer, the exporter and the tests
pub mod batch_mode;
pub mod cells;
pub mod config;
pub mod data_range;
pub mod error;
pub mod follow_up;
pub mod heavy_hitters;
pub mod logging;
pub mod palette;
pub mod results;
pub mod results_export;
pub mod schema;
pub mod top_list;
pub mod value;

pub use cells::{render_table, RenderedRow, RenderedTable};
pub use error::{LoadError, RenderError, ValueError};
pub use heavy_hitters::{render_rows, AggregateRow, DisplayRow, Entry, RowKind};
pub use schema::{ColumnDescription, Schema};
pub use top_list::TopList;
pub use value::{format_value, significant_digits, ContentsKind, Value};
