// src/config.rs
//! `config.toml` next to the executable (or `$TALLY_CONFIG`).
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::batch_mode::OutputFormat;
use crate::cells::DEFAULT_MISSING_MARKER;

pub const CONFIG_ENV: &str = "TALLY_CONFIG";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub export: ExportConfig,
    pub colors: ColorConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub missing_marker: String,
    /// Width of the position bar, in cells.
    pub range_width: usize,
    /// Rows drawn per page in the viewer.
    pub max_rows: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            missing_marker: DEFAULT_MISSING_MARKER.to_string(),
            range_width: 20,
            max_rows: 25,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub format: OutputFormat,
}

/// RGB triples for every styled element of the viewer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ColorConfig {
    pub default_bg: [u8; 3],
    pub plain: [u8; 3],
    pub header_row: [u8; 3],
    pub results_border: [u8; 3],
    pub aggregate_row: [u8; 3],
    pub missing_cell: [u8; 3],
    pub range_bar: [u8; 3],
    pub table_caret_fg: [u8; 3],
    pub table_caret_bg: [u8; 3],
    pub status_fg: [u8; 3],
    pub error_fg: [u8; 3],
}

impl Default for ColorConfig {
    fn default() -> Self {
        // Kanagawa tones
        Self {
            default_bg: [30, 31, 40],
            plain: [200, 200, 200],
            header_row: [126, 156, 216],
            results_border: [84, 84, 109],
            aggregate_row: [230, 195, 132],
            missing_cell: [114, 113, 105],
            range_bar: [122, 168, 159],
            table_caret_fg: [22, 22, 22],
            table_caret_bg: [149, 127, 184],
            status_fg: [152, 187, 108],
            error_fg: [232, 36, 36],
        }
    }
}

impl Config {
    /// Directory holding the executable; config, log and queue files live here.
    pub fn data_dir() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
            .and_then(|p| std::fs::canonicalize(p).ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn path() -> PathBuf {
        match std::env::var_os(CONFIG_ENV) {
            Some(p) => PathBuf::from(p),
            None => Self::data_dir().join(CONFIG_FILE),
        }
    }

    /// Missing file → defaults; malformed file → error.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = Config::from_toml_str(
            r#"
[display]
missing_marker = "∅"

[export]
format = "json"

[colors]
aggregate_row = [1, 2, 3]
"#,
        )
        .unwrap();
        assert_eq!(cfg.display.missing_marker, "∅");
        assert_eq!(cfg.display.range_width, 20);
        assert_eq!(cfg.export.format, OutputFormat::Json);
        assert_eq!(cfg.colors.aggregate_row, [1, 2, 3]);
        assert_eq!(cfg.colors.plain, ColorConfig::default().plain);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(Config::from_toml_str("[display\nrange_width = ").is_err());
        assert!(Config::from_toml_str("[display]\nrange_width = \"wide\"").is_err());
    }
}
