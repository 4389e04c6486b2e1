use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cells::{render_table, RenderedTable};
use crate::results_export::{export_csv, format_as_table, rows_to_json, write_xlsx};
use crate::top_list::TopList;

pub struct BatchConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub output_format: OutputFormat,
    pub missing_marker: String,
    pub verbose: bool,
}

#[derive(Serialize, Deserialize, clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    #[value(alias = "text")]
    #[serde(alias = "text")]
    Txt,
    #[value(alias = "excel")]
    Xlsx,
}

impl OutputFormat {
    pub fn extension(&self) -> &str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Txt => "txt",
            OutputFormat::Xlsx => "xlsx",
        }
    }
}

/// Downloads, else home, else the working directory.
pub fn default_output_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| {
            dirs.download_dir()
                .unwrap_or_else(|| dirs.home_dir())
                .to_path_buf()
        })
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `heavy_hitters_<id>.<ext>`, with path-hostile characters replaced.
pub fn output_file_name(heavy_hitters_id: &str, format: OutputFormat) -> String {
    let id: String = heavy_hitters_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("heavy_hitters_{}.{}", id, format.extension())
}

/// Load one ranked list, render it and write it out. Returns the written path.
pub fn run_batch_mode(config: BatchConfig) -> Result<PathBuf> {
    let start_time = Instant::now();
    tracing::info!(
        input = %config.input.display(),
        output_dir = %config.output_dir.display(),
        format = config.output_format.extension(),
        "batch export"
    );

    let list = TopList::load(&config.input)
        .with_context(|| format!("loading {}", config.input.display()))?;
    let table = render_table(&list).with_context(|| {
        format!("heavy hitters {} cannot be rendered", list.heavy_hitters_id)
    })?;

    fs::create_dir_all(&config.output_dir)?;
    let output_path = config
        .output_dir
        .join(output_file_name(&list.heavy_hitters_id, config.output_format));
    save_table(&output_path, &table, config.output_format, &config.missing_marker)?;

    tracing::info!(
        rows = table.rows.len(),
        path = %output_path.display(),
        elapsed = ?start_time.elapsed(),
        "saved heavy hitters"
    );
    if config.verbose {
        println!("Saved {} rows to {}", table.rows.len(), output_path.display());
    }
    Ok(output_path)
}

pub fn save_table(
    output_path: &Path,
    table: &RenderedTable,
    format: OutputFormat,
    missing_marker: &str,
) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            fs::write(output_path, export_csv(table))?;
        }
        OutputFormat::Json => {
            fs::write(output_path, serde_json::to_string_pretty(&rows_to_json(table))?)?;
        }
        OutputFormat::Txt => {
            fs::write(output_path, format_as_table(table, missing_marker))?;
        }
        OutputFormat::Xlsx => {
            write_xlsx(output_path, table, missing_marker)?;
        }
    }
    Ok(())
}
