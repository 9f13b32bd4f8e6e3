//! Rendering of a [`ResultTable`](crate::table::ResultTable): plain console,
//! aligned table, or CSV file under `results/`.

use crate::cli::{Mode, OutputMode};
use crate::paths::{self, PathError};
use crate::table::ResultTable;
use chrono::Local;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Timestamp embedded in CSV filenames: `<mode>_<timestamp>.csv`
const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

#[derive(Error, Debug)]
pub enum OutputError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Render `table` according to the selected output mode.
pub fn render(table: &ResultTable, mode: Mode, output: Option<OutputMode>) -> Result<(), OutputError> {
    match output {
        None => print!("{}", plain_string(table)),
        Some(OutputMode::Pretty) => print!("{}", pretty_string(table)),
        Some(OutputMode::File) => {
            let dir = paths::results_dir();
            paths::ensure_dir(&dir)?;
            let path = write_csv(table, &dir, mode)?;
            info!(path = %path.display(), "results written");
        }
    }
    Ok(())
}

/// Rows space-joined, one per line, header included.
fn plain_string(table: &ResultTable) -> String {
    let mut out = String::new();
    for row in table.all_rows() {
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}

/// Left-aligned column table with `+---+` rules around the header and after
/// the last row.
fn pretty_string(table: &ResultTable) -> String {
    let mut widths = vec![0usize; table.column_count()];
    for row in table.all_rows() {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let rule: String = {
        let mut s = String::from("+");
        for w in &widths {
            s.push_str(&"-".repeat(w + 2));
            s.push('+');
        }
        s.push('\n');
        s
    };

    let format_row = |row: &[String]| {
        let mut s = String::from("|");
        for (cell, w) in row.iter().zip(&widths) {
            let pad = w - cell.chars().count();
            s.push(' ');
            s.push_str(cell);
            s.push_str(&" ".repeat(pad + 1));
            s.push('|');
        }
        s.push('\n');
        s
    };

    let mut out = rule.clone();
    out.push_str(&format_row(table.header()));
    out.push_str(&rule);
    for row in table.rows() {
        out.push_str(&format_row(row));
    }
    out.push_str(&rule);
    out
}

/// Write `table` as `<mode>_<timestamp>.csv` in `dir` and return the path.
///
/// UTF-8, LF line endings, minimal quoting.
pub fn write_csv(table: &ResultTable, dir: &Path, mode: Mode) -> Result<PathBuf, OutputError> {
    let timestamp = Local::now().format(FILE_TIMESTAMP_FORMAT);
    let path = dir.join(format!("{}_{}.csv", mode, timestamp));
    std::fs::write(&path, csv_string(table)).map_err(|source| OutputError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn csv_string(table: &ResultTable) -> String {
    let mut out = String::new();
    for row in table.all_rows() {
        let cells: Vec<String> = row.iter().map(|c| csv_field(c)).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

/// Quote a field only when it contains a comma, quote, or line break;
/// embedded quotes are doubled.
fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
