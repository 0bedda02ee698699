//! Report rendering: rich terminal table, markdown and CSV

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;

/// Display format for stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Markdown,
    Csv,
}

/// Already formatted cells, ready to render
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn new(headers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: impl IntoIterator<Item = impl Into<String>>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }
}

/// Box-drawn table with a title line
pub fn render_table(data: &TableData, title: &str) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(
        data.headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    for row in &data.rows {
        table.add_row(row.iter().map(Cell::new).collect::<Vec<_>>());
    }

    format!("{}\n{}", title, table)
}

/// `## title`, a blank line, header row, `---` separator row, then one
/// pipe-delimited line per row
pub fn render_markdown(data: &TableData, title: &str) -> String {
    let pipe_row = |cells: &[String]| format!("| {} |", cells.join(" | "));

    let mut lines = Vec::with_capacity(data.rows.len() + 3);
    lines.push(format!("## {}\n", title));
    lines.push(pipe_row(data.headers.as_slice()));
    lines.push(pipe_row(vec!["---".to_string(); data.headers.len()].as_slice()));
    lines.extend(data.rows.iter().map(|row| pipe_row(row.as_slice())));

    lines.join("\n")
}

/// Write header and rows as CSV. An empty table still gets its header row.
pub fn write_csv<W: Write>(data: &TableData, writer: W) -> Result<(), AppError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&data.headers)?;
    for row in &data.rows {
        csv_writer.write_record(row)?;
    }
    csv_writer
        .flush()
        .map_err(|e| AppError::OutputError(e.to_string()))?;
    Ok(())
}

pub fn render_csv(data: &TableData) -> Result<String, AppError> {
    let mut buffer = Vec::new();
    write_csv(data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| AppError::OutputError(e.to_string()))
}

pub fn write_csv_file(data: &TableData, path: &Path) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::OutputError(format!("{}: {}", path.display(), e)))?;
    write_csv(data, file)
}

/// Render for stdout in the requested format
pub fn render(data: &TableData, title: &str, format: OutputFormat) -> Result<String, AppError> {
    match format {
        OutputFormat::Table => Ok(render_table(data, title)),
        OutputFormat::Markdown => Ok(render_markdown(data, title)),
        OutputFormat::Csv => render_csv(data),
    }
}
