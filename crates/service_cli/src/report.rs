//! Tabular output in table, JSON and CSV form.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use pricer_pricing::mc::{PricingResult, ScenarioTable};
use serde::Serialize;

use crate::Result;

/// Output format of every command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Box-drawn table.
    #[default]
    Table,
    /// Pretty-printed JSON document.
    Json,
    /// Header row followed by data rows.
    Csv,
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    /// Rendered empty, or `null` in JSON.
    Missing,
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::Missing, Cell::Number)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", value)
            }
            Cell::Number(value) => {
                let text = format!("{:.6}", value);
                f.write_str(text.trim_end_matches('0').trim_end_matches('.'))
            }
            Cell::Missing => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Parameter {
    name: String,
    value: String,
}

/// A titled table with run parameters and a generation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    title: String,
    generated_at: DateTime<Utc>,
    parameters: Vec<Parameter>,
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Report {
    /// Empty report with the given column headers.
    pub fn new<S: Into<String>>(title: impl Into<String>, columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            title: title.into(),
            generated_at: Utc::now(),
            parameters: Vec::new(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Records a run parameter shown above the table.
    pub fn parameter(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            value: value.to_string(),
        });
        self
    }

    /// Appends a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        let mut row = row;
        row.resize(self.columns.len(), Cell::Missing);
        self.rows.push(row);
    }

    /// Writes the report in `format`.
    pub fn render<W: Write>(&self, format: OutputFormat, writer: &mut W) -> Result<()> {
        match format {
            OutputFormat::Table => self.render_table(writer),
            OutputFormat::Json => self.render_json(writer),
            OutputFormat::Csv => self.render_csv(writer),
        }
    }

    /// Writes the CSV form to `path`.
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path)?;
        self.render_csv(&mut file)
    }

    fn render_table<W: Write>(&self, writer: &mut W) -> Result<()> {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, header)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let rule = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{}{}{}", left, segments.join(mid), right)
        };
        let line = |values: &[String]| {
            let padded: Vec<String> = values
                .iter()
                .zip(&widths)
                .map(|(value, width)| format!(" {:<width$} ", value, width = width))
                .collect();
            format!("│{}│", padded.join("│"))
        };

        writeln!(writer, "{}", self.title)?;
        writeln!(writer, "Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        for parameter in &self.parameters {
            writeln!(writer, "  {}: {}", parameter.name, parameter.value)?;
        }
        writeln!(writer)?;
        writeln!(writer, "{}", rule("┌", "┬", "┐"))?;
        writeln!(writer, "{}", line(&self.columns))?;
        writeln!(writer, "{}", rule("├", "┼", "┤"))?;
        for row in &cells {
            writeln!(writer, "{}", line(row))?;
        }
        writeln!(writer, "{}", rule("└", "┴", "┘"))?;
        Ok(())
    }

    fn render_json<W: Write>(&self, writer: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        Ok(())
    }

    fn render_csv<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(&self.columns)?;
        for row in &self.rows {
            csv.write_record(row.iter().map(ToString::to_string))?;
        }
        csv.flush()?;
        Ok(())
    }
}

/// Writes several reports to stdout: one JSON array, or the tables and CSV
/// blocks separated by blank lines.
pub fn print_all(reports: &[Report], format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    match (format, reports) {
        (_, [single]) => single.render(format, &mut handle)?,
        (OutputFormat::Json, _) => {
            serde_json::to_writer_pretty(&mut handle, reports)?;
            writeln!(handle)?;
        }
        _ => {
            for (i, report) in reports.iter().enumerate() {
                if i > 0 {
                    writeln!(handle)?;
                }
                report.render(format, &mut handle)?;
            }
        }
    }
    handle.flush()?;
    Ok(())
}

/// Table of a barrier sweep: a `spot` column then one column per
/// tenor, failed cells empty.
pub fn scenario_report<F>(title: &str, table: &ScenarioTable<PricingResult>, value: F) -> Report
where
    F: Fn(&PricingResult) -> f64,
{
    let columns = std::iter::once("spot".to_string())
        .chain(table.tenors().iter().map(|tenor| tenor.to_string()));
    let mut report = Report::new(title, columns);
    for (label, cells) in table.rows() {
        let row = std::iter::once(Cell::from(label))
            .chain(cells.iter().map(|cell| match cell {
                Ok(result) => Cell::Number(value(result)),
                Err(_) => Cell::Missing,
            }))
            .collect();
        report.push_row(row);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Report {
        let mut report = Report::new("Sample", ["name", "value", "error"]).parameter("paths", 1000);
        report.push_row(vec!["premium".into(), Cell::Number(1.5), Cell::from(Some(0.25_f64))]);
        report.push_row(vec!["hit rate".into(), Cell::Number(0.0823), Cell::Missing]);
        report
    }

    fn render(report: &Report, format: OutputFormat) -> String {
        let mut buffer = Vec::new();
        report.render(format, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Number(3.0).to_string(), "3");
        assert_eq!(Cell::Number(1.970557698).to_string(), "1.970558");
        assert_eq!(Cell::Missing.to_string(), "");
        assert_eq!(Cell::from("up").to_string(), "up");
    }

    #[test]
    fn test_table_layout() {
        let text = render(&sample(), OutputFormat::Table);
        assert!(text.starts_with("Sample\n"));
        assert!(text.contains("  paths: 1000"));
        assert!(text.contains("│ premium  │ 1.5"));
        let widths: Vec<usize> = text
            .lines()
            .filter(|l| l.starts_with('│') || l.starts_with('┌'))
            .map(|l| l.chars().count())
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_json_missing_is_null() {
        let value: serde_json::Value = serde_json::from_str(&render(&sample(), OutputFormat::Json)).unwrap();
        assert_eq!(value["title"], "Sample");
        assert_eq!(value["columns"][1], "value");
        assert_eq!(value["rows"][0][1], 1.5);
        assert!(value["rows"][1][2].is_null());
        assert_eq!(value["parameters"][0]["name"], "paths");
    }

    #[test]
    fn test_csv_rows() {
        let text = render(&sample(), OutputFormat::Csv);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "name,value,error");
        assert_eq!(lines[1], "premium,1.5,0.25");
        assert_eq!(lines[2], "hit rate,0.0823,");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut report = Report::new("Pad", ["a", "b"]);
        report.push_row(vec![Cell::from(1.0_f64)]);
        assert_eq!(report.rows[0], vec![Cell::Number(1.0), Cell::Missing]);
    }
}
