use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use crate::observation::Observation;
use crate::rollingwindow::Aggregates;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// aligned text table with a header line
    Table,
    /// one JSON object per line
    Json,
}

/// One output line: the accepted observation plus the window state after it.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Row {
    pub timestamp: f64,
    pub cost: f64,
    pub count: usize,
    pub sum: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Row {
    pub fn new(obs: Observation, aggregates: Aggregates) -> Self {
        Row {
            timestamp: obs.timestamp,
            cost: obs.value,
            count: aggregates.count,
            sum: aggregates.sum,
            min: aggregates.min,
            max: aggregates.max,
        }
    }
}

pub struct Report<W: Write> {
    out: W,
    format: OutputFormat,
    header_written: bool,
}

impl<W: Write> Report<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Report {
            out,
            format,
            header_written: false,
        }
    }

    pub fn write_row(&mut self, row: &Row) -> io::Result<()> {
        match self.format {
            OutputFormat::Table => {
                self.write_header()?;
                writeln!(
                    self.out,
                    "{:>14} {:>14} {:>8} {:>16} {:>14} {:>14}",
                    row.timestamp,
                    row.cost,
                    row.count,
                    row.sum,
                    fmt_opt(row.min),
                    fmt_opt(row.max)
                )
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, row)?;
                writeln!(self.out)
            }
        }
    }

    // header goes out once, before the first row or at finish
    fn write_header(&mut self) -> io::Result<()> {
        if self.header_written {
            return Ok(());
        }
        self.header_written = true;
        writeln!(
            self.out,
            "{:>14} {:>14} {:>8} {:>16} {:>14} {:>14}",
            "timestamp", "cost", "count", "sum", "min", "max"
        )
    }

    pub fn finish(&mut self) -> io::Result<()> {
        if self.format == OutputFormat::Table {
            self.write_header()?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        Row::new(
            Observation::new(5.0, 2.5),
            Aggregates { count: 2, sum: 3.5, min: Some(1.0), max: Some(2.5) },
        )
    }

    #[test]
    fn test_table_header_written_once() {
        let mut report = Report::new(Vec::new(), OutputFormat::Table);
        report.write_row(&row()).unwrap();
        report.write_row(&row()).unwrap();
        report.finish().unwrap();

        let text = String::from_utf8(report.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0].split_whitespace().collect::<Vec<_>>(),
            vec!["timestamp", "cost", "count", "sum", "min", "max"]
        );
        assert_eq!(
            lines[1].split_whitespace().collect::<Vec<_>>(),
            vec!["5", "2.5", "2", "3.5", "1", "2.5"]
        );
    }

    #[test]
    fn test_table_header_on_empty_input() {
        let mut report = Report::new(Vec::new(), OutputFormat::Table);
        report.finish().unwrap();
        let text = String::from_utf8(report.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_json_lines() {
        let mut report = Report::new(Vec::new(), OutputFormat::Json);
        report.write_row(&row()).unwrap();
        report.finish().unwrap();

        let text = String::from_utf8(report.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["timestamp"], 5.0);
        assert_eq!(value["count"], 2);
        assert_eq!(value["min"], 1.0);
        assert_eq!(value["max"], 2.5);
    }
}
