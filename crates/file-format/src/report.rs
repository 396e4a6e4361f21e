//! Reader for the solver's report-file time series.
//!
//! A report file starts with quoted header lines, the last of which names the
//! columns, followed by whitespace-separated numeric rows:
//!
//! ```text
//! "drag-force1-rfile"
//! "Iteration" "drag-force1"
//! ("Iteration" "drag-force1")
//! 1 0.4123
//! 2 0.3981
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub iteration: u64,
    pub value: f64,
}

/// One monitored quantity over the iterations of a run.
///
/// Only [`DragHistory::parse`] builds one, so a history always holds at least
/// one sample. It serializes for reporting but does not deserialize:
///
/// ```compile_fail
/// let history: splitflow_format::DragHistory =
///     serde_json::from_str(r#"{"column": "drag-force1", "samples": []}"#).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragHistory {
    column: String,
    samples: Vec<Sample>,
}

fn quoted_names(line: &str) -> Vec<&str> {
    line.split('"').skip(1).step_by(2).collect()
}

impl DragHistory {
    /// Parse report text, keeping the column named `report_name`.
    ///
    /// When no header names that column, the first value column is used.
    pub fn parse(text: &str, report_name: &str) -> Result<Self, ReportError> {
        let mut names: Vec<&str> = Vec::new();
        let mut samples = Vec::new();
        let mut column = 1;

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.contains('"') {
                let header = quoted_names(line);
                if header.len() >= 2 {
                    names = header;
                    column = names.iter().position(|n| *n == report_name).unwrap_or(1);
                }
                continue;
            }

            let malformed = || ReportError::Malformed { line: index + 1 };
            let fields: Vec<&str> = line.split_whitespace().collect();
            let iteration = fields
                .first()
                .and_then(|f| f.parse::<u64>().ok())
                .ok_or_else(malformed)?;
            let value = fields
                .get(column)
                .and_then(|f| f.parse::<f64>().ok())
                .ok_or_else(malformed)?;
            samples.push(Sample { iteration, value });
        }

        if samples.is_empty() {
            return Err(ReportError::Empty);
        }
        let column = names
            .get(column)
            .map_or_else(|| report_name.to_string(), |n| n.to_string());
        debug!(column, samples = samples.len(), "parsed report");
        Ok(Self { column, samples })
    }

    #[instrument]
    pub fn load(path: &Path, report_name: &str) -> Result<Self, ReportError> {
        let text = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, report_name)
    }

    /// Name of the column the samples were taken from.
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The final sample. Parsing guarantees at least one.
    pub fn last(&self) -> Sample {
        self.samples[self.samples.len() - 1]
    }

    /// Mean over the last `n` samples (all of them when fewer exist).
    pub fn mean_of_last(&self, n: usize) -> f64 {
        let n = n.clamp(1, self.samples.len());
        let tail = &self.samples[self.samples.len() - n..];
        tail.iter().map(|s| s.value).sum::<f64>() / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const REPORT: &str = "\"drag-force1-rfile\"\n\
                          \"Iteration\" \"lift\" \"drag-force1\"\n\
                          (\"Iteration\" \"lift\" \"drag-force1\")\n\
                          1 0.1 0.50\n\
                          2 0.2 0.40\n\
                          3 0.3 0.30\n";

    #[test]
    fn test_named_column_is_selected() {
        let history = DragHistory::parse(REPORT, "drag-force1").unwrap();
        assert_eq!(history.column(), "drag-force1");
        assert_eq!(history.samples().len(), 3);
        assert_eq!(history.last(), Sample { iteration: 3, value: 0.30 });
    }

    #[test]
    fn test_unknown_name_falls_back_to_first_value_column() {
        let history = DragHistory::parse(REPORT, "missing").unwrap();
        assert_eq!(history.column(), "lift");
        assert_relative_eq!(history.last().value, 0.3);
    }

    #[test]
    fn test_headerless_rows() {
        let history = DragHistory::parse("1 2.0\n2 4.0\n", "drag-force1").unwrap();
        assert_eq!(history.column(), "drag-force1");
        assert_relative_eq!(history.mean_of_last(2), 3.0);
    }

    #[test]
    fn test_mean_of_last() {
        let history = DragHistory::parse(REPORT, "drag-force1").unwrap();
        assert_relative_eq!(history.mean_of_last(2), 0.35, epsilon = 1e-12);
        assert_relative_eq!(history.mean_of_last(100), 0.4, epsilon = 1e-12);
        assert_relative_eq!(history.mean_of_last(0), 0.3);
    }

    #[test]
    fn test_serializes_column_and_samples() {
        let history = DragHistory::parse(REPORT, "drag-force1").unwrap();
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json["column"], "drag-force1");
        assert_eq!(json["samples"].as_array().unwrap().len(), 3);
        assert_eq!(json["samples"][2]["iteration"], 3);
    }

    #[test]
    fn test_malformed_row() {
        let text = "\"Iteration\" \"drag-force1\"\n1 0.5\n2 abc\n";
        assert!(matches!(
            DragHistory::parse(text, "drag-force1"),
            Err(ReportError::Malformed { line: 3 })
        ));
    }

    #[test]
    fn test_header_only_is_empty() {
        let text = "\"drag-force1-rfile\"\n\"Iteration\" \"drag-force1\"\n";
        assert!(matches!(
            DragHistory::parse(text, "drag-force1"),
            Err(ReportError::Empty)
        ));
    }
}
