// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Statistics report.
//!
//! Collects `name;value` rows grouped by category and writes them to
//! `<folder>/benchmark_report.csv`.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::error::{BenchmarkError, Result};

/// File name of the dumped report.
pub const REPORT_FILE_NAME: &str = "benchmark_report.csv";

/// Column separator used in the report.
const SEPARATOR: char = ';';

/// Report section. Sections are written in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    /// Options the run was started with.
    CommandLineParameters,
    /// Measurements, or the error that ended the run.
    ExecutionResults,
}

impl Category {
    /// Section heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::CommandLineParameters => "Command line parameters",
            Self::ExecutionResults => "Execution results",
        }
    }
}

/// Flat key/value statistics report.
#[derive(Debug, Clone)]
pub struct StatisticsReport {
    folder: PathBuf,
    parameters: BTreeMap<Category, Vec<(String, String)>>,
}

impl StatisticsReport {
    /// Create an empty report that will be written into `folder`.
    #[must_use]
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Append rows to a category.
    pub fn add_parameters<I, K, V>(&mut self, category: Category, rows: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.parameters
            .entry(category)
            .or_default()
            .extend(rows.into_iter().map(|(k, v)| (k.into(), v.to_string())));
    }

    /// Path the report is written to.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.folder.join(REPORT_FILE_NAME)
    }

    /// Render the report as text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (category, rows) in &self.parameters {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(category.title());
            out.push('\n');
            for (name, value) in rows {
                out.push_str(&sanitize(name));
                out.push(SEPARATOR);
                out.push_str(&sanitize(value));
                out.push('\n');
            }
        }
        out
    }

    /// Write the report, creating the folder if needed.
    ///
    /// # Errors
    ///
    /// Returns [`BenchmarkError::Report`] if the folder or file cannot be written.
    pub fn dump(&self) -> Result<PathBuf> {
        let path = self.path();
        if !self.folder.as_os_str().is_empty() {
            fs::create_dir_all(&self.folder).map_err(BenchmarkError::Report)?;
        }
        fs::write(&path, self.render()).map_err(BenchmarkError::Report)?;
        Ok(path)
    }
}

/// Keep one row per line and one separator per row.
fn sanitize(field: &str) -> String {
    field
        .chars()
        .map(|c| if c == SEPARATOR || c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_orders_categories() {
        let mut report = StatisticsReport::new(".");
        report.add_parameters(Category::ExecutionResults, [("error", "boom")]);
        report.add_parameters(Category::CommandLineParameters, [("API", "sync"), ("target device", "CPU")]);

        assert_eq!(
            report.render(),
            "Command line parameters\nAPI;sync\ntarget device;CPU\n\nExecution results\nerror;boom\n"
        );
    }

    #[test]
    fn test_render_sanitizes_fields() {
        let mut report = StatisticsReport::new(".");
        report.add_parameters(Category::ExecutionResults, [("error", "bad;value\nsecond line")]);
        assert_eq!(report.render(), "Execution results\nerror;bad value second line\n");
    }

    #[test]
    fn test_empty_report() {
        let report = StatisticsReport::new("reports");
        assert!(report.render().is_empty());
        assert_eq!(report.path(), PathBuf::from("reports").join(REPORT_FILE_NAME));
    }

    #[test]
    fn test_dump_creates_folder() {
        let folder = std::env::temp_dir()
            .join(format!("benchmark_app_report_{}", std::process::id()))
            .join("nested");
        let mut report = StatisticsReport::new(&folder);
        report.add_parameters(Category::ExecutionResults, [("inputs", 1)]);

        let path = report.dump().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Execution results\ninputs;1\n");

        let _ = fs::remove_dir_all(folder.parent().unwrap());
    }

    #[test]
    fn test_dump_into_regular_file_fails() {
        let blocker = std::env::temp_dir().join(format!("benchmark_app_blocker_{}", std::process::id()));
        fs::write(&blocker, b"not a folder").unwrap();

        let report = StatisticsReport::new(&blocker);
        assert!(matches!(report.dump(), Err(BenchmarkError::Report(_))));

        let _ = fs::remove_file(&blocker);
    }
}
