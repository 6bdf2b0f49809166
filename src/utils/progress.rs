use crate::utils::error::Result;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// `Year-MonthAbbrev-Day-Hour:Minute:Second`, e.g. `2026-Oct-18-14:03:59`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%b-%d-%H:%M:%S";

/// The fixed sequence of checkpoints a run passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preliminaries,
    ExtractDone,
    TransformDone,
    CsvDone,
    DbConnect,
    DbLoadDone,
    Complete,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Preliminaries,
        Stage::ExtractDone,
        Stage::TransformDone,
        Stage::CsvDone,
        Stage::DbConnect,
        Stage::DbLoadDone,
        Stage::Complete,
    ];

    pub fn message(self) -> &'static str {
        match self {
            Stage::Preliminaries => "Preliminaries complete. Initiating ETL process",
            Stage::ExtractDone => "Data extraction complete. Initiating Transformation process",
            Stage::TransformDone => "Data transformation complete. Initiating loading process",
            Stage::CsvDone => "Data saved to CSV file",
            Stage::DbConnect => "SQL Connection initiated.",
            Stage::DbLoadDone => "Data loaded to Database as table. Running the query",
            Stage::Complete => "Process Complete.",
        }
    }
}

/// Append-only progress log.
///
/// The file is reopened in append mode for every line, so no handle outlives a
/// call and a crash can at worst leave the last line partially written.
#[derive(Debug, Clone)]
pub struct ProgressLogger {
    path: PathBuf,
}

impl ProgressLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn log(&self, message: &str) -> Result<()> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{} : {}", timestamp, message)?;

        tracing::info!("📝 {}", message);
        Ok(())
    }

    pub fn stage(&self, stage: Stage) -> Result<()> {
        self.log(stage.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use tempfile::TempDir;

    #[test]
    fn test_log_appends_timestamped_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("progress.txt");
        std::fs::write(&path, "existing line\n").unwrap();

        let logger = ProgressLogger::new(&path);
        logger.log("first").unwrap();
        logger.stage(Stage::Complete).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "existing line");

        let line_re = Regex::new(r"^\d{4}-[A-Z][a-z]{2}-\d{2}-\d{2}:\d{2}:\d{2} : (.+)$").unwrap();
        assert_eq!(&line_re.captures(lines[1]).unwrap()[1], "first");
        assert_eq!(&line_re.captures(lines[2]).unwrap()[1], "Process Complete.");
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_log_creates_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fresh_log.txt");
        assert!(!path.exists());

        ProgressLogger::new(&path).stage(Stage::Preliminaries).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_log_fails_when_directory_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("log.txt");
        assert!(ProgressLogger::new(path).log("nope").is_err());
    }

    #[test]
    fn test_stage_order_and_messages() {
        assert_eq!(Stage::ALL.first(), Some(&Stage::Preliminaries));
        assert_eq!(Stage::ALL.last(), Some(&Stage::Complete));
        assert_eq!(Stage::DbConnect.message(), "SQL Connection initiated.");
    }
}
