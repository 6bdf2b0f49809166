#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::{COUNTRY_COLUMN, GDP_BILLIONS_COLUMN, GDP_MILLIONS_COLUMN};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use std::fmt;

pub const DEFAULT_URL: &str = "https://web.archive.org/web/20230902185326/https://en.wikipedia.org/wiki/List_of_countries_by_GDP_%28nominal%29";
pub const DEFAULT_USER_AGENT: &str = concat!("gdp-etl/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_CSV_PATH: &str = "./Countries_by_GDP.csv";
pub const DEFAULT_DB_PATH: &str = "World_Economies.db";
pub const DEFAULT_TABLE_NAME: &str = "Countries_by_GDP";
pub const DEFAULT_PROGRESS_LOG: &str = "./etl_project_log.txt";
pub const DEFAULT_TABLE_INDEX: usize = 2;
pub const DEFAULT_QUERY_THRESHOLD: f64 = 100.0;

/// How the data table is picked out of the document's `tbody` elements.
#[derive(Debug, Clone, PartialEq)]
pub enum TableLocator {
    /// Index into every `tbody` in document order. Breaks silently if the page
    /// gains or loses a table above the data.
    Position(usize),
    /// First `tbody` with a `th` whose text contains this needle, ignoring case.
    HeaderText(String),
}

impl Default for TableLocator {
    fn default() -> Self {
        TableLocator::Position(DEFAULT_TABLE_INDEX)
    }
}

impl fmt::Display for TableLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableLocator::Position(index) => write!(f, "tbody at index {}", index),
            TableLocator::HeaderText(needle) => write!(f, "tbody with header containing '{}'", needle),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EtlConfig {
    pub url: String,
    pub user_agent: String,
    pub timeout_seconds: Option<u64>,
    pub table_attribs: [String; 2],
    pub table_locator: TableLocator,
    pub csv_path: String,
    pub db_path: String,
    pub table_name: String,
    pub query_threshold: f64,
    pub progress_log: String,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: None,
            table_attribs: [
                COUNTRY_COLUMN.to_string(),
                GDP_MILLIONS_COLUMN.to_string(),
            ],
            table_locator: TableLocator::default(),
            csv_path: DEFAULT_CSV_PATH.to_string(),
            db_path: DEFAULT_DB_PATH.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            query_threshold: DEFAULT_QUERY_THRESHOLD,
            progress_log: DEFAULT_PROGRESS_LOG.to_string(),
        }
    }
}

impl EtlConfig {
    /// The one query the run executes against the loaded table.
    pub fn query_statement(&self) -> String {
        format!(
            "SELECT * from {} WHERE {} >= {}",
            self.table_name, GDP_BILLIONS_COLUMN, self.query_threshold
        )
    }
}

impl Validate for EtlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source.url", &self.url)?;
        validation::validate_non_empty_string("source.user_agent", &self.user_agent)?;
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("source.timeout_seconds", timeout, 1)?;
        }

        for column in &self.table_attribs {
            validation::validate_sql_identifier("extract.columns", column)?;
        }
        if self.table_attribs[1] != GDP_MILLIONS_COLUMN {
            return Err(EtlError::InvalidConfigValue {
                field: "extract.columns".to_string(),
                value: self.table_attribs[1].clone(),
                reason: format!("GDP column must be named {}", GDP_MILLIONS_COLUMN),
            });
        }
        if let TableLocator::HeaderText(needle) = &self.table_locator {
            validation::validate_non_empty_string("extract.header_text", needle)?;
        }

        validation::validate_path("load.csv_path", &self.csv_path)?;
        validation::validate_path("load.db_path", &self.db_path)?;
        validation::validate_sql_identifier("load.table_name", &self.table_name)?;
        validation::validate_path("logging.progress_log", &self.progress_log)?;

        if !self.query_threshold.is_finite() {
            return Err(EtlError::InvalidConfigValue {
                field: "query.threshold".to_string(),
                value: self.query_threshold.to_string(),
                reason: "Threshold must be a finite number".to_string(),
            });
        }

        Ok(())
    }
}
