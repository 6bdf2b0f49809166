use crate::config::{EtlConfig, TableLocator};
use crate::utils::error::{EtlError, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Optional overrides read from a TOML file. Every key may be omitted; an
/// omitted key keeps the value from [`EtlConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceSection,
    #[serde(default)]
    pub extract: ExtractSection,
    #[serde(default)]
    pub load: LoadSection,
    #[serde(default)]
    pub query: QuerySection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSection {
    pub url: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractSection {
    pub columns: Option<[String; 2]>,
    pub table_index: Option<usize>,
    pub header_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadSection {
    pub csv_path: Option<String>,
    pub db_path: Option<String>,
    pub table_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuerySection {
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    pub progress_log: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${DB_PATH})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        substitute_vars(content, |name| std::env::var(name).ok())
    }

    /// Layers these overrides on top of `base`.
    pub fn apply(self, mut base: EtlConfig) -> Result<EtlConfig> {
        if let Some(url) = self.source.url {
            base.url = url;
        }
        if let Some(user_agent) = self.source.user_agent {
            base.user_agent = user_agent;
        }
        if self.source.timeout_seconds.is_some() {
            base.timeout_seconds = self.source.timeout_seconds;
        }

        if let Some(columns) = self.extract.columns {
            base.table_attribs = columns;
        }
        match (self.extract.table_index, self.extract.header_text) {
            (Some(_), Some(_)) => {
                return Err(EtlError::Config {
                    message: "extract.table_index and extract.header_text are mutually exclusive"
                        .to_string(),
                })
            }
            (Some(index), None) => base.table_locator = TableLocator::Position(index),
            (None, Some(needle)) => base.table_locator = TableLocator::HeaderText(needle),
            (None, None) => {}
        }

        if let Some(csv_path) = self.load.csv_path {
            base.csv_path = csv_path;
        }
        if let Some(db_path) = self.load.db_path {
            base.db_path = db_path;
        }
        if let Some(table_name) = self.load.table_name {
            base.table_name = table_name;
        }

        if let Some(threshold) = self.query.threshold {
            base.query_threshold = threshold;
        }

        if let Some(progress_log) = self.logging.progress_log {
            base.progress_log = progress_log;
        }

        Ok(base)
    }
}

/// Replaces every `${NAME}` with `lookup(NAME)`; unresolved names stay as written.
fn substitute_vars(content: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::Config {
        message: format!("invalid placeholder pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}
