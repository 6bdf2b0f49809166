use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP request to {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid CSS selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Data table not found: {locator} (document has {found} tbody elements)")]
    TableNotFound { locator: String, found: usize },

    #[error("Row {row} has a country link but only {found} cells, expected at least {expected}")]
    MissingCell {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Cannot parse '{value}' as a number: {reason}")]
    NumberParse { value: String, reason: String },

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unexpected CSV layout: {message}")]
    CsvLayout { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, EtlError>;
