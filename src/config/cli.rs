use crate::config::toml_config::TomlConfig;
use crate::config::EtlConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "gdp-etl")]
#[command(about = "Scrape country GDP figures into a CSV file and a SQLite table")]
pub struct CliArgs {
    /// Optional TOML file overriding the built-in settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliArgs {
    /// Built-in defaults, with the TOML file layered on top when one is given.
    pub fn resolve(&self) -> Result<EtlConfig> {
        match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                TomlConfig::from_file(path)?.apply(EtlConfig::default())
            }
            None => Ok(EtlConfig::default()),
        }
    }
}
