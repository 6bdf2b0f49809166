pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{database::GdpDatabase, http::HttpFetcher, storage::LocalStorage};
pub use config::{EtlConfig, TableLocator};
pub use crate::core::{
    etl::{EtlEngine, RunSummary},
    pipeline::GdpPipeline,
};
pub use utils::error::{EtlError, Result};
