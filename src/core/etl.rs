use crate::adapters::database::GdpDatabase;
use crate::config::EtlConfig;
use crate::core::query::run_query;
use crate::core::Pipeline;
use crate::domain::model::QueryResult;
use crate::utils::error::Result;
use crate::utils::progress::{ProgressLogger, Stage};

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub records: usize,
    pub csv_path: String,
    pub rows_loaded: u64,
    pub query: String,
    pub result: QueryResult,
}

/// Drives a [`Pipeline`] through fetch, transform, both sinks and the final
/// query, writing one progress line per stage.
///
/// Any error ends the run where it happened. Stages that already finished are
/// not rolled back, so the CSV can exist even if the database load failed.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    config: EtlConfig,
    progress: ProgressLogger,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P, config: EtlConfig) -> Self {
        let progress = ProgressLogger::new(&config.progress_log);
        Self {
            pipeline,
            config,
            progress,
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("🚀 Starting ETL process");
        self.progress.stage(Stage::Preliminaries)?;

        let raw = self.pipeline.extract().await?;
        let records = raw.len();
        self.progress.stage(Stage::ExtractDone)?;

        let table = self.pipeline.transform(raw).await?;
        self.progress.stage(Stage::TransformDone)?;

        let csv_path = self.pipeline.load_csv(&table).await?;
        self.progress.stage(Stage::CsvDone)?;

        let db = GdpDatabase::connect(&self.config.db_path).await?;
        self.progress.stage(Stage::DbConnect)?;

        let rows_loaded = self.pipeline.load_db(&table, &db).await?;
        self.progress.stage(Stage::DbLoadDone)?;

        let query = self.config.query_statement();
        let result = run_query(&db, &query).await?;

        self.progress.stage(Stage::Complete)?;
        db.close().await;

        Ok(RunSummary {
            records,
            csv_path,
            rows_loaded,
            query,
            result,
        })
    }
}
