use anyhow::Context;
use clap::Parser;
use gdp_etl::utils::{logger, validation::Validate};
use gdp_etl::{CliArgs, EtlEngine, GdpPipeline};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    if let Err(e) = run(&args).await {
        tracing::error!("❌ ETL process failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(args: &CliArgs) -> anyhow::Result<()> {
    let config = args.resolve().context("failed to load configuration")?;
    tracing::debug!("Resolved config: {:?}", config);
    config.validate().context("invalid configuration")?;

    let pipeline =
        GdpPipeline::from_config(config.clone()).context("failed to build HTTP client")?;
    let engine = EtlEngine::new(pipeline, config);

    let summary = engine.run().await.context("ETL run aborted")?;

    tracing::info!(
        "✅ ETL process completed: {} records, {} loaded, {} matched the query",
        summary.records,
        summary.rows_loaded,
        summary.result.len()
    );
    tracing::info!("📁 CSV saved to: {}", summary.csv_path);
    Ok(())
}
