//! warehouse-seed binary.
//!
//! Reads `warehouse.toml` (or the path given with `--config`), opens the
//! SQLite warehouse, and runs the full seed plan. Exits non-zero if any stage
//! fails.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use warehouse_core::{store::WarehouseStore, table::Table};
use warehouse_seed::{Orchestrator, catalog::Catalog, config::SeedConfig};
use warehouse_store_sqlite::SqliteWarehouse;

#[derive(Parser)]
#[command(author, version, about = "Populate the interview analytics warehouse")]
struct Cli {
  /// Path to the TOML configuration file. Missing is fine.
  #[arg(short, long, default_value = "warehouse.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let config = SeedConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store = SqliteWarehouse::open(&config.store_path)
    .await
    .with_context(|| format!("failed to open warehouse at {:?}", config.store_path))?;

  tracing::info!(
    start = %config.calendar.start,
    end = %config.calendar.end,
    "starting warehouse population"
  );

  let catalog = Catalog::interview_seed();
  let report = match Orchestrator::new(&store, &catalog, &config).run().await {
    Ok(report) => report,
    Err(err) => {
      let err = anyhow::Error::new(err).context("warehouse population aborted");
      tracing::error!("{err:#}");
      return Err(err);
    }
  };

  let total = report.total();
  tracing::info!(
    inserted = total.inserted,
    skipped = total.skipped,
    "warehouse successfully populated"
  );
  for table in Table::ALL {
    let rows = store.count_rows(table).await?;
    tracing::info!(%table, rows, "row count");
  }

  store.close().await.context("failed to close warehouse")?;
  Ok(())
}
