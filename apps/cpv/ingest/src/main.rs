//! CPV Ingestion
//!
//! One-shot job: loads CPV codes from JSON, encodes the descriptions with the
//! multilingual MiniLM-L12 model and (re)writes the LanceDB table.
//!
//! ```text
//! cpv-ingest                                   # cpv-2008.json -> ./lancedb
//! cpv-ingest --input data.json --db ./my_db
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use domain_cpv::ingest::{DEFAULT_BATCH_SIZE, DEFAULT_DB_PATH, DEFAULT_INPUT};
use domain_cpv::{FastEmbedConfig, FastEmbedProvider, IngestPipeline, LanceConfig};
use eyre::{Result, WrapErr};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "cpv-ingest")]
#[command(about = "Ingest CPV codes into LanceDB")]
struct Cli {
    /// Path to the CPV JSON file
    #[arg(long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// LanceDB directory
    #[arg(long, env = "CPV_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Descriptions encoded per model call
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE as u64, value_parser = clap::value_parser!(u64).range(1..))]
    batch_size: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();
    init_tracing(&Environment::from_env());

    let cli = Cli::parse();

    let model_config = FastEmbedConfig::from_env()?.with_download_progress(true);
    let provider = tokio::task::spawn_blocking(move || FastEmbedProvider::load(&model_config))
        .await
        .wrap_err("Model loading task failed")?
        .wrap_err("Failed to load embedding model")?;

    let batch_size = usize::try_from(cli.batch_size).wrap_err("Batch size out of range")?;
    let report = IngestPipeline::new(Arc::new(provider), LanceConfig::new(&cli.db))
        .with_batch_size(batch_size)
        .run(&cli.input)
        .await
        .wrap_err_with(|| format!("Ingestion of {} failed", cli.input.display()))?;

    info!("Ingested {} rows", report.rows);
    info!("Ingestion finished in {:.1}s", report.elapsed.as_secs_f64());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["cpv-ingest"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("cpv-2008.json"));
        assert_eq!(cli.batch_size, 512);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "cpv-ingest",
            "--input",
            "data.json",
            "--db",
            "./my_db",
            "--batch-size",
            "64",
        ])
        .unwrap();
        assert_eq!(cli.input, PathBuf::from("data.json"));
        assert_eq!(cli.db, PathBuf::from("./my_db"));
        assert_eq!(cli.batch_size, 64);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(Cli::try_parse_from(["cpv-ingest", "--batch-size", "0"]).is_err());
    }
}
