//! Batch ingestion: JSON file -> embeddings -> overwritten LanceDB table.
//!
//! Every step validates its input completely before the next one runs, and
//! the store is only touched once a fully assembled batch exists. A failed
//! run leaves any previous table untouched; a successful run replaces it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::embedding::{EmbeddingProvider, l2_normalize};
use crate::error::{CpvError, CpvResult};
use crate::lance::{LanceCatalog, LanceConfig};
use crate::models::{CatalogRecord, RawRecord};
use crate::repository::CatalogRepository;
use crate::schema::{MODEL_NAME, ensure_dimension};

pub use crate::lance::DEFAULT_DB_PATH;

pub const DEFAULT_INPUT: &str = "cpv-2008.json";
/// Descriptions encoded per model call; bounds peak memory.
pub const DEFAULT_BATCH_SIZE: usize = 512;

/// Parse the input file into raw records.
pub fn load(path: &Path) -> CpvResult<Vec<RawRecord>> {
    let contents = std::fs::read_to_string(path).map_err(|source| CpvError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<RawRecord> = serde_json::from_str(&contents)?;
    if records.is_empty() {
        return Err(CpvError::EmptyDataset(path.to_path_buf()));
    }

    info!("Loaded {} CPV records from {}", records.len(), path.display());
    Ok(records)
}

/// Encode `descriptions` in order, `batch_size` at a time.
///
/// Batch `i` covers `descriptions[i * batch_size..(i + 1) * batch_size]` and
/// results are concatenated in that order, so the output does not depend on
/// `batch_size`.
pub fn encode(
    provider: &dyn EmbeddingProvider,
    descriptions: &[String],
    batch_size: usize,
) -> CpvResult<Vec<Vec<f32>>> {
    ensure_dimension(provider.dimension())?;
    if batch_size == 0 {
        return Err(CpvError::InvalidBatchSize);
    }

    let batches = descriptions.len().div_ceil(batch_size);
    let progress = ProgressBar::new(batches as u64);
    progress.set_style(
        ProgressStyle::with_template("Encoding [{bar:40.cyan/blue}] {pos}/{len} batches ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut vectors = Vec::with_capacity(descriptions.len());
    for chunk in descriptions.chunks(batch_size) {
        let encoded = provider.embed_batch(chunk)?;
        if encoded.len() != chunk.len() {
            return Err(CpvError::CountMismatch {
                records: chunk.len(),
                vectors: encoded.len(),
            });
        }

        for vector in encoded {
            ensure_dimension(vector.len())?;
            vectors.push(l2_normalize(vector));
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(vectors)
}

/// Pair records with vectors by position. Counts must match exactly.
pub fn assemble(raw: Vec<RawRecord>, vectors: Vec<Vec<f32>>) -> CpvResult<Vec<CatalogRecord>> {
    if raw.len() != vectors.len() {
        return Err(CpvError::CountMismatch {
            records: raw.len(),
            vectors: vectors.len(),
        });
    }

    Ok(raw
        .into_iter()
        .zip(vectors)
        .map(|(record, vector)| CatalogRecord::new(record, vector))
        .collect())
}

/// Replace the catalog table with `records` and return its row count.
pub async fn write(config: &LanceConfig, records: &[CatalogRecord]) -> CpvResult<usize> {
    let catalog = LanceCatalog::overwrite(config, records).await?;
    let rows = catalog.count_rows().await?;
    info!("Table rows: {}", rows);
    Ok(rows)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub rows: usize,
    pub elapsed: Duration,
}

/// The four ingestion steps wired together around one loaded model.
pub struct IngestPipeline {
    provider: Arc<dyn EmbeddingProvider>,
    config: LanceConfig,
    batch_size: usize,
}

impl IngestPipeline {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: LanceConfig) -> Self {
        Self {
            provider,
            config,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub async fn run(&self, input: impl Into<PathBuf>) -> CpvResult<IngestReport> {
        let started = Instant::now();
        let input = input.into();

        let raw = load(&input)?;
        let descriptions: Vec<String> = raw.iter().map(|r| r.description.clone()).collect();

        info!("Encoding with {} (batch size {}) ...", MODEL_NAME, self.batch_size);
        let provider = Arc::clone(&self.provider);
        let batch_size = self.batch_size;
        let vectors = tokio::task::spawn_blocking(move || {
            encode(provider.as_ref(), &descriptions, batch_size)
        })
        .await
        .map_err(|e| CpvError::Internal(format!("encode task failed: {}", e)))??;

        let records = assemble(raw, vectors)?;
        let rows = write(&self.config, &records).await?;

        Ok(IngestReport {
            rows,
            elapsed: started.elapsed(),
        })
    }
}
