use arrow_array::{RecordBatch, RecordBatchIterator};
use async_trait::async_trait;
use futures::TryStreamExt;
use lancedb::database::CreateTableMode;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, DistanceType, Table};
use tracing::{debug, info, instrument};

use super::config::LanceConfig;
use crate::conversions::{batches_to_hits, records_to_batch};
use crate::error::CpvResult;
use crate::models::{CatalogHit, CatalogRecord};
use crate::repository::CatalogRepository;
use crate::schema::catalog_schema;

/// Handle to the catalog table inside a LanceDB directory.
#[derive(Clone)]
pub struct LanceCatalog {
    table: Table,
}

impl LanceCatalog {
    /// Open or create the store directory.
    pub async fn connect(config: &LanceConfig) -> CpvResult<Connection> {
        debug!(path = %config.uri(), "Connecting to LanceDB");
        Ok(lancedb::connect(&config.uri()).execute().await?)
    }

    /// Open the existing catalog table. A missing table is
    /// [`CpvError::TableNotFound`](crate::error::CpvError::TableNotFound).
    pub async fn open(config: &LanceConfig) -> CpvResult<Self> {
        let connection = Self::connect(config).await?;

        info!(
            "Opening LanceDB table '{}' from {} ...",
            config.table_name,
            config.uri()
        );
        let table = connection.open_table(&config.table_name).execute().await?;

        Ok(Self { table })
    }

    /// Create the catalog table from `records`, replacing any table of the
    /// same name. Nothing is written unless the whole batch converts.
    pub async fn overwrite(config: &LanceConfig, records: &[CatalogRecord]) -> CpvResult<Self> {
        let batch = records_to_batch(records)?;
        let connection = Self::connect(config).await?;

        info!(
            "Writing LanceDB table '{}' to {} ...",
            config.table_name,
            config.uri()
        );
        let reader = RecordBatchIterator::new(vec![Ok(batch)], catalog_schema());
        let table = connection
            .create_table(&config.table_name, Box::new(reader))
            .mode(CreateTableMode::Overwrite)
            .execute()
            .await?;

        Ok(Self { table })
    }
}

#[async_trait]
impl CatalogRepository for LanceCatalog {
    async fn count_rows(&self) -> CpvResult<usize> {
        Ok(self.table.count_rows(None).await?)
    }

    #[instrument(skip(self, vector), fields(table = %self.table.name()))]
    async fn nearest(&self, vector: Vec<f32>, limit: usize) -> CpvResult<Vec<CatalogHit>> {
        let batches: Vec<RecordBatch> = self
            .table
            .query()
            .nearest_to(vector.as_slice())?
            .distance_type(DistanceType::Cosine)
            .limit(limit)
            .execute()
            .await?
            .try_collect()
            .await?;

        let hits = batches_to_hits(&batches)?;
        debug!(hits = hits.len(), "Nearest-neighbour query complete");
        Ok(hits)
    }
}

impl std::fmt::Debug for LanceCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanceCatalog")
            .field("table", &self.table.name())
            .finish()
    }
}
