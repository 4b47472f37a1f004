use async_trait::async_trait;

use crate::error::CpvResult;
use crate::models::CatalogHit;

/// Read-only access to the catalog table used by the query path.
///
/// The table never changes while the service runs, so implementations need
/// no locking between concurrent calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Number of rows in the table
    async fn count_rows(&self) -> CpvResult<usize>;

    /// The `limit` rows closest to `vector` under cosine distance, nearest first
    async fn nearest(&self, vector: Vec<f32>, limit: usize) -> CpvResult<Vec<CatalogHit>>;
}
