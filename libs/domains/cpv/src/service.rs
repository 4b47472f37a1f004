use std::sync::Arc;

use tracing::{debug, instrument};
use validator::Validate;

use crate::embedding::{EmbeddingProvider, l2_normalize};
use crate::error::CpvResult;
use crate::models::{CpvMatch, HealthResponse, SearchParams, SearchResponse};
use crate::pool::EncodePool;
use crate::repository::CatalogRepository;
use crate::schema::ensure_dimension;

/// Process-wide query context: model, table handle and encode pool.
///
/// Built once at startup and shared by every request through `Arc`.
pub struct SearchService<R: CatalogRepository> {
    repository: R,
    pool: EncodePool,
    model_name: String,
}

impl<R: CatalogRepository> SearchService<R> {
    /// Fails if the model's output dimension differs from the table's.
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        repository: R,
        workers: usize,
    ) -> CpvResult<Self> {
        ensure_dimension(provider.dimension())?;
        let model_name = provider.model_name();
        let pool = EncodePool::new(provider, workers)?;

        Ok(Self {
            repository,
            pool,
            model_name,
        })
    }

    #[instrument(skip(self, params), fields(limit = params.effective_limit()))]
    pub async fn search(&self, params: SearchParams) -> CpvResult<SearchResponse> {
        params.validate()?;
        let limit = params.effective_limit() as usize;

        let vector = self.pool.encode(params.q.clone()).await?;
        ensure_dimension(vector.len())?;
        let vector = l2_normalize(vector);

        let hits = self.repository.nearest(vector, limit).await?;
        let mut results: Vec<CpvMatch> = hits.into_iter().take(limit).map(Into::into).collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(count = results.len(), "Search complete");
        Ok(SearchResponse {
            query: params.q,
            count: results.len(),
            results,
        })
    }

    pub async fn health(&self) -> CpvResult<HealthResponse> {
        Ok(HealthResponse {
            status: "ok".to_string(),
            table_rows: self.repository.count_rows().await?,
            model_name: self.model_name.clone(),
        })
    }

    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// Stop the encode pool without waiting for in-flight work.
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbeddingProvider;
    use crate::error::CpvError;
    use crate::models::CatalogHit;
    use crate::repository::MockCatalogRepository;
    use crate::schema::{EMBEDDING_DIM, MODEL_NAME, is_unit_norm};

    fn provider() -> MockEmbeddingProvider {
        let mut mock = MockEmbeddingProvider::new();
        mock.expect_dimension().return_const(EMBEDDING_DIM);
        mock.expect_model_name().returning(|| MODEL_NAME.to_string());
        mock
    }

    fn hit(code: &str, distance: f32) -> CatalogHit {
        CatalogHit {
            code: code.to_string(),
            description: format!("desc {code}"),
            distance,
        }
    }

    #[test]
    fn test_new_rejects_dimension_mismatch() {
        let mut mock = MockEmbeddingProvider::new();
        mock.expect_dimension().return_const(512usize);
        mock.expect_model_name().returning(|| MODEL_NAME.to_string());

        let result = SearchService::new(Arc::new(mock), MockCatalogRepository::new(), 4);
        assert!(matches!(
            result,
            Err(CpvError::DimensionMismatch { actual: 512, .. })
        ));
    }

    #[tokio::test]
    async fn test_search_maps_hits_to_scores() {
        let mut mock = provider();
        mock.expect_embed().returning(|_| Ok(vec![0.05; EMBEDDING_DIM]));

        let mut repo = MockCatalogRepository::new();
        repo.expect_nearest()
            .withf(|vector, limit| vector.len() == EMBEDDING_DIM && *limit == 10)
            .times(1)
            .returning(|_, _| Ok(vec![hit("45000000-7", 0.0), hit("45100000-8", 0.25)]));

        let service = SearchService::new(Arc::new(mock), repo, 2).unwrap();
        let response = service
            .search(SearchParams::new("roboty budowlane", None))
            .await
            .unwrap();

        assert_eq!(response.query, "roboty budowlane");
        assert_eq!(response.count, 2);
        assert_eq!(response.results[0].cpv_code, "45000000-7");
        assert_eq!(response.results[0].score, 1.0);
        assert_eq!(response.results[1].score, 0.75);
    }

    #[tokio::test]
    async fn test_query_vector_is_unit_normalised_before_lookup() {
        let mut mock = provider();
        mock.expect_embed().returning(|_| Ok(vec![3.0; EMBEDDING_DIM]));

        let mut repo = MockCatalogRepository::new();
        repo.expect_nearest()
            .withf(|vector, _| vector.len() == EMBEDDING_DIM && is_unit_norm(vector))
            .times(1)
            .returning(|_, _| Ok(vec![hit("45000000-7", 0.1)]));

        let service = SearchService::new(Arc::new(mock), repo, 1).unwrap();
        let response = service.search(SearchParams::new("beton", None)).await.unwrap();
        assert_eq!(response.count, 1);
    }

    #[tokio::test]
    async fn test_search_rejects_wrong_query_dimension() {
        let mut mock = provider();
        mock.expect_embed().returning(|_| Ok(vec![1.0; 8]));
        let mut repo = MockCatalogRepository::new();
        repo.expect_nearest().times(0);

        let service = SearchService::new(Arc::new(mock), repo, 1).unwrap();
        let err = service.search(SearchParams::new("x", None)).await.unwrap_err();
        assert!(matches!(err, CpvError::DimensionMismatch { actual: 8, .. }));
    }

    #[tokio::test]
    async fn test_search_results_never_exceed_limit_and_are_ordered() {
        let mut mock = provider();
        mock.expect_embed().returning(|_| Ok(vec![0.05; EMBEDDING_DIM]));

        let mut repo = MockCatalogRepository::new();
        repo.expect_nearest().returning(|_, _| {
            Ok(vec![hit("a", 0.3), hit("b", 0.1), hit("c", 0.2), hit("d", 0.0)])
        });

        let service = SearchService::new(Arc::new(mock), repo, 1).unwrap();
        let response = service.search(SearchParams::new("x", Some(3))).await.unwrap();

        assert_eq!(response.count, 3);
        assert!(
            response
                .results
                .windows(2)
                .all(|w| w[0].score >= w[1].score)
        );
    }

    #[tokio::test]
    async fn test_invalid_params_rejected_before_model_call() {
        for params in [
            SearchParams::new("", None),
            SearchParams::new("x", Some(0)),
            SearchParams::new("x", Some(51)),
            SearchParams::new("x".repeat(513), None),
        ] {
            let mut mock = provider();
            mock.expect_embed().times(0);
            mock.expect_embed_batch().times(0);
            let mut repo = MockCatalogRepository::new();
            repo.expect_nearest().times(0);

            let service = SearchService::new(Arc::new(mock), repo, 1).unwrap();
            let err = service.search(params).await.unwrap_err();
            assert!(matches!(err, CpvError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_search_propagates_store_error() {
        let mut mock = provider();
        mock.expect_embed().returning(|_| Ok(vec![0.05; EMBEDDING_DIM]));
        let mut repo = MockCatalogRepository::new();
        repo.expect_nearest()
            .returning(|_, _| Err(CpvError::Store("corrupt fragment".into())));

        let service = SearchService::new(Arc::new(mock), repo, 1).unwrap();
        let err = service.search(SearchParams::new("x", None)).await.unwrap_err();
        assert!(matches!(err, CpvError::Store(_)));
    }

    #[tokio::test]
    async fn test_health_does_not_touch_model() {
        let mut mock = provider();
        mock.expect_embed().times(0);
        let mut repo = MockCatalogRepository::new();
        repo.expect_count_rows().returning(|| Ok(9454));

        let service = SearchService::new(Arc::new(mock), repo, 1).unwrap();
        let health = service.health().await.unwrap();

        assert_eq!(health.status, "ok");
        assert_eq!(health.table_rows, 9454);
        assert_eq!(health.model_name, MODEL_NAME);
    }

    #[tokio::test]
    async fn test_search_after_shutdown_is_internal_error() {
        let service =
            SearchService::new(Arc::new(provider()), MockCatalogRepository::new(), 1).unwrap();
        service.shutdown();

        let err = service.search(SearchParams::new("x", None)).await.unwrap_err();
        assert!(matches!(err, CpvError::Internal(_)));
    }
}
