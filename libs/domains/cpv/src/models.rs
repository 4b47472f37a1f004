use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Results returned when `limit` is omitted.
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 50;
pub const MAX_QUERY_CHARS: u64 = 512;

/// One entry of the ingestion input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub code: String,
    pub description: String,
}

/// A catalog row ready to be written: a raw record paired with its unit vector.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecord {
    pub vector: Vec<f32>,
    pub code: String,
    pub description: String,
}

impl CatalogRecord {
    pub fn new(raw: RawRecord, vector: Vec<f32>) -> Self {
        Self {
            vector,
            code: raw.code,
            description: raw.description,
        }
    }
}

/// A nearest-neighbour hit as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogHit {
    pub code: String,
    pub description: String,
    /// Cosine distance, `0.0` for identical direction.
    pub distance: f32,
}

/// Query string of `GET /search`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Search phrase (any language)
    #[validate(length(min = 1, max = MAX_QUERY_CHARS))]
    #[param(min_length = 1, max_length = 512)]
    pub q: String,

    /// Max results (1-50, default 10)
    #[validate(range(min = 1, max = MAX_LIMIT))]
    #[param(minimum = 1, maximum = 50)]
    pub limit: Option<u32>,
}

impl SearchParams {
    pub fn new(q: impl Into<String>, limit: Option<u32>) -> Self {
        Self {
            q: q.into(),
            limit,
        }
    }

    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// A single search hit returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CpvMatch {
    #[schema(example = "45000000-7")]
    pub cpv_code: String,
    #[schema(example = "Construction work")]
    pub description: String,
    /// Cosine similarity (higher = better match)
    #[schema(example = 0.82)]
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<CpvMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    pub table_rows: usize,
    pub model_name: String,
}

/// `1 - distance`, clamped to `[-1, 1]` and rounded to 4 decimal places.
pub fn similarity_score(distance: f32) -> f64 {
    let similarity = (1.0 - f64::from(distance)).clamp(-1.0, 1.0);
    (similarity * 10_000.0).round() / 10_000.0
}

impl From<CatalogHit> for CpvMatch {
    fn from(hit: CatalogHit) -> Self {
        Self {
            score: similarity_score(hit.distance),
            cpv_code: hit.code,
            description: hit.description,
        }
    }
}
