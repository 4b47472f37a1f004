//! CPV Domain Library
//!
//! Semantic search over the Common Procurement Vocabulary: an offline
//! ingestion pipeline that writes a LanceDB table of unit-normalised
//! embeddings, and a read-only query service on top of it.
//!
//! # Architecture
//!
//! ```text
//!   ingest (offline)                      query (online)
//! ┌──────────────────┐               ┌─────────────────┐
//! │  IngestPipeline  │               │  SearchService  │ ← validation, scoring
//! └───┬──────────┬───┘               └───┬─────────┬───┘
//!     │          │                       │         │
//!     │          │                  ┌────▼─────┐   │
//!     │          │                  │EncodePool│   │   ← rayon workers
//!     │          │                  └────┬─────┘   │
//! ┌───▼──────────┴────────────────────────▼──┐  ┌──▼────────────────┐
//! │  EmbeddingProvider (FastEmbedProvider)   │  │ CatalogRepository │
//! └──────────────────────────────────────────┘  │  (LanceCatalog)   │
//!     │                                          └──▲────────────────┘
//!     └─────────────── overwrite ───────────────────┘
//! ```
//!
//! Both sides share [`schema`], so the vector dimension, table name and
//! model identity are defined once.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_cpv::{FastEmbedConfig, FastEmbedProvider, LanceCatalog, LanceConfig, SearchParams, SearchService};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Arc::new(FastEmbedProvider::load(&FastEmbedConfig::default())?);
//! let catalog = LanceCatalog::open(&LanceConfig::default()).await?;
//! let service = SearchService::new(provider, catalog, 4)?;
//!
//! let response = service.search(SearchParams::new("roboty budowlane", Some(5))).await?;
//! for hit in response.results {
//!     println!("{} {:.4} {}", hit.cpv_code, hit.score, hit.description);
//! }
//! # Ok(())
//! # }
//! ```

pub mod conversions;
pub mod embedding;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod lance;
pub mod models;
pub mod pool;
pub mod repository;
pub mod schema;
pub mod service;

// Re-export commonly used types
pub use embedding::{EmbeddingProvider, FastEmbedConfig, FastEmbedProvider, l2_normalize};
pub use error::{CpvError, CpvResult};
pub use handlers::CpvApiDoc;
pub use ingest::{IngestPipeline, IngestReport};
pub use lance::{LanceCatalog, LanceConfig};
pub use models::{
    CatalogHit, CatalogRecord, CpvMatch, HealthResponse, RawRecord, SearchParams, SearchResponse,
};
pub use pool::EncodePool;
pub use repository::CatalogRepository;
pub use service::SearchService;
