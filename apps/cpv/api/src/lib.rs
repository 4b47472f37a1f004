//! CPV Search HTTP Service
//!
//! Serves semantic search over a pre-built LanceDB table of CPV codes.
//!
//! ## Architecture
//!
//! ```text
//! Client
//!   ↓ GET /search?q=...&limit=...
//! axum router (axum-helpers: docs, tracing, security headers)
//!   ↓
//! SearchService (domain_cpv)
//!   ↓ encode on rayon pool     ↓ cosine k-NN
//! FastEmbedProvider          LanceCatalog
//! ```
//!
//! ## Modules
//!
//! - `config`: Environment-driven configuration
//! - `server`: Startup, router assembly and shutdown

pub mod config;
pub mod server;

pub use server::{build_router, run};
