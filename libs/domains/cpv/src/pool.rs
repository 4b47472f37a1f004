//! Bounded worker pool for blocking encode calls.
//!
//! The async request path never runs the model itself: each encode is
//! submitted to a fixed-size rayon pool and the caller awaits a oneshot reply.
//! Submissions beyond the pool size wait in rayon's queue.

use std::sync::{Arc, RwLock};

use rayon::{ThreadPool, ThreadPoolBuilder};
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::embedding::EmbeddingProvider;
use crate::error::{CpvError, CpvResult};

pub const DEFAULT_WORKERS: usize = 4;

pub struct EncodePool {
    provider: Arc<dyn EmbeddingProvider>,
    pool: RwLock<Option<Arc<ThreadPool>>>,
    workers: usize,
}

impl EncodePool {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, workers: usize) -> CpvResult<Self> {
        if workers == 0 {
            return Err(CpvError::Config(
                "encode pool needs at least one worker".to_string(),
            ));
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("embed-{i}"))
            .panic_handler(|_| error!("Encode worker panicked; request will fail"))
            .build()
            .map_err(|e| CpvError::Internal(format!("failed to build encode pool: {}", e)))?;

        Ok(Self {
            provider,
            pool: RwLock::new(Some(Arc::new(pool))),
            workers,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Encode `text` on a pool thread without blocking the caller's runtime.
    pub async fn encode(&self, text: String) -> CpvResult<Vec<f32>> {
        let pool = self.handle()?;
        let provider = Arc::clone(&self.provider);
        let (tx, rx) = oneshot::channel();

        pool.spawn(move || {
            let _ = tx.send(provider.embed(&text));
        });

        rx.await
            .map_err(|_| CpvError::Internal("encode worker dropped the request".to_string()))?
    }

    /// Stop accepting work. Queued and running encodes finish on their own;
    /// this call does not wait for them.
    pub fn shutdown(&self) {
        match self.pool.write() {
            Ok(mut slot) => {
                if slot.take().is_some() {
                    info!("Encode pool shut down");
                }
            }
            Err(e) => error!("Encode pool lock poisoned during shutdown: {}", e),
        }
    }

    pub fn is_running(&self) -> bool {
        self.pool.read().map(|slot| slot.is_some()).unwrap_or(false)
    }

    fn handle(&self) -> CpvResult<Arc<ThreadPool>> {
        let slot = self
            .pool
            .read()
            .map_err(|_| CpvError::Internal("encode pool lock poisoned".to_string()))?;

        slot.as_ref()
            .map(Arc::clone)
            .ok_or_else(|| CpvError::Internal("encode pool is shut down".to_string()))
    }
}

impl std::fmt::Debug for EncodePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodePool")
            .field("workers", &self.workers)
            .field("running", &self.is_running())
            .finish()
    }
}
