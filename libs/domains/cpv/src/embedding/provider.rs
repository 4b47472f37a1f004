use crate::error::{CpvError, CpvResult};

/// Trait for text embedding models.
///
/// Calls are blocking and CPU-bound. Async callers go through
/// [`EncodePool`](crate::pool::EncodePool) instead of calling this directly.
#[cfg_attr(test, mockall::automock)]
pub trait EmbeddingProvider: Send + Sync {
    /// Identifier reported to clients
    fn model_name(&self) -> String;

    /// Native output dimension of the loaded model
    fn dimension(&self) -> usize;

    /// Encode `texts` in order; every returned vector is unit length.
    fn embed_batch(&self, texts: &[String]) -> CpvResult<Vec<Vec<f32>>>;

    /// Encode a single text.
    fn embed(&self, text: &str) -> CpvResult<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| CpvError::Embedding("model returned no vector".to_string()))
    }
}

/// Scale `vector` to unit L2 norm. A zero vector is returned unchanged.
pub fn l2_normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
    vector
}
