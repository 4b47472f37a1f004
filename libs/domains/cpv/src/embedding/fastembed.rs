use std::path::PathBuf;

use core_config::{FromEnv, env_or_default, env_parse};
use ::fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::{debug, info};

use super::provider::{EmbeddingProvider, l2_normalize};
use crate::error::{CpvError, CpvResult};
use crate::schema::MODEL_NAME;

const PROBE_TEXT: &str = "dimension probe";

/// Where and how the ONNX model files are fetched.
#[derive(Debug, Clone)]
pub struct FastEmbedConfig {
    pub cache_dir: PathBuf,
    pub show_download_progress: bool,
}

impl Default for FastEmbedConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(".fastembed_cache"),
            show_download_progress: false,
        }
    }
}

impl FromEnv for FastEmbedConfig {
    fn from_env() -> Result<Self, core_config::ConfigError> {
        Ok(Self {
            cache_dir: PathBuf::from(env_or_default("CPV_MODEL_CACHE", ".fastembed_cache")),
            show_download_progress: env_parse("CPV_MODEL_DOWNLOAD_PROGRESS", false)?,
        })
    }
}

impl FastEmbedConfig {
    pub fn with_download_progress(mut self, show: bool) -> Self {
        self.show_download_progress = show;
        self
    }
}

/// Local multilingual MiniLM-L12 embedder running on ONNX Runtime.
pub struct FastEmbedProvider {
    model: TextEmbedding,
    dimension: usize,
}

impl FastEmbedProvider {
    /// Load the model and probe its native output dimension.
    pub fn load(config: &FastEmbedConfig) -> CpvResult<Self> {
        info!("Loading embedding model: {} ...", MODEL_NAME);

        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::ParaphraseMLMiniLML12V2)
                .with_cache_dir(config.cache_dir.clone())
                .with_show_download_progress(config.show_download_progress),
        )
        .map_err(|e| CpvError::Embedding(format!("failed to load {}: {}", MODEL_NAME, e)))?;

        let dimension = model
            .embed(vec![PROBE_TEXT], None)
            .map_err(|e| CpvError::Embedding(e.to_string()))?
            .first()
            .map(Vec::len)
            .ok_or_else(|| CpvError::Embedding("dimension probe returned nothing".to_string()))?;

        debug!(dimension, "Embedding model loaded");
        Ok(Self { model, dimension })
    }
}

impl EmbeddingProvider for FastEmbedProvider {
    fn model_name(&self) -> String {
        MODEL_NAME.to_string()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[String]) -> CpvResult<Vec<Vec<f32>>> {
        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let vectors = self
            .model
            .embed(inputs, None)
            .map_err(|e| CpvError::Embedding(e.to_string()))?;

        Ok(vectors.into_iter().map(l2_normalize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_dir_from_env() {
        temp_env::with_var("CPV_MODEL_CACHE", Some("/tmp/models"), || {
            let config = FastEmbedConfig::from_env().unwrap();
            assert_eq!(config.cache_dir, PathBuf::from("/tmp/models"));
        });
    }

    #[test]
    fn test_cache_dir_default() {
        temp_env::with_vars_unset(["CPV_MODEL_CACHE", "CPV_MODEL_DOWNLOAD_PROGRESS"], || {
            let config = FastEmbedConfig::from_env().unwrap();
            assert_eq!(config.cache_dir, PathBuf::from(".fastembed_cache"));
            assert!(!config.show_download_progress);
        });
    }
}
