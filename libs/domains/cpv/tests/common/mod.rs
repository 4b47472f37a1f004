//! Shared fixtures for integration tests.
//!
//! `HashingEmbedder` stands in for the ONNX model: each lowercase word is
//! hashed into one of `EMBEDDING_DIM` buckets, so texts sharing words are
//! close and unrelated texts are (almost always) orthogonal.

#![allow(dead_code)]

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use domain_cpv::schema::{EMBEDDING_DIM, MODEL_NAME};
use domain_cpv::{CpvResult, EmbeddingProvider, LanceConfig, RawRecord, l2_normalize};
use tempfile::TempDir;

pub struct HashingEmbedder;

impl HashingEmbedder {
    pub fn vector(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; EMBEDDING_DIM];
        for word in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            vector[(hasher.finish() % EMBEDDING_DIM as u64) as usize] += 1.0;
        }
        l2_normalize(vector)
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn model_name(&self) -> String {
        MODEL_NAME.to_string()
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }

    fn embed_batch(&self, texts: &[String]) -> CpvResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }
}

pub fn record(code: &str, description: &str) -> RawRecord {
    RawRecord {
        code: code.to_string(),
        description: description.to_string(),
    }
}

pub fn sample_records() -> Vec<RawRecord> {
    vec![
        record("45000000-7", "Construction work"),
        record("03000000-1", "Agricultural farming fishing forestry products"),
        record("09000000-3", "Petroleum products fuel electricity"),
        record("15000000-8", "Food beverages tobacco"),
        record("30000000-9", "Office computing machinery equipment supplies"),
        record("33000000-0", "Medical equipments pharmaceuticals personal care"),
        record("34000000-7", "Transport equipment auxiliary products"),
        record("72000000-5", "IT services consulting software development internet support"),
    ]
}

/// A temporary store directory plus an input file inside it.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn config(&self) -> LanceConfig {
        LanceConfig::new(self.dir.path().join("lancedb"))
    }

    pub fn write_input(&self, name: &str, records: &[RawRecord]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, serde_json::to_string(records).unwrap()).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
