//! Table layout shared by the ingestion and query paths.
//!
//! Both sides import these constants instead of repeating literals, so the
//! vector shape and model identity cannot drift between writer and reader.

use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema, SchemaRef};

use crate::error::{CpvError, CpvResult};

/// Output dimension of the embedding model.
pub const EMBEDDING_DIM: usize = 384;

pub const TABLE_NAME: &str = "cpv_codes";

/// Reported by `/health`; identifies the model that produced the stored vectors.
pub const MODEL_NAME: &str = "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2";

pub const VECTOR_FIELD: &str = "vector";
pub const CODE_FIELD: &str = "cpv_code";
pub const DESCRIPTION_FIELD: &str = "description";

/// Column the store appends to nearest-neighbour results.
pub const DISTANCE_FIELD: &str = "_distance";

/// Allowed deviation of a stored vector's L2 norm from 1.
pub const UNIT_NORM_TOLERANCE: f32 = 1e-3;

/// Arrow schema of one catalog row.
pub fn catalog_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(
            VECTOR_FIELD,
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                EMBEDDING_DIM as i32,
            ),
            false,
        ),
        Field::new(CODE_FIELD, DataType::Utf8, false),
        Field::new(DESCRIPTION_FIELD, DataType::Utf8, false),
    ]))
}

/// Fails with [`CpvError::DimensionMismatch`] unless `actual == EMBEDDING_DIM`.
pub fn ensure_dimension(actual: usize) -> CpvResult<()> {
    if actual == EMBEDDING_DIM {
        Ok(())
    } else {
        Err(CpvError::DimensionMismatch {
            expected: EMBEDDING_DIM,
            actual,
        })
    }
}

pub fn is_unit_norm(vector: &[f32]) -> bool {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    (norm - 1.0).abs() <= UNIT_NORM_TOLERANCE
}
