//! Conversions between catalog models and Arrow record batches.

use std::sync::Arc;

use arrow_array::{
    Array, FixedSizeListArray, Float32Array, RecordBatch, StringArray, types::Float32Type,
};

use crate::error::{CpvError, CpvResult};
use crate::models::{CatalogHit, CatalogRecord};
use crate::schema::{
    CODE_FIELD, DESCRIPTION_FIELD, DISTANCE_FIELD, EMBEDDING_DIM, catalog_schema,
    ensure_dimension,
};

/// Build one record batch holding every record, in input order.
pub fn records_to_batch(records: &[CatalogRecord]) -> CpvResult<RecordBatch> {
    for record in records {
        ensure_dimension(record.vector.len())?;
    }

    let vectors = FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
        records
            .iter()
            .map(|r| Some(r.vector.iter().copied().map(Some))),
        EMBEDDING_DIM as i32,
    );
    let codes = StringArray::from_iter_values(records.iter().map(|r| r.code.as_str()));
    let descriptions =
        StringArray::from_iter_values(records.iter().map(|r| r.description.as_str()));

    let batch = RecordBatch::try_new(
        catalog_schema(),
        vec![Arc::new(vectors), Arc::new(codes), Arc::new(descriptions)],
    )?;

    Ok(batch)
}

/// Flatten nearest-neighbour result batches into hits, preserving row order.
pub fn batches_to_hits(batches: &[RecordBatch]) -> CpvResult<Vec<CatalogHit>> {
    let mut hits = Vec::with_capacity(batches.iter().map(RecordBatch::num_rows).sum());

    for batch in batches {
        let codes = string_column(batch, CODE_FIELD)?;
        let descriptions = string_column(batch, DESCRIPTION_FIELD)?;
        let distances = batch
            .column_by_name(DISTANCE_FIELD)
            .and_then(|col| col.as_any().downcast_ref::<Float32Array>())
            .ok_or_else(|| missing_column(DISTANCE_FIELD))?;

        for row in 0..batch.num_rows() {
            if distances.is_null(row) {
                return Err(CpvError::Store(format!("null distance at row {}", row)));
            }
            hits.push(CatalogHit {
                code: codes.value(row).to_string(),
                description: descriptions.value(row).to_string(),
                distance: distances.value(row),
            });
        }
    }

    Ok(hits)
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> CpvResult<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|col| col.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| missing_column(name))
}

fn missing_column(name: &str) -> CpvError {
    CpvError::Store(format!("result batch has no usable '{}' column", name))
}
