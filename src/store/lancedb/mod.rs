#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, FixedSizeListArray, Float32Array, RecordBatchIterator, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use futures::TryStreamExt;
use lancedb::{
    Connection,
    query::{ExecutableQuery, QueryBase},
};
use tracing::{debug, info};

use super::{IndexEntry, KB_COLLECTION, ScoredChunk, VectorStore};
use crate::{Result, TriageError};

/// LanceDB-backed vector store holding the knowledge base collection.
pub struct LanceStore {
    connection: Connection,
    table_name: String,
}

impl LanceStore {
    /// Open (or create) the store at the given directory.
    #[inline]
    pub async fn open(path: &Path) -> Result<Self> {
        debug!("Initializing LanceDB at path: {:?}", path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TriageError::BackendUnavailable(format!(
                    "Failed to create vector store directory: {}",
                    e
                ))
            })?;
        }

        let uri = format!("file://{}", path.display());
        let connection = lancedb::connect(&uri).execute().await.map_err(|e| {
            TriageError::BackendUnavailable(format!("Failed to connect to LanceDB: {}", e))
        })?;

        info!("Vector store initialized at {:?}", path);
        Ok(Self {
            connection,
            table_name: KB_COLLECTION.to_string(),
        })
    }

    fn schema(vector_dim: usize) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new(
                "vector",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, false)),
                    vector_dim as i32,
                ),
                false,
            ),
            Field::new("content", DataType::Utf8, false),
            Field::new("source", DataType::Utf8, false),
            Field::new("created_at", DataType::Utf8, false),
        ]))
    }

    async fn table_exists(&self) -> Result<bool> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| {
                TriageError::BackendUnavailable(format!("Failed to list collections: {}", e))
            })?;
        Ok(table_names.contains(&self.table_name))
    }

    fn record_batch(entries: &[IndexEntry], vector_dim: usize) -> Result<RecordBatch> {
        let len = entries.len();

        let mut ids = Vec::with_capacity(len);
        let mut contents = Vec::with_capacity(len);
        let mut sources = Vec::with_capacity(len);
        let mut created_ats = Vec::with_capacity(len);
        let mut flat_values = Vec::with_capacity(len * vector_dim);

        for entry in entries {
            if entry.vector.len() != vector_dim {
                return Err(TriageError::Config(format!(
                    "Inconsistent embedding dimensions: expected {}, got {}",
                    vector_dim,
                    entry.vector.len()
                )));
            }
            ids.push(entry.id.as_str());
            contents.push(entry.content.as_str());
            sources.push(entry.source.as_str());
            created_ats.push(entry.created_at.as_str());
            flat_values.extend_from_slice(&entry.vector);
        }

        let values_array = Float32Array::from(flat_values);
        let field = Arc::new(Field::new("item", DataType::Float32, false));
        let vector_array =
            FixedSizeListArray::try_new(field, vector_dim as i32, Arc::new(values_array), None)
                .map_err(|e| {
                    TriageError::BackendUnavailable(format!("Failed to build vector array: {}", e))
                })?;

        let arrays: Vec<Arc<dyn arrow::array::Array>> = vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(vector_array),
            Arc::new(StringArray::from(contents)),
            Arc::new(StringArray::from(sources)),
            Arc::new(StringArray::from(created_ats)),
        ];

        RecordBatch::try_new(Self::schema(vector_dim), arrays).map_err(|e| {
            TriageError::BackendUnavailable(format!("Failed to build record batch: {}", e))
        })
    }

    fn parse_batch(batch: &RecordBatch) -> Result<Vec<ScoredChunk>> {
        let column_as_string = |name: &str| -> Result<&StringArray> {
            batch
                .column_by_name(name)
                .ok_or_else(|| {
                    TriageError::BackendUnavailable(format!("Missing {} column", name))
                })?
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| {
                    TriageError::BackendUnavailable(format!("Invalid {} column type", name))
                })
        };

        let contents = column_as_string("content")?;
        let sources = column_as_string("source")?;

        let distances = batch
            .column_by_name("_distance")
            .map(|col| col.as_any().downcast_ref::<Float32Array>());

        let mut chunks = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            let distance = distances
                .flatten()
                .map_or(0.0, |d| if d.is_null(row) { 0.0 } else { d.value(row) });

            chunks.push(ScoredChunk {
                content: contents.value(row).to_string(),
                source: sources.value(row).to_string(),
                distance,
            });
        }

        Ok(chunks)
    }
}

#[async_trait]
impl VectorStore for LanceStore {
    #[inline]
    async fn upsert(&self, entries: Vec<IndexEntry>) -> Result<()> {
        if entries.is_empty() {
            debug!("No entries to store");
            return Ok(());
        }

        let vector_dim = entries[0].vector.len();
        let batch = Self::record_batch(&entries, vector_dim)?;

        if !self.table_exists().await? {
            debug!(
                "Creating collection '{}' with {} dimensions",
                self.table_name, vector_dim
            );
            self.connection
                .create_empty_table(&self.table_name, Self::schema(vector_dim))
                .execute()
                .await
                .map_err(|e| {
                    TriageError::BackendUnavailable(format!("Failed to create collection: {}", e))
                })?;
        }

        let table = self
            .connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| {
                TriageError::BackendUnavailable(format!("Failed to open collection: {}", e))
            })?;

        let schema = batch.schema();
        let reader = RecordBatchIterator::new(std::iter::once(Ok(batch)), schema);
        table.add(reader).execute().await.map_err(|e| {
            TriageError::BackendUnavailable(format!("Failed to insert entries: {}", e))
        })?;

        info!("Stored {} entries", entries.len());
        Ok(())
    }

    #[inline]
    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        debug!("Searching for nearest chunks with limit: {}", k);

        if !self.table_exists().await? {
            debug!("Collection '{}' does not exist yet", self.table_name);
            return Ok(Vec::new());
        }

        let table = self
            .connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| {
                TriageError::BackendUnavailable(format!("Failed to open collection: {}", e))
            })?;

        let mut results = table
            .vector_search(vector)
            .map_err(|e| {
                TriageError::BackendUnavailable(format!("Failed to create vector search: {}", e))
            })?
            .column("vector")
            .limit(k)
            .execute()
            .await
            .map_err(|e| {
                TriageError::BackendUnavailable(format!("Failed to execute search: {}", e))
            })?;

        let mut chunks = Vec::new();
        while let Some(batch) = results.try_next().await.map_err(|e| {
            TriageError::BackendUnavailable(format!("Failed to read result stream: {}", e))
        })? {
            chunks.extend(Self::parse_batch(&batch)?);
        }

        debug!("Found {} matching chunks", chunks.len());
        Ok(chunks)
    }

    #[inline]
    async fn delete_collection(&self) -> Result<()> {
        if self.table_exists().await? {
            info!("Dropping collection '{}'", self.table_name);
            self.connection
                .drop_table(&self.table_name)
                .await
                .map_err(|e| {
                    TriageError::BackendUnavailable(format!("Failed to drop collection: {}", e))
                })?;
        }

        Ok(())
    }

    #[inline]
    async fn count(&self) -> Result<u64> {
        if !self.table_exists().await? {
            return Ok(0);
        }

        let table = self
            .connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| {
                TriageError::BackendUnavailable(format!("Failed to open collection: {}", e))
            })?;

        let count = table.count_rows(None).await.map_err(|e| {
            TriageError::BackendUnavailable(format!("Failed to count entries: {}", e))
        })?;

        Ok(count as u64)
    }
}
