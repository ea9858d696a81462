// Indexer module
// Turns knowledge documents into embedded chunks persisted in the vector store


use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::Result;
use crate::config::ChunkingConfig;
use crate::embeddings::{EmbeddingProvider, chunk};
use crate::kb::Document;
use crate::store::{IndexEntry, VectorStore};

/// Builds the knowledge base collection from raw documents.
pub struct Indexer {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    chunking: ChunkingConfig,
}

/// Counts reported after an ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSummary {
    pub chunks_indexed: usize,
    pub documents_processed: usize,
}

impl Indexer {
    #[inline]
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        chunking: ChunkingConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            chunking,
        }
    }

    /// Chunk, embed, and persist the given documents.
    ///
    /// This is a full rebuild: an existing collection is dropped before the
    /// new entries are inserted, so repeated runs over the same inputs never
    /// accumulate stale or duplicate chunks. Rebuilding must not run
    /// concurrently with queries against the same collection.
    #[inline]
    pub async fn build(&self, documents: &[Document]) -> Result<IndexSummary> {
        if documents.is_empty() {
            info!("No documents to index");
            return Ok(IndexSummary {
                chunks_indexed: 0,
                documents_processed: 0,
            });
        }

        let mut texts = Vec::new();
        let mut sources = Vec::new();
        for document in documents {
            for window in chunk(
                &document.text,
                self.chunking.window_size,
                self.chunking.overlap,
            )? {
                texts.push(window.to_string());
                sources.push(document.source.clone());
            }
        }

        if texts.is_empty() {
            info!("Documents produced no chunks");
            return Ok(IndexSummary {
                chunks_indexed: 0,
                documents_processed: documents.len(),
            });
        }

        debug!(
            "Embedding {} chunks from {} documents",
            texts.len(),
            documents.len()
        );
        let vectors = self.embedder.embed(&texts)?;

        let created_at = Utc::now().to_rfc3339();
        let entries: Vec<IndexEntry> = texts
            .into_iter()
            .zip(sources)
            .zip(vectors)
            .map(|((content, source), vector)| IndexEntry {
                id: Uuid::new_v4().to_string(),
                vector,
                content,
                source,
                created_at: created_at.clone(),
            })
            .collect();

        // Full replace: drop any existing collection before inserting
        self.store.delete_collection().await?;

        let summary = IndexSummary {
            chunks_indexed: entries.len(),
            documents_processed: documents.len(),
        };
        self.store.upsert(entries).await?;

        info!(
            "Indexed {} chunks from {} documents",
            summary.chunks_indexed, summary.documents_processed
        );
        Ok(summary)
    }
}
