// Retriever module
// Embeds a query and fetches the nearest knowledge chunks with provenance


use std::sync::Arc;

use tracing::debug;

use crate::embeddings::EmbeddingProvider;
use crate::store::VectorStore;
use crate::{Result, TriageError};

/// One retrieved knowledge passage with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    pub text: String,
    pub source: String,
}

/// Nearest-neighbor search over the knowledge base collection.
///
/// The embedder must be the same provider used at index time; querying a
/// collection built in a different embedding space returns meaningless
/// rankings.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

impl Retriever {
    #[inline]
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// Return up to `k` snippets nearest to `query`, nearest first.
    ///
    /// An empty result is a valid outcome (nothing indexed, or nothing
    /// close); an unreachable embedding provider or store surfaces as
    /// [`TriageError::BackendUnavailable`] instead.
    #[inline]
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<Snippet>> {
        let vectors = self.embedder.embed(&[query.to_string()])?;
        let vector = vectors.first().ok_or_else(|| {
            TriageError::BackendUnavailable(
                "Embedding provider returned no vector for the query".to_string(),
            )
        })?;

        let matches = self.store.query(vector, k).await?;
        debug!("Retrieved {} snippets for query", matches.len());

        Ok(matches
            .into_iter()
            .map(|m| Snippet {
                text: m.content,
                source: m.source,
            })
            .collect())
    }
}
