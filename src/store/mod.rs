// Vector store module
// Persistence and nearest-neighbor search for embedded knowledge chunks

pub mod lancedb;

pub use lancedb::LanceStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Name of the single collection holding all indexed knowledge chunks.
pub const KB_COLLECTION: &str = "kb";

/// One chunk as persisted in the vector store. Committed atomically as a
/// single record; ids are unique within the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Unique identifier for this chunk
    pub id: String,
    /// The embedding vector
    pub vector: Vec<f32>,
    /// The chunk text
    pub content: String,
    /// Source identifier of the parent document (file name)
    pub source: String,
    /// Timestamp when this entry was created
    pub created_at: String,
}

/// One ranked match from a nearest-neighbor query.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub content: String,
    pub source: String,
    /// Distance reported by the store; smaller is nearer
    pub distance: f32,
}

/// Nearest-neighbor storage capability over one named collection.
///
/// Implementations persist entries durably; a rebuild
/// (`delete_collection` followed by `upsert`) requires exclusive access to
/// the collection and must not run concurrently with queries against it.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert entries into the collection, creating it if absent.
    async fn upsert(&self, entries: Vec<IndexEntry>) -> Result<()>;

    /// Return up to `k` entries nearest to `vector`, nearest first.
    /// A missing or empty collection yields an empty result, not an error.
    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredChunk>>;

    /// Drop the collection if it exists.
    async fn delete_collection(&self) -> Result<()>;

    /// Number of entries currently stored; zero when the collection is absent.
    async fn count(&self) -> Result<u64>;
}
