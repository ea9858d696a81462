// Embeddings module
// Chunking of knowledge documents and the embedding provider contract

pub mod chunking;
pub mod ollama;

pub use chunking::{Chunks, chunk};
pub use ollama::OllamaClient;

use crate::Result;

/// Text embedding capability. Index-time and query-time embeddings must come
/// from the same provider, or nearest-neighbor distances are meaningless.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts. Returns one fixed-length vector per input,
    /// in input order.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}
