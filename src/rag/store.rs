use std::cmp::Ordering;
use std::sync::{Arc, RwLock};

use crate::core::errors::ApiError;
use crate::llm::LlmProvider;

/// One retrievable piece of catalog text and the document it came from.
#[derive(Debug, Clone)]
pub struct DocumentChunk {
    pub content: String,
    pub source: String,
}

struct StoredChunk {
    chunk: DocumentChunk,
    embedding: Vec<f32>,
}

/// In-memory vector store over the catalog. Rebuilt from the data directory
/// at startup; nothing is persisted.
pub struct VectorStore {
    llm: Arc<dyn LlmProvider>,
    entries: RwLock<Vec<StoredChunk>>,
}

impl VectorStore {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            llm,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Embed and index a batch of chunks. Returns how many were added.
    pub async fn add_documents(&self, chunks: Vec<DocumentChunk>) -> Result<usize, ApiError> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let inputs: Vec<String> = chunks.iter().map(|chunk| chunk.content.clone()).collect();
        let embeddings = self.llm.embed(&inputs).await?;
        if embeddings.len() != chunks.len() {
            return Err(ApiError::Internal(format!(
                "embedding count mismatch: {} != {}",
                embeddings.len(),
                chunks.len()
            )));
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|_| ApiError::Internal("vector store lock poisoned".to_string()))?;
        for (chunk, embedding) in chunks.into_iter().zip(embeddings) {
            entries.push(StoredChunk { chunk, embedding });
        }

        Ok(entries.len())
    }

    /// Top-k chunks by cosine similarity to the query, best first.
    pub async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<DocumentChunk>, ApiError> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self
            .llm
            .embed(&[query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Internal("query embedding missing".to_string()))?;

        let entries = self
            .entries
            .read()
            .map_err(|_| ApiError::Internal("vector store lock poisoned".to_string()))?;

        let mut scored: Vec<(usize, f32)> = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (idx, cosine_similarity(&query_embedding, &entry.embedding)))
            .collect();
        scored.sort_by(|left, right| right.1.partial_cmp(&left.1).unwrap_or(Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(idx, _)| entries[idx].chunk.clone())
            .collect())
    }
}

pub fn cosine_similarity(query: &[f32], candidate: &[f32]) -> f32 {
    if query.is_empty() || query.len() != candidate.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut query_norm = 0.0f32;
    let mut candidate_norm = 0.0f32;
    for (a, b) in query.iter().zip(candidate) {
        dot += a * b;
        query_norm += a * a;
        candidate_norm += b * b;
    }

    let denom = query_norm.sqrt() * candidate_norm.sqrt();
    if denom <= f32::EPSILON {
        return 0.0;
    }

    dot / denom
}
