//! The product Q&A agent: retrieval-augmented answering with per-session
//! conversation history.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::core::errors::ApiError;
use crate::llm::{ChatMessage, LlmProvider};
use crate::rag::{retriever, VectorStore};

use super::prompts;
use super::response::{self, ChatbotResponse};

const DEFAULT_SESSION: &str = "default-user";

/// How many prior turns are replayed into the prompt.
const HISTORY_LIMIT: usize = 20;

struct ChatThread {
    #[allow(dead_code)]
    thread_id: String,
    history: Vec<ChatMessage>,
}

impl ChatThread {
    fn new() -> Self {
        Self {
            thread_id: format!("thread-{}", uuid::Uuid::new_v4()),
            history: Vec::new(),
        }
    }
}

pub struct ChatOutcome {
    pub response: ChatbotResponse,
    pub session_id: String,
    pub processing_time_ms: u128,
    pub status: &'static str,
}

/// One agent instance shared across requests; per-session state lives in the
/// thread map, keyed by the caller-supplied session id.
pub struct ChatAgent {
    llm: Arc<dyn LlmProvider>,
    store: Arc<VectorStore>,
    threads: Mutex<HashMap<String, ChatThread>>,
}

impl ChatAgent {
    pub fn new(llm: Arc<dyn LlmProvider>, store: Arc<VectorStore>) -> Self {
        Self {
            llm,
            store,
            threads: Mutex::new(HashMap::new()),
        }
    }

    pub async fn chat(
        &self,
        session_id: Option<&str>,
        message: &str,
    ) -> Result<ChatOutcome, ApiError> {
        let started = Instant::now();
        let session_id = session_id.unwrap_or(DEFAULT_SESSION).to_string();
        tracing::info!("Handling chat message for session '{}'", session_id);

        let history = self.history_snapshot(&session_id)?;

        // Retrieval-augmented context; the catalog may legitimately be empty.
        let retrieval = retriever::retrieve(&self.store, message).await?;
        let status = if retrieval.matched {
            "retrieving"
        } else {
            "complete"
        };

        let system = prompts::system_prompt(&retrieval.context);
        let prompt = prompts::render_conversation(&system, &history, message);

        let raw = self.llm.complete(&prompt).await?;
        let response = match response::extract_structured_response(&raw) {
            Some(response) => response,
            None => {
                tracing::error!("Failed to parse chat model output; sending fallback");
                ChatbotResponse::fallback()
            }
        };

        self.append_turn(&session_id, message, &response.answer)?;

        Ok(ChatOutcome {
            response,
            session_id,
            processing_time_ms: started.elapsed().as_millis(),
            status,
        })
    }

    fn history_snapshot(&self, session_id: &str) -> Result<Vec<ChatMessage>, ApiError> {
        let mut threads = self
            .threads
            .lock()
            .map_err(|_| ApiError::Internal("chat thread map poisoned".to_string()))?;
        let thread = threads
            .entry(session_id.to_string())
            .or_insert_with(ChatThread::new);

        let skip = thread.history.len().saturating_sub(HISTORY_LIMIT);
        Ok(thread.history[skip..].to_vec())
    }

    fn append_turn(
        &self,
        session_id: &str,
        message: &str,
        answer: &str,
    ) -> Result<(), ApiError> {
        let mut threads = self
            .threads
            .lock()
            .map_err(|_| ApiError::Internal("chat thread map poisoned".to_string()))?;
        if let Some(thread) = threads.get_mut(session_id) {
            thread.history.push(ChatMessage::new("user", message));
            thread.history.push(ChatMessage::new("assistant", answer));
        }
        Ok(())
    }
}
