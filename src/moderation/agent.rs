//! The comment-moderation pipeline.
//!
//! Stages run strictly in order: block-list → triage → research query →
//! web search → final verdict → decode. The block-list and triage stages can
//! short-circuit to a terminal verdict; the search stage is advisory and
//! degrades to a placeholder instead of failing the pipeline.

use std::sync::Arc;

use crate::core::errors::ApiError;
use crate::llm::LlmProvider;
use crate::tools::search::SearchProvider;

use super::blocklist;
use super::prompts;
use super::verdict::{self, Verdict, REGIONAL_BLOCK_REASON, TOXIC_REASON};

/// Result cap for the research search, matching the feed the final
/// classifier was tuned against.
const MAX_SEARCH_RESULTS: usize = 5;

/// Substituted for real research text when the search capability fails.
pub const RESEARCH_UNAVAILABLE: &str = "Không thể tìm kiếm thông tin bổ sung";

/// Triage taxonomy. The classifier is asked for one of three literal tokens;
/// anything else lands in `Unrecognized` and gets the conservative route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Triage {
    Toxic,
    NeedsResearch,
    Safe,
    Unrecognized,
}

impl Triage {
    pub fn from_response(raw: &str) -> Self {
        match raw.trim() {
            "TOXIC" => Triage::Toxic,
            "NEEDS_RESEARCH" => Triage::NeedsResearch,
            "SAFE" => Triage::Safe,
            _ => Triage::Unrecognized,
        }
    }
}

/// Working record threaded through one pipeline execution. Owned by exactly
/// one invocation; at most one of `obviously_toxic` / `needs_research` is set,
/// and once `final_verdict` exists no stage mutates the state again.
#[derive(Debug, Clone)]
pub struct ModerationState {
    pub comment: String,
    pub obviously_toxic: bool,
    pub needs_research: bool,
    pub research_results: String,
    pub final_verdict: Option<Verdict>,
}

impl ModerationState {
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
            obviously_toxic: false,
            needs_research: false,
            research_results: String::new(),
            final_verdict: None,
        }
    }

    fn finish(&mut self, verdict: Verdict) -> Verdict {
        tracing::debug!(
            obviously_toxic = self.obviously_toxic,
            needs_research = self.needs_research,
            "Pipeline reached terminal verdict"
        );
        self.final_verdict = Some(verdict.clone());
        verdict
    }
}

/// Moderation agent: one instance constructed at startup and shared across
/// requests. Holds only capability handles, never per-request state.
pub struct ModerationAgent {
    llm: Arc<dyn LlmProvider>,
    search: Arc<dyn SearchProvider>,
}

impl ModerationAgent {
    pub fn new(llm: Arc<dyn LlmProvider>, search: Arc<dyn SearchProvider>) -> Self {
        Self { llm, search }
    }

    /// Run the full pipeline for one comment.
    ///
    /// Errors out only when a generation capability fails before a verdict
    /// exists; a search failure or an undecodable final judgment still
    /// produces a terminal verdict.
    pub async fn moderate(&self, comment: &str) -> Result<Verdict, ApiError> {
        tracing::info!("Starting moderation");
        let mut state = ModerationState::new(comment);

        // 1. Deterministic block-list override, before any capability call.
        if blocklist::matches_regional_term(&state.comment) {
            tracing::warn!("Regional discrimination term detected");
            state.obviously_toxic = true;
            return Ok(state.finish(Verdict::failed(REGIONAL_BLOCK_REASON)));
        }

        // 2. Triage.
        match self.triage(&state.comment).await? {
            Triage::Safe => {
                tracing::info!("Triage: SAFE");
                return Ok(state.finish(Verdict::passed()));
            }
            Triage::Toxic => {
                tracing::info!("Triage: TOXIC");
                state.obviously_toxic = true;
                return Ok(state.finish(Verdict::failed(TOXIC_REASON)));
            }
            Triage::NeedsResearch => {
                tracing::info!("Triage: NEEDS_RESEARCH");
                state.needs_research = true;
            }
            Triage::Unrecognized => {
                tracing::warn!("Triage output unrecognized; routing to research");
                state.needs_research = true;
            }
        }

        // 3. Build the search query for the ambiguous slang.
        let query = self.build_research_query(&state.comment).await?;
        tracing::info!("Research query: {}", query);

        // 4. Search, at most once. Advisory: failure degrades to a placeholder.
        state.research_results = self.research(&query).await;

        // 5. Final verdict over comment + research, decoded fail-closed.
        let raw = self
            .llm
            .complete(&prompts::final_verdict_prompt(
                &state.comment,
                &state.research_results,
            ))
            .await?;
        let parsed = verdict::parse_verdict(&raw);
        tracing::info!(pass = parsed.pass, "Final verdict");
        Ok(state.finish(parsed))
    }

    async fn triage(&self, comment: &str) -> Result<Triage, ApiError> {
        let raw = self.llm.complete(&prompts::triage_prompt(comment)).await?;
        Ok(Triage::from_response(&raw))
    }

    async fn build_research_query(&self, comment: &str) -> Result<String, ApiError> {
        let raw = self
            .llm
            .complete(&prompts::research_query_prompt(comment))
            .await?;
        let query = raw.trim().to_string();
        if query.is_empty() {
            return Err(ApiError::Internal(
                "research query generation returned empty output".to_string(),
            ));
        }
        Ok(query)
    }

    async fn research(&self, query: &str) -> String {
        match self.search.search(query, MAX_SEARCH_RESULTS).await {
            Ok(results) if !results.is_empty() => results
                .iter()
                .map(|result| result.content.as_str())
                .filter(|content| !content.is_empty())
                .collect::<Vec<_>>()
                .join("\n\n"),
            Ok(_) => {
                tracing::warn!("Search returned no results");
                RESEARCH_UNAVAILABLE.to_string()
            }
            Err(err) => {
                tracing::error!("Search failed: {}", err);
                RESEARCH_UNAVAILABLE.to_string()
            }
        }
    }
}
