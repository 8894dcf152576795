//! Background execution of the moderation pipeline.
//!
//! The HTTP handler acknowledges the submission and returns before any of
//! this runs. Every failure in here is terminal for the task: the submitter
//! has no open channel left to report into, so errors are logged and the
//! task ends.

use std::sync::Arc;

use crate::feedback::{FeedbackClient, FeedbackUpdate};

use super::agent::ModerationAgent;

/// An accepted moderation submission, as handed over by the API boundary.
/// The credential is forwarded verbatim to the feedback update.
#[derive(Debug, Clone)]
pub struct ModerationRequest {
    pub id: i64,
    pub comment: String,
    pub rating: Option<f64>,
    pub authorization: String,
}

/// Run the pipeline for one submission as a detached task.
pub fn spawn_moderation(
    agent: Arc<ModerationAgent>,
    feedback: FeedbackClient,
    request: ModerationRequest,
) {
    tokio::spawn(async move {
        run_moderation(agent, feedback, request).await;
    });
}

async fn run_moderation(
    agent: Arc<ModerationAgent>,
    feedback: FeedbackClient,
    request: ModerationRequest,
) {
    tracing::info!(id = request.id, "Background moderation started");

    // A pipeline error means no verdict exists; nothing to deliver.
    let verdict = match agent.moderate(&request.comment).await {
        Ok(verdict) => verdict,
        Err(err) => {
            tracing::error!(id = request.id, "Moderation pipeline failed: {}", err);
            return;
        }
    };

    tracing::info!(id = request.id, pass = verdict.pass, "Moderation verdict");

    let update = FeedbackUpdate {
        comment: request.comment,
        rating: request.rating,
        is_blocked: !verdict.pass,
        block_reason: verdict.reason,
    };

    // The verdict exists; at worst its delivery fails. No retry.
    match feedback.update(request.id, &update, &request.authorization).await {
        Ok(()) => tracing::info!(id = request.id, "Feedback record updated"),
        Err(err) => tracing::error!(id = request.id, "Feedback update failed: {}", err),
    }
}
