use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::agent::ChatAgent;
use crate::core::config::{AppPaths, ConfigService};
use crate::feedback::FeedbackClient;
use crate::llm::gemini::GeminiProvider;
use crate::llm::LlmProvider;
use crate::moderation::ModerationAgent;
use crate::rag::VectorStore;
use crate::tools::search::{SearchProvider, TavilyProvider};

/// Everything the handlers need, constructed once at startup and shared.
/// Pipeline invocations receive their collaborators from here instead of
/// reaching for globals.
#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: ConfigService,
    pub store: Arc<VectorStore>,
    pub chat: Arc<ChatAgent>,
    pub moderation: Arc<ModerationAgent>,
    pub feedback: FeedbackClient,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn initialize() -> anyhow::Result<Arc<Self>> {
        let paths = Arc::new(AppPaths::new());
        let config = ConfigService::new(paths.clone());

        let google_api_key = config
            .google_api_key()
            .context("GOOGLE_API_KEY is not set (env or config.yml)")?;
        let tavily_api_key = config
            .tavily_api_key()
            .context("TAVILY_API_KEY is not set (env or config.yml)")?;

        // The chat agent wants deterministic answers; the moderation
        // classifiers run with a touch of temperature, as tuned originally.
        let chat_llm: Arc<dyn LlmProvider> = Arc::new(GeminiProvider::new(
            google_api_key.clone(),
            config.chat_model(),
            config.embedding_model(),
            0.0,
            4096,
        ));
        let moderation_llm: Arc<dyn LlmProvider> = Arc::new(GeminiProvider::new(
            google_api_key,
            config.chat_model(),
            config.embedding_model(),
            0.1,
            4096,
        ));
        let search: Arc<dyn SearchProvider> = Arc::new(TavilyProvider::new(tavily_api_key));

        let store = Arc::new(VectorStore::new(chat_llm.clone()));
        let chat = Arc::new(ChatAgent::new(chat_llm, store.clone()));
        let moderation = Arc::new(ModerationAgent::new(moderation_llm, search));
        let feedback = FeedbackClient::new(config.feedback_api_base());
        let started_at = Utc::now();

        Ok(Arc::new(AppState {
            paths,
            config,
            store,
            chat,
            moderation,
            feedback,
            started_at,
        }))
    }
}
