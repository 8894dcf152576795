pub mod agent;
pub mod blocklist;
pub mod dispatch;
pub mod prompts;
pub mod verdict;

pub use agent::ModerationAgent;
pub use dispatch::{spawn_moderation, ModerationRequest};
pub use verdict::Verdict;
