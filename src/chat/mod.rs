// src/chat/mod.rs

pub mod conversation;
pub mod prompt;
pub mod versions;

pub use conversation::{drive_round, ChatEvent, Conversation, Round};
pub use prompt::RecommendationParams;
pub use versions::{RecommendationVersion, VersionStore};
