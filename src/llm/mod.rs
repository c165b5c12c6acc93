// src/llm/mod.rs

pub mod sse;
pub mod stream;
pub mod types;

pub use stream::{ChatClient, StreamSignal};
pub use types::{ChatMessage, MessageContent, Role};
