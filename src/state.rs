// src/state.rs

use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex};

use crate::llm::ChatClient;
use crate::session::SessionRegistry;
use crate::store::RecordStore;

/// Shared handles threaded through every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub sessions: Arc<SessionRegistry>,
    pub chat: Arc<ChatClient>,
    /// Bearer tokens issued by the admin login endpoint.
    pub admin_tokens: Arc<StdMutex<HashSet<String>>>,
    pub admin_password: String,
}

impl AppState {
    pub fn new(store: RecordStore, chat: ChatClient, admin_password: impl Into<String>) -> Self {
        Self {
            store: Arc::new(store),
            sessions: Arc::new(SessionRegistry::new()),
            chat: Arc::new(chat),
            admin_tokens: Arc::new(StdMutex::new(HashSet::new())),
            admin_password: admin_password.into(),
        }
    }
}
