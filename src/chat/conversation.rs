// src/chat/conversation.rs
// Chat history plus the two round operations (initial recommendation,
// feedback continuation) layered over the streaming client.

use std::sync::Arc;

use futures::{pin_mut, Stream, StreamExt};
use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::chat::prompt::{build_user_prompt, RecommendationParams, SYSTEM_PROMPT};
use crate::chat::versions::VersionStore;
use crate::error::{AcError, Result};
use crate::llm::{ChatClient, ChatMessage, Role, StreamSignal};

/// Presentation-facing round events, serialized onto the outbound SSE leg.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    Update { version_id: i64, content: String },
    Complete { version_id: i64 },
    Error { version_id: i64, message: String },
    Aborted { version_id: i64 },
}

/// Everything a round needs in flight, captured at round start. The version
/// id is fixed here so a stale round can never write into a newer version.
#[derive(Debug)]
pub struct Round {
    pub version_id: i64,
    pub messages: Vec<ChatMessage>,
    user_turn: ChatMessage,
}

/// Owned conversation state: ordered user/assistant history and the version
/// list. One instance per browser session, mutated only through these
/// methods.
#[derive(Debug, Default)]
pub struct Conversation {
    history: Vec<ChatMessage>,
    pub versions: VersionStore,
    round_counter: u32,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Discard all state (new floor-plan upload).
    pub fn reset(&mut self) {
        self.history.clear();
        self.versions.reset();
        self.round_counter = 0;
    }

    /// Validate and stage the initial round. Clears prior versions and
    /// history; the turns are appended only once the round completes.
    pub fn prepare_initial(
        &mut self,
        params: &RecommendationParams,
        image_data_url: &str,
        knowledge_base: &str,
    ) -> Result<Round> {
        if image_data_url.is_empty() {
            return Err(AcError::InvalidInput(
                "please upload a floor plan first".to_string(),
            ));
        }

        self.reset();
        self.round_counter = 1;
        let version_id = self.versions.add_version("Initial plan", None);

        let user_turn =
            ChatMessage::user_with_image(build_user_prompt(params, knowledge_base), image_data_url);
        let messages = vec![
            ChatMessage::text(Role::System, SYSTEM_PROMPT),
            user_turn.clone(),
        ];

        Ok(Round {
            version_id,
            messages,
            user_turn,
        })
    }

    /// Validate and stage a continuation round. The request carries a copy
    /// of the history plus the feedback turn; the authoritative history is
    /// only extended on success.
    pub fn prepare_continuation(&mut self, feedback: &str) -> Result<Round> {
        let feedback = feedback.trim();
        if feedback.is_empty() {
            return Err(AcError::InvalidInput("feedback text is empty".to_string()));
        }
        if self.history.is_empty() {
            return Err(AcError::InvalidInput(
                "must generate an initial recommendation first".to_string(),
            ));
        }

        self.round_counter += 1;
        let version_id = self.versions.add_version(
            format!("Revision {}", self.round_counter),
            Some(feedback.to_string()),
        );

        let user_turn = ChatMessage::text(Role::User, feedback);
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage::text(Role::System, SYSTEM_PROMPT));
        messages.extend(self.history.iter().cloned());
        messages.push(user_turn.clone());

        Ok(Round {
            version_id,
            messages,
            user_turn,
        })
    }

    /// Append the completed round's turns, enabling continuation.
    fn commit_round(&mut self, user_turn: ChatMessage, assistant_text: String) {
        self.history.push(user_turn);
        self.history
            .push(ChatMessage::text(Role::Assistant, assistant_text));
    }
}

/// Drive one round: issue the request and route stream signals into the
/// conversation and out to the presentation channel.
pub async fn drive_round(
    client: &ChatClient,
    conversation: Arc<Mutex<Conversation>>,
    round: Round,
    cancel: CancellationToken,
    tx: mpsc::Sender<ChatEvent>,
) {
    let stream = client.stream_chat(round.messages.clone(), cancel);
    consume_round(stream, conversation, round, tx).await;
}

/// Stream-consuming half of `drive_round`, factored out so tests can feed a
/// synthetic signal sequence. Updates mutate only the round's own version id
/// and are dropped when that id no longer resolves (reset mid-stream);
/// history is committed only on completion of a still-live round.
pub async fn consume_round(
    stream: impl Stream<Item = StreamSignal>,
    conversation: Arc<Mutex<Conversation>>,
    round: Round,
    tx: mpsc::Sender<ChatEvent>,
) {
    let Round {
        version_id,
        user_turn,
        ..
    } = round;
    let mut final_text = String::new();

    pin_mut!(stream);
    while let Some(signal) = stream.next().await {
        match signal {
            StreamSignal::Update(content) => {
                let live = conversation
                    .lock()
                    .await
                    .versions
                    .update_content(version_id, content.clone());
                if !live {
                    debug!(version_id, "dropping update for stale round");
                    continue;
                }
                final_text = content.clone();
                let _ = tx.send(ChatEvent::Update {
                    version_id,
                    content,
                }).await;
            }
            StreamSignal::Complete => {
                {
                    let mut convo = conversation.lock().await;
                    if convo.versions.get(version_id).is_some() {
                        convo.commit_round(user_turn, final_text);
                    } else {
                        debug!(version_id, "round completed after reset; history unchanged");
                    }
                }
                let _ = tx.send(ChatEvent::Complete { version_id }).await;
                return;
            }
            StreamSignal::Error(message) => {
                let _ = tx.send(ChatEvent::Error {
                    version_id,
                    message,
                }).await;
                return;
            }
            StreamSignal::Aborted => {
                let _ = tx.send(ChatEvent::Aborted { version_id }).await;
                return;
            }
        }
    }
}
