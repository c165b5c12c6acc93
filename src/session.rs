// src/session.rs
// In-memory session registry. Each browser session owns one conversation;
// at most one recommendation round may be in flight per session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::chat::Conversation;
use crate::error::{AcError, Result};

/// Claim ticket handed out by `begin_round`; releases the exact round it
/// was issued for, never a successor.
pub struct RoundGuard {
    pub token: CancellationToken,
    generation: u64,
}

pub struct Session {
    pub id: String,
    pub conversation: Arc<Mutex<Conversation>>,
    in_flight: StdMutex<Option<(u64, CancellationToken)>>,
    generations: StdMutex<u64>,
}

impl Session {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4().to_string(),
            conversation: Arc::new(Mutex::new(Conversation::new())),
            in_flight: StdMutex::new(None),
            generations: StdMutex::new(0),
        })
    }

    /// Claim the session for a round. Fails while another round is live.
    pub fn begin_round(&self) -> Result<RoundGuard> {
        let mut slot = self.in_flight.lock().unwrap();
        if let Some((_, token)) = slot.as_ref() {
            if !token.is_cancelled() {
                return Err(AcError::RoundInProgress);
            }
        }
        let mut generations = self.generations.lock().unwrap();
        *generations += 1;
        let token = CancellationToken::new();
        *slot = Some((*generations, token.clone()));
        Ok(RoundGuard {
            token,
            generation: *generations,
        })
    }

    /// Release the claim taken by `begin_round`. A later claim is left
    /// untouched.
    pub fn finish_round(&self, guard: &RoundGuard) {
        let mut slot = self.in_flight.lock().unwrap();
        if slot.as_ref().is_some_and(|(g, _)| *g == guard.generation) {
            *slot = None;
        }
    }

    /// Cancel the in-flight round, if any. Returns whether one was live.
    pub fn abort_round(&self) -> bool {
        let mut slot = self.in_flight.lock().unwrap();
        match slot.take() {
            Some((_, token)) if !token.is_cancelled() => {
                token.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn round_in_flight(&self) -> bool {
        self.in_flight
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|(_, t)| !t.is_cancelled())
    }
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: StdMutex<HashMap<String, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> Arc<Session> {
        let session = Session::new();
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        session
    }

    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.lock().unwrap().get(id).cloned()
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sessions.lock().unwrap().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_create_and_lookup() {
        let registry = SessionRegistry::new();
        let session = registry.create();
        assert!(registry.get(&session.id).is_some());
        assert!(registry.get("nope").is_none());
        assert!(registry.remove(&session.id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_single_round_per_session() {
        let registry = SessionRegistry::new();
        let session = registry.create();

        let guard = session.begin_round().unwrap();
        assert!(matches!(
            session.begin_round(),
            Err(AcError::RoundInProgress)
        ));

        session.finish_round(&guard);
        assert!(!session.round_in_flight());
        session.begin_round().unwrap();
    }

    #[test]
    fn test_abort_cancels_and_frees_the_slot() {
        let registry = SessionRegistry::new();
        let session = registry.create();

        let guard = session.begin_round().unwrap();
        assert!(session.abort_round());
        assert!(guard.token.is_cancelled());
        assert!(!session.abort_round());

        // The slot is free again for the next round, and the stale guard
        // cannot release the new claim.
        let new_guard = session.begin_round().unwrap();
        session.finish_round(&guard);
        assert!(session.round_in_flight());
        session.finish_round(&new_guard);
        assert!(!session.round_in_flight());
    }
}
