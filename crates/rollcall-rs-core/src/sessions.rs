//! In-memory per-user session store.

use crate::record::DraftRecord;
use log::{debug, info};
use parking_lot::Mutex;
use rollcall_rs_protocol::{ChatId, UserId};
use std::collections::HashMap;

/// Where a session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the answer to the step at this cursor.
    InStep(usize),
    /// Sequence complete but the last persist failed; awaiting retry.
    SaveFailed,
}

/// One user's in-progress intake session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Chat replies go to.
    pub chat_id: ChatId,
    /// Current flow position.
    pub phase: SessionPhase,
    /// Answers collected so far.
    pub draft: DraftRecord,
}

/// Session map keyed by user id.
///
/// The dispatch loop handles one update at a time, so no two events for the
/// same user ever race on a session; the lock only guards the map itself.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<UserId, Session>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh session, clearing any previous one for the user.
    pub fn begin(&self, user_id: UserId, chat_id: ChatId, draft: DraftRecord) {
        let session = Session {
            chat_id,
            phase: SessionPhase::InStep(0),
            draft,
        };
        let previous = self.sessions.lock().insert(user_id, session);
        if previous.is_some() {
            info!("restarted session (user_id={})", user_id);
        } else {
            debug!("created session (user_id={})", user_id);
        }
    }

    /// Run a closure against the user's session, if one exists.
    pub fn with_session<R>(
        &self,
        user_id: UserId,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Option<R> {
        self.sessions.lock().get_mut(&user_id).map(f)
    }

    /// Whether the user has an in-progress session.
    pub fn contains(&self, user_id: UserId) -> bool {
        self.sessions.lock().contains_key(&user_id)
    }

    /// Remove and return the user's session.
    pub fn remove(&self, user_id: UserId) -> Option<Session> {
        let removed = self.sessions.lock().remove(&user_id);
        if removed.is_some() {
            debug!("removed session (user_id={})", user_id);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionPhase, SessionStore};
    use crate::record::{DraftRecord, Field};
    use pretty_assertions::assert_eq;

    #[test]
    fn begin_replaces_any_previous_session() {
        let store = SessionStore::new();
        store.begin(1, 10, DraftRecord::new(1, None));
        store
            .with_session(1, |session| {
                session.phase = SessionPhase::InStep(2);
                session.draft.set(Field::School, "Lyceum 1".to_string());
            })
            .expect("session");

        store.begin(1, 10, DraftRecord::new(1, None));
        let (phase, school) = store
            .with_session(1, |session| {
                (session.phase, session.draft.get(Field::School).map(str::to_string))
            })
            .expect("session");
        assert_eq!(phase, SessionPhase::InStep(0));
        assert_eq!(school, None);
    }

    #[test]
    fn remove_ends_the_session() {
        let store = SessionStore::new();
        assert!(store.remove(1).is_none());
        store.begin(1, 10, DraftRecord::new(1, None));
        assert!(store.contains(1));
        assert!(store.remove(1).is_some());
        assert!(!store.contains(1));
    }
}
