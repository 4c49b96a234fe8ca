use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::controller::{FlushOutcome, OnboardingController};
use super::domain::UserId;
use super::session::{FlushError, OnboardingSession};
use super::store::ProfileStore;

/// Identifier handed to clients for an open onboarding session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Open onboarding sessions, discarded once their profile is written.
pub struct OnboardingRegistry<S> {
    store: Arc<S>,
    sessions: Mutex<HashMap<SessionId, Arc<OnboardingController<S>>>>,
}

impl<S> OnboardingRegistry<S>
where
    S: ProfileStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn open(&self, user_id: Option<UserId>) -> (SessionId, Arc<OnboardingController<S>>) {
        let id = SessionId(Uuid::new_v4());
        let controller = Arc::new(OnboardingController::new(
            OnboardingSession::new(user_id),
            Arc::clone(&self.store),
        ));
        self.sessions().insert(id, Arc::clone(&controller));
        (id, controller)
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<OnboardingController<S>>> {
        self.sessions().get(&id).cloned()
    }

    pub fn discard(&self, id: SessionId) -> bool {
        self.sessions().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flush a session, discarding it once the profile has been written.
    ///
    /// Returns `None` when the session is unknown.
    pub async fn submit(&self, id: SessionId) -> Option<Result<FlushOutcome, FlushError>> {
        let controller = self.get(id)?;
        let outcome = controller.flush().await;
        if matches!(outcome, Ok(FlushOutcome::Submitted)) {
            self.discard(id);
        }
        Some(outcome)
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<SessionId, Arc<OnboardingController<S>>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
