use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, error, info};

use super::session::{FlushError, OnboardingSession};
use super::store::ProfileStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushOutcome {
    /// The profile was written.
    Submitted,
    /// A submission was already in flight or done; nothing was written.
    Skipped,
}

/// Owns one onboarding session and submits it to the profile store.
///
/// Session mutations take the lock briefly. The lock is never held across the
/// store call, so concurrent flushes observe the in-flight flag and skip.
pub struct OnboardingController<S> {
    session: Mutex<OnboardingSession>,
    store: Arc<S>,
}

impl<S> OnboardingController<S>
where
    S: ProfileStore,
{
    pub fn new(session: OnboardingSession, store: Arc<S>) -> Self {
        Self {
            session: Mutex::new(session),
            store,
        }
    }

    pub fn with_session<T>(&self, f: impl FnOnce(&mut OnboardingSession) -> T) -> T {
        f(&mut self.lock())
    }

    pub async fn flush(&self) -> Result<FlushOutcome, FlushError> {
        let prepared = self.lock().prepare_submission()?;
        let Some(submission) = prepared else {
            debug!("submission already in flight, skipping flush");
            return Ok(FlushOutcome::Skipped);
        };

        let user_id = submission.profile.user_id;
        let result = self
            .store
            .create_new_profile(submission.profile, submission.languages, submission.roles)
            .await;

        let mut session = self.lock();
        match result {
            Ok(()) => {
                session.complete_submission(true);
                info!(user_id = %user_id, "onboarding profile created");
                Ok(FlushOutcome::Submitted)
            }
            Err(err) => {
                session.complete_submission(false);
                error!(user_id = %user_id, error = %err, "failed to create onboarding profile");
                Err(FlushError::Store(err))
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, OnboardingSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
