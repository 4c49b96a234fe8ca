use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::workflows::onboarding::domain::{
    ProfileDraft, ProfileLanguage, ProfileRole, ProfileSubmission, ProfileToUpload, Role, RoleSet,
    UserId,
};
use crate::workflows::onboarding::session::OnboardingSession;
use crate::workflows::onboarding::store::{ProfileStore, StoreError};

pub(super) fn user() -> UserId {
    UserId(Uuid::from_u128(7))
}

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date")
}

pub(super) fn roles(list: &[Role]) -> RoleSet {
    list.iter().copied().collect()
}

pub(super) fn basic_profile() -> ProfileDraft {
    ProfileDraft {
        first_name: Some("Ana".to_string()),
        last_name: Some("Reyes".to_string()),
        hours_per_month: Some(10),
        country: Some("USA".to_string()),
        state: Some("CA".to_string()),
        city: Some("Oakland".to_string()),
        start_date: NaiveDate::from_ymd_opt(2026, 4, 1),
        phone_number: Some("5105550100".to_string()),
        ..ProfileDraft::default()
    }
}

pub(super) fn attorney_answers() -> ProfileDraft {
    ProfileDraft {
        has_bar_number: Some(true),
        bar_number: Some("123456".to_string()),
        state_barred: Some("CA".to_string()),
        eoir_registered: Some(true),
        ..ProfileDraft::default()
    }
}

/// A session with every answer an interpreter needs to submit.
pub(super) fn interpreter_session() -> OnboardingSession {
    let mut session = OnboardingSession::new(Some(user()));
    session
        .change_roles(roles(&[Role::Interpreter]))
        .expect("non-empty roles");
    session.update_profile(basic_profile());
    session.set_languages(vec!["Spanish".to_string()], vec!["Spanish".to_string()]);
    session
}

/// An attorney session that has reached the review step.
pub(super) fn attorney_session() -> OnboardingSession {
    let mut session = OnboardingSession::new(Some(user()));
    session
        .change_roles(roles(&[Role::Attorney, Role::Interpreter]))
        .expect("non-empty roles");
    session.update_profile(basic_profile());
    session.update_profile(attorney_answers());
    session.set_languages(vec!["Spanish".to_string()], Vec::new());
    session
}

#[derive(Default)]
pub(super) struct RecordingStore {
    pub(super) submissions: Mutex<Vec<ProfileSubmission>>,
    pub(super) profiles: Mutex<Vec<ProfileToUpload>>,
}

impl RecordingStore {
    pub(super) fn submissions(&self) -> Vec<ProfileSubmission> {
        self.submissions.lock().expect("lock").clone()
    }
}

#[async_trait]
impl ProfileStore for RecordingStore {
    async fn insert_profile(&self, profile: ProfileToUpload) -> Result<(), StoreError> {
        self.profiles.lock().expect("lock").push(profile);
        Ok(())
    }

    async fn create_new_profile(
        &self,
        profile: ProfileToUpload,
        languages: Vec<ProfileLanguage>,
        roles: Vec<ProfileRole>,
    ) -> Result<(), StoreError> {
        self.submissions.lock().expect("lock").push(ProfileSubmission {
            profile,
            languages,
            roles,
        });
        Ok(())
    }
}

/// Fails the first `failures` writes, then records like [`RecordingStore`].
#[derive(Default)]
pub(super) struct FlakyStore {
    pub(super) failures: AtomicUsize,
    pub(super) inner: RecordingStore,
}

impl FlakyStore {
    pub(super) fn failing(failures: usize) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
            inner: RecordingStore::default(),
        }
    }
}

#[async_trait]
impl ProfileStore for FlakyStore {
    async fn insert_profile(&self, profile: ProfileToUpload) -> Result<(), StoreError> {
        self.inner.insert_profile(profile).await
    }

    async fn create_new_profile(
        &self,
        profile: ProfileToUpload,
        languages: Vec<ProfileLanguage>,
        roles: Vec<ProfileRole>,
    ) -> Result<(), StoreError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Unavailable("connection reset".to_string()));
        }
        self.inner
            .create_new_profile(profile, languages, roles)
            .await
    }
}

/// Blocks each write until released, so tests can act while a flush is in flight.
#[derive(Default)]
pub(super) struct GatedStore {
    pub(super) entered: Notify,
    pub(super) release: Notify,
    pub(super) calls: AtomicUsize,
}

#[async_trait]
impl ProfileStore for GatedStore {
    async fn insert_profile(&self, _profile: ProfileToUpload) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_new_profile(
        &self,
        _profile: ProfileToUpload,
        _languages: Vec<ProfileLanguage>,
        _roles: Vec<ProfileRole>,
    ) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
