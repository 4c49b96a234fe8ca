use async_trait::async_trait;
use chrono::NaiveDate;
use ijp_match::error::AppError;
use ijp_match::workflows::account::{AuthBackend, AuthError};
use ijp_match::workflows::listings::{Listing, ListingSource, SourceError};
use ijp_match::workflows::onboarding::{
    ProfileLanguage, ProfileRole, ProfileStore, ProfileSubmission, ProfileToUpload, StoreError,
    UserId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Case list held in memory, replaceable while the server runs.
#[derive(Default)]
pub(crate) struct InMemoryListingSource {
    cases: RwLock<Vec<Listing>>,
}

impl InMemoryListingSource {
    pub(crate) fn new(cases: Vec<Listing>) -> Self {
        Self {
            cases: RwLock::new(cases),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.cases
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl ListingSource for InMemoryListingSource {
    async fn all_cases(&self) -> Result<Vec<Listing>, SourceError> {
        Ok(self
            .cases
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

/// Profile writes kept in memory. A user can only be written once.
#[derive(Default)]
pub(crate) struct InMemoryProfileStore {
    submissions: Mutex<Vec<ProfileSubmission>>,
}

impl InMemoryProfileStore {
    fn guard(&self) -> MutexGuard<'_, Vec<ProfileSubmission>> {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn submissions(&self) -> Vec<ProfileSubmission> {
        self.guard().clone()
    }

    fn record(&self, submission: ProfileSubmission) -> Result<(), StoreError> {
        let mut guard = self.guard();
        let user_id: UserId = submission.profile.user_id;
        if guard.iter().any(|existing| existing.profile.user_id == user_id) {
            return Err(StoreError::Conflict);
        }
        guard.push(submission);
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn insert_profile(&self, profile: ProfileToUpload) -> Result<(), StoreError> {
        self.record(ProfileSubmission {
            profile,
            languages: Vec::new(),
            roles: Vec::new(),
        })
    }

    async fn create_new_profile(
        &self,
        profile: ProfileToUpload,
        languages: Vec<ProfileLanguage>,
        roles: Vec<ProfileRole>,
    ) -> Result<(), StoreError> {
        self.record(ProfileSubmission {
            profile,
            languages,
            roles,
        })
    }
}

/// Single-account identity backend for local walkthroughs.
pub(crate) struct InMemoryAuthBackend {
    password: Mutex<String>,
    signed_in: AtomicBool,
}

impl InMemoryAuthBackend {
    pub(crate) fn new(password: impl Into<String>) -> Self {
        Self {
            password: Mutex::new(password.into()),
            signed_in: AtomicBool::new(true),
        }
    }

    pub(crate) fn is_signed_in(&self) -> bool {
        self.signed_in.load(std::sync::atomic::Ordering::Acquire)
    }
}

#[async_trait]
impl AuthBackend for InMemoryAuthBackend {
    async fn verify_new_password(&self, candidate: &str) -> Result<bool, AuthError> {
        let current = self.password.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(*current == candidate)
    }

    async fn update_user(&self, password: &str) -> Option<AuthError> {
        let mut current = self.password.lock().unwrap_or_else(PoisonError::into_inner);
        *current = password.to_string();
        None
    }

    async fn sign_out(&self) -> Option<AuthError> {
        self.signed_in
            .store(false, std::sync::atomic::Ordering::Release);
        None
    }
}

/// Read a JSON array of listings from disk.
pub(crate) fn load_cases_file(path: &Path) -> Result<Vec<Listing>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let cases = serde_json::from_str(&raw)?;
    Ok(cases)
}

/// Seed board used when no case file is configured.
pub(crate) fn sample_cases() -> Result<Vec<Listing>, AppError> {
    let cases = serde_json::from_value(json!([
        {
            "id": "5f0c8a52-7c1e-4b8e-9a51-0d7e3c1a0001",
            "title": "Asylum seeker from Honduras needs representation",
            "listing_type": "CASE",
            "is_remote": true,
            "languages": ["Spanish"],
            "adjudicating_agency": "EOIR",
            "country": "Honduras",
            "relief_codes": ["ASY", "WH", "CAT"],
            "hours_per_week": 3,
            "num_weeks": 12,
            "needs_attorney": true,
            "needs_interpreter": true,
            "upcoming_date": "2026-12-03T16:00:00Z"
        },
        {
            "id": "5f0c8a52-7c1e-4b8e-9a51-0d7e3c1a0002",
            "title": "",
            "listing_type": "CASE",
            "is_remote": false,
            "languages": ["Haitian Creole", "French"],
            "adjudicating_agency": "USCIS",
            "country": "Haiti",
            "relief_codes": ["TPS"],
            "hours_per_week": 2,
            "needs_attorney": true,
            "needs_interpreter": false
        },
        {
            "id": "5f0c8a52-7c1e-4b8e-9a51-0d7e3c1a0003",
            "title": "Birth certificate and police record",
            "listing_type": "DOC",
            "languages": ["Portuguese"],
            "num_pages": 4,
            "deadline": "2026-11-14T00:00:00Z"
        },
        {
            "id": "5f0c8a52-7c1e-4b8e-9a51-0d7e3c1a0004",
            "title": "Credible fear interview",
            "listing_type": "INT",
            "is_remote": true,
            "languages": ["Mam", "Spanish", "K'iche'"],
            "upcoming_date": "2026-11-05T14:30:00Z"
        },
        {
            "id": "5f0c8a52-7c1e-4b8e-9a51-0d7e3c1a0005",
            "title": "Declaration review for bond hearing",
            "listing_type": "LCA",
            "country": "Guatemala",
            "deadline": "2026-11-20T00:00:00Z"
        }
    ]))?;
    Ok(cases)
}

/// A `criterion=value` pair from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FilterArg {
    pub(crate) criterion: String,
    pub(crate) value: String,
}

pub(crate) fn parse_filter(raw: &str) -> Result<FilterArg, String> {
    match raw.split_once('=') {
        Some((criterion, value)) if !criterion.trim().is_empty() && !value.trim().is_empty() => {
            Ok(FilterArg {
                criterion: criterion.trim().to_string(),
                value: value.trim().to_string(),
            })
        }
        _ => Err(format!("expected CRITERION=VALUE, found '{raw}'")),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ijp_match::workflows::onboarding::Role;
    use uuid::Uuid;

    fn upload(user_id: UserId) -> ProfileToUpload {
        ProfileToUpload {
            user_id,
            first_name: "Ana".to_string(),
            last_name: "Lucero".to_string(),
            hours_per_month: 10,
            country: "USA".to_string(),
            state: "CA".to_string(),
            city: "Fresno".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 11, 1).expect("valid date"),
            availability_description: None,
            phone_number: "559 555 0142".to_string(),
            has_bar_number: None,
            bar_number: None,
            state_barred: None,
            eoir_registered: None,
            legal_credential_comment: None,
            expected_bar_date: None,
        }
    }

    #[test]
    fn sample_cases_cover_every_listing_type() {
        let cases = sample_cases().expect("sample decodes");
        assert_eq!(cases.len(), 5);
        let source = InMemoryListingSource::new(cases);
        assert_eq!(source.len(), 5);
    }

    #[test]
    fn parse_filter_requires_both_halves() {
        assert_eq!(
            parse_filter("countries = Haiti"),
            Ok(FilterArg {
                criterion: "countries".to_string(),
                value: "Haiti".to_string(),
            })
        );
        assert!(parse_filter("countries").is_err());
        assert!(parse_filter("=Haiti").is_err());
    }

    #[tokio::test]
    async fn profile_store_rejects_second_write_for_user() {
        let store = InMemoryProfileStore::default();
        let user = UserId(Uuid::from_u128(11));
        let roles = vec![ProfileRole {
            user_id: user,
            role: Role::Interpreter,
        }];

        store
            .create_new_profile(upload(user), Vec::new(), roles)
            .await
            .expect("first write");
        let second = store.insert_profile(upload(user)).await;

        assert!(matches!(second, Err(StoreError::Conflict)));
        assert_eq!(store.submissions().len(), 1);
    }

    #[tokio::test]
    async fn auth_backend_tracks_password_and_session() {
        let backend = InMemoryAuthBackend::new("Original#1");
        assert_eq!(backend.verify_new_password("Original#1").await, Ok(true));
        assert!(backend.update_user("Changed#22").await.is_none());
        assert_eq!(backend.verify_new_password("Original#1").await, Ok(false));
        assert!(backend.sign_out().await.is_none());
        assert!(!backend.is_signed_in());
    }
}
