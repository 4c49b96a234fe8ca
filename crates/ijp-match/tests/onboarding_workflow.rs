use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use ijp_match::workflows::onboarding::{
    AttorneyCredentialsValues, AvailabilityValues, BasicInfoValues, Flow, FlushError,
    FlushOutcome, OnboardingController, OnboardingSession, ProfileLanguage, ProfileRole,
    ProfileStore, ProfileToUpload, Role, RoleSet, RolesValues, StepFormState, StoreError, UserId,
};
use uuid::Uuid;

#[derive(Default)]
struct MemoryProfiles {
    written: Mutex<Vec<(ProfileToUpload, Vec<ProfileLanguage>, Vec<ProfileRole>)>>,
}

#[async_trait]
impl ProfileStore for MemoryProfiles {
    async fn insert_profile(&self, profile: ProfileToUpload) -> Result<(), StoreError> {
        self.written
            .lock()
            .expect("lock")
            .push((profile, Vec::new(), Vec::new()));
        Ok(())
    }

    async fn create_new_profile(
        &self,
        profile: ProfileToUpload,
        languages: Vec<ProfileLanguage>,
        roles: Vec<ProfileRole>,
    ) -> Result<(), StoreError> {
        self.written
            .lock()
            .expect("lock")
            .push((profile, languages, roles));
        Ok(())
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

fn basic_info() -> BasicInfoValues {
    BasicInfoValues {
        first_name: "Marisol".to_string(),
        last_name: "Ortega".to_string(),
        country: "USA".to_string(),
        state: "TX".to_string(),
        city: "El Paso".to_string(),
        phone_number: "+1 915 555 0199".to_string(),
        can_read: vec!["Spanish".to_string(), "Portuguese".to_string()],
        can_speak: vec!["Spanish".to_string()],
    }
}

#[tokio::test]
async fn attorney_walks_the_full_flow_and_submits() {
    let store = Arc::new(MemoryProfiles::default());
    let user = UserId(Uuid::from_u128(42));
    let controller = OnboardingController::new(
        OnboardingSession::new(Some(user)),
        Arc::clone(&store),
    );

    controller.with_session(|session| {
        let roles: RoleSet = [Role::Attorney, Role::Interpreter].into_iter().collect();
        let form = StepFormState::<RolesValues>::from_view(&session.view(), today())
            .with_values(RolesValues { roles });
        session.register_form(Box::new(form)).expect("roles step");
        assert_eq!(session.advance().expect("roles valid").url, "basic-information");
        assert_eq!(session.flow(), Flow::Attorney);

        let form = StepFormState::<BasicInfoValues>::from_view(&session.view(), today())
            .with_values(basic_info());
        session.register_form(Box::new(form)).expect("basic info step");
        assert_eq!(session.advance().expect("basic info valid").url, "availability");

        let form = StepFormState::<AvailabilityValues>::from_view(&session.view(), today())
            .with_values(AvailabilityValues {
                hours_per_month: Some(12),
                start_date: Some(today()),
                availability_description: Some("Weekday evenings".to_string()),
            });
        session.register_form(Box::new(form)).expect("availability step");
        assert_eq!(
            session.advance().expect("availability valid").url,
            "legal-credentials"
        );

        let form = StepFormState::<AttorneyCredentialsValues>::from_view(&session.view(), today())
            .with_values(AttorneyCredentialsValues {
                has_bar_number: Some(true),
                bar_number: Some("24601".to_string()),
                state_barred: Some("TX".to_string()),
                eoir_registered: Some(true),
                legal_credential_comment: None,
            });
        session.register_form(Box::new(form)).expect("credentials step");
        assert_eq!(session.advance().expect("credentials valid").url, "review");
        assert_eq!(session.progress(), 4);
    });

    let outcome = controller.flush().await.expect("profile written");
    assert_eq!(outcome, FlushOutcome::Submitted);

    let written = store.written.lock().expect("lock");
    assert_eq!(written.len(), 1);
    let (profile, languages, roles) = &written[0];
    assert_eq!(profile.user_id, user);
    assert_eq!(profile.bar_number.as_deref(), Some("24601"));
    assert_eq!(profile.hours_per_month, 12);
    assert_eq!(
        languages
            .iter()
            .map(|l| (l.language_name.as_str(), l.can_read, l.can_speak))
            .collect::<Vec<_>>(),
        vec![("Spanish", true, true), ("Portuguese", true, false)]
    );
    let roles: Vec<Role> = roles.iter().map(|r| r.role).collect();
    assert_eq!(roles, vec![Role::Attorney, Role::Interpreter]);
}

#[tokio::test]
async fn switching_to_interpreter_drops_attorney_answers_before_submit() {
    let store = Arc::new(MemoryProfiles::default());
    let controller = OnboardingController::new(
        OnboardingSession::new(Some(UserId(Uuid::from_u128(43)))),
        Arc::clone(&store),
    );

    controller.with_session(|session| {
        session
            .change_roles([Role::Attorney].into_iter().collect())
            .expect("roles");
        let form = StepFormState::<BasicInfoValues>::from_view(&session.view(), today())
            .with_values(basic_info());
        session.register_form(Box::new(form)).expect("basic info step");
        session.advance().expect("basic info valid");
        session.update_profile(ijp_match::workflows::onboarding::ProfileDraft {
            hours_per_month: Some(0),
            start_date: Some(today()),
            bar_number: Some("1".to_string()),
            state_barred: Some("TX".to_string()),
            eoir_registered: Some(false),
            ..Default::default()
        });

        let step = session
            .change_roles([Role::Interpreter].into_iter().collect())
            .expect("roles");
        assert_eq!(step.url, "basic-information");
    });

    controller.flush().await.expect("interpreter profile is complete");

    let written = store.written.lock().expect("lock");
    let (profile, _, roles) = &written[0];
    assert_eq!(profile.bar_number, None);
    assert_eq!(profile.state_barred, None);
    assert_eq!(profile.eoir_registered, None);
    assert_eq!(profile.hours_per_month, 0);
    assert_eq!(roles.len(), 1);
}

#[tokio::test]
async fn anonymous_sessions_cannot_submit() {
    let store = Arc::new(MemoryProfiles::default());
    let controller = OnboardingController::new(OnboardingSession::new(None), Arc::clone(&store));

    let err = controller.flush().await.unwrap_err();

    assert!(matches!(err, FlushError::NotLoggedIn));
    assert_eq!(err.to_string(), "Fatal: User is not logged in!");
    assert!(store.written.lock().expect("lock").is_empty());
}
