use serde::Serialize;
use tracing::{debug, info};

use super::domain::{
    ProfileDraft, ProfileField, ProfileLanguage, ProfilePatch, ProfileRole, ProfileSubmission,
    ProfileToUpload, Role, RoleSet, UserId, ATTORNEY_FIELDS, LEGAL_FELLOW_FIELDS,
};
use super::flow::{Flow, FlowStep, CREDENTIALS_INDEX};
use super::steps::{StepForm, StepValidationError};
use super::store::StoreError;

/// Errors raised while moving between steps.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("already at the last step")]
    AtLastStep,
    #[error("already at the first step")]
    AtFirstStep,
    #[error("no form registered for the current step")]
    NoStepRegistered,
    #[error("form for '{found}' cannot be registered on step '{expected}'")]
    StepMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("step {0} has not been reached yet")]
    StepLocked(usize),
    #[error("at least one role must be selected")]
    NoRolesSelected,
    #[error(transparent)]
    Validation(#[from] StepValidationError),
}

/// Errors raised by submission, checked in declaration order.
#[derive(Debug, thiserror::Error)]
pub enum FlushError {
    #[error("Fatal: User is not logged in!")]
    NotLoggedIn,
    #[error("First name is required!")]
    FirstNameRequired,
    #[error("Last name is required!")]
    LastNameRequired,
    #[error("Hours per month is required!")]
    HoursPerMonthRequired,
    #[error("Country is required!")]
    CountryRequired,
    #[error("State is required!")]
    StateRequired,
    #[error("City is required!")]
    CityRequired,
    #[error("Start date is required!")]
    StartDateRequired,
    #[error("Phone number is required!")]
    PhoneNumberRequired,
    #[error("Error: could not determine role!")]
    RoleUndetermined,
    #[error("Bar number is required!")]
    BarNumberRequired,
    #[error("Comment is required in the absence of bar number!")]
    CommentRequired,
    #[error("State barred is required!")]
    StateBarredRequired,
    #[error("EOIR registered is required!")]
    EoirRegisteredRequired,
    #[error("Expected bar date is required!")]
    ExpectedBarDateRequired,
    #[error("Languages are required!")]
    LanguagesRequired,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl FlushError {
    /// True for failures caused by missing answers rather than the backend.
    pub fn is_precondition(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    InFlight,
    Completed,
}

/// Read-only projection handed to step forms.
#[derive(Debug, Clone, Copy)]
pub struct OnboardingView<'a> {
    pub profile: &'a ProfileDraft,
    pub roles: &'a RoleSet,
    pub can_read: &'a [String],
    pub can_speak: &'a [String],
    pub flow: Flow,
    pub progress: usize,
    pub current: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormStatus {
    pub step: &'static str,
    pub is_dirty: bool,
    pub is_valid: bool,
}

/// Owned, serializable copy of the session state.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub user_id: Option<UserId>,
    pub flow: Flow,
    pub steps: &'static [FlowStep],
    pub current: usize,
    pub current_step: &'static FlowStep,
    pub progress: usize,
    pub profile: ProfileDraft,
    pub roles: RoleSet,
    pub can_read: Vec<String>,
    pub can_speak: Vec<String>,
    pub form: Option<FormStatus>,
    pub submission: SubmissionState,
}

/// Everything one volunteer has answered during onboarding.
///
/// `current` is the step being shown; `progress` is the furthest step
/// reached, which bounds where [`OnboardingSession::jump_to`] may go.
#[derive(Debug)]
pub struct OnboardingSession {
    user_id: Option<UserId>,
    flow: Flow,
    current: usize,
    progress: usize,
    profile: ProfileDraft,
    roles: RoleSet,
    can_read: Vec<String>,
    can_speak: Vec<String>,
    form: Option<Box<dyn StepForm>>,
    submission: SubmissionState,
}

impl OnboardingSession {
    pub fn new(user_id: Option<UserId>) -> Self {
        let roles = RoleSet::new();
        Self {
            user_id,
            flow: Flow::for_roles(&roles),
            current: 0,
            progress: 0,
            profile: ProfileDraft::default(),
            roles,
            can_read: Vec::new(),
            can_speak: Vec::new(),
            form: None,
            submission: SubmissionState::Idle,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn set_user(&mut self, user_id: Option<UserId>) {
        self.user_id = user_id;
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> &'static FlowStep {
        // `current` never exceeds the flow's last index.
        &self.flow.steps()[self.current]
    }

    pub fn progress(&self) -> usize {
        self.progress
    }

    pub fn profile(&self) -> &ProfileDraft {
        &self.profile
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    pub fn submission(&self) -> SubmissionState {
        self.submission
    }

    pub fn view(&self) -> OnboardingView<'_> {
        OnboardingView {
            profile: &self.profile,
            roles: &self.roles,
            can_read: &self.can_read,
            can_speak: &self.can_speak,
            flow: self.flow,
            progress: self.progress,
            current: self.current,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user_id: self.user_id,
            flow: self.flow,
            steps: self.flow.steps(),
            current: self.current,
            current_step: self.current_step(),
            progress: self.progress,
            profile: self.profile.clone(),
            roles: self.roles.clone(),
            can_read: self.can_read.clone(),
            can_speak: self.can_speak.clone(),
            form: self.form_status(),
            submission: self.submission,
        }
    }

    pub fn update_profile(&mut self, update: ProfileDraft) {
        self.profile.merge(update);
    }

    pub fn remove_from_profile<I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = ProfileField>,
    {
        self.profile.unset_all(fields);
    }

    pub fn set_languages(&mut self, can_read: Vec<String>, can_speak: Vec<String>) {
        self.can_read = can_read;
        self.can_speak = can_speak;
    }

    /// Apply a client patch: clears first, then sets, then languages.
    pub fn apply_patch(&mut self, patch: ProfilePatch) {
        self.remove_from_profile(patch.unset);
        self.update_profile(patch.set);
        if let Some(can_read) = patch.can_read {
            self.can_read = can_read;
        }
        if let Some(can_speak) = patch.can_speak {
            self.can_speak = can_speak;
        }
    }

    /// Switch to a new role set, dropping answers that only applied to roles
    /// being given up, and land on the step after the roles page.
    pub fn change_roles(&mut self, roles: RoleSet) -> Result<&'static FlowStep, NavigationError> {
        if roles.is_empty() {
            return Err(NavigationError::NoRolesSelected);
        }

        if self.roles.contains(&Role::Attorney) && !roles.contains(&Role::Attorney) {
            self.profile.unset_all(ATTORNEY_FIELDS);
            self.progress = self.progress.min(CREDENTIALS_INDEX);
        }
        if self.roles.contains(&Role::LegalFellow) && !roles.contains(&Role::LegalFellow) {
            self.profile.unset_all(LEGAL_FELLOW_FIELDS);
            self.progress = self.progress.min(CREDENTIALS_INDEX);
        }

        self.flow = Flow::for_roles(&roles);
        self.roles = roles;
        self.form = None;
        self.current = 1;
        self.progress = self.progress.max(self.current).min(self.flow.last_index());
        debug!(flow = ?self.flow, progress = self.progress, "roles changed");
        Ok(self.current_step())
    }

    /// Register the form for the step currently shown, replacing any earlier one.
    pub fn register_form(&mut self, form: Box<dyn StepForm>) -> Result<(), NavigationError> {
        let expected = self.current_step().url;
        let found = form.step();
        if expected != found {
            return Err(NavigationError::StepMismatch { expected, found });
        }
        self.form = Some(form);
        Ok(())
    }

    pub fn clear_form(&mut self) {
        self.form = None;
    }

    pub fn form_status(&self) -> Option<FormStatus> {
        self.form.as_ref().map(|form| FormStatus {
            step: form.step(),
            is_dirty: form.is_dirty(),
            is_valid: form.is_valid(),
        })
    }

    /// Run the registered form's trigger and move forward when it succeeds.
    ///
    /// A failed trigger keeps the form registered and the step unchanged.
    pub fn advance(&mut self) -> Result<&'static FlowStep, NavigationError> {
        if self.current >= self.flow.last_index() {
            return Err(NavigationError::AtLastStep);
        }
        let mut form = self.form.take().ok_or(NavigationError::NoStepRegistered)?;

        let before = self.current;
        if let Err(err) = form.trigger(self) {
            if self.current == before {
                self.form = Some(form);
            }
            return Err(err.into());
        }

        if self.current == before {
            self.current += 1;
        }
        self.progress = self.progress.max(self.current);
        Ok(self.current_step())
    }

    /// Go back one step. Nothing is validated and unsaved form values are dropped.
    pub fn back(&mut self) -> Result<&'static FlowStep, NavigationError> {
        if self.current == 0 {
            return Err(NavigationError::AtFirstStep);
        }
        self.form = None;
        self.current -= 1;
        Ok(self.current_step())
    }

    /// Jump to any step already reached.
    pub fn jump_to(&mut self, index: usize) -> Result<&'static FlowStep, NavigationError> {
        if index > self.progress || index > self.flow.last_index() {
            return Err(NavigationError::StepLocked(index));
        }
        if index != self.current {
            self.form = None;
            self.current = index;
        }
        Ok(self.current_step())
    }

    /// Check the draft and build the submission payload, marking it in flight.
    ///
    /// Returns `Ok(None)` while a submission is in flight or already done.
    pub fn prepare_submission(&mut self) -> Result<Option<ProfileSubmission>, FlushError> {
        if self.submission != SubmissionState::Idle {
            return Ok(None);
        }

        let user_id = self.user_id.ok_or(FlushError::NotLoggedIn)?;
        let profile = &self.profile;

        let first_name = required_text(&profile.first_name, FlushError::FirstNameRequired)?;
        let last_name = required_text(&profile.last_name, FlushError::LastNameRequired)?;
        let hours_per_month = profile
            .hours_per_month
            .ok_or(FlushError::HoursPerMonthRequired)?;
        let country = required_text(&profile.country, FlushError::CountryRequired)?;
        let state = required_text(&profile.state, FlushError::StateRequired)?;
        let city = required_text(&profile.city, FlushError::CityRequired)?;
        let start_date = profile.start_date.ok_or(FlushError::StartDateRequired)?;
        let phone_number = required_text(&profile.phone_number, FlushError::PhoneNumberRequired)?;

        if self.roles.is_empty() {
            return Err(FlushError::RoleUndetermined);
        }

        if self.roles.contains(&Role::Attorney) {
            if profile.has_bar_number == Some(true) {
                required_text(&profile.bar_number, FlushError::BarNumberRequired)?;
            } else {
                required_text(&profile.legal_credential_comment, FlushError::CommentRequired)?;
            }
            required_text(&profile.state_barred, FlushError::StateBarredRequired)?;
            if profile.eoir_registered.is_none() {
                return Err(FlushError::EoirRegisteredRequired);
            }
        }

        if self.roles.contains(&Role::LegalFellow) {
            if profile.expected_bar_date.is_none() {
                return Err(FlushError::ExpectedBarDateRequired);
            }
            if profile.eoir_registered.is_none() {
                return Err(FlushError::EoirRegisteredRequired);
            }
        }

        if self.can_read.is_empty() && self.can_speak.is_empty() {
            return Err(FlushError::LanguagesRequired);
        }

        let upload = ProfileToUpload {
            user_id,
            first_name,
            last_name,
            hours_per_month,
            country,
            state,
            city,
            start_date,
            availability_description: profile.availability_description.clone(),
            phone_number,
            has_bar_number: profile.has_bar_number,
            bar_number: profile.bar_number.clone(),
            state_barred: profile.state_barred.clone(),
            eoir_registered: profile.eoir_registered,
            legal_credential_comment: profile.legal_credential_comment.clone(),
            expected_bar_date: profile.expected_bar_date,
        };

        let submission = ProfileSubmission {
            profile: upload,
            languages: self.language_records(user_id),
            roles: self
                .roles
                .iter()
                .map(|&role| ProfileRole { user_id, role })
                .collect(),
        };

        self.submission = SubmissionState::InFlight;
        info!(user_id = %user_id, roles = submission.roles.len(), "submitting onboarding profile");
        Ok(Some(submission))
    }

    /// Record the outcome of the write started by [`Self::prepare_submission`].
    /// A failed write leaves the draft intact so the volunteer can retry.
    pub fn complete_submission(&mut self, succeeded: bool) {
        self.submission = if succeeded {
            SubmissionState::Completed
        } else {
            SubmissionState::Idle
        };
    }

    /// One record per distinct language, readers first, in first-seen order.
    fn language_records(&self, user_id: UserId) -> Vec<ProfileLanguage> {
        let mut records: Vec<ProfileLanguage> = Vec::new();
        for language in self.can_read.iter().chain(&self.can_speak) {
            if records.iter().any(|record| record.language_name == *language) {
                continue;
            }
            records.push(ProfileLanguage {
                user_id,
                language_name: language.clone(),
                can_read: self.can_read.contains(language),
                can_speak: self.can_speak.contains(language),
            });
        }
        records
    }
}

fn required_text(value: &Option<String>, missing: FlushError) -> Result<String, FlushError> {
    match value {
        Some(text) if !text.is_empty() => Ok(text.clone()),
        _ => Err(missing),
    }
}
