use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{ProfileDraft, ProfileField, RoleSet};
use super::session::{OnboardingSession, OnboardingView};
use crate::helpers::{is_upcoming_date, is_valid_bar_number};

/// A validation message tied to one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct StepValidationError {
    pub errors: Vec<FieldError>,
}

impl From<FieldError> for StepValidationError {
    fn from(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

/// The form a step page registers with the session.
///
/// `trigger` validates the current values and commits them into the session
/// draft. The session only advances once it returns `Ok`.
pub trait StepForm: Send + fmt::Debug {
    /// Url of the step this form belongs to.
    fn step(&self) -> &'static str;
    fn is_dirty(&self) -> bool;
    fn is_valid(&self) -> bool;
    fn trigger(&mut self, session: &mut OnboardingSession) -> Result<(), StepValidationError>;
}

/// Values edited on a single step page.
pub trait StepValues: Clone + PartialEq + Send + fmt::Debug + 'static {
    const STEP: &'static str;

    /// Prefill from what the session already holds.
    fn from_view(view: &OnboardingView<'_>) -> Self;
    fn validate(&self, today: NaiveDate) -> Vec<FieldError>;
    fn commit(self, session: &mut OnboardingSession) -> Result<(), StepValidationError>;
}

/// Form state shared by every concrete step: the prefilled baseline, the
/// values being edited, and the date used for date checks.
#[derive(Debug, Clone)]
pub struct StepFormState<V> {
    baseline: V,
    values: V,
    today: NaiveDate,
}

impl<V: StepValues> StepFormState<V> {
    pub fn from_view(view: &OnboardingView<'_>, today: NaiveDate) -> Self {
        let baseline = V::from_view(view);
        Self {
            values: baseline.clone(),
            baseline,
            today,
        }
    }

    pub fn with_values(mut self, values: V) -> Self {
        self.values = values;
        self
    }

    pub fn values(&self) -> &V {
        &self.values
    }

    pub fn edit(&mut self, edit: impl FnOnce(&mut V)) {
        edit(&mut self.values);
    }

    pub fn errors(&self) -> Vec<FieldError> {
        self.values.validate(self.today)
    }
}

impl<V: StepValues> StepForm for StepFormState<V> {
    fn step(&self) -> &'static str {
        V::STEP
    }

    fn is_dirty(&self) -> bool {
        self.values != self.baseline
    }

    fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    fn trigger(&mut self, session: &mut OnboardingSession) -> Result<(), StepValidationError> {
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(StepValidationError { errors });
        }
        self.values.clone().commit(session)?;
        self.baseline = self.values.clone();
        Ok(())
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn require_text(errors: &mut Vec<FieldError>, field: &'static str, value: &str, message: &str) {
    if blank(value) {
        errors.push(FieldError::new(field, message));
    }
}

fn non_blank(value: &str) -> Option<String> {
    (!blank(value)).then(|| value.trim().to_string())
}

/// Phone numbers may carry common separators but need 10 to 15 digits.
pub fn is_valid_phone_number(candidate: &str) -> bool {
    let allowed = candidate
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.'));
    let digits = candidate.chars().filter(char::is_ascii_digit).count();
    allowed && (10..=15).contains(&digits)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolesValues {
    pub roles: RoleSet,
}

impl StepValues for RolesValues {
    const STEP: &'static str = "roles";

    fn from_view(view: &OnboardingView<'_>) -> Self {
        Self {
            roles: view.roles.clone(),
        }
    }

    fn validate(&self, _today: NaiveDate) -> Vec<FieldError> {
        if self.roles.is_empty() {
            vec![FieldError::new("roles", "Must select at least one role")]
        } else {
            Vec::new()
        }
    }

    fn commit(self, session: &mut OnboardingSession) -> Result<(), StepValidationError> {
        if self.roles != *session.roles() {
            session
                .change_roles(self.roles)
                .map_err(|err| FieldError::new("roles", err.to_string()))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicInfoValues {
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub phone_number: String,
    pub can_read: Vec<String>,
    pub can_speak: Vec<String>,
}

impl StepValues for BasicInfoValues {
    const STEP: &'static str = "basic-information";

    fn from_view(view: &OnboardingView<'_>) -> Self {
        let profile = view.profile;
        Self {
            first_name: profile.first_name.clone().unwrap_or_default(),
            last_name: profile.last_name.clone().unwrap_or_default(),
            country: profile.country.clone().unwrap_or_default(),
            state: profile.state.clone().unwrap_or_default(),
            city: profile.city.clone().unwrap_or_default(),
            phone_number: profile.phone_number.clone().unwrap_or_default(),
            can_read: view.can_read.to_vec(),
            can_speak: view.can_speak.to_vec(),
        }
    }

    fn validate(&self, _today: NaiveDate) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for (field, value, message) in [
            ("first_name", &self.first_name, "Please include your first name."),
            ("last_name", &self.last_name, "Please include your last name."),
            ("country", &self.country, "Please include your country."),
            ("state", &self.state, "Please include your state."),
            ("city", &self.city, "Please include your city."),
        ] {
            require_text(&mut errors, field, value, message);
        }

        if blank(&self.phone_number) {
            errors.push(FieldError::new(
                "phone_number",
                "Please include your phone number.",
            ));
        } else if !is_valid_phone_number(&self.phone_number) {
            errors.push(FieldError::new(
                "phone_number",
                "Please include a valid phone number.",
            ));
        }

        if self.can_read.is_empty() && self.can_speak.is_empty() {
            errors.push(FieldError::new(
                "languages",
                "Please select at least one language you can read or speak.",
            ));
        }
        errors
    }

    fn commit(self, session: &mut OnboardingSession) -> Result<(), StepValidationError> {
        session.update_profile(ProfileDraft {
            first_name: non_blank(&self.first_name),
            last_name: non_blank(&self.last_name),
            country: non_blank(&self.country),
            state: non_blank(&self.state),
            city: non_blank(&self.city),
            phone_number: non_blank(&self.phone_number),
            ..ProfileDraft::default()
        });
        session.set_languages(self.can_read, self.can_speak);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityValues {
    pub hours_per_month: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub availability_description: Option<String>,
}

impl StepValues for AvailabilityValues {
    const STEP: &'static str = "availability";

    fn from_view(view: &OnboardingView<'_>) -> Self {
        Self {
            hours_per_month: view.profile.hours_per_month,
            start_date: view.profile.start_date,
            availability_description: view.profile.availability_description.clone(),
        }
    }

    fn validate(&self, _today: NaiveDate) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.hours_per_month.is_none() {
            errors.push(FieldError::new(
                "hours_per_month",
                "Please include your estimated availability.",
            ));
        }
        if self.start_date.is_none() {
            errors.push(FieldError::new(
                "start_date",
                "Please include a start date.",
            ));
        }
        errors
    }

    fn commit(self, session: &mut OnboardingSession) -> Result<(), StepValidationError> {
        let description = self.availability_description.as_deref().and_then(non_blank);
        if description.is_none() {
            session.remove_from_profile([ProfileField::AvailabilityDescription]);
        }
        session.update_profile(ProfileDraft {
            hours_per_month: self.hours_per_month,
            start_date: self.start_date,
            availability_description: description,
            ..ProfileDraft::default()
        });
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttorneyCredentialsValues {
    pub has_bar_number: Option<bool>,
    pub bar_number: Option<String>,
    pub state_barred: Option<String>,
    pub eoir_registered: Option<bool>,
    pub legal_credential_comment: Option<String>,
}

impl StepValues for AttorneyCredentialsValues {
    const STEP: &'static str = "legal-credentials";

    fn from_view(view: &OnboardingView<'_>) -> Self {
        let profile = view.profile;
        Self {
            has_bar_number: profile.has_bar_number,
            bar_number: profile.bar_number.clone(),
            state_barred: profile.state_barred.clone(),
            eoir_registered: profile.eoir_registered,
            legal_credential_comment: profile.legal_credential_comment.clone(),
        }
    }

    fn validate(&self, _today: NaiveDate) -> Vec<FieldError> {
        let mut errors = Vec::new();
        match self.has_bar_number {
            None => errors.push(FieldError::new(
                "has_bar_number",
                "Must select one option",
            )),
            Some(true) => {
                let bar_number = self.bar_number.as_deref().unwrap_or_default();
                if blank(bar_number) {
                    errors.push(FieldError::new(
                        "bar_number",
                        "Please include your bar number.",
                    ));
                } else if !is_valid_bar_number(bar_number.trim()) {
                    errors.push(FieldError::new(
                        "bar_number",
                        "Bar number must be a number with at most 6 digits.",
                    ));
                }
            }
            Some(false) => {
                let comment = self.legal_credential_comment.as_deref().unwrap_or_default();
                require_text(
                    &mut errors,
                    "legal_credential_comment",
                    comment,
                    "Please explain why you do not have a bar number.",
                );
            }
        }

        let state_barred = self.state_barred.as_deref().unwrap_or_default();
        require_text(&mut errors, "state_barred", state_barred, "Please include your state.");

        if self.eoir_registered.is_none() {
            errors.push(FieldError::new("eoir_registered", "Must select one option"));
        }
        errors
    }

    fn commit(self, session: &mut OnboardingSession) -> Result<(), StepValidationError> {
        // Only the branch that was answered survives.
        let (bar_number, comment) = match self.has_bar_number {
            Some(true) => (self.bar_number.as_deref().and_then(non_blank), None),
            _ => (None, self.legal_credential_comment.as_deref().and_then(non_blank)),
        };
        session.remove_from_profile([
            ProfileField::BarNumber,
            ProfileField::LegalCredentialComment,
        ]);
        session.update_profile(ProfileDraft {
            has_bar_number: self.has_bar_number,
            bar_number,
            legal_credential_comment: comment,
            state_barred: self.state_barred.as_deref().and_then(non_blank),
            eoir_registered: self.eoir_registered,
            ..ProfileDraft::default()
        });
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegalFellowCredentialsValues {
    pub expected_bar_date: Option<NaiveDate>,
    pub eoir_registered: Option<bool>,
}

impl StepValues for LegalFellowCredentialsValues {
    const STEP: &'static str = "legal-fellow-credentials";

    fn from_view(view: &OnboardingView<'_>) -> Self {
        Self {
            expected_bar_date: view.profile.expected_bar_date,
            eoir_registered: view.profile.eoir_registered,
        }
    }

    fn validate(&self, today: NaiveDate) -> Vec<FieldError> {
        let mut errors = Vec::new();
        match self.expected_bar_date {
            None => errors.push(FieldError::new(
                "expected_bar_date",
                "Please include your expected bar date.",
            )),
            Some(date) if !is_upcoming_date(date, today) => errors.push(FieldError::new(
                "expected_bar_date",
                "Expected bar date must be today or later.",
            )),
            Some(_) => {}
        }
        if self.eoir_registered.is_none() {
            errors.push(FieldError::new("eoir_registered", "Must select one option"));
        }
        errors
    }

    fn commit(self, session: &mut OnboardingSession) -> Result<(), StepValidationError> {
        session.update_profile(ProfileDraft {
            expected_bar_date: self.expected_bar_date,
            eoir_registered: self.eoir_registered,
            ..ProfileDraft::default()
        });
        Ok(())
    }
}

/// Step values as submitted over the wire, tagged by step url.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "step", content = "values", rename_all = "kebab-case")]
pub enum StepSubmission {
    Roles(RolesValues),
    BasicInformation(BasicInfoValues),
    Availability(AvailabilityValues),
    LegalCredentials(AttorneyCredentialsValues),
    LegalFellowCredentials(LegalFellowCredentialsValues),
}

impl StepSubmission {
    /// Build the step's form, prefilled from `view`, holding the submitted values.
    pub fn into_form(self, view: &OnboardingView<'_>, today: NaiveDate) -> Box<dyn StepForm> {
        match self {
            Self::Roles(values) => form_for(view, today, values),
            Self::BasicInformation(values) => form_for(view, today, values),
            Self::Availability(values) => form_for(view, today, values),
            Self::LegalCredentials(values) => form_for(view, today, values),
            Self::LegalFellowCredentials(values) => form_for(view, today, values),
        }
    }
}

fn form_for<V: StepValues>(
    view: &OnboardingView<'_>,
    today: NaiveDate,
    values: V,
) -> Box<dyn StepForm> {
    Box::new(StepFormState::<V>::from_view(view, today).with_values(values))
}
