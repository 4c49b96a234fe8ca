//! Onboarding flow controller: the accumulating profile draft, role-driven
//! flow branching, per-step form gating, and the guarded one-shot submission.

pub mod controller;
pub mod domain;
pub mod flow;
pub mod registry;
pub mod router;
pub mod session;
pub mod steps;
pub mod store;

#[cfg(test)]
mod tests;

pub use controller::{FlushOutcome, OnboardingController};
pub use domain::{
    parse_role_option, role_option, ProfileDraft, ProfileField, ProfileLanguage, ProfilePatch,
    ProfileRole, ProfileSubmission, ProfileToUpload, Role, RoleOptionError, RoleSet, UserId,
    ROLE_OPTIONS,
};
pub use flow::{Flow, FlowStep, ATTORNEY_FLOW, INTERPRETER_FLOW, LEGAL_FELLOW_FLOW};
pub use registry::{OnboardingRegistry, SessionId};
pub use router::onboarding_router;
pub use session::{
    FlushError, FormStatus, NavigationError, OnboardingSession, OnboardingView, SessionSnapshot,
    SubmissionState,
};
pub use steps::{
    AttorneyCredentialsValues, AvailabilityValues, BasicInfoValues, FieldError,
    LegalFellowCredentialsValues, RolesValues, StepForm, StepFormState, StepSubmission,
    StepValidationError, StepValues,
};
pub use store::{insert_profile_row, ProfileStore, StoreError};
