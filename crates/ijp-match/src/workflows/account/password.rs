use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Where the client is sent once the new password is saved.
pub const CONFIRM_RESET_PATH: &str = "/confirm-reset-password";

/// Auth session events relayed by the identity backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    PasswordRecovery,
    TokenRefreshed,
    UserUpdated,
}

/// Decides whether the reset form may be shown. It opens on the first
/// recovery event and stays open for the rest of the page's life.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryGate {
    open: bool,
}

impl RecoveryGate {
    pub fn observe(&mut self, event: AuthEvent) {
        if event == AuthEvent::PasswordRecovery {
            self.open = true;
        }
    }

    pub fn can_reset(&self) -> bool {
        self.open
    }
}

/// Error object returned by the identity backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthError {
    pub message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Identity backend operations used by the reset flow. Update and sign-out
/// report failure as an optional error object rather than a `Result`.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// True when `candidate` matches the current password.
    async fn verify_new_password(&self, candidate: &str) -> Result<bool, AuthError>;
    async fn update_user(&self, password: &str) -> Option<AuthError>;
    async fn sign_out(&self) -> Option<AuthError>;
}

/// One requirement a new password must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityRule {
    MinimumLength,
    Uppercase,
    Lowercase,
    Digit,
    Symbol,
}

impl ComplexityRule {
    pub const MIN_LENGTH: usize = 8;

    pub const fn ordered() -> [Self; 5] {
        [
            Self::MinimumLength,
            Self::Uppercase,
            Self::Lowercase,
            Self::Digit,
            Self::Symbol,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::MinimumLength => "At least 8 characters",
            Self::Uppercase => "At least 1 uppercase character",
            Self::Lowercase => "At least 1 lowercase character",
            Self::Digit => "At least 1 number",
            Self::Symbol => "At least 1 special character",
        }
    }

    pub fn is_met(self, password: &str) -> bool {
        match self {
            Self::MinimumLength => password.chars().count() >= Self::MIN_LENGTH,
            Self::Uppercase => password.chars().any(char::is_uppercase),
            Self::Lowercase => password.chars().any(char::is_lowercase),
            Self::Digit => password.chars().any(|c| c.is_ascii_digit()),
            Self::Symbol => password
                .chars()
                .any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
        }
    }

    /// Rules the password still fails, in display order.
    pub fn unmet(password: &str) -> Vec<Self> {
        Self::ordered()
            .into_iter()
            .filter(|rule| !rule.is_met(password))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordResetError {
    #[error("Password must meet complexity requirements.")]
    Complexity(Vec<ComplexityRule>),
    #[error("Passwords do not match.")]
    Mismatch,
    #[error("New password must be different from the old password.")]
    SameAsOld,
    #[error("Something went wrong. Please try again later.")]
    UpdateFailed,
    #[error("An error occurred trying to sign out: {0}")]
    SignOut(AuthError),
}

/// Set a new password for a volunteer arriving from a recovery link.
///
/// Checks run in order: complexity, confirmation, then a round trip to make
/// sure the password actually changes. On success the volunteer is signed out
/// and the confirmation path is returned.
pub async fn reset_password<B>(
    backend: &B,
    new_password: &str,
    confirmation: &str,
) -> Result<&'static str, PasswordResetError>
where
    B: AuthBackend + ?Sized,
{
    let unmet = ComplexityRule::unmet(new_password);
    if !unmet.is_empty() {
        return Err(PasswordResetError::Complexity(unmet));
    }
    if new_password != confirmation {
        return Err(PasswordResetError::Mismatch);
    }

    match backend.verify_new_password(new_password).await {
        Ok(true) => return Err(PasswordResetError::SameAsOld),
        Ok(false) => {}
        Err(err) => {
            warn!(error = %err, "could not compare new password with the current one");
            return Err(PasswordResetError::UpdateFailed);
        }
    }

    if let Some(err) = backend.update_user(new_password).await {
        error!(error = %err, "password update rejected");
        return Err(PasswordResetError::UpdateFailed);
    }

    if let Some(err) = backend.sign_out().await {
        error!(error = %err, "sign out after password reset failed");
        return Err(PasswordResetError::SignOut(err));
    }

    info!("password reset completed");
    Ok(CONFIRM_RESET_PATH)
}
