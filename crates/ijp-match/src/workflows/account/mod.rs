//! Account maintenance flows.

pub mod password;

pub use password::{
    reset_password, AuthBackend, AuthError, AuthEvent, ComplexityRule, PasswordResetError,
    RecoveryGate, CONFIRM_RESET_PATH,
};
