pub mod account;
pub mod listings;
pub mod onboarding;
