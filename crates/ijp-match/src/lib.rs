//! Volunteer matching core for the Immigration Justice Project.
//!
//! Two workflows carry the interesting behavior: the listing board, which
//! derives a filtered, ordered view of case listings, and the onboarding
//! controller, which accumulates a volunteer profile across role-dependent
//! steps before a single guarded submission.

pub mod config;
pub mod error;
pub mod helpers;
pub mod telemetry;
pub mod workflows;
