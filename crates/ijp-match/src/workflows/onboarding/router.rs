use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::controller::FlushOutcome;
use super::domain::{parse_role_option, ProfilePatch, RoleSet, UserId};
use super::registry::{OnboardingRegistry, SessionId};
use super::session::{FlushError, NavigationError};
use super::steps::StepSubmission;
use super::store::ProfileStore;

#[derive(Debug, Default, Deserialize)]
pub struct OpenSessionRequest {
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// Either an explicit role list or a roles-step option such as
/// `"ATTORNEY,INTERPRETER"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RolesRequest {
    Roles { roles: RoleSet },
    Option { option: String },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NavigateRequest {
    /// Register the submitted step values, if any, then advance.
    Forward {
        #[serde(default)]
        form: Option<StepSubmission>,
    },
    Back,
    Jump {
        index: usize,
    },
}

/// Router exposing the onboarding session lifecycle.
pub fn onboarding_router<S>(registry: Arc<OnboardingRegistry<S>>) -> Router
where
    S: ProfileStore + 'static,
{
    Router::new()
        .route("/api/v1/onboarding", post(open_handler::<S>))
        .route(
            "/api/v1/onboarding/:session_id",
            get(session_handler::<S>).delete(discard_handler::<S>),
        )
        .route(
            "/api/v1/onboarding/:session_id/roles",
            put(roles_handler::<S>),
        )
        .route(
            "/api/v1/onboarding/:session_id/profile",
            patch(profile_handler::<S>),
        )
        .route(
            "/api/v1/onboarding/:session_id/navigate",
            post(navigate_handler::<S>),
        )
        .route(
            "/api/v1/onboarding/:session_id/submit",
            post(submit_handler::<S>),
        )
        .with_state(registry)
}

pub(crate) async fn open_handler<S>(
    State(registry): State<Arc<OnboardingRegistry<S>>>,
    axum::Json(request): axum::Json<OpenSessionRequest>,
) -> Response
where
    S: ProfileStore + 'static,
{
    let (session_id, controller) = registry.open(request.user_id);
    let payload = json!({
        "session_id": session_id,
        "session": controller.with_session(|session| session.snapshot()),
    });
    (StatusCode::CREATED, axum::Json(payload)).into_response()
}

pub(crate) async fn session_handler<S>(
    State(registry): State<Arc<OnboardingRegistry<S>>>,
    Path(session_id): Path<SessionId>,
) -> Response
where
    S: ProfileStore + 'static,
{
    match registry.get(session_id) {
        Some(controller) => {
            let snapshot = controller.with_session(|session| session.snapshot());
            (StatusCode::OK, axum::Json(snapshot)).into_response()
        }
        None => session_not_found(session_id),
    }
}

/// End a session the volunteer abandoned without submitting.
pub(crate) async fn discard_handler<S>(
    State(registry): State<Arc<OnboardingRegistry<S>>>,
    Path(session_id): Path<SessionId>,
) -> Response
where
    S: ProfileStore + 'static,
{
    if registry.discard(session_id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        session_not_found(session_id)
    }
}

pub(crate) async fn roles_handler<S>(
    State(registry): State<Arc<OnboardingRegistry<S>>>,
    Path(session_id): Path<SessionId>,
    axum::Json(request): axum::Json<RolesRequest>,
) -> Response
where
    S: ProfileStore + 'static,
{
    let Some(controller) = registry.get(session_id) else {
        return session_not_found(session_id);
    };

    let roles = match request {
        RolesRequest::Roles { roles } => roles,
        RolesRequest::Option { option } => match parse_role_option(&option) {
            Ok(roles) => roles,
            Err(error) => return error_response(StatusCode::BAD_REQUEST, error.to_string()),
        },
    };

    let result = controller.with_session(|session| {
        session
            .change_roles(roles)
            .map(|step| (step.url, session.snapshot()))
    });
    match result {
        Ok((url, snapshot)) => {
            let payload = json!({ "url": url, "session": snapshot });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => navigation_error_response(error),
    }
}

pub(crate) async fn profile_handler<S>(
    State(registry): State<Arc<OnboardingRegistry<S>>>,
    Path(session_id): Path<SessionId>,
    axum::Json(update): axum::Json<ProfilePatch>,
) -> Response
where
    S: ProfileStore + 'static,
{
    let Some(controller) = registry.get(session_id) else {
        return session_not_found(session_id);
    };

    let snapshot = controller.with_session(|session| {
        session.apply_patch(update);
        session.snapshot()
    });
    (StatusCode::OK, axum::Json(snapshot)).into_response()
}

pub(crate) async fn navigate_handler<S>(
    State(registry): State<Arc<OnboardingRegistry<S>>>,
    Path(session_id): Path<SessionId>,
    axum::Json(request): axum::Json<NavigateRequest>,
) -> Response
where
    S: ProfileStore + 'static,
{
    let Some(controller) = registry.get(session_id) else {
        return session_not_found(session_id);
    };

    let today = Utc::now().date_naive();
    let result = controller.with_session(|session| {
        let step = match request {
            NavigateRequest::Forward { form } => {
                if let Some(submission) = form {
                    let form = submission.into_form(&session.view(), today);
                    session.register_form(form)?;
                }
                session.advance()?
            }
            NavigateRequest::Back => session.back()?,
            NavigateRequest::Jump { index } => session.jump_to(index)?,
        };
        Ok::<_, NavigationError>((step.url, session.snapshot()))
    });

    match result {
        Ok((url, snapshot)) => {
            let payload = json!({ "url": url, "session": snapshot });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => navigation_error_response(error),
    }
}

pub(crate) async fn submit_handler<S>(
    State(registry): State<Arc<OnboardingRegistry<S>>>,
    Path(session_id): Path<SessionId>,
) -> Response
where
    S: ProfileStore + 'static,
{
    match registry.submit(session_id).await {
        None => session_not_found(session_id),
        Some(Ok(FlushOutcome::Submitted)) => {
            let payload = json!({ "status": FlushOutcome::Submitted });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Some(Ok(FlushOutcome::Skipped)) => {
            let payload = json!({ "status": FlushOutcome::Skipped });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Some(Err(FlushError::Store(error))) => {
            error_response(StatusCode::BAD_GATEWAY, error.to_string())
        }
        Some(Err(FlushError::NotLoggedIn)) => {
            error_response(StatusCode::UNAUTHORIZED, FlushError::NotLoggedIn.to_string())
        }
        Some(Err(error)) => error_response(StatusCode::UNPROCESSABLE_ENTITY, error.to_string()),
    }
}

fn navigation_error_response(error: NavigationError) -> Response {
    match error {
        NavigationError::Validation(validation) => {
            let payload = json!({
                "error": validation.to_string(),
                "fields": validation.errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        NavigationError::NoRolesSelected => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, error.to_string())
        }
        other => error_response(StatusCode::CONFLICT, other.to_string()),
    }
}

fn session_not_found(session_id: SessionId) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        format!("onboarding session {session_id} not found"),
    )
}

fn error_response(status: StatusCode, message: String) -> Response {
    let payload = json!({
        "error": message,
    });
    (status, axum::Json(payload)).into_response()
}
