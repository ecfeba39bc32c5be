//! Authentication route handlers.
//!
//! Handles the login form and sign-out. Credentials are checked by
//! [`AuthService`]; on success the session id is rotated and the user is
//! sent to the validated callback URL.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::services::{AuthOutcome, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub email: String,
    pub callback_url: String,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<LoginQuery>) -> LoginTemplate {
    LoginTemplate {
        error: None,
        email: String::new(),
        callback_url: query.callback_url.unwrap_or_default(),
    }
}

/// Handle login form submission.
///
/// A refused login re-renders the form with a single generic message; the
/// submitted email is kept, the password never is.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let auth = &state.config().auth;
    let outcome = AuthService::new(state.users(), auth)
        .authenticate(&form.email, &form.password)
        .await;

    let status = match &outcome {
        AuthOutcome::Success(user) => {
            set_current_user(&session, user).await?;
            set_sentry_user(&user.id, Some(user.email.as_str()));

            let target = auth.resolve_callback(form.callback_url.as_deref(), &state.config().base_url);
            tracing::info!(user_id = %user.id, %target, "User signed in");
            return Ok(Redirect::to(&target).into_response());
        }
        AuthOutcome::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthOutcome::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let template = LoginTemplate {
        error: outcome.message().map(str::to_owned),
        email: form.email,
        callback_url: form.callback_url.unwrap_or_default(),
    };
    Ok((status, template).into_response())
}

/// Handle logout.
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to(state.config().auth.sign_in_path()))
}
