//! Authentication middleware and extractors.
//!
//! [`authorize_route`] applies the route authorization predicate to every
//! request before a handler runs. The extractors then hand the signed-in
//! user to handlers that need it.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Extractor that requires authentication.
///
/// If the user is not logged in, redirects to the sign-in page with the
/// requested path as `callbackUrl`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but the user is not logged in.
pub struct AuthRejection {
    location: String,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        Redirect::to(&self.location).into_response()
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().cloned();
        let user = match session {
            Some(session) => current_user(&session).await,
            None => None,
        };

        user.map(Self).ok_or_else(|| {
            let callback = parts
                .uri
                .path_and_query()
                .map_or_else(|| parts.uri.path(), |pq| pq.as_str());
            AuthRejection {
                location: state.config().auth.login_url(callback),
            }
        })
    }
}

/// Route authorization middleware.
///
/// Exempt paths pass straight through. Everything else is classified by
/// [`acme_core::AuthConfig::authorize`] and either reaches its handler or is
/// redirected.
pub async fn authorize_route(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let auth = &state.config().auth;
    if auth.is_exempt(request.uri().path()) {
        return next.run(request).await;
    }

    let target = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_owned(), |pq| pq.as_str().to_owned());

    let session = request.extensions().get::<Session>().cloned();
    let logged_in = match session {
        Some(session) => current_user(&session).await.is_some(),
        None => false,
    };

    let access = auth.authorize(logged_in, &target);
    match auth.redirect_location(&access) {
        Some(location) => {
            tracing::debug!(%target, %location, "Redirecting by route authorization");
            Redirect::to(&location).into_response()
        }
        None => next.run(request).await,
    }
}

/// Read the signed-in user from the session.
///
/// A session that cannot be read counts as anonymous.
pub async fn current_user(session: &Session) -> Option<CurrentUser> {
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Helper to set the current user in the session.
///
/// The session id is cycled first so a pre-login id is never reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the session on logout.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
