//! Account handlers: register, login, logout.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use minijinja::context;
use std::sync::Arc;

use crate::auth;
use crate::db::UserRepository;
use crate::CabinetError;
use crate::web::dto::{CredentialsForm, ValidatedForm};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, SESSION_COOKIE};
use crate::web::state::AppState;
use crate::web::templates::{self, LOGIN, REGISTER};

/// Render `page` with the error message for rejected form input.
///
/// Errors other than bad input, duplicates and bad credentials keep the
/// JSON error path.
fn form_error_page(
    state: &AppState,
    page: &str,
    err: CabinetError,
) -> Result<Response, ApiError> {
    let (status, message) = match err {
        CabinetError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
        CabinetError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        CabinetError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        other => return Err(other.into()),
    };

    let html = templates::render(&state.templates, page, context! { error => message })?;
    Ok((status, Html(html)).into_response())
}

/// GET /register - Registration page.
pub async fn register_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    Ok(Html(templates::render(&state.templates, REGISTER, context! {})?))
}

/// POST /register - Create an account, then send the browser to the login page.
///
/// A rejected registration re-renders the page with the reason.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedForm(form): ValidatedForm<CredentialsForm>,
) -> Result<Response, ApiError> {
    let repo = UserRepository::new(state.db.pool());
    match auth::register(&repo, &form.username, &form.password).await {
        Ok(_) => Ok(Redirect::to("/login").into_response()),
        Err(e) => form_error_page(&state, REGISTER, e),
    }
}

/// GET /login - Login page.
pub async fn login_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    Ok(Html(templates::render(&state.templates, LOGIN, context! {})?))
}

/// POST /login - Check credentials and set the session cookie.
///
/// Bad credentials re-render the login page with a 401.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedForm(form): ValidatedForm<CredentialsForm>,
) -> Result<Response, ApiError> {
    let repo = UserRepository::new(state.db.pool());
    let user = match auth::authenticate(&repo, &form.username, &form.password).await {
        Ok(user) => user,
        Err(e) => return form_error_page(&state, LOGIN, e),
    };

    let token = state.generate_session_token(&user)?;
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(state.cookie_secure);

    Ok((jar.add(cookie), Redirect::to("/")).into_response())
}

/// GET /logout - Clear the session cookie.
pub async fn logout(AuthUser(claims): AuthUser, jar: CookieJar) -> (CookieJar, Redirect) {
    tracing::info!(user_id = claims.sub, "User logged out");
    // expire the cookie even when the session came from a bearer header
    let mut cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    cookie.make_removal();
    (jar.add(cookie), Redirect::to("/login"))
}
