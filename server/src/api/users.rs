//! User registration and lookup handlers.

use crate::error::ApiError;
use crate::session::{AuthUser, SESSION_COOKIE};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use delist_db::{users, NewUser, User};

/// POST /api/users
///
/// Registers a user and signs them in by attaching a session cookie to the
/// response. Duplicate emails are rejected before the insert so the caller
/// gets a clean validation error instead of a constraint violation.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(new_user): Json<NewUser>,
) -> Result<(CookieJar, Json<User>), ApiError> {
    if users::get_user_by_email(state.db.pool(), &new_user.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Validation(
            "User already exists with this email".to_string(),
        ));
    }

    let user = users::create_user(state.db.pool(), new_user).await?;
    tracing::info!(user_id = %user.id, "user registered");

    let session_id = state.sessions.create(&user.id);
    let cookie = Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .build();

    Ok((jar.add(cookie), Json(user)))
}

/// GET /api/users/by-email/{email}
///
/// Users can only look up themselves; a matching record owned by someone
/// else is a 403, not a 404, to mirror the ownership rule everywhere else.
pub async fn get_by_email(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(email): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user = users::get_user_by_email(state.db.pool(), &email)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    if user.id != auth.user_id {
        return Err(ApiError::Forbidden);
    }

    Ok(Json(user))
}
