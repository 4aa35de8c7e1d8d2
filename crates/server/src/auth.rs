//! Staff sign-in endpoints

use api_types::auth::{CurrentUser, SessionView, SignIn};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::Session;

use crate::{ServerError, server::ServerState};

pub async fn sign_in(
    State(state): State<ServerState>,
    Json(payload): Json<SignIn>,
) -> Result<Json<SessionView>, ServerError> {
    let session = state
        .engine
        .sign_in(&payload.email, &payload.password)
        .await?;
    tracing::info!(email = %session.email, "signed in");
    Ok(Json(SessionView {
        token: session.token,
        email: session.email,
    }))
}

pub async fn sign_out(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
) -> Result<StatusCode, ServerError> {
    state.engine.sign_out(&session.token).await?;
    tracing::info!(email = %session.email, "signed out");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(Extension(session): Extension<Session>) -> Json<CurrentUser> {
    Json(CurrentUser {
        email: session.email,
    })
}
