use crate::services::directory::{self, Me};
use crate::state::SharedState;
use crate::web::session::{self, Caller};
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};

const DEV_TOKEN_TTL_HOURS: i64 = 12;

#[derive(Deserialize)]
pub struct DevTokenRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct DevTokenResponse {
    pub token: String,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/dev-token", post(dev_token))
        .with_state(state)
}

/// Mints an identity token without an identity provider. Answers 404 unless
/// dev login is enabled.
async fn dev_token(
    State(state): State<SharedState>,
    Json(payload): Json<DevTokenRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if !state.dev_login {
        return Err(StatusCode::NOT_FOUND);
    }
    let email = payload.email.trim();
    if email.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    let token = session::sign_identity(email, &state.session_key, Duration::hours(DEV_TOKEN_TTL_HOURS))
        .map_err(|e| {
            tracing::error!("Failed to sign dev token: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    tracing::info!("Dev token issued for {}", email);

    let cookie = HeaderValue::from_str(&format!("session={token}; HttpOnly; SameSite=Lax; Path=/"))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, cookie);
    Ok((headers, Json(DevTokenResponse { token })))
}

pub async fn me(
    State(state): State<SharedState>,
    Caller(email): Caller,
) -> Result<Json<Me>, StatusCode> {
    let me = directory::me(state.store(), &email).await.map_err(StatusCode::from)?;
    Ok(Json(me))
}
