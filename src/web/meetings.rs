use crate::domain::models::{Meeting, MeetingUpdate, NewMeeting};
use crate::services::meetings;
use crate::state::SharedState;
use crate::web::session::Caller;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
    Json, Router,
};
use uuid::Uuid;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", post(create))
        .route("/:id", put(update).delete(remove))
        .with_state(state)
}

async fn create(
    State(state): State<SharedState>,
    Caller(email): Caller,
    Json(payload): Json<NewMeeting>,
) -> Result<impl IntoResponse, StatusCode> {
    let view = meetings::create(state.store(), &email, payload, state.clock())
        .await
        .map_err(StatusCode::from)?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn update(
    State(state): State<SharedState>,
    Caller(email): Caller,
    Path(id): Path<Uuid>,
    Json(payload): Json<MeetingUpdate>,
) -> Result<Json<Meeting>, StatusCode> {
    let meeting = meetings::update(state.store(), &email, id, payload)
        .await
        .map_err(StatusCode::from)?;
    Ok(Json(meeting))
}

async fn remove(
    State(state): State<SharedState>,
    Caller(email): Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    meetings::delete(state.store(), &email, id)
        .await
        .map_err(StatusCode::from)?;
    Ok(StatusCode::NO_CONTENT)
}
