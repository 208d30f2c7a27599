use crate::domain::models::{ActionItem, ActionItemUpdate, NewActionItem};
use crate::services::action_items::{self, ActionItemListing};
use crate::services::views::ActionItemQuery;
use crate::state::SharedState;
use crate::web::session::Caller;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use uuid::Uuid;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", patch(update).delete(remove))
        .with_state(state)
}

async fn list(
    State(state): State<SharedState>,
    Caller(email): Caller,
    Query(query): Query<ActionItemQuery>,
) -> Result<Json<ActionItemListing>, StatusCode> {
    let listing = action_items::list(state.store(), &email, &query, state.clock())
        .await
        .map_err(StatusCode::from)?;
    Ok(Json(listing))
}

async fn create(
    State(state): State<SharedState>,
    Caller(email): Caller,
    Json(payload): Json<NewActionItem>,
) -> Result<impl IntoResponse, StatusCode> {
    let item = action_items::create(state.store(), &email, payload, state.clock())
        .await
        .map_err(StatusCode::from)?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update(
    State(state): State<SharedState>,
    Caller(email): Caller,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActionItemUpdate>,
) -> Result<Json<ActionItem>, StatusCode> {
    let item = action_items::update(state.store(), &email, id, payload, state.clock())
        .await
        .map_err(StatusCode::from)?;
    Ok(Json(item))
}

async fn remove(
    State(state): State<SharedState>,
    Caller(email): Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    action_items::delete(state.store(), &email, id)
        .await
        .map_err(StatusCode::from)?;
    Ok(StatusCode::NO_CONTENT)
}
