use crate::domain::models::{Employee, EmployeeUpdate, NewEmployee};
use crate::services::directory;
use crate::state::SharedState;
use crate::web::session::Caller;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct FixUserTypesResponse {
    pub updated: usize,
}

#[derive(Debug, Serialize)]
pub struct SeedResetResponse {
    pub employees: usize,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/employees", get(list_all).post(create))
        .route("/employees/fix-user-types", post(fix_user_types))
        .route("/employees/:id", patch(update).delete(remove))
        .route("/employees/:id/archive", post(archive))
        .route("/employees/:id/unarchive", post(unarchive))
        .route("/seed/reset", post(reset_seed))
        .with_state(state)
}

async fn list_all(
    State(state): State<SharedState>,
    Caller(email): Caller,
) -> Result<Json<Vec<Employee>>, StatusCode> {
    let employees = directory::list_all(state.store(), &email)
        .await
        .map_err(StatusCode::from)?;
    Ok(Json(employees))
}

async fn create(
    State(state): State<SharedState>,
    Caller(email): Caller,
    Json(payload): Json<NewEmployee>,
) -> Result<impl IntoResponse, StatusCode> {
    let employee = directory::add_employee(state.store(), &email, payload, state.clock())
        .await
        .map_err(StatusCode::from)?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn update(
    State(state): State<SharedState>,
    Caller(email): Caller,
    Path(id): Path<Uuid>,
    Json(payload): Json<EmployeeUpdate>,
) -> Result<Json<Employee>, StatusCode> {
    let employee = directory::update_employee(state.store(), &email, id, payload)
        .await
        .map_err(StatusCode::from)?;
    Ok(Json(employee))
}

async fn archive(
    State(state): State<SharedState>,
    Caller(email): Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<Employee>, StatusCode> {
    let employee = directory::set_archived(state.store(), &email, id, true)
        .await
        .map_err(StatusCode::from)?;
    Ok(Json(employee))
}

async fn unarchive(
    State(state): State<SharedState>,
    Caller(email): Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<Employee>, StatusCode> {
    let employee = directory::set_archived(state.store(), &email, id, false)
        .await
        .map_err(StatusCode::from)?;
    Ok(Json(employee))
}

async fn remove(
    State(state): State<SharedState>,
    Caller(email): Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    directory::delete_employee(state.store(), &email, id)
        .await
        .map_err(StatusCode::from)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn fix_user_types(
    State(state): State<SharedState>,
    Caller(email): Caller,
) -> Result<Json<FixUserTypesResponse>, StatusCode> {
    let updated = directory::fix_user_types(state.store(), &email)
        .await
        .map_err(StatusCode::from)?;
    Ok(Json(FixUserTypesResponse { updated }))
}

async fn reset_seed(
    State(state): State<SharedState>,
    Caller(email): Caller,
) -> Result<Json<SeedResetResponse>, StatusCode> {
    let employees = directory::reset_seed(state.store(), &email)
        .await
        .map_err(StatusCode::from)?;
    Ok(Json(SeedResetResponse { employees }))
}
