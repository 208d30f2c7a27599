use crate::domain::models::Employee;
use crate::services::directory::{self, EmployeeDashboard};
use crate::services::meetings;
use crate::services::views::{DashboardFilter, EmployeeView, MeetingView};
use crate::state::SharedState;
use crate::web::session::Caller;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(list))
        .route("/dashboard", get(dashboard))
        .route("/leads", get(leads))
        .route("/roles", get(roles))
        .route("/:id", get(detail))
        .route("/:id/meetings", get(history))
        .with_state(state)
}

async fn list(
    State(state): State<SharedState>,
    Caller(email): Caller,
) -> Result<Json<Vec<Employee>>, StatusCode> {
    let employees = directory::list_visible(state.store(), &email)
        .await
        .map_err(StatusCode::from)?;
    Ok(Json(employees))
}

async fn dashboard(
    State(state): State<SharedState>,
    Caller(email): Caller,
    Query(filter): Query<DashboardFilter>,
) -> Result<Json<EmployeeDashboard>, StatusCode> {
    let dashboard = directory::dashboard(state.store(), &email, &filter, state.clock())
        .await
        .map_err(StatusCode::from)?;
    Ok(Json(dashboard))
}

async fn leads(
    State(state): State<SharedState>,
    Caller(email): Caller,
) -> Result<Json<Vec<Employee>>, StatusCode> {
    let leads = directory::leads_and_hr(state.store(), &email)
        .await
        .map_err(StatusCode::from)?;
    Ok(Json(leads))
}

async fn roles(
    State(state): State<SharedState>,
    Caller(email): Caller,
) -> Result<Json<Vec<String>>, StatusCode> {
    let roles = directory::distinct_roles(state.store(), &email)
        .await
        .map_err(StatusCode::from)?;
    Ok(Json(roles))
}

async fn detail(
    State(state): State<SharedState>,
    Caller(email): Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<EmployeeView>, StatusCode> {
    let view = directory::get_employee(state.store(), &email, id, state.clock())
        .await
        .map_err(StatusCode::from)?;
    Ok(Json(view))
}

async fn history(
    State(state): State<SharedState>,
    Caller(email): Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MeetingView>>, StatusCode> {
    let history = meetings::history(state.store(), &email, id)
        .await
        .map_err(StatusCode::from)?;
    Ok(Json(history))
}
