use crate::db;
use crate::domain::models::Department;
use crate::error::AppResult;
use crate::state::SharedState;
use crate::web::companies::{require_company, required_name};
use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateDepartmentPayload {
    pub company_id: i64,
    pub name: String,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", post(create_department))
        .with_state(state)
}

async fn create_department(
    State(state): State<SharedState>,
    Json(payload): Json<CreateDepartmentPayload>,
) -> AppResult<Json<Department>> {
    let name = required_name(&payload.name)?;
    require_company(&state, payload.company_id).await?;

    let department = db::insert_department(&state.pool, payload.company_id, name).await?;
    tracing::info!(
        "Created department {} ({}) for company {}",
        department.id,
        department.name,
        department.company_id
    );
    Ok(Json(department))
}
