use crate::db;
use crate::domain::models::{Campaign, Company, CompanySize, CopsoqVersion, Department};
use crate::error::{AppError, AppResult};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateCompanyPayload {
    pub name: String,
    pub size: CompanySize,
    pub copsoq_version: CopsoqVersion,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(list_companies).post(create_company))
        .route("/:id/departments", get(list_departments))
        .route("/:id/campaigns", get(list_campaigns))
        .with_state(state)
}

pub(crate) fn required_name(raw: &str) -> AppResult<&str> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    Ok(name)
}

pub(crate) async fn require_company(state: &SharedState, id: i64) -> AppResult<Company> {
    db::find_company(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("company"))
}

async fn create_company(
    State(state): State<SharedState>,
    Json(payload): Json<CreateCompanyPayload>,
) -> AppResult<Json<Company>> {
    let name = required_name(&payload.name)?;
    let company = db::insert_company(&state.pool, name, payload.size, payload.copsoq_version).await?;
    tracing::info!(
        "Created company {} ({}, {}, {})",
        company.id,
        company.name,
        company.size.as_str(),
        company.copsoq_version.as_str()
    );
    Ok(Json(company))
}

async fn list_companies(State(state): State<SharedState>) -> AppResult<Json<Vec<Company>>> {
    let companies = db::list_companies(&state.pool).await?;
    Ok(Json(companies))
}

/// Unknown company ids yield an empty list, matching a plain filtered select.
async fn list_departments(
    State(state): State<SharedState>,
    Path(company_id): Path<i64>,
) -> AppResult<Json<Vec<Department>>> {
    let departments = db::list_departments_for_company(&state.pool, company_id).await?;
    Ok(Json(departments))
}

async fn list_campaigns(
    State(state): State<SharedState>,
    Path(company_id): Path<i64>,
) -> AppResult<Json<Vec<Campaign>>> {
    require_company(&state, company_id).await?;
    let campaigns = db::list_campaigns_for_company(&state.pool, company_id).await?;
    Ok(Json(campaigns))
}
