use crate::db;
use crate::domain::models::{Company, Department};
use crate::domain::wizard::{self, SetupForm};
use crate::error::{AppError, AppResult};
use crate::state::SharedState;
use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SetupResult {
    pub company: Company,
    pub departments: Vec<Department>,
    pub min_respondents: u32,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", post(complete_setup))
        .with_state(state)
}

/// Final step of the client setup wizard.
async fn complete_setup(
    State(state): State<SharedState>,
    Json(form): Json<SetupForm>,
) -> AppResult<Json<SetupResult>> {
    wizard::validate_all(&form).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let (Some(size), Some(version)) = (form.company_size(), form.copsoq_version()) else {
        return Err(AppError::BadRequest("employee_count must be positive".to_string()));
    };
    let departments: Vec<String> = form
        .departments
        .iter()
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect();

    let (company, departments) = db::create_company_with_departments(
        &state.pool,
        form.display_name(),
        size,
        version,
        form.min_respondents,
        &departments,
    )
    .await?;

    tracing::info!(
        "Setup completed for company {} ({} departments, COPSOQ {}, min respondents {})",
        company.id,
        departments.len(),
        company.copsoq_version.as_str(),
        form.min_respondents
    );

    Ok(Json(SetupResult {
        company,
        departments,
        min_respondents: form.min_respondents,
    }))
}
