use crate::db;
use crate::domain::models::{Campaign, CampaignStatus, DimensionScores, SurveyResponse};
use crate::domain::scoring::{self, GroupResult, LikertAnswer};
use crate::error::{AppError, AppResult};
use crate::state::SharedState;
use crate::web::companies::{require_company, required_name};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Deserialize)]
pub struct CreateCampaignPayload {
    pub company_id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: CampaignStatus,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePayload {
    pub department_id: i64,
    /// Dimension -> answers to that dimension's items.
    pub answers: BTreeMap<String, Vec<LikertAnswer>>,
}

#[derive(Debug, Serialize)]
pub struct DepartmentResult {
    pub department_id: i64,
    pub name: String,
    #[serde(flatten)]
    pub result: GroupResult,
}

/// Departments too small to be shown alone, pooled together.
#[derive(Debug, Serialize)]
pub struct OtherSectorsResult {
    pub department_ids: Vec<i64>,
    #[serde(flatten)]
    pub result: GroupResult,
}

#[derive(Debug, Serialize)]
pub struct CampaignResults {
    pub campaign_id: i64,
    pub status: CampaignStatus,
    pub min_respondents: u32,
    pub overall: GroupResult,
    pub departments: Vec<DepartmentResult>,
    pub other_sectors: Option<OtherSectorsResult>,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", post(create_campaign))
        .route("/:id/status", post(update_status))
        .route("/:id/responses", post(submit_response))
        .route("/:id/results", get(get_results))
        .with_state(state)
}

async fn require_campaign(state: &SharedState, id: i64) -> AppResult<Campaign> {
    db::find_campaign(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("campaign"))
}

async fn create_campaign(
    State(state): State<SharedState>,
    Json(payload): Json<CreateCampaignPayload>,
) -> AppResult<Json<Campaign>> {
    let name = required_name(&payload.name)?;
    require_company(&state, payload.company_id).await?;

    let campaign = db::insert_campaign(&state.pool, payload.company_id, name).await?;
    tracing::info!(
        "Created campaign {} ({}) for company {}",
        campaign.id,
        campaign.name,
        campaign.company_id
    );
    Ok(Json(campaign))
}

async fn update_status(
    State(state): State<SharedState>,
    Path(campaign_id): Path<i64>,
    Json(payload): Json<StatusPayload>,
) -> AppResult<Json<Campaign>> {
    let campaign = require_campaign(&state, campaign_id).await?;
    if !campaign.status.can_transition_to(payload.status) {
        return Err(AppError::Conflict(format!(
            "campaign cannot move from {} to {}",
            campaign.status.as_str(),
            payload.status.as_str()
        )));
    }

    let updated = db::update_campaign_status(&state.pool, campaign_id, campaign.status, payload.status)
        .await?
        .ok_or_else(|| AppError::Conflict("campaign status changed concurrently".to_string()))?;
    tracing::info!(
        "Campaign {} moved from {} to {}",
        campaign_id,
        campaign.status.as_str(),
        updated.status.as_str()
    );
    Ok(Json(updated))
}

async fn submit_response(
    State(state): State<SharedState>,
    Path(campaign_id): Path<i64>,
    Json(payload): Json<ResponsePayload>,
) -> AppResult<Json<SurveyResponse>> {
    let campaign = require_campaign(&state, campaign_id).await?;
    if !campaign.status.accepts_responses() {
        return Err(AppError::Conflict(format!(
            "campaign is {}, responses are only accepted while active",
            campaign.status.as_str()
        )));
    }

    let department = db::find_department(&state.pool, payload.department_id)
        .await?
        .ok_or(AppError::NotFound("department"))?;
    if department.company_id != campaign.company_id {
        return Err(AppError::BadRequest(
            "department does not belong to the campaign's company".to_string(),
        ));
    }

    let scores = scoring::score_answers(&payload.answers);
    if scores.is_empty() {
        return Err(AppError::BadRequest("at least one answered dimension is required".to_string()));
    }

    let response = db::insert_response(&state.pool, campaign_id, department.id, &scores).await?;
    tracing::debug!(
        "Stored response {} for campaign {} (department {}, {} dimensions)",
        response.id,
        campaign_id,
        department.id,
        scores.len()
    );
    Ok(Json(response))
}

/// Uses the threshold stored for the company at setup; it cannot be changed
/// per request.
async fn get_results(
    State(state): State<SharedState>,
    Path(campaign_id): Path<i64>,
) -> AppResult<Json<CampaignResults>> {
    let campaign = require_campaign(&state, campaign_id).await?;
    let stored = db::company_min_respondents(&state.pool, campaign.company_id).await?;
    let min_respondents = scoring::clamp_min_respondents(stored);

    let departments = db::list_departments_for_company(&state.pool, campaign.company_id).await?;
    let responses = db::list_responses_for_campaign(&state.pool, campaign_id).await?;

    let mut by_department: HashMap<i64, Vec<DimensionScores>> = HashMap::new();
    for response in responses {
        by_department
            .entry(response.department_id)
            .or_default()
            .push(response.scores.0);
    }

    let mut names = HashMap::with_capacity(departments.len());
    let groups = departments
        .into_iter()
        .map(|department| {
            let group = by_department.remove(&department.id).unwrap_or_default();
            names.insert(department.id, department.name);
            (department.id, group)
        })
        .collect();

    let breakdown = scoring::breakdown(groups, min_respondents);
    tracing::debug!(
        "Results for campaign {}: {} departments shown, {} pooled (threshold {})",
        campaign_id,
        breakdown.groups.len(),
        breakdown.merged.members.len(),
        min_respondents
    );

    let departments = breakdown
        .groups
        .into_iter()
        .map(|(department_id, result)| DepartmentResult {
            department_id,
            name: names.remove(&department_id).unwrap_or_default(),
            result,
        })
        .collect();
    let other_sectors = (!breakdown.merged.members.is_empty()).then(|| OtherSectorsResult {
        department_ids: breakdown.merged.members,
        result: breakdown.merged.result,
    });

    Ok(Json(CampaignResults {
        campaign_id,
        status: campaign.status,
        min_respondents,
        overall: breakdown.overall,
        departments,
        other_sectors,
    }))
}
