use crate::domain::models::{
    Campaign, CampaignStatus, Company, CompanySize, CopsoqVersion, Department, DimensionScores,
    SurveyResponse,
};
use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::types::Json;
use sqlx::SqlitePool;
use std::str::FromStr;

pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Creates the tables if they do not exist yet and applies later columns.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

// ========== Companies ==========

pub async fn insert_company(
    pool: &SqlitePool,
    name: &str,
    size: CompanySize,
    copsoq_version: CopsoqVersion,
) -> Result<Company> {
    let company = sqlx::query_as::<_, Company>(
        r#"
        INSERT INTO companies (name, size, copsoq_version)
        VALUES (?, ?, ?)
        RETURNING id, name, size, copsoq_version
        "#,
    )
    .bind(name)
    .bind(size)
    .bind(copsoq_version)
    .fetch_one(pool)
    .await?;
    Ok(company)
}

pub async fn list_companies(pool: &SqlitePool) -> Result<Vec<Company>> {
    let companies = sqlx::query_as::<_, Company>(
        r#"
        SELECT id, name, size, copsoq_version
        FROM companies
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(companies)
}

pub async fn find_company(pool: &SqlitePool, id: i64) -> Result<Option<Company>> {
    let company = sqlx::query_as::<_, Company>(
        r#"
        SELECT id, name, size, copsoq_version
        FROM companies
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(company)
}

/// Anonymity threshold stored for the company at setup.
pub async fn company_min_respondents(pool: &SqlitePool, company_id: i64) -> Result<Option<u32>> {
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        SELECT min_respondents
        FROM companies
        WHERE id = ?
        "#,
    )
    .bind(company_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(min,)| u32::try_from(min).unwrap_or(0)))
}

// ========== Departments ==========

pub async fn insert_department(pool: &SqlitePool, company_id: i64, name: &str) -> Result<Department> {
    let department = sqlx::query_as::<_, Department>(
        r#"
        INSERT INTO departments (company_id, name)
        VALUES (?, ?)
        RETURNING id, company_id, name
        "#,
    )
    .bind(company_id)
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok(department)
}

pub async fn list_departments_for_company(
    pool: &SqlitePool,
    company_id: i64,
) -> Result<Vec<Department>> {
    let departments = sqlx::query_as::<_, Department>(
        r#"
        SELECT id, company_id, name
        FROM departments
        WHERE company_id = ?
        ORDER BY id
        "#,
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?;
    Ok(departments)
}

pub async fn find_department(pool: &SqlitePool, id: i64) -> Result<Option<Department>> {
    let department = sqlx::query_as::<_, Department>(
        r#"
        SELECT id, company_id, name
        FROM departments
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(department)
}

/// Client setup: the company and its GHE departments land together or not at all.
pub async fn create_company_with_departments(
    pool: &SqlitePool,
    name: &str,
    size: CompanySize,
    copsoq_version: CopsoqVersion,
    min_respondents: u32,
    departments: &[String],
) -> Result<(Company, Vec<Department>)> {
    let mut tx = pool.begin().await?;

    let company = sqlx::query_as::<_, Company>(
        r#"
        INSERT INTO companies (name, size, copsoq_version, min_respondents)
        VALUES (?, ?, ?, ?)
        RETURNING id, name, size, copsoq_version
        "#,
    )
    .bind(name)
    .bind(size)
    .bind(copsoq_version)
    .bind(min_respondents)
    .fetch_one(&mut *tx)
    .await?;

    let mut created = Vec::with_capacity(departments.len());
    for dept_name in departments {
        let department = sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO departments (company_id, name)
            VALUES (?, ?)
            RETURNING id, company_id, name
            "#,
        )
        .bind(company.id)
        .bind(dept_name)
        .fetch_one(&mut *tx)
        .await?;
        created.push(department);
    }

    tx.commit().await?;
    Ok((company, created))
}

// ========== Campaigns ==========

pub async fn insert_campaign(pool: &SqlitePool, company_id: i64, name: &str) -> Result<Campaign> {
    let campaign = sqlx::query_as::<_, Campaign>(
        r#"
        INSERT INTO campaigns (company_id, name, status)
        VALUES (?, ?, ?)
        RETURNING id, company_id, name, status, created_at
        "#,
    )
    .bind(company_id)
    .bind(name)
    .bind(CampaignStatus::Draft)
    .fetch_one(pool)
    .await?;
    Ok(campaign)
}

pub async fn list_campaigns_for_company(pool: &SqlitePool, company_id: i64) -> Result<Vec<Campaign>> {
    let campaigns = sqlx::query_as::<_, Campaign>(
        r#"
        SELECT id, company_id, name, status, created_at
        FROM campaigns
        WHERE company_id = ?
        ORDER BY id
        "#,
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?;
    Ok(campaigns)
}

pub async fn find_campaign(pool: &SqlitePool, id: i64) -> Result<Option<Campaign>> {
    let campaign = sqlx::query_as::<_, Campaign>(
        r#"
        SELECT id, company_id, name, status, created_at
        FROM campaigns
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(campaign)
}

/// Moves the campaign only if it is still in `from`. Returns the updated row,
/// or `None` when another request changed the status first.
pub async fn update_campaign_status(
    pool: &SqlitePool,
    id: i64,
    from: CampaignStatus,
    to: CampaignStatus,
) -> Result<Option<Campaign>> {
    let campaign = sqlx::query_as::<_, Campaign>(
        r#"
        UPDATE campaigns
        SET status = ?
        WHERE id = ? AND status = ?
        RETURNING id, company_id, name, status, created_at
        "#,
    )
    .bind(to)
    .bind(id)
    .bind(from)
    .fetch_optional(pool)
    .await?;
    Ok(campaign)
}

// ========== Responses ==========

pub async fn insert_response(
    pool: &SqlitePool,
    campaign_id: i64,
    department_id: i64,
    scores: &DimensionScores,
) -> Result<SurveyResponse> {
    let response = sqlx::query_as::<_, SurveyResponse>(
        r#"
        INSERT INTO responses (campaign_id, department_id, scores)
        VALUES (?, ?, ?)
        RETURNING id, campaign_id, department_id, scores
        "#,
    )
    .bind(campaign_id)
    .bind(department_id)
    .bind(Json(scores))
    .fetch_one(pool)
    .await?;
    Ok(response)
}

pub async fn list_responses_for_campaign(
    pool: &SqlitePool,
    campaign_id: i64,
) -> Result<Vec<SurveyResponse>> {
    let responses = sqlx::query_as::<_, SurveyResponse>(
        r#"
        SELECT id, campaign_id, department_id, scores
        FROM responses
        WHERE campaign_id = ?
        ORDER BY id
        "#,
    )
    .bind(campaign_id)
    .fetch_all(pool)
    .await?;
    Ok(responses)
}
