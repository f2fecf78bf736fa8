use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

/// Headcount band declared by a company at signup/setup.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
pub enum CompanySize {
    #[serde(rename = "1-50")]
    #[sqlx(rename = "1-50")]
    Small,
    #[serde(rename = "51-500")]
    #[sqlx(rename = "51-500")]
    Medium,
    #[serde(rename = "1000+")]
    #[sqlx(rename = "1000+")]
    Large,
}

impl CompanySize {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanySize::Small => "1-50",
            CompanySize::Medium => "51-500",
            CompanySize::Large => "1000+",
        }
    }

    /// Companies between 501 and 999 people fall into the large band; the
    /// questionnaire only distinguishes three sizes.
    pub fn for_headcount(headcount: u32) -> Option<Self> {
        match headcount {
            0 => None,
            1..=50 => Some(CompanySize::Small),
            51..=500 => Some(CompanySize::Medium),
            _ => Some(CompanySize::Large),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CopsoqVersion {
    Short,
    Medium,
    Long,
}

impl CopsoqVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopsoqVersion::Short => "short",
            CopsoqVersion::Medium => "medium",
            CopsoqVersion::Long => "long",
        }
    }

    pub fn for_headcount(headcount: u32) -> Option<Self> {
        match headcount {
            0 => None,
            1..=50 => Some(CopsoqVersion::Short),
            51..=1000 => Some(CopsoqVersion::Medium),
            _ => Some(CopsoqVersion::Long),
        }
    }

    /// Number of questionnaire dimensions covered by each version.
    pub fn dimension_count(&self) -> usize {
        match self {
            CopsoqVersion::Short => 15,
            CopsoqVersion::Medium => 25,
            CopsoqVersion::Long => 32,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Active,
    Completed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Active => "active",
            CampaignStatus::Completed => "completed",
        }
    }

    /// Campaigns only move forward: draft -> active -> completed.
    pub fn can_transition_to(&self, next: CampaignStatus) -> bool {
        matches!(
            (self, next),
            (CampaignStatus::Draft, CampaignStatus::Active)
                | (CampaignStatus::Active, CampaignStatus::Completed)
        )
    }

    pub fn accepts_responses(&self) -> bool {
        matches!(self, CampaignStatus::Active)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub size: CompanySize,
    pub copsoq_version: CopsoqVersion,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Department {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Campaign {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub status: CampaignStatus,
    pub created_at: NaiveDateTime,
}

/// Per-dimension scores (0-100) of a single respondent.
pub type DimensionScores = BTreeMap<String, f64>;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SurveyResponse {
    pub id: i64,
    pub campaign_id: i64,
    pub department_id: i64,
    pub scores: sqlx::types::Json<DimensionScores>,
}
