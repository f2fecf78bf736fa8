//! COPSOQ scoring: Likert answers -> 0-100 points, dimension means and the
//! anonymity rules applied when aggregating homogeneous exposure groups.

use crate::domain::models::DimensionScores;
use crate::domain::risk::Probability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MIN_RESPONDENTS_FLOOR: u32 = 3;
pub const MIN_RESPONDENTS_CEIL: u32 = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LikertAnswer {
    Never,
    Rarely,
    Sometimes,
    Often,
    Always,
}

impl LikertAnswer {
    pub fn points(&self) -> u8 {
        match self {
            LikertAnswer::Never => 0,
            LikertAnswer::Rarely => 25,
            LikertAnswer::Sometimes => 50,
            LikertAnswer::Often => 75,
            LikertAnswer::Always => 100,
        }
    }
}

pub fn dimension_score(answers: &[LikertAnswer]) -> Option<f64> {
    if answers.is_empty() {
        return None;
    }
    let total: u32 = answers.iter().map(|a| a.points() as u32).sum();
    Some(total as f64 / answers.len() as f64)
}

/// Turns a respondent's raw answers into per-dimension scores. Dimensions
/// without any answered item are left out.
pub fn score_answers(answers: &BTreeMap<String, Vec<LikertAnswer>>) -> DimensionScores {
    answers
        .iter()
        .filter_map(|(dimension, items)| {
            dimension_score(items).map(|score| (dimension.clone(), score))
        })
        .collect()
}

pub fn clamp_min_respondents(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(MIN_RESPONDENTS_FLOOR)
        .clamp(MIN_RESPONDENTS_FLOOR, MIN_RESPONDENTS_CEIL)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DimensionResult {
    pub dimension: String,
    pub score: f64,
    pub respondents: usize,
    pub probability: Probability,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupResult {
    pub respondents: usize,
    /// Set when the group is below the anonymity threshold; no scores are
    /// exposed in that case.
    pub suppressed: bool,
    pub dimensions: Vec<DimensionResult>,
}

impl GroupResult {
    fn suppressed(respondents: usize) -> Self {
        Self {
            respondents,
            suppressed: true,
            dimensions: Vec::new(),
        }
    }
}

fn dimension_result(dimension: &str, sum: f64, count: usize) -> Option<DimensionResult> {
    let score = sum / count as f64;
    match Probability::for_mean_score(score) {
        Ok(probability) => Some(DimensionResult {
            dimension: dimension.to_string(),
            score,
            respondents: count,
            probability,
        }),
        Err(e) => {
            tracing::warn!("Skipping dimension {}: {}", dimension, e);
            None
        }
    }
}

/// Arithmetic mean per dimension across every respondent of the group.
/// Dimensions answered by fewer than `min_respondents` people are dropped
/// even when the group itself is large enough.
pub fn aggregate(responses: &[DimensionScores], min_respondents: u32) -> GroupResult {
    let respondents = responses.len();
    if respondents < min_respondents as usize {
        return GroupResult::suppressed(respondents);
    }

    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for scores in responses {
        for (dimension, score) in scores {
            let entry = sums.entry(dimension.as_str()).or_insert((0.0, 0));
            entry.0 += score;
            entry.1 += 1;
        }
    }

    let dimensions = sums
        .into_iter()
        .filter(|(_, (_, count))| *count >= min_respondents as usize)
        .filter_map(|(dimension, (sum, count))| dimension_result(dimension, sum, count))
        .collect();

    GroupResult {
        respondents,
        suppressed: false,
        dimensions,
    }
}

/// Combines already published groups. Built only from published cells, so
/// it never carries information about suppressed groups or dimensions.
pub fn combine_published<'a, I>(groups: I, min_respondents: u32) -> GroupResult
where
    I: IntoIterator<Item = &'a GroupResult>,
{
    let mut respondents = 0;
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for group in groups.into_iter().filter(|g| !g.suppressed) {
        respondents += group.respondents;
        for cell in &group.dimensions {
            let entry = sums.entry(cell.dimension.as_str()).or_insert((0.0, 0));
            entry.0 += cell.score * cell.respondents as f64;
            entry.1 += cell.respondents;
        }
    }

    if respondents < min_respondents as usize {
        return GroupResult::suppressed(respondents);
    }

    let dimensions = sums
        .into_iter()
        .filter_map(|(dimension, (sum, count))| dimension_result(dimension, sum, count))
        .collect();

    GroupResult {
        respondents,
        suppressed: false,
        dimensions,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MergedGroup<K> {
    /// Groups too small to be shown on their own.
    pub members: Vec<K>,
    #[serde(flatten)]
    pub result: GroupResult,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Breakdown<K> {
    pub groups: Vec<(K, GroupResult)>,
    pub merged: MergedGroup<K>,
    pub overall: GroupResult,
}

/// Per-group results for a set of homogeneous exposure groups. Groups under
/// the threshold are pooled into one merged group, which is itself
/// suppressed while still under the threshold. The overall figure only
/// combines what is published.
pub fn breakdown<K>(groups: Vec<(K, Vec<DimensionScores>)>, min_respondents: u32) -> Breakdown<K> {
    let mut published = Vec::new();
    let mut members = Vec::new();
    let mut pooled = Vec::new();

    for (key, responses) in groups {
        if responses.len() >= min_respondents as usize {
            let result = aggregate(&responses, min_respondents);
            published.push((key, result));
        } else {
            members.push(key);
            pooled.extend(responses);
        }
    }

    let merged = MergedGroup {
        members,
        result: aggregate(&pooled, min_respondents),
    };
    let overall = combine_published(
        published
            .iter()
            .map(|(_, r)| r)
            .chain(std::iter::once(&merged.result)),
        min_respondents,
    );

    Breakdown {
        groups: published,
        merged,
        overall,
    }
}
