//! Axum route handlers for the Narrative API.

use std::collections::HashSet;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::narrative::models::{BlockScore, NarrativeBlock, NarrativeContext, WeightingConfig};
use crate::narrative::ranking::{build_report, rank_blocks, select_top, RankedBlock};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRequest {
    pub blocks: Vec<NarrativeBlock>,
    #[serde(default)]
    pub context: NarrativeContext,
    #[serde(default)]
    pub config: WeightingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRequest {
    pub blocks: Vec<NarrativeBlock>,
    /// Values ≤ 0 select nothing.
    pub top_n: i64,
    #[serde(default)]
    pub context: NarrativeContext,
    #[serde(default)]
    pub config: WeightingConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedItem {
    pub block: NarrativeBlock,
    pub score: BlockScore,
}

impl From<RankedBlock<'_>> for RankedItem {
    fn from(ranked: RankedBlock<'_>) -> Self {
        Self {
            block: ranked.block.clone(),
            score: ranked.score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub items: Vec<RankedItem>,
}

#[derive(Debug, Serialize)]
pub struct SelectResponse {
    pub blocks: Vec<NarrativeBlock>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub items: Vec<RankedItem>,
    /// The fully resolved config the scores were computed with.
    pub config: WeightingConfig,
    pub factor_sum: f64,
    pub weights_balanced: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/narrative/rank
///
/// Scores every block against the context and returns them best-first.
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    validate_pool(&request.blocks, state.config.max_pool_size)?;

    let items = rank_blocks(&request.blocks, &request.context, &request.config)
        .into_iter()
        .map(RankedItem::from)
        .collect();

    Ok(Json(RankResponse { items }))
}

/// POST /api/v1/narrative/select
///
/// Returns the top N ranked blocks, e.g. for summary or abstract generation.
pub async fn handle_select(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<SelectResponse>, AppError> {
    validate_pool(&request.blocks, state.config.max_pool_size)?;

    let top_n = clamp_top_n(request.top_n);
    let blocks: Vec<NarrativeBlock> =
        select_top(&request.blocks, top_n, &request.context, &request.config)
            .into_iter()
            .cloned()
            .collect();

    info!(
        pool_size = request.blocks.len(),
        selected = blocks.len(),
        "Selected narrative blocks"
    );

    Ok(Json(SelectResponse { blocks }))
}

/// POST /api/v1/narrative/report
///
/// Same ranking as `/rank`, plus the resolved weighting config for auditing.
pub async fn handle_report(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    validate_pool(&request.blocks, state.config.max_pool_size)?;

    let items = build_report(&request.blocks, &request.context, &request.config)
        .into_iter()
        .map(RankedItem::from)
        .collect();

    Ok(Json(ReportResponse {
        items,
        factor_sum: request.config.factor_sum(),
        weights_balanced: request.config.is_balanced(),
        config: request.config,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn validate_pool(blocks: &[NarrativeBlock], max_pool_size: usize) -> Result<(), AppError> {
    if blocks.len() > max_pool_size {
        return Err(AppError::UnprocessableEntity(format!(
            "Pool of {} blocks exceeds the limit of {max_pool_size}",
            blocks.len()
        )));
    }

    if let Some(index) = blocks.iter().position(|b| b.title.trim().is_empty()) {
        return Err(AppError::Validation(format!(
            "blocks[{index}].title cannot be empty"
        )));
    }

    // Titles are the identity key: same-titled blocks are accepted but are
    // not compared with each other for coherence.
    let duplicates = count_duplicate_titles(blocks);
    if duplicates > 0 {
        warn!(duplicates, "Pool contains blocks with duplicate titles");
    }

    Ok(())
}

fn count_duplicate_titles(blocks: &[NarrativeBlock]) -> usize {
    let mut seen = HashSet::new();
    blocks
        .iter()
        .filter(|b| !seen.insert(b.title.as_str()))
        .count()
}

fn clamp_top_n(top_n: i64) -> usize {
    if top_n <= 0 {
        0
    } else {
        usize::try_from(top_n).unwrap_or(usize::MAX)
    }
}
