//! Ranker, selector and report builder over a pool of narrative blocks.
//!
//! Every block is scored against the full input pool with one shared
//! activation (same reference time for all blocks), then sorted descending by
//! total score. `slice::sort_by` is stable, so equal scores keep input order.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::narrative::coherence::PoolTags;
use crate::narrative::models::{BlockScore, NarrativeBlock, NarrativeContext, WeightingConfig};
use crate::narrative::scoring::Activation;

/// A block paired with the score it earned in one ranking call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedBlock<'a> {
    pub block: &'a NarrativeBlock,
    pub score: BlockScore,
}

pub fn rank_blocks<'a>(
    blocks: &'a [NarrativeBlock],
    context: &NarrativeContext,
    config: &WeightingConfig,
) -> Vec<RankedBlock<'a>> {
    rank_blocks_at(blocks, context, config, Utc::now())
}

pub fn rank_blocks_at<'a>(
    blocks: &'a [NarrativeBlock],
    context: &NarrativeContext,
    config: &WeightingConfig,
    now: DateTime<Utc>,
) -> Vec<RankedBlock<'a>> {
    config.warn_if_unbalanced();
    let activation = Activation::resolve(context, config, now);
    let pool_tags = PoolTags::new(blocks);

    let mut ranked: Vec<RankedBlock<'a>> = blocks
        .iter()
        .zip(pool_tags.tag_sets())
        .map(|(block, block_tags)| RankedBlock {
            block,
            score: activation.score(block, block_tags, &pool_tags),
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_score.total_cmp(&a.score.total_score));

    debug!(
        pool_size = blocks.len(),
        top_score = ?ranked.first().map(|r| r.score.total_score),
        "Ranked narrative blocks"
    );

    ranked
}

/// Top `top_n` blocks by rank. `0` yields nothing; oversize returns the whole pool.
pub fn select_top<'a>(
    blocks: &'a [NarrativeBlock],
    top_n: usize,
    context: &NarrativeContext,
    config: &WeightingConfig,
) -> Vec<&'a NarrativeBlock> {
    select_top_at(blocks, top_n, context, config, Utc::now())
}

pub fn select_top_at<'a>(
    blocks: &'a [NarrativeBlock],
    top_n: usize,
    context: &NarrativeContext,
    config: &WeightingConfig,
    now: DateTime<Utc>,
) -> Vec<&'a NarrativeBlock> {
    if top_n == 0 {
        return Vec::new();
    }

    rank_blocks_at(blocks, context, config, now)
        .into_iter()
        .take(top_n)
        .map(|ranked| ranked.block)
        .collect()
}

/// Ranked blocks with full score breakdowns, for diagnostic consumers.
/// Same contract as [`rank_blocks`].
pub fn build_report<'a>(
    blocks: &'a [NarrativeBlock],
    context: &NarrativeContext,
    config: &WeightingConfig,
) -> Vec<RankedBlock<'a>> {
    build_report_at(blocks, context, config, Utc::now())
}

pub fn build_report_at<'a>(
    blocks: &'a [NarrativeBlock],
    context: &NarrativeContext,
    config: &WeightingConfig,
    now: DateTime<Utc>,
) -> Vec<RankedBlock<'a>> {
    rank_blocks_at(blocks, context, config, now)
}
