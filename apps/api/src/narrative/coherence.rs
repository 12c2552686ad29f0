use std::collections::BTreeSet;

use crate::narrative::models::NarrativeBlock;
use crate::narrative::templates::{sequence_position, CANONICAL_SEQUENCE};

/// Score for an empty pool or a block with no peers to compare against.
pub const NEUTRAL_COHERENCE: f64 = 0.5;

/// Titles and normalized tags of a pool, built once per call so peer
/// comparison does not re-normalize every block for every other block.
#[derive(Debug, Clone, Default)]
pub struct PoolTags<'a> {
    entries: Vec<(&'a str, BTreeSet<String>)>,
}

impl<'a> PoolTags<'a> {
    pub fn new(pool: &'a [NarrativeBlock]) -> Self {
        Self {
            entries: pool
                .iter()
                .map(|block| (block.title.as_str(), block.normalized_tags()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalized tag sets in pool order.
    pub fn tag_sets(&self) -> impl Iterator<Item = &BTreeSet<String>> {
        self.entries.iter().map(|(_, tags)| tags)
    }
}

/// Measures how well a block fits the narrative.
///
/// Blocks produced by a canonical-sequence template score by position,
/// `(index + 1) / len`. Any other block scores the share of its peers
/// (pool members with a different title) sharing at least one tag with it.
/// Blocks sharing a title are the same block for this purpose and never
/// count each other.
///
/// `context_arc` is reserved for stage/epoch-aware coherence and is not read.
pub fn compute_coherence_score(
    block: &NarrativeBlock,
    pool: &[NarrativeBlock],
    context_arc: &[String],
) -> f64 {
    coherence_in_pool(block, &block.normalized_tags(), &PoolTags::new(pool), context_arc)
}

/// Same as [`compute_coherence_score`] over pre-normalized tags.
pub fn coherence_in_pool(
    block: &NarrativeBlock,
    block_tags: &BTreeSet<String>,
    pool: &PoolTags<'_>,
    _context_arc: &[String],
) -> f64 {
    if pool.is_empty() {
        return NEUTRAL_COHERENCE;
    }

    if let Some(index) = block.template_id.as_deref().and_then(sequence_position) {
        return (index + 1) as f64 / CANONICAL_SEQUENCE.len() as f64;
    }

    let mut compared = 0usize;
    let mut sharing = 0usize;

    for (_, peer_tags) in pool.entries.iter().filter(|(title, _)| *title != block.title) {
        compared += 1;
        if !peer_tags.is_disjoint(block_tags) {
            sharing += 1;
        }
    }

    if compared == 0 {
        return NEUTRAL_COHERENCE;
    }

    sharing as f64 / compared as f64
}
