//! Relevance — tag matching against the activation context.
//!
//! Points per normalized block tag:
//! - tag in active tags → 2.0 (exact match)
//! - otherwise tag in priority keywords → 1.5 (keyword boost)
//! - tag in mask include tags → +2.0 (mask affinity, stacks with the above)
//!
//! Any overlap with the mask's exclude tags vetoes the block outright (0.0).
//! The point total saturates at 10 and is normalized into [0, 1].

use std::collections::BTreeSet;

use crate::narrative::models::{normalize_tags, Mask};

pub const EXACT_MATCH_POINTS: f64 = 2.0;
pub const KEYWORD_BOOST_POINTS: f64 = 1.5;
pub const MASK_AFFINITY_POINTS: f64 = 2.0;
pub const RELEVANCE_CEILING: f64 = 10.0;

/// A mask's filters, normalized once per call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaskTags {
    pub include: BTreeSet<String>,
    pub exclude: BTreeSet<String>,
}

impl MaskTags {
    pub fn from_mask(mask: &Mask) -> Self {
        Self {
            include: normalize_tags(&mask.filters.include_tags),
            exclude: normalize_tags(&mask.filters.exclude_tags),
        }
    }

    /// True when any block tag is excluded by the mask.
    pub fn vetoes(&self, block_tags: &BTreeSet<String>) -> bool {
        !self.exclude.is_disjoint(block_tags)
    }
}

pub fn compute_relevance_score(
    block_tags: &BTreeSet<String>,
    mask: Option<&MaskTags>,
    active_tags: &BTreeSet<String>,
    priority_keywords: &BTreeSet<String>,
) -> f64 {
    // Exclusion wins over every positive signal, including include_tags.
    if let Some(mask) = mask {
        if mask.vetoes(block_tags) {
            return 0.0;
        }
    }

    let tag_points: f64 = block_tags
        .iter()
        .map(|tag| {
            if active_tags.contains(tag) {
                EXACT_MATCH_POINTS
            } else if priority_keywords.contains(tag) {
                KEYWORD_BOOST_POINTS
            } else {
                0.0
            }
        })
        .sum();

    let affinity_points = mask
        .map(|m| m.include.intersection(block_tags).count() as f64 * MASK_AFFINITY_POINTS)
        .unwrap_or(0.0);

    (tag_points + affinity_points).min(RELEVANCE_CEILING) / RELEVANCE_CEILING
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(raw: &[&str]) -> BTreeSet<String> {
        normalize_tags(raw)
    }

    fn mask(include: &[&str], exclude: &[&str]) -> MaskTags {
        MaskTags::from_mask(&Mask::new(include, exclude))
    }

    #[test]
    fn test_no_tags_scores_zero() {
        let score = compute_relevance_score(&tags(&[]), None, &tags(&["rust"]), &tags(&[]));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_exact_match_points() {
        // 2 exact matches = 4 points → 0.4
        let score = compute_relevance_score(
            &tags(&["rust", "systems", "cooking"]),
            None,
            &tags(&["rust", "systems"]),
            &tags(&[]),
        );
        assert!((score - 0.4).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_active_match_is_exclusive_of_keyword_boost() {
        // "rust" is both active and a keyword: only 2.0 is awarded
        let score = compute_relevance_score(
            &tags(&["rust"]),
            None,
            &tags(&["rust"]),
            &tags(&["rust"]),
        );
        assert!((score - 0.2).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_keyword_boost_without_active_match() {
        let score = compute_relevance_score(
            &tags(&["impact"]),
            None,
            &tags(&[]),
            &tags(&["impact"]),
        );
        assert!((score - 0.15).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_mask_affinity_stacks_with_exact_match() {
        // active 2.0 + include 2.0 = 4.0 → 0.4
        let score = compute_relevance_score(
            &tags(&["analysis"]),
            Some(&mask(&["analysis"], &[])),
            &tags(&["analysis"]),
            &tags(&[]),
        );
        assert!((score - 0.4).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_exclusion_vetoes_regardless_of_matches() {
        let block = tags(&["analysis", "metrics", "impact", "confidential"]);
        let score = compute_relevance_score(
            &block,
            Some(&mask(&["analysis", "metrics", "impact"], &["confidential"])),
            &tags(&["analysis", "metrics", "impact"]),
            &tags(&["impact"]),
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_exclusion_wins_when_filters_overlap() {
        let score = compute_relevance_score(
            &tags(&["rust"]),
            Some(&mask(&["rust"], &["rust"])),
            &tags(&["rust"]),
            &tags(&[]),
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_relevance_saturates_at_ceiling() {
        let block = tags(&["a", "b", "c", "d", "e", "f"]);
        let score = compute_relevance_score(
            &block,
            Some(&mask(&["a", "b", "c"], &[])),
            &block,
            &tags(&[]),
        );
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let score = compute_relevance_score(
            &tags(&["Leadership"]),
            Some(&mask(&["LEADERSHIP"], &[])),
            &tags(&["leadership"]),
            &tags(&[]),
        );
        assert!((score - 0.4).abs() < 1e-9, "Score was {score}");
    }
}
