//! Spearman correlations over PR-level rows
//!
//! A fixed set of hypotheses about how AI participation relates to PR
//! outcomes, each a Spearman rank correlation over the per-PR records.
//! Pairs involving merge time run over merged PRs only. A pair is reported
//! when at least three observations exist and the coefficient is defined.

use crate::calculators::pr_level::PrRecord;
use crate::stats::spearman;
use serde::Serialize;
use std::fmt;

const MIN_OBSERVATIONS: usize = 3;

/// Conventional interpretation bands for |rho|.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
}

impl Strength {
    pub fn of(rho: f64) -> Self {
        let magnitude = rho.abs();
        if magnitude > 0.5 {
            Strength::Strong
        } else if magnitude > 0.3 {
            Strength::Moderate
        } else {
            Strength::Weak
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strength::Strong => "strong",
            Strength::Moderate => "moderate",
            Strength::Weak => "weak",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationResult {
    pub name: String,
    pub rho: f64,
    pub n: usize,
    pub strength: Strength,
}

/// A named pair extractor: per PR, the two values to rank, or `None` to
/// exclude the PR from this pair.
type Extractor = fn(&PrRecord) -> Option<(f64, f64)>;

fn merged_hours(row: &PrRecord) -> Option<f64> {
    if row.is_merged {
        row.time_to_merge_hours
    } else {
        None
    }
}

fn combined_ai_percentage(row: &PrRecord) -> Option<f64> {
    let commit_pct = row.ai_commit_percentage?;
    let comment_pct = row.ai_comment_percentage?;
    Some((commit_pct + comment_pct) / 2.0)
}

const PAIRS: &[(&str, Extractor)] = &[
    ("ai_comments_vs_total_commits", |r| {
        Some((r.ai_comments as f64, r.total_commits as f64))
    }),
    ("ai_comments_vs_human_commits", |r| {
        Some((r.ai_comments as f64, r.human_commits as f64))
    }),
    ("ai_reviews_vs_time_to_merge", |r| {
        Some((r.ai_reviews as f64, merged_hours(r)?))
    }),
    ("total_comments_vs_time_to_merge", |r| {
        Some((r.total_comments as f64, merged_hours(r)?))
    }),
    ("total_reviews_vs_total_commits", |r| {
        Some((r.total_reviews as f64, r.total_commits as f64))
    }),
    ("ai_commits_vs_human_comments", |r| {
        Some((r.ai_commits as f64, r.human_comments as f64))
    }),
    ("ai_percentage_vs_time_to_merge", |r| {
        Some((combined_ai_percentage(r)?, merged_hours(r)?))
    }),
];

pub fn calculate(rows: &[PrRecord]) -> Vec<CorrelationResult> {
    let mut results = Vec::new();
    for (name, extract) in PAIRS {
        let (xs, ys): (Vec<f64>, Vec<f64>) = rows.iter().filter_map(extract).unzip();
        if xs.len() < MIN_OBSERVATIONS {
            continue;
        }
        if let Some(rho) = spearman(&xs, &ys) {
            results.push(CorrelationResult {
                name: (*name).to_string(),
                rho,
                n: xs.len(),
                strength: Strength::of(rho),
            });
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        pr_id: u64,
        ai_comments: usize,
        total_commits: usize,
        merge_hours: Option<f64>,
    ) -> PrRecord {
        PrRecord {
            pr_id,
            total_commits,
            ai_commits: 0,
            human_commits: total_commits,
            ai_commit_percentage: Some(0.0),
            total_comments: ai_comments,
            ai_comments,
            human_comments: 0,
            ai_comment_percentage: Some(100.0),
            total_reviews: 0,
            ai_reviews: 0,
            human_reviews: 0,
            ai_review_percentage: None,
            time_to_merge_hours: merge_hours,
            has_related_issue: false,
            has_ai_involvement: ai_comments > 0,
            is_merged: merge_hours.is_some(),
        }
    }

    #[test]
    fn test_monotone_pair_reports_rho_one() {
        let rows = vec![
            row(1, 1, 2, None),
            row(2, 2, 4, None),
            row(3, 3, 6, None),
            row(4, 4, 8, None),
        ];
        let results = calculate(&rows);
        let result = results
            .iter()
            .find(|r| r.name == "ai_comments_vs_total_commits")
            .unwrap();
        assert!((result.rho - 1.0).abs() < 1e-12);
        assert_eq!(result.n, 4);
        assert_eq!(result.strength, Strength::Strong);
    }

    #[test]
    fn test_merge_pairs_use_merged_prs_only() {
        let rows = vec![
            row(1, 1, 1, Some(10.0)),
            row(2, 2, 1, Some(20.0)),
            row(3, 3, 1, Some(5.0)),
            row(4, 9, 1, None), // unmerged, excluded from merge-time pairs
        ];
        let results = calculate(&rows);
        let result = results
            .iter()
            .find(|r| r.name == "total_comments_vs_time_to_merge")
            .unwrap();
        assert_eq!(result.n, 3);
    }

    #[test]
    fn test_too_few_observations_skips_pair() {
        let rows = vec![row(1, 1, 2, None), row(2, 2, 4, None)];
        assert!(calculate(&rows).is_empty());
    }

    #[test]
    fn test_constant_side_is_skipped_not_zero() {
        // total_commits constant: the pair is undefined and must not appear.
        let rows = vec![row(1, 1, 5, None), row(2, 2, 5, None), row(3, 3, 5, None)];
        let results = calculate(&rows);
        assert!(results
            .iter()
            .all(|r| r.name != "ai_comments_vs_total_commits"));
    }

    #[test]
    fn test_strength_bands() {
        assert_eq!(Strength::of(0.9), Strength::Strong);
        assert_eq!(Strength::of(-0.6), Strength::Strong);
        assert_eq!(Strength::of(0.4), Strength::Moderate);
        assert_eq!(Strength::of(0.1), Strength::Weak);
    }
}
