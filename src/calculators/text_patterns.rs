//! Conventional-commit taxonomy
//!
//! Classifies free text (commit messages, review comment bodies) into the
//! conventional-commit categories by keyword matching. Matching is
//! first-match-wins in taxonomy order, so a message mentioning both "fix"
//! and "test" counts once, as a fix. Rows of `gpt_conventional_commits.csv`
//! arrive pre-labelled and are folded in by parsing their type column.

use crate::models::ToolData;
use crate::stats::percentage;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Conventional-commit categories, in matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitKind {
    Fix,
    Feat,
    Refactor,
    Docs,
    Test,
    Style,
    Chore,
    Build,
    Ci,
    Perf,
}

impl CommitKind {
    pub const ALL: [CommitKind; 10] = [
        CommitKind::Fix,
        CommitKind::Feat,
        CommitKind::Refactor,
        CommitKind::Docs,
        CommitKind::Test,
        CommitKind::Style,
        CommitKind::Chore,
        CommitKind::Build,
        CommitKind::Ci,
        CommitKind::Perf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommitKind::Fix => "fix",
            CommitKind::Feat => "feat",
            CommitKind::Refactor => "refactor",
            CommitKind::Docs => "docs",
            CommitKind::Test => "test",
            CommitKind::Style => "style",
            CommitKind::Chore => "chore",
            CommitKind::Build => "build",
            CommitKind::Ci => "ci",
            CommitKind::Perf => "perf",
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            CommitKind::Fix => r"\bfix\b|\bbug\b|\berror\b|\bissue\b|\bproblem\b|\bresolve\b|\bcorrect\b",
            CommitKind::Feat => r"\bfeat\b|\bfeature\b|\badd\b|\bimplement\b|\bnew\b|\bcreate\b|\bintroduce\b",
            CommitKind::Refactor => r"\brefactor\b|\brestructure\b|\breorganize\b|\bcleanup\b|\bclean up\b|\bsimplify\b",
            CommitKind::Docs => r"\bdocs\b|\bdocument\b|\breadme\b|\bcomment\b|\bdocstring\b",
            CommitKind::Test => r"\btest\b|\btests\b|\btesting\b|\bspec\b|\bcoverage\b",
            CommitKind::Style => r"\bstyle\b|\bformat\b|\blint\b|\bprettier\b|\bwhitespace\b",
            CommitKind::Chore => r"\bchore\b|\bupdate\b|\bbump\b|\bupgrade\b|\bdependenc",
            CommitKind::Build => r"\bbuild\b|\bcompile\b|\bpackage\b|\bmakefile\b|\bcargo\b",
            CommitKind::Ci => r"\bci\b|\bpipeline\b|\bworkflow\b|\bgithub actions\b|\bjenkins\b",
            CommitKind::Perf => r"\bperf\b|\bperformance\b|\boptimize\b|\bspeed\b|\bfaster\b|\bslow\b",
        }
    }
}

impl fmt::Display for CommitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommitKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim().to_ascii_lowercase())
            .ok_or(())
    }
}

static KIND_PATTERNS: OnceLock<Vec<(CommitKind, Regex)>> = OnceLock::new();

fn kind_patterns() -> &'static [(CommitKind, Regex)] {
    KIND_PATTERNS.get_or_init(|| {
        CommitKind::ALL
            .into_iter()
            .map(|kind| {
                (
                    kind,
                    Regex::new(kind.pattern()).expect("taxonomy pattern"),
                )
            })
            .collect()
    })
}

/// Classify free text; first matching category in taxonomy order wins.
pub fn classify(text: &str) -> Option<CommitKind> {
    let lowered = text.to_lowercase();
    kind_patterns()
        .iter()
        .find(|(_, re)| re.is_match(&lowered))
        .map(|(kind, _)| *kind)
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternCount {
    pub kind: CommitKind,
    pub count: usize,
    /// Share of all classified texts; undefined when nothing classified.
    pub percentage: Option<f64>,
}

/// Category counts over everything classifiable in a tool dataset. Always
/// carries one entry per category, in taxonomy order.
#[derive(Debug, Clone, Serialize)]
pub struct TextPatternBreakdown {
    pub total: usize,
    pub categories: Vec<PatternCount>,
}

impl TextPatternBreakdown {
    pub fn count_of(&self, kind: CommitKind) -> usize {
        self.categories
            .iter()
            .find(|c| c.kind == kind)
            .map_or(0, |c| c.count)
    }
}

pub fn calculate(data: &ToolData) -> TextPatternBreakdown {
    let mut counts = [0usize; CommitKind::ALL.len()];

    // ALL is in declaration order, so the discriminant doubles as the index.
    let mut tally = |kind: Option<CommitKind>| {
        if let Some(kind) = kind {
            counts[kind as usize] += 1;
        }
    };

    for commits in data.commits.values() {
        for commit in commits {
            tally(classify(commit.message()));
        }
    }
    for comments in data.review_comments.values() {
        for comment in comments {
            if let Some(body) = comment.body.as_deref() {
                tally(classify(body));
            }
        }
    }
    // Pre-labelled rows skip keyword matching entirely.
    for row in &data.conventional_commits {
        tally(row.kind.parse().ok());
    }

    let total: usize = counts.iter().sum();
    let categories = CommitKind::ALL
        .into_iter()
        .zip(counts)
        .map(|(kind, count)| PatternCount {
            kind,
            count,
            percentage: percentage(count, total),
        })
        .collect();

    TextPatternBreakdown { total, categories }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::testutil::*;
    use crate::models::{ConventionalCommit, ToolData};

    #[test]
    fn test_first_match_wins_in_taxonomy_order() {
        // "fix the failing test" matches both fix and test; fix comes first.
        assert_eq!(classify("fix the failing test"), Some(CommitKind::Fix));
        assert_eq!(classify("add coverage for parser"), Some(CommitKind::Feat));
        assert_eq!(classify("nothing relevant here"), None);
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        assert_eq!(classify("FIX: Crash on Startup"), Some(CommitKind::Fix));
        assert_eq!(classify("Optimize the hot loop"), Some(CommitKind::Perf));
    }

    #[test]
    fn test_breakdown_combines_sources() {
        let mut data = ToolData::new("t");
        data.commits.insert(
            "1".into(),
            vec![
                commit("alice", "2024-01-01T00:00:00Z", "fix: broken widget"),
                commit("alice", "2024-01-01T01:00:00Z", "implement new widget"),
            ],
        );
        data.review_comments.insert(
            "1".into(),
            vec![serde_json::from_value(serde_json::json!({
                "user": {"login": "bob"},
                "body": "please refactor this block"
            }))
            .unwrap()],
        );
        data.conventional_commits.push(ConventionalCommit {
            kind: "docs".into(),
            title: Some("update readme".into()),
        });

        let breakdown = calculate(&data);
        assert_eq!(breakdown.total, 4);
        assert_eq!(breakdown.count_of(CommitKind::Fix), 1);
        assert_eq!(breakdown.count_of(CommitKind::Feat), 1);
        assert_eq!(breakdown.count_of(CommitKind::Refactor), 1);
        assert_eq!(breakdown.count_of(CommitKind::Docs), 1);
        assert_eq!(breakdown.categories.len(), CommitKind::ALL.len());

        let pct: f64 = breakdown
            .categories
            .iter()
            .filter_map(|c| c.percentage)
            .sum();
        assert!((pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_breakdown_has_no_percentages() {
        let breakdown = calculate(&ToolData::new("t"));
        assert_eq!(breakdown.total, 0);
        assert!(breakdown.categories.iter().all(|c| c.percentage.is_none()));
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in CommitKind::ALL {
            assert_eq!(kind.as_str().parse::<CommitKind>(), Ok(kind));
        }
        assert!("nonsense".parse::<CommitKind>().is_err());
    }
}
