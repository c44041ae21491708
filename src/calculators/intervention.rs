//! Human intervention after AI feedback
//!
//! An intervention is an AI comment that a human answers with a commit
//! within the configured window, before any further AI comment lands on the
//! PR. The event stream merges the commit table, `committed` timeline
//! entries (deduplicated by sha) and both comment tables, ordered by time.

use crate::classifier::Classifier;
use crate::models::{hours_between, PullRequest, ToolData};
use crate::stats::{mean, median, Summary};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Commit,
    Comment,
}

#[derive(Debug, Clone, Copy)]
pub struct PrEvent {
    pub time: DateTime<Utc>,
    pub kind: EventKind,
    pub is_ai: bool,
}

/// Chronological commit/comment stream of one PR.
pub fn pr_events(data: &ToolData, pr: &PullRequest, classifier: &Classifier) -> Vec<PrEvent> {
    let mut events = Vec::new();
    let mut seen_shas: HashSet<&str> = HashSet::new();

    for commit in data.commits_for(pr) {
        seen_shas.insert(commit.sha.as_str());
        if let Some(time) = commit.authored_at() {
            events.push(PrEvent {
                time,
                kind: EventKind::Commit,
                is_ai: classifier.is_ai_opt(commit.author_id()),
            });
        }
    }
    // Timeline commits fill in what the commit table missed.
    for event in data.timeline_for(pr) {
        if !event.is_commit() {
            continue;
        }
        if event
            .sha
            .as_deref()
            .is_some_and(|sha| seen_shas.contains(sha))
        {
            continue;
        }
        if let Some(time) = event.timestamp() {
            events.push(PrEvent {
                time,
                kind: EventKind::Commit,
                is_ai: classifier.is_ai_opt(event.actor_id()),
            });
        }
    }
    for comment in data.comments_for(pr) {
        if let Some(time) = comment.created_at {
            events.push(PrEvent {
                time,
                kind: EventKind::Comment,
                is_ai: classifier.is_ai_opt(comment.user.as_ref().map(|u| u.login.as_str())),
            });
        }
    }
    for comment in data.review_comments_for(pr) {
        if let Some(time) = comment.created_at {
            events.push(PrEvent {
                time,
                kind: EventKind::Comment,
                is_ai: classifier.is_ai_opt(comment.user.as_ref().map(|u| u.login.as_str())),
            });
        }
    }

    events.sort_by_key(|e| e.time);
    events
}

/// Count interventions in one event stream. For each AI comment, scan
/// forward until the next AI comment; a human commit inside the window
/// counts once and ends the scan.
pub fn count_interventions(events: &[PrEvent], window_hours: f64) -> usize {
    let mut count = 0usize;
    for (i, event) in events.iter().enumerate() {
        if event.kind != EventKind::Comment || !event.is_ai {
            continue;
        }
        for follower in &events[i + 1..] {
            if follower.kind == EventKind::Comment && follower.is_ai {
                break;
            }
            if follower.kind == EventKind::Commit && !follower.is_ai {
                if hours_between(event.time, follower.time) <= window_hours {
                    count += 1;
                }
                break;
            }
        }
    }
    count
}

#[derive(Debug, Clone, Serialize)]
pub struct InterventionSummary {
    pub prs_analyzed: usize,
    pub total_interventions: usize,
    pub interventions_per_pr_mean: Option<f64>,
    pub interventions_per_pr_median: Option<f64>,
    /// Mean of per-PR interventions / events.
    pub mean_intervention_rate: Option<f64>,
    pub prs_with_interventions: usize,
    pub window_hours: f64,
}

pub fn calculate(data: &ToolData, classifier: &Classifier, window_hours: f64) -> InterventionSummary {
    let mut per_pr = Vec::new();
    let mut rates = Vec::new();

    for pr in &data.prs {
        let events = pr_events(data, pr, classifier);
        if events.is_empty() {
            continue;
        }
        let interventions = count_interventions(&events, window_hours);
        per_pr.push(interventions as f64);
        rates.push(interventions as f64 / events.len() as f64);
    }

    let summary = Summary::from_values(&per_pr);
    InterventionSummary {
        prs_analyzed: per_pr.len(),
        total_interventions: per_pr.iter().sum::<f64>() as usize,
        interventions_per_pr_mean: summary.map(|s| s.mean),
        interventions_per_pr_median: if per_pr.is_empty() {
            None
        } else {
            Some(median(&per_pr))
        },
        mean_intervention_rate: if rates.is_empty() {
            None
        } else {
            Some(mean(&rates))
        },
        prs_with_interventions: per_pr.iter().filter(|&&n| n > 0.0).count(),
        window_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::testutil::*;
    use crate::models::ToolData;

    fn event(time: &str, kind: EventKind, is_ai: bool) -> PrEvent {
        PrEvent {
            time: ts(time),
            kind,
            is_ai,
        }
    }

    #[test]
    fn test_human_commit_after_ai_comment_counts() {
        let events = [
            event("2024-01-01T00:00:00Z", EventKind::Comment, true),
            event("2024-01-01T05:00:00Z", EventKind::Commit, false),
        ];
        assert_eq!(count_interventions(&events, 72.0), 1);
    }

    #[test]
    fn test_window_bounds_the_response() {
        let events = [
            event("2024-01-01T00:00:00Z", EventKind::Comment, true),
            event("2024-01-05T00:00:00Z", EventKind::Commit, false), // 96h later
        ];
        assert_eq!(count_interventions(&events, 72.0), 0);
        assert_eq!(count_interventions(&events, 100.0), 1);
    }

    #[test]
    fn test_next_ai_comment_closes_the_scan() {
        let events = [
            event("2024-01-01T00:00:00Z", EventKind::Comment, true),
            event("2024-01-01T01:00:00Z", EventKind::Comment, true),
            event("2024-01-01T02:00:00Z", EventKind::Commit, false),
        ];
        // The first AI comment is superseded before any human commit; only
        // the second one is answered.
        assert_eq!(count_interventions(&events, 72.0), 1);
    }

    #[test]
    fn test_ai_commit_is_not_an_intervention() {
        let events = [
            event("2024-01-01T00:00:00Z", EventKind::Comment, true),
            event("2024-01-01T01:00:00Z", EventKind::Commit, true),
        ];
        assert_eq!(count_interventions(&events, 72.0), 0);
    }

    #[test]
    fn test_appending_events_never_reduces_count() {
        let mut events = vec![
            event("2024-01-01T00:00:00Z", EventKind::Comment, true),
            event("2024-01-01T01:00:00Z", EventKind::Commit, false),
        ];
        let before = count_interventions(&events, 72.0);
        events.push(event("2024-01-02T00:00:00Z", EventKind::Comment, true));
        events.push(event("2024-01-02T01:00:00Z", EventKind::Commit, false));
        assert!(count_interventions(&events, 72.0) >= before);
    }

    #[test]
    fn test_event_stream_dedupes_timeline_commits() {
        let classifier = Classifier::default();
        let mut data = ToolData::new("t");
        let p = pr(1, "2024-01-01T00:00:00Z");
        let c = commit("alice", "2024-01-01T01:00:00Z", "fix");
        let sha = c.sha.clone();
        data.commits.insert(p.key(), vec![c]);
        data.timelines.insert(
            p.key(),
            vec![
                // Same commit surfaced through the timeline.
                serde_json::from_value(serde_json::json!({
                    "event": "committed",
                    "sha": sha,
                    "author": {"name": "alice", "date": "2024-01-01T01:00:00Z"}
                }))
                .unwrap(),
                // A commit only the timeline knows about.
                serde_json::from_value(serde_json::json!({
                    "event": "committed",
                    "sha": "other",
                    "author": {"name": "alice", "date": "2024-01-01T02:00:00Z"}
                }))
                .unwrap(),
            ],
        );
        data.prs.push(p);

        let events = pr_events(&data, &data.prs[0], &classifier);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_summary_over_prs() {
        let classifier = Classifier::default();
        let mut data = ToolData::new("t");

        let p1 = pr(1, "2024-01-01T00:00:00Z");
        data.comments
            .insert(p1.key(), vec![comment("copilot", "2024-01-01T00:00:00Z")]);
        data.commits.insert(
            p1.key(),
            vec![commit("alice", "2024-01-01T01:00:00Z", "fix")],
        );
        data.prs.push(p1);

        let p2 = pr(2, "2024-01-01T00:00:00Z");
        data.comments
            .insert(p2.key(), vec![comment("bob", "2024-01-01T00:00:00Z")]);
        data.prs.push(p2);

        let summary = calculate(&data, &classifier, 72.0);
        assert_eq!(summary.prs_analyzed, 2);
        assert_eq!(summary.total_interventions, 1);
        assert_eq!(summary.prs_with_interventions, 1);
        assert_eq!(summary.interventions_per_pr_mean, Some(0.5));
        assert_eq!(summary.window_hours, 72.0);
    }
}
