//! CSV artifact exporter
//!
//! Writes the comparison tables the downstream analysis consumes. Cross-tool
//! tables hold one row per tool (or per tool/group); per-tool tables are
//! suffixed with the tool name. An undefined metric is an empty cell, never
//! a zero.

use crate::calculators::ToolReport;
use crate::stats::Summary;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn summary_cells(summary: &Option<Summary>) -> [String; 6] {
    match summary {
        Some(s) => [
            s.count.to_string(),
            s.mean.to_string(),
            s.median.to_string(),
            s.std_dev.to_string(),
            s.min.to_string(),
            s.max.to_string(),
        ],
        None => Default::default(),
    }
}

struct Exporter<'a> {
    dir: &'a Path,
    written: Vec<PathBuf>,
}

impl<'a> Exporter<'a> {
    fn writer(&mut self, name: &str) -> Result<csv::Writer<std::fs::File>> {
        let path = self.dir.join(name);
        let writer = csv::Writer::from_path(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        self.written.push(path);
        Ok(writer)
    }

    fn summary_table(
        &mut self,
        name: &str,
        reports: &[ToolReport],
        metrics: &[(&str, fn(&ToolReport) -> Option<Summary>)],
    ) -> Result<()> {
        let mut w = self.writer(name)?;
        w.write_record([
            "tool", "metric", "count", "mean", "median", "std_dev", "min", "max",
        ])?;
        for report in reports {
            for (metric, get) in metrics {
                let cells = summary_cells(&get(report));
                let mut record = vec![report.tool.clone(), (*metric).to_string()];
                record.extend(cells);
                w.write_record(&record)?;
            }
        }
        Ok(w.flush()?)
    }
}

/// Write every artifact table; returns the paths written.
pub fn export(reports: &[ToolReport], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut exporter = Exporter {
        dir,
        written: Vec::new(),
    };

    feedback_loop(&mut exporter, reports)?;
    cognitive_load(&mut exporter, reports)?;
    flow(&mut exporter, reports)?;
    profile(&mut exporter, reports)?;
    summary_comparison(&mut exporter, reports)?;
    text_patterns(&mut exporter, reports)?;
    commit_attribution(&mut exporter, reports)?;
    comment_attribution(&mut exporter, reports)?;
    issue_reporters(&mut exporter, reports)?;
    ai_split(&mut exporter, reports)?;
    review_cycle(&mut exporter, reports)?;
    intervention(&mut exporter, reports)?;
    correlations(&mut exporter, reports)?;
    for report in reports {
        per_tool(&mut exporter, report)?;
    }

    info!(
        files = exporter.written.len(),
        dir = %dir.display(),
        "exported CSV artifacts"
    );
    Ok(exporter.written)
}

fn feedback_loop(ex: &mut Exporter, reports: &[ToolReport]) -> Result<()> {
    ex.summary_table(
        "feedback_loop_metrics.csv",
        reports,
        &[
            ("time_to_merge_hours", |r| r.feedback_loop.time_to_merge_hours),
            ("reviews_per_pr", |r| r.feedback_loop.reviews_per_pr),
            ("comments_per_pr", |r| r.feedback_loop.comments_per_pr),
            ("time_to_first_review_hours", |r| {
                r.feedback_loop.time_to_first_review_hours
            }),
            ("review_span_hours", |r| r.feedback_loop.review_span_hours),
        ],
    )
}

fn cognitive_load(ex: &mut Exporter, reports: &[ToolReport]) -> Result<()> {
    let mut w = ex.writer("cognitive_load_metrics.csv")?;
    w.write_record([
        "tool",
        "conventional_commit_total",
        "total_comments",
        "issues_open",
        "issues_closed",
        "issues_delta",
        "commit_interval_hours_mean",
        "commit_interval_hours_median",
        "files_mentioned_per_pr_mean",
        "code_churn_mean",
        "code_churn_median",
    ])?;
    for r in reports {
        let c = &r.cognitive_load;
        w.write_record([
            r.tool.clone(),
            c.conventional_commit_total.to_string(),
            c.total_comments.to_string(),
            c.issues_open.to_string(),
            c.issues_closed.to_string(),
            c.issues_delta.to_string(),
            opt(c.commit_interval_hours.map(|s| s.mean)),
            opt(c.commit_interval_hours.map(|s| s.median)),
            opt(c.files_mentioned_per_pr.map(|s| s.mean)),
            opt(c.code_churn.map(|s| s.mean)),
            opt(c.code_churn.map(|s| s.median)),
        ])?;
    }
    Ok(w.flush()?)
}

fn flow(ex: &mut Exporter, reports: &[ToolReport]) -> Result<()> {
    let mut w = ex.writer("flow_metrics.csv")?;
    w.write_record([
        "tool",
        "total_prs",
        "prs_open",
        "prs_closed",
        "prs_merged",
        "merge_rate",
        "hours_between_commits_mean",
        "hours_between_commits_median",
        "time_to_merge_hours_mean",
        "time_to_merge_hours_median",
    ])?;
    for r in reports {
        let f = &r.flow;
        w.write_record([
            r.tool.clone(),
            f.total_prs.to_string(),
            f.prs_open.to_string(),
            f.prs_closed.to_string(),
            f.prs_merged.to_string(),
            opt(f.merge_rate),
            opt(f.hours_between_commits.map(|s| s.mean)),
            opt(f.hours_between_commits.map(|s| s.median)),
            opt(f.time_to_merge_hours.map(|s| s.mean)),
            opt(f.time_to_merge_hours.map(|s| s.median)),
        ])?;
    }
    Ok(w.flush()?)
}

fn profile(ex: &mut Exporter, reports: &[ToolReport]) -> Result<()> {
    let mut w = ex.writer("profile_metrics.csv")?;
    w.write_record([
        "tool",
        "developer_count",
        "repo_count",
        "unique_languages",
        "primary_language",
        "total_stars",
        "total_forks",
        "mean_followers",
        "mean_public_repos",
    ])?;
    for r in reports {
        let p = &r.profile;
        w.write_record([
            r.tool.clone(),
            p.developer_count.to_string(),
            p.repo_count.to_string(),
            p.unique_languages.to_string(),
            p.primary_language.clone().unwrap_or_default(),
            p.total_stars.to_string(),
            p.total_forks.to_string(),
            opt(p.mean_followers),
            opt(p.mean_public_repos),
        ])?;
    }
    Ok(w.flush()?)
}

/// Headline numbers, one row per tool.
fn summary_comparison(ex: &mut Exporter, reports: &[ToolReport]) -> Result<()> {
    let mut w = ex.writer("summary_comparison.csv")?;
    w.write_record([
        "tool",
        "ruleset_version",
        "total_prs",
        "merge_rate",
        "time_to_merge_hours_mean",
        "ai_commit_percentage",
        "ai_comment_percentage",
        "interventions_per_pr_mean",
    ])?;
    for r in reports {
        w.write_record([
            r.tool.clone(),
            r.ruleset_version.clone(),
            r.flow.total_prs.to_string(),
            opt(r.flow.merge_rate),
            opt(r.flow.time_to_merge_hours.map(|s| s.mean)),
            opt(r.commit_attribution.ai_percentage),
            opt(r.comment_attribution.ai_percentage),
            opt(r.intervention.interventions_per_pr_mean),
        ])?;
    }
    Ok(w.flush()?)
}

fn text_patterns(ex: &mut Exporter, reports: &[ToolReport]) -> Result<()> {
    let mut w = ex.writer("text_patterns_comparison.csv")?;
    w.write_record(["tool", "category", "count", "percentage"])?;
    for r in reports {
        for category in &r.text_patterns.categories {
            w.write_record([
                r.tool.clone(),
                category.kind.to_string(),
                category.count.to_string(),
                opt(category.percentage),
            ])?;
        }
    }
    Ok(w.flush()?)
}

fn commit_attribution(ex: &mut Exporter, reports: &[ToolReport]) -> Result<()> {
    let mut w = ex.writer("ai_vs_human_commits.csv")?;
    w.write_record([
        "tool",
        "ai_commits",
        "human_commits",
        "total_commits",
        "ai_percentage",
        "ai_author_count",
        "human_author_count",
    ])?;
    for r in reports {
        let a = &r.commit_attribution;
        w.write_record([
            r.tool.clone(),
            a.ai_commits.to_string(),
            a.human_commits.to_string(),
            a.total_commits.to_string(),
            opt(a.ai_percentage),
            a.ai_author_count.to_string(),
            a.human_author_count.to_string(),
        ])?;
    }
    Ok(w.flush()?)
}

fn comment_attribution(ex: &mut Exporter, reports: &[ToolReport]) -> Result<()> {
    let mut w = ex.writer("ai_vs_human_comments.csv")?;
    w.write_record([
        "tool",
        "ai_comments",
        "human_comments",
        "total_comments",
        "ai_percentage",
        "ai_reviewer_count",
        "human_reviewer_count",
    ])?;
    for r in reports {
        let a = &r.comment_attribution;
        w.write_record([
            r.tool.clone(),
            a.ai_comments.to_string(),
            a.human_comments.to_string(),
            a.total_comments.to_string(),
            opt(a.ai_percentage),
            a.ai_reviewer_count.to_string(),
            a.human_reviewer_count.to_string(),
        ])?;
    }
    Ok(w.flush()?)
}

fn issue_reporters(ex: &mut Exporter, reports: &[ToolReport]) -> Result<()> {
    let mut w = ex.writer("issue_reporters.csv")?;
    w.write_record([
        "tool",
        "human_reporter_count",
        "ai_reporter_count",
        "issues_by_humans",
        "issues_by_ai",
    ])?;
    for r in reports {
        let b = &r.issue_reporters;
        w.write_record([
            r.tool.clone(),
            b.human_reporter_count.to_string(),
            b.ai_reporter_count.to_string(),
            b.issues_by_humans.to_string(),
            b.issues_by_ai.to_string(),
        ])?;
    }
    Ok(w.flush()?)
}

/// Two rows per tool: the with-AI and without-AI PR groups.
fn ai_split(ex: &mut Exporter, reports: &[ToolReport]) -> Result<()> {
    let mut w = ex.writer("cognitive_load_ai_comparison.csv")?;
    w.write_record([
        "tool",
        "group",
        "prs",
        "mean_comments",
        "mean_reviews",
        "mean_commits",
        "mean_time_to_merge_hours",
    ])?;
    for r in reports {
        for (group, stats) in [
            ("with_ai", &r.ai_split.with_ai),
            ("without_ai", &r.ai_split.without_ai),
        ] {
            w.write_record([
                r.tool.clone(),
                group.to_string(),
                stats.count.to_string(),
                opt(stats.mean_comments),
                opt(stats.mean_reviews),
                opt(stats.mean_commits),
                opt(stats.mean_time_to_merge_hours),
            ])?;
        }
    }
    Ok(w.flush()?)
}

fn review_cycle(ex: &mut Exporter, reports: &[ToolReport]) -> Result<()> {
    let mut w = ex.writer("review_cycle_time_comparison.csv")?;
    w.write_record([
        "tool", "group", "count", "mean", "median", "std_dev", "min", "max",
    ])?;
    for r in reports {
        for (group, summary) in [
            ("with_ai", &r.review_cycle.with_ai),
            ("without_ai", &r.review_cycle.without_ai),
        ] {
            let cells = summary_cells(summary);
            let mut record = vec![r.tool.clone(), group.to_string()];
            record.extend(cells);
            w.write_record(&record)?;
        }
    }
    Ok(w.flush()?)
}

fn intervention(ex: &mut Exporter, reports: &[ToolReport]) -> Result<()> {
    let mut w = ex.writer("intervention_frequency_comparison.csv")?;
    w.write_record([
        "tool",
        "prs_analyzed",
        "total_interventions",
        "interventions_per_pr_mean",
        "interventions_per_pr_median",
        "mean_intervention_rate",
        "prs_with_interventions",
        "window_hours",
    ])?;
    for r in reports {
        let i = &r.intervention;
        w.write_record([
            r.tool.clone(),
            i.prs_analyzed.to_string(),
            i.total_interventions.to_string(),
            opt(i.interventions_per_pr_mean),
            opt(i.interventions_per_pr_median),
            opt(i.mean_intervention_rate),
            i.prs_with_interventions.to_string(),
            i.window_hours.to_string(),
        ])?;
    }
    Ok(w.flush()?)
}

fn correlations(ex: &mut Exporter, reports: &[ToolReport]) -> Result<()> {
    let mut w = ex.writer("spearman_correlations_summary.csv")?;
    w.write_record(["tool", "correlation", "rho", "n", "strength"])?;
    for r in reports {
        for c in &r.correlations {
            w.write_record([
                r.tool.clone(),
                c.name.clone(),
                c.rho.to_string(),
                c.n.to_string(),
                c.strength.to_string(),
            ])?;
        }
    }
    Ok(w.flush()?)
}

fn per_tool(ex: &mut Exporter, report: &ToolReport) -> Result<()> {
    // PR rows serialize directly; Option fields become empty cells.
    let mut w = ex.writer(&format!("pr_level_data_{}.csv", report.tool))?;
    for row in &report.pr_rows {
        w.serialize(row)?;
    }
    if report.pr_rows.is_empty() {
        w.write_record([
            "pr_id",
            "total_commits",
            "ai_commits",
            "human_commits",
            "ai_commit_percentage",
            "total_comments",
            "ai_comments",
            "human_comments",
            "ai_comment_percentage",
            "total_reviews",
            "ai_reviews",
            "human_reviews",
            "ai_review_percentage",
            "time_to_merge_hours",
            "has_related_issue",
            "has_ai_involvement",
            "is_merged",
        ])?;
    }
    w.flush()?;

    let mut w = ex.writer(&format!("issue_bot_correlation_{}.csv", report.tool))?;
    w.write_record([
        "issue_number",
        "issue_title",
        "issue_reporter",
        "reporter_is_human",
        "issue_state",
        "issue_created_at",
        "issue_closed_at",
        "pr_id",
        "total_commits",
        "ai_commits",
        "ai_commit_percentage",
        "total_comments",
        "ai_comments",
        "ai_comment_percentage",
        "total_reviews",
        "ai_reviews",
        "ai_review_percentage",
        "has_ai_review",
        "has_ai_involvement",
        "bot_names",
    ])?;
    for row in &report.issue_links {
        w.write_record([
            row.issue_number.to_string(),
            row.issue_title.clone(),
            row.issue_reporter.clone(),
            row.reporter_is_human.to_string(),
            row.issue_state.clone(),
            row.issue_created_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            row.issue_closed_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            row.pr_id.to_string(),
            row.total_commits.to_string(),
            row.ai_commits.to_string(),
            opt(row.ai_commit_percentage),
            row.total_comments.to_string(),
            row.ai_comments.to_string(),
            opt(row.ai_comment_percentage),
            row.total_reviews.to_string(),
            row.ai_reviews.to_string(),
            opt(row.ai_review_percentage),
            row.has_ai_review.to_string(),
            row.has_ai_involvement.to_string(),
            row.bot_names.join(";"),
        ])?;
    }
    w.flush()?;

    let mut w = ex.writer(&format!("top_contributors_{}.csv", report.tool))?;
    w.write_record(["login", "commits"])?;
    for c in &report.commit_attribution.top_human_committers {
        w.write_record([c.login.clone(), c.count.to_string()])?;
    }
    w.flush()?;

    let mut w = ex.writer(&format!("top_reviewers_{}.csv", report.tool))?;
    w.write_record(["login", "comments"])?;
    for c in &report.comment_attribution.top_human_commenters {
        w.write_record([c.login.clone(), c.count.to_string()])?;
    }
    Ok(w.flush()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_reports;

    #[test]
    fn test_export_writes_all_tables() {
        let dir = tempfile::tempdir().unwrap();
        let reports = test_reports();
        let written = export(&reports, dir.path()).unwrap();

        // 13 cross-tool tables plus 4 per-tool tables for the one tool.
        assert_eq!(written.len(), 17);
        for path in &written {
            assert!(path.exists(), "missing {}", path.display());
        }
        assert!(dir.path().join("summary_comparison.csv").exists());
        assert!(dir.path().join("pr_level_data_demo_tool.csv").exists());
    }

    #[test]
    fn test_undefined_metric_is_empty_cell() {
        let dir = tempfile::tempdir().unwrap();
        export(&test_reports(), dir.path()).unwrap();

        // The fixture has no reviews, so reviews_per_pr has empty stat cells.
        let raw =
            std::fs::read_to_string(dir.path().join("feedback_loop_metrics.csv")).unwrap();
        let line = raw
            .lines()
            .find(|l| l.contains("reviews_per_pr"))
            .expect("reviews_per_pr row");
        assert_eq!(line, "demo_tool,reviews_per_pr,,,,,,");
    }

    #[test]
    fn test_metric_values_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let reports = test_reports();
        export(&reports, dir.path()).unwrap();

        let raw = std::fs::read_to_string(dir.path().join("flow_metrics.csv")).unwrap();
        let mut reader = csv::Reader::from_reader(raw.as_bytes());
        let headers = reader.headers().unwrap().clone();
        let record = reader.records().next().unwrap().unwrap();
        let col = headers
            .iter()
            .position(|h| h == "time_to_merge_hours_mean")
            .unwrap();
        let parsed: f64 = record[col].parse().unwrap();
        let expected = reports[0].flow.time_to_merge_hours.unwrap().mean;
        assert!((parsed - expected).abs() < 1e-9);
    }

    #[test]
    fn test_pr_level_rows_serialize() {
        let dir = tempfile::tempdir().unwrap();
        export(&test_reports(), dir.path()).unwrap();
        let raw =
            std::fs::read_to_string(dir.path().join("pr_level_data_demo_tool.csv")).unwrap();
        let mut lines = raw.lines();
        assert!(lines.next().unwrap().starts_with("pr_id,"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("1,2,1,1,50.0,"));
    }
}
