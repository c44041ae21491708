//! Text (terminal) reporter with colors and formatting

use crate::calculators::ToolReport;
use crate::stats::Summary;
use anyhow::Result;
use console::style;
use std::fmt::Write;

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

fn fmt_summary(summary: &Option<Summary>) -> String {
    match summary {
        Some(s) => format!("mean {:.2}  median {:.2}  n={}", s.mean, s.median, s.count),
        None => "-".to_string(),
    }
}

/// Render the batch as formatted terminal output
pub fn render(reports: &[ToolReport]) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "\n{}", style("prlens analysis").bold())?;
    writeln!(
        out,
        "{}",
        style("──────────────────────────────────────").dim()
    )?;

    for report in reports {
        writeln!(
            out,
            "\n{}  {}",
            style(&report.tool).bold().cyan(),
            style(format!("(ruleset {})", report.ruleset_version)).dim()
        )?;

        let flow = &report.flow;
        writeln!(
            out,
            "  PRs: {} total  {} open  {} closed  {} merged  merge rate: {}",
            flow.total_prs,
            flow.prs_open,
            flow.prs_closed,
            flow.prs_merged,
            fmt_opt(flow.merge_rate.map(|r| r * 100.0))
        )?;
        writeln!(
            out,
            "  Time to merge (h): {}",
            fmt_summary(&flow.time_to_merge_hours)
        )?;
        writeln!(
            out,
            "  First review (h):  {}",
            fmt_summary(&report.feedback_loop.time_to_first_review_hours)
        )?;

        let commits = &report.commit_attribution;
        writeln!(
            out,
            "  Commits: {} total  {} AI ({})  {} human",
            commits.total_commits,
            style(commits.ai_commits).magenta(),
            fmt_opt(commits.ai_percentage),
            commits.human_commits
        )?;
        let comments = &report.comment_attribution;
        writeln!(
            out,
            "  Comments: {} total  {} AI  {} human",
            comments.total_comments, comments.ai_comments, comments.human_comments
        )?;

        let intervention = &report.intervention;
        writeln!(
            out,
            "  Interventions: {} across {} PRs (window {}h)",
            intervention.total_interventions,
            intervention.prs_analyzed,
            intervention.window_hours
        )?;

        if !report.correlations.is_empty() {
            writeln!(out, "  {}", style("Correlations").bold())?;
            for c in &report.correlations {
                let styled = match c.strength {
                    crate::calculators::correlation::Strength::Strong => {
                        style(format!("{:+.3}", c.rho)).red()
                    }
                    crate::calculators::correlation::Strength::Moderate => {
                        style(format!("{:+.3}", c.rho)).yellow()
                    }
                    crate::calculators::correlation::Strength::Weak => {
                        style(format!("{:+.3}", c.rho)).dim()
                    }
                };
                writeln!(out, "    {:<36} {}  (n={})", c.name, styled, c.n)?;
            }
        }
    }
    writeln!(out)?;

    Ok(out)
}
