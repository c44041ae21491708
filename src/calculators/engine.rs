//! Calculator engine
//!
//! Runs every calculator for a tool and bundles the results. Tools are
//! independent, so the batch runs them in parallel.

use crate::classifier::Classifier;
use crate::models::ToolData;
use rayon::prelude::*;
use tracing::info;

use super::{
    ai_attribution, ai_split, cognitive_load, correlation, feedback_loop, flow, intervention,
    issue_links, pr_level, profile, review_cycle, text_patterns, ToolReport,
};

/// Knobs the config layer feeds into the calculators.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Window for the intervention calculator, in hours.
    pub window_hours: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { window_hours: 72.0 }
    }
}

/// Run every metric family over one tool dataset.
pub fn compute_tool_report(
    data: &ToolData,
    classifier: &Classifier,
    options: &EngineOptions,
) -> ToolReport {
    let pr_rows = pr_level::calculate(data, classifier);
    let correlations = correlation::calculate(&pr_rows);

    let report = ToolReport {
        tool: data.tool.clone(),
        ruleset_version: classifier.ruleset_version().to_string(),
        feedback_loop: feedback_loop::calculate(data),
        cognitive_load: cognitive_load::calculate(data),
        flow: flow::calculate(data),
        profile: profile::calculate(data),
        text_patterns: text_patterns::calculate(data),
        commit_attribution: ai_attribution::commit_attribution(data, classifier),
        comment_attribution: ai_attribution::comment_attribution(data, classifier),
        issue_reporters: ai_attribution::issue_reporters(data, classifier),
        ai_split: ai_split::calculate(data, classifier),
        review_cycle: review_cycle::calculate(data, classifier),
        intervention: intervention::calculate(data, classifier, options.window_hours),
        issue_links: issue_links::calculate(data, classifier),
        pr_rows,
        correlations,
    };

    info!(
        tool = %report.tool,
        prs = report.flow.total_prs,
        commits = report.commit_attribution.total_commits,
        correlations = report.correlations.len(),
        "computed tool report"
    );
    report
}

/// Run the full batch, one report per tool, preserving input order.
pub fn compute_all(
    tools: &[ToolData],
    classifier: &Classifier,
    options: &EngineOptions,
) -> Vec<ToolReport> {
    tools
        .par_iter()
        .map(|data| compute_tool_report(data, classifier, options))
        .collect()
}
