//! Analyze command - load, compute, report, export

use crate::calculators::{compute_all, EngineOptions};
use crate::classifier::Classifier;
use crate::config::Config;
use crate::loader;
use crate::reporters;
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Run the analyze command
pub fn run(
    path: &Path,
    format: &str,
    output_dir: Option<&Path>,
    no_export: bool,
    tool_filter: &[String],
    workers: usize,
) -> Result<()> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()
        .ok(); // already built in tests or repeated runs

    let config = Config::load(&root)?;
    let classifier = Classifier::from_config(&config.classifier)?;
    let options = EngineOptions {
        window_hours: config.intervention.window_hours,
    };

    let mut tool_dirs = config.tool_dirs(&root);
    if !tool_filter.is_empty() {
        tool_dirs.retain(|(name, _)| tool_filter.iter().any(|f| f == name));
        if tool_dirs.is_empty() {
            anyhow::bail!(
                "no configured tool matches {:?}; configured tools: {:?}",
                tool_filter,
                config.tool_dirs(&root).iter().map(|(n, _)| n.clone()).collect::<Vec<_>>()
            );
        }
    }

    // Text output gets a progress bar; JSON stays clean for piping.
    let progress = if format == "text" {
        let bar = ProgressBar::new(tool_dirs.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .expect("progress template"),
        );
        Some(bar)
    } else {
        None
    };

    let mut tools = Vec::with_capacity(tool_dirs.len());
    for (name, dir) in &tool_dirs {
        if let Some(bar) = &progress {
            bar.set_message(format!("loading {name}"));
        }
        if !dir.is_dir() {
            warn!("tool directory missing: {}", dir.display());
        }
        tools.push(loader::load_tool(name, dir));
        if let Some(bar) = &progress {
            bar.inc(1);
        }
    }
    if let Some(bar) = &progress {
        bar.finish_and_clear();
    }

    let reports = compute_all(&tools, &classifier, &options);

    print!("{}", reporters::report(&reports, format)?);

    if !no_export {
        let dir: PathBuf = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => root.join(&config.output.dir),
        };
        let written = reporters::csv_export::export(&reports, &dir)?;
        if format == "text" {
            println!(
                "{} Wrote {} CSV tables to {}",
                style("✓").green(),
                written.len(),
                style(dir.display()).cyan()
            );
        }
    }

    Ok(())
}
