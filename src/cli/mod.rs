//! CLI command definitions and handlers

pub(crate) mod analyze;
mod init;

use crate::calculators::CALCULATORS;
use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// prlens - AI coding tool PR analytics
#[derive(Parser, Debug)]
#[command(name = "prlens")]
#[command(
    version,
    about = "Compare how AI coding tools show up in pull request data",
    long_about = "prlens loads per-tool GitHub exports (prs.json, pr_commits.json, issues.json, \
...) from an analysis root, classifies AI vs human activity with a versioned rule set, and \
computes comparable metric families per tool: feedback loops, cognitive load, flow, attribution \
splits, intervention frequency and Spearman correlations.\n\n\
Run without a subcommand to analyze the current directory:\n  \
prlens .",
    after_help = "\
Examples:
  prlens .                            Analyze tool directories under the current directory
  prlens analyze data --format json   JSON output for scripting
  prlens analyze . --tool claude_code Analyze a single tool
  prlens analyze . --no-export        Skip the CSV artifact tables
  prlens metrics                      List the metric families
  prlens init                         Write an example prlens.toml"
)]
pub struct Cli {
    /// Analysis root holding the tool data directories (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64)
    #[arg(long, global = true, default_value = "4", value_parser = parse_workers)]
    pub workers: usize,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a prlens.toml config file with example settings
    Init,

    /// Analyze the tool directories and compare the results (the default)
    #[command(after_help = "\
Examples:
  prlens analyze .                       Analyze claude_code/, copilot/, cursor/ (or [tools] from prlens.toml)
  prlens analyze . --format json         JSON instead of the text summary
  prlens analyze . --tool claude_code --tool cursor
  prlens analyze . --output-dir out      Write CSV tables somewhere else
  prlens analyze . --no-export           Console report only")]
    Analyze {
        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Directory for the CSV artifact tables (default: from config, "results")
        #[arg(long, short = 'o')]
        output_dir: Option<PathBuf>,

        /// Skip writing the CSV artifact tables
        #[arg(long)]
        no_export: bool,

        /// Restrict the run to these tools (repeatable)
        #[arg(long = "tool")]
        tools: Vec<String>,
    },

    /// List the metric families and what they measure
    Metrics,
}

/// Main dispatch
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Init) => init::run(&cli.path),

        Some(Commands::Analyze {
            format,
            output_dir,
            no_export,
            tools,
        }) => analyze::run(
            &cli.path,
            &format,
            output_dir.as_deref(),
            no_export,
            &tools,
            cli.workers,
        ),

        Some(Commands::Metrics) => {
            println!("\n{}", style("Metric families").bold());
            for (name, description) in CALCULATORS {
                println!("  {:<16} {}", style(name).cyan(), description);
            }
            println!();
            Ok(())
        }

        // Bare `prlens <path>` behaves like `prlens analyze <path>`.
        None => analyze::run(&cli.path, "text", None, false, &[], cli.workers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_invocation_parses() {
        let cli = Cli::parse_from(["prlens", "."]);
        assert!(cli.command.is_none());
        assert_eq!(cli.path, PathBuf::from("."));
        assert_eq!(cli.workers, 4);
    }

    #[test]
    fn test_analyze_flags_parse() {
        let cli = Cli::parse_from([
            "prlens",
            "analyze",
            "data",
            "--format",
            "json",
            "--tool",
            "claude_code",
            "--tool",
            "cursor",
            "--no-export",
        ]);
        match cli.command {
            Some(Commands::Analyze {
                format,
                no_export,
                tools,
                ..
            }) => {
                assert_eq!(format, "json");
                assert!(no_export);
                assert_eq!(tools, ["claude_code", "cursor"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.path, PathBuf::from("data"));
    }

    #[test]
    fn test_workers_bounds() {
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("65").is_err());
        assert_eq!(parse_workers("8"), Ok(8));
    }
}
