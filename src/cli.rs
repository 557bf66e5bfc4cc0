//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "flowlint",
    version,
    about = "FlowLint report exporter",
    long_about = "FlowLint — render workflow-analysis findings as shareable reports.\n\nReads a findings JSON document produced by the FlowLint analysis engine and exports it as text, JSON, CSV, SARIF, JUnit XML, or GitHub Actions output.\n\nConfiguration precedence: CLI > flowlint.toml > defaults.",
    after_help = "Examples:\n  flowlint export --input findings.json --format sarif --out report.sarif\n  flowlint export --input findings.json --format all --out-dir reports\n  cat findings.json | flowlint export --format gh-log\n  flowlint summary --input findings.json --output json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands for exporting and summarizing findings.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current flowlint version.")]
    Version,
    /// Export findings as a report
    #[command(
        about = "Render findings in a report format",
        long_about = "Build a run from a findings document and render it. Accepts either a JSON array of findings or a previously exported run document. Writes to stdout unless --out/--out-dir is given.",
        after_help = "Examples:\n  flowlint export --input findings.json\n  flowlint export --input findings.json --format junit --out report.xml\n  flowlint export --input findings.json --format stylish --copy"
    )]
    Export {
        #[arg(long, help = "Findings JSON file, or - for stdin (default: stdin)")]
        input: Option<String>,
        #[arg(
            long,
            help = "Report format: stylish|json|csv|sarif|junit|gh-log|gh-summary|all"
        )]
        format: Option<String>,
        #[arg(long, help = "Workflow name recorded in the report (default: workflow)")]
        workflow_name: Option<String>,
        #[arg(long, help = "Write the rendered report to this file instead of stdout")]
        out: Option<String>,
        #[arg(long, help = "Directory for --format all (default: current dir)")]
        out_dir: Option<String>,
        #[arg(
            long,
            action = clap::ArgAction::SetTrue,
            help = "Also copy the rendered report to the system clipboard"
        )]
        copy: bool,
        #[arg(long, help = "Repository root for config discovery (default: current dir)")]
        repo_root: Option<String>,
    },
    /// Summarize findings on the terminal
    #[command(
        about = "Print a severity summary",
        long_about = "Print findings and per-severity counts. Exits non-zero when the run contains must-severity findings, for CI gating.",
        after_help = "Examples:\n  flowlint summary --input findings.json\n  flowlint summary --input findings.json --output json"
    )]
    Summary {
        #[arg(long, help = "Findings JSON file, or - for stdin (default: stdin)")]
        input: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Workflow name recorded in the report (default: workflow)")]
        workflow_name: Option<String>,
        #[arg(long, help = "Repository root for config discovery (default: current dir)")]
        repo_root: Option<String>,
    },
}
