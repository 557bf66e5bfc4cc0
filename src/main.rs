//! FlowLint CLI binary entry point.
//! Delegates to modules for run construction, formatting, and printing.

mod cli;
mod config;
mod export;
mod host;
mod models;
mod output;
mod run;
mod utils;

use clap::Parser;
use cli::{Cli, Commands};
use export::ReportFormat;
use host::{Host, SystemHost};
use models::Severity;
use std::io::Read;
use std::path::PathBuf;

fn read_input(input: Option<&str>) -> std::io::Result<String> {
    match input {
        Some("-") | None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => std::fs::read_to_string(path),
    }
}

fn load_run(
    input: Option<&str>,
    workflow_name: Option<&str>,
    host: &dyn Host,
) -> models::Run {
    if matches!(input, Some("-") | None) {
        eprintln!(
            "{} {}",
            utils::info_prefix(),
            "reading findings from stdin"
        );
    }
    let raw = match read_input(input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "{} {}",
                utils::error_prefix(),
                format!("could not read findings input: {}", e)
            );
            std::process::exit(2);
        }
    };
    let doc = match run::parse_findings_document(&raw) {
        Ok(d) => d,
        Err(e) => {
            eprintln!(
                "{} {}",
                utils::error_prefix(),
                format!("invalid findings document: {}", e)
            );
            std::process::exit(2);
        }
    };
    run::into_run(doc, workflow_name, host)
}

fn main() {
    let cli = Cli::parse();
    let host = SystemHost::new();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Export {
            input,
            format,
            workflow_name,
            out,
            out_dir,
            copy,
            repo_root,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                None,
                format.as_deref(),
                workflow_name.as_deref(),
                out_dir.as_deref(),
            );
            if config::load_config(&eff.repo_root).is_none() {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "No flowlint.toml found; using defaults."
                );
            }
            let run = load_run(input.as_deref(), eff.workflow_name.as_deref(), &host);

            if eff.format == "all" {
                match output::export_all(&run, &eff.out_dir, &host) {
                    Ok(paths) => {
                        for p in paths {
                            println!("wrote: {}", p.to_string_lossy());
                        }
                    }
                    Err(e) => {
                        eprintln!(
                            "{} {}",
                            utils::error_prefix(),
                            format!("export failed: {}", e)
                        );
                        std::process::exit(2);
                    }
                }
                return;
            }

            let Some(report_format) = ReportFormat::parse(&eff.format) else {
                eprintln!(
                    "{} {}",
                    utils::error_prefix(),
                    format!(
                        "unknown format '{}' (expected stylish|json|csv|sarif|junit|gh-log|gh-summary|all)",
                        eff.format
                    )
                );
                std::process::exit(2);
            };
            let rendered = report_format.render(&run);
            let out_path = out.map(PathBuf::from);
            match output::deliver(&rendered, report_format, out_path.as_deref(), copy, &host) {
                Ok(_) => {
                    if let Some(p) = out_path {
                        println!("wrote: {}", p.to_string_lossy());
                    }
                }
                Err(e) => {
                    eprintln!(
                        "{} {}",
                        utils::error_prefix(),
                        format!("export failed: {}", e)
                    );
                    std::process::exit(2);
                }
            }
        }
        Commands::Summary {
            input,
            output: output_mode,
            workflow_name,
            repo_root,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                output_mode.as_deref(),
                None,
                workflow_name.as_deref(),
                None,
            );
            let run = load_run(input.as_deref(), eff.workflow_name.as_deref(), &host);
            output::print_summary(&run, &eff.output);
            // CI gating: must findings fail the invocation.
            let blocking = run
                .findings
                .iter()
                .any(|f| Severity::parse(&f.severity) == Some(Severity::Must));
            if blocking {
                std::process::exit(1);
            }
        }
    }
}
