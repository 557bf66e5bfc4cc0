//! Output rendering for the summary command and multi-format export.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-finding fields and a top-level summary.

use crate::export::{ReportFormat, ALL_FORMATS};
use crate::host::Host;
use crate::models::{Run, Severity};
use crate::run::summarize;
use owo_colors::OwoColorize;
use rayon::prelude::*;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::io;
use std::path::{Path, PathBuf};

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Print a run summary in the requested format.
///
/// Human output lists findings sorted `must > should > nit` (display only;
/// the run itself keeps engine order) with one colored line per finding.
pub fn print_summary(run: &Run, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_summary_json(run)).unwrap()
        ),
        _ => {
            let color = use_colors(output);
            let mut ordered: Vec<_> = run.findings.iter().collect();
            ordered.sort_by_key(|f| Severity::rank(&f.severity));
            for f in &ordered {
                let sev = match Severity::parse(&f.severity) {
                    Some(Severity::Must) => {
                        if color {
                            "⟦must⟧".red().bold().to_string()
                        } else {
                            "⟦must⟧".to_string()
                        }
                    }
                    Some(Severity::Should) => {
                        if color {
                            "⟦should⟧".yellow().bold().to_string()
                        } else {
                            "⟦should⟧".to_string()
                        }
                    }
                    _ => {
                        if color {
                            "⟦nit⟧".blue().bold().to_string()
                        } else {
                            "⟦nit⟧".to_string()
                        }
                    }
                };
                let icon = match Severity::parse(&f.severity) {
                    Some(Severity::Must) => {
                        if color {
                            "✖".red().to_string()
                        } else {
                            "✖".to_string()
                        }
                    }
                    Some(Severity::Should) => {
                        if color {
                            "▲".yellow().to_string()
                        } else {
                            "▲".to_string()
                        }
                    }
                    _ => {
                        if color {
                            "◆".blue().to_string()
                        } else {
                            "◆".to_string()
                        }
                    }
                };
                let node = f.node_id.as_deref().unwrap_or("workflow");
                let node = if color {
                    node.bold().to_string()
                } else {
                    node.to_string()
                };
                println!("{} {} {} ❲{}❳ — {}", icon, sev, node, f.rule, f.message);
            }
            let s = summarize(&run.findings);
            let summary = format!(
                "— Summary — must={} should={} nit={} total={}",
                s.must, s.should, s.nit, s.total
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Compose summary JSON object (pure) for testing/snapshot purposes.
pub fn compose_summary_json(run: &Run) -> JsonVal {
    let s = summarize(&run.findings);
    json!({
        "workflow": run.meta.workflow_name,
        "generatedAt": run.meta.generated_at,
        "version": run.meta.flowlint_version,
        "findings": run.findings,
        "summary": {
            "total": s.total,
            "must": s.must,
            "should": s.should,
            "nit": s.nit,
        },
    })
}

/// Render every format into `dir` in parallel.
///
/// Filenames come from [`ReportFormat::default_filename`]. Returns the
/// written paths in format order; the first write error aborts the batch
/// result (already-written files are left in place).
pub fn export_all<H: Host + Sync>(run: &Run, dir: &Path, host: &H) -> io::Result<Vec<PathBuf>> {
    ALL_FORMATS
        .par_iter()
        .map(|format| {
            let path = dir.join(format.default_filename());
            host.save_report(&format.render(run), &path)?;
            Ok(path)
        })
        .collect::<io::Result<Vec<_>>>()
}

/// Deliver one rendered report: to a file when `out` is set, else to stdout
/// (suppressed when the report is only being copied to the clipboard).
/// Returns whether a clipboard copy was requested and succeeded.
pub fn deliver<H: Host>(
    rendered: &str,
    format: ReportFormat,
    out: Option<&Path>,
    copy: bool,
    host: &H,
) -> io::Result<bool> {
    match out {
        Some(path) => host.save_report(rendered, path)?,
        None => {
            if !copy {
                println!("{}", rendered);
            }
        }
    }
    if copy {
        let ok = host.write_clipboard(rendered);
        if !ok {
            eprintln!(
                "{} clipboard unavailable; {} output was not copied",
                crate::utils::note_prefix(),
                format.name()
            );
        }
        return Ok(ok);
    }
    Ok(false)
}
