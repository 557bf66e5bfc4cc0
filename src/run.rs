//! Run construction and severity aggregation.
//!
//! A [`Run`] is built once per export invocation from the engine's flat
//! findings list and consumed synchronously by whichever formatter the
//! caller selects. It is never persisted.

use crate::host::Host;
use crate::models::{Finding, Run, RunMeta, Severity, Summary};
use chrono::{SecondsFormat, Utc};

/// Workflow name used when the caller does not supply one.
pub const DEFAULT_WORKFLOW_NAME: &str = "workflow";

/// Bundle findings into an immutable [`Run`].
///
/// `generated_at` is the current wall clock in RFC 3339 / ISO-8601;
/// `flowlint_version` comes from the host shell, not the rule engine.
/// An empty findings list is valid and produces a run with zero findings.
pub fn build_run(findings: Vec<Finding>, workflow_name: Option<&str>, host: &dyn Host) -> Run {
    let name = match workflow_name {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => DEFAULT_WORKFLOW_NAME.to_string(),
    };
    Run {
        meta: RunMeta {
            workflow_name: name,
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            flowlint_version: host.version(),
        },
        findings,
    }
}

/// A parsed findings document: either the engine's flat findings array or a
/// previously exported run (re-exported with its original metadata).
#[derive(Debug)]
pub enum FindingsDocument {
    Findings(Vec<Finding>),
    Run(Run),
}

/// Parse a findings JSON document, auto-detecting its shape.
pub fn parse_findings_document(input: &str) -> Result<FindingsDocument, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    if value.is_array() {
        let findings: Vec<Finding> = serde_json::from_value(value)?;
        return Ok(FindingsDocument::Findings(findings));
    }
    let run: Run = serde_json::from_value(value)?;
    Ok(FindingsDocument::Run(run))
}

/// Resolve a parsed document into a run, building one when the input was a
/// bare findings array.
pub fn into_run(
    doc: FindingsDocument,
    workflow_name: Option<&str>,
    host: &dyn Host,
) -> Run {
    match doc {
        FindingsDocument::Run(run) => run,
        FindingsDocument::Findings(findings) => build_run(findings, workflow_name, host),
    }
}

/// Count findings per severity.
///
/// An unrecognized severity string increments `total` but no bucket, so the
/// three buckets may sum to less than `total` on malformed input.
pub fn summarize(findings: &[Finding]) -> Summary {
    let mut summary = Summary {
        total: 0,
        must: 0,
        should: 0,
        nit: 0,
    };
    for f in findings {
        summary.total += 1;
        match Severity::parse(&f.severity) {
            Some(Severity::Must) => summary.must += 1,
            Some(Severity::Should) => summary.should += 1,
            Some(Severity::Nit) => summary.nit += 1,
            None => {}
        }
    }
    summary
}
