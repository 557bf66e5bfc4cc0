//! Shared data models for findings, run metadata, and summaries.
//!
//! Field names follow the JSON contract of the external analysis engine
//! (`nodeId`, `raw_details`, `documentationUrl`, ...), so a findings document
//! round-trips byte-compatible through serde.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Documentation URL template for rules following the `R<digits>` scheme.
const RULE_DOCS_BASE: &str = "https://github.com/Replikanti/flowlint-examples/tree/main";

/// Fallback documentation URL for rules outside the `R<digits>` scheme.
pub const FALLBACK_DOCS_URL: &str = "https://flowlint.dev";

fn rule_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^R\d+$").unwrap())
}

/// Severity levels, ordered `Must > Should > Nit`.
///
/// The wire format keeps severity as a plain string so that unknown values
/// survive a JSON round-trip; this enum is the mapping/ordering view of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Must,
    Should,
    Nit,
}

impl Severity {
    /// Parse a wire severity string. Unknown values yield `None`; callers
    /// apply their own deterministic fallback instead of panicking.
    pub fn parse(s: &str) -> Option<Severity> {
        match s {
            "must" => Some(Severity::Must),
            "should" => Some(Severity::Should),
            "nit" => Some(Severity::Nit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Must => "must",
            Severity::Should => "should",
            Severity::Nit => "nit",
        }
    }

    /// Display rank: lower sorts first. Unknown severities rank after `nit`.
    pub fn rank(s: &str) -> u8 {
        match Severity::parse(s) {
            Some(Severity::Must) => 0,
            Some(Severity::Should) => 1,
            Some(Severity::Nit) => 2,
            None => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A single issue reported by the analysis engine.
pub struct Finding {
    pub rule: String,
    /// Expected values: `must | should | nit`. Kept as a string so malformed
    /// input still round-trips; consumers map through [`Severity::parse`].
    pub severity: String,
    pub message: String,
    #[serde(rename = "nodeId", skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_details: Option<String>,
    #[serde(rename = "documentationUrl", skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
}

impl Finding {
    /// Documentation URL for this finding: the explicit `documentationUrl`
    /// when present, else one synthesized from the rule id when it follows
    /// the `R<digits>` scheme.
    pub fn doc_url(&self) -> Option<String> {
        if let Some(url) = &self.documentation_url {
            return Some(url.clone());
        }
        if rule_id_pattern().is_match(&self.rule) {
            return Some(format!("{}/{}", RULE_DOCS_BASE, self.rule));
        }
        None
    }
}

/// Help URI for a rule id: templated for `R<digits>` rules, generic fallback
/// otherwise. Used by the SARIF driver rules table.
pub fn rule_help_uri(rule: &str) -> String {
    if rule_id_pattern().is_match(rule) {
        format!("{}/{}", RULE_DOCS_BASE, rule)
    } else {
        FALLBACK_DOCS_URL.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Metadata identifying one analysis run.
pub struct RunMeta {
    #[serde(rename = "workflowName")]
    pub workflow_name: String,
    #[serde(rename = "generatedAt")]
    pub generated_at: String,
    /// Version of the FlowLint shell that produced the report, not of the
    /// rule engine behind it.
    #[serde(rename = "flowlintVersion")]
    pub flowlint_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// The exporter's sole input: run metadata plus findings in engine order.
pub struct Run {
    pub meta: RunMeta,
    pub findings: Vec<Finding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
/// Aggregated severity counts used by printers and formatters.
pub struct Summary {
    pub total: usize,
    pub must: usize,
    pub should: usize,
    pub nit: usize,
}
