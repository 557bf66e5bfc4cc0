//! Report formatters: pure `Run -> String` transformations.
//!
//! Seven output formats share the same input contract and never fail on
//! well-formed runs: missing optional fields render as empty segments or
//! omitted keys, and an unrecognized severity string falls into the lowest
//! bucket of each level mapping instead of aborting the export.
//!
//! Formatters do not assume any pre-sort of the findings list; where grouping
//! or ordering matters they derive it themselves, preserving input order.

use crate::models::{rule_help_uri, Finding, Run, Severity};
use crate::run::summarize;
use serde_json::json;

/// One of the supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Stylish,
    Json,
    Csv,
    Sarif,
    Junit,
    GithubLog,
    GithubSummary,
}

/// Every format, in the order `export --format all` renders them.
pub const ALL_FORMATS: [ReportFormat; 7] = [
    ReportFormat::Stylish,
    ReportFormat::Json,
    ReportFormat::Csv,
    ReportFormat::Sarif,
    ReportFormat::Junit,
    ReportFormat::GithubLog,
    ReportFormat::GithubSummary,
];

impl ReportFormat {
    /// Parse a CLI/config format token. Accepts a few aliases per format.
    pub fn parse(s: &str) -> Option<ReportFormat> {
        match s {
            "stylish" | "text" => Some(ReportFormat::Stylish),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "sarif" => Some(ReportFormat::Sarif),
            "junit" | "xml" => Some(ReportFormat::Junit),
            "gh-log" | "github-log" => Some(ReportFormat::GithubLog),
            "gh-summary" | "github-summary" | "md" => Some(ReportFormat::GithubSummary),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReportFormat::Stylish => "stylish",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Sarif => "sarif",
            ReportFormat::Junit => "junit",
            ReportFormat::GithubLog => "gh-log",
            ReportFormat::GithubSummary => "gh-summary",
        }
    }

    /// Filename used when exporting to a directory.
    pub fn default_filename(&self) -> &'static str {
        match self {
            ReportFormat::Stylish => "flowlint-report.txt",
            ReportFormat::Json => "flowlint-report.json",
            ReportFormat::Csv => "flowlint-report.csv",
            ReportFormat::Sarif => "flowlint-report.sarif",
            ReportFormat::Junit => "flowlint-report.xml",
            ReportFormat::GithubLog => "flowlint-annotations.txt",
            ReportFormat::GithubSummary => "flowlint-summary.md",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ReportFormat::Stylish | ReportFormat::GithubLog => "text/plain",
            ReportFormat::Json | ReportFormat::Sarif => "application/json",
            ReportFormat::Csv => "text/csv",
            ReportFormat::Junit => "application/xml",
            ReportFormat::GithubSummary => "text/markdown",
        }
    }

    /// Render `run` in this format.
    pub fn render(&self, run: &Run) -> String {
        match self {
            ReportFormat::Stylish => format_stylish(run),
            ReportFormat::Json => format_json(run),
            ReportFormat::Csv => format_csv(run),
            ReportFormat::Sarif => format_sarif(run),
            ReportFormat::Junit => format_junit(run),
            ReportFormat::GithubLog => format_github_actions_log(run),
            ReportFormat::GithubSummary => format_github_actions_summary(run),
        }
    }
}

/// Human-readable report grouped by node, for terminals and clipboards.
///
/// Node groups appear in first-seen order; findings keep input order within
/// their group. Findings without a node land under `Node: unknown`.
pub fn format_stylish(run: &Run) -> String {
    let summary = summarize(&run.findings);

    // Insertion-ordered grouping; a sorted map would reorder node groups.
    let mut groups: Vec<(&str, Vec<&Finding>)> = Vec::new();
    for finding in &run.findings {
        let key = finding.node_id.as_deref().unwrap_or("unknown");
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, list)) => list.push(finding),
            None => groups.push((key, vec![finding])),
        }
    }

    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("FlowLint Report – {}", run.meta.workflow_name));
    lines.push(format!("Generated: {}", run.meta.generated_at));
    lines.push(format!("Version: {}", run.meta.flowlint_version));
    lines.push(String::new());

    for (node_key, node_findings) in &groups {
        lines.push(format!("Node: {}", node_key));
        for finding in node_findings {
            lines.push(format!(
                "  {:<5} {:<7} {}",
                finding.rule,
                finding.severity.to_uppercase(),
                finding.message
            ));
            if let Some(details) = &finding.raw_details {
                for detail in details.split('\n') {
                    let detail = detail.trim();
                    if !detail.is_empty() {
                        lines.push(format!("      → {}", detail));
                    }
                }
            }
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "✖ {} problems ({} must, {} should, {} nit)",
        summary.total, summary.must, summary.should, summary.nit
    ));

    lines.join("\n")
}

/// Pretty-printed JSON of the run itself; parses back to a deep-equal run.
pub fn format_json(run: &Run) -> String {
    serde_json::to_string_pretty(run).unwrap()
}

fn csv_escape(value: &str) -> String {
    if value.contains('"') || value.contains(',') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_field(value: Option<&str>) -> String {
    // Absent values are empty fields, never the text "null".
    value.map(csv_escape).unwrap_or_default()
}

/// CSV with a fixed header; one row per finding, `\n`-joined, no trailing
/// newline. Fields are quoted only when they contain `"` `,` or a newline.
pub fn format_csv(run: &Run) -> String {
    let mut rows = vec!["workflow,severity,rule,message,nodeId,line".to_string()];
    for f in &run.findings {
        let line = f.line.map(|n| n.to_string());
        rows.push(
            [
                csv_escape(&run.meta.workflow_name),
                csv_escape(&f.severity),
                csv_escape(&f.rule),
                csv_escape(&f.message),
                csv_field(f.node_id.as_deref()),
                csv_field(line.as_deref()),
            ]
            .join(","),
        );
    }
    rows.join("\n")
}

fn severity_to_sarif_level(severity: &str) -> &'static str {
    match Severity::parse(severity) {
        Some(Severity::Must) => "error",
        Some(Severity::Should) => "warning",
        // nit and anything unrecognized both map to the note level
        Some(Severity::Nit) | None => "note",
    }
}

/// SARIF 2.1.0 document for code-scanning ingestion.
///
/// The driver rules table holds one entry per distinct rule id (first
/// message wins); results are one-per-finding in input order. `startLine`
/// is omitted entirely when the finding carries no line.
pub fn format_sarif(run: &Run) -> String {
    let mut rules: Vec<serde_json::Value> = Vec::new();
    let mut seen: Vec<&str> = Vec::new();
    for f in &run.findings {
        if seen.contains(&f.rule.as_str()) {
            continue;
        }
        seen.push(&f.rule);
        rules.push(json!({
            "id": f.rule,
            "shortDescription": { "text": f.message },
            "fullDescription": { "text": f.message },
            "helpUri": rule_help_uri(&f.rule),
        }));
    }

    let results: Vec<serde_json::Value> = run
        .findings
        .iter()
        .map(|f| {
            let region_message = json!({
                "text": match &f.node_id {
                    Some(id) => format!("Node: {}", id),
                    None => "Workflow".to_string(),
                }
            });
            let region = match f.line {
                Some(line) => json!({ "startLine": line, "message": region_message }),
                None => json!({ "message": region_message }),
            };
            json!({
                "ruleId": f.rule,
                "level": severity_to_sarif_level(&f.severity),
                "message": { "text": f.message },
                "locations": [{
                    "physicalLocation": {
                        "artifactLocation": {
                            "uri": format!("n8n://workflow/{}", run.meta.workflow_name),
                        },
                        "region": region,
                    }
                }],
            })
        })
        .collect();

    let sarif = json!({
        "version": "2.1.0",
        "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "FlowLint",
                    "version": run.meta.flowlint_version,
                    "informationUri": "https://flowlint.dev",
                    "rules": rules,
                }
            },
            "results": results,
        }],
    });

    serde_json::to_string_pretty(&sarif).unwrap()
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// JUnit XML: one testcase per finding; `must` and `should` findings carry a
/// nested `<failure>` and count toward `failures`, `nit` findings only
/// toward `tests`.
///
/// The failure body is entity-escaped text between literal `<![CDATA[` and
/// `]]>` marker lines. The markers are plain delimiter text, not a CDATA
/// section; JUnit consumers key off the `failure` element and its `message`
/// attribute, both of which are properly escaped.
pub fn format_junit(run: &Run) -> String {
    let summary = summarize(&run.findings);

    let mut lines: Vec<String> = Vec::new();
    lines.push("<?xml version=\"1.0\" encoding=\"UTF-8\"?>".to_string());
    lines.push(format!(
        "<testsuite name=\"FlowLint\" tests=\"{}\" failures=\"{}\">",
        summary.total,
        summary.must + summary.should
    ));

    for f in &run.findings {
        let test_name = format!("{} – {}", f.rule, f.node_id.as_deref().unwrap_or("workflow"));
        lines.push(format!(
            "  <testcase classname=\"{}\" name=\"{}\">",
            escape_xml(&run.meta.workflow_name),
            escape_xml(&test_name)
        ));

        let failure = matches!(
            Severity::parse(&f.severity),
            Some(Severity::Must) | Some(Severity::Should)
        );
        if failure {
            let mut details: Vec<String> = vec![
                format!("Rule: {}", f.rule),
                format!("Severity: {}", f.severity),
            ];
            if let Some(node) = &f.node_id {
                details.push(format!("Node: {}", node));
            }
            if let Some(line) = f.line {
                details.push(format!("Line: {}", line));
            }
            if let Some(raw) = &f.raw_details {
                details.push(format!("Details: {}", raw));
            }

            lines.push(format!("    <failure message=\"{}\">", escape_xml(&f.message)));
            lines.push("      <![CDATA[".to_string());
            lines.push(escape_xml(&details.join("\n")));
            lines.push("      ]]>".to_string());
            lines.push("    </failure>".to_string());
        }

        lines.push("  </testcase>".to_string());
    }

    lines.push("</testsuite>".to_string());
    lines.join("\n")
}

fn severity_to_gh_command(severity: &str) -> &'static str {
    match Severity::parse(severity) {
        Some(Severity::Must) => "error",
        Some(Severity::Should) => "warning",
        Some(Severity::Nit) | None => "notice",
    }
}

/// GitHub Actions workflow-command annotations, one line per finding in
/// input order. Findings without a line number anchor to line 1.
pub fn format_github_actions_log(run: &Run) -> String {
    let mut lines: Vec<String> = Vec::new();
    for f in &run.findings {
        let node_info = match &f.node_id {
            Some(id) => format!(" Node: {}.", id),
            None => String::new(),
        };
        let details = match &f.raw_details {
            Some(raw) => format!(" {}", raw.replace('\n', " ")),
            None => String::new(),
        };
        lines.push(format!(
            "::{} title=FlowLint {},file={}.json,line={}::{}{}{}",
            severity_to_gh_command(&f.severity),
            f.rule,
            run.meta.workflow_name,
            f.line.unwrap_or(1),
            f.message,
            node_info,
            details
        ));
    }
    lines.join("\n")
}

/// Markdown for the GitHub Actions job-summary surface.
pub fn format_github_actions_summary(run: &Run) -> String {
    let summary = summarize(&run.findings);

    let mut lines: Vec<String> = Vec::new();
    lines.push("# FlowLint Report".to_string());
    lines.push(String::new());
    lines.push(format!("- **Workflow:** {}", run.meta.workflow_name));
    lines.push(format!("- **Generated:** {}", run.meta.generated_at));
    lines.push(format!("- **Version:** {}", run.meta.flowlint_version));
    lines.push(format!(
        "- **Total issues:** {} ({} must, {} should, {} nit)",
        summary.total, summary.must, summary.should, summary.nit
    ));
    lines.push(String::new());
    lines.push("| Severity | Count |".to_string());
    lines.push("|----------|-------|".to_string());
    lines.push(format!("| MUST     | {} |", summary.must));
    lines.push(format!("| SHOULD   | {} |", summary.should));
    lines.push(format!("| NIT      | {} |", summary.nit));
    lines.push(String::new());

    if !run.findings.is_empty() {
        lines.push("## Issues".to_string());
        lines.push(String::new());
        for f in &run.findings {
            let icon = match Severity::parse(&f.severity) {
                Some(Severity::Must) => "🔴",
                Some(Severity::Should) => "⚠️",
                Some(Severity::Nit) | None => "ℹ️",
            };
            lines.push(format!("{} **{}** ({}): {}", icon, f.rule, f.severity, f.message));
            if let Some(node) = &f.node_id {
                lines.push(format!("   - Node: `{}`", node));
            }
            if let Some(raw) = &f.raw_details {
                if let Some(first) = raw.split('\n').next() {
                    lines.push(format!("   - {}", first));
                }
            }
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RunMeta;

    fn finding(rule: &str, severity: &str, message: &str) -> Finding {
        Finding {
            rule: rule.into(),
            severity: severity.into(),
            message: message.into(),
            node_id: None,
            path: "workflow.json".into(),
            line: None,
            raw_details: None,
            documentation_url: None,
        }
    }

    fn sample_run() -> Run {
        let mut f1 = finding("R1", "must", "Error message");
        f1.node_id = Some("node-1".into());
        f1.line = Some(10);
        let mut f2 = finding("R2", "should", "Warning message");
        f2.node_id = Some("node-2".into());
        Run {
            meta: RunMeta {
                workflow_name: "test-workflow".into(),
                generated_at: "2025-01-01T00:00:00.000Z".into(),
                flowlint_version: "1.0.0".into(),
            },
            findings: vec![f1, f2],
        }
    }

    #[test]
    fn test_stylish_layout_and_padding() {
        let out = format_stylish(&sample_run());
        assert!(out.contains("FlowLint Report – test-workflow"));
        assert!(out.contains("Generated: 2025-01-01T00:00:00.000Z"));
        assert!(out.contains("Node: node-1"));
        assert!(out.contains("  R1    MUST    Error message"));
        assert!(out.contains("Node: node-2"));
        assert!(out.contains("  R2    SHOULD  Warning message"));
        assert!(out.ends_with("✖ 2 problems (1 must, 1 should, 0 nit)"));
    }

    #[test]
    fn test_stylish_groups_by_node_in_first_seen_order() {
        let mut run = sample_run();
        let mut third = finding("R3", "nit", "Also on node-1");
        third.node_id = Some("node-1".into());
        let ungrouped = finding("R4", "nit", "Workflow level");
        run.findings = vec![run.findings[0].clone(), third, ungrouped];

        let out = format_stylish(&run);
        let headers: Vec<&str> = out
            .lines()
            .filter(|l| l.starts_with("Node: "))
            .collect();
        assert_eq!(headers, vec!["Node: node-1", "Node: unknown"]);
        // Both node-1 findings sit under one header.
        let node1_block = out.split("Node: unknown").next().unwrap();
        assert!(node1_block.contains("Error message"));
        assert!(node1_block.contains("Also on node-1"));
    }

    #[test]
    fn test_stylish_emits_trimmed_detail_lines() {
        let mut run = sample_run();
        run.findings[0].raw_details = Some("  first hint \n\n second hint".into());
        let out = format_stylish(&run);
        assert!(out.contains("      → first hint"));
        assert!(out.contains("      → second hint"));
        assert!(!out.contains("→ \n"));
    }

    #[test]
    fn test_json_round_trips_deep_equal() {
        let run = sample_run();
        let parsed: Run = serde_json::from_str(&format_json(&run)).unwrap();
        assert_eq!(parsed, run);
    }

    #[test]
    fn test_csv_header_and_rows() {
        let csv = format_csv(&sample_run());
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines[0], "workflow,severity,rule,message,nodeId,line");
        assert_eq!(lines[1], "test-workflow,must,R1,Error message,node-1,10");
        assert_eq!(lines[2], "test-workflow,should,R2,Warning message,node-2,");
        assert_eq!(lines.len(), 3);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_csv_escapes_quotes_commas_and_newlines() {
        let mut run = sample_run();
        run.findings[0].message = "Message with \"quotes\" and, commas".into();
        run.findings[1].message = "multi\nline".into();
        let csv = format_csv(&run);
        assert!(csv.contains("\"Message with \"\"quotes\"\" and, commas\""));
        assert!(csv.contains("\"multi\nline\""));
    }

    #[test]
    fn test_csv_absent_fields_are_empty_not_null() {
        let run = Run {
            meta: RunMeta {
                workflow_name: "w".into(),
                generated_at: String::new(),
                flowlint_version: String::new(),
            },
            findings: vec![finding("R1", "must", "m")],
        };
        let csv = format_csv(&run);
        assert!(csv.ends_with("w,must,R1,m,,"));
        assert!(!csv.contains("null"));
    }

    #[test]
    fn test_sarif_levels_and_region_omission() {
        let mut run = sample_run();
        run.findings.push(finding("R3", "nit", "Nit message"));
        let parsed: serde_json::Value =
            serde_json::from_str(&format_sarif(&run)).unwrap();

        assert_eq!(parsed["version"], "2.1.0");
        let driver = &parsed["runs"][0]["tool"]["driver"];
        assert_eq!(driver["name"], "FlowLint");
        assert_eq!(driver["version"], "1.0.0");

        let results = parsed["runs"][0]["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["level"], "error");
        assert_eq!(results[1]["level"], "warning");
        assert_eq!(results[2]["level"], "note");

        // Finding with a line carries startLine; findings without omit it.
        let region0 = &results[0]["locations"][0]["physicalLocation"]["region"];
        assert_eq!(region0["startLine"], 10);
        assert_eq!(region0["message"]["text"], "Node: node-1");
        let region2 = &results[2]["locations"][0]["physicalLocation"]["region"];
        assert!(region2.get("startLine").is_none());
        assert_eq!(region2["message"]["text"], "Workflow");

        let uri =
            &results[0]["locations"][0]["physicalLocation"]["artifactLocation"]["uri"];
        assert_eq!(uri, "n8n://workflow/test-workflow");
    }

    #[test]
    fn test_sarif_rules_deduplicated_first_message_wins() {
        let mut run = sample_run();
        run.findings.push(finding("R1", "must", "Second R1 message"));
        run.findings.push(finding("free-form", "must", "m"));
        let parsed: serde_json::Value =
            serde_json::from_str(&format_sarif(&run)).unwrap();
        let rules = parsed["runs"][0]["tool"]["driver"]["rules"].as_array().unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0]["id"], "R1");
        assert_eq!(rules[0]["shortDescription"]["text"], "Error message");
        assert_eq!(
            rules[0]["helpUri"],
            "https://github.com/Replikanti/flowlint-examples/tree/main/R1"
        );
        assert_eq!(rules[2]["helpUri"], "https://flowlint.dev");
    }

    #[test]
    fn test_sarif_unknown_severity_maps_to_note() {
        let mut run = sample_run();
        run.findings[0].severity = "blocker".into();
        let parsed: serde_json::Value =
            serde_json::from_str(&format_sarif(&run)).unwrap();
        assert_eq!(parsed["runs"][0]["results"][0]["level"], "note");
    }

    #[test]
    fn test_junit_structure_and_escaping() {
        let out = format_junit(&sample_run());
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(out.contains("<testsuite name=\"FlowLint\" tests=\"2\" failures=\"2\">"));
        assert!(out.contains("<testcase classname=\"test-workflow\" name=\"R1 – node-1\">"));
        assert!(out.contains("<failure message=\"Error message\">"));
        assert!(out.contains("<testcase classname=\"test-workflow\" name=\"R2 – node-2\">"));
        assert!(out.ends_with("</testsuite>"));
    }

    #[test]
    fn test_junit_nit_is_not_a_failure() {
        let run = Run {
            meta: sample_run().meta,
            findings: vec![finding("R9", "nit", "cosmetic")],
        };
        let out = format_junit(&run);
        assert!(out.contains("tests=\"1\" failures=\"0\""));
        assert!(!out.contains("<failure"));
        assert!(out.contains("<testcase classname=\"test-workflow\" name=\"R9 – workflow\">"));
    }

    #[test]
    fn test_junit_escapes_message_entities() {
        let mut run = sample_run();
        run.findings[0].message = "a < b & \"c\"".into();
        let out = format_junit(&run);
        assert!(out.contains("<failure message=\"a &lt; b &amp; &quot;c&quot;\">"));
    }

    #[test]
    fn test_github_log_exact_line() {
        let out = format_github_actions_log(&sample_run());
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(
            lines[0],
            "::error title=FlowLint R1,file=test-workflow.json,line=10::Error message Node: node-1."
        );
        // Missing line defaults to 1; should maps to warning.
        assert!(lines[1].starts_with("::warning title=FlowLint R2,file=test-workflow.json,line=1::"));
    }

    #[test]
    fn test_github_log_flattens_details_onto_one_line() {
        let mut run = sample_run();
        run.findings[0].raw_details = Some("first\nsecond".into());
        let out = format_github_actions_log(&run);
        assert!(out.lines().next().unwrap().ends_with("Node: node-1. first second"));
    }

    #[test]
    fn test_github_summary_table_and_icons() {
        let mut run = sample_run();
        run.findings.push(finding("R3", "nit", "Nit message"));
        let out = format_github_actions_summary(&run);
        assert!(out.contains("# FlowLint Report"));
        assert!(out.contains("- **Workflow:** test-workflow"));
        assert!(out.contains("- **Total issues:** 3 (1 must, 1 should, 1 nit)"));
        assert!(out.contains("| MUST     | 1 |"));
        assert!(out.contains("| SHOULD   | 1 |"));
        assert!(out.contains("| NIT      | 1 |"));
        assert!(out.contains("🔴 **R1** (must): Error message"));
        assert!(out.contains("⚠️ **R2** (should): Warning message"));
        assert!(out.contains("ℹ️ **R3** (nit): Nit message"));
        assert!(out.contains("   - Node: `node-1`"));
    }

    #[test]
    fn test_github_summary_omits_issues_section_when_empty() {
        let run = Run {
            meta: sample_run().meta,
            findings: vec![],
        };
        let out = format_github_actions_summary(&run);
        assert!(!out.contains("## Issues"));
        assert!(out.contains("- **Total issues:** 0 (0 must, 0 should, 0 nit)"));
    }

    #[test]
    fn test_formatters_are_idempotent() {
        let run = sample_run();
        for format in ALL_FORMATS {
            assert_eq!(format.render(&run), format.render(&run), "{}", format.name());
        }
    }

    #[test]
    fn test_format_parse_aliases() {
        assert_eq!(ReportFormat::parse("stylish"), Some(ReportFormat::Stylish));
        assert_eq!(ReportFormat::parse("xml"), Some(ReportFormat::Junit));
        assert_eq!(ReportFormat::parse("github-log"), Some(ReportFormat::GithubLog));
        assert_eq!(ReportFormat::parse("md"), Some(ReportFormat::GithubSummary));
        assert_eq!(ReportFormat::parse("html"), None);
    }
}
