//! Configuration discovery and effective settings resolution.
//!
//! FlowLint reads `flowlint.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config. Defaults:
//! - `output`: `human`
//! - `export.format`: `stylish`
//! - `export.workflow_name`: unset (run construction falls back to "workflow")
//! - `export.out_dir`: `.` (used by `--format all`)
//!
//! Overrides precedence: CLI > config file > defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Export-related configuration section under `[export]`.
pub struct ExportCfg {
    pub format: Option<String>,
    #[serde(rename = "workflowName")]
    pub workflow_name: Option<String>,
    #[serde(rename = "outDir")]
    pub out_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `flowlint.toml|yaml`.
pub struct FlowlintConfig {
    pub output: Option<String>,
    pub export: Option<ExportCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub output: String,
    pub format: String,
    pub workflow_name: Option<String>,
    pub out_dir: PathBuf,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `flowlint.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("flowlint.toml").exists()
            || cur.join("flowlint.yaml").exists()
            || cur.join("flowlint.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `FlowlintConfig` from `flowlint.toml` or `flowlint.yaml|yml` if present.
pub fn load_config(root: &Path) -> Option<FlowlintConfig> {
    let toml_path = root.join("flowlint.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        let cfg: FlowlintConfig = toml::from_str(&s).ok()?;
        return Some(cfg);
    }
    for yml in ["flowlint.yaml", "flowlint.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            let cfg: FlowlintConfig = serde_yaml::from_str(&s).ok()?;
            return Some(cfg);
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_output: Option<&str>,
    cli_format: Option<&str>,
    cli_workflow_name: Option<&str>,
    cli_out_dir: Option<&str>,
) -> Effective {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root).unwrap_or_default();

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let format = cli_format
        .map(|s| s.to_string())
        .or_else(|| cfg.export.as_ref().and_then(|e| e.format.clone()))
        .unwrap_or_else(|| "stylish".to_string());

    let workflow_name = cli_workflow_name
        .map(|s| s.to_string())
        .or_else(|| cfg.export.as_ref().and_then(|e| e.workflow_name.clone()));

    let out_dir = cli_out_dir
        .map(|s| s.to_string())
        .or_else(|| cfg.export.as_ref().and_then(|e| e.out_dir.clone()))
        .unwrap_or_else(|| ".".to_string());

    Effective {
        repo_root,
        output,
        format,
        workflow_name,
        out_dir: PathBuf::from(out_dir),
    }
}
