//! Configuration discovery and effective settings resolution.
//!
//! xmldoc-check reads `xmldoc.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config. Defaults:
//! - `libraries`: none (must come from CLI or config)
//! - `output`: `human`
//! - `reportOnlyMissing`: true
//! - `skipDelegateMembers`: true
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::walker::CheckOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `xmldoc.toml|yaml`.
pub struct CheckerConfig {
    /// Glob patterns, relative to the repository root.
    #[serde(default)]
    pub libraries: Option<Vec<String>>,
    pub output: Option<String>,
    #[serde(rename = "reportOnlyMissing")]
    pub report_only_missing: Option<bool>,
    #[serde(rename = "skipDelegateMembers")]
    pub skip_delegate_members: Option<bool>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub libraries: Vec<String>,
    pub libraries_configured: bool,
    pub output: String,
    pub report_only_missing: bool,
    pub skip_delegate_members: bool,
}

impl Effective {
    pub fn check_options(&self) -> CheckOptions {
        CheckOptions {
            report_only_missing: self.report_only_missing,
            skip_delegate_members: self.skip_delegate_members,
        }
    }
}

const CONFIG_NAMES: [&str; 3] = ["xmldoc.toml", "xmldoc.yaml", "xmldoc.yml"];

/// Walk upward from `start` to detect the repository root.
///
/// Stops when an `xmldoc.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) {
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

/// Load `CheckerConfig` from `xmldoc.toml` or `xmldoc.yaml|yml` if present.
pub fn load_config(root: &Path) -> Option<CheckerConfig> {
    let toml_path = root.join("xmldoc.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        return match toml::from_str(&s) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                log::warn!("Ignoring invalid {}: {e}", toml_path.display());
                None
            }
        };
    }
    for yml in ["xmldoc.yaml", "xmldoc.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            return match serde_yaml::from_str(&s) {
                Ok(cfg) => Some(cfg),
                Err(e) => {
                    log::warn!("Ignoring invalid {}: {e}", p.display());
                    None
                }
            };
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_libraries: &[String],
    cli_output: Option<&str>,
    cli_report_only_missing: Option<bool>,
    cli_skip_delegate_members: Option<bool>,
) -> Effective {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root).unwrap_or_default();

    let libraries = if cli_libraries.is_empty() {
        cfg.libraries.unwrap_or_default()
    } else {
        cli_libraries.to_vec()
    };
    let libraries_configured = !libraries.is_empty();

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let defaults = CheckOptions::default();
    let report_only_missing = cli_report_only_missing
        .or(cfg.report_only_missing)
        .unwrap_or(defaults.report_only_missing);
    let skip_delegate_members = cli_skip_delegate_members
        .or(cfg.skip_delegate_members)
        .unwrap_or(defaults.skip_delegate_members);

    Effective {
        repo_root,
        libraries,
        libraries_configured,
        output,
        report_only_missing,
        skip_delegate_members,
    }
}

/// Expand library patterns against the repository root.
///
/// Literal paths are kept even when they do not exist so the caller can
/// report them; patterns that match nothing are returned in `unmatched`.
pub fn expand_libraries(root: &Path, patterns: &[String]) -> (Vec<PathBuf>, Vec<String>) {
    let mut found: Vec<PathBuf> = Vec::new();
    let mut unmatched: Vec<String> = Vec::new();
    for pat in patterns {
        let abs = root.join(pat);
        let is_glob = pat.contains(['*', '?', '[']);
        if !is_glob {
            found.push(abs);
            continue;
        }
        let pattern = abs.to_string_lossy().to_string();
        let before = found.len();
        match glob::glob(&pattern) {
            Ok(paths) => {
                let mut matched: Vec<PathBuf> = paths.flatten().collect();
                matched.sort();
                found.extend(matched);
            }
            Err(e) => log::warn!("Invalid library pattern '{}': {e}", pat),
        }
        if found.len() == before {
            unmatched.push(pat.clone());
        }
    }
    found.dedup();
    (found, unmatched)
}
