//! Configuration file support for skillgrid
//!
//! Loads dashboard configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.skillgridrc.json` in the working directory
//! 3. `skillgrid.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::heatmap::HeatmapOptions;
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::selection::DEFAULT_RECOMMENDED_COUNT;
use crate::source::DEFAULT_API_URL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_PAGE_SIZE: usize = 100;
const MIN_CANVAS_SIDE: f64 = 200.0;

/// skillgrid configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillgridConfig {
    /// Base URL of the people API (default: https://forinterview.onrender.com)
    #[serde(default)]
    pub api_url: Option<String>,

    /// Columns per heatmap page (default: 10)
    #[serde(default)]
    pub page_size: Option<usize>,

    /// How many people are listed as most recommended (default: 4)
    #[serde(default)]
    pub recommended_count: Option<usize>,

    /// Request timeout in seconds (default: 30)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Fixed skill row order; when unset, rows follow first-seen order
    #[serde(default)]
    pub skills: Option<Vec<String>>,

    /// Canvas size of one heatmap page
    #[serde(default)]
    pub canvas: Option<CanvasConfig>,
}

/// Canvas size of one heatmap page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanvasConfig {
    /// Width in SVG units (default: 900)
    pub width: Option<f64>,
    /// Height in SVG units (default: 500)
    pub height: Option<f64>,
}

/// Resolved configuration with defaults applied
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api_url: String,
    pub page_size: usize,
    pub recommended_count: usize,
    pub timeout: Duration,
    pub skills: Option<Vec<String>>,
    pub heatmap: HeatmapOptions,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl SkillgridConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url) = self.api_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("api_url must start with http:// or https:// (got {})", url);
            }
        }

        if let Some(size) = self.page_size {
            if size == 0 || size > MAX_PAGE_SIZE {
                anyhow::bail!(
                    "page_size must be between 1 and {} (got {})",
                    MAX_PAGE_SIZE,
                    size
                );
            }
        }

        if let Some(secs) = self.timeout_secs {
            if secs == 0 {
                anyhow::bail!("timeout_secs must be positive (got {})", secs);
            }
        }

        if let Some(ref skills) = self.skills {
            let mut seen = HashSet::new();
            for skill in skills {
                if skill.trim().is_empty() {
                    anyhow::bail!("skills must not contain empty names");
                }
                if !seen.insert(skill.as_str()) {
                    anyhow::bail!("skills contains duplicate name: {}", skill);
                }
            }
        }

        if let Some(ref canvas) = self.canvas {
            for (name, val) in [("width", canvas.width), ("height", canvas.height)] {
                if let Some(v) = val {
                    if !v.is_finite() || v < MIN_CANVAS_SIDE {
                        anyhow::bail!(
                            "canvas.{} must be at least {} (got {})",
                            name,
                            MIN_CANVAS_SIDE,
                            v
                        );
                    }
                }
            }
        }

        Ok(())
    }

    /// Resolve config into its effective form
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let defaults = HeatmapOptions::default();
        let heatmap = match &self.canvas {
            Some(c) => HeatmapOptions {
                width: c.width.unwrap_or(defaults.width),
                height: c.height.unwrap_or(defaults.height),
                ..defaults
            },
            None => defaults,
        };

        Ok(ResolvedConfig {
            api_url: self
                .api_url
                .clone()
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            recommended_count: self.recommended_count.unwrap_or(DEFAULT_RECOMMENDED_COUNT),
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            skills: self.skills.clone(),
            heatmap,
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        SkillgridConfig::default().resolve()
    }
}

/// Discover and load a config file from the project root
///
/// Search order:
/// 1. `.skillgridrc.json`
/// 2. `skillgrid.config.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(project_root: &Path) -> Result<Option<(SkillgridConfig, PathBuf)>> {
    for name in [".skillgridrc.json", "skillgrid.config.json"] {
        let path = project_root.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<SkillgridConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: SkillgridConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config for a project
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from the project root.
/// Returns default config if nothing is found.
pub fn load_and_resolve(project_root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(project_root)? {
            Some((config, path)) => (config, Some(path)),
            None => (SkillgridConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config_is_valid() {
        let config = SkillgridConfig::default();
        config.validate().expect("default config should be valid");
        let resolved = config.resolve().expect("default config should resolve");
        assert_eq!(resolved.api_url, "https://forinterview.onrender.com");
        assert_eq!(resolved.page_size, 10);
        assert_eq!(resolved.recommended_count, 4);
        assert_eq!(resolved.timeout, Duration::from_secs(30));
        assert!(resolved.skills.is_none());
        assert_eq!(resolved.heatmap, HeatmapOptions::default());
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "api_url": "http://localhost:8080",
            "page_size": 5,
            "recommended_count": 2,
            "timeout_secs": 3,
            "skills": ["Rust", "Go"],
            "canvas": {"width": 1200, "height": 600}
        }"#;
        let config: SkillgridConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.api_url, "http://localhost:8080");
        assert_eq!(resolved.page_size, 5);
        assert_eq!(resolved.recommended_count, 2);
        assert_eq!(resolved.timeout, Duration::from_secs(3));
        assert_eq!(resolved.skills, Some(vec!["Rust".to_string(), "Go".to_string()]));
        assert_eq!(resolved.heatmap.width, 1200.0);
        assert_eq!(resolved.heatmap.height, 600.0);
        assert_eq!(resolved.heatmap.margin_top, 30.0);
    }

    #[test]
    fn test_partial_canvas_uses_defaults_for_rest() {
        let json = r#"{"canvas": {"height": 800}}"#;
        let config: SkillgridConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.heatmap.width, 900.0); // default
        assert_eq!(resolved.heatmap.height, 800.0);
    }

    #[test]
    fn test_reject_unknown_fields() {
        let json = r#"{"unknown_field": true}"#;
        let result: Result<SkillgridConfig, _> = serde_json::from_str(json);
        assert!(result.is_err(), "unknown fields should be rejected");
    }

    #[test]
    fn test_reject_zero_page_size() {
        let config: SkillgridConfig = serde_json::from_str(r#"{"page_size": 0}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_oversized_page() {
        let config: SkillgridConfig = serde_json::from_str(r#"{"page_size": 101}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_zero_timeout() {
        let config: SkillgridConfig = serde_json::from_str(r#"{"timeout_secs": 0}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_bad_api_url() {
        let config: SkillgridConfig =
            serde_json::from_str(r#"{"api_url": "ftp://example.com"}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_duplicate_and_empty_skills() {
        let config: SkillgridConfig =
            serde_json::from_str(r#"{"skills": ["Rust", "Rust"]}"#).unwrap();
        assert!(config.validate().is_err());

        let config: SkillgridConfig = serde_json::from_str(r#"{"skills": [" "]}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_tiny_canvas() {
        let config: SkillgridConfig =
            serde_json::from_str(r#"{"canvas": {"width": 50}}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_discover_skillgridrc() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(".skillgridrc.json");
        fs::write(&config_path, r#"{"page_size": 4}"#).unwrap();

        let result = discover_config(dir.path()).unwrap();
        assert!(result.is_some());
        let (config, path) = result.unwrap();
        assert_eq!(config.page_size, Some(4));
        assert_eq!(path, config_path);
    }

    #[test]
    fn test_discover_skillgrid_config_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("skillgrid.config.json"),
            r#"{"recommended_count": 6}"#,
        )
        .unwrap();

        let (config, _) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.recommended_count, Some(6));
    }

    #[test]
    fn test_discover_priority_order() {
        let dir = tempfile::tempdir().unwrap();

        // Create both config files - .skillgridrc.json should win
        fs::write(dir.path().join(".skillgridrc.json"), r#"{"page_size": 1}"#).unwrap();
        fs::write(
            dir.path().join("skillgrid.config.json"),
            r#"{"page_size": 2}"#,
        )
        .unwrap();

        let (config, _) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(
            config.page_size,
            Some(1),
            ".skillgridrc.json should take priority"
        );
    }

    #[test]
    fn test_no_config_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_discovered_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".skillgridrc.json"), r#"{"page_size": 0}"#).unwrap();
        assert!(discover_config(dir.path()).is_err());
    }

    #[test]
    fn test_load_and_resolve_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = load_and_resolve(dir.path(), None).unwrap();
        assert!(resolved.config_path.is_none());
        assert_eq!(resolved.page_size, 10);
    }

    #[test]
    fn test_load_and_resolve_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.json");
        fs::write(&config_path, r#"{"page_size": 3}"#).unwrap();

        let resolved = load_and_resolve(dir.path(), Some(&config_path)).unwrap();
        assert_eq!(resolved.page_size, 3);
        assert_eq!(resolved.config_path, Some(config_path));
    }
}
