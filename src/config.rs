//! `exflow.json` loading.
//!
//! ```json
//! {
//!   "extends": "../exflow.base.json",
//!   "analysis": {
//!     "strict": true,
//!     "overloadIntersection": false,
//!     "maxTreeDepth": 500
//!   }
//! }
//! ```
//!
//! `strict` selects [`AnalysisOptions::strict`] as the starting point; the
//! other keys override individual options. A config inherits every key it
//! leaves unset from the file named by `extends`.

use anyhow::{Context, Result, anyhow, bail};
use exflow_common::AnalysisOptions;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "exflow.json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExflowConfig {
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub analysis: Option<AnalysisConfig>,
}

/// The `analysis` section as written; unset keys stay `None` so that
/// `extends` can fill them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    #[serde(default)]
    pub strict: Option<bool>,
    #[serde(default)]
    pub overload_intersection: Option<bool>,
    #[serde(default)]
    pub precise_rethrow: Option<bool>,
    #[serde(default)]
    pub permissive_server_pages: Option<bool>,
    #[serde(default)]
    pub permissive_missing_functional_type: Option<bool>,
    #[serde(default)]
    pub max_tree_depth: Option<u32>,
    #[serde(default)]
    pub max_ascent_depth: Option<u32>,
}

pub fn parse_config(source: &str) -> Result<ExflowConfig> {
    serde_json::from_str(source).context("failed to parse exflow config JSON")
}

pub fn load_config(path: &Path) -> Result<ExflowConfig> {
    let mut visited = HashSet::new();
    load_config_inner(path, &mut visited)
}

fn load_config_inner(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<ExflowConfig> {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical.clone()) {
        bail!("exflow config extends cycle detected at {}", canonical.display());
    }

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exflow config: {}", path.display()))?;
    let mut config = parse_config(&source)
        .with_context(|| format!("failed to parse exflow config: {}", path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_path = resolve_extends_path(path, &extends)?;
        let base = load_config_inner(&base_path, visited)?;
        config = merge_configs(base, config);
    }

    visited.remove(&canonical);
    Ok(config)
}

fn resolve_extends_path(current_path: &Path, extends: &str) -> Result<PathBuf> {
    let base_dir = current_path
        .parent()
        .ok_or_else(|| anyhow!("exflow config has no parent directory"))?;
    let mut candidate = PathBuf::from(extends);
    if candidate.extension().is_none() {
        candidate.set_extension("json");
    }
    if candidate.is_absolute() {
        Ok(candidate)
    } else {
        Ok(base_dir.join(candidate))
    }
}

fn merge_configs(base: ExflowConfig, child: ExflowConfig) -> ExflowConfig {
    let analysis = match (base.analysis, child.analysis) {
        (Some(base), Some(child)) => Some(AnalysisConfig {
            strict: child.strict.or(base.strict),
            overload_intersection: child.overload_intersection.or(base.overload_intersection),
            precise_rethrow: child.precise_rethrow.or(base.precise_rethrow),
            permissive_server_pages: child
                .permissive_server_pages
                .or(base.permissive_server_pages),
            permissive_missing_functional_type: child
                .permissive_missing_functional_type
                .or(base.permissive_missing_functional_type),
            max_tree_depth: child.max_tree_depth.or(base.max_tree_depth),
            max_ascent_depth: child.max_ascent_depth.or(base.max_ascent_depth),
        }),
        (base, child) => child.or(base),
    };
    ExflowConfig {
        extends: None,
        analysis,
    }
}

/// Turn a parsed `analysis` section into options, starting from the
/// defaults (or the strict preset).
pub fn resolve_options(analysis: Option<&AnalysisConfig>) -> AnalysisOptions {
    let Some(analysis) = analysis else {
        return AnalysisOptions::default();
    };
    let mut options = if analysis.strict.unwrap_or(false) {
        AnalysisOptions::strict()
    } else {
        AnalysisOptions::default()
    };
    if let Some(value) = analysis.overload_intersection {
        options.overload_intersection = value;
    }
    if let Some(value) = analysis.precise_rethrow {
        options.precise_rethrow = value;
    }
    if let Some(value) = analysis.permissive_server_pages {
        options.permissive_server_pages = value;
    }
    if let Some(value) = analysis.permissive_missing_functional_type {
        options.permissive_missing_functional_type = value;
    }
    if let Some(value) = analysis.max_tree_depth {
        options.max_tree_depth = value;
    }
    if let Some(value) = analysis.max_ascent_depth {
        options.max_ascent_depth = value;
    }
    options
}

/// Load `path` (following `extends`) and resolve its analysis options.
pub fn load_options(path: &Path) -> Result<AnalysisOptions> {
    let config = load_config(path)?;
    Ok(resolve_options(config.analysis.as_ref()))
}

/// The nearest `exflow.json` in `dir` or one of its ancestors.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .map(|ancestor| ancestor.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}
