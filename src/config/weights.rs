// src/config/weights.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scoring::ScoringWeights;

pub const ENV_WEIGHTS_PATH: &str = "SCORING_WEIGHTS_PATH";

/// Load scoring weights from an explicit path. Supports TOML or JSON formats;
/// the result is validated.
pub fn load_weights_from(path: &Path) -> Result<ScoringWeights> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading weights from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let weights = parse_weights(&content, ext.as_str())
        .with_context(|| format!("parsing weights from {}", path.display()))?;
    check(weights).with_context(|| format!("invalid weights in {}", path.display()))
}

/// Load weights using env var + fallbacks:
/// 1) $SCORING_WEIGHTS_PATH
/// 2) config/weights.toml
/// 3) config/weights.json
/// 4) built-in defaults
pub fn load_weights_default() -> Result<ScoringWeights> {
    if let Ok(p) = std::env::var(ENV_WEIGHTS_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_weights_from(&pb);
        } else {
            return Err(anyhow!("{ENV_WEIGHTS_PATH}={} does not exist", pb.display()));
        }
    }
    let toml_p = PathBuf::from("config/weights.toml");
    if toml_p.exists() {
        return load_weights_from(&toml_p);
    }
    let json_p = PathBuf::from("config/weights.json");
    if json_p.exists() {
        return load_weights_from(&json_p);
    }
    Ok(ScoringWeights::default())
}

fn parse_weights(s: &str, hint_ext: &str) -> Result<ScoringWeights> {
    match hint_ext {
        "toml" => Ok(toml::from_str(s)?),
        "json" => Ok(serde_json::from_str(s)?),
        // Unknown extension: JSON objects start with `{`, anything else is TOML.
        _ if s.trim_start().starts_with('{') => Ok(serde_json::from_str(s)?),
        _ => Ok(toml::from_str(s)?),
    }
}

fn check(weights: ScoringWeights) -> Result<ScoringWeights> {
    weights.validate()?;
    if !weights.is_unit_bounded() {
        tracing::warn!(
            total = weights.total(),
            "scoring weights sum above 1; popularity scores may exceed 1"
        );
    }
    Ok(weights)
}
