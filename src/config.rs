use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

use crate::licenses::UNKNOWN_LICENSE;

const TOOL_SECTION: &str = "py-license-gate";

/// License policy declared under `[tool.py-license-gate]` in pyproject.toml.
///
/// All three lists keep their declared order and casing; matching against
/// installed packages is case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Licenses the policy permits
    pub safe_licenses: Vec<String>,

    /// Packages exempted from license checks (vetted unlicensed packages)
    pub unsafe_packages: Vec<String>,

    /// Packages whose unsafe licenses are reported but never fail the run
    pub ignored_packages: Vec<String>,
}

/// Load the policy from pyproject.toml in the current directory.
pub fn load_config() -> Result<Config> {
    let pyproject_path = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("pyproject.toml");
    load_config_from(&pyproject_path)
}

/// Load the policy from an explicit pyproject.toml path.
///
/// A missing or unparseable file is a hard error. A file without a
/// `[tool.py-license-gate]` section is an empty policy.
pub fn load_config_from(pyproject_path: &Path) -> Result<Config> {
    let content = fs::read_to_string(pyproject_path)
        .with_context(|| format!("Failed to read {}", pyproject_path.display()))?;

    let pyproject: toml::Value = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", pyproject_path.display()))?;

    // Extract [tool.py-license-gate] section
    let config: Config = match pyproject.get("tool").and_then(|tool| tool.get(TOOL_SECTION)) {
        Some(section) => section
            .clone()
            .try_into()
            .with_context(|| format!("Failed to parse [tool.{}] section", TOOL_SECTION))?,
        None => Config::default(),
    };

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config
        .safe_licenses
        .iter()
        .any(|license| license.to_lowercase() == UNKNOWN_LICENSE)
    {
        anyhow::bail!(
            "'unknown' can't be a safe license, instead list the corresponding packages under 'unsafe_packages'"
        );
    }
    Ok(())
}
