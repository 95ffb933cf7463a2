use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub mod expression;
pub mod extractor;

// Re-export from extractor
pub use extractor::read_installed_packages;

/// Sentinel recorded when a distribution carries no usable license metadata.
/// Never a real license name; compared case-insensitively everywhere.
pub const UNKNOWN_LICENSE: &str = "unknown";

/// One installed distribution and its declared licenses.
///
/// `licenses` always holds at least one entry: a distribution without any
/// license metadata carries the single sentinel `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub licenses: Vec<String>,
}

pub fn find_site_packages(path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = path {
        if path.file_name().map_or(false, |name| name == "site-packages") {
            return Ok(path);
        }
        if let Some(site_packages) = probe_environment(&path) {
            return Ok(site_packages);
        }
        return Ok(path);
    }

    // Try to find .venv in current directory
    let current_dir = std::env::current_dir()?;
    let venv_path = current_dir.join(".venv");

    if venv_path.exists() {
        if let Some(site_packages) = probe_environment(&venv_path) {
            return Ok(site_packages);
        }
    }

    anyhow::bail!("Could not find a site-packages directory. Pass the path to a virtual environment or site-packages directory.")
}

fn probe_environment(root: &Path) -> Option<PathBuf> {
    let direct = root.join("site-packages");
    if direct.is_dir() {
        return Some(direct);
    }

    // Unix-like systems
    let lib_path = root.join("lib");
    if lib_path.is_dir() {
        if let Ok(entries) = fs::read_dir(&lib_path) {
            for entry in entries.flatten() {
                if entry.file_name().to_string_lossy().starts_with("python") {
                    let site_packages = entry.path().join("site-packages");
                    if site_packages.is_dir() {
                        return Some(site_packages);
                    }
                }
            }
        }
    }

    // Windows
    let lib_path = root.join("Lib").join("site-packages");
    if lib_path.is_dir() {
        return Some(lib_path);
    }

    None
}
