use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use super::expression::expand_license_expression;
use super::{Package, UNKNOWN_LICENSE};

const OSI_APPROVED: &str = "OSI Approved";

/// Read every installed distribution in a site-packages directory.
///
/// Distributions are parsed in parallel and the result is sorted
/// case-insensitively by name, so output order never depends on
/// filesystem enumeration order.
pub fn read_installed_packages(site_packages_path: &Path) -> Result<Vec<Package>> {
    let mut metadata_dirs: Vec<PathBuf> = Vec::new();

    for entry in fs::read_dir(site_packages_path)
        .with_context(|| format!("Failed to read {}", site_packages_path.display()))?
    {
        let entry = entry?;
        let file_name = entry.file_name();
        let name_str = file_name.to_string_lossy();

        if name_str.ends_with(".dist-info") || name_str.ends_with(".egg-info") {
            metadata_dirs.push(entry.path());
        }
    }

    let mut packages: Vec<Package> = metadata_dirs
        .par_iter()
        .map(|dir| read_distribution(dir))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();

    packages.sort_by_key(|package| package.name.to_lowercase());
    Ok(packages)
}

fn read_distribution(dir: &Path) -> Result<Option<Package>> {
    let file_name = dir
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    let metadata_path = if file_name.ends_with(".dist-info") {
        dir.join("METADATA")
    } else {
        dir.join("PKG-INFO")
    };
    if !metadata_path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&metadata_path)
        .with_context(|| format!("Failed to read {}", metadata_path.display()))?;

    let metadata = parse_metadata(&content);
    let licenses = resolve_licenses(&metadata);
    let (dir_name, dir_version) = parse_name_version_from_dir_name(file_name);

    let name = match metadata.name.or(dir_name) {
        Some(name) => name,
        None => return Ok(None),
    };
    let version = metadata
        .version
        .or(dir_version)
        .unwrap_or_else(|| "unknown".to_string());

    Ok(Some(Package {
        name,
        version,
        licenses,
    }))
}

#[derive(Debug, Default)]
struct RawMetadata {
    name: Option<String>,
    version: Option<String>,
    license: Option<String>,
    license_expression: Option<String>,
    license_classifier: Option<String>,
}

/// Parse the header block of a METADATA / PKG-INFO file. Only lines before
/// the first blank line are headers; the long description that follows may
/// contain header-lookalike lines and must not be scanned.
fn parse_metadata(content: &str) -> RawMetadata {
    let mut metadata = RawMetadata::default();

    for line in content.lines() {
        if line.trim().is_empty() {
            break;
        }

        let (key, value) = match line.split_once(':') {
            Some((key, value)) => (key, value.trim()),
            None => continue,
        };
        if value.is_empty() {
            continue;
        }

        match key {
            "Name" => metadata.name = Some(value.to_string()),
            "Version" => metadata.version = Some(value.to_string()),
            "License" => metadata.license = Some(value.to_string()),
            "License-Expression" => metadata.license_expression = Some(value.to_string()),
            "Classifier" => {
                if metadata.license_classifier.is_none() {
                    metadata.license_classifier = license_from_classifier(value);
                }
            }
            _ => {}
        }
    }

    metadata
}

/// Extract the license name from a classifier like
/// "License :: OSI Approved :: MIT License" (last segment wins).
fn license_from_classifier(classifier: &str) -> Option<String> {
    let parts: Vec<&str> = classifier.split("::").map(str::trim).collect();
    if parts.len() >= 2 && parts[0] == "License" {
        parts.last().map(|part| (*part).to_string())
    } else {
        None
    }
}

fn parse_name_version_from_dir_name(file_name: &str) -> (Option<String>, Option<String>) {
    let name_version = file_name
        .strip_suffix(".dist-info")
        .or_else(|| file_name.strip_suffix(".egg-info"))
        .unwrap_or(file_name);
    if name_version.is_empty() {
        return (None, None);
    }

    // Split by the last occurrence of '-' to separate name and version
    match name_version.rsplit_once('-') {
        Some((name, version)) => (Some(name.to_string()), Some(version.to_string())),
        None => (Some(name_version.to_string()), None),
    }
}

/// Resolve the declared licenses for one distribution.
///
/// A parseable License-Expression wins outright. A single identifier then
/// falls back through the License classifier and the freeform License
/// header; a bare "OSI Approved" classifier falls through to the License
/// header for something more specific.
fn resolve_licenses(metadata: &RawMetadata) -> Vec<String> {
    let mut licenses = match metadata.license_expression.as_deref() {
        Some(expression) => expand_license_expression(expression),
        None => vec![UNKNOWN_LICENSE.to_string()],
    };

    if licenses.len() != 1 {
        return licenses;
    }

    let mut license = licenses.remove(0);
    if license == UNKNOWN_LICENSE {
        license = metadata
            .license_classifier
            .clone()
            .unwrap_or_else(|| UNKNOWN_LICENSE.to_string());
    }
    if license == UNKNOWN_LICENSE {
        license = metadata
            .license
            .clone()
            .unwrap_or_else(|| UNKNOWN_LICENSE.to_string());
    }
    if license == OSI_APPROVED {
        license = metadata
            .license
            .clone()
            .unwrap_or_else(|| OSI_APPROVED.to_string());
    }

    vec![license]
}
