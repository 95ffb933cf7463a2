use indexmap::IndexMap;
use std::io::{self, Write};

use crate::checker::CheckReport;
use crate::licenses::Package;

/// Flags controlling how a check run is reported and judged.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions {
    /// Suppress the success banner
    pub quiet: bool,

    /// Tolerate unsafe packages that are not installed
    pub allow_extra_unsafe_packages: bool,

    /// Tolerate safe licenses that no installed package uses
    pub allow_extra_safe_licenses: bool,
}

/// Render a check report and decide the outcome. Returns whether the run
/// passed.
///
/// Findings print to `err` in a fixed order and the first blocking category
/// ends the run, so the leading message is stable for a given environment.
/// Overridden categories still print as warnings before evaluation moves on.
/// The ignored-licenses block is informational and never blocks.
pub fn render_check(
    report: &CheckReport,
    options: &CheckOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<bool> {
    if !report.unnecessary_safe_licenses.is_empty() {
        writeln!(
            err,
            "Unnecessary safe licenses listed which are not used by any installed package:"
        )?;
        for license in &report.unnecessary_safe_licenses {
            writeln!(err, "  {license}")?;
        }
        if !options.allow_extra_safe_licenses {
            return Ok(false);
        }
    }

    if !report.unnecessary_unsafe_packages.is_empty() {
        writeln!(err, "Unsafe packages listed which are not installed:")?;
        for package in &report.unnecessary_unsafe_packages {
            writeln!(err, "  {package}")?;
        }
        if !options.allow_extra_unsafe_packages {
            return Ok(false);
        }
    }

    if !report.unnecessary_ignored_packages.is_empty() {
        writeln!(err, "Ignored packages listed which are not installed:")?;
        for package in &report.unnecessary_ignored_packages {
            writeln!(err, "  {package}")?;
        }
        return Ok(false);
    }

    if !report.bad_unsafe_packages.is_empty() {
        writeln!(
            err,
            "Found unsafe packages with a known license. Instead allow these licenses explicitly:"
        )?;
        for package in &report.bad_unsafe_packages {
            writeln!(
                err,
                "  {} ({}): {}",
                package.package,
                package.version,
                package.licenses.join(", ")
            )?;
        }
        return Ok(false);
    }

    if !report.missing_unsafe_packages.is_empty() {
        writeln!(err, "Found unsafe packages:")?;
        for package in &report.missing_unsafe_packages {
            writeln!(err, "  {} ({})", package.package, package.version)?;
        }
        return Ok(false);
    }

    if !report.unsafe_licenses.found.is_empty() {
        writeln!(err, "Found unsafe licenses:")?;
        for violation in &report.unsafe_licenses.found {
            writeln!(
                err,
                "  {} ({}): {}",
                violation.package, violation.version, violation.license
            )?;
        }
        return Ok(false);
    }

    if !report.unsafe_licenses.ignored.is_empty() {
        writeln!(err, "Ignored packages with unsafe licenses:")?;
        for violation in &report.unsafe_licenses.ignored {
            writeln!(
                err,
                "  {} ({}): {}",
                violation.package, violation.version, violation.license
            )?;
        }
    }

    if !options.quiet {
        writeln!(out, "✨ All licenses ok ✨")?;
    }

    Ok(true)
}

/// Print one line per installed package, sorted case-insensitively by name.
/// Records sharing a name collapse to the last one seen.
pub fn render_package_list(packages: &[Package], out: &mut dyn Write) -> io::Result<()> {
    let mut by_name: IndexMap<&str, &Package> = IndexMap::new();
    for package in packages {
        by_name.insert(package.name.as_str(), package);
    }
    by_name.sort_by(|name_a, _, name_b, _| name_a.to_lowercase().cmp(&name_b.to_lowercase()));

    for (name, package) in &by_name {
        writeln!(
            out,
            "{} ({}): {}",
            name,
            package.version,
            package.licenses.join(", ")
        )?;
    }

    Ok(())
}
