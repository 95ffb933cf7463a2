use super::helpers::{metadata, stderr_of, stdout_of, TestProject};

#[test]
fn test_list_prints_sorted_packages() {
    let project = TestProject::new();
    project.add_dist_info("Zebra", "1.0", &metadata("Zebra", "1.0", &["License: MIT"]));
    project.add_dist_info(
        "apple",
        "2.0",
        &metadata("apple", "2.0", &["License: BSD-3-Clause"]),
    );

    let output = project.run(&["list"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout_of(&output),
        "apple (2.0): BSD-3-Clause\nZebra (1.0): MIT\n"
    );
    assert_eq!(stderr_of(&output), "");
}

#[test]
fn test_list_expands_license_expressions() {
    let project = TestProject::new();
    project.add_dist_info(
        "dual",
        "1.0",
        &metadata("dual", "1.0", &["License-Expression: MIT OR Apache-2.0"]),
    );

    let output = project.run(&["list"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "dual (1.0): Apache-2.0, MIT\n");
}

#[test]
fn test_list_reads_egg_info_distributions() {
    let project = TestProject::new();
    project.add_egg_info(
        "legacy",
        "0.9",
        &metadata("legacy", "0.9", &["License: BSD-3-Clause"]),
    );

    let output = project.run(&["list"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "legacy (0.9): BSD-3-Clause\n");
}

#[test]
fn test_list_reports_unknown_when_metadata_is_silent() {
    let project = TestProject::new();
    project.add_dist_info("bare", "1.0", &metadata("bare", "1.0", &[]));

    let output = project.run(&["list"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "bare (1.0): unknown\n");
}

#[test]
fn test_list_resolves_license_from_classifier() {
    let project = TestProject::new();
    project.add_dist_info(
        "classy",
        "1.0",
        &metadata(
            "classy",
            "1.0",
            &["Classifier: License :: OSI Approved :: MIT License"],
        ),
    );

    let output = project.run(&["list"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "classy (1.0): MIT License\n");
}

#[test]
fn test_osi_approved_classifier_falls_through_to_license_field() {
    let project = TestProject::new();
    project.add_dist_info(
        "zopeish",
        "1.0",
        &metadata(
            "zopeish",
            "1.0",
            &[
                "Classifier: License :: OSI Approved",
                "License: Zope Public License",
            ],
        ),
    );

    let output = project.run(&["list"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "zopeish (1.0): Zope Public License\n");
}

#[test]
fn test_description_body_is_not_scanned_for_headers() {
    let project = TestProject::new();
    project.write_pyproject("[tool.py-license-gate]\nsafe_licenses = [\"MIT\"]\n");
    project.add_dist_info(
        "readme",
        "1.0",
        "Metadata-Version: 2.1\nName: readme\nVersion: 1.0\nLicense: MIT\n\nLicense: GPL-3.0 is discussed at length in this body.\n",
    );

    let output = project.run(&["check"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "✨ All licenses ok ✨\n");
}

#[test]
fn test_list_accepts_explicit_site_packages_path() {
    let project = TestProject::new();
    project.add_dist_info("pkga", "1.0", &metadata("pkga", "1.0", &["License: MIT"]));

    let output = project.run(&["list", ".venv/lib/python3.12/site-packages"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "pkga (1.0): MIT\n");
}

#[test]
fn test_list_fails_without_environment() {
    let project = TestProject::new();

    let output = project.run(&["list"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Could not find a site-packages directory"));
}

#[test]
fn test_version_subcommand_prints_version() {
    let project = TestProject::new();

    let output = project.run(&["version"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), concat!(env!("CARGO_PKG_VERSION"), "\n"));
}

#[test]
fn test_version_flag_exits_cleanly() {
    let project = TestProject::new();

    let output = project.run(&["--version"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_of(&output).contains(env!("CARGO_PKG_VERSION")));

    let output = project.run(&["-V"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_help_exits_cleanly() {
    let project = TestProject::new();

    let output = project.run(&["--help"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_of(&output).contains("Usage"));
}

#[test]
fn test_bare_invocation_shows_usage_and_fails() {
    let project = TestProject::new();

    let output = project.run(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Usage"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let project = TestProject::new();

    let output = project.run(&["frobnicate"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("frobnicate"));
}
