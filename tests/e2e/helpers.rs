use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Throwaway Python project: a pyproject.toml plus a fabricated
/// .venv/lib/python3.12/site-packages tree the binary runs against.
pub struct TestProject {
    pub dir: TempDir,
    pub binary_path: String,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let binary_path = env!("CARGO_BIN_EXE_py-license-gate").to_string();

        Self { dir, binary_path }
    }

    pub fn write_pyproject(&self, content: &str) {
        fs::write(self.dir.path().join("pyproject.toml"), content)
            .expect("Failed to write pyproject.toml");
    }

    pub fn site_packages(&self) -> PathBuf {
        let site_packages = self.dir.path().join(".venv/lib/python3.12/site-packages");
        fs::create_dir_all(&site_packages).expect("Failed to create site-packages");
        site_packages
    }

    pub fn add_dist_info(&self, name: &str, version: &str, metadata: &str) {
        let dist_info = self
            .site_packages()
            .join(format!("{name}-{version}.dist-info"));
        fs::create_dir_all(&dist_info).expect("Failed to create dist-info");
        fs::write(dist_info.join("METADATA"), metadata).expect("Failed to write METADATA");
    }

    pub fn add_egg_info(&self, name: &str, version: &str, metadata: &str) {
        let egg_info = self
            .site_packages()
            .join(format!("{name}-{version}.egg-info"));
        fs::create_dir_all(&egg_info).expect("Failed to create egg-info");
        fs::write(egg_info.join("PKG-INFO"), metadata).expect("Failed to write PKG-INFO");
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(self.dir.path())
            .output()
            .expect("Failed to run py-license-gate")
    }
}

/// METADATA content with the given extra headers and a description body
/// separated by the blank line, like real wheels ship it.
pub fn metadata(name: &str, version: &str, extra_headers: &[&str]) -> String {
    let mut content = format!("Metadata-Version: 2.1\nName: {name}\nVersion: {version}\n");
    for header in extra_headers {
        content.push_str(header);
        content.push('\n');
    }
    content.push_str("\nA longer description follows the headers.\n");
    content
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
