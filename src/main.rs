use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

// Import from our library
use py_license_gate::checker::LicenseChecker;
use py_license_gate::config::load_config;
use py_license_gate::licenses::{find_site_packages, read_installed_packages};
use py_license_gate::output::{render_check, render_package_list, CheckOptions};

#[derive(Parser)]
#[command(name = "py-license-gate")]
#[command(about = "Check the licenses of installed Python packages against a pyproject.toml policy")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check installed licenses against the configured policy
    Check {
        /// Path to site-packages directory or virtual environment
        path: Option<PathBuf>,

        /// Only show warnings and errors
        #[arg(long)]
        quiet: bool,

        /// Allow unsafe packages that are not installed
        #[arg(short = 'p', long)]
        allow_extra_unsafe_packages: bool,

        /// Allow safe licenses that no installed package uses
        #[arg(short = 'l', long)]
        allow_extra_safe_licenses: bool,
    },
    /// List installed packages and their corresponding licenses
    List {
        /// Path to site-packages directory or virtual environment
        path: Option<PathBuf>,
    },
    /// Print the version of py-license-gate
    Version,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return exit_code_for_usage_error(error),
    };

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

/// Help and version requests exit cleanly; every other usage error exits 1,
/// including a bare invocation without a subcommand.
fn exit_code_for_usage_error(error: clap::Error) -> ExitCode {
    let code = match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    };
    error.print().expect("Failed to print usage error");
    code
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Check {
            path,
            quiet,
            allow_extra_unsafe_packages,
            allow_extra_safe_licenses,
        } => {
            let options = CheckOptions {
                quiet,
                allow_extra_unsafe_packages,
                allow_extra_safe_licenses,
            };
            handle_check(path, &options)
        }
        Commands::List { path } => {
            handle_list(path)?;
            Ok(true)
        }
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(true)
        }
    }
}

fn handle_check(path: Option<PathBuf>, options: &CheckOptions) -> Result<bool> {
    // Config errors must surface before any site-packages access
    let config = load_config()?;

    let site_packages = find_site_packages(path)?;
    let installed_packages = read_installed_packages(&site_packages)?;

    let checker = LicenseChecker::new(&config, &installed_packages);
    let report = checker.evaluate();

    let stdout = io::stdout();
    let stderr = io::stderr();
    let passed = render_check(&report, options, &mut stdout.lock(), &mut stderr.lock())?;
    Ok(passed)
}

fn handle_list(path: Option<PathBuf>) -> Result<()> {
    let site_packages = find_site_packages(path)?;
    let installed_packages = read_installed_packages(&site_packages)?;

    let stdout = io::stdout();
    render_package_list(&installed_packages, &mut stdout.lock())?;
    Ok(())
}
