pub mod licenses;
pub mod checker;
pub mod config;
pub mod output;

// Re-export main types for easy access
pub use checker::{CheckReport, LicenseChecker, UnsafeLicense, UnsafeLicenses};
pub use config::Config;
pub use licenses::{Package, UNKNOWN_LICENSE};
