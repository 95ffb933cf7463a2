use indexmap::IndexSet;

use crate::config::Config;
use crate::licenses::{Package, UNKNOWN_LICENSE};

/// ライセンス違反の詳細情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsafeLicense {
    pub package: String,
    pub version: String,
    pub license: String,
}

/// 安全リスト外ライセンスの検出結果（found はブロック、ignored は情報のみ）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnsafeLicenses {
    pub found: Vec<UnsafeLicense>,
    pub ignored: Vec<UnsafeLicense>,
}

/// unsafe_packages に載っているのに既知のライセンスを持つパッケージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadUnsafePackage {
    pub package: String,
    pub version: String,
    pub licenses: Vec<String>,
}

/// ライセンス不明なのに unsafe_packages に載っていないパッケージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingUnsafePackage {
    pub package: String,
    pub version: String,
}

/// チェック結果のレポート。各項目は入力順を保った列
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub unnecessary_safe_licenses: Vec<String>,
    pub unnecessary_unsafe_packages: Vec<String>,
    pub unnecessary_ignored_packages: Vec<String>,
    pub bad_unsafe_packages: Vec<BadUnsafePackage>,
    pub missing_unsafe_packages: Vec<MissingUnsafePackage>,
    pub unsafe_licenses: UnsafeLicenses,
}

impl CheckReport {
    /// Returns true when no finding of any category is present.
    pub fn is_empty(&self) -> bool {
        self.unnecessary_safe_licenses.is_empty()
            && self.unnecessary_unsafe_packages.is_empty()
            && self.unnecessary_ignored_packages.is_empty()
            && self.bad_unsafe_packages.is_empty()
            && self.missing_unsafe_packages.is_empty()
            && self.unsafe_licenses.found.is_empty()
            && self.unsafe_licenses.ignored.is_empty()
    }
}

/// ポリシー評価エンジン。設定とインストール済みパッケージを突き合わせる
///
/// Every query is pure: no I/O, no mutation, deterministic over its inputs.
/// All name and license comparisons are case-insensitive; reported strings
/// keep the casing of whichever side the rule reads them from.
pub struct LicenseChecker<'a> {
    config: &'a Config,
    installed_packages: &'a [Package],
}

impl<'a> LicenseChecker<'a> {
    pub fn new(config: &'a Config, installed_packages: &'a [Package]) -> Self {
        Self {
            config,
            installed_packages,
        }
    }

    /// 全チェックを実行してレポートを作成
    pub fn evaluate(&self) -> CheckReport {
        CheckReport {
            unnecessary_safe_licenses: self.unnecessary_safe_licenses(),
            unnecessary_unsafe_packages: self.unnecessary_unsafe_packages(),
            unnecessary_ignored_packages: self.unnecessary_ignored_packages(),
            bad_unsafe_packages: self.bad_unsafe_packages(),
            missing_unsafe_packages: self.missing_unsafe_packages(),
            unsafe_licenses: self.unsafe_licenses(),
        }
    }

    /// Safe licenses that no installed package uses.
    pub fn unnecessary_safe_licenses(&self) -> Vec<String> {
        let installed_licenses: IndexSet<String> = self
            .installed_packages
            .iter()
            .flat_map(|package| package.licenses.iter())
            .map(|license| license.to_lowercase())
            .collect();

        self.config
            .safe_licenses
            .iter()
            .filter(|license| !installed_licenses.contains(&license.to_lowercase()))
            .cloned()
            .collect()
    }

    /// Unsafe packages that are not installed.
    pub fn unnecessary_unsafe_packages(&self) -> Vec<String> {
        self.entries_without_installed_package(&self.config.unsafe_packages)
    }

    /// Ignored packages that are not installed.
    pub fn unnecessary_ignored_packages(&self) -> Vec<String> {
        self.entries_without_installed_package(&self.config.ignored_packages)
    }

    /// Unsafe packages whose license metadata makes the entry redundant.
    ///
    /// A package declaring exactly one license is flagged whenever that
    /// license is known; a package with a multi-license expression is
    /// flagged only when every constituent license is already safe-listed.
    pub fn bad_unsafe_packages(&self) -> Vec<BadUnsafePackage> {
        let unsafe_packages = lowered(&self.config.unsafe_packages);
        let safe_licenses = lowered(&self.config.safe_licenses);

        self.installed_packages
            .iter()
            .filter(|package| unsafe_packages.contains(&package.name.to_lowercase()))
            .filter(|package| match package.licenses.as_slice() {
                [] => false,
                [license] => license.to_lowercase() != UNKNOWN_LICENSE,
                licenses => licenses
                    .iter()
                    .all(|license| safe_licenses.contains(&license.to_lowercase())),
            })
            .map(|package| BadUnsafePackage {
                package: package.name.clone(),
                version: package.version.clone(),
                licenses: package.licenses.clone(),
            })
            .collect()
    }

    /// Packages without license metadata that have not been vouched for.
    ///
    /// Being in ignored_packages does not help here: ignoring downgrades an
    /// unsafe license, it never excuses a missing one.
    pub fn missing_unsafe_packages(&self) -> Vec<MissingUnsafePackage> {
        let unsafe_packages = lowered(&self.config.unsafe_packages);

        self.installed_packages
            .iter()
            .filter(|package| {
                matches!(package.licenses.as_slice(),
                    [license] if license.to_lowercase() == UNKNOWN_LICENSE)
            })
            .filter(|package| !unsafe_packages.contains(&package.name.to_lowercase()))
            .map(|package| MissingUnsafePackage {
                package: package.name.clone(),
                version: package.version.clone(),
            })
            .collect()
    }

    /// Packages declaring a single license outside the safe list, split into
    /// blocking and ignored findings.
    ///
    /// Packages named in unsafe_packages are exempt; packages with a
    /// multi-license expression are judged by the safe-license subset rule
    /// in `bad_unsafe_packages` instead of this single-license path.
    pub fn unsafe_licenses(&self) -> UnsafeLicenses {
        let safe_licenses = lowered(&self.config.safe_licenses);
        let unsafe_packages = lowered(&self.config.unsafe_packages);
        let ignored_packages = lowered(&self.config.ignored_packages);

        let mut unsafe_licenses = UnsafeLicenses::default();

        for package in self.installed_packages {
            let [license] = package.licenses.as_slice() else {
                continue;
            };

            let license_lower = license.to_lowercase();
            if license_lower == UNKNOWN_LICENSE || safe_licenses.contains(&license_lower) {
                continue;
            }
            if unsafe_packages.contains(&package.name.to_lowercase()) {
                continue;
            }

            let violation = UnsafeLicense {
                package: package.name.clone(),
                version: package.version.clone(),
                license: license.clone(),
            };
            if ignored_packages.contains(&package.name.to_lowercase()) {
                unsafe_licenses.ignored.push(violation);
            } else {
                unsafe_licenses.found.push(violation);
            }
        }

        unsafe_licenses
    }

    fn entries_without_installed_package(&self, entries: &[String]) -> Vec<String> {
        let installed_names: IndexSet<String> = self
            .installed_packages
            .iter()
            .map(|package| package.name.to_lowercase())
            .collect();

        entries
            .iter()
            .filter(|entry| !installed_names.contains(&entry.to_lowercase()))
            .cloned()
            .collect()
    }
}

fn lowered(values: &[String]) -> IndexSet<String> {
    values.iter().map(|value| value.to_lowercase()).collect()
}
