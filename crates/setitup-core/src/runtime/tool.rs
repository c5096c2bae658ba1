//! External tools a generator depends on

use crate::options::PackageManager;
use std::process::Command;

/// Minimum supported Node.js release
pub const MIN_NODE_VERSION: &str = "18.0.0";

/// An external command-line tool that must be on PATH
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequirement {
    /// Name of the binary (e.g., "node")
    pub name: &'static str,
    /// Display name for user-facing messages
    pub display_name: &'static str,
    /// Argument that prints the version
    pub version_arg: &'static str,
    /// Where to get it
    pub docs_url: &'static str,
    pub min_version: Option<&'static str>,
}

impl ToolRequirement {
    pub fn node() -> Self {
        Self {
            name: "node",
            display_name: "Node.js",
            version_arg: "--version",
            docs_url: "https://nodejs.org",
            min_version: Some(MIN_NODE_VERSION),
        }
    }

    pub fn git() -> Self {
        Self {
            name: "git",
            display_name: "Git",
            version_arg: "--version",
            docs_url: "https://git-scm.com/downloads",
            min_version: None,
        }
    }

    /// JDK for Android builds; `java` prints its version with a single dash
    pub fn java() -> Self {
        Self {
            name: "java",
            display_name: "Java (JDK)",
            version_arg: "-version",
            docs_url: "https://adoptium.net",
            min_version: None,
        }
    }

    pub fn cocoapods() -> Self {
        Self {
            name: "pod",
            display_name: "CocoaPods",
            version_arg: "--version",
            docs_url: "https://cocoapods.org",
            min_version: None,
        }
    }

    pub fn package_manager(pm: PackageManager) -> Self {
        let (display_name, docs_url) = match pm {
            PackageManager::Npm => ("npm", "https://docs.npmjs.com/downloading-and-installing-node-js-and-npm"),
            PackageManager::Yarn => ("Yarn", "https://yarnpkg.com/getting-started/install"),
            PackageManager::Pnpm => ("pnpm", "https://pnpm.io/installation"),
        };
        Self {
            name: pm.program(),
            display_name,
            version_arg: "--version",
            docs_url,
            min_version: None,
        }
    }

    /// Message line for a missing tool
    pub fn install_hint(&self) -> String {
        format!("{} (install from {})", self.display_name, self.docs_url)
    }

    /// Run `<name> <version_arg>` and report what was found
    pub fn probe(&self) -> Option<String> {
        let output = Command::new(self.name).arg(self.version_arg).output().ok()?;
        if !output.status.success() {
            return None;
        }
        // java writes its banner to stderr
        let text = if output.stdout.is_empty() {
            String::from_utf8_lossy(&output.stderr).into_owned()
        } else {
            String::from_utf8_lossy(&output.stdout).into_owned()
        };
        Some(text.lines().next().unwrap_or_default().trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_manager_requirement_uses_binary_name() {
        let pnpm = ToolRequirement::package_manager(PackageManager::Pnpm);
        assert_eq!(pnpm.name, "pnpm");
        assert!(pnpm.install_hint().contains("https://pnpm.io/installation"));
    }

    #[test]
    fn test_only_node_has_a_minimum() {
        assert_eq!(ToolRequirement::node().min_version, Some("18.0.0"));
        assert!(ToolRequirement::git().min_version.is_none());
        assert_eq!(ToolRequirement::java().version_arg, "-version");
    }

    #[test]
    fn test_probe_missing_binary() {
        let missing = ToolRequirement {
            name: "setitup-definitely-not-installed",
            display_name: "Nothing",
            version_arg: "--version",
            docs_url: "https://example.com",
            min_version: None,
        };
        assert!(missing.probe().is_none());
    }
}
