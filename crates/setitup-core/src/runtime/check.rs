//! Prerequisite checks run before any project files are touched

use crate::error::SetupError;
use crate::runtime::tool::ToolRequirement;
use semver::Version;

/// Result of probing one tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub requirement: ToolRequirement,
    pub version: Option<String>,
    pub available: bool,
}

impl ToolStatus {
    /// Installed but older than the minimum
    pub fn is_outdated(&self) -> bool {
        match (self.requirement.min_version, self.version.as_deref()) {
            (Some(min), Some(found)) => match (parse_version(found), Version::parse(min)) {
                (Some(found), Ok(min)) => found < min,
                _ => false,
            },
            _ => false,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.available && !self.is_outdated()
    }
}

/// Parse a version banner such as `v20.11.1`, `10.2.4` or `git version 2.43.0`
///
/// The first token that looks like a version wins; a missing patch number is
/// treated as zero.
pub fn parse_version(banner: &str) -> Option<Version> {
    banner
        .split(|c: char| c.is_whitespace() || c == '"')
        .map(|token| token.strip_prefix('v').unwrap_or(token))
        .filter(|token| token.starts_with(|c: char| c.is_ascii_digit()))
        .find_map(|token| {
            Version::parse(token).ok().or_else(|| {
                let parts: Vec<&str> = token.split('.').collect();
                match parts.as_slice() {
                    [major, minor] => Version::parse(&format!("{}.{}.0", major, minor)).ok(),
                    [major] => Version::parse(&format!("{}.0.0", major)).ok(),
                    _ => None,
                }
            })
        })
}

/// Probe each requirement on PATH
pub fn probe_all(requirements: &[ToolRequirement]) -> Vec<ToolStatus> {
    requirements
        .iter()
        .map(|requirement| {
            let version = requirement.probe();
            tracing::debug!(tool = requirement.name, ?version, "probed tool");
            ToolStatus {
                requirement: requirement.clone(),
                available: version.is_some(),
                version,
            }
        })
        .collect()
}

/// Fail with every unsatisfied requirement listed
pub fn evaluate(statuses: Vec<ToolStatus>) -> Result<Vec<ToolStatus>, SetupError> {
    let missing: Vec<String> = statuses
        .iter()
        .filter(|status| !status.is_satisfied())
        .map(|status| {
            if status.available {
                format!(
                    "{} {} or newer (found {}, install from {})",
                    status.requirement.display_name,
                    status.requirement.min_version.unwrap_or_default(),
                    status.version.as_deref().unwrap_or_default(),
                    status.requirement.docs_url
                )
            } else {
                status.requirement.install_hint()
            }
        })
        .collect();

    if !missing.is_empty() {
        return Err(SetupError::MissingPrerequisites(missing));
    }
    Ok(statuses)
}

/// Probe and evaluate in one go
pub fn check_prerequisites(requirements: &[ToolRequirement]) -> Result<Vec<ToolStatus>, SetupError> {
    evaluate(probe_all(requirements))
}
