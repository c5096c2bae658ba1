//! Project options collected by the wizard and consumed by the planner

use crate::error::SetupError;
use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static PROJECT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_-]+$").expect("project name pattern is valid"));

/// Supported project types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    React,
    ReactNative,
    Express,
}

impl ProjectType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectType::React => "React",
            ProjectType::ReactNative => "React Native",
            ProjectType::Express => "Express",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Source language of the generated project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[value(name = "ts", alias = "typescript")]
    #[serde(alias = "ts")]
    TypeScript,
    #[value(name = "js", alias = "javascript")]
    #[serde(alias = "js")]
    JavaScript,
}

impl Language {
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::TypeScript => "TypeScript",
            Language::JavaScript => "JavaScript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Package manager used for installs inside the generated project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// Binary name on PATH
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }

    /// Arguments installing everything listed in package.json
    pub fn install_args(&self) -> Vec<String> {
        vec!["install".to_string()]
    }

    /// Arguments adding packages as dependencies (or dev dependencies)
    pub fn add_args(&self, packages: &[&str], dev: bool) -> Vec<String> {
        let verb = match self {
            PackageManager::Npm => "install",
            PackageManager::Yarn | PackageManager::Pnpm => "add",
        };
        let mut args = vec![verb.to_string()];
        if dev {
            args.push("-D".to_string());
        }
        args.extend(packages.iter().map(|p| p.to_string()));
        args
    }

    /// Program and arguments that run a binary installed in node_modules
    pub fn exec(&self, binary: &str, args: &[&str]) -> (String, Vec<String>) {
        let (program, mut full): (&str, Vec<String>) = match self {
            PackageManager::Npm => ("npx", vec![binary.to_string()]),
            PackageManager::Yarn => ("yarn", vec![binary.to_string()]),
            PackageManager::Pnpm => ("pnpm", vec!["exec".to_string(), binary.to_string()]),
        };
        full.extend(args.iter().map(|a| a.to_string()));
        (program.to_string(), full)
    }

    /// Shell line running a package.json script, for next-steps text
    pub fn run_script(&self, script: &str) -> String {
        match self {
            PackageManager::Npm => format!("npm run {}", script),
            PackageManager::Yarn => format!("yarn {}", script),
            PackageManager::Pnpm => format!("pnpm {}", script),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program())
    }
}

/// Mobile platforms a React Native project targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetPlatform {
    Android,
    #[value(name = "ios")]
    Ios,
    #[default]
    Both,
}

impl TargetPlatform {
    pub fn includes_android(&self) -> bool {
        matches!(self, TargetPlatform::Android | TargetPlatform::Both)
    }

    pub fn includes_ios(&self) -> bool {
        matches!(self, TargetPlatform::Ios | TargetPlatform::Both)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TargetPlatform::Android => "Android",
            TargetPlatform::Ios => "iOS",
            TargetPlatform::Both => "Android & iOS",
        }
    }
}

/// How React Navigation screens are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationLayout {
    /// App wrapper plus one file per screen under src/pages
    #[default]
    Modular,
    /// Navigator and both screens in a single App file
    SingleFile,
}

/// Database integration for Express projects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    #[default]
    None,
    Mongoose,
    Prisma,
}

impl Database {
    pub fn display_name(&self) -> &'static str {
        match self {
            Database::None => "None",
            Database::Mongoose => "MongoDB (Mongoose)",
            Database::Prisma => "PostgreSQL (Prisma)",
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A project name matching `^[a-z0-9_-]+$`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn parse(name: &str) -> Result<Self, SetupError> {
        if PROJECT_NAME.is_match(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(SetupError::InvalidProjectName {
                name: name.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactOptions {
    pub language: Language,
    pub add_shadcn: bool,
    pub add_router: bool,
    pub add_context: bool,
}

impl ReactOptions {
    /// Shadcn only ships a TypeScript setup, so it forces a TypeScript scaffold
    pub fn effective_typescript(&self) -> bool {
        self.language == Language::TypeScript || self.add_shadcn
    }

    /// JavaScript was requested but the scaffold had to be TypeScript
    pub fn needs_downgrade(&self) -> bool {
        self.language == Language::JavaScript && self.add_shadcn
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactNativeOptions {
    pub language: Language,
    pub add_navigation: bool,
    pub target_platform: TargetPlatform,
    pub navigation_layout: NavigationLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpressOptions {
    pub language: Language,
    pub database: Database,
}

/// Answers that only apply to one project type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSpecificOptions {
    React(ReactOptions),
    ReactNative(ReactNativeOptions),
    Express(ExpressOptions),
}

impl TypeSpecificOptions {
    pub fn project_type(&self) -> ProjectType {
        match self {
            TypeSpecificOptions::React(_) => ProjectType::React,
            TypeSpecificOptions::ReactNative(_) => ProjectType::ReactNative,
            TypeSpecificOptions::Express(_) => ProjectType::Express,
        }
    }

    pub fn language(&self) -> Language {
        match self {
            TypeSpecificOptions::React(o) => o.language,
            TypeSpecificOptions::ReactNative(o) => o.language,
            TypeSpecificOptions::Express(o) => o.language,
        }
    }

    /// Governs file extensions throughout planning
    pub fn effective_typescript(&self) -> bool {
        match self {
            TypeSpecificOptions::React(o) => o.effective_typescript(),
            other => other.language() == Language::TypeScript,
        }
    }
}

/// Fully-resolved answers for one wizard run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectOptions {
    pub name: ProjectName,
    pub package_manager: PackageManager,
    pub details: TypeSpecificOptions,
}

impl ProjectOptions {
    pub fn project_type(&self) -> ProjectType {
        self.details.project_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_name_accepts_lowercase_digits_and_separators() {
        for name in ["my-awesome-app", "app_2", "x", "0-0"] {
            assert!(ProjectName::parse(name).is_ok(), "{} should be valid", name);
        }
    }

    #[test]
    fn test_project_name_rejects_malformed_names() {
        for name in ["My App!", "", "my app", "App", "my.app", "../escape"] {
            assert!(
                matches!(
                    ProjectName::parse(name),
                    Err(SetupError::InvalidProjectName { .. })
                ),
                "{:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_shadcn_forces_typescript() {
        let react = ReactOptions {
            language: Language::JavaScript,
            add_shadcn: true,
            add_router: false,
            add_context: false,
        };
        assert!(react.effective_typescript());
        assert!(react.needs_downgrade());

        let plain = ReactOptions {
            add_shadcn: false,
            ..react
        };
        assert!(!plain.effective_typescript());
        assert!(!plain.needs_downgrade());
    }

    #[test]
    fn test_effective_typescript_follows_language_outside_react() {
        let express = TypeSpecificOptions::Express(ExpressOptions {
            language: Language::JavaScript,
            database: Database::Prisma,
        });
        assert!(!express.effective_typescript());

        let native = TypeSpecificOptions::ReactNative(ReactNativeOptions {
            language: Language::TypeScript,
            add_navigation: true,
            target_platform: TargetPlatform::Android,
            navigation_layout: NavigationLayout::Modular,
        });
        assert!(native.effective_typescript());
        assert_eq!(native.project_type(), ProjectType::ReactNative);
    }

    #[test]
    fn test_package_manager_verbs() {
        assert_eq!(
            PackageManager::Npm.add_args(&["react-router-dom"], false),
            vec!["install", "react-router-dom"]
        );
        assert_eq!(
            PackageManager::Yarn.add_args(&["@types/node"], true),
            vec!["add", "-D", "@types/node"]
        );
        assert_eq!(PackageManager::Pnpm.install_args(), vec!["install"]);

        let (program, args) = PackageManager::Pnpm.exec("prisma", &["generate"]);
        assert_eq!(program, "pnpm");
        assert_eq!(args, vec!["exec", "prisma", "generate"]);

        assert_eq!(PackageManager::Yarn.run_script("dev"), "yarn dev");
    }

    #[test]
    fn test_preset_spellings_deserialize() {
        let lang: Language = serde_yaml::from_str("ts").unwrap();
        assert_eq!(lang, Language::TypeScript);
        let kind: ProjectType = serde_yaml::from_str("react-native").unwrap();
        assert_eq!(kind, ProjectType::ReactNative);
        let layout: NavigationLayout = serde_yaml::from_str("single-file").unwrap();
        assert_eq!(layout, NavigationLayout::SingleFile);
    }
}
