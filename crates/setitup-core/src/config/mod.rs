//! Preset files and answer resolution
//!
//! Answers arrive from three places: a YAML preset, command-line flags and
//! the wizard. Each source fills an [`Answers`] record; later sources
//! override earlier ones and [`Answers::resolve`] turns the result into
//! validated [`ProjectOptions`].

use crate::error::SetupError;
use crate::options::{
    Database, ExpressOptions, Language, NavigationLayout, PackageManager, ProjectName,
    ProjectOptions, ProjectType, ReactNativeOptions, ReactOptions, TargetPlatform,
    TypeSpecificOptions,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name used when none is given under `--yes`
pub const DEFAULT_PROJECT_NAME: &str = "my-awesome-app";

/// Possibly incomplete answers; `None` means "not answered yet"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Answers {
    #[serde(rename = "type")]
    pub project_type: Option<ProjectType>,
    pub name: Option<String>,
    pub package_manager: Option<PackageManager>,
    pub language: Option<Language>,
    pub shadcn: Option<bool>,
    pub router: Option<bool>,
    pub context: Option<bool>,
    pub navigation: Option<bool>,
    pub platform: Option<TargetPlatform>,
    pub navigation_layout: Option<NavigationLayout>,
    pub database: Option<Database>,
}

macro_rules! take_override {
    ($base:ident, $over:ident, $($field:ident),+ $(,)?) => {
        Answers {
            $($field: $over.$field.or($base.$field),)+
        }
    };
}

impl Answers {
    /// Load answers from a YAML preset file
    pub fn from_preset(path: &Path) -> Result<Self, SetupError> {
        let text = std::fs::read_to_string(path).map_err(|source| SetupError::PresetRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| SetupError::PresetParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as null
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Answers in `overrides` win over `self`
    pub fn merge(self, overrides: Answers) -> Answers {
        let base = self;
        let over = overrides;
        take_override!(
            base,
            over,
            project_type,
            name,
            package_manager,
            language,
            shadcn,
            router,
            context,
            navigation,
            platform,
            navigation_layout,
            database,
        )
    }

    /// Fill unanswered questions with defaults and validate the result
    pub fn resolve(&self) -> Result<ProjectOptions, SetupError> {
        let name = ProjectName::parse(self.name.as_deref().unwrap_or(DEFAULT_PROJECT_NAME))?;
        let language = self.language.unwrap_or(Language::TypeScript);

        let details = match self.project_type.unwrap_or(ProjectType::React) {
            ProjectType::React => TypeSpecificOptions::React(ReactOptions {
                language,
                add_shadcn: self.shadcn.unwrap_or(false),
                add_router: self.router.unwrap_or(false),
                add_context: self.context.unwrap_or(false),
            }),
            ProjectType::ReactNative => TypeSpecificOptions::ReactNative(ReactNativeOptions {
                language,
                add_navigation: self.navigation.unwrap_or(false),
                target_platform: self.platform.unwrap_or_default(),
                navigation_layout: self.navigation_layout.unwrap_or_default(),
            }),
            ProjectType::Express => TypeSpecificOptions::Express(ExpressOptions {
                language,
                database: self.database.unwrap_or_default(),
            }),
        };

        Ok(ProjectOptions {
            name,
            package_manager: self.package_manager.unwrap_or_default(),
            details,
        })
    }
}
