//! Error types for planning and execution

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Rule shown when a project name fails validation
pub const PROJECT_NAME_RULE: &str =
    "Project name may only include lowercase letters, numbers, underscores and hyphens.";

/// Errors raised before any plan is executed
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Invalid project name '{name}'. {}", PROJECT_NAME_RULE)]
    InvalidProjectName { name: String },

    #[error("Missing required tools:\n{}", format_missing(.0))]
    MissingPrerequisites(Vec<String>),

    #[error("Failed to read preset {}: {source}", path.display())]
    PresetRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse preset {}: {source}", path.display())]
    PresetParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

fn format_missing(missing: &[String]) -> String {
    missing
        .iter()
        .map(|m| format!("  - {}", m))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Failure of a single plan step
#[derive(Debug, Error)]
pub enum StepError {
    #[error("Failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {status}\n{output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },

    #[error("File system error at '{}': {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unknown bundled template '{0}'")]
    UnknownTemplate(String),

    #[error("Could not update {}: {reason}", path.display())]
    TsConfig { path: PathBuf, reason: String },
}

impl StepError {
    pub(crate) fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StepError::FileSystem {
            path: path.into(),
            source,
        }
    }
}

/// A fatal step failure that aborted the plan
#[derive(Debug, Error)]
#[error("{step} failed: {source}")]
pub struct ExecutionError {
    pub step: String,
    #[source]
    pub source: StepError,
}

/// Failure to downgrade one TypeScript file
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("could not parse the file near line {line}")]
    Parse { line: usize },

    #[error("unsupported TypeScript syntax on line {line}: {text}")]
    Residual { line: usize, text: String },

    #[error("converted output is not valid JavaScript near line {line}")]
    InvalidOutput { line: usize },

    #[error("failed to load grammar: {0}")]
    Grammar(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
