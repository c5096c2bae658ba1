//! Set-It-Up Core - planning and execution for the `setitup` project generator
//!
//! This library turns a handful of answers (project type, language, optional
//! features) into a new React, React Native or Express project.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Pure planning** - [`fragments`] produce source text, [`generators`]
//!   compose them into an ordered [`Plan`] of file operations and external commands
//! - **Layer 2: Effects** - [`execute`] runs a plan step by step, [`downgrade`]
//!   converts a TypeScript scaffold back to JavaScript, [`runtime`] checks tools on PATH
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based wizard (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use setitup_core::{config::Answers, execute, generators};
//!
//! let options = Answers::from_preset("preset.yaml".as_ref())?.resolve()?;
//! let generator = generators::generator_for(&options);
//! let plan = generator.plan(&std::env::current_dir()?.join(options.name.as_str()));
//! let report = execute::execute(&plan, &execute::ProcessRunner, &()).await?;
//! ```

pub mod config;
pub mod downgrade;
pub mod error;
pub mod execute;
pub mod fragments;
pub mod generators;
pub mod options;
pub mod plan;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::Answers;
pub use error::{ExecutionError, SetupError, StepError, TransformError};
pub use execute::{execute, CommandRunner, ProcessRunner, Progress, Report};
pub use generators::{generator_for, ProjectGenerator};
pub use options::{
    Database, Language, NavigationLayout, PackageManager, ProjectName, ProjectOptions,
    ProjectType, TargetPlatform,
};
pub use plan::{Plan, Step};
pub use runtime::{check_prerequisites, ToolRequirement};

#[cfg(feature = "tui")]
pub use tui::run;
