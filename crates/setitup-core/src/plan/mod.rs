//! Ordered project plans
//!
//! A [`Plan`] is computed once from resolved options and never mutated. It
//! holds the forward steps (filesystem actions and external commands, in
//! order) and an optional reconciliation phase the executor runs only after
//! every forward step has completed.

use colored::Colorize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Filesystem effect, with paths relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAction {
    /// `""` creates the project root itself
    CreateDir(String),
    WriteFile { path: String, content: String },
    RenameFile { from: String, to: String },
    DeleteFile(String),
    /// Copy a bundled template (see [`crate::templates`])
    CopyTemplate { key: String, dest: String },
    /// Add the `@/*` path alias to a comment-tolerant tsconfig
    PatchTsConfig(String),
}

/// Why an external command is run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandPurpose {
    /// Creates the project root
    Scaffold,
    Install,
    Generate,
    Initialize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Absolute: the project root or its parent
    pub cwd: PathBuf,
    pub purpose: CommandPurpose,
    /// Inherit the terminal instead of capturing output
    pub interactive: bool,
}

impl ExternalCommand {
    /// Shell-like rendering for messages
    pub fn display_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandAction {
    RunExternal(ExternalCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    File(FileAction),
    Command(CommandAction),
}

/// What a failing step does to the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnFailure {
    Abort,
    /// Record a warning with this hint and continue
    Warn(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub label: String,
    pub action: Action,
    pub on_failure: OnFailure,
}

impl Step {
    pub fn is_recoverable(&self) -> bool {
        matches!(self.on_failure, OnFailure::Warn(_))
    }
}

/// Work deferred until the forward phase has finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationPhase {
    /// Convert a TypeScript scaffold back to JavaScript
    DowngradeToJavaScript,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub root: PathBuf,
    pub steps: Vec<Step>,
    pub reconciliation: Option<ReconciliationPhase>,
}

impl Plan {
    /// External commands in execution order
    pub fn commands(&self) -> impl Iterator<Item = &ExternalCommand> {
        self.steps.iter().filter_map(|step| match &step.action {
            Action::Command(CommandAction::RunExternal(cmd)) => Some(cmd),
            Action::File(_) => None,
        })
    }

    /// Index of the first step matching `predicate`
    pub fn position(&self, predicate: impl Fn(&Step) -> bool) -> Option<usize> {
        self.steps.iter().position(predicate)
    }

    /// Paths written (WriteFile/CopyTemplate/RenameFile targets), in order
    pub fn written_paths(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|step| match &step.action {
                Action::File(FileAction::WriteFile { path, .. }) => Some(path.as_str()),
                Action::File(FileAction::CopyTemplate { dest, .. }) => Some(dest.as_str()),
                Action::File(FileAction::RenameFile { to, .. }) => Some(to.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Writes whose parent directory was not created by an earlier step
    ///
    /// The root counts as created after `CreateDir("")` or a scaffold command.
    pub fn orphaned_writes(&self) -> Vec<String> {
        let mut root_ready = false;
        let mut created: HashSet<&str> = HashSet::new();
        let mut orphans = Vec::new();

        for step in &self.steps {
            match &step.action {
                Action::Command(CommandAction::RunExternal(cmd)) => {
                    if cmd.purpose == CommandPurpose::Scaffold {
                        root_ready = true;
                    }
                }
                Action::File(FileAction::CreateDir(dir)) => {
                    if dir.is_empty() {
                        root_ready = true;
                    } else {
                        created.insert(dir.as_str());
                    }
                }
                Action::File(FileAction::WriteFile { path: target, .. })
                | Action::File(FileAction::CopyTemplate { dest: target, .. })
                | Action::File(FileAction::RenameFile { to: target, .. }) => {
                    let parent = parent_of(target);
                    let ready = if parent.is_empty() {
                        root_ready
                    } else {
                        root_ready && created.contains(parent)
                    };
                    if !ready {
                        orphans.push(target.clone());
                    }
                }
                Action::File(_) => {}
            }
        }
        orphans
    }
}

fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Accumulates steps for one plan
pub struct PlanBuilder {
    root: PathBuf,
    steps: Vec<Step>,
    reconciliation: Option<ReconciliationPhase>,
}

impl PlanBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            steps: Vec::new(),
            reconciliation: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory containing the project root, where scaffolders run
    pub fn parent_dir(&self) -> PathBuf {
        match self.root.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn push(&mut self, label: impl Into<String>, action: Action, on_failure: OnFailure) {
        self.steps.push(Step {
            label: label.into(),
            action,
            on_failure,
        });
    }

    pub fn file(&mut self, label: impl Into<String>, action: FileAction) -> &mut Self {
        self.push(label, Action::File(action), OnFailure::Abort);
        self
    }

    pub fn file_or_warn(
        &mut self,
        label: impl Into<String>,
        action: FileAction,
        hint: impl Into<String>,
    ) -> &mut Self {
        self.push(label, Action::File(action), OnFailure::Warn(hint.into()));
        self
    }

    pub fn create_dir(&mut self, dir: &str) -> &mut Self {
        let label = if dir.is_empty() {
            "Creating project directory".to_string()
        } else {
            format!("Creating {}/", dir)
        };
        self.file(label, FileAction::CreateDir(dir.to_string()))
    }

    pub fn write(&mut self, path: impl Into<String>, content: String) -> &mut Self {
        let path = path.into();
        self.file(
            format!("Writing {}", path),
            FileAction::WriteFile { path, content },
        )
    }

    pub fn copy_template(&mut self, key: String, dest: String) -> &mut Self {
        self.file(
            format!("Copying {}", dest),
            FileAction::CopyTemplate { key, dest },
        )
    }

    /// Run `program args` in the project root
    pub fn command(
        &mut self,
        label: impl Into<String>,
        program: impl Into<String>,
        args: Vec<String>,
        purpose: CommandPurpose,
    ) -> &mut Self {
        let cwd = self.root.clone();
        self.push(
            label,
            Action::Command(CommandAction::RunExternal(ExternalCommand {
                program: program.into(),
                args,
                cwd,
                purpose,
                interactive: false,
            })),
            OnFailure::Abort,
        );
        self
    }

    /// Push an already-built command with an explicit failure policy
    pub fn external(
        &mut self,
        label: impl Into<String>,
        command: ExternalCommand,
        on_failure: OnFailure,
    ) -> &mut Self {
        self.push(
            label,
            Action::Command(CommandAction::RunExternal(command)),
            on_failure,
        );
        self
    }

    /// Run the scaffolder in the parent directory; it creates the root
    pub fn scaffold(
        &mut self,
        label: impl Into<String>,
        program: impl Into<String>,
        args: Vec<String>,
    ) -> &mut Self {
        let command = ExternalCommand {
            program: program.into(),
            args,
            cwd: self.parent_dir(),
            purpose: CommandPurpose::Scaffold,
            interactive: false,
        };
        self.external(label, command, OnFailure::Abort)
    }

    pub fn reconcile(&mut self, phase: ReconciliationPhase) -> &mut Self {
        self.reconciliation = Some(phase);
        self
    }

    pub fn build(self) -> Plan {
        Plan {
            root: self.root,
            steps: self.steps,
            reconciliation: self.reconciliation,
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", "Plan for".bold(), self.root.display())?;
        for (i, step) in self.steps.iter().enumerate() {
            let detail = match &step.action {
                Action::File(FileAction::CreateDir(dir)) if dir.is_empty() => "mkdir .".to_string(),
                Action::File(FileAction::CreateDir(dir)) => format!("mkdir {}", dir),
                Action::File(FileAction::WriteFile { path, content }) => {
                    format!("write {} ({} bytes)", path, content.len())
                }
                Action::File(FileAction::RenameFile { from, to }) => {
                    format!("rename {} -> {}", from, to)
                }
                Action::File(FileAction::DeleteFile(path)) => format!("delete {}", path),
                Action::File(FileAction::CopyTemplate { key, dest }) => {
                    format!("copy {} -> {}", key, dest)
                }
                Action::File(FileAction::PatchTsConfig(path)) => format!("patch {}", path),
                Action::Command(CommandAction::RunExternal(cmd)) => {
                    format!("$ {}  (in {})", cmd.display_line(), cmd.cwd.display())
                }
            };
            let marker = if step.is_recoverable() {
                "~".yellow()
            } else {
                "-".blue()
            };
            writeln!(
                f,
                "  {:>2}. {} {}  {}",
                i + 1,
                marker,
                step.label,
                detail.dimmed()
            )?;
        }
        if let Some(ReconciliationPhase::DowngradeToJavaScript) = self.reconciliation {
            writeln!(
                f,
                "  {} {}",
                "then".cyan(),
                "convert the TypeScript scaffold to JavaScript"
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_under_created_dirs_are_not_orphaned() {
        let mut builder = PlanBuilder::new("/work/app");
        builder
            .create_dir("")
            .write("package.json", "{}\n".to_string())
            .create_dir("src")
            .write("src/index.js", "\n".to_string());
        assert!(builder.build().orphaned_writes().is_empty());
    }

    #[test]
    fn test_write_before_its_directory_is_orphaned() {
        let mut builder = PlanBuilder::new("/work/app");
        builder
            .create_dir("")
            .write("src/index.js", "\n".to_string())
            .create_dir("src");
        assert_eq!(builder.build().orphaned_writes(), vec!["src/index.js"]);
    }

    #[test]
    fn test_root_writes_need_the_root() {
        let mut builder = PlanBuilder::new("/work/app");
        builder.write("package.json", "{}\n".to_string());
        assert_eq!(builder.build().orphaned_writes(), vec!["package.json"]);

        let mut scaffolded = PlanBuilder::new("/work/app");
        scaffolded
            .scaffold("Scaffolding", "npx", vec!["init".to_string()])
            .write("App.tsx", "\n".to_string());
        assert!(scaffolded.build().orphaned_writes().is_empty());
    }

    #[test]
    fn test_scaffold_runs_in_parent_and_commands_in_root() {
        let mut builder = PlanBuilder::new("/work/app");
        builder
            .scaffold("Scaffolding", "npm", vec!["create".to_string()])
            .command(
                "Installing",
                "npm",
                vec!["install".to_string()],
                CommandPurpose::Install,
            );
        let plan = builder.build();
        let cwds: Vec<&Path> = plan.commands().map(|c| c.cwd.as_path()).collect();
        assert_eq!(cwds, vec![Path::new("/work"), Path::new("/work/app")]);
    }

    #[test]
    fn test_relative_root_scaffolds_in_current_dir() {
        let builder = PlanBuilder::new("my-app");
        assert_eq!(builder.parent_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_display_lists_every_step() {
        colored::control::set_override(false);
        let mut builder = PlanBuilder::new("/work/app");
        builder
            .create_dir("")
            .write("package.json", "{}\n".to_string())
            .reconcile(ReconciliationPhase::DowngradeToJavaScript);
        let text = builder.build().to_string();
        assert!(text.contains("1. - Creating project directory"));
        assert!(text.contains("write package.json (3 bytes)"));
        assert!(text.contains("convert the TypeScript scaffold to JavaScript"));
    }
}
