//! Plan execution
//!
//! Steps run one at a time, in order. A failing `Abort` step stops the run
//! and leaves whatever was already written in place; a failing `Warn` step is
//! recorded and execution continues. The reconciliation phase runs only after
//! every forward step.

pub mod tsconfig;

use crate::downgrade::{self, DowngradeReport};
use crate::error::{ExecutionError, StepError};
use crate::plan::{
    Action, CommandAction, ExternalCommand, FileAction, OnFailure, Plan, ReconciliationPhase,
};
use crate::templates;
use std::future::Future;
use std::io;
use std::path::Path;
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;

/// Runs external commands for the executor
pub trait CommandRunner {
    fn run(&self, command: &ExternalCommand) -> impl Future<Output = Result<(), StepError>>;
}

/// Spawns real processes with `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &ExternalCommand) -> Result<(), StepError> {
        let line = command.display_line();
        tracing::info!(command = %line, cwd = %command.cwd.display(), "running command");

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args).current_dir(&command.cwd);

        let spawn_error = |source: io::Error| StepError::Spawn {
            command: line.clone(),
            source,
        };

        if command.interactive {
            let status = cmd
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .await
                .map_err(spawn_error)?;
            if !status.success() {
                return Err(StepError::CommandFailed {
                    command: line,
                    status: status.to_string(),
                    output: String::new(),
                });
            }
            return Ok(());
        }

        let output = cmd
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(spawn_error)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let text = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            return Err(StepError::CommandFailed {
                command: line,
                status: output.status.to_string(),
                output: text,
            });
        }
        Ok(())
    }
}

/// Progress callbacks; every method defaults to doing nothing
pub trait Progress {
    fn step(&self, _label: &str) {}

    fn warn(&self, _label: &str, _message: &str) {}

    /// An interactive command is about to take over the terminal
    fn suspend(&self) {}

    fn resume(&self, _label: &str) {}
}

impl Progress for () {}

/// A recoverable failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub step: String,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.step, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n{}", hint)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Report {
    /// Forward steps that succeeded
    pub completed: usize,
    pub warnings: Vec<Warning>,
    pub downgrade: Option<DowngradeReport>,
}

/// Run every step of `plan`, then its reconciliation phase
pub async fn execute<R, P>(plan: &Plan, runner: &R, progress: &P) -> Result<Report, ExecutionError>
where
    R: CommandRunner,
    P: Progress + ?Sized,
{
    let mut report = Report::default();

    for step in &plan.steps {
        progress.step(&step.label);
        tracing::debug!(step = %step.label, "starting step");

        let result = match &step.action {
            Action::File(action) => apply_file_action(&plan.root, action).await,
            Action::Command(CommandAction::RunExternal(command)) => {
                if command.interactive {
                    progress.suspend();
                    let result = runner.run(command).await;
                    progress.resume(&step.label);
                    result
                } else {
                    runner.run(command).await
                }
            }
        };

        match (result, &step.on_failure) {
            (Ok(()), _) => report.completed += 1,
            (Err(source), OnFailure::Abort) => {
                tracing::error!(step = %step.label, error = %source, "step failed");
                return Err(ExecutionError {
                    step: step.label.clone(),
                    source,
                });
            }
            (Err(source), OnFailure::Warn(hint)) => {
                tracing::warn!(step = %step.label, error = %source, "recoverable step failed");
                let message = source.to_string();
                progress.warn(&step.label, &message);
                report.warnings.push(Warning {
                    step: step.label.clone(),
                    message,
                    hint: Some(hint.clone()),
                });
            }
        }
    }

    if let Some(phase) = plan.reconciliation {
        match phase {
            ReconciliationPhase::DowngradeToJavaScript => {
                let label = "Converting to JavaScript";
                progress.step(label);
                // file IO and parsing stay off the async workers
                let root = plan.root.clone();
                let downgrade = match tokio::task::spawn_blocking(move || {
                    downgrade::downgrade_project(&root)
                })
                .await
                {
                    Ok(downgrade) => downgrade,
                    Err(e) => {
                        let message = format!("conversion task failed: {}", e);
                        progress.warn(label, &message);
                        report.warnings.push(Warning {
                            step: label.to_string(),
                            message,
                            hint: None,
                        });
                        return Ok(report);
                    }
                };
                for failure in &downgrade.failures {
                    let message = failure.to_string();
                    progress.warn(label, &message);
                    report.warnings.push(Warning {
                        step: label.to_string(),
                        message,
                        hint: None,
                    });
                }
                report.downgrade = Some(downgrade);
            }
        }
    }

    Ok(report)
}

async fn apply_file_action(root: &Path, action: &FileAction) -> Result<(), StepError> {
    match action {
        FileAction::CreateDir(dir) => {
            let path = root.join(dir);
            fs::create_dir_all(&path)
                .await
                .map_err(|e| StepError::fs(&path, e))
        }
        FileAction::WriteFile { path, content } => {
            let path = root.join(path);
            fs::write(&path, content)
                .await
                .map_err(|e| StepError::fs(&path, e))
        }
        FileAction::RenameFile { from, to } => {
            let from = root.join(from);
            fs::rename(&from, root.join(to))
                .await
                .map_err(|e| StepError::fs(&from, e))
        }
        FileAction::DeleteFile(path) => {
            let path = root.join(path);
            match fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StepError::fs(&path, e)),
            }
        }
        FileAction::CopyTemplate { key, dest } => templates::copy_template(root, key, dest).await,
        FileAction::PatchTsConfig(path) => tsconfig::patch_alias(&root.join(path))
            .await
            .map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{CommandPurpose, PlanBuilder};
    use std::cell::RefCell;
    use std::sync::Mutex;

    /// Records every command and fails the ones whose program is listed
    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<ExternalCommand>>,
        failing: Vec<&'static str>,
    }

    impl RecordingRunner {
        fn failing(programs: &[&'static str]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                failing: programs.to_vec(),
            }
        }

        fn lines(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|c| c.display_line())
                .collect()
        }
    }

    impl CommandRunner for RecordingRunner {
        async fn run(&self, command: &ExternalCommand) -> Result<(), StepError> {
            self.calls.lock().unwrap().push(command.clone());
            if self.failing.contains(&command.program.as_str()) {
                return Err(StepError::CommandFailed {
                    command: command.display_line(),
                    status: "exit status: 1".to_string(),
                    output: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: RefCell<Vec<String>>,
    }

    impl Progress for RecordingProgress {
        fn step(&self, label: &str) {
            self.events.borrow_mut().push(format!("step {}", label));
        }

        fn warn(&self, label: &str, _message: &str) {
            self.events.borrow_mut().push(format!("warn {}", label));
        }

        fn suspend(&self) {
            self.events.borrow_mut().push("suspend".to_string());
        }

        fn resume(&self, label: &str) {
            self.events.borrow_mut().push(format!("resume {}", label));
        }
    }

    #[tokio::test]
    async fn test_files_are_written_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("my-awesome-app");
        let mut builder = PlanBuilder::new(&root);
        builder
            .create_dir("")
            .write(".env", "PORT=3000\n".to_string())
            .create_dir("src/routes")
            .write("src/routes/index.js", "export default 1;\n".to_string());
        let plan = builder.build();

        let report = execute(&plan, &RecordingRunner::default(), &()).await.unwrap();
        assert_eq!(report.completed, 4);
        assert!(report.warnings.is_empty());
        assert_eq!(
            std::fs::read_to_string(root.join(".env")).unwrap(),
            "PORT=3000\n"
        );
        assert!(root.join("src/routes/index.js").exists());
    }

    #[tokio::test]
    async fn test_commands_reach_runner_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("app");
        let mut builder = PlanBuilder::new(&root);
        builder
            .scaffold(
                "Scaffolding",
                "npx",
                vec!["--yes".to_string(), "init".to_string(), "app".to_string()],
            )
            .command(
                "Installing dependencies",
                "pnpm",
                vec!["install".to_string()],
                CommandPurpose::Install,
            );
        let plan = builder.build();

        let runner = RecordingRunner::default();
        execute(&plan, &runner, &()).await.unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls[0].program, "npx");
        assert_eq!(calls[0].args, vec!["--yes", "init", "app"]);
        assert_eq!(calls[0].cwd, dir.path());
        assert_eq!(calls[1].display_line(), "pnpm install");
        assert_eq!(calls[1].cwd, root);
    }

    #[tokio::test]
    async fn test_abort_step_stops_the_plan() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("app");
        let mut builder = PlanBuilder::new(&root);
        builder
            .create_dir("")
            .command(
                "Installing dependencies",
                "npm",
                vec!["install".to_string()],
                CommandPurpose::Install,
            )
            .write("after.txt", "never\n".to_string());
        let plan = builder.build();

        let runner = RecordingRunner::failing(&["npm"]);
        let err = execute(&plan, &runner, &()).await.unwrap_err();
        assert_eq!(err.step, "Installing dependencies");
        assert!(err.to_string().contains("boom"));
        assert!(root.exists());
        assert!(!root.join("after.txt").exists());
    }

    #[tokio::test]
    async fn test_warn_step_is_reported_and_execution_continues() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("app");
        let mut builder = PlanBuilder::new(&root);
        builder.create_dir("").external(
            "Initializing Shadcn UI",
            ExternalCommand {
                program: "npx".to_string(),
                args: vec!["shadcn@latest".to_string(), "init".to_string(), "-d".to_string()],
                cwd: root.clone(),
                purpose: CommandPurpose::Initialize,
                interactive: true,
            },
            OnFailure::Warn("run it manually".to_string()),
        );
        builder.write("after.txt", "still here\n".to_string());
        let plan = builder.build();

        let runner = RecordingRunner::failing(&["npx"]);
        let progress = RecordingProgress::default();
        let report = execute(&plan, &runner, &progress).await.unwrap();

        assert_eq!(report.completed, 2);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].step, "Initializing Shadcn UI");
        assert_eq!(report.warnings[0].hint.as_deref(), Some("run it manually"));
        assert!(root.join("after.txt").exists());
        assert_eq!(runner.lines(), vec!["npx shadcn@latest init -d"]);

        let events = progress.events.borrow();
        assert_eq!(
            events[1..5],
            [
                "step Initializing Shadcn UI".to_string(),
                "suspend".to_string(),
                "resume Initializing Shadcn UI".to_string(),
                "warn Initializing Shadcn UI".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_rename_source_is_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("app");
        let mut builder = PlanBuilder::new(&root);
        builder.create_dir("").file_or_warn(
            "Renaming App.tsx to App.jsx",
            FileAction::RenameFile {
                from: "App.tsx".to_string(),
                to: "App.jsx".to_string(),
            },
            "rename manually",
        );
        let report = execute(&builder.build(), &RecordingRunner::default(), &())
            .await
            .unwrap();
        assert_eq!(report.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_file_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let mut builder = PlanBuilder::new(dir.path());
        builder.file("Removing stale file", FileAction::DeleteFile("gone.txt".to_string()));
        let report = execute(&builder.build(), &RecordingRunner::default(), &())
            .await
            .unwrap();
        assert_eq!(report.completed, 1);
    }

    #[tokio::test]
    async fn test_copy_template_and_patch_tsconfig() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("tsconfig.json"), "{ \"files\": [] }").unwrap();

        let mut builder = PlanBuilder::new(root);
        builder
            .create_dir("src/pages")
            .copy_template(
                "react-native/modular/pages/HomeScreen.tsx".to_string(),
                "src/pages/HomeScreen.tsx".to_string(),
            )
            .file_or_warn(
                "Adding path alias to tsconfig.json",
                FileAction::PatchTsConfig("tsconfig.json".to_string()),
                "patch manually",
            )
            .file_or_warn(
                "Adding path alias to tsconfig.app.json",
                FileAction::PatchTsConfig("tsconfig.app.json".to_string()),
                "patch manually",
            );
        let report = execute(&builder.build(), &RecordingRunner::default(), &())
            .await
            .unwrap();

        assert!(report.warnings.is_empty());
        assert!(std::fs::read_to_string(root.join("src/pages/HomeScreen.tsx"))
            .unwrap()
            .contains("Welcome Home"));
        assert!(std::fs::read_to_string(root.join("tsconfig.json"))
            .unwrap()
            .contains("\"@/*\""));
        assert!(!root.join("tsconfig.app.json").exists());
    }

    #[tokio::test]
    async fn test_reconciliation_runs_after_forward_steps() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let mut builder = PlanBuilder::new(root);
        builder
            .create_dir("src")
            .write(
                "src/App.tsx",
                "export default function App() {\n  return <div />;\n}\n".to_string(),
            )
            .reconcile(ReconciliationPhase::DowngradeToJavaScript);

        let report = execute(&builder.build(), &RecordingRunner::default(), &())
            .await
            .unwrap();

        let downgrade = report.downgrade.unwrap();
        assert!(downgrade.failures.is_empty());
        assert!(root.join("src/App.jsx").exists());
        assert!(!root.join("src/App.tsx").exists());
        assert!(root.join("jsconfig.json").exists());
    }

    #[tokio::test]
    async fn test_process_runner_surfaces_failure() {
        let dir = tempfile::tempdir().unwrap();
        let command = ExternalCommand {
            program: "setitup-definitely-not-installed".to_string(),
            args: vec![],
            cwd: dir.path().to_path_buf(),
            purpose: CommandPurpose::Install,
            interactive: false,
        };
        let err = ProcessRunner.run(&command).await.unwrap_err();
        assert!(matches!(err, StepError::Spawn { .. }));
    }
}
