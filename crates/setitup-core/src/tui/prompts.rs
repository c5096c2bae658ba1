//! Charm-style CLI prompts using cliclack

use super::progress::SpinnerProgress;
use crate::config::{Answers, DEFAULT_PROJECT_NAME};
use crate::error::PROJECT_NAME_RULE;
use crate::execute::{self, ProcessRunner, Report};
use crate::generators::{self, ProjectGenerator};
use crate::options::{
    Database, Language, NavigationLayout, PackageManager, ProjectName, ProjectOptions,
    ProjectType, TargetPlatform,
};
use crate::runtime::{self, ToolStatus};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Answers given as flags; they override the preset
    pub answers: Answers,

    /// YAML preset with default answers
    pub preset: Option<PathBuf>,

    /// Directory the project folder is created in
    pub directory: Option<PathBuf>,

    /// Skip the Node.js / Git / platform tool check
    pub skip_prerequisites: bool,

    /// Take defaults for unanswered questions instead of prompting
    pub yes: bool,

    /// Print the plan and stop
    pub dry_run: bool,
}

/// Run the wizard end to end
pub async fn run(args: CreateArgs) -> Result<()> {
    cliclack::intro("SET - IT - UP")?;
    cliclack::log::remark("Ready to launch your next idea? Let's configure your new project.")?;

    // Step 1: Collect answers (preset < flags < prompts)
    let preset = match &args.preset {
        Some(path) => {
            cliclack::log::info(format!("Using preset {}", path.display()))?;
            Answers::from_preset(path)?
        }
        None => Answers::default(),
    };
    let mut answers = preset.merge(args.answers.clone());
    if !args.yes {
        ask_missing(&mut answers)?;
    }
    let options = answers.resolve()?;
    summarize(&options)?;

    // Step 2: Pick the project root
    let root = select_root(&args, &options.name)?;
    let generator = generators::generator_for(&options);
    let plan = generator.plan(&root);

    if args.dry_run {
        cliclack::log::info(format!("Plan for {}", root.display()))?;
        println!("{}", plan);
        cliclack::outro("Dry run: nothing was written.")?;
        return Ok(());
    }

    // Step 3: Check prerequisites before touching the disk
    if args.skip_prerequisites {
        cliclack::log::info("Skipping prerequisite check")?;
    } else {
        check_prerequisites(generator.as_ref(), &args)?;
    }

    // Step 4: Execute
    let progress = SpinnerProgress::new();
    let report = match execute::execute(&plan, &ProcessRunner, &progress).await {
        Ok(report) => {
            progress.finish();
            report
        }
        Err(e) => {
            progress.fail();
            cliclack::log::error(e.to_string())?;
            cliclack::log::info(format!(
                "The partially created project was left in {}",
                root.display()
            ))?;
            anyhow::bail!("Setup failed.");
        }
    };

    // Step 5: Report
    print_warnings(&report)?;
    print_next_steps(generator.as_ref(), &root)?;

    Ok(())
}

fn ask_missing(answers: &mut Answers) -> Result<()> {
    if answers.project_type.is_none() {
        answers.project_type = Some(
            cliclack::select("What do you want to build today?")
                .item(ProjectType::React, "React", "Vite + Tailwind CSS")
                .item(ProjectType::ReactNative, "React Native", "Community CLI")
                .item(ProjectType::Express, "Express", "REST API")
                .interact()?,
        );
    }

    if answers.name.is_none() {
        let name: String = cliclack::input("Enter your project name")
            .placeholder(DEFAULT_PROJECT_NAME)
            .default_input(DEFAULT_PROJECT_NAME)
            .validate(|input: &String| {
                ProjectName::parse(input)
                    .map(|_| ())
                    .map_err(|_| PROJECT_NAME_RULE)
            })
            .interact()?;
        answers.name = Some(name);
    }

    if answers.package_manager.is_none() {
        answers.package_manager = Some(
            cliclack::select("Select your preferred package manager")
                .item(PackageManager::Npm, "npm", "")
                .item(PackageManager::Yarn, "yarn", "")
                .item(PackageManager::Pnpm, "pnpm", "")
                .interact()?,
        );
    }

    if answers.language.is_none() {
        answers.language = Some(
            cliclack::select("Which language do you want to use?")
                .item(Language::TypeScript, "TypeScript", "")
                .item(Language::JavaScript, "JavaScript", "")
                .interact()?,
        );
    }

    match answers.project_type.unwrap_or(ProjectType::React) {
        ProjectType::React => ask_react(answers)?,
        ProjectType::ReactNative => ask_react_native(answers)?,
        ProjectType::Express => ask_express(answers)?,
    }

    Ok(())
}

fn confirm_missing(slot: &mut Option<bool>, prompt: &str) -> Result<()> {
    if slot.is_none() {
        *slot = Some(cliclack::confirm(prompt).initial_value(true).interact()?);
    }
    Ok(())
}

fn ask_react(answers: &mut Answers) -> Result<()> {
    confirm_missing(&mut answers.shadcn, "Would you like to add Shadcn UI?")?;
    if answers.shadcn == Some(true) && answers.language == Some(Language::JavaScript) {
        cliclack::log::info(
            "Shadcn UI ships a TypeScript setup. The project is scaffolded in TypeScript and converted to JavaScript at the end.",
        )?;
    }
    confirm_missing(&mut answers.router, "Would you like to add React Router?")?;
    confirm_missing(&mut answers.context, "Would you like to add a Context API setup?")?;
    Ok(())
}

fn ask_react_native(answers: &mut Answers) -> Result<()> {
    confirm_missing(
        &mut answers.navigation,
        "Would you like to add React Navigation setup?",
    )?;

    if answers.platform.is_none() {
        answers.platform = Some(
            cliclack::select("Which platforms are you targeting?")
                .item(TargetPlatform::Both, "Android & iOS", "")
                .item(TargetPlatform::Android, "Android", "")
                .item(TargetPlatform::Ios, "iOS", "requires macOS")
                .interact()?,
        );
    }

    if answers.navigation == Some(true) && answers.navigation_layout.is_none() {
        answers.navigation_layout = Some(
            cliclack::select("How should the navigation screens be organized?")
                .item(
                    NavigationLayout::Modular,
                    "Modular",
                    "App.tsx plus src/pages/*",
                )
                .item(
                    NavigationLayout::SingleFile,
                    "Single file",
                    "everything in App",
                )
                .interact()?,
        );
    }
    Ok(())
}

fn ask_express(answers: &mut Answers) -> Result<()> {
    if answers.database.is_none() {
        answers.database = Some(
            cliclack::select("Which database would you like to use?")
                .item(Database::None, Database::None.display_name(), "")
                .item(Database::Mongoose, Database::Mongoose.display_name(), "")
                .item(Database::Prisma, Database::Prisma.display_name(), "")
                .interact()?,
        );
    }
    Ok(())
}

fn summarize(options: &ProjectOptions) -> Result<()> {
    let language = options.details.language();
    let mut summary = format!(
        "{} project '{}' ({}, {})",
        options.project_type(),
        options.name,
        language,
        options.package_manager
    );
    if options.details.effective_typescript() && language == Language::JavaScript {
        summary.push_str(", scaffolded as TypeScript");
    }
    cliclack::log::success(summary)?;
    Ok(())
}

fn select_root(args: &CreateArgs, name: &ProjectName) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().context("Failed to read the current directory")?;

    let base = match &args.directory {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => current_dir.join(dir),
        None => current_dir,
    };
    if !base.is_dir() {
        anyhow::bail!("Directory does not exist: {}", base.display());
    }

    let root = base.join(name.as_str());

    // Warn if directory exists and has files
    if root.is_dir() {
        let count = std::fs::read_dir(&root)
            .with_context(|| format!("Failed to read {}", root.display()))?
            .count();
        if count > 0 {
            cliclack::log::warning(format!(
                "{} already has {} items",
                root.display(),
                count
            ))?;

            let confirm = if args.yes || args.dry_run {
                true
            } else {
                cliclack::confirm("Continue anyway?")
                    .initial_value(false)
                    .interact()?
            };

            if !confirm {
                anyhow::bail!("Setup cancelled.");
            }
        }
    }

    Ok(root)
}

fn check_prerequisites(generator: &dyn ProjectGenerator, args: &CreateArgs) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Checking prerequisites...");

    let statuses = runtime::probe_all(&generator.prerequisites());
    let unsatisfied: Vec<ToolStatus> = statuses
        .iter()
        .filter(|status| !status.is_satisfied())
        .cloned()
        .collect();

    match runtime::evaluate(statuses) {
        Ok(statuses) => {
            let found: Vec<String> = statuses
                .iter()
                .map(|s| {
                    format!(
                        "{} ({})",
                        s.requirement.display_name,
                        s.version.as_deref().unwrap_or("unknown")
                    )
                })
                .collect();
            spinner.stop(format!("Found: {}", found.join(", ")));
            Ok(())
        }
        Err(e) => {
            spinner.error("Missing prerequisites");
            cliclack::log::error(e.to_string())?;

            if !args.yes {
                let open_docs: bool = cliclack::confirm("Open the installation pages?")
                    .initial_value(false)
                    .interact()?;
                if open_docs {
                    for status in &unsatisfied {
                        open::that(status.requirement.docs_url).with_context(|| {
                            format!("Failed to open {}", status.requirement.docs_url)
                        })?;
                    }
                }
            }

            anyhow::bail!("Please install the missing tools and try again.");
        }
    }
}

fn print_warnings(report: &Report) -> Result<()> {
    for warning in &report.warnings {
        cliclack::log::warning(warning.to_string())?;
    }
    if let Some(downgrade) = &report.downgrade {
        cliclack::log::info(format!(
            "Converted {} files to JavaScript",
            downgrade.converted.len()
        ))?;
    }
    Ok(())
}

fn print_next_steps(generator: &dyn ProjectGenerator, root: &Path) -> Result<()> {
    let steps = generator.next_steps(root);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
