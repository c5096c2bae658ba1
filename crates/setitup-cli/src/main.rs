//! setitup CLI - Interactive generator for React, React Native and Express projects

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use setitup_core::config::Answers;
use setitup_core::options::{
    Database, Language, NavigationLayout, PackageManager, ProjectType, TargetPlatform,
};
use setitup_core::tui::CreateArgs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the diagnostics filter
const LOG_ENV: &str = "SETITUP_LOG";

#[derive(Parser, Debug)]
#[command(name = "setitup")]
#[command(about = "A powerful CLI to forge new projects")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub create: CliCreateArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project (the default)
    Create(CliCreateArgs),
    /// Print the steps a create run would take, without running them
    Plan(CliCreateArgs),
}

#[derive(ClapArgs, Debug, Default, Clone)]
pub struct CliCreateArgs {
    /// Project type
    #[arg(long = "type", value_enum)]
    pub project_type: Option<ProjectType>,

    /// Project name (lowercase letters, numbers, underscores and hyphens)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Package manager used inside the project
    #[arg(long, value_enum)]
    pub package_manager: Option<PackageManager>,

    /// Source language
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// Add Shadcn UI (React); `--shadcn=false` turns a preset's choice off
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub shadcn: Option<bool>,

    /// Add React Router (React); `--router=false` turns a preset's choice off
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub router: Option<bool>,

    /// Add a Context API provider (React); `--context=false` turns a preset's choice off
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub context: Option<bool>,

    /// Add React Navigation (React Native); `--navigation=false` turns a preset's choice off
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub navigation: Option<bool>,

    /// Target platform (React Native)
    #[arg(long, value_enum)]
    pub platform: Option<TargetPlatform>,

    /// How navigation screens are laid out (React Native)
    #[arg(long, value_enum)]
    pub navigation_layout: Option<NavigationLayout>,

    /// Database integration (Express)
    #[arg(long, value_enum)]
    pub database: Option<Database>,

    /// YAML preset with answers; flags override it
    #[arg(long)]
    pub preset: Option<PathBuf>,

    /// Directory the project folder is created in
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Skip the prerequisite tool check
    #[arg(long)]
    pub skip_prerequisites: bool,

    /// Take defaults for unanswered questions (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    /// Print the plan and stop
    #[arg(long)]
    pub dry_run: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        // An absent switch means "not answered", so the preset or a prompt decides
        CreateArgs {
            answers: Answers {
                project_type: args.project_type,
                name: args.name,
                package_manager: args.package_manager,
                language: args.language,
                shadcn: args.shadcn,
                router: args.router,
                context: args.context,
                navigation: args.navigation,
                platform: args.platform,
                navigation_layout: args.navigation_layout,
                database: args.database,
            },
            preset: args.preset,
            directory: args.directory,
            skip_prerequisites: args.skip_prerequisites,
            yes: args.yes,
            dry_run: args.dry_run,
        }
    }
}

impl Args {
    fn into_create_args(self) -> CreateArgs {
        match self.command {
            Some(Command::Create(args)) => args.into(),
            Some(Command::Plan(args)) => CreateArgs {
                dry_run: true,
                ..args.into()
            },
            // No subcommand provided, default to create behavior
            None => self.create.into(),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    init_tracing();

    let args = Args::parse();
    let result = setitup_core::run(args.into_create_args()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
