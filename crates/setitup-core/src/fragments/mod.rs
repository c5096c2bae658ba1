//! Source-text fragments for generated projects
//!
//! Every provider is a pure function of [`FragmentOptions`]: the same options
//! always produce byte-identical text, and nothing here touches the disk.
//! TypeScript annotations are emitted only when `typescript` is set, which is
//! the *effective* flag (Shadcn forces it on for React).

pub mod express;
pub mod react;

use crate::options::{Database, ExpressOptions, ProjectName, ReactOptions};

/// Inputs shared by all fragment providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentOptions {
    pub project_name: String,
    pub typescript: bool,
    pub router: bool,
    pub context: bool,
    pub shadcn: bool,
    pub database: Database,
}

impl FragmentOptions {
    pub fn for_react(name: &ProjectName, options: &ReactOptions) -> Self {
        Self {
            project_name: name.to_string(),
            typescript: options.effective_typescript(),
            router: options.add_router,
            context: options.add_context,
            shadcn: options.add_shadcn,
            database: Database::None,
        }
    }

    pub fn for_express(name: &ProjectName, options: &ExpressOptions) -> Self {
        Self {
            project_name: name.to_string(),
            typescript: options.language == crate::options::Language::TypeScript,
            router: false,
            context: false,
            shadcn: false,
            database: options.database,
        }
    }

    /// Extension for plain modules (`ts` / `js`)
    pub fn script_ext(&self) -> &'static str {
        if self.typescript {
            "ts"
        } else {
            "js"
        }
    }

    /// Extension for modules containing JSX (`tsx` / `jsx`)
    pub fn component_ext(&self) -> &'static str {
        if self.typescript {
            "tsx"
        } else {
            "jsx"
        }
    }
}

/// Every fragment the generators know how to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    PackageManifest,
    CompilerConfig,
    EntryPoint,
    RouterIndex,
    Controller,
    DatabaseConfig,
    DatabaseClient,
    PrismaSchema,
    EnvFile,
    GitIgnore,
    Navbar,
    Layout,
    Home,
    About,
    App,
    ContextProvider,
    BuildToolConfig,
    Stylesheet,
    AliasConfig,
}

/// Produce the text for `kind`
pub fn fragment(kind: FragmentKind, options: &FragmentOptions) -> String {
    match kind {
        FragmentKind::PackageManifest => express::package_manifest(options),
        FragmentKind::CompilerConfig => express::compiler_config(),
        FragmentKind::EntryPoint => express::entry_point(options),
        FragmentKind::RouterIndex => express::router_index(),
        FragmentKind::Controller => express::controller(options),
        FragmentKind::DatabaseConfig => express::database_config(options),
        FragmentKind::DatabaseClient => express::database_client(),
        FragmentKind::PrismaSchema => express::prisma_schema(),
        FragmentKind::EnvFile => express::env_file(options),
        FragmentKind::GitIgnore => express::gitignore(),
        FragmentKind::Navbar => react::navbar(options),
        FragmentKind::Layout => react::layout(options),
        FragmentKind::Home => react::home(options),
        FragmentKind::About => react::about(),
        FragmentKind::App => react::app(options),
        FragmentKind::ContextProvider => react::app_context(options),
        FragmentKind::BuildToolConfig => react::vite_config(),
        FragmentKind::Stylesheet => react::stylesheet(),
        FragmentKind::AliasConfig => react::alias_config(),
    }
}
