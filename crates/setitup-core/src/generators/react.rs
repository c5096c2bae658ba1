//! React (Vite) planner

use super::{cd_line, node_toolchain, ProjectGenerator};
use crate::fragments::{fragment, FragmentKind, FragmentOptions};
use crate::options::{PackageManager, ProjectName, ProjectType, ReactOptions};
use crate::plan::{
    CommandPurpose, ExternalCommand, FileAction, OnFailure, Plan, PlanBuilder, ReconciliationPhase,
};
use crate::runtime::ToolRequirement;
use std::path::Path;

const TAILWIND_PACKAGES: &[&str] = &["tailwindcss", "@tailwindcss/vite"];
const SHADCN: &str = "shadcn@latest";

pub struct ReactGenerator {
    name: ProjectName,
    package_manager: PackageManager,
    options: ReactOptions,
}

impl ReactGenerator {
    pub fn new(name: ProjectName, package_manager: PackageManager, options: ReactOptions) -> Self {
        Self {
            name,
            package_manager,
            options,
        }
    }

    fn vite_template(&self) -> &'static str {
        if self.options.effective_typescript() {
            "react-ts"
        } else {
            "react"
        }
    }

    fn shadcn_command(root: &Path, args: &[&str]) -> ExternalCommand {
        let mut full = vec![SHADCN.to_string()];
        full.extend(args.iter().map(|a| a.to_string()));
        ExternalCommand {
            program: "npx".to_string(),
            args: full,
            cwd: root.to_path_buf(),
            purpose: CommandPurpose::Initialize,
            interactive: true,
        }
    }
}

impl ProjectGenerator for ReactGenerator {
    fn project_type(&self) -> ProjectType {
        ProjectType::React
    }

    fn prerequisites(&self) -> Vec<ToolRequirement> {
        node_toolchain(self.package_manager)
    }

    fn plan(&self, root: &Path) -> Plan {
        let f = FragmentOptions::for_react(&self.name, &self.options);
        let script = f.script_ext();
        let component = f.component_ext();
        let pm = self.package_manager;
        let mut plan = PlanBuilder::new(root);

        // Vite always goes through npm; the chosen manager takes over afterwards
        plan.scaffold(
            "Scaffolding React project with Vite",
            "npm",
            vec![
                "create".to_string(),
                "vite@latest".to_string(),
                self.name.to_string(),
                "--".to_string(),
                "--template".to_string(),
                self.vite_template().to_string(),
            ],
        )
        .command(
            "Installing dependencies",
            pm.program(),
            pm.install_args(),
            CommandPurpose::Install,
        );

        if f.typescript {
            plan.command(
                "Installing Node.js type definitions",
                pm.program(),
                pm.add_args(&["@types/node"], true),
                CommandPurpose::Install,
            );
            for config in ["tsconfig.json", "tsconfig.app.json"] {
                plan.file_or_warn(
                    format!("Adding path alias to {}", config),
                    FileAction::PatchTsConfig(config.to_string()),
                    format!(
                        "Add \"baseUrl\": \".\" and \"paths\": {{ \"@/*\": [\"./src/*\"] }} to {} manually.",
                        config
                    ),
                );
            }
        }

        plan.command(
            "Setting up Tailwind CSS",
            pm.program(),
            pm.add_args(TAILWIND_PACKAGES, false),
            CommandPurpose::Install,
        )
        .create_dir("src")
        .write(
            format!("vite.config.{}", script),
            fragment(FragmentKind::BuildToolConfig, &f),
        )
        .write("src/index.css", fragment(FragmentKind::Stylesheet, &f));

        if self.options.add_shadcn {
            let hint = "You might need to run \"npx shadcn@latest init\" manually.";
            plan.external(
                "Initializing Shadcn UI",
                Self::shadcn_command(root, &["init", "-d"]),
                OnFailure::Warn(hint.to_string()),
            )
            .external(
                "Adding Button component",
                Self::shadcn_command(root, &["add", "button", "-y"]),
                OnFailure::Warn("Run \"npx shadcn@latest add button\" manually.".to_string()),
            );
        }

        if self.options.add_router {
            plan.command(
                "Installing React Router DOM",
                pm.program(),
                pm.add_args(&["react-router-dom"], false),
                CommandPurpose::Install,
            );
        }

        if self.options.add_context {
            plan.create_dir("src/context").write(
                format!("src/context/AppContext.{}", component),
                fragment(FragmentKind::ContextProvider, &f),
            );
        }

        plan.create_dir("src/components")
            .create_dir("src/pages")
            .write(
                format!("src/components/Navbar.{}", component),
                fragment(FragmentKind::Navbar, &f),
            )
            .write(
                format!("src/components/Layout.{}", component),
                fragment(FragmentKind::Layout, &f),
            )
            .write(
                format!("src/pages/Home.{}", component),
                fragment(FragmentKind::Home, &f),
            )
            .write(
                format!("src/pages/About.{}", component),
                fragment(FragmentKind::About, &f),
            )
            .write(
                format!("src/App.{}", component),
                fragment(FragmentKind::App, &f),
            );

        if self.options.needs_downgrade() {
            plan.reconcile(ReconciliationPhase::DowngradeToJavaScript);
        }

        plan.build()
    }

    fn next_steps(&self, root: &Path) -> Vec<String> {
        vec![cd_line(root), self.package_manager.run_script("dev")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Language;
    use crate::plan::{Action, CommandAction};

    fn generator(language: Language, shadcn: bool, router: bool, context: bool) -> ReactGenerator {
        ReactGenerator::new(
            ProjectName::parse("my-awesome-app").unwrap(),
            PackageManager::Npm,
            ReactOptions {
                language,
                add_shadcn: shadcn,
                add_router: router,
                add_context: context,
            },
        )
    }

    #[test]
    fn test_shadcn_with_javascript_scaffolds_typescript_then_downgrades() {
        let plan = generator(Language::JavaScript, true, true, true)
            .plan(Path::new("/work/my-awesome-app"));

        let scaffold = plan.commands().next().unwrap();
        assert_eq!(scaffold.args.last().unwrap(), "react-ts");

        let written = plan.written_paths();
        for expected in [
            "vite.config.ts",
            "src/context/AppContext.tsx",
            "src/components/Navbar.tsx",
            "src/components/Layout.tsx",
            "src/pages/Home.tsx",
            "src/pages/About.tsx",
            "src/App.tsx",
        ] {
            assert!(written.contains(&expected), "missing {}", expected);
        }
        assert_eq!(
            plan.reconciliation,
            Some(ReconciliationPhase::DowngradeToJavaScript)
        );
    }

    #[test]
    fn test_no_downgrade_without_shadcn() {
        for language in [Language::JavaScript, Language::TypeScript] {
            let plan = generator(language, false, true, true).plan(Path::new("/work/app"));
            assert!(plan.reconciliation.is_none());
        }
        let plan = generator(Language::TypeScript, true, false, false).plan(Path::new("/work/app"));
        assert!(plan.reconciliation.is_none());
    }

    #[test]
    fn test_plain_javascript_uses_jsx_and_skips_typescript_setup() {
        let plan = generator(Language::JavaScript, false, false, false)
            .plan(Path::new("/work/my-awesome-app"));
        let written = plan.written_paths();
        assert!(written.contains(&"vite.config.js"));
        assert!(written.contains(&"src/App.jsx"));
        assert!(!plan
            .steps
            .iter()
            .any(|s| matches!(s.action, Action::File(FileAction::PatchTsConfig(_)))));

        let commands: Vec<String> = plan.commands().map(|c| c.display_line()).collect();
        assert_eq!(
            commands,
            vec![
                "npm create vite@latest my-awesome-app -- --template react",
                "npm install",
                "npm install tailwindcss @tailwindcss/vite",
            ]
        );
    }

    #[test]
    fn test_scaffold_runs_in_parent_directory() {
        let plan = generator(Language::TypeScript, true, true, false)
            .plan(Path::new("/work/my-awesome-app"));
        let mut commands = plan.commands();
        assert_eq!(commands.next().unwrap().cwd, Path::new("/work"));
        assert!(commands.all(|c| c.cwd == Path::new("/work/my-awesome-app")));
    }

    #[test]
    fn test_shadcn_steps_are_recoverable_and_interactive() {
        let plan = generator(Language::TypeScript, true, false, false)
            .plan(Path::new("/work/my-awesome-app"));
        let shadcn: Vec<_> = plan
            .steps
            .iter()
            .filter(|s| match &s.action {
                Action::Command(CommandAction::RunExternal(c)) => c.args[0] == SHADCN,
                _ => false,
            })
            .collect();
        assert_eq!(shadcn.len(), 2);
        for step in shadcn {
            assert!(step.is_recoverable());
            let Action::Command(CommandAction::RunExternal(c)) = &step.action else {
                unreachable!()
            };
            assert!(c.interactive);
        }
    }

    #[test]
    fn test_typescript_patches_both_tsconfigs_after_types_install() {
        let plan = generator(Language::TypeScript, false, false, false)
            .plan(Path::new("/work/my-awesome-app"));
        let types = plan
            .position(|s| s.label == "Installing Node.js type definitions")
            .unwrap();
        let patches: Vec<usize> = plan
            .steps
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s.action, Action::File(FileAction::PatchTsConfig(_))))
            .map(|(i, s)| {
                assert!(s.is_recoverable());
                i
            })
            .collect();
        assert_eq!(patches.len(), 2);
        assert!(patches.iter().all(|&i| i > types));
    }

    #[test]
    fn test_router_is_installed_with_chosen_manager() {
        let generator = ReactGenerator::new(
            ProjectName::parse("my-awesome-app").unwrap(),
            PackageManager::Pnpm,
            ReactOptions {
                language: Language::JavaScript,
                add_shadcn: false,
                add_router: true,
                add_context: false,
            },
        );
        let plan = generator.plan(Path::new("/work/my-awesome-app"));
        let commands: Vec<String> = plan.commands().map(|c| c.display_line()).collect();
        assert!(commands.contains(&"pnpm add react-router-dom".to_string()));
        assert_eq!(commands[0], "npm create vite@latest my-awesome-app -- --template react");
    }
}
