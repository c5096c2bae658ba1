//! React Native planner

use super::{cd_line, node_toolchain, ProjectGenerator};
use crate::options::{Language, PackageManager, ProjectName, ProjectType, ReactNativeOptions};
use crate::plan::{CommandPurpose, ExternalCommand, FileAction, OnFailure, Plan, PlanBuilder};
use crate::runtime::ToolRequirement;
use crate::templates;
use std::path::Path;

const POD_INSTALL_NOTE: &str =
    "# iOS: on a Mac, run \"pod install\" inside ios/ before building for iOS";

const NAVIGATION_PACKAGES: &[&str] = &[
    "@react-navigation/native",
    "react-native-screens",
    "react-native-safe-area-context",
    "@react-navigation/native-stack",
];

pub struct ReactNativeGenerator {
    name: ProjectName,
    package_manager: PackageManager,
    options: ReactNativeOptions,
    /// CocoaPods and Xcode only exist on macOS
    ios_toolchain: bool,
}

impl ReactNativeGenerator {
    pub fn new(
        name: ProjectName,
        package_manager: PackageManager,
        options: ReactNativeOptions,
    ) -> Self {
        Self {
            name,
            package_manager,
            options,
            ios_toolchain: cfg!(target_os = "macos"),
        }
    }

    /// Override host detection of the iOS toolchain
    pub fn ios_toolchain(mut self, available: bool) -> Self {
        self.ios_toolchain = available;
        self
    }

    fn installs_pods(&self) -> bool {
        self.options.target_platform.includes_ios() && self.ios_toolchain
    }

    fn typescript(&self) -> bool {
        self.options.language == Language::TypeScript
    }
}

impl ProjectGenerator for ReactNativeGenerator {
    fn project_type(&self) -> ProjectType {
        ProjectType::ReactNative
    }

    fn prerequisites(&self) -> Vec<ToolRequirement> {
        let mut tools = node_toolchain(self.package_manager);
        tools.insert(1, ToolRequirement::git());
        let platform = self.options.target_platform;
        if platform.includes_android() {
            tools.push(ToolRequirement::java());
        }
        if self.installs_pods() {
            tools.push(ToolRequirement::cocoapods());
        }
        tools
    }

    fn plan(&self, root: &Path) -> Plan {
        let pm = self.package_manager;
        let mut plan = PlanBuilder::new(root);

        plan.scaffold(
            "Initializing React Native project",
            "npx",
            vec![
                "--yes".to_string(),
                "@react-native-community/cli@latest".to_string(),
                "init".to_string(),
                self.name.to_string(),
                "--skip-install".to_string(),
            ],
        );

        if !self.typescript() {
            plan.file_or_warn(
                "Renaming App.tsx to App.jsx",
                FileAction::RenameFile {
                    from: "App.tsx".to_string(),
                    to: "App.jsx".to_string(),
                },
                "The template did not produce App.tsx; rename your entry component manually.",
            );
        }

        plan.command(
            "Installing dependencies",
            pm.program(),
            pm.install_args(),
            CommandPurpose::Install,
        );

        if self.options.add_navigation {
            plan.command(
                "Installing React Navigation",
                pm.program(),
                pm.add_args(NAVIGATION_PACKAGES, false),
                CommandPurpose::Install,
            )
            .create_dir("src")
            .create_dir("src/pages")
            .create_dir("src/components");

            for (key, dest) in
                templates::navigation_files(self.options.navigation_layout, self.typescript())
            {
                plan.copy_template(key, dest);
            }
        }

        if self.installs_pods() {
            let pods = ExternalCommand {
                program: "pod".to_string(),
                args: vec!["install".to_string()],
                cwd: root.join("ios"),
                purpose: CommandPurpose::Install,
                interactive: false,
            };
            plan.external(
                "Installing CocoaPods",
                pods,
                OnFailure::Warn("Run \"pod install\" inside the ios directory manually.".to_string()),
            );
        } else if self.options.target_platform.includes_ios() {
            tracing::warn!("skipping pod install: the iOS toolchain needs macOS");
        }

        plan.build()
    }

    fn next_steps(&self, root: &Path) -> Vec<String> {
        let mut steps = vec![cd_line(root)];
        let platform = self.options.target_platform;
        if platform.includes_android() {
            steps.push(self.package_manager.run_script("android"));
        }
        if platform.includes_ios() {
            if !self.ios_toolchain {
                steps.push(POD_INSTALL_NOTE.to_string());
            }
            steps.push(self.package_manager.run_script("ios"));
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{NavigationLayout, TargetPlatform};
    use crate::plan::{Action, CommandAction};

    fn generator(
        language: Language,
        add_navigation: bool,
        target_platform: TargetPlatform,
        navigation_layout: NavigationLayout,
    ) -> ReactNativeGenerator {
        ReactNativeGenerator::new(
            ProjectName::parse("my-awesome-app").unwrap(),
            PackageManager::Yarn,
            ReactNativeOptions {
                language,
                add_navigation,
                target_platform,
                navigation_layout,
            },
        )
        .ios_toolchain(true)
    }

    #[test]
    fn test_scaffold_command_and_cwd() {
        let plan = generator(
            Language::TypeScript,
            false,
            TargetPlatform::Android,
            NavigationLayout::Modular,
        )
        .plan(Path::new("/work/my-awesome-app"));

        let scaffold = plan.commands().next().unwrap();
        assert_eq!(scaffold.program, "npx");
        assert_eq!(
            scaffold.args,
            vec![
                "--yes",
                "@react-native-community/cli@latest",
                "init",
                "my-awesome-app",
                "--skip-install"
            ]
        );
        assert_eq!(scaffold.cwd, Path::new("/work"));
        assert_eq!(plan.commands().count(), 2);
    }

    #[test]
    fn test_javascript_renames_app_before_install() {
        let plan = generator(
            Language::JavaScript,
            false,
            TargetPlatform::Android,
            NavigationLayout::Modular,
        )
        .plan(Path::new("/work/my-awesome-app"));

        let rename = plan
            .position(|s| matches!(s.action, Action::File(FileAction::RenameFile { .. })))
            .unwrap();
        let install = plan.position(|s| s.label == "Installing dependencies").unwrap();
        assert!(rename < install);
        assert!(plan.steps[rename].is_recoverable());
    }

    #[test]
    fn test_modular_navigation_copies_screens() {
        let plan = generator(
            Language::JavaScript,
            true,
            TargetPlatform::Android,
            NavigationLayout::Modular,
        )
        .plan(Path::new("/work/my-awesome-app"));

        let copies: Vec<(&str, &str)> = plan
            .steps
            .iter()
            .filter_map(|s| match &s.action {
                Action::File(FileAction::CopyTemplate { key, dest }) => {
                    Some((key.as_str(), dest.as_str()))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            copies,
            vec![
                ("react-native/modular/App.jsx", "App.jsx"),
                ("react-native/modular/pages/HomeScreen.jsx", "src/pages/HomeScreen.jsx"),
                (
                    "react-native/modular/pages/DetailsScreen.jsx",
                    "src/pages/DetailsScreen.jsx"
                ),
            ]
        );

        let commands: Vec<String> = plan.commands().map(|c| c.display_line()).collect();
        assert_eq!(
            commands[2],
            "yarn add @react-navigation/native react-native-screens react-native-safe-area-context @react-navigation/native-stack"
        );
    }

    #[test]
    fn test_single_file_navigation_copies_one_app() {
        let plan = generator(
            Language::TypeScript,
            true,
            TargetPlatform::Android,
            NavigationLayout::SingleFile,
        )
        .plan(Path::new("/work/my-awesome-app"));
        let written = plan.written_paths();
        assert_eq!(written, vec!["App.tsx"]);
    }

    #[test]
    fn test_ios_adds_recoverable_pod_install() {
        let plan = generator(
            Language::TypeScript,
            false,
            TargetPlatform::Both,
            NavigationLayout::Modular,
        )
        .plan(Path::new("/work/my-awesome-app"));
        let last = plan.steps.last().unwrap();
        assert!(last.is_recoverable());
        match &last.action {
            Action::Command(CommandAction::RunExternal(cmd)) => {
                assert_eq!(cmd.display_line(), "pod install");
                assert_eq!(cmd.cwd, Path::new("/work/my-awesome-app/ios"));
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_prerequisites_follow_platform() {
        let names = |platform| -> Vec<&'static str> {
            generator(Language::TypeScript, false, platform, NavigationLayout::Modular)
                .prerequisites()
                .iter()
                .map(|t| t.name)
                .collect()
        };
        assert_eq!(names(TargetPlatform::Android), vec!["node", "git", "npm", "yarn", "java"]);
        assert_eq!(names(TargetPlatform::Ios), vec!["node", "git", "npm", "yarn", "pod"]);
        assert_eq!(
            names(TargetPlatform::Both),
            vec!["node", "git", "npm", "yarn", "java", "pod"]
        );
    }

    #[test]
    fn test_both_without_ios_toolchain_skips_pods() {
        let rn = generator(
            Language::TypeScript,
            false,
            TargetPlatform::Both,
            NavigationLayout::Modular,
        )
        .ios_toolchain(false);

        let names: Vec<&str> = rn.prerequisites().iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["node", "git", "npm", "yarn", "java"]);

        let plan = rn.plan(Path::new("/work/my-awesome-app"));
        assert!(plan.commands().all(|c| c.program != "pod"));
        assert_eq!(plan.steps.last().unwrap().label, "Installing dependencies");

        let steps = rn.next_steps(Path::new("my-awesome-app"));
        assert_eq!(
            steps,
            vec!["cd my-awesome-app", "yarn android", POD_INSTALL_NOTE, "yarn ios"]
        );
    }

    #[test]
    fn test_next_steps_per_platform() {
        let steps = generator(
            Language::TypeScript,
            false,
            TargetPlatform::Both,
            NavigationLayout::Modular,
        )
        .next_steps(Path::new("my-awesome-app"));
        assert_eq!(steps, vec!["cd my-awesome-app", "yarn android", "yarn ios"]);
    }
}
