//! Express API planner

use super::{cd_line, node_toolchain, ProjectGenerator};
use crate::fragments::{fragment, FragmentKind, FragmentOptions};
use crate::options::{Database, ExpressOptions, PackageManager, ProjectName, ProjectType};
use crate::plan::{CommandPurpose, Plan, PlanBuilder};
use crate::runtime::ToolRequirement;
use std::path::Path;

pub struct ExpressGenerator {
    name: ProjectName,
    package_manager: PackageManager,
    options: ExpressOptions,
}

impl ExpressGenerator {
    pub fn new(name: ProjectName, package_manager: PackageManager, options: ExpressOptions) -> Self {
        Self {
            name,
            package_manager,
            options,
        }
    }

    fn fragments(&self) -> FragmentOptions {
        FragmentOptions::for_express(&self.name, &self.options)
    }
}

impl ProjectGenerator for ExpressGenerator {
    fn project_type(&self) -> ProjectType {
        ProjectType::Express
    }

    fn prerequisites(&self) -> Vec<ToolRequirement> {
        node_toolchain(self.package_manager)
    }

    fn plan(&self, root: &Path) -> Plan {
        let f = self.fragments();
        let ext = f.script_ext();
        let pm = self.package_manager;
        let mut plan = PlanBuilder::new(root);

        plan.create_dir("")
            .write("package.json", fragment(FragmentKind::PackageManifest, &f));
        if f.typescript {
            plan.write("tsconfig.json", fragment(FragmentKind::CompilerConfig, &f));
        }

        plan.create_dir("src")
            .create_dir("src/routes")
            .create_dir("src/controllers")
            .write(
                format!("src/index.{}", ext),
                fragment(FragmentKind::EntryPoint, &f),
            )
            .write(
                format!("src/routes/index.{}", ext),
                fragment(FragmentKind::RouterIndex, &f),
            )
            .write(
                format!("src/controllers/exampleController.{}", ext),
                fragment(FragmentKind::Controller, &f),
            );

        match self.options.database {
            Database::None => {}
            Database::Mongoose => {
                plan.create_dir("src/config").write(
                    format!("src/config/db.{}", ext),
                    fragment(FragmentKind::DatabaseConfig, &f),
                );
            }
            Database::Prisma => {
                plan.create_dir("src/config")
                    .create_dir("prisma")
                    .write(
                        format!("src/config/client.{}", ext),
                        fragment(FragmentKind::DatabaseClient, &f),
                    )
                    .write("prisma/schema.prisma", fragment(FragmentKind::PrismaSchema, &f));
            }
        }

        // env_file already carries the connection string for the chosen database
        plan.write(".env", fragment(FragmentKind::EnvFile, &f))
            .write(".gitignore", fragment(FragmentKind::GitIgnore, &f))
            .command(
                "Installing dependencies",
                pm.program(),
                pm.install_args(),
                CommandPurpose::Install,
            );

        if self.options.database == Database::Prisma {
            let (program, args) = pm.exec("prisma", &["generate"]);
            plan.command(
                "Generating Prisma client",
                program,
                args,
                CommandPurpose::Generate,
            );
        }

        plan.build()
    }

    fn next_steps(&self, root: &Path) -> Vec<String> {
        let mut steps = vec![cd_line(root)];
        match self.options.database {
            Database::None => {}
            Database::Mongoose => steps.push("# start MongoDB, then check MONGO_URI in .env".to_string()),
            Database::Prisma => {
                let (program, args) = self.package_manager.exec("prisma", &["migrate", "dev"]);
                steps.push("# check DATABASE_URL in .env".to_string());
                steps.push(format!("{} {}", program, args.join(" ")));
            }
        }
        steps.push(self.package_manager.run_script("dev"));
        steps
    }
}
