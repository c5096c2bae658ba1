//! Project structure planners
//!
//! Each project type has a [`ProjectGenerator`] that turns resolved options
//! into a [`Plan`]. Planning is pure: nothing here touches the disk or spawns
//! processes, so every option combination can be checked in tests.

pub mod express;
pub mod react;
pub mod react_native;

use crate::options::{PackageManager, ProjectOptions, ProjectType, TypeSpecificOptions};
use crate::plan::Plan;
use crate::runtime::ToolRequirement;
use std::path::Path;

pub use express::ExpressGenerator;
pub use react::ReactGenerator;
pub use react_native::ReactNativeGenerator;

/// Planner for one project type
pub trait ProjectGenerator {
    fn project_type(&self) -> ProjectType;

    /// Tools that must be on PATH before the plan runs
    fn prerequisites(&self) -> Vec<ToolRequirement>;

    /// Ordered steps creating the project at `root`
    fn plan(&self, root: &Path) -> Plan;

    /// Shell lines shown once the project exists at `root`
    fn next_steps(&self, root: &Path) -> Vec<String>;
}

/// Generator matching the chosen project type
pub fn generator_for(options: &ProjectOptions) -> Box<dyn ProjectGenerator> {
    let name = options.name.clone();
    let pm = options.package_manager;
    match options.details {
        TypeSpecificOptions::React(react) => Box::new(ReactGenerator::new(name, pm, react)),
        TypeSpecificOptions::ReactNative(native) => {
            Box::new(ReactNativeGenerator::new(name, pm, native))
        }
        TypeSpecificOptions::Express(express) => {
            Box::new(ExpressGenerator::new(name, pm, express))
        }
    }
}

/// Node.js, npm and the chosen package manager (npm listed once)
fn node_toolchain(pm: PackageManager) -> Vec<ToolRequirement> {
    let mut tools = vec![
        ToolRequirement::node(),
        ToolRequirement::package_manager(PackageManager::Npm),
    ];
    if pm != PackageManager::Npm {
        tools.push(ToolRequirement::package_manager(pm));
    }
    tools
}

fn cd_line(root: &Path) -> String {
    format!("cd {}", root.display())
}
