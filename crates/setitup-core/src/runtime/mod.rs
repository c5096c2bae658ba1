//! Prerequisite detection
//!
//! This module provides:
//! - Tool requirements (Node.js, Git, Java, CocoaPods, package managers)
//! - PATH probing and minimum-version checks

pub mod check;
pub mod tool;

pub use check::{check_prerequisites, evaluate, parse_version, probe_all, ToolStatus};
pub use tool::{ToolRequirement, MIN_NODE_VERSION};
