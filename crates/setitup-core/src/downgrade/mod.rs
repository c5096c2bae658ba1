//! TypeScript to JavaScript downgrade
//!
//! Some features only ship a TypeScript setup, so a project that asked for
//! JavaScript is scaffolded as TypeScript and converted back once every file
//! has been written. The conversion runs through fixed stages; a file that
//! cannot be converted is left as it was and reported, never fatal.

pub mod strip;

use serde_json::Value;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub use strip::{javascript_specifier, strip_types, Dialect};

/// Files converted before the `src/` sweep
const KNOWN_ARTIFACTS: &[&str] = &["src/main.tsx", "src/App.tsx", "vite.config.ts"];

const DECLARATION_FILES: &[&str] = &["src/vite-env.d.ts"];

const COMPILER_CONFIGS: &[&str] = &["tsconfig.json", "tsconfig.app.json", "tsconfig.node.json"];

const ALIAS_CONFIG: &str = "jsconfig.json";

/// Downgrade stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Transform,
    RemoveDeclarations,
    RemoveCompilerConfigs,
    WriteAliasConfig,
    Rewire,
    Done,
}

impl Stage {
    pub fn next(self) -> Stage {
        match self {
            Stage::Transform => Stage::RemoveDeclarations,
            Stage::RemoveDeclarations => Stage::RemoveCompilerConfigs,
            Stage::RemoveCompilerConfigs => Stage::WriteAliasConfig,
            Stage::WriteAliasConfig => Stage::Rewire,
            Stage::Rewire | Stage::Done => Stage::Done,
        }
    }
}

/// A file the downgrade could not handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DowngradeFailure {
    pub stage: Stage,
    /// Relative to the project root
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for DowngradeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DowngradeReport {
    /// JavaScript files written, relative to the root
    pub converted: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    pub failures: Vec<DowngradeFailure>,
}

/// Convert the project at `root`; running it twice is a no-op
pub fn downgrade_project(root: &Path) -> DowngradeReport {
    let mut report = DowngradeReport::default();
    let mut stage = Stage::Transform;
    while stage != Stage::Done {
        tracing::debug!(?stage, root = %root.display(), "downgrade stage");
        match stage {
            Stage::Transform => transform_sources(root, &mut report),
            Stage::RemoveDeclarations => remove_files(root, DECLARATION_FILES, stage, &mut report),
            Stage::RemoveCompilerConfigs => remove_files(root, COMPILER_CONFIGS, stage, &mut report),
            Stage::WriteAliasConfig => {
                let alias = crate::fragments::react::alias_config();
                if let Err(e) = fs::write(root.join(ALIAS_CONFIG), alias) {
                    report.fail(stage, ALIAS_CONFIG, e.to_string());
                }
            }
            Stage::Rewire => rewire(root, &mut report),
            Stage::Done => {}
        }
        stage = stage.next();
    }
    report
}

impl DowngradeReport {
    fn fail(&mut self, stage: Stage, path: impl Into<PathBuf>, reason: String) {
        let path = path.into();
        tracing::warn!(path = %path.display(), %reason, "downgrade failure");
        self.failures.push(DowngradeFailure {
            stage,
            path,
            reason,
        });
    }
}

fn relative(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

/// Grammar for a TypeScript source; `None` for anything else (including `.d.ts`)
fn dialect_of(path: &Path) -> Option<Dialect> {
    let name = path.file_name()?.to_str()?;
    if name.ends_with(".d.ts") {
        return None;
    }
    match path.extension()?.to_str()? {
        "tsx" => Some(Dialect::Tsx),
        "ts" => Some(Dialect::TypeScript),
        _ => None,
    }
}

/// `.tsx` → `.jsx`, `.ts` → `.js`
fn javascript_path(path: &Path) -> Option<PathBuf> {
    match dialect_of(path)? {
        Dialect::Tsx => Some(path.with_extension("jsx")),
        Dialect::TypeScript => Some(path.with_extension("js")),
    }
}

fn transform_sources(root: &Path, report: &mut DowngradeReport) {
    let mut targets: Vec<PathBuf> = KNOWN_ARTIFACTS
        .iter()
        .map(|artifact| root.join(artifact))
        .filter(|path| path.is_file())
        .collect();

    let src = root.join("src");
    if src.is_dir() {
        let swept = WalkDir::new(&src)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| javascript_path(path).is_some());
        for path in swept {
            if !targets.contains(&path) {
                targets.push(path);
            }
        }
    }

    for path in targets {
        match convert_file(&path) {
            Ok(Some(written)) => report.converted.push(relative(root, &written)),
            Ok(None) => {}
            Err(e) => report.fail(Stage::Transform, relative(root, &path), e.to_string()),
        }
    }
}

/// Strip one file and move it to its JavaScript name
fn convert_file(path: &Path) -> Result<Option<PathBuf>, crate::error::TransformError> {
    let (Some(dialect), Some(target)) = (dialect_of(path), javascript_path(path)) else {
        return Ok(None);
    };
    let source = fs::read_to_string(path)?;
    let converted = strip_types(&source, dialect)?;
    fs::write(&target, converted)?;
    fs::remove_file(path)?;
    Ok(Some(target))
}

fn remove_files(root: &Path, files: &[&str], stage: Stage, report: &mut DowngradeReport) {
    for file in files {
        match fs::remove_file(root.join(file)) {
            Ok(()) => report.removed.push(PathBuf::from(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => report.fail(stage, *file, e.to_string()),
        }
    }
}

/// Point tooling that still references TypeScript at the converted files
fn rewire(root: &Path, report: &mut DowngradeReport) {
    let edits: [(&str, fn(&str) -> Result<String, String>); 3] = [
        ("index.html", rewire_index_html),
        ("package.json", rewire_package_json),
        ("components.json", rewire_components_json),
    ];

    for (file, edit) in edits {
        let path = root.join(file);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                report.fail(Stage::Rewire, file, e.to_string());
                continue;
            }
        };
        match edit(&text) {
            Ok(updated) if updated != text => {
                if let Err(e) = fs::write(&path, updated) {
                    report.fail(Stage::Rewire, file, e.to_string());
                }
            }
            Ok(_) => {}
            Err(reason) => report.fail(Stage::Rewire, file, reason),
        }
    }
}

fn rewire_index_html(text: &str) -> Result<String, String> {
    Ok(text.replace("/src/main.tsx", "/src/main.jsx"))
}

fn rewrite_json(text: &str, edit: impl FnOnce(&mut Value)) -> Result<String, String> {
    let mut value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    edit(&mut value);
    let mut out = serde_json::to_string_pretty(&value).map_err(|e| e.to_string())?;
    out.push('\n');
    Ok(out)
}

/// `tsc -b && vite build` → `vite build`
fn rewire_package_json(text: &str) -> Result<String, String> {
    let build = serde_json::from_str::<Value>(text)
        .map_err(|e| e.to_string())?
        .pointer("/scripts/build")
        .and_then(Value::as_str)
        .map(str::to_string);
    match build {
        Some(script) if script.contains("tsc -b && ") => rewrite_json(text, |value| {
            value["scripts"]["build"] = Value::String(script.replace("tsc -b && ", ""));
        }),
        _ => Ok(text.to_string()),
    }
}

fn rewire_components_json(text: &str) -> Result<String, String> {
    let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    if value.get("tsx") == Some(&Value::Bool(false)) {
        return Ok(text.to_string());
    }
    rewrite_json(text, |value| {
        if let Some(object) = value.as_object_mut() {
            object.insert("tsx".to_string(), Value::Bool(false));
        }
    })
}
