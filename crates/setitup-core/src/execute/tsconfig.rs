//! `@/*` path alias for comment-tolerant tsconfig files

use crate::error::StepError;
use serde_json::{json, Map, Value};
use std::path::Path;
use tokio::fs;

/// Strip `//` and `/* */` comments and trailing commas, leaving strings intact
pub fn strip_json_comments(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' => {
                out.push(c);
                i += 1;
                while i < chars.len() {
                    out.push(chars[i]);
                    if chars[i] == '\\' && i + 1 < chars.len() {
                        out.push(chars[i + 1]);
                        i += 2;
                        continue;
                    }
                    i += 1;
                    if chars[i - 1] == '"' {
                        break;
                    }
                }
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i += 2;
            }
            ',' => {
                let next = chars[i + 1..]
                    .iter()
                    .position(|ch| !ch.is_whitespace())
                    .map(|offset| chars[i + 1 + offset]);
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
                i += 1;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Set `compilerOptions.baseUrl` and `compilerOptions.paths["@/*"]`
pub fn add_alias(text: &str) -> Result<String, String> {
    let mut config: Value =
        serde_json::from_str(&strip_json_comments(text)).map_err(|e| e.to_string())?;
    let root = config
        .as_object_mut()
        .ok_or_else(|| "top level is not an object".to_string())?;

    let options = root
        .entry("compilerOptions")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| "compilerOptions is not an object".to_string())?;
    options.insert("baseUrl".to_string(), json!("."));

    let paths = options
        .entry("paths")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| "compilerOptions.paths is not an object".to_string())?;
    paths.insert("@/*".to_string(), json!(["./src/*"]));

    let mut out = serde_json::to_string_pretty(&config).map_err(|e| e.to_string())?;
    out.push('\n');
    Ok(out)
}

/// Patch the file at `path`; a missing file is left alone
///
/// Returns whether the file was rewritten.
pub async fn patch_alias(path: &Path) -> Result<bool, StepError> {
    let text = match fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no tsconfig to patch");
            return Ok(false);
        }
        Err(e) => return Err(StepError::fs(path, e)),
    };

    let patched = add_alias(&text).map_err(|reason| StepError::TsConfig {
        path: path.to_path_buf(),
        reason,
    })?;
    fs::write(path, patched)
        .await
        .map_err(|e| StepError::fs(path, e))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VITE_APP_TSCONFIG: &str = r#"{
  "compilerOptions": {
    "tsBuildInfoFile": "./node_modules/.tmp/tsconfig.app.tsbuildinfo",
    "target": "ES2020",
    "lib": ["ES2020", "DOM", "DOM.Iterable"],

    /* Bundler mode */
    "moduleResolution": "bundler",
    "jsx": "react-jsx",

    // Linting
    "strict": true,
    "noUnusedLocals": true,
  },
  "include": ["src"]
}
"#;

    #[test]
    fn test_comments_inside_strings_survive() {
        let text = r#"{ "url": "http://example.com/*x*/", "glob": "src/**/*" } // trailing"#;
        let stripped = strip_json_comments(text);
        assert!(stripped.contains("http://example.com/*x*/"));
        assert!(stripped.contains("src/**/*"));
        assert!(!stripped.contains("trailing"));
    }

    #[test]
    fn test_add_alias_to_vite_tsconfig() {
        let patched = add_alias(VITE_APP_TSCONFIG).unwrap();
        let value: Value = serde_json::from_str(&patched).unwrap();
        assert_eq!(value["compilerOptions"]["baseUrl"], ".");
        assert_eq!(value["compilerOptions"]["paths"]["@/*"][0], "./src/*");
        assert_eq!(value["compilerOptions"]["strict"], true);
        assert_eq!(value["include"][0], "src");
    }

    #[test]
    fn test_add_alias_creates_compiler_options() {
        let text = r#"{ "files": [], "references": [{ "path": "./tsconfig.app.json" }] }"#;
        let value: Value = serde_json::from_str(&add_alias(text).unwrap()).unwrap();
        assert_eq!(value["compilerOptions"]["paths"]["@/*"][0], "./src/*");
        assert_eq!(value["references"][0]["path"], "./tsconfig.app.json");
    }

    #[test]
    fn test_invalid_json_is_reported() {
        assert!(add_alias("{ not json").is_err());
        assert!(add_alias("[]").is_err());
    }

    #[tokio::test]
    async fn test_missing_file_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let patched = patch_alias(&dir.path().join("tsconfig.json")).await.unwrap();
        assert!(!patched);
        assert!(!dir.path().join("tsconfig.json").exists());
    }

    #[tokio::test]
    async fn test_patch_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tsconfig.app.json");
        std::fs::write(&path, VITE_APP_TSCONFIG).unwrap();
        assert!(patch_alias(&path).await.unwrap());
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"@/*\""));
        assert!(!written.contains("Bundler mode"));
    }
}
