//! Copying bundled templates into a project

use crate::error::StepError;
use crate::templates::lookup;
use std::path::Path;
use tokio::fs;

/// Write the bundled template `key` to `dest`, relative to `root`
pub async fn copy_template(root: &Path, key: &str, dest: &str) -> Result<(), StepError> {
    let content = lookup(key).ok_or_else(|| StepError::UnknownTemplate(key.to_string()))?;

    let target = root.join(dest);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| StepError::fs(parent, e))?;
    }

    fs::write(&target, content)
        .await
        .map_err(|e| StepError::fs(&target, e))?;

    tracing::debug!(template = key, dest = %target.display(), "copied bundled template");
    Ok(())
}
