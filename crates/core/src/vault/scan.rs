//! One-shot vault scan into an in-memory snapshot.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::extractor::extract_record;
use super::walker::{VaultWalker, VaultWalkerError};
use crate::config::types::ResolvedConfig;
use crate::note::VaultSnapshot;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Walker(#[from] VaultWalkerError),

    #[error("failed to read note {0}: {1}")]
    ReadError(String, #[source] std::io::Error),
}

/// Extensions whose content is parsed; other files only get path and times.
const TEXT_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Scan the vault described by `config`.
pub fn scan_vault(config: &ResolvedConfig) -> Result<VaultSnapshot, ScanError> {
    let walker = VaultWalker::with_exclusions(
        &config.vault_root,
        config.excluded_folders.clone(),
    )?
    .extensions(&config.extensions);
    scan(&walker)
}

/// Scan every `.md` note under `root`.
pub fn scan_dir(root: &Path) -> Result<VaultSnapshot, ScanError> {
    scan(&VaultWalker::new(root)?)
}

fn scan(walker: &VaultWalker) -> Result<VaultSnapshot, ScanError> {
    let files = walker.walk()?;
    let mut records = Vec::with_capacity(files.len());

    for file in &files {
        let is_text = file
            .absolute_path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| TEXT_EXTENSIONS.iter().any(|t| t.eq_ignore_ascii_case(e)));

        let content = if is_text {
            let bytes = fs::read(&file.absolute_path).map_err(|e| {
                ScanError::ReadError(file.absolute_path.display().to_string(), e)
            })?;
            String::from_utf8_lossy(&bytes).into_owned()
        } else {
            String::new()
        };

        records.push(extract_record(&content, file));
    }

    tracing::info!(notes = records.len(), root = %walker.root().display(), "vault scanned");
    Ok(records.into_iter().collect::<VaultSnapshot>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::MetadataIndex;
    use tempfile::TempDir;

    #[test]
    fn test_scan_builds_records() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("work/meetings")).unwrap();
        fs::write(root.join("work/meetings/standup.md"), "---\nstatus: open\n---\n#meeting\n")
            .unwrap();
        fs::write(root.join("inbox.md"), "- [ ] call Bo\n").unwrap();

        let snapshot = scan_dir(root).unwrap();
        assert_eq!(snapshot.len(), 2);

        let standup = snapshot.get("work/meetings/standup.md").unwrap();
        assert_eq!(standup.folder_path, "work/meetings");
        assert_eq!(standup.tags, vec!["meeting"]);
        assert!(standup.modified_at > chrono::DateTime::<chrono::Utc>::UNIX_EPOCH);

        assert!(snapshot.get("inbox.md").unwrap().has_incomplete_task);
    }

    #[test]
    fn test_scan_missing_root() {
        let err = scan_dir(Path::new("/nonexistent/vault")).unwrap_err();
        assert!(matches!(err, ScanError::Walker(VaultWalkerError::MissingRoot(_))));
    }
}
