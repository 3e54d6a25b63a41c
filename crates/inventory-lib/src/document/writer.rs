//! Atomic document output

use super::{Document, DocumentError};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes documents below an output root
#[derive(Debug, Clone)]
pub struct DocumentWriter {
    root: PathBuf,
}

impl DocumentWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `document`, replacing any previous version. Returns the full path.
    pub fn write(&self, document: &Document) -> Result<PathBuf, DocumentError> {
        let path = self.root.join(document.relative_path());
        write_atomic(&path, document.render().as_bytes())?;
        debug!(path = %path.display(), "Document written");
        Ok(path)
    }
}

/// Write `contents` to `path` via a sibling temp file and a rename, so
/// readers see either the old file or the new one, never a partial write.
/// Missing parent directories are created.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), DocumentError> {
    let io_err = |source: std::io::Error| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let temp_path = temp_path_for(path);
    let result = File::create(&temp_path)
        .and_then(|mut file| {
            file.write_all(contents)?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&temp_path, path));

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(io_err(e));
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", file_name))
}
