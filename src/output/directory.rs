//! Local directory sink.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use super::{OutputSink, Section, WriteStatus};
use crate::error::OutputError;

/// Writes section artifacts into a directory.
///
/// Each file is written to a temporary file in the same directory and then
/// renamed over the target, so readers see either the old or the new file.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates a sink writing into `dir`. The directory is created on first
    /// write if it does not exist.
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

/// Compare, then temp file, fsync and rename. Blocking; run off the runtime.
fn write_atomic(dir: &Path, target: &Path, contents: &[u8]) -> Result<WriteStatus, OutputError> {
    let io_err = |error: std::io::Error| OutputError::Io {
        path: target.to_path_buf(),
        error,
    };

    if std::fs::read(target).is_ok_and(|existing| existing == contents) {
        return Ok(WriteStatus::Unchanged);
    }

    std::fs::create_dir_all(dir).map_err(io_err)?;
    let mut temp = NamedTempFile::new_in(dir).map_err(io_err)?;
    temp.write_all(contents).map_err(io_err)?;
    temp.as_file().sync_all().map_err(io_err)?;
    temp.persist(target).map_err(|e| io_err(e.error))?;
    Ok(WriteStatus::Written)
}

#[async_trait]
impl OutputSink for DirectorySink {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    async fn write_section(
        &self,
        section: Section,
        contents: &[u8],
    ) -> Result<WriteStatus, OutputError> {
        let dir = self.dir.clone();
        let target = self.dir.join(section.file_name());
        let contents = contents.to_vec();

        let path = target.clone();
        tokio::task::spawn_blocking(move || write_atomic(&dir, &target, &contents))
            .await
            .map_err(|e| OutputError::Io {
                path,
                error: std::io::Error::other(e),
            })?
    }
}
