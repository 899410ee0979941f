//! The editor surface the pipeline reads from.
//!
//! `livedoc` does not own an editor widget; the user's editor of choice
//! writes the source file, and [`FileEditor`] is the capability that reads
//! whatever it currently says. Change notifications come from the watcher.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::store::{PersistentBuffer, SourceStore};

/// Read access to the current source text.
pub trait EditorSource {
    /// The text as of right now.
    ///
    /// # Errors
    /// Returns an error if the surface cannot be read.
    fn current_text(&self) -> Result<String>;
}

/// Editor surface backed by a file on disk.
#[derive(Debug)]
pub struct FileEditor {
    path: PathBuf,
}

impl FileEditor {
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure the source file exists before the pipeline starts.
    ///
    /// A missing file is recovered from the last saved session, falling back
    /// to the placeholder default, so there is always something to edit.
    /// Returns true when the file had to be created.
    ///
    /// # Errors
    /// Returns an error if the session store is unreadable or the file
    /// cannot be written.
    pub fn seed<S: SourceStore>(&self, buffer: &PersistentBuffer<S>) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        let text = buffer
            .load_or_default()
            .context("failed to read saved session")?;
        fs::write(&self.path, &text)
            .with_context(|| format!("failed to seed {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), "seeded source file");
        Ok(true)
    }
}

impl EditorSource for FileEditor {
    fn current_text(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))
    }
}
