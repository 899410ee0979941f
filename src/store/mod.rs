//! Session persistence for the source text.
//!
//! A tiny key-value contract: the last known source survives restarts under
//! one fixed key, nothing more. [`JsonFileStore`] is the durable
//! implementation; [`MemoryStore`] backs tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Logical key the source text is stored under.
pub const SOURCE_KEY: &str = "input.go";

/// Seed text used when no prior session exists.
pub const DEFAULT_SOURCE: &str = "// Paste your go code here\npackage mypackage";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no value stored under {0:?}")]
    NotFound(String),
    #[error("failed to access session store {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session store {path} is not valid JSON")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value persistence the buffer sits on.
pub trait SourceStore {
    /// Fetch the value stored under `key`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when no value exists for `key`.
    fn get(&self, key: &str) -> Result<String, StoreError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the value cannot be made durable.
    fn set(&mut self, key: &str, text: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    entries: BTreeMap<String, String>,
}

/// Durable store backed by one JSON file of key -> text.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<StoreFile, StoreError> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| StoreError::Format {
            path: self.path.clone(),
            source,
        })
    }

    fn write_file(&self, file: &StoreFile) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(file).map_err(|source| StoreError::Format {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(io_err)
    }
}

impl SourceStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<String, StoreError> {
        self.read_file()?
            .entries
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn set(&mut self, key: &str, text: &str) -> Result<(), StoreError> {
        // Preserve unrelated keys across the rewrite.
        let mut file = self.read_file().unwrap_or_default();
        file.entries.insert(key.to_string(), text.to_string());
        self.write_file(&file)
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl SourceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<String, StoreError> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn set(&mut self, key: &str, text: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), text.to_string());
        Ok(())
    }
}

/// Last known source text, durable across runs, under [`SOURCE_KEY`].
#[derive(Debug)]
pub struct PersistentBuffer<S> {
    store: S,
}

impl<S: SourceStore> PersistentBuffer<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the saved source text.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when no session has been saved yet.
    pub fn load(&self) -> Result<String, StoreError> {
        self.store.get(SOURCE_KEY)
    }

    /// Load the saved source text, or the placeholder default when no prior
    /// session exists. Store corruption still surfaces as an error.
    ///
    /// # Errors
    /// Returns an error if the store exists but cannot be read.
    pub fn load_or_default(&self) -> Result<String, StoreError> {
        match self.load() {
            Ok(text) => Ok(text),
            Err(StoreError::NotFound(_)) => Ok(DEFAULT_SOURCE.to_string()),
            Err(err) => Err(err),
        }
    }

    /// Overwrite the saved source text.
    ///
    /// # Errors
    /// Returns an error if the value cannot be made durable.
    pub fn save(&mut self, text: &str) -> Result<(), StoreError> {
        self.store.set(SOURCE_KEY, text)
    }
}
