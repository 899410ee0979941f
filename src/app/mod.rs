//! Application state and main event loop.
//!
//! The shape is The Elm Architecture, pared down to a headless pipeline:
//! - [`Model`]: the pipeline state
//! - [`Message`]: events and actions
//! - [`update`]: pure state transitions
//! - [`App::run`]: event loop wiring watcher, trigger, store, and renderer

mod effects;
mod event_loop;
mod model;
mod update;

pub use model::{Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::trigger::{DEFAULT_QUIESCENCE_MS, DEFAULT_RETRY_MS};

/// Main application struct that owns the pipeline and runs the event loop.
pub struct App {
    source_path: PathBuf,
    renderer_command: String,
    preview_path: PathBuf,
    store_path: PathBuf,
    quiescence_ms: u64,
    retry_ms: u64,
    once: bool,
}

impl App {
    /// Create a new application for the given source file.
    pub fn new(source_path: PathBuf, renderer_command: String, store_path: PathBuf) -> Self {
        Self {
            source_path,
            renderer_command,
            preview_path: PathBuf::from("preview.html"),
            store_path,
            quiescence_ms: DEFAULT_QUIESCENCE_MS,
            retry_ms: DEFAULT_RETRY_MS,
            once: false,
        }
    }

    /// Set where the rendered preview is written.
    pub fn with_preview_path(mut self, path: PathBuf) -> Self {
        self.preview_path = path;
        self
    }

    /// Set the quiescence interval: the pause after the last edit before a
    /// render is dispatched.
    pub const fn with_quiescence_ms(mut self, ms: u64) -> Self {
        self.quiescence_ms = ms;
        self
    }

    /// Set the interval between retries of a render requested before the
    /// editor surface is up.
    pub const fn with_retry_ms(mut self, ms: u64) -> Self {
        self.retry_ms = ms;
        self
    }

    /// Render once and exit instead of watching for changes.
    pub const fn with_once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }
}
