// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference
    clippy::module_name_repetitions
)]

//! # Livedoc
//!
//! A live documentation preview driver.
//!
//! Livedoc watches a source file, debounces edits, persists the current text
//! to a session store, and publishes it to an external renderer command that
//! produces a documentation page. The rendered page is post-processed and
//! written to a preview file for the browser to pick up.
//!
//! ## Architecture
//!
//! Livedoc uses The Elm Architecture (TEA) pattern, headless:
//! - **Model**: Pipeline state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **Event loop**: Wires watcher, trigger, store, and renderer together
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`trigger`]: Debounced render triggering with deferred readiness
//! - [`store`]: Session persistence for the source text
//! - [`editor`]: The editor surface the pipeline reads from
//! - [`renderer`]: The external renderer and its event channel
//! - [`sanitize`]: Rendered-page rewriting
//! - [`watcher`]: File watching

pub mod app;
pub mod config;
pub mod editor;
pub mod perf;
pub mod renderer;
pub mod sanitize;
pub mod store;
pub mod trigger;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::store::{PersistentBuffer, SourceStore};
    pub use crate::trigger::RenderTrigger;
}
