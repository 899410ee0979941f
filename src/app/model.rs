use std::time::{Duration, Instant};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

const TOAST_DURATION: Duration = Duration::from_secs(4);

/// The pipeline state.
///
/// All state lives here - no global or scattered state. Timer state lives in
/// the render trigger, which the event loop owns alongside this.
#[derive(Debug, Default)]
pub struct Model {
    /// Renders published to the renderer so far
    pub publish_count: u64,
    /// Preview files written so far
    pub preview_count: u64,
    /// Size of the last preview written, in bytes
    pub last_preview_bytes: usize,
    /// Last error the renderer reported
    pub last_error: Option<String>,
    /// Whether the app should quit
    pub should_quit: bool,
    toast: Option<Toast>,
}

impl Model {
    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            ToastLevel::Info => tracing::info!("{message}"),
            ToastLevel::Warning => tracing::warn!("{message}"),
            ToastLevel::Error => tracing::error!("{message}"),
        }
        self.toast = Some(Toast {
            level,
            message,
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    /// Drop an expired toast; returns true when one was cleared.
    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self.toast.as_ref().is_some_and(|t| now >= t.expires_at) {
            self.toast = None;
            return true;
        }
        false
    }

    /// The current notification, if one is showing.
    pub fn toast(&self) -> Option<(ToastLevel, &str)> {
        self.toast.as_ref().map(|t| (t.level, t.message.as_str()))
    }
}
