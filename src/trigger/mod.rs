//! Debounced render triggering.
//!
//! [`RenderTrigger`] decides when an edit actually refreshes the preview:
//! change notifications reset a quiescence deadline, and a render fires only
//! once edits go quiet. It also absorbs the startup race where the renderer
//! attaches and requests an initial render before the editor surface exists,
//! by retrying the invocation at a fixed interval until readiness.
//!
//! Time is passed in as monotonic milliseconds, so the machine is
//! deterministic and never sleeps.

/// Delay with no new edits after which a pending render is dispatched.
pub const DEFAULT_QUIESCENCE_MS: u64 = 1000;

/// Interval between retries of a render requested before the editor is up.
pub const DEFAULT_RETRY_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Editor surface not constructed yet, optionally holding a scheduled
    /// retry of a render request that arrived too early.
    Unready { retry_at: Option<u64> },
    Idle,
    Pending { deadline: u64 },
}

/// Debounced dispatcher deciding when the preview is refreshed.
///
/// At most one deadline is live at a time: each new change notification
/// supersedes the previous one, so rapid edits coalesce into a single fire.
#[derive(Debug)]
pub struct RenderTrigger {
    quiescence_ms: u64,
    retry_ms: u64,
    state: State,
}

impl RenderTrigger {
    pub const fn new(quiescence_ms: u64, retry_ms: u64) -> Self {
        Self {
            quiescence_ms,
            retry_ms,
            state: State::Unready { retry_at: None },
        }
    }

    /// Whether the one-time readiness transition has happened.
    pub const fn is_ready(&self) -> bool {
        !matches!(self.state, State::Unready { .. })
    }

    /// Record an edit. Supersedes any pending deadline; before readiness it
    /// behaves like [`request_render`](Self::request_render).
    pub const fn notify_change(&mut self, now_ms: u64) {
        match self.state {
            State::Unready { .. } => self.schedule_retry(now_ms),
            State::Idle | State::Pending { .. } => {
                self.state = State::Pending {
                    deadline: now_ms + self.quiescence_ms,
                };
            }
        }
    }

    /// Request a render right away (the renderer asks for one on attach).
    ///
    /// Before readiness this schedules a retry instead of failing; the retry
    /// repeats until the editor surface comes up.
    pub const fn request_render(&mut self, now_ms: u64) {
        match self.state {
            State::Unready { .. } => self.schedule_retry(now_ms),
            State::Idle | State::Pending { .. } => {
                self.state = State::Pending { deadline: now_ms };
            }
        }
    }

    /// One-time readiness transition: the editor surface is safe to query.
    ///
    /// A retry scheduled while unready is preserved as a pending deadline so
    /// the early render request is honored at its scheduled time. Calling
    /// this after readiness is a no-op; the flag never reverts.
    pub const fn mark_ready(&mut self) {
        if let State::Unready { retry_at } = self.state {
            self.state = match retry_at {
                Some(deadline) => State::Pending { deadline },
                None => State::Idle,
            };
        }
    }

    /// Poll for an elapsed deadline. Returns true exactly once per quiescence
    /// window; the caller then reads the current text, persists it, and
    /// publishes. While unready, an elapsed retry is rescheduled instead.
    pub const fn take_fire(&mut self, now_ms: u64) -> bool {
        match self.state {
            State::Pending { deadline } if now_ms >= deadline => {
                self.state = State::Idle;
                true
            }
            State::Unready {
                retry_at: Some(retry_at),
            } if now_ms >= retry_at => {
                self.state = State::Unready {
                    retry_at: Some(now_ms + self.retry_ms),
                };
                false
            }
            _ => false,
        }
    }

    /// Whether a deadline or retry is scheduled (the event loop polls faster
    /// while this holds).
    pub const fn is_pending(&self) -> bool {
        matches!(
            self.state,
            State::Pending { .. } | State::Unready { retry_at: Some(_) }
        )
    }

    const fn schedule_retry(&mut self, now_ms: u64) {
        if let State::Unready { retry_at: None } = self.state {
            self.state = State::Unready {
                retry_at: Some(now_ms + self.retry_ms),
            };
        }
    }
}

impl Default for RenderTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_QUIESCENCE_MS, DEFAULT_RETRY_MS)
    }
}
