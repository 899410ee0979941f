use std::path::Path;

use crate::app::{App, Message, Model, ToastLevel, update};
use crate::editor::EditorSource;
use crate::renderer::{Renderer, RendererEvent};
use crate::sanitize::sanitize_page;
use crate::store::{PersistentBuffer, SourceStore};
use crate::trigger::RenderTrigger;

impl App {
    /// An elapsed quiescence window: read the current text, persist it, and
    /// hand it to the renderer.
    ///
    /// A failed read skips the publish (there is nothing to send); a failed
    /// save is logged and does not block it — the preview going stale is
    /// worse than losing one session write.
    pub(super) fn fire_render<E, S, R>(
        mut model: Model,
        editor: &E,
        buffer: &mut PersistentBuffer<S>,
        renderer: &mut R,
    ) -> Model
    where
        E: EditorSource,
        S: SourceStore,
        R: Renderer,
    {
        let _scope = crate::perf::scope("app.fire_render");
        let text = match editor.current_text() {
            Ok(text) => text,
            Err(err) => {
                model.show_toast(ToastLevel::Error, format!("Read failed: {err}"));
                return model;
            }
        };

        if let Err(err) = buffer.save(&text) {
            tracing::warn!(error = %err, "failed to persist session, publishing anyway");
            crate::perf::log_event("store.save.error", format!("{err}"));
        } else {
            crate::perf::log_event("store.save", format!("bytes={}", text.len()));
        }

        renderer.publish(&text);
        crate::perf::log_event("renderer.publish", format!("bytes={}", text.len()));
        update(model, Message::Published)
    }

    /// Apply one out-of-band renderer event.
    pub(super) fn handle_renderer_event(
        &self,
        model: Model,
        trigger: &mut RenderTrigger,
        event: RendererEvent,
        now_ms: u64,
    ) -> Model {
        crate::perf::log_event("renderer.event", format!("now_ms={now_ms} {event:?}"));
        match event {
            RendererEvent::RenderRequested => {
                trigger.request_render(now_ms);
                model
            }
            RendererEvent::PageRendered(page) => {
                let mut model = match write_preview(&self.preview_path, &page) {
                    Ok(bytes) => update(model, Message::PreviewWritten(bytes)),
                    Err(err) => {
                        let mut model = model;
                        model.show_toast(
                            ToastLevel::Error,
                            format!("Preview write failed: {err}"),
                        );
                        model
                    }
                };
                if self.once {
                    model = update(model, Message::Quit);
                }
                model
            }
            RendererEvent::Failed(message) => {
                let mut model = update(model, Message::RendererFailed(message));
                if self.once {
                    model = update(model, Message::Quit);
                }
                model
            }
        }
    }
}

fn write_preview(path: &Path, page: &str) -> std::io::Result<usize> {
    let sanitized = sanitize_page(page);
    std::fs::write(path, &sanitized)?;
    Ok(sanitized.len())
}
