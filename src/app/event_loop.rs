use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::app::{App, Model};
use crate::editor::FileEditor;
use crate::renderer::{CommandRenderer, Renderer};
use crate::store::{JsonFileStore, PersistentBuffer};
use crate::trigger::RenderTrigger;
use crate::watcher::SourceWatcher;

impl App {
    /// Run the pipeline.
    ///
    /// The renderer attaches before the editor surface is seeded, so its
    /// initial render request always lands while the trigger is still
    /// unready and goes through the retry path — the same race the browser
    /// original has between module instantiation and page onload.
    ///
    /// # Errors
    ///
    /// Returns an error if the renderer command is empty, the source file
    /// cannot be seeded, the watcher cannot be created, or (in `--once`
    /// mode) the single render fails.
    pub fn run(&self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        let mut trigger = RenderTrigger::new(self.quiescence_ms, self.retry_ms);
        let mut renderer = CommandRenderer::attach(&self.renderer_command)
            .context("Failed to attach renderer")?;

        let mut buffer = PersistentBuffer::new(JsonFileStore::new(self.store_path.clone()));
        let editor = FileEditor::new(self.source_path.clone());
        let seed_scope = crate::perf::scope("app.seed");
        editor
            .seed(&buffer)
            .context("Failed to seed source file")?;
        drop(seed_scope);

        let mut watcher = if self.once {
            None
        } else {
            let watcher = SourceWatcher::new(editor.path())
                .with_context(|| format!("Failed to watch {}", editor.path().display()))?;
            Some(watcher)
        };

        let mut model = Model::default();
        let start = Instant::now();
        let mut ready_signaled = false;

        loop {
            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            if watcher.as_mut().is_some_and(SourceWatcher::take_change) {
                trigger.notify_change(now_ms);
            }

            for event in renderer.poll_events() {
                model = self.handle_renderer_event(model, &mut trigger, event, now_ms);
            }

            // The first pass has drained any render request that raced ahead
            // of the editor surface; readiness is signaled exactly once.
            if !ready_signaled {
                trigger.mark_ready();
                ready_signaled = true;
            }

            if trigger.take_fire(now_ms) {
                crate::perf::log_event("trigger.fire", format!("now_ms={now_ms}"));
                model = Self::fire_render(model, &editor, &mut buffer, &mut renderer);
            }

            model.expire_toast(Instant::now());

            if model.should_quit {
                break;
            }

            let poll_ms = if trigger.is_pending() { 10 } else { 250 };
            std::thread::sleep(Duration::from_millis(poll_ms));
        }

        if self.once
            && let Some(message) = model.last_error
        {
            anyhow::bail!("renderer failed: {message}");
        }
        Ok(())
    }
}
