//! The renderer the pipeline publishes to.
//!
//! The actual rendering logic is a black box behind [`Renderer`]: publishes
//! are fire-and-forget, and everything the renderer has to say comes back
//! over an out-of-band event channel — an initial-render request when it
//! attaches, rendered pages, and error reports.

use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};

/// What the renderer reports back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererEvent {
    /// The renderer attached and wants an initial render.
    RenderRequested,
    /// A rendered page is ready.
    PageRendered(String),
    /// The renderer could not handle the published text.
    Failed(String),
}

/// Accepts published source text. No acknowledgement is awaited; results and
/// failures arrive as [`RendererEvent`]s.
pub trait Renderer {
    fn publish(&mut self, text: &str);

    /// Drain events the renderer has reported since the last poll.
    fn poll_events(&mut self) -> Vec<RendererEvent>;
}

/// Renderer backed by an external command.
///
/// A single worker thread runs the command once per queued publish, with the
/// source on stdin and the rendered page expected on stdout, so pages come
/// back in publish order. The command string is split on whitespace (no
/// shell quoting).
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
    jobs: Sender<String>,
    rx: Receiver<RendererEvent>,
    _worker: std::thread::JoinHandle<()>,
}

impl std::fmt::Debug for CommandRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRenderer")
            .field("program", &self.program)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl CommandRenderer {
    /// Attach to the external renderer command.
    ///
    /// Attaching immediately queues a [`RendererEvent::RenderRequested`], the
    /// way the renderer asks for content as soon as its handler is registered
    /// — possibly before the editor surface exists.
    ///
    /// # Errors
    /// Returns an error if the command string is empty.
    pub fn attach(command: &str) -> anyhow::Result<Self> {
        let mut tokens = command.split_whitespace().map(ToOwned::to_owned);
        let program: String = tokens
            .next()
            .ok_or_else(|| anyhow::anyhow!("renderer command is empty"))?;
        let args: Vec<String> = tokens.collect();

        let (event_tx, event_rx) = mpsc::channel();
        let (job_tx, job_rx) = mpsc::channel::<String>();
        event_tx
            .send(RendererEvent::RenderRequested)
            .expect("receiver held by self");

        // One worker renders queued publishes strictly in order; concurrent
        // renders could hand a stale page back after a newer one.
        let worker = {
            let program = program.clone();
            let args = args.clone();
            std::thread::spawn(move || {
                for text in job_rx {
                    let event = Self::render_once(&program, &args, &text);
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            })
        };

        Ok(Self {
            program,
            args,
            jobs: job_tx,
            rx: event_rx,
            _worker: worker,
        })
    }

    fn render_once(program: &str, args: &[String], text: &str) -> RendererEvent {
        let spawned = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();
        let mut child = match spawned {
            Ok(child) => child,
            Err(err) => return RendererEvent::Failed(format!("failed to start {program}: {err}")),
        };

        // Feed stdin from its own thread while the output pipes are drained
        // below; writing the whole source first would deadlock against a
        // renderer that streams output once both pipe buffers fill.
        let writer = child.stdin.take().map(|mut stdin| {
            let text = text.to_string();
            std::thread::spawn(move || stdin.write_all(text.as_bytes()))
        });

        // Reaps the child on every path, including a failed stdin write.
        let output = child.wait_with_output();
        let fed = match writer {
            Some(handle) => handle
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked"))),
            None => Ok(()),
        };

        match output {
            Ok(output) if output.status.success() => {
                // A page rendered from truncated input is not a page.
                if let Err(err) = fed {
                    return RendererEvent::Failed(format!("failed to feed {program}: {err}"));
                }
                RendererEvent::PageRendered(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let message = stderr.trim();
                RendererEvent::Failed(if message.is_empty() {
                    format!("{program} exited with {}", output.status)
                } else {
                    message.to_string()
                })
            }
            Err(err) => RendererEvent::Failed(format!("failed to run {program}: {err}")),
        }
    }
}

impl Renderer for CommandRenderer {
    fn publish(&mut self, text: &str) {
        // Queue for the worker; a send error means the worker is gone and
        // the host is shutting down.
        let _ = self.jobs.send(text.to_string());
    }

    fn poll_events(&mut self) -> Vec<RendererEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for_events(renderer: &mut CommandRenderer) -> Vec<RendererEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            let events = renderer.poll_events();
            if !events.is_empty() {
                return events;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        Vec::new()
    }

    #[test]
    fn test_attach_requests_initial_render() {
        let mut renderer = CommandRenderer::attach("cat").unwrap();
        assert_eq!(
            renderer.poll_events(),
            vec![RendererEvent::RenderRequested]
        );
        assert!(renderer.poll_events().is_empty(), "request is consumed");
    }

    #[test]
    fn test_attach_rejects_empty_command() {
        assert!(CommandRenderer::attach("   ").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_publish_delivers_rendered_page() {
        let mut renderer = CommandRenderer::attach("cat").unwrap();
        let _ = renderer.poll_events();

        renderer.publish("package demo\n");
        let events = wait_for_events(&mut renderer);
        assert_eq!(
            events,
            vec![RendererEvent::PageRendered("package demo\n".to_string())]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_large_publish_streams_without_stalling() {
        // Well past the pipe buffer size in both directions: the render
        // only completes when stdin is fed while stdout is being drained.
        let mut renderer = CommandRenderer::attach("cat").unwrap();
        let _ = renderer.poll_events();

        let text = "x".repeat(1 << 20);
        renderer.publish(&text);
        let events = wait_for_events(&mut renderer);
        assert_eq!(events, vec![RendererEvent::PageRendered(text)]);
    }

    #[cfg(unix)]
    #[test]
    fn test_renders_complete_in_publish_order() {
        use std::os::unix::fs::PermissionsExt;

        // Renderer that is slow on long input and instant on short input:
        // racing renders would return the second page first.
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("render.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\ninput=$(cat)\nif [ ${#input} -gt 16 ]; then sleep 1; fi\nprintf '%s' \"$input\"\n",
        )
        .unwrap();
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script, perms).unwrap();

        let mut renderer = CommandRenderer::attach(script.to_str().unwrap()).unwrap();
        let _ = renderer.poll_events();

        renderer.publish("the first publish takes longer");
        renderer.publish("short");

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut pages = Vec::new();
        while Instant::now() < deadline && pages.len() < 2 {
            for event in renderer.poll_events() {
                match event {
                    RendererEvent::PageRendered(page) => pages.push(page),
                    other => panic!("unexpected event: {other:?}"),
                }
            }
            std::thread::sleep(Duration::from_millis(20));
        }

        assert_eq!(
            pages,
            vec![
                "the first publish takes longer".to_string(),
                "short".to_string(),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_reports_error() {
        let mut renderer = CommandRenderer::attach("false").unwrap();
        let _ = renderer.poll_events();

        renderer.publish("anything");
        let events = wait_for_events(&mut renderer);
        assert!(matches!(events.as_slice(), [RendererEvent::Failed(_)]));
    }

    #[test]
    fn test_missing_program_reports_error_not_panic() {
        let mut renderer =
            CommandRenderer::attach("livedoc-definitely-not-a-real-renderer").unwrap();
        let _ = renderer.poll_events();

        renderer.publish("anything");
        let events = wait_for_events(&mut renderer);
        assert!(matches!(events.as_slice(), [RendererEvent::Failed(_)]));
    }
}
