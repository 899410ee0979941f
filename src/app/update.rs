use crate::app::{Model, ToastLevel};

/// All possible events and actions in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Current text was persisted and handed to the renderer
    Published,
    /// A sanitized preview file was written (size in bytes)
    PreviewWritten(usize),
    /// The renderer reported a failure for the last published text
    RendererFailed(String),
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// All state transitions happen here; side effects (reading the editor,
/// persisting, publishing, writing the preview) stay in the event loop.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::Published => {
            model.publish_count += 1;
        }
        Message::PreviewWritten(bytes) => {
            model.preview_count += 1;
            model.last_preview_bytes = bytes;
            model.last_error = None;
            model.show_toast(ToastLevel::Info, format!("Preview updated ({bytes} bytes)"));
        }
        Message::RendererFailed(message) => {
            model.show_toast(ToastLevel::Error, format!("Render failed: {message}"));
            model.last_error = Some(message);
        }
        Message::Quit => {
            model.should_quit = true;
        }
    }
    model
}
