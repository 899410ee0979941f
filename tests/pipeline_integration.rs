//! End-to-end run of the pipeline in `--once` mode, with `cat` standing in
//! for the renderer command.

#![cfg(unix)]

use livedoc::app::App;

#[test]
fn test_once_mode_renders_seeded_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("input.go");
    let preview = dir.path().join("preview.html");

    let app = App::new(
        source.clone(),
        "cat".to_string(),
        dir.path().join("session.json"),
    )
    .with_preview_path(preview.clone())
    .with_retry_ms(10)
    .with_once(true);

    app.run().unwrap();

    assert!(source.exists(), "missing source file is seeded");
    let page = std::fs::read_to_string(&preview).unwrap();
    assert!(
        page.contains("package mypackage"),
        "preview carries the placeholder default through the renderer"
    );
}

#[test]
fn test_once_mode_uses_existing_source_text() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("input.go");
    std::fs::write(&source, "package existing\n").unwrap();
    let preview = dir.path().join("preview.html");

    let app = App::new(
        source,
        "cat".to_string(),
        dir.path().join("session.json"),
    )
    .with_preview_path(preview.clone())
    .with_retry_ms(10)
    .with_once(true);

    app.run().unwrap();

    let page = std::fs::read_to_string(&preview).unwrap();
    assert_eq!(page, "package existing\n");

    // The publish also persisted the session.
    let session = std::fs::read_to_string(dir.path().join("session.json")).unwrap();
    assert!(session.contains("package existing"));
}

#[test]
fn test_once_mode_renderer_failure_is_an_error() {
    let dir = tempfile::tempdir().unwrap();

    let app = App::new(
        dir.path().join("input.go"),
        "false".to_string(),
        dir.path().join("session.json"),
    )
    .with_preview_path(dir.path().join("preview.html"))
    .with_retry_ms(10)
    .with_once(true);

    let err = app.run().unwrap_err();
    assert!(err.to_string().contains("renderer failed"));
}
