//! Livedoc - a live documentation preview driver.
//!
//! # Usage
//!
//! ```bash
//! livedoc input.go --renderer godoc-render
//! livedoc input.go --renderer godoc-render --out preview.html
//! livedoc input.go --renderer godoc-render --once
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use livedoc::app::App;
use livedoc::config::{
    ConfigFlags, clear_config_flags, default_store_path, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use livedoc::perf;
use livedoc::trigger::{DEFAULT_QUIESCENCE_MS, DEFAULT_RETRY_MS};

/// A live documentation preview driver
#[derive(Parser, Debug)]
#[command(name = "livedoc", version, about, long_about = None)]
struct Cli {
    /// Source file to watch
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Renderer command (receives source on stdin, emits the page on stdout)
    #[arg(short, long, value_name = "CMD")]
    renderer: Option<String>,

    /// Where to write the rendered preview
    #[arg(short, long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Session store file (defaults to the per-user config directory)
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Pause length in ms after the last edit before the preview refreshes
    #[arg(long, value_name = "MS")]
    quiescence_ms: Option<u64>,

    /// Interval in ms between retries of a render requested before startup
    /// finishes
    #[arg(long, value_name = "MS")]
    retry_ms: Option<u64>,

    /// Render once and exit instead of watching for changes
    #[arg(long)]
    once: bool,

    /// Enable startup performance logging
    #[arg(long)]
    perf: bool,

    /// Write detailed pipeline debug events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults in .livedocrc
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in .livedocrc
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("LIVEDOC_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        eprintln!(
            "[warn] Failed to initialize pipeline debug log {}: {}",
            render_debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            err
        );
    }

    let renderer = effective
        .renderer
        .clone()
        .context("No renderer command configured (pass --renderer or save one with --save)")?;
    let store_path = effective.store.clone().unwrap_or_else(default_store_path);
    let preview_path = effective
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from("preview.html"));

    let app = App::new(cli.file, renderer, store_path)
        .with_preview_path(preview_path)
        .with_quiescence_ms(effective.quiescence_ms.unwrap_or(DEFAULT_QUIESCENCE_MS))
        .with_retry_ms(effective.retry_ms.unwrap_or(DEFAULT_RETRY_MS))
        .with_once(effective.once);

    app.run().context("Application error")
}
