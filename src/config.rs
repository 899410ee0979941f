//! Saved defaults for the command line.
//!
//! Flags live in a global config file plus an optional `.livedocrc` in the
//! working directory, as bare CLI tokens, one or more per line. Both files
//! and the real command line go through the same tokenizer and merge by
//! union, CLI values winning.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub once: bool,
    pub perf: bool,
    pub renderer: Option<String>,
    pub out: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub quiescence_ms: Option<u64>,
    pub retry_ms: Option<u64>,
    pub render_debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            once: self.once || other.once,
            perf: self.perf || other.perf,
            renderer: other.renderer.clone().or_else(|| self.renderer.clone()),
            out: other.out.clone().or_else(|| self.out.clone()),
            store: other.store.clone().or_else(|| self.store.clone()),
            quiescence_ms: other.quiescence_ms.or(self.quiescence_ms),
            retry_ms: other.retry_ms.or(self.retry_ms),
            render_debug_log: other
                .render_debug_log
                .clone()
                .or_else(|| self.render_debug_log.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("livedoc").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("livedoc")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("livedoc").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("livedoc")
                .join("config");
        }
    }

    PathBuf::from(".livedocrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".livedocrc")
}

/// Where the session store lives unless `--store` overrides it: next to the
/// global config file.
pub fn default_store_path() -> PathBuf {
    let mut path = global_config_path();
    path.set_file_name("session.json");
    path
}

/// Load flags from a config file; a missing file yields defaults.
///
/// # Errors
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Persist flags as defaults.
///
/// # Errors
/// Returns an error if the config file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# livedoc defaults (saved with --save)".to_string());
    if flags.once {
        lines.push("--once".to_string());
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(renderer) = &flags.renderer {
        lines.push(format!("--renderer {renderer}"));
    }
    if let Some(out) = &flags.out {
        lines.push(format!("--out {}", out.display()));
    }
    if let Some(store) = &flags.store {
        lines.push(format!("--store {}", store.display()));
    }
    if let Some(ms) = flags.quiescence_ms {
        lines.push(format!("--quiescence-ms {ms}"));
    }
    if let Some(ms) = flags.retry_ms {
        lines.push(format!("--retry-ms {ms}"));
    }
    if let Some(path) = &flags.render_debug_log {
        lines.push(format!("--render-debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove saved defaults.
///
/// # Errors
/// Returns an error if the config file cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--once" {
            flags.once = true;
        } else if token == "--perf" {
            flags.perf = true;
        } else if let Some(value) = flag_value(tokens, &mut i, "--renderer") {
            flags.renderer = Some(value);
        } else if let Some(value) = flag_value(tokens, &mut i, "--out") {
            flags.out = Some(PathBuf::from(value));
        } else if let Some(value) = flag_value(tokens, &mut i, "--store") {
            flags.store = Some(PathBuf::from(value));
        } else if let Some(value) = flag_value(tokens, &mut i, "--quiescence-ms") {
            flags.quiescence_ms = value.parse().ok();
        } else if let Some(value) = flag_value(tokens, &mut i, "--retry-ms") {
            flags.retry_ms = value.parse().ok();
        } else if let Some(value) = flag_value(tokens, &mut i, "--render-debug-log") {
            flags.render_debug_log = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

// Accepts both `--flag value` and `--flag=value`; advances `i` past a
// consumed separate value.
fn flag_value(tokens: &[String], i: &mut usize, name: &str) -> Option<String> {
    let token = &tokens[*i];
    if token == name {
        if let Some(next) = tokens.get(*i + 1) {
            *i += 1;
            return Some(next.clone());
        }
        return None;
    }
    token
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix('='))
        .map(ToOwned::to_owned)
}
