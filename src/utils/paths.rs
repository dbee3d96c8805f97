use crate::constants::config::{CONFIG_DIR, CONFIG_FILE, ENV_CONFIG_PATH};
use std::env;
use std::path::PathBuf;

fn normalize_env_path(value: Option<String>) -> Option<PathBuf> {
    let raw = value?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_lowercase();
    if lowered == "undefined" || lowered == "null" {
        return None;
    }
    Some(expand_home_path(trimmed))
}

fn resolve_home_dir() -> Option<PathBuf> {
    env::var("HOME").ok().map(PathBuf::from)
}

fn resolve_xdg_config_dir() -> Option<PathBuf> {
    if let Some(path) = normalize_env_path(env::var("XDG_CONFIG_HOME").ok()) {
        return Some(path);
    }
    resolve_home_dir().map(|home| home.join(".config"))
}

pub fn expand_home_path(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = resolve_home_dir() {
            return home;
        }
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

/// `$FAKTUROID_CONFIG_PATH`, else `$XDG_CONFIG_HOME/fakturoid-mcp/config.json`,
/// else `~/.config/fakturoid-mcp/config.json`.
pub fn resolve_config_path() -> PathBuf {
    if let Some(path) = normalize_env_path(env::var(ENV_CONFIG_PATH).ok()) {
        return path;
    }
    resolve_xdg_config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}
