use std::{fs, path::Path, time::Duration};

use portal_core::{UploadSettings, DEFAULT_PROGRESS_INCREMENT};
use toml::{Table, Value};

pub const SETTINGS_FILE: &str = "portal.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tick_interval_ms: u64,
    pub progress_increment: u8,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 160,
            progress_increment: DEFAULT_PROGRESS_INCREMENT,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings::new(
            Duration::from_millis(self.tick_interval_ms),
            self.progress_increment,
        )
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the flat `portal.toml` table, then the environment.
/// File values may be integers or strings; values that do not parse are skipped
/// one at a time.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = raw.parse::<Table>() {
            if let Some(v) = file_cfg.get("tick_interval_ms").and_then(scalar) {
                apply_tick_interval(&mut settings, &v);
            }
            if let Some(v) = file_cfg.get("progress_increment").and_then(scalar) {
                apply_increment(&mut settings, &v);
            }
            if let Some(Value::String(v)) = file_cfg.get("log_filter") {
                settings.log_filter = v.clone();
            }
        }
    }

    if let Some(v) = env("PORTAL_TICK_MS") {
        apply_tick_interval(&mut settings, &v);
    }
    if let Some(v) = env("APP__TICK_INTERVAL_MS") {
        apply_tick_interval(&mut settings, &v);
    }

    if let Some(v) = env("PORTAL_INCREMENT") {
        apply_increment(&mut settings, &v);
    }
    if let Some(v) = env("APP__PROGRESS_INCREMENT") {
        apply_increment(&mut settings, &v);
    }

    if let Some(v) = env("RUST_LOG") {
        if !v.trim().is_empty() {
            settings.log_filter = v;
        }
    }

    settings
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Integer(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn apply_tick_interval(settings: &mut Settings, raw: &str) {
    if let Ok(parsed) = raw.trim().parse::<u64>() {
        settings.tick_interval_ms = parsed.max(1);
    }
}

fn apply_increment(settings: &mut Settings, raw: &str) {
    if let Ok(parsed) = raw.trim().parse::<u8>() {
        settings.progress_increment = parsed.clamp(1, 100);
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
