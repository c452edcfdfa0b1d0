use std::{fs, path::Path, str::FromStr};

use anyhow::Context;
use behavior_core::BehaviorConfig;
use tracing::{debug, warn};

const DEFAULT_CONFIG_FILE: &str = "page.toml";

/// Defaults, then `page.toml` (or the file given on the command line), then
/// `APP__*` environment variables.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<BehaviorConfig> {
    let mut settings = match path {
        Some(path) => read_config_file(path)?,
        None => match fs::read_to_string(DEFAULT_CONFIG_FILE) {
            Ok(raw) => toml::from_str(&raw).unwrap_or_else(|err| {
                warn!(error = %err, "config: ignoring unparsable {DEFAULT_CONFIG_FILE}");
                BehaviorConfig::default()
            }),
            Err(_) => BehaviorConfig::default(),
        },
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn read_config_file(path: &Path) -> anyhow::Result<BehaviorConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config '{}'", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse config '{}'", path.display()))
}

pub fn apply_env_overrides(settings: &mut BehaviorConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("APP__LOCATION") {
        settings.location = v;
    }
    if let Some(v) = lookup("APP__FORM_ID") {
        settings.form_id = v;
    }
    if let Some(v) = lookup("APP__CONSENT_ID") {
        settings.consent_id = v;
    }
    if let Some(v) = lookup("APP__SUCCESS_HREF") {
        settings.success_href = v;
    }
    if let Some(v) = lookup("APP__BUSY_LABEL") {
        settings.busy_label = v;
    }

    if let Some(v) = parse_override(&lookup, "APP__SUBMIT_DELAY_MS") {
        settings.submit_delay_ms = v;
    }
    if let Some(v) = parse_override(&lookup, "APP__RESIZE_DEBOUNCE_MS") {
        settings.resize_debounce_ms = v;
    }
    if let Some(v) = parse_override(&lookup, "APP__DESKTOP_BREAKPOINT_PX") {
        settings.desktop_breakpoint_px = v;
    }
    if let Some(v) = parse_override(&lookup, "APP__SPY_TOP_OFFSET_PX") {
        settings.spy_top_offset_px = v;
    }
    if let Some(v) = parse_override(&lookup, "APP__SPY_BAND_BOTTOM_PERCENT") {
        settings.spy_band_bottom_percent = v;
    }
}

/// Unparsable values are logged and leave the setting untouched.
fn parse_override<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            debug!(key, value = %raw, "config: ignoring unparsable override");
            None
        }
    }
}
