// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./countdown.toml` > `~/.config/countdown/countdown.toml`
//! > `/etc/countdown/countdown.toml`, with environment variable overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CountdownConfig;

/// Top-level sections, used to split `COUNTDOWN_<SECTION>_<KEY>` names.
const SECTIONS: &[&str] = &[
    "bot",
    "telegram",
    "storage",
    "chats",
    "conversation",
    "prometheus",
];

/// Unprefixed variable names accepted for deployments that predate the
/// `COUNTDOWN_` prefix, and the key each one sets.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("telegram_token", "telegram.bot_token"),
    ("test_chat_id", "chats.fallback_chat_id"),
    ("log_level", "bot.log_level"),
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/countdown/countdown.toml` (system-wide)
/// 3. `~/.config/countdown/countdown.toml` (user XDG config)
/// 4. `./countdown.toml` (local directory)
/// 5. Legacy `TELEGRAM_TOKEN`, `TEST_CHAT_ID`, `LOG_LEVEL`
/// 6. `COUNTDOWN_*` environment variables
pub fn load_config() -> Result<CountdownConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<CountdownConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CountdownConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CountdownConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CountdownConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(CountdownConfig::default()))
        .merge(Toml::file("/etc/countdown/countdown.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("countdown/countdown.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("countdown.toml"))
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// `COUNTDOWN_*` variables, mapped section-first.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `COUNTDOWN_TELEGRAM_BOT_TOKEN` must become
/// `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("COUNTDOWN_").map(|key| map_section_key(key.as_str()).into())
}

fn legacy_env_provider() -> Env {
    let names: Vec<&str> = LEGACY_ENV.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        let lower = key.as_str().to_ascii_lowercase();
        LEGACY_ENV
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, target)| (*target).to_string())
            .unwrap_or(lower)
            .into()
    })
}

/// Maps `telegram_bot_token` to `telegram.bot_token`. Unknown sections pass
/// through unchanged so `deny_unknown_fields` reports them.
fn map_section_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    SECTIONS
        .iter()
        .find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|rest| format!("{section}.{rest}"))
        })
        .unwrap_or(key)
}
