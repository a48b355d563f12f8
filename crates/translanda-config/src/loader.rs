// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./translanda.toml` > `~/.config/translanda/translanda.toml`
//! > `/etc/translanda/translanda.toml`, then the legacy deployment variables
//! (`TELEGRAM_BOT_TOKEN`, `GEMINI_API_KEY`, ...) and finally `TRANSLANDA_*`
//! environment overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TranslandaConfig;

/// Config sections addressable through `TRANSLANDA_<SECTION>_<KEY>`.
const SECTIONS: &[&str] = &[
    "agent",
    "telegram",
    "gemini",
    "search",
    "exchange",
    "memory",
    "knowledge",
    "catalog",
    "liveness",
];

/// Unprefixed variables understood for drop-in deployments, with their config keys.
pub const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("telegram_bot_token", "telegram.bot_token"),
    ("gemini_api_key", "gemini.api_key"),
    ("google_search_api_key", "search.api_key"),
    ("google_search_engine_id", "search.engine_id"),
    ("logo_url", "telegram.logo_url"),
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/translanda/translanda.toml` (system-wide)
/// 3. `~/.config/translanda/translanda.toml` (user XDG config)
/// 4. `./translanda.toml` (local directory)
/// 5. Legacy unprefixed variables
/// 6. `TRANSLANDA_*` environment variables
pub fn load_config() -> Result<TranslandaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TranslandaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TranslandaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TranslandaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TranslandaConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TranslandaConfig::default()))
        .merge(Toml::file("/etc/translanda/translanda.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("translanda/translanda.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("translanda.toml"))
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// Map a lowercased, prefix-stripped variable name to a dotted config key.
///
/// Only the leading section is split off, so `memory_max_lines` becomes
/// `memory.max_lines` rather than `memory.max.lines`. The nested contact
/// table of the catalog gets one more level.
pub fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            if *section == "catalog"
                && let Some(field) = rest.strip_prefix("contact_")
            {
                return format!("catalog.contact.{field}");
            }
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

fn env_provider() -> Env {
    Env::prefixed("TRANSLANDA_").map(|key| map_env_key(key.as_str()).into())
}

fn legacy_env_provider() -> Env {
    let names: Vec<&str> = LEGACY_ENV_KEYS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        LEGACY_ENV_KEYS
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, target)| (*target).to_string())
            .unwrap_or_else(|| key.as_str().to_string())
            .into()
    })
}
