use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::{Cli, PlanMode, Provider, SessionBackend};

pub const APP_NAME: &str = "trip-planner";
pub const DEFAULT_USER_ID: &str = "traveller";
pub const DEFAULT_SESSION_ID: &str = "trip";
pub const DEFAULT_SESSION_DB_URL: &str = "sqlite://.trip-planner/sessions.db";
pub const DEFAULT_TELEMETRY_PATH: &str = ".trip-planner/telemetry.jsonl";

/// Everything a command needs once flags, the selected profile and defaults
/// have been merged.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub profile: String,
    pub provider: Provider,
    pub model: Option<String>,
    pub plan_mode: PlanMode,
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
    pub session_backend: SessionBackend,
    pub session_db_url: String,
    pub show_sensitive_config: bool,
    /// `None` when telemetry is switched off.
    pub telemetry_path: Option<PathBuf>,
}

impl RuntimeConfig {
    /// Session DB URL as it may be printed.
    pub fn printable_db_url(&self) -> String {
        if self.show_sensitive_config {
            self.session_db_url.clone()
        } else {
            crate::error::redact_sqlite_url_value(&self.session_db_url)
        }
    }
}

/// Contents of `.trip-planner/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerProfiles {
    #[serde(default)]
    pub profiles: BTreeMap<String, PlannerProfile>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerProfile {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub plan_mode: Option<PlanMode>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub session_backend: Option<SessionBackend>,
    pub session_db_url: Option<String>,
    pub telemetry: Option<bool>,
    pub telemetry_path: Option<String>,
}

/// Read the profile file. A missing file is the same as an empty one.
pub fn load_profiles(path: impl AsRef<Path>) -> Result<PlannerProfiles> {
    let path = path.as_ref();
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(PlannerProfiles::default());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read profile file '{}'", path.display()));
        }
    };

    toml::from_str(&raw).with_context(|| {
        format!(
            "invalid profile configuration in '{}'. Known keys: provider, model, plan_mode, \
             user_id, session_id, session_backend, session_db_url, telemetry, telemetry_path",
            path.display()
        )
    })
}

impl PlannerProfiles {
    /// Look up a profile by name. `default` always exists, even when the
    /// file does not define it.
    pub fn select(&self, name: &str, config_path: &str) -> Result<PlannerProfile> {
        if let Some(profile) = self.profiles.get(name) {
            return Ok(profile.clone());
        }
        if name == "default" {
            return Ok(PlannerProfile::default());
        }

        let known = self.profiles.keys().cloned().collect::<Vec<_>>();
        if known.is_empty() {
            anyhow::bail!(
                "profile '{name}' not found in '{config_path}'. No profiles are defined yet."
            );
        }
        anyhow::bail!(
            "profile '{name}' not found in '{config_path}'. Available profiles: {}",
            known.join(", ")
        )
    }
}

/// Merge order: command-line flag (or its env var), then the profile, then
/// the built-in default.
pub fn resolve_runtime_config(cli: &Cli, profiles: &PlannerProfiles) -> Result<RuntimeConfig> {
    let name = cli.profile.trim();
    if name.is_empty() {
        anyhow::bail!("profile name cannot be empty. Set --profile <name>.");
    }
    let profile = profiles.select(name, &cli.config_path)?;

    let provider = match cli.provider {
        Provider::Auto => profile.provider.unwrap_or(Provider::Auto),
        chosen => chosen,
    };
    let plan_mode = cli
        .command
        .requested_mode()
        .or(profile.plan_mode)
        .unwrap_or(PlanMode::Reviewed);

    let telemetry_path = match profile.telemetry {
        Some(false) if cli.telemetry_path.is_none() => None,
        _ => Some(PathBuf::from(
            cli.telemetry_path
                .clone()
                .or(profile.telemetry_path)
                .unwrap_or_else(|| DEFAULT_TELEMETRY_PATH.to_string()),
        )),
    };

    Ok(RuntimeConfig {
        profile: name.to_string(),
        provider,
        model: cli.model.clone().or(profile.model),
        plan_mode,
        app_name: APP_NAME.to_string(),
        user_id: cli
            .user_id
            .clone()
            .or(profile.user_id)
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
        session_id: cli
            .session_id
            .clone()
            .or(profile.session_id)
            .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string()),
        session_backend: cli
            .session_backend
            .or(profile.session_backend)
            .unwrap_or(SessionBackend::Memory),
        session_db_url: cli
            .session_db_url
            .clone()
            .or(profile.session_db_url)
            .unwrap_or_else(|| DEFAULT_SESSION_DB_URL.to_string()),
        show_sensitive_config: cli.show_sensitive_config,
        telemetry_path,
    })
}
