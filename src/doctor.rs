use std::sync::Arc;

use adk_rust::model::MockLlm;
use anyhow::Result;

use crate::cli::{Provider, SessionBackend};
use crate::config::RuntimeConfig;
use crate::provider::{
    PROVIDER_ENV, default_model_for_provider, detect_provider, env_present,
    validate_model_for_provider,
};
use crate::session::open_sqlite_store;
use crate::workflow::{build_plan_agent, describe_agent_tree};

/// Provider the next `plan` would use, or `None` when auto-detection finds
/// no credentials.
pub fn effective_provider(cfg: &RuntimeConfig) -> Option<Provider> {
    match cfg.provider {
        Provider::Auto => detect_provider(),
        chosen => Some(chosen),
    }
}

pub async fn run_doctor(cfg: &RuntimeConfig) -> Result<()> {
    println!("Profile: {}", cfg.profile);

    println!("Credentials:");
    for (provider, key) in PROVIDER_ENV {
        let state = if env_present(key) { "set" } else { "missing" };
        println!("  {key:<18} {state:<8} ({provider:?})");
    }

    match effective_provider(cfg) {
        Some(provider) => {
            let model = cfg
                .model
                .clone()
                .unwrap_or_else(|| default_model_for_provider(provider).to_string());
            let verdict = match validate_model_for_provider(provider, &model) {
                Ok(()) => "ok".to_string(),
                Err(err) => err.to_string(),
            };
            println!("Model: {provider:?} / {model} ({verdict})");
        }
        None => println!("Model: none detected. Export GOOGLE_API_KEY or pass --provider ollama."),
    }

    let preview = build_plan_agent(cfg.plan_mode, Arc::new(MockLlm::new("doctor")))?;
    println!(
        "Plan mode: {} ({} agents)",
        cfg.plan_mode.label(),
        describe_agent_tree(preview.as_ref()).len()
    );

    match cfg.session_backend {
        SessionBackend::Memory => {
            println!("Sessions: memory (trip state is lost when the command exits)");
        }
        SessionBackend::Sqlite => {
            open_sqlite_store(&cfg.session_db_url).await?;
            println!("Sessions: sqlite {} (ok)", cfg.printable_db_url());
        }
    }

    match &cfg.telemetry_path {
        Some(path) => println!("Telemetry: {}", path.display()),
        None => println!("Telemetry: off"),
    }
    Ok(())
}
