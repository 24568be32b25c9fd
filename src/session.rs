use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use adk_session::{
    CreateRequest, GetRequest, InMemorySessionService, SessionService, SqliteSessionService,
};
use anyhow::{Context, Result};
use serde_json::Value;

use crate::agents::specialists::{REVIEW_STATUS_KEY, TRIP_SUMMARY_KEY};
use crate::agents::validator::{ReviewOutcome, evaluate_review};
use crate::cli::SessionBackend;
use crate::config::RuntimeConfig;

pub async fn open_session_service(cfg: &RuntimeConfig) -> Result<Arc<dyn SessionService>> {
    Ok(match cfg.session_backend {
        SessionBackend::Memory => Arc::new(InMemorySessionService::new()),
        SessionBackend::Sqlite => Arc::new(open_sqlite_store(&cfg.session_db_url).await?),
    })
}

/// Open the sqlite store, creating the file and applying migrations.
pub async fn open_sqlite_store(db_url: &str) -> Result<SqliteSessionService> {
    if let Some(path) = sqlite_file_path(db_url) {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).with_context(|| {
                format!("failed to create session directory '{}'", dir.display())
            })?;
        }
        // sqlx refuses to open a missing file without `mode=rwc`.
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to create session file '{}'", path.display()))?;
    }

    let store = SqliteSessionService::new(db_url)
        .await
        .context("failed to open sqlite session store")?;
    store
        .migrate()
        .await
        .context("failed to migrate sqlite session store")?;
    Ok(store)
}

/// File behind a `sqlite://` URL, without query parameters. In-memory and
/// non-sqlite URLs have none.
pub fn sqlite_file_path(db_url: &str) -> Option<PathBuf> {
    let rest = db_url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or_default();
    match path {
        "" | ":memory:" => None,
        path => Some(PathBuf::from(path)),
    }
}

fn get_request(cfg: &RuntimeConfig, session_id: &str) -> GetRequest {
    GetRequest {
        app_name: cfg.app_name.clone(),
        user_id: cfg.user_id.clone(),
        session_id: session_id.to_string(),
        num_recent_events: None,
        after: None,
    }
}

/// Create the configured session unless the store already has it. A
/// resumed sqlite session keeps its earlier trip state.
pub async fn ensure_session(service: &Arc<dyn SessionService>, cfg: &RuntimeConfig) -> Result<()> {
    if service.get(get_request(cfg, &cfg.session_id)).await.is_ok() {
        tracing::debug!(session_id = %cfg.session_id, "resuming trip session");
        return Ok(());
    }

    service
        .create(CreateRequest {
            app_name: cfg.app_name.clone(),
            user_id: cfg.user_id.clone(),
            session_id: Some(cfg.session_id.clone()),
            state: HashMap::new(),
        })
        .await
        .with_context(|| format!("failed to create trip session '{}'", cfg.session_id))?;
    tracing::debug!(session_id = %cfg.session_id, "created trip session");
    Ok(())
}

/// The part of a session's state the reviewed plan writes.
#[derive(Debug, Clone, PartialEq)]
pub struct TripState {
    pub session_id: String,
    pub trip_summary: Option<Value>,
    pub review_status: Option<Value>,
    pub event_count: usize,
}

impl TripState {
    /// What the validation step would say about this state.
    pub fn outcome(&self) -> ReviewOutcome {
        evaluate_review(self.review_status.as_ref(), self.trip_summary.as_ref())
    }
}

pub async fn load_trip_state(
    service: &Arc<dyn SessionService>,
    cfg: &RuntimeConfig,
    session_id: &str,
) -> Result<TripState> {
    let session = service
        .get(get_request(cfg, session_id))
        .await
        .with_context(|| format!("trip session '{session_id}' not found"))?;
    let state = session.state();

    Ok(TripState {
        session_id: session_id.to_string(),
        trip_summary: state.get(TRIP_SUMMARY_KEY),
        review_status: state.get(REVIEW_STATUS_KEY),
        event_count: session.events().len(),
    })
}

fn describe_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => "<unset>".to_string(),
    }
}

pub async fn run_status(cfg: &RuntimeConfig, session_id: Option<String>) -> Result<()> {
    if cfg.session_backend == SessionBackend::Memory {
        anyhow::bail!(
            "in-memory sessions end with the process. Re-run with --session-backend sqlite."
        );
    }

    let session_id = session_id.unwrap_or_else(|| cfg.session_id.clone());
    let service = open_session_service(cfg).await?;
    let trip = load_trip_state(&service, cfg, &session_id).await?;
    let outcome = trip.outcome();

    println!(
        "Session '{}' ({} events, store {})",
        trip.session_id,
        trip.event_count,
        cfg.printable_db_url()
    );
    println!("{TRIP_SUMMARY_KEY}: {}", describe_value(trip.trip_summary.as_ref()));
    println!("{REVIEW_STATUS_KEY}: {}", describe_value(trip.review_status.as_ref()));
    println!("Outcome: {}", outcome.message());
    Ok(())
}
