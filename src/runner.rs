use std::sync::Arc;

use adk_rust::futures::StreamExt;
use adk_rust::prelude::*;
use adk_rust::{SessionId, UserId};
use adk_session::SessionService;
use anyhow::{Context, Result};
use serde_json::json;

use crate::cli::PlanMode;
use crate::config::RuntimeConfig;
use crate::provider::resolve_model;
use crate::session::{ensure_session, open_session_service};
use crate::telemetry::TelemetrySink;
use crate::transcript::{PlanTranscript, report_tool_activity, tool_activity};
use crate::workflow::build_plan_agent;

pub async fn build_runner(
    agent: Arc<dyn Agent>,
    cfg: &RuntimeConfig,
    session_service: Arc<dyn SessionService>,
) -> Result<Runner> {
    ensure_session(&session_service, cfg).await?;

    Runner::new(RunnerConfig {
        app_name: cfg.app_name.clone(),
        agent,
        session_service,
        artifact_service: Some(Arc::new(InMemoryArtifactService::new())),
        memory_service: None,
        plugin_manager: None,
        run_config: None,
        compaction_config: None,
        context_cache_config: None,
        cache_capable: None,
        request_context: None,
        cancellation_token: None,
    })
    .context("failed to build trip planner runner")
}

/// Send one request through the runner and fold the resulting events.
pub async fn drive_plan(
    runner: &Runner,
    cfg: &RuntimeConfig,
    request: &str,
    telemetry: &TelemetrySink,
) -> Result<PlanTranscript> {
    let user_id = UserId::try_from(cfg.user_id.as_str())
        .with_context(|| format!("invalid user id '{}'", cfg.user_id))?;
    let session_id = SessionId::try_from(cfg.session_id.as_str())
        .with_context(|| format!("invalid session id '{}'", cfg.session_id))?;

    let mut events = runner
        .run(user_id, session_id, Content::new("user").with_text(request))
        .await
        .context("failed to start the trip planner run")?;

    let mut transcript = PlanTranscript::default();
    while let Some(event) = events.next().await {
        let event = event.context("trip planner agent failed mid-run")?;
        tracing::debug!(
            author = %event.author,
            partial = event.llm_response.partial,
            is_final = event.is_final_response(),
            "plan event"
        );

        for activity in tool_activity(&event) {
            report_tool_activity(&event.author, &activity, telemetry);
        }
        transcript.record(&event);
    }

    Ok(transcript)
}

/// Run `request` through an already built plan agent and return the answer.
pub async fn run_plan_with_agent(
    agent: Arc<dyn Agent>,
    mode: PlanMode,
    cfg: &RuntimeConfig,
    request: &str,
    telemetry: &TelemetrySink,
) -> Result<String> {
    let agent_name = agent.name().to_string();
    let session_service = open_session_service(cfg).await?;
    let runner = build_runner(agent, cfg, session_service).await?;

    tracing::info!(mode = mode.label(), agent = %agent_name, session_id = %cfg.session_id, "planning trip");
    let transcript = drive_plan(&runner, cfg, request, telemetry).await?;
    let answer = transcript.final_response();
    let answered_by = transcript
        .last_turn()
        .map(|turn| turn.author.clone())
        .unwrap_or_default();

    tracing::info!(mode = mode.label(), answered_by = %answered_by, "trip plan finished");
    telemetry.emit(
        "plan.completed",
        json!({
            "mode": mode.label(),
            "agent": agent_name,
            "answered_by": answered_by,
            "turns": transcript.turns().len(),
            "response_chars": answer.chars().count(),
        }),
    );
    Ok(answer)
}

pub async fn run_plan(cfg: &RuntimeConfig, request: &str, telemetry: &TelemetrySink) -> Result<String> {
    let (model, provider, model_name) = resolve_model(cfg)?;
    tracing::info!(?provider, model = %model_name, "resolved model");
    telemetry.emit(
        "model.resolved",
        json!({
            "provider": format!("{provider:?}").to_ascii_lowercase(),
            "model": model_name,
        }),
    );

    let agent = build_plan_agent(cfg.plan_mode, model)?;
    run_plan_with_agent(agent, cfg.plan_mode, cfg, request, telemetry).await
}
