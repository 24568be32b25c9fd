use std::sync::Arc;

use adk_rust::model::MockLlm;
use anyhow::Result;
use clap::Parser;
use serde_json::json;
use tracing::level_filters::LevelFilter;

use trip_planner::cli::{Cli, Commands, trip_request_text};
use trip_planner::config::{load_profiles, resolve_runtime_config};
use trip_planner::doctor::run_doctor;
use trip_planner::error::{categorize_error, format_cli_error};
use trip_planner::runner::run_plan;
use trip_planner::session::run_status;
use trip_planner::telemetry::TelemetrySink;
use trip_planner::workflow::{build_plan_agent, run_agents_show};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let show_sensitive_config = cli.show_sensitive_config;
    if let Err(err) = run_cli(cli).await {
        eprintln!("{}", format_cli_error(&err, show_sensitive_config));
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(log_filter: &str) -> Result<()> {
    let level = log_filter
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_env_filter(log_filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))
}

async fn run_cli(cli: Cli) -> Result<()> {
    init_tracing(&cli.log_filter)?;
    let profiles = load_profiles(&cli.config_path)?;
    let cfg = resolve_runtime_config(&cli, &profiles)?;
    let telemetry = TelemetrySink::new(&cfg, cli.command.label(cfg.plan_mode));

    let outcome = match cli.command {
        Commands::Plan { request, .. } => match trip_request_text(&request) {
            Ok(request) => run_plan(&cfg, &request, &telemetry)
                .await
                .map(|answer| println!("{answer}")),
            Err(err) => Err(err),
        },
        Commands::Agents { .. } => {
            // Never run, so no provider credentials are needed.
            let preview_model = Arc::new(MockLlm::new("agent-tree-preview"));
            build_plan_agent(cfg.plan_mode, preview_model)
                .map(|agent| run_agents_show(cfg.plan_mode, agent.as_ref()))
        }
        Commands::Status { session_id } => run_status(&cfg, session_id).await,
        Commands::Doctor => run_doctor(&cfg).await,
    };

    match &outcome {
        Ok(()) => telemetry.emit("command.completed", json!({})),
        Err(err) => {
            let category = categorize_error(err);
            tracing::error!(%category, error = %err, "command failed");
            telemetry.emit("command.failed", json!({ "category": category.code() }));
        }
    }
    outcome
}
