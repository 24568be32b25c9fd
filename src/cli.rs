use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Auto,
    Gemini,
    Openai,
    Anthropic,
    Deepseek,
    Groq,
    Ollama,
}

/// How the trip planner composes its specialist agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanMode {
    /// LLM coordinator that transfers control to the specialists.
    Coordinator,
    /// LLM coordinator that calls the specialists as tools.
    Tools,
    /// Sightseeing, then flight + hotel in parallel, then a summary.
    Pipeline,
    /// Pipeline followed by a reviewer and the pass/fail validation step.
    Reviewed,
}

impl PlanMode {
    pub fn label(self) -> &'static str {
        match self {
            PlanMode::Coordinator => "coordinator",
            PlanMode::Tools => "tools",
            PlanMode::Pipeline => "pipeline",
            PlanMode::Reviewed => "reviewed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    Memory,
    Sqlite,
}

const CLI_EXAMPLES: &str = "Examples:\n\
  trip-planner plan \"Plan a trip to Paris including flight, hotel, and sightseeing.\"\n\
  trip-planner plan --mode pipeline \"Three days in Lisbon in May\"\n\
  trip-planner --provider gemini --model gemini-2.0-flash plan --mode tools \"Weekend in Rome\"\n\
  trip-planner agents --mode reviewed\n\
  trip-planner --session-backend sqlite plan \"Kyoto in autumn\"\n\
  trip-planner --session-backend sqlite status\n\
\n\
Plan modes:\n\
  - coordinator: TripPlanner transfers to FlightAgent, HotelAgent, SightseeingAgent.\n\
  - tools: TripPlanner calls the specialists as tools, in sequence.\n\
  - pipeline: SightseeingAgent, then FlightAgent + HotelAgent in parallel, then a summary.\n\
  - reviewed: pipeline plus a reviewer and a pass/fail validation step (default).";

#[derive(Debug, Parser)]
#[command(name = "trip-planner")]
#[command(about = "Multi-agent trip planner built on ADK-Rust")]
#[command(after_long_help = CLI_EXAMPLES)]
pub struct Cli {
    #[arg(long, env = "TRIP_PLANNER_PROVIDER", value_enum, default_value_t = Provider::Auto)]
    pub provider: Provider,

    #[arg(long, env = "TRIP_PLANNER_MODEL")]
    pub model: Option<String>,

    #[arg(long, env = "TRIP_PLANNER_PROFILE", default_value = "default")]
    pub profile: String,

    #[arg(
        long,
        env = "TRIP_PLANNER_CONFIG",
        default_value = ".trip-planner/config.toml"
    )]
    pub config_path: String,

    #[arg(long, env = "TRIP_PLANNER_USER_ID")]
    pub user_id: Option<String>,

    #[arg(long, env = "TRIP_PLANNER_SESSION_ID")]
    pub session_id: Option<String>,

    #[arg(long, env = "TRIP_PLANNER_SESSION_BACKEND", value_enum)]
    pub session_backend: Option<SessionBackend>,

    #[arg(long, env = "TRIP_PLANNER_SESSION_DB_URL")]
    pub session_db_url: Option<String>,

    #[arg(long, env = "TRIP_PLANNER_SHOW_SENSITIVE_CONFIG", default_value_t = false)]
    pub show_sensitive_config: bool,

    #[arg(long, env = "TRIP_PLANNER_TELEMETRY_PATH")]
    pub telemetry_path: Option<String>,

    #[arg(long, env = "RUST_LOG", default_value = "error")]
    pub log_filter: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Plan a trip with the multi-agent workflow and print the final response")]
    Plan {
        #[arg(long, value_enum)]
        mode: Option<PlanMode>,
        #[arg(required = true)]
        request: Vec<String>,
    },
    #[command(about = "Print the agent tree of a plan mode without calling a model")]
    Agents {
        #[arg(long, value_enum)]
        mode: Option<PlanMode>,
    },
    #[command(about = "Show the trip summary and review verdict stored in a planning session")]
    Status {
        #[arg(long)]
        session_id: Option<String>,
    },
    #[command(about = "Check provider credentials and the session store")]
    Doctor,
}

impl Commands {
    /// Mode requested on the command line, if the command takes one.
    pub fn requested_mode(&self) -> Option<PlanMode> {
        match self {
            Commands::Plan { mode, .. } | Commands::Agents { mode } => *mode,
            Commands::Status { .. } | Commands::Doctor => None,
        }
    }

    /// Telemetry label. Plan runs carry the resolved mode so command records
    /// line up with `plan.completed`.
    pub fn label(&self, plan_mode: PlanMode) -> String {
        match self {
            Commands::Plan { .. } => format!("plan.{}", plan_mode.label()),
            Commands::Agents { .. } => format!("agents.{}", plan_mode.label()),
            Commands::Status { .. } => "status".to_string(),
            Commands::Doctor => "doctor".to_string(),
        }
    }
}

/// Join the words of a `plan` request, rejecting a request with no text.
pub fn trip_request_text(words: &[String]) -> anyhow::Result<String> {
    let request = words.join(" ");
    let request = request.trim();
    if request.is_empty() {
        anyhow::bail!("trip request cannot be empty. Describe the trip to plan.");
    }
    Ok(request.to_string())
}
