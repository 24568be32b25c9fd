//! Folding the runner's event stream into the answer of a plan run.
//!
//! Several agents speak during one plan (specialists, summary, reviewer,
//! validator). The answer shown to the user is the last completed turn of
//! whichever agent spoke last.

use std::collections::HashMap;

use adk_rust::prelude::*;
use serde_json::{Value, json};

use crate::telemetry::TelemetrySink;

pub const NO_TEXTUAL_RESPONSE: &str = "No textual response produced by the trip planner.";

/// One completed agent turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTurn {
    pub author: String,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct PlanTranscript {
    turns: Vec<AgentTurn>,
    /// Streamed chunks not yet closed by a complete event, per author.
    pending: HashMap<String, String>,
    last_pending_author: Option<String>,
}

impl PlanTranscript {
    pub fn record(&mut self, event: &Event) {
        if event.author == "user" {
            return;
        }

        let text = event_text(event);
        if event.llm_response.partial {
            if !text.is_empty() {
                self.pending
                    .entry(event.author.clone())
                    .or_default()
                    .push_str(&text);
                self.last_pending_author = Some(event.author.clone());
            }
            return;
        }

        // A complete event repeats the whole turn; fall back to the streamed
        // chunks when it arrives without text.
        let streamed = self.pending.remove(&event.author).unwrap_or_default();
        let text = if text.trim().is_empty() { streamed } else { text };

        if event.is_final_response() && !text.trim().is_empty() {
            self.turns.push(AgentTurn {
                author: event.author.clone(),
                text: text.trim().to_string(),
            });
        }
    }

    /// Completed turns in the order they finished.
    pub fn turns(&self) -> &[AgentTurn] {
        &self.turns
    }

    pub fn last_turn(&self) -> Option<&AgentTurn> {
        self.turns.last()
    }

    pub fn final_response(&self) -> String {
        if let Some(turn) = self.last_turn() {
            return turn.text.clone();
        }

        self.last_pending_author
            .as_ref()
            .and_then(|author| self.pending.get(author))
            .map(|text| text.trim())
            .filter(|text| !text.is_empty())
            .unwrap_or(NO_TEXTUAL_RESPONSE)
            .to_string()
    }
}

pub fn event_text(event: &Event) -> String {
    let Some(content) = event.content() else {
        return String::new();
    };
    content
        .parts
        .iter()
        .filter_map(|part| match part {
            Part::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// A specialist invoked as a tool, seen from the coordinator's events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolActivity {
    Requested { tool: String },
    Succeeded { tool: String },
    Failed { tool: String, error: String },
}

pub fn tool_activity(event: &Event) -> Vec<ToolActivity> {
    let Some(content) = event.content() else {
        return Vec::new();
    };

    content
        .parts
        .iter()
        .filter_map(|part| match part {
            Part::FunctionCall { name, .. } => Some(ToolActivity::Requested { tool: name.clone() }),
            Part::FunctionResponse {
                function_response, ..
            } => {
                let tool = function_response.name.clone();
                Some(match tool_failure(&function_response.response) {
                    Some(error) => ToolActivity::Failed { tool, error },
                    None => ToolActivity::Succeeded { tool },
                })
            }
            _ => None,
        })
        .collect()
}

/// Error text carried by a tool response, if it reports a failure.
pub fn tool_failure(response: &Value) -> Option<String> {
    if let Some(error) = response.get("error").and_then(Value::as_str) {
        return Some(error.to_string());
    }

    let failed = response
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|status| {
            status.eq_ignore_ascii_case("error") || status.eq_ignore_ascii_case("failed")
        });
    if failed {
        return response
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
    }
    None
}

pub fn report_tool_activity(author: &str, activity: &ToolActivity, telemetry: &TelemetrySink) {
    match activity {
        ToolActivity::Requested { tool } => {
            tracing::info!(%tool, %author, "specialist tool requested");
            telemetry.emit("tool.requested", json!({ "tool": tool, "author": author }));
        }
        ToolActivity::Succeeded { tool } => {
            tracing::info!(%tool, %author, "specialist tool completed");
            telemetry.emit("tool.succeeded", json!({ "tool": tool, "author": author }));
        }
        ToolActivity::Failed { tool, error } => {
            tracing::warn!(%tool, %author, %error, "specialist tool failed");
            telemetry.emit(
                "tool.failed",
                json!({ "tool": tool, "author": author, "error": error }),
            );
        }
    }
}
