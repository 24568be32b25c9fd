//! Final pass/fail gate of the reviewed workflow.
//!
//! Reads the reviewer's verdict from session state and turns it into one of
//! two fixed messages. It never calls a model.

use std::sync::Arc;

use adk_rust::futures::stream;
use adk_rust::prelude::*;
use adk_rust::{EventStream, InvocationContext, ReadonlyContext};
use async_trait::async_trait;
use serde_json::Value;

use super::specialists::{REVIEW_STATUS_KEY, TRIP_SUMMARY_KEY};

pub const VALIDATOR_NAME: &str = "ValidateTripSummary";
pub const VALIDATOR_DESCRIPTION: &str =
    "Validates the trip summary review status and provides feedback based on the review outcome.";

pub const PASS_VERDICT: &str = "pass";
/// Verdict assumed when the reviewer wrote nothing usable.
pub const DEFAULT_VERDICT: &str = "fail";
pub const REVIEW_PASSED_PREFIX: &str = "Trip summary review passed: ";
pub const REVIEW_FAILED_MESSAGE: &str =
    "Trip summary review failed. Please provide a valid requirements";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    Passed { summary: String },
    Failed { verdict: String },
}

impl ReviewOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, ReviewOutcome::Passed { .. })
    }

    pub fn verdict(&self) -> &str {
        match self {
            ReviewOutcome::Passed { .. } => PASS_VERDICT,
            ReviewOutcome::Failed { verdict } => verdict,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ReviewOutcome::Passed { summary } => format!("{REVIEW_PASSED_PREFIX}{summary}"),
            ReviewOutcome::Failed { .. } => REVIEW_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Decide the review outcome from the raw `review_status` and `trip_summary`
/// state values.
///
/// A missing or non-string status counts as [`DEFAULT_VERDICT`]. Surrounding
/// whitespace is ignored; anything other than `pass` fails.
pub fn evaluate_review(status: Option<&Value>, summary: Option<&Value>) -> ReviewOutcome {
    let verdict = status
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or(DEFAULT_VERDICT);

    if verdict != PASS_VERDICT {
        return ReviewOutcome::Failed {
            verdict: verdict.to_string(),
        };
    }

    let summary = match summary {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    ReviewOutcome::Passed { summary }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ValidateTripSummary;

impl ValidateTripSummary {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for ValidateTripSummary {
    fn name(&self) -> &str {
        VALIDATOR_NAME
    }

    fn description(&self) -> &str {
        VALIDATOR_DESCRIPTION
    }

    fn sub_agents(&self) -> &[Arc<dyn Agent>] {
        &[]
    }

    async fn run(&self, ctx: Arc<dyn InvocationContext>) -> adk_rust::Result<EventStream> {
        let state = ctx.session().state();
        let status = state.get(REVIEW_STATUS_KEY);
        let summary = state.get(TRIP_SUMMARY_KEY);
        let outcome = evaluate_review(status.as_ref(), summary.as_ref());

        tracing::info!(
            agent = VALIDATOR_NAME,
            verdict = outcome.verdict(),
            passed = outcome.passed(),
            "Trip summary review evaluated"
        );

        let mut event = Event::new(ctx.invocation_id());
        event.author = VALIDATOR_NAME.to_string();
        event.llm_response.content = Some(Content::new("model").with_text(outcome.message()));

        Ok(Box::pin(stream::iter(vec![Ok(event)])))
    }
}
