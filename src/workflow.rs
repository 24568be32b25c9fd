use std::sync::Arc;

use adk_rust::prelude::*;
use adk_tool::AgentTool;
use anyhow::Result;

use crate::agents::specialists::{
    build_flight_agent, build_hotel_agent, build_sightseeing_agent, build_trip_summary_agent,
    build_trip_summary_reviewer,
};
use crate::agents::validator::ValidateTripSummary;
use crate::cli::PlanMode;

pub const TRIP_PLANNER_NAME: &str = "TripPlanner";
pub const PARALLEL_TRIP_PLANNER_NAME: &str = "ParallelTripPlanner";
pub const PLAN_TRIP_WORKFLOW_NAME: &str = "PlanTripWorkflow";

pub const COORDINATOR_INSTRUCTION: &str = "Acts as a comprehensive trip planner.\n\
     - Use the FlightAgent to find and book flights\n\
     - Use the HotelAgent to find and book accommodation\n\
     - Use the SightseeingAgent to find information on places to visit\n\
     Transfer to the specialist that fits the current part of the request, then combine their \
     answers into one trip plan for the user.";

pub const TOOL_COORDINATOR_INSTRUCTION: &str = "Acts as a comprehensive trip planner.\n\
     - Use the FlightAgent tool to find and book flights\n\
     - Use the HotelAgent tool to find and book accommodation\n\
     - Use the SightseeingAgent tool to find information on places to visit\n\
     Based on the user request, sequentially invoke the tools to gather all necessary trip \
     details, then return one consolidated trip plan.";

pub fn build_plan_agent(mode: PlanMode, model: Arc<dyn Llm>) -> Result<Arc<dyn Agent>> {
    match mode {
        PlanMode::Coordinator => build_coordinator_agent(model),
        PlanMode::Tools => build_tool_coordinator_agent(model),
        PlanMode::Pipeline => build_pipeline_agent(model),
        PlanMode::Reviewed => build_reviewed_agent(model),
    }
}

fn build_coordinator_agent(model: Arc<dyn Llm>) -> Result<Arc<dyn Agent>> {
    let agent = LlmAgentBuilder::new(TRIP_PLANNER_NAME)
        .description("Trip planner coordinating flight, hotel and sightseeing agents.")
        .instruction(COORDINATOR_INSTRUCTION)
        .model(model.clone())
        .sub_agent(build_flight_agent(model.clone())?)
        .sub_agent(build_hotel_agent(model.clone())?)
        .sub_agent(build_sightseeing_agent(model)?)
        .build()?;
    Ok(Arc::new(agent))
}

fn build_tool_coordinator_agent(model: Arc<dyn Llm>) -> Result<Arc<dyn Agent>> {
    let flight_tool = Arc::new(AgentTool::new(build_flight_agent(model.clone())?));
    let hotel_tool = Arc::new(AgentTool::new(build_hotel_agent(model.clone())?));
    let sightseeing_tool = Arc::new(AgentTool::new(build_sightseeing_agent(model.clone())?));

    let agent = LlmAgentBuilder::new(TRIP_PLANNER_NAME)
        .description("Trip planner calling flight, hotel and sightseeing agents as tools.")
        .instruction(TOOL_COORDINATOR_INSTRUCTION)
        .model(model)
        .tool(flight_tool)
        .tool(hotel_tool)
        .tool(sightseeing_tool)
        .build()?;
    Ok(Arc::new(agent))
}

/// Flight and hotel lookups are independent, so they share one parallel step.
fn build_parallel_bookings(model: Arc<dyn Llm>) -> Result<Arc<dyn Agent>> {
    let parallel = ParallelAgent::new(
        PARALLEL_TRIP_PLANNER_NAME,
        vec![build_flight_agent(model.clone())?, build_hotel_agent(model)?],
    );
    Ok(Arc::new(parallel))
}

fn build_pipeline_agent(model: Arc<dyn Llm>) -> Result<Arc<dyn Agent>> {
    let root = SequentialAgent::new(
        PLAN_TRIP_WORKFLOW_NAME,
        vec![
            build_sightseeing_agent(model.clone())?,
            build_parallel_bookings(model.clone())?,
            build_trip_summary_agent(model)?,
        ],
    );
    Ok(Arc::new(root))
}

fn build_reviewed_agent(model: Arc<dyn Llm>) -> Result<Arc<dyn Agent>> {
    let root = SequentialAgent::new(
        PLAN_TRIP_WORKFLOW_NAME,
        vec![
            build_sightseeing_agent(model.clone())?,
            build_parallel_bookings(model.clone())?,
            build_trip_summary_agent(model.clone())?,
            build_trip_summary_reviewer(model)?,
            Arc::new(ValidateTripSummary::new()) as Arc<dyn Agent>,
        ],
    );
    Ok(Arc::new(root))
}

/// Render an agent and its sub-agents as an indented outline, one agent per
/// line, children in declaration order.
pub fn describe_agent_tree(agent: &dyn Agent) -> Vec<String> {
    let mut lines = Vec::new();
    push_agent_lines(agent, 0, &mut lines);
    lines
}

fn push_agent_lines(agent: &dyn Agent, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let description = agent.description().trim();
    if description.is_empty() {
        lines.push(format!("{indent}- {}", agent.name()));
    } else {
        lines.push(format!("{indent}- {}: {}", agent.name(), description));
    }
    for child in agent.sub_agents() {
        push_agent_lines(child.as_ref(), depth + 1, lines);
    }
}

pub fn run_agents_show(mode: PlanMode, agent: &dyn Agent) {
    println!("Plan mode: {}", mode.label());
    for line in describe_agent_tree(agent) {
        println!("{line}");
    }
}
