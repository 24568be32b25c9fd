//! Specialist LLM agents for flights, hotels and sightseeing, plus the
//! summary and review agents that sit on top of them.

use std::sync::Arc;

use adk_rust::prelude::*;
use anyhow::Result;

pub const FLIGHT_AGENT_NAME: &str = "FlightAgent";
pub const HOTEL_AGENT_NAME: &str = "HotelAgent";
pub const SIGHTSEEING_AGENT_NAME: &str = "SightseeingAgent";
pub const TRIP_SUMMARY_AGENT_NAME: &str = "TripSummaryAgent";
pub const TRIP_SUMMARY_REVIEWER_NAME: &str = "TripSummaryReviewer";

pub const FLIGHT_OPTIONS_KEY: &str = "flight_options";
pub const HOTEL_OPTIONS_KEY: &str = "hotel_options";
pub const SIGHTSEEING_OPTIONS_KEY: &str = "sightseeing_options";
pub const TRIP_SUMMARY_KEY: &str = "trip_summary";
pub const REVIEW_STATUS_KEY: &str = "review_status";

pub const FLIGHT_INSTRUCTION: &str = "You are a flight booking agent. From the user's trip request, \
     identify origin, destination, travel dates and number of travellers, then propose suitable \
     flight options with airline, departure and arrival times, and an indicative price. \
     You always return a valid JSON object with a top-level \"flights\" array.";

pub const HOTEL_INSTRUCTION: &str = "You are a hotel booking agent. From the user's trip request, \
     identify destination, check-in and check-out dates and number of guests, then propose suitable \
     accommodation with name, neighbourhood, nightly rate and a short reason for the pick. \
     You always return a valid JSON object with a top-level \"hotels\" array.";

pub const SIGHTSEEING_INSTRUCTION: &str = "You are a sightseeing information agent. Recommend places \
     to visit at the user's destination, with a one-line description, suggested time to spend and \
     best time of day for each. \
     You always return a valid JSON object with a top-level \"places\" array.";

pub const TRIP_SUMMARY_INSTRUCTION: &str = "Summarize the trip details from the flight, hotel, and \
     sightseeing agents into one itinerary the traveller can act on.\n\
     Flights: {flight_options?}\n\
     Hotels: {hotel_options?}\n\
     Sightseeing: {sightseeing_options?}\n\
     If a section is missing, say so instead of inventing details.";

pub const TRIP_SUMMARY_REVIEW_INSTRUCTION: &str = "Review the trip summary in {trip_summary}.\n\
     If the summary meets quality standards (covers flights, accommodation and places to visit, \
     and is consistent with the user's request), output 'pass'. If not, output 'fail'.\n\
     Output exactly one word and nothing else.";

pub fn build_flight_agent(model: Arc<dyn Llm>) -> Result<Arc<dyn Agent>> {
    let agent = LlmAgentBuilder::new(FLIGHT_AGENT_NAME)
        .description("Flight booking agent")
        .instruction(FLIGHT_INSTRUCTION)
        .model(model)
        .output_key(FLIGHT_OPTIONS_KEY)
        .build()?;
    Ok(Arc::new(agent))
}

pub fn build_hotel_agent(model: Arc<dyn Llm>) -> Result<Arc<dyn Agent>> {
    let agent = LlmAgentBuilder::new(HOTEL_AGENT_NAME)
        .description("Hotel booking agent")
        .instruction(HOTEL_INSTRUCTION)
        .model(model)
        .output_key(HOTEL_OPTIONS_KEY)
        .build()?;
    Ok(Arc::new(agent))
}

pub fn build_sightseeing_agent(model: Arc<dyn Llm>) -> Result<Arc<dyn Agent>> {
    let agent = LlmAgentBuilder::new(SIGHTSEEING_AGENT_NAME)
        .description("Sightseeing information agent")
        .instruction(SIGHTSEEING_INSTRUCTION)
        .model(model)
        .output_key(SIGHTSEEING_OPTIONS_KEY)
        .build()?;
    Ok(Arc::new(agent))
}

pub fn build_trip_summary_agent(model: Arc<dyn Llm>) -> Result<Arc<dyn Agent>> {
    let agent = LlmAgentBuilder::new(TRIP_SUMMARY_AGENT_NAME)
        .description("Summarizes flight, hotel and sightseeing results into one itinerary.")
        .instruction(TRIP_SUMMARY_INSTRUCTION)
        .model(model)
        .output_key(TRIP_SUMMARY_KEY)
        .build()?;
    Ok(Arc::new(agent))
}

pub fn build_trip_summary_reviewer(model: Arc<dyn Llm>) -> Result<Arc<dyn Agent>> {
    let agent = LlmAgentBuilder::new(TRIP_SUMMARY_REVIEWER_NAME)
        .description("Checks the trip summary against quality standards and writes a verdict.")
        .instruction(TRIP_SUMMARY_REVIEW_INSTRUCTION)
        .model(model)
        .output_key(REVIEW_STATUS_KEY)
        .build()?;
    Ok(Arc::new(agent))
}
