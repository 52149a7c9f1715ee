//! trip-planner-rs: turn trip preferences into a day-by-day itinerary with an LLM
//!
//! A form submission is normalized into a [`TripSpec`], sent to an
//! OpenAI-compatible chat endpoint with one of two prompt strategies, and the
//! answer is decoded leniently into an [`ItineraryPlan`] that can be rendered
//! or exported as JSON and Markdown.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use trip_planner_rs::{PlannerConfig, PlannerSession, RawTripForm};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PlannerConfig::from_env()?;
//!     let mut session = PlannerSession::new(config);
//!
//!     let form = RawTripForm {
//!         destination: "Lisbon".to_string(),
//!         duration_days: 3,
//!         ..RawTripForm::default()
//!     };
//!
//!     if let Some(outcome) = session.submit(&form).await.outcome() {
//!         println!("{}", outcome.view());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod schemas;
pub mod services;
pub mod types;
pub mod view;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::{PlannerConfig, PromptStrategy};
pub use crate::core::{
    build_requester, PlanOutcome, PlanRequester, PlannerSession, SessionState, TripPlanner,
};
pub use error::{PlannerError, Result};
pub use export::{downloads, to_json, to_markdown, Download};
pub use schemas::{itinerary_schema, SchemaHandle};
pub use types::{ItineraryPlan, RawTripForm, TripSpec};
pub use view::{render_plan, ItineraryView};
