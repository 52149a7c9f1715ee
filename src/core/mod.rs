pub mod planner;
pub mod requester;
pub mod session;

pub use planner::{PlanOutcome, TripPlanner};
#[cfg(feature = "json-mode")]
pub use requester::JsonModeRequester;
#[cfg(feature = "structured-output")]
pub use requester::StructuredOutputRequester;
pub use requester::{build_requester, ChatSettings, PlanRequester};
pub use session::{PlannerSession, SessionState};
