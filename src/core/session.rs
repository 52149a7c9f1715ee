use tracing::{info, warn};

use crate::{
    config::PlannerConfig,
    core::planner::{PlanOutcome, TripPlanner},
    types::trip_spec::RawTripForm,
};

/// Where a session stands after its last submission
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// The last submission produced a plan
    Ready(Box<PlanOutcome>),
    /// The last submission failed; the session accepts a new one
    Failed {
        message: String,
        field_error: bool,
    },
}

impl SessionState {
    pub fn outcome(&self) -> Option<&PlanOutcome> {
        match self {
            SessionState::Ready(outcome) => Some(outcome.as_ref()),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SessionState::Failed { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}

/// One user's planning session.
///
/// `submit` takes `&mut self`, so a session cannot start a second request
/// while one is outstanding. Separate sessions share nothing.
#[derive(Debug)]
pub struct PlannerSession {
    planner: TripPlanner,
    state: SessionState,
}

impl PlannerSession {
    pub fn new(config: PlannerConfig) -> Self {
        Self::with_planner(TripPlanner::new(config))
    }

    pub fn with_planner(planner: TripPlanner) -> Self {
        Self {
            planner,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn planner(&self) -> &TripPlanner {
        &self.planner
    }

    /// Run one submission. Every failure becomes a single user-visible message.
    pub async fn submit(&mut self, form: &RawTripForm) -> &SessionState {
        self.state = match self.planner.plan(form).await {
            Ok(outcome) => {
                info!(target: "trip_planner::session", "{}", outcome.summary());
                SessionState::Ready(Box::new(outcome))
            }
            Err(err) => {
                warn!(
                    target: "trip_planner::session",
                    code = err.error_code(),
                    error = %err,
                    "submission failed"
                );
                SessionState::Failed {
                    message: err.user_message(),
                    field_error: err.is_field_error(),
                }
            }
        };
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_destination_leaves_session_resubmittable() {
        let mut session = PlannerSession::new(PlannerConfig::new());
        let form = RawTripForm::default();

        let state = tokio_test::block_on(session.submit(&form));
        assert_eq!(state.error_message(), Some("Please enter a destination."));
        assert!(matches!(
            state,
            SessionState::Failed {
                field_error: true,
                ..
            }
        ));

        // no credential configured: the next failure is reported the same way
        let form = RawTripForm {
            destination: "Oslo".to_string(),
            ..RawTripForm::default()
        };
        let state = tokio_test::block_on(session.submit(&form));
        assert!(state
            .error_message()
            .unwrap()
            .starts_with("Failed to generate itinerary: Missing API key"));
    }

    #[test]
    fn test_out_of_range_duration_is_a_field_error() {
        let config = PlannerConfig::new().with_max_days(5).unwrap();
        let mut session = PlannerSession::new(config);
        let form = RawTripForm {
            destination: "Oslo".to_string(),
            duration_days: 6,
            ..RawTripForm::default()
        };

        let state = tokio_test::block_on(session.submit(&form));
        assert!(matches!(
            state,
            SessionState::Failed {
                field_error: true,
                ..
            }
        ));
    }
}
