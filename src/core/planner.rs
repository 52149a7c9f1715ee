use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::{
    config::{PlannerConfig, PromptStrategy},
    core::requester::{build_requester, PlanRequester},
    error::Result,
    export::{self, Download},
    schemas::{day_count_mismatch, itinerary_schema, schema_drift},
    services::{openai_client::TokenUsage, prompt},
    types::{
        itinerary::ItineraryPlan,
        trip_spec::{RawTripForm, TripSpec},
    },
    view::{render_plan, ItineraryView},
};

/// Runs one submission through spec building, prompting, the model call and decoding
#[derive(Debug)]
pub struct TripPlanner {
    config: PlannerConfig,
    requester: Option<Box<dyn PlanRequester>>,
}

impl TripPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            requester: None,
        }
    }

    /// Use a specific requester instead of the one the config selects
    pub fn with_requester(mut self, requester: Box<dyn PlanRequester>) -> Self {
        self.requester = Some(requester);
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Validate the form, normalize it and ask the model for an itinerary.
    ///
    /// A blank destination is reported ahead of any bounds error and fails
    /// before a requester is built, so no credential lookup or network call
    /// happens for it.
    pub async fn plan(&self, form: &RawTripForm) -> Result<PlanOutcome> {
        let spec = TripSpec::from_form(form)?;
        form.check_bounds(self.config.bounds())?;

        let built;
        let requester: &dyn PlanRequester = match &self.requester {
            Some(requester) => requester.as_ref(),
            None => {
                built = build_requester(&self.config)?;
                built.as_ref()
            }
        };

        let start = Instant::now();
        let language = prompt::effective_language(self.config.language(), &spec);
        let prompt = requester.compose(&spec, language)?;
        let completion = requester.invoke(&prompt).await?;
        let decoded = requester.decode(&completion.text)?;

        let mut warnings = Vec::new();
        warnings.extend(day_count_mismatch(&decoded.plan, spec.duration_days()));
        warnings.extend(schema_drift(itinerary_schema(), &decoded.payload));
        for warning in &warnings {
            warn!(target: "trip_planner::schema", "{}", warning);
        }

        let duration = start.elapsed();
        info!(
            target: "trip_planner::requester",
            destination = spec.destination(),
            strategy = %requester.strategy(),
            days = decoded.plan.days().len(),
            elapsed_ms = duration.as_millis() as u64,
            "itinerary generated"
        );

        Ok(PlanOutcome {
            spec,
            plan: decoded.plan,
            warnings,
            usage: completion.usage,
            strategy: requester.strategy(),
            duration,
        })
    }
}

/// Everything one successful submission produced
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub spec: TripSpec,
    pub plan: ItineraryPlan,
    /// Non-fatal problems with the model output
    pub warnings: Vec<String>,
    pub usage: Option<TokenUsage>,
    pub strategy: PromptStrategy,
    pub duration: Duration,
}

impl PlanOutcome {
    pub fn view(&self) -> ItineraryView {
        render_plan(&self.plan)
    }

    /// `itinerary.json` and `itinerary.md`
    pub fn downloads(&self) -> Result<Vec<Download>> {
        export::downloads(&self.plan)
    }

    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("Strategy: {}", self.strategy),
            format!("Days: {}", self.plan.days().len()),
            format!("Duration: {:.1}s", self.duration.as_secs_f64()),
        ];
        if let Some(usage) = &self.usage {
            parts.push(format!(
                "Tokens: {} prompt + {} completion = {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            ));
        }
        if !self.warnings.is_empty() {
            parts.push(format!("Warnings: {}", self.warnings.len()));
        }
        parts.join(" | ")
    }
}
