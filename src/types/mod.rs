pub mod itinerary;
pub mod response;
pub mod trip_spec;

pub use itinerary::{Amount, DailyPlan, DayEntry, DayPlan, ItineraryPlan, TextOrList};
pub use response::DecodedPlan;
pub use trip_spec::{Accommodation, BudgetBand, RawTripForm, Season, TravelGroup, TripSpec};
