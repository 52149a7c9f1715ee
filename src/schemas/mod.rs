pub mod schema;
pub mod validation;

pub use schema::{itinerary_schema, SchemaHandle};
pub use validation::{day_count_mismatch, schema_drift};
