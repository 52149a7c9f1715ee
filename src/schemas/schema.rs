use schemars::schema::RootSchema;
use schemars::JsonSchema;
use serde_json::Value;
use std::sync::{Arc, OnceLock};

use crate::types::itinerary::ItineraryPlan;

/// Cached JSON schema handle associated with a response type.
#[derive(Clone, Debug)]
pub struct SchemaHandle {
    schema_name: &'static str,
    schema_json: Arc<Value>,
}

impl SchemaHandle {
    pub fn from_root_schema(schema_name: &'static str, root: RootSchema) -> Self {
        let schema_json = serde_json::to_value(root)
            .unwrap_or_else(|err| panic!("failed to serialize schema for {}: {}", schema_name, err));

        Self {
            schema_name,
            schema_json: Arc::new(schema_json),
        }
    }

    /// Schema generated from a `JsonSchema` type
    pub fn for_type<T: JsonSchema>(schema_name: &'static str) -> Self {
        Self::from_root_schema(schema_name, schemars::schema_for!(T))
    }

    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    pub fn schema_json(&self) -> &Value {
        self.schema_json.as_ref()
    }

    /// Top-level property names
    pub fn property_names(&self) -> Vec<&str> {
        self.schema_json
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Schema of the itinerary the model is asked to produce
pub fn itinerary_schema() -> &'static SchemaHandle {
    static HANDLE: OnceLock<SchemaHandle> = OnceLock::new();
    HANDLE.get_or_init(|| SchemaHandle::for_type::<ItineraryPlan>("ItineraryPlan"))
}
