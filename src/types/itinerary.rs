//! Itinerary returned by the model.
//!
//! Every field is optional and every field tolerates the usual shape drift of
//! generated JSON: a list that arrives as a single string, a number that
//! arrives as text, a day that is not an object. The shape is decided once,
//! at parse time, and carried in the tags below.

use schemars::gen::SchemaGenerator;
use schemars::schema::{InstanceType, Schema, SchemaObject, SingleOrVec};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::fmt;

/// A field the model should send as a list of strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextOrList {
    /// The model answered with free text instead of a list
    TextBlock(String),
    BulletList(Vec<String>),
}

impl TextOrList {
    pub fn is_empty(&self) -> bool {
        match self {
            TextOrList::TextBlock(text) => text.trim().is_empty(),
            TextOrList::BulletList(items) => items.is_empty(),
        }
    }

    /// Single-line form, used where one line of text is expected
    pub fn joined(&self, separator: &str) -> String {
        match self {
            TextOrList::TextBlock(text) => text.clone(),
            TextOrList::BulletList(items) => items.join(separator),
        }
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Array(items) => Some(TextOrList::BulletList(
                items.into_iter().filter_map(scalar_text).collect(),
            )),
            other => scalar_text(other).map(TextOrList::TextBlock),
        }
    }
}

impl From<Vec<String>> for TextOrList {
    fn from(items: Vec<String>) -> Self {
        TextOrList::BulletList(items)
    }
}

impl From<&str> for TextOrList {
    fn from(text: &str) -> Self {
        TextOrList::TextBlock(text.to_string())
    }
}

impl Serialize for TextOrList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TextOrList::TextBlock(text) => serializer.serialize_str(text),
            TextOrList::BulletList(items) => items.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for TextOrList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(TextOrList::from_value(value).unwrap_or(TextOrList::BulletList(Vec::new())))
    }
}

impl JsonSchema for TextOrList {
    fn schema_name() -> String {
        "TextOrList".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        let mut schema = SchemaObject::default();
        schema.subschemas().any_of = Some(vec![
            gen.subschema_for::<String>(),
            gen.subschema_for::<Vec<String>>(),
        ]);
        schema.into()
    }
}

/// A money amount. Numbers keep their original formatting; text passes through.
#[derive(Debug, Clone, PartialEq)]
pub enum Amount {
    Number(Number),
    Text(String),
}

impl Amount {
    /// Zero and blank amounts count as "not given"
    pub fn is_blank(&self) -> bool {
        match self {
            Amount::Number(number) => number.as_f64().map(|n| n == 0.0).unwrap_or(false),
            Amount::Text(text) => text.trim().is_empty(),
        }
    }

    /// Text with nothing in it. A numeric zero is still a stated amount.
    pub fn is_empty_text(&self) -> bool {
        matches!(self, Amount::Text(text) if text.trim().is_empty())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Amount::Number(number) => number.as_f64(),
            Amount::Text(text) => text
                .trim()
                .trim_start_matches(['~', '$'])
                .replace(',', "")
                .parse()
                .ok(),
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(Amount::Number)
            .unwrap_or_else(|| Amount::Text(value.to_string()))
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount::Number(Number::from(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(number) => write!(f, "{}", number),
            // currency markers are added by the caller
            Amount::Text(text) => f.write_str(text.trim().trim_start_matches(['~', '$']).trim()),
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Amount::Number(number) => number.serialize(serializer),
            Amount::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(number) => Amount::Number(number),
            other => Amount::Text(scalar_text(other).unwrap_or_default()),
        })
    }
}

impl JsonSchema for Amount {
    fn schema_name() -> String {
        "Amount".to_string()
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(SingleOrVec::Vec(vec![
                InstanceType::Number,
                InstanceType::String,
            ])),
            ..Default::default()
        }
        .into()
    }
}

/// One day of the itinerary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DayPlan {
    /// 1-based day counter
    #[serde(
        default,
        deserialize_with = "lenient_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub day: Option<u32>,
    /// Short theme for the day
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    /// Morning activities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning: Option<TextOrList>,
    /// Afternoon activities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub afternoon: Option<TextOrList>,
    /// Evening activities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evening: Option<TextOrList>,
    /// Places or dishes to eat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food: Option<TextOrList>,
    /// How to get around that day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_notes: Option<TextOrList>,
    /// Estimated spend for the day in USD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub est_cost_usd: Option<Amount>,
}

impl DayPlan {
    pub fn new(day: u32, title: impl Into<String>) -> Self {
        Self {
            day: Some(day),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Morning, afternoon and evening slots with their labels, in display order
    pub fn slots(&self) -> [(&'static str, Option<&TextOrList>); 3] {
        [
            ("Morning", self.morning.as_ref()),
            ("Afternoon", self.afternoon.as_ref()),
            ("Evening", self.evening.as_ref()),
        ]
    }
}

/// An entry of `daily_plan`. Anything that is not an object is kept as text.
#[derive(Debug, Clone, PartialEq)]
pub enum DayEntry {
    Day(DayPlan),
    Text(String),
}

impl DayEntry {
    pub fn day_number(&self) -> Option<u32> {
        match self {
            DayEntry::Day(day) => day.day,
            DayEntry::Text(_) => None,
        }
    }

    pub fn as_day(&self) -> Option<&DayPlan> {
        match self {
            DayEntry::Day(day) => Some(day),
            DayEntry::Text(_) => None,
        }
    }
}

impl Serialize for DayEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DayEntry::Day(day) => day.serialize(serializer),
            DayEntry::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for DayEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            value @ Value::Object(_) => serde_json::from_value(value)
                .map(DayEntry::Day)
                .map_err(serde::de::Error::custom),
            other => Ok(DayEntry::Text(scalar_text(other).unwrap_or_default())),
        }
    }
}

impl JsonSchema for DayEntry {
    fn schema_name() -> String {
        "DayEntry".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        let mut schema = SchemaObject::default();
        schema.subschemas().any_of = Some(vec![
            gen.subschema_for::<DayPlan>(),
            gen.subschema_for::<String>(),
        ]);
        schema.into()
    }
}

/// `daily_plan` as sent by the model
#[derive(Debug, Clone, PartialEq)]
pub enum DailyPlan {
    TextBlock(String),
    Days(Vec<DayEntry>),
}

impl DailyPlan {
    pub fn is_empty(&self) -> bool {
        match self {
            DailyPlan::TextBlock(text) => text.trim().is_empty(),
            DailyPlan::Days(days) => days.is_empty(),
        }
    }

    pub fn days(&self) -> &[DayEntry] {
        match self {
            DailyPlan::TextBlock(_) => &[],
            DailyPlan::Days(days) => days,
        }
    }
}

impl Serialize for DailyPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DailyPlan::TextBlock(text) => serializer.serialize_str(text),
            DailyPlan::Days(days) => days.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for DailyPlan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => serde_json::from_value(Value::Array(items))
                .map(DailyPlan::Days)
                .map_err(serde::de::Error::custom),
            single @ Value::Object(_) => serde_json::from_value(single)
                .map(|day| DailyPlan::Days(vec![DayEntry::Day(day)]))
                .map_err(serde::de::Error::custom),
            other => Ok(DailyPlan::TextBlock(scalar_text(other).unwrap_or_default())),
        }
    }
}

impl JsonSchema for DailyPlan {
    fn schema_name() -> String {
        "DailyPlan".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        let mut schema = SchemaObject::default();
        schema.subschemas().any_of = Some(vec![
            gen.subschema_for::<Vec<DayEntry>>(),
            gen.subschema_for::<String>(),
        ]);
        schema.into()
    }
}

/// Structured itinerary returned by the model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ItineraryPlan {
    /// 2-3 sentence overview of the trip
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub summary: Option<String>,
    /// Short practical tips, including visa notes for the passport and destination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visa_and_tips: Option<TextOrList>,
    /// One entry per day of the trip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_plan: Option<DailyPlan>,
    /// Total rough cost in USD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_estimated_cost_usd: Option<Amount>,
    /// Google Maps links to major points of interest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_links: Option<TextOrList>,
    /// Packing or seasonal tips
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packing_or_seasonal_tips: Option<TextOrList>,
}

impl ItineraryPlan {
    /// Day entries, empty when the plan has none or sent free text instead
    pub fn days(&self) -> &[DayEntry] {
        self.daily_plan.as_ref().map(DailyPlan::days).unwrap_or(&[])
    }

    /// The total cost, unless it is missing, zero or blank
    pub fn total_cost(&self) -> Option<&Amount> {
        self.total_estimated_cost_usd
            .as_ref()
            .filter(|amount| !amount.is_blank())
    }

    /// Index of the day shown expanded: the first day numbered 1, else the first entry
    pub fn first_day_index(&self) -> Option<usize> {
        let days = self.days();
        if days.is_empty() {
            return None;
        }
        Some(
            days.iter()
                .position(|entry| entry.day_number() == Some(1))
                .unwrap_or(0),
        )
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(scalar_text).collect();
            Some(parts.join(" "))
        }
        other => scalar_text(other),
    })
}

fn lenient_day<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let day = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64().and_then(whole_day),
        Value::String(text) => {
            let text = text.trim();
            let digits = match text.get(..3) {
                Some(prefix) if prefix.eq_ignore_ascii_case("day") => text[3..].trim_start(),
                _ => text,
            };
            digits.parse::<u32>().ok()
        }
        _ => None,
    };
    // days are 1-based
    Ok(day.filter(|day| *day > 0))
}

fn whole_day(value: f64) -> Option<u32> {
    if value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX) {
        Some(value as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_or_text_is_decided_at_parse_time() {
        let day: DayPlan = serde_json::from_value(json!({
            "day": 1,
            "title": "Arrival",
            "morning": "Slow start, coffee near the hotel",
            "afternoon": ["Fushimi Inari", 42],
            "evening": null
        }))
        .unwrap();

        assert_eq!(
            day.morning,
            Some(TextOrList::TextBlock(
                "Slow start, coffee near the hotel".to_string()
            ))
        );
        assert_eq!(
            day.afternoon,
            Some(TextOrList::BulletList(vec![
                "Fushimi Inari".to_string(),
                "42".to_string()
            ]))
        );
        assert_eq!(day.evening, None);
    }

    #[test]
    fn test_day_numbers_and_titles_tolerate_drift() {
        let day: DayPlan =
            serde_json::from_value(json!({"day": "Day 3", "title": 7, "extra": true})).unwrap();
        assert_eq!(day.day, Some(3));
        assert_eq!(day.title.as_deref(), Some("7"));

        let day: DayPlan = serde_json::from_value(json!({"day": "soon"})).unwrap();
        assert_eq!(day.day, None);
    }

    #[test]
    fn test_day_numbers_must_be_whole_and_positive() {
        let day_of = |value: Value| {
            serde_json::from_value::<DayPlan>(json!({ "day": value }))
                .unwrap()
                .day
        };

        assert_eq!(day_of(json!(1.0)), Some(1));
        assert_eq!(day_of(json!(" day 2 ")), Some(2));
        assert_eq!(day_of(json!("DAY4")), Some(4));
        assert_eq!(day_of(json!("5")), Some(5));

        assert_eq!(day_of(json!(1.5)), None);
        assert_eq!(day_of(json!(0)), None);
        assert_eq!(day_of(json!(-1)), None);
        assert_eq!(day_of(json!("-1")), None);
        assert_eq!(day_of(json!("Day -2")), None);
        assert_eq!(day_of(json!("Week 3")), None);
        assert_eq!(day_of(json!(5_000_000_000u64)), None);
    }

    #[test]
    fn test_daily_plan_shapes() {
        let plan: ItineraryPlan = serde_json::from_value(json!({
            "daily_plan": [{"day": 2, "title": "Hike"}, "Rest day"]
        }))
        .unwrap();
        assert_eq!(plan.days().len(), 2);
        assert!(matches!(plan.days()[1], DayEntry::Text(ref text) if text == "Rest day"));

        let plan: ItineraryPlan =
            serde_json::from_value(json!({"daily_plan": "See the city at your own pace"})).unwrap();
        assert!(matches!(plan.daily_plan, Some(DailyPlan::TextBlock(_))));
        assert!(plan.days().is_empty());
    }

    #[test]
    fn test_first_day_index() {
        let plan: ItineraryPlan = serde_json::from_value(json!({
            "daily_plan": [{"day": 0}, {"day": 1}, {"day": 2}]
        }))
        .unwrap();
        assert_eq!(plan.first_day_index(), Some(1));

        let plan: ItineraryPlan = serde_json::from_value(json!({
            "daily_plan": [{"title": "a"}, {"title": "b"}]
        }))
        .unwrap();
        assert_eq!(plan.first_day_index(), Some(0));

        assert_eq!(ItineraryPlan::default().first_day_index(), None);
    }

    #[test]
    fn test_total_cost_blank_values() {
        let plan: ItineraryPlan =
            serde_json::from_value(json!({"total_estimated_cost_usd": 0})).unwrap();
        assert!(plan.total_cost().is_none());

        let plan: ItineraryPlan =
            serde_json::from_value(json!({"total_estimated_cost_usd": "~$1,250"})).unwrap();
        assert_eq!(plan.total_cost().and_then(Amount::as_f64), Some(1250.0));

        let plan: ItineraryPlan = serde_json::from_value(json!({})).unwrap();
        assert!(plan.total_cost().is_none());
    }

    #[test]
    fn test_amount_keeps_number_formatting() {
        assert_eq!(Amount::from(1200u64).to_string(), "1200");
        assert_eq!(Amount::from(85.5).to_string(), "85.5");
        assert_eq!(Amount::Text("~$1,250".to_string()).to_string(), "1,250");
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let plan = ItineraryPlan {
            summary: Some("Short trip.".to_string()),
            ..ItineraryPlan::default()
        };
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value, json!({"summary": "Short trip."}));
    }
}
