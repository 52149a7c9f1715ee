use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{
    config::InputBounds,
    error::{PlannerError, Result},
};

/// Travel styles offered by the form
pub const STYLE_SUGGESTIONS: &[&str] = &[
    "Relaxation",
    "Adventure",
    "Cultural",
    "Shopping",
    "Foodie",
    "Photography",
    "Nightlife",
    "Nature",
];

/// Food preferences offered by the form
pub const FOOD_SUGGESTIONS: &[&str] = &[
    "Local Food",
    "Vegetarian",
    "Vegan",
    "Street Food",
    "Fine Dining",
    "Seafood",
    "Halal Options",
];

pub const DEFAULT_DURATION_DAYS: u32 = 7;

fn normalize_choice(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

macro_rules! form_choice {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = PlannerError;

            fn from_str(value: &str) -> Result<Self> {
                let wanted = normalize_choice(value);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|choice| normalize_choice(choice.label()) == wanted)
                    .ok_or_else(|| {
                        let options: Vec<&str> = Self::ALL.iter().map(|c| c.label()).collect();
                        PlannerError::InvalidInput(format!(
                            "unknown {} `{}`; expected one of: {}",
                            $kind,
                            value,
                            options.join(", ")
                        ))
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = PlannerError;

            fn try_from(value: String) -> Result<Self> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.label().to_string()
            }
        }
    };
}

form_choice!(
    /// Who is travelling
    TravelGroup, "travel group" {
        Solo => "Solo",
        Couple => "Couple",
        Family => "Family",
        Friends => "Friends",
        GroupTour => "Group Tour",
    }
);

form_choice!(
    /// Overall spending level
    BudgetBand, "budget band" {
        Low => "Low",
        Medium => "Medium",
        Luxury => "Luxury",
    }
);

form_choice!(
    /// Preferred lodging
    Accommodation, "accommodation" {
        BudgetHostel => "Budget Hostel",
        Hotel => "Hotel",
        Airbnb => "Airbnb",
        LuxuryResort => "Luxury Resort",
    }
);

/// Travel season. Anything outside the offered choices is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Season {
    Flexible,
    Summer,
    Winter,
    Spring,
    Autumn,
    Other(String),
}

impl Season {
    const NAMED: [Season; 5] = [
        Season::Flexible,
        Season::Summer,
        Season::Winter,
        Season::Spring,
        Season::Autumn,
    ];

    pub fn label(&self) -> &str {
        match self {
            Season::Flexible => "Flexible",
            Season::Summer => "Summer",
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Autumn => "Autumn",
            Season::Other(value) => value,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Season {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Season::Flexible;
        }
        let wanted = normalize_choice(trimmed);
        Season::NAMED
            .into_iter()
            .find(|season| normalize_choice(season.label()) == wanted)
            .unwrap_or_else(|| Season::Other(trimmed.to_string()))
    }
}

impl FromStr for Season {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Season::from(value.to_string()))
    }
}

impl From<Season> for String {
    fn from(value: Season) -> String {
        value.label().to_string()
    }
}

/// Raw values of one form submission, exactly as the input layer hands them over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTripForm {
    pub destination: String,
    pub passport_country: String,
    pub season: Season,
    pub duration_days: u32,
    pub group: TravelGroup,
    pub budget_band: BudgetBand,
    /// Zero means "not set"
    pub daily_budget_usd: f64,
    pub accommodation: Accommodation,
    pub style: Vec<String>,
    pub food: Vec<String>,
    pub must_include: String,
    pub avoid: String,
    pub notes: String,
    pub language: String,
}

impl Default for RawTripForm {
    fn default() -> Self {
        Self {
            destination: String::new(),
            passport_country: String::new(),
            season: Season::Flexible,
            duration_days: DEFAULT_DURATION_DAYS,
            group: TravelGroup::Solo,
            budget_band: BudgetBand::Medium,
            daily_budget_usd: 0.0,
            accommodation: Accommodation::BudgetHostel,
            style: vec!["Cultural".to_string(), "Foodie".to_string()],
            food: vec!["Local Food".to_string(), "Street Food".to_string()],
            must_include: String::new(),
            avoid: String::new(),
            notes: String::new(),
            language: String::new(),
        }
    }
}

impl RawTripForm {
    /// Range checks owned by the input layer. A form that fails here never becomes a `TripSpec`.
    pub fn check_bounds(&self, bounds: &InputBounds) -> Result<()> {
        bounds.check_duration(self.duration_days)
    }
}

/// Normalized trip preferences sent to the model. Built once per submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSpec {
    destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    passport_country: Option<String>,
    #[serde(rename = "month_or_season")]
    season: Season,
    duration_days: u32,
    group: TravelGroup,
    budget_band: BudgetBand,
    #[serde(skip_serializing_if = "Option::is_none")]
    daily_budget_usd: Option<f64>,
    accommodation: Accommodation,
    style: Vec<String>,
    food: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    must_include: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avoid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

impl TripSpec {
    /// Normalize a raw submission. A blank destination stops the pipeline here.
    pub fn from_form(form: &RawTripForm) -> Result<Self> {
        let destination = non_blank(&form.destination).ok_or(PlannerError::MissingDestination)?;

        Ok(Self {
            destination,
            passport_country: non_blank(&form.passport_country),
            season: form.season.clone(),
            duration_days: form.duration_days,
            group: form.group,
            budget_band: form.budget_band,
            daily_budget_usd: positive_budget(form.daily_budget_usd),
            accommodation: form.accommodation,
            style: normalize_selection(&form.style),
            food: normalize_selection(&form.food),
            must_include: non_blank(&form.must_include),
            avoid: non_blank(&form.avoid),
            notes: non_blank(&form.notes),
            language: non_blank(&form.language),
        })
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn passport_country(&self) -> Option<&str> {
        self.passport_country.as_deref()
    }

    pub fn season(&self) -> &Season {
        &self.season
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn group(&self) -> TravelGroup {
        self.group
    }

    pub fn budget_band(&self) -> BudgetBand {
        self.budget_band
    }

    pub fn daily_budget_usd(&self) -> Option<f64> {
        self.daily_budget_usd
    }

    pub fn accommodation(&self) -> Accommodation {
        self.accommodation
    }

    pub fn style(&self) -> &[String] {
        &self.style
    }

    pub fn food(&self) -> &[String] {
        &self.food
    }

    pub fn must_include(&self) -> Option<&str> {
        self.must_include.as_deref()
    }

    pub fn avoid(&self) -> Option<&str> {
        self.avoid.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Pretty JSON used as the user message payload
    pub fn to_prompt_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn positive_budget(value: f64) -> Option<f64> {
    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        None
    }
}

fn normalize_selection(values: &[String]) -> Vec<String> {
    let mut selection: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if let Some(item) = non_blank(value) {
            if !selection.contains(&item) {
                selection.push(item);
            }
        }
    }
    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn form(destination: &str) -> RawTripForm {
        RawTripForm {
            destination: destination.to_string(),
            ..RawTripForm::default()
        }
    }

    #[test]
    fn test_budget_at_or_below_zero_is_unset() {
        for raw in [0.0, -10.0, -0.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut input = form("Tokyo, Japan");
            input.daily_budget_usd = raw;
            let spec = TripSpec::from_form(&input).unwrap();
            assert_eq!(spec.daily_budget_usd(), None, "budget {raw} should be unset");
        }
    }

    #[test]
    fn test_positive_budget_is_kept() {
        for raw in [0.01, 10.0, 250.0] {
            let mut input = form("Tokyo, Japan");
            input.daily_budget_usd = raw;
            let spec = TripSpec::from_form(&input).unwrap();
            assert_eq!(spec.daily_budget_usd(), Some(raw));
        }
    }

    #[test]
    fn test_whitespace_text_becomes_absent() {
        let mut input = form("  Lisbon  ");
        input.passport_country = "   ".to_string();
        input.must_include = "\n\t".to_string();
        input.avoid = " ".to_string();
        input.notes = "  sunrise spots ".to_string();
        input.language = "".to_string();

        let spec = TripSpec::from_form(&input).unwrap();
        assert_eq!(spec.destination(), "Lisbon");
        assert_eq!(spec.passport_country(), None);
        assert_eq!(spec.must_include(), None);
        assert_eq!(spec.avoid(), None);
        assert_eq!(spec.notes(), Some("sunrise spots"));
        assert_eq!(spec.language(), None);
    }

    #[test]
    fn test_blank_destination_is_rejected() {
        for destination in ["", "   ", "\t\n"] {
            let err = TripSpec::from_form(&form(destination)).unwrap_err();
            assert!(matches!(err, PlannerError::MissingDestination));
        }
    }

    #[test]
    fn test_selections_are_deduplicated() {
        let mut input = form("Rome");
        input.style = vec![
            "Foodie".to_string(),
            " ".to_string(),
            "Nature ".to_string(),
            "Foodie".to_string(),
        ];
        let spec = TripSpec::from_form(&input).unwrap();
        assert_eq!(spec.style(), ["Foodie", "Nature"]);
    }

    #[test]
    fn test_prompt_json_key_order_and_absent_fields() {
        let mut input = form("Kyoto, Japan");
        input.season = Season::Autumn;
        input.duration_days = 3;
        input.group = TravelGroup::GroupTour;
        input.accommodation = Accommodation::LuxuryResort;

        let spec = TripSpec::from_form(&input).unwrap();
        let json = spec.to_prompt_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();

        assert_eq!(value["month_or_season"], "Autumn");
        assert_eq!(value["group"], "Group Tour");
        assert_eq!(value["accommodation"], "Luxury Resort");
        assert!(value.get("daily_budget_usd").is_none());
        assert!(value.get("notes").is_none());
        assert!(keys.contains(&"destination"));
        assert!(json.find("\"destination\"").unwrap() < json.find("\"duration_days\"").unwrap());
    }

    #[test]
    fn test_choices_parse_leniently() {
        assert_eq!("group-tour".parse::<TravelGroup>().unwrap(), TravelGroup::GroupTour);
        assert_eq!("luxury resort".parse::<Accommodation>().unwrap(), Accommodation::LuxuryResort);
        assert_eq!("LOW".parse::<BudgetBand>().unwrap(), BudgetBand::Low);
        assert!("Cheap".parse::<BudgetBand>().is_err());
        assert_eq!(Season::from("summer".to_string()), Season::Summer);
        assert_eq!(
            Season::from("Cherry blossom".to_string()),
            Season::Other("Cherry blossom".to_string())
        );
    }

    #[test]
    fn test_raw_form_defaults_from_partial_json() {
        let input: RawTripForm =
            serde_json::from_str(r#"{"destination": "Tokyo, Japan", "group": "Couple"}"#).unwrap();
        assert_eq!(input.duration_days, DEFAULT_DURATION_DAYS);
        assert_eq!(input.budget_band, BudgetBand::Medium);
        assert_eq!(input.group, TravelGroup::Couple);
        assert_eq!(input.style, ["Cultural", "Foodie"]);
    }
}
