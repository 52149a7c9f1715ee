use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing::{error, info, warn};

use crate::{
    config::{PlannerConfig, PromptStrategy, DEFAULT_MODEL, SUGGESTED_MODELS},
    core::session::{PlannerSession, SessionState},
    export::Download,
    types::trip_spec::{RawTripForm, FOOD_SUGGESTIONS, STYLE_SUGGESTIONS},
};

/// CLI entry point for the trip planner
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let matches = command().get_matches();
    let config = config_from_matches(&matches)?;
    let form = form_from_matches(&matches)?;

    info!("Planning a trip to: {}", form.destination.trim());
    info!("Using model: {} ({} strategy)", config.model(), config.strategy());
    info!("Base URL: {}", config.base_url());

    let output_dir = matches.get_one::<PathBuf>("output-dir").cloned();
    let expand_all = matches.get_flag("expand-all");

    let mut session = PlannerSession::new(config);
    match session.submit(&form).await {
        SessionState::Ready(outcome) => {
            println!("{}", outcome.view().terminal().expand_all(expand_all));
            for warning in &outcome.warnings {
                warn!("{}", warning);
            }
            info!("{}", outcome.summary());

            if let Some(dir) = output_dir {
                write_downloads(&dir, &outcome.downloads()?).await?;
            }
        }
        SessionState::Failed { message, .. } => {
            error!("Planning failed");
            bail!("{}", message);
        }
        SessionState::Idle => {}
    }

    Ok(())
}

fn command() -> Command {
    Command::new("trip-planner")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Plan a day-by-day trip itinerary with an OpenAI-compatible model")
        .arg(
            Arg::new("destination")
                .help("Where to go, e.g. \"Kyoto, Japan\"")
                .index(1),
        )
        .arg(
            Arg::new("form")
                .short('f')
                .long("form")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Read trip preferences from a JSON file; other flags override it"),
        )
        .arg(
            Arg::new("passport")
                .long("passport")
                .value_name("COUNTRY")
                .help("Passport country, used for visa tips"),
        )
        .arg(
            Arg::new("season")
                .long("season")
                .value_name("SEASON")
                .help("Flexible, Summer, Winter, Spring, Autumn or a month"),
        )
        .arg(
            Arg::new("days")
                .short('d')
                .long("days")
                .value_name("COUNT")
                .value_parser(value_parser!(u32))
                .help("Trip length in days"),
        )
        .arg(
            Arg::new("group")
                .long("group")
                .value_name("GROUP")
                .help("Solo, Couple, Family, Friends or Group Tour"),
        )
        .arg(
            Arg::new("budget")
                .long("budget")
                .value_name("BAND")
                .help("Low, Medium or Luxury"),
        )
        .arg(
            Arg::new("daily-budget")
                .long("daily-budget")
                .value_name("USD")
                .value_parser(value_parser!(f64))
                .help("Daily budget per person in USD; 0 means not set"),
        )
        .arg(
            Arg::new("accommodation")
                .long("accommodation")
                .value_name("KIND")
                .help("Budget Hostel, Hotel, Airbnb or Luxury Resort"),
        )
        .arg(
            Arg::new("style")
                .long("style")
                .value_name("STYLE")
                .value_delimiter(',')
                .action(ArgAction::Append)
                .help(format!(
                    "Travel styles, comma separated (suggested: {})",
                    STYLE_SUGGESTIONS.join(", ")
                )),
        )
        .arg(
            Arg::new("food")
                .long("food")
                .value_name("FOOD")
                .value_delimiter(',')
                .action(ArgAction::Append)
                .help(format!(
                    "Food preferences, comma separated (suggested: {})",
                    FOOD_SUGGESTIONS.join(", ")
                )),
        )
        .arg(
            Arg::new("must-include")
                .long("must-include")
                .value_name("TEXT")
                .help("Places or activities that must be in the plan"),
        )
        .arg(
            Arg::new("avoid")
                .long("avoid")
                .value_name("TEXT")
                .help("Things to avoid"),
        )
        .arg(
            Arg::new("notes")
                .long("notes")
                .value_name("TEXT")
                .help("Anything else the planner should know"),
        )
        .arg(
            Arg::new("language")
                .short('l')
                .long("language")
                .value_name("LANGUAGE")
                .help("Language for the itinerary text"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("API key (or set OPENAI_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("Base URL (or set OPENAI_BASE_URL / OPENROUTER_BASE_URL env vars)"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help(format!(
                    "Model identifier, default {} (suggested: {})",
                    DEFAULT_MODEL,
                    SUGGESTED_MODELS.join(", ")
                )),
        )
        .arg(
            Arg::new("temperature")
                .long("temperature")
                .value_name("VALUE")
                .value_parser(value_parser!(f32))
                .help("Sampling temperature between 0.0 and 1.0"),
        )
        .arg(
            Arg::new("strategy")
                .short('s')
                .long("strategy")
                .value_name("STRATEGY")
                .help("Prompt strategy: structured or json-mode"),
        )
        .arg(
            Arg::new("max-days")
                .long("max-days")
                .value_name("COUNT")
                .value_parser(value_parser!(u32))
                .help("Upper bound for the trip length"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .value_parser(value_parser!(u64))
                .help("Request timeout in seconds")
                .default_value("120"),
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Write itinerary.json and itinerary.md to this directory"),
        )
        .arg(
            Arg::new("expand-all")
                .long("expand-all")
                .action(ArgAction::SetTrue)
                .help("Print every day, not just the first"),
        )
}

fn config_from_matches(matches: &ArgMatches) -> anyhow::Result<PlannerConfig> {
    let mut config = PlannerConfig::from_env()?;

    if let Some(api_key) = matches.get_one::<String>("api-key") {
        config = config.with_api_key(api_key);
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(base_url);
    }
    if let Some(model) = matches.get_one::<String>("model") {
        config = config.with_model(model);
    }
    if let Some(temperature) = matches.get_one::<f32>("temperature") {
        config = config.with_temperature(*temperature)?;
    }
    if let Some(strategy) = matches.get_one::<String>("strategy") {
        config = config.with_strategy(strategy.parse::<PromptStrategy>()?);
    }
    if let Some(max_days) = matches.get_one::<u32>("max-days") {
        config = config.with_max_days(*max_days)?;
    }
    if let Some(seconds) = matches.get_one::<u64>("timeout") {
        config = config.with_timeout(Duration::from_secs(*seconds));
    }

    Ok(config)
}

fn form_from_matches(matches: &ArgMatches) -> anyhow::Result<RawTripForm> {
    let mut form = match matches.get_one::<PathBuf>("form") {
        Some(path) => read_form(path)?,
        None => RawTripForm::default(),
    };

    let text = |name: &str| matches.get_one::<String>(name).cloned();

    if let Some(destination) = text("destination") {
        form.destination = destination;
    }
    if let Some(passport) = text("passport") {
        form.passport_country = passport;
    }
    if let Some(season) = text("season") {
        form.season = season.into();
    }
    if let Some(days) = matches.get_one::<u32>("days") {
        form.duration_days = *days;
    }
    if let Some(group) = text("group") {
        form.group = group.parse()?;
    }
    if let Some(budget) = text("budget") {
        form.budget_band = budget.parse()?;
    }
    if let Some(daily_budget) = matches.get_one::<f64>("daily-budget") {
        form.daily_budget_usd = *daily_budget;
    }
    if let Some(accommodation) = text("accommodation") {
        form.accommodation = accommodation.parse()?;
    }
    if let Some(style) = matches.get_many::<String>("style") {
        form.style = style.cloned().collect();
    }
    if let Some(food) = matches.get_many::<String>("food") {
        form.food = food.cloned().collect();
    }
    if let Some(must_include) = text("must-include") {
        form.must_include = must_include;
    }
    if let Some(avoid) = text("avoid") {
        form.avoid = avoid;
    }
    if let Some(notes) = text("notes") {
        form.notes = notes;
    }
    if let Some(language) = text("language") {
        form.language = language;
    }

    Ok(form)
}

fn read_form(path: &Path) -> anyhow::Result<RawTripForm> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read form file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid trip form in {}", path.display()))
}

async fn write_downloads(dir: &Path, downloads: &[Download]) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    for download in downloads {
        let path = dir.join(download.file_name);
        tokio::fs::write(&path, &download.bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved {} ({})", path.display(), download.mime);
    }
    Ok(())
}
