use anyhow::{Context, anyhow};
use cityweather_core::{
    Config, FetchError, Panel, Update, WeatherFetcher, WeatherRecord,
    config::{DOTENV_FILE, dotenv_vars, env_with_dotenv},
    day_period,
    panel::NOT_FOUND_MESSAGE,
};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Text};
use std::path::Path;
use tracing::{debug, info, warn};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather for a city")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// OpenWeather API key; overrides the environment and config file.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Defaults to `interactive` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show the current weather for a city.
    Show {
        /// City name, e.g. "London".
        city: String,

        /// Print the raw weather record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Prompt for city names repeatedly and keep a weather panel on screen.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => {
                let mut config = Config::load()?;

                let api_key = Password::new("OpenWeather API key:")
                    .without_confirmation()
                    .prompt()
                    .context("Failed to read API key")?;

                config.set_api_key(api_key.trim().to_string());
                let path = config.save()?;
                println!("Saved API key to {}", path.display());
            }
            Command::Show { city, json } => {
                let fetcher = build_fetcher(self.api_key.as_deref())?;
                let output = show(&fetcher, &city, json).await?;
                if !output.is_empty() {
                    println!("{output}");
                }
            }
            Command::Interactive => {
                let fetcher = build_fetcher(self.api_key.as_deref())?;
                interactive(&fetcher).await?;
            }
        }

        Ok(())
    }
}

fn build_fetcher(flag: Option<&str>) -> anyhow::Result<impl WeatherFetcher> {
    let config = Config::load_or_default();
    let dotenv = dotenv_vars(Path::new(DOTENV_FILE)).unwrap_or_else(|err| {
        warn!("{err:#}; ignoring {DOTENV_FILE}");
        Default::default()
    });

    let api_key = config.resolve_api_key(flag, env_with_dotenv(&dotenv))?;
    let client = config.client(api_key);
    debug!(base_url = client.base_url(), "Using OpenWeather endpoint");
    Ok(client)
}

/// One-shot lookup. An empty string means there is nothing to print.
pub async fn show(fetcher: &dyn WeatherFetcher, city: &str, json: bool) -> anyhow::Result<String> {
    let outcome = fetcher.fetch(city).await;

    if json {
        return match outcome {
            Ok(record) => {
                serde_json::to_string_pretty(&record).context("Failed to serialize weather record")
            }
            Err(err) => outcome_error(city, err),
        };
    }

    let observed = outcome.as_ref().ok().map(observed_line);

    let mut panel = Panel::default();
    match panel.apply(city, outcome) {
        Update::Rendered | Update::RenderedWithoutGlyph => {
            let mut text = panel.to_string();
            if let Some(observed) = observed {
                text.push('\n');
                text.push_str(&observed);
            }
            Ok(text)
        }
        Update::CityNotFound => Err(anyhow!(NOT_FOUND_MESSAGE)),
        Update::Unchanged if city.trim().is_empty() => Ok(String::new()),
        Update::Unchanged => Err(anyhow!("Weather data for '{city}' is unavailable")),
    }
}

fn outcome_error(city: &str, err: FetchError) -> anyhow::Result<String> {
    match err {
        FetchError::EmptyInput => Ok(String::new()),
        FetchError::NotFound => Err(anyhow!(NOT_FOUND_MESSAGE)),
        FetchError::Unavailable(detail) => {
            Err(anyhow!("Weather data for '{city}' is unavailable: {detail}"))
        }
    }
}

fn observed_line(record: &WeatherRecord) -> String {
    let period = day_period(
        record.sunset_epoch,
        record.sunrise_epoch,
        record.observation_epoch,
    );

    match record.observed_at() {
        Some(at) => format!("Observed: {} ({period})", at.format("%Y-%m-%d %H:%M UTC")),
        None => format!("Observed: unknown ({period})"),
    }
}

/// Prompt loop standing in for the desktop form: each submitted city updates one panel.
async fn interactive(fetcher: &dyn WeatherFetcher) -> anyhow::Result<()> {
    let mut panel = Panel::default();
    println!("{panel}");

    loop {
        let city = match Text::new("City:")
            .with_placeholder("Enter a city name")
            .with_help_message("Esc or Ctrl-C to quit")
            .prompt()
        {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city name"),
        };

        let outcome = fetcher.fetch(&city).await;
        match panel.apply(&city, outcome) {
            Update::Rendered | Update::RenderedWithoutGlyph => println!("\n{panel}\n"),
            Update::CityNotFound => println!("{}", panel.city_input),
            Update::Unchanged => {}
        }
    }

    info!("Leaving interactive mode");
    Ok(())
}
