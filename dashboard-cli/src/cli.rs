use std::sync::Arc;

use anyhow::{Context, anyhow};
use chrono::Utc;
use clap::{Parser, Subcommand};
use dashboard_core::{ApiClient, ClearOutcome, Config, Dashboard, HistoryEntry, SearchError, Session};
use inquire::{Confirm, CustomType, InquireError, Select, Text};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Current weather and recent searches")]
pub struct Cli {
    /// Backend base URL; overrides WEATHER_API_URL and the config file.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the backend URL and how many recent searches to show.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "London".
        city: String,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List recent searches.
    History {
        /// Maximum number of entries.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        limit: Option<u32>,
    },

    /// Delete all recent searches.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Menu-driven dashboard (default).
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(config),
            Command::Show { city, json } => {
                let dashboard = open(&config, self.api_url.as_deref())?;
                show(&dashboard, &city, json).await
            }
            Command::History { limit } => {
                let dashboard = open(&config, self.api_url.as_deref())?;
                list_history(&dashboard, limit).await
            }
            Command::Clear { yes } => {
                let dashboard = open(&config, self.api_url.as_deref())?;
                clear(&dashboard, yes).await
            }
            Command::Interactive => {
                let dashboard = open(&config, self.api_url.as_deref())?;
                interactive(&dashboard).await
            }
        }
    }
}

/// `api_url` comes from the command line and outranks both the environment
/// and the config file.
fn open(config: &Config, api_url: Option<&str>) -> anyhow::Result<Dashboard> {
    let session = match api_url {
        Some(url) => {
            let client = ApiClient::new(url)
                .with_context(|| format!("Failed to create API client for {url}"))?;
            tracing::debug!(api_url = url, "Using backend from command line");
            Session::new(Arc::new(client)).with_history_limit(config.history_limit())
        }
        None => Session::from_config(config)?,
    };
    Ok(Dashboard::new(session))
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_url = Text::new("Backend URL:")
        .with_default(&config.api_url())
        .with_help_message("Base URL of the weather backend")
        .prompt()?;
    config.set_api_url(api_url.trim());

    let limit = CustomType::<u32>::new("Recent searches to show:")
        .with_default(config.history_limit())
        .with_error_message("Please enter a whole number")
        .prompt()?;
    config.set_history_limit(limit)?;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(dashboard: &Dashboard, city: &str, json: bool) -> anyhow::Result<()> {
    let weather = dashboard.submit(city).await?;

    if json {
        let output = serde_json::json!({
            "weather": weather,
            "display": weather.category().hint(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", render::snapshot(&weather));
    }
    Ok(())
}

async fn list_history(dashboard: &Dashboard, limit: Option<u32>) -> anyhow::Result<()> {
    let limit = limit.unwrap_or_else(|| dashboard.history().limit());
    dashboard.history().refresh_with_limit(limit).await?;
    println!("{}", render::history(&dashboard.history().entries(), Utc::now()));
    Ok(())
}

async fn clear(dashboard: &Dashboard, yes: bool) -> anyhow::Result<()> {
    let outcome = confirm_and_clear(dashboard, yes).await?;
    report_clear(outcome);
    Ok(())
}

/// A prompt that cannot be shown (no TTY, IO failure) is an error, not a "no".
async fn confirm_and_clear(dashboard: &Dashboard, yes: bool) -> anyhow::Result<ClearOutcome> {
    let mut prompt_error = None;
    let outcome = dashboard
        .clear_history(|prompt| {
            yes || decline_on_cancel(Confirm::new(prompt).with_default(false).prompt())
                .unwrap_or_else(|err| {
                    prompt_error = Some(err);
                    false
                })
        })
        .await?;

    match prompt_error {
        Some(err) => {
            tracing::warn!(error = %err, "Confirmation prompt failed");
            Err(anyhow!(err).context("Could not ask for confirmation"))
        }
        None => Ok(outcome),
    }
}

/// Esc and Ctrl-C answer "no"; any other prompt failure is passed on.
fn decline_on_cancel(answer: Result<bool, InquireError>) -> Result<bool, InquireError> {
    match answer {
        Err(err) if is_cancel(&err) => Ok(false),
        answer => answer,
    }
}

fn report_clear(outcome: ClearOutcome) {
    match outcome {
        ClearOutcome::Cleared { deleted } => println!("Cleared {deleted} search(es)."),
        ClearOutcome::Declined => println!("Cancelled."),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Search,
    OpenRecent,
    ClearHistory,
    Quit,
}

impl std::fmt::Display for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MenuAction::Search => "🔍 Search for a city",
            MenuAction::OpenRecent => "📜 Open a recent search",
            MenuAction::ClearHistory => "🗑️  Clear all history",
            MenuAction::Quit => "Quit",
        })
    }
}

fn menu_actions(has_history: bool) -> Vec<MenuAction> {
    if has_history {
        vec![MenuAction::Search, MenuAction::OpenRecent, MenuAction::ClearHistory, MenuAction::Quit]
    } else {
        vec![MenuAction::Search, MenuAction::Quit]
    }
}

/// Menu entry wrapping a history record.
struct RecentChoice {
    label: String,
    entry: HistoryEntry,
}

impl std::fmt::Display for RecentChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

async fn interactive(dashboard: &Dashboard) -> anyhow::Result<()> {
    println!("🌤️  Weather Dashboard");
    dashboard.mount().await;

    loop {
        println!();
        println!("{}", render::history(&dashboard.history().entries(), Utc::now()));
        println!();

        let action = match Select::new("What next?", menu_actions(!dashboard.history().is_empty()))
            .prompt()
        {
            Ok(action) => action,
            Err(err) if is_cancel(&err) => return Ok(()),
            Err(err) => return Err(anyhow!(err)),
        };

        // Failed actions print the banner and return to the menu.
        let result = match action {
            MenuAction::Search => {
                let query = match Text::new("City:")
                    .with_placeholder("e.g., London, Paris, Tokyo")
                    .prompt()
                {
                    Ok(query) => query,
                    Err(err) if is_cancel(&err) => continue,
                    Err(err) => return Err(anyhow!(err)),
                };
                search(dashboard, &query).await
            }
            MenuAction::OpenRecent => {
                let now = Utc::now();
                let choices: Vec<_> = dashboard
                    .history()
                    .entries()
                    .into_iter()
                    .map(|entry| RecentChoice { label: render::history_choice(&entry, now), entry })
                    .collect();

                match Select::new("Recent searches:", choices).prompt() {
                    Ok(choice) => search(dashboard, &choice.entry.city_name).await,
                    Err(err) if is_cancel(&err) => continue,
                    Err(err) => return Err(anyhow!(err)),
                }
            }
            MenuAction::ClearHistory => match confirm_and_clear(dashboard, false).await {
                Ok(outcome) => {
                    report_clear(outcome);
                    Ok(())
                }
                Err(err) => Err(err.to_string()),
            },
            MenuAction::Quit => return Ok(()),
        };

        if let Err(message) = result {
            println!("{}", render::error_banner(&message));
        }
    }
}

async fn search(dashboard: &Dashboard, query: &str) -> Result<(), String> {
    if !query.trim().is_empty() {
        println!("Fetching weather data...");
    }

    match dashboard.submit(query).await {
        Ok(weather) => {
            println!();
            println!("{}", render::snapshot(&weather));
            Ok(())
        }
        Err(SearchError::Superseded) => Ok(()),
        Err(err) => Err(err.to_string()),
    }
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(err, InquireError::OperationCanceled | InquireError::OperationInterrupted)
}
