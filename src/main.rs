use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use skypane::logging::{self, LogTarget};
use skypane::orchestrator::{AppState, DisplayState};
use skypane::report::{self, ViewSelection};
use skypane::{DisplayUnit, ErrorCode, OpenMeteoClient, SkypaneConfig, WeatherOrchestrator};

#[derive(Parser, Debug)]
#[command(name = "skypane", version)]
#[command(about = "City weather lookup with an animated terminal view (Open-Meteo)")]
struct Cli {
    /// Configuration file (default: $CONFIG_DIR/skypane/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive terminal view (default)
    Tui,
    /// Look up one city and print the result
    Lookup {
        /// City name, e.g. "Buenos Aires"
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,

        /// metric or imperial (default: configured unit)
        #[arg(long)]
        unit: Option<DisplayUnit>,

        /// Which views to print
        #[arg(long, value_enum, default_value_t = ViewSelection::All)]
        view: ViewSelection,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = SkypaneConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;

    let command = cli.command.unwrap_or(Command::Tui);
    let target = match command {
        Command::Tui => LogTarget::File,
        Command::Lookup { .. } => LogTarget::Stderr,
    };
    logging::init(&config.logging, cli.verbose, target)?;
    debug!("Loaded configuration: {:?}", config);

    let client = OpenMeteoClient::new(&config.service).context("Failed to create weather client")?;
    let orchestrator = WeatherOrchestrator::open_meteo(client);

    match command {
        Command::Tui => skypane::tui::run(&config, orchestrator).await,
        Command::Lookup {
            city,
            unit,
            view,
            json,
        } => {
            let unit = unit.unwrap_or(config.display.unit);
            lookup(&orchestrator, &city.join(" "), unit, view, json).await
        }
    }
}

async fn lookup(
    orchestrator: &WeatherOrchestrator,
    city: &str,
    unit: DisplayUnit,
    view: ViewSelection,
    json: bool,
) -> Result<()> {
    let mut state = AppState::new(unit);
    orchestrator.search(&mut state, city).await;

    match state.display() {
        DisplayState::Forecast(views) => {
            let output = if json {
                report::format_json(&views, view)?
            } else {
                report::format_text(&views, view)
            };
            print!("{output}");
            Ok(())
        }
        DisplayState::Error(message) => {
            if json {
                let code = state.last_error_code().unwrap_or(ErrorCode::MalformedResponse);
                println!("{}", report::format_json_error(code, &message)?);
            }
            anyhow::bail!(message)
        }
        DisplayState::Idle | DisplayState::Loading => {
            anyhow::bail!("Lookup for '{city}' did not complete")
        }
    }
}
