use clap::Parser;
use inquire::Text;
use weather_agent_core::{Config, ConfigError, WeatherAgent};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-agent",
    version,
    about = "Weather Agent Demo - ask about the weather anywhere"
)]
pub struct Cli {
    /// Question to ask; prompts interactively when absent.
    pub query: Option<String>,

    /// Override the language model used for both calls.
    #[arg(long)]
    pub model: Option<String>,

    /// Show debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Outcome of reading the user's question.
#[derive(Debug, PartialEq, Eq)]
pub enum Query {
    Text(String),
    Empty,
}

impl Query {
    pub fn from_input(input: Option<String>) -> Self {
        match input {
            Some(text) if !text.trim().is_empty() => Query::Text(text.trim().to_string()),
            _ => Query::Empty,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = match Config::load() {
            Ok(config) => config.with_model(self.model),
            Err(err) => exit_with_config_error(&err),
        };

        let agent = WeatherAgent::from_config(&config);

        print_welcome();

        let input = match self.query {
            Some(query) => Some(query),
            None => prompt_for_query()?,
        };

        let query = match Query::from_input(input) {
            Query::Text(text) => text,
            Query::Empty => {
                tracing::warn!("No input provided. Goodbye!");
                return Ok(());
            }
        };

        println!();
        let response = agent.answer(&query).await;

        println!();
        println!("🤖 Agent Response:");
        println!("{response}");
        println!();
        println!("Thanks for trying the Weather Agent Demo! 👋");

        Ok(())
    }
}

fn exit_with_config_error(err: &ConfigError) -> ! {
    eprintln!("error: {err}");
    if let ConfigError::MissingEnvVar(_) = err {
        eprintln!("hint: create a .env file or export the variable before running weather-agent");
    }
    std::process::exit(1);
}

fn print_welcome() {
    println!("🌤️  Welcome to the Weather Agent Demo!");
    println!("Ask me about the weather in any city around the world!");
    println!("Examples:");
    println!("  • \"What's the weather like in Tokyo?\"");
    println!("  • \"Is it raining in London right now?\"");
    println!("  • \"How warm is it in Miami today?\"");
    println!();
}

/// `None` when the prompt is cancelled or the terminal can't be read.
fn prompt_for_query() -> anyhow::Result<Option<String>> {
    use inquire::InquireError;

    match Text::new("🤔 What would you like to know?")
        .with_placeholder("Type your question here...")
        .prompt()
    {
        Ok(text) => Ok(Some(text)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(InquireError::NotTTY) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
