use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use hotelql::agent::Agent;
use hotelql::config::{AppConfig, Overrides};
use hotelql::export;
use hotelql::llm::GeminiModel;

/// Ask a hotel booking PostgreSQL database questions in plain English
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The question to answer, e.g. "cancellation rate by hotel type"
    question: String,

    /// PostgreSQL connection URL (also: DATABASE_URL or config.toml)
    #[arg(long = "database-url")]
    database_url: Option<String>,

    /// Gemini model variant to use
    #[arg(long)]
    model: Option<String>,

    /// Output format for the result rows
    #[arg(long, value_enum, default_value = "table")]
    format: Format,

    /// Print the question, the generated SQL and a result preview
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Csv,
    Tsv,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(Overrides {
        database_url: cli.database_url.as_deref(),
        model: cli.model.as_deref(),
    })?;

    // Resolve password: PGPASSWORD env var, then interactive prompt
    if config.database.password.is_empty() {
        if let Ok(pw) = std::env::var("PGPASSWORD") {
            config.database.password = pw;
        } else {
            let prompt = format!("Password for {}: ", config.database.display_string());
            config.database.password = rpassword::read_password_from_tty(Some(&prompt))?;
        }
    }

    let model = GeminiModel::new(&config.gemini_api_key, &config.gemini_model)?;
    let agent = Agent::new(Arc::new(model), config.database).verbose(cli.verbose);

    match agent.ask(&cli.question).await? {
        Some(result) => {
            let rendered = match cli.format {
                Format::Table => export::render_table(&result),
                Format::Csv => export::to_csv(&result),
                Format::Tsv => export::to_tsv(&result),
                Format::Json => export::to_json(&result),
            };
            print!("{}", rendered);
        }
        None => eprintln!("no result: the generated SQL failed to execute"),
    }

    Ok(())
}
