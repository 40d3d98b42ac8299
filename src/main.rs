use clap::Parser;
use marketbrief::cli::commands::{Cli, Commands};
use marketbrief::config::Settings;
use marketbrief::domain::entities::pipeline_run::PipelineRun;
use marketbrief::domain::values::market_scope::MarketScope;
use marketbrief::MarketBrief;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let mb = MarketBrief::new(&settings);
    match run_command(mb, cli.command).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = Settings::from_env()?;
    if let Some(news) = &cli.news {
        settings.news_mode = news.parse()?;
    }
    if let Some(language) = &cli.language {
        settings.pipeline.language = language.parse()?;
    }
    if let Some(budget) = cli.char_budget {
        settings.pipeline.char_budget = budget;
    }
    Ok(settings)
}

/// Returns `Ok(false)` when a pipeline run ended in `Failed`.
async fn run_command(mb: MarketBrief, cmd: Commands) -> Result<bool, Box<dyn std::error::Error>> {
    match cmd {
        Commands::Analyze { symbol } => report(mb.analyze(&symbol).await),
        Commands::Scan { symbols } => report(mb.scan(symbols).await),
        Commands::Discover { scope } => {
            let scope: MarketScope = scope.parse()?;
            report(mb.discover(scope).await)
        }
        Commands::Quote { symbols } => {
            let quotes = mb.quotes(&symbols).await;
            println!("{}", serde_json::to_string_pretty(&quotes)?);
            Ok(true)
        }
        Commands::Headlines { scope, symbols, limit } => {
            let batch = if symbols.is_empty() {
                let scope: MarketScope = scope.parse()?;
                mb.headlines(scope, limit).await
            } else {
                mb.symbol_headlines(&symbols, limit).await
            };
            println!("{}", serde_json::to_string_pretty(&batch)?);
            Ok(true)
        }
    }
}

fn report(run: PipelineRun) -> Result<bool, Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&run)?);
    if let Some(failure) = run.failure() {
        eprintln!("Error: {failure}");
        return Ok(false);
    }
    Ok(true)
}
