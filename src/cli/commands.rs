use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "marketbrief",
    about = "Quotes + headlines in, LLM trading recommendation out"
)]
pub struct Cli {
    /// News strategy override (feed, scrape)
    #[arg(long, global = true)]
    pub news: Option<String>,
    /// Response language override (en, zh-TW)
    #[arg(long, global = true)]
    pub language: Option<String>,
    /// Character budget override for the LLM context
    #[arg(long, global = true)]
    pub char_budget: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze one ticker (e.g. AAPL, 2330.TW)
    Analyze {
        symbol: String,
    },
    /// Scan a watchlist and recommend the best opportunity
    Scan {
        #[arg(required = true, num_args = 1..)]
        symbols: Vec<String>,
    },
    /// Let the news pick the tickers
    Discover {
        /// Market scope (domestic, international)
        #[arg(long, default_value = "international")]
        scope: String,
    },
    /// Fetch quotes only
    Quote {
        #[arg(required = true, num_args = 1..)]
        symbols: Vec<String>,
    },
    /// Fetch headlines only
    Headlines {
        /// Market scope (domestic, international)
        #[arg(long, default_value = "international")]
        scope: String,
        /// Ticker to fetch news for; repeatable. Overrides --scope.
        #[arg(long = "symbol")]
        symbols: Vec<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
}
