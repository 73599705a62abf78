use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use stockcrew::market::MarketContextProvider;
use stockcrew::models::CrewConfig;
use stockcrew::report::{format_currency_text, render_sections, split_sections};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stockcrew", about = "Multi-agent equity research reports")]
struct Cli {
    /// Ticker to analyze; prompted for when omitted
    #[arg(short, long)]
    ticker: Option<String>,

    /// Path to a TOML configuration file; built-in crew when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the dollar and bitcoin quote lookup
    #[arg(long)]
    no_market_context: bool,

    /// Directory for report artifacts, overriding the configuration
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Print the final report exactly as the agent wrote it
    #[arg(long)]
    raw: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let raw_ticker = match cli.ticker {
        Some(ticker) => ticker,
        None => prompt_ticker()?,
    };
    let ticker = stockcrew::validate_ticker(&raw_ticker).context("Invalid ticker")?;

    let mut config = match &cli.config {
        Some(path) => stockcrew::load_config(path)?,
        None => CrewConfig::default(),
    };
    if let Some(dir) = cli.output_dir {
        config.artifacts.output_dir = dir;
    }
    std::fs::create_dir_all(&config.artifacts.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.artifacts.output_dir
        )
    })?;

    if !stockcrew::agents::claude_cli::check_cli_available().await {
        bail!("claude CLI not found on PATH");
    }

    let executor = stockcrew::build_pipeline(&config).context("Failed to build pipeline")?;
    let market = if config.market.enabled && !cli.no_market_context {
        Some(
            MarketContextProvider::from_config(&config.market)
                .context("Failed to build quote client")?,
        )
    } else {
        None
    };

    let analysis = stockcrew::analyze(&executor, market.as_ref(), &ticker)
        .await
        .map_err(|f| {
            anyhow::anyhow!(
                "Analysis failed after {} completed task(s): {}",
                f.partial.len(),
                f.error
            )
        })?;

    for path in analysis.result.artifacts() {
        info!(path = %path.display(), "Report saved");
    }

    let report = if cli.raw {
        analysis.report
    } else {
        render_sections(&split_sections(&format_currency_text(&analysis.report)))
    };
    println!("{report}");

    Ok(())
}

fn prompt_ticker() -> Result<String> {
    let mut stderr = std::io::stderr();
    write!(stderr, "Which ticker should I analyze? ")?;
    stderr.flush()?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read ticker from stdin")?;
    Ok(line.trim().to_string())
}
