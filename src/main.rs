#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pagestate::{BrowserType, PageConfig, PageError, SharedDriver, WebDriverSession};

mod commands;

use commands::template::TemplateArgs;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_COMMAND_ERROR: i32 = 1;

#[derive(Parser)]
#[command(name = "pagestate")]
#[command(about = "Check which page state a browser is in", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// WebDriver URL (defaults to localhost:4444 for Firefox, localhost:9515 for Chrome)
    #[arg(long, global = true)]
    webdriver: Option<String>,

    /// Browser to use
    #[arg(short, long, global = true, default_value = "firefox")]
    browser: String,

    /// Run browser in visible mode (disables headless)
    #[arg(long = "no-headless", global = true)]
    no_headless: bool,

    /// JSON file with timing configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the current page matches a template
    Check {
        /// URL to navigate to before checking
        #[arg(value_name = "URL")]
        navigate: Option<String>,

        /// Keep polling until the page matches
        #[arg(long)]
        wait: bool,

        /// Wait for document.readyState == "complete" first
        #[arg(long)]
        ready: bool,

        /// Give up waiting after this many milliseconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Interval between match attempts in milliseconds
        #[arg(long)]
        poll: Option<u64>,

        #[command(flatten)]
        template: TemplateArgs,
    },

    /// Switch to the first open window that matches a template
    LocateWindow {
        /// Give up after this many milliseconds
        #[arg(long)]
        timeout: Option<u64>,

        #[command(flatten)]
        template: TemplateArgs,
    },
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(output) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
            );
            std::process::exit(EXIT_SUCCESS)
        }
        Err(err) => {
            let exit_code = err
                .downcast_ref::<PageError>()
                .map(PageError::exit_code)
                .unwrap_or(EXIT_COMMAND_ERROR);

            // Output JSON error to stdout for programmatic consumption
            let error_json = json!({
                "error": true,
                "message": format!("{:#}", err),
                "exit_code": exit_code
            });
            println!(
                "{}",
                serde_json::to_string(&error_json).unwrap_or_else(|_| "{}".to_string())
            );

            eprintln!("Error: {:#}", err);
            std::process::exit(exit_code);
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<PageConfig> {
    match path {
        Some(path) => PageConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(PageConfig::default()),
    }
}

async fn run() -> Result<Value> {
    // Initialize tracing to stderr (so JSON output to stdout remains clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagestate=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let cli = Cli::parse();
    let browser_type: BrowserType = cli.browser.parse()?;

    let mut config = load_config(cli.config.as_ref())?;
    match &cli.command {
        Commands::Check { template, .. } | Commands::LocateWindow { template, .. } => {
            template.ensure_conditions()?
        }
    }

    let session = Arc::new(
        WebDriverSession::connect(browser_type, cli.webdriver.as_deref(), !cli.no_headless).await?,
    );
    let driver: SharedDriver = session.clone();

    let result = match cli.command {
        Commands::Check {
            navigate,
            wait,
            ready,
            timeout,
            poll,
            template,
        } => {
            if let Some(poll) = poll {
                config.wait_poll_ms = poll;
            }
            commands::check::handle_check(driver, &template, config, navigate, wait, ready, timeout)
                .await
        }

        Commands::LocateWindow { timeout, template } => {
            commands::locate_window::handle_locate_window(driver, &template, config, timeout).await
        }
    };

    // Always end the WebDriver session, even when the command failed
    if let Err(e) = session.close().await {
        tracing::debug!("Failed to close session: {}", e);
    }

    result
}
