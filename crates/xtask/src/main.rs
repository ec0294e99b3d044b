//! xtask: Developer tasks for the FashionHub storefront suite
//!
//! ## Usage
//!
//! ```bash
//! cargo xtask list                                    # List scenarios
//! cargo xtask smoke                                   # Run every scenario
//! cargo xtask smoke --scenario cart --scenario search # Run a subset
//! cargo xtask smoke --base-url http://localhost:4000 --browser firefox --headed
//! ```
//!
//! Settings not given on the command line come from `STOREFRONT_CONFIG` and
//! the `STOREFRONT_*` environment variables.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};
use storefront_pom::{BrowserKind, BrowserSession, Fixtures, Scenario, SuiteConfig, scenarios};

#[derive(Parser)]
#[command(name = "xtask", about = "Developer tasks for the FashionHub storefront suite")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run UI scenarios against a storefront, one browser per scenario
    Smoke(SmokeArgs),
    /// List the registered scenarios
    List,
}

#[derive(Args)]
struct SmokeArgs {
    /// Storefront root URL
    #[arg(long)]
    base_url: Option<String>,

    /// chromium, firefox or webkit
    #[arg(long)]
    browser: Option<String>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Run only the named scenario (repeatable)
    #[arg(long = "scenario", value_name = "NAME")]
    scenarios: Vec<String>,

    /// JSON file overriding the built-in fixtures
    #[arg(long)]
    fixtures: Option<PathBuf>,

    /// Where failure screenshots are written
    #[arg(long)]
    screenshot_dir: Option<PathBuf>,
}

struct Outcome {
    name: &'static str,
    elapsed: Duration,
    error: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Smoke(args) => smoke(args).await,
        Command::List => {
            for scenario in scenarios::all() {
                println!("{:<16} {}", scenario.name, scenario.description);
            }
            Ok(true)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn suite_config(args: &SmokeArgs) -> Result<SuiteConfig> {
    let mut config = SuiteConfig::from_env().context("loading suite configuration")?;
    if let Some(url) = &args.base_url {
        config = config.base_url(url)?;
    }
    if let Some(browser) = &args.browser {
        config = config.browser(browser.parse::<BrowserKind>()?);
    }
    if args.headed {
        config = config.headless(false);
    }
    if let Some(dir) = &args.screenshot_dir {
        config = config.screenshot_dir(dir);
    }
    Ok(config)
}

fn selected(names: &[String]) -> Result<Vec<&'static Scenario>> {
    if names.is_empty() {
        return Ok(scenarios::all().iter().collect());
    }
    names
        .iter()
        .map(|name| match scenarios::find(name) {
            Some(scenario) => Ok(scenario),
            None => {
                let known: Vec<&str> = scenarios::all().iter().map(|s| s.name).collect();
                bail!("unknown scenario '{name}' (known: {})", known.join(", "))
            }
        })
        .collect()
}

/// Runs the selected scenarios. Returns whether all of them passed.
async fn smoke(args: SmokeArgs) -> Result<bool> {
    let config = suite_config(&args)?;
    let fixtures = Arc::new(match &args.fixtures {
        Some(path) => Fixtures::from_file(path)?,
        None => Fixtures::default(),
    });
    let selected = selected(&args.scenarios)?;

    tracing::info!(
        base_url = %config.base_url,
        browser = %config.browser,
        scenarios = selected.len(),
        "Starting smoke run"
    );

    let mut outcomes = Vec::with_capacity(selected.len());
    for scenario in selected {
        outcomes.push(run_one(scenario, &config, fixtures.clone()).await?);
    }

    println!();
    for outcome in &outcomes {
        match &outcome.error {
            None => println!("PASS {} ({:.1?})", outcome.name, outcome.elapsed),
            Some(e) => println!("FAIL {} ({:.1?}): {e}", outcome.name, outcome.elapsed),
        }
    }
    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    println!("\n{} passed, {failed} failed", outcomes.len() - failed);

    Ok(failed == 0)
}

async fn run_one(
    scenario: &'static Scenario,
    config: &SuiteConfig,
    fixtures: Arc<Fixtures>,
) -> Result<Outcome> {
    tracing::info!(scenario = scenario.name, "{}", scenario.description);
    let started = Instant::now();

    let browser = BrowserSession::launch(config)
        .await
        .with_context(|| format!("launching browser for '{}'", scenario.name))?;
    let session = browser.session().clone();

    let error = match scenario.run(session.clone(), fixtures).await {
        Ok(()) => None,
        Err(e) => {
            tracing::error!(scenario = scenario.name, error = %e, "Scenario failed");
            if let Err(shot) = session.capture_failure(scenario.name).await {
                tracing::warn!(error = %shot, "Could not capture failure screenshot");
            }
            Some(e.to_string())
        }
    };

    if let Err(e) = browser.close().await {
        tracing::warn!(error = %e, "Browser did not close cleanly");
    }

    Ok(Outcome {
        name: scenario.name,
        elapsed: started.elapsed(),
        error,
    })
}
