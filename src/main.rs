//! hospdash - Hospital discharge statistics in the terminal
//!
//! A terminal UI application that pulls four discharge datasets from a
//! paginated REST API and shows diagnoses, sex, severity and length-of-stay
//! breakdowns. `--summary` prints the same figures as text and `--check`
//! only probes the API.

mod app;
mod ui;

use std::io;
use std::panic;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use hospdash::cli::{Cli, RunMode, StartupConfig};
use hospdash::config::Config;
use hospdash::data::{Catalog, OrdsClient};
use hospdash::logging::{init_logging, LogTarget};
use hospdash::report::SummaryReport;

use app::{App, AppState};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

fn load_env_file(startup: &StartupConfig) -> anyhow::Result<()> {
    match &startup.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("failed to read env file {}", path.display()))?;
        }
        None => {
            // A missing ./.env is fine; the variables may already be exported
            dotenvy::dotenv().ok();
        }
    }
    Ok(())
}

async fn run_check(catalog: &Catalog) -> ExitCode {
    let base_url = catalog.source().base_url().to_string();
    match catalog.source().check_connection().await {
        Ok(()) => {
            println!("OK: data API reachable at {base_url}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("FAILED: {base_url}: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run_summary(catalog: &Catalog, config: &Config) -> ExitCode {
    let bundle = catalog.fetch_all().await;
    print!("{}", SummaryReport::new(&bundle, config.tie_break, Local::now()));
    if bundle.all_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn run_dashboard(
    catalog: &Catalog,
    config: &Config,
    startup: &StartupConfig,
) -> anyhow::Result<()> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::with_startup_config(startup, config.theme, config.tie_break);

    // Initial render to show loading state
    terminal.draw(|f| ui::render(f, &app))?;

    // Trigger initial data load
    app.load_all_data(catalog).await;

    // Main event loop
    loop {
        if app.refresh_requested {
            app.refresh_requested = false;
            app.state = AppState::Loading;
            terminal.draw(|f| ui::render(f, &app))?;
            app.refresh(catalog).await;
        }

        // Render UI
        terminal.draw(|f| ui::render(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

async fn run(startup: StartupConfig) -> anyhow::Result<ExitCode> {
    load_env_file(&startup)?;

    let config = Config::from_env().context("failed to load configuration")?;
    let level = startup
        .log_level
        .clone()
        .unwrap_or_else(|| config.log_level.clone());
    let target = match startup.mode {
        RunMode::Dashboard => LogTarget::File(config.log_dir.clone()),
        RunMode::Summary | RunMode::Check => LogTarget::Stderr,
    };
    let _logging_guard = init_logging(&level, &target).context("failed to initialise logging")?;

    tracing::info!(
        base_url = %config.api.base_url,
        page_size = config.api.page_size,
        cache_timeout_secs = config.cache_timeout.as_secs(),
        mode = ?startup.mode,
        "Starting hospdash"
    );

    let client = OrdsClient::new(&config.api).context("failed to build HTTP client")?;
    let catalog = Catalog::new(client, config.api.page_request(), config.cache_timeout);

    let code = match startup.mode {
        RunMode::Check => run_check(&catalog).await,
        RunMode::Summary => run_summary(&catalog, &config).await,
        RunMode::Dashboard => {
            run_dashboard(&catalog, &config, &startup).await?;
            ExitCode::SUCCESS
        }
    };
    Ok(code)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let startup = match StartupConfig::from_cli(&cli) {
        Ok(startup) => startup,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    match run(startup).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
