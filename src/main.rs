mod app;
mod cli;
mod config;
mod datasources;
mod error;
mod logic;
mod models;
mod ui;

use app::{App, Screen};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use datasources::{AutoDataClient, RecommendationClient};
use error::Result;
use logic::FormController;
use models::Coordinate;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::screens::{FormScreen, RecommendationsScreen};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        init_stderr_logging(&cli);
        Config::setup_interactive()?;
        return Ok(());
    }

    let config = match Config::load(cli.config.clone()) {
        Ok(c) => c.with_api_base(cli.api_base.clone()),
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Run `cropwise init` or pass --config <path>");
            std::process::exit(1);
        }
    };

    if let Some(Commands::Check) = cli.command {
        init_stderr_logging(&cli);
        return run_check(&config).await;
    }

    // The terminal belongs to the UI, so the TUI logs to a file.
    let log_path = Config::log_path()?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&cli))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    tracing::info!(base_url = %config.api.base_url, "starting cropwise");

    let auto_data = Arc::new(AutoDataClient::new(config.api.base_url.clone()));
    let recommender = Arc::new(RecommendationClient::new(config.api.base_url.clone()));
    let mut controller =
        FormController::new(auto_data, recommender, config.preferred_language.clone());
    controller.initialize();

    let mut app = App::new(config, controller);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app).await;
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn env_filter(cli: &Cli) -> EnvFilter {
    if cli.verbose > 0 {
        return EnvFilter::new(cli.log_filter());
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()))
}

fn init_stderr_logging(cli: &Cli) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(cli))
        .with_writer(io::stderr)
        .init();
}

async fn run_check(config: &Config) -> Result<()> {
    let base = if config.api.base_url.is_empty() {
        "(relative)"
    } else {
        config.api.base_url.as_str()
    };
    println!("API base URL:       {}", base);
    println!("Preferred language: {}", config.preferred_language);
    println!("Log file:           {}", Config::log_path()?.display());
    println!();

    let auto_data = Arc::new(AutoDataClient::new(config.api.base_url.clone()));
    let recommender = Arc::new(RecommendationClient::new(config.api.base_url.clone()));

    let auto_ok = match auto_data.test_connection(&Coordinate::default()).await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!("auto-data probe failed: {}", e);
            false
        }
    };

    // Probe with the same body the form would send on first launch.
    let request = FormController::new(
        auto_data.clone(),
        recommender.clone(),
        config.preferred_language.clone(),
    )
    .build_request();
    let recommend_ok = match recommender.test_connection(&request).await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!("recommendation probe failed: {}", e);
            false
        }
    };

    let label = |ok: bool| if ok { "OK" } else { "OFFLINE" };
    println!("Auto-data:       {}", label(auto_ok));
    println!("Recommendations: {}", label(recommend_ok));

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.tick();

        // Draw UI
        terminal.draw(|f| {
            let area = f.area();

            match app.screen {
                Screen::Form => {
                    let screen = FormScreen::new(&app.controller)
                        .with_focus(app.form_state.focused_field)
                        .editing(app.form_state.editing, &app.form_state.edit_buffer)
                        .with_status(app.status_message.as_deref())
                        .with_service(&app.config.api.base_url);
                    f.render_widget(screen, area);
                }
                Screen::Recommendations => {
                    let view = app.controller.view();
                    let screen = RecommendationsScreen::new(view.recommendations)
                        .with_selection(app.recommendations_state.selected_index)
                        .loading(view.recommending)
                        .with_warning(view.warning);
                    f.render_widget(screen, area);
                }
            }
        })?;

        // Handle input with timeout so pending requests keep landing
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                let editing = app.form_state.editing;
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.quit();
                    }
                    KeyCode::Char('q') if !editing => {
                        app.quit();
                    }
                    KeyCode::Esc if !editing => {
                        app.switch_screen(Screen::Form);
                    }
                    KeyCode::Char('f') if !editing => {
                        app.request_auto_fill();
                    }
                    KeyCode::Char('g') if !editing => {
                        app.request_recommendations();
                    }
                    KeyCode::Char(c) if !editing => {
                        if let Some(screen) = Screen::from_key(c) {
                            app.switch_screen(screen);
                        }
                    }
                    _ => handle_screen_input(app, key.code),
                }
            }
        }

        if app.should_quit {
            break;
        }

        tokio::task::yield_now().await;
    }

    Ok(())
}

fn handle_screen_input(app: &mut App, code: KeyCode) {
    match app.screen {
        Screen::Form => handle_form_input(app, code),
        Screen::Recommendations => handle_recommendations_input(app, code),
    }
}

fn handle_form_input(app: &mut App, code: KeyCode) {
    if app.form_state.editing {
        match code {
            KeyCode::Esc => app.form_state.cancel_editing(),
            KeyCode::Enter => app.commit_edit(),
            KeyCode::Backspace => {
                app.form_state.edit_buffer.pop();
            }
            KeyCode::Char(c) => app.form_state.edit_buffer.push(c),
            _ => {}
        }
    } else {
        match code {
            KeyCode::Up | KeyCode::BackTab => app.form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => app.form_state.next_field(),
            KeyCode::Enter => app.begin_edit(),
            _ => {}
        }
    }
}

fn handle_recommendations_input(app: &mut App, code: KeyCode) {
    let count = app.controller.recommendations().len();
    match code {
        KeyCode::Up => app.recommendations_state.prev(),
        KeyCode::Down => app.recommendations_state.next(count),
        _ => {}
    }
}
