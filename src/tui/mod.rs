//! Interactive terminal view

pub mod app;
pub mod backdrop;
pub mod draw;
pub mod input;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use crate::ambient::AmbientController;
use crate::config::SkypaneConfig;
use crate::orchestrator::WeatherOrchestrator;
use app::UiApp;
use backdrop::Backdrop;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Run the terminal view until the user quits
pub async fn run(config: &SkypaneConfig, orchestrator: WeatherOrchestrator) -> Result<()> {
    let ambient = if config.display.animations {
        AmbientController::new(Backdrop::new(config.display.mono))
    } else {
        AmbientController::detached()
    };
    let mut app = UiApp::new(
        orchestrator,
        config.display.unit,
        ambient,
        config.display.mono,
    );

    let mut terminal = setup_terminal().context("Failed to set up terminal")?;
    info!("Terminal view started");

    let outcome = event_loop(&mut terminal, &mut app).await;

    restore_terminal(&mut terminal).context("Failed to restore terminal")?;
    info!("Terminal view closed");
    outcome
}

async fn event_loop(terminal: &mut Term, app: &mut UiApp) -> Result<()> {
    let mut last_frame = Instant::now();

    while !app.should_quit() {
        app.drain_results();

        let dt = last_frame.elapsed().as_secs_f32();
        last_frame = Instant::now();
        let main = draw::layout(terminal.size()?).main;
        if let Some(backdrop) = app.backdrop_mut() {
            backdrop.tick(main.width, main.height, dt);
        }

        terminal.draw(|frame| draw::draw(frame, app))?;

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Some(action) = input::action_for(key) {
                    app.handle(action);
                }
            }
        }

        tokio::time::sleep(frame_delay(last_frame.elapsed())).await;
    }

    Ok(())
}

/// Time left in the current frame; zero once the frame overran
fn frame_delay(spent: Duration) -> Duration {
    FRAME_INTERVAL.saturating_sub(spent)
}

fn setup_terminal() -> Result<Term> {
    terminal::enable_raw_mode()?;
    let mut out = io::stdout();
    execute!(out, EnterAlternateScreen, cursor::Hide)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    execute!(io::stdout(), cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    terminal.show_cursor()?;
    Ok(())
}
