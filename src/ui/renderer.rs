//! Main UI rendering and coordination

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use super::components::HostComponent;
use super::core::{Action, Component, EventHandler, EventType};
use crate::config::Config;
use crate::logger::Logger;

/// Run the main TUI application
pub async fn run_app(config: Config, logger: Logger) -> Result<()> {
    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if config.ui.mouse_enabled {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut host = HostComponent::new(config, logger);
    let res = match host.init() {
        Ok(()) => run_ui(&mut terminal, &mut host).await,
        Err(e) => Err(e),
    };

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

/// Main UI loop
async fn run_ui(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, host: &mut HostComponent) -> Result<()> {
    let mut events = EventHandler::new();

    loop {
        terminal.draw(|f| {
            let area = f.area();
            host.render(f, area);
        })?;

        let action = match events.next_event().await? {
            EventType::Key(key) if key.kind == KeyEventKind::Press => host.handle_events(Some(Event::Key(key))),
            EventType::Mouse(mouse) => host.handle_events(Some(Event::Mouse(mouse))),
            // Resize is picked up by the next draw
            _ => Action::None,
        };

        if host.update(action) == Action::Quit {
            log::info!("Quit requested");
            break;
        }
    }

    Ok(())
}
