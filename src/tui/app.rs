use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::domain::error::{CrowComError, CrowComResult};

use super::{
    event::{AppEvent, EventHandler},
    state::AppState,
    ui::draw_ui,
};

fn tui_error(e: impl std::fmt::Display) -> CrowComError {
    CrowComError::Tui(e.to_string())
}

/// Owns the terminal for the lifetime of the interactive console.
///
/// Lines typed at the prompt are forwarded on `input_tx`; the loop ends on
/// Ctrl-C / Ctrl-Q or once the session drops its receiver.
pub struct App {
    state: AppState,
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    events: EventHandler,
    input_tx: mpsc::UnboundedSender<String>,
    tick_rate: Duration,
}

impl App {
    pub fn new(state: AppState, input_tx: mpsc::UnboundedSender<String>) -> CrowComResult<Self> {
        enable_raw_mode().map_err(tui_error)?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(tui_error(e));
        }
        let backend = CrosstermBackend::new(stdout);
        let terminal = match Terminal::new(backend) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                return Err(tui_error(e));
            }
        };

        Ok(Self {
            state,
            terminal,
            events: EventHandler::new(),
            input_tx,
            tick_rate: Duration::from_millis(50),
        })
    }

    /// Blocking UI loop; run it on a blocking thread.
    pub fn run(&mut self) -> CrowComResult<()> {
        loop {
            if self.input_tx.is_closed() {
                debug!("Session closed its input, leaving UI");
                break;
            }

            self.terminal
                .draw(|f| draw_ui(f, &mut self.state))
                .map_err(tui_error)?;

            if !event::poll(self.tick_rate).map_err(tui_error)? {
                continue;
            }
            match event::read().map_err(tui_error)? {
                Event::Key(key) => match self.events.handle_key_event(key, &mut self.state) {
                    Some(AppEvent::Quit) => {
                        info!("Quit from keyboard");
                        break;
                    }
                    Some(AppEvent::Submit(line)) => {
                        if self.input_tx.send(line).is_err() {
                            break;
                        }
                    }
                    None => {}
                },
                Event::Resize(width, height) => {
                    self.state.terminal_size = (width, height);
                }
                _ => {}
            }
        }

        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
