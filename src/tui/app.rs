//! TUI Application - terminal ownership and the run loop

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::events::map_event;
use super::theme::InspectorTheme;
use super::widgets::{self, Chrome};
use crate::session::{Flow, Session};

type Backend = CrosstermBackend<Stdout>;

/// TUI Application
pub struct TuiApp {
    session: Session,
    theme: InspectorTheme,
    chrome: Chrome,
    tick: Duration,
    cancel: CancellationToken,
}

impl TuiApp {
    pub fn new(session: Session, chrome: Chrome, tick: Duration, cancel: CancellationToken) -> Self {
        Self {
            session,
            theme: InspectorTheme::new(),
            chrome,
            tick,
            cancel,
        }
    }

    /// Run until quit, input end or cancellation.
    ///
    /// The terminal is restored on every exit path, panics included, and the
    /// cancellation token is fired on the way out.
    pub async fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();
        let mut guard = TerminalGuard::acquire()?;
        info!(source = %self.chrome.source, "inspector started");

        let result = self.main_loop(&mut guard.terminal).await;

        self.cancel.cancel();
        drop(guard);
        info!("inspector stopped");
        result
    }

    /// Main event loop: fixed-tick rebuild plus key handling
    async fn main_loop(&mut self, terminal: &mut Terminal<Backend>) -> anyhow::Result<()> {
        let mut ticker = tokio::time::interval(self.tick);
        let mut events = EventStream::new();

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.session.rebuild();
                    self.redraw(terminal)?;
                }
                next = events.next() => match next {
                    Some(Ok(event)) => {
                        if self.handle(&event) == Flow::Quit {
                            debug!("quit requested");
                            break;
                        }
                        self.redraw(terminal)?;
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }
        }

        Ok(())
    }

    fn handle(&mut self, event: &Event) -> Flow {
        match map_event(event) {
            Some(command) => {
                debug!(?command, "command");
                self.session.apply(command)
            }
            None => Flow::Continue,
        }
    }

    fn redraw(&mut self, terminal: &mut Terminal<Backend>) -> anyhow::Result<()> {
        let Self {
            session,
            theme,
            chrome,
            ..
        } = self;
        terminal.draw(|frame| widgets::draw(frame, session, theme, chrome))?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Terminal ownership
// ─────────────────────────────────────────────────────────────────────────────

/// Raw mode + alternate screen for as long as it lives
struct TerminalGuard {
    terminal: Terminal<Backend>,
}

impl TerminalGuard {
    fn acquire() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Best effort cleanup
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Leave raw mode before the panic message is printed
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}
