//! Interactive history browser.
//!
//! Live filtering, per-entry delete and clear-all over the history store.
//! The terminal is restored on exit and on panic.

pub mod state;
pub mod ui;

use std::io::{self, Stdout};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::history::{HistoryStore, Outcome};
use crate::store::BlobStore;
use state::{BrowserState, Effect};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

pub fn restore_terminal(mut terminal: Tui) -> io::Result<()> {
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    terminal.show_cursor()
}

pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Run the browser until the user quits.
pub fn run<S: BlobStore>(history: &mut HistoryStore<S>) -> io::Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, history);
    restore_terminal(terminal)?;
    result
}

fn event_loop<S: BlobStore>(terminal: &mut Tui, history: &mut HistoryStore<S>) -> io::Result<()> {
    let mut state = BrowserState::new(history.list());

    while !state.should_quit {
        terminal.draw(|frame| ui::render(frame, &state))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        state.status = None;
        let outcome = match state.handle_key(key) {
            Effect::None => continue,
            Effect::Delete(id) => history.delete_by_id(&id),
            Effect::Clear => history.clear(),
        };

        if let Outcome::Failed(e) = outcome {
            state.status = Some(format!("Could not update history: {e}"));
        }
        state.reload(history.list());
    }

    Ok(())
}
