//! Shared test utilities and fixtures

#![allow(dead_code)]

use ratatui::{Terminal, backend::TestBackend};

use tally_engine::{App, AppOptions, Picker, ProblemGenerator, Roster};
use tally_types::default_players;

/// Replays a fixed list of addends, cycling.
pub struct Scripted {
    values: Vec<u32>,
    next: usize,
}

impl Scripted {
    pub fn new(values: &[u32]) -> Self {
        Self {
            values: values.to_vec(),
            next: 0,
        }
    }
}

impl Picker for Scripted {
    fn pick(&mut self, low: u32, high: u32) -> u32 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value.clamp(low, high)
    }

    fn coin(&mut self) -> bool {
        false
    }
}

pub fn app_with(roster: Roster, values: &[u32], options: AppOptions) -> App {
    App::with_parts(
        roster,
        ProblemGenerator::with_picker(Scripted::new(values)),
        options,
    )
}

/// In-memory roster, 3 + 2 forever.
pub fn simple_app() -> App {
    app_with(
        Roster::in_memory(default_players()),
        &[3, 2],
        AppOptions::default(),
    )
}

/// Pick the highlighted player and start practicing.
pub fn start(app: &mut App) {
    let token = app.select_token().expect("on player select");
    assert!(app.select_mode(token).confirm());
}

/// Draw one frame and return the screen as text, one line per row.
pub fn render(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("test backend");
    terminal
        .draw(|frame| tally_tui::draw(frame, app))
        .expect("draw");
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..height {
        for x in 0..width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}
