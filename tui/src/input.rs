//! Input handling for the tally TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};
use tokio::sync::mpsc;
use tracing::debug;

use tally_engine::manipulator::{GestureEvent, GestureOutcome, GestureTarget};
use tally_engine::{App, ClickKind, CursorMove, PracticeView, Press, RenameError};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close the receiver first so a blocked send in the input thread returns.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    // Bounded queue: apply backpressure instead of dropping events.
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if apply_event(app, ev) {
            return Ok(true);
        }
        processed += 1;
    }
    Ok(app.should_quit())
}

/// Apply one terminal event. Returns whether the app should quit.
pub fn apply_event(app: &mut App, event: Event) -> bool {
    match event {
        Event::Key(key) => {
            // Handle press + repeat events (ignore releases)
            if matches!(key.kind, KeyEventKind::Release) {
                return app.should_quit();
            }

            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                app.request_quit();
                return true;
            }

            app.clear_status();
            if app.modal().is_some() {
                handle_modal(app, key);
                return app.should_quit();
            }
            match app.practice_view() {
                None => handle_select(app, key),
                Some(PracticeView::Flashcards) => handle_practice(app, key),
                Some(PracticeView::Table) => handle_table(app, key),
                Some(PracticeView::GridDrill) => handle_grid_drill(app, key),
            }
        }
        Event::Mouse(mouse) => handle_mouse(app, mouse, Instant::now()),
        // The hit map is rebuilt on the next draw; a press in flight may now
        // point at stale cells.
        Event::Resize(..) => app.view_mut().release_pointer(),
        _ => {}
    }
    app.should_quit()
}

fn handle_modal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => {
            app.close_modal();
        }
        KeyCode::Char('q') => app.request_quit(),
        _ => {}
    }
}

fn handle_select(app: &mut App, key: KeyEvent) {
    let Some(token) = app.select_token() else {
        return;
    };
    let mut mode = app.select_mode(token);

    if mode.is_renaming() {
        match key.code {
            KeyCode::Enter => match mode.rename_confirm() {
                Err(RenameError::Empty(_)) => app.set_status("A name needs at least one letter"),
                // Save failures already reported a status.
                Ok(()) | Err(RenameError::Roster(_)) => {}
            },
            KeyCode::Esc => mode.rename_cancel(),
            KeyCode::Backspace => mode.rename_backspace(),
            KeyCode::Char(c) => mode.rename_push(c),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('k') | KeyCode::Up => mode.move_up(),
        KeyCode::Char('j') | KeyCode::Down => mode.move_down(),
        KeyCode::Enter => {
            mode.confirm();
        }
        KeyCode::Char('e') => mode.begin_rename(),
        KeyCode::Char('d') => {
            app.cycle_difficulty();
        }
        KeyCode::Char('q') | KeyCode::Esc => app.request_quit(),
        _ => {}
    }
}

fn handle_practice(app: &mut App, key: KeyEvent) {
    if let KeyCode::Char('d') = key.code {
        app.cycle_difficulty();
        return;
    }
    if let KeyCode::Char('q') = key.code {
        app.request_quit();
        return;
    }
    if let KeyCode::Char('v') = key.code {
        app.cycle_view();
        return;
    }
    let Some(token) = app.practice_token() else {
        return;
    };
    let mut mode = app.practice_mode(token);
    match key.code {
        KeyCode::Char(c) if c.is_ascii_digit() => {
            mode.push_digit(c);
        }
        KeyCode::Backspace => mode.backspace(),
        KeyCode::Enter => {
            let outcome = mode.submit();
            debug!(?outcome, "Submitted answer");
        }
        KeyCode::Char('n') => mode.next_problem(),
        KeyCode::Char('h') => {
            mode.toggle_hint();
        }
        KeyCode::Char('g') => {
            mode.activate_group();
        }
        KeyCode::Left => mode.select_prev_shape(),
        KeyCode::Right | KeyCode::Tab => mode.select_next_shape(),
        KeyCode::Char(' ') => {
            mode.activate_selected_shape();
        }
        KeyCode::Char('r') => {
            mode.reset_manipulator();
        }
        KeyCode::Char('p') => mode.switch_player(),
        KeyCode::Esc => {
            mode.close_hint();
        }
        _ => {}
    }
}

fn handle_table(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('v') => {
            app.cycle_view();
        }
        KeyCode::Esc => {
            app.switch_view(PracticeView::Flashcards);
        }
        KeyCode::Char('p') => app.switch_player(),
        KeyCode::Char('q') => app.request_quit(),
        _ => {}
    }
}

fn handle_grid_drill(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('v') => {
            app.cycle_view();
            return;
        }
        KeyCode::Esc => {
            app.switch_view(PracticeView::Flashcards);
            return;
        }
        KeyCode::Char('p') => {
            app.switch_player();
            return;
        }
        KeyCode::Char('q') => {
            app.request_quit();
            return;
        }
        _ => {}
    }
    let Some(token) = app.drill_token() else {
        return;
    };
    let mut mode = app.drill_mode(token);
    match key.code {
        KeyCode::Char(c) if c.is_ascii_digit() => {
            mode.push_digit(c);
        }
        KeyCode::Backspace => mode.backspace(),
        KeyCode::Up | KeyCode::Char('k') => mode.move_cursor(CursorMove::Up),
        KeyCode::Down | KeyCode::Char('j') => mode.move_cursor(CursorMove::Down),
        KeyCode::Left | KeyCode::Char('h') => mode.move_cursor(CursorMove::Left),
        KeyCode::Right | KeyCode::Char('l') => mode.move_cursor(CursorMove::Right),
        KeyCode::Enter | KeyCode::Tab => mode.move_cursor(CursorMove::Next),
        KeyCode::Char('s') => mode.shuffle(),
        KeyCode::Char('c') => mode.reset(),
        _ => {}
    }
}

fn send_gesture(app: &mut App, event: GestureEvent) -> Option<GestureOutcome> {
    let token = app.practice_token()?;
    app.practice_mode(token).gesture(event)
}

/// Translate a left-button mouse event into gesture events using the hit
/// map from the last frame.
///
/// A press only records its target. The first motion with the button held
/// starts the drag; release over the accumulator drops, anywhere else
/// cancels. A press and release with no motion is a click: a click on the
/// Primary group moves it, a double click on a shape moves that shape.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.modal().is_some() {
                app.close_modal();
                return;
            }
            let view = app.view_mut();
            view.press = view.hit_map.target_at(column, row).map(Press::new);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let view = app.view_mut();
            let Some(press) = view.press.as_mut() else {
                return;
            };
            let start = !press.dragging;
            press.dragging = true;
            let target = press.target;
            let over_drop_target = view.hit_map.over_drop_target(column, row);
            if start {
                send_gesture(app, GestureEvent::DragStart(target));
            }
            send_gesture(app, GestureEvent::DragOver { over_drop_target });
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let view = app.view_mut();
            let Some(press) = view.press.take() else {
                return;
            };
            if press.dragging {
                let over_drop_target = view.hit_map.over_drop_target(column, row);
                send_gesture(app, GestureEvent::DragOver { over_drop_target });
                let finish = if over_drop_target {
                    GestureEvent::Drop
                } else {
                    GestureEvent::Cancel
                };
                send_gesture(app, finish);
                return;
            }
            match press.target {
                GestureTarget::PrimaryGroup => {
                    send_gesture(app, GestureEvent::Activate(press.target));
                }
                GestureTarget::Shape(_) => {
                    if view.clicks.register(press.target, now) == ClickKind::Double {
                        send_gesture(app, GestureEvent::Activate(press.target));
                    }
                }
            }
        }
        _ => {}
    }
}
