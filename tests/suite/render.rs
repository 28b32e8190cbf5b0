//! Full-frame rendering through `tally_tui::draw`.

use std::time::Instant;

use tally_engine::{AppOptions, CursorMove, GRID_CELLS, GRID_SIZE, PracticeView, Roster, UiOptions};
use tally_types::default_players;

use crate::common::{app_with, render, simple_app, start};

#[test]
fn player_select_lists_roster() {
    let mut app = simple_app();
    let screen = render(&mut app, 60, 20);
    for name in ["Puppy", "Kitty", "Panda"] {
        assert!(screen.contains(name), "{name} missing:\n{screen}");
    }
    assert!(screen.contains("Lv 1"));
}

#[test]
fn practice_screen_shows_problem_and_aid() {
    let mut app = simple_app();
    start(&mut app);
    let screen = render(&mut app, 80, 40);
    assert!(screen.contains("3 + 2 = ?"), "{screen}");
    assert!(screen.contains("Question 1"));
    assert!(screen.contains("Press h"));

    let token = app.practice_token().unwrap();
    app.practice_mode(token).toggle_hint();
    let screen = render(&mut app, 80, 40);
    assert!(screen.contains("Counting aid"));
    assert!(screen.contains("Total: 0"));
    assert!(app.view().hit_map.drop_target().is_some());
}

#[test]
fn feedback_is_rendered() {
    let mut app = simple_app();
    start(&mut app);
    let token = app.practice_token().unwrap();
    let mut mode = app.practice_mode(token);
    mode.push_digit('9');
    mode.submit_at(Instant::now());
    let screen = render(&mut app, 80, 30);
    assert!(screen.contains("Not quite. Try again!"), "{screen}");

    let token = app.practice_token().unwrap();
    let mut mode = app.practice_mode(token);
    mode.push_digit('5');
    mode.submit_at(Instant::now());
    let screen = render(&mut app, 80, 30);
    assert!(screen.contains("Correct! +10 exp"));
    assert!(screen.contains("Score: 1"));
}

#[test]
fn ascii_mode_draws_ascii_shapes() {
    let mut app = app_with(
        Roster::in_memory(default_players()),
        &[3, 2],
        AppOptions {
            show_hint: true,
            ui_options: UiOptions {
                ascii_only: true,
                ..UiOptions::default()
            },
            ..AppOptions::default()
        },
    );
    start(&mut app);
    let screen = render(&mut app, 80, 40);
    assert_eq!(screen.matches('#').count(), 5);
    assert!(!screen.contains('■'));
    assert!(!screen.contains('🐶'));
}

#[test]
fn tiny_terminal_does_not_panic() {
    let mut app = simple_app();
    start(&mut app);
    let token = app.practice_token().unwrap();
    app.practice_mode(token).toggle_hint();
    for (width, height) in [(10, 5), (1, 1), (30, 12)] {
        render(&mut app, width, height);
        assert!(app.view().hit_map.drop_target().is_none());
    }
}

#[test]
fn sum_table_shows_every_sum() {
    let mut app = simple_app();
    start(&mut app);
    app.switch_view(PracticeView::Table);
    let screen = render(&mut app, 80, 30);
    assert!(screen.contains("Sum table"), "{screen}");
    assert!(screen.contains("18"));
    assert!(!screen.contains("= ?"));
    // Row for 9: sums 10 through 18.
    let row = screen
        .lines()
        .find(|line| line.contains("18"))
        .expect("last row drawn");
    for sum in 10..=18 {
        assert!(row.contains(&sum.to_string()), "{sum} missing from {row:?}");
    }
}

#[test]
fn grid_drill_progress_and_banner() {
    let mut app = simple_app();
    start(&mut app);
    app.switch_view(PracticeView::GridDrill);
    let screen = render(&mut app, 80, 30);
    assert!(screen.contains("Grid drill"), "{screen}");
    assert!(screen.contains("0/81 correct"));

    let sums: Vec<u32> = {
        let drill = app.grid_drill().unwrap();
        (0..GRID_CELLS)
            .map(|i| drill.expected(i / GRID_SIZE, i % GRID_SIZE))
            .collect()
    };
    let token = app.drill_token().unwrap();
    let mut mode = app.drill_mode(token);
    for digit in sums[0].to_string().chars() {
        mode.push_digit(digit);
    }
    let screen = render(&mut app, 80, 30);
    assert!(screen.contains("1/81 correct"), "{screen}");

    let token = app.drill_token().unwrap();
    let mut mode = app.drill_mode(token);
    mode.move_cursor(CursorMove::Next);
    for sum in &sums[1..] {
        for digit in sum.to_string().chars() {
            mode.push_digit(digit);
        }
        mode.move_cursor(CursorMove::Next);
    }
    let screen = render(&mut app, 80, 30);
    assert!(screen.contains("All 81 correct!"), "{screen}");
}

