//! End-to-end practice flows through the public engine API.

use std::fs;
use std::time::{Duration, Instant};

use tally_config::TallyConfig;
use tally_engine::manipulator::{GestureEvent, GestureTarget, PoolLabel, ShapeId};
use tally_engine::{
    App, AppOptions, Difficulty, MODAL_DELAY, Modal, Player, Roster, Screen, SubmitOutcome,
};

use crate::common::{app_with, simple_app, start};

fn answer(app: &mut App, text: &str, now: Instant) -> SubmitOutcome {
    let token = app.practice_token().expect("practicing");
    let mut mode = app.practice_mode(token);
    for digit in text.chars() {
        mode.push_digit(digit);
    }
    mode.submit_at(now)
}

#[test]
fn progress_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_with(
        Roster::open(Some(dir.path())),
        &[4, 4],
        AppOptions::default(),
    );
    start(&mut app);
    let now = Instant::now();
    for round in 0..6u64 {
        let at = now + Duration::from_secs(round * 3);
        assert!(matches!(answer(&mut app, "8", at), SubmitOutcome::Correct(_)));
        app.tick_at(at + MODAL_DELAY);
        if !app.close_modal() {
            let token = app.practice_token().unwrap();
            app.practice_mode(token).next_problem();
        }
    }

    let stored: Vec<Player> =
        serde_json::from_slice(&fs::read(dir.path().join("players.json")).unwrap()).unwrap();
    let puppy = stored.iter().find(|p| p.id == 1).unwrap();
    // 60 exp: level 2 reached at 50, 10 carried over.
    assert_eq!((puppy.level, puppy.exp), (2, 10));

    let reopened = Roster::open(Some(dir.path()));
    assert_eq!(reopened.get(1).unwrap().level, 2);
}

#[test]
fn config_file_drives_app_options() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "# my settings\n[app]\nascii_only = true\n\n[practice]\ndifficulty = \"bonus\"\nshow_hint = true\n",
    )
    .unwrap();

    let config = TallyConfig::load_from(&path).unwrap();
    let mut options = AppOptions::from_config(config.as_ref());
    options.config_path = Some(path.clone());
    assert_eq!(options.difficulty, Difficulty::Bonus);
    assert!(options.ui_options.ascii_only);

    let mut app = app_with(
        Roster::in_memory(tally_types::default_players()),
        &[2, 3, 4],
        options,
    );
    start(&mut app);
    let state = app.practice().unwrap();
    assert_eq!(state.problem().num3, Some(4));
    let hint = state.hint().expect("show_hint opens the aid");
    assert!(hint.pools().has_pool(PoolLabel::Tertiary));

    assert_eq!(app.cycle_difficulty(), Difficulty::Easy);
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("# my settings"));
    assert!(written.contains("difficulty = \"easy\""));
}

#[test]
fn hint_session_is_replaced_by_next_problem() {
    let mut app = simple_app();
    start(&mut app);
    let token = app.practice_token().unwrap();
    let mut mode = app.practice_mode(token);
    mode.toggle_hint();
    mode.activate_group();
    mode.gesture(GestureEvent::DragStart(GestureTarget::Shape(ShapeId::new(
        PoolLabel::Secondary,
        0,
    ))));
    mode.next_problem();

    let state = app.practice().unwrap();
    assert!(state.hint().is_none());
    assert!(app.view().press.is_none());

    let token = app.practice_token().unwrap();
    app.practice_mode(token).toggle_hint();
    let hint = app.practice().unwrap().hint().unwrap();
    assert_eq!(hint.total(), 0);
    assert!(hint.gesture().payload().is_none());
}

#[test]
fn keyboard_counting_matches_answer() {
    let mut app = simple_app();
    start(&mut app);
    let token = app.practice_token().unwrap();
    let mut mode = app.practice_mode(token);
    mode.toggle_hint();
    mode.activate_group();
    while mode.selected_shape().is_some() {
        assert!(mode.activate_selected_shape().is_some_and(|o| o.moved_shapes()));
    }
    let total = app.practice().unwrap().hint().unwrap().total();
    assert_eq!(total, 5);
    assert!(matches!(
        answer(&mut app, &total.to_string(), Instant::now()),
        SubmitOutcome::Correct(_)
    ));
}

#[test]
fn rewards_follow_level_thresholds() {
    // Bonus pays 25 exp per answer.
    let mut app = app_with(
        Roster::in_memory(tally_types::default_players()),
        &[1, 1, 1],
        AppOptions {
            difficulty: Difficulty::Bonus,
            ..AppOptions::default()
        },
    );
    start(&mut app);
    let now = Instant::now();
    let mut modals = Vec::new();
    for round in 0..10u64 {
        let at = now + Duration::from_secs(round * 3);
        answer(&mut app, "3", at);
        app.tick_at(at + MODAL_DELAY);
        if let Some(modal) = app.modal() {
            modals.push(modal);
            app.close_modal();
        } else {
            let token = app.practice_token().unwrap();
            app.practice_mode(token).next_problem();
        }
    }
    // Thresholds 50, 75, 100 are crossed on answers 2, 5 and 9.
    assert_eq!(
        modals,
        [
            Modal::LevelUp { level: 2 },
            Modal::LevelUp { level: 3 },
            Modal::LevelUp { level: 4 },
            Modal::Congrats { score: 10 },
        ]
    );
    assert_eq!(app.current_player().unwrap().exp, 25);
}

#[test]
fn leaving_practice_cancels_pending_reward() {
    let mut app = app_with(
        Roster::in_memory(tally_types::default_players()),
        &[9, 9, 9],
        AppOptions {
            difficulty: Difficulty::Bonus,
            ..AppOptions::default()
        },
    );
    start(&mut app);
    let now = Instant::now();
    answer(&mut app, "27", now);
    let token = app.practice_token().unwrap();
    app.practice_mode(token).next_problem();
    answer(&mut app, "27", now);
    assert!(app.has_pending_modal());

    let token = app.practice_token().unwrap();
    app.practice_mode(token).switch_player();
    app.tick_at(now + MODAL_DELAY);
    assert!(app.modal().is_none());
    assert!(matches!(app.screen(), Screen::PlayerSelect(_)));
}
