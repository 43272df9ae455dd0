use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use hitcircle::{
    app::{App, AppAction, AppState, GameOptions},
    clock::ManualClock,
    config::MemorySettingsStore,
    runtime::{FixedTicker, GameEvent, Runner, TestEventSource},
    Beatmap, SessionOutcome, TargetTiming,
};
use ratatui::layout::Rect;

fn key(code: KeyCode) -> GameEvent {
    GameEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn left_click(column: u16, row: u16) -> GameEvent {
    GameEvent::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn headless_app(seed: u64) -> (App, ManualClock) {
    let clock = ManualClock::new(0);
    let app = App::new(
        GameOptions {
            seed: Some(seed),
            random_count: 3,
            ..GameOptions::default()
        },
        Box::new(MemorySettingsStore::default()),
        Box::new(clock.clone()),
    );
    (app, clock)
}

// Drives the app through the runtime Runner without a TTY: menu navigation
// by key, a full play-through by mouse, then back out to the menu.
#[test]
fn headless_menu_to_cleared_results() {
    let (mut app, clock) = headless_app(5);
    // a 80x60 playfield maps one cell to 10x10 playfield units
    app.playfield_area.set(Rect::new(0, 0, 80, 60));

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), FixedTicker::new(Duration::from_millis(2)));

    tx.send(key(KeyCode::Enter)).unwrap(); // Play
    for _ in 0..2 {
        let _ = app.handle_event(runner.step());
    }
    assert_eq!(app.state, AppState::MapSelect);

    // swap the random map for a known one so clicks can be aimed
    let map = Beatmap::from_triples(
        "aim",
        &[(405, 305, 1000), (105, 505, 1500), (705, 105, 2000)],
        TargetTiming::default(),
    )
    .unwrap();
    app.play(map);
    assert_eq!(app.state, AppState::Playing);

    for (time, column, row) in [(1000, 40, 30), (1510, 10, 50), (1985, 70, 10)] {
        clock.set(time);
        tx.send(GameEvent::Tick).unwrap();
        tx.send(left_click(column, row)).unwrap();
        for _ in 0..2 {
            let _ = app.handle_event(runner.step());
        }
    }

    assert_eq!(app.state, AppState::Results);
    let snapshot = app.snapshot.clone().unwrap();
    assert_eq!(snapshot.outcome, SessionOutcome::Cleared);
    assert_eq!(snapshot.score, 900);
    assert_eq!(snapshot.max_combo, 3);
    assert_eq!(app.session.as_ref().unwrap().hit_offsets(), &[0, 10, -15]);

    tx.send(key(KeyCode::Esc)).unwrap();
    let _ = app.handle_event(runner.step());
    assert_eq!(app.state, AppState::MainMenu);

    tx.send(key(KeyCode::Char('q'))).unwrap();
    assert_eq!(app.handle_event(runner.step()), AppAction::Quit);
}

#[test]
fn headless_idle_player_fails_random_map() {
    let (mut app, clock) = headless_app(11);
    app.options.random_count = 8;
    app.maps = hitcircle::beatmap::catalog(None, 8, Some(11));

    app.state = AppState::MapSelect;
    let _ = app.handle_event(key(KeyCode::Enter));
    assert_eq!(app.state, AppState::Playing);

    let (_tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), FixedTicker::new(Duration::from_millis(1)));

    // 16ms frames for ten seconds of play time
    for frame in 0..625 {
        clock.set(frame * 16);
        let _ = app.handle_event(runner.step());
        if app.state == AppState::Results {
            break;
        }
    }

    let snapshot = app.snapshot.clone().unwrap();
    assert_eq!(snapshot.outcome, SessionOutcome::Failed);
    assert_eq!(snapshot.health, 0);
    assert_eq!(snapshot.counts.miss, 5);
    assert_eq!(snapshot.score, 0);
    // the remaining targets were never judged
    let unresolved = app
        .session
        .as_ref()
        .unwrap()
        .targets()
        .iter()
        .filter(|t| !t.is_resolved())
        .count();
    assert_eq!(unresolved, 3);
}

#[test]
fn headless_pause_freezes_play() {
    let (mut app, clock) = headless_app(3);
    app.play(Beatmap::from_triples("p", &[(400, 300, 1000)], TargetTiming::default()).unwrap());

    let _ = app.handle_event(key(KeyCode::Esc));
    assert_eq!(app.state, AppState::Paused);

    // time keeps passing on the wall clock but paused ticks are ignored
    clock.set(10_000);
    for _ in 0..5 {
        let _ = app.handle_event(GameEvent::Tick);
    }
    assert_eq!(app.session.as_ref().unwrap().outcome(), SessionOutcome::InProgress);

    let _ = app.handle_event(key(KeyCode::Enter)); // Resume
    assert_eq!(app.state, AppState::Playing);
}

#[test]
fn headless_tutorial_demo_and_back() {
    let (mut app, clock) = headless_app(7);
    app.playfield_area.set(Rect::new(0, 0, 80, 60));

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), FixedTicker::new(Duration::from_millis(2)));

    tx.send(key(KeyCode::Down)).unwrap();
    tx.send(key(KeyCode::Enter)).unwrap(); // Tutorial
    for _ in 0..2 {
        let _ = app.handle_event(runner.step());
    }
    assert_eq!(app.state, AppState::Tutorial);

    tx.send(key(KeyCode::Char(' '))).unwrap();
    let _ = app.handle_event(runner.step());
    assert_eq!(app.state, AppState::Playing);
    assert_eq!(app.beatmap.as_ref().unwrap().display_title(), "Tutorial");

    // centre, right, left, top, bottom; each cell centre lands on the circle
    let clicks = [(40, 30), (60, 30), (20, 30), (40, 9), (40, 49)];
    for (i, (column, row)) in clicks.into_iter().enumerate() {
        let time = 1000 + i as i64 * 1500;
        clock.set(time);
        tx.send(GameEvent::Tick).unwrap();
        tx.send(left_click(column, row)).unwrap();
        for _ in 0..2 {
            let _ = app.handle_event(runner.step());
        }
    }

    assert_eq!(app.state, AppState::Results);
    let snapshot = app.snapshot.clone().unwrap();
    assert_eq!(snapshot.outcome, SessionOutcome::Cleared);
    assert_eq!(snapshot.counts.perfect, 5);
    assert_eq!(snapshot.score, 1500);

    tx.send(key(KeyCode::Esc)).unwrap();
    let _ = app.handle_event(runner.step());
    assert_eq!(app.state, AppState::MainMenu);
}
