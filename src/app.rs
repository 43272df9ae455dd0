//! Host application: screens, menus, and driving a `Session` from terminal
//! input and the play clock.

use crate::beatmap::{self, Beatmap, MapSource};
use crate::clock::{Clock, PlayClock};
use crate::config::{Settings, SettingsStore, MAX_TICK_RATE_MS, MIN_TICK_RATE_MS};
use crate::feedback::Feedback;
use crate::hit_target::{Point, TargetTiming};
use crate::judge::ScoringModel;
use crate::runtime::GameEvent;
use crate::session::{ClickEvent, ClickPolicy, Session, SessionConfig, SessionOutcome};
use crate::snapshot::SessionSnapshot;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::{error, info};
use ratatui::layout::Rect;
use std::cell::Cell;
use std::path::PathBuf;

pub const MAIN_MENU: [&str; 5] = ["Play", "Tutorial", "Settings", "About", "Quit"];
pub const PAUSE_MENU: [&str; 4] = ["Resume", "Retry", "Map select", "Quit"];
pub const SETTINGS_ITEMS: [&str; 4] = [
    "Custom cursor",
    "Hit feedback",
    "Hitsound (bell)",
    "Tick rate",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    MainMenu,
    MapSelect,
    Playing,
    Paused,
    Results,
    Settings,
    About,
    /// Instructions shown before the demo map
    Tutorial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

/// Launch options that shape every session the app starts.
#[derive(Debug, Clone, PartialEq)]
pub struct GameOptions {
    pub scoring: ScoringModel,
    pub click_policy: ClickPolicy,
    pub timing: TargetTiming,
    pub maps_dir: Option<PathBuf>,
    pub random_count: usize,
    pub seed: Option<u64>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            scoring: ScoringModel::default(),
            click_policy: ClickPolicy::default(),
            timing: TargetTiming::default(),
            maps_dir: None,
            random_count: 20,
            seed: None,
        }
    }
}

impl GameOptions {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            click_policy: self.click_policy,
            scoring: self.scoring,
            ..SessionConfig::default()
        }
    }
}

/// Maps a terminal cell to playfield coordinates, using the centre of the
/// cell. `None` outside `area`.
pub fn cell_to_playfield(column: u16, row: u16, area: Rect) -> Option<Point> {
    if area.width == 0
        || area.height == 0
        || column < area.x
        || row < area.y
        || column >= area.x + area.width
        || row >= area.y + area.height
    {
        return None;
    }

    let x = (column - area.x) as f64 + 0.5;
    let y = (row - area.y) as f64 + 0.5;
    Some(Point::new(
        x / area.width as f64 * beatmap::PLAYFIELD_WIDTH,
        y / area.height as f64 * beatmap::PLAYFIELD_HEIGHT,
    ))
}

pub struct App {
    pub state: AppState,
    pub options: GameOptions,
    pub settings: Settings,
    settings_store: Box<dyn SettingsStore>,
    clock: Box<dyn Clock>,
    pub maps: Vec<MapSource>,
    pub menu_index: usize,
    pub map_index: usize,
    pub beatmap: Option<Beatmap>,
    pub session: Option<Session>,
    pub snapshot: Option<SessionSnapshot>,
    pub feedback: Feedback,
    /// Last known pointer position in playfield coordinates.
    pub cursor: Point,
    /// Where the playfield was last drawn; written by the renderer.
    pub playfield_area: Cell<Rect>,
    /// One-line message for the current screen (failed map load etc.).
    pub status: Option<String>,
    bell_pending: bool,
}

impl App {
    pub fn new(
        options: GameOptions,
        settings_store: Box<dyn SettingsStore>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let settings = settings_store.load();
        let maps = beatmap::catalog(
            options.maps_dir.as_deref(),
            options.random_count,
            options.seed,
        );

        Self {
            state: AppState::MainMenu,
            options,
            settings,
            settings_store,
            clock,
            maps,
            menu_index: 0,
            map_index: 0,
            beatmap: None,
            session: None,
            snapshot: None,
            feedback: Feedback::new(),
            cursor: Point::new(
                beatmap::PLAYFIELD_WIDTH / 2.0,
                beatmap::PLAYFIELD_HEIGHT / 2.0,
            ),
            playfield_area: Cell::new(Rect::default()),
            status: None,
            bell_pending: false,
        }
    }

    pub fn with_play_clock(options: GameOptions, settings_store: Box<dyn SettingsStore>) -> Self {
        Self::new(options, settings_store, Box::new(PlayClock::new()))
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// True once per hit when the bell hitsound is on.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell_pending)
    }

    /// Whether the next `Tick` needs a redraw.
    pub fn is_animating(&self) -> bool {
        self.state == AppState::Playing || self.feedback.is_active()
    }

    pub fn handle_event(&mut self, event: GameEvent) -> AppAction {
        match event {
            GameEvent::Key(key) => self.on_key(key),
            GameEvent::Mouse(mouse) => {
                self.on_mouse(mouse);
                AppAction::Continue
            }
            GameEvent::Tick => {
                self.on_tick();
                AppAction::Continue
            }
            GameEvent::Resize => AppAction::Continue,
        }
    }

    pub fn on_tick(&mut self) {
        if self.state == AppState::Playing {
            self.advance(&[]);
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.move_cursor(mouse.column, mouse.row);
            }
            MouseEventKind::Down(MouseButton::Left) if self.state == AppState::Tutorial => {
                self.start_tutorial_demo();
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.move_cursor(mouse.column, mouse.row);
                self.click();
            }
            _ => {}
        }
    }

    fn move_cursor(&mut self, column: u16, row: u16) {
        if let Some(p) = cell_to_playfield(column, row, self.playfield_area.get()) {
            self.cursor = p;
        }
    }

    /// Clicks at the cursor. Only meaningful while playing.
    pub fn click(&mut self) {
        if self.state != AppState::Playing {
            return;
        }
        let now = self.clock.now_ms();
        self.advance(&[ClickEvent {
            position: self.cursor,
            time: now,
        }]);
    }

    fn advance(&mut self, clicks: &[ClickEvent]) {
        let now = self.clock.now_ms();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let snapshot = session.tick(now, clicks);

        for event in &snapshot.events {
            if self.settings.show_feedback {
                self.feedback.on_event(event, now);
            }
            if self.settings.hitsound_bell && event.judgement.tier.is_hit() {
                self.bell_pending = true;
            }
        }
        self.feedback.update(now);

        if matches!(snapshot.outcome, SessionOutcome::Cleared | SessionOutcome::Failed) {
            self.clock.pause();
            self.feedback.clear();
            self.state = AppState::Results;
            self.menu_index = 0;
        }
        self.snapshot = Some(snapshot);
    }

    pub fn on_key(&mut self, key: KeyEvent) -> AppAction {
        if key.kind == KeyEventKind::Release {
            return AppAction::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppAction::Quit;
        }

        match self.state {
            AppState::MainMenu => self.on_main_menu_key(key.code),
            AppState::MapSelect => self.on_map_select_key(key.code),
            AppState::Playing => self.on_playing_key(key.code),
            AppState::Paused => self.on_paused_key(key.code),
            AppState::Results => self.on_results_key(key.code),
            AppState::Settings => {
                self.on_settings_key(key.code);
                AppAction::Continue
            }
            AppState::About => {
                self.state = AppState::MainMenu;
                AppAction::Continue
            }
            AppState::Tutorial => self.on_tutorial_key(key.code),
        }
    }

    fn on_main_menu_key(&mut self, code: KeyCode) -> AppAction {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                step_index(&mut self.menu_index, MAIN_MENU.len(), -1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                step_index(&mut self.menu_index, MAIN_MENU.len(), 1)
            }
            KeyCode::Enter => match MAIN_MENU[self.menu_index] {
                "Play" => {
                    self.status = None;
                    self.state = AppState::MapSelect;
                }
                "Settings" => {
                    self.menu_index = 0;
                    self.state = AppState::Settings;
                }
                "Tutorial" => {
                    self.status = None;
                    self.state = AppState::Tutorial;
                }
                "About" => self.state = AppState::About,
                _ => return AppAction::Quit,
            },
            KeyCode::Esc | KeyCode::Char('q') => return AppAction::Quit,
            _ => {}
        }
        AppAction::Continue
    }

    fn on_map_select_key(&mut self, code: KeyCode) -> AppAction {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                step_index(&mut self.map_index, self.maps.len(), -1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                step_index(&mut self.map_index, self.maps.len(), 1)
            }
            KeyCode::Enter => self.play_selected(),
            KeyCode::Esc => {
                self.status = None;
                self.menu_index = 0;
                self.state = AppState::MainMenu;
            }
            KeyCode::Char('q') => return AppAction::Quit,
            _ => {}
        }
        AppAction::Continue
    }

    fn on_tutorial_key(&mut self, code: KeyCode) -> AppAction {
        match code {
            KeyCode::Char(' ') | KeyCode::Enter => self.start_tutorial_demo(),
            KeyCode::Esc => {
                self.menu_index = 0;
                self.state = AppState::MainMenu;
            }
            KeyCode::Char('q') => return AppAction::Quit,
            _ => {}
        }
        AppAction::Continue
    }

    /// Plays the built-in five circle demo through a regular session.
    fn start_tutorial_demo(&mut self) {
        match Beatmap::tutorial(self.options.timing) {
            Ok(map) => self.play(map),
            Err(e) => {
                error!("Could not build the tutorial map: {}", e);
                self.status = Some(format!("Could not start the tutorial: {e}"));
                self.state = AppState::MainMenu;
            }
        }
    }

    fn on_playing_key(&mut self, code: KeyCode) -> AppAction {
        match code {
            KeyCode::Char('z') | KeyCode::Char('x') => self.click(),
            KeyCode::Esc => self.pause(),
            KeyCode::Char('q') => return AppAction::Quit,
            _ => {}
        }
        AppAction::Continue
    }

    fn on_paused_key(&mut self, code: KeyCode) -> AppAction {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                step_index(&mut self.menu_index, PAUSE_MENU.len(), -1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                step_index(&mut self.menu_index, PAUSE_MENU.len(), 1)
            }
            KeyCode::Esc => self.resume(),
            KeyCode::Enter => match PAUSE_MENU[self.menu_index] {
                "Resume" => self.resume(),
                "Retry" => self.retry(),
                "Map select" => self.back_to_maps(),
                _ => return AppAction::Quit,
            },
            KeyCode::Char('q') => return AppAction::Quit,
            _ => {}
        }
        AppAction::Continue
    }

    fn on_results_key(&mut self, code: KeyCode) -> AppAction {
        match code {
            KeyCode::Char('r') => self.retry(),
            KeyCode::Char('m') | KeyCode::Enter => self.back_to_maps(),
            KeyCode::Esc => {
                self.menu_index = 0;
                self.state = AppState::MainMenu;
            }
            KeyCode::Char('q') => return AppAction::Quit,
            _ => {}
        }
        AppAction::Continue
    }

    fn on_settings_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                step_index(&mut self.menu_index, SETTINGS_ITEMS.len(), -1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                step_index(&mut self.menu_index, SETTINGS_ITEMS.len(), 1)
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_setting(),
            KeyCode::Left | KeyCode::Char('h') => self.adjust_tick_rate(-1),
            KeyCode::Right | KeyCode::Char('l') => self.adjust_tick_rate(1),
            KeyCode::Esc => {
                if let Err(e) = self.settings_store.save(&self.settings) {
                    error!("Failed to save settings: {}", e);
                    self.status = Some(format!("Could not save settings: {e}"));
                }
                self.menu_index = 0;
                self.state = AppState::MainMenu;
            }
            _ => {}
        }
    }

    fn toggle_setting(&mut self) {
        match self.menu_index {
            0 => self.settings.custom_cursor = !self.settings.custom_cursor,
            1 => self.settings.show_feedback = !self.settings.show_feedback,
            2 => self.settings.hitsound_bell = !self.settings.hitsound_bell,
            _ => {}
        }
    }

    fn adjust_tick_rate(&mut self, direction: i64) {
        if SETTINGS_ITEMS[self.menu_index] != "Tick rate" {
            return;
        }
        let next = self.settings.tick_rate_ms as i64 + direction * 4;
        self.settings.tick_rate_ms =
            next.clamp(MIN_TICK_RATE_MS as i64, MAX_TICK_RATE_MS as i64) as u64;
    }

    fn play_selected(&mut self) {
        let Some(source) = self.maps.get(self.map_index).cloned() else {
            return;
        };
        match source.load(self.options.timing) {
            Ok(map) => self.play(map),
            Err(e) => {
                error!("Could not load {}: {}", source.label(), e);
                self.status = Some(format!("Could not load {}: {e}", source.label()));
            }
        }
    }

    /// Starts a fresh session on `map`.
    pub fn play(&mut self, map: Beatmap) {
        self.status = None;
        self.beatmap = Some(map);
        self.start_session();
    }

    fn start_session(&mut self) {
        let Some(map) = self.beatmap.as_ref() else {
            return;
        };
        let session = Session::new(map, self.options.session_config());
        self.snapshot = Some(session.snapshot());
        self.session = Some(session);
        self.feedback.clear();
        self.clock.restart();
        self.state = AppState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state != AppState::Playing {
            return;
        }
        self.clock.pause();
        self.menu_index = 0;
        self.state = AppState::Paused;
        info!("Paused at {}ms", self.clock.now_ms());
    }

    pub fn resume(&mut self) {
        if self.state != AppState::Paused {
            return;
        }
        self.clock.resume();
        self.state = AppState::Playing;
    }

    pub fn retry(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.abort();
        }
        self.start_session();
    }

    fn back_to_maps(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.abort();
        }
        self.session = None;
        self.feedback.clear();
        self.state = AppState::MapSelect;
    }
}

fn step_index(index: &mut usize, len: usize, delta: i64) {
    if len == 0 {
        *index = 0;
        return;
    }
    *index = (*index as i64 + delta).rem_euclid(len as i64) as usize;
}
