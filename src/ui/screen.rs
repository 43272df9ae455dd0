use ratatui::{buffer::Buffer, layout::Rect};

use crate::{
    app::{App, AppState},
    ui::{menu, playfield, results},
};

/// A UI screen boundary: draws one `AppState`
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

pub struct MainMenuScreen;

impl Screen for MainMenuScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        menu::render_main_menu(app, area, buf);
    }
}

pub struct MapSelectScreen;

impl Screen for MapSelectScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        menu::render_map_select(app, area, buf);
    }
}

pub struct PlayingScreen;

impl Screen for PlayingScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        playfield::render_playing(app, area, buf);
    }
}

/// The frozen playfield with the pause menu on top
pub struct PausedScreen;

impl Screen for PausedScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        playfield::render_playing(app, area, buf);
        menu::render_pause_menu(app, area, buf);
    }
}

pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        results::render_results(app, area, buf);
    }
}

pub struct SettingsScreen;

impl Screen for SettingsScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        menu::render_settings(app, area, buf);
    }
}

pub struct AboutScreen;

impl Screen for AboutScreen {
    fn render(&self, _app: &App, area: Rect, buf: &mut Buffer) {
        menu::render_about(area, buf);
    }
}

pub struct TutorialScreen;

impl Screen for TutorialScreen {
    fn render(&self, _app: &App, area: Rect, buf: &mut Buffer) {
        menu::render_tutorial(area, buf);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: AppState) -> Box<dyn Screen> {
    match state {
        AppState::MainMenu => Box::new(MainMenuScreen),
        AppState::MapSelect => Box::new(MapSelectScreen),
        AppState::Playing => Box::new(PlayingScreen),
        AppState::Paused => Box::new(PausedScreen),
        AppState::Results => Box::new(ResultsScreen),
        AppState::Settings => Box::new(SettingsScreen),
        AppState::About => Box::new(AboutScreen),
        AppState::Tutorial => Box::new(TutorialScreen),
    }
}
