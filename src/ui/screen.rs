use ratatui::{buffer::Buffer, layout::Rect};
use watsim::Phase;

use crate::{
    ui::{render_completed, render_countdown, render_input, render_running},
    App,
};

/// A UI Screen boundary: one per session phase
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Word entry form, shown while idle
pub struct InputScreen;

impl Screen for InputScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_input(app, area, buf);
    }
}

/// 3, 2, 1, START
pub struct CountdownScreen;

impl Screen for CountdownScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_countdown(app, area, buf);
    }
}

pub struct RunningScreen;

impl Screen for RunningScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_running(app, area, buf);
    }
}

pub struct CompletedScreen;

impl Screen for CompletedScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_completed(app, area, buf);
    }
}

/// Helper to construct the appropriate screen for the current phase
pub fn current_screen(app: &App) -> Box<dyn Screen> {
    match app.phase() {
        Phase::Idle => Box::new(InputScreen),
        Phase::Countdown => Box::new(CountdownScreen),
        Phase::Running => Box::new(RunningScreen),
        Phase::Completed => Box::new(CompletedScreen),
    }
}
