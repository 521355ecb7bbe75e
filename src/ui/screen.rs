use ratatui::Frame;

use crate::{App, AppState};

/// A UI Screen boundary: one per shell state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// "Get ready" pause before the first question
pub struct StartingScreen;

impl Screen for StartingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(super::StartingView(app), f.area());
    }
}

/// Question with its options, also used while the answer is revealed
pub struct QuestionScreen;

impl Screen for QuestionScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(super::QuestionView(app), f.area());
    }
}

/// Final summary with the offer to play again
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(super::ResultsView(app), f.area());
    }
}

pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Starting => Box::new(StartingScreen),
        AppState::Question | AppState::Reveal => Box::new(QuestionScreen),
        AppState::Results => Box::new(ResultsScreen),
    }
}
