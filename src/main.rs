mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use quizr::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    ConfigurationError, IllegalEventError, LoadError, Question, QuestionBank, QuizEvent,
    SessionController, SessionSummary,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::ui::flash::Flash;

const TICK_RATE_MS: u64 = 100;

/// timed multiple-choice quiz in your terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed multiple-choice quiz. Harder questions are worth more, hints cost points, and the clock keeps running."
)]
pub struct Cli {
    /// question bank to play (JSON list of questions); defaults to the bundled bank
    #[clap(short = 'q', long = "questions")]
    questions_path: Option<PathBuf>,

    /// number of questions per game
    #[clap(short = 'n', long)]
    questions_per_game: Option<usize>,

    /// seconds to answer each question
    #[clap(short = 's', long = "seconds")]
    seconds_per_question: Option<u32>,

    /// only ask questions from this category
    #[clap(short = 'c', long)]
    category: Option<String>,

    /// seconds to show the answer before moving on by itself (0 waits for enter)
    #[clap(long)]
    auto_advance: Option<u64>,

    /// print the categories of the question bank and exit
    #[clap(long)]
    list_categories: bool,

    /// remember these options for next time
    #[clap(long)]
    save_config: bool,

    /// log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Command line flags win over stored settings
    fn merge_into(&self, mut config: Config) -> Config {
        if let Some(path) = &self.questions_path {
            config.questions_path = Some(path.clone());
        }
        if let Some(n) = self.questions_per_game {
            config.questions_per_game = n;
        }
        if let Some(secs) = self.seconds_per_question {
            config.seconds_per_question = secs;
        }
        if let Some(category) = &self.category {
            config.category = Some(category.clone());
        }
        if let Some(secs) = self.auto_advance {
            config.auto_advance_secs = secs;
        }
        config
    }
}

fn load_bank(config: &Config) -> Result<QuestionBank, LoadError> {
    let bank = match &config.questions_path {
        Some(path) => QuestionBank::from_path(path)?,
        None => QuestionBank::bundled()?,
    };
    match &config.category {
        Some(category) => bank.with_category(category),
        None => Ok(bank),
    }
}

/// What the terminal can show for a question's `image`
#[derive(Debug, Clone, PartialEq)]
pub enum Illustration {
    Available(PathBuf),
    Missing(String),
}

impl Illustration {
    /// Relative references are looked up next to the question file.
    fn resolve(image: &str, base_dir: Option<&Path>) -> Self {
        let path = match base_dir {
            Some(dir) => dir.join(image),
            None => PathBuf::from(image),
        };
        if path.is_file() {
            Illustration::Available(path)
        } else {
            warn!(image, "illustration not found, showing placeholder");
            Illustration::Missing(image.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Starting,
    Question,
    Reveal,
    Results,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevealView {
    pub correct_index: usize,
    pub selected_index: Option<usize>,
    pub was_correct: bool,
}

/// Shell state: mirrors what the session reported so the UI can draw it
#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub controller: SessionController,
    pub state: AppState,
    pub bank_dir: Option<PathBuf>,
    pub question: Option<Question>,
    pub illustration: Option<Illustration>,
    pub ordinal: usize,
    pub total_questions: usize,
    pub seconds_remaining: u32,
    pub score: u32,
    pub eliminated: Vec<usize>,
    pub hint_used: bool,
    pub reveal: Option<RevealView>,
    pub reveal_elapsed: Duration,
    pub flash: Flash,
    pub summary: Option<SessionSummary>,
}

#[derive(Debug, PartialEq)]
enum KeyOutcome {
    Continue,
    Quit,
}

impl App {
    pub fn new(controller: SessionController, config: Config) -> Self {
        let bank_dir = config
            .questions_path
            .as_ref()
            .and_then(|p| p.parent())
            .map(Path::to_path_buf);

        Self {
            seconds_remaining: config.seconds_per_question,
            total_questions: config.questions_per_game,
            config,
            controller,
            state: AppState::Starting,
            bank_dir,
            question: None,
            illustration: None,
            ordinal: 0,
            score: 0,
            eliminated: vec![],
            hint_used: false,
            reveal: None,
            reveal_elapsed: Duration::ZERO,
            flash: Flash::default(),
            summary: None,
        }
    }

    pub fn start(&mut self) {
        match self.controller.start_session(self.config.session_settings()) {
            Ok(events) => self.apply_events(events),
            Err(e) => self.refuse_settings(e),
        }
    }

    fn refuse_settings(&mut self, e: ConfigurationError) {
        error!(error = %e, "cannot start session");
        self.summary = Some(SessionSummary {
            final_score: 0,
            correct_count: 0,
            total_questions: 0,
        });
        self.state = AppState::Results;
    }

    pub fn apply_events(&mut self, events: Vec<QuizEvent>) {
        for event in events {
            match event {
                QuizEvent::SessionStarted { total_questions } => {
                    self.total_questions = total_questions;
                    self.summary = None;
                    self.question = None;
                    self.state = AppState::Starting;
                }
                QuizEvent::QuestionLoaded {
                    question,
                    ordinal,
                    total_questions,
                } => {
                    self.illustration = question
                        .image
                        .as_deref()
                        .map(|image| Illustration::resolve(image, self.bank_dir.as_deref()));
                    self.question = Some(question);
                    self.ordinal = ordinal;
                    self.total_questions = total_questions;
                    self.eliminated.clear();
                    self.hint_used = false;
                    self.reveal = None;
                    self.flash.stop();
                    self.state = AppState::Question;
                }
                QuizEvent::Tick { seconds_remaining } => {
                    self.seconds_remaining = seconds_remaining;
                }
                QuizEvent::AnswerRevealed {
                    correct_index,
                    selected_index,
                    was_correct,
                } => {
                    self.reveal = Some(RevealView {
                        correct_index,
                        selected_index,
                        was_correct,
                    });
                    self.reveal_elapsed = Duration::ZERO;
                    self.flash.start();
                    self.state = AppState::Reveal;
                }
                QuizEvent::ScoreChanged { score } => {
                    self.score = score;
                }
                QuizEvent::HintApplied { eliminated } => {
                    self.eliminated = eliminated;
                    self.hint_used = true;
                }
                QuizEvent::SessionEnded(summary) => {
                    self.summary = Some(summary);
                    self.flash.stop();
                    self.state = AppState::Results;
                }
            }
        }
    }

    /// Rejected commands change nothing the player can see
    fn dispatch(&mut self, result: Result<Vec<QuizEvent>, IllegalEventError>) {
        if let Ok(events) = result {
            self.apply_events(events);
        }
    }

    pub fn on_elapsed(&mut self, elapsed: Duration) {
        let events = self.controller.on_elapsed(elapsed);
        self.apply_events(events);
        self.flash.update(elapsed);

        if self.state == AppState::Reveal && !self.flash.is_active() {
            if let Some(delay) = self.config.auto_advance() {
                self.reveal_elapsed += elapsed;
                if self.reveal_elapsed >= delay {
                    self.advance();
                }
            }
        }
    }

    pub fn select_answer(&mut self, index: usize) {
        let result = self.controller.select_answer(index);
        self.dispatch(result);
    }

    pub fn request_hint(&mut self) {
        let result = self.controller.request_hint();
        self.dispatch(result);
    }

    pub fn skip(&mut self) {
        let result = self.controller.skip();
        self.dispatch(result);
    }

    pub fn advance(&mut self) {
        let result = self.controller.advance();
        self.dispatch(result);
    }

    fn on_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return KeyOutcome::Quit;
        }

        match (self.state, key.code) {
            (AppState::Question, KeyCode::Char(c @ '1'..='4')) => {
                self.select_answer(c as usize - '1' as usize)
            }
            (AppState::Question, KeyCode::Char(c @ 'a'..='d')) => {
                self.select_answer(c as usize - 'a' as usize)
            }
            (AppState::Question, KeyCode::Char('h')) => self.request_hint(),
            (AppState::Question, KeyCode::Char('s')) => self.skip(),
            (AppState::Reveal, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Right) => {
                self.advance()
            }
            (AppState::Results, KeyCode::Char('n')) => self.start(),
            _ => {}
        }
        KeyOutcome::Continue
    }
}

fn init_logging(verbose: u8) -> io::Result<PathBuf> {
    let path = AppDirs::log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(io::Error::other)?;
    Ok(path)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("warning: logging disabled: {e}");
    }

    let store = FileConfigStore::new();
    let config = cli.merge_into(store.load());

    let bank = match load_bank(&config) {
        Ok(bank) => bank,
        Err(e) => {
            error!(error = %e, "failed to load question bank");
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, format!("invalid question bank: {e}"))
                .exit();
        }
    };

    if let Err(e) = config.session_settings().validate() {
        error!(error = %e, "unusable session settings");
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::InvalidValue, format!("invalid settings: {e}"))
            .exit();
    }

    if cli.list_categories {
        for category in bank.categories() {
            println!("{category}");
        }
        return Ok(());
    }

    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "saved config");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    info!(questions = bank.len(), "starting quizr");
    let mut app = App::new(SessionController::new(bank), config);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // restore the terminal before reporting any error
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "quizr stopped unexpectedly");
    }
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    app.start();
    terminal.draw(|f| ui(app, f))?;

    loop {
        let event = runner.step();
        app.on_elapsed(runner.take_elapsed());

        if let AppEvent::Key(key) = event {
            if app.on_key(key) == KeyOutcome::Quit {
                app.controller.end_session();
                break;
            }
        }

        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    ui::screen::current_screen(&app.state).render(app, f);
}
