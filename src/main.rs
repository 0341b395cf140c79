mod ui;

use std::{
    error::Error,
    fs,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{info, warn};
use watsim::{
    app_dirs::AppDirs,
    clock::{Tick, TickScheduler},
    config::{Config, ConfigStore, FileConfigStore},
    error::{AppError, Result},
    logging::init_logging,
    parse_word_list,
    runtime::{
        event_channel, spawn_terminal_reader, ChannelScheduler, FixedTicker, Runner, Ticker,
        WatEvent, WatEventSource,
    },
    tone::{ToneBackend, ToneSignal},
    Phase, SessionController, TickOutcome,
};

const REFRESH_RATE_MS: u64 = 100;
/// How long "START" stays up before the first word.
const START_FLASH_MS: u64 = 600;

/// practice word association tests against the clock
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Paste a list of words, get a 3-2-1 countdown, then see each word for 15 seconds with a beep between words."
)]
pub struct Cli {
    /// words to prefill, one per line or comma separated
    #[clap(short = 'w', long)]
    words: Option<String>,

    /// read the words to prefill from a file
    #[clap(short = 'f', long, conflicts_with = "words")]
    file: Option<PathBuf>,

    /// begin the countdown right away with the prefilled words
    #[clap(long)]
    start: bool,

    /// how to play the cue between words
    #[clap(short = 't', long, value_enum)]
    tone: Option<ToneBackend>,

    /// write logs to this file instead of the state directory
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// save the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Config file values with command line overrides applied
    fn merge_config(&self, mut config: Config) -> Config {
        if let Some(tone) = self.tone {
            config.tone = tone;
        }
        config
    }

    fn prefill_text(&self) -> Result<String> {
        match (&self.words, &self.file) {
            (Some(words), _) => Ok(words.clone()),
            (None, Some(path)) => fs::read_to_string(path).map_err(|source| AppError::WordFile {
                path: path.display().to_string(),
                source,
            }),
            (None, None) => Ok(String::new()),
        }
    }
}

type Controller = SessionController<Box<dyn TickScheduler>, Box<dyn ToneSignal>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Terminal front end around the session controller
pub struct App {
    pub controller: Controller,
    pub input: String,
    pub error: Option<String>,
    pub confirm_exit: bool,
    pub start_flash: Option<Instant>,
}

impl App {
    pub fn new(controller: Controller, input: String) -> Self {
        Self {
            controller,
            input,
            error: None,
            confirm_exit: false,
            start_flash: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn submit(&mut self) {
        match self.controller.start(&self.input) {
            Ok(()) => self.error = None,
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    pub fn on_tick(&mut self, tick: Tick) {
        if self.controller.on_tick(tick) == TickOutcome::Started {
            self.start_flash = Some(Instant::now());
        }
        if !self.phase().is_active() {
            self.confirm_exit = false;
        }
    }

    pub fn showing_start(&self) -> bool {
        self.start_flash
            .is_some_and(|at| at.elapsed() < Duration::from_millis(START_FLASH_MS))
    }

    pub fn paste(&mut self, text: &str) {
        if self.phase() == Phase::Idle {
            self.input.push_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
            self.error = None;
        }
    }

    fn new_session(&mut self) {
        self.controller.reset();
        self.input.clear();
        self.error = None;
        self.start_flash = None;
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }

        // ctrl+c quits from anywhere
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        if self.confirm_exit {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.controller.interrupt();
                    self.confirm_exit = false;
                    self.start_flash = None;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirm_exit = false;
                }
                _ => {}
            }
            return Control::Continue;
        }

        match self.phase() {
            Phase::Idle => match key.code {
                KeyCode::Esc => return Control::Quit,
                KeyCode::F(5) => self.submit(),
                KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.submit()
                }
                KeyCode::Enter => self.input.push('\n'),
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.input.push(c);
                    self.error = None;
                }
                _ => {}
            },
            Phase::Countdown | Phase::Running => {
                if key.code == KeyCode::Esc {
                    self.confirm_exit = true;
                }
            }
            Phase::Completed => match key.code {
                KeyCode::Enter => self.new_session(),
                KeyCode::Esc => return Control::Quit,
                _ => {}
            },
        }

        Control::Continue
    }
}

fn main() -> std::result::Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let (stored, config_error) = match store.try_load() {
        Ok(cfg) => (cfg, None),
        Err(err) => (Config::default(), Some(err)),
    };
    let config = cli.merge_config(stored);
    if cli.save_config {
        store.save(&config)?;
    }

    let log_path = cli.log_file.clone().or_else(AppDirs::log_path);
    if let Some(path) = log_path {
        init_logging(&path, &config.log_level);
    }
    if let Some(err) = config_error {
        warn!(path = %store.path().display(), %err, "ignoring unusable config");
    }

    let prefill = cli.prefill_text()?;
    if cli.start && parse_word_list(&prefill).is_empty() {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::ValueValidation,
            "--start needs words from --words or --file",
        )
        .exit();
    }

    let (tx, events) = event_channel();
    let scheduler: Box<dyn TickScheduler> = Box::new(ChannelScheduler::new(tx.clone()));
    let controller = SessionController::new(scheduler, config.tone.build());
    let mut app = App::new(controller, prefill);
    if cli.start {
        app.submit();
    }

    info!(tone = %config.tone, "watsim starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    spawn_terminal_reader(tx);
    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(REFRESH_RATE_MS)));
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result.map_err(Into::into)
}

fn start_tui<B: Backend, E: WatEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        let event = runner.step().map_err(|_| AppError::EventChannelClosed)?;
        match event {
            WatEvent::Clock(tick) => app.on_tick(tick),
            WatEvent::Key(key) => {
                if app.on_key(key) == Control::Quit {
                    break;
                }
            }
            WatEvent::Paste(text) => app.paste(&text),
            WatEvent::Resize | WatEvent::Refresh => {}
        }
    }

    info!("watsim exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use watsim::clock::ManualScheduler;
    use watsim::tone::SilentTone;

    fn app(input: &str) -> App {
        let scheduler: Box<dyn TickScheduler> = Box::new(ManualScheduler);
        let tone: Box<dyn ToneSignal> = Box::new(SilentTone);
        App::new(SessionController::new(scheduler, tone), input.to_string())
    }

    fn press(app: &mut App, code: KeyCode) -> Control {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(app: &mut App, c: char) -> Control {
        app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn tick(app: &mut App) {
        let clock = app.controller.active_clock().expect("clock should be running");
        app.on_tick(Tick::new(clock));
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["watsim"]).unwrap();
        assert!(cli.words.is_none());
        assert!(cli.file.is_none());
        assert!(!cli.start);
        assert!(cli.tone.is_none());
        assert!(!cli.save_config);
        assert_eq!(cli.prefill_text().unwrap(), "");
    }

    #[test]
    fn test_cli_words_and_tone() {
        let cli =
            Cli::try_parse_from(["watsim", "-w", "Book, Study", "--tone", "off", "--start"])
                .unwrap();
        assert_eq!(cli.prefill_text().unwrap(), "Book, Study");
        assert!(cli.start);
        assert_eq!(cli.merge_config(Config::default()).tone, ToneBackend::Off);
    }

    #[test]
    fn test_cli_words_conflicts_with_file() {
        let res = Cli::try_parse_from(["watsim", "-w", "a", "-f", "words.txt"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_cli_prefill_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        fs::write(&path, "1. Book\n2. Study\n").unwrap();

        let cli = Cli::try_parse_from(["watsim", "-f", path.to_str().unwrap()]).unwrap();
        assert_eq!(cli.prefill_text().unwrap(), "1. Book\n2. Study\n");
    }

    #[test]
    fn test_cli_missing_file_errors() {
        let cli = Cli::try_parse_from(["watsim", "-f", "/definitely/not/here.txt"]).unwrap();
        assert!(matches!(
            cli.prefill_text(),
            Err(AppError::WordFile { .. })
        ));
    }

    #[test]
    fn test_merge_keeps_config_without_override() {
        let cli = Cli::try_parse_from(["watsim"]).unwrap();
        let cfg = Config {
            tone: ToneBackend::Bell,
            log_level: "debug".into(),
        };
        assert_eq!(cli.merge_config(cfg.clone()), cfg);
    }

    #[test]
    fn test_typing_and_starting() {
        let mut app = app("");
        press(&mut app, KeyCode::Char('B'));
        press(&mut app, KeyCode::Char('o'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input, "Bo\n");

        ctrl(&mut app, 's');
        assert_eq!(app.phase(), Phase::Countdown);
        assert!(app.error.is_none());
    }

    #[test]
    fn test_empty_submit_shows_error() {
        let mut app = app("  ");
        press(&mut app, KeyCode::F(5));
        assert_eq!(app.phase(), Phase::Idle);
        assert_eq!(app.error.as_deref(), Some("Please enter at least one word!"));

        // typing clears the message
        press(&mut app, KeyCode::Char('a'));
        assert!(app.error.is_none());
    }

    #[test]
    fn test_escape_asks_before_interrupting() {
        let mut app = app("Book");
        app.submit();

        press(&mut app, KeyCode::Esc);
        assert!(app.confirm_exit);
        assert_eq!(app.phase(), Phase::Countdown);

        press(&mut app, KeyCode::Char('n'));
        assert!(!app.confirm_exit);
        assert_eq!(app.phase(), Phase::Countdown);

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.phase(), Phase::Idle);
        // the word box keeps its text after an interrupt
        assert_eq!(app.input, "Book");
    }

    #[test]
    fn test_confirm_prompt_closes_when_session_completes() {
        let mut app = app("Book");
        app.submit();
        for _ in 0..3 {
            tick(&mut app);
        }
        assert!(app.showing_start());

        press(&mut app, KeyCode::Esc);
        for _ in 0..15 {
            tick(&mut app);
        }
        assert_eq!(app.phase(), Phase::Completed);
        assert!(!app.confirm_exit);
    }

    #[test]
    fn test_new_session_from_completed() {
        let mut app = app("Book");
        app.submit();
        for _ in 0..18 {
            tick(&mut app);
        }
        assert_eq!(app.phase(), Phase::Completed);

        assert_eq!(press(&mut app, KeyCode::Enter), Control::Continue);
        assert_eq!(app.phase(), Phase::Idle);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_quit_keys() {
        let mut idle = app("");
        assert_eq!(press(&mut idle, KeyCode::Esc), Control::Quit);

        let mut running = app("Book");
        running.submit();
        assert_eq!(press(&mut running, KeyCode::Esc), Control::Continue);
        assert_eq!(ctrl(&mut running, 'c'), Control::Quit);
    }

    #[test]
    fn test_paste_normalizes_newlines() {
        let mut app = app("");
        app.paste("Book\r\nStudy\rTeam");
        assert_eq!(app.input, "Book\nStudy\nTeam");
    }

    #[test]
    fn test_paste_ignored_during_session() {
        let mut app = app("Book");
        app.submit();
        app.paste("more");
        assert_eq!(app.input, "Book");
    }

    #[test]
    fn test_draw_every_phase() {
        let mut app = app("Book, Study");
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        terminal.draw(|f| ui::draw(&app, f)).unwrap();
        assert!(buffer_text(&terminal).contains("WAT SIMULATOR"));

        app.submit();
        terminal.draw(|f| ui::draw(&app, f)).unwrap();
        assert!(buffer_text(&terminal).contains("WAT will begin in"));

        for _ in 0..3 {
            tick(&mut app);
        }
        app.start_flash = None;
        terminal.draw(|f| ui::draw(&app, f)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("BOOK"));
        assert!(text.contains("1 / 2"));

        press(&mut app, KeyCode::Esc);
        terminal.draw(|f| ui::draw(&app, f)).unwrap();
        assert!(buffer_text(&terminal).contains("exit the session?"));
        press(&mut app, KeyCode::Char('n'));

        for _ in 0..30 {
            tick(&mut app);
        }
        terminal.draw(|f| ui::draw(&app, f)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("SESSION COMPLETED"));
        assert!(text.contains("2 words completed"));
        assert!(text.contains("JAI HIND"));
    }

    #[test]
    fn test_draw_small_terminal() {
        for (width, height) in [(10, 4), (1, 1)] {
            let mut app = app("Book");
            let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
            terminal.draw(|f| ui::draw(&app, f)).unwrap();

            app.submit();
            terminal.draw(|f| ui::draw(&app, f)).unwrap();

            for _ in 0..3 {
                tick(&mut app);
            }
            terminal.draw(|f| ui::draw(&app, f)).unwrap();
            app.start_flash = None;
            terminal.draw(|f| ui::draw(&app, f)).unwrap();

            press(&mut app, KeyCode::Esc);
            assert!(app.confirm_exit);
            terminal.draw(|f| ui::draw(&app, f)).unwrap();
            press(&mut app, KeyCode::Char('n'));

            for _ in 0..15 {
                tick(&mut app);
            }
            assert_eq!(app.phase(), Phase::Completed);
            terminal.draw(|f| ui::draw(&app, f)).unwrap();
        }
    }

    #[test]
    fn test_draw_large_word_file() {
        let words: String = (0..70_000).map(|i| format!("w{i}\n")).collect();
        let app = app(&words);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| ui::draw(&app, f)).unwrap();
        assert!(buffer_text(&terminal).contains("WAT SIMULATOR"));
    }
}
