//! Play command implementation - the interactive fruit machine.

// Terminal cell arithmetic and animation frame selection
#![allow(clippy::cast_possible_truncation)]

use super::output::{leaderboard_lines, paytable_lines};
use super::{CliError, load_config, open_store};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use slots::scores::leaderboard;
use slots::{
    GameClock, GameConfig, HighScoreRecord, Input, JsonFileStore, Key, ModeKind, REEL_COUNT,
    ReconcileOutcome, SeededRandom, Session, SessionView, Signal, SlotsError, Symbol,
};
use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Target frame time.
const FRAME: Duration = Duration::from_millis(33);

/// How long each blurred symbol shows while a reel turns.
const BLUR_STEP_MS: u128 = 70;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the configuration or ledger cannot be opened, or the
/// terminal fails.
pub(crate) fn execute(
    config: Option<PathBuf>,
    scores: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<(), CliError> {
    let config = load_config(config)?;
    let store = open_store(scores)?;
    tracing::info!(path = %store.path().display(), "high-score ledger ready");

    let app = App::new(config, store, seed);
    run_tui(app)
}

/// App state for the TUI.
struct App {
    session: Session,
    clock: GameClock,
    rng: SeededRandom,
    store: JsonFileStore,
    /// Leaderboard as last read from the store.
    board: Vec<HighScoreRecord>,
    /// Problem to show the player, if any.
    status: Option<String>,
}

impl App {
    fn new(config: GameConfig, store: JsonFileStore, seed: Option<u64>) -> Self {
        let rng = SeededRandom::new(seed);
        tracing::info!(seed = rng.seed(), "starting session");
        Self {
            session: Session::new(config),
            clock: GameClock::new(),
            rng,
            store,
            board: Vec::new(),
            status: None,
        }
    }

    /// Feed one frame's input into the session.
    fn step(&mut self, elapsed: Duration, input: &Input) -> Result<Signal, CliError> {
        self.clock.advance(elapsed);
        let before = self.session.mode().kind();

        let signal = match self.session.update(self.clock.now(), input, &mut self.rng, &mut self.store) {
            Ok(signal) => signal,
            Err(SlotsError::StoreUnavailable(e)) => {
                self.status = Some(format!("High scores not saved: {e}"));
                Signal::Continue
            }
            Err(e) => return Err(e.into()),
        };

        let after = self.session.mode().kind();
        if after == ModeKind::HighScores && before != ModeKind::HighScores {
            self.refresh_board();
        }
        if after == ModeKind::Ready && before == ModeKind::HighScores {
            self.status = None;
        }
        Ok(signal)
    }

    fn refresh_board(&mut self) {
        match leaderboard(&self.store, self.session.config().max_highscores) {
            Ok(board) => self.board = board,
            Err(e) => {
                tracing::warn!(%e, "failed to read leaderboard");
                self.status = Some(format!("High scores unavailable: {e}"));
            }
        }
    }
}

fn run_tui(mut app: App) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let result = game_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn game_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), CliError> {
    let mut last_frame = Instant::now();

    loop {
        let view = app.session.view(app.clock.now());
        terminal.draw(|f| ui(f, app, &view)).map_err(|e| CliError::new(e.to_string()))?;

        let mut input = Input::idle();
        if event::poll(FRAME).map_err(|e| CliError::new(e.to_string()))?
            && let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))?
        {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(());
            }
            input = translate_key(key);
        }

        let elapsed = last_frame.elapsed();
        last_frame = Instant::now();
        if app.step(elapsed, &input)? == Signal::Exit {
            return Ok(());
        }
    }
}

/// Map a terminal key event onto session input.
///
/// Terminals report presses rather than held keys, so a space or escape
/// press counts as holding that key for one frame.
fn translate_key(key: KeyEvent) -> Input {
    let fresh_press = key.kind == KeyEventKind::Press;
    if key.kind == KeyEventKind::Release {
        return Input::idle();
    }

    let mapped = match key.code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        _ => None,
    };

    Input {
        key: mapped,
        fresh_press,
        confirm_held: key.code == KeyCode::Char(' '),
        cancel_held: key.code == KeyCode::Esc,
    }
}

fn ui(f: &mut Frame, app: &App, view: &SessionView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], view);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(4)])
        .split(main_chunks[0]);

    render_reels(f, left[0], app, view);
    if view.mode == ModeKind::HighScores {
        render_leaderboard(f, left[1], app, view);
    } else {
        render_message(f, left[1], app, view);
    }
    render_paytable(f, main_chunks[1], app, view);
    render_footer(f, chunks[2], view);
}

fn render_header(f: &mut Frame, area: Rect, view: &SessionView) {
    let title = format!(
        " Slots | Bankroll: {} | Moves left: {} | {} ",
        view.bankroll, view.moves_remaining, view.mode
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_reels(f: &mut Frame, area: Rect, app: &App, view: &SessionView) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, REEL_COUNT as u32); REEL_COUNT])
        .split(area);

    let blur_frame = (app.clock.now().as_millis() / BLUR_STEP_MS) as usize;

    for (i, (reel, cell)) in view.reels.iter().zip(cells.iter()).enumerate() {
        let (symbol, style) = if reel.animating {
            let blurred = Symbol::ALL[(blur_frame + i * 2) % Symbol::COUNT];
            (blurred, Style::default().fg(Color::DarkGray))
        } else {
            let style = if view.winning && !view.spinning {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(symbol_color(reel.symbol))
            };
            (reel.symbol, style)
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(symbol.name().to_uppercase(), style)),
        ];
        if reel.held {
            lines.push(Line::from(Span::styled(
                "HELD",
                Style::default().fg(Color::Black).bg(Color::Yellow),
            )));
        }

        let widget = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(format!(" {} ", i + 1)));
        f.render_widget(widget, *cell);
    }
}

fn symbol_color(symbol: Symbol) -> Color {
    match symbol {
        Symbol::Orange => Color::LightRed,
        Symbol::Seven => Color::Red,
        Symbol::Bar => Color::White,
        Symbol::Pear => Color::Green,
        Symbol::Banana => Color::Yellow,
        Symbol::Cherry => Color::Magenta,
    }
}

fn render_message(f: &mut Frame, area: Rect, app: &App, view: &SessionView) {
    let config = app.session.config();
    let mut lines = Vec::new();

    match view.mode {
        ModeKind::Ready => {
            lines.push(Line::from(format!("Press SPACE to spin ({} a go)", config.play_cost)));
            lines.push(Line::from("Press ESC to see the high scores"));
        }
        ModeKind::Spinning => lines.push(Line::from("Good luck...")),
        ModeKind::Result => {
            match view.last_win {
                Some(prize) => lines.push(Line::from(Span::styled(
                    format!("Five of a kind! You win {prize}"),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))),
                None => lines.push(Line::from("No luck this time")),
            }
            if view.moves_offered {
                lines.push(Line::from(format!(
                    "[N] Nudge a reel ({})  [H] Hold a reel ({})  {} moves left",
                    config.nudge_cost, config.hold_cost, view.moves_remaining
                )));
            }
            lines.push(Line::from("SPACE to play again, ESC to cash out"));
        }
        ModeKind::Nudge => lines.push(Line::from(format!("Nudge which reel? [1-{REEL_COUNT}]"))),
        ModeKind::Hold => lines.push(Line::from(format!("Hold which reel? [1-{REEL_COUNT}]"))),
        ModeKind::EnterName => {
            let net = app.session.bankroll().net_pot();
            lines.push(Line::from(format!("You finished {net:+}")));
            lines.push(Line::from(format!("Enter your name: {}_", view.name)));
            lines.push(Line::from("Letters only, ENTER when done"));
        }
        ModeKind::HighScores => {}
    }

    if let Some(status) = &app.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(status.clone(), Style::default().fg(Color::Red))));
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Machine "))
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_leaderboard(f: &mut Frame, area: Rect, app: &App, view: &SessionView) {
    let capacity = app.session.config().max_highscores;
    let mut lines: Vec<Line> = Vec::new();

    if let Some(player) = &view.player {
        let note = match view.outcome {
            Some(ReconcileOutcome::Updated { score, .. }) => format!("{player}, your total is now {score}"),
            Some(ReconcileOutcome::Inserted { .. } | ReconcileOutcome::Replaced { .. }) => {
                format!("{player}, you made the board!")
            }
            Some(ReconcileOutcome::NotQualified) => format!("Sorry {player}, not this time"),
            None => format!("{player}, your score was not saved"),
        };
        lines.push(Line::from(Span::styled(note, Style::default().add_modifier(Modifier::BOLD))));
        lines.push(Line::from(""));
    }

    for (i, line) in leaderboard_lines(&app.board, capacity).into_iter().enumerate() {
        let name = app.board.get(i).map(|r| r.name.as_str());
        let style = if name.is_some() && name == view.player.as_deref() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(line, style)));
    }

    if let Some(status) = &app.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(status.clone(), Style::default().fg(Color::Red))));
    }

    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" High Scores "));
    f.render_widget(widget, area);
}

fn render_paytable(f: &mut Frame, area: Rect, app: &App, view: &SessionView) {
    let mut lines: Vec<Line> = paytable_lines(app.session.config())
        .into_iter()
        .map(Line::from)
        .collect();

    let stats = view.stats;
    lines.push(Line::from(""));
    lines.push(Line::from(format!("Spins  {}", stats.spins)));
    lines.push(Line::from(format!("Wins   {}", stats.wins)));
    lines.push(Line::from(format!("Moves  {}", stats.moves_used)));

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Paytable "))
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, view: &SessionView) {
    let controls = match view.mode {
        ModeKind::Ready => " [Space] Spin  [Esc] High scores  [Ctrl-C] Quit ",
        ModeKind::Spinning => " [Ctrl-C] Quit ",
        ModeKind::Result if view.moves_offered => " [Space] Again  [N] Nudge  [H] Hold  [Esc] Cash out ",
        ModeKind::Result => " [Space] Again  [Esc] Cash out ",
        ModeKind::Nudge | ModeKind::Hold => " [1-5] Choose reel ",
        ModeKind::EnterName => " [A-Z] Type  [Backspace] Delete  [Enter] Save ",
        ModeKind::HighScores => " [Space] Play again  [Esc] Quit ",
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
