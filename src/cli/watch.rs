//! Watch command implementation - Interactive TUI viewer.

// TUI layout uses intentional casts for display
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use super::{CliError, check_player_count};
use conquer::GameOptions;
use conquer::game::{CellState, GameStatus, MoveAction, PlayerId, Position};
use conquer::playout::{RandomMover, default_roster, start_game};
use conquer::replay::{Recording, ReplayEngine};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::stdout;
use std::time::{Duration, Instant};

/// Execute the watch command.
///
/// Plays a random game to completion, then opens it in the viewer.
///
/// # Errors
///
/// Returns an error if the game cannot be set up or the TUI fails.
pub(crate) fn execute(options: GameOptions, players: usize, speed: u64) -> Result<(), CliError> {
    check_player_count(players)?;

    let seed = options.seed.unwrap_or_else(rand::random);
    let mut game = start_game(seed, &options, default_roster(players))?;
    let mut mover = RandomMover::new(seed);
    while mover.step(&mut game).is_some() {}

    let recording = Recording::from_game(&game)
        .ok_or_else(|| CliError::new("game finished without a seed"))?;
    let engine = ReplayEngine::new(recording)?;

    run_tui(engine, speed, true)
}

/// App state for the TUI.
struct App {
    engine: ReplayEngine,
    paused: bool,
    speed_ms: u64,
    last_step: Instant,
}

impl App {
    fn new(engine: ReplayEngine, speed_ms: u64, autoplay: bool) -> Self {
        Self {
            engine,
            paused: !autoplay,
            speed_ms,
            last_step: Instant::now(),
        }
    }

    fn step_forward(&mut self) {
        if !self.engine.at_end() {
            let _ = self.engine.step_forward();
            self.last_step = Instant::now();
        }
    }

    fn step_backward(&mut self) {
        let _ = self.engine.step_backward();
        self.last_step = Instant::now();
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    fn increase_speed(&mut self) {
        self.speed_ms = self.speed_ms.saturating_sub(50).max(20);
    }

    fn decrease_speed(&mut self) {
        self.speed_ms = (self.speed_ms + 50).min(2000);
    }

    fn should_auto_step(&self) -> bool {
        !self.paused
            && !self.engine.at_end()
            && self.last_step.elapsed() >= Duration::from_millis(self.speed_ms)
    }
}

/// Run the viewer until the user quits.
pub(super) fn run_tui(engine: ReplayEngine, speed: u64, autoplay: bool) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(engine, speed, autoplay);

    loop {
        terminal.draw(|f| ui(f, &app))?;

        if app.should_auto_step() {
            app.step_forward();
        }

        if event::poll(Duration::from_millis(30))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') => app.toggle_pause(),
                KeyCode::Right | KeyCode::Char('l') => {
                    app.paused = true;
                    app.step_forward();
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    app.paused = true;
                    app.step_backward();
                }
                KeyCode::Char('+' | '=') => app.increase_speed(),
                KeyCode::Char('-') => app.decrease_speed(),
                KeyCode::Char('r') => {
                    let _ = app.engine.goto_move(0);
                    app.paused = true;
                }
                KeyCode::End | KeyCode::Char('e') => {
                    let _ = app.engine.goto_move(app.engine.recording().len());
                    app.paused = true;
                }
                _ => {}
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);

    render_grid(f, main_chunks[0], app);
    render_stats(f, main_chunks[1], app);
    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let game = app.engine.state();
    let round = game.current_turn().map_or(0, |t| t.turn_number);

    let status = if game.status() == GameStatus::Ended {
        "GAME OVER"
    } else if app.paused {
        "PAUSED"
    } else {
        "RUNNING"
    };

    let title = format!(
        " Conquer | Move {}/{} | Round {round} | {status} | Speed: {}ms | Seed: {} ",
        app.engine.position(),
        app.engine.recording().len(),
        app.speed_ms,
        game.seed().unwrap_or_default()
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_grid(f: &mut Frame, area: Rect, app: &App) {
    let game = app.engine.state();
    let grid = game.grid();
    let last = app.engine.position().checked_sub(1).and_then(|i| {
        match app.engine.recording().moves.get(i).map(|m| m.action) {
            Some(MoveAction::Place(pos)) => Some(pos),
            _ => None,
        }
    });

    // Show the part of the grid that fits; each cell is two columns wide
    let visible_width = (usize::from(area.width).saturating_sub(2) / 2).min(usize::from(grid.width()));
    let visible_height = usize::from(area.height).saturating_sub(2).min(usize::from(grid.height()));

    let mut lines: Vec<Line> = Vec::with_capacity(visible_height);
    for y in 0..visible_height {
        let mut spans = Vec::with_capacity(visible_width);
        for x in 0..visible_width {
            let pos = Position::new(x as i32, y as i32);
            let (symbol, mut style) = match grid.get(pos).map(|c| c.state) {
                Some(CellState::Occupied(owner)) => ("■ ", Style::default().fg(player_color(game.players(), owner))),
                Some(CellState::Rock) => ("▲ ", Style::default().fg(Color::White)),
                Some(CellState::Blocked) => ("x ", Style::default().fg(Color::DarkGray)),
                Some(CellState::Special) => ("* ", Style::default().fg(Color::Magenta)),
                Some(CellState::Empty) | None => ("· ", Style::default().fg(Color::DarkGray)),
            };
            if last == Some(pos) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(symbol, style));
        }
        lines.push(Line::from(spans));
    }

    let grid_widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Grid "));

    f.render_widget(grid_widget, area);
}

fn render_stats(f: &mut Frame, area: Rect, app: &App) {
    let game = app.engine.state();
    let current = game.current_turn().map(|t| t.player_id);
    let mut lines = vec![Line::from("")];

    for line in game.scores() {
        let color = player_color(game.players(), line.player_id);
        let name = game
            .player(line.player_id)
            .map_or("Unknown", |p| p.name.as_str());
        let marker = if current == Some(line.player_id) && game.status() == GameStatus::Running {
            "▶ "
        } else {
            "  "
        };

        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(
                format!("Player {} ", line.player_id),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("({name})")),
        ]));
        lines.push(Line::from(format!(
            "    Tiles: {}  ({}%)",
            line.tiles_owned, line.percentage
        )));
        lines.push(Line::from(""));
    }

    if let Some(win) = game.win_condition()
        && win.is_decided()
    {
        lines.push(Line::from(Span::styled(
            win.reason.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }

    let stats_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Players "))
        .wrap(Wrap { trim: false });

    f.render_widget(stats_widget, area);
}

/// Terminal color for a player, by join order.
fn player_color(players: &[conquer::Player], id: PlayerId) -> Color {
    const COLORS: [Color; 8] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::LightRed,
        Color::LightBlue,
    ];
    players
        .iter()
        .position(|p| p.id == id)
        .and_then(|idx| COLORS.get(idx))
        .copied()
        .unwrap_or(Color::White)
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.engine.at_end() {
        " [q] Quit  [r] Restart  [←/→] Step "
    } else {
        " [q] Quit  [Space] Pause  [←/→] Step  [+/-] Speed  [r] Restart  [e] End "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
