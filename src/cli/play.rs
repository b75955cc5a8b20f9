//! Play command implementation - interactive TUI session.

// CLI play uses intentional casts for terminal cell math
#![allow(clippy::cast_possible_truncation)]

use super::CliError;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mindmatch::game::{Coord, Cue, Engine, GameConfig, Phase, SystemClock};
use mindmatch::palette::Palette;
use mindmatch::replay::Recording;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Terminal cells per tile, horizontally.
const CELL_W: u16 = 7;
/// Terminal cells per tile, vertically.
const CELL_H: u16 = 3;
/// How long a cue flash stays in the header.
const FLASH_MS: u64 = 900;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the TUI fails.
pub(crate) fn execute(
    seed: Option<u64>,
    grid_size: u16,
    traps: u16,
    palette_dir: Option<PathBuf>,
    save: Option<PathBuf>,
) -> Result<(), CliError> {
    // Generate seed if not provided
    let seed = seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    });

    let config = GameConfig {
        grid_size,
        trap_count: traps,
        ..GameConfig::default()
    };

    let palette = match palette_dir {
        Some(dir) => Palette::from_dir(&dir)?,
        None => Palette::builtin(),
    };

    let engine = Engine::new(config, palette, seed, SystemClock::new())?;

    let app = App::new(engine, seed, save.is_some());
    let recording = run_tui(app)?;

    // Save recording if requested
    if let (Some(save_path), Some(recording)) = (save, recording) {
        recording
            .save(&save_path)
            .map_err(|e| CliError::new(format!("Failed to save recording: {e}")))?;
        println!("Recording saved to: {}", save_path.display());
    }

    Ok(())
}

/// App state for the TUI.
struct App {
    engine: Engine<SystemClock>,
    cursor: Coord,
    recording: Option<Recording>,
    flash: Option<(&'static str, Instant)>,
    board_area: Rect,
}

impl App {
    fn new(engine: Engine<SystemClock>, seed: u64, record: bool) -> Self {
        let recording = record.then(|| Recording::new(seed, *engine.config()));
        Self {
            engine,
            cursor: Coord::new(0, 0),
            recording,
            flash: None,
            board_area: Rect::default(),
        }
    }

    fn tap(&mut self, coord: Coord) {
        if let Some(recording) = &mut self.recording {
            recording.push(self.engine.now_ms(), coord);
        }
        self.engine.handle_tap(coord);
    }

    fn move_cursor(&mut self, row_delta: i32, col_delta: i32) {
        let max = i32::from(self.engine.board().grid_size()) - 1;
        let row = (i32::from(self.cursor.row) + row_delta).clamp(0, max);
        let col = (i32::from(self.cursor.col) + col_delta).clamp(0, max);
        self.cursor = Coord::new(row as u16, col as u16);
    }

    /// Map a terminal click to a board coordinate, if it lands on a tile.
    fn cell_at(&self, x: u16, y: u16) -> Option<Coord> {
        let inner_x = self.board_area.x + 1;
        let inner_y = self.board_area.y + 1;
        if x < inner_x || y < inner_y {
            return None;
        }
        let col = (x - inner_x) / CELL_W;
        let row = (y - inner_y) / CELL_H;
        let coord = Coord::new(row, col);
        self.engine.board().in_bounds(coord).then_some(coord)
    }

    /// Drain cues into the header flash.
    fn absorb_cues(&mut self) {
        for cue in self.engine.take_cues() {
            let label = match cue {
                Cue::Start => "Shuffled!",
                Cue::Flip => "Flip",
                Cue::Match => "Matched!!",
                Cue::Win => "You Won!!",
            };
            self.flash = Some((label, Instant::now()));
        }
    }

    fn flash_text(&self) -> Option<&'static str> {
        let (label, since) = self.flash?;
        (since.elapsed() < Duration::from_millis(FLASH_MS)).then_some(label)
    }
}

fn run_tui(mut app: App) -> Result<Option<Recording>, CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    loop {
        app.engine.tick();
        app.absorb_cues();

        // Draw
        terminal
            .draw(|f| ui(f, &mut app))
            .map_err(|e| CliError::new(e.to_string()))?;

        // Handle input with timeout
        if event::poll(Duration::from_millis(50)).map_err(|e| CliError::new(e.to_string()))? {
            match event::read().map_err(|e| CliError::new(e.to_string()))? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1, 0),
                    KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1, 0),
                    KeyCode::Left | KeyCode::Char('h') => app.move_cursor(0, -1),
                    KeyCode::Right | KeyCode::Char('l') => app.move_cursor(0, 1),
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        let coord = app.cursor;
                        app.tap(coord);
                    }
                    KeyCode::Char('r') => {
                        // Rebuild with a fresh clock so a recording started
                        // now has timestamps measured from zero
                        let seed = app.engine.seed().wrapping_add(1);
                        let config = *app.engine.config();
                        let palette = app.engine.palette().clone();
                        if let Ok(engine) = Engine::new(config, palette, seed, SystemClock::new())
                        {
                            app.engine = engine;
                            app.flash = None;
                            if let Some(recording) = &mut app.recording {
                                *recording = Recording::new(seed, config);
                            }
                        }
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                        && let Some(coord) = app.cell_at(mouse.column, mouse.row)
                    {
                        app.cursor = coord;
                        app.tap(coord);
                    }
                }
                _ => {}
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    Ok(app.recording)
}

fn ui(f: &mut Frame, app: &mut App) {
    let board_height = CELL_H * app.engine.board().grid_size() + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(board_height),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let board_width = CELL_W * app.engine.board().grid_size() + 2;
    let board_area = Rect {
        width: board_width.min(chunks[1].width),
        ..chunks[1]
    };
    app.board_area = board_area;
    render_board(f, board_area, app);

    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let engine = &app.engine;

    let status = match engine.phase() {
        Phase::Preview => "MEMORIZE THE BOMBS",
        Phase::Playing | Phase::Resolving => "PLAYING",
        Phase::Won => "WON",
    };

    let mut title = format!(
        " Mind Match | {}s | pairs {}/{} | {} ",
        engine.elapsed_secs(),
        engine.matched_pairs(),
        engine.pair_target(),
        status
    );
    if let Some(flash) = app.flash_text() {
        title.push_str(&format!("| {flash} "));
    } else if let Some(message) = engine.message() {
        title.push_str(&format!("| {message} "));
    }

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_board(f: &mut Frame, area: Rect, app: &App) {
    let engine = &app.engine;
    let grid_size = engine.board().grid_size();

    let mut lines: Vec<Line> = Vec::new();
    for row in 0..grid_size {
        for cell_line in 0..CELL_H {
            let mut spans = Vec::new();
            for col in 0..grid_size {
                let coord = Coord::new(row, col);
                spans.push(tile_span(engine, coord, cell_line, coord == app.cursor));
            }
            lines.push(Line::from(spans));
        }
    }

    let board_widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Board "));

    f.render_widget(board_widget, area);
}

/// One line of one tile cell.
fn tile_span(
    engine: &Engine<SystemClock>,
    coord: Coord,
    cell_line: u16,
    is_cursor: bool,
) -> Span<'static> {
    let tile = engine.board().get(coord);
    let face_up = engine.face_up(coord);

    let glyph = if cell_line != CELL_H / 2 {
        ' '
    } else if face_up {
        tile.map_or(' ', |t| match t.face {
            mindmatch::game::Face::Art(id) => engine
                .palette()
                .face(usize::from(id))
                .map_or('?', |asset| asset.glyph),
            mindmatch::game::Face::Trap => engine
                .palette()
                .trap()
                .map_or('*', |asset| asset.glyph),
        })
    } else {
        '?'
    };

    let text = format!("  {glyph}   ");

    let mut style = match tile {
        Some(t) if t.matched => Style::default().fg(Color::Green),
        Some(t) if t.face.is_trap() && face_up => Style::default().fg(Color::Red),
        Some(t) if t.revealed => Style::default().fg(Color::Cyan),
        _ => Style::default().fg(Color::DarkGray),
    };
    if is_cursor {
        style = style.bg(Color::Blue).add_modifier(Modifier::BOLD);
    }

    Span::styled(text, style)
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.engine.is_won() {
        " [q] Quit  [r] New board "
    } else {
        " [q] Quit  [arrows/hjkl] Move  [Enter/Space/click] Flip  [r] Restart "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
