//! Replay command implementation.

use super::{CliError, ReplayFormat};
use mindmatch::game::{Coord, Face, ManualClock};
use mindmatch::replay::{render_board, render_timeline, Recording, ReplayEngine};
use std::path::PathBuf;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the replay fails.
pub(crate) fn execute(
    recording_path: PathBuf,
    format: ReplayFormat,
    tap: Option<usize>,
) -> Result<(), CliError> {
    // Load recording
    let recording = Recording::load(&recording_path).map_err(|e| {
        CliError::new(format!(
            "Failed to load recording {}: {e}",
            recording_path.display()
        ))
    })?;

    match format {
        ReplayFormat::Tui => {
            let engine = if let Some(target) = tap {
                ReplayEngine::new_at(recording, target)?
            } else {
                ReplayEngine::new(recording)?
            };
            run_replay_tui(engine)
        }
        ReplayFormat::Text => {
            print!("{}", render_timeline(&recording)?);
            Ok(())
        }
    }
}

fn run_replay_tui(engine: ReplayEngine) -> Result<(), CliError> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    };
    use ratatui::{
        backend::CrosstermBackend,
        layout::{Constraint, Direction, Layout},
        style::{Color, Modifier, Style},
        widgets::{Block, Borders, Paragraph, Wrap},
        Terminal,
    };
    use std::io::stdout;
    use std::time::Duration;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    struct ReplayApp {
        engine: ReplayEngine,
    }

    let mut app = ReplayApp { engine };

    loop {
        terminal
            .draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(8),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                // Header
                let status = if app.engine.engine().is_won() {
                    "WON"
                } else if app.engine.is_done() {
                    "END OF RECORDING"
                } else {
                    "REPLAY"
                };
                let title = format!(
                    " Mind Match Replay | Tap {}/{} | {} ",
                    app.engine.cursor(),
                    app.engine.recording().taps.len(),
                    status
                );
                let header = Paragraph::new(title)
                    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .block(Block::default().borders(Borders::ALL));
                f.render_widget(header, chunks[0]);

                // Board with highlight info
                let mut body = render_board(app.engine.engine());
                if let Some(next) = next_tap_label(&app.engine) {
                    body.push_str(&next);
                }
                let board_widget = Paragraph::new(body)
                    .block(Block::default().borders(Borders::ALL).title(" Board "))
                    .wrap(Wrap { trim: false });
                f.render_widget(board_widget, chunks[1]);

                // Footer
                let controls = " [q] Quit  [←/→] Step  [Home] Restart  [End] Run to end ";
                let footer = Paragraph::new(controls)
                    .style(Style::default().fg(Color::Gray))
                    .block(Block::default().borders(Borders::ALL));
                f.render_widget(footer, chunks[2]);
            })
            .map_err(|e| CliError::new(e.to_string()))?;

        // Handle input
        if event::poll(Duration::from_millis(100)).map_err(|e| CliError::new(e.to_string()))?
            && let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Right | KeyCode::Char('l') => {
                    let _ = app.engine.step_forward();
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    let _ = app.engine.step_backward();
                }
                KeyCode::Home => {
                    let _ = app.engine.goto(0);
                }
                KeyCode::End => {
                    let taps = app.engine.recording().taps.len();
                    let _ = app.engine.goto(taps);
                    app.engine.settle();
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

/// Describe the next tap about to be applied, for the TUI body.
fn next_tap_label(replay: &ReplayEngine) -> Option<String> {
    let tap = replay.recording().taps.get(replay.cursor())?;
    let target = describe_target(replay.engine(), tap.coord);
    Some(format!(
        "\nNext: tap ({}, {}) at {}ms {target}\n",
        tap.coord.row, tap.coord.col, tap.at_ms
    ))
}

fn describe_target(
    engine: &mindmatch::game::Engine<ManualClock>,
    coord: Coord,
) -> &'static str {
    match engine.board().get(coord).map(|t| t.face) {
        Some(Face::Trap) => "(trap!)",
        Some(Face::Art(_)) => "",
        None => "(out of bounds)",
    }
}
