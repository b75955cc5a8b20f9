//! Plain-text rendering of replayed sessions.
//!
//! Used by the non-interactive replay output: a small ASCII board per
//! tap so a whole session can be read in a terminal or piped to a file.

// Allow format! with push_str for readability - the allocation overhead is negligible for text rendering
#![allow(clippy::format_push_string)]

use crate::game::{Clock, Coord, Engine, Face};
use crate::replay::{Recording, ReplayEngine, ReplayError};

/// Render the current board as an ASCII grid.
///
/// Face-up tiles show their palette glyph, the trap shows `*`, and
/// face-down tiles show `.`. A header line carries the pair count, the
/// displayed timer, and any active message.
///
/// Output format:
/// ```text
/// [t=12s] pairs 3/7
/// . C . D
/// C . * .
/// . . D .
/// . . . .
/// ```
#[must_use]
pub fn render_board<C: Clock>(engine: &Engine<C>) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "[t={}s] pairs {}/{}",
        engine.elapsed_secs(),
        engine.matched_pairs(),
        engine.pair_target()
    ));
    if let Some(message) = engine.message() {
        output.push_str(&format!("  {message}"));
    }
    output.push('\n');

    let grid_size = engine.board().grid_size();
    for row in 0..grid_size {
        for col in 0..grid_size {
            if col > 0 {
                output.push(' ');
            }
            let coord = Coord::new(row, col);
            output.push(tile_glyph(engine, coord));
        }
        output.push('\n');
    }

    output
}

/// The character shown for one tile.
fn tile_glyph<C: Clock>(engine: &Engine<C>, coord: Coord) -> char {
    if !engine.face_up(coord) {
        return '.';
    }
    match engine.board().get(coord).map(|t| t.face) {
        Some(Face::Art(id)) => engine
            .palette()
            .face(usize::from(id))
            .map_or('?', |asset| asset.glyph),
        Some(Face::Trap) => '*',
        None => '.',
    }
}

/// Render a full recording as a tap-by-tap timeline.
///
/// Each entry shows the tap number, timestamp, and coordinate followed
/// by the board after that tap resolves. A final settled board is
/// appended so pending timers do not hide the end state.
///
/// # Errors
///
/// Returns an error if the recorded configuration is invalid.
pub fn render_timeline(recording: &Recording) -> Result<String, ReplayError> {
    let mut replay = ReplayEngine::new(recording.clone())?;
    let mut output = String::new();

    output.push_str(&format!(
        "=== REPLAY seed {} grid {}x{} traps {} ({} taps) ===\n\n",
        recording.seed,
        recording.config.grid_size,
        recording.config.grid_size,
        recording.config.trap_count,
        recording.taps.len()
    ));

    output.push_str("--- start ---\n");
    output.push_str(&render_board(replay.engine()));
    output.push('\n');

    while !replay.is_done() {
        let tap = recording.taps[replay.cursor()];
        replay.step_forward()?;
        output.push_str(&format!(
            "--- tap {} at {}ms: ({}, {}) ---\n",
            replay.cursor(),
            tap.at_ms,
            tap.coord.row,
            tap.coord.col
        ));
        output.push_str(&render_board(replay.engine()));
        output.push('\n');
    }

    replay.settle();
    output.push_str("--- end ---\n");
    output.push_str(&render_board(replay.engine()));
    if replay.engine().is_won() {
        output.push_str("Session won\n");
    } else {
        output.push_str(&format!(
            "Session unfinished: {}/{} pairs\n",
            replay.engine().matched_pairs(),
            replay.engine().pair_target()
        ));
    }

    Ok(output)
}
