//! Match engine - the session state machine.
//!
//! One engine owns one session at a time. Frontends drain their input
//! queue through [`Engine::handle_tap`] and then call [`Engine::tick`]
//! once per frame; the tick runs the resolution and mismatch-delay steps
//! against the injected clock. There is no blocking wait anywhere: timers
//! are stored timestamps compared on every tick.

use crate::error::SetupError;
use crate::game::board::{build_deck, shuffled_board, Face};
use crate::game::{generate_board, Board, Clock, Coord, GameConfig};
use crate::palette::Palette;

/// Session-level phase, as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Trap tiles are forced visible; taps are ignored.
    Preview,
    /// Normal play: taps reveal tiles.
    Playing,
    /// Two unresolved tiles are face-up; taps are ignored until the
    /// pair matches or the mismatch delay elapses.
    Resolving,
    /// All pairs found. Terminal until an external reset.
    Won,
}

/// A fire-and-forget audio cue for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A session (or round, after a trap) started.
    Start,
    /// A tile was flipped face-up.
    Flip,
    /// A pair was matched.
    Match,
    /// The session was won.
    Win,
}

/// Transient status note shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    /// A pair was just matched.
    Matched,
    /// The session is won.
    Won,
}

impl Note {
    /// The display string for this note.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Note::Matched => "Matched!!",
            Note::Won => "You Won!!",
        }
    }
}

/// The match engine: board, selection, timers, and outcome for one session.
///
/// A trap tap replaces the whole session: fresh board (reshuffled with a
/// round-derived seed), fresh timers, zero progress. Nothing is ever
/// partially repaired.
#[derive(Debug)]
pub struct Engine<C: Clock> {
    config: GameConfig,
    palette: Palette,
    clock: C,
    /// Base seed; round N reshuffles with `base_seed + N` (wrapping).
    base_seed: u64,
    /// Unshuffled face multiset, validated once at construction.
    deck: Vec<Face>,
    /// How many trap resets this engine has performed.
    round: u32,
    board: Board,
    /// Face-up, unresolved tiles (0 to 2 of them).
    selection: Vec<Coord>,
    /// When a confirmed mismatch became visible, if one is pending.
    mismatch_since: Option<u64>,
    matched_pairs: u32,
    won: bool,
    /// Clock reading when the current round started.
    started_at: u64,
    /// Elapsed seconds latched at the winning tick.
    frozen_elapsed: Option<u64>,
    note: Option<Note>,
    cues: Vec<Cue>,
}

impl<C: Clock> Engine<C> {
    /// Create an engine and its first session.
    ///
    /// Validation happens here, once: after construction every engine
    /// operation is total.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is unpairable or the palette
    /// cannot cover it.
    pub fn new(config: GameConfig, palette: Palette, seed: u64, clock: C) -> Result<Self, SetupError> {
        let board = generate_board(seed, &config, &palette)?;
        let deck = build_deck(&config);
        let started_at = clock.now_ms();

        Ok(Self {
            config,
            palette,
            clock,
            base_seed: seed,
            deck,
            round: 0,
            board,
            selection: Vec::with_capacity(2),
            mismatch_since: None,
            matched_pairs: 0,
            won: false,
            started_at,
            frozen_elapsed: None,
            note: None,
            cues: vec![Cue::Start],
        })
    }

    /// Handle one tap at a board coordinate.
    ///
    /// Total: taps that are out of bounds, on matched or already-revealed
    /// tiles, or during non-interactive phases are defined no-ops.
    pub fn handle_tap(&mut self, coord: Coord) {
        if self.won || self.preview_active() {
            return;
        }
        // Two unresolved tiles already face-up: ignore until resolved
        if self.mismatch_since.is_some() || self.selection.len() >= 2 {
            return;
        }
        let Some(tile) = self.board.get(coord) else {
            return;
        };
        if tile.matched || tile.revealed {
            return;
        }

        if tile.face.is_trap() {
            // Session-level event: the whole board is replaced
            self.reset();
            return;
        }

        if let Some(tile) = self.board.get_mut(coord) {
            tile.revealed = true;
        }
        self.selection.push(coord);
        self.cues.push(Cue::Flip);
    }

    /// Advance timers and resolve a completed selection.
    ///
    /// Frontends call this once per frame after draining input, so a pair
    /// completed by a tap is resolved on the same tick.
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();

        // Resolution step: compare a completed, unconfirmed pair
        if !self.won && self.selection.len() == 2 && self.mismatch_since.is_none() {
            let (a, b) = (self.selection[0], self.selection[1]);
            let face_a = self.board.get(a).map(|t| t.face);
            let face_b = self.board.get(b).map(|t| t.face);

            if face_a == face_b {
                for coord in self.selection.drain(..) {
                    if let Some(tile) = self.board.get_mut(coord) {
                        tile.matched = true;
                    }
                }
                self.matched_pairs += 1;
                self.cues.push(Cue::Match);
                self.note = Some(Note::Matched);
                self.evaluate_win(now);
            } else {
                self.mismatch_since = Some(now);
            }
        }

        // Mismatch-delay step: the sole mechanism that hides a bad pair
        if let Some(since) = self.mismatch_since
            && now.saturating_sub(since) > self.config.mismatch_delay_ms
        {
            for coord in self.selection.drain(..) {
                if let Some(tile) = self.board.get_mut(coord) {
                    tile.revealed = false;
                }
            }
            self.mismatch_since = None;
        }

        #[cfg(debug_assertions)]
        crate::game::assert_invariants(self);
    }

    /// Check the win condition, run immediately after every pair increment.
    fn evaluate_win(&mut self, now: u64) {
        if !self.won && self.matched_pairs == self.config.pair_target() {
            self.won = true;
            self.frozen_elapsed = Some(now.saturating_sub(self.started_at) / 1000);
            self.note = Some(Note::Won);
            self.cues.push(Cue::Win);
        }
    }

    /// Replace the session wholesale: fresh shuffle, fresh timers, zero
    /// progress. This is both the trap reset and the external restart.
    pub fn reset(&mut self) {
        self.round = self.round.wrapping_add(1);
        let seed = self.base_seed.wrapping_add(u64::from(self.round));
        self.board = shuffled_board(seed, self.config.grid_size, &self.deck);
        self.selection.clear();
        self.mismatch_since = None;
        self.matched_pairs = 0;
        self.won = false;
        self.started_at = self.clock.now_ms();
        self.frozen_elapsed = None;
        self.note = None;
        self.cues.push(Cue::Start);
    }

    /// Current session phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.won {
            Phase::Won
        } else if self.preview_active() {
            Phase::Preview
        } else if self.mismatch_since.is_some() || self.selection.len() == 2 {
            Phase::Resolving
        } else {
            Phase::Playing
        }
    }

    /// Whether the trap preview window is currently forcing traps visible.
    ///
    /// Active from round start until strictly more than `preview_ms` has
    /// passed; inert when traps are disabled.
    #[must_use]
    pub fn preview_active(&self) -> bool {
        self.config.trap_count > 0
            && !self.won
            && self.clock.now_ms().saturating_sub(self.started_at) <= self.config.preview_ms
    }

    /// Render query: should the tile at `coord` be drawn face-up?
    ///
    /// Face-up iff revealed or matched, or a trap during the preview
    /// window. Out-of-bounds coordinates are face-down.
    #[must_use]
    pub fn face_up(&self, coord: Coord) -> bool {
        self.board.get(coord).is_some_and(|tile| {
            tile.revealed || tile.matched || (self.preview_active() && tile.face.is_trap())
        })
    }

    /// Elapsed whole seconds: live while playing, frozen once won.
    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.frozen_elapsed
            .unwrap_or_else(|| self.clock.now_ms().saturating_sub(self.started_at) / 1000)
    }

    /// Current status message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        self.note.map(Note::as_str)
    }

    /// Current status note, if any.
    #[must_use]
    pub const fn note(&self) -> Option<Note> {
        self.note
    }

    /// Take all cues buffered since the last call.
    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// The current board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The engine configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The palette backing this engine.
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Coordinates currently selected (face-up and unresolved).
    #[must_use]
    pub fn selection(&self) -> &[Coord] {
        &self.selection
    }

    /// Whether a mismatched pair is waiting out its reveal delay.
    #[must_use]
    pub const fn mismatch_pending(&self) -> bool {
        self.mismatch_since.is_some()
    }

    /// Pairs matched so far this round.
    #[must_use]
    pub const fn matched_pairs(&self) -> u32 {
        self.matched_pairs
    }

    /// Pairs needed to win.
    #[must_use]
    pub const fn pair_target(&self) -> u32 {
        self.config.pair_target()
    }

    /// Whether the session has been won.
    #[must_use]
    pub const fn is_won(&self) -> bool {
        self.won
    }

    /// How many trap resets this engine has performed.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// The base seed this engine was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.base_seed
    }

    /// Current clock reading in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Mutable access to the clock (manual clocks advance through this).
    pub const fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
