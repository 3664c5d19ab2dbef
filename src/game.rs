//! Core game state and logic
//!
//! `Game` owns the board, the current and next pieces and all scoring state.
//! It is advanced by `tick` once per frame; input arrives as queued
//! `Action`s which are applied in order at the start of the next tick.

use crate::board::{Board, ClearEffect};
use crate::config::GameConfig;
use crate::piece::Piece;
use crate::random::{Randomizer, SeededRandomizer};
use crate::score::{Combo, Score, Stats};
use std::collections::VecDeque;
use std::time::Duration;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingStart,
    Playing,
    GameOver,
}

/// Input intents the session can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    HardDrop,
}

/// Named sound cues for the audio layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Move,
    Rotate,
    Drop,
    Clear,
    GameOver,
}

impl Cue {
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Move => "move",
            Cue::Rotate => "rotate",
            Cue::Drop => "drop",
            Cue::Clear => "clear",
            Cue::GameOver => "gameover",
        }
    }

    pub fn all() -> &'static [Cue] {
        &[Cue::Move, Cue::Rotate, Cue::Drop, Cue::Clear, Cue::GameOver]
    }
}

/// The main game struct
pub struct Game {
    config: GameConfig,
    /// The game board
    pub board: Board,
    /// Current falling piece
    pub current: Piece,
    /// Queued piece, always fully formed
    pub next: Piece,
    pub score: Score,
    pub combo: Combo,
    pub stats: Stats,
    pub phase: Phase,
    /// Best score known when the session started, raised on game over
    pub best_score: u64,
    /// Set when this session beat `best_score`
    pub new_best: bool,
    rng: Box<dyn Randomizer>,
    /// Time since the last gravity step
    fall_timer: Duration,
    /// Session clock
    elapsed: Duration,
    pending: VecDeque<Action>,
    cues: Vec<Cue>,
    effects: Vec<ClearEffect>,
}

impl Game {
    /// Create a new session with a fresh random source
    pub fn new(config: GameConfig, best_score: u64) -> Self {
        Self::with_randomizer(config, best_score, Box::new(SeededRandomizer::new()))
    }

    /// Create a new session drawing pieces from `rng`
    pub fn with_randomizer(
        config: GameConfig,
        best_score: u64,
        mut rng: Box<dyn Randomizer>,
    ) -> Self {
        let current = Piece::spawn(rng.as_mut(), config.width);
        let next = Piece::spawn(rng.as_mut(), config.width);

        Self {
            board: Board::new(config.width, config.height),
            combo: Combo::new(config.combo_window),
            config,
            current,
            next,
            score: Score::new(),
            stats: Stats::default(),
            phase: Phase::AwaitingStart,
            best_score,
            new_best: false,
            rng,
            fall_timer: Duration::ZERO,
            elapsed: Duration::ZERO,
            pending: VecDeque::new(),
            cues: Vec::new(),
            effects: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Leave the start screen
    pub fn start(&mut self) {
        if self.phase == Phase::AwaitingStart {
            self.phase = Phase::Playing;
            tracing::info!("session started");
        }
    }

    /// Reset for another session after game over
    ///
    /// Returns to `AwaitingStart` with a fresh board and pieces, keeping the
    /// random source and the best score.
    pub fn restart(&mut self) {
        if self.phase != Phase::GameOver {
            return;
        }
        self.board = Board::new(self.config.width, self.config.height);
        self.current = Piece::spawn(self.rng.as_mut(), self.config.width);
        self.next = Piece::spawn(self.rng.as_mut(), self.config.width);
        self.score = Score::new();
        self.combo = Combo::new(self.config.combo_window);
        self.stats = Stats::default();
        self.phase = Phase::AwaitingStart;
        self.new_best = false;
        self.fall_timer = Duration::ZERO;
        self.elapsed = Duration::ZERO;
        self.pending.clear();
        self.cues.clear();
        self.effects.clear();
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Queue an intent for the next tick
    pub fn push_action(&mut self, action: Action) {
        if self.phase == Phase::Playing {
            self.pending.push_back(action);
        }
    }

    /// Advance the session by `dt`
    pub fn tick(&mut self, dt: Duration) {
        if self.phase != Phase::Playing {
            self.pending.clear();
            return;
        }

        self.elapsed += dt;
        self.fall_timer += dt;
        self.stats.play_time = self.elapsed;
        self.combo.on_tick(self.elapsed);

        while let Some(action) = self.pending.pop_front() {
            self.apply(action);
            if self.phase != Phase::Playing {
                self.pending.clear();
                return;
            }
        }

        if self.fall_timer >= self.score.fall_interval(&self.config) {
            if self.board.is_valid(&self.current, 0, 1, None) {
                self.current.y += 1;
            } else {
                self.lock_and_advance();
            }
            self.fall_timer = Duration::ZERO;
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::MoveLeft => self.try_shift(-1, 0),
            Action::MoveRight => self.try_shift(1, 0),
            Action::SoftDrop => self.try_shift(0, 1),
            Action::Rotate => self.try_rotate(),
            Action::HardDrop => self.hard_drop(),
        }
    }

    fn try_shift(&mut self, dx: i32, dy: i32) {
        if self.board.is_valid(&self.current, dx, dy, None) {
            self.current.x += dx;
            self.current.y += dy;
            self.cues.push(Cue::Move);
        }
    }

    fn try_rotate(&mut self) {
        let rotated = self.current.rotated_shape();
        let original = std::mem::replace(&mut self.current.shape, rotated);
        if self.board.is_valid(&self.current, 0, 0, None) {
            self.cues.push(Cue::Rotate);
        } else {
            self.current.shape = original;
        }
    }

    fn hard_drop(&mut self) {
        self.current.y = self.landing_row();
        self.cues.push(Cue::Drop);
        self.lock_and_advance();
        self.fall_timer = Duration::ZERO;
    }

    /// Lowest row the current piece can reach by falling straight down
    fn landing_row(&self) -> i32 {
        let mut y = self.current.y;
        while self.board.is_valid(&self.current, 0, 1, Some(y)) {
            y += 1;
        }
        y
    }

    /// Where the current piece would land, without touching the board
    pub fn ghost(&self) -> Piece {
        self.current.shifted(0, self.landing_row() - self.current.y)
    }

    /// Lock the current piece, score the clears and promote the next piece
    fn lock_and_advance(&mut self) {
        self.board.lock(&self.current);
        self.stats.pieces_placed += 1;

        let cleared = self.board.clear_completed_lines();
        if cleared.count > 0 {
            let lines = cleared.count as u32;
            let bonus = self
                .combo
                .on_line_clear(lines, self.elapsed, self.config.combo_bonus);
            let level_before = self.score.level;
            self.score.add_clear(lines, bonus, &self.config);
            self.stats.max_combo = self.combo.max_streak;
            self.effects.extend(cleared.effects);
            self.cues.push(Cue::Clear);
            if self.score.level > level_before {
                tracing::debug!(level = self.score.level, lines = self.score.lines, "level up");
            }
        } else {
            self.combo.on_no_clear();
        }

        let upcoming = Piece::spawn(self.rng.as_mut(), self.config.width);
        let promoted = std::mem::replace(&mut self.next, upcoming);
        self.current = promoted.recentered(self.config.width);

        if !self.board.is_valid(&self.current, 0, 0, None) {
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.cues.push(Cue::GameOver);
        if self.score.points > self.best_score {
            self.best_score = self.score.points;
            self.new_best = true;
        }
        tracing::info!(
            score = self.score.points,
            lines = self.score.lines,
            level = self.score.level,
            new_best = self.new_best,
            "game over"
        );
    }

    /// Take the cues emitted since the last call
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// Take the clear effects emitted since the last call
    pub fn drain_effects(&mut self) -> Vec<ClearEffect> {
        std::mem::take(&mut self.effects)
    }
}
