//! Session module - the match-3 game state machine
//!
//! This module ties together the board, generation, RNG and scoring.
//! It validates and applies swaps, runs cascades, settles deadlocks and
//! tracks score, move budget and the session outcome.
//!
//! A cascade can be driven two ways:
//!
//! - [`GameSession::try_move`] resolves the whole chain before returning.
//! - [`GameSession::begin_move`] + [`GameSession::step_cascade`] resolve one
//!   round per call, so a presentation layer can animate between rounds.
//!   Move requests are refused until the final step settles the chain.

use log::{debug, info, warn};
use thiserror::Error;

use crate::board::Board;
use crate::config::{ConfigError, EngineConfig};
use crate::generate::{fill_empty, generate_board, reshuffle_until_playable};
use crate::rng::{RandomSource, SimpleRng};
use crate::scoring::{match_length_bonus, score_step, tile_points, ScoreResult};
use crate::snapshot::SessionSnapshot;
use crate::types::{
    EngineEvent, Match, Move, Outcome, Position, Settlement, TapOutcome, CASCADE_DEPTH_GUARD,
    GENERATION_ATTEMPTS, MAX_BUFFERED_EVENTS,
};

/// Why a move request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MoveError {
    #[error("no moves left")]
    NoMovesLeft,
    #[error("a cascade is in progress")]
    Cascading,
    #[error("session is complete")]
    SessionComplete,
    #[error("position is outside the board")]
    OutOfBounds,
    #[error("cells are not orthogonally adjacent")]
    NotAdjacent,
    #[error("swap does not create a match")]
    NoMatch,
}

impl MoveError {
    pub fn code(self) -> &'static str {
        match self {
            MoveError::NoMovesLeft => "no_moves_left",
            MoveError::Cascading => "cascading",
            MoveError::SessionComplete => "session_complete",
            MoveError::OutOfBounds => "out_of_bounds",
            MoveError::NotAdjacent => "not_adjacent",
            MoveError::NoMatch => "no_match",
        }
    }
}

/// One remove → fall → refill → rescan round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeStep {
    /// 1 for the matches made by the swap itself
    pub depth: u32,
    pub matches: Vec<Match>,
    /// Distinct cells emptied this round
    pub cleared: u32,
    pub score: ScoreResult,
    /// Set on the last round of the chain
    pub settlement: Option<Settlement>,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameSession<R: RandomSource = SimpleRng> {
    config: EngineConfig,
    board: Board,
    rng: R,
    score: u32,
    moves_left: u32,
    cascading: bool,
    /// Matches found by the last scan, removed by the next cascade step
    pending: Vec<Match>,
    depth: u32,
    /// Points earned by the chain in progress
    chain_points: u32,
    stalled: bool,
    target_announced: bool,
    selected: Option<Position>,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    events: Vec<EngineEvent>,
}

impl GameSession<SimpleRng> {
    /// Create a session on a freshly generated board, seeded deterministically
    pub fn new(config: EngineConfig, seed: u32) -> Result<Self, ConfigError> {
        Self::with_rng(config, SimpleRng::new(seed))
    }
}

impl<R: RandomSource> GameSession<R> {
    pub fn with_rng(config: EngineConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let generated = generate_board(&config, &mut rng);
        Ok(Self::assemble(config, generated.board, rng))
    }

    /// Start a session on a given layout
    ///
    /// The layout is taken as-is (standing matches included); empty cells are
    /// filled the same way a refill would fill them.
    pub fn from_board(config: EngineConfig, mut board: Board, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        if board.rows() != config.rows || board.cols() != config.cols {
            return Err(ConfigError::BoardShape {
                rows: config.rows,
                cols: config.cols,
                got_rows: board.rows(),
                got_cols: board.cols(),
            });
        }
        if let Some(kind) = board
            .cells()
            .iter()
            .flatten()
            .find(|k| k.0 >= config.tile_kinds)
        {
            return Err(ConfigError::UnknownTile {
                kind: kind.0,
                tile_kinds: config.tile_kinds,
            });
        }
        fill_empty(&mut board, config.tile_kinds, &mut rng);
        Ok(Self::assemble(config, board, rng))
    }

    fn assemble(config: EngineConfig, board: Board, rng: R) -> Self {
        Self {
            config,
            board,
            rng,
            score: 0,
            moves_left: config.move_budget,
            cascading: false,
            pending: Vec::new(),
            depth: 0,
            chain_points: 0,
            stalled: false,
            target_announced: false,
            selected: None,
            episode_id: 0,
            events: Vec::new(),
        }
    }

    /// Back to the initial state on a new board
    pub fn restart(&mut self) {
        let generated = generate_board(&self.config, &mut self.rng);
        self.board = generated.board;
        self.score = 0;
        self.moves_left = self.config.move_budget;
        self.cascading = false;
        self.pending.clear();
        self.depth = 0;
        self.chain_points = 0;
        self.stalled = false;
        self.target_announced = false;
        self.selected = None;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.events.clear();
        info!("session restarted (episode {})", self.episode_id);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn target_score(&self) -> u32 {
        self.config.target_score
    }

    pub fn is_cascading(&self) -> bool {
        self.cascading
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn has_valid_moves(&self) -> bool {
        self.board.has_valid_moves()
    }

    /// A swap that would make a match, if any; None while a cascade is running
    pub fn hint(&self) -> Option<Move> {
        if self.cascading {
            return None;
        }
        self.board.find_valid_move()
    }

    pub fn outcome(&self) -> Outcome {
        if self.stalled {
            Outcome::Stalled
        } else if self.score >= self.config.target_score {
            Outcome::TargetReached
        } else if self.moves_left == 0 {
            Outcome::OutOfMoves
        } else {
            Outcome::Playing
        }
    }

    /// Events buffered since the last call, oldest first
    ///
    /// At most [`MAX_BUFFERED_EVENTS`] are kept; callers that never drain
    /// the buffer lose the oldest entries first.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.board.clone_from(&self.board);
        out.score = self.score;
        out.moves_left = self.moves_left;
        out.target_score = self.config.target_score;
        out.cascading = self.cascading;
        out.has_valid_moves = self.board.has_valid_moves();
        out.outcome = self.outcome();
        out.selected = self.selected;
        out.episode_id = self.episode_id;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    fn check_preconditions(&self, mv: Move) -> Result<(), MoveError> {
        if self.moves_left == 0 {
            return Err(MoveError::NoMovesLeft);
        }
        if self.cascading {
            return Err(MoveError::Cascading);
        }
        if self.outcome().is_terminal() {
            return Err(MoveError::SessionComplete);
        }
        if !self.board.contains(mv.from) || !self.board.contains(mv.to) {
            return Err(MoveError::OutOfBounds);
        }
        if !mv.is_adjacent() {
            return Err(MoveError::NotAdjacent);
        }
        Ok(())
    }

    /// Same rules as [`try_move`](Self::try_move), reported as a reason; never mutates
    pub fn check_move(&self, mv: Move) -> Result<(), MoveError> {
        self.check_preconditions(mv)?;
        let mut probe = self.board.clone();
        probe.swap(mv.from, mv.to);
        if probe.has_match() {
            Ok(())
        } else {
            Err(MoveError::NoMatch)
        }
    }

    /// Apply a swap and resolve the full cascade before returning
    ///
    /// Returns false, with no state change, when the move is refused.
    pub fn try_move(&mut self, mv: Move) -> bool {
        if !self.begin_move(mv) {
            return false;
        }
        while self.step_cascade().is_some() {}
        true
    }

    /// Like [`try_move`](Self::try_move), handing each event to `observer`
    /// together with the board as it stands after the round that produced it
    ///
    /// Events delivered to the observer are not kept for [`take_events`](Self::take_events).
    pub fn try_move_with<F>(&mut self, mv: Move, mut observer: F) -> bool
    where
        F: FnMut(&EngineEvent, &Board),
    {
        if !self.begin_move(mv) {
            return false;
        }
        self.deliver(&mut observer);
        while self.step_cascade().is_some() {
            self.deliver(&mut observer);
        }
        true
    }

    fn deliver<F>(&mut self, observer: &mut F)
    where
        F: FnMut(&EngineEvent, &Board),
    {
        for event in self.events.drain(..) {
            observer(&event, &self.board);
        }
    }

    /// Validate and perform the swap, charge the move and arm the cascade
    ///
    /// After `true`, call [`step_cascade`](Self::step_cascade) until it returns
    /// a step carrying a settlement.
    pub fn begin_move(&mut self, mv: Move) -> bool {
        self.start_move(mv).is_ok()
    }

    /// [`begin_move`](Self::begin_move) reporting why a refused move was refused
    pub fn start_move(&mut self, mv: Move) -> Result<(), MoveError> {
        self.check_preconditions(mv)?;

        self.board.swap(mv.from, mv.to);
        let matches = self.board.find_all_matches();
        if matches.is_empty() {
            self.board.swap(mv.from, mv.to);
            return Err(MoveError::NoMatch);
        }

        self.moves_left -= 1;
        self.selected = None;
        self.cascading = true;
        self.pending = matches;
        self.depth = 0;
        self.chain_points = 0;
        self.push_event(EngineEvent::MoveAccepted {
            mv,
            moves_left: self.moves_left,
        });
        debug!(
            "move {:?} -> {:?} accepted, {} left",
            mv.from, mv.to, self.moves_left
        );
        Ok(())
    }

    /// Run one cascade round; None when no cascade is in progress
    pub fn step_cascade(&mut self) -> Option<CascadeStep> {
        if !self.cascading {
            return None;
        }
        if self.pending.is_empty() {
            let settlement = self.settle();
            return Some(CascadeStep {
                depth: self.depth,
                matches: Vec::new(),
                cleared: 0,
                score: ScoreResult::default(),
                settlement: Some(settlement),
            });
        }

        self.depth += 1;
        let depth = self.depth;
        let matches = std::mem::take(&mut self.pending);

        let mut cleared = 0;
        for m in &matches {
            let fresh = self.board.clear_matches(std::slice::from_ref(m));
            cleared += fresh;
            self.push_event(EngineEvent::MatchResolved {
                depth,
                matched: *m,
                points: tile_points(fresh) + match_length_bonus(m.len),
            });
        }
        let score = score_step(cleared, &matches);
        self.add_points(score.total);

        self.board.collapse();
        fill_empty(&mut self.board, self.config.tile_kinds, &mut self.rng);
        self.pending = self.board.find_all_matches();
        debug!(
            "cascade round {}: {} match(es), {} cell(s), +{} points, {} new match(es)",
            depth,
            matches.len(),
            cleared,
            score.total,
            self.pending.len()
        );

        let settlement = if self.pending.is_empty() {
            Some(self.settle())
        } else if depth >= CASCADE_DEPTH_GUARD {
            warn!("cascade still matching after {} rounds, forcing settle", depth);
            self.pending.clear();
            Some(self.settle())
        } else {
            None
        };

        Some(CascadeStep {
            depth,
            matches,
            cleared,
            score,
            settlement,
        })
    }

    fn push_event(&mut self, event: EngineEvent) {
        if self.events.len() >= MAX_BUFFERED_EVENTS {
            let dropped = self.events.len() + 1 - MAX_BUFFERED_EVENTS / 2;
            self.events.drain(..dropped);
            debug!("event buffer full, dropped {} oldest event(s)", dropped);
        }
        self.events.push(event);
    }

    fn add_points(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.chain_points = self.chain_points.saturating_add(points);
        if !self.target_announced && self.score >= self.config.target_score {
            self.target_announced = true;
            info!(
                "target score reached: {} / {}",
                self.score, self.config.target_score
            );
            self.push_event(EngineEvent::TargetReached {
                score: self.score,
                target: self.config.target_score,
            });
        }
    }

    /// Resolve the end of a chain: playable, reshuffled or stalled
    fn settle(&mut self) -> Settlement {
        let settlement = if !self.board.has_match() && self.board.has_valid_moves() {
            Settlement::Playable
        } else if self.moves_left > 0 {
            self.reshuffle()
        } else {
            self.stalled = true;
            info!("no valid moves and no budget left, score {}", self.score);
            self.push_event(EngineEvent::Stalled { score: self.score });
            Settlement::Stalled
        };

        self.push_event(EngineEvent::CascadeSettled {
            depth: self.depth,
            points: self.chain_points,
        });
        self.cascading = false;
        self.pending.clear();
        settlement
    }

    fn reshuffle(&mut self) -> Settlement {
        let (attempts, regenerated) = match reshuffle_until_playable(&mut self.board, &mut self.rng) {
            Some(attempts) => (attempts, false),
            None => {
                warn!(
                    "no playable permutation after {} reshuffles, generating a new board",
                    GENERATION_ATTEMPTS
                );
                self.board = generate_board(&self.config, &mut self.rng).board;
                (GENERATION_ATTEMPTS, true)
            }
        };
        info!("board deadlocked, reshuffled after {} attempt(s)", attempts);
        self.push_event(EngineEvent::Reshuffled {
            attempts,
            regenerated,
        });
        Settlement::Reshuffled {
            attempts,
            regenerated,
        }
    }

    /// Select-then-swap interaction
    ///
    /// The first tap selects a cell, tapping it again clears the selection and
    /// tapping any other cell attempts the swap. A refused swap selects the
    /// newly tapped cell instead. Taps on a finished session are ignored.
    pub fn tap(&mut self, pos: Position) -> TapOutcome {
        if self.cascading || self.outcome().is_terminal() || !self.board.contains(pos) {
            return TapOutcome::Ignored;
        }

        match self.selected {
            None => {
                self.selected = Some(pos);
                TapOutcome::Selected(pos)
            }
            Some(selected) if selected == pos => {
                self.selected = None;
                TapOutcome::Deselected
            }
            Some(selected) => {
                let mv = Move::new(selected, pos);
                if self.try_move(mv) {
                    TapOutcome::Moved(mv)
                } else {
                    self.selected = Some(pos);
                    TapOutcome::Rejected(pos)
                }
            }
        }
    }
}
