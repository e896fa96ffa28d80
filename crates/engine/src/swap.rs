use log::debug;
use thiserror::Error;

use crate::core::{CascadeStep, GameSession, MoveError, RandomSource};
use crate::plan::best_move;
use crate::types::{EngineEvent, Move, Outcome, Settlement};

/// A refused swap, carrying the session's reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(transparent)]
pub struct SwapError(#[from] pub MoveError);

impl SwapError {
    pub fn reason(self) -> MoveError {
        self.0
    }

    pub fn code(self) -> &'static str {
        self.0.code()
    }

    pub fn message(self) -> &'static str {
        match self.0 {
            MoveError::NoMovesLeft => "the move budget is exhausted",
            MoveError::Cascading => "a cascade is still being resolved",
            MoveError::SessionComplete => "the session has already ended",
            MoveError::OutOfBounds => "a position lies outside the board",
            MoveError::NotAdjacent => "cells must share an edge",
            MoveError::NoMatch => "the swap does not line up three equal tiles",
        }
    }
}

/// Everything an accepted move did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReport {
    pub mv: Move,
    /// One entry per cascade round, in order
    pub steps: Vec<CascadeStep>,
    /// Points earned by the whole chain
    pub points: u32,
    pub settlement: Settlement,
    pub events: Vec<EngineEvent>,
}

impl SwapReport {
    pub fn depth(&self) -> u32 {
        self.steps.last().map_or(0, |s| s.depth)
    }
}

/// Apply `mv` and resolve its cascade round by round
pub fn apply_swap<R: RandomSource>(
    session: &mut GameSession<R>,
    mv: Move,
) -> Result<SwapReport, SwapError> {
    let score_before = session.score();
    session.start_move(mv)?;

    let mut steps = Vec::new();
    let mut settlement = Settlement::Playable;
    while let Some(step) = session.step_cascade() {
        if let Some(s) = step.settlement {
            settlement = s;
        }
        steps.push(step);
    }

    Ok(SwapReport {
        mv,
        steps,
        points: session.score() - score_before,
        settlement,
        events: session.take_events(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplaySummary {
    pub moves_played: u32,
    pub score: u32,
    pub reshuffles: u32,
    pub outcome: Outcome,
}

/// Play greedy moves until the session leaves `Playing` or `max_moves` is reached
pub fn autoplay<R: RandomSource>(session: &mut GameSession<R>, max_moves: u32) -> AutoplaySummary {
    let mut moves_played = 0;
    let mut reshuffles = 0;

    while moves_played < max_moves && session.outcome() == Outcome::Playing {
        let Some(preview) = best_move(session.board()) else {
            break;
        };
        match apply_swap(session, preview.mv) {
            Ok(report) => {
                moves_played += 1;
                if matches!(report.settlement, Settlement::Reshuffled { .. }) {
                    reshuffles += 1;
                }
                debug!(
                    "autoplay move {}: {:?} -> {:?}, +{} (depth {})",
                    moves_played,
                    report.mv.from,
                    report.mv.to,
                    report.points,
                    report.depth()
                );
            }
            Err(_) => break,
        }
    }

    AutoplaySummary {
        moves_played,
        score: session.score(),
        reshuffles,
        outcome: session.outcome(),
    }
}
