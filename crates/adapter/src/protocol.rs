//! Protocol module - JSON message types for the adapter
//!
//! One JSON object per line in each direction. Every message carries a
//! `type` tag. Grid cells are encoded as `0` for empty and `kind + 1` for a
//! tile.

use serde::{Deserialize, Serialize};

use crate::core::{EngineConfig, SessionSnapshot};
use crate::types::{EngineEvent, Move, Position, TapOutcome};

// ============== Client -> Engine Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PosMsg {
    pub row: i32,
    pub col: i32,
}

impl PosMsg {
    /// None when the coordinates cannot be on any board
    pub fn to_position(self) -> Option<Position> {
        let row = i8::try_from(self.row).ok()?;
        let col = i8::try_from(self.col).ok()?;
        Some(Position::new(row, col))
    }
}

impl From<Position> for PosMsg {
    fn from(pos: Position) -> Self {
        Self {
            row: pos.row as i32,
            col: pos.col as i32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveMsg {
    pub from: PosMsg,
    pub to: PosMsg,
}

impl From<Move> for MoveMsg {
    fn from(mv: Move) -> Self {
        Self {
            from: mv.from.into(),
            to: mv.to.into(),
        }
    }
}

/// Engine configuration on the wire; omitted fields take the defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigMsg {
    pub rows: u8,
    pub cols: u8,
    pub tile_kinds: u8,
    pub move_budget: u32,
    pub target_score: u32,
}

impl Default for ConfigMsg {
    fn default() -> Self {
        EngineConfig::default().into()
    }
}

impl From<EngineConfig> for ConfigMsg {
    fn from(c: EngineConfig) -> Self {
        Self {
            rows: c.rows,
            cols: c.cols,
            tile_kinds: c.tile_kinds,
            move_budget: c.move_budget,
            target_score: c.target_score,
        }
    }
}

impl From<ConfigMsg> for EngineConfig {
    fn from(c: ConfigMsg) -> Self {
        Self {
            rows: c.rows,
            cols: c.cols,
            tile_kinds: c.tile_kinds,
            move_budget: c.move_budget,
            target_score: c.target_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Start a new session, replacing the current one
    Init {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        config: Option<ConfigMsg>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u32>,
    },
    Move {
        from: PosMsg,
        to: PosMsg,
    },
    Tap {
        pos: PosMsg,
    },
    State,
    Board,
    Hint,
    Restart,
}

// ============== Engine -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_request")]
    InvalidRequest,
    #[serde(rename = "invalid_config")]
    InvalidConfig,
    #[serde(rename = "internal")]
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::InvalidConfig => "invalid_config",
            ErrorCode::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventMsg {
    MoveAccepted {
        #[serde(rename = "move")]
        mv: MoveMsg,
        moves_left: u32,
    },
    MatchResolved {
        depth: u32,
        /// Wire tile value (kind + 1)
        tile: u8,
        orientation: String,
        start: PosMsg,
        len: u8,
        points: u32,
    },
    CascadeSettled {
        depth: u32,
        points: u32,
    },
    Reshuffled {
        attempts: u32,
        regenerated: bool,
    },
    Stalled {
        score: u32,
    },
    TargetReached {
        score: u32,
        target: u32,
    },
}

impl From<&EngineEvent> for EventMsg {
    fn from(event: &EngineEvent) -> Self {
        match *event {
            EngineEvent::MoveAccepted { mv, moves_left } => EventMsg::MoveAccepted {
                mv: mv.into(),
                moves_left,
            },
            EngineEvent::MatchResolved {
                depth,
                matched,
                points,
            } => EventMsg::MatchResolved {
                depth,
                tile: matched.kind.0 + 1,
                orientation: matched.orientation.as_str().to_string(),
                start: matched.start.into(),
                len: matched.len,
                points,
            },
            EngineEvent::CascadeSettled { depth, points } => {
                EventMsg::CascadeSettled { depth, points }
            }
            EngineEvent::Reshuffled {
                attempts,
                regenerated,
            } => EventMsg::Reshuffled {
                attempts,
                regenerated,
            },
            EngineEvent::Stalled { score } => EventMsg::Stalled { score },
            EngineEvent::TargetReached { score, target } => {
                EventMsg::TargetReached { score, target }
            }
        }
    }
}

/// Full session state as sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMsg {
    pub rows: u8,
    pub cols: u8,
    pub grid: Vec<Vec<u8>>,
    pub score: u32,
    pub moves_left: u32,
    pub target_score: u32,
    pub cascading: bool,
    pub has_valid_moves: bool,
    pub playable: bool,
    pub outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<PosMsg>,
    pub episode_id: u32,
    /// Stable hash over board, score, budget and episode
    pub state_hash: String,
    #[serde(default)]
    pub events: Vec<EventMsg>,
}

impl StateMsg {
    pub fn from_snapshot(snap: &SessionSnapshot, events: &[EngineEvent]) -> Self {
        Self {
            rows: snap.board.rows(),
            cols: snap.board.cols(),
            grid: snap.board.to_u8_grid(),
            score: snap.score,
            moves_left: snap.moves_left,
            target_score: snap.target_score,
            cascading: snap.cascading,
            has_valid_moves: snap.has_valid_moves,
            playable: snap.playable(),
            outcome: snap.outcome.as_str().to_string(),
            selected: snap.selected.map(PosMsg::from),
            episode_id: snap.episode_id,
            state_hash: format!("{:016x}", state_hash(snap)),
            events: events.iter().map(EventMsg::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TapMsg {
    Ignored,
    Selected { pos: PosMsg },
    Deselected,
    Moved {
        #[serde(rename = "move")]
        mv: MoveMsg,
    },
    Rejected { pos: PosMsg },
}

impl From<TapOutcome> for TapMsg {
    fn from(outcome: TapOutcome) -> Self {
        match outcome {
            TapOutcome::Ignored => TapMsg::Ignored,
            TapOutcome::Selected(pos) => TapMsg::Selected { pos: pos.into() },
            TapOutcome::Deselected => TapMsg::Deselected,
            TapOutcome::Moved(mv) => TapMsg::Moved { mv: mv.into() },
            TapOutcome::Rejected(pos) => TapMsg::Rejected { pos: pos.into() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    State(StateMsg),
    Board {
        rows: u8,
        cols: u8,
        grid: Vec<Vec<u8>>,
    },
    Hint {
        #[serde(rename = "move")]
        mv: Option<MoveMsg>,
    },
    Move {
        accepted: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        state: StateMsg,
    },
    Tap {
        outcome: TapMsg,
        state: StateMsg,
    },
    Error {
        code: ErrorCode,
        message: String,
    },
}

impl Response {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Response::Error {
            code,
            message: message.into(),
        }
    }
}

/// Stable 64-bit FNV-1a hasher for `state_hash`.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions.
#[derive(Debug, Clone)]
struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl std::hash::Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.state ^= *b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

pub fn state_hash(snap: &SessionSnapshot) -> u64 {
    use std::hash::{Hash, Hasher};

    let mut hasher = Fnv1aHasher::new();
    snap.board.hash(&mut hasher);
    snap.score.hash(&mut hasher);
    snap.moves_left.hash(&mut hasher);
    snap.target_score.hash(&mut hasher);
    snap.cascading.hash(&mut hasher);
    snap.selected.hash(&mut hasher);
    snap.episode_id.hash(&mut hasher);
    hasher.finish()
}
