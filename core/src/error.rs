use thiserror::Error;

use crate::{CellCount, Coord, Coordinate, GameState, Operation};

/// Illegal per-cell transitions.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CellError {
    #[error("cell is already opened")]
    AlreadyOpened,
    #[error("flagged cell cannot be opened, unflag it first")]
    CannotOpenFlagged,
    #[error("cell has already exploded")]
    CannotOpenExploded,
    #[error("opened cell cannot be flagged")]
    CannotFlagOpened,
    #[error("cell is already flagged")]
    AlreadyFlagged,
    #[error("exploded cell cannot be flagged")]
    CannotFlagExploded,
    #[error("cell is not flagged")]
    NotFlagged,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("field width is zero")]
    ZeroWidth,
    #[error("field height is zero")]
    ZeroHeight,
    #[error("mine count is zero")]
    NoMines,
    #[error("too many mines, {mines} requested but the field only has {cells} cells")]
    TooManyMines { mines: CellCount, cells: CellCount },
    #[error("mine at {0} is outside the field")]
    MineOutOfRange(Coordinate),
    #[error("mine at {0} is listed twice")]
    DuplicateMine(Coordinate),
    #[error("a {columns}x{rows} field does not fit in 16-bit coordinates")]
    TooLarge { columns: usize, rows: usize },
}

/// Failures of the presenter turning raw text into a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("expected `<column> <row> [f|u]`, got {0} words")]
    WrongArity(usize),
    #[error("unknown column {0:?}")]
    UnknownColumn(String),
    #[error("unknown row {0:?}")]
    UnknownRow(String),
    #[error("unknown action {0:?}, use `f` to flag or `u` to unflag")]
    UnknownVerb(String),
}

/// Snapshots that cannot be turned back into a game.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("{path:?} must be {expected}")]
    InvalidValue { path: String, expected: &'static str },
    #[error("{path:?} has {actual} entries but {expected} were declared")]
    ShapeMismatch {
        path: String,
        expected: usize,
        actual: usize,
    },
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum GameError {
    #[error("invalid field configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("coordinate {coord} is out of range for a {width}x{height} field")]
    CoordinateOutOfRange {
        coord: Coordinate,
        width: Coord,
        height: Coord,
    },
    #[error("cannot {op} cell at {coord}: {source}")]
    Cell {
        op: Operation,
        coord: Coordinate,
        source: CellError,
    },
    #[error("game already ended ({0}), no new moves are accepted")]
    AlreadyFinished(GameState),
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl GameError {
    /// The per-cell transition failure behind this error, if any.
    pub fn cell_error(&self) -> Option<CellError> {
        match self {
            Self::Cell { source, .. } => Some(*source),
            _ => None,
        }
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
