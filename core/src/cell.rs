use core::fmt;
use serde::{Deserialize, Serialize};

use crate::{CellCount, CellError};

/// Player-visible state of a single cell.
///
/// `Opened` and `Exploded` are terminal. `Closed` and `Flagged` only reach
/// each other through flagging and unflagging.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    Closed,
    Opened,
    Flagged,
    Exploded,
}

impl CellState {
    pub const ALL: [CellState; 4] = [Self::Closed, Self::Opened, Self::Flagged, Self::Exploded];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Closed => "Closed",
            Self::Opened => "Opened",
            Self::Flagged => "Flagged",
            Self::Exploded => "Exploded",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Opened | Self::Exploded)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Closed
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reported by every mutating cell and field operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OperationResult {
    pub new_state: CellState,
    /// Cells that entered `Opened` because of this operation, cascade included.
    pub revealed: CellCount,
}

impl OperationResult {
    pub const fn new(new_state: CellState) -> Self {
        let revealed = match new_state {
            CellState::Opened => 1,
            _ => 0,
        };
        Self {
            new_state,
            revealed,
        }
    }
}

/// One square of the field. Only `state` ever changes, and only through
/// [`Cell::open`], [`Cell::flag`] and [`Cell::unflag`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Cell {
    state: CellState,
    has_mine: bool,
    #[serde(rename = "surrounding_count")]
    neighbor_mines: u8,
}

impl Cell {
    pub(crate) const fn new(has_mine: bool, neighbor_mines: u8) -> Self {
        Self::restore(CellState::Closed, has_mine, neighbor_mines)
    }

    /// Rebuilds a cell exactly as it was persisted.
    pub(crate) const fn restore(state: CellState, has_mine: bool, neighbor_mines: u8) -> Self {
        Self {
            state,
            has_mine,
            neighbor_mines,
        }
    }

    pub const fn state(&self) -> CellState {
        self.state
    }

    pub const fn neighbor_mine_count(&self) -> u8 {
        self.neighbor_mines
    }

    /// Exposed for persistence and end-of-game displays, not for play.
    pub const fn has_mine(&self) -> bool {
        self.has_mine
    }

    pub fn open(&mut self) -> Result<OperationResult, CellError> {
        use CellState::*;

        match self.state {
            Closed => {
                self.state = if self.has_mine { Exploded } else { Opened };
                Ok(OperationResult::new(self.state))
            }
            Opened => Err(CellError::AlreadyOpened),
            Flagged => Err(CellError::CannotOpenFlagged),
            Exploded => Err(CellError::CannotOpenExploded),
        }
    }

    pub fn flag(&mut self) -> Result<OperationResult, CellError> {
        use CellState::*;

        match self.state {
            Closed => {
                self.state = Flagged;
                Ok(OperationResult::new(Flagged))
            }
            Opened => Err(CellError::CannotFlagOpened),
            Flagged => Err(CellError::AlreadyFlagged),
            Exploded => Err(CellError::CannotFlagExploded),
        }
    }

    pub fn unflag(&mut self) -> Result<OperationResult, CellError> {
        use CellState::*;

        match self.state {
            Flagged => {
                self.state = Closed;
                Ok(OperationResult::new(Closed))
            }
            Closed | Opened | Exploded => Err(CellError::NotFlagged),
        }
    }
}
