use core::fmt;
use core::num::Saturating;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

use crate::*;

/// Valid transitions:
/// - InProgress -> Cleared
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Initial state, moves are accepted
    InProgress,
    /// Every safe cell is open
    Cleared,
    /// A mine exploded
    Lost,
}

impl GameState {
    pub const ALL: [GameState; 3] = [Self::InProgress, Self::Cleared, Self::Lost];

    pub const fn name(self) -> &'static str {
        match self {
            Self::InProgress => "InProgress",
            Self::Cleared => "Cleared",
            Self::Lost => "Lost",
        }
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Cleared | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::InProgress
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Open,
    Flag,
    Unflag,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Flag => "flag",
            Self::Unflag => "unflag",
        })
    }
}

/// A parsed player move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub op: Operation,
    pub coord: Coordinate,
}

impl Command {
    pub const fn new(op: Operation, coord: Coordinate) -> Self {
        Self { op, coord }
    }

    pub const fn open(x: Coord, y: Coord) -> Self {
        Self::new(Operation::Open, Coordinate::new(x, y))
    }

    pub const fn flag(x: Coord, y: Coord) -> Self {
        Self::new(Operation::Flag, Coordinate::new(x, y))
    }

    pub const fn unflag(x: Coord, y: Coord) -> Self {
        Self::new(Operation::Unflag, Coordinate::new(x, y))
    }
}

/// Represents a game from start to finish.
///
/// The presenter is shared, the field is owned and lives as long as the game.
#[derive(Clone)]
pub struct Game {
    field: Field,
    presenter: Rc<dyn Presenter>,
    state: GameState,
    quota: CellCount,
    opened: Saturating<CellCount>,
}

impl Game {
    /// Starts a fresh game on a randomly mined field.
    pub fn new(config: &GameConfig) -> Result<Self> {
        let field = Field::generate(&config.field, RandomMines::new(config.seed))?;
        Ok(Self::from_field(field))
    }

    /// Starts a fresh game on an existing field, whose safe cells make up the quota.
    pub fn from_field(field: Field) -> Self {
        let quota = field.total_cells() - field.mine_count();
        Self::from_parts(field, GameState::InProgress, quota, 0)
    }

    pub(crate) fn from_parts(
        field: Field,
        state: GameState,
        quota: CellCount,
        opened: CellCount,
    ) -> Self {
        Self {
            field,
            presenter: Rc::new(TextPresenter),
            state,
            quota,
            opened: Saturating(opened),
        }
    }

    /// Replaces the default [`TextPresenter`].
    pub fn with_presenter(mut self, presenter: Rc<dyn Presenter>) -> Self {
        self.presenter = presenter;
        self
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn quota(&self) -> CellCount {
        self.quota
    }

    pub fn opened(&self) -> CellCount {
        self.opened.0
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn presenter(&self) -> &Rc<dyn Presenter> {
        &self.presenter
    }

    /// Parses raw player input through the presenter and applies it.
    ///
    /// A finished game is rejected before the presenter sees the input.
    pub fn operate(&mut self, input: &str) -> Result<GameState> {
        self.check_in_progress()?;
        let command = self.presenter.parse_input(input)?;
        self.apply(command)
    }

    /// Applies an already structured command.
    pub fn apply(&mut self, command: Command) -> Result<GameState> {
        let Command { op, coord } = command;
        self.check_in_progress()?;

        match op {
            Operation::Open => {
                let result = self.field.open(coord)?;
                match result.new_state {
                    CellState::Exploded => self.end(GameState::Lost),
                    CellState::Opened => {
                        self.opened += result.revealed;
                        if self.opened.0 == self.quota {
                            self.end(GameState::Cleared);
                        }
                    }
                    other @ (CellState::Closed | CellState::Flagged) => {
                        unreachable!("opening {} left the cell {}", coord, other)
                    }
                }
            }
            Operation::Flag => {
                self.field.flag(coord)?;
            }
            Operation::Unflag => {
                self.field.unflag(coord)?;
            }
        }

        Ok(self.state)
    }

    pub fn render(&self) -> String {
        self.presenter.render(&self.field)
    }

    fn check_in_progress(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyFinished(self.state))
        } else {
            Ok(())
        }
    }

    fn end(&mut self, state: GameState) {
        log::debug!(
            "Game ended: {} ({} of {} safe cells opened)",
            state,
            self.opened,
            self.quota
        );
        self.state = state;
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("field", &self.field)
            .field("state", &self.state)
            .field("quota", &self.quota)
            .field("opened", &self.opened)
            .finish_non_exhaustive()
    }
}
