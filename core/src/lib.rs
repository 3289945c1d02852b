//! Rules engine for a grid-based mine-clearing puzzle: cell state machine,
//! field with auto-reveal, game bookkeeping and snapshot persistence.

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use error::*;
pub use field::*;
pub use game::*;
pub use generator::*;
pub use presenter::*;
pub use snapshot::{FieldSnapshot, GameSnapshot};
pub use types::*;

mod cell;
mod error;
mod field;
mod game;
mod generator;
mod presenter;
mod snapshot;
mod types;

/// Dimensions and mine count of a field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    pub width: Coord,
    pub height: Coord,
    pub mine_count: CellCount,
}

impl FieldConfig {
    pub const fn new(width: Coord, height: Coord, mine_count: CellCount) -> Self {
        Self {
            width,
            height,
            mine_count,
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    /// Cells that have to be opened to clear the field.
    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mine_count)
    }

    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        if self.mine_count == 0 {
            return Err(ConfigError::NoMines);
        }
        if self.mine_count >= self.total_cells() {
            return Err(ConfigError::TooManyMines {
                mines: self.mine_count,
                cells: self.total_cells(),
            });
        }
        Ok(())
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::new(9, 9, 10)
    }
}

/// Everything needed to start a new game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub field: FieldConfig,
    /// Makes mine placement reproducible when set.
    pub seed: Option<u64>,
}

/// Where the mines are, stored as `(rows, columns)`.
#[derive(Clone, Debug, PartialEq)]
pub struct MineLayout {
    width: Coord,
    height: Coord,
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    /// Takes any mask whose sides fit in a [`Coord`], without checking the mine count.
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> core::result::Result<Self, ConfigError> {
        let (rows, columns) = mine_mask.dim();
        let (Ok(width), Ok(height)) = (Coord::try_from(columns), Coord::try_from(rows)) else {
            return Err(ConfigError::TooLarge { columns, rows });
        };
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Ok(Self {
            width,
            height,
            mine_mask,
            mine_count,
        })
    }

    /// Places mines at exactly `mines`, enforcing the same rules as a generated layout.
    pub fn from_mine_coords(
        width: Coord,
        height: Coord,
        mines: &[Coordinate],
    ) -> core::result::Result<Self, ConfigError> {
        let config = FieldConfig::new(width, height, mines.len() as CellCount);
        config.validate()?;

        let mut mine_mask: Array2<bool> = Array2::default((usize::from(height), usize::from(width)));
        for &coord in mines {
            if coord.x >= width || coord.y >= height {
                return Err(ConfigError::MineOutOfRange(coord));
            }
            let slot = &mut mine_mask[coord.to_nd_index()];
            if *slot {
                return Err(ConfigError::DuplicateMine(coord));
            }
            *slot = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn width(&self) -> Coord {
        self.width
    }

    pub fn height(&self) -> Coord {
        self.height
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.mine_mask.len() as CellCount - self.mine_count
    }

    pub fn contains_mine(&self, coord: Coordinate) -> bool {
        self[coord]
    }

    pub fn adjacent_mine_count(&self, coord: Coordinate) -> u8 {
        self.iter_neighbors(coord).filter(|&pos| self[pos]).count() as u8
    }

    pub fn iter_neighbors(&self, coord: Coordinate) -> NeighborIter {
        NeighborIter::new(coord, self.width(), self.height())
    }
}

impl Index<Coordinate> for MineLayout {
    type Output = bool;

    fn index(&self, coord: Coordinate) -> &Self::Output {
        &self.mine_mask[coord.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_beginner_field() {
        let config = GameConfig::default();
        assert_eq!(config.field, FieldConfig::new(9, 9, 10));
        assert_eq!(config.seed, None);
        assert_eq!(config.field.safe_cells(), 71);
    }

    #[test]
    fn validate_names_the_violated_constraint() {
        assert_eq!(FieldConfig::new(0, 3, 1).validate(), Err(ConfigError::ZeroWidth));
        assert_eq!(FieldConfig::new(3, 0, 1).validate(), Err(ConfigError::ZeroHeight));
        assert_eq!(FieldConfig::new(3, 3, 0).validate(), Err(ConfigError::NoMines));
        assert_eq!(
            FieldConfig::new(3, 3, 9).validate(),
            Err(ConfigError::TooManyMines { mines: 9, cells: 9 })
        );
        assert_eq!(FieldConfig::new(3, 3, 8).validate(), Ok(()));
    }

    #[test]
    fn config_reads_partial_json() {
        let config: GameConfig =
            serde_json::from_str(r#"{"field":{"width":4,"height":5,"mine_count":3},"seed":7}"#)
                .unwrap();
        assert_eq!(config.field, FieldConfig::new(4, 5, 3));
        assert_eq!(config.seed, Some(7));

        let config: GameConfig = serde_json::from_str(r#"{"seed":1}"#).unwrap();
        assert_eq!(config.field, FieldConfig::default());

        assert!(serde_json::from_str::<GameConfig>(r#"{"mines":3}"#).is_err());
    }

    #[test]
    fn layout_from_coords_counts_neighbors() {
        let layout = MineLayout::from_mine_coords(
            3,
            2,
            &[Coordinate::new(0, 0), Coordinate::new(2, 1)],
        )
        .unwrap();

        assert_eq!(layout.width(), 3);
        assert_eq!(layout.height(), 2);
        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.safe_cell_count(), 4);
        assert!(layout.contains_mine(Coordinate::new(2, 1)));
        assert_eq!(layout.adjacent_mine_count(Coordinate::new(1, 0)), 2);
        assert_eq!(layout.adjacent_mine_count(Coordinate::new(0, 1)), 1);
    }

    #[test]
    fn layout_rejects_bad_coords() {
        assert_eq!(
            MineLayout::from_mine_coords(2, 2, &[Coordinate::new(2, 0)]),
            Err(ConfigError::MineOutOfRange(Coordinate::new(2, 0)))
        );
        assert_eq!(
            MineLayout::from_mine_coords(
                2,
                2,
                &[Coordinate::new(1, 1), Coordinate::new(1, 1)]
            ),
            Err(ConfigError::DuplicateMine(Coordinate::new(1, 1)))
        );
        assert_eq!(
            MineLayout::from_mine_coords(1, 1, &[Coordinate::new(0, 0)]),
            Err(ConfigError::TooManyMines { mines: 1, cells: 1 })
        );
    }

    #[test]
    fn mask_sides_must_fit_a_coord() {
        let wide = Array2::from_elem((1, usize::from(Coord::MAX) + 1), false);
        assert_eq!(
            MineLayout::from_mine_mask(wide),
            Err(ConfigError::TooLarge {
                columns: 65536,
                rows: 1
            })
        );

        let mask = Array2::from_elem((1, usize::from(Coord::MAX)), true);
        let widest = MineLayout::from_mine_mask(mask).unwrap();
        assert_eq!(widest.width(), Coord::MAX);
        assert_eq!(widest.height(), 1);
        assert_eq!(widest.mine_count(), 65535);
    }
}
