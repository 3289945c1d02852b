use ndarray::{Array2, ArrayView1};
use std::collections::VecDeque;

use crate::*;

/// The minefield: a `height` x `width` grid of cells that it exclusively owns.
///
/// This is merely a representation of the board, win and loss bookkeeping
/// lives in [`Game`].
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    width: Coord,
    height: Coord,
    cells: Array2<Cell>,
}

impl Field {
    /// Builds a field with uniformly random mines.
    pub fn new(config: &FieldConfig) -> Result<Self> {
        Self::generate(config, RandomMines::default())
    }

    pub fn generate(config: &FieldConfig, generator: impl MineGenerator) -> Result<Self> {
        let layout = generator.generate(config)?;
        Ok(Self::from_layout(&layout))
    }

    /// Builds a field with mines at exactly `mines`.
    pub fn with_mines(width: Coord, height: Coord, mines: &[Coordinate]) -> Result<Self> {
        let layout = MineLayout::from_mine_coords(width, height, mines)?;
        Ok(Self::from_layout(&layout))
    }

    /// Builds a field over an already placed layout, precomputing every neighbour count.
    ///
    /// The layout is taken as-is, so boards that [`FieldConfig::validate`]
    /// would reject (no mines, no safe cells) can be built this way.
    pub fn from_layout(layout: &MineLayout) -> Self {
        let shape = (usize::from(layout.height()), usize::from(layout.width()));
        let cells = Array2::from_shape_fn(shape, |(y, x)| {
            let coord = Coordinate::new(x as Coord, y as Coord);
            Cell::new(layout[coord], layout.adjacent_mine_count(coord))
        });
        Self {
            width: layout.width(),
            height: layout.height(),
            cells,
        }
    }

    /// Wraps a restored grid without re-validating its cells.
    ///
    /// `None` when a side of the grid does not fit in a [`Coord`].
    pub(crate) fn from_cells(cells: Array2<Cell>) -> Option<Self> {
        let (rows, columns) = cells.dim();
        Some(Self {
            width: Coord::try_from(columns).ok()?,
            height: Coord::try_from(rows).ok()?,
            cells,
        })
    }

    pub fn width(&self) -> Coord {
        self.width
    }

    pub fn height(&self) -> Coord {
        self.height
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.width(), self.height())
    }

    pub fn mine_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.has_mine()).count() as CellCount
    }

    pub fn count_in_state(&self, state: CellState) -> CellCount {
        self.cells.iter().filter(|cell| cell.state() == state).count() as CellCount
    }

    pub fn cell(&self, coord: Coordinate) -> Option<&Cell> {
        self.contains(coord).then(|| &self.cells[coord.to_nd_index()])
    }

    /// Rows from top to bottom, each from left to right.
    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, Cell>> {
        self.cells.outer_iter()
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.x < self.width() && coord.y < self.height()
    }

    pub fn validate_coord(&self, coord: Coordinate) -> Result<Coordinate> {
        if self.contains(coord) {
            Ok(coord)
        } else {
            Err(GameError::CoordinateOutOfRange {
                coord,
                width: self.width(),
                height: self.height(),
            })
        }
    }

    pub fn iter_neighbors(&self, coord: Coordinate) -> NeighborIter {
        NeighborIter::new(coord, self.width(), self.height())
    }

    /// Opens the cell at `coord`. A safe cell without adjacent mines
    /// auto-reveals its closed neighbours, spreading through every further
    /// zero-count cell it uncovers.
    ///
    /// The returned result's `revealed` counts the origin and every cascaded cell.
    pub fn open(&mut self, coord: Coordinate) -> Result<OperationResult> {
        let coord = self.validate_coord(coord)?;
        let mut result = self.cell_op(Operation::Open, coord, Cell::open)?;

        if result.new_state == CellState::Exploded {
            log::debug!("Mine exploded at {}", coord);
            return Ok(result);
        }

        result.revealed += self.auto_reveal(coord);
        log::debug!("Opened {} ({} cells revealed)", coord, result.revealed);
        Ok(result)
    }

    pub fn flag(&mut self, coord: Coordinate) -> Result<OperationResult> {
        let coord = self.validate_coord(coord)?;
        let result = self.cell_op(Operation::Flag, coord, Cell::flag)?;
        log::debug!("Flagged {}", coord);
        Ok(result)
    }

    pub fn unflag(&mut self, coord: Coordinate) -> Result<OperationResult> {
        let coord = self.validate_coord(coord)?;
        let result = self.cell_op(Operation::Unflag, coord, Cell::unflag)?;
        log::debug!("Unflagged {}", coord);
        Ok(result)
    }

    fn cell_op(
        &mut self,
        op: Operation,
        coord: Coordinate,
        f: impl FnOnce(&mut Cell) -> core::result::Result<OperationResult, CellError>,
    ) -> Result<OperationResult> {
        f(&mut self.cells[coord.to_nd_index()]).map_err(|source| GameError::Cell {
            op,
            coord,
            source,
        })
    }

    /// Opens the closed neighbourhood of `origin` and keeps going from every
    /// newly opened zero-count cell. Returns how many cells it opened.
    fn auto_reveal(&mut self, origin: Coordinate) -> CellCount {
        let mut revealed = 0;
        // only cells this cascade itself opened get queued, so each is visited once
        let mut to_visit = VecDeque::from([origin]);

        while let Some(center) = to_visit.pop_front() {
            if self.cells[center.to_nd_index()].neighbor_mine_count() > 0 {
                continue;
            }

            for pos in self.iter_neighbors(center) {
                let cell = &mut self.cells[pos.to_nd_index()];

                // only closed safe cells; a restored grid may under-count its mines
                // and a cascade must never detonate one
                if cell.state() != CellState::Closed || cell.has_mine() {
                    log::trace!("Skipping cell at {}", pos);
                    continue;
                }

                if let Ok(opened) = cell.open() {
                    log::trace!(
                        "Flood opened cell at {}, mine count: {}",
                        pos,
                        cell.neighbor_mine_count()
                    );
                    revealed += opened.revealed;
                    to_visit.push_back(pos);
                }
            }
        }

        revealed
    }
}
