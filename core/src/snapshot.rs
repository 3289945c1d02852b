//! Serializable snapshots of a game in progress.
//!
//! ```json
//! {"field":{"width":1,"height":1,"cells":[[{"state":"Closed","has_mine":false,"surrounding_count":0}]]},
//!  "state":"InProgress","quota":1,"opened":0}
//! ```
//!
//! Every key is mandatory and unknown keys are rejected. Cell contents are
//! restored exactly as written and are not checked against each other, only
//! the grid shape and each cell's count range are.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::*;

type Decoded<T> = core::result::Result<T, SnapshotError>;

/// Persisted form of a [`Field`], rows from top to bottom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSnapshot {
    pub width: Coord,
    pub height: Coord,
    pub cells: Vec<Vec<Cell>>,
}

/// Persisted form of a [`Game`], everything but the presenter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameSnapshot {
    pub field: FieldSnapshot,
    pub state: GameState,
    pub quota: CellCount,
    pub opened: CellCount,
}

impl Field {
    pub fn to_snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            width: self.width(),
            height: self.height(),
            cells: self.rows().map(|row| row.to_vec()).collect(),
        }
    }

    pub fn from_snapshot(snapshot: FieldSnapshot) -> Result<Self> {
        Ok(decode_field(snapshot, "")?)
    }
}

impl Game {
    pub fn to_snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            field: self.field().to_snapshot(),
            state: self.state(),
            quota: self.quota(),
            opened: self.opened(),
        }
    }

    /// Rebuilds a game with exactly the persisted values and the default presenter.
    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Self> {
        let GameSnapshot {
            field,
            state,
            quota,
            opened,
        } = snapshot;

        let field = decode_field(field, "field").map_err(|err| {
            log::warn!("Rejected game snapshot: {}", err);
            GameError::Snapshot(err)
        })?;
        Ok(Self::from_parts(field, state, quota, opened))
    }

    /// Writes the snapshot as compact JSON, returning the number of bytes written.
    pub fn save(&self, mut writer: impl Write) -> Result<usize> {
        let bytes = serde_json::to_vec(&self.to_snapshot()).map_err(SnapshotError::from)?;
        writer.write_all(&bytes).map_err(SnapshotError::from)?;
        log::debug!("Saved {} game ({} bytes)", self.state(), bytes.len());
        Ok(bytes.len())
    }

    /// Reads a whole snapshot written by [`Game::save`].
    pub fn restore(reader: impl Read) -> Result<Self> {
        let snapshot: GameSnapshot = serde_json::from_reader(reader).map_err(|err| {
            log::warn!("Could not parse game snapshot: {}", err);
            SnapshotError::from(err)
        })?;
        let game = Self::from_snapshot(snapshot)?;
        log::debug!(
            "Restored {} game, {} of {} safe cells opened",
            game.state(),
            game.opened(),
            game.quota()
        );
        Ok(game)
    }
}

/// Checks what serde cannot: positive sides, a grid of exactly that shape
/// and counts a cell can actually have.
fn decode_field(snapshot: FieldSnapshot, path: &str) -> Decoded<Field> {
    let FieldSnapshot {
        width,
        height,
        cells,
    } = snapshot;

    if width == 0 {
        return Err(invalid(path, "width", "a positive integer"));
    }
    if height == 0 {
        return Err(invalid(path, "height", "a positive integer"));
    }

    let cells_path = child(path, "cells");
    expect_len(&cells, &cells_path, height)?;

    for (y, row) in cells.iter().enumerate() {
        let row_path = format!("{cells_path}[{y}]");
        expect_len(row, &row_path, width)?;
        if let Some(x) = row.iter().position(|cell| cell.neighbor_mine_count() > 8) {
            return Err(invalid(
                &format!("{row_path}[{x}]"),
                "surrounding_count",
                "an integer between 0 and 8",
            ));
        }
    }

    let shape = (usize::from(height), usize::from(width));
    Array2::from_shape_vec(shape, cells.into_iter().flatten().collect::<Vec<Cell>>())
        .ok()
        .and_then(Field::from_cells)
        .ok_or_else(|| SnapshotError::InvalidValue {
            path: cells_path,
            expected: "a rectangular grid",
        })
}

fn child(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_owned()
    } else {
        format!("{path}.{key}")
    }
}

fn invalid(path: &str, key: &str, expected: &'static str) -> SnapshotError {
    SnapshotError::InvalidValue {
        path: child(path, key),
        expected,
    }
}

fn expect_len<T>(entries: &[T], path: &str, len: Coord) -> Decoded<()> {
    if entries.len() != usize::from(len) {
        return Err(SnapshotError::ShapeMismatch {
            path: path.to_owned(),
            expected: usize::from(len),
            actual: entries.len(),
        });
    }
    Ok(())
}
