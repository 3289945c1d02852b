use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use sweeper_core::{Coord, Field, Game, GameState, TextPresenter};

const HELP: &str = "\
Commands:
  <column> <row>       open a cell, e.g. `3 b`
  <column> <row> f     flag a cell
  <column> <row> u     remove a flag
  save [file]          save the game
  help                 show this help
  quit                 leave without saving";

/// Plays until the game ends, the player quits, or input runs out.
pub fn run(
    game: &mut Game,
    input: impl BufRead,
    mut out: impl Write,
    save_path: &Path,
) -> anyhow::Result<()> {
    writeln!(out, "{HELP}")?;
    writeln!(out, "\n{}", game.render())?;

    for line in input.lines() {
        let line = line.context("could not read input")?;
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            [] => continue,
            ["q" | "quit" | "exit"] => {
                writeln!(out, "Bye.")?;
                return Ok(());
            }
            ["h" | "help"] => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            ["save"] => save(game, save_path, &mut out)?,
            ["save", path] => save(game, Path::new(path), &mut out)?,
            _ => match game.operate(&line) {
                Ok(state) => log::debug!("{} -> {}", line.trim(), state),
                Err(err) => writeln!(out, "{err}")?,
            },
        }

        writeln!(out, "\n{}", game.render())?;

        match game.state() {
            GameState::InProgress => {}
            GameState::Cleared => {
                writeln!(out, "\nCongratulations! You cleared the field.")?;
                return Ok(());
            }
            GameState::Lost => {
                writeln!(out, "\nBoom! You hit a mine. Game over.\n")?;
                writeln!(out, "{}", mine_map(game.field()))?;
                return Ok(());
            }
        }
    }

    Ok(())
}

fn save(game: &Game, path: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<usize> {
        let mut writer = BufWriter::new(File::create(path)?);
        let bytes = game.save(&mut writer)?;
        writer.flush()?;
        Ok(bytes)
    })();

    match result {
        Ok(bytes) => writeln!(out, "Saved to {} ({bytes} bytes).", path.display())?,
        Err(err) => {
            log::error!("Could not save game to {}: {:?}", path.display(), err);
            writeln!(out, "Could not save to {}: {err}", path.display())?;
        }
    }
    Ok(())
}

/// The board with every mine shown as `*`, for the end of a lost game.
fn mine_map(field: &Field) -> String {
    let label_width = TextPresenter::row_label(field.height().saturating_sub(1)).len();

    let mut lines = Vec::with_capacity(usize::from(field.height()) + 1);
    let mut header = " ".repeat(label_width);
    for x in 0..field.width() {
        header.push(' ');
        header.push_str(&TextPresenter::column_label(x));
    }
    lines.push(header);

    for (y, row) in field.rows().enumerate() {
        let mut line = TextPresenter::row_label(y as Coord);
        for cell in row.iter() {
            line.push('|');
            line.push(if cell.has_mine() {
                '*'
            } else {
                TextPresenter::glyph(cell.state())
            });
        }
        lines.push(line);
    }

    lines.join("\n")
}
