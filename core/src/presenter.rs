use core::fmt::Write as _;

use crate::*;

/// Turns a field into text and raw player input into commands.
pub trait Presenter {
    fn render(&self, field: &Field) -> String;

    /// Only the syntax of `raw` is checked here. A well-formed command naming
    /// a cell outside the field is still returned, and [`Game::operate`]
    /// rejects it as [`GameError::CoordinateOutOfRange`] without touching
    /// the field.
    fn parse_input(&self, raw: &str) -> core::result::Result<Command, InputError>;
}

/// Plain text grid: numbered columns starting at 1, lettered rows
/// (`a` to `z`, then `aa`, `ab`, ...).
///
/// ```text
///   1 2 3
/// a| |-|F
/// b|-|X|
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TextPresenter;

impl TextPresenter {
    pub const fn glyph(state: CellState) -> char {
        match state {
            CellState::Closed => ' ',
            CellState::Opened => '-',
            CellState::Flagged => 'F',
            CellState::Exploded => 'X',
        }
    }

    pub fn column_label(x: Coord) -> String {
        (u32::from(x) + 1).to_string()
    }

    pub fn row_label(y: Coord) -> String {
        let mut n = u32::from(y) + 1;
        let mut label = Vec::new();
        while n > 0 {
            n -= 1;
            label.push(b'a' + (n % 26) as u8);
            n /= 26;
        }
        label.reverse();
        String::from_utf8(label).unwrap_or_default()
    }

    fn parse_column(label: &str) -> Option<Coord> {
        let column: Coord = label.parse().ok()?;
        column.checked_sub(1)
    }

    fn parse_row(label: &str) -> Option<Coord> {
        if label.is_empty() {
            return None;
        }
        let mut n: u32 = 0;
        for byte in label.bytes() {
            if !byte.is_ascii_lowercase() {
                return None;
            }
            n = n.checked_mul(26)?.checked_add(u32::from(byte - b'a') + 1)?;
        }
        Coord::try_from(n - 1).ok()
    }
}

impl Presenter for TextPresenter {
    fn render(&self, field: &Field) -> String {
        let label_width = Self::row_label(field.height().saturating_sub(1)).len();

        let mut out = " ".repeat(label_width);
        for x in 0..field.width() {
            let _ = write!(out, " {}", Self::column_label(x));
        }

        for (y, row) in field.rows().enumerate() {
            out.push('\n');
            out.push_str(&Self::row_label(y as Coord));
            for cell in row.iter() {
                out.push('|');
                out.push(Self::glyph(cell.state()));
            }
        }

        out
    }

    fn parse_input(&self, raw: &str) -> core::result::Result<Command, InputError> {
        let words: Vec<&str> = raw.split_whitespace().collect();
        let (column, row, verb) = match words.as_slice() {
            [column, row] => (*column, *row, None),
            [column, row, verb] => (*column, *row, Some(*verb)),
            _ => return Err(InputError::WrongArity(words.len())),
        };

        let x = Self::parse_column(column).ok_or_else(|| InputError::UnknownColumn(column.into()))?;
        let y = Self::parse_row(row).ok_or_else(|| InputError::UnknownRow(row.into()))?;

        let op = match verb.map(str::to_lowercase).as_deref() {
            None => Operation::Open,
            Some("f" | "flag") => Operation::Flag,
            Some("u" | "unflag") => Operation::Unflag,
            Some(_) => return Err(InputError::UnknownVerb(verb.unwrap_or_default().into())),
        };

        Ok(Command::new(op, Coordinate::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_in(states: &[&[CellState]]) -> Field {
        let height = states.len();
        let width = states[0].len();
        let cells = ndarray::Array2::from_shape_fn((height, width), |(y, x)| {
            Cell::restore(states[y][x], states[y][x] == CellState::Exploded, 0)
        });
        Field::from_cells(cells).unwrap()
    }

    #[test]
    fn row_labels_are_bijective_base26() {
        assert_eq!(TextPresenter::row_label(0), "a");
        assert_eq!(TextPresenter::row_label(25), "z");
        assert_eq!(TextPresenter::row_label(26), "aa");
        assert_eq!(TextPresenter::row_label(51), "az");
        assert_eq!(TextPresenter::row_label(52), "ba");
        assert_eq!(TextPresenter::row_label(701), "zz");
        assert_eq!(TextPresenter::row_label(702), "aaa");
        assert_eq!(TextPresenter::row_label(799), "adt");

        for y in [0, 1, 25, 26, 27, 700, 799, 5000] {
            let label = TextPresenter::row_label(y);
            assert_eq!(TextPresenter::parse_row(&label), Some(y), "{label}");
        }
    }

    #[test]
    fn glyphs_are_distinct() {
        let glyphs: std::collections::HashSet<char> =
            CellState::ALL.into_iter().map(TextPresenter::glyph).collect();
        assert_eq!(glyphs.len(), CellState::ALL.len());
    }

    #[test]
    fn render_shows_every_state() {
        use CellState::*;
        let field = field_in(&[&[Closed, Opened], &[Flagged, Exploded]]);

        let text = TextPresenter.render(&field);

        assert_eq!(text, "  1 2\na| |-\nb|F|X");
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn render_pads_header_for_long_row_labels() {
        let mask = ndarray::Array2::from_elem((27, 2), false);
        let field = Field::from_layout(&MineLayout::from_mine_mask(mask).unwrap());

        let text = TextPresenter.render(&field);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 28);
        assert_eq!(lines[0], "   1 2");
        assert_eq!(lines[1], "a| | ");
        assert_eq!(lines[27], "aa| | ");
    }

    #[test]
    fn parse_open_flag_unflag() {
        let cases = [
            ("1 a", Command::open(0, 0)),
            ("  3   b ", Command::open(2, 1)),
            ("10 aa", Command::open(9, 26)),
            ("2 c f", Command::flag(1, 2)),
            ("2 c FLAG", Command::flag(1, 2)),
            ("2 c u", Command::unflag(1, 2)),
            ("2 c Unflag", Command::unflag(1, 2)),
        ];
        for (input, expected) in cases {
            assert_eq!(TextPresenter.parse_input(input), Ok(expected), "{input:?}");
        }
    }

    #[test]
    fn parse_leaves_bounds_to_the_field() {
        assert_eq!(TextPresenter.parse_input("4 a"), Ok(Command::open(3, 0)));

        let layout = MineLayout::from_mine_mask(ndarray::Array2::from_elem((3, 3), false)).unwrap();
        let mut game = Game::from_field(Field::from_layout(&layout));
        assert!(matches!(
            game.operate("4 a"),
            Err(GameError::CoordinateOutOfRange { width: 3, height: 3, .. })
        ));
        assert_eq!(game.field().count_in_state(CellState::Closed), 9);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        let cases = [
            ("", InputError::WrongArity(0)),
            ("1", InputError::WrongArity(1)),
            ("1 a f x", InputError::WrongArity(4)),
            ("a 1", InputError::UnknownColumn("a".into())),
            ("0 a", InputError::UnknownColumn("0".into())),
            ("-1 a", InputError::UnknownColumn("-1".into())),
            ("1 A", InputError::UnknownRow("A".into())),
            ("1 a1", InputError::UnknownRow("a1".into())),
            ("1 a open", InputError::UnknownVerb("open".into())),
        ];
        for (input, expected) in cases {
            assert_eq!(TextPresenter.parse_input(input), Err(expected), "{input:?}");
        }
    }
}
