use crate::*;
pub use random::*;

mod random;

/// Decides where the mines of a new field go.
pub trait MineGenerator {
    fn generate(self, config: &FieldConfig) -> core::result::Result<MineLayout, ConfigError>;
}

/// Mines at exactly the given coordinates, for reproducible boards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedMines(pub Vec<Coordinate>);

impl MineGenerator for FixedMines {
    fn generate(self, config: &FieldConfig) -> core::result::Result<MineLayout, ConfigError> {
        let layout = MineLayout::from_mine_coords(config.width, config.height, &self.0)?;
        if layout.mine_count() != config.mine_count {
            log::warn!(
                "Fixed layout has {} mines but the configuration asked for {}",
                layout.mine_count(),
                config.mine_count
            );
        }
        Ok(layout)
    }
}
