use rand::{SeedableRng, rngs::SmallRng, seq::index};

use super::*;

/// Uniform placement: every set of `mine_count` distinct cells is equally likely.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RandomMines {
    seed: Option<u64>,
}

impl RandomMines {
    pub const fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    pub const fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }
}

impl MineGenerator for RandomMines {
    fn generate(self, config: &FieldConfig) -> core::result::Result<MineLayout, ConfigError> {
        config.validate()?;

        let width = usize::from(config.width);
        let height = usize::from(config.height);
        let total = width * height;
        let amount = config.mine_count as usize;

        let picks = match self.seed {
            Some(seed) => index::sample(&mut SmallRng::seed_from_u64(seed), total, amount),
            None => index::sample(&mut rand::rng(), total, amount),
        };

        let mut mine_mask: Array2<bool> = Array2::default((height, width));
        for place in picks.iter() {
            mine_mask[[place / width, place % width]] = true;
        }

        let layout = MineLayout::from_mine_mask(mine_mask)?;
        // double check mine count
        if layout.mine_count() != config.mine_count {
            log::warn!(
                "Generated layout count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mine_count
            );
        }
        log::debug!(
            "Placed {} mines on a {}x{} field (seed {:?})",
            layout.mine_count(),
            config.width,
            config.height,
            self.seed
        );
        Ok(layout)
    }
}
