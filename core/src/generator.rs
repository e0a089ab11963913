use ndarray::Array2;

use crate::*;

/// Strategy seam for mine placement, so tests and replays can substitute a
/// deterministic layout.
pub trait MineFieldGenerator {
    fn generate(self, config: GameConfig) -> Result<MineField>;
}

/// Uniform placement without replacement: sample a position, resample on
/// duplicates until `mines` distinct cells are marked. The configuration is
/// validated first; resampling on a board with no free cell would spin
/// forever.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScatterGenerator {
    seed: u64,
}

impl ScatterGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_entropy() -> Self {
        Self {
            seed: rand::random(),
        }
    }
}

impl MineFieldGenerator for ScatterGenerator {
    fn generate(self, config: GameConfig) -> Result<MineField> {
        use rand::prelude::*;

        config.validate()?;

        let mut mines: Array2<bool> = Array2::default(config.size().nd());
        let mut placed: CellCount = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        while placed < config.mines {
            let row = rng.random_range(0..config.rows);
            let col = rng.random_range(0..config.cols);
            let cell = &mut mines[(row, col).nd()];
            if !*cell {
                *cell = true;
                placed += 1;
            }
        }

        log::debug!(
            "placed {} mines on a {}x{} board (seed {})",
            placed,
            config.rows,
            config.cols,
            self.seed
        );
        Ok(MineField::from_mine_mask(mines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exactly_the_requested_mine_count() {
        let config = GameConfig::new(9, 9, 10).unwrap();
        let field = ScatterGenerator::new(7).generate(config).unwrap();
        assert_eq!(field.mine_count(), 10);
        assert_eq!(field.size(), (9, 9));
    }

    #[test]
    fn same_seed_same_layout() {
        let config = GameConfig::new(8, 8, 12).unwrap();
        let a = ScatterGenerator::new(42).generate(config).unwrap();
        let b = ScatterGenerator::new(42).generate(config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ_eventually() {
        let config = GameConfig::new(16, 16, 40).unwrap();
        let a = ScatterGenerator::new(1).generate(config).unwrap();
        let b = ScatterGenerator::new(2).generate(config).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn near_full_board_terminates() {
        // every cell but one is a mine; resampling must still finish
        let config = GameConfig::new(4, 4, 15).unwrap();
        let field = ScatterGenerator::new(3).generate(config).unwrap();
        assert_eq!(field.safe_cell_count(), 1);
    }

    #[test]
    fn unsatisfiable_count_fails_before_sampling() {
        let config = GameConfig {
            rows: 2,
            cols: 2,
            mines: 4,
        };
        assert!(ScatterGenerator::new(0).generate(config).is_err());
    }

    #[test]
    fn zero_mines_is_an_empty_field() {
        let config = GameConfig::new(3, 3, 0).unwrap();
        let field = ScatterGenerator::new(0).generate(config).unwrap();
        assert_eq!(field.mine_count(), 0);
    }
}
