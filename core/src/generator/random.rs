use super::*;

/// Purely random placement that keeps the first revealed cell safe.
///
/// Cells are drawn uniformly and redrawn when they already hold a mine or are the excluded cell,
/// so sparse boards take about one draw per mine.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
    exclude: Coord2,
}

impl RandomMineGenerator {
    pub fn new(seed: u64, exclude: Coord2) -> Self {
        Self { seed, exclude }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use rand::prelude::*;

        let (rows, cols) = config.size;
        let mut layout = MineLayout::empty(config.size);

        let free_cells = if in_bounds(self.exclude, config.size) {
            config.total_cells() - 1
        } else {
            config.total_cells()
        };
        // rejection sampling would never finish on an over-full board
        let mines = if config.mines > free_cells {
            log::warn!(
                "Minefield cannot fit {} mines, only {} free cells",
                config.mines,
                free_cells
            );
            free_cells
        } else {
            config.mines
        };

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut draws: u32 = 0;
        while layout.mine_count() < mines {
            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            draws += 1;
            if coords != self.exclude {
                layout.insert(coords);
            }
        }

        log::debug!(
            "Placed {} mines on {}x{} avoiding {:?} after {} draws",
            mines,
            rows,
            cols,
            self.exclude,
            draws
        );
        layout
    }
}
