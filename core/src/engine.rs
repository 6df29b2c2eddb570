use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// No more moves are accepted.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game from reset to win or loss.
///
/// Mines are not placed until the first reveal, which is always safe. Out-of-bounds coordinates
/// and moves after the game finished are ignored and reported as `NoChange`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    status: GameStatus,
    mines_remaining: i32,
    mines_placed: bool,
    seed: u64,
    move_count: u32,
    triggered_mine: Option<Coord2>,
}

impl GameState {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let config = Self::playable(config);
        log::debug!(
            "New {}x{} game with {} mines, seed {}",
            config.rows(),
            config.cols(),
            config.mines,
            seed
        );
        Self {
            config,
            board: Board::blank(config.size),
            status: GameStatus::Playing,
            mines_remaining: config.mines.into(),
            mines_placed: false,
            seed,
            move_count: 0,
            triggered_mine: None,
        }
    }

    /// Starts a game on a layout decided in advance, so the first reveal may hit a mine.
    ///
    /// The layout must leave at least one safe cell.
    pub fn from_layout(layout: MineLayout) -> Result<Self> {
        if layout.mine_count() >= layout.total_cells() {
            return Err(GameError::TooManyMines);
        }
        let mut state = Self::new(layout.game_config(), 0);
        state.board.place_mines(&layout)?;
        state.mines_placed = true;
        Ok(state)
    }

    /// Throws the current game away and starts a fresh one with a seed derived from the last.
    pub fn reset(&mut self, config: GameConfig) {
        let seed = Self::next_seed(self.seed);
        self.reset_with_seed(config, seed);
    }

    pub fn reset_with_seed(&mut self, config: GameConfig, seed: u64) {
        *self = Self::new(config, seed);
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.board.cell(coords)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Mines minus flags placed, negative when the player over-flags.
    pub fn mines_remaining(&self) -> i32 {
        self.mines_remaining
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Reveals that changed the board.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Uncovers `coords`, placing the mines first if this is the opening reveal.
    ///
    /// A flagged cell is left alone even on the opening reveal, so mine placement stays deferred.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        if !self.status.is_playing() {
            log::debug!("Game already ended, ignoring reveal at {:?}", coords);
            return RevealOutcome::NoChange;
        }

        let Some(cell) = self.board.cell(coords) else {
            log::debug!("Reveal out of bounds at {:?}", coords);
            return RevealOutcome::NoChange;
        };
        if cell.is_flagged() || cell.is_revealed() {
            return RevealOutcome::NoChange;
        }

        if !self.mines_placed {
            self.place_mines(coords);
        }
        self.move_count += 1;

        if self.board[coords].is_mine() {
            self.board.reveal_all_mines();
            self.triggered_mine = Some(coords);
            self.status = GameStatus::Lost;
            log::debug!("Hit mine at {:?} after {} moves", coords, self.move_count);
            return RevealOutcome::HitMine;
        }

        let revealed = self.board.reveal(coords);
        log::debug!("Revealed {} cells from {:?}", revealed, coords);

        if self.board.revealed_count() == self.config.safe_cell_count() {
            self.status = GameStatus::Won;
            log::debug!("Won after {} moves", self.move_count);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        if self.status.is_finished() {
            log::debug!("Game already ended, ignoring flag at {:?}", coords);
            return MarkOutcome::NoChange;
        }

        match self.board.toggle_flag(coords) {
            Some(true) => {
                self.mines_remaining -= 1;
                MarkOutcome::Flagged
            }
            Some(false) => {
                self.mines_remaining += 1;
                MarkOutcome::Unflagged
            }
            None => MarkOutcome::NoChange,
        }
    }

    fn place_mines(&mut self, exclude: Coord2) {
        match self
            .board
            .place_random_mines(exclude, self.config.mines, self.seed)
        {
            Ok(layout) => log::debug!(
                "{} mines placed, first reveal at {:?}",
                layout.mine_count(),
                exclude
            ),
            Err(err) => log::error!("Could not place mines: {}", err),
        }
        self.mines_placed = true;
    }

    /// Keeps at least one safe cell so mine placement terminates.
    fn playable(config: GameConfig) -> GameConfig {
        let max_mines = config.total_cells().saturating_sub(1);
        if config.mines > max_mines {
            log::warn!(
                "{} mines do not fit a {}x{} board, using {}",
                config.mines,
                config.rows(),
                config.cols(),
                max_mines
            );
            GameConfig::new_unchecked(config.size, max_mines)
        } else {
            config
        }
    }

    fn next_seed(seed: u64) -> u64 {
        use rand::prelude::*;

        SmallRng::seed_from_u64(seed).random()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(size: Coord2, mines: &[Coord2]) -> MineLayout {
        MineLayout::from_mine_coords(size, mines).unwrap()
    }

    #[test]
    fn new_game_starts_blank() {
        let state = GameState::new(GameConfig::INTERMEDIATE, 3);

        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.mines_remaining(), 40);
        assert!(!state.mines_placed());
        assert_eq!(state.move_count(), 0);
        assert_eq!(state.board().mine_count(), 0);
        assert_eq!(state.board(), &Board::blank((16, 16)));
    }

    #[test]
    fn first_reveal_is_safe_on_small_board() {
        let config = GameConfig::new_unchecked((5, 5), 1);
        for seed in 0..100 {
            let mut state = GameState::new(config, seed);

            let outcome = state.reveal((2, 2));

            assert!(state.mines_placed());
            assert!(!state.cell_at((2, 2)).unwrap().is_mine());
            assert_eq!(state.board().mine_count(), 1);
            assert_ne!(outcome, RevealOutcome::HitMine);
            assert!(!state.is_finished() || outcome == RevealOutcome::Won);
        }
    }

    #[test]
    fn beginner_first_reveal_commits_layout() {
        for seed in 0..50 {
            let mut state = GameState::new(GameConfig::BEGINNER, seed);

            let outcome = state.reveal((0, 0));

            assert!(state.mines_placed());
            assert_eq!(state.board().mine_count(), 10);
            assert!(!state.board()[(0, 0)].is_mine());
            if state.board().revealed_count() == 71 {
                assert_eq!(outcome, RevealOutcome::Won);
                assert_eq!(state.status(), GameStatus::Won);
            } else {
                assert_eq!(outcome, RevealOutcome::Revealed);
                assert_eq!(state.status(), GameStatus::Playing);
            }

            // the layout is committed once
            let mines = state.board().clone();
            let next = state
                .board()
                .iter()
                .find(|(_, cell)| !cell.is_revealed() && !cell.is_mine())
                .map(|(coords, _)| coords);
            if let Some(next) = next {
                state.reveal(next);
                for (coords, cell) in state.board().iter() {
                    assert_eq!(cell.is_mine(), mines[coords].is_mine());
                }
            }
        }
    }

    #[test]
    fn hitting_a_mine_reveals_all_mines() {
        let mines = [(0, 0), (1, 2), (2, 0)];
        let mut state = GameState::from_layout(layout((3, 3), &mines)).unwrap();
        state.toggle_flag((2, 0));

        let outcome = state.reveal((1, 2));

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(state.status(), GameStatus::Lost);
        assert_eq!(state.triggered_mine(), Some((1, 2)));
        for coords in mines {
            assert!(state.board()[coords].is_revealed());
        }
        assert_eq!(state.board().revealed_count(), 3);
    }

    #[test]
    fn from_layout_rejects_layout_without_safe_cell() {
        assert_eq!(
            GameState::from_layout(layout((1, 2), &[(0, 0), (0, 1)])),
            Err(GameError::TooManyMines)
        );
        assert_eq!(
            GameState::from_layout(MineLayout::empty((0, 0))),
            Err(GameError::TooManyMines)
        );

        let mut state = GameState::from_layout(layout((1, 3), &[(0, 0), (0, 1)])).unwrap();
        assert_eq!(state.config().mines, 2);
        assert_eq!(state.board().mine_count(), 2);
        assert_eq!(state.mines_remaining(), 2);
        assert_eq!(state.reveal((0, 2)), RevealOutcome::Won);
    }

    #[test]
    fn finished_game_ignores_moves() {
        let mut state = GameState::from_layout(layout((2, 2), &[(0, 0)])).unwrap();
        state.reveal((0, 0));
        let before = state.clone();

        assert_eq!(state.reveal((1, 1)), RevealOutcome::NoChange);
        assert_eq!(state.toggle_flag((0, 1)), MarkOutcome::NoChange);
        assert_eq!(state, before);
    }

    #[test]
    fn wins_exactly_when_last_safe_cell_is_revealed() {
        // every safe cell touches the mine, so nothing flood-fills
        let mut state = GameState::from_layout(layout((2, 3), &[(0, 1)])).unwrap();
        let safe = [(0, 0), (0, 2), (1, 0), (1, 1), (1, 2)];

        for (i, &coords) in safe.iter().enumerate() {
            let outcome = state.reveal(coords);
            if i + 1 < safe.len() {
                assert_eq!(outcome, RevealOutcome::Revealed);
                assert_eq!(state.status(), GameStatus::Playing);
            } else {
                assert_eq!(outcome, RevealOutcome::Won);
                assert_eq!(state.status(), GameStatus::Won);
            }
        }
        assert_eq!(state.move_count(), 5);
    }

    #[test]
    fn won_iff_every_safe_cell_revealed() {
        let config = GameConfig::new_unchecked((8, 10), 15);
        for seed in 0..25 {
            let mut state = GameState::new(config, seed);
            state.reveal((4, 5));

            while !state.is_finished() {
                assert_ne!(
                    state.board().revealed_count(),
                    config.safe_cell_count(),
                    "seed {seed}"
                );
                let next = state
                    .board()
                    .iter()
                    .find(|(_, cell)| !cell.is_revealed() && !cell.is_mine())
                    .map(|(coords, _)| coords)
                    .unwrap();
                state.reveal(next);
            }

            assert_eq!(state.status(), GameStatus::Won);
            assert_eq!(state.board().revealed_count(), config.safe_cell_count());
            assert!(
                state
                    .board()
                    .iter()
                    .all(|(_, cell)| cell.is_mine() != cell.is_revealed())
            );
        }
    }

    #[test]
    fn flagged_cell_cannot_be_revealed() {
        let mut state = GameState::from_layout(layout((3, 3), &[(2, 2)])).unwrap();
        state.toggle_flag((0, 0));
        let before = state.clone();

        assert_eq!(state.reveal((0, 0)), RevealOutcome::NoChange);
        assert_eq!(state, before);

        state.toggle_flag((0, 0));
        assert_eq!(state.reveal((0, 0)), RevealOutcome::Won);
    }

    #[test]
    fn flag_on_first_click_does_not_place_mines() {
        let mut state = GameState::new(GameConfig::BEGINNER, 9);
        state.toggle_flag((4, 4));

        assert_eq!(state.reveal((4, 4)), RevealOutcome::NoChange);
        assert!(!state.mines_placed());
        assert_eq!(state.move_count(), 0);
    }

    #[test]
    fn revealing_twice_is_a_no_op() {
        let mut state = GameState::from_layout(layout((3, 3), &[(0, 0)])).unwrap();
        state.reveal((1, 1));
        let before = state.clone();

        assert_eq!(state.reveal((1, 1)), RevealOutcome::NoChange);
        assert_eq!(state.reveal((9, 9)), RevealOutcome::NoChange);
        assert_eq!(state, before);
    }

    #[test]
    fn toggle_flag_twice_restores_state() {
        let mut state = GameState::new(GameConfig::BEGINNER, 1);

        assert_eq!(state.toggle_flag((3, 3)), MarkOutcome::Flagged);
        assert_eq!(state.mines_remaining(), 9);
        assert!(state.cell_at((3, 3)).unwrap().is_flagged());

        assert_eq!(state.toggle_flag((3, 3)), MarkOutcome::Unflagged);
        assert_eq!(state.mines_remaining(), 10);
        assert!(!state.cell_at((3, 3)).unwrap().is_flagged());
    }

    #[test]
    fn flag_on_revealed_cell_is_rejected() {
        let mut state = GameState::from_layout(layout((3, 3), &[(0, 0)])).unwrap();
        state.reveal((1, 1));

        assert_eq!(state.toggle_flag((1, 1)), MarkOutcome::NoChange);
        assert_eq!(state.mines_remaining(), 1);
        assert!(!state.cell_at((1, 1)).unwrap().is_flagged());
        assert_eq!(state.toggle_flag((3, 0)), MarkOutcome::NoChange);
    }

    #[test]
    fn mines_remaining_can_go_negative() {
        let mut state = GameState::from_layout(layout((3, 3), &[(0, 0)])).unwrap();
        for coords in [(0, 1), (0, 2), (1, 0)] {
            state.toggle_flag(coords);
        }

        assert_eq!(state.mines_remaining(), -2);
        assert_eq!(state.board().flagged_count(), 3);
    }

    #[test]
    fn reset_discards_the_game() {
        let mut state = GameState::new(GameConfig::BEGINNER, 11);
        state.toggle_flag((0, 0));
        state.reveal((5, 5));

        state.reset(GameConfig::EXPERT);

        assert_eq!(state.config(), GameConfig::EXPERT);
        assert_eq!(state.size(), (16, 30));
        assert_eq!(state.mines_remaining(), 99);
        assert!(!state.mines_placed());
        assert_eq!(state.move_count(), 0);
        assert_eq!(state.board().revealed_count(), 0);
        assert_eq!(state.board().flagged_count(), 0);
        assert_ne!(state.seed(), 11);
    }

    #[test]
    fn same_seed_replays_the_same_game() {
        let mut a = GameState::new(GameConfig::EXPERT, 1234);
        let mut b = a.clone();
        b.reset_with_seed(GameConfig::EXPERT, 1234);

        a.reveal((8, 15));
        b.reveal((8, 15));
        assert_eq!(a, b);
    }

    #[test]
    fn overfull_config_keeps_one_safe_cell() {
        let mut state = GameState::new(GameConfig::new_unchecked((2, 2), 10), 5);

        assert_eq!(state.config().mines, 3);
        assert_eq!(state.reveal((0, 1)), RevealOutcome::Won);
    }

    #[test]
    fn state_snapshot_survives_json() {
        let mut state = GameState::new(GameConfig::BEGINNER, 77);
        state.reveal((4, 4));
        state.toggle_flag((0, 8));

        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, state);
    }
}
