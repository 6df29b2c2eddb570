use crate::*;
pub use random::*;

mod random;

pub trait MineGenerator {
    fn generate(self, config: GameConfig) -> MineLayout;
}

/// Hands back a layout decided in advance, used for replays and tests.
impl MineGenerator for MineLayout {
    fn generate(self, config: GameConfig) -> MineLayout {
        if self.game_config() != config {
            log::warn!(
                "Fixed layout {:?} does not match requested config {:?}",
                self.game_config(),
                config
            );
        }
        self
    }
}
