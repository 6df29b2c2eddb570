use std::io::Write;

use sapper_core::{GameState, GameStatus};
use serde_json::{Value, json};

/// What the player is allowed to see, mines stay hidden until revealed.
pub fn to_json(state: &GameState) -> Value {
    let board = state.board().to_string();
    json!({
        "size": state.size(),
        "status": status_name(state.status()),
        "mines_remaining": state.mines_remaining(),
        "moves": state.move_count(),
        "board": board.lines().collect::<Vec<_>>(),
    })
}

pub fn write_text(out: &mut impl Write, state: &GameState) -> std::io::Result<()> {
    writeln!(out, "{}", state.board())?;
    writeln!(
        out,
        "status: {}  mines left: {}  moves: {}",
        status_name(state.status()),
        state.mines_remaining(),
        state.move_count()
    )
}

fn status_name(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Playing => "playing",
        GameStatus::Won => "won",
        GameStatus::Lost => "lost",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapper_core::MineLayout;

    fn state() -> GameState {
        let layout = MineLayout::from_mine_coords((2, 3), &[(0, 2)]).unwrap();
        let mut state = GameState::from_layout(layout).unwrap();
        state.toggle_flag((0, 2));
        state.reveal((1, 0));
        state.reveal((1, 2));
        state
    }

    #[test]
    fn json_hides_unrevealed_mines() {
        let value = to_json(&state());

        assert_eq!(value["size"], json!([2, 3]));
        assert_eq!(value["status"], "won");
        assert_eq!(value["mines_remaining"], 0);
        assert_eq!(value["moves"], 2);
        assert_eq!(value["board"], json!([".1F", ".11"]));
    }

    #[test]
    fn text_has_grid_and_status_line() {
        let mut out = Vec::new();
        write_text(&mut out, &state()).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            ".1F\n.11\nstatus: won  mines left: 0  moves: 2\n"
        );
    }
}
