use common::games::GameBroadcaster;
use common::games::snake::{GameOverSummary, GameSnapshot};
use common::GameId;

use crate::state::SharedState;

/// Publishes a running game into the UI state. Updates from a game that is
/// no longer the current one are dropped.
#[derive(Clone)]
pub struct SharedStateBroadcaster {
    shared_state: SharedState,
    game_id: GameId,
}

impl SharedStateBroadcaster {
    pub fn new(shared_state: SharedState, game_id: GameId) -> Self {
        Self { shared_state, game_id }
    }
}

impl GameBroadcaster for SharedStateBroadcaster {
    async fn broadcast_state(&self, snapshot: GameSnapshot) {
        self.shared_state.update(|state| {
            if state.game.game_id == Some(self.game_id) {
                state.game.snapshot = Some(snapshot);
            }
        });
    }

    async fn broadcast_game_over(&self, summary: GameOverSummary) {
        self.shared_state.update(|state| {
            if state.game.game_id == Some(self.game_id) {
                state.game.game_over = Some(summary);
            }
        });
    }
}
