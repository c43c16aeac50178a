use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use crate::games::{GameBroadcaster, SessionRng};
use crate::identifiers::GameId;
use crate::log;
use crate::protocol::GameStatus;
use crate::reporting::ScoreReporter;
use super::game_state::{SnakeGameState, TickOutcome};
use super::input::{InputAction, InputMapper};
use super::types::DeathReason;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Input(InputAction),
    ToggleMode,
    /// Ends the session; reports it finished if it was still running.
    Stop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOverSummary {
    pub game_id: GameId,
    pub score: u32,
    /// `None` when the player stopped the game before it ended.
    pub reason: Option<DeathReason>,
}

pub struct SnakeSession;

impl SnakeSession {
    /// Drives one game until [`SessionCommand::Stop`] arrives or the command
    /// channel closes. The game keeps accepting commands after game over so
    /// the final board stays on screen.
    pub async fn run(
        game_id: GameId,
        mut game_state: SnakeGameState,
        mut rng: SessionRng,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
        broadcaster: impl GameBroadcaster,
        reporter: ScoreReporter,
    ) -> GameOverSummary {
        let mut tick_timer = new_tick_timer(game_state.tick_interval());
        let mut finished_reported = false;

        log!("[game:{}] started in {} mode", game_id, game_state.mode());
        broadcaster.broadcast_state(game_state.snapshot()).await;

        loop {
            let running = game_state.is_playing() && !game_state.is_game_over();

            tokio::select! {
                _ = tick_timer.tick(), if running => {
                    match game_state.step(&mut rng) {
                        TickOutcome::Idle | TickOutcome::Moved => {}
                        TickOutcome::Ate { score, speed_changed } => {
                            reporter.report_score(game_id, score);
                            if speed_changed {
                                tick_timer = new_tick_timer(game_state.tick_interval());
                                log!("[game:{}] speed up to {:?}", game_id, game_state.tick_interval());
                            }
                        }
                        TickOutcome::GameOver(reason) => {
                            log!("[game:{}] over with {} points: snake {}", game_id, game_state.score(), reason);
                            reporter.report_status(game_id, GameStatus::Finished);
                            finished_reported = true;
                            broadcaster.broadcast_state(game_state.snapshot()).await;
                            broadcaster.broadcast_game_over(GameOverSummary {
                                game_id,
                                score: game_state.score(),
                                reason: Some(reason),
                            }).await;
                            continue;
                        }
                    }
                    broadcaster.broadcast_state(game_state.snapshot()).await;
                }
                command = commands.recv() => {
                    match command {
                        Some(SessionCommand::Input(action)) => {
                            let was_running = running;
                            if !InputMapper::apply(action, &mut game_state) {
                                continue;
                            }
                            if !was_running && game_state.is_playing() {
                                tick_timer.reset();
                            }
                        }
                        Some(SessionCommand::ToggleMode) => game_state.toggle_mode(),
                        Some(SessionCommand::Stop) | None => break,
                    }
                    broadcaster.broadcast_state(game_state.snapshot()).await;
                }
            }
        }

        if !finished_reported {
            reporter.report_status(game_id, GameStatus::Finished);
        }
        log!("[game:{}] session closed", game_id);

        GameOverSummary {
            game_id,
            score: game_state.score(),
            reason: game_state.death_reason(),
        }
    }
}

/// First tick fires one full period from now.
fn new_tick_timer(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::snake::{Direction, GameMode, GameSnapshot, Point, Snake, SnakeSettings};
    use crate::protocol::GameStatus;
    use crate::reporting::{ReportEvent, ReportReceiver};

    #[derive(Debug)]
    enum Published {
        State(GameSnapshot),
        GameOver(GameOverSummary),
    }

    #[derive(Clone)]
    struct ChannelBroadcaster {
        tx: mpsc::UnboundedSender<Published>,
    }

    impl GameBroadcaster for ChannelBroadcaster {
        async fn broadcast_state(&self, snapshot: GameSnapshot) {
            let _ = self.tx.send(Published::State(snapshot));
        }

        async fn broadcast_game_over(&self, summary: GameOverSummary) {
            let _ = self.tx.send(Published::GameOver(summary));
        }
    }

    struct Harness {
        commands: mpsc::UnboundedSender<SessionCommand>,
        published: mpsc::UnboundedReceiver<Published>,
        reports: ReportReceiver,
        handle: tokio::task::JoinHandle<GameOverSummary>,
    }

    fn start(segments: &[(i32, i32)], direction: Direction, mode: GameMode, food: Point) -> Harness {
        crate::logger::init_logger(None);
        let snake = Snake::from_segments(segments.iter().map(|&(x, y)| Point::new(x, y)));
        let state = SnakeGameState::from_parts(SnakeSettings::default(), mode, snake, direction, food);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (published_tx, published_rx) = mpsc::unbounded_channel();
        let (reporter, reports) = ScoreReporter::channel();

        let handle = tokio::spawn(SnakeSession::run(
            GameId::new(1),
            state,
            SessionRng::new(42),
            command_rx,
            ChannelBroadcaster { tx: published_tx },
            reporter,
        ));

        Harness { commands: command_tx, published: published_rx, reports, handle }
    }

    async fn next_state(harness: &mut Harness) -> GameSnapshot {
        match harness.published.recv().await {
            Some(Published::State(snapshot)) => snapshot,
            other => panic!("expected state, got {:?}", other),
        }
    }

    fn drain_reports(reports: &mut ReportReceiver) -> Vec<ReportEvent> {
        let mut events = vec![];
        while let Some(event) = reports.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_move_the_snake() {
        let mut harness = start(&[(10, 10)], Direction::Right, GameMode::WrapAround, Point::new(0, 0));

        let initial = next_state(&mut harness).await;
        assert_eq!(initial.snake, vec![Point::new(10, 10)]);

        let after_tick = next_state(&mut harness).await;
        assert_eq!(after_tick.snake, vec![Point::new(11, 10)]);
        assert_eq!(after_tick.tick, 1);

        harness.commands.send(SessionCommand::Stop).unwrap();
        let summary = harness.handle.await.unwrap();
        assert_eq!(summary.reason, None);
        assert_eq!(
            drain_reports(&mut harness.reports),
            vec![ReportEvent::Status { game_id: GameId::new(1), status: GameStatus::Finished }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_over_reported_once() {
        let mut harness = start(&[(19, 10)], Direction::Right, GameMode::Walls, Point::new(0, 0));
        next_state(&mut harness).await;

        let last = next_state(&mut harness).await;
        assert!(last.is_game_over);
        match harness.published.recv().await {
            Some(Published::GameOver(summary)) => {
                assert_eq!(summary.reason, Some(DeathReason::WallCollision));
            }
            other => panic!("expected game over, got {:?}", other),
        }

        harness.commands.send(SessionCommand::ToggleMode).unwrap();
        let toggled = next_state(&mut harness).await;
        assert_eq!(toggled.mode, GameMode::WrapAround);
        assert!(toggled.is_game_over);

        harness.commands.send(SessionCommand::Stop).unwrap();
        let summary = harness.handle.await.unwrap();
        assert_eq!(summary.reason, Some(DeathReason::WallCollision));
        assert_eq!(
            drain_reports(&mut harness.reports),
            vec![ReportEvent::Status { game_id: GameId::new(1), status: GameStatus::Finished }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_eating_reports_score() {
        let mut harness = start(&[(10, 10)], Direction::Right, GameMode::WrapAround, Point::new(11, 10));
        next_state(&mut harness).await;

        let after = next_state(&mut harness).await;
        assert_eq!(after.score, 10);
        assert_eq!(after.snake.len(), 2);

        harness.commands.send(SessionCommand::Stop).unwrap();
        harness.handle.await.unwrap();
        assert_eq!(
            drain_reports(&mut harness.reports),
            vec![
                ReportEvent::Score { game_id: GameId::new(1), score: 10 },
                ReportEvent::Status { game_id: GameId::new(1), status: GameStatus::Finished },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_ticks() {
        let mut harness = start(&[(10, 10)], Direction::Right, GameMode::WrapAround, Point::new(0, 0));
        next_state(&mut harness).await;

        harness.commands.send(SessionCommand::Input(InputAction::TogglePause)).unwrap();
        let paused = next_state(&mut harness).await;
        assert!(!paused.is_playing);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(harness.published.try_recv().is_err());

        harness.commands.send(SessionCommand::Input(InputAction::TogglePause)).unwrap();
        let resumed = next_state(&mut harness).await;
        assert!(resumed.is_playing);
        assert_eq!(resumed.snake, paused.snake);

        let moved = next_state(&mut harness).await;
        assert_eq!(moved.snake, vec![Point::new(11, 10)]);

        drop(harness.commands);
        harness.handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_applies_on_next_tick() {
        let mut harness = start(&[(10, 10)], Direction::Right, GameMode::WrapAround, Point::new(0, 0));
        next_state(&mut harness).await;

        harness.commands.send(SessionCommand::Input(InputAction::Turn(Direction::Down))).unwrap();
        let buffered = next_state(&mut harness).await;
        assert_eq!(buffered.direction, Direction::Right);

        let moved = next_state(&mut harness).await;
        assert_eq!(moved.snake, vec![Point::new(10, 11)]);
        assert_eq!(moved.direction, Direction::Down);

        harness.commands.send(SessionCommand::Stop).unwrap();
        harness.handle.await.unwrap();
    }
}
