use std::fmt::Display;
use std::future::Future;
use tokio::sync::{mpsc, oneshot};

use crate::games::snake::GameMode;
use crate::identifiers::{GameId, UserId};
use crate::log;
use crate::protocol::GameStatus;

pub trait ServiceError: Display + Send {
    /// The service refused the caller's credentials.
    fn is_unauthorized(&self) -> bool;
}

/// The part of the recording service a running game talks to.
pub trait ScoreService: Send + Sync + Clone + 'static {
    type Error: ServiceError;

    fn start_session(
        &self,
        user_id: UserId,
        mode: GameMode,
    ) -> impl Future<Output = Result<GameId, Self::Error>> + Send;

    fn update_score(
        &self,
        game_id: GameId,
        score: u32,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn update_status(
        &self,
        game_id: GameId,
        status: GameStatus,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportEvent {
    Score { game_id: GameId, score: u32 },
    Status { game_id: GameId, status: GameStatus },
}

#[derive(Debug)]
enum Queued {
    Event(ReportEvent),
    Flush(oneshot::Sender<()>),
}

/// Sending half of the outbound report queue. Never blocks the caller.
#[derive(Clone, Debug)]
pub struct ScoreReporter {
    tx: mpsc::UnboundedSender<Queued>,
}

#[derive(Debug)]
pub struct ReportReceiver {
    rx: mpsc::UnboundedReceiver<Queued>,
}

impl ReportReceiver {
    /// Next queued event, skipping flush markers. Used by tests that
    /// inspect the queue without a running report task.
    pub fn try_recv(&mut self) -> Option<ReportEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(Queued::Event(event)) => return Some(event),
                Ok(Queued::Flush(ack)) => {
                    let _ = ack.send(());
                }
                Err(_) => return None,
            }
        }
    }
}

impl ScoreReporter {
    pub fn channel() -> (Self, ReportReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, ReportReceiver { rx })
    }

    /// Resolves once everything queued before this call has been handed to
    /// the service, or right away if the report task is gone.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Queued::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    pub fn report_score(&self, game_id: GameId, score: u32) {
        self.send(ReportEvent::Score { game_id, score });
    }

    pub fn report_status(&self, game_id: GameId, status: GameStatus) {
        self.send(ReportEvent::Status { game_id, status });
    }

    fn send(&self, event: ReportEvent) {
        if self.tx.send(Queued::Event(event)).is_err() {
            log!("Report queue closed, dropping {:?}", event);
        }
    }
}

/// Drains the report queue in order until every [`ScoreReporter`] is gone.
/// Failed deliveries are logged and dropped; those the service refused for
/// bad credentials are also passed to `rejected`.
pub async fn run_report_task<S: ScoreService>(
    mut receiver: ReportReceiver,
    service: S,
    rejected: mpsc::UnboundedSender<ReportEvent>,
) {
    while let Some(queued) = receiver.rx.recv().await {
        let event = match queued {
            Queued::Event(event) => event,
            Queued::Flush(ack) => {
                let _ = ack.send(());
                continue;
            }
        };
        let result = match event {
            ReportEvent::Score { game_id, score } => service.update_score(game_id, score).await,
            ReportEvent::Status { game_id, status } => service.update_status(game_id, status).await,
        };

        if let Err(e) = result {
            log!("Failed to deliver {:?}: {}", event, e);
            if e.is_unauthorized() {
                let _ = rejected.send(event);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum RecordingError {
        Unavailable,
        Unauthorized,
    }

    impl std::fmt::Display for RecordingError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                RecordingError::Unavailable => write!(f, "service unavailable"),
                RecordingError::Unauthorized => write!(f, "unauthorized"),
            }
        }
    }

    impl ServiceError for RecordingError {
        fn is_unauthorized(&self) -> bool {
            *self == RecordingError::Unauthorized
        }
    }

    /// In-memory [`ScoreService`] that records every call.
    #[derive(Clone, Default)]
    pub struct RecordingService {
        pub calls: Arc<Mutex<Vec<ReportEvent>>>,
        pub started: Arc<Mutex<Vec<(UserId, GameMode)>>>,
        pub fail: Option<RecordingError>,
    }

    impl RecordingService {
        pub fn failing(error: RecordingError) -> Self {
            Self { fail: Some(error), ..Self::default() }
        }

        fn outcome(&self) -> Result<(), RecordingError> {
            match self.fail {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }

        pub fn events(&self) -> Vec<ReportEvent> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ScoreService for RecordingService {
        type Error = RecordingError;

        async fn start_session(&self, user_id: UserId, mode: GameMode) -> Result<GameId, RecordingError> {
            let mut started = self.started.lock().unwrap();
            started.push((user_id, mode));
            Ok(GameId::new(started.len() as u64))
        }

        async fn update_score(&self, game_id: GameId, score: u32) -> Result<(), RecordingError> {
            self.calls.lock().unwrap().push(ReportEvent::Score { game_id, score });
            self.outcome()
        }

        async fn update_status(&self, game_id: GameId, status: GameStatus) -> Result<(), RecordingError> {
            self.calls.lock().unwrap().push(ReportEvent::Status { game_id, status });
            self.outcome()
        }
    }
}
