use parking_lot::Mutex;
use std::sync::Arc;
use sweeper_core::{Action, ActionOutcome, GameError, GameSession};
use sweeper_protocol::Strategy;

use crate::{MoveError, MoveProvider, decode_move, encode_observation};

/// Session shared between the front-end and in-flight agent requests.
pub type SharedSession = Arc<Mutex<GameSession>>;

pub fn shared(session: GameSession) -> SharedSession {
    Arc::new(Mutex::new(session))
}

/// An agent move that made it onto the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppliedMove {
    pub action: Action,
    pub outcome: ActionOutcome,
    /// Game the move was computed for and applied to.
    pub generation: u64,
}

/// Drives a session with moves from a [`MoveProvider`], one request at a time.
///
/// The in-flight guard belongs to the client, not the session: share one `MoveClient` between every
/// task that asks for moves on the same [`SharedSession`], otherwise each client may have its own
/// request pending.
pub struct MoveClient<P> {
    provider: P,
    in_flight: tokio::sync::Mutex<()>,
}

impl<P: MoveProvider> MoveClient<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Sends the current masked board to `strategy` and applies its answer.
    ///
    /// The session lock is never held across the request. If the session was reset while the
    /// provider was thinking, the answer is dropped with [`MoveError::Stale`].
    pub async fn request_move(
        &self,
        session: &SharedSession,
        strategy: Strategy,
    ) -> Result<AppliedMove, MoveError> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            return Err(MoveError::Busy);
        };

        let (generation, size, observation) = {
            let session = session.lock();
            if session.phase().is_finished() {
                return Err(MoveError::Rejected(GameError::AlreadyEnded));
            }
            let observation = encode_observation(&session.observe()?);
            (session.generation(), session.size(), observation)
        };

        let response = self.provider.next_move(strategy, &observation).await?;
        let action = decode_move(&response, size).inspect_err(|err| log::warn!("{}", err))?;

        let outcome = session.lock().apply_for(generation, action);
        match outcome {
            Ok(outcome) => {
                log::debug!(
                    "Agent {} played {:?} at {:?}: {:?}",
                    strategy,
                    action.kind,
                    action.coords,
                    outcome
                );
                Ok(AppliedMove {
                    action,
                    outcome,
                    generation,
                })
            }
            Err(err) => {
                let err = MoveError::from(err);
                log::warn!("{}", err);
                Err(err)
            }
        }
    }

    /// Starts a training run and returns the provider's message verbatim.
    pub async fn train(&self) -> Result<String, MoveError> {
        let response = self.provider.train().await?;
        log::info!("Training finished: {}", response.message);
        Ok(response.message)
    }

    pub async fn ping(&self) -> Result<String, MoveError> {
        Ok(self.provider.ping().await?)
    }
}
