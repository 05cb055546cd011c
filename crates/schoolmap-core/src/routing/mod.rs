// ── Routing session manager ──
//
// Owns the lifecycle of the single route request in flight against a
// directions engine. Opening a session tears down the previous one, and
// an outcome is only delivered while its session is still current.

mod engine;
pub(crate) mod osrm;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{Coordinate, Itinerary};

pub use engine::DirectionsEngine;

/// Result delivered to the `open_route` callback.
pub type RouteOutcome = Result<Itinerary, CoreError>;

/// Identifies one routing session. Tokens increase monotonically per
/// manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken(u64);

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct ActiveSession {
    token: SessionToken,
    cancel: CancellationToken,
}

#[derive(Default)]
struct SessionState {
    last_token: u64,
    active: Option<ActiveSession>,
}

/// Manages at most one open routing session.
pub struct RoutingSessionManager {
    engine: Arc<dyn DirectionsEngine>,
    state: Arc<Mutex<SessionState>>,
}

fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RoutingSessionManager {
    pub fn new(engine: Arc<dyn DirectionsEngine>) -> Self {
        Self {
            engine,
            state: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    /// Open a session routing `origin` → `destination`, superseding any
    /// open session.
    ///
    /// `on_outcome` runs at most once, on a runtime worker, while the
    /// manager's lock is held: it must not call back into this manager.
    /// It is skipped entirely if the session is closed or superseded
    /// before the engine answers.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open_route<F>(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        on_outcome: F,
    ) -> SessionToken
    where
        F: FnOnce(RouteOutcome) + Send + 'static,
    {
        let mut state = lock(&self.state);
        if let Some(prev) = state.active.take() {
            debug!(token = %prev.token, "superseding routing session");
            prev.cancel.cancel();
        }

        state.last_token += 1;
        let token = SessionToken(state.last_token);
        let cancel = CancellationToken::new();
        state.active = Some(ActiveSession {
            token,
            cancel: cancel.clone(),
        });
        drop(state);

        debug!(%token, %origin, %destination, "routing session opened");
        let engine = Arc::clone(&self.engine);
        let shared = Arc::clone(&self.state);
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!(%token, "routing session cancelled before completion");
                    return;
                }
                result = engine.routes(origin, destination) => result,
            };

            let outcome = match result {
                Ok(alternatives) => alternatives.into_iter().next().ok_or(CoreError::RouteNotFound),
                Err(e) => Err(e),
            };

            let state = lock(&shared);
            let current = state.active.as_ref().map(|a| a.token);
            if current != Some(token) {
                debug!(%token, ?current, "dropping stale routing outcome");
                return;
            }
            match outcome {
                Ok(ref itinerary) => {
                    debug!(%token, summary = %itinerary.summary, "route found");
                }
                Err(ref e) => warn!(%token, error = %e, "route request failed"),
            }
            on_outcome(outcome);
            drop(state);
        });

        token
    }

    /// Close the open session, if any. Safe to call repeatedly.
    pub fn close_route(&self) {
        if let Some(prev) = lock(&self.state).active.take() {
            debug!(token = %prev.token, "routing session closed");
            prev.cancel.cancel();
        }
    }

    /// Token of the open session.
    pub fn current_token(&self) -> Option<SessionToken> {
        lock(&self.state).active.as_ref().map(|a| a.token)
    }

    pub fn is_idle(&self) -> bool {
        lock(&self.state).active.is_none()
    }
}

impl Drop for RoutingSessionManager {
    fn drop(&mut self) {
        self.close_route();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{Mutex as AsyncMutex, mpsc, oneshot};

    type Reply = Result<Vec<Itinerary>, CoreError>;
    type Gate = oneshot::Sender<Reply>;

    /// Engine whose calls block until the test releases them in any order.
    struct GatedEngine {
        gates: AsyncMutex<mpsc::UnboundedReceiver<oneshot::Receiver<Reply>>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DirectionsEngine for GatedEngine {
        async fn routes(
            &self,
            _origin: Coordinate,
            _destination: Coordinate,
        ) -> Reply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gates.lock().await.recv().await.unwrap();
            gate.await.unwrap_or(Err(CoreError::Internal("gate dropped".into())))
        }
    }

    fn gated() -> (Arc<GatedEngine>, impl FnMut() -> Gate) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Arc::new(GatedEngine {
            gates: AsyncMutex::new(rx),
            calls: AtomicUsize::new(0),
        });
        let next_gate = move || {
            let (gate_tx, gate_rx) = oneshot::channel();
            tx.send(gate_rx).unwrap();
            gate_tx
        };
        (engine, next_gate)
    }

    fn point(lat: f64) -> Coordinate {
        Coordinate { lat, lng: 98.67 }
    }

    fn route(distance: f64) -> Itinerary {
        Itinerary::new(distance, 60.0, Vec::new())
    }

    fn recorder() -> (
        mpsc::UnboundedSender<(u8, RouteOutcome)>,
        mpsc::UnboundedReceiver<(u8, RouteOutcome)>,
    ) {
        mpsc::unbounded_channel()
    }

    #[tokio::test]
    async fn delivers_first_alternative() {
        let (engine, mut next_gate) = gated();
        let gate = next_gate();
        let manager = RoutingSessionManager::new(engine);
        let (tx, mut rx) = recorder();

        let token = manager.open_route(point(3.5), point(3.6), move |o| {
            tx.send((1, o)).unwrap();
        });
        assert_eq!(manager.current_token(), Some(token));

        gate.send(Ok(vec![route(1000.0), route(2000.0)])).unwrap();
        let (_, outcome) = rx.recv().await.unwrap();
        assert!((outcome.unwrap().distance - 1000.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn superseded_session_never_delivers() {
        let (engine, mut next_gate) = gated();
        let first_gate = next_gate();
        let second_gate = next_gate();
        let manager = RoutingSessionManager::new(Arc::clone(&engine) as Arc<dyn DirectionsEngine>);
        let (tx, mut rx) = recorder();

        let tx1 = tx.clone();
        let t1 = manager.open_route(point(3.5), point(3.6), move |o| {
            tx1.send((1, o)).unwrap();
        });
        while engine.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        let t2 = manager.open_route(point(3.5), point(3.7), move |o| {
            tx.send((2, o)).unwrap();
        });
        assert!(t2 > t1);

        // Resolve the first session after the second started.
        let _ = first_gate.send(Ok(vec![route(1.0)]));
        second_gate.send(Ok(vec![route(2.0)])).unwrap();

        let (which, outcome) = rx.recv().await.unwrap();
        assert_eq!(which, 2);
        assert!((outcome.unwrap().distance - 2.0).abs() < f64::EPSILON);
        // All senders are gone once both tasks finished; nothing else arrives.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn empty_alternatives_is_route_not_found() {
        let (engine, mut next_gate) = gated();
        let gate = next_gate();
        let manager = RoutingSessionManager::new(engine);
        let (tx, mut rx) = recorder();

        manager.open_route(point(3.5), point(3.6), move |o| {
            tx.send((1, o)).unwrap();
        });
        gate.send(Ok(Vec::new())).unwrap();

        let (_, outcome) = rx.recv().await.unwrap();
        assert!(matches!(outcome, Err(CoreError::RouteNotFound)));
    }

    #[tokio::test]
    async fn engine_failure_is_delivered() {
        let (engine, mut next_gate) = gated();
        let gate = next_gate();
        let manager = RoutingSessionManager::new(engine);
        let (tx, mut rx) = recorder();

        manager.open_route(point(3.5), point(3.6), move |o| {
            tx.send((1, o)).unwrap();
        });
        gate.send(Err(CoreError::RoutingEngine {
            message: "InvalidQuery".into(),
        }))
        .unwrap();

        let (_, outcome) = rx.recv().await.unwrap();
        assert!(matches!(outcome, Err(CoreError::RoutingEngine { .. })));
    }

    #[tokio::test]
    async fn close_route_is_idempotent_and_suppresses_delivery() {
        let (engine, mut next_gate) = gated();
        let gate = next_gate();
        let manager = RoutingSessionManager::new(engine);
        let (tx, mut rx) = recorder();

        // Closing while idle is fine.
        manager.close_route();
        assert!(manager.is_idle());

        manager.open_route(point(3.5), point(3.6), move |o| {
            tx.send((1, o)).unwrap();
        });
        assert!(!manager.is_idle());

        manager.close_route();
        manager.close_route();
        assert!(manager.is_idle());
        assert_eq!(manager.current_token(), None);

        let _ = gate.send(Ok(vec![route(1.0)]));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn tokens_increase_across_sessions() {
        let (engine, _next_gate) = gated();
        let manager = RoutingSessionManager::new(Arc::clone(&engine) as Arc<dyn DirectionsEngine>);
        let a = manager.open_route(point(3.5), point(3.6), |_| {});
        manager.close_route();
        let b = manager.open_route(point(3.5), point(3.6), |_| {});
        assert!(b > a);
        assert_eq!(b.to_string(), "#2");
    }
}
