use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::core::{matcher::PairingEngine, pool::WaitingPool, registry::PairRegistry};
use crate::models::{
    CancelOutcome, ConnectedPair, EndOutcome, MatchOutcome, Payload, PreferenceProfile, RelayOutcome, RequesterId, ResetOutcome,
    SessionState,
};
use crate::services::{Envelope, Transport, TransportError};

/// A state change was committed but some notifications were not delivered
///
/// The committed outcome is preserved; matching state is never rolled back
/// because of a transport failure.
#[derive(Debug)]
pub struct DeliveryFailure<O> {
    pub outcome: O,
    pub failures: Vec<(RequesterId, TransportError)>,
}

impl<O: fmt::Debug> fmt::Display for DeliveryFailure<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} committed but {} notification(s) failed",
            self.outcome,
            self.failures.len()
        )
    }
}

impl<O: fmt::Debug> std::error::Error for DeliveryFailure<O> {}

/// Snapshot of pool and registry sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorStats {
    pub waiting: usize,
    pub pairs: usize,
}

type Notifications = Vec<(RequesterId, Envelope)>;

/// Pool, registry and per-identity state, guarded together
#[derive(Debug, Default)]
struct MatchState {
    pool: WaitingPool,
    registry: PairRegistry,
    sessions: HashMap<RequesterId, SessionState>,
}

impl MatchState {
    fn session(&self, id: &RequesterId) -> SessionState {
        self.sessions.get(id).cloned().unwrap_or(SessionState::Idle)
    }

    /// The only way session state changes
    fn transition(&mut self, id: &RequesterId, from: &SessionState, to: SessionState) {
        let current = self.session(id);
        assert_eq!(&current, from, "illegal transition for {}: {:?} -> {:?}", id, current, to);

        if to == SessionState::Idle {
            self.sessions.remove(id);
        } else {
            self.sessions.insert(id.clone(), to);
        }
    }

    /// Link two requesters and move both to `Connected`
    fn connect(&mut self, engine: &PairingEngine, a: &RequesterId, b: &RequesterId, notes: &mut Notifications) {
        let from_a = self.session(a);
        let from_b = self.session(b);

        let pair = engine
            .commit(&mut self.pool, &mut self.registry, a, b)
            .unwrap_or_else(|e| panic!("pair commit violated registry discipline: {}", e));

        self.transition(a, &from_a, SessionState::Connected { partner: b.clone() });
        self.transition(b, &from_b, SessionState::Connected { partner: a.clone() });

        notes.push((pair.first.clone(), Envelope::Matched { partner: pair.second.clone() }));
        notes.push((pair.second, Envelope::Matched { partner: pair.first }));
    }

    /// Tear down the pair containing `id`; both sides return to `Idle`
    fn disconnect(&mut self, id: &RequesterId, notes: &mut Notifications) -> Option<RequesterId> {
        let matched_at = self.registry.pair_of(id)?.matched_at;
        let partner = self.registry.end(id)?;

        self.transition(id, &SessionState::Connected { partner: partner.clone() }, SessionState::Idle);
        self.transition(&partner, &SessionState::Connected { partner: id.clone() }, SessionState::Idle);

        tracing::info!(
            "Session ended by {} (partner {}) after {}s",
            id,
            partner,
            (chrono::Utc::now() - matched_at).num_seconds()
        );

        notes.push((partner.clone(), Envelope::PartnerLeft));
        notes.push((id.clone(), Envelope::SessionEnded));
        Some(partner)
    }

    fn withdraw(&mut self, id: &RequesterId) -> bool {
        if self.pool.remove(id).is_none() {
            return false;
        }
        self.transition(id, &SessionState::Waiting, SessionState::Idle);
        tracing::debug!("{} left the waiting pool", id);
        true
    }

    /// Panics if pool, registry and session table disagree
    fn assert_consistent(&self) {
        for profile in self.pool.iter() {
            let id = &profile.requester_id;
            assert!(!self.registry.contains(id), "{} is both waiting and paired", id);
            assert_eq!(self.session(id), SessionState::Waiting, "{} waiting without state", id);
        }

        let mut linked = 0;
        for (id, partner) in self.registry.links() {
            linked += 1;
            assert_eq!(self.registry.partner_of(partner), Some(id), "asymmetric pair {} -> {}", id, partner);
            assert!(!self.pool.contains(id), "{} is both paired and waiting", id);
            assert_eq!(
                self.session(id),
                SessionState::Connected { partner: partner.clone() },
                "{} paired without matching state",
                id
            );
        }

        assert_eq!(
            self.sessions.len(),
            self.pool.len() + linked,
            "session table out of step with pool and registry"
        );
    }

    #[inline]
    fn check(&self) {
        if cfg!(debug_assertions) {
            self.assert_consistent();
        }
    }
}

/// Single entry point for the front-end: match, cancel, end, relay, reset
///
/// Pool and registry share one lock. Matching holds the write side for the
/// whole scan-and-commit; relay only needs the read side. Transport delivery
/// always happens after the lock is released.
pub struct SessionCoordinator {
    state: RwLock<MatchState>,
    engine: PairingEngine,
    transport: Arc<dyn Transport>,
}

impl SessionCoordinator {
    pub fn new(engine: PairingEngine, transport: Arc<dyn Transport>) -> Self {
        Self {
            state: RwLock::new(MatchState::default()),
            engine,
            transport,
        }
    }

    /// Try to pair `profile` now; otherwise leave it waiting
    pub async fn request_match(
        &self,
        profile: PreferenceProfile,
    ) -> Result<MatchOutcome, DeliveryFailure<MatchOutcome>> {
        let id = profile.requester_id.clone();
        let mut notes = Notifications::new();

        let outcome = {
            let mut state = self.state.write().await;

            match state.session(&id) {
                SessionState::Waiting => return Ok(MatchOutcome::AlreadyWaiting),
                SessionState::Connected { partner } => return Ok(MatchOutcome::AlreadyPaired { partner }),
                SessionState::Idle => {}
            }

            let candidate = self
                .engine
                .attempt_match(&profile, &state.pool)
                .map(|c| c.requester_id.clone());

            match candidate {
                Some(partner) => {
                    state.connect(&self.engine, &id, &partner, &mut notes);
                }
                None => {
                    state
                        .pool
                        .insert(profile)
                        .unwrap_or_else(|e| panic!("idle requester found in pool: {}", e));
                    state.transition(&id, &SessionState::Idle, SessionState::Waiting);
                    tracing::debug!("{} waiting ({} in pool)", id, state.pool.len());

                    // Every arrival already scanned the whole pool, so a
                    // non-empty sweep means the pool invariant broke elsewhere.
                    if self.engine.eager_rescan() {
                        let stragglers = self.engine.sweep(&state.pool);
                        debug_assert!(stragglers.is_empty(), "sweep found unmatched pairs: {:?}", stragglers);
                        for (a, b) in stragglers {
                            state.connect(&self.engine, &a, &b, &mut notes);
                        }
                    }
                }
            }

            state.check();

            match state.session(&id) {
                SessionState::Connected { partner } => MatchOutcome::Matched {
                    requester: id.clone(),
                    partner,
                },
                _ => MatchOutcome::Waiting,
            }
        };

        self.dispatch(outcome, notes).await
    }

    /// Leave the waiting pool
    pub async fn cancel(&self, id: &RequesterId) -> CancelOutcome {
        let mut state = self.state.write().await;
        let outcome = if state.withdraw(id) {
            CancelOutcome::Cancelled
        } else {
            CancelOutcome::WasNotWaiting
        };
        state.check();
        outcome
    }

    /// End the session `id` belongs to and notify both sides
    pub async fn end_session(&self, id: &RequesterId) -> Result<EndOutcome, DeliveryFailure<EndOutcome>> {
        let mut notes = Notifications::new();

        let outcome = {
            let mut state = self.state.write().await;
            let outcome = match state.disconnect(id, &mut notes) {
                Some(partner) => EndOutcome::Ended { partner },
                None => EndOutcome::WasNotConnected,
            };
            state.check();
            outcome
        };

        self.dispatch(outcome, notes).await
    }

    /// Forward `payload` to the sender's partner, unmodified
    pub async fn relay(&self, sender: &RequesterId, payload: Payload) -> Result<RelayOutcome, TransportError> {
        let partner = {
            let state = self.state.read().await;
            state.registry.partner_of(sender).cloned()
        };

        let Some(partner) = partner else {
            return Ok(RelayOutcome::NotConnected);
        };

        self.transport.deliver(&partner, Envelope::Relay { payload }).await?;
        Ok(RelayOutcome::Delivered)
    }

    /// Return `id` to idle from wherever it is
    pub async fn reset(&self, id: &RequesterId) -> Result<ResetOutcome, DeliveryFailure<ResetOutcome>> {
        let mut notes = Notifications::new();

        let outcome = {
            let mut state = self.state.write().await;
            let outcome = if let Some(partner) = state.disconnect(id, &mut notes) {
                ResetOutcome::EndedSession { partner }
            } else if state.withdraw(id) {
                ResetOutcome::CancelledWaiting
            } else {
                ResetOutcome::WasIdle
            };
            state.check();
            outcome
        };

        self.dispatch(outcome, notes).await
    }

    pub async fn state_of(&self, id: &RequesterId) -> SessionState {
        self.state.read().await.session(id)
    }

    /// The live pair `id` belongs to, with the time it was formed
    pub async fn connection(&self, id: &RequesterId) -> Option<ConnectedPair> {
        self.state.read().await.registry.pair_of(id)
    }

    pub async fn stats(&self) -> CoordinatorStats {
        let state = self.state.read().await;
        CoordinatorStats {
            waiting: state.pool.len(),
            pairs: state.registry.pair_count(),
        }
    }

    /// Deliver every notification; failures are collected, never rolled back
    async fn dispatch<O>(&self, outcome: O, notes: Notifications) -> Result<O, DeliveryFailure<O>> {
        let mut failures = Vec::new();

        for (recipient, envelope) in notes {
            if let Err(e) = self.transport.deliver(&recipient, envelope).await {
                tracing::warn!("Notification to {} failed: {}", recipient, e);
                failures.push((recipient, e));
            }
        }

        if failures.is_empty() {
            Ok(outcome)
        } else {
            Err(DeliveryFailure { outcome, failures })
        }
    }
}
