use std::collections::HashSet;
use crate::core::{
    filters::is_compatible,
    pool::WaitingPool,
    registry::{PairRegistry, RegistryError},
};
use crate::models::{ConnectedPair, PreferenceProfile, RequesterId};

/// Pairing engine - greedy first-fit over the waiting pool
///
/// # Known limitation
/// The scan stops at the first compatible candidate in pool order. No attempt
/// is made to find a better assignment across the whole pool; latency and
/// predictability win over global matching quality.
#[derive(Debug, Clone)]
pub struct PairingEngine {
    eager_rescan: bool,
}

impl PairingEngine {
    pub fn new(eager_rescan: bool) -> Self {
        Self { eager_rescan }
    }

    /// Whether the pool should be swept after every unmatched insertion
    pub fn eager_rescan(&self) -> bool {
        self.eager_rescan
    }

    /// First waiting candidate compatible with `profile`, oldest first
    pub fn attempt_match<'p>(
        &self,
        profile: &PreferenceProfile,
        pool: &'p WaitingPool,
    ) -> Option<&'p PreferenceProfile> {
        pool.iter()
            .filter(|candidate| candidate.requester_id != profile.requester_id)
            .find(|candidate| is_compatible(profile, candidate))
    }

    /// Consume both requesters from the pool and link them
    ///
    /// Must run inside the same critical section as the scan that found the
    /// candidate. `incoming` may or may not be pool-resident.
    pub fn commit(
        &self,
        pool: &mut WaitingPool,
        registry: &mut PairRegistry,
        incoming: &RequesterId,
        candidate: &RequesterId,
    ) -> Result<ConnectedPair, RegistryError> {
        let pair = registry.create(incoming, candidate)?;
        pool.remove(incoming);
        pool.remove(candidate);

        tracing::info!("Pair formed: {} <-> {} at {}", incoming, candidate, pair.matched_at);

        Ok(pair)
    }

    /// Greedily pair every compatible couple still sitting in the pool
    ///
    /// Each profile is used at most once; older entries get first pick.
    pub fn sweep(&self, pool: &WaitingPool) -> Vec<(RequesterId, RequesterId)> {
        let mut claimed: HashSet<&RequesterId> = HashSet::new();
        let mut pairs = Vec::new();

        for seeker in pool.iter() {
            if claimed.contains(&seeker.requester_id) {
                continue;
            }

            let found = pool
                .iter_candidates(&seeker.requester_id)
                .filter(|candidate| !claimed.contains(&candidate.requester_id))
                .find(|candidate| is_compatible(seeker, candidate));

            if let Some(candidate) = found {
                claimed.insert(&seeker.requester_id);
                claimed.insert(&candidate.requester_id);
                pairs.push((seeker.requester_id.clone(), candidate.requester_id.clone()));
            }
        }

        if !pairs.is_empty() {
            tracing::debug!("Sweep found {} pair(s) among {} waiting", pairs.len(), pool.len());
        }

        pairs
    }
}

impl Default for PairingEngine {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeBracket, Gender, Wanted};

    fn create_candidate(id: &str, gender: Gender, wanted: Wanted<Gender>) -> PreferenceProfile {
        PreferenceProfile::new(id, gender, AgeBracket::Age26To35, wanted, Wanted::Any)
    }

    #[test]
    fn test_first_fit_picks_oldest_compatible() {
        let engine = PairingEngine::default();
        let mut pool = WaitingPool::new();
        pool.insert(create_candidate("m1", Gender::Male, Wanted::Exactly(Gender::Male))).unwrap();
        pool.insert(create_candidate("f1", Gender::Female, Wanted::Any)).unwrap();
        pool.insert(create_candidate("f2", Gender::Female, Wanted::Exactly(Gender::Male))).unwrap();

        let incoming = create_candidate("m2", Gender::Male, Wanted::Exactly(Gender::Female));
        let found = engine.attempt_match(&incoming, &pool).unwrap();
        assert_eq!(found.requester_id.as_str(), "f1");
    }

    #[test]
    fn test_no_match_in_empty_or_incompatible_pool() {
        let engine = PairingEngine::default();
        let mut pool = WaitingPool::new();
        let incoming = create_candidate("m", Gender::Male, Wanted::Exactly(Gender::Female));
        assert!(engine.attempt_match(&incoming, &pool).is_none());

        pool.insert(create_candidate("m2", Gender::Male, Wanted::Any)).unwrap();
        assert!(engine.attempt_match(&incoming, &pool).is_none());
    }

    #[test]
    fn test_found_candidate_outlives_incoming_profile() {
        let engine = PairingEngine::default();
        let mut pool = WaitingPool::new();
        pool.insert(create_candidate("f1", Gender::Female, Wanted::Any)).unwrap();

        let found = {
            let incoming = create_candidate("m1", Gender::Male, Wanted::Exactly(Gender::Female));
            engine.attempt_match(&incoming, &pool)
        };

        assert_eq!(found.map(|p| p.requester_id.as_str()), Some("f1"));
    }

    #[test]
    fn test_incoming_never_matches_its_own_pool_entry() {
        let engine = PairingEngine::default();
        let mut pool = WaitingPool::new();
        let me = create_candidate("x", Gender::Female, Wanted::Any);
        pool.insert(me.clone()).unwrap();

        assert!(engine.attempt_match(&me, &pool).is_none());
    }

    #[test]
    fn test_commit_consumes_both_entries() {
        let engine = PairingEngine::default();
        let mut pool = WaitingPool::new();
        let mut registry = PairRegistry::new();
        pool.insert(create_candidate("a", Gender::Male, Wanted::Any)).unwrap();
        pool.insert(create_candidate("b", Gender::Female, Wanted::Any)).unwrap();
        pool.insert(create_candidate("c", Gender::Female, Wanted::Any)).unwrap();

        let a = RequesterId::from("a");
        let b = RequesterId::from("b");
        engine.commit(&mut pool, &mut registry, &a, &b).unwrap();

        assert_eq!(pool.len(), 1);
        assert!(pool.contains(&RequesterId::from("c")));
        assert_eq!(registry.partner_of(&a), Some(&b));
    }

    #[test]
    fn test_commit_failure_leaves_pool_untouched() {
        let engine = PairingEngine::default();
        let mut pool = WaitingPool::new();
        let mut registry = PairRegistry::new();
        let (a, b, c) = (RequesterId::from("a"), RequesterId::from("b"), RequesterId::from("c"));
        registry.create(&a, &b).unwrap();
        pool.insert(create_candidate("c", Gender::Male, Wanted::Any)).unwrap();

        assert!(engine.commit(&mut pool, &mut registry, &c, &a).is_err());
        assert!(pool.contains(&c));
    }

    #[test]
    fn test_sweep_pairs_each_profile_once() {
        let engine = PairingEngine::default();
        let mut pool = WaitingPool::new();
        pool.insert(create_candidate("a", Gender::Male, Wanted::Any)).unwrap();
        pool.insert(create_candidate("b", Gender::Male, Wanted::Any)).unwrap();
        pool.insert(create_candidate("c", Gender::Male, Wanted::Any)).unwrap();

        let pairs = engine.sweep(&pool);
        assert_eq!(pairs, vec![(RequesterId::from("a"), RequesterId::from("b"))]);
    }
}
