// Unit tests for Pairline

use pairline::core::{
    filters::{accepts, is_compatible},
    matcher::PairingEngine,
    pool::{PoolError, WaitingPool},
    registry::{PairRegistry, RegistryError},
};
use pairline::models::{AgeBracket, Gender, PreferenceProfile, RequesterId, Wanted};
use pairline::{CancelOutcome, MatchOutcome, MemoryTransport, SessionCoordinator, SessionState};
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok, block_on};

fn create_profile(
    id: &str,
    gender: Gender,
    age: AgeBracket,
    wanted_gender: Wanted<Gender>,
    wanted_age: Wanted<AgeBracket>,
) -> PreferenceProfile {
    PreferenceProfile::new(id, gender, age, wanted_gender, wanted_age)
}

#[test]
fn test_wildcard_gender_exact_age() {
    let u = create_profile(
        "u",
        Gender::Female,
        AgeBracket::Age36To45,
        Wanted::Any,
        Wanted::Exactly(AgeBracket::Age36To45),
    );
    let v = create_profile(
        "v",
        Gender::Male,
        AgeBracket::Age36To45,
        Wanted::Exactly(Gender::Female),
        Wanted::Exactly(AgeBracket::Age36To45),
    );

    assert!(accepts(&u, &v));
    assert!(accepts(&v, &u));
    assert!(is_compatible(&u, &v));
}

#[test]
fn test_exact_age_rejects_neighbouring_bracket() {
    let u = create_profile(
        "u",
        Gender::Male,
        AgeBracket::Age18To25,
        Wanted::Any,
        Wanted::Exactly(AgeBracket::Age18To25),
    );
    let v = create_profile("v", Gender::Male, AgeBracket::Age26To35, Wanted::Any, Wanted::Any);

    assert!(!is_compatible(&u, &v));
    assert!(!is_compatible(&v, &u));
}

#[test]
fn test_pool_duplicate_insert() {
    let mut pool = WaitingPool::new();
    let p = create_profile("a", Gender::Male, AgeBracket::Age18To25, Wanted::Any, Wanted::Any);

    assert_ok!(pool.insert(p.clone()));
    let err = assert_err!(pool.insert(p));
    assert_eq!(err, PoolError::AlreadyWaiting(RequesterId::from("a")));
}

#[test]
fn test_engine_skips_one_sided_candidates() {
    let engine = PairingEngine::new(false);
    let mut pool = WaitingPool::new();
    // wants women only, so never accepts the incoming man
    pool.insert(create_profile(
        "old",
        Gender::Female,
        AgeBracket::Age18To25,
        Wanted::Exactly(Gender::Female),
        Wanted::Any,
    ))
    .unwrap();
    pool.insert(create_profile("new", Gender::Female, AgeBracket::Age18To25, Wanted::Any, Wanted::Any))
        .unwrap();

    let incoming = create_profile("m", Gender::Male, AgeBracket::Age18To25, Wanted::Any, Wanted::Any);
    let found = engine.attempt_match(&incoming, &pool).unwrap();
    assert_eq!(found.requester_id, RequesterId::from("new"));
}

#[test]
fn test_registry_end_unknown_is_not_connected() {
    let mut registry = PairRegistry::new();
    assert!(registry.end(&RequesterId::from("nobody")).is_none());

    let a = RequesterId::from("a");
    let b = RequesterId::from("b");
    assert_ok!(registry.create(&a, &b));
    assert_eq!(
        assert_err!(registry.create(&a, &RequesterId::from("c"))),
        RegistryError::AlreadyPaired(a.clone())
    );
}

#[test]
fn test_lazy_strategy_still_pairs_on_arrival() {
    let transport = Arc::new(MemoryTransport::new());
    let coordinator = SessionCoordinator::new(PairingEngine::new(false), transport);

    block_on(async {
        let a = create_profile("a", Gender::Male, AgeBracket::Age45Plus, Wanted::Any, Wanted::Any);
        let b = create_profile("b", Gender::Female, AgeBracket::Age45Plus, Wanted::Any, Wanted::Any);

        assert_eq!(coordinator.request_match(a).await.unwrap(), MatchOutcome::Waiting);
        assert!(matches!(
            coordinator.request_match(b).await.unwrap(),
            MatchOutcome::Matched { .. }
        ));
        assert_eq!(
            coordinator.state_of(&RequesterId::from("a")).await,
            SessionState::Connected {
                partner: RequesterId::from("b")
            }
        );
        assert_eq!(
            coordinator.cancel(&RequesterId::from("a")).await,
            CancelOutcome::WasNotWaiting
        );
    });
}
