//! Feature lock scenarios against a SQL store
//!
//! Runs the service over an in-memory SQLite database so persisted side
//! effects can be checked with direct store reads.

use std::sync::Arc;
use std::time::Duration;

use featgate_core::{FeatureKey, FeatureLockService, FeatureMgtError, ManualClock};
use featgate_persistence::sea_orm::{ConnectOptions, Database};
use featgate_persistence::schema::ensure_schema;
use featgate_persistence::{ExternalDbPersistService, Feature, FeaturePersistence};

const START: i64 = 1_700_000_000_000;
const FIVE_MINUTES: Duration = Duration::from_millis(300_000);

struct Fixture {
    service: FeatureLockService,
    store: Arc<ExternalDbPersistService>,
    clock: ManualClock,
}

async fn setup() -> Fixture {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    ensure_schema(&db).await.unwrap();

    let store = Arc::new(ExternalDbPersistService::new(db));
    let clock = ManualClock::new(START);
    let service = FeatureLockService::new(store.clone()).with_clock(Arc::new(clock.clone()));

    Fixture {
        service,
        store,
        clock,
    }
}

fn login_key() -> FeatureKey {
    FeatureKey::new(1, "u1", "login")
}

#[tokio::test]
async fn test_add_then_get_round_trip() {
    let fx = setup().await;
    fx.service.add_feature(1, "u1", "login").await.unwrap();

    let feature = fx.service.get_feature(1, "u1", "login").await.unwrap();
    assert!(!feature.locked);
    assert_eq!(feature.unlock_time, 0);
    assert!(feature.lock_reasons.is_empty());
    assert!(feature.lock_reason_codes.is_empty());
}

#[tokio::test]
async fn test_scenario_a_new_feature_is_unlocked() {
    let fx = setup().await;
    fx.service.add_feature(1, "u1", "login").await.unwrap();
    assert!(!fx.service.is_locked(1, "u1", "login").await.unwrap());
}

#[tokio::test]
async fn test_scenario_b_lock_reports_reasons() {
    let fx = setup().await;
    fx.service.add_feature(1, "u1", "login").await.unwrap();
    fx.service
        .lock_feature(1, "u1", "login", Some(FIVE_MINUTES), ["FAILED_ATTEMPTS"])
        .await
        .unwrap();

    assert!(fx.service.is_locked(1, "u1", "login").await.unwrap());
    let reasons = fx.service.get_lock_reasons(1, "u1", "login").await.unwrap();
    assert_eq!(reasons.codes, vec!["FAILED_ATTEMPTS"]);
    assert_eq!(reasons.reasons, vec!["FAILED_ATTEMPTS"]);
}

#[tokio::test]
async fn test_scenario_c_expiry_is_persisted() {
    let fx = setup().await;
    fx.service.add_feature(1, "u1", "login").await.unwrap();
    fx.service
        .lock_feature(1, "u1", "login", Some(FIVE_MINUTES), ["FAILED_ATTEMPTS"])
        .await
        .unwrap();

    fx.clock.advance(FIVE_MINUTES + Duration::from_millis(1));
    assert!(!fx.service.is_locked(1, "u1", "login").await.unwrap());

    let stored = fx.store.feature_find(&login_key()).await.unwrap().unwrap();
    assert!(!stored.locked);
    assert_eq!(stored, Feature::new(&login_key()));
}

#[tokio::test]
async fn test_scenario_d_delete_missing_is_ok() {
    let fx = setup().await;
    fx.service.delete_feature(1, "ghost", "login").await.unwrap();
}

#[tokio::test]
async fn test_scenario_e_duplicate_add_keeps_row() {
    let fx = setup().await;
    fx.service.add_feature(1, "u1", "login").await.unwrap();
    let locked = fx
        .service
        .lock_feature(1, "u1", "login", None, ["ADMIN"])
        .await
        .unwrap();

    let err = fx.service.add_feature(1, "u1", "login").await.unwrap_err();
    assert!(matches!(err, FeatureMgtError::AlreadyExists { .. }));
    assert_eq!(err.error_code().code, "FM_011");

    let stored = fx.store.feature_find(&login_key()).await.unwrap().unwrap();
    assert_eq!(stored, locked);
}

#[tokio::test]
async fn test_lazy_expiry_either_side_of_deadline() {
    let fx = setup().await;
    fx.service.add_feature(1, "u1", "login").await.unwrap();
    let locked = fx
        .service
        .lock_feature(1, "u1", "login", Some(FIVE_MINUTES), ["FAILED_ATTEMPTS"])
        .await
        .unwrap();

    fx.clock.set(locked.unlock_time - 1);
    let before = fx.service.get_feature(1, "u1", "login").await.unwrap();
    assert!(before.locked);
    assert!(fx.store.feature_find(&login_key()).await.unwrap().unwrap().locked);

    fx.clock.set(locked.unlock_time + 1);
    let after = fx.service.get_feature(1, "u1", "login").await.unwrap();
    assert!(!after.locked);
    assert!(!fx.store.feature_find(&login_key()).await.unwrap().unwrap().locked);
}

#[tokio::test]
async fn test_unlock_twice_same_state() {
    let fx = setup().await;
    fx.service.add_feature(1, "u1", "login").await.unwrap();
    fx.service
        .lock_feature(1, "u1", "login", Some(FIVE_MINUTES), ["A", "B"])
        .await
        .unwrap();

    fx.service.unlock_feature(1, "u1", "login").await.unwrap();
    let once = fx.store.feature_find(&login_key()).await.unwrap();
    fx.service.unlock_feature(1, "u1", "login").await.unwrap();
    let twice = fx.store.feature_find(&login_key()).await.unwrap();

    assert_eq!(once, twice);
    assert_eq!(once, Some(Feature::new(&login_key())));
}

#[tokio::test]
async fn test_relock_replaces_previous_lock() {
    let fx = setup().await;
    fx.service.add_feature(1, "u1", "login").await.unwrap();
    fx.service
        .lock_feature(1, "u1", "login", Some(FIVE_MINUTES), ["A", "B"])
        .await
        .unwrap();

    fx.clock.advance(Duration::from_secs(10));
    fx.service
        .lock_feature(1, "u1", "login", Some(Duration::from_secs(60)), ["C"])
        .await
        .unwrap();

    let stored = fx.store.feature_find(&login_key()).await.unwrap().unwrap();
    assert_eq!(stored.unlock_time, START + 10_000 + 60_000);
    assert_eq!(stored.lock_reason_codes, vec!["C"]);
    assert_eq!(stored.lock_reasons, vec!["C"]);
}

#[tokio::test]
async fn test_tenants_are_isolated() {
    let fx = setup().await;
    fx.service.add_feature(1, "u1", "login").await.unwrap();
    fx.service.add_feature(2, "u1", "login").await.unwrap();
    fx.service
        .lock_feature(1, "u1", "login", None, ["ADMIN"])
        .await
        .unwrap();

    assert!(fx.service.is_locked(1, "u1", "login").await.unwrap());
    assert!(!fx.service.is_locked(2, "u1", "login").await.unwrap());

    let err = fx.service.get_feature(3, "u1", "login").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_concurrent_reads_of_expired_lock_agree() {
    let fx = setup().await;
    fx.service.add_feature(1, "u1", "login").await.unwrap();
    fx.service
        .lock_feature(1, "u1", "login", Some(FIVE_MINUTES), ["FAILED_ATTEMPTS"])
        .await
        .unwrap();
    fx.clock.advance(FIVE_MINUTES * 2);

    let (a, b) = tokio::join!(
        fx.service.is_locked(1, "u1", "login"),
        fx.service.is_locked(1, "u1", "login")
    );
    assert!(!a.unwrap());
    assert!(!b.unwrap());
    assert_eq!(
        fx.store.feature_find(&login_key()).await.unwrap(),
        Some(Feature::new(&login_key()))
    );
}
