//! End-to-end: a player records, mixes, releases, tours and reloads a save.

use flowify::career::events::CareerEvent;
use flowify::career::logic::{calculate_concert_revenue, calculate_passive_income, calculate_quality};
use flowify::career::save::{load_player, save_player, MemoryStore};
use flowify::career::state::{CityId, MixingStatus, PlayerStats, ProductionPhase};
use flowify::time::{ManualClock, MS_PER_HOUR};
use flowify::{CareerSession, Error, Tuning};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn quality_example() {
    let stats = PlayerStats {
        rhythm: 30.0,
        flow: 30.0,
        lyrics: 30.0,
        ..PlayerStats::new()
    };
    assert_eq!(calculate_quality(80.0, &stats).unwrap(), 95);
}

#[test]
fn record_mix_release_then_reload() {
    let mut session = CareerSession::new(PlayerStats::new(), Tuning::default(), ManualClock::new(1_000));
    let events = session.subscribe();
    let mut rng = StdRng::seed_from_u64(2024);

    session.start_production("Late Night Cypher").unwrap();
    session.record_take(88.0).unwrap();
    assert_eq!(session.start_mixing().unwrap(), 7_201_000);

    session.clock().set(7_200_999);
    assert_eq!(session.poll_mixing().unwrap(), MixingStatus::Mixing);
    session.clock().set(7_201_000);
    assert_eq!(session.poll_mixing().unwrap(), MixingStatus::Ready);

    let release = session.release(&mut rng).unwrap();
    assert!(release.listeners_gained >= 500);
    assert_eq!(session.phase(), ProductionPhase::Idle);

    // A second song can start once the first is out.
    session.start_production("Encore").unwrap();
    assert!(matches!(
        session.start_production("Too Many"),
        Err(Error::InvalidState(_))
    ));

    let received: Vec<CareerEvent> = events.try_iter().collect();
    assert!(received
        .iter()
        .any(|e| matches!(e, CareerEvent::SongReleased { listeners_gained, .. } if *listeners_gained >= 500)));

    let mut store = MemoryStore::new();
    let player = session.into_player();
    save_player(&mut store, "player-1", &player).unwrap();
    let restored = load_player(&mut store, "player-1").unwrap().unwrap();
    assert_eq!(restored, player);
    assert_eq!(restored.active_production.as_ref().unwrap().name, "Encore");
}

#[test]
fn boost_makes_song_ready_at_once() {
    let mut session = CareerSession::new(PlayerStats::new(), Tuning::default(), ManualClock::new(5_000));
    session.start_production("Quick One").unwrap();
    session.start_mixing().unwrap();
    session.clock().advance(30_000);
    session.boost_mixing().unwrap();
    assert_eq!(session.poll_mixing().unwrap(), MixingStatus::Ready);
}

#[test]
fn royalties_are_not_double_credited() {
    let mut session = CareerSession::new(PlayerStats::new(), Tuning::default(), ManualClock::new(0));
    let mut rng = StdRng::seed_from_u64(1);
    session.start_production("Slow Burn").unwrap();
    session.record_take(95.0).unwrap();
    session.start_mixing().unwrap();
    session.clock().advance(2 * MS_PER_HOUR);
    session.release(&mut rng).unwrap();

    session.clock().advance(5 * MS_PER_HOUR);
    let first = session.collect_royalties();
    let again = session.collect_royalties();
    assert!(first > 0);
    assert_eq!(again, 0);
}

#[test]
fn empty_discography_earns_nothing() {
    assert_eq!(calculate_passive_income(&[], 1_000_000), 0);
}

#[test]
fn concert_revenue_capped_for_every_city() {
    let star = PlayerStats {
        charisma: 100.0,
        monthly_listeners: 50_000_000,
        ..PlayerStats::new()
    };
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..200 {
        let revenue = calculate_concert_revenue(100.0, CityId::Tokyo, &star, &mut rng).unwrap();
        assert!(revenue <= 137_500);
    }
}
