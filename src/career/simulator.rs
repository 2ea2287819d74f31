//! Headless balance simulator for the Flowify economy.
//! Run with: cargo run --bin flowify-sim -- --weeks 52 --seed 7
//! or: cargo test simulate_year -- --nocapture

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::logic::best_unlocked_city;
use super::state::{city_info, PlayerStats};
use super::CareerSession;
use crate::config::Tuning;
use crate::error::Result;
use crate::time::{Clock, ManualClock, MS_PER_HOUR};

pub const WEEK_MS: u64 = 7 * 24 * MS_PER_HOUR;

/// 2024-01-01T00:00:00Z, so saves from a simulated run look realistic.
pub const SIM_EPOCH_MS: u64 = 1_704_067_200_000;

/// Relocate once cash covers this many weeks of the next city's rent.
const MOVE_RESERVE_WEEKS: u64 = 10;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimSummary {
    pub weeks: u32,
    pub songs_released: u32,
    pub concerts_played: u32,
    pub release_cash: u64,
    pub concert_cash: u64,
    pub royalty_cash: u64,
    pub rent_paid: u64,
    pub evictions: u32,
    pub best_popularity: u64,
    pub final_player: PlayerStats,
}

/// Minigame skill of the simulated player, as a score range.
fn play_minigame<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(40.0..=100.0)
}

/// One song, one concert and the weekly bills, every week.
pub fn simulate_career(weeks: u32, seed: u64, tuning: Tuning) -> Result<SimSummary> {
    tuning.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut session = CareerSession::new(PlayerStats::new(), tuning, ManualClock::new(SIM_EPOCH_MS));
    let mut summary = SimSummary::default();

    for week in 0..weeks {
        let week_start = session.clock().now_ms();

        session.start_production(&format!("Track {}", week + 1))?;
        session.record_take(play_minigame(&mut rng))?;
        let finish_time = session.start_mixing()?;
        session.clock().set(finish_time);
        session.poll_mixing()?;
        let release = session.release(&mut rng)?;
        summary.songs_released += 1;
        summary.release_cash += release.initial_cash;
        summary.best_popularity = summary.best_popularity.max(release.song.popularity_score);

        let city = best_unlocked_city(session.player());
        if session.player().energy >= session.tuning().concert_energy_cost {
            let report = session.perform_concert(city, play_minigame(&mut rng), &mut rng)?;
            summary.concerts_played += 1;
            summary.concert_cash += report.revenue;
        }

        let current = city_info(session.player().city_id);
        let target = city_info(city);
        if target.tier > current.tier
            && session.player().cash >= target.weekly_cost * MOVE_RESERVE_WEEKS
        {
            session.move_to_city(city)?;
        }

        session.clock().set(week_start + WEEK_MS);
        summary.royalty_cash += session.collect_royalties();

        let bill = session.end_week();
        summary.rent_paid += bill.paid;
        if bill.evicted {
            summary.evictions += 1;
        }
        summary.weeks += 1;
    }

    summary.final_player = session.into_player();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::career::logic::format_cash;

    #[test]
    fn same_seed_same_career() {
        let a = simulate_career(12, 42, Tuning::default()).unwrap();
        let b = simulate_career(12, 42, Tuning::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn one_song_per_week() {
        let s = simulate_career(8, 1, Tuning::default()).unwrap();
        assert_eq!(s.weeks, 8);
        assert_eq!(s.songs_released, 8);
        assert_eq!(s.final_player.discography.len(), 8);
        assert!(s.final_player.active_production.is_none());
        assert_eq!(s.release_cash, s.final_player.total_song_earnings());
    }

    #[test]
    fn steady_career_never_misses_rent() {
        let s = simulate_career(26, 42, Tuning::default()).unwrap();
        assert_eq!(s.evictions, 0);
        assert_eq!(s.concerts_played, 26);
        assert!(s.final_player.monthly_listeners >= 100 + 26 * 500);
    }

    #[test]
    fn royalties_accumulate() {
        let s = simulate_career(12, 3, Tuning::default()).unwrap();
        assert!(s.royalty_cash > 0);
    }

    #[test]
    fn invalid_tuning_is_rejected() {
        let tuning = Tuning {
            royalty_interval_ms: 0,
            ..Tuning::default()
        };
        assert!(simulate_career(1, 0, tuning).is_err());
    }

    #[test]
    fn simulate_year() {
        let s = simulate_career(52, 7, Tuning::default()).unwrap();
        let p = &s.final_player;
        println!("=== Flowify: 52 weeks, seed 7 ===");
        println!("level {} in {}", p.level, city_info(p.city_id).name);
        println!("listeners {}", p.monthly_listeners);
        println!("cash {}", format_cash(p.cash));
        println!(
            "income: releases {} / concerts {} / royalties {}",
            format_cash(s.release_cash),
            format_cash(s.concert_cash),
            format_cash(s.royalty_cash)
        );
        println!("best popularity {}", s.best_popularity);
        assert!(p.level > 1);
    }
}
