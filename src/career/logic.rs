//! Flowify economy — pure game logic (no clock / IO).
//!
//! Every function takes `now` and a random source from the caller, so the
//! same inputs always give the same outputs.

use log::{debug, info, warn};
use rand::Rng;

use super::state::{
    city_info, CityId, PlayerStats, ReleasedSong, SongDraft, CASH_PER_POPULARITY,
    CHARISMA_WEIGHT, CONCERT_CAP_MULTIPLIER, CONCERT_VARIANCE_MAX, CONCERT_VARIANCE_MIN,
    DECAY_FLOOR, DECAY_WINDOW_HOURS, EVICTION_CHARISMA_LOSS, EVICTION_ENERGY_LOSS,
    EVICTION_LISTENER_LOSS, EVICTION_MANAGER_LOSS, LISTENERS_PER_POPULARITY, LISTENER_WEIGHT,
    LUCK_RANGE, MAX_QUALITY, MIN_LISTENERS_GAINED, POPULARITY_DIVISOR, QUALITY_WEIGHT,
    ROYALTY_RATE, STAT_CAP, WEEKLY_ENERGY_RECOVERY,
};
use crate::config::Tuning;
use crate::error::{ensure_non_negative, ensure_percent, Error, Result};
use crate::time::{whole_intervals, MS_PER_HOUR};

// ── Quality ───────────────────────────────────────────────────────────

/// Song quality from the recording minigame score plus craft skills.
pub fn calculate_quality(mini_game_score: f64, stats: &PlayerStats) -> Result<u8> {
    ensure_percent("mini-game score", mini_game_score)?;
    ensure_non_negative("rhythm", stats.rhythm)?;
    ensure_non_negative("flow", stats.flow)?;
    ensure_non_negative("lyrics", stats.lyrics)?;

    let skill_factor = stats.skill_total() / 30.0;
    let quality = (mini_game_score + skill_factor * 5.0).min(MAX_QUALITY as f64);
    Ok(quality.floor() as u8)
}

// ── Release ───────────────────────────────────────────────────────────

/// Outcome of releasing a draft.
#[derive(Clone, Debug, PartialEq)]
pub struct Release {
    pub song: ReleasedSong,
    pub listeners_gained: u64,
    pub initial_cash: u64,
}

/// Release a finished draft, drawing the luck term from `rng`.
pub fn release_song<R: Rng + ?Sized>(
    draft: &SongDraft,
    stats: &PlayerStats,
    rng: &mut R,
    now: u64,
) -> Result<Release> {
    let roll: f64 = rng.gen();
    release_song_with_roll(draft, stats, roll, now)
}

/// [`release_song`] with the luck roll (`0.0..1.0`) supplied directly.
pub fn release_song_with_roll(
    draft: &SongDraft,
    stats: &PlayerStats,
    roll: f64,
    now: u64,
) -> Result<Release> {
    if draft.is_recording() || now < draft.finish_time {
        return Err(Error::InvalidState(format!(
            "\"{}\" is not done mixing",
            draft.name
        )));
    }
    if !(0.0..1.0).contains(&roll) {
        return Err(Error::InvalidInput(format!("luck roll must be in [0, 1), got {roll}")));
    }
    ensure_non_negative("charisma", stats.charisma)?;

    let quality_score = draft.quality as f64 * QUALITY_WEIGHT;
    let charisma_score = stats.charisma * CHARISMA_WEIGHT;
    let listener_bonus = (stats.monthly_listeners as f64).sqrt() * LISTENER_WEIGHT;
    let luck = roll * LUCK_RANGE;
    let total_score = quality_score + charisma_score + listener_bonus + luck;

    let popularity_score = (total_score / POPULARITY_DIVISOR).floor() as u64;
    let listeners_gained =
        ((popularity_score as f64 * LISTENERS_PER_POPULARITY) as u64).max(MIN_LISTENERS_GAINED);
    let initial_cash = (popularity_score as f64 * CASH_PER_POPULARITY) as u64;

    debug!(
        "release score for {}: quality {:.0} + charisma {:.0} + listeners {:.1} + luck {:.1}",
        draft.id, quality_score, charisma_score, listener_bonus, luck
    );

    Ok(Release {
        song: ReleasedSong {
            id: draft.id.clone(),
            name: draft.name.clone(),
            quality: draft.quality,
            released_at: now,
            popularity_score,
            total_earnings: initial_cash,
        },
        listeners_gained,
        initial_cash,
    })
}

/// Apply a release to the player: pay out, grow the audience, archive the
/// song and free the studio.
pub fn commit_release(player: &mut PlayerStats, release: &Release) -> u32 {
    player.cash = player.cash.saturating_add(release.initial_cash);
    player.monthly_listeners = player.monthly_listeners.saturating_add(release.listeners_gained);
    player.discography.push(release.song.clone());
    player.active_production = None;
    info!(
        "released \"{}\": popularity {}, +{} listeners, {}",
        release.song.name,
        release.song.popularity_score,
        release.listeners_gained,
        format_cash(release.initial_cash)
    );
    add_experience(player, release.song.quality as u64)
}

// ── Royalties ─────────────────────────────────────────────────────────

/// Linear decay from 1.0 at release to the floor after 48 hours.
pub fn decay_factor(age_ms: u64) -> f64 {
    let age_hours = age_ms as f64 / MS_PER_HOUR as f64;
    (1.0 - age_hours / DECAY_WINDOW_HOURS).max(DECAY_FLOOR)
}

/// Royalty income the discography earns at `now`.
///
/// Songs released after `now` are not earning yet.
pub fn calculate_passive_income(discography: &[ReleasedSong], now: u64) -> u64 {
    let total: f64 = discography
        .iter()
        .filter(|song| song.released_at <= now)
        .map(|song| {
            song.popularity_score as f64 * ROYALTY_RATE * decay_factor(now - song.released_at)
        })
        .sum();
    total.floor() as u64
}

/// Credit royalties for every whole interval since the last collection.
///
/// Each interval pays [`calculate_passive_income`] evaluated at its end.
/// Calling again with the same `now` credits nothing.
pub fn collect_passive_income(player: &mut PlayerStats, now: u64, tuning: &Tuning) -> u64 {
    let since = player.last_royalty_collected_at;
    let (count, consumed) = whole_intervals(
        since,
        now,
        tuning.royalty_interval_ms,
        tuning.max_offline_intervals,
    );
    if count == 0 {
        return 0;
    }
    let end = since + consumed;
    let income: u64 = (0..count as u64)
        .map(|i| calculate_passive_income(&player.discography, end - i * tuning.royalty_interval_ms))
        .sum();

    player.last_royalty_collected_at = end;
    player.cash = player.cash.saturating_add(income);
    if income > 0 {
        info!("royalties: {} over {} interval(s)", format_cash(income), count);
    }
    income
}

// ── Concerts ──────────────────────────────────────────────────────────

/// Concert payout, with the ±10% variance drawn from `rng`.
pub fn calculate_concert_revenue<R: Rng + ?Sized>(
    performance_score: f64,
    city: CityId,
    player: &PlayerStats,
    rng: &mut R,
) -> Result<u64> {
    let variance = rng.gen_range(CONCERT_VARIANCE_MIN..CONCERT_VARIANCE_MAX);
    concert_revenue_with_variance(performance_score, city, player, variance)
}

/// [`calculate_concert_revenue`] with the variance multiplier supplied directly.
pub fn concert_revenue_with_variance(
    performance_score: f64,
    city: CityId,
    player: &PlayerStats,
    variance: f64,
) -> Result<u64> {
    ensure_percent("performance score", performance_score)?;
    ensure_non_negative("charisma", player.charisma)?;
    if !(CONCERT_VARIANCE_MIN..=CONCERT_VARIANCE_MAX).contains(&variance) {
        return Err(Error::InvalidInput(format!(
            "variance must be within {CONCERT_VARIANCE_MIN}..={CONCERT_VARIANCE_MAX}, got {variance}"
        )));
    }

    let info = city_info(city);
    let tier = info.tier as f64;
    let performance_mult = 0.5 + performance_score / 100.0;
    let fans = (player.monthly_listeners as f64).max(10.0);
    let fan_multiplier = 1.0 + fans.log10() * 0.1 * tier;
    let skill_bonus = player.charisma * 10.0 * tier;

    let hard_cap = info.base_pay * CONCERT_CAP_MULTIPLIER;
    let income = (info.base_pay * performance_mult * fan_multiplier + skill_bonus).min(hard_cap);
    Ok((income * variance).floor() as u64)
}

/// What a played concert paid out.
#[derive(Clone, Debug, PartialEq)]
pub struct ConcertReport {
    pub city: CityId,
    pub revenue: u64,
    pub xp_gained: u64,
    pub levels_gained: u32,
}

/// Experience for a concert: half the score plus ten per tier.
pub fn concert_xp(performance_score: f64, tier: u32) -> u64 {
    (performance_score / 2.0).floor() as u64 + 10 * tier as u64
}

/// Play a concert: check the level gate and energy, pay out and grant xp.
pub fn perform_concert<R: Rng + ?Sized>(
    player: &mut PlayerStats,
    city: CityId,
    performance_score: f64,
    rng: &mut R,
    tuning: &Tuning,
) -> Result<ConcertReport> {
    let info = city_info(city);
    if player.level < info.min_level {
        return Err(Error::Locked {
            city: info.name,
            level: info.min_level,
        });
    }
    if player.energy < tuning.concert_energy_cost {
        return Err(Error::InsufficientEnergy {
            needed: tuning.concert_energy_cost,
            available: player.energy,
        });
    }
    let revenue = calculate_concert_revenue(performance_score, city, player, rng)?;

    player.energy -= tuning.concert_energy_cost;
    player.cash = player.cash.saturating_add(revenue);
    let xp_gained = concert_xp(performance_score, info.tier);
    let levels_gained = add_experience(player, xp_gained);
    info!(
        "concert in {}: score {:.0}, {}",
        info.name,
        performance_score,
        format_cash(revenue)
    );
    Ok(ConcertReport {
        city,
        revenue,
        xp_gained,
        levels_gained,
    })
}

// ── Weekly upkeep ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct WeeklyReport {
    pub rent: u64,
    pub paid: u64,
    pub evicted: bool,
    pub listeners_lost: u64,
    pub energy_recovered: f64,
}

/// Charge the current city's weekly cost and rest. Failing to pay drains
/// cash to zero, skips the rest and costs fans, energy, charisma and manager
/// goodwill.
pub fn pay_weekly_expenses(player: &mut PlayerStats) -> WeeklyReport {
    let info = city_info(player.city_id);
    let rent = info.weekly_cost;

    if player.cash >= rent {
        player.cash -= rent;
        let before = player.energy;
        player.energy = (player.energy + WEEKLY_ENERGY_RECOVERY).min(STAT_CAP);
        debug!("weekly upkeep in {}: {}", info.name, format_cash(rent));
        return WeeklyReport {
            rent,
            paid: rent,
            evicted: false,
            listeners_lost: 0,
            energy_recovered: player.energy - before,
        };
    }

    let paid = player.cash;
    player.cash = 0;
    let listeners_lost = (player.monthly_listeners as f64 * EVICTION_LISTENER_LOSS) as u64;
    player.monthly_listeners -= listeners_lost;
    player.energy = (player.energy - EVICTION_ENERGY_LOSS).max(0.0);
    player.charisma = (player.charisma - EVICTION_CHARISMA_LOSS).max(0.0);
    player.manager_relationship = (player.manager_relationship - EVICTION_MANAGER_LOSS).max(0.0);
    warn!(
        "rent of {} in {} not covered: lost {} listeners",
        format_cash(rent),
        info.name,
        listeners_lost
    );
    WeeklyReport {
        rent,
        paid,
        evicted: true,
        listeners_lost,
        energy_recovered: 0.0,
    }
}

// ── Leveling ──────────────────────────────────────────────────────────

/// XP needed to go from `level` to `level + 1`.
pub fn xp_for_level(level: u32) -> u64 {
    (100.0 * (level.max(1) as f64).powf(1.5)).floor() as u64
}

/// Add xp and level up as many times as it covers. Returns levels gained.
pub fn add_experience(player: &mut PlayerStats, xp: u64) -> u32 {
    player.xp = player.xp.saturating_add(xp);
    let mut gained = 0;
    loop {
        let need = xp_for_level(player.level);
        if player.xp < need {
            break;
        }
        player.xp -= need;
        player.level += 1;
        gained += 1;
    }
    if gained > 0 {
        info!("level up → {}", player.level);
    }
    gained
}

/// Best city the player's level allows.
pub fn best_unlocked_city(player: &PlayerStats) -> CityId {
    super::state::ALL_CITIES
        .iter()
        .copied()
        .filter(|&c| city_info(c).min_level <= player.level)
        .last()
        .unwrap_or_default()
}

/// Relocate; the new city's weekly cost applies from the next upkeep.
pub fn move_to_city(player: &mut PlayerStats, city: CityId) -> Result<()> {
    let info = city_info(city);
    if player.level < info.min_level {
        return Err(Error::Locked {
            city: info.name,
            level: info.min_level,
        });
    }
    player.city_id = city;
    info!("moved to {}", info.name);
    Ok(())
}

// ── Formatting ────────────────────────────────────────────────────────

/// `$1,234,567`
pub fn format_cash(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
