//! Flowify player record, production records and static tables.

use serde::{Deserialize, Serialize};

use crate::time::MS_PER_HOUR;

// ── Production ────────────────────────────────────────────────────────

/// Mixing phase length (2 hours).
pub const MIXING_TIME_MS: u64 = 2 * MS_PER_HOUR;

/// Cash price of skipping the rest of the mixing timer.
pub const BOOST_PRICE: u64 = 250;

/// Share of the current audience a fresh draft could reach.
pub const POTENTIAL_LISTENER_SHARE: f64 = 0.10;

pub const MAX_QUALITY: u8 = 100;

// ── Release ───────────────────────────────────────────────────────────

pub const QUALITY_WEIGHT: f64 = 50.0;
pub const CHARISMA_WEIGHT: f64 = 20.0;
pub const LISTENER_WEIGHT: f64 = 2.0;
/// Upper bound (exclusive) of the luck term.
pub const LUCK_RANGE: f64 = 800.0;
pub const POPULARITY_DIVISOR: f64 = 10.0;
pub const LISTENERS_PER_POPULARITY: f64 = 5.0;
pub const CASH_PER_POPULARITY: f64 = 25.0;
/// Every release gains at least this many listeners.
pub const MIN_LISTENERS_GAINED: u64 = 500;

// ── Royalties ─────────────────────────────────────────────────────────

pub const ROYALTY_RATE: f64 = 0.015;
/// Hours for the decay factor to fall from 1.0 to the floor.
pub const DECAY_WINDOW_HOURS: f64 = 48.0;
pub const DECAY_FLOOR: f64 = 0.05;
pub const ROYALTY_INTERVAL_MS: u64 = MS_PER_HOUR;
pub const MAX_OFFLINE_INTERVALS: u32 = 48;

// ── Concerts ──────────────────────────────────────────────────────────

pub const CONCERT_CAP_MULTIPLIER: f64 = 5.0;
pub const CONCERT_VARIANCE_MIN: f64 = 0.9;
pub const CONCERT_VARIANCE_MAX: f64 = 1.1;
pub const CONCERT_ENERGY_COST: f64 = 20.0;

// ── Upkeep penalties (rent not paid) ─────────────────────────────────

pub const EVICTION_LISTENER_LOSS: f64 = 0.10;
pub const EVICTION_ENERGY_LOSS: f64 = 20.0;
pub const EVICTION_CHARISMA_LOSS: f64 = 5.0;
pub const EVICTION_MANAGER_LOSS: f64 = 15.0;

pub const STAT_CAP: f64 = 100.0;

/// Energy regained by resting at the end of a week with rent paid.
pub const WEEKLY_ENERGY_RECOVERY: f64 = 30.0;

// ── Cities ────────────────────────────────────────────────────────────

/// Venue locations, ordered by tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CityId {
    #[default]
    Hometown,
    Atlanta,
    LosAngeles,
    NewYork,
    Tokyo,
}

pub const ALL_CITIES: [CityId; 5] = [
    CityId::Hometown,
    CityId::Atlanta,
    CityId::LosAngeles,
    CityId::NewYork,
    CityId::Tokyo,
];

/// Static info about a city: concert pay and weekly upkeep scale with tier.
pub struct CityInfo {
    pub name: &'static str,
    pub tier: u32,
    pub base_pay: f64,
    pub weekly_cost: u64,
    pub min_level: u32,
}

pub fn city_info(id: CityId) -> CityInfo {
    match id {
        CityId::Hometown => CityInfo {
            name: "Hometown",
            tier: 1,
            base_pay: 500.0,
            weekly_cost: 100,
            min_level: 1,
        },
        CityId::Atlanta => CityInfo {
            name: "Atlanta",
            tier: 2,
            base_pay: 1_500.0,
            weekly_cost: 300,
            min_level: 3,
        },
        CityId::LosAngeles => CityInfo {
            name: "Los Angeles",
            tier: 3,
            base_pay: 4_000.0,
            weekly_cost: 800,
            min_level: 6,
        },
        CityId::NewYork => CityInfo {
            name: "New York",
            tier: 4,
            base_pay: 10_000.0,
            weekly_cost: 2_000,
            min_level: 10,
        },
        CityId::Tokyo => CityInfo {
            name: "Tokyo",
            tier: 5,
            base_pay: 25_000.0,
            weekly_cost: 5_000,
            min_level: 15,
        },
    }
}

// ── Records ───────────────────────────────────────────────────────────

/// An in-progress song. `finish_time == 0` means the recording phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDraft {
    pub id: String,
    pub name: String,
    pub quality: u8,
    pub start_time: u64,
    pub finish_time: u64,
    pub potential_listeners: u64,
}

impl SongDraft {
    pub fn is_recording(&self) -> bool {
        self.finish_time == 0
    }
}

/// A song in the discography. Never changes after release.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasedSong {
    pub id: String,
    pub name: String,
    pub quality: u8,
    pub released_at: u64,
    pub popularity_score: u64,
    pub total_earnings: u64,
}

/// Where a player's production pipeline currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductionPhase {
    Idle,
    Recording,
    Mixing,
    Ready,
}

/// Result of polling the mixing timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MixingStatus {
    Mixing,
    Ready,
}

/// Player record as persisted under `users/{uid}/stats`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStats {
    pub rhythm: f64,
    pub flow: f64,
    pub lyrics: f64,
    pub charisma: f64,

    pub monthly_listeners: u64,
    pub cash: u64,
    pub energy: f64,
    pub manager_relationship: f64,

    pub xp: u64,
    pub level: u32,

    pub city_id: CityId,

    pub active_production: Option<SongDraft>,
    pub discography: Vec<ReleasedSong>,
    pub last_royalty_collected_at: u64,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerStats {
    pub fn new() -> Self {
        Self {
            rhythm: 10.0,
            flow: 10.0,
            lyrics: 10.0,
            charisma: 10.0,
            monthly_listeners: 100,
            cash: 1_000,
            energy: STAT_CAP,
            manager_relationship: 50.0,
            xp: 0,
            level: 1,
            city_id: CityId::Hometown,
            active_production: None,
            discography: Vec::new(),
            last_royalty_collected_at: 0,
        }
    }

    /// Sum of the three craft skills used by the quality formula.
    pub fn skill_total(&self) -> f64 {
        self.rhythm + self.flow + self.lyrics
    }

    pub fn total_song_earnings(&self) -> u64 {
        self.discography.iter().map(|s| s.total_earnings).sum()
    }
}
