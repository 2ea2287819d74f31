//! Song production state machine.
//!
//! `Idle → Recording → Mixing → Ready → (released) → Idle`. Each transition
//! takes the current draft and returns the next one; the caller stores it
//! back on the player record. Time comes in as `now` (epoch ms).

use log::{debug, info};

use super::logic::calculate_quality;
use super::state::{
    MixingStatus, PlayerStats, ProductionPhase, SongDraft, POTENTIAL_LISTENER_SHARE,
};
use crate::error::{Error, Result};

/// Open a new draft in the recording phase.
pub fn start_production(name: &str, stats: &PlayerStats, now: u64) -> Result<SongDraft> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("song name must not be blank".into()));
    }
    if let Some(active) = &stats.active_production {
        return Err(Error::InvalidState(format!(
            "\"{}\" is still in production",
            active.name
        )));
    }
    let draft = SongDraft {
        id: format!("song_{}", now),
        name: name.to_string(),
        quality: 0,
        start_time: 0,
        finish_time: 0,
        potential_listeners: (stats.monthly_listeners as f64 * POTENTIAL_LISTENER_SHARE) as u64,
    };
    info!("production started: {} ({})", draft.name, draft.id);
    Ok(draft)
}

/// Store the quality earned by the recording minigame.
///
/// Retakes are allowed while recording; once mixing starts the quality is
/// frozen.
pub fn record_take(draft: &SongDraft, mini_game_score: f64, stats: &PlayerStats) -> Result<SongDraft> {
    if !draft.is_recording() {
        return Err(Error::InvalidState(format!(
            "\"{}\" is already mixing; quality is locked",
            draft.name
        )));
    }
    let quality = calculate_quality(mini_game_score, stats)?;
    debug!("take recorded for {}: score {} → quality {}", draft.id, mini_game_score, quality);
    Ok(SongDraft {
        quality,
        ..draft.clone()
    })
}

/// Leave recording and start the mixing countdown.
pub fn start_mixing(draft: &SongDraft, now: u64, mixing_time_ms: u64) -> Result<SongDraft> {
    if !draft.is_recording() {
        return Err(Error::InvalidState(format!(
            "\"{}\" is already mixing",
            draft.name
        )));
    }
    // finish_time 0 is the recording marker
    let finish_time = now.saturating_add(mixing_time_ms).max(1);
    info!("mixing started: {} (ready at {})", draft.id, finish_time);
    Ok(SongDraft {
        start_time: now,
        finish_time,
        ..draft.clone()
    })
}

/// Poll the mixing timer.
pub fn check_mixing_status(draft: &SongDraft, now: u64) -> MixingStatus {
    if now >= draft.finish_time {
        MixingStatus::Ready
    } else {
        MixingStatus::Mixing
    }
}

/// Finish mixing immediately. Payment is the caller's job.
pub fn boost_mixing(draft: &SongDraft, now: u64) -> Result<SongDraft> {
    if draft.is_recording() {
        return Err(Error::InvalidState(format!(
            "\"{}\" has not started mixing",
            draft.name
        )));
    }
    // finish_time 0 is the recording marker
    let finish_time = now.max(1);
    info!("mixing boosted: {}", draft.id);
    Ok(SongDraft {
        finish_time,
        ..draft.clone()
    })
}

/// Milliseconds left on the mixing timer (0 when ready or still recording).
pub fn mixing_remaining_ms(draft: &SongDraft, now: u64) -> u64 {
    if draft.is_recording() {
        0
    } else {
        draft.finish_time.saturating_sub(now)
    }
}

/// Phase of an optional active draft.
pub fn phase(active: Option<&SongDraft>, now: u64) -> ProductionPhase {
    match active {
        None => ProductionPhase::Idle,
        Some(d) if d.is_recording() => ProductionPhase::Recording,
        Some(d) => match check_mixing_status(d, now) {
            MixingStatus::Mixing => ProductionPhase::Mixing,
            MixingStatus::Ready => ProductionPhase::Ready,
        },
    }
}
