//! Flowify career — record, mix and release songs, tour, pay the rent.

pub mod events;
pub mod logic;
pub mod production;
pub mod save;
pub mod simulator;
pub mod state;

use std::sync::mpsc::Receiver;

use log::debug;
use rand::Rng;

use crate::config::Tuning;
use crate::error::{Error, Result};
use crate::time::{format_remaining, Clock};

use events::{CareerEvent, EventBus};
use logic::{ConcertReport, Release, WeeklyReport};
use state::{CityId, MixingStatus, PlayerStats, ProductionPhase, SongDraft};

/// One player's career, driven by explicit caller actions.
///
/// The session owns the player record and reads time from `C`. Callers
/// persist `player()` whenever they like; every change is also announced on
/// the event bus.
pub struct CareerSession<C: Clock> {
    player: PlayerStats,
    tuning: Tuning,
    clock: C,
    events: EventBus,
    /// Draft id whose `MixingFinished` was already published.
    announced_ready: Option<String>,
}

impl<C: Clock> CareerSession<C> {
    /// A zero `last_royalty_collected_at` (fresh or migrated v1 record)
    /// starts the royalty clock at the session's `now`.
    pub fn new(mut player: PlayerStats, tuning: Tuning, clock: C) -> Self {
        if player.last_royalty_collected_at == 0 {
            player.last_royalty_collected_at = clock.now_ms();
            debug!("royalty clock starts at {}", player.last_royalty_collected_at);
        }
        Self {
            player,
            tuning,
            clock,
            events: EventBus::new(),
            announced_ready: None,
        }
    }

    pub fn player(&self) -> &PlayerStats {
        &self.player
    }

    pub fn into_player(self) -> PlayerStats {
        self.player
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn subscribe(&mut self) -> Receiver<CareerEvent> {
        self.events.subscribe()
    }

    pub fn phase(&self) -> ProductionPhase {
        production::phase(self.player.active_production.as_ref(), self.clock.now_ms())
    }

    fn active_draft(&self) -> Result<&SongDraft> {
        self.player
            .active_production
            .as_ref()
            .ok_or_else(|| Error::InvalidState("no song in production".into()))
    }

    // ── Production ──

    pub fn start_production(&mut self, name: &str) -> Result<&SongDraft> {
        let draft = production::start_production(name, &self.player, self.clock.now_ms())?;
        self.events.publish(CareerEvent::ProductionStarted {
            id: draft.id.clone(),
            name: draft.name.clone(),
        });
        let draft = self.player.active_production.insert(draft);
        Ok(&*draft)
    }

    pub fn record_take(&mut self, mini_game_score: f64) -> Result<u8> {
        let draft = production::record_take(self.active_draft()?, mini_game_score, &self.player)?;
        let quality = draft.quality;
        self.events.publish(CareerEvent::TakeRecorded {
            id: draft.id.clone(),
            quality,
        });
        self.player.active_production = Some(draft);
        Ok(quality)
    }

    /// Returns when mixing will finish.
    pub fn start_mixing(&mut self) -> Result<u64> {
        let now = self.clock.now_ms();
        let draft = production::start_mixing(self.active_draft()?, now, self.tuning.mixing_time_ms)?;
        let finish_time = draft.finish_time;
        self.events.publish(CareerEvent::MixingStarted {
            id: draft.id.clone(),
            finish_time,
        });
        self.player.active_production = Some(draft);
        Ok(finish_time)
    }

    /// Poll the mixing timer; publishes `MixingFinished` the first time it
    /// reports ready.
    pub fn poll_mixing(&mut self) -> Result<MixingStatus> {
        let draft = self.active_draft()?;
        if draft.is_recording() {
            return Err(Error::InvalidState(format!(
                "\"{}\" has not started mixing",
                draft.name
            )));
        }
        let now = self.clock.now_ms();
        let status = production::check_mixing_status(draft, now);
        if status == MixingStatus::Mixing {
            debug!(
                "{} mixing, {} left",
                draft.id,
                format_remaining(production::mixing_remaining_ms(draft, now))
            );
        }
        if status == MixingStatus::Ready && self.announced_ready.as_deref() != Some(draft.id.as_str()) {
            let id = draft.id.clone();
            self.announced_ready = Some(id.clone());
            self.events.publish(CareerEvent::MixingFinished { id });
        }
        Ok(status)
    }

    /// Pay `boost_price` and finish mixing now.
    pub fn boost_mixing(&mut self) -> Result<()> {
        let now = self.clock.now_ms();
        let draft = self.active_draft()?;
        if !draft.is_recording() && production::check_mixing_status(draft, now) == MixingStatus::Ready {
            return Err(Error::InvalidState(format!(
                "\"{}\" is already mixed",
                draft.name
            )));
        }
        let boosted = production::boost_mixing(draft, now)?;

        let price = self.tuning.boost_price;
        if self.player.cash < price {
            return Err(Error::InsufficientFunds {
                needed: price,
                available: self.player.cash,
            });
        }
        self.player.cash -= price;

        self.announced_ready = Some(boosted.id.clone());
        self.events.publish(CareerEvent::MixingBoosted {
            id: boosted.id.clone(),
            price,
        });
        self.player.active_production = Some(boosted);
        Ok(())
    }

    pub fn release<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Release> {
        let now = self.clock.now_ms();
        let release = logic::release_song(self.active_draft()?, &self.player, rng, now)?;
        let levels = logic::commit_release(&mut self.player, &release);
        self.announced_ready = None;

        self.events.publish(CareerEvent::SongReleased {
            id: release.song.id.clone(),
            popularity_score: release.song.popularity_score,
            listeners_gained: release.listeners_gained,
            cash: release.initial_cash,
        });
        self.publish_level_up(levels);
        Ok(release)
    }

    // ── Economy ──

    pub fn collect_royalties(&mut self) -> u64 {
        let amount = logic::collect_passive_income(&mut self.player, self.clock.now_ms(), &self.tuning);
        if amount > 0 {
            self.events.publish(CareerEvent::RoyaltiesCollected { amount });
        }
        amount
    }

    pub fn perform_concert<R: Rng + ?Sized>(
        &mut self,
        city: CityId,
        performance_score: f64,
        rng: &mut R,
    ) -> Result<ConcertReport> {
        let report = logic::perform_concert(&mut self.player, city, performance_score, rng, &self.tuning)?;
        self.events.publish(CareerEvent::ConcertPlayed {
            city,
            revenue: report.revenue,
        });
        self.publish_level_up(report.levels_gained);
        Ok(report)
    }

    pub fn move_to_city(&mut self, city: CityId) -> Result<()> {
        logic::move_to_city(&mut self.player, city)?;
        self.events.publish(CareerEvent::Moved { city });
        Ok(())
    }

    pub fn end_week(&mut self) -> WeeklyReport {
        let report = logic::pay_weekly_expenses(&mut self.player);
        if report.evicted {
            self.events.publish(CareerEvent::Evicted {
                listeners_lost: report.listeners_lost,
            });
        } else {
            self.events.publish(CareerEvent::RentPaid { amount: report.paid });
        }
        report
    }

    fn publish_level_up(&mut self, levels: u32) {
        if levels > 0 {
            self.events.publish(CareerEvent::LevelUp {
                level: self.player.level,
            });
        }
    }
}
