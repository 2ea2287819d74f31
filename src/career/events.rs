//! Career notifications pushed to subscribers.
//!
//! A UI subscribes once and drains its receiver whenever it redraws; the
//! session never calls back into it.

use std::sync::mpsc::{channel, Receiver, Sender};

use super::state::{CityId, ProductionPhase};

#[derive(Clone, Debug, PartialEq)]
pub enum CareerEvent {
    ProductionStarted { id: String, name: String },
    TakeRecorded { id: String, quality: u8 },
    MixingStarted { id: String, finish_time: u64 },
    MixingBoosted { id: String, price: u64 },
    MixingFinished { id: String },
    SongReleased {
        id: String,
        popularity_score: u64,
        listeners_gained: u64,
        cash: u64,
    },
    RoyaltiesCollected { amount: u64 },
    ConcertPlayed { city: CityId, revenue: u64 },
    RentPaid { amount: u64 },
    Evicted { listeners_lost: u64 },
    Moved { city: CityId },
    LevelUp { level: u32 },
}

impl CareerEvent {
    /// Production phase this event leaves the studio in, if it changes it.
    pub fn phase_after(&self) -> Option<ProductionPhase> {
        match self {
            CareerEvent::ProductionStarted { .. } => Some(ProductionPhase::Recording),
            CareerEvent::MixingStarted { .. } => Some(ProductionPhase::Mixing),
            CareerEvent::MixingBoosted { .. } | CareerEvent::MixingFinished { .. } => {
                Some(ProductionPhase::Ready)
            }
            CareerEvent::SongReleased { .. } => Some(ProductionPhase::Idle),
            _ => None,
        }
    }
}

/// Fan-out of [`CareerEvent`]s over mpsc channels.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Sender<CareerEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<CareerEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Send to every live subscriber; drop the ones whose receiver is gone.
    pub fn publish(&mut self, event: CareerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
