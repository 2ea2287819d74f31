//! Flowify — rap-career simulation core.
//!
//! Song production (record → mix → release), royalty decay, concerts and
//! weekly upkeep. Everything here is synchronous and free of I/O apart from
//! the save stores; the UI and the hosted database sit outside this crate.

pub mod career;
pub mod config;
pub mod error;
pub mod time;

pub use career::CareerSession;
pub use config::Tuning;
pub use error::{Error, Result};
