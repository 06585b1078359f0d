//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, driven by simulated time
//! - Seeded RNG only
//! - Stable iteration order (config entity order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod scheduler;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{CollisionResult, in_band, within_reach};
pub use scheduler::{Command, IntervalHandle, Scheduler, TickClock};
pub use state::{Entity, EntitySnapshot, GameEvent, GamePhase, SessionSnapshot, SessionState, VerticalState};
pub use tick::tick;
pub use timers::{DelayQueue, Expiry};
