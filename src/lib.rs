//! Cookie Dash - a cookie-collecting arcade runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tick, collisions, session state, scheduler)
//! - `economy`: Currency balances and leveling
//! - `catalog`: Static power-up and upgrade offers
//! - `shop` / `upgrade`: Spending coins and experience
//! - `arcade`: The facade the presentation layer talks to
//! - `config`: Variant presets and JSON overrides
//! - `input` / `notify`: Intent mapping and user-facing toasts
//! - `web`: wasm-bindgen bridge (wasm32 only)

pub mod arcade;
pub mod catalog;
pub mod config;
pub mod economy;
pub mod input;
pub mod notify;
pub mod shop;
pub mod sim;
pub mod upgrade;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use arcade::{Arcade, Snapshot};
pub use config::{ConfigError, GameConfig, Variant};
pub use economy::{Economy, Reward, Stat};
pub use input::{Intent, Signal};
pub use notify::{Notification, Severity};

/// Game configuration constants
pub mod consts {
    /// Visible-zone right edge (percent). Recycled entities never start left of it.
    pub const RIGHT_EDGE: f32 = 90.0;
    /// Entities scrolled below this position are recycled
    pub const RECYCLE_THRESHOLD: f32 = -10.0;

    /// Collision band (exclusive bounds, percent of screen width)
    pub const BAND_MIN: f32 = 5.0;
    pub const BAND_MAX: f32 = 25.0;

    /// Session defaults
    pub const START_HEALTH: i32 = 100;
    pub const REHIT_WINDOW_MS: u64 = 1000;
    pub const DISTANCE_PER_TICK: f32 = 0.1;

    /// Maximum ticks run by a single `advance` call before the backlog is dropped
    pub const MAX_CATCHUP_TICKS: u32 = 64;

    /// Experience needed per level
    pub const XP_PER_LEVEL: u64 = 1000;

    /// Coins granted to a fresh economy
    pub const STARTING_COINS: u64 = 1000;
    /// Stat baseline (percent)
    pub const STAT_BASELINE: u32 = 100;
}
