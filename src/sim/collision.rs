//! Collision and reward resolution
//!
//! Runs after the position update of each tick. Obstacles hit when they are
//! in the collision band and the player fails their height test; pickups are
//! collected when the player is within their height tolerance.

use super::state::{GameEvent, SessionState};
use super::timers::Expiry;
use crate::config::{GameConfig, Role};
use crate::consts::{BAND_MAX, BAND_MIN};
use crate::economy::{Economy, Reward};

/// Whether a position is inside the collision band
#[inline]
pub fn in_band(position: f32) -> bool {
    position > BAND_MIN && position < BAND_MAX
}

/// Whether the player is close enough to a pickup's height to collect it
#[inline]
pub fn within_reach(player_height: f32, pickup_height: f32, tolerance: f32) -> bool {
    (player_height - pickup_height).abs() < tolerance
}

/// Outcome of resolving one tick's collisions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionResult {
    pub hits: u32,
    pub pickups: u32,
}

/// Resolve obstacle hits and pickups for the current positions.
///
/// Stops at the first hit that empties health; game-over resolution runs
/// afterwards in the tick.
pub fn resolve(state: &mut SessionState, config: &GameConfig, economy: &mut Economy, now_ms: u64) -> CollisionResult {
    let mut result = CollisionResult::default();
    let height = state.height(config);

    for (index, spec) in config.entities.iter().enumerate() {
        if state.health == 0 {
            break;
        }
        let position = state.entities[index].position;
        if !in_band(position) {
            continue;
        }

        match &spec.role {
            Role::Obstacle { damage, clear, message } => {
                if !clear.hits(height) || state.invulnerable() {
                    continue;
                }
                state.health = (state.health - damage).max(0);
                state.last_hit_ms = Some(now_ms);
                // Damage resumes strictly after the window
                let reopens_at = now_ms.saturating_add(config.rehit_window_ms).saturating_add(1);
                state.timers.schedule(reopens_at, Expiry::HitWindowClosed);
                log::debug!("Hit {} for {} damage, health {}", spec.name, damage, state.health);
                state.events.push(GameEvent::Damaged {
                    entity: spec.name.clone(),
                    message: message.clone(),
                    damage: *damage,
                    health: state.health,
                });
                result.hits += 1;
            }
            Role::Pickup { height: at, tolerance } => {
                if !within_reach(height, *at, *tolerance) {
                    continue;
                }
                // Recycled at once, so one pass can only pay out once
                let respawn_at = spec.respawn.sample(&mut state.rng);
                state.entities[index].position = respawn_at;
                log::debug!("Collected {}", spec.name);
                state.events.push(GameEvent::PickupCollected {
                    entity: spec.name.clone(),
                });
                if let Some(up) = economy.apply_reward(Reward::PICKUP) {
                    state.events.push(GameEvent::LevelUp { level: up.to });
                }
                result.pickups += 1;
            }
        }
    }

    result
}
