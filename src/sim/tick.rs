//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically. Order within a
//! tick is fixed: expiries, vertical update, entity motion and recycling,
//! distance, collisions, then game-over resolution.

use super::collision;
use super::state::{GameEvent, GamePhase, SessionState, VerticalState};
use super::timers::Expiry;
use crate::config::{GameConfig, VerticalMode};
use crate::consts::RECYCLE_THRESHOLD;
use crate::economy::{Economy, Reward};

/// Advance the session by one tick at simulated time `now_ms`.
///
/// Returns false without touching anything if the session is not playing.
pub fn tick(state: &mut SessionState, config: &GameConfig, economy: &mut Economy, now_ms: u64) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }

    state.ticks += 1;
    state.now_ms = now_ms;

    expire_timers(state, now_ms);
    update_vertical(state, &config.vertical);
    advance_entities(state, config);
    state.distance += config.distance_per_tick;

    let collisions = collision::resolve(state, config, economy, now_ms);
    if collisions.hits > 0 || collisions.pickups > 0 {
        log::trace!(
            "Tick {}: {} hit(s), {} pickup(s)",
            state.ticks,
            collisions.hits,
            collisions.pickups
        );
    }
    resolve_game_over(state, economy);
    true
}

fn expire_timers(state: &mut SessionState, now_ms: u64) {
    while let Some(expiry) = state.timers.pop_due(now_ms) {
        match expiry {
            Expiry::Land => {
                if let VerticalState::Jump { airborne } = &mut state.vertical {
                    *airborne = false;
                }
            }
            // Pending-ness is the flag; popping it is enough
            Expiry::HitWindowClosed => {}
        }
    }
}

fn update_vertical(state: &mut SessionState, mode: &VerticalMode) {
    let VerticalMode::Hold {
        min_height,
        max_height,
        rise_per_tick,
        fall_per_tick,
    } = *mode
    else {
        return;
    };
    if let VerticalState::Flight { height, flying } = &mut state.vertical {
        *height = if *flying {
            (*height + rise_per_tick).min(max_height)
        } else {
            (*height - fall_per_tick).max(min_height)
        };
    }
}

fn advance_entities(state: &mut SessionState, config: &GameConfig) {
    for (entity, spec) in state.entities.iter_mut().zip(&config.entities) {
        entity.position -= spec.speed;
        if entity.position < RECYCLE_THRESHOLD {
            entity.position = spec.respawn.sample(&mut state.rng);
            if spec.scores {
                state.score += 1;
                state.events.push(GameEvent::ObstaclePassed { score: state.score });
            }
        }
    }
}

/// Terminal transition: runs once because it leaves the Playing phase
fn resolve_game_over(state: &mut SessionState, economy: &mut Economy) {
    if state.health > 0 || state.phase != GamePhase::Playing {
        return;
    }
    state.health = 0;
    state.phase = GamePhase::GameOver;
    state.stop_flying();

    let reward = Reward::end_of_run(state.score);
    let level_up = economy.apply_reward(reward);
    log::info!("Game over: score {}, distance {:.1}", state.score, state.distance);
    state.events.push(GameEvent::GameOver {
        score: state.score,
        reward,
    });
    if let Some(up) = level_up {
        state.events.push(GameEvent::LevelUp { level: up.to });
    }
}
