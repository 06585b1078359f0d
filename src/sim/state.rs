//! Session state and core simulation types
//!
//! Everything a single play-through mutates lives in [`SessionState`]. It is
//! recreated on every start, while the economy outlives it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::timers::{DelayQueue, Expiry};
use crate::config::{GameConfig, VerticalMode};
use crate::economy::Reward;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// No session started yet
    Idle,
    /// Ticking
    Playing,
    /// Stopped by the player
    Stopped,
    /// Health ran out
    GameOver,
}

/// Player vertical state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum VerticalState {
    /// Continuous height percentage, rising while `flying`
    Flight { height: f32, flying: bool },
    /// On the ground or in a timed jump
    Jump { airborne: bool },
}

impl VerticalState {
    /// Resting state for a control mode
    pub fn rest(mode: &VerticalMode) -> Self {
        match *mode {
            VerticalMode::Hold { min_height, .. } => VerticalState::Flight {
                height: min_height,
                flying: false,
            },
            VerticalMode::Timed { .. } => VerticalState::Jump { airborne: false },
        }
    }

    /// Height used by collision tests
    pub fn height(&self, mode: &VerticalMode) -> f32 {
        match (*self, *mode) {
            (VerticalState::Flight { height, .. }, _) => height,
            (
                VerticalState::Jump { airborne },
                VerticalMode::Timed {
                    ground_height,
                    air_height,
                    ..
                },
            ) => {
                if airborne {
                    air_height
                } else {
                    ground_height
                }
            }
            (VerticalState::Jump { .. }, VerticalMode::Hold { min_height, .. }) => min_height,
        }
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self, VerticalState::Jump { airborne: true })
    }

    pub fn is_flying(&self) -> bool {
        matches!(self, VerticalState::Flight { flying: true, .. })
    }
}

/// A scrolling entity. Index-aligned with `GameConfig::entities`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Horizontal position (percent of screen width)
    pub position: f32,
}

/// Things that happened during a tick or a command, in order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Started { seed: u64 },
    Stopped { score: u64 },
    Damaged {
        entity: String,
        message: String,
        damage: i32,
        health: i32,
    },
    ObstaclePassed { score: u64 },
    PickupCollected { entity: String },
    GameOver { score: u64, reward: Reward },
    LevelUp { level: u32 },
}

/// State of one play-through
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub health: i32,
    pub score: u64,
    pub distance: f32,
    pub vertical: VerticalState,
    pub entities: Vec<Entity>,
    /// Jump landing and re-hit window
    pub timers: DelayQueue,
    /// Simulation tick counter
    pub ticks: u64,
    /// Simulated time of the last tick or start
    pub now_ms: u64,
    pub last_hit_ms: Option<u64>,
    /// Pending events, drained by the owner
    pub events: Vec<GameEvent>,
}

impl SessionState {
    /// A fresh, idle session
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            health: config.start_health,
            score: 0,
            distance: 0.0,
            vertical: VerticalState::rest(&config.vertical),
            entities: config
                .entities
                .iter()
                .map(|spec| Entity { position: spec.start })
                .collect(),
            timers: DelayQueue::new(),
            ticks: 0,
            now_ms: 0,
            last_hit_ms: None,
            events: Vec::new(),
        }
    }

    /// Throw away the previous play-through and start a new one.
    /// Undrained events survive the reset.
    pub fn restart(&mut self, config: &GameConfig, seed: u64, now_ms: u64) {
        let events = std::mem::take(&mut self.events);
        *self = Self::new(config, seed);
        self.events = events;
        self.phase = GamePhase::Playing;
        self.now_ms = now_ms;
        self.events.push(GameEvent::Started { seed });
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn height(&self, config: &GameConfig) -> f32 {
        self.vertical.height(&config.vertical)
    }

    /// Inside the re-hit window
    pub fn invulnerable(&self) -> bool {
        self.timers.is_pending(Expiry::HitWindowClosed)
    }

    /// Hold-to-fly press. Ignored unless playing in flight mode.
    pub fn start_flying(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        match &mut self.vertical {
            VerticalState::Flight { flying, .. } => {
                *flying = true;
                true
            }
            VerticalState::Jump { .. } => false,
        }
    }

    /// Hold-to-fly release. Always accepted.
    pub fn stop_flying(&mut self) {
        if let VerticalState::Flight { flying, .. } = &mut self.vertical {
            *flying = false;
        }
    }

    /// Discrete jump. Arms the landing expiry; ignored while airborne,
    /// over, or not in a timed mode.
    pub fn jump(&mut self, mode: &VerticalMode, at_ms: u64) -> bool {
        let VerticalMode::Timed { jump_ms, .. } = *mode else {
            return false;
        };
        if !self.is_playing() {
            return false;
        }
        match &mut self.vertical {
            VerticalState::Jump { airborne } if !*airborne => {
                *airborne = true;
                self.timers.schedule(at_ms.saturating_add(jump_ms), Expiry::Land);
                true
            }
            _ => false,
        }
    }

    /// Stop ticking without rewards
    pub fn stop(&mut self) {
        if self.is_playing() {
            self.phase = GamePhase::Stopped;
            self.stop_flying();
            self.events.push(GameEvent::Stopped { score: self.score });
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self, config: &GameConfig) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            is_playing: self.is_playing(),
            game_over: self.is_over(),
            health: self.health,
            score: self.score,
            distance: self.distance,
            height: self.height(config),
            flying: self.vertical.is_flying(),
            airborne: self.vertical.is_airborne(),
            last_hit_ms: self.last_hit_ms,
            entities: config
                .entities
                .iter()
                .zip(&self.entities)
                .map(|(spec, entity)| EntitySnapshot {
                    name: spec.name.clone(),
                    position: entity.position,
                })
                .collect(),
            ticks: self.ticks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub name: String,
    pub position: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: GamePhase,
    pub is_playing: bool,
    pub game_over: bool,
    pub health: i32,
    pub score: u64,
    pub distance: f32,
    pub height: f32,
    pub flying: bool,
    pub airborne: bool,
    /// Time of the last damage, for hit flashes
    pub last_hit_ms: Option<u64>,
    pub entities: Vec<EntitySnapshot>,
    pub ticks: u64,
}
