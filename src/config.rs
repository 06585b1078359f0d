//! Game configuration
//!
//! One simulation core serves every variant; the differences live in a
//! [`GameConfig`] built from a [`Variant`] preset and optionally overridden
//! from JSON.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Game variant presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Hold to fly over trees and under birds
    #[default]
    Flight,
    /// Time jumps over crates
    Jump,
    /// Endless runner with ground hazards
    Runner,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Flight, Variant::Jump, Variant::Runner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Flight => "Flight",
            Variant::Jump => "Jump",
            Variant::Runner => "Runner",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flight" | "fly" => Some(Variant::Flight),
            "jump" => Some(Variant::Jump),
            "runner" | "run" => Some(Variant::Runner),
            _ => None,
        }
    }
}

/// How the player's vertical position is controlled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum VerticalMode {
    /// Height rises while held and decays on release
    Hold {
        min_height: f32,
        max_height: f32,
        rise_per_tick: f32,
        fall_per_tick: f32,
    },
    /// A jump keeps the player airborne for a fixed duration
    Timed {
        jump_ms: u64,
        ground_height: f32,
        air_height: f32,
    },
}

impl VerticalMode {
    /// Height the player starts a session at
    pub fn rest_height(&self) -> f32 {
        match *self {
            VerticalMode::Hold { min_height, .. } => min_height,
            VerticalMode::Timed { ground_height, .. } => ground_height,
        }
    }
}

/// Where a recycled entity reappears
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Respawn {
    Fixed(f32),
    Range { min: f32, max: f32 },
}

impl Respawn {
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        match *self {
            Respawn::Fixed(at) => at,
            Respawn::Range { min, max } if max > min => rng.random_range(min..=max),
            Respawn::Range { min, .. } => min,
        }
    }

    /// Smallest position this respawn can produce
    pub fn lowest(&self) -> f32 {
        match *self {
            Respawn::Fixed(at) => at,
            Respawn::Range { min, .. } => min,
        }
    }
}

/// Height test an obstacle applies to the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearTest {
    /// Ground obstacle: hits a player lower than this
    HitBelow(f32),
    /// Aerial hazard: hits a player higher than this
    HitAbove(f32),
}

impl ClearTest {
    pub fn hits(&self, height: f32) -> bool {
        match *self {
            ClearTest::HitBelow(h) => height < h,
            ClearTest::HitAbove(h) => height > h,
        }
    }
}

/// What touching an entity does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Role {
    Obstacle {
        damage: i32,
        clear: ClearTest,
        /// Notification title shown on a hit
        message: String,
    },
    Pickup {
        height: f32,
        tolerance: f32,
    },
}

/// One scrolling entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    pub name: String,
    /// Position decrement per tick
    pub speed: f32,
    /// Position at session start
    pub start: f32,
    pub respawn: Respawn,
    pub role: Role,
    /// Recycling this entity counts as a passed obstacle
    #[serde(default)]
    pub scores: bool,
}

impl EntitySpec {
    fn obstacle(name: &str, speed: f32, start: f32, respawn: Respawn, damage: i32, clear: ClearTest, message: &str) -> Self {
        Self {
            name: name.to_string(),
            speed,
            start,
            respawn,
            role: Role::Obstacle {
                damage,
                clear,
                message: message.to_string(),
            },
            scores: false,
        }
    }

    fn pickup(name: &str, speed: f32, start: f32, respawn: Respawn, height: f32, tolerance: f32) -> Self {
        Self {
            name: name.to_string(),
            speed,
            start,
            respawn,
            role: Role::Pickup { height, tolerance },
            scores: false,
        }
    }

    fn scoring(mut self) -> Self {
        self.scores = true;
        self
    }
}

/// Configuration problems
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "config parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Simulation parameters for one variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub variant: Variant,
    pub tick_interval_ms: u64,
    pub distance_per_tick: f32,
    pub start_health: i32,
    /// Minimum time between two damage applications
    pub rehit_window_ms: u64,
    pub vertical: VerticalMode,
    /// Scrolling entities, in collision order
    pub entities: Vec<EntitySpec>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_variant(Variant::default())
    }
}

impl GameConfig {
    /// Build the preset for a variant
    pub fn from_variant(variant: Variant) -> Self {
        match variant {
            Variant::Flight => Self {
                variant,
                tick_interval_ms: 30,
                distance_per_tick: DISTANCE_PER_TICK,
                start_health: START_HEALTH,
                rehit_window_ms: REHIT_WINDOW_MS,
                vertical: VerticalMode::Hold {
                    min_height: 20.0,
                    max_height: 70.0,
                    rise_per_tick: 2.0,
                    fall_per_tick: 1.5,
                },
                entities: vec![
                    EntitySpec::obstacle(
                        "tree",
                        1.2,
                        100.0,
                        Respawn::Range { min: 100.0, max: 150.0 },
                        20,
                        ClearTest::HitBelow(35.0),
                        "Hit a tree! 🌳",
                    )
                    .scoring(),
                    EntitySpec::obstacle(
                        "bird",
                        1.3,
                        180.0,
                        Respawn::Range { min: 100.0, max: 180.0 },
                        15,
                        ClearTest::HitAbove(40.0),
                        "Crashed into a bird! 🦅",
                    ),
                    EntitySpec::pickup("cookie", 1.1, 150.0, Respawn::Range { min: 120.0, max: 180.0 }, 40.0, 20.0),
                ],
            },
            Variant::Jump => Self {
                variant,
                tick_interval_ms: 50,
                distance_per_tick: DISTANCE_PER_TICK,
                start_health: START_HEALTH,
                rehit_window_ms: REHIT_WINDOW_MS,
                vertical: VerticalMode::Timed {
                    jump_ms: 600,
                    ground_height: 20.0,
                    air_height: 50.0,
                },
                entities: vec![
                    EntitySpec::obstacle(
                        "crate",
                        2.0,
                        100.0,
                        Respawn::Fixed(100.0),
                        20,
                        ClearTest::HitBelow(35.0),
                        "Tripped over a crate! 📦",
                    )
                    .scoring(),
                    EntitySpec::pickup("cookie", 1.5, 140.0, Respawn::Range { min: 110.0, max: 160.0 }, 45.0, 15.0),
                ],
            },
            Variant::Runner => Self {
                variant,
                tick_interval_ms: 40,
                distance_per_tick: DISTANCE_PER_TICK,
                start_health: START_HEALTH,
                rehit_window_ms: REHIT_WINDOW_MS,
                vertical: VerticalMode::Timed {
                    jump_ms: 500,
                    ground_height: 20.0,
                    air_height: 50.0,
                },
                entities: vec![
                    EntitySpec::obstacle(
                        "spikes",
                        2.0,
                        100.0,
                        Respawn::Range { min: 100.0, max: 140.0 },
                        25,
                        ClearTest::HitBelow(35.0),
                        "Ran into spikes! 🌵",
                    )
                    .scoring(),
                    EntitySpec::obstacle(
                        "rock",
                        2.0,
                        165.0,
                        Respawn::Range { min: 150.0, max: 190.0 },
                        25,
                        ClearTest::HitBelow(35.0),
                        "Stumbled on a rock! 🪨",
                    ),
                    EntitySpec::pickup("cookie", 2.0, 125.0, Respawn::Range { min: 120.0, max: 170.0 }, 20.0, 15.0),
                ],
            },
        }
    }

    /// Parse a full config from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".into()));
        }
        if self.start_health <= 0 {
            return Err(ConfigError::Invalid("start_health must be positive".into()));
        }
        if self.entities.is_empty() {
            return Err(ConfigError::Invalid("at least one entity is required".into()));
        }
        ensure_finite("distance_per_tick", self.distance_per_tick)?;
        match self.vertical {
            VerticalMode::Hold {
                min_height,
                max_height,
                rise_per_tick,
                fall_per_tick,
            } => {
                ensure_finite("min_height", min_height)?;
                ensure_finite("max_height", max_height)?;
                ensure_finite("rise_per_tick", rise_per_tick)?;
                ensure_finite("fall_per_tick", fall_per_tick)?;
                if min_height > max_height {
                    return Err(ConfigError::Invalid("min_height exceeds max_height".into()));
                }
            }
            VerticalMode::Timed {
                ground_height,
                air_height,
                ..
            } => {
                ensure_finite("ground_height", ground_height)?;
                ensure_finite("air_height", air_height)?;
            }
        }
        for spec in &self.entities {
            ensure_finite(&format!("{}.speed", spec.name), spec.speed)?;
            ensure_finite(&format!("{}.start", spec.name), spec.start)?;
            match spec.respawn {
                Respawn::Fixed(at) => ensure_finite(&format!("{}.respawn", spec.name), at)?,
                Respawn::Range { min, max } => {
                    ensure_finite(&format!("{}.respawn.min", spec.name), min)?;
                    ensure_finite(&format!("{}.respawn.max", spec.name), max)?;
                }
            }
            match spec.role {
                Role::Pickup { height, tolerance } => {
                    ensure_finite(&format!("{}.height", spec.name), height)?;
                    ensure_finite(&format!("{}.tolerance", spec.name), tolerance)?;
                }
                Role::Obstacle {
                    clear: ClearTest::HitBelow(h) | ClearTest::HitAbove(h),
                    ..
                } => ensure_finite(&format!("{}.clear", spec.name), h)?,
            }
            if spec.speed <= 0.0 {
                return Err(ConfigError::Invalid(format!("{}: speed must be positive", spec.name)));
            }
            if spec.respawn.lowest() < RIGHT_EDGE {
                return Err(ConfigError::Invalid(format!(
                    "{}: respawn must be at or beyond {}",
                    spec.name, RIGHT_EDGE
                )));
            }
            if let Respawn::Range { min, max } = spec.respawn {
                if min > max {
                    return Err(ConfigError::Invalid(format!("{}: respawn min exceeds max", spec.name)));
                }
            }
            if let Role::Obstacle { damage, .. } = spec.role {
                if damage < 0 {
                    return Err(ConfigError::Invalid(format!("{}: damage must not be negative", spec.name)));
                }
            }
        }
        Ok(())
    }
}

/// JSON numbers beyond the f32 range parse as infinity
fn ensure_finite(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{} must be finite, got {}", field, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_presets_are_valid() {
        for variant in Variant::ALL {
            let config = GameConfig::from_variant(variant);
            assert!(config.validate().is_ok(), "{} preset invalid", variant.as_str());
            assert_eq!(config.variant, variant);
        }
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!(Variant::from_str("FLIGHT"), Some(Variant::Flight));
        assert_eq!(Variant::from_str("run"), Some(Variant::Runner));
        assert_eq!(Variant::from_str("swim"), None);
    }

    #[test]
    fn test_json_roundtrip_preserves_preset() {
        let config = GameConfig::from_variant(Variant::Runner);
        let json = config.to_json().unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_respawn_inside_visible_zone() {
        let mut config = GameConfig::from_variant(Variant::Jump);
        config.entities[0].respawn = Respawn::Range { min: 50.0, max: 120.0 };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_out_of_range_floats_from_json() {
        let json = GameConfig::from_variant(Variant::Jump).to_json().unwrap();
        assert!(json.contains("\"max\": 160.0"));
        let json = json.replace("\"max\": 160.0", "\"max\": 1e39");
        match GameConfig::from_json(&json) {
            Err(ConfigError::Invalid(msg)) => assert!(msg.contains("cookie.respawn.max"), "{}", msg),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_finite_fields() {
        let mut config = GameConfig::from_variant(Variant::Flight);
        config.entities[2].role = Role::Pickup {
            height: 40.0,
            tolerance: f32::INFINITY,
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = GameConfig::from_variant(Variant::Flight);
        config.entities[0].speed = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = GameConfig::from_variant(Variant::Flight);
        config.vertical = VerticalMode::Hold {
            min_height: 20.0,
            max_height: f32::INFINITY,
            rise_per_tick: 2.0,
            fall_per_tick: 1.5,
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_interval_and_bad_json() {
        let mut config = GameConfig::default();
        config.tick_interval_ms = 0;
        assert!(config.validate().is_err());
        assert!(matches!(GameConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_respawn_sample_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let respawn = Respawn::Range { min: 100.0, max: 150.0 };
        for _ in 0..500 {
            let at = respawn.sample(&mut rng);
            assert!((100.0..=150.0).contains(&at));
        }
        assert_eq!(Respawn::Fixed(120.0).sample(&mut rng), 120.0);
    }

    #[test]
    fn test_clear_tests() {
        assert!(ClearTest::HitBelow(35.0).hits(20.0));
        assert!(!ClearTest::HitBelow(35.0).hits(35.0));
        assert!(ClearTest::HitAbove(40.0).hits(41.0));
        assert!(!ClearTest::HitAbove(40.0).hits(40.0));
    }
}
