//! Input intents
//!
//! Raw key, pointer and touch signals are normalized to [`Intent`]s. How a
//! signal maps depends on the variant's control mode: hold-to-fly mirrors
//! press and release, discrete jump only cares about presses.

use serde::{Deserialize, Serialize};

use crate::config::VerticalMode;

/// A normalized user action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    StartGame,
    StopGame,
    StartFlying,
    StopFlying,
    Jump,
}

/// Raw signal from the input-capture layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    KeyDown { code: String, repeat: bool },
    KeyUp { code: String },
    PointerDown,
    PointerUp,
    PointerLeave,
    TouchStart,
    TouchEnd,
}

/// Key that drives the player
pub const ACTION_KEY: &str = "Space";

/// Map a signal to an intent for the given control mode
pub fn map_signal(mode: &VerticalMode, signal: &Signal) -> Option<Intent> {
    match mode {
        VerticalMode::Hold { .. } => match signal {
            Signal::KeyDown { code, .. } if code == ACTION_KEY => Some(Intent::StartFlying),
            Signal::KeyUp { code } if code == ACTION_KEY => Some(Intent::StopFlying),
            Signal::PointerDown | Signal::TouchStart => Some(Intent::StartFlying),
            Signal::PointerUp | Signal::PointerLeave | Signal::TouchEnd => Some(Intent::StopFlying),
            _ => None,
        },
        VerticalMode::Timed { .. } => match signal {
            Signal::KeyDown { code, repeat: false } if code == ACTION_KEY => Some(Intent::Jump),
            Signal::PointerDown | Signal::TouchStart => Some(Intent::Jump),
            _ => None,
        },
    }
}

/// Whether the host should suppress the browser default for this signal
pub fn claims_signal(signal: &Signal) -> bool {
    match signal {
        Signal::KeyDown { code, .. } | Signal::KeyUp { code } => code == ACTION_KEY,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, Variant};

    fn key_down(code: &str, repeat: bool) -> Signal {
        Signal::KeyDown {
            code: code.to_string(),
            repeat,
        }
    }

    #[test]
    fn test_hold_mode_mirrors_press_and_release() {
        let mode = GameConfig::from_variant(Variant::Flight).vertical;
        assert_eq!(map_signal(&mode, &key_down("Space", false)), Some(Intent::StartFlying));
        assert_eq!(map_signal(&mode, &key_down("Space", true)), Some(Intent::StartFlying));
        assert_eq!(
            map_signal(&mode, &Signal::KeyUp { code: "Space".into() }),
            Some(Intent::StopFlying)
        );
        assert_eq!(map_signal(&mode, &Signal::PointerLeave), Some(Intent::StopFlying));
        assert_eq!(map_signal(&mode, &Signal::TouchEnd), Some(Intent::StopFlying));
        assert_eq!(map_signal(&mode, &key_down("KeyA", false)), None);
    }

    #[test]
    fn test_timed_mode_jumps_on_press_only() {
        let mode = GameConfig::from_variant(Variant::Runner).vertical;
        assert_eq!(map_signal(&mode, &key_down("Space", false)), Some(Intent::Jump));
        assert_eq!(map_signal(&mode, &key_down("Space", true)), None);
        assert_eq!(map_signal(&mode, &Signal::KeyUp { code: "Space".into() }), None);
        assert_eq!(map_signal(&mode, &Signal::TouchStart), Some(Intent::Jump));
        assert_eq!(map_signal(&mode, &Signal::PointerUp), None);
    }

    #[test]
    fn test_claims_only_action_key() {
        assert!(claims_signal(&key_down("Space", false)));
        assert!(!claims_signal(&key_down("Enter", false)));
        assert!(!claims_signal(&Signal::PointerDown));
    }
}
