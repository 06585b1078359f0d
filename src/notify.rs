//! Notifications for the toast layer

use serde::Serialize;

use crate::sim::GameEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Default,
    Destructive,
}

/// A user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }

    pub fn purchased(name: &str) -> Self {
        Self::info("Purchased! ✨", format!("{} added to your abilities", name))
    }

    pub fn insufficient_coins() -> Self {
        Self::destructive("Not enough coins", "Play more to earn coins!")
    }

    pub fn upgraded() -> Self {
        Self::info("Upgrade complete! 🎉", "Stat improved")
    }

    pub fn insufficient_experience() -> Self {
        Self::destructive("Not enough experience", "Play more to gain experience!")
    }

    pub fn level_up(level: u32) -> Self {
        Self::info("New level! 🎊", format!("You are now level {}!", level))
    }

    /// Toast for a simulation event, if it gets one
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match event {
            // The fatal hit is reported by the game-over toast
            GameEvent::Damaged { message, health, .. } if *health > 0 => {
                Some(Self::destructive(message.clone(), format!("HP: {}", health)))
            }
            GameEvent::GameOver { score, .. } => {
                Some(Self::info("Game over! 🍪", format!("Score: {}", score)))
            }
            GameEvent::LevelUp { level } => Some(Self::level_up(*level)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::Reward;

    #[test]
    fn test_damage_toast_names_health() {
        let event = GameEvent::Damaged {
            entity: "tree".into(),
            message: "Hit a tree! 🌳".into(),
            damage: 20,
            health: 60,
        };
        let toast = Notification::from_event(&event).unwrap();
        assert_eq!(toast.description, "HP: 60");
        assert_eq!(toast.severity, Severity::Destructive);
    }

    #[test]
    fn test_fatal_hit_has_no_damage_toast() {
        let event = GameEvent::Damaged {
            entity: "tree".into(),
            message: "Hit a tree! 🌳".into(),
            damage: 20,
            health: 0,
        };
        assert!(Notification::from_event(&event).is_none());
        let over = GameEvent::GameOver {
            score: 3,
            reward: Reward::end_of_run(3),
        };
        assert_eq!(Notification::from_event(&over).unwrap().description, "Score: 3");
    }

    #[test]
    fn test_quiet_events() {
        assert!(Notification::from_event(&GameEvent::ObstaclePassed { score: 1 }).is_none());
        assert!(Notification::from_event(&GameEvent::Started { seed: 1 }).is_none());
    }
}
