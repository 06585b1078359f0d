//! Economy model: currencies, stats and derived level
//!
//! Lives for the whole process, across sessions. Balances only move through
//! the methods here so the level and non-negativity invariants hold.

use serde::{Deserialize, Serialize};

use crate::consts::{STARTING_COINS, STAT_BASELINE, XP_PER_LEVEL};

/// Character stats that power-ups and upgrades raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stat {
    Speed,
    JumpPower,
    MagnetPower,
}

impl Stat {
    pub const ALL: [Stat; 3] = [Stat::Speed, Stat::JumpPower, Stat::MagnetPower];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Speed => "speed",
            Stat::JumpPower => "jumpPower",
            Stat::MagnetPower => "magnetPower",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "speed" => Some(Stat::Speed),
            "jumppower" | "jump_power" | "jump" => Some(Stat::JumpPower),
            "magnetpower" | "magnet_power" | "magnet" => Some(Stat::MagnetPower),
            _ => None,
        }
    }
}

/// A bundle of currency gains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reward {
    pub cookies: u64,
    pub experience: u64,
    pub coins: u64,
}

impl Reward {
    /// Granted for every collected pickup
    pub const PICKUP: Reward = Reward {
        cookies: 1,
        experience: 5,
        coins: 3,
    };

    /// Granted once when a session ends in game over
    pub fn end_of_run(score: u64) -> Self {
        Self {
            cookies: score,
            experience: score.saturating_mul(10),
            coins: score.saturating_mul(5),
        }
    }
}

/// Level change reported by the level watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub from: u32,
    pub to: u32,
}

/// Level derived from total experience
pub fn level_for_experience(experience: u64) -> u32 {
    u32::try_from(experience / XP_PER_LEVEL)
        .unwrap_or(u32::MAX - 1)
        .saturating_add(1)
}

/// Requested spend exceeded the available balance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    pub cost: u64,
    pub balance: u64,
}

/// Currency balances and character stats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Economy {
    cookies: u64,
    coins: u64,
    experience: u64,
    level: u32,
    speed: u32,
    jump_power: u32,
    magnet_power: u32,
}

impl Default for Economy {
    fn default() -> Self {
        Self::with_balances(0, STARTING_COINS, 0)
    }
}

impl Economy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Economy with the given balances and baseline stats
    pub fn with_balances(cookies: u64, coins: u64, experience: u64) -> Self {
        Self {
            cookies,
            coins,
            experience,
            level: level_for_experience(experience),
            speed: STAT_BASELINE,
            jump_power: STAT_BASELINE,
            magnet_power: STAT_BASELINE,
        }
    }

    pub fn cookies(&self) -> u64 {
        self.cookies
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    pub fn experience(&self) -> u64 {
        self.experience
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn stat(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Speed => self.speed,
            Stat::JumpPower => self.jump_power,
            Stat::MagnetPower => self.magnet_power,
        }
    }

    fn stat_mut(&mut self, stat: Stat) -> &mut u32 {
        match stat {
            Stat::Speed => &mut self.speed,
            Stat::JumpPower => &mut self.jump_power,
            Stat::MagnetPower => &mut self.magnet_power,
        }
    }

    /// Progress bar value for a stat (0-99)
    pub fn stat_progress(&self, stat: Stat) -> u32 {
        self.stat(stat) % 100
    }

    /// Experience collected towards the next level (0-999)
    pub fn level_progress(&self) -> u64 {
        self.experience % XP_PER_LEVEL
    }

    /// Add currencies, then run the level watcher
    pub fn apply_reward(&mut self, reward: Reward) -> Option<LevelUp> {
        self.cookies = self.cookies.saturating_add(reward.cookies);
        self.coins = self.coins.saturating_add(reward.coins);
        self.experience = self.experience.saturating_add(reward.experience);
        if reward.experience > 0 {
            self.sync_level()
        } else {
            None
        }
    }

    /// Take `cost` coins, or nothing at all
    pub fn spend_coins(&mut self, cost: u64) -> Result<(), Shortfall> {
        if self.coins < cost {
            return Err(Shortfall {
                cost,
                balance: self.coins,
            });
        }
        self.coins -= cost;
        Ok(())
    }

    /// Take `cost` experience, or nothing at all. Level is kept.
    pub fn spend_experience(&mut self, cost: u64) -> Result<(), Shortfall> {
        if self.experience < cost {
            return Err(Shortfall {
                cost,
                balance: self.experience,
            });
        }
        self.experience -= cost;
        self.sync_level();
        Ok(())
    }

    /// Raise a stat, returning its new value
    pub fn raise_stat(&mut self, stat: Stat, delta: u32) -> u32 {
        let value = self.stat_mut(stat);
        *value = value.saturating_add(delta);
        *value
    }

    /// Level watcher: jumps straight to the derived level, never lowers it
    fn sync_level(&mut self) -> Option<LevelUp> {
        let derived = level_for_experience(self.experience);
        if derived > self.level {
            let from = self.level;
            self.level = derived;
            Some(LevelUp { from, to: derived })
        } else {
            None
        }
    }
}
