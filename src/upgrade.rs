//! Upgrade controller: spends experience on stat upgrades

use std::fmt;

use crate::economy::{Economy, Shortfall, Stat};

/// Stat increase per upgrade
pub const UPGRADE_STEP: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeError {
    InsufficientExperience { cost: u64, balance: u64 },
}

impl fmt::Display for UpgradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpgradeError::InsufficientExperience { cost, balance } => {
                write!(f, "insufficient experience: need {}, have {}", cost, balance)
            }
        }
    }
}

impl std::error::Error for UpgradeError {}

impl From<Shortfall> for UpgradeError {
    fn from(s: Shortfall) -> Self {
        UpgradeError::InsufficientExperience {
            cost: s.cost,
            balance: s.balance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upgrade {
    pub stat: Stat,
    pub new_value: u32,
    pub experience_left: u64,
}

/// Upgrade `stat` by [`UPGRADE_STEP`] for `cost` experience
pub fn upgrade_character(economy: &mut Economy, stat: Stat, cost: u64) -> Result<Upgrade, UpgradeError> {
    economy.spend_experience(cost)?;
    let new_value = economy.raise_stat(stat, UPGRADE_STEP);
    log::info!("Upgraded {} to {} for {} XP", stat.as_str(), new_value, cost);
    Ok(Upgrade {
        stat,
        new_value,
        experience_left: economy.experience(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_upgrade_success() {
        let mut economy = Economy::with_balances(0, 0, 500);
        let upgrade = upgrade_character(&mut economy, Stat::JumpPower, 300).unwrap();
        assert_eq!(upgrade.new_value, 110);
        assert_eq!(upgrade.experience_left, 200);
        assert_eq!(economy.stat(Stat::JumpPower), 110);
    }

    #[test]
    fn test_upgrade_rejected() {
        let mut economy = Economy::with_balances(0, 0, 199);
        let before = economy.clone();
        assert_eq!(
            upgrade_character(&mut economy, Stat::Speed, 200),
            Err(UpgradeError::InsufficientExperience {
                cost: 200,
                balance: 199
            })
        );
        assert_eq!(economy, before);
    }

    proptest! {
        #[test]
        fn upgrade_law(xp in 0u64..2000, cost in 0u64..2000, pick in 0usize..3) {
            let stat = Stat::ALL[pick];
            let mut economy = Economy::with_balances(0, 0, xp);
            let before = economy.clone();
            match upgrade_character(&mut economy, stat, cost) {
                Ok(_) => {
                    prop_assert_eq!(economy.experience(), xp - cost);
                    prop_assert_eq!(economy.stat(stat), before.stat(stat) + UPGRADE_STEP);
                    prop_assert_eq!(economy.level(), before.level());
                }
                Err(_) => {
                    prop_assert!(xp < cost);
                    prop_assert_eq!(economy, before);
                }
            }
        }
    }
}
