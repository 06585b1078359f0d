//! Shop controller: spends coins on power-ups

use std::fmt;

use crate::catalog::{self, PowerUp};
use crate::economy::{Economy, Shortfall, Stat};

/// Why a purchase was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopError {
    /// No catalog entry with this id
    UnknownPowerUp(String),
    InsufficientCoins { cost: u64, balance: u64 },
}

impl fmt::Display for ShopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopError::UnknownPowerUp(id) => write!(f, "unknown power-up '{}'", id),
            ShopError::InsufficientCoins { cost, balance } => {
                write!(f, "insufficient coins: need {}, have {}", cost, balance)
            }
        }
    }
}

impl std::error::Error for ShopError {}

impl From<Shortfall> for ShopError {
    fn from(s: Shortfall) -> Self {
        ShopError::InsufficientCoins {
            cost: s.cost,
            balance: s.balance,
        }
    }
}

/// A completed purchase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub name: &'static str,
    pub stat: Stat,
    pub new_value: u32,
    pub coins_left: u64,
}

/// Buy a power-up. Rejected purchases leave the economy untouched.
pub fn buy_power_up(economy: &mut Economy, power_up: &PowerUp) -> Result<Purchase, ShopError> {
    economy.spend_coins(power_up.cost)?;
    let stat = power_up.effect.stat();
    let new_value = economy.raise_stat(stat, power_up.effect.delta());
    log::info!(
        "Bought {} for {} coins ({} -> {})",
        power_up.name,
        power_up.cost,
        stat.as_str(),
        new_value
    );
    Ok(Purchase {
        name: power_up.name,
        stat,
        new_value,
        coins_left: economy.coins(),
    })
}

/// Buy a catalog power-up by id
pub fn buy_by_id(economy: &mut Economy, id: &str) -> Result<Purchase, ShopError> {
    let power_up = catalog::power_up(id).ok_or_else(|| ShopError::UnknownPowerUp(id.to_string()))?;
    buy_power_up(economy, power_up)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EffectKind, POWER_UPS};
    use proptest::prelude::*;

    #[test]
    fn test_buy_then_reject() {
        let mut economy = Economy::new();
        let speed = &POWER_UPS[0];
        let jump = &POWER_UPS[1];

        let purchase = buy_power_up(&mut economy, speed).unwrap();
        assert_eq!(purchase.coins_left, 500);
        assert_eq!(economy.stat(Stat::Speed), 120);

        let err = buy_power_up(&mut economy, jump).unwrap_err();
        assert_eq!(
            err,
            ShopError::InsufficientCoins {
                cost: 700,
                balance: 500
            }
        );
        assert_eq!(economy.coins(), 500);
        assert_eq!(economy.stat(Stat::JumpPower), 100);
    }

    #[test]
    fn test_exact_balance_succeeds() {
        let mut economy = Economy::new();
        assert!(buy_by_id(&mut economy, "3").is_ok());
        assert_eq!(economy.coins(), 0);
        assert_eq!(economy.stat(Stat::MagnetPower), 150);
    }

    #[test]
    fn test_unknown_id() {
        let mut economy = Economy::new();
        assert_eq!(
            buy_by_id(&mut economy, "42"),
            Err(ShopError::UnknownPowerUp("42".to_string()))
        );
        assert_eq!(economy, Economy::new());
    }

    fn any_effect() -> impl Strategy<Value = EffectKind> {
        prop_oneof![
            Just(EffectKind::Speed),
            Just(EffectKind::Jump),
            Just(EffectKind::Magnet)
        ]
    }

    proptest! {
        #[test]
        fn purchase_law(coins in 0u64..3000, cost in 0u64..3000, effect in any_effect()) {
            let mut economy = Economy::with_balances(0, coins, 0);
            let before = economy.clone();
            let power_up = PowerUp {
                id: "t",
                name: "Test",
                description: "",
                cost,
                icon: "",
                effect,
            };
            match buy_power_up(&mut economy, &power_up) {
                Ok(_) => {
                    prop_assert!(coins >= cost);
                    prop_assert_eq!(economy.coins(), coins - cost);
                    prop_assert_eq!(
                        economy.stat(effect.stat()),
                        before.stat(effect.stat()) + effect.delta()
                    );
                }
                Err(_) => {
                    prop_assert!(coins < cost);
                    prop_assert_eq!(economy, before);
                }
            }
        }
    }
}
