//! Static shop catalog: coin-priced power-ups and experience-priced upgrades

use serde::{Deserialize, Serialize};

use crate::economy::Stat;

/// Which stat a power-up raises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Speed,
    Jump,
    Magnet,
}

impl EffectKind {
    pub fn stat(&self) -> Stat {
        match self {
            EffectKind::Speed => Stat::Speed,
            EffectKind::Jump => Stat::JumpPower,
            EffectKind::Magnet => Stat::MagnetPower,
        }
    }

    /// Stat increase granted by one purchase
    pub fn delta(&self) -> u32 {
        match self {
            EffectKind::Speed => 20,
            EffectKind::Jump => 30,
            EffectKind::Magnet => 50,
        }
    }
}

/// A purchasable power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PowerUp {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: u64,
    /// Icon name understood by the presentation layer
    pub icon: &'static str,
    pub effect: EffectKind,
}

pub const POWER_UPS: [PowerUp; 3] = [
    PowerUp {
        id: "1",
        name: "Speed Boost",
        description: "Run faster: +20% speed",
        cost: 500,
        icon: "Zap",
        effect: EffectKind::Speed,
    },
    PowerUp {
        id: "2",
        name: "Super Jump",
        description: "Jump higher: +30% jump power",
        cost: 700,
        icon: "ArrowUp",
        effect: EffectKind::Jump,
    },
    PowerUp {
        id: "3",
        name: "Magnet",
        description: "Pull cookies closer: +50% magnet power",
        cost: 1000,
        icon: "Magnet",
        effect: EffectKind::Magnet,
    },
];

/// Look up a power-up by id
pub fn power_up(id: &str) -> Option<&'static PowerUp> {
    POWER_UPS.iter().find(|p| p.id == id)
}

/// An experience-priced stat upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpgradeOffer {
    pub stat: Stat,
    pub name: &'static str,
    pub cost: u64,
}

pub const UPGRADE_OFFERS: [UpgradeOffer; 3] = [
    UpgradeOffer {
        stat: Stat::Speed,
        name: "Speed",
        cost: 200,
    },
    UpgradeOffer {
        stat: Stat::JumpPower,
        name: "Jump Power",
        cost: 300,
    },
    UpgradeOffer {
        stat: Stat::MagnetPower,
        name: "Magnet Power",
        cost: 400,
    },
];

pub fn upgrade_offer(stat: Stat) -> &'static UpgradeOffer {
    match stat {
        Stat::Speed => &UPGRADE_OFFERS[0],
        Stat::JumpPower => &UPGRADE_OFFERS[1],
        Stat::MagnetPower => &UPGRADE_OFFERS[2],
    }
}
