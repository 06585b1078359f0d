//! Arcade facade
//!
//! The one object the presentation layer talks to. It owns the economy for
//! the lifetime of the process, the session scheduler, and the outbox of
//! notifications waiting to be shown.

use serde::Serialize;

use crate::catalog::{self, PowerUp, UpgradeOffer};
use crate::config::GameConfig;
use crate::economy::{Economy, Stat};
use crate::input::{self, Intent, Signal};
use crate::notify::Notification;
use crate::shop::{self, Purchase, ShopError};
use crate::sim::{GameEvent, Scheduler, SessionSnapshot, SessionState};
use crate::upgrade::{self, Upgrade, UpgradeError};

/// Everything the presentation layer draws in one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub session: SessionSnapshot,
    pub economy: Economy,
    pub level_progress: u64,
    pub stat_progress: [(Stat, u32); 3],
}

pub struct Arcade {
    economy: Economy,
    scheduler: Scheduler,
    outbox: Vec<Notification>,
}

impl Arcade {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_economy(config, seed, Economy::new())
    }

    pub fn with_economy(config: GameConfig, seed: u64, economy: Economy) -> Self {
        Self {
            economy,
            scheduler: Scheduler::new(config, seed),
            outbox: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        self.scheduler.config()
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn session(&self) -> &SessionState {
        self.scheduler.session()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Queue an intent for the next tick boundary
    pub fn submit(&mut self, intent: Intent, now_ms: u64) {
        self.scheduler.submit(intent, now_ms);
    }

    /// Map a raw signal and queue the resulting intent, if any
    pub fn handle_signal(&mut self, signal: &Signal, now_ms: u64) -> Option<Intent> {
        let intent = input::map_signal(&self.config().vertical, signal)?;
        self.submit(intent, now_ms);
        Some(intent)
    }

    /// Run queued commands and due ticks, then turn events into notifications
    pub fn advance(&mut self, now_ms: u64) -> u32 {
        let ticks = self.scheduler.advance(now_ms, &mut self.economy);
        for event in self.scheduler.drain_events() {
            if let GameEvent::LevelUp { level } = event {
                log::info!("Level up: {}", level);
            }
            if let Some(notification) = Notification::from_event(&event) {
                self.outbox.push(notification);
            }
        }
        ticks
    }

    pub fn buy_power_up(&mut self, power_up: &PowerUp) -> Result<Purchase, ShopError> {
        let result = shop::buy_power_up(&mut self.economy, power_up);
        self.notify_purchase(&result);
        result
    }

    /// Buy a catalog power-up by id
    pub fn buy(&mut self, id: &str) -> Result<Purchase, ShopError> {
        let result = shop::buy_by_id(&mut self.economy, id);
        self.notify_purchase(&result);
        result
    }

    fn notify_purchase(&mut self, result: &Result<Purchase, ShopError>) {
        self.outbox.push(match result {
            Ok(purchase) => Notification::purchased(purchase.name),
            Err(ShopError::InsufficientCoins { .. }) => Notification::insufficient_coins(),
            Err(e) => Notification::destructive("Purchase failed", e.to_string()),
        });
    }

    pub fn upgrade_character(&mut self, stat: Stat, cost: u64) -> Result<Upgrade, UpgradeError> {
        let result = upgrade::upgrade_character(&mut self.economy, stat, cost);
        self.outbox.push(match result {
            Ok(_) => Notification::upgraded(),
            Err(_) => Notification::insufficient_experience(),
        });
        result
    }

    /// Upgrade at the catalog price
    pub fn upgrade(&mut self, stat: Stat) -> Result<Upgrade, UpgradeError> {
        let offer: &UpgradeOffer = catalog::upgrade_offer(stat);
        self.upgrade_character(stat, offer.cost)
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            session: self.session().snapshot(self.config()),
            economy: self.economy.clone(),
            level_progress: self.economy.level_progress(),
            stat_progress: Stat::ALL.map(|stat| (stat, self.economy.stat_progress(stat))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::notify::Severity;

    #[test]
    fn test_purchase_notifications() {
        let mut arcade = Arcade::new(GameConfig::default(), 1);
        assert!(arcade.buy("1").is_ok());
        assert!(arcade.buy("2").is_err());
        let toasts = arcade.drain_notifications();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].severity, Severity::Default);
        assert_eq!(toasts[1].title, "Not enough coins");
        assert!(arcade.drain_notifications().is_empty());
    }

    #[test]
    fn test_upgrade_uses_catalog_price() {
        let economy = Economy::with_balances(0, 0, 450);
        let mut arcade = Arcade::with_economy(GameConfig::default(), 1, economy);
        assert!(arcade.upgrade(Stat::MagnetPower).is_ok());
        assert_eq!(arcade.economy().experience(), 50);
        assert!(arcade.upgrade(Stat::Speed).is_err());
        let toasts = arcade.drain_notifications();
        assert_eq!(toasts[1].title, "Not enough experience");
    }

    #[test]
    fn test_signal_routing_depends_on_variant() {
        let mut arcade = Arcade::new(GameConfig::from_variant(Variant::Jump), 1);
        let intent = arcade.handle_signal(&Signal::PointerDown, 0);
        assert_eq!(intent, Some(Intent::Jump));
        assert_eq!(arcade.handle_signal(&Signal::PointerUp, 0), None);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut arcade = Arcade::new(GameConfig::default(), 1);
        arcade.submit(Intent::StartGame, 0);
        arcade.advance(90);
        let json = serde_json::to_string(&arcade.snapshot()).unwrap();
        assert!(json.contains("\"isPlaying\":true"));
        assert!(json.contains("\"coins\":1000"));
    }
}
