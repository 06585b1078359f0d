//! Tick scheduler
//!
//! Owns the session state machine, the interval handle and the command queue.
//! Intents are stamped with the time they arrived and applied at tick
//! boundaries, so a session plays out the same way no matter how the host
//! batches `advance` calls.

use std::collections::VecDeque;

use super::state::{GameEvent, SessionState};
use super::tick::tick;
use crate::config::GameConfig;
use crate::consts::MAX_CATCHUP_TICKS;
use crate::economy::Economy;
use crate::input::Intent;

/// An armed fixed-interval timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalHandle {
    pub id: u64,
    pub next_due_ms: u64,
}

/// Fixed-interval clock with at most one live handle
#[derive(Debug, Clone)]
pub struct TickClock {
    interval_ms: u64,
    handle: Option<IntervalHandle>,
    next_id: u64,
}

impl TickClock {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            handle: None,
            next_id: 1,
        }
    }

    /// Arm the clock, clearing any live handle first
    pub fn arm(&mut self, now_ms: u64) -> IntervalHandle {
        if let Some(old) = self.handle.take() {
            log::debug!("Clearing interval #{} before re-arming", old.id);
        }
        let handle = IntervalHandle {
            id: self.next_id,
            next_due_ms: now_ms.saturating_add(self.interval_ms),
        };
        self.next_id += 1;
        self.handle = Some(handle);
        handle
    }

    pub fn cancel(&mut self) {
        self.handle = None;
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.handle.map(|h| h.next_due_ms)
    }

    /// Consume the due tick and schedule the next one
    fn fire(&mut self) -> Option<u64> {
        let handle = self.handle.as_mut()?;
        let due = handle.next_due_ms;
        handle.next_due_ms = due.saturating_add(self.interval_ms);
        Some(due)
    }

    /// Drop a backlog: the next tick is one interval after `now_ms`
    fn resync(&mut self, now_ms: u64) {
        if let Some(handle) = self.handle.as_mut() {
            handle.next_due_ms = now_ms.saturating_add(self.interval_ms);
        }
    }
}

/// An intent waiting for the next tick boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub at_ms: u64,
    pub intent: Intent,
}

/// Runs one session at a time on a fixed interval
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: GameConfig,
    clock: TickClock,
    queue: VecDeque<Command>,
    session: SessionState,
    base_seed: u64,
    sessions_started: u64,
    /// Latest time seen, keeps the queue ordered
    clock_ms: u64,
}

impl Scheduler {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let session = SessionState::new(&config, seed);
        Self {
            clock: TickClock::new(config.tick_interval_ms),
            config,
            queue: VecDeque::new(),
            session,
            base_seed: seed,
            sessions_started: 0,
            clock_ms: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Direct access for hosts and tests that script a session
    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    /// Queue an intent. Stamps earlier than the last seen time are moved up
    /// to it so the queue stays in arrival order.
    pub fn submit(&mut self, intent: Intent, at_ms: u64) {
        let at_ms = at_ms.max(self.clock_ms);
        self.clock_ms = at_ms;
        self.queue.push_back(Command { at_ms, intent });
    }

    /// Run every command and tick due up to `now_ms`, in time order.
    /// A command stamped at a tick's time runs before that tick.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, now_ms: u64, economy: &mut Economy) -> u32 {
        self.clock_ms = self.clock_ms.max(now_ms);
        let mut ticks = 0;

        loop {
            let next_command = self.queue.front().map(|c| c.at_ms).filter(|&at| at <= now_ms);
            let next_tick = self.clock.next_due().filter(|&due| due <= now_ms);

            match (next_command, next_tick) {
                (Some(at), Some(due)) if at <= due => self.apply_next_command(),
                (Some(_), None) => self.apply_next_command(),
                (_, Some(_)) => {
                    if ticks == MAX_CATCHUP_TICKS {
                        log::warn!("Dropping tick backlog at {} ms", now_ms);
                        self.clock.resync(now_ms);
                        continue;
                    }
                    let Some(due) = self.clock.fire() else { break };
                    tick(&mut self.session, &self.config, economy, due);
                    ticks += 1;
                    if !self.session.is_playing() {
                        self.clock.cancel();
                    }
                }
                (None, None) => break,
            }
        }

        ticks
    }

    fn apply_next_command(&mut self) {
        let Some(Command { at_ms, intent }) = self.queue.pop_front() else {
            return;
        };
        match intent {
            Intent::StartGame => self.start_session(at_ms),
            Intent::StopGame => {
                self.clock.cancel();
                if self.session.is_playing() {
                    self.session.stop();
                    log::info!("Session stopped at score {}", self.session.score);
                }
            }
            Intent::StartFlying => {
                if !self.session.start_flying() {
                    log::trace!("Ignored start-flying at {} ms", at_ms);
                }
            }
            Intent::StopFlying => self.session.stop_flying(),
            Intent::Jump => {
                if !self.session.jump(&self.config.vertical, at_ms) {
                    log::trace!("Ignored jump at {} ms", at_ms);
                }
            }
        }
    }

    fn start_session(&mut self, at_ms: u64) {
        self.sessions_started += 1;
        let seed = self
            .base_seed
            .wrapping_add(self.sessions_started.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.session.restart(&self.config, seed, at_ms);
        let handle = self.clock.arm(at_ms);
        log::info!(
            "Started {} session #{} (seed {}, interval #{})",
            self.config.variant.as_str(),
            self.sessions_started,
            seed,
            handle.id
        );
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.session.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::sim::GamePhase;

    fn scheduler(variant: Variant) -> (Scheduler, Economy) {
        (Scheduler::new(GameConfig::from_variant(variant), 5), Economy::new())
    }

    #[test]
    fn test_clock_rearm_replaces_handle() {
        let mut clock = TickClock::new(30);
        let first = clock.arm(0);
        let second = clock.arm(10);
        assert_ne!(first.id, second.id);
        assert_eq!(clock.next_due(), Some(40));
        clock.cancel();
        assert!(!clock.is_armed());
    }

    #[test]
    fn test_ticks_start_with_session() {
        let (mut sched, mut economy) = scheduler(Variant::Flight);
        assert_eq!(sched.advance(1000, &mut economy), 0);
        assert!(!sched.clock().is_armed());

        sched.submit(Intent::StartGame, 1000);
        assert_eq!(sched.advance(1000, &mut economy), 0);
        assert!(sched.session().is_playing());
        assert_eq!(sched.advance(1090, &mut economy), 3);
        assert_eq!(sched.session().ticks, 3);
    }

    #[test]
    fn test_stop_cancels_synchronously() {
        let (mut sched, mut economy) = scheduler(Variant::Flight);
        sched.submit(Intent::StartGame, 0);
        sched.advance(300, &mut economy);
        sched.submit(Intent::StopGame, 300);
        sched.advance(300, &mut economy);

        let before: Vec<f32> = sched.session().entities.iter().map(|e| e.position).collect();
        let ticks = sched.session().ticks;
        assert_eq!(sched.advance(10_000, &mut economy), 0);
        let after: Vec<f32> = sched.session().entities.iter().map(|e| e.position).collect();
        assert_eq!(before, after);
        assert_eq!(sched.session().ticks, ticks);
        assert_eq!(sched.session().phase, GamePhase::Stopped);
        assert!(!sched.clock().is_armed());
    }

    #[test]
    fn test_restart_while_running_keeps_single_loop() {
        let (mut sched, mut economy) = scheduler(Variant::Jump);
        sched.submit(Intent::StartGame, 0);
        sched.advance(120, &mut economy);
        sched.submit(Intent::StartGame, 120);
        // One 50 ms loop: 120 -> 170, 220, 270
        assert_eq!(sched.advance(270, &mut economy), 3);
        assert_eq!(sched.session().ticks, 3);
    }

    #[test]
    fn test_command_applies_before_tick_at_same_time() {
        let (mut sched, mut economy) = scheduler(Variant::Jump);
        sched.submit(Intent::StartGame, 0);
        sched.submit(Intent::Jump, 50);
        sched.advance(50, &mut economy);
        assert!(sched.session().vertical.is_airborne());
        // Lands at 50 + 600
        sched.advance(600, &mut economy);
        assert!(sched.session().vertical.is_airborne());
        sched.advance(650, &mut economy);
        assert!(!sched.session().vertical.is_airborne());
    }

    #[test]
    fn test_batched_and_stepped_advance_agree() {
        let run = |step: u64| {
            let (mut sched, mut economy) = scheduler(Variant::Flight);
            sched.submit(Intent::StartGame, 0);
            sched.submit(Intent::StartFlying, 200);
            sched.submit(Intent::StopFlying, 900);
            let mut now = 0;
            while now < 1500 {
                now += step;
                sched.advance(now, &mut economy);
            }
            (sched.session().snapshot(sched.config()), economy)
        };
        assert_eq!(run(10), run(500));
    }

    #[test]
    fn test_stale_stamps_run_at_latest_time() {
        let (mut sched, mut economy) = scheduler(Variant::Jump);
        sched.submit(Intent::StartGame, 0);
        sched.advance(1000, &mut economy);
        // Stamped before the last advance: applied now, not in the past
        sched.submit(Intent::Jump, 10);
        sched.advance(1000, &mut economy);
        assert!(sched.session().vertical.is_airborne());
        // Lands one jump after the clamped stamp
        sched.advance(1550, &mut economy);
        assert!(sched.session().vertical.is_airborne());
        sched.advance(1600, &mut economy);
        assert!(!sched.session().vertical.is_airborne());
    }

    #[test]
    fn test_backlog_is_bounded() {
        let (mut sched, mut economy) = scheduler(Variant::Flight);
        sched.submit(Intent::StartGame, 0);
        let ticks = sched.advance(60_000, &mut economy);
        assert!(ticks <= MAX_CATCHUP_TICKS);
        assert!(sched.clock().next_due().unwrap_or(u64::MAX) > 60_000 || !sched.session().is_playing());
    }

    #[test]
    fn test_game_over_cancels_clock() {
        let (mut sched, mut economy) = scheduler(Variant::Runner);
        sched.submit(Intent::StartGame, 0);
        sched.advance(0, &mut economy);
        sched.session_mut().health = 1;
        sched.session_mut().entities[0].position = 12.0;
        sched.advance(40, &mut economy);
        assert!(sched.session().is_over());
        assert!(!sched.clock().is_armed());
        assert_eq!(sched.advance(5000, &mut economy), 0);
    }

    #[test]
    fn test_sessions_get_distinct_seeds() {
        let (mut sched, mut economy) = scheduler(Variant::Flight);
        sched.submit(Intent::StartGame, 0);
        sched.advance(0, &mut economy);
        let first = sched.session().seed;
        sched.submit(Intent::StartGame, 10);
        sched.advance(10, &mut economy);
        assert_ne!(first, sched.session().seed);
    }
}
