//! Browser bridge
//!
//! Exposes [`Arcade`] to JavaScript. The page owns rendering and the frame
//! loop; it forwards input and calls `advance`. Snapshots and notifications
//! cross the boundary as JSON.
//!
//! Every `now` argument is milliseconds on the `Date.now()` clock, the same
//! clock used when `now` is omitted. Mixing in `performance.now()` stamps
//! later commands in the far future and stalls the session.

use wasm_bindgen::prelude::*;

use crate::arcade::Arcade;
use crate::config::{GameConfig, Variant};
use crate::economy::Stat;
use crate::input::{Intent, Signal};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier instance
        return;
    }
    log::info!("Cookie Dash starting...");
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `now` on the `Date.now()` clock, defaulting to the current time
fn now_or(now: Option<f64>) -> u64 {
    now.unwrap_or_else(js_sys::Date::now).max(0.0) as u64
}

#[wasm_bindgen]
pub struct WebArcade {
    inner: Arcade,
}

#[wasm_bindgen]
impl WebArcade {
    /// Create an arcade for `variant` ("flight", "jump" or "runner").
    /// A missing seed draws one from the JS RNG.
    #[wasm_bindgen(constructor)]
    pub fn new(variant: &str, seed: Option<f64>) -> Result<WebArcade, JsValue> {
        let variant = Variant::from_str(variant)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown variant '{}'", variant)))?;
        let seed = seed.unwrap_or_else(|| js_sys::Math::random() * u32::MAX as f64) as u64;
        Ok(Self {
            inner: Arcade::new(GameConfig::from_variant(variant), seed),
        })
    }

    /// Create an arcade from a JSON config override
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str, seed: f64) -> Result<WebArcade, JsValue> {
        let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            inner: Arcade::new(config, seed as u64),
        })
    }

    /// Returns true when the page should call `preventDefault`
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, code: &str, repeat: bool, now: Option<f64>) -> bool {
        let signal = Signal::KeyDown {
            code: code.to_string(),
            repeat,
        };
        self.inner.handle_signal(&signal, now_or(now));
        crate::input::claims_signal(&signal)
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, code: &str, now: Option<f64>) -> bool {
        let signal = Signal::KeyUp { code: code.to_string() };
        self.inner.handle_signal(&signal, now_or(now));
        crate::input::claims_signal(&signal)
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, now: Option<f64>) {
        self.inner.handle_signal(&Signal::PointerDown, now_or(now));
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, now: Option<f64>) {
        self.inner.handle_signal(&Signal::PointerUp, now_or(now));
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self, now: Option<f64>) {
        self.inner.handle_signal(&Signal::PointerLeave, now_or(now));
    }

    #[wasm_bindgen(js_name = touchStart)]
    pub fn touch_start(&mut self, now: Option<f64>) {
        self.inner.handle_signal(&Signal::TouchStart, now_or(now));
    }

    #[wasm_bindgen(js_name = touchEnd)]
    pub fn touch_end(&mut self, now: Option<f64>) {
        self.inner.handle_signal(&Signal::TouchEnd, now_or(now));
    }

    #[wasm_bindgen(js_name = startGame)]
    pub fn start_game(&mut self, now: Option<f64>) {
        self.inner.submit(Intent::StartGame, now_or(now));
    }

    #[wasm_bindgen(js_name = stopGame)]
    pub fn stop_game(&mut self, now: Option<f64>) {
        self.inner.submit(Intent::StopGame, now_or(now));
    }

    /// Run everything due up to `now`. Returns the number of ticks run.
    pub fn advance(&mut self, now: Option<f64>) -> u32 {
        self.inner.advance(now_or(now))
    }

    /// Buy a power-up by id. Errors carry the reason as a string.
    pub fn buy(&mut self, id: &str) -> Result<String, JsValue> {
        let purchase = self.inner.buy(id).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(purchase.name.to_string())
    }

    /// Upgrade a stat ("speed", "jumpPower" or "magnetPower") at catalog price
    pub fn upgrade(&mut self, stat: &str) -> Result<u32, JsValue> {
        let stat = Stat::from_str(stat).ok_or_else(|| JsValue::from_str(&format!("Unknown stat '{}'", stat)))?;
        let upgrade = self.inner.upgrade(stat).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(upgrade.new_value)
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        to_js(&self.inner.snapshot())
    }

    #[wasm_bindgen(js_name = drainNotifications)]
    pub fn drain_notifications(&mut self) -> Result<String, JsValue> {
        to_js(&self.inner.drain_notifications())
    }

    #[wasm_bindgen(js_name = powerUps)]
    pub fn power_ups() -> Result<String, JsValue> {
        to_js(&crate::catalog::POWER_UPS)
    }
}
