//! Cookie Dash entry point
//!
//! The wasm build exposes `cookie_dash::web::WebArcade` to the page. The
//! native binary plays one headless session with a simple autopilot and
//! prints the final snapshot as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use cookie_dash::config::{ClearTest, Role, VerticalMode};
    use cookie_dash::{Arcade, GameConfig, Intent, Variant};

    /// Host frame step (ms)
    const FRAME_MS: u64 = 16;
    /// Longest run before the autopilot stops the session itself
    const MAX_RUN_MS: u64 = 120_000;

    pub struct Options {
        pub config: GameConfig,
        pub seed: u64,
    }

    pub fn parse_args(args: &[String]) -> Result<Options, String> {
        let source = args.get(1).map(String::as_str).unwrap_or("flight");
        let config = if source.ends_with(".json") {
            let json = std::fs::read_to_string(source).map_err(|e| format!("{}: {}", source, e))?;
            GameConfig::from_json(&json).map_err(|e| format!("{}: {}", source, e))?
        } else {
            let variant = Variant::from_str(source).ok_or_else(|| {
                format!("Unknown variant '{}' (expected flight, jump or runner)", source)
            })?;
            GameConfig::from_variant(variant)
        };
        let seed = match args.get(2) {
            Some(s) => s.parse().map_err(|_| format!("Invalid seed '{}'", s))?,
            None => 42,
        };
        Ok(Options { config, seed })
    }

    /// Pick the intent for the current frame, if any
    fn decide(arcade: &Arcade) -> Option<Intent> {
        let config = arcade.config();
        let session = arcade.session();
        let ahead = config
            .entities
            .iter()
            .zip(&session.entities)
            .filter(|(_, e)| e.position > 0.0 && e.position < 40.0)
            .min_by(|a, b| a.1.position.total_cmp(&b.1.position));

        match config.vertical {
            VerticalMode::Hold { .. } => {
                let flying = session.vertical.is_flying();
                let want_up = match ahead.map(|(spec, _)| &spec.role) {
                    Some(Role::Obstacle { clear: ClearTest::HitBelow(h), .. }) => session.height(config) < *h + 5.0,
                    Some(Role::Obstacle { clear: ClearTest::HitAbove(_), .. }) => false,
                    Some(Role::Pickup { height, .. }) => session.height(config) < *height,
                    None => false,
                };
                match (want_up, flying) {
                    (true, false) => Some(Intent::StartFlying),
                    (false, true) => Some(Intent::StopFlying),
                    _ => None,
                }
            }
            VerticalMode::Timed { .. } => {
                let threat = ahead.is_some_and(|(spec, e)| {
                    matches!(spec.role, Role::Obstacle { clear: ClearTest::HitBelow(_), .. })
                        && e.position > 25.0
                        && e.position < 30.0
                });
                (threat && !session.vertical.is_airborne()).then_some(Intent::Jump)
            }
        }
    }

    /// Play one session and return the arcade in its final state
    pub fn run(options: Options) -> Arcade {
        let mut arcade = Arcade::new(options.config, options.seed);
        arcade.submit(Intent::StartGame, 0);

        let mut now = 0;
        loop {
            arcade.advance(now);
            for toast in arcade.drain_notifications() {
                log::info!("{} | {}", toast.title, toast.description);
            }
            if arcade.session().is_over() {
                break;
            }
            if now >= MAX_RUN_MS {
                arcade.submit(Intent::StopGame, now);
                arcade.advance(now);
                break;
            }
            if let Some(intent) = decide(&arcade) {
                arcade.submit(intent, now);
            }
            now += FRAME_MS;
        }
        arcade
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let options = match autopilot::parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: cookie-dash [flight|jump|runner|config.json] [seed]");
            std::process::exit(2);
        }
    };

    log::info!("Cookie Dash (native) starting {} autopilot...", options.config.variant.as_str());
    let arcade = autopilot::run(options);

    match serde_json::to_string_pretty(&arcade.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize snapshot: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is cookie_dash::web::start, this is just to satisfy the compiler
}
