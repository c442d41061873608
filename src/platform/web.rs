//! Browser host
//!
//! Wraps a `Session` for JavaScript: key events in, fixed-step ticks driven
//! from `requestAnimationFrame` timestamps, JSON snapshots and events out.
//! Tuning and the leaderboard cache persist in LocalStorage.

use wasm_bindgen::prelude::*;

use super::KeyState;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::highscores::HighScores;
use crate::session::Session;
use crate::sim::TickEvents;
use crate::tuning::Tuning;

const TUNING_KEY: &str = "asteroid_siege_tuning";

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Load tuning from LocalStorage, falling back to defaults
fn load_tuning() -> Tuning {
    if let Some(json) = storage().and_then(|s| s.get_item(TUNING_KEY).ok().flatten()) {
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from LocalStorage");
                return tuning;
            }
            Err(err) => log::warn!("Ignoring stored tuning: {}", err),
        }
    }
    log::info!("Using default tuning");
    Tuning::default()
}

/// Load the cached leaderboard from LocalStorage
fn load_high_scores() -> Option<HighScores> {
    let json = storage()?.get_item(HighScores::STORAGE_KEY).ok()??;
    serde_json::from_str(&json).ok()
}

fn save_high_scores(scores: &HighScores) {
    if let (Some(storage), Ok(json)) = (storage(), serde_json::to_string(scores)) {
        let _ = storage.set_item(HighScores::STORAGE_KEY, &json);
        log::info!("High scores saved ({} entries)", scores.entries.len());
    }
}

/// Game instance driven by the page
#[wasm_bindgen]
pub struct WebGame {
    session: Session,
    keys: KeyState,
    accumulator: f32,
    last_time: f64,
    /// Everything raised by the substeps of the last frame
    frame_events: TickEvents,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<WebGame, JsValue> {
        let mut session = match Session::new(load_tuning(), seed) {
            Ok(session) => session,
            Err(err) => {
                log::warn!("Stored tuning rejected ({}), using defaults", err);
                Session::new(Tuning::default(), seed).map_err(to_js)?
            }
        };
        if let Some(scores) = load_high_scores() {
            session.apply_high_score_fetch(Ok(scores.entries));
        }
        Ok(Self {
            session,
            keys: KeyState::new(),
            accumulator: 0.0,
            last_time: 0.0,
            frame_events: TickEvents::default(),
        })
    }

    /// Returns true if the key is a game control (so the page can preventDefault)
    pub fn key_down(&mut self, code: &str) -> bool {
        self.keys.apply_key(code, true)
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.keys.apply_key(code, false)
    }

    /// Window lost focus: release keys and pause
    pub fn blur(&mut self) {
        self.keys.release_all();
        self.session.pause();
    }

    /// Run as many fixed ticks as the elapsed time allows
    pub fn frame(&mut self, time_ms: f64) {
        let dt = if self.last_time > 0.0 {
            ((time_ms - self.last_time) / 1000.0) as f32
        } else {
            SIM_DT
        };
        self.last_time = time_ms;
        self.accumulator += dt.clamp(0.0, 0.1);
        self.frame_events.clear();

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.keys.poll();
            let events = self.session.tick(&input);
            self.frame_events.events.extend(events.events.iter().cloned());
            self.frame_events.sounds.extend(events.sounds.iter().copied());
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    pub fn start(&mut self) {
        self.session.start();
        self.accumulator = 0.0;
    }

    pub fn pause(&mut self) {
        self.session.pause();
    }

    pub fn resume(&mut self) {
        self.session.resume();
        self.accumulator = 0.0;
    }

    pub fn reset(&mut self, seed: u64) {
        self.session.reset_with_seed(seed);
        self.keys.release_all();
        self.accumulator = 0.0;
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        self.session.snapshot_json().map_err(to_js)
    }

    /// Events and sound cues from the last `frame` call
    pub fn events_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.frame_events).map_err(to_js)
    }

    pub fn high_scores_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.high_scores()).map_err(to_js)
    }

    /// Hand over a `GET /api/highscores` body. Returns false if it was unusable.
    pub fn set_high_scores_json(&mut self, body: &str) -> bool {
        let applied = self
            .session
            .apply_high_score_fetch(HighScores::parse_list_response(body));
        if applied {
            save_high_scores(self.session.high_scores());
        }
        applied
    }

    /// Body for `POST /api/highscores`; rejects bad initials
    pub fn submit_request_json(&self, initials: &str, timestamp: &str) -> Result<String, JsValue> {
        let request = self.session.submit_request(initials, timestamp).map_err(to_js)?;
        serde_json::to_string(&request).map_err(to_js)
    }

    /// Hand over a `POST /api/highscores` body. An error carries the message to show.
    pub fn apply_submit_json(&mut self, body: &str) -> Result<(), JsValue> {
        self.session
            .apply_high_score_submit(HighScores::parse_submit_response(body))
            .map_err(|message| JsValue::from_str(&message))?;
        save_high_scores(self.session.high_scores());
        Ok(())
    }
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Asteroid Siege starting...");
}
