//! Game session: the simulation plus its collaborators
//!
//! A `Session` owns one `GameState`, the best-score store and the audio
//! manager. Hosts feed it taps and wall-clock time; it runs fixed steps,
//! drains the event queue after each one and forwards events to storage
//! and audio. Collaborator failures are logged and never reach the game.

use crate::audio::{AudioManager, MusicTrack};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::persistence::{BEST_SCORE_KEY, KeyValueStore};
use crate::sim::{GameEvent, GamePhase, GameState, ScoreState, TickInput, handle_tap, tick};
use crate::tuning::Tuning;

/// Longest frame the accumulator accepts (seconds)
const MAX_FRAME_TIME: f32 = 0.1;

pub struct Session<S: KeyValueStore> {
    state: GameState,
    store: S,
    audio: AudioManager,
    input: TickInput,
    accumulator: f32,
}

impl<S: KeyValueStore> Session<S> {
    /// Create a session in `Ready`, reading the stored best score
    pub fn new(tuning: Tuning, seed: u64, store: S) -> Self {
        let best = match store.best_score() {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Could not read best score, starting from 0: {}", e);
                0
            }
        };
        log::info!("Session created (seed {}, best {})", seed, best);
        Self {
            state: GameState::new(tuning, seed, best),
            store,
            audio: AudioManager::disabled(),
            input: TickInput::default(),
            accumulator: 0.0,
        }
    }

    /// Attach audio and start the background loop
    pub fn with_audio(mut self, audio: AudioManager) -> Self {
        self.audio = audio;
        self.audio.start_music(MusicTrack::Background);
        self
    }

    /// Let the game play itself
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    /// Apply a tap immediately
    pub fn tap(&mut self) -> Vec<GameEvent> {
        handle_tap(&mut self.state);
        self.dispatch()
    }

    /// Run exactly one fixed step
    pub fn tick(&mut self) -> Vec<GameEvent> {
        tick(&mut self.state, &self.input, SIM_DT);
        self.dispatch()
    }

    /// Run as many fixed steps as `elapsed` seconds of wall time cover
    pub fn advance(&mut self, elapsed: f32) -> Vec<GameEvent> {
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_TIME);

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(self.tick());
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        events
    }

    fn dispatch(&mut self) -> Vec<GameEvent> {
        let events = self.state.drain_events();
        for event in &events {
            match event {
                GameEvent::NewBest { best } | GameEvent::GameOver { best, .. } => {
                    self.persist_best(*best);
                }
                _ => {}
            }
            self.audio.on_event(event);
        }
        events
    }

    /// Write `best` unless the store already holds at least as much.
    /// An unreadable store is left untouched.
    fn persist_best(&mut self, best: u32) {
        let stored = match self.store.get_int(BEST_SCORE_KEY) {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("Could not read best score before saving {}: {}", best, e);
                return;
            }
        };
        if stored.is_some_and(|stored| stored >= i64::from(best)) {
            return;
        }
        if let Err(e) = self.store.set_best_score(best) {
            log::warn!("Could not save best score {}: {}", best, e);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct world access for hosts that script scenes (tools, tests)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> ScoreState {
        self.state.score
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
