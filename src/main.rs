//! Tap Run Bat headless demo
//!
//! Plays a number of autopilot runs and logs a summary of each.
//! Usage: `tap-run-bat [seed] [runs] [tuning.json]`
//!
//! `TAP_RUN_BAT_STORE` names a JSON file keeping the best score between
//! invocations; `TAP_RUN_BAT_SETTINGS` names a settings file.

use std::process::ExitCode;

use tap_run_bat::audio::{AudioManager, LogSink};
use tap_run_bat::persistence::{JsonFileStore, KeyValueStore, MemoryStore};
use tap_run_bat::sim::GameEvent;
use tap_run_bat::{Session, Settings, Tuning};

/// Give up on a run after ten simulated minutes
const MAX_RUN_TICKS: u64 = 60 * 60 * 10;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        None => 42,
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("Invalid seed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let runs = match args.next().map(|s| s.parse::<u32>()) {
        None => 5,
        Some(Ok(runs)) => runs,
        Some(Err(e)) => {
            log::error!("Invalid run count: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let tuning = match args.next() {
        None => Tuning::default(),
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Could not load tuning from {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
    };

    let settings = match std::env::var("TAP_RUN_BAT_SETTINGS") {
        Ok(path) => Settings::load(path),
        Err(_) => Settings::default(),
    };

    log::info!("Tap Run Bat starting (seed {}, {} runs)", seed, runs);

    match std::env::var("TAP_RUN_BAT_STORE") {
        Ok(path) => {
            log::info!("Best score kept in {}", path);
            play(Session::new(tuning, seed, JsonFileStore::new(path)), &settings, runs)
        }
        Err(_) => play(Session::new(tuning, seed, MemoryStore::new()), &settings, runs),
    }

    ExitCode::SUCCESS
}

fn play<S: KeyValueStore>(session: Session<S>, settings: &Settings, runs: u32) {
    let audio = AudioManager::new(Box::new(LogSink), settings);
    let mut session = session.with_audio(audio);
    session.set_autopilot(true);

    for run in 1..=runs {
        let start = session.state().time_ticks;
        let summary = loop {
            let over = session.tick().into_iter().find_map(|e| match e {
                GameEvent::GameOver { score, best, medal } => Some((score, best, medal)),
                _ => None,
            });
            if over.is_some() {
                break over;
            }
            if session.state().time_ticks - start > MAX_RUN_TICKS {
                break None;
            }
        };

        let ticks = session.state().time_ticks - start;
        match summary {
            Some((score, best, medal)) => log::info!(
                "Run {}: score {} best {} medal {} ({} ticks)",
                run,
                score,
                best,
                medal,
                ticks
            ),
            None => {
                log::warn!("Run {} still alive after {} ticks, stopping", run, ticks);
                break;
            }
        }
    }

    log::info!("Final best {}", session.score().best);
}
