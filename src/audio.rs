//! Sound cue dispatch
//!
//! The simulation never plays audio itself; the session maps game events to
//! cues and hands them to whatever `AudioSink` the host provides. Playback
//! is fire-and-forget: a failing sink is logged and otherwise ignored.

use thiserror::Error;

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Obstacle passed
    Score,
    /// Run ended
    GameOver,
}

impl SoundEffect {
    /// Cue for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ScoreChanged { .. } => Some(SoundEffect::Score),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            _ => None,
        }
    }

    /// Bundled asset the host should play
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEffect::Score => "score.mp3",
            SoundEffect::GameOver => "gameOver.mp3",
        }
    }
}

/// Looping music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    /// Plays for the whole session, endlessly
    Background,
}

impl MusicTrack {
    pub fn asset_name(&self) -> &'static str {
        match self {
            MusicTrack::Background => "bg.mp3",
        }
    }
}

/// Playback failure reported by a sink
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("missing audio asset {0}")]
    MissingAsset(&'static str),
    #[error("audio device unavailable")]
    Unavailable,
}

/// Host audio backend
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
    /// Start `track` looping until the sink is dropped
    fn play_loop(&mut self, track: MusicTrack, volume: f32) -> Result<(), AudioError>;
}

/// Sink that only logs cues (headless runs)
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
        log::trace!("play {} at {:.2}", effect.asset_name(), volume);
        Ok(())
    }

    fn play_loop(&mut self, track: MusicTrack, volume: f32) -> Result<(), AudioError> {
        log::trace!("loop {} at {:.2}", track.asset_name(), volume);
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Option<Box<dyn AudioSink>>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music: Option<MusicTrack>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::disabled()
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>, settings: &Settings) -> Self {
        let mut manager = Self {
            sink: Some(sink),
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            music: None,
        };
        manager.apply_settings(settings);
        manager
    }

    /// No backend: every cue is dropped
    pub fn disabled() -> Self {
        Self {
            sink: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            music: None,
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_music_volume(settings.music_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect; failures are logged and swallowed
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if let Err(e) = sink.play(effect, vol) {
            log::warn!("Sound {:?} failed: {}", effect, e);
        }
    }

    /// Music volume after master and mute
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Track started by `start_music`, if it succeeded
    pub fn music(&self) -> Option<MusicTrack> {
        self.music
    }

    /// Start a looping track; a track already playing is left alone
    pub fn start_music(&mut self, track: MusicTrack) {
        if self.music == Some(track) {
            return;
        }
        let vol = self.effective_music_volume();
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        match sink.play_loop(track, vol) {
            Ok(()) => self.music = Some(track),
            Err(e) => log::warn!("Music {:?} failed: {}", track, e),
        }
    }

    /// Play the cue for an event, if any
    pub fn on_event(&mut self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }
}
