//! Score bookkeeping and the cosmetic medal tier
//!
//! `best` is loaded from persistence when a session starts; the session
//! writes it back whenever the simulation reports a new best.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Medal shown on the end-of-run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Medal {
    C,
    B,
    A,
    S,
}

impl Medal {
    /// Medal tier for a final score
    pub fn for_score(score: u32) -> Self {
        match score {
            0..=2 => Medal::C,
            3..=9 => Medal::B,
            10..=14 => Medal::A,
            _ => Medal::S,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Medal::C => "C",
            Medal::B => "B",
            Medal::A => "A",
            Medal::S => "S",
        }
    }
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current run score plus the all-time best
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub current: u32,
    pub best: u32,
}

impl ScoreState {
    pub fn with_best(best: u32) -> Self {
        Self { current: 0, best }
    }

    /// Count one obstacle passed. Returns true if `best` grew.
    pub fn record_pass(&mut self) -> bool {
        self.current += 1;
        self.update_best()
    }

    /// Fold the current score into `best`. Returns true if `best` grew.
    pub fn update_best(&mut self) -> bool {
        if self.current > self.best {
            self.best = self.current;
            true
        } else {
            false
        }
    }

    /// Zero the run score; `best` is kept
    pub fn reset(&mut self) {
        self.current = 0;
    }

    /// Medal for the current score (recomputed on every call)
    pub fn medal(&self) -> Medal {
        Medal::for_score(self.current)
    }
}
