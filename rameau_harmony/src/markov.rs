// Markov progression engine with tonal gravity.
//
// A stateful walk over the scale-degree chord graph. Each step draws the
// next chord from the current position's transition row, reshaped by two
// feedback mechanisms:
//
// - Gravity (0–1) interpolates between three distributions: uniform noise
//   at 0, the empirical base matrix at 0.5, and the strict high-gravity
//   matrix at 1. Low gravity wanders; high gravity pulls hard toward
//   functional resolution.
// - Tension tracks the instability of the chord just sounded. High tension
//   boosts tonic-function targets (resolution), low tension boosts
//   dominant-function targets (build-up). The boost scales with gravity.
//
// All stochastic methods take `rng: &mut impl Rng`; seeding the RNG makes
// generation fully reproducible.

use crate::chords::{self, Cadence, ChordFunction, Degree, Mode};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tension above which tonic-function chords are favored.
const RESOLUTION_THRESHOLD: f64 = 0.7;
/// Tension below which dominant-function chords are favored.
const BUILDUP_THRESHOLD: f64 = 0.3;

/// The progression generator. One instance per generation session; the
/// chord and transition tables it reads are shared static data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkovEngine {
    position: Degree,
    tension: f64,
    history: Vec<Degree>,
    mode: Mode,
    key_offset: u8,
    gravity: f64,
}

impl MarkovEngine {
    pub fn new(mode: Mode) -> Self {
        let tonic = mode.tonic();
        MarkovEngine {
            position: tonic,
            tension: 0.0,
            history: vec![tonic],
            mode,
            key_offset: 0,
            gravity: 0.5,
        }
    }

    /// Switch mode and restart at its tonic with zero tension.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.reset();
    }

    /// Set the key by name ("C", "F#", "Bb", ...). Unknown names map to C.
    pub fn set_key(&mut self, name: &str) {
        self.key_offset = chords::key_pitch_class(name);
    }

    /// Set gravity, clamped to [0, 1].
    pub fn set_gravity(&mut self, value: f64) {
        self.gravity = value.clamp(0.0, 1.0);
    }

    pub fn position(&self) -> Degree {
        self.position
    }

    pub fn tension(&self) -> f64 {
        self.tension
    }

    pub fn history(&self) -> &[Degree] {
        &self.history
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn key_offset(&self) -> u8 {
        self.key_offset
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Next-chord probability distribution from the current position,
    /// indexed by `Degree`. Always sums to 1.
    pub fn distribution(&self) -> [f64; 7] {
        let defs = chords::chords_for(self.mode);
        let base = &chords::transitions_for(self.mode)[self.position.index()];
        let strict = &chords::strict_transitions_for(self.mode)[self.position.index()];
        const UNIFORM: f64 = 1.0 / 7.0;

        let mut probs = [0.0f64; 7];
        let mut total = 0.0;
        for target in Degree::ALL {
            let i = target.index();

            // Three-way interpolation: uniform → base → strict.
            let mut p = if self.gravity <= 0.5 {
                let t = self.gravity * 2.0;
                UNIFORM * (1.0 - t) + base[i] * t
            } else {
                let t = (self.gravity - 0.5) * 2.0;
                base[i] * (1.0 - t) + strict[i] * t
            };

            // Tension feedback, scaled by gravity.
            if self.tension > RESOLUTION_THRESHOLD && defs[i].function == ChordFunction::Tonic {
                p *= 1.0 + self.tension * self.gravity;
            } else if self.tension < BUILDUP_THRESHOLD
                && defs[i].function == ChordFunction::Dominant
            {
                p *= 1.0 + (0.5 - self.tension) * self.gravity;
            }

            probs[i] = p;
            total += p;
        }

        for p in &mut probs {
            *p /= total;
        }
        probs
    }

    /// Draw the next chord from the current distribution. One uniform draw
    /// per call; the tonic is the fall-through for rounding residue.
    pub fn select_next(&self, rng: &mut impl Rng) -> Degree {
        let probs = self.distribution();
        let draw: f64 = rng.random();
        let mut cumulative = 0.0;
        for degree in Degree::ALL {
            cumulative += probs[degree.index()];
            if draw < cumulative {
                return degree;
            }
        }
        self.mode.tonic()
    }

    /// Advance one chord: select, adopt its tension, append to history.
    pub fn step(&mut self, rng: &mut impl Rng) -> Degree {
        let next = self.select_next(rng);
        self.tension = chords::chords_for(self.mode)[next.index()].tension;
        self.position = next;
        self.history.push(next);
        next
    }

    /// Generate a progression of `length` chords.
    ///
    /// `start_with_tonic` restarts position and tension before generating.
    /// With `end_with_cadence`, the last two chords are forced to V → tonic
    /// (an authentic cadence), bypassing the stochastic step.
    pub fn generate_progression(
        &mut self,
        length: usize,
        start_with_tonic: bool,
        end_with_cadence: bool,
        rng: &mut impl Rng,
    ) -> Vec<Degree> {
        let mut progression = Vec::with_capacity(length);

        if start_with_tonic {
            self.position = self.mode.tonic();
            self.tension = 0.0;
        }

        for i in 0..length {
            if end_with_cadence && i + 2 == length {
                self.force(self.mode.dominant(), 0.8);
                progression.push(self.position);
                continue;
            }
            if end_with_cadence && i + 1 == length {
                self.force(self.mode.tonic(), 0.0);
                progression.push(self.position);
                continue;
            }
            progression.push(self.step(rng));
        }

        progression
    }

    /// Place a chord directly, without a stochastic draw. Forced chords
    /// count as visited: they enter the history like stepped ones.
    fn force(&mut self, degree: Degree, tension: f64) {
        self.position = degree;
        self.tension = tension;
        self.history.push(degree);
    }

    /// Classify the last two visited chords as a cadence, if any.
    /// Priority: authentic, plagal, deceptive, half.
    pub fn detect_cadence(&self) -> Option<Cadence> {
        let len = self.history.len();
        if len < 2 {
            return None;
        }
        let prev = self.history[len - 2];
        let last = self.history[len - 1];
        let tonic = self.mode.tonic();

        if prev == Degree::V && last == tonic {
            Some(Cadence::Authentic)
        } else if prev == Degree::IV && last == tonic {
            Some(Cadence::Plagal)
        } else if prev == Degree::V && last == Degree::VI {
            Some(Cadence::Deceptive)
        } else if last == Degree::V {
            Some(Cadence::Half)
        } else {
            None
        }
    }

    /// Return to the tonic with zero tension and a fresh history.
    pub fn reset(&mut self) {
        let tonic = self.mode.tonic();
        self.position = tonic;
        self.tension = 0.0;
        self.history.clear();
        self.history.push(tonic);
    }
}
