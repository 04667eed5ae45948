// SATB voice leading: candidate enumeration, legality, cost minimization.
//
// Converts an abstract chord (degree + inversion) into four concrete MIDI
// pitches, one per vocal part, using the previous voicing as context. The
// search enumerates a bounded set of in-range candidates, filters them by
// classical voice-leading legality (no parallel perfect fifths or octaves,
// no crossing, no overlap), and keeps the candidate with the least total
// motion, lightly pulled toward each part's resonant register.
//
// Legality is a soft preference: when the filter rejects every candidate
// the unfiltered set is used, so a chord is never silently skipped. The
// one hard failure is an empty candidate set, reported as `VoicingError`.
//
// The legality predicate and the cost function are standalone pure
// functions over voicings, independently unit-testable; `VoiceLeader`
// wraps them with the previous-voicing state.

use crate::chords::{self, Degree, Mode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four vocal parts, low to high. Discriminants index voicing arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoicePart {
    Bass = 0,
    Tenor = 1,
    Alto = 2,
    Soprano = 3,
}

impl VoicePart {
    pub const ALL: [VoicePart; 4] = [
        VoicePart::Bass,
        VoicePart::Tenor,
        VoicePart::Alto,
        VoicePart::Soprano,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            VoicePart::Bass => "Bass",
            VoicePart::Tenor => "Tenor",
            VoicePart::Alto => "Alto",
            VoicePart::Soprano => "Soprano",
        }
    }

    /// Inclusive MIDI range. Candidates outside the range are never
    /// considered.
    pub fn range(self) -> (u8, u8) {
        match self {
            VoicePart::Bass => (36, 60),    // C2–C4
            VoicePart::Tenor => (48, 67),   // C3–G4
            VoicePart::Alto => (55, 74),    // G3–D5
            VoicePart::Soprano => (60, 81), // C4–A5
        }
    }

    /// Most resonant register center, the target of the center penalty.
    pub fn center(self) -> u8 {
        match self {
            VoicePart::Bass => 48,    // C3
            VoicePart::Tenor => 57,   // A3
            VoicePart::Alto => 64,    // E4
            VoicePart::Soprano => 72, // C5
        }
    }
}

/// Four MIDI pitches in (bass, tenor, alto, soprano) order.
pub type Voicing = [u8; 4];

/// Voice-leading rule preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Style {
    Baroque,
    Classical,
    Romantic,
    Jazz,
}

impl Style {
    pub fn rules(self) -> StyleRules {
        match self {
            Style::Baroque => StyleRules { strict_parallels: true, resolve_leading_tone: true, max_leap: 8 },
            Style::Classical => StyleRules { strict_parallels: true, resolve_leading_tone: true, max_leap: 10 },
            Style::Romantic => StyleRules { strict_parallels: false, resolve_leading_tone: false, max_leap: 12 },
            Style::Jazz => StyleRules { strict_parallels: false, resolve_leading_tone: false, max_leap: 14 },
        }
    }

    pub fn parse(name: &str) -> Option<Style> {
        match name {
            "baroque" => Some(Style::Baroque),
            "classical" => Some(Style::Classical),
            "romantic" => Some(Style::Romantic),
            "jazz" => Some(Style::Jazz),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Style::Baroque => "baroque",
            Style::Classical => "classical",
            Style::Romantic => "romantic",
            Style::Jazz => "jazz",
        }
    }
}

/// Rule knobs carried by each style preset. `strict_parallels` gates the
/// legality filter; the remaining knobs are part of the preset data and
/// reported alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRules {
    pub strict_parallels: bool,
    pub resolve_leading_tone: bool,
    pub max_leap: u8,
}

/// Weight of the register-center pull relative to voice motion.
pub const CENTER_PENALTY_WEIGHT: f64 = 0.15;

/// How many bass-register octave placements are tried per chord.
const BASS_CHOICES: usize = 2;
/// How many register placements are tried per upper voice.
const UPPER_CHOICES: usize = 4;

/// A chord for which no in-range candidate voicing exists. The previous
/// voicing is kept; the caller must surface this as a blocked progression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoicingError {
    #[error("no voicing available for {label} over bass pitch class {bass_pc}")]
    NoCandidate { label: &'static str, bass_pc: u8 },
}

/// A completed transition: the voicing left behind and the one adopted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoicingChange {
    pub from: Voicing,
    pub to: Voicing,
}

/// Stateful four-voice tracker. Owns the currently sounding voicing and
/// moves it chord by chord.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceLeader {
    voices: Voicing,
    style: Style,
}

impl Default for VoiceLeader {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceLeader {
    /// Starts on a close-position C major chord (C3 E3 G3 C4).
    pub fn new() -> Self {
        VoiceLeader {
            voices: [48, 52, 55, 60],
            style: Style::Classical,
        }
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn style(&self) -> Style {
        self.style
    }

    /// The currently sounding voicing.
    pub fn voices(&self) -> Voicing {
        self.voices
    }

    /// Move to the given chord, selecting the cheapest legal voicing.
    ///
    /// `inversion` picks the bass chord tone: 0 root, 1 third, 2 fifth
    /// (wrapped mod 3). On failure the previous voicing is kept.
    pub fn transition(
        &mut self,
        degree: Degree,
        mode: Mode,
        key_offset: u8,
        inversion: u8,
    ) -> Result<VoicingChange, VoicingError> {
        let chord = &chords::chords_for(mode)[degree.index()];
        let pitch_classes = chord.pitch_classes(key_offset);
        let bass_pc = pitch_classes[(inversion % 3) as usize];

        let candidates = generate_candidates(&pitch_classes, bass_pc);
        let best = find_optimal_voicing(self.voices, &candidates, self.style.rules()).ok_or_else(
            || VoicingError::NoCandidate {
                label: degree.label(mode),
                bass_pc,
            },
        )?;

        let from = self.voices;
        self.voices = best;
        Ok(VoicingChange { from, to: best })
    }

    /// Re-establish a fresh starting voicing on the tonic in root position.
    pub fn reset(&mut self, mode: Mode, key_offset: u8) -> Result<VoicingChange, VoicingError> {
        self.transition(mode.tonic(), mode, key_offset, 0)
    }
}

/// All MIDI pitches of the given pitch classes inside a part's range,
/// ascending.
fn pitches_in_range(pitch_classes: &[u8], part: VoicePart) -> Vec<u8> {
    let (lo, hi) = part.range();
    (lo..=hi).filter(|p| pitch_classes.contains(&(p % 12))).collect()
}

fn take_lowest(mut pitches: Vec<u8>, n: usize) -> Vec<u8> {
    pitches.truncate(n);
    pitches
}

/// Enumerate candidate voicings for a chord over a fixed bass pitch class.
///
/// Bass tries its 2 lowest in-range placements; each upper voice tries its
/// 4 lowest in-range placements drawn from the full chord pitch-class set
/// (any chord tone may be doubled). Combinations must satisfy the strict
/// ordering bass < tenor ≤ alto ≤ soprano. The search is therefore bounded
/// at 2x4x4x4 = 128 raw combinations per chord; candidates are not
/// exhaustive over all octaves.
pub fn generate_candidates(pitch_classes: &[u8; 3], bass_pc: u8) -> Vec<Voicing> {
    let bass_options = take_lowest(pitches_in_range(&[bass_pc], VoicePart::Bass), BASS_CHOICES);
    let tenor_options = take_lowest(pitches_in_range(pitch_classes, VoicePart::Tenor), UPPER_CHOICES);
    let alto_options = take_lowest(pitches_in_range(pitch_classes, VoicePart::Alto), UPPER_CHOICES);
    let soprano_options =
        take_lowest(pitches_in_range(pitch_classes, VoicePart::Soprano), UPPER_CHOICES);

    let mut voicings = Vec::new();
    for &b in &bass_options {
        for &t in &tenor_options {
            for &a in &alto_options {
                for &s in &soprano_options {
                    if b < t && t <= a && a <= s {
                        voicings.push([b, t, a, s]);
                    }
                }
            }
        }
    }
    voicings
}

/// Classical legality of moving from one voicing to the next.
///
/// Illegal if any voice pair moves in parallel (same nonzero direction)
/// while both snapshots form a perfect fifth (7 mod 12) or octave/unison
/// (0 mod 12); if the new voicing breaks strict ordering; or if a voice
/// overlaps an adjacent voice's previous pitch.
pub fn is_legal_transition(from: Voicing, to: Voicing) -> bool {
    // Parallel perfect fifths and octaves.
    for i in 0..3 {
        for j in (i + 1)..4 {
            let before = (from[i] as i16 - from[j] as i16).unsigned_abs() % 12;
            let after = (to[i] as i16 - to[j] as i16).unsigned_abs() % 12;
            if (before == 7 && after == 7) || (before == 0 && after == 0) {
                let dir_i = (to[i] as i16 - from[i] as i16).signum();
                let dir_j = (to[j] as i16 - from[j] as i16).signum();
                if dir_i == dir_j && dir_i != 0 {
                    return false;
                }
            }
        }
    }

    // Strict ordering: bass below tenor, upper voices non-descending.
    if to[0] >= to[1] || to[1] > to[2] || to[2] > to[3] {
        return false;
    }

    // Overlap: no voice passes an adjacent voice's previous pitch.
    for k in 0..3 {
        if to[k] > from[k + 1] || to[k + 1] < from[k] {
            return false;
        }
    }

    true
}

/// Cost of adopting `candidate` after `prev`: total semitone motion plus a
/// weighted pull toward each part's register center. Lower is better.
pub fn voicing_cost(prev: Voicing, candidate: Voicing) -> f64 {
    let mut movement = 0.0;
    let mut center = 0.0;
    for part in VoicePart::ALL {
        let i = part.index();
        movement += (candidate[i] as f64 - prev[i] as f64).abs();
        center += (candidate[i] as f64 - part.center() as f64).abs();
    }
    movement + center * CENTER_PENALTY_WEIGHT
}

/// Pick the cheapest candidate relative to `prev`.
///
/// When the style demands strict parallels the candidates are filtered by
/// `is_legal_transition` first; an empty filtered set falls back to the
/// unfiltered candidates. Ties keep the first candidate seen (strict `<`
/// comparison). Returns `None` only for an empty candidate set.
pub fn find_optimal_voicing(
    prev: Voicing,
    candidates: &[Voicing],
    rules: StyleRules,
) -> Option<Voicing> {
    let legal: Vec<Voicing> = if rules.strict_parallels {
        candidates
            .iter()
            .copied()
            .filter(|&c| is_legal_transition(prev, c))
            .collect()
    } else {
        Vec::new()
    };
    let pool: &[Voicing] = if legal.is_empty() { candidates } else { &legal };

    let mut best: Option<Voicing> = None;
    let mut best_cost = f64::INFINITY;
    for &candidate in pool {
        let cost = voicing_cost(prev, candidate);
        if cost < best_cost {
            best = Some(candidate);
            best_cost = cost;
        }
    }
    best
}
