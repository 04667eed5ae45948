// Scale-degree chord tables and transition matrices.
//
// Tonal harmony in this crate is expressed in functional terms: each of the
// seven diatonic chords of a key carries a harmonic function (tonic,
// subdominant, dominant) and a tension value, and moves to other chords
// according to empirical transition probabilities. Two modes are supported:
// major and harmonic minor. Harmonic minor always uses a major V chord
// (raised leading tone); this is a fixed modal rule, not a parameter.
//
// This module provides:
// - Chord definitions per mode (function, quality, tension, triad intervals)
// - Base and strict transition matrices (row-stochastic, indexed by Degree)
// - Key-name and note-name utilities
// - The Cadence classification enum
//
// All tables are static read-only data shared by every engine session.
// Used by markov.rs for progression generation and voice_leading.rs for
// pitch-class lookup.

use serde::{Deserialize, Serialize};

/// Tonal mode of a progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Major scale harmony: I ii iii IV V vi viio.
    Major,
    /// Harmonic minor harmony: i iio III iv V VI viio. The raised seventh
    /// degree makes V major and viio diminished, as in common practice.
    HarmonicMinor,
}

impl Mode {
    /// The tonic chord of this mode ("I" in major, "i" in minor).
    pub fn tonic(self) -> Degree {
        Degree::I
    }

    /// The dominant chord: V in both modes.
    pub fn dominant(self) -> Degree {
        Degree::V
    }
}

/// The seven diatonic scale-degree chords of a key.
///
/// This is the key type for every chord and transition table: lookups
/// cannot fail and matches over the chord space are exhaustive. `ALL` is
/// the table-defined order used for distribution walks and cumulative
/// sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Degree {
    I = 0,
    II = 1,
    III = 2,
    IV = 3,
    V = 4,
    VI = 5,
    VII = 6,
}

impl Degree {
    pub const ALL: [Degree; 7] = [
        Degree::I,
        Degree::II,
        Degree::III,
        Degree::IV,
        Degree::V,
        Degree::VI,
        Degree::VII,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Roman-numeral label of this degree in the given mode. Case encodes
    /// quality, `o` marks diminished chords.
    pub fn label(self, mode: Mode) -> &'static str {
        match mode {
            Mode::Major => match self {
                Degree::I => "I",
                Degree::II => "ii",
                Degree::III => "iii",
                Degree::IV => "IV",
                Degree::V => "V",
                Degree::VI => "vi",
                Degree::VII => "viio",
            },
            Mode::HarmonicMinor => match self {
                Degree::I => "i",
                Degree::II => "iio",
                Degree::III => "III",
                Degree::IV => "iv",
                Degree::V => "V",
                Degree::VI => "VI",
                Degree::VII => "viio",
            },
        }
    }

    /// Parse a Roman-numeral label in the given mode. Exact match only.
    pub fn parse(label: &str, mode: Mode) -> Option<Degree> {
        Degree::ALL.into_iter().find(|d| d.label(mode) == label)
    }
}

/// Harmonic function of a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChordFunction {
    /// Stable, at rest.
    Tonic,
    /// Pre-dominant, moving away from rest.
    Subdominant,
    /// Tension-bearing, seeking resolution.
    Dominant,
}

/// Triad quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    Major,
    Minor,
    Diminished,
}

/// Definition of one scale-degree chord: its function, tension, and triad
/// intervals in semitones above the tonic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChordDef {
    pub function: ChordFunction,
    pub quality: Quality,
    /// Harmonic instability in [0, 1]; feeds back into next-chord selection.
    pub tension: f64,
    pub root: u8,
    pub third: u8,
    pub fifth: u8,
}

impl ChordDef {
    /// The chord's three pitch classes transposed into a key.
    pub fn pitch_classes(&self, key_offset: u8) -> [u8; 3] {
        [
            (self.root + key_offset) % 12,
            (self.third + key_offset) % 12,
            (self.fifth + key_offset) % 12,
        ]
    }
}

/// Row-stochastic transition table: `matrix[source][target]`, rows indexed
/// by `Degree`, each row summing to 1.
pub type TransitionMatrix = [[f64; 7]; 7];

static CHORDS_MAJOR: [ChordDef; 7] = [
    // I
    ChordDef { function: ChordFunction::Tonic, quality: Quality::Major, tension: 0.0, root: 0, third: 4, fifth: 7 },
    // ii
    ChordDef { function: ChordFunction::Subdominant, quality: Quality::Minor, tension: 0.5, root: 2, third: 5, fifth: 9 },
    // iii
    ChordDef { function: ChordFunction::Tonic, quality: Quality::Minor, tension: 0.3, root: 4, third: 7, fifth: 11 },
    // IV
    ChordDef { function: ChordFunction::Subdominant, quality: Quality::Major, tension: 0.4, root: 5, third: 9, fifth: 0 },
    // V
    ChordDef { function: ChordFunction::Dominant, quality: Quality::Major, tension: 0.8, root: 7, third: 11, fifth: 2 },
    // vi
    ChordDef { function: ChordFunction::Tonic, quality: Quality::Minor, tension: 0.2, root: 9, third: 0, fifth: 4 },
    // viio
    ChordDef { function: ChordFunction::Dominant, quality: Quality::Diminished, tension: 0.85, root: 11, third: 2, fifth: 5 },
];

static CHORDS_MINOR: [ChordDef; 7] = [
    // i
    ChordDef { function: ChordFunction::Tonic, quality: Quality::Minor, tension: 0.0, root: 0, third: 3, fifth: 7 },
    // iio
    ChordDef { function: ChordFunction::Subdominant, quality: Quality::Diminished, tension: 0.55, root: 2, third: 5, fifth: 8 },
    // III
    ChordDef { function: ChordFunction::Tonic, quality: Quality::Major, tension: 0.3, root: 3, third: 7, fifth: 10 },
    // iv
    ChordDef { function: ChordFunction::Subdominant, quality: Quality::Minor, tension: 0.45, root: 5, third: 8, fifth: 0 },
    // V is major despite the mode: the raised leading tone.
    ChordDef { function: ChordFunction::Dominant, quality: Quality::Major, tension: 0.8, root: 7, third: 11, fifth: 2 },
    // VI
    ChordDef { function: ChordFunction::Tonic, quality: Quality::Major, tension: 0.25, root: 8, third: 0, fifth: 3 },
    // viio
    ChordDef { function: ChordFunction::Dominant, quality: Quality::Diminished, tension: 0.85, root: 11, third: 2, fifth: 5 },
];

// Empirical transition probabilities, major mode. Columns follow
// Degree::ALL order: I ii iii IV V vi viio.
static TRANSITIONS_MAJOR: TransitionMatrix = [
    [0.05, 0.15, 0.05, 0.25, 0.30, 0.15, 0.05], // I
    [0.05, 0.05, 0.02, 0.08, 0.60, 0.05, 0.15], // ii
    [0.10, 0.05, 0.02, 0.30, 0.10, 0.40, 0.03], // iii
    [0.15, 0.10, 0.02, 0.05, 0.50, 0.05, 0.13], // IV
    [0.70, 0.02, 0.02, 0.05, 0.05, 0.14, 0.02], // V
    [0.10, 0.25, 0.05, 0.30, 0.20, 0.05, 0.05], // vi
    [0.80, 0.02, 0.05, 0.02, 0.03, 0.05, 0.03], // viio
];

// Empirical transition probabilities, harmonic minor.
static TRANSITIONS_MINOR: TransitionMatrix = [
    [0.05, 0.12, 0.08, 0.25, 0.30, 0.15, 0.05], // i
    [0.05, 0.03, 0.02, 0.10, 0.60, 0.05, 0.15], // iio
    [0.12, 0.05, 0.03, 0.25, 0.10, 0.40, 0.05], // III
    [0.10, 0.08, 0.02, 0.05, 0.55, 0.05, 0.15], // iv
    [0.70, 0.02, 0.02, 0.03, 0.05, 0.15, 0.03], // V
    [0.10, 0.20, 0.10, 0.30, 0.20, 0.05, 0.05], // VI
    [0.80, 0.02, 0.03, 0.02, 0.05, 0.05, 0.03], // viio
];

// High-gravity matrix: sharpened toward resolution-seeking motion.
// Defined for major only; in minor the strict interpolation target is the
// base matrix itself.
static STRICT_TRANSITIONS_MAJOR: TransitionMatrix = [
    [0.02, 0.15, 0.03, 0.35, 0.35, 0.08, 0.02], // I
    [0.02, 0.02, 0.01, 0.05, 0.75, 0.03, 0.12], // ii
    [0.05, 0.05, 0.02, 0.35, 0.08, 0.43, 0.02], // iii
    [0.10, 0.08, 0.02, 0.02, 0.65, 0.03, 0.10], // IV
    [0.82, 0.01, 0.01, 0.02, 0.02, 0.10, 0.02], // V
    [0.05, 0.30, 0.03, 0.40, 0.15, 0.02, 0.05], // vi
    [0.88, 0.01, 0.03, 0.01, 0.02, 0.03, 0.02], // viio
];

/// Chord definitions for a mode, indexed by `Degree`.
pub fn chords_for(mode: Mode) -> &'static [ChordDef; 7] {
    match mode {
        Mode::Major => &CHORDS_MAJOR,
        Mode::HarmonicMinor => &CHORDS_MINOR,
    }
}

/// Base (empirical) transition matrix for a mode.
pub fn transitions_for(mode: Mode) -> &'static TransitionMatrix {
    match mode {
        Mode::Major => &TRANSITIONS_MAJOR,
        Mode::HarmonicMinor => &TRANSITIONS_MINOR,
    }
}

/// Strict (high-gravity) transition matrix for a mode. Minor has no
/// dedicated strict matrix, so the base matrix doubles as the target.
pub fn strict_transitions_for(mode: Mode) -> &'static TransitionMatrix {
    match mode {
        Mode::Major => &STRICT_TRANSITIONS_MAJOR,
        Mode::HarmonicMinor => &TRANSITIONS_MINOR,
    }
}

/// Pitch class of a key name (case-sensitive, enharmonic spellings
/// accepted). Unknown names map to C.
pub fn key_pitch_class(name: &str) -> u8 {
    match name {
        "C" => 0,
        "C#" | "Db" => 1,
        "D" => 2,
        "D#" | "Eb" => 3,
        "E" => 4,
        "F" => 5,
        "F#" | "Gb" => 6,
        "G" => 7,
        "G#" | "Ab" => 8,
        "A" => 9,
        "A#" | "Bb" => 10,
        "B" => 11,
        _ => 0,
    }
}

pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Note name with octave for a MIDI pitch (middle C = 60 = "C4").
pub fn midi_to_note_name(midi: u8) -> String {
    let pc = (midi % 12) as usize;
    let octave = (midi / 12) as i32 - 1;
    format!("{}{}", NOTE_NAMES[pc], octave)
}

/// Cadence classification of the last two chords of a progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cadence {
    /// V → I.
    Authentic,
    /// IV → I (iv → i in minor).
    Plagal,
    /// V → vi (V → VI in minor).
    Deceptive,
    /// Any → V.
    Half,
}

impl Cadence {
    pub fn name(self) -> &'static str {
        match self {
            Cadence::Authentic => "Perfect Authentic",
            Cadence::Plagal => "Plagal",
            Cadence::Deceptive => "Deceptive",
            Cadence::Half => "Half Cadence",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_row_stochastic(matrix: &TransitionMatrix, what: &str) {
        for source in Degree::ALL {
            let row = &matrix[source.index()];
            let sum: f64 = row.iter().sum();
            assert!(
                (sum - 1.0).abs() < 1e-6,
                "{what} row {source:?} sums to {sum}, expected 1.0"
            );
            for &p in row {
                assert!(p >= 0.0, "{what} row {source:?} has negative entry {p}");
            }
        }
    }

    #[test]
    fn test_matrices_are_row_stochastic() {
        assert_row_stochastic(transitions_for(Mode::Major), "base major");
        assert_row_stochastic(transitions_for(Mode::HarmonicMinor), "base minor");
        assert_row_stochastic(strict_transitions_for(Mode::Major), "strict major");
        assert_row_stochastic(strict_transitions_for(Mode::HarmonicMinor), "strict minor");
    }

    #[test]
    fn test_dominant_pitch_classes_in_c() {
        let v = &chords_for(Mode::Major)[Degree::V.index()];
        assert_eq!(v.pitch_classes(0), [7, 11, 2]); // G B D
    }

    #[test]
    fn test_pitch_classes_transpose() {
        // I in G major: G B D.
        let i = &chords_for(Mode::Major)[Degree::I.index()];
        assert_eq!(i.pitch_classes(7), [7, 11, 2]);
    }

    #[test]
    fn test_harmonic_minor_v_is_major() {
        // The raised leading tone: V in A minor is E–G#–B.
        let v = &chords_for(Mode::HarmonicMinor)[Degree::V.index()];
        assert_eq!(v.quality, Quality::Major);
        assert_eq!(v.pitch_classes(9), [4, 8, 11]);
    }

    #[test]
    fn test_labels_per_mode() {
        assert_eq!(Degree::I.label(Mode::Major), "I");
        assert_eq!(Degree::I.label(Mode::HarmonicMinor), "i");
        assert_eq!(Degree::II.label(Mode::HarmonicMinor), "iio");
        assert_eq!(Degree::VII.label(Mode::Major), "viio");
        assert_eq!(Degree::VI.label(Mode::HarmonicMinor), "VI");
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(Degree::parse("IV", Mode::Major), Some(Degree::IV));
        assert_eq!(Degree::parse("iv", Mode::HarmonicMinor), Some(Degree::IV));
        // Case encodes quality: "iv" is not a major-mode label.
        assert_eq!(Degree::parse("iv", Mode::Major), None);
        assert_eq!(Degree::parse("VIII", Mode::Major), None);
    }

    #[test]
    fn test_key_pitch_class() {
        assert_eq!(key_pitch_class("C"), 0);
        assert_eq!(key_pitch_class("F#"), 6);
        assert_eq!(key_pitch_class("Gb"), 6);
        assert_eq!(key_pitch_class("Bb"), 10);
        // Unknown names fall back to C.
        assert_eq!(key_pitch_class("H"), 0);
        assert_eq!(key_pitch_class("c"), 0);
    }

    #[test]
    fn test_midi_to_note_name() {
        assert_eq!(midi_to_note_name(60), "C4");
        assert_eq!(midi_to_note_name(69), "A4");
        assert_eq!(midi_to_note_name(36), "C2");
        assert_eq!(midi_to_note_name(61), "C#4");
    }
}
