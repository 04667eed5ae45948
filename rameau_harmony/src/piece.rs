// Assembled generation output: the engine boundary.
//
// A `Piece` bundles everything a downstream consumer needs to render a
// generated progression (chord labels, harmonic functions, concrete SATB
// voicings, the detected closing cadence) as plain serializable data.
// `generate_piece` runs the full pipeline: the Markov engine emits chord
// degrees, and each degree is voiced in turn by the voice leader using the
// previous voicing as context.

use crate::chords::{self, Cadence, ChordFunction, Mode, NOTE_NAMES};
use crate::markov::MarkovEngine;
use crate::voice_leading::{VoiceLeader, Voicing, VoicingError};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default playback tempo for rendered pieces.
pub const DEFAULT_TEMPO_BPM: u16 = 96;

/// A voiced chord progression, ready for rendering or serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Piece {
    pub mode: Mode,
    /// Key name as a pitch-class spelling ("C", "F#", ...).
    pub key: String,
    pub key_offset: u8,
    pub tempo_bpm: u16,
    /// Roman-numeral labels, one per chord.
    pub labels: Vec<String>,
    /// Harmonic function of each chord.
    pub functions: Vec<ChordFunction>,
    /// SATB pitches of each chord, parallel to `labels`.
    pub voicings: Vec<Voicing>,
    /// Cadence classification of the final two chords, if any.
    pub cadence: Option<Cadence>,
}

impl Piece {
    pub fn chord_count(&self) -> usize {
        self.labels.len()
    }
}

/// Generate and voice a progression of `length` chords in root position.
///
/// The engine restarts from its tonic; with `end_with_cadence` the last
/// two chords are forced to V → tonic. A chord the voice leader cannot
/// voice aborts the piece with the voicing error, the one failure that
/// must reach the caller.
pub fn generate_piece(
    engine: &mut MarkovEngine,
    leader: &mut VoiceLeader,
    length: usize,
    end_with_cadence: bool,
    rng: &mut impl Rng,
) -> Result<Piece, VoicingError> {
    let degrees = engine.generate_progression(length, true, end_with_cadence, rng);
    let mode = engine.mode();
    let key_offset = engine.key_offset();
    let defs = chords::chords_for(mode);

    let mut voicings = Vec::with_capacity(degrees.len());
    for &degree in &degrees {
        let change = leader.transition(degree, mode, key_offset, 0)?;
        voicings.push(change.to);
    }

    Ok(Piece {
        mode,
        key: NOTE_NAMES[key_offset as usize].to_string(),
        key_offset,
        tempo_bpm: DEFAULT_TEMPO_BPM,
        labels: degrees.iter().map(|d| d.label(mode).to_string()).collect(),
        functions: degrees.iter().map(|d| defs[d.index()].function).collect(),
        voicings,
        cadence: engine.detect_cadence(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chords::Degree;
    use crate::voice_leading::VoicePart;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_generate_piece_shape() {
        let mut engine = MarkovEngine::new(Mode::Major);
        let mut leader = VoiceLeader::new();
        let mut rng = StdRng::seed_from_u64(42);
        let piece = generate_piece(&mut engine, &mut leader, 8, true, &mut rng).unwrap();

        assert_eq!(piece.chord_count(), 8);
        assert_eq!(piece.voicings.len(), 8);
        assert_eq!(piece.functions.len(), 8);
        assert_eq!(piece.labels[6], "V");
        assert_eq!(piece.labels[7], "I");
        assert_eq!(piece.cadence, Some(Cadence::Authentic));
    }

    #[test]
    fn test_generate_piece_respects_ranges() {
        for seed in 0..10 {
            let mut engine = MarkovEngine::new(Mode::HarmonicMinor);
            engine.set_key("G");
            let mut leader = VoiceLeader::new();
            let mut rng = StdRng::seed_from_u64(seed);
            let piece = generate_piece(&mut engine, &mut leader, 12, false, &mut rng).unwrap();
            for voicing in &piece.voicings {
                for &part in &VoicePart::ALL {
                    let (lo, hi) = part.range();
                    let pitch = voicing[part.index()];
                    assert!(
                        (lo..=hi).contains(&pitch),
                        "seed {seed}: {} pitch {pitch} out of [{lo}, {hi}]",
                        part.name()
                    );
                }
            }
        }
    }

    #[test]
    fn test_generate_piece_reproducible() {
        let make = || {
            let mut engine = MarkovEngine::new(Mode::Major);
            engine.set_gravity(0.3);
            let mut leader = VoiceLeader::new();
            let mut rng = StdRng::seed_from_u64(1234);
            generate_piece(&mut engine, &mut leader, 16, true, &mut rng).unwrap()
        };
        let a = make();
        let b = make();
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.voicings, b.voicings);
    }

    #[test]
    fn test_minor_piece_uses_minor_labels() {
        let mut engine = MarkovEngine::new(Mode::HarmonicMinor);
        let mut leader = VoiceLeader::new();
        let mut rng = StdRng::seed_from_u64(2);
        let piece = generate_piece(&mut engine, &mut leader, 6, true, &mut rng).unwrap();
        assert_eq!(piece.labels[5], "i");
        for label in &piece.labels {
            assert!(Degree::parse(label, Mode::HarmonicMinor).is_some(), "label {label}");
        }
    }

    #[test]
    fn test_piece_json_round_trip() {
        let mut engine = MarkovEngine::new(Mode::Major);
        engine.set_key("Bb");
        let mut leader = VoiceLeader::new();
        let mut rng = StdRng::seed_from_u64(77);
        let piece = generate_piece(&mut engine, &mut leader, 4, true, &mut rng).unwrap();

        let json = serde_json::to_string(&piece).unwrap();
        let restored: Piece = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.labels, piece.labels);
        assert_eq!(restored.voicings, piece.voicings);
        assert_eq!(restored.key, "A#"); // pitch-class spelling of Bb
        assert_eq!(restored.cadence, piece.cadence);
    }
}
