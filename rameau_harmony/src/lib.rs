// Rameau Harmony
//
// A chord progression generator built on functional harmony. A weighted
// Markov chain walks the scale-degree chord graph of a key, with a
// "gravity" parameter that interpolates between uniform wandering and
// strict resolution-seeking motion, and a tension feedback loop that pulls
// high-tension moments toward resolution. A voice-leading optimizer then
// realizes each abstract chord as four concrete SATB pitches, minimizing
// voice motion while avoiding parallel perfect fifths and octaves, voice
// crossing, and voice overlap.
//
// Architecture:
// - chords.rs: Static chord tables per mode (function, quality, tension,
//   triad intervals), base/strict transition matrices, key and note names
// - markov.rs: The progression engine (gravity interpolation, tension
//   feedback, cadence forcing and detection)
// - voice_leading.rs: SATB ranges and styles, bounded candidate search,
//   legality predicate, cost minimization
// - piece.rs: The assembled output bundle and the generate-and-voice
//   pipeline
// - midi.rs: MIDI file output from voiced progressions
//
// Generation is deterministic given a seeded RNG, supporting reproducible
// output.

pub mod chords;
pub mod markov;
pub mod midi;
pub mod piece;
pub mod voice_leading;
