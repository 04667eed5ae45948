// MIDI output for voiced progressions.
//
// Converts a Piece into a Standard MIDI File for playback and evaluation.
// Each vocal part maps to a separate track; every chord sounds for one
// whole bar of 4/4. Uses the `midly` crate for MIDI writing. Output is
// SMF Format 1 (multi-track).

use crate::piece::Piece;
use crate::voice_leading::VoicePart;
use midly::{
    Format, Header, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u16 = 480;

/// Ticks per chord: one whole bar of 4/4.
const TICKS_PER_CHORD: u32 = TICKS_PER_QUARTER as u32 * 4;

/// Note velocity for all chord tones.
const VELOCITY: u8 = 80;

/// Convert a Piece to MIDI and write to a file.
pub fn write_midi(piece: &Piece, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let smf = piece_to_smf(piece);
    let mut buf = Vec::new();
    smf.write(&mut buf)?;
    std::fs::write(path, &buf)?;
    Ok(())
}

/// Convert a Piece to an in-memory SMF.
pub fn piece_to_smf(piece: &Piece) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    // Track 0: tempo track
    let mut tempo_track: Track<'static> = Vec::new();
    let tempo_microseconds = 60_000_000 / piece.tempo_bpm as u32;
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::Tempo(u24::new(tempo_microseconds))),
    });
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    });
    smf.tracks.push(tempo_track);

    // One track per part, bass first.
    for part in VoicePart::ALL {
        let channel = u4::new(part.index() as u8);
        let mut track: Track<'static> = Vec::new();

        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(midly::MetaMessage::TrackName(part.name().as_bytes())),
        });

        // Choir aahs (program 52) for a vocal rendering.
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(52),
                },
            },
        });

        for voicing in &piece.voicings {
            let pitch = voicing[part.index()];
            track.push(TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOn {
                        key: u7::new(pitch),
                        vel: u7::new(VELOCITY),
                    },
                },
            });
            track.push(TrackEvent {
                delta: u28::new(TICKS_PER_CHORD),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOff {
                        key: u7::new(pitch),
                        vel: u7::new(0),
                    },
                },
            });
        }

        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
        });

        smf.tracks.push(track);
    }

    smf
}
