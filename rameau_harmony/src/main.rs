// Rameau Harmony CLI entry point.
//
// Generates a chord progression with SATB voicings and writes it to MIDI.
// The pipeline: engine configuration → Markov progression → voice leading
// → report + MIDI output.
//
// Usage:
//   cargo run -p rameau_harmony -- [output.mid] [--length N] [--mode MODE]
//     [--key NAME] [--gravity G] [--style STYLE] [--tempo BPM] [--seed N]
//     [--no-cadence] [--json]
//
// Modes: major, minor. Styles: baroque, classical, romantic, jazz.

use rameau_harmony::chords::{Mode, midi_to_note_name};
use rameau_harmony::markov::MarkovEngine;
use rameau_harmony::midi::write_midi;
use rameau_harmony::piece::generate_piece;
use rameau_harmony::voice_leading::{Style, VoiceLeader, VoicePart};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Parse arguments
    let output_path = args
        .get(1)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or("progression.mid");
    let length: usize = parse_flag(&args, "--length").unwrap_or(8);
    let mode_name: String = parse_flag(&args, "--mode").unwrap_or_else(|| "major".to_string());
    let key: String = parse_flag(&args, "--key").unwrap_or_else(|| "C".to_string());
    let gravity: f64 = parse_flag(&args, "--gravity").unwrap_or(0.5);
    let style_name: String =
        parse_flag(&args, "--style").unwrap_or_else(|| "classical".to_string());
    let tempo: u16 = parse_flag(&args, "--tempo").unwrap_or(96);
    let seed: Option<u64> = parse_flag(&args, "--seed");
    let end_with_cadence = !has_flag(&args, "--no-cadence");
    let json = has_flag(&args, "--json");

    let mode = parse_mode(&mode_name);
    let style = parse_style(&style_name);

    let mut rng = if let Some(s) = seed {
        StdRng::seed_from_u64(s)
    } else {
        StdRng::from_os_rng()
    };

    // Configure the engine and voice leader
    let mut engine = MarkovEngine::new(mode);
    engine.set_key(&key);
    engine.set_gravity(gravity);
    let mut leader = VoiceLeader::new();
    leader.set_style(style);

    if !json {
        println!("=== Rameau Harmony ===");
        println!("Output: {}", output_path);
        println!("Mode: {:?}, key {} (offset {})", mode, key, engine.key_offset());
        println!("Gravity: {:.2}", engine.gravity());
        println!("Style: {}", style.name());
        println!("Length: {} chords, cadence: {}", length, end_with_cadence);
        if let Some(s) = seed {
            println!("Seed: {}", s);
        }
        println!();
        println!("[1/2] Generating progression...");
    }

    let mut piece = match generate_piece(&mut engine, &mut leader, length, end_with_cadence, &mut rng) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Progression blocked: {}", e);
            std::process::exit(1);
        }
    };
    piece.tempo_bpm = tempo;
    piece.key = key;

    if json {
        match serde_json::to_string_pretty(&piece) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error serializing piece: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for (i, label) in piece.labels.iter().enumerate() {
        let voicing = piece.voicings[i];
        let names: Vec<String> = VoicePart::ALL
            .iter()
            .map(|p| midi_to_note_name(voicing[p.index()]))
            .collect();
        println!(
            "  {:>2}. {:<5} {:?}  [{}]",
            i + 1,
            label,
            piece.functions[i],
            names.join(" ")
        );
    }
    match piece.cadence {
        Some(c) => println!("  Cadence: {}", c.name()),
        None => println!("  Cadence: none detected"),
    }

    println!("[2/2] Writing MIDI to {}...", output_path);
    match write_midi(&piece, Path::new(output_path)) {
        Ok(()) => {
            let seconds = piece.chord_count() as f64 * 4.0 / (tempo as f64 / 60.0);
            println!("  Done! Duration: {:.0}s ({} bars)", seconds, piece.chord_count());
        }
        Err(e) => {
            eprintln!("  Error writing MIDI: {}", e);
            std::process::exit(1);
        }
    }

    println!();
    println!("Play with: timidity {} (or any MIDI player)", output_path);
}

fn parse_mode(name: &str) -> Mode {
    match name.to_lowercase().as_str() {
        "major" => Mode::Major,
        "minor" | "harmonic-minor" => Mode::HarmonicMinor,
        _ => {
            eprintln!("Unknown mode '{}'. Using major.", name);
            Mode::Major
        }
    }
}

fn parse_style(name: &str) -> Style {
    match Style::parse(&name.to_lowercase()) {
        Some(style) => style,
        None => {
            eprintln!("Unknown style '{}'. Using classical.", name);
            Style::Classical
        }
    }
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}
