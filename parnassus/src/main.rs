// Parnassus command-line composition editor.
//
// A small front end over the validation engine: create a composition file,
// fill its voices note by note, inspect it, validate it, and export it.
// Compositions live in JSON files (see persistence.rs); every command loads
// the file, applies one action, and writes it back when it changed.
//
// Usage:
//   parnassus new <file> [--length N] [--voices N] [--force]
//   parnassus add <file> --voice V --notes S[,S...]
//   parnassus set <file> --voice V --index I --note S
//   parnassus pop <file> --voice V
//   parnassus show <file>
//   parnassus validate <file> [--json]
//   parnassus midi <file> <out.mid> [--mode MODE] [--tempo BPM]
//   parnassus ly <file> <out.ly> [--mode MODE] [--title TEXT]
//
// Modes: dorian, phrygian, lydian, mixolydian, aeolian, ionian. A mode given
// on the command line sounds on its natural final (D for dorian, etc.).
//
// Voices and indices are 1-based on the command line (voice 1 is the first
// voice in the file). Notes are diatonic steps; negative steps go below the
// reference. Every command accepts `--config <file>`; without it,
// `parnassus.json` in the working directory is used when present.
//
// `validate` exits 0 for a valid composition and 1 otherwise. Any error
// exits 2. Set RUST_LOG (e.g. `RUST_LOG=debug`) for diagnostics on stderr.

use parnassus::composition::Composition;
use parnassus::config::EditorConfig;
use parnassus::error::ComposeError;
use parnassus::interval::Interval;
use parnassus::lilypond::write_lilypond;
use parnassus::midi::{MIN_TEMPO_BPM, write_midi};
use parnassus::mode::{Mode, ModeInstance};
use parnassus::note::Note;
use parnassus::persistence;
use parnassus::validation::{Location, ValidationResult, Violation, ViolationKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const LOCAL_CONFIG: &str = "parnassus.json";

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Compose(#[from] ComposeError),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(code) => code,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            eprintln!();
            eprintln!("{}", usage());
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &[String]) -> CliResult<ExitCode> {
    let command = args.get(1).map(String::as_str).unwrap_or("help");
    if matches!(command, "help" | "--help" | "-h") {
        println!("{}", usage());
        return Ok(ExitCode::SUCCESS);
    }

    let file = positional(args, 2, "composition file")?;
    let config = load_config(args)?;

    match command {
        "new" => cmd_new(args, &file, &config),
        "add" => {
            let mut cmp = open(&file, &config)?;
            let voice = voice_flag(args, &cmp)?;
            let notes = notes_flag(args)?;
            for note in notes {
                cmp.append(voice, note)?;
            }
            persistence::save(&cmp, &file)?;
            print_voice_status(&cmp, voice);
            Ok(ExitCode::SUCCESS)
        }
        "set" => {
            let mut cmp = open(&file, &config)?;
            let voice = voice_flag(args, &cmp)?;
            let index = one_based(required_flag::<usize>(args, "--index")?, "--index")?;
            let note = Note::new(required_flag::<i32>(args, "--note")?);
            let old = cmp.replace(voice, index, note)?;
            persistence::save(&cmp, &file)?;
            println!("Voice {} note {}: {} -> {}", voice + 1, index + 1, old, note);
            Ok(ExitCode::SUCCESS)
        }
        "pop" => {
            let mut cmp = open(&file, &config)?;
            let voice = voice_flag(args, &cmp)?;
            match cmp.pop(voice)? {
                Some(note) => {
                    persistence::save(&cmp, &file)?;
                    println!("Removed {} from voice {}", note, voice + 1);
                }
                None => println!("Voice {} is already empty", voice + 1),
            }
            Ok(ExitCode::SUCCESS)
        }
        "show" => {
            let cmp = open(&file, &config)?;
            print!("{}", render_summary(&cmp));
            Ok(ExitCode::SUCCESS)
        }
        "validate" => {
            let cmp = open(&file, &config)?;
            let violation = cmp.first_violation();
            let result = ValidationResult::from(violation);
            if has_flag(args, "--json") {
                let json = serde_json::to_string(&result).map_err(ComposeError::from)?;
                println!("{json}");
            } else {
                println!("{}", validation_message(result));
                if let Some(v) = violation {
                    println!("  {}", describe_location(&cmp, &v));
                }
            }
            Ok(if result.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        "midi" => {
            let cmp = open(&file, &config)?;
            let out = positional(args, 3, "output .mid file")?;
            warn_if_incomplete(&cmp);
            let tempo = tempo_flag(args, &config)?;
            write_midi(&cmp, &export_mode(args, &config)?, tempo, &out)?;
            println!("Wrote {}", out.display());
            Ok(ExitCode::SUCCESS)
        }
        "ly" => {
            let cmp = open(&file, &config)?;
            let out = positional(args, 3, "output .ly file")?;
            let title: Option<String> = parse_flag(args, "--title");
            warn_if_incomplete(&cmp);
            write_lilypond(&cmp, &export_mode(args, &config)?, title.as_deref(), &out)?;
            println!("Wrote {}", out.display());
            Ok(ExitCode::SUCCESS)
        }
        other => Err(CliError::Usage(format!("Unknown command '{other}'"))),
    }
}

fn cmd_new(args: &[String], file: &Path, config: &EditorConfig) -> CliResult<ExitCode> {
    if file.exists() && !has_flag(args, "--force") {
        return Err(CliError::Usage(format!(
            "{} already exists (use --force to overwrite)",
            file.display()
        )));
    }
    let length = optional_flag(args, "--length")?.unwrap_or(config.default_length);
    let voices = optional_flag(args, "--voices")?.unwrap_or(config.voice_count);
    config.check_length(length)?;
    let cmp = Composition::with_voices(voices, length)?;
    persistence::save(&cmp, file)?;
    println!(
        "Created {} ({} voices x {} notes)",
        file.display(),
        cmp.voice_count(),
        cmp.length()
    );
    Ok(ExitCode::SUCCESS)
}

/// Load a composition, refusing ones larger than the editor supports.
fn open(file: &Path, config: &EditorConfig) -> CliResult<Composition> {
    Ok(persistence::load_bounded(file, config.max_length)?)
}

fn load_config(args: &[String]) -> CliResult<EditorConfig> {
    if let Some(path) = parse_flag::<String>(args, "--config") {
        debug!(path = %path, "loading editor config");
        return Ok(EditorConfig::load(Path::new(&path))?);
    }
    if Path::new(LOCAL_CONFIG).exists() {
        debug!(path = LOCAL_CONFIG, "loading editor config");
        return Ok(EditorConfig::load(Path::new(LOCAL_CONFIG))?);
    }
    Ok(EditorConfig::default())
}

/// The export mode: `--mode` on its natural final, else the configured one.
fn export_mode(args: &[String], config: &EditorConfig) -> CliResult<ModeInstance> {
    match parse_flag::<String>(args, "--mode") {
        Some(name) => {
            let mode = Mode::from_name(&name)
                .ok_or_else(|| CliError::Usage(format!("Unknown mode '{name}'")))?;
            Ok(ModeInstance::new(mode, mode.natural_final(), config.base_octave))
        }
        None => Ok(config.mode_instance()),
    }
}

// ── Result presentation ──

/// The user-facing sentence for a validation outcome.
fn validation_message(result: ValidationResult) -> String {
    let kind = match result {
        ValidationResult::Valid => return "Your composition is valid!".to_string(),
        ValidationResult::Invalid(kind) => kind,
    };
    let reason = match kind {
        ViolationKind::VoiceNotFull => "At least one voice is not full.",
        ViolationKind::FirstIntervalNotPerfect => {
            "The first interval is not a perfect consonance."
        }
        ViolationKind::LastIntervalNotPerfect => "The last interval is not a perfect consonance.",
        ViolationKind::NotAllIntervalsConsonant => "Not all intervals are consonant.",
        ViolationKind::ParallelToPerfect => {
            "At least one perfect consonance is approached by parallel motion."
        }
    };
    format!("Invalid! {reason}")
}

/// Point at the notes that broke the rule.
fn describe_location(cmp: &Composition, violation: &Violation) -> String {
    match violation.location {
        Location::Voice { voice } => {
            let size = cmp.voice(voice).map(|v| v.size()).unwrap_or(0);
            format!(
                "Voice {} has {} of {} notes.",
                voice + 1,
                size,
                cmp.length()
            )
        }
        Location::Slice { voices: (i, j), index } => {
            let a = cmp.voice(i).and_then(|v| v.at(index));
            let b = cmp.voice(j).and_then(|v| v.at(index));
            let interval = match (a, b) {
                (Ok(a), Ok(b)) => Interval::between(a, b).name(),
                _ => "?",
            };
            format!(
                "Voices {} and {} at note {}: {}.",
                i + 1,
                j + 1,
                index + 1,
                interval
            )
        }
    }
}

/// A text grid of the voices (top voice first) and the interval numbers
/// between each voice pair.
fn render_summary(cmp: &Composition) -> String {
    let mut out = String::new();
    for (vi, voice) in cmp.voices().iter().enumerate().rev() {
        out.push_str(&format!("Voice {:>2}:", vi + 1));
        for index in 0..cmp.length() {
            match voice.at(index) {
                Ok(note) => out.push_str(&format!(" {:>4}", note.value())),
                Err(_) => out.push_str("    ."),
            }
        }
        out.push('\n');
    }
    for i in 0..cmp.voice_count() {
        for j in (i + 1)..cmp.voice_count() {
            out.push_str(&format!("{:>2} / {:<2}:", i + 1, j + 1));
            for index in 0..cmp.length() {
                match (cmp.voices()[i].at(index), cmp.voices()[j].at(index)) {
                    (Ok(a), Ok(b)) => {
                        out.push_str(&format!(" {:>4}", Interval::between(a, b).number()))
                    }
                    _ => out.push_str("    ."),
                }
            }
            out.push('\n');
        }
    }
    out.push_str(&validation_message(cmp.validate()));
    out.push('\n');
    out
}

fn print_voice_status(cmp: &Composition, voice: usize) {
    if let Ok(v) = cmp.voice(voice) {
        println!(
            "Voice {}: {}/{} notes{}",
            voice + 1,
            v.size(),
            v.capacity(),
            if v.is_full() { " (full)" } else { "" }
        );
    }
}

fn warn_if_incomplete(cmp: &Composition) {
    if !cmp.is_complete() {
        warn!("composition is incomplete; exporting the notes entered so far");
    }
}

// ── Argument parsing ──

fn usage() -> &'static str {
    "Usage:
  parnassus new <file> [--length N] [--voices N] [--force]
  parnassus add <file> --voice V --notes S[,S...]
  parnassus set <file> --voice V --index I --note S
  parnassus pop <file> --voice V
  parnassus show <file>
  parnassus validate <file> [--json]
  parnassus midi <file> <out.mid> [--mode MODE] [--tempo BPM]
  parnassus ly <file> <out.ly> [--mode MODE] [--title TEXT]

All commands accept --config <file>. Voices and indices are 1-based."
}

fn positional(args: &[String], index: usize, what: &str) -> CliResult<PathBuf> {
    args.get(index)
        .filter(|s| !s.starts_with("--"))
        .map(PathBuf::from)
        .ok_or_else(|| CliError::Usage(format!("Missing {what}")))
}

fn voice_flag(args: &[String], cmp: &Composition) -> CliResult<usize> {
    let voice = one_based(required_flag::<usize>(args, "--voice")?, "--voice")?;
    // Surface a bad voice number before any note is touched.
    cmp.voice(voice)?;
    Ok(voice)
}

fn notes_flag(args: &[String]) -> CliResult<Vec<Note>> {
    let raw: String = required_flag(args, "--notes")?;
    parse_notes(&raw)
}

fn parse_notes(raw: &str) -> CliResult<Vec<Note>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .map(Note::new)
                .map_err(|_| CliError::Usage(format!("'{s}' is not a note step")))
        })
        .collect()
}

fn tempo_flag(args: &[String], config: &EditorConfig) -> CliResult<u16> {
    match optional_flag::<u16>(args, "--tempo")? {
        Some(bpm) if bpm < MIN_TEMPO_BPM => Err(CliError::Usage(format!(
            "--tempo must be at least {MIN_TEMPO_BPM}"
        ))),
        Some(bpm) => Ok(bpm),
        None => Ok(config.tempo_bpm),
    }
}

fn one_based(value: usize, flag: &str) -> CliResult<usize> {
    value
        .checked_sub(1)
        .ok_or_else(|| CliError::Usage(format!("{flag} counts from 1")))
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn required_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> CliResult<T> {
    optional_flag(args, flag)?.ok_or_else(|| CliError::Usage(format!("{flag} is required")))
}

/// Like `parse_flag`, but a present flag with an unparsable value is an error.
fn optional_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> CliResult<Option<T>> {
    if !has_flag(args, flag) {
        return Ok(None);
    }
    parse_flag(args, flag)
        .map(Some)
        .ok_or_else(|| CliError::Usage(format!("{flag} requires a valid value")))
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
