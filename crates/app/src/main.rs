mod repl;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use drill_core::scheduler::COOLDOWN_DAYS;
use drill_core::time::parse_date;
use services::{Clock, DrillLoopService};
use storage::{JsonFileRepository, ProgressStore, load_word_store};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDate { raw: String },
    InvalidCooldown { raw: String },
    EmptyPath { flag: &'static str },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDate { raw } => {
                write!(f, "invalid --today value: {raw} (expected YYYY-MM-DD)")
            }
            ArgsError::InvalidCooldown { raw } => {
                write!(f, "invalid --cooldown value: {raw} (expected whole days)")
            }
            ArgsError::EmptyPath { flag } => write!(f, "{flag} cannot be empty"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn require_path(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<PathBuf, ArgsError> {
    let value = require_value(args, flag)?;
    if value.trim().is_empty() {
        return Err(ArgsError::EmptyPath { flag });
    }
    Ok(PathBuf::from(value))
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--words <path>] [--state <path>] [--today <YYYY-MM-DD>] [--cooldown <days>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --words words.json");
    eprintln!("  --state <data dir>/vocab-drill/state.json (or ./drill-state.json)");
    eprintln!("  --today the local calendar date");
    eprintln!("  --cooldown 3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DRILL_WORDS, DRILL_STATE, DRILL_TODAY, DRILL_COOLDOWN, RUST_LOG");
}

#[derive(Debug)]
struct Args {
    words: PathBuf,
    state: PathBuf,
    clock: Clock,
    cooldown_days: i64,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut words = std::env::var_os("DRILL_WORDS")
            .map_or_else(|| PathBuf::from("words.json"), PathBuf::from);
        let mut state = std::env::var_os("DRILL_STATE")
            .map_or_else(default_state_path, PathBuf::from);
        let mut clock = match std::env::var("DRILL_TODAY") {
            Ok(raw) => parse_clock(raw)?,
            Err(_) => Clock::default_clock(),
        };
        let mut cooldown_days = match std::env::var("DRILL_COOLDOWN") {
            Ok(raw) => parse_cooldown(raw)?,
            Err(_) => COOLDOWN_DAYS,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--words" => words = require_path(args, "--words")?,
                "--state" => state = require_path(args, "--state")?,
                "--today" => clock = parse_clock(require_value(args, "--today")?)?,
                "--cooldown" => {
                    cooldown_days = parse_cooldown(require_value(args, "--cooldown")?)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            words,
            state,
            clock,
            cooldown_days,
        })
    }
}

fn parse_clock(raw: String) -> Result<Clock, ArgsError> {
    parse_date(&raw)
        .map(Clock::fixed)
        .ok_or(ArgsError::InvalidDate { raw })
}

fn parse_cooldown(raw: String) -> Result<i64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidCooldown { raw })
}

fn default_state_path() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from("drill-state.json"),
        |dir| dir.join("vocab-drill").join("state.json"),
    )
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();
    tracing::debug!(?args, "starting drill");

    let words = Arc::new(load_word_store(&args.words)?);
    if words.is_empty() {
        tracing::warn!(path = %args.words.display(), "word list is empty");
    }
    let store = ProgressStore::load(Arc::new(JsonFileRepository::new(args.state)));
    let mut service =
        DrillLoopService::new(args.clock, words, store).with_cooldown(args.cooldown_days)?;

    repl::run(&mut service, io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::time::fixed_today;

    fn parse(list: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = list.iter().map(|s| (*s).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&["--words", "w.json", "--state", "s.json", "--today", "2024-01-01"]).unwrap();
        assert_eq!(args.words, PathBuf::from("w.json"));
        assert_eq!(args.state, PathBuf::from("s.json"));
        assert_eq!(args.clock.today(), fixed_today());
    }

    #[test]
    fn cooldown_flag_is_parsed() {
        assert_eq!(parse(&["--cooldown", "5"]).unwrap().cooldown_days, 5);
        assert!(matches!(
            parse(&["--cooldown", "soon"]),
            Err(ArgsError::InvalidCooldown { .. })
        ));
    }

    #[test]
    fn bad_flags_are_reported() {
        assert!(matches!(
            parse(&["--words"]),
            Err(ArgsError::MissingValue { flag: "--words" })
        ));
        assert!(matches!(
            parse(&["--today", "tomorrow"]),
            Err(ArgsError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse(&["--state", " "]),
            Err(ArgsError::EmptyPath { flag: "--state" })
        ));
        assert!(matches!(parse(&["--db"]), Err(ArgsError::UnknownArg(_))));
    }
}
