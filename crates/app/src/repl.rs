use std::fmt;
use std::io::{self, BufRead, Write};

use drill_core::model::{Boundary, HintKind, ProgressStats};
use services::{
    Completion, CompletionKind, DefinitionCard, DefinitionRef, DrillLoopService, PickOutcome,
    SessionError, SessionView, SubmitOutcome,
};

/// One line of learner input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    Hint { slot: usize, kind: HintKind },
    Definition(DefinitionRef),
    Review(usize),
    Solutions,
    NewSession,
    Show,
    Stats,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingSlot { command: &'static str },
    InvalidSlot { raw: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(name) => write!(f, "unknown command: :{name}"),
            CommandError::MissingSlot { command } => write!(f, "{command} needs a slot number"),
            CommandError::InvalidSlot { raw } => write!(f, "invalid slot number: {raw}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl Command {
    /// Parse a line. Blank lines yield `None`; anything not starting with `:`
    /// is a word to submit. Slot numbers are 1-based.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Some(Command::Submit(line.to_string())));
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();
        let command = match name {
            "len" => Command::Hint {
                slot: parse_slot(arg, ":len")?,
                kind: HintKind::Length,
            },
            "bag" => Command::Hint {
                slot: parse_slot(arg, ":bag")?,
                kind: HintKind::LetterBag,
            },
            "def" => match arg {
                Some("start") => Command::Definition(DefinitionRef::Boundary(Boundary::Start)),
                Some("end") => Command::Definition(DefinitionRef::Boundary(Boundary::End)),
                _ => Command::Definition(DefinitionRef::Slot(parse_slot(arg, ":def")?)),
            },
            "see" => Command::Review(parse_slot(arg, ":see")?),
            "solutions" => Command::Solutions,
            "new" => Command::NewSession,
            "show" => Command::Show,
            "stats" => Command::Stats,
            "help" | "h" => Command::Help,
            "quit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn parse_slot(arg: Option<&str>, command: &'static str) -> Result<usize, CommandError> {
    let raw = arg.ok_or(CommandError::MissingSlot { command })?;
    match raw.parse::<usize>() {
        Ok(slot) if slot >= 1 => Ok(slot - 1),
        _ => Err(CommandError::InvalidSlot {
            raw: raw.to_string(),
        }),
    }
}

pub fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Type a word to submit it. Commands:")?;
    writeln!(out, "  :len N        toggle the length hint on slot N (counts as help)")?;
    writeln!(out, "  :bag N        toggle the sorted-letters hint on slot N (counts as help)")?;
    writeln!(out, "  :def N        definition of slot N (counts as help)")?;
    writeln!(out, "  :def start    definition of the first reference word")?;
    writeln!(out, "  :def end      definition of the last reference word")?;
    writeln!(out, "  :see N        definition of a word already found")?;
    writeln!(out, "  :solutions    reveal every word (counts as help)")?;
    writeln!(out, "  :new          start another block")?;
    writeln!(out, "  :show         redraw the current block")?;
    writeln!(out, "  :stats        overall progress")?;
    writeln!(out, "  :quit         leave")
}

/// Drive the drill loop from line-oriented input until EOF or `:quit`.
///
/// # Errors
///
/// Returns an `io::Error` if reading input or writing output fails.
pub fn run<R: BufRead, W: Write>(
    service: &mut DrillLoopService,
    input: R,
    mut out: W,
) -> io::Result<()> {
    start_session(service, &mut out)?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        match Command::parse(&line?) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => execute(service, command, &mut out)?,
            Err(err) => writeln!(out, "{err} (type :help)")?,
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    writeln!(out)
}

fn execute(service: &mut DrillLoopService, command: Command, out: &mut impl Write) -> io::Result<()> {
    match command {
        Command::Submit(word) => match service.submit_word(&word) {
            Ok(outcome) => report_submit(service, &word, outcome, out),
            Err(err) => report_error(&err, out),
        },
        Command::Hint { slot, kind } => match service.request_hint(slot, kind) {
            Ok(Some(text)) => writeln!(out, "Slot {}: {text}", slot + 1),
            Ok(None) => writeln!(out, "Slot {}: no hint shown", slot + 1),
            Err(err) => report_error(&err, out),
        },
        Command::Definition(reference) => match service.request_definition(reference) {
            Ok(card) => write_card(&card, out),
            Err(err) => report_error(&err, out),
        },
        Command::Review(slot) => match service.review_found(slot) {
            Ok(Some(card)) => write_card(&card, out),
            Ok(None) => writeln!(out, "Slot {} is not found yet.", slot + 1),
            Err(err) => report_error(&err, out),
        },
        Command::Solutions => match service.reveal_all() {
            Ok(outcome) => {
                writeln!(out, "Revealed {} word(s).", outcome.revealed.len())?;
                if let Some(completion) = outcome.completion {
                    write_completion(completion, out)?;
                }
                show(service, out)
            }
            Err(err) => report_error(&err, out),
        },
        Command::NewSession => start_session(service, out),
        Command::Show => show(service, out),
        Command::Stats => write_stats(service.stats(), out),
        Command::Help => print_help(out),
        Command::Quit => Ok(()),
    }
}

fn start_session(service: &mut DrillLoopService, out: &mut impl Write) -> io::Result<()> {
    match service.start_session() {
        Ok(PickOutcome::Started(_)) => show(service, out),
        Ok(PickOutcome::NoneAvailable) => {
            writeln!(out, "No block is available today. Come back tomorrow.")
        }
        Ok(PickOutcome::AllComplete) => writeln!(out, "Every block is validated. Well done!"),
        Err(err) => report_error(&err, out),
    }
}

fn report_submit(
    service: &DrillLoopService,
    word: &str,
    outcome: SubmitOutcome,
    out: &mut impl Write,
) -> io::Result<()> {
    match outcome {
        SubmitOutcome::EmptyInput => writeln!(out, "Type a word first."),
        SubmitOutcome::NotInBlock => writeln!(out, "\"{}\" is not in this block.", word.trim()),
        SubmitOutcome::AlreadyFound => writeln!(out, "Already found."),
        SubmitOutcome::Accepted {
            slots,
            duplicate,
            completion,
        } => {
            let numbers: Vec<String> = slots.iter().map(|slot| (slot + 1).to_string()).collect();
            write!(out, "Found! Slot {}", numbers.join(", "))?;
            if duplicate {
                write!(out, " (this word appears more than once)")?;
            }
            writeln!(out)?;
            if let Some(completion) = completion {
                write_completion(completion, out)?;
            }
            show(service, out)
        }
    }
}

fn write_completion(completion: Completion, out: &mut impl Write) -> io::Result<()> {
    match completion.kind {
        CompletionKind::ValidatedClean => writeln!(out, "Block validated without help!")?,
        CompletionKind::CompletedWithAid => writeln!(
            out,
            "Block complete, with help. Finish it without help to validate it."
        )?,
    }
    if completion.all_complete {
        writeln!(out, "Every block is now validated.")?;
    }
    Ok(())
}

fn show(service: &DrillLoopService, out: &mut impl Write) -> io::Result<()> {
    match service.view() {
        Some(view) => write_view(&view, out),
        None => writeln!(out, "No active session. Type :new to start one."),
    }
}

fn write_view(view: &SessionView, out: &mut impl Write) -> io::Result<()> {
    let tag = if view.aid_used { " [help used]" } else { "" };
    writeln!(
        out,
        "Block {} ({}/{} found){tag}",
        view.block_id, view.progress.found, view.progress.total
    )?;
    writeln!(out, "     {}", view.start.display)?;
    for slot in &view.slots {
        let label = match (&slot.display, &slot.hint) {
            (Some(word), _) => word.clone(),
            (None, Some(hint)) => format!("? ({hint})"),
            (None, None) => "?".to_string(),
        };
        writeln!(out, "{:>3}. {label}", slot.slot + 1)?;
    }
    writeln!(out, "     {}", view.end.display)
}

fn write_card(card: &DefinitionCard, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", card.title.as_deref().unwrap_or("(hidden word)"))?;
    writeln!(
        out,
        "  {}",
        card.definition.as_deref().unwrap_or("No definition available.")
    )?;
    if !card.anagrams.is_empty() {
        write!(out, "  Anagrams: {}", card.anagrams.shown.join(", "))?;
        if card.anagrams.hidden > 0 {
            write!(out, " and {} more", card.anagrams.hidden)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_stats(stats: ProgressStats, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "Seen: {}/{} ({}%)  Validated: {}/{} ({}%)",
        stats.seen,
        stats.total,
        stats.seen_percent(),
        stats.validated,
        stats.total,
        stats.validated_percent()
    )
}

fn report_error(err: &SessionError, out: &mut impl Write) -> io::Result<()> {
    match err {
        SessionError::NoActiveSession => {
            writeln!(out, "No active session. Type :new to start one.")
        }
        other => writeln!(out, "{other}"),
    }
}
