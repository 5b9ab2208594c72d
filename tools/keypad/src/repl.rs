//! Interactive keypad REPL
//!
//! Each line is a sequence of keys (see [`crate::keys`]). After every line
//! the display is printed. Lines starting with `:` are REPL commands.

use anyhow::{Context, Result};
use colored::*;
use common::ReplSettings;
use keycalc::builtin_functions::{Builtin, CONSTANTS};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};
use tracing::debug;

use crate::keys::Keypad;

const COMMANDS: [&str; 4] = [":history", ":help", ":quit", ":exit"];
const CONTROL_KEYS: [&str; 6] = ["BS", "NEG", "1/x", "ln", "C", "="];

// ============================================================================
// Tab Completion Helper
// ============================================================================

/// REPL helper providing Tab completion for commands, functions and constants
struct KeypadHelper;

impl Helper for KeypadHelper {}

impl Hinter for KeypadHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for KeypadHelper {}

impl Validator for KeypadHelper {}

impl Completer for KeypadHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(complete(&line[..pos]))
    }
}

/// Candidates for the word ending at the cursor
fn complete(line: &str) -> (usize, Vec<Pair>) {
    if line.starts_with(':') && !line.contains(' ') {
        return (0, candidates(COMMANDS.iter().copied(), line, ""));
    }

    // A name starts after the last character that cannot be part of one
    let start = line
        .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .map_or(0, |i| i + line[i..].chars().next().map_or(1, char::len_utf8));
    let prefix = &line[start..];
    if prefix.is_empty() || prefix.starts_with(|c: char| c.is_ascii_digit()) {
        return (start, Vec::new());
    }

    let mut pairs = candidates(Builtin::ALL.iter().map(|f| f.name()), prefix, "(");
    pairs.extend(candidates(CONSTANTS.iter().map(|(name, _)| *name), prefix, ""));
    if start == 0 || line[..start].ends_with(char::is_whitespace) {
        pairs.extend(candidates(CONTROL_KEYS.iter().copied(), prefix, ""));
    }
    (start, pairs)
}

fn candidates<'a>(names: impl Iterator<Item = &'a str>, prefix: &str, suffix: &str) -> Vec<Pair> {
    names
        .filter(|name| name.starts_with(prefix))
        .map(|name| Pair {
            display: name.to_string(),
            replacement: format!("{}{}", name, suffix),
        })
        .collect()
}

/// Interactive REPL loop
pub fn run_repl(settings: &ReplSettings) -> Result<()> {
    let config = rustyline::Config::builder()
        .completion_type(rustyline::CompletionType::List)
        .build();
    let mut rl = Editor::with_config(config).context("Failed to initialize readline")?;
    rl.set_helper(Some(KeypadHelper));

    println!("{}", "Keypad Calculator".bright_cyan().bold());
    println!(
        "Type '{}' for keys and commands, {} for completion\n",
        ":help".bright_yellow(),
        "Tab".bright_cyan()
    );

    let mut keypad = Keypad::new();
    loop {
        let line = match rl.readline(&settings.prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            },
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("Failed to read keypad input"),
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if let Err(e) = rl.add_history_entry(input) {
            debug!(error = %e, "Line not added to readline history");
        }

        match execute_repl_command(&mut keypad, input, settings) {
            Ok(true) => {},
            Ok(false) => break,
            Err(e) => eprintln!("{} {:#}", "Error:".red(), e),
        }
    }

    println!("Bye!");
    Ok(())
}

/// Execute a single REPL line
/// Returns Ok(true) to continue, Ok(false) to quit
fn execute_repl_command(keypad: &mut Keypad, input: &str, settings: &ReplSettings) -> Result<bool> {
    if !input.starts_with(':') {
        keypad.press_line(input);
        print_display(keypad);
        return Ok(true);
    }

    let parts: Vec<&str> = input.split_whitespace().collect();
    match parts.first().copied() {
        Some(":history") => {
            let rows = match parts.get(1) {
                Some(n) => n
                    .parse::<usize>()
                    .with_context(|| format!("Invalid row count '{}'", n))?,
                None => settings.history_rows,
            };
            print_history(keypad, rows);
        },
        Some(":help") | Some(":?") => {
            print_help();
        },
        Some(":quit") | Some(":exit") | Some(":q") => {
            return Ok(false);
        },
        Some(unknown) => {
            println!(
                "Unknown command '{}'. Type '{}' for available commands.",
                unknown.red(),
                ":help".bright_yellow()
            );
        },
        None => {},
    }

    Ok(true)
}

/// Print the sub-display (last evaluated expression) and the main display
fn print_display(keypad: &Keypad) {
    if !keypad.subdisplay().is_empty() {
        println!("  {}", keypad.subdisplay().dimmed());
    }
    if keypad.session().showing_error() {
        println!("  {}", keypad.display().red().bold());
    } else {
        println!("  {}", keypad.display().bright_white().bold());
    }
}

/// Print the most recent history records, newest first
fn print_history(keypad: &Keypad, rows: usize) {
    let records = keypad.session().recent_history(rows);
    if records.is_empty() {
        println!("{}", "(no history)".dimmed());
        return;
    }
    for record in records {
        println!("  {}", record);
    }
}

/// Print help message
fn print_help() {
    println!("{}", "=== Keys ===".bright_cyan());
    println!();
    println!("  {}   Digits, operators and names are appended", "0-9 + - * / ( )".bright_yellow());
    println!("  {}       Keypad glyphs: × ÷ ^ π √", "× ÷ ^ π √".bright_yellow());
    println!("  {}                 Evaluate", "=".bright_yellow());
    println!("  {}                 Clear", "C".bright_yellow());
    println!("  {}            Delete last character", "⌫ / BS".bright_yellow());
    println!("  {}           Toggle sign", "± / NEG".bright_yellow());
    println!("  {}               Reciprocal", "1/x".bright_yellow());
    println!("  {}                Natural log, appends log(", "ln".bright_yellow());
    println!();
    println!("{}", "=== Commands ===".bright_cyan());
    println!();
    println!("  {}   Show recent results", ":history [n]".bright_yellow());
    println!("  {}         Show this help message", ":help".bright_yellow());
    println!("  {}         Exit the calculator", ":quit".bright_yellow());
    println!();
    println!("{}", "=== Examples ===".bright_cyan());
    println!();
    println!("  2 + 3 =             5");
    println!("  * 2 =               10 (continues from the last result)");
    println!("  √ 16 ) =            4.0");
    println!("  2^10=               1024");
}
