//! Keypad - terminal front end for the keycalc calculator core
//!
//! `keypad eval <KEYS>...` evaluates once and prints the result.
//! `keypad repl` (the default) starts an interactive keypad session.

mod keys;
mod repl;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use common::{load_config, logging};
use keycalc::{Evaluation, HistoryLog};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::keys::{Key, Keypad};

#[derive(Parser)]
#[command(name = "keypad")]
#[command(about = "Keypad calculator with a restricted expression evaluator")]
#[command(long_about = "Keypad calculator with a restricted expression evaluator

Keys:
  0-9 . + - * / // % ** ( ) ,   appended as typed
  × ÷ ^ π √                     keypad glyphs, normalized before evaluation
  =  C  BS  NEG  1/x  ln        evaluate, clear, backspace, sign, reciprocal, natural log

Examples:
  keypad eval 2 × 3 ^ 2         # 18
  keypad eval '√16)' + 1        # 5.0
  keypad eval --json 7 // 2     # {\"display\":\"3\",...}
  keypad                        # interactive REPL")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Configuration file (toml, yaml or json)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a sequence of keys once and print the result
    Eval {
        /// Keys, e.g. `2 × 3` or `2*3`
        #[arg(required = true, allow_hyphen_values = true)]
        keys: Vec<String>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the interactive keypad (default)
    Repl,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    // Configure colored output
    let color = config.repl.color && !cli.no_color;
    if !color {
        colored::control::set_override(false);
    }

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else {
        config.log.level.as_str()
    };
    let _log_guard = logging::init_logging(log_level, config.log.file.as_deref(), color)
        .context("Failed to initialize logging")?;
    debug!(?config, "Configuration loaded");

    match cli.command {
        Some(Commands::Eval { keys, json }) => run_eval(&keys, json),
        Some(Commands::Repl) | None => {
            repl::run_repl(&config.repl)?;
            Ok(ExitCode::SUCCESS)
        },
    }
}

/// Press all keys, evaluate once at the end unless the keys already did
fn run_eval(args: &[String], json: bool) -> Result<ExitCode> {
    let line = args.join(" ");
    let mut keypad = Keypad::new();

    let mut outcome = keypad.press_line(&line).pop();
    if !line.trim_end().ends_with('=') {
        outcome = keypad.press(&Key::Equals);
    }
    let outcome = outcome.unwrap_or(Evaluation::Empty);

    if json {
        print_json(&outcome, keypad.subdisplay(), keypad.session().history())?;
    } else if outcome.is_error() {
        println!("{}", outcome.to_string().red());
    } else {
        println!("{}", outcome);
    }

    Ok(if outcome.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_json(outcome: &Evaluation, expression: &str, history: &HistoryLog) -> Result<()> {
    let body = serde_json::json!({
        "expression": expression,
        "display": outcome.to_string(),
        "value": outcome.value(),
        "error": outcome.is_error(),
        "history": history,
    });
    let text = serde_json::to_string(&body).context("Failed to serialize result")?;
    println!("{}", text);
    Ok(())
}
