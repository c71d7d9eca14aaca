//! Terminal output and prompting.
//!
//! The `print_*` helpers keep every message the same shape: red `✕ Error:` prefix for
//! failures, green check for successes, plain white for information. [`TerminalSink`]
//! routes orchestrator notices through them and asks yes/no questions on stdin.

use crate::core::decision::{DecisionSink, NotifyLevel, RiskyAction};
use colored::*;
use std::io::{self, BufRead, Write};

pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Prints `<header>:` with a blank line above and below
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}

/// Decision sink for an interactive terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalSink {
    assume_yes: bool,
}

impl TerminalSink {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    fn ask(&self, action: &RiskyAction, input: &mut impl BufRead) -> io::Result<bool> {
        println!("\n{} {}", "!".yellow().bold(), action.title().yellow());
        println!("  {}", action.details().white());
        print!("\n{} ", "Proceed? [y/N]:".blue());
        io::stdout().flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

impl DecisionSink for TerminalSink {
    fn propose_risky_action(&self, action: &RiskyAction) -> bool {
        if self.assume_yes {
            log::debug!("--yes given, accepting '{}'", action.title());
            return true;
        }

        match self.ask(action, &mut io::stdin().lock()) {
            Ok(accepted) => accepted,
            Err(e) => {
                log::warn!("Could not read an answer, treating as no: {e}");
                false
            }
        }
    }

    fn notify(&self, level: NotifyLevel, message: &str) {
        match level {
            NotifyLevel::Success => print_success(message),
            NotifyLevel::Error => print_error(message),
            NotifyLevel::Info => print_info(message),
        }
    }
}
