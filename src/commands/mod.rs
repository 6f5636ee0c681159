//! Desk console: menu loop and prompt helpers.
//!
//! Handlers read from any `BufRead` and write to any `Write`, so the whole
//! menu can be driven from an in-memory script. End of input at any prompt
//! abandons the current operation; at the menu it ends the session without
//! saving.

/// Unwraps a prompt answer, leaving the handler on end of input.
macro_rules! answer {
    ($console:expr, $label:expr) => {
        match $console.prompt($label)? {
            Some(value) => value,
            None => return Ok(()),
        }
    };
}

pub mod appointment;
pub mod pets;

use std::io::{self, BufRead, Write};

use crate::config;
use crate::core_state::ClinicState;

/// How the menu loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Option 12: data written, then exit.
    Saved,
    /// Input closed; nothing written.
    EndOfInput,
}

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Console I/O error: {0}")]
    Io(#[from] io::Error),
}

// ═══════════════════════════════════════════════════════════
// Console
// ═══════════════════════════════════════════════════════════

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Prints `label` without a newline and reads one trimmed line.
    /// `None` means the input is exhausted.
    pub fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn say(&mut self, text: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Reads a 1-based choice in `1..=max`; returns it zero-based.
    /// `Ok(None)` covers both EOF and an invalid entry (already reported).
    pub fn choose(&mut self, label: &str, max: usize) -> io::Result<Option<usize>> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };
        match raw.parse::<usize>() {
            Ok(n) if (1..=max).contains(&n) => Ok(Some(n - 1)),
            Ok(_) => {
                self.say("Invalid selection.")?;
                Ok(None)
            }
            Err(_) => {
                self.say("Invalid input. Please enter a number.")?;
                Ok(None)
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Menu loop
// ═══════════════════════════════════════════════════════════

const MENU: &[&str] = &[
    "Add Pet",
    "Delete Pet",
    "Search for Pet",
    "View All Pets",
    "Modify Pet",
    "Generate Report",
    "Add Appointment",
    "Delete Appointment",
    "Modify Appointment",
    "View Appointments",
    "Search Appointments",
    "Save & Exit",
];

fn print_menu<R: BufRead, W: Write>(console: &mut Console<R, W>) -> io::Result<()> {
    console.say("\n===============================")?;
    console.say(format!("\t{}", config::APP_NAME))?;
    console.say("===============================")?;
    for (index, label) in MENU.iter().enumerate() {
        console.say(format!("{}. {label}", index + 1))?;
    }
    Ok(())
}

/// Runs the desk menu until the operator saves or input ends.
pub fn run_menu<R: BufRead, W: Write>(
    state: &mut ClinicState,
    console: &mut Console<R, W>,
) -> Result<SessionEnd, ConsoleError> {
    loop {
        print_menu(console)?;
        let Some(choice) = console.prompt("Choose an option: ")? else {
            tracing::info!("Input closed, leaving without saving");
            return Ok(SessionEnd::EndOfInput);
        };

        match choice.parse::<u32>() {
            Ok(1) => pets::add_pet(state, console)?,
            Ok(2) => pets::delete_pet(state, console)?,
            Ok(3) => pets::search_pets(state, console)?,
            Ok(4) => pets::view_pets(state, console)?,
            Ok(5) => pets::modify_pet(state, console)?,
            Ok(6) => pets::report(state, console)?,
            Ok(7) => appointment::add_appointment(state, console)?,
            Ok(8) => appointment::delete_appointment(state, console)?,
            Ok(9) => appointment::modify_appointment(state, console)?,
            Ok(10) => appointment::view_appointments(state, console)?,
            Ok(11) => appointment::search_appointments(state, console)?,
            Ok(12) => match state.save() {
                Ok(summary) => {
                    console.say(format!("Total pets saved: {}", summary.pets_saved))?;
                    console.say(format!(
                        "Total appointments saved: {}",
                        summary.appointments_saved
                    ))?;
                    console.say("Exiting the system...")?;
                    return Ok(SessionEnd::Saved);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Save failed");
                    console.say(format!("Error saving data: {e}"))?;
                }
            },
            Ok(_) => console.say("Invalid choice. Please try again.")?,
            Err(_) => console.say("Invalid input. Please enter a number between 1 and 12.")?,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Test harness
// ═══════════════════════════════════════════════════════════


#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::harness::*;
    use super::*;

    fn session(state: &mut ClinicState, script: &str) -> (SessionEnd, String) {
        let mut console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        let end = run_menu(state, &mut console).unwrap();
        (end, String::from_utf8(console.into_output()).unwrap())
    }

    #[test]
    fn end_of_input_leaves_without_saving() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state(&dir);
        let script = format!("1\n{}", add_pet_script("Ann", "Tiger", "Cat"));
        let (end, out) = session(&mut state, &script);
        assert_eq!(end, SessionEnd::EndOfInput);
        assert!(out.contains("Tiger has been added to the clinic."));
        assert!(!state.pets_path.exists());
    }

    #[test]
    fn save_and_exit_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state(&dir);
        let script = format!(
            "1\n{}7\nTiger\n09:00 02/01/2030\n\nVaccination\nDr Green\n12\n",
            add_pet_script("Ann", "Tiger", "Cat")
        );
        let (end, out) = session(&mut state, &script);
        assert_eq!(end, SessionEnd::Saved);
        assert!(out.contains("Total appointments saved: 1"));

        let saved = std::fs::read_to_string(&state.appointments_path).unwrap();
        assert_eq!(saved, "Tiger, 09:00 02/01/2030, Vaccination, Dr Green, 30, SCHEDULED\n");
    }

    #[test]
    fn bad_menu_input_is_reported_and_the_loop_continues() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state(&dir);
        let (end, out) = session(&mut state, "abc\n42\n4\n");
        assert_eq!(end, SessionEnd::EndOfInput);
        assert!(out.contains("Invalid input. Please enter a number between 1 and 12."));
        assert!(out.contains("Invalid choice. Please try again."));
        assert!(out.contains("No pets available."));
    }

    #[test]
    fn choose_rejects_out_of_range() {
        let mut console = Console::new(Cursor::new(b"0\n3\nx\n2\n".to_vec()), Vec::new());
        assert_eq!(console.choose("> ", 2).unwrap(), None);
        assert_eq!(console.choose("> ", 2).unwrap(), None);
        assert_eq!(console.choose("> ", 2).unwrap(), None);
        assert_eq!(console.choose("> ", 2).unwrap(), Some(1));
        assert_eq!(console.choose("> ", 2).unwrap(), None);
    }
}
