pub mod appointment; // booking service: policy-checked create/modify/delete
pub mod commands; // desk console and menu loop
pub mod config;
pub mod core_state; // ClinicState: stores, file paths, clock
pub mod models;
pub mod persistence; // PetDetails.txt / AppointmentDetails.txt codecs
pub mod report;
pub mod scheduling; // clinic hours + double-booking engine
pub mod store;

use std::io::{self, Write};

use tracing_subscriber::EnvFilter;

use crate::commands::{Console, ConsoleError, SessionEnd};
use crate::core_state::{ClinicState, LoadSummary};

/// Loads the clinic records, runs the desk menu on stdin/stdout, and returns
/// once the operator saves or input closes.
pub fn run() -> Result<(), ConsoleError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(io::stderr)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let mut state = ClinicState::from_config();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match state.load() {
        Ok(summary) => print_load_summary(&mut out, &summary)?,
        Err(e) => {
            tracing::error!(error = %e, "Load failed");
            writeln!(out, "Error loading data: {e}")?;
        }
    }

    let mut console = Console::new(io::stdin().lock(), out);
    match commands::run_menu(&mut state, &mut console)? {
        SessionEnd::Saved => tracing::info!("Session ended after save"),
        SessionEnd::EndOfInput => tracing::info!("Session ended without save"),
    }
    Ok(())
}

fn print_load_summary(out: &mut impl Write, summary: &LoadSummary) -> io::Result<()> {
    writeln!(out, "Successfully loaded {} pets.", summary.pets_loaded)?;
    writeln!(out, "Failed to load {} pets.", summary.pets_skipped.len())?;
    writeln!(
        out,
        "Appointments loaded successfully. Total: {}",
        summary.appointments_loaded
    )?;
    if !summary.appointments_skipped.is_empty() {
        writeln!(
            out,
            "Skipped {} unreadable appointment line(s).",
            summary.appointments_skipped.len()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_summary_mentions_skipped_appointments_only_when_present() {
        let mut out = Vec::new();
        print_load_summary(&mut out, &LoadSummary::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Successfully loaded 0 pets."));
        assert!(!text.contains("Skipped"));
    }
}
