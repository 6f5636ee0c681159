//! Appointment desk commands: add, delete, modify, view, search.
//!
//! Time and duration are collected in a loop until the slot passes the
//! clinic-hours and double-booking checks; other fields are asked once and
//! a failure ends the operation.

use std::io::{self, BufRead, Write};

use chrono::NaiveDateTime;

use super::pets::select_pet;
use super::Console;
use crate::appointment::{describe, propose_slot, AppointmentChange, AppointmentError, AppointmentRequest};
use crate::core_state::ClinicState;
use crate::models::{parse_date_time, AppointmentStatus, DEFAULT_DURATION_MINUTES};
use crate::scheduling::SchedulingError;
use crate::store::Selector;

pub fn add_appointment<R: BufRead, W: Write>(
    state: &mut ClinicState,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    if state.pets().is_empty() {
        return console.say("No pets available. Please add a pet first.");
    }

    console.say("Select a pet for the appointment:")?;
    for pet in state.pets().iter() {
        console.say(pet)?;
    }
    let Some(pet_id) = select_pet(state, console, "Enter pet name: ")? else {
        return Ok(());
    };

    let (date_time, duration) = loop {
        let Some(date_time) = read_date_time(console, "Enter appointment date and time (HH:mm dd/MM/yyyy): ")? else {
            return Ok(());
        };
        let duration_text = answer!(
            console,
            "Enter appointment duration in minutes (or press Enter for default 30 minutes): "
        );
        let duration = parse_duration(&duration_text);
        if duration.is_none() && !duration_text.is_empty() {
            console.say(format!("Invalid duration. Using default {DEFAULT_DURATION_MINUTES} minutes."))?;
        }

        match propose_slot(state.appointments(), date_time, duration, state.now()) {
            Ok(_) => break (date_time, duration),
            Err(e) => report_slot_error(state, console, &e)?,
        }
    };

    let reason = answer!(console, "Enter reason for appointment: ");
    let veterinarian = answer!(console, "Enter veterinarian name: ");

    let request = AppointmentRequest {
        pet_id: Some(pet_id),
        date_time: Some(date_time),
        reason,
        veterinarian,
        duration,
    };
    match state.schedule(request) {
        Ok(id) => {
            console.say("Appointment added successfully:")?;
            match state.appointments().get(id) {
                Some(appointment) => console.say(describe(appointment, state.pets())),
                None => Ok(()),
            }
        }
        Err(e) => console.say(format!("Error adding appointment: {e}")),
    }
}

pub fn delete_appointment<R: BufRead, W: Write>(
    state: &mut ClinicState,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    let Some(selector) = select_appointment(state, console, "Select an appointment to delete:")? else {
        return Ok(());
    };
    match state.delete_appointment(selector) {
        Ok(_) => console.say("Appointment deleted successfully."),
        Err(e) => console.say(format!("Error: {e}")),
    }
}

const APPOINTMENT_FIELDS: &[&str] = &[
    "Change Date and Time",
    "Change Reason",
    "Change Veterinarian",
    "Change Status",
    "Change Duration",
    "Cancel",
];

pub fn modify_appointment<R: BufRead, W: Write>(
    state: &mut ClinicState,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    let Some(selector) = select_appointment(state, console, "Select an appointment to modify:")? else {
        return Ok(());
    };

    loop {
        console.say("\nModify Appointment:")?;
        for (index, field) in APPOINTMENT_FIELDS.iter().enumerate() {
            console.say(format!("{}. {field}", index + 1))?;
        }
        let choice = answer!(console, "Choose an attribute to modify: ");

        let (change, done) = match choice.parse::<u32>() {
            Ok(1) => return reschedule(state, console, selector),
            Ok(2) => (
                AppointmentChange::Reason(answer!(console, "Enter new reason: ")),
                "Reason updated successfully.",
            ),
            Ok(3) => (
                AppointmentChange::Veterinarian(answer!(console, "Enter new veterinarian name: ")),
                "Veterinarian updated successfully.",
            ),
            Ok(4) => {
                console.say("Select new status:")?;
                for (index, status) in AppointmentStatus::ALL.iter().enumerate() {
                    console.say(format!("{}. {status}", index + 1))?;
                }
                let Some(index) = console.choose("Enter status number: ", AppointmentStatus::ALL.len())? else {
                    continue;
                };
                (
                    AppointmentChange::Status(AppointmentStatus::ALL[index]),
                    "Status updated successfully.",
                )
            }
            Ok(5) => {
                let text = answer!(
                    console,
                    "Enter new duration in minutes (or press Enter for default 30 minutes): "
                );
                if !text.is_empty() && text.parse::<i64>().is_err() {
                    console.say("Invalid input. Please enter a valid number.")?;
                    continue;
                }
                (AppointmentChange::Duration(parse_duration(&text)), "Duration updated successfully.")
            }
            Ok(6) => return console.say("Modification cancelled."),
            Ok(_) => {
                console.say("Invalid choice. Please try again.")?;
                continue;
            }
            Err(_) => {
                console.say("Invalid input. Please enter a valid number.")?;
                continue;
            }
        };

        let is_duration = matches!(change, AppointmentChange::Duration(_));
        return match state.modify(selector, change) {
            Ok(_) => console.say(done),
            Err(e @ AppointmentError::Scheduling(_)) if is_duration => {
                report_slot_error(state, console, &e)?;
                console.say("Cannot update duration due to conflicts with other appointments.")
            }
            Err(e) => console.say(format!("Error: {e}")),
        };
    }
}

pub fn view_appointments<R: BufRead, W: Write>(
    state: &mut ClinicState,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    if state.appointments().is_empty() {
        return console.say("No appointments available.");
    }
    console.say("List of Appointments:")?;
    for appointment in state.appointments() {
        console.say(describe(appointment, state.pets()))?;
    }
    Ok(())
}

pub fn search_appointments<R: BufRead, W: Write>(
    state: &mut ClinicState,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    if state.appointments().is_empty() {
        return console.say("No appointments available.");
    }
    let term = answer!(console, "Enter pet name or owner name to search: ");
    let found = state.appointments().search(&term, state.pets());
    if found.is_empty() {
        return console.say("No appointments found matching the search criteria.");
    }
    console.say("Matching Appointments:")?;
    for appointment in found {
        console.say(describe(appointment, state.pets()))?;
    }
    Ok(())
}

/// Loops on a new start time until it is accepted or input ends.
fn reschedule<R: BufRead, W: Write>(
    state: &mut ClinicState,
    console: &mut Console<R, W>,
    selector: Selector,
) -> io::Result<()> {
    loop {
        let Some(date_time) = read_date_time(console, "Enter new date and time (HH:mm dd/MM/yyyy): ")? else {
            return Ok(());
        };
        match state.modify(selector, AppointmentChange::DateTime(date_time)) {
            Ok(_) => return console.say("Date and time updated successfully."),
            Err(e) if e.is_retryable() => report_slot_error(state, console, &e)?,
            Err(e) => return console.say(format!("Error: {e}")),
        }
    }
}

/// Numbered list of every appointment; the operator picks one by position.
fn select_appointment<R: BufRead, W: Write>(
    state: &ClinicState,
    console: &mut Console<R, W>,
    label: &str,
) -> io::Result<Option<Selector>> {
    if state.appointments().is_empty() {
        console.say("No appointments available.")?;
        return Ok(None);
    }
    console.say(label)?;
    for (index, appointment) in state.appointments().all().enumerate() {
        console.say(format!("{}. {}", index + 1, describe(appointment, state.pets())))?;
    }
    let picked = console.choose("Enter appointment number: ", state.appointments().len())?;
    Ok(picked.map(Selector::Position))
}

/// Re-prompts on unparseable input; `None` on end of input.
fn read_date_time<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    label: &str,
) -> io::Result<Option<NaiveDateTime>> {
    loop {
        let Some(raw) = console.prompt(label)? else {
            return Ok(None);
        };
        match parse_date_time(&raw) {
            Ok(date_time) => return Ok(Some(date_time)),
            Err(e) => console.say(format!("Error: {e}"))?,
        }
    }
}

/// Empty, non-numeric and non-positive entries all mean "use the default".
fn parse_duration(text: &str) -> Option<i64> {
    text.parse::<i64>().ok().filter(|minutes| *minutes > 0)
}

/// Prints a rejected slot, naming the booking it collides with.
fn report_slot_error<R: BufRead, W: Write>(
    state: &ClinicState,
    console: &mut Console<R, W>,
    error: &AppointmentError,
) -> io::Result<()> {
    if let AppointmentError::Scheduling(SchedulingError::Conflict { with, .. }) = error {
        if let Some(other) = state.appointments().get(*with) {
            console.say(format!("Conflict with appointment: {}", describe(other, state.pets())))?;
        }
    }
    console.say(format!("{error}. Please choose another time."))
}

#[cfg(test)]
mod tests {
    use super::super::harness::*;
    use super::super::pets::add_pet;
    use super::*;

    fn clinic(dir: &tempfile::TempDir) -> ClinicState {
        let mut state = state(dir);
        drive(&mut state, &add_pet_script("Ann Lee", "Tiger", "Cat"), add_pet);
        drive(&mut state, &add_pet_script("Bob Stone", "Rex", "Dog"), add_pet);
        state
    }

    fn book(state: &mut ClinicState, pet: &str, when: &str, duration: &str) -> String {
        let script = format!("{pet}\n{when}\n{duration}\nCheckup\nDr Green\n");
        drive(state, &script, add_appointment)
    }

    #[test]
    fn add_appointment_books_and_prints_it() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = clinic(&dir);
        let out = book(&mut state, "tiger", "09:00 02/01/2030", "45");
        assert!(out.contains("Appointment added successfully:"));
        assert!(out.contains(
            "appointment for Tiger (Ann Lee) on 09:00 02/01/2030 with Dr Green - SCHEDULED (duration: 45 mins)\nreason: Checkup"
        ));
    }

    #[test]
    fn add_appointment_loops_until_slot_is_free() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = clinic(&dir);
        book(&mut state, "Tiger", "10:00 02/01/2030", "");

        let script = "Rex\n\
                      10:15 02/01/2030\n30\n\
                      19:00 02/01/2030\n\n\
                      bad date\n\
                      10:30 02/01/2030\nabc\n\
                      Dental\nDr Green\n";
        let out = drive(&mut state, script, add_appointment);
        assert!(out.contains("Conflict with appointment: appointment for Tiger"));
        assert!(out.contains("This time slot is already booked"));
        assert!(out.contains("Appointment must be between 8:00 and 18:00"));
        assert!(out.contains("Invalid date and time 'bad date'"));
        assert!(out.contains("Invalid duration. Using default 30 minutes."));
        assert!(out.contains("on 10:30 02/01/2030 with Dr Green - SCHEDULED (duration: 30 mins)"));
        assert_eq!(state.appointments().len(), 2);
    }

    #[test]
    fn add_appointment_stops_on_invalid_veterinarian() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = clinic(&dir);
        let out = drive(&mut state, "Tiger\n09:00 02/01/2030\n\nCheckup\nDr 99\n", add_appointment);
        assert!(out.contains("Error adding appointment: Veterinarian name can only contain letters and spaces"));
        assert!(state.appointments().is_empty());
    }

    #[test]
    fn add_appointment_without_pets() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state(&dir);
        let out = drive(&mut state, "", add_appointment);
        assert!(out.contains("No pets available. Please add a pet first."));
    }

    #[test]
    fn modify_status_from_numbered_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = clinic(&dir);
        book(&mut state, "Tiger", "09:00 02/01/2030", "");
        let out = drive(&mut state, "1\n4\n3\n", modify_appointment);
        assert!(out.contains("3. CANCELLED"));
        assert!(out.contains("Status updated successfully."));
        let appt = state.appointments().all().next().unwrap();
        assert_eq!(appt.status(), AppointmentStatus::Cancelled);
    }

    #[test]
    fn reschedule_retries_past_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = clinic(&dir);
        book(&mut state, "Tiger", "09:00 02/01/2030", "");
        book(&mut state, "Rex", "11:00 02/01/2030", "");
        let out = drive(&mut state, "2\n1\n09:15 02/01/2030\n13:00 02/01/2030\n", modify_appointment);
        assert!(out.contains("This time slot is already booked"));
        assert!(out.contains("Date and time updated successfully."));
        let rex = state.appointments().get(Selector::Position(1)).unwrap();
        assert_eq!(rex.formatted_date_time(), "13:00 02/01/2030");
    }

    #[test]
    fn lengthening_into_a_neighbour_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = clinic(&dir);
        book(&mut state, "Tiger", "09:00 02/01/2030", "30");
        book(&mut state, "Rex", "09:30 02/01/2030", "30");
        let out = drive(&mut state, "1\n5\n60\n", modify_appointment);
        assert!(out.contains("Cannot update duration due to conflicts with other appointments."));
        assert_eq!(state.appointments().all().next().unwrap().duration_minutes(), 30);

        let out = drive(&mut state, "2\n5\n\n", modify_appointment);
        assert!(out.contains("Duration updated successfully."));
    }

    #[test]
    fn delete_by_number() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = clinic(&dir);
        book(&mut state, "Tiger", "09:00 02/01/2030", "");
        let out = drive(&mut state, "5\n", delete_appointment);
        assert!(out.contains("Invalid selection."));
        let out = drive(&mut state, "1\n", delete_appointment);
        assert!(out.contains("Appointment deleted successfully."));
        assert!(state.appointments().is_empty());
    }

    #[test]
    fn search_by_owner_substring() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = clinic(&dir);
        book(&mut state, "Tiger", "09:00 02/01/2030", "");
        book(&mut state, "Rex", "10:00 02/01/2030", "");
        let out = drive(&mut state, "STON\n", search_appointments);
        assert!(out.contains("appointment for Rex (Bob Stone)"));
        assert!(!out.contains("appointment for Tiger"));

        let out = drive(&mut state, "zzz\n", search_appointments);
        assert!(out.contains("No appointments found matching the search criteria."));
    }

    #[test]
    fn view_lists_in_booking_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = clinic(&dir);
        book(&mut state, "Rex", "15:00 02/01/2030", "");
        book(&mut state, "Tiger", "09:00 02/01/2030", "");
        let out = drive(&mut state, "", view_appointments);
        let rex = out.find("appointment for Rex").unwrap();
        let tiger = out.find("appointment for Tiger").unwrap();
        assert!(rex < tiger);
    }
}
