//! Appointment booking service.
//!
//! Sits between the console and the `AppointmentBook`: every creation and
//! every start-time or duration change passes the scheduling policy before it
//! is committed. Field rules stay on the entity; cross-appointment rules live
//! in `crate::scheduling`.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::models::{
    effective_duration, Appointment, AppointmentDraft, AppointmentId, AppointmentStatus,
    ValidationError,
};
use crate::scheduling::{self, SchedulingError, Slot};
use crate::store::{AppointmentBook, PetDirectory, Selector};

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppointmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error("Appointment not found")]
    NotFound,
}

impl AppointmentError {
    /// Whether re-prompting with different input can succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

// ─── Types ────────────────────────────────────────────────────────────────────

/// Candidate fields for a booking, as collected by the caller.
pub type AppointmentRequest = AppointmentDraft;

/// One field edit on an existing appointment.
#[derive(Debug, Clone, PartialEq)]
pub enum AppointmentChange {
    DateTime(NaiveDateTime),
    /// `None` restores the default length.
    Duration(Option<i64>),
    Reason(String),
    Veterinarian(String),
    Status(AppointmentStatus),
}

// ─── Operations ───────────────────────────────────────────────────────────────

/// Checks a prospective start and length for a new booking without touching
/// the book. Lets the caller loop on time and duration before asking for the
/// remaining fields.
pub fn propose_slot(
    book: &AppointmentBook,
    date_time: NaiveDateTime,
    duration: Option<i64>,
    now: NaiveDateTime,
) -> Result<Slot, AppointmentError> {
    if date_time < now {
        return Err(ValidationError::InPast { requested: date_time }.into());
    }
    let slot = Slot::new(date_time, effective_duration(duration)?);
    scheduling::check_slot(slot, book, None)?;
    Ok(slot)
}

/// Validates the request, runs the scheduling policy, then appends.
/// Nothing is added unless every check passes.
pub fn schedule_appointment(
    book: &mut AppointmentBook,
    request: AppointmentRequest,
    now: NaiveDateTime,
) -> Result<AppointmentId, AppointmentError> {
    let appointment = Appointment::new(request, now)?;
    scheduling::check_slot(slot_of(&appointment), &*book, None)?;

    let id = book.add(appointment);
    tracing::info!(appointment = %id, "Appointment scheduled");
    Ok(id)
}

/// Applies one change to the selected appointment. The edit is made on a copy
/// and written back only once the field rule and, for time or length changes,
/// the scheduling policy accept it.
pub fn modify_appointment(
    book: &mut AppointmentBook,
    selector: impl Into<Selector>,
    change: AppointmentChange,
    now: NaiveDateTime,
) -> Result<AppointmentId, AppointmentError> {
    let current = book.get(selector).ok_or(AppointmentError::NotFound)?;
    let id = current.id();
    let mut candidate = current.clone();

    match change {
        AppointmentChange::DateTime(date_time) => {
            candidate.set_date_time(date_time, now)?;
            scheduling::check_slot(slot_of(&candidate), &*book, Some(id))?;
        }
        AppointmentChange::Duration(duration) => {
            candidate.set_duration(duration)?;
            // Start is unchanged, so only the overlap is re-checked.
            scheduling::check_no_conflict(slot_of(&candidate), &*book, Some(id))?;
        }
        AppointmentChange::Reason(reason) => candidate.set_reason(&reason)?,
        AppointmentChange::Veterinarian(name) => candidate.set_veterinarian(&name)?,
        AppointmentChange::Status(status) => candidate.set_status(status),
    }

    let slot = book.get_mut(id).ok_or(AppointmentError::NotFound)?;
    *slot = candidate;
    tracing::info!(appointment = %id, "Appointment updated");
    Ok(id)
}

pub fn delete_appointment(
    book: &mut AppointmentBook,
    selector: impl Into<Selector>,
) -> Result<Appointment, AppointmentError> {
    let removed = book.remove(selector).ok_or(AppointmentError::NotFound)?;
    tracing::info!(appointment = %removed.id(), "Appointment deleted");
    Ok(removed)
}

/// Two-line desk rendering, resolving pet and owner through the directory.
pub fn describe<D: PetDirectory + ?Sized>(appointment: &Appointment, pets: &D) -> String {
    let (pet_name, owner_name) = pets
        .pet(appointment.pet_id())
        .map(|pet| (pet.name(), pet.owner().name()))
        .unwrap_or(("<unknown pet>", "<unknown owner>"));

    format!(
        "appointment for {pet_name} ({owner_name}) on {} with {} - {} (duration: {} mins)\nreason: {}",
        appointment.formatted_date_time(),
        appointment.veterinarian(),
        appointment.status(),
        appointment.duration_minutes(),
        appointment.reason(),
    )
}

fn slot_of(appointment: &Appointment) -> Slot {
    Slot::new(appointment.date_time(), appointment.duration_minutes())
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
