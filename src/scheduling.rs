//! Clinic-hours policy and double-booking detection.
//!
//! Pure functions over a candidate slot and the appointments already on the
//! books. The clinic runs a single timeline: any two non-cancelled
//! appointments whose occupied intervals `[start, start + duration)` intersect
//! are in conflict.

use chrono::{NaiveDateTime, Timelike};
use thiserror::Error;

use crate::models::{end_of, format_date_time, Appointment, AppointmentId, DATETIME_FORMAT};

/// First bookable hour (inclusive).
pub const CLINIC_OPEN_HOUR: u32 = 8;

/// Closing hour (exclusive): 17:59 is bookable, 18:00 is not.
pub const CLINIC_CLOSE_HOUR: u32 = 18;

/// Policy violations. Both are retryable with a different time or duration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error(
        "Appointment must be between {open}:00 and {close}:00 (requested {})",
        .requested.format(DATETIME_FORMAT),
        open = CLINIC_OPEN_HOUR,
        close = CLINIC_CLOSE_HOUR
    )]
    OutsideClinicHours { requested: NaiveDateTime },

    #[error(
        "This time slot is already booked ({} - {})",
        .start.format(DATETIME_FORMAT),
        .end.format(DATETIME_FORMAT)
    )]
    Conflict {
        with: AppointmentId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// A prospective occupied interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: NaiveDateTime,
    pub duration_minutes: u32,
}

impl Slot {
    pub fn new(start: NaiveDateTime, duration_minutes: u32) -> Self {
        Self { start, duration_minutes }
    }

    pub fn end(&self) -> NaiveDateTime {
        end_of(self.start, self.duration_minutes)
    }

    /// Half-open overlap, plus an explicit same-start check. The second test is
    /// already implied by the first for positive durations.
    pub fn overlaps(&self, other_start: NaiveDateTime, other_end: NaiveDateTime) -> bool {
        (self.start < other_end && self.end() > other_start) || self.start == other_start
    }
}

/// Only the hour is checked; minutes are not restricted to slot boundaries.
pub fn is_within_clinic_hours(date_time: NaiveDateTime) -> bool {
    (CLINIC_OPEN_HOUR..CLINIC_CLOSE_HOUR).contains(&date_time.hour())
}

/// First non-cancelled appointment (other than `excluding`) that the slot collides with.
pub fn find_conflict<'a, I>(
    slot: Slot,
    existing: I,
    excluding: Option<AppointmentId>,
) -> Option<&'a Appointment>
where
    I: IntoIterator<Item = &'a Appointment>,
{
    existing.into_iter().find(|other| {
        Some(other.id()) != excluding
            && other.status().occupies_slot()
            && slot.overlaps(other.date_time(), other.end_time())
    })
}

pub fn has_conflict<'a, I>(slot: Slot, existing: I, excluding: Option<AppointmentId>) -> bool
where
    I: IntoIterator<Item = &'a Appointment>,
{
    find_conflict(slot, existing, excluding).is_some()
}

/// Runs both policy checks in order: clinic hours, then overlap.
pub fn check_slot<'a, I>(
    slot: Slot,
    existing: I,
    excluding: Option<AppointmentId>,
) -> Result<(), SchedulingError>
where
    I: IntoIterator<Item = &'a Appointment>,
{
    if !is_within_clinic_hours(slot.start) {
        return Err(SchedulingError::OutsideClinicHours { requested: slot.start });
    }
    check_no_conflict(slot, existing, excluding)
}

/// Overlap check only. Used when the start is unchanged and only the length moves.
pub fn check_no_conflict<'a, I>(
    slot: Slot,
    existing: I,
    excluding: Option<AppointmentId>,
) -> Result<(), SchedulingError>
where
    I: IntoIterator<Item = &'a Appointment>,
{
    if let Some(other) = find_conflict(slot, existing, excluding) {
        tracing::debug!(
            conflict_with = %other.id(),
            requested = %format_date_time(slot.start),
            "Slot rejected: overlaps an existing appointment"
        );
        return Err(SchedulingError::Conflict {
            with: other.id(),
            start: other.date_time(),
            end: other.end_time(),
        });
    }

    Ok(())
}
