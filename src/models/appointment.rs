//! Appointment entity: one validated booking of a pet with a veterinarian.
//!
//! The entity owns per-field rules only. Clinic hours and double-booking are
//! decided by `crate::scheduling` before a booking reaches the entity.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDateTime};
use regex::Regex;
use uuid::Uuid;

use super::{require_text, AppointmentStatus, PetId, ValidationError};

/// Length used whenever a booking arrives without a positive duration.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// `HH:mm dd/MM/yyyy`, shared by the console and the appointment file.
pub const DATETIME_FORMAT: &str = "%H:%M %d/%m/%Y";

static VETERINARIAN_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z ]+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppointmentId(Uuid);

impl AppointmentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AppointmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Candidate fields for a new appointment, before validation.
#[derive(Debug, Clone, Default)]
pub struct AppointmentDraft {
    pub pet_id: Option<PetId>,
    pub date_time: Option<NaiveDateTime>,
    pub reason: String,
    pub veterinarian: String,
    /// Minutes; `None` or a non-positive value falls back to the default.
    pub duration: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    id: AppointmentId,
    pet_id: PetId,
    date_time: NaiveDateTime,
    reason: String,
    veterinarian: String,
    duration_minutes: u32,
    status: AppointmentStatus,
}

impl Appointment {
    /// Builds a new `Scheduled` appointment. Either every field is valid or
    /// nothing is constructed.
    pub fn new(draft: AppointmentDraft, now: NaiveDateTime) -> Result<Self, ValidationError> {
        let pet_id = draft.pet_id.ok_or(ValidationError::MissingPet)?;
        let date_time = check_not_past(draft.date_time, now)?;
        Self::build(
            pet_id,
            date_time,
            &draft.reason,
            &draft.veterinarian,
            draft.duration,
            AppointmentStatus::Scheduled,
        )
    }

    /// Rebuilds a persisted appointment. Historical timestamps are allowed here;
    /// every other field rule still applies.
    pub fn restore(
        pet_id: PetId,
        date_time: NaiveDateTime,
        reason: &str,
        veterinarian: &str,
        duration: Option<i64>,
        status: AppointmentStatus,
    ) -> Result<Self, ValidationError> {
        Self::build(pet_id, date_time, reason, veterinarian, duration, status)
    }

    fn build(
        pet_id: PetId,
        date_time: NaiveDateTime,
        reason: &str,
        veterinarian: &str,
        duration: Option<i64>,
        status: AppointmentStatus,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: AppointmentId::new(),
            pet_id,
            date_time: truncate_to_minute(date_time),
            reason: check_reason(reason)?,
            veterinarian: check_veterinarian(veterinarian)?,
            duration_minutes: effective_duration(duration)?,
            status,
        })
    }

    pub fn id(&self) -> AppointmentId {
        self.id
    }

    pub fn pet_id(&self) -> PetId {
        self.pet_id
    }

    pub fn date_time(&self) -> NaiveDateTime {
        self.date_time
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn veterinarian(&self) -> &str {
        &self.veterinarian
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn status(&self) -> AppointmentStatus {
        self.status
    }

    /// Exclusive end of the occupied interval `[date_time, end_time)`.
    pub fn end_time(&self) -> NaiveDateTime {
        end_of(self.date_time, self.duration_minutes)
    }

    pub fn formatted_date_time(&self) -> String {
        format_date_time(self.date_time)
    }

    pub fn set_date_time(
        &mut self,
        date_time: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<(), ValidationError> {
        self.date_time = truncate_to_minute(check_not_past(Some(date_time), now)?);
        Ok(())
    }

    pub fn set_reason(&mut self, reason: &str) -> Result<(), ValidationError> {
        self.reason = check_reason(reason)?;
        Ok(())
    }

    pub fn set_veterinarian(&mut self, veterinarian: &str) -> Result<(), ValidationError> {
        self.veterinarian = check_veterinarian(veterinarian)?;
        Ok(())
    }

    pub fn set_duration(&mut self, duration: Option<i64>) -> Result<(), ValidationError> {
        self.duration_minutes = effective_duration(duration)?;
        Ok(())
    }

    /// Any status may follow any other.
    pub fn set_status(&mut self, status: AppointmentStatus) {
        self.status = status;
    }
}

/// Absent or non-positive durations become [`DEFAULT_DURATION_MINUTES`].
/// Positive values are kept as given up to `u32::MAX` minutes.
pub fn effective_duration(duration: Option<i64>) -> Result<u32, ValidationError> {
    match duration {
        Some(minutes) if minutes > 0 => {
            u32::try_from(minutes).map_err(|_| ValidationError::OutOfRange {
                field: "duration",
                reason: format!("must be at most {} minutes", u32::MAX),
            })
        }
        _ => Ok(DEFAULT_DURATION_MINUTES),
    }
}

/// End of an occupied interval; saturates at the calendar limit.
pub fn end_of(start: NaiveDateTime, duration_minutes: u32) -> NaiveDateTime {
    start
        .checked_add_signed(Duration::minutes(i64::from(duration_minutes)))
        .unwrap_or(NaiveDateTime::MAX)
}

pub fn parse_date_time(input: &str) -> Result<NaiveDateTime, ValidationError> {
    let trimmed = input.trim();
    NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT)
        .map_err(|_| ValidationError::InvalidDateTime(trimmed.to_string()))
}

pub fn format_date_time(date_time: NaiveDateTime) -> String {
    date_time.format(DATETIME_FORMAT).to_string()
}

fn check_not_past(
    date_time: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Result<NaiveDateTime, ValidationError> {
    let date_time = date_time.ok_or(ValidationError::MissingDateTime)?;
    if date_time < now {
        return Err(ValidationError::InPast { requested: date_time });
    }
    Ok(date_time)
}

fn check_reason(reason: &str) -> Result<String, ValidationError> {
    require_text(reason, "Appointment reason")
}

fn check_veterinarian(veterinarian: &str) -> Result<String, ValidationError> {
    let name = require_text(veterinarian, "Veterinarian name")?;
    if !VETERINARIAN_NAME.is_match(&name) {
        return Err(ValidationError::InvalidVeterinarian(name));
    }
    Ok(name)
}

fn truncate_to_minute(date_time: NaiveDateTime) -> NaiveDateTime {
    use chrono::Timelike;
    date_time
        .with_second(0)
        .and_then(|dt| dt.with_nanosecond(0))
        .unwrap_or(date_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 5, 14)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn now() -> NaiveDateTime {
        at(9, 0)
    }

    fn draft() -> AppointmentDraft {
        AppointmentDraft {
            pet_id: Some(PetId::new()),
            date_time: Some(at(10, 0)),
            reason: "  Annual vaccination ".into(),
            veterinarian: "Dr Jane Doe".into(),
            duration: None,
        }
    }

    #[test]
    fn new_appointment_is_scheduled_with_default_duration() {
        let appt = Appointment::new(draft(), now()).unwrap();
        assert_eq!(appt.status(), AppointmentStatus::Scheduled);
        assert_eq!(appt.duration_minutes(), DEFAULT_DURATION_MINUTES);
        assert_eq!(appt.reason(), "Annual vaccination");
        assert_eq!(appt.end_time(), at(10, 30));
    }

    #[test]
    fn non_positive_duration_falls_back_to_default() {
        for d in [Some(0), Some(-15), None] {
            let appt = Appointment::new(AppointmentDraft { duration: d, ..draft() }, now()).unwrap();
            assert_eq!(appt.duration_minutes(), 30, "duration {d:?}");
        }
        let long = Appointment::new(AppointmentDraft { duration: Some(600), ..draft() }, now()).unwrap();
        assert_eq!(long.duration_minutes(), 600);
    }

    #[test]
    fn duration_beyond_u32_rejected_not_clamped() {
        let max = i64::from(u32::MAX);
        assert_eq!(effective_duration(Some(max)), Ok(u32::MAX));
        let err = effective_duration(Some(max + 1)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "duration", .. }));

        let err = Appointment::new(AppointmentDraft { duration: Some(max + 1), ..draft() }, now())
            .unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));

        let mut appt = Appointment::new(draft(), now()).unwrap();
        assert!(appt.set_duration(Some(max + 1)).is_err());
        assert_eq!(appt.duration_minutes(), DEFAULT_DURATION_MINUTES);
    }

    #[test]
    fn missing_pet_or_time_rejected() {
        let err = Appointment::new(AppointmentDraft { pet_id: None, ..draft() }, now()).unwrap_err();
        assert_eq!(err, ValidationError::MissingPet);
        let err = Appointment::new(AppointmentDraft { date_time: None, ..draft() }, now()).unwrap_err();
        assert_eq!(err, ValidationError::MissingDateTime);
    }

    #[test]
    fn past_time_rejected_but_now_accepted() {
        let past = AppointmentDraft { date_time: Some(at(8, 59)), ..draft() };
        assert!(matches!(
            Appointment::new(past, now()),
            Err(ValidationError::InPast { .. })
        ));
        let exact = AppointmentDraft { date_time: Some(now()), ..draft() };
        assert!(Appointment::new(exact, now()).is_ok());
    }

    #[test]
    fn veterinarian_letters_and_spaces_only() {
        let digits = AppointmentDraft { veterinarian: "Dr Who 2".into(), ..draft() };
        assert!(matches!(
            Appointment::new(digits, now()),
            Err(ValidationError::InvalidVeterinarian(_))
        ));
        let dotted = AppointmentDraft { veterinarian: "Dr. Who".into(), ..draft() };
        assert!(Appointment::new(dotted, now()).is_err());
        let blank = AppointmentDraft { veterinarian: "   ".into(), ..draft() };
        assert_eq!(
            Appointment::new(blank, now()).unwrap_err(),
            ValidationError::EmptyField { field: "Veterinarian name" }
        );
    }

    #[test]
    fn blank_reason_rejected() {
        let blank = AppointmentDraft { reason: " \t ".into(), ..draft() };
        assert_eq!(
            Appointment::new(blank, now()).unwrap_err(),
            ValidationError::EmptyField { field: "Appointment reason" }
        );
    }

    #[test]
    fn restore_accepts_history_and_keeps_status() {
        let long_ago = NaiveDate::from_ymd_opt(2001, 3, 9)
            .unwrap()
            .and_hms_opt(11, 15, 0)
            .unwrap();
        let appt = Appointment::restore(
            PetId::new(),
            long_ago,
            "Checkup",
            "Dr Smith",
            Some(45),
            AppointmentStatus::Completed,
        )
        .unwrap();
        assert_eq!(appt.status(), AppointmentStatus::Completed);
        assert_eq!(appt.duration_minutes(), 45);
        assert_eq!(appt.date_time(), long_ago);
    }

    #[test]
    fn setters_validate_their_own_field_only() {
        let mut appt = Appointment::new(draft(), now()).unwrap();
        assert!(appt.set_reason("").is_err());
        assert_eq!(appt.reason(), "Annual vaccination");
        assert!(appt.set_veterinarian("R2D2").is_err());
        assert!(appt.set_date_time(at(7, 0), now()).is_err());
        appt.set_date_time(at(16, 45), now()).unwrap();
        assert_eq!(appt.date_time(), at(16, 45));
        appt.set_duration(Some(-1)).unwrap();
        assert_eq!(appt.duration_minutes(), 30);
    }

    #[test]
    fn any_status_transition_allowed() {
        let mut appt = Appointment::new(draft(), now()).unwrap();
        appt.set_status(AppointmentStatus::Cancelled);
        appt.set_status(AppointmentStatus::Completed);
        appt.set_status(AppointmentStatus::Scheduled);
        assert_eq!(appt.status(), AppointmentStatus::Scheduled);
    }

    #[test]
    fn date_time_format_round_trip() {
        let parsed = parse_date_time("09:05 01/02/2031").unwrap();
        assert_eq!(format_date_time(parsed), "09:05 01/02/2031");
        assert!(parse_date_time("2031-02-01 09:05").is_err());
        assert!(parse_date_time("25:00 01/02/2031").is_err());
    }

    #[test]
    fn end_time_saturates() {
        assert_eq!(end_of(NaiveDateTime::MAX, 30), NaiveDateTime::MAX);
    }
}
