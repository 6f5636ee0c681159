//! `AppointmentDetails.txt` codec.
//!
//! Current form: `<pet>, <HH:mm dd/MM/yyyy>, <reason>, <vet>, <minutes>, <STATUS>`.
//! Legacy five-field lines carry no duration and load with the default.
//! A reason containing the separator spans several fields; the trailing
//! fields are read from the end of the line.

use std::path::Path;

use super::{
    load_lines, split_fields, write_lines, LineError, LoadReport, PersistenceError, FIELD_SEPARATOR,
};
use crate::models::{parse_date_time, Appointment, AppointmentStatus, Pet};
use crate::store::{AppointmentBook, PetDirectory};

const LEGACY_FIELDS: usize = 5;

/// Returns `None` when the appointment's pet is no longer registered.
pub fn encode_appointment_line<D: PetDirectory + ?Sized>(
    appointment: &Appointment,
    pets: &D,
) -> Option<String> {
    let pet = pets.pet(appointment.pet_id())?;
    if pets.find_by_exact_name(pet.name()).map(Pet::id) != Some(pet.id()) {
        tracing::warn!(
            appointment = %appointment.id(),
            pet = pet.name(),
            "Pet name is shared with an earlier pet; this appointment will reload against that pet"
        );
    }
    Some(format!(
        "{}, {}, {}, {}, {}, {}",
        pet.name(),
        appointment.formatted_date_time(),
        appointment.reason(),
        appointment.veterinarian(),
        appointment.duration_minutes(),
        appointment.status(),
    ))
}

pub fn decode_appointment_line<D: PetDirectory + ?Sized>(
    line: &str,
    pets: &D,
) -> Result<Appointment, LineError> {
    let fields = split_fields(line);
    if fields.len() < LEGACY_FIELDS {
        return Err(LineError::FieldCount {
            expected: LEGACY_FIELDS,
            found: fields.len(),
        });
    }

    // Fields are read from both ends; whatever lies between the date and the
    // veterinarian is the reason, which may itself contain the separator.
    let last = fields.len() - 1;
    let (duration, veterinarian_index) = if fields.len() == LEGACY_FIELDS {
        (None, 3)
    } else {
        let duration_text = fields[last - 1].trim();
        let minutes = duration_text
            .parse::<i64>()
            .map_err(|_| LineError::InvalidNumber(duration_text.to_string()))?;
        (Some(minutes), last - 2)
    };
    let status_text = fields[last];
    let reason = fields[2..veterinarian_index].join(FIELD_SEPARATOR);

    let date_time = parse_date_time(fields[1])
        .map_err(|_| LineError::InvalidDateTime(fields[1].trim().to_string()))?;
    let status: AppointmentStatus = status_text
        .trim()
        .parse()
        .map_err(|_| LineError::UnknownStatus(status_text.trim().to_string()))?;
    let pet = pets
        .find_by_exact_name(fields[0])
        .ok_or_else(|| LineError::UnknownPet(fields[0].to_string()))?;
    let matches = pets.count_by_exact_name(fields[0]);
    if matches > 1 {
        tracing::warn!(
            pet = fields[0],
            matches,
            "Pet name is shared, linking appointment to the first registered pet"
        );
    }

    Ok(Appointment::restore(
        pet.id(),
        date_time,
        &reason,
        fields[veterinarian_index],
        duration,
        status,
    )?)
}

/// Rewrites the appointment file from the book, in book order.
pub fn save_appointments<D: PetDirectory + ?Sized>(
    path: &Path,
    book: &AppointmentBook,
    pets: &D,
) -> Result<usize, PersistenceError> {
    let mut lines = Vec::with_capacity(book.len());
    for appointment in book {
        match encode_appointment_line(appointment, pets) {
            Some(line) => lines.push(line),
            None => tracing::warn!(
                appointment = %appointment.id(),
                "Not saving appointment for an unregistered pet"
            ),
        }
    }
    write_lines(path, &lines)?;
    tracing::info!(path = %path.display(), count = lines.len(), "Saved appointments");
    Ok(lines.len())
}

/// Pets must be loaded first: each line resolves its pet by exact name.
pub fn load_appointments<D: PetDirectory + ?Sized>(
    path: &Path,
    pets: &D,
) -> Result<LoadReport<Appointment>, PersistenceError> {
    load_lines(path, "appointment", |line| decode_appointment_line(line, pets))
}
