//! Application state: the pet registry, the appointment book, where they are
//! persisted, and the clock used for "not in the past" checks.
//!
//! Owned by the console loop. Single-threaded; nothing here is shared.

use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::appointment::{self, AppointmentChange, AppointmentError, AppointmentRequest};
use crate::config;
use crate::models::{
    validate_new_pet_name, Appointment, AppointmentId, Pet, PetDraft, PetId, ValidationError,
};
use crate::persistence::{self, PersistenceError, SkippedLine};
use crate::store::{AppointmentBook, PetRegistry, Selector};

/// Source of "now". Injected so tests run on a fixed date.
pub type Clock = fn() -> NaiveDateTime;

pub fn system_clock() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

// ═══════════════════════════════════════════════════════════
// ClinicState
// ═══════════════════════════════════════════════════════════

pub struct ClinicState {
    pets: PetRegistry,
    appointments: AppointmentBook,
    pub pets_path: PathBuf,
    pub appointments_path: PathBuf,
    clock: Clock,
}

/// Totals from `ClinicState::load`, with every rejected line.
#[derive(Debug, Default)]
pub struct LoadSummary {
    pub pets_loaded: usize,
    pub pets_skipped: Vec<SkippedLine>,
    pub appointments_loaded: usize,
    pub appointments_skipped: Vec<SkippedLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveSummary {
    pub pets_saved: usize,
    pub appointments_saved: usize,
}

impl ClinicState {
    /// Empty state persisted at the given paths, on the system clock.
    pub fn new(pets_path: PathBuf, appointments_path: PathBuf) -> Self {
        Self {
            pets: PetRegistry::new(),
            appointments: AppointmentBook::new(),
            pets_path,
            appointments_path,
            clock: system_clock,
        }
    }

    /// Empty state at the configured data directory.
    pub fn from_config() -> Self {
        Self::new(config::pets_file(), config::appointments_file())
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    pub fn pets(&self) -> &PetRegistry {
        &self.pets
    }

    pub fn pets_mut(&mut self) -> &mut PetRegistry {
        &mut self.pets
    }

    pub fn appointments(&self) -> &AppointmentBook {
        &self.appointments
    }

    // ── Persistence ─────────────────────────────────────────

    /// Replaces the in-memory records with the files' contents. Pets load
    /// first because appointment lines resolve their pet by name.
    pub fn load(&mut self) -> Result<LoadSummary, ClinicError> {
        let pets = persistence::load_pets(&self.pets_path)?;
        self.pets = PetRegistry::from_pets(pets.loaded);

        let appointments = persistence::load_appointments(&self.appointments_path, &self.pets)?;
        self.appointments = AppointmentBook::from_appointments(appointments.loaded);

        Ok(LoadSummary {
            pets_loaded: self.pets.len(),
            pets_skipped: pets.skipped,
            appointments_loaded: self.appointments.len(),
            appointments_skipped: appointments.skipped,
        })
    }

    /// Rewrites both files; the data directory is created if missing.
    pub fn save(&self) -> Result<SaveSummary, ClinicError> {
        let pets_saved = persistence::save_pets(&self.pets_path, &self.pets)?;
        let appointments_saved =
            persistence::save_appointments(&self.appointments_path, &self.appointments, &self.pets)?;
        Ok(SaveSummary {
            pets_saved,
            appointments_saved,
        })
    }

    // ── Pets ────────────────────────────────────────────────

    /// Registers a pet entered at the desk, applying the new-name rule.
    pub fn register_pet(&mut self, draft: PetDraft) -> Result<PetId, ValidationError> {
        validate_new_pet_name(&draft.name)?;
        let pet = Pet::new(draft)?;
        tracing::info!(pet = %pet.id(), "Pet registered");
        Ok(self.pets.add(pet))
    }

    /// Removes a pet and every appointment booked for it.
    /// Returns the pet and how many appointments went with it.
    pub fn delete_pet(&mut self, id: PetId) -> Result<(Pet, usize), ClinicError> {
        let pet = self.pets.remove(id).ok_or(ClinicError::PetNotFound)?;
        let removed = self.appointments.remove_for_pet(id);
        tracing::info!(pet = %id, appointments = removed, "Pet deleted with its appointments");
        Ok((pet, removed))
    }

    // ── Appointments ────────────────────────────────────────

    pub fn schedule(&mut self, request: AppointmentRequest) -> Result<AppointmentId, AppointmentError> {
        let now = self.now();
        appointment::schedule_appointment(&mut self.appointments, request, now)
    }

    pub fn modify(
        &mut self,
        selector: impl Into<Selector>,
        change: AppointmentChange,
    ) -> Result<AppointmentId, AppointmentError> {
        let now = self.now();
        appointment::modify_appointment(&mut self.appointments, selector, change, now)
    }

    pub fn delete_appointment(
        &mut self,
        selector: impl Into<Selector>,
    ) -> Result<Appointment, AppointmentError> {
        appointment::delete_appointment(&mut self.appointments, selector)
    }
}

/// Errors from ClinicState operations.
#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("Pet not found")]
    PetNotFound,
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
