use super::{contains_ignore_case, PetDirectory};
use crate::models::{Appointment, AppointmentId, PetId};

/// How a caller points at one appointment in the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Zero-based position in book order.
    Position(usize),
    Id(AppointmentId),
}

impl From<AppointmentId> for Selector {
    fn from(id: AppointmentId) -> Self {
        Self::Id(id)
    }
}

/// Appointments in insertion order. Cancelled entries are kept for history.
#[derive(Debug, Default)]
pub struct AppointmentBook {
    appointments: Vec<Appointment>,
}

impl AppointmentBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_appointments(appointments: Vec<Appointment>) -> Self {
        Self { appointments }
    }

    /// Appends without any scheduling check.
    pub fn add(&mut self, appointment: Appointment) -> AppointmentId {
        let id = appointment.id();
        self.appointments.push(appointment);
        id
    }

    /// Removes the selected appointment, or returns `None` when nothing matches.
    pub fn remove(&mut self, selector: impl Into<Selector>) -> Option<Appointment> {
        let index = self.position_of(selector.into())?;
        Some(self.appointments.remove(index))
    }

    pub fn remove_at(&mut self, position: usize) -> Option<Appointment> {
        self.remove(Selector::Position(position))
    }

    /// Drops every appointment for `pet_id`; returns how many went.
    pub fn remove_for_pet(&mut self, pet_id: PetId) -> usize {
        let before = self.appointments.len();
        self.appointments.retain(|a| a.pet_id() != pet_id);
        before - self.appointments.len()
    }

    pub fn get(&self, selector: impl Into<Selector>) -> Option<&Appointment> {
        let index = self.position_of(selector.into())?;
        self.appointments.get(index)
    }

    pub fn get_mut(&mut self, selector: impl Into<Selector>) -> Option<&mut Appointment> {
        let index = self.position_of(selector.into())?;
        self.appointments.get_mut(index)
    }

    /// Restartable view over the book in insertion order.
    pub fn all(&self) -> std::slice::Iter<'_, Appointment> {
        self.appointments.iter()
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    pub fn find_by<P>(&self, predicate: P) -> Vec<&Appointment>
    where
        P: Fn(&Appointment) -> bool,
    {
        self.appointments.iter().filter(|&a| predicate(a)).collect()
    }

    /// Appointments whose pet name or owner name contains `term`, ignoring case.
    pub fn search<D: PetDirectory + ?Sized>(&self, term: &str, pets: &D) -> Vec<&Appointment> {
        let needle = term.trim().to_lowercase();
        self.find_by(|a| {
            pets.pet(a.pet_id()).is_some_and(|pet| {
                contains_ignore_case(pet.name(), &needle)
                    || contains_ignore_case(pet.owner().name(), &needle)
            })
        })
    }

    fn position_of(&self, selector: Selector) -> Option<usize> {
        match selector {
            Selector::Position(index) if index < self.appointments.len() => Some(index),
            Selector::Position(_) => None,
            Selector::Id(id) => self.appointments.iter().position(|a| a.id() == id),
        }
    }
}

impl<'a> IntoIterator for &'a AppointmentBook {
    type Item = &'a Appointment;
    type IntoIter = std::slice::Iter<'a, Appointment>;

    fn into_iter(self) -> Self::IntoIter {
        self.appointments.iter()
    }
}
