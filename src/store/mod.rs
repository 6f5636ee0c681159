//! In-memory stores owned by `ClinicState`.
//!
//! - `PetRegistry`: pet table, implements `PetDirectory`
//! - `AppointmentBook`: ordered appointment list, a plain container
//!
//! Neither store runs scheduling checks. Callers validate a slot with
//! `crate::scheduling` before handing an appointment over.

pub mod appointments;
pub mod pets;

pub use appointments::*;
pub use pets::*;

use crate::models::{Pet, PetId};

/// Lookup surface the scheduler needs from the pet records.
pub trait PetDirectory {
    /// Resolve an appointment's pet reference.
    fn pet(&self, id: PetId) -> Option<&Pet>;

    /// First pet whose name equals `name` exactly (case-sensitive).
    fn find_by_exact_name(&self, name: &str) -> Option<&Pet>;

    /// How many pets are named exactly `name`.
    fn count_by_exact_name(&self, name: &str) -> usize;

    /// Pets whose name or owner name contains `term`, ignoring case.
    fn search(&self, term: &str) -> Vec<&Pet>;
}

/// Case-insensitive substring test shared by the search operations.
pub(crate) fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}
