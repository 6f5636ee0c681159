use super::{contains_ignore_case, PetDirectory};
use crate::models::{Pet, PetId};

/// Ordered pet table. Names are not unique; the id is.
#[derive(Debug, Default)]
pub struct PetRegistry {
    pets: Vec<Pet>,
}

impl PetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pets(pets: Vec<Pet>) -> Self {
        Self { pets }
    }

    pub fn add(&mut self, pet: Pet) -> PetId {
        let id = pet.id();
        self.pets.push(pet);
        id
    }

    pub fn remove(&mut self, id: PetId) -> Option<Pet> {
        let index = self.pets.iter().position(|p| p.id() == id)?;
        Some(self.pets.remove(index))
    }

    pub fn get_mut(&mut self, id: PetId) -> Option<&mut Pet> {
        self.pets.iter_mut().find(|p| p.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pet> {
        self.pets.iter()
    }

    pub fn len(&self) -> usize {
        self.pets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }

    /// Pets whose name equals `name` ignoring case. Several owners may have a pet
    /// with the same name; the caller disambiguates by owner.
    pub fn find_by_name_ignore_case(&self, name: &str) -> Vec<&Pet> {
        let name = name.trim();
        self.pets
            .iter()
            .filter(|p| p.name().eq_ignore_ascii_case(name))
            .collect()
    }

    /// Desk search: exact (case-insensitive) match on name, colour, breed or owner name.
    pub fn find_matching_any_field(&self, term: &str) -> Vec<&Pet> {
        let term = term.trim();
        self.pets
            .iter()
            .filter(|p| {
                p.name().eq_ignore_ascii_case(term)
                    || p.colour().eq_ignore_ascii_case(term)
                    || p.breed().eq_ignore_ascii_case(term)
                    || p.owner().name().eq_ignore_ascii_case(term)
            })
            .collect()
    }
}

impl PetDirectory for PetRegistry {
    fn pet(&self, id: PetId) -> Option<&Pet> {
        self.pets.iter().find(|p| p.id() == id)
    }

    fn find_by_exact_name(&self, name: &str) -> Option<&Pet> {
        self.pets.iter().find(|p| p.name() == name)
    }

    fn count_by_exact_name(&self, name: &str) -> usize {
        self.pets.iter().filter(|p| p.name() == name).count()
    }

    fn search(&self, term: &str) -> Vec<&Pet> {
        let needle = term.trim().to_lowercase();
        self.pets
            .iter()
            .filter(|p| {
                contains_ignore_case(p.name(), &needle)
                    || contains_ignore_case(p.owner().name(), &needle)
            })
            .collect()
    }
}
