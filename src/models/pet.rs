use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use super::{require_field_text, Owner, PetKind, ValidationError};

/// Maximum length of a newly registered pet name.
pub const MAX_NEW_PET_NAME_LEN: usize = 16;

pub const MAX_PET_AGE: u32 = 30;
pub const MAX_PET_WEIGHT_KG: f64 = 300.0;

static NEW_PET_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9 ]+$").unwrap());

/// Stable handle for a pet. Appointments refer to pets through this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PetId(Uuid);

impl PetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PetId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Raw pet fields as collected from the console or the pet file.
#[derive(Debug, Clone)]
pub struct PetDraft {
    pub name: String,
    pub age: i64,
    pub colour: String,
    pub weight_kg: f64,
    pub kind: PetKind,
    pub breed: String,
    pub owner: Owner,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    id: PetId,
    name: String,
    age: u32,
    colour: String,
    weight_kg: f64,
    kind: PetKind,
    breed: String,
    owner: Owner,
}

impl Pet {
    /// Validates every field before anything is committed.
    pub fn new(draft: PetDraft) -> Result<Self, ValidationError> {
        Ok(Self {
            id: PetId::new(),
            name: require_field_text(&draft.name, "Pet name")?,
            age: check_age(draft.age)?,
            colour: require_field_text(&draft.colour, "Colour")?,
            weight_kg: check_weight(draft.weight_kg)?,
            kind: draft.kind,
            breed: require_field_text(&draft.breed, "Breed")?,
            owner: draft.owner,
        })
    }

    pub fn id(&self) -> PetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn colour(&self) -> &str {
        &self.colour
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn kind(&self) -> PetKind {
        self.kind
    }

    pub fn breed(&self) -> &str {
        &self.breed
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn owner_mut(&mut self) -> &mut Owner {
        &mut self.owner
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = require_field_text(name, "Pet name")?;
        Ok(())
    }

    pub fn set_age(&mut self, age: i64) -> Result<(), ValidationError> {
        self.age = check_age(age)?;
        Ok(())
    }

    pub fn set_colour(&mut self, colour: &str) -> Result<(), ValidationError> {
        self.colour = require_field_text(colour, "Colour")?;
        Ok(())
    }

    pub fn set_weight_kg(&mut self, weight_kg: f64) -> Result<(), ValidationError> {
        self.weight_kg = check_weight(weight_kg)?;
        Ok(())
    }

    pub fn set_breed(&mut self, breed: &str) -> Result<(), ValidationError> {
        self.breed = require_field_text(breed, "Breed")?;
        Ok(())
    }

    pub fn speak(&self) -> String {
        format!(
            "{}! I am {}, a {} year old {} owned by {}.",
            self.kind.noise(),
            self.name,
            self.age,
            self.breed,
            self.owner.name()
        )
    }
}

impl std::fmt::Display for Pet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {} years old, {}, {}kg, Owner: {}, Breed: {}",
            self.name,
            self.age,
            self.colour,
            self.weight_kg,
            self.owner.name(),
            self.breed
        )
    }
}

/// Extra rule for names typed in at the desk; names loaded from file skip it.
pub fn validate_new_pet_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.chars().count() > MAX_NEW_PET_NAME_LEN {
        return Err(ValidationError::OutOfRange {
            field: "pet name",
            reason: format!("cannot exceed {MAX_NEW_PET_NAME_LEN} characters"),
        });
    }
    if !NEW_PET_NAME.is_match(name) {
        return Err(ValidationError::OutOfRange {
            field: "pet name",
            reason: "cannot contain special characters".into(),
        });
    }
    Ok(())
}

fn check_age(age: i64) -> Result<u32, ValidationError> {
    if !(0..=i64::from(MAX_PET_AGE)).contains(&age) {
        return Err(ValidationError::OutOfRange {
            field: "age",
            reason: format!("must be between 0 and {MAX_PET_AGE}"),
        });
    }
    Ok(age as u32)
}

fn check_weight(weight_kg: f64) -> Result<f64, ValidationError> {
    if !(weight_kg > 0.0 && weight_kg <= MAX_PET_WEIGHT_KG) {
        return Err(ValidationError::OutOfRange {
            field: "weight",
            reason: format!("must be positive and at most {MAX_PET_WEIGHT_KG} kg"),
        });
    }
    Ok(weight_kg)
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn draft() -> PetDraft {
        PetDraft {
            name: " Rex ".into(),
            age: 4,
            colour: "Black".into(),
            weight_kg: 20.0,
            kind: PetKind::Dog,
            breed: "Labrador".into(),
            owner: owner("Alice"),
        }
    }

    #[test]
    fn new_pet_trims_and_assigns_id() {
        let a = Pet::new(draft()).unwrap();
        let b = Pet::new(draft()).unwrap();
        assert_eq!(a.name(), "Rex");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn age_bounds() {
        assert!(Pet::new(PetDraft { age: 0, ..draft() }).is_ok());
        assert!(Pet::new(PetDraft { age: 30, ..draft() }).is_ok());
        assert!(Pet::new(PetDraft { age: 31, ..draft() }).is_err());
        assert!(Pet::new(PetDraft { age: -1, ..draft() }).is_err());
    }

    #[test]
    fn weight_bounds() {
        assert!(Pet::new(PetDraft { weight_kg: 0.0, ..draft() }).is_err());
        assert!(Pet::new(PetDraft { weight_kg: 300.0, ..draft() }).is_ok());
        assert!(Pet::new(PetDraft { weight_kg: 300.5, ..draft() }).is_err());
        assert!(Pet::new(PetDraft { weight_kg: f64::NAN, ..draft() }).is_err());
    }

    #[test]
    fn blank_breed_rejected() {
        let err = Pet::new(PetDraft { breed: "   ".into(), ..draft() }).unwrap_err();
        assert_eq!(err, ValidationError::EmptyField { field: "Breed" });
    }

    #[test]
    fn commas_rejected_in_single_field_text() {
        let err = Pet::new(PetDraft { colour: "Black, White".into(), ..draft() }).unwrap_err();
        assert_eq!(err, ValidationError::ContainsComma { field: "Colour" });
        let err = Pet::new(PetDraft { breed: "Collie, mixed".into(), ..draft() }).unwrap_err();
        assert_eq!(err, ValidationError::ContainsComma { field: "Breed" });

        let mut pet = Pet::new(draft()).unwrap();
        assert!(pet.set_name("Rex, Jr").is_err());
        assert!(pet.set_colour("Tan, Black").is_err());
        assert_eq!(pet.colour(), "Black");
    }

    #[test]
    fn speak_uses_kind_noise() {
        let mut d = draft();
        d.kind = PetKind::Hamster;
        d.breed = "Syrian".into();
        let pet = Pet::new(d).unwrap();
        assert_eq!(pet.speak(), "Squeak! I am Rex, a 4 year old Syrian owned by Alice.");
    }

    #[test]
    fn new_pet_name_rules() {
        assert!(validate_new_pet_name("Rex 2").is_ok());
        assert!(validate_new_pet_name("Sir Fluffington III").is_err());
        assert!(validate_new_pet_name("Rex!").is_err());
    }

    #[test]
    fn fixture_pet_is_valid() {
        let p = pet("Milo", "Bob");
        assert_eq!(p.owner().name(), "Bob");
    }
}
