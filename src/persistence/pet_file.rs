//! `PetDetails.txt` codec.
//!
//! `<name>, <age>, <colour>, <weight>, <Kind>: <breed>, <owner>, <phone>, <address>`

use std::path::Path;

use super::{load_lines, split_fields, write_lines, LineError, LoadReport, PersistenceError, FIELD_SEPARATOR};
use crate::models::{Owner, Pet, PetDraft, PetKind};
use crate::store::PetRegistry;

const PET_FIELDS: usize = 8;

pub fn encode_pet_line(pet: &Pet) -> String {
    let owner = pet.owner();
    format!(
        "{name}, {age}, {colour}, {weight}, {kind}: {breed}, {owner}, {phone}, {address}",
        name = pet.name(),
        age = pet.age(),
        colour = pet.colour(),
        weight = pet.weight_kg(),
        kind = pet.kind(),
        breed = pet.breed(),
        owner = owner.name(),
        phone = owner.phone_number(),
        address = owner.address(),
    )
}

pub fn decode_pet_line(line: &str) -> Result<Pet, LineError> {
    let fields = split_fields(line);
    if fields.len() < PET_FIELDS {
        return Err(LineError::FieldCount {
            expected: PET_FIELDS,
            found: fields.len(),
        });
    }

    let age = fields[1]
        .trim()
        .parse::<i64>()
        .map_err(|_| LineError::InvalidNumber(fields[1].trim().to_string()))?;
    let weight_kg = fields[3]
        .trim()
        .parse::<f64>()
        .map_err(|_| LineError::InvalidNumber(fields[3].trim().to_string()))?;

    let (kind_text, breed) = fields[4]
        .split_once(':')
        .ok_or_else(|| LineError::MalformedKind(fields[4].to_string()))?;
    let kind = PetKind::parse_loose(kind_text).unwrap_or_else(|| {
        tracing::warn!(kind = kind_text.trim(), "Unknown pet type, recording as Dog");
        PetKind::Dog
    });

    // Addresses may themselves contain the separator.
    let address = fields[7..].join(FIELD_SEPARATOR);
    let owner = Owner::new(fields[5], fields[6], &address)?;

    Ok(Pet::new(PetDraft {
        name: fields[0].to_string(),
        age,
        colour: fields[2].to_string(),
        weight_kg,
        kind,
        breed: breed.to_string(),
        owner,
    })?)
}

/// Rewrites the pet file with every registered pet.
pub fn save_pets(path: &Path, pets: &PetRegistry) -> Result<usize, PersistenceError> {
    let lines: Vec<String> = pets.iter().map(encode_pet_line).collect();
    write_lines(path, &lines)?;
    tracing::info!(path = %path.display(), count = lines.len(), "Saved pet details");
    Ok(lines.len())
}

pub fn load_pets(path: &Path) -> Result<LoadReport<Pet>, PersistenceError> {
    load_lines(path, "pet", decode_pet_line)
}
