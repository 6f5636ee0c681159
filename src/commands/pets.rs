//! Pet desk commands: add, delete, search, view, modify, report.

use std::io::{self, BufRead, Write};

use super::Console;
use crate::core_state::ClinicState;
use crate::models::{validate_new_pet_name, Owner, Pet, PetDraft, PetId, PetKind, ValidationError};
use crate::report::PetReport;
use crate::store::PetDirectory;

pub fn add_pet<R: BufRead, W: Write>(
    state: &mut ClinicState,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    console.say("Enter Owner Details:")?;
    let owner_name = answer!(console, "Owner Name: ");
    let phone = answer!(console, "Owner Phone Number: ");
    let address = answer!(console, "Owner Address: ");
    let owner = match Owner::new(&owner_name, &phone, &address) {
        Ok(owner) => owner,
        Err(e) => return console.say(format!("Error: {e}")),
    };

    let name = answer!(console, "Enter pet name: ");
    if let Err(e) = validate_new_pet_name(&name) {
        return console.say(format!("Error: {e}"));
    }

    let age_text = answer!(console, "Enter pet age: ");
    let Ok(age) = age_text.parse::<i64>() else {
        return console.say("Invalid number input. Please enter valid numeric values.");
    };
    let colour = answer!(console, "Enter pet colour: ");
    let Some(weight_kg) = read_weight(console)? else {
        return Ok(());
    };

    let kind_text = answer!(console, "Enter pet type (Cat/Dog/Hamster): ");
    let Some(kind) = PetKind::parse_loose(&kind_text) else {
        return console.say("Error: Invalid pet type! Please enter Cat, Dog, or Hamster.");
    };
    let breed = answer!(console, &format!("Enter {} breed: ", kind.as_str().to_lowercase()));

    let draft = PetDraft {
        name,
        age,
        colour,
        weight_kg,
        kind,
        breed,
        owner,
    };
    match state.register_pet(draft) {
        Ok(id) => {
            let name = state.pets().pet(id).map(Pet::name).unwrap_or_default();
            console.say(format!("{name} has been added to the clinic."))
        }
        Err(e) => console.say(format!("Error: {e}")),
    }
}

pub fn delete_pet<R: BufRead, W: Write>(
    state: &mut ClinicState,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    let Some(id) = select_pet(state, console, "Enter pet name to delete: ")? else {
        return Ok(());
    };
    match state.delete_pet(id) {
        Ok((pet, removed)) => {
            console.say(format!("{} has been removed from the clinic.", pet.name()))?;
            if removed > 0 {
                console.say(format!("{removed} appointment(s) for {} were also removed.", pet.name()))?;
            }
            Ok(())
        }
        Err(e) => console.say(format!("Error: {e}")),
    }
}

pub fn search_pets<R: BufRead, W: Write>(
    state: &mut ClinicState,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    let term = answer!(console, "Enter name, colour, breed, or owner name to search: ");
    let found = state.pets().find_matching_any_field(&term);
    if found.is_empty() {
        return console.say("No pets found matching the search criteria.");
    }
    for pet in found {
        console.say(format!("Pet found: {pet}"))?;
        console.say(pet.speak())?;
        console.say(format!("Owner: {}", pet.owner()))?;
    }
    Ok(())
}

pub fn view_pets<R: BufRead, W: Write>(
    state: &mut ClinicState,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    if state.pets().is_empty() {
        return console.say("No pets available.");
    }
    console.say("List of pets in the clinic:")?;
    for pet in state.pets().iter() {
        console.say(pet)?;
        console.say(format!("Owner: {}", pet.owner()))?;
        console.say("---")?;
    }
    Ok(())
}

const PET_FIELDS: &[&str] = &[
    "Pet Name",
    "Pet Age",
    "Pet Colour",
    "Pet Weight",
    "Pet Breed",
    "Owner Name",
    "Owner Phone",
    "Owner Address",
    "Cancel",
];

pub fn modify_pet<R: BufRead, W: Write>(
    state: &mut ClinicState,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    if state.pets().is_empty() {
        return console.say("No pets available to modify.");
    }
    let Some(id) = select_pet(state, console, "Enter the name of the pet you want to modify: ")? else {
        return Ok(());
    };

    loop {
        let name = state.pets().pet(id).map(|p| p.name().to_string()).unwrap_or_default();
        console.say(format!("\nModify {name}:"))?;
        for (index, field) in PET_FIELDS.iter().enumerate() {
            console.say(format!("{}. {field}", index + 1))?;
        }
        let choice = answer!(console, "Choose an attribute to modify: ");
        let Some(pet) = state.pets_mut().get_mut(id) else {
            return Ok(());
        };

        let result: Result<&str, ValidationError> = match choice.parse::<u32>() {
            Ok(1) => {
                let value = answer!(console, "Enter new name: ");
                validate_new_pet_name(&value)
                    .and_then(|()| pet.set_name(&value))
                    .map(|()| "Name updated successfully.")
            }
            Ok(2) => {
                let value = answer!(console, "Enter new age: ");
                match value.parse::<i64>() {
                    Ok(age) => pet.set_age(age).map(|()| "Age updated successfully."),
                    Err(_) => {
                        console.say("Invalid input. Please enter a valid number.")?;
                        continue;
                    }
                }
            }
            Ok(3) => {
                let value = answer!(console, "Enter new colour: ");
                pet.set_colour(&value).map(|()| "Colour updated successfully.")
            }
            Ok(4) => {
                let Some(weight) = read_weight(console)? else {
                    return Ok(());
                };
                pet.set_weight_kg(weight).map(|()| "Weight updated successfully.")
            }
            Ok(5) => {
                let label = format!("Enter new {} breed: ", pet.kind().as_str().to_lowercase());
                let value = answer!(console, &label);
                pet.set_breed(&value).map(|()| "Breed updated successfully.")
            }
            Ok(6) => {
                let value = answer!(console, "Enter new owner name: ");
                pet.owner_mut().set_name(&value).map(|()| "Owner name updated successfully.")
            }
            Ok(7) => {
                let value = answer!(console, "Enter new owner phone number: ");
                pet.owner_mut()
                    .set_phone_number(&value)
                    .map(|()| "Owner phone updated successfully.")
            }
            Ok(8) => {
                let value = answer!(console, "Enter new owner address: ");
                pet.owner_mut()
                    .set_address(&value)
                    .map(|()| "Owner address updated successfully.")
            }
            Ok(9) => Ok("Modification cancelled."),
            Ok(_) => {
                console.say("Invalid choice. Please try again.")?;
                continue;
            }
            Err(_) => {
                console.say("Invalid input. Please enter a valid number.")?;
                continue;
            }
        };

        return match result {
            Ok(message) => console.say(message),
            Err(e) => console.say(format!("Error: {e}")),
        };
    }
}

pub fn report<R: BufRead, W: Write>(
    state: &mut ClinicState,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    let report = PetReport::build(state.pets().iter());
    if report.is_empty() {
        return console.say("No pets in the clinic.");
    }
    console.say(report)
}

/// Resolves a pet by case-insensitive name. When several owners have a pet of
/// that name, the operator picks one from a numbered list.
pub fn select_pet<R: BufRead, W: Write>(
    state: &ClinicState,
    console: &mut Console<R, W>,
    label: &str,
) -> io::Result<Option<PetId>> {
    let Some(name) = console.prompt(label)? else {
        return Ok(None);
    };
    let matches: Vec<&Pet> = state.pets().find_by_name_ignore_case(&name);

    match matches.as_slice() {
        [] => {
            console.say(format!("No pet found with the name '{name}'."))?;
            Ok(None)
        }
        [only] => Ok(Some(only.id())),
        several => {
            console.say(format!(
                "Multiple pets found with name '{name}'. Please select by owner:"
            ))?;
            for (index, pet) in several.iter().enumerate() {
                console.say(format!("{}. {} (Owner: {})", index + 1, pet.name(), pet.owner().name()))?;
            }
            let picked = console.choose("Enter number: ", several.len())?;
            Ok(picked.map(|index| several[index].id()))
        }
    }
}

/// Re-prompts until a usable weight is entered; `None` on end of input.
fn read_weight<R: BufRead, W: Write>(console: &mut Console<R, W>) -> io::Result<Option<f64>> {
    loop {
        let Some(raw) = console.prompt("Enter pet weight (kg): ")? else {
            return Ok(None);
        };
        match raw.parse::<f64>() {
            Ok(weight) if weight > 0.0 && weight <= crate::models::MAX_PET_WEIGHT_KG => {
                return Ok(Some(weight))
            }
            Ok(_) => console.say(format!(
                "Weight must be positive and at most {} kg. Please try again.",
                crate::models::MAX_PET_WEIGHT_KG
            ))?,
            Err(_) => console.say("Invalid input. Please enter a numeric value for weight.")?,
        }
    }
}
