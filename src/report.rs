//! Clinic population report: kind counts, value distributions, dominant values.

use std::fmt;

use crate::models::{Pet, PetKind};

const NONE_LABEL: &str = "None";

/// Value counts in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    entries: Vec<(String, usize)>,
}

impl Distribution {
    fn record(&mut self, value: &str) {
        let value = value.to_lowercase();
        match self.entries.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((value, 1)),
        }
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn count(&self, value: &str) -> usize {
        let value = value.to_lowercase();
        self.entries
            .iter()
            .find(|(seen, _)| *seen == value)
            .map_or(0, |(_, count)| *count)
    }

    /// Most frequent value; the earliest seen wins a tie.
    pub fn dominant(&self) -> Option<&str> {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.entries {
            if best.map_or(true, |(_, count)| entry.1 > *count) {
                best = Some(entry);
            }
        }
        best.map(|(value, _)| value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetReport {
    pub total: usize,
    pub dogs: usize,
    pub cats: usize,
    pub hamsters: usize,
    pub colours: Distribution,
    pub breeds: Distribution,
    pub owners: Distribution,
}

impl PetReport {
    pub fn build<'a>(pets: impl IntoIterator<Item = &'a Pet>) -> Self {
        let mut report = Self::default();
        for pet in pets {
            report.total += 1;
            match pet.kind() {
                PetKind::Dog => report.dogs += 1,
                PetKind::Cat => report.cats += 1,
                PetKind::Hamster => report.hamsters += 1,
            }
            report.colours.record(pet.colour());
            report.breeds.record(pet.breed());
            report.owners.record(pet.owner().name());
        }
        report
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Ties go to Dog, then Cat.
    pub fn dominant_kind(&self) -> PetKind {
        if self.dogs >= self.cats && self.dogs >= self.hamsters {
            PetKind::Dog
        } else if self.cats >= self.hamsters {
            PetKind::Cat
        } else {
            PetKind::Hamster
        }
    }
}

impl fmt::Display for PetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----------------------------")?;
        writeln!(f, "Pet Type Distribution:")?;
        writeln!(f, "Dogs: {}", self.dogs)?;
        writeln!(f, "Cats: {}", self.cats)?;
        writeln!(f, "Hamsters: {}", self.hamsters)?;

        for (title, distribution) in [
            ("Colour", &self.colours),
            ("Breed", &self.breeds),
            ("Owner", &self.owners),
        ] {
            writeln!(f, "\n{title} Distribution:")?;
            for (value, count) in distribution.entries() {
                writeln!(f, "{value}: {count}")?;
            }
        }

        writeln!(f, "\nSummary:")?;
        writeln!(f, "Total Pets: {}", self.total)?;
        writeln!(f, "Dominant Colour: {}", self.colours.dominant().unwrap_or(NONE_LABEL))?;
        writeln!(f, "Dominant Pet Type: {}", self.dominant_kind())?;
        writeln!(f, "Dominant Breed: {}", self.breeds.dominant().unwrap_or(NONE_LABEL))?;
        write!(f, "Most Frequent Owner: {}", self.owners.dominant().unwrap_or(NONE_LABEL))
    }
}
