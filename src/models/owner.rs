use super::{require_field_text, require_text, ValidationError};

/// Pet owner contact record. Identified by name for search and display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    name: String,
    phone_number: String,
    address: String,
}

impl Owner {
    pub fn new(name: &str, phone_number: &str, address: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require_field_text(name, "Owner name")?,
            phone_number: normalize_phone(phone_number)?,
            address: require_text(address, "Address")?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = require_field_text(name, "Owner name")?;
        Ok(())
    }

    pub fn set_phone_number(&mut self, phone_number: &str) -> Result<(), ValidationError> {
        self.phone_number = normalize_phone(phone_number)?;
        Ok(())
    }

    pub fn set_address(&mut self, address: &str) -> Result<(), ValidationError> {
        self.address = require_text(address, "Address")?;
        Ok(())
    }

    /// International numbers render with the country prefix split out: `(+44) 7700900123`.
    pub fn formatted_phone_number(&self) -> String {
        match self.phone_number.strip_prefix('+') {
            Some(_) if self.phone_number.len() > 3 => {
                let (prefix, rest) = self.phone_number.split_at(3);
                format!("({prefix}) {rest}")
            }
            _ => self.phone_number.clone(),
        }
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (Phone: {})", self.name, self.formatted_phone_number())
    }
}

/// Strips formatting characters and checks the number against the accepted shapes:
/// `+` followed by 11-12 digits, `07` mobile (11 digits), or a 10-digit landline.
fn normalize_phone(raw: &str) -> Result<String, ValidationError> {
    let trimmed = require_text(raw, "Phone number")?;

    if trimmed.contains('+') && !trimmed.starts_with('+') {
        return Err(ValidationError::OutOfRange {
            field: "phone number",
            reason: "'+' can only be at the start".into(),
        });
    }

    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    let cleaned = if trimmed.starts_with('+') {
        format!("+{digits}")
    } else {
        digits
    };

    let valid = if cleaned.starts_with('+') {
        (12..=13).contains(&cleaned.len())
    } else if cleaned.starts_with("07") {
        cleaned.len() == 11
    } else {
        cleaned.len() == 10
    };

    if !valid {
        return Err(ValidationError::OutOfRange {
            field: "phone number",
            reason: "must be 10 digits, start with '07' (11 digits), or start with '+' (12-13 characters)"
                .into(),
        });
    }

    Ok(cleaned)
}
