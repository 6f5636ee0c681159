use super::ValidationError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ValidationError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// Persisted spelling is exact and case-sensitive.
str_enum!(AppointmentStatus {
    Scheduled => "SCHEDULED",
    Completed => "COMPLETED",
    Cancelled => "CANCELLED",
});

str_enum!(PetKind {
    Cat => "Cat",
    Dog => "Dog",
    Hamster => "Hamster",
});

impl AppointmentStatus {
    /// Cancelled appointments stay on the books but no longer hold their slot.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl PetKind {
    /// Case-insensitive match used by the console and the pet file.
    pub fn parse_loose(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
    }

    pub fn noise(&self) -> &'static str {
        match self {
            Self::Cat => "Miaow",
            Self::Dog => "Woof",
            Self::Hamster => "Squeak",
        }
    }
}
