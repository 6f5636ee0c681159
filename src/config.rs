use std::ffi::OsString;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Happy Paws Clinic";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Overrides the data directory when set to a non-empty path.
pub const DATA_DIR_ENV: &str = "HAPPYPAWS_DATA_DIR";

pub const PETS_FILE_NAME: &str = "PetDetails.txt";
pub const APPOINTMENTS_FILE_NAME: &str = "AppointmentDetails.txt";

/// Get the clinic data directory
/// $HAPPYPAWS_DATA_DIR, else ~/HappyPaws/, else the working directory
pub fn data_dir() -> PathBuf {
    resolve_data_dir(std::env::var_os(DATA_DIR_ENV), dirs::home_dir())
}

fn resolve_data_dir(env_value: Option<OsString>, home: Option<PathBuf>) -> PathBuf {
    match env_value.filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => home
            .map(|h| h.join("HappyPaws"))
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

pub fn pets_file() -> PathBuf {
    data_dir().join(PETS_FILE_NAME)
}

pub fn appointments_file() -> PathBuf {
    data_dir().join(APPOINTMENTS_FILE_NAME)
}

/// Used when RUST_LOG is unset. Warnings only, so skipped records still show.
pub fn default_log_filter() -> &'static str {
    "happypaws_lib=warn"
}
