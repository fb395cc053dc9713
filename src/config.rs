use std::path::PathBuf;

use chrono::Weekday;

/// Application-level constants
pub const APP_NAME: &str = "DentalDesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "DENTALDESK_DATA_DIR";

/// Storage key holding the serialized patient collection.
pub const PATIENTS_KEY: &str = "dentalPatients";
/// Storage key holding the serialized appointment collection.
pub const APPOINTMENTS_KEY: &str = "dentalAppointments";
/// Storage key holding the sanitized user of the current session.
pub const SESSION_USER_KEY: &str = "dentalUser";

/// Maximum attachment size accepted at upload (5 MB, raw bytes).
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

/// First column of calendar grids.
pub const DEFAULT_WEEK_START: Weekday = Weekday::Sun;

/// Get the application data directory.
///
/// `$DENTALDESK_DATA_DIR` when set, otherwise `<platform data dir>/DentalDesk`.
/// Falls back to the working directory on platforms without a data dir.
pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the SQLite database path.
pub fn database_path() -> PathBuf {
    app_data_dir().join("dentaldesk.db")
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,dentaldesk_lib=debug"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_path_under_app_data() {
        let db = database_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("dentaldesk.db"));
    }

    #[test]
    fn storage_keys_match_browser_front_end() {
        assert_eq!(PATIENTS_KEY, "dentalPatients");
        assert_eq!(APPOINTMENTS_KEY, "dentalAppointments");
        assert_eq!(SESSION_USER_KEY, "dentalUser");
    }

    #[test]
    fn attachment_limit_is_five_megabytes() {
        assert_eq!(MAX_ATTACHMENT_BYTES, 5_242_880);
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
