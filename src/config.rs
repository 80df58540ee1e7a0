use std::path::PathBuf;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DEFAULT_IMPORT_YEAR: i32 = 2024;
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Settings resolved once at startup and passed down by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub date_format: String,
    /// Year used for short import dates written as `D.M`.
    pub default_import_year: i32,
    pub log_level: String,
}

impl Config {
    pub fn load(db_override: Option<PathBuf>) -> Self {
        Self {
            db_path: db_override.unwrap_or_else(default_db_path),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            default_import_year: DEFAULT_IMPORT_YEAR,
            log_level: std::env::var("JOBTRACK_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("jobtrack.db"),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            default_import_year: DEFAULT_IMPORT_YEAR,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

fn default_db_path() -> PathBuf {
    // Use XDG data directory or fallback
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobtrack") {
        proj_dirs.data_dir().join("jobtrack.db")
    } else {
        PathBuf::from("jobtrack.db")
    }
}
