use std::path::{Path, PathBuf};
use reqwest::Url;

use crate::error::AppError;

pub const DEFAULT_RANGE: &str = "Week_40!A6:Q39";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_CREDENTIALS_FILE: &str = "service_account.json";
pub const DOTENV_FILE: &str = ".env";

/// Where to read the week grid from
#[derive(Debug, Clone, PartialEq)]
pub enum GridLocation {
    Sheets(SheetsSettings),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetsSettings {
    pub spreadsheet_id: String,
    pub range: String,
    /// Service-account key used when no token or API key is given
    pub credentials_file: PathBuf,
    pub access_token: Option<String>,
    pub api_key: Option<String>,
}

/// Process configuration, built once at startup and passed by reference
#[derive(Debug, Clone)]
pub struct Config {
    grid: Option<GridLocation>,
    pub webhook_url: Option<Url>,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let grid = if let Some(path) = get("GRID_FILE") {
            Some(GridLocation::File(PathBuf::from(path)))
        } else {
            get("SPREADSHEET_ID").map(|spreadsheet_id| {
                GridLocation::Sheets(SheetsSettings {
                    spreadsheet_id,
                    range: get("RANGE").unwrap_or_else(|| DEFAULT_RANGE.to_string()),
                    credentials_file: PathBuf::from(
                        get("GOOGLE_APPLICATION_CREDENTIALS")
                            .unwrap_or_else(|| DEFAULT_CREDENTIALS_FILE.to_string()),
                    ),
                    access_token: get("GOOGLE_ACCESS_TOKEN"),
                    api_key: get("GOOGLE_API_KEY"),
                })
            })
        };

        let webhook_url = get("WEBHOOK_URL")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| AppError::InvalidConfig {
                    key: "WEBHOOK_URL",
                    message: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Config {
            grid,
            webhook_url,
            admin_password: get("ADMIN_PASSWORD")
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
        })
    }

    /// The configured grid location; the spreadsheet id is required unless a
    /// grid file is given
    pub fn grid_location(&self) -> Result<&GridLocation, AppError> {
        self.grid.as_ref().ok_or(AppError::MissingConfig("SPREADSHEET_ID"))
    }
}

/// Loads a dotenv file into the process environment. Variables that are
/// already set keep their values; a missing file is not an error.
pub fn load_env_file(path: &Path) -> Result<bool, AppError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(AppError::EnvFile {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
    }
}
