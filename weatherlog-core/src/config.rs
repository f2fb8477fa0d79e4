use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// City the recorder is pinned to.
pub const CITY: &str = "Poznan";

/// Environment variable (or `.env` entry) holding the OpenWeather key.
pub const API_KEY_VAR: &str = "API_KEY";

/// Dotenv file read from the working directory only.
pub const ENV_FILE: &str = ".env";

/// File name of the SQLite database inside the data directory.
pub const DATABASE_FILE: &str = "weather_data.db";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// database_path = "/home/me/weather_data.db"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// OpenWeather API key. Takes precedence over `API_KEY` from `.env`.
    pub api_key: Option<String>,

    /// Optional override for the database location.
    pub database_path: Option<PathBuf>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Like [`Config::load`], but an unreadable or corrupt file yields the
    /// empty default so that it can be overwritten.
    pub fn load_or_default() -> Self {
        Self::config_file_path()
            .map(|path| Self::load_or_default_from(&path))
            .unwrap_or_default()
    }

    pub fn load_or_default_from(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|err| {
            tracing::warn!(error = %format!("{err:#}"), "ignoring unusable config file");
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Set or replace the stored API key.
    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Resolve the API key: the config file wins, then `API_KEY` from
    /// `./.env`, then the process environment.
    pub fn resolve_api_key(&self) -> Result<String> {
        let from_dotenv = env_file_api_key(Path::new(ENV_FILE));
        let from_env = std::env::var(API_KEY_VAR).ok();

        pick_api_key(self.api_key.as_deref(), from_dotenv, from_env).ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `weatherlog configure` or put {API_KEY_VAR}=... into a .env file."
            )
        })
    }

    /// Resolve the database file: explicit override, then config, then the
    /// platform data directory.
    pub fn resolve_database_path(&self, explicit: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = explicit.or_else(|| self.database_path.clone()) {
            return Ok(path);
        }

        Ok(project_dirs()?.data_dir().join(DATABASE_FILE))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weatherlog", "weatherlog")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

/// `API_KEY` from exactly `path`; parent directories are not searched and
/// the process environment is left untouched.
fn env_file_api_key(path: &Path) -> Option<String> {
    dotenvy::from_path_iter(path)
        .ok()?
        .filter_map(|item| item.ok())
        .find(|(key, _)| key == API_KEY_VAR)
        .map(|(_, value)| value)
}

fn pick_api_key(
    from_file: Option<&str>,
    from_dotenv: Option<String>,
    from_env: Option<String>,
) -> Option<String> {
    [from_file.map(str::to_owned), from_dotenv, from_env]
        .into_iter()
        .flatten()
        .map(|key| key.trim().to_owned())
        .find(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_key_overrides_env_key() {
        let key = pick_api_key(Some("FILE_KEY"), Some("DOTENV_KEY".into()), Some("ENV_KEY".into()));
        assert_eq!(key.as_deref(), Some("FILE_KEY"));
    }

    #[test]
    fn dotenv_key_beats_process_env() {
        let key = pick_api_key(None, Some("DOTENV_KEY".into()), Some("ENV_KEY".into()));
        assert_eq!(key.as_deref(), Some("DOTENV_KEY"));

        let key = pick_api_key(None, None, Some("ENV_KEY".into()));
        assert_eq!(key.as_deref(), Some("ENV_KEY"));
    }

    #[test]
    fn blank_key_is_treated_as_missing() {
        assert_eq!(pick_api_key(Some("   "), None, None), None);
        assert_eq!(pick_api_key(None, None, None), None);

        let key = pick_api_key(Some(" "), Some("DOTENV_KEY".into()), None);
        assert_eq!(key.as_deref(), Some("DOTENV_KEY"));
    }

    #[test]
    fn env_file_key_is_read_from_exact_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(ENV_FILE), "OTHER=1\nAPI_KEY=from-dotenv\n").unwrap();
        let child = dir.path().join("child");
        fs::create_dir(&child).unwrap();

        assert_eq!(
            env_file_api_key(&dir.path().join(ENV_FILE)).as_deref(),
            Some("from-dotenv")
        );
        assert_eq!(env_file_api_key(&child.join(ENV_FILE)), None);
    }

    #[test]
    fn corrupt_config_fails_strict_load_but_not_lenient_one() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = [unterminated").unwrap();

        assert!(Config::load_from(&path).is_err());
        assert_eq!(Config::load_or_default_from(&path), Config::default());
    }

    #[test]
    fn missing_config_file_loads_default() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_api_key_replaces_previous() {
        let mut cfg = Config::default();
        cfg.set_api_key("OLD".into());
        cfg.set_api_key("NEW".into());

        assert_eq!(cfg.api_key.as_deref(), Some("NEW"));
    }

    #[test]
    fn parses_toml_with_all_fields() {
        let cfg = Config::from_toml(
            r#"
            api_key = "KEY"
            database_path = "/tmp/weather.db"
            "#,
        )
        .expect("config must parse");

        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.database_path, Some(PathBuf::from("/tmp/weather.db")));
    }

    #[test]
    fn empty_toml_gives_default() {
        let cfg = Config::from_toml("").expect("empty config must parse");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn explicit_database_path_wins() {
        let cfg = Config {
            api_key: None,
            database_path: Some(PathBuf::from("from-config.db")),
        };

        let path = cfg
            .resolve_database_path(Some(PathBuf::from("explicit.db")))
            .expect("path must resolve");
        assert_eq!(path, PathBuf::from("explicit.db"));

        let path = cfg.resolve_database_path(None).expect("path must resolve");
        assert_eq!(path, PathBuf::from("from-config.db"));
    }
}
