//! Settings service
//!
//! Manages application settings persistence using JSON file storage.

use crate::config::{
    DEFAULT_NOTE_AUTHOR, DEFAULT_SIMULATED_LATENCY_MS, MAX_SIMULATED_LATENCY_MS,
    SETTINGS_FILE_NAME,
};
use crate::database::Author;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;

/// How mutations reach the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Artificial delay before each mutation commits, in milliseconds
    #[serde(default = "default_simulated_latency")]
    pub simulated_latency_ms: u64,
}

fn default_simulated_latency() -> u64 {
    DEFAULT_SIMULATED_LATENCY_MS
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            simulated_latency_ms: default_simulated_latency(),
        }
    }
}

impl BackendSettings {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

/// Who notes are attributed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSettings {
    #[serde(default = "default_author_name")]
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
}

fn default_author_name() -> String {
    DEFAULT_NOTE_AUTHOR.to_string()
}

impl Default for NoteSettings {
    fn default() -> Self {
        Self {
            author_name: default_author_name(),
            author_avatar: None,
        }
    }
}

impl NoteSettings {
    pub fn author(&self) -> Author {
        Author {
            name: self.author_name.clone(),
            avatar: self.author_avatar.clone(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub notes: NoteSettings,
    /// Load the sample clients and documents into a fresh store
    #[serde(default = "default_true")]
    pub seed_sample_data: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            backend: BackendSettings::default(),
            notes: NoteSettings::default(),
            seed_sample_data: true,
        }
    }
}

impl AppSettings {
    pub fn validate(&self) -> Result<()> {
        if self.backend.simulated_latency_ms > MAX_SIMULATED_LATENCY_MS {
            return Err(AppError::Settings(format!(
                "Simulated latency must be at most {} ms, got {}",
                MAX_SIMULATED_LATENCY_MS, self.backend.simulated_latency_ms
            )));
        }
        if self.notes.author_name.trim().is_empty() {
            return Err(AppError::Settings(
                "Note author name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Service for managing application settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            settings_path: data_dir.join(SETTINGS_FILE_NAME),
        }
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<AppSettings> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Settings(format!("Failed to parse settings: {}", e)))?;

        settings.validate()?;

        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        settings.validate()?;

        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(settings)?;

        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    /// Update backend settings
    pub async fn update_backend(&self, backend: BackendSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.backend = backend;
        self.save(&settings).await
    }

    /// Update note settings
    pub async fn update_notes(&self, notes: NoteSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.notes = notes;
        self.save(&settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_service() -> (SettingsService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let service = SettingsService::new(temp_dir.path().to_path_buf());
        (service, temp_dir)
    }

    #[tokio::test]
    async fn test_default_settings_created_on_load() {
        let (service, temp) = create_test_service();

        let settings = service.load().await.unwrap();

        assert_eq!(settings.backend.simulated_latency_ms, 500);
        assert_eq!(settings.notes.author_name, "Current User");
        assert!(settings.seed_sample_data);
        assert!(temp.path().join("settings.json").exists());
    }

    #[tokio::test]
    async fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().to_path_buf();

        {
            let service = SettingsService::new(data_dir.clone());
            service
                .update_notes(NoteSettings {
                    author_name: "Marta Puig".to_string(),
                    author_avatar: Some("mp.png".to_string()),
                })
                .await
                .unwrap();
        }

        {
            let service = SettingsService::new(data_dir);
            let loaded = service.load().await.unwrap();
            assert_eq!(loaded.notes.author().name, "Marta Puig");
            assert_eq!(loaded.notes.author().avatar.as_deref(), Some("mp.png"));
            // untouched sections keep their defaults
            assert_eq!(loaded.backend, BackendSettings::default());
        }
    }

    #[tokio::test]
    async fn test_missing_fields_use_defaults() {
        let (service, temp) = create_test_service();
        std::fs::write(
            temp.path().join("settings.json"),
            r#"{"backend":{"simulated_latency_ms":0}}"#,
        )
        .unwrap();

        let settings = service.load().await.unwrap();

        assert_eq!(settings.backend.latency(), Duration::ZERO);
        assert_eq!(settings.notes, NoteSettings::default());
        assert!(settings.seed_sample_data);
    }

    #[tokio::test]
    async fn test_out_of_range_latency_is_rejected() {
        let (service, _temp) = create_test_service();

        let result = service
            .update_backend(BackendSettings {
                simulated_latency_ms: 60_000,
            })
            .await;

        assert!(matches!(result, Err(AppError::Settings(_))));
        assert_eq!(
            service.load().await.unwrap().backend.simulated_latency_ms,
            500
        );
    }

    #[tokio::test]
    async fn test_malformed_file_is_reported() {
        let (service, temp) = create_test_service();
        std::fs::write(temp.path().join("settings.json"), "{not json").unwrap();

        assert!(matches!(service.load().await, Err(AppError::Settings(_))));
    }
}
