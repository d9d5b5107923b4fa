//! Application settings
//!
//! Editor preferences and export defaults, persisted as one JSON file.

use crate::pdf::PdfExportOptions;
use crate::Result;
use edit_engine::EditorSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything the application remembers between sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub editor: EditorSettings,
    /// Starting point for every PDF export
    pub export: PdfExportOptions,
}

/// Loads, saves and updates [`AppSettings`]
pub struct SettingsManager {
    settings_path: PathBuf,
    current: AppSettings,
}

impl SettingsManager {
    pub fn new(app_data_dir: impl AsRef<Path>) -> Self {
        Self {
            settings_path: app_data_dir.as_ref().join("settings.json"),
            current: AppSettings::default(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    fn parse_or_default(content: &str) -> AppSettings {
        serde_json::from_str(content).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse settings file, using defaults: {}", e);
            AppSettings::default()
        })
    }

    /// Load settings from disk; a missing or unreadable file gives defaults
    pub async fn load(&mut self) -> Result<&AppSettings> {
        self.current = if tokio::fs::try_exists(&self.settings_path).await? {
            let content = tokio::fs::read_to_string(&self.settings_path).await?;
            Self::parse_or_default(&content)
        } else {
            AppSettings::default()
        };
        Ok(&self.current)
    }

    /// Load settings synchronously, for start-up before a runtime exists
    pub fn load_sync(&mut self) -> Result<&AppSettings> {
        self.current = if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            Self::parse_or_default(&content)
        } else {
            AppSettings::default()
        };
        Ok(&self.current)
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&self.current)?;
        tokio::fs::write(&self.settings_path, content).await?;
        Ok(())
    }

    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    pub fn get(&self) -> &AppSettings {
        &self.current
    }

    /// Replace the settings and save them
    pub async fn update(&mut self, settings: AppSettings) -> Result<()> {
        self.current = settings;
        self.save().await
    }

    pub async fn update_editor(&mut self, editor: EditorSettings) -> Result<()> {
        self.current.editor = editor;
        self.save().await
    }

    pub async fn update_export(&mut self, export: PdfExportOptions) -> Result<()> {
        self.current.export = export;
        self.save().await
    }

    /// Back to defaults, saved
    pub async fn reset(&mut self) -> Result<&AppSettings> {
        self.current = AppSettings::default();
        self.save().await?;
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::PdfBackend;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(dir.path());
        assert_eq!(manager.load_sync().unwrap(), &AppSettings::default());
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
        let mut manager = SettingsManager::new(dir.path());
        assert_eq!(manager.load_sync().unwrap(), &AppSettings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"export": {"backend": "stream", "author": "Ada"}}"#,
        )
        .unwrap();
        let mut manager = SettingsManager::new(dir.path());
        let settings = manager.load_sync().unwrap();
        assert_eq!(settings.export.backend, PdfBackend::Stream);
        assert_eq!(settings.export.author.as_deref(), Some("Ada"));
        assert_eq!(settings.editor, EditorSettings::default());
    }

    #[tokio::test]
    async fn test_update_persists() {
        let dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(dir.path());
        manager.load().await.unwrap();

        let editor = EditorSettings {
            history_limit: Some(20),
            show_grid: true,
            ..Default::default()
        };
        manager.update_editor(editor.clone()).await.unwrap();

        let mut reloaded = SettingsManager::new(dir.path());
        assert_eq!(reloaded.load().await.unwrap().editor, editor);

        reloaded.reset().await.unwrap();
        let mut again = SettingsManager::new(dir.path());
        assert_eq!(again.load().await.unwrap(), &AppSettings::default());
    }
}
