//! Editor preferences that shape new documents and the history

use doc_model::{DesignState, PageSettings, Zoom, DEFAULT_GRID_SIZE};
use serde::{Deserialize, Serialize};

/// Editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorSettings {
    /// Zoom of a new document
    pub default_zoom: Zoom,
    /// Grid spacing in px
    pub grid_size: f64,
    pub show_grid: bool,
    pub show_rulers: bool,
    /// Settings of the first page of a new document
    pub page: PageSettings,
    /// Maximum number of undo steps; `None` keeps all of them
    pub history_limit: Option<usize>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            default_zoom: Zoom::ACTUAL_SIZE,
            grid_size: DEFAULT_GRID_SIZE,
            show_grid: false,
            show_rulers: true,
            page: PageSettings::default(),
            history_limit: None,
        }
    }
}

impl EditorSettings {
    /// A fresh document configured by these settings
    pub fn initial_state(&self) -> DesignState {
        let mut state = DesignState {
            zoom: self.default_zoom,
            grid_size: self.grid_size,
            show_grid: self.show_grid,
            show_rulers: self.show_rulers,
            ..Default::default()
        };
        for page in &mut state.pages {
            page.settings = self.page.clone();
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::Orientation;

    #[test]
    fn test_defaults_match_empty_document() {
        assert_eq!(EditorSettings::default().initial_state(), DesignState::default());
    }

    #[test]
    fn test_partial_json() {
        let settings: EditorSettings =
            serde_json::from_str(r#"{"defaultZoom": 150, "historyLimit": 50}"#).unwrap();
        assert_eq!(settings.default_zoom.percent(), 150);
        assert_eq!(settings.history_limit, Some(50));
        assert!(settings.show_rulers);
    }

    #[test]
    fn test_initial_state_uses_page_settings() {
        let mut page = PageSettings::default();
        page.set_orientation(Orientation::Landscape);
        let settings = EditorSettings { page, show_grid: true, ..Default::default() };
        let state = settings.initial_state();
        assert!(state.show_grid);
        assert_eq!(state.pages[0].settings.size_mm(), (297.0, 210.0));
    }
}
