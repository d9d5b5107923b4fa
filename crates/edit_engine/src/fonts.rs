//! Loading user supplied fonts
//!
//! A font is only registered once its data has been read and parsed. Any
//! failure is reported to the caller and leaves the document untouched.

use crate::{EditError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use doc_model::{CustomFont, FontId};
use serde::{Deserialize, Serialize};
use text_engine::ShapedFont;

/// A font resource the user asked to register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSource {
    /// Display name
    pub name: String,
    /// Family name used in `font-family`
    pub family: String,
    /// `data:` URL, `file://` URL or plain path
    pub url: String,
    /// e.g. "truetype", "opentype", "woff2"
    pub format: String,
}

/// A font whose data loaded and parsed successfully
#[derive(Debug, Clone)]
pub struct LoadedFont {
    pub font: CustomFont,
    pub shaped: ShapedFont,
}

/// Read and validate a font resource
pub async fn load_font(source: &FontSource) -> Result<LoadedFont> {
    let fail = |reason: String| EditError::FontLoad {
        family: source.family.clone(),
        reason,
    };

    let data = fetch_font_data(&source.url).await.map_err(fail)?;
    let shaped = ShapedFont::from_bytes(data).map_err(|e| fail(e.to_string()))?;
    tracing::debug!(
        family = %source.family,
        glyphs = shaped.info().glyph_count,
        "font loaded"
    );

    Ok(LoadedFont {
        font: CustomFont {
            id: FontId::new(),
            name: source.name.clone(),
            family: source.family.clone(),
            url: source.url.clone(),
            format: source.format.clone(),
            loaded: true,
        },
        shaped,
    })
}

async fn fetch_font_data(url: &str) -> std::result::Result<Vec<u8>, String> {
    if let Some(rest) = url.strip_prefix("data:") {
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| "malformed data URL".to_string())?;
        if !header.ends_with(";base64") {
            return Err("only base64 data URLs are supported".into());
        }
        return STANDARD
            .decode(payload.trim())
            .map_err(|e| format!("invalid base64 payload: {e}"));
    }

    let path = url.strip_prefix("file://").unwrap_or(url);
    tokio::fs::read(path)
        .await
        .map_err(|e| format!("cannot read {path}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(url: &str) -> FontSource {
        FontSource {
            name: "Brand".into(),
            family: "Brand Sans".into(),
            url: url.into(),
            format: "truetype".into(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let err = load_font(&source("/definitely/not/here.ttf")).await.unwrap_err();
        assert!(matches!(err, EditError::FontLoad { ref family, .. } if family == "Brand Sans"));
    }

    #[tokio::test]
    async fn test_non_font_data_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fake.ttf");
        std::fs::write(&path, b"not a font at all").unwrap();

        let url = format!("file://{}", path.display());
        assert!(load_font(&source(&url)).await.is_err());
    }

    #[tokio::test]
    async fn test_data_url_decoding() {
        let encoded = STANDARD.encode(b"abc");
        let data = fetch_font_data(&format!("data:font/ttf;base64,{encoded}")).await.unwrap();
        assert_eq!(data, b"abc");

        assert!(fetch_font_data("data:font/ttf,plain").await.is_err());
        assert!(fetch_font_data("data:font/ttf;base64,@@@").await.is_err());
    }
}
