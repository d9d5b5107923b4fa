//! Ingesting generated layouts
//!
//! A layout generator answers with free-form text that contains a JSON
//! object `{ elements: [...], pageSettings?: {...}, metadata?: {...} }`,
//! often wrapped in a markdown code fence. Every element is sanitized into
//! an [`ElementDraft`] in mm; nothing in the payload is trusted to be in
//! range or even of the right JSON type.

use crate::{EditError, Result};
use doc_model::{Color, CssLength, ElementDraft, ElementType, PageSettingsPatch, Styles, TextAlign};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const PLACEHOLDER_TEXT: &str = "Sample Text";
const MIN_GENERATED_SIZE_MM: f64 = 10.0;

/// Descriptive data the generator may attach
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetadata {
    pub description: String,
    pub tags: Vec<String>,
}

/// A sanitized generated layout, ready for `AddElements`
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedLayout {
    /// In stacking order, geometry in mm
    pub elements: Vec<ElementDraft>,
    /// Page overrides, if the generator sent any
    pub page_settings: Option<PageSettingsPatch>,
    pub title: Option<String>,
    pub metadata: Option<LayoutMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    elements: Option<Value>,
    #[serde(default)]
    page_settings: Option<RawPageSettings>,
    #[serde(default)]
    metadata: Option<LayoutMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawPageSettings {
    background_color: Option<String>,
    title: Option<String>,
}

/// Extract, parse and sanitize a generated layout from response text
pub fn parse_generated_layout(text: &str) -> Result<GeneratedLayout> {
    let object = Regex::new(r"(?s)\{.*\}")
        .map_err(|e| EditError::InvalidResponse(e.to_string()))?
        .find(text)
        .ok_or_else(|| EditError::InvalidResponse("no JSON object found".into()))?;

    let raw: RawResponse = serde_json::from_str(object.as_str())
        .map_err(|e| EditError::InvalidResponse(e.to_string()))?;

    let Some(Value::Array(items)) = raw.elements else {
        return Err(EditError::InvalidResponse("missing elements array".into()));
    };

    let mut ranked: Vec<(i64, ElementDraft)> = items.iter().map(sanitize_element).collect();
    // Stable, so equal ranks keep their order
    ranked.sort_by_key(|(z, _)| *z);

    let page = raw.page_settings.unwrap_or_default();
    let background = page
        .background_color
        .as_deref()
        .and_then(|c| c.parse::<Color>().ok());

    Ok(GeneratedLayout {
        elements: ranked.into_iter().map(|(_, draft)| draft).collect(),
        page_settings: background.map(|color| PageSettingsPatch {
            background_color: Some(color),
            ..Default::default()
        }),
        title: page.title,
        metadata: raw.metadata,
    })
}

/// Clamp and default one generated element.
///
/// Returns the requested stacking rank along with the draft.
pub fn sanitize_element(raw: &Value) -> (i64, ElementDraft) {
    let field = |name: &str| raw.get(name);
    let element_type = field("type")
        .and_then(Value::as_str)
        .map(ElementType::parse_or_text)
        .unwrap_or(ElementType::Text);
    let is_text = element_type == ElementType::Text;

    let x = number(field("x")).unwrap_or(10.0).max(0.0);
    let y = number(field("y")).unwrap_or(10.0).max(0.0);
    let width = number(field("width")).unwrap_or(100.0).max(MIN_GENERATED_SIZE_MM);
    let height = number(field("height")).unwrap_or(50.0).max(MIN_GENERATED_SIZE_MM);
    let rotation = number(field("rotation")).unwrap_or(0.0).clamp(0.0, 360.0);
    let z_index = number(field("zIndex")).unwrap_or(0.0).max(0.0) as i64;

    let content = field("content")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| is_text.then(|| PLACEHOLDER_TEXT.to_string()));

    let given: Styles = field("styles")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default();
    let mut styles = generated_style_defaults(is_text).merged(&given);
    let opacity = number(field("styles").and_then(|s| s.get("opacity")));
    styles.opacity = Some(opacity.unwrap_or(1.0).clamp(0.0, 1.0));

    let mut draft = ElementDraft::new(element_type)
        .at(x, y)
        .sized(width, height)
        .with_rotation(rotation)
        .with_styles(styles);
    draft.content = content;
    (z_index, draft)
}

fn generated_style_defaults(is_text: bool) -> Styles {
    Styles {
        font_size: Some(CssLength::px(16.0)),
        font_family: Some("Arial, sans-serif".into()),
        color: Some(Color::BLACK),
        background_color: Some(if is_text {
            Color::TRANSPARENT
        } else {
            Color::rgb(0xf3, 0xf4, 0xf6)
        }),
        text_align: Some(TextAlign::Left),
        border_radius: Some(CssLength::px(0.0)),
        ..Default::default()
    }
}

/// A finite number, also accepted as a numeric string
fn number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}
