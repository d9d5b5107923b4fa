//! Element presentation styles
//!
//! `Styles` is a closed schema of the presentational properties that the
//! editor and the PDF emitters interpret, plus an `extra` map that carries
//! any other property through untouched. Values are typed in memory and only
//! rendered to and from their CSS string form ("16px", "center", "#ff0000")
//! at the serialization boundary.

use crate::units::{mm_to_px, DEFAULT_DPI, POINTS_PER_INCH};
use crate::{Color, DocModelError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Font size used when an element does not specify one, in px
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

// =============================================================================
// Keyword enums
// =============================================================================

macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// Unrecognized value, kept verbatim
            Other(String),
        }

        impl $name {
            /// CSS keyword for this value
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $text,)+
                    Self::Other(s) => s,
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Self::$variant,)+
                    _ => Self::Other(s.trim().to_string()),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::from(s.as_str()))
            }
        }
    };
}

keyword_enum!(
    /// CSS `display`
    Display {
        Block => "block",
        Flex => "flex",
        Inline => "inline",
        InlineBlock => "inline-block",
        None => "none",
    }
);

keyword_enum!(
    /// CSS `visibility`
    Visibility {
        Visible => "visible",
        Hidden => "hidden",
    }
);

keyword_enum!(
    /// Horizontal text alignment
    TextAlign {
        Left => "left",
        Center => "center",
        Right => "right",
        Justify => "justify",
    }
);

keyword_enum!(
    /// Cross-axis alignment of a flex container; drives vertical text placement
    AlignItems {
        FlexStart => "flex-start",
        Center => "center",
        FlexEnd => "flex-end",
        Stretch => "stretch",
    }
);

keyword_enum!(
    /// Main-axis alignment of a flex container
    JustifyContent {
        FlexStart => "flex-start",
        Center => "center",
        FlexEnd => "flex-end",
        SpaceBetween => "space-between",
    }
);

keyword_enum!(
    /// CSS `font-weight`
    FontWeight {
        Normal => "normal",
        Bold => "bold",
    }
);

keyword_enum!(
    /// CSS `font-style`
    FontStyle {
        Normal => "normal",
        Italic => "italic",
        Oblique => "oblique",
    }
);

keyword_enum!(
    /// CSS `text-decoration`
    TextDecoration {
        None => "none",
        Underline => "underline",
        LineThrough => "line-through",
    }
);

keyword_enum!(
    /// How an image fills its box
    ObjectFit {
        Cover => "cover",
        Contain => "contain",
        Fill => "fill",
    }
);

impl FontWeight {
    /// `bold` or a numeric weight of 700 and above
    pub fn is_bold(&self) -> bool {
        match self {
            Self::Bold => true,
            Self::Normal => false,
            Self::Other(s) => s.parse::<u16>().map(|w| w >= 700).unwrap_or(false),
        }
    }
}

// =============================================================================
// Lengths
// =============================================================================

/// Unit of a CSS length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Px,
    Pt,
    Mm,
    Em,
    Rem,
    Percent,
}

impl LengthUnit {
    fn suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Pt => "pt",
            Self::Mm => "mm",
            Self::Em => "em",
            Self::Rem => "rem",
            Self::Percent => "%",
        }
    }
}

/// A numeric CSS length such as `16px` or `50%`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CssLength {
    pub value: f64,
    pub unit: LengthUnit,
}

impl CssLength {
    pub const fn px(value: f64) -> Self {
        Self { value, unit: LengthUnit::Px }
    }

    pub const fn percent(value: f64) -> Self {
        Self { value, unit: LengthUnit::Percent }
    }

    /// Resolve to reference pixels.
    ///
    /// `basis_px` is what 100% refers to; em units resolve against the
    /// default font size.
    pub fn to_px(&self, basis_px: f64) -> f64 {
        match self.unit {
            LengthUnit::Px => self.value,
            LengthUnit::Pt => self.value * DEFAULT_DPI / POINTS_PER_INCH,
            LengthUnit::Mm => mm_to_px(self.value),
            LengthUnit::Em | LengthUnit::Rem => self.value * DEFAULT_FONT_SIZE_PX,
            LengthUnit::Percent => basis_px * self.value / 100.0,
        }
    }

    pub fn is_percent(&self) -> bool {
        self.unit == LengthUnit::Percent
    }
}

impl FromStr for CssLength {
    type Err = DocModelError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(trimmed.len());
        let (number, suffix) = trimmed.split_at(split);
        let value: f64 = number
            .parse()
            .map_err(|_| DocModelError::InvalidLength(s.to_string()))?;
        let unit = match suffix.trim().to_ascii_lowercase().as_str() {
            "" | "px" => LengthUnit::Px,
            "pt" => LengthUnit::Pt,
            "mm" => LengthUnit::Mm,
            "em" => LengthUnit::Em,
            "rem" => LengthUnit::Rem,
            "%" => LengthUnit::Percent,
            _ => return Err(DocModelError::InvalidLength(s.to_string())),
        };
        Ok(Self { value, unit })
    }
}

impl std::fmt::Display for CssLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

/// Either a bare number or a string, as found in hand-written style maps
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl Serialize for CssLength {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CssLength {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(n) => Ok(Self::px(n)),
            NumberOrText::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// CSS `line-height`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineHeight {
    Normal,
    /// Unitless multiplier of the font size
    Multiplier(f64),
    Length(CssLength),
}

impl LineHeight {
    /// Multiplier relative to the font size, when one can be derived
    pub fn multiplier(&self, font_size_px: f64) -> Option<f64> {
        match self {
            Self::Normal => None,
            Self::Multiplier(m) => Some(*m),
            Self::Length(len) if font_size_px > 0.0 => Some(len.to_px(font_size_px) / font_size_px),
            Self::Length(_) => None,
        }
    }
}

impl FromStr for LineHeight {
    type Err = DocModelError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("normal") {
            return Ok(Self::Normal);
        }
        if let Ok(m) = trimmed.parse::<f64>() {
            return Ok(Self::Multiplier(m));
        }
        trimmed.parse().map(Self::Length)
    }
}

impl std::fmt::Display for LineHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Multiplier(m) => write!(f, "{}", m),
            Self::Length(len) => write!(f, "{}", len),
        }
    }
}

impl Serialize for LineHeight {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LineHeight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(n) => Ok(Self::Multiplier(n)),
            NumberOrText::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

// =============================================================================
// Lenient field decoding
// =============================================================================

/// Decode an optional typed value, dropping it when it does not parse
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Decode a number that may arrive as a string (`"0.5"`)
fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

// =============================================================================
// Styles
// =============================================================================

/// Presentation properties of an element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Styles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_number")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer_events: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub background_color: Option<Color>,
    /// Image payload, normally a `data:` URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub border_width: Option<CssLength>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub border_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub border_radius: Option<CssLength>,

    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub font_size: Option<CssLength>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub line_height: Option<LineHeight>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub letter_spacing: Option<CssLength>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_items: Option<AlignItems>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<JustifyContent>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_fit: Option<ObjectFit>,

    /// Properties outside the schema, passed through verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

macro_rules! merge_fields {
    ($target:ident, $patch:ident; $($field:ident),+ $(,)?) => {
        $(
            if $patch.$field.is_some() {
                $target.$field = $patch.$field.clone();
            }
        )+
    };
}

impl Styles {
    /// Merge a patch into these styles. Properties present in the patch win.
    pub fn merge(&mut self, patch: &Styles) {
        merge_fields!(self, patch;
            position, display, visibility, opacity, pointer_events,
            background_color, background_image,
            border, border_width, border_style, border_color, border_radius,
            color, font_size, font_family, font_weight, font_style,
            line_height, letter_spacing, text_align, text_decoration,
            align_items, justify_content, object_fit,
        );
        for (key, value) in &patch.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }

    /// Merged copy with `patch` applied over `self`
    pub fn merged(&self, patch: &Styles) -> Styles {
        let mut out = self.clone();
        out.merge(patch);
        out
    }

    /// Hidden elements are neither painted nor exported
    pub fn is_hidden(&self) -> bool {
        matches!(self.visibility, Some(Visibility::Hidden)) || matches!(self.display, Some(Display::None))
    }

    pub fn is_flex(&self) -> bool {
        matches!(self.display, Some(Display::Flex))
    }

    /// Font size in reference pixels
    pub fn font_size_px(&self) -> f64 {
        self.font_size
            .map(|len| len.to_px(DEFAULT_FONT_SIZE_PX))
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(DEFAULT_FONT_SIZE_PX)
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight.as_ref().map(FontWeight::is_bold).unwrap_or(false)
    }

    pub fn is_italic(&self) -> bool {
        matches!(self.font_style, Some(FontStyle::Italic) | Some(FontStyle::Oblique))
    }

    pub fn is_underlined(&self) -> bool {
        matches!(self.text_decoration, Some(TextDecoration::Underline))
    }

    /// Effective opacity in `[0, 1]`
    pub fn opacity(&self) -> f64 {
        self.opacity
            .filter(|o| o.is_finite())
            .map(|o| o.clamp(0.0, 1.0))
            .unwrap_or(1.0)
    }

    /// Letter spacing in reference pixels
    pub fn letter_spacing_px(&self) -> f64 {
        self.letter_spacing.map(|l| l.to_px(0.0)).unwrap_or(0.0)
    }

    /// `border-radius: 50%`, the circle/ellipse marker
    pub fn is_round(&self) -> bool {
        matches!(self.border_radius, Some(r) if r.is_percent() && r.value == 50.0)
    }

    /// Border width in reference pixels, if a border is declared at all
    pub fn border_width_px(&self) -> Option<f64> {
        match (self.border_width, self.border.as_deref()) {
            (Some(width), _) => Some(width.to_px(0.0)),
            (None, Some(shorthand)) => Some(
                shorthand
                    .split_whitespace()
                    .find_map(|token| token.parse::<CssLength>().ok())
                    .map(|len| len.to_px(0.0))
                    .unwrap_or(1.0),
            ),
            (None, None) => None,
        }
    }

    /// Border color, falling back to a color token in the `border` shorthand
    pub fn border_color(&self) -> Option<Color> {
        self.border_color.or_else(|| {
            self.border
                .as_deref()?
                .split_whitespace()
                .find_map(|token| token.parse::<Color>().ok())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_legacy_style_map() {
        let json = r##"{
            "fontSize": "24px",
            "fontWeight": "700",
            "textAlign": "center",
            "color": "#ff0000",
            "opacity": "0.5",
            "display": "flex",
            "alignItems": "center",
            "borderRadius": "50%",
            "boxShadow": "0 0 2px black"
        }"##;
        let styles: Styles = serde_json::from_str(json).unwrap();
        assert_eq!(styles.font_size_px(), 24.0);
        assert!(styles.is_bold());
        assert_eq!(styles.text_align, Some(TextAlign::Center));
        assert_eq!(styles.color, Some(Color::rgb(255, 0, 0)));
        assert_eq!(styles.opacity(), 0.5);
        assert!(styles.is_flex());
        assert!(styles.is_round());
        assert_eq!(styles.extra.get("boxShadow").and_then(|v| v.as_str()), Some("0 0 2px black"));
    }

    #[test]
    fn test_serialize_renders_css_strings() {
        let styles = Styles {
            font_size: Some(CssLength::px(16.0)),
            text_align: Some(TextAlign::Left),
            line_height: Some(LineHeight::Multiplier(1.4)),
            ..Default::default()
        };
        let value = serde_json::to_value(&styles).unwrap();
        assert_eq!(value["fontSize"], "16px");
        assert_eq!(value["textAlign"], "left");
        assert_eq!(value["lineHeight"], "1.4");
        assert!(value.get("color").is_none());
    }

    #[test]
    fn test_unparseable_values_are_dropped() {
        let styles: Styles =
            serde_json::from_str(r#"{"color": "not-a-color", "fontSize": "huge"}"#).unwrap();
        assert!(styles.color.is_none());
        assert_eq!(styles.font_size_px(), DEFAULT_FONT_SIZE_PX);
    }

    #[test]
    fn test_unknown_keywords_round_trip() {
        let styles: Styles = serde_json::from_str(r#"{"display": "grid"}"#).unwrap();
        assert_eq!(styles.display, Some(Display::Other("grid".into())));
        let back = serde_json::to_value(&styles).unwrap();
        assert_eq!(back["display"], "grid");
    }

    #[test]
    fn test_merge_is_one_level_deep() {
        let mut base = Styles {
            color: Some(Color::BLACK),
            font_size: Some(CssLength::px(12.0)),
            ..Default::default()
        };
        base.extra.insert("cursor".into(), "grab".into());

        let patch = Styles {
            color: Some(Color::WHITE),
            ..Default::default()
        };
        base.merge(&patch);

        assert_eq!(base.color, Some(Color::WHITE));
        assert_eq!(base.font_size, Some(CssLength::px(12.0)));
        assert!(base.extra.contains_key("cursor"));
    }

    #[test]
    fn test_hidden() {
        let hidden = Styles { visibility: Some(Visibility::Hidden), ..Default::default() };
        let none = Styles { display: Some(Display::None), ..Default::default() };
        assert!(hidden.is_hidden());
        assert!(none.is_hidden());
        assert!(!Styles::default().is_hidden());
    }

    #[test]
    fn test_lengths() {
        assert_eq!("12pt".parse::<CssLength>().unwrap().to_px(0.0), 16.0);
        assert_eq!("50%".parse::<CssLength>().unwrap().to_px(200.0), 100.0);
        assert_eq!("0".parse::<CssLength>().unwrap(), CssLength::px(0.0));
        assert!("1.5furlongs".parse::<CssLength>().is_err());
        assert_eq!(CssLength::px(16.0).to_string(), "16px");
    }

    #[test]
    fn test_border_shorthand() {
        let styles = Styles { border: Some("2px solid #333333".into()), ..Default::default() };
        assert_eq!(styles.border_width_px(), Some(2.0));
        assert_eq!(styles.border_color(), Some(Color::rgb(0x33, 0x33, 0x33)));
        assert_eq!(Styles::default().border_width_px(), None);
    }

    #[test]
    fn test_line_height_multiplier() {
        assert_eq!(LineHeight::Multiplier(1.2).multiplier(16.0), Some(1.2));
        assert_eq!(LineHeight::Length(CssLength::px(24.0)).multiplier(16.0), Some(1.5));
        assert_eq!(LineHeight::Normal.multiplier(16.0), None);
    }
}
