//! PDF Image Handling
//!
//! Image elements carry their pixels as `data:` URLs. The payload is
//! decoded here and turned into an image XObject: JPEG data is passed
//! through with DCTDecode, everything else is re-encoded as Flate
//! compressed RGB with an optional alpha soft mask.

use super::content::ContentStream;
use super::document::Resources;
use super::objects::{PdfDictionary, PdfObject, PdfStream};
use super::writer::PdfError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use doc_model::{Color, Element};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::{ColorType, ImageFormat};
use std::io::Write;
use text_engine::StandardFace;

/// Where an image element's pixels come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// Nothing to draw
    Missing,
    /// Inline `data:image/...` URL
    DataUrl(&'a str),
    /// Any other reference; never fetched during export
    External(&'a str),
}

impl<'a> ImageSource<'a> {
    /// The background image of an element, or its content as a fallback
    pub fn of(element: &'a Element) -> Self {
        let url = element
            .styles
            .background_image
            .as_deref()
            .or(element.content.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty());
        match url {
            None => Self::Missing,
            Some(url) if url.starts_with("data:image/") => Self::DataUrl(url),
            Some(url) => Self::External(url),
        }
    }
}

/// Labeled box drawn where an image cannot be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// The element has no image at all
    Empty,
    /// The image is not inline data
    External,
    /// The inline data could not be decoded
    Error,
}

impl Placeholder {
    pub fn label(self) -> &'static str {
        match self {
            Self::Empty => "Image",
            Self::External => "External Image",
            Self::Error => "Image Error",
        }
    }

    pub fn fill(self) -> Color {
        match self {
            Self::Empty | Self::External => Color::rgb(0xf3, 0xf4, 0xf6),
            Self::Error => Color::rgb(0xfe, 0xe2, 0xe2),
        }
    }

    pub fn text_color(self) -> Color {
        match self {
            Self::Empty | Self::External => Color::rgb(0x66, 0x66, 0x66),
            Self::Error => Color::rgb(0xdc, 0x26, 0x26),
        }
    }

    /// Label size in points
    pub fn font_size(self) -> f64 {
        match self {
            Self::Empty => 10.0,
            Self::External | Self::Error => 8.0,
        }
    }
}

/// Fill the box `(x, y, width, height)`, in points with y up, and center
/// the placeholder's label in it
pub fn draw_placeholder(
    out: &mut ContentStream,
    resources: &mut Resources,
    placeholder: Placeholder,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) {
    let label = placeholder.label();
    let size = placeholder.font_size();
    let face = StandardFace::HELVETICA;
    let font = resources.font(face);
    let label_width = face.text_width(label, size);
    out.save_state()
        .set_fill_color(placeholder.fill())
        .rect(x, y, width, height)
        .fill()
        .set_fill_color(placeholder.text_color())
        .text_line(
            &font,
            size,
            x + (width - label_width) / 2.0,
            y + height / 2.0,
            0.0,
            label,
        )
        .restore_state();
}

/// Container format an image is expected to be in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    fn format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Decode the base64 payload of a `data:` URL
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, PdfError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| PdfError::Image("not a data URL".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| PdfError::Image("data URL has no payload".into()))?;
    if !meta.ends_with(";base64") {
        return Err(PdfError::Image(format!("unsupported data URL encoding: {meta}")));
    }
    let payload: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(payload)
        .map_err(|e| PdfError::Image(format!("invalid base64 payload: {e}")))
}

/// Color space of embedded pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRGB,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
        }
    }
}

/// Image data ready to be written as an XObject
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedImage {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    /// Filter the data is encoded with
    pub filter: &'static str,
    pub data: Vec<u8>,
    /// Flate compressed 8-bit alpha channel, when any pixel is translucent
    pub soft_mask: Option<Vec<u8>>,
}

impl EmbeddedImage {
    /// Decode image bytes that must be of `kind`.
    ///
    /// Bytes of another format are rejected even when they would decode.
    pub fn decode(bytes: &[u8], kind: ImageKind) -> Result<Self, PdfError> {
        let format = image::guess_format(bytes)
            .map_err(|e| PdfError::Image(format!("unrecognized image data: {e}")))?;
        if format != kind.format() {
            return Err(PdfError::Image(format!("expected {kind:?} data, found {format:?}")));
        }
        let decoded = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| PdfError::Image(e.to_string()))?;
        let (width, height) = (decoded.width(), decoded.height());
        if width == 0 || height == 0 {
            return Err(PdfError::Image("image has no pixels".into()));
        }

        if kind == ImageKind::Jpeg {
            let color_space = match decoded.color() {
                ColorType::L8 | ColorType::L16 => ColorSpace::DeviceGray,
                _ => ColorSpace::DeviceRGB,
            };
            return Ok(Self {
                width,
                height,
                color_space,
                filter: "DCTDecode",
                data: bytes.to_vec(),
                soft_mask: None,
            });
        }

        let rgba = decoded.to_rgba8();
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for pixel in rgba.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }
        let soft_mask = if alpha.iter().any(|a| *a < u8::MAX) {
            Some(deflate(&alpha)?)
        } else {
            None
        };
        Ok(Self {
            width,
            height,
            color_space: ColorSpace::DeviceRGB,
            filter: "FlateDecode",
            data: deflate(&rgb)?,
            soft_mask,
        })
    }

    /// Width over height of the pixel grid
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Image XObject stream; `smask_ref` must point at [`Self::soft_mask_stream`]
    pub fn xobject_stream(&self, smask_ref: Option<u32>) -> PdfStream {
        let mut dict = image_dict(self.width, self.height, self.color_space);
        if let Some(r) = smask_ref {
            dict.insert("SMask", PdfObject::Reference(r));
        }
        PdfStream::encoded(self.data.clone(), self.filter).with_dict(dict)
    }

    pub fn soft_mask_stream(&self) -> Option<PdfStream> {
        self.soft_mask.as_ref().map(|mask| {
            PdfStream::encoded(mask.clone(), "FlateDecode")
                .with_dict(image_dict(self.width, self.height, ColorSpace::DeviceGray))
        })
    }
}

fn image_dict(width: u32, height: u32, color_space: ColorSpace) -> PdfDictionary {
    PdfDictionary::new()
        .with_type("XObject")
        .with("Subtype", PdfObject::name("Image"))
        .with("Width", width)
        .with("Height", height)
        .with("ColorSpace", PdfObject::name(color_space.pdf_name()))
        .with("BitsPerComponent", 8u32)
}

pub(crate) fn deflate(data: &[u8]) -> Result<Vec<u8>, PdfError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| PdfError::Compression(e.to_string()))?;
    encoder.finish().map_err(|e| PdfError::Compression(e.to_string()))
}

/// Sub-rectangle `(x, y, width, height)` that fits an image of
/// `aspect_ratio` inside the box, centered on the axis with slack
pub fn contain_rect(x: f64, y: f64, width: f64, height: f64, aspect_ratio: f64) -> (f64, f64, f64, f64) {
    if width <= 0.0 || height <= 0.0 || !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
        return (x, y, width, height);
    }
    if aspect_ratio > width / height {
        let h = width / aspect_ratio;
        (x, y + (height - h) / 2.0, width, h)
    } else {
        let w = height * aspect_ratio;
        (x + (width - w) / 2.0, y, w, height)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use doc_model::ElementType;
    use image::{ImageBuffer, Rgba};
    use proptest::prelude::*;
    use std::io::Cursor;

    /// A `w`×`h` PNG as a data URL; the first pixel is half transparent
    /// when `translucent`
    pub(crate) fn png_data_url(w: u32, h: u32, translucent: bool) -> String {
        let mut img = ImageBuffer::from_pixel(w, h, Rgba([200u8, 10, 10, 255]));
        if translucent {
            img.put_pixel(0, 0, Rgba([0, 0, 0, 128]));
        }
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        format!("data:image/png;base64,{}", STANDARD.encode(bytes))
    }

    #[test]
    fn test_source_classification() {
        let mut el = Element::new(ElementType::Image, 0.0, 0.0, 10.0, 10.0);
        assert_eq!(ImageSource::of(&el), ImageSource::Missing);
        el.content = Some("https://example.com/a.png".into());
        assert_eq!(ImageSource::of(&el), ImageSource::External("https://example.com/a.png"));
        el.styles.background_image = Some("data:image/png;base64,AAAA".into());
        assert_eq!(ImageSource::of(&el), ImageSource::DataUrl("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_decode_png_with_alpha() {
        let bytes = decode_data_url(&png_data_url(3, 2, true)).unwrap();
        let img = EmbeddedImage::decode(&bytes, ImageKind::Png).unwrap();
        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(img.filter, "FlateDecode");
        assert!(img.soft_mask.is_some());
        assert!((img.aspect_ratio() - 1.5).abs() < 1e-12);

        let opaque = decode_data_url(&png_data_url(2, 2, false)).unwrap();
        assert!(EmbeddedImage::decode(&opaque, ImageKind::Png).unwrap().soft_mask.is_none());
    }

    #[test]
    fn test_mismatched_kind_is_rejected() {
        let bytes = decode_data_url(&png_data_url(1, 1, false)).unwrap();
        assert!(matches!(EmbeddedImage::decode(&bytes, ImageKind::Jpeg), Err(PdfError::Image(_))));
    }

    #[test]
    fn test_bad_payloads() {
        assert!(decode_data_url("https://x").is_err());
        assert!(decode_data_url("data:image/png;base64").is_err());
        assert!(decode_data_url("data:image/svg+xml,<svg/>").is_err());
        let garbage = decode_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert!(EmbeddedImage::decode(&garbage, ImageKind::Png).is_err());
    }

    #[test]
    fn test_placeholder_label_is_centered() {
        let mut out = ContentStream::new();
        let mut resources = Resources::new();
        draw_placeholder(&mut out, &mut resources, Placeholder::External, 0.0, 0.0, 200.0, 100.0);
        assert_eq!(out.text_runs(), 1);
        let content = String::from_utf8(out.into_bytes()).unwrap();
        assert!(content.contains("0.9529 0.9569 0.9647 rg"));
        assert!(content.contains("(External Image) Tj"));
        assert!(content.contains(" 50 Tm"));
        assert_eq!(resources.fonts().len(), 1);
    }

    #[test]
    fn test_contain_rect() {
        // Wide image in a square box: full width, centered vertically
        assert_eq!(contain_rect(0.0, 0.0, 100.0, 100.0, 2.0), (0.0, 25.0, 100.0, 50.0));
        // Tall image: full height, centered horizontally
        assert_eq!(contain_rect(10.0, 0.0, 100.0, 100.0, 0.5), (35.0, 0.0, 50.0, 100.0));
    }

    proptest! {
        #[test]
        fn prop_contain_rect_fits_and_keeps_aspect(
            w in 1.0f64..500.0,
            h in 1.0f64..500.0,
            aspect in 0.05f64..20.0,
        ) {
            let (x, y, cw, ch) = contain_rect(0.0, 0.0, w, h, aspect);
            let eps = 1e-9 * w.max(h);
            prop_assert!(x >= -eps && y >= -eps);
            prop_assert!(x + cw <= w + eps && y + ch <= h + eps);
            prop_assert!((cw / ch - aspect).abs() < 1e-6 * aspect);
            // One side always touches the box
            prop_assert!((cw - w).abs() < eps || (ch - h).abs() < eps);
        }
    }
}
