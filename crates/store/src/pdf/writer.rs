//! PDF Writer
//!
//! Object numbering, the cross-reference table and trailer, stream
//! compression, and assembly of pages and shared resources into a file.

use super::document::{ext_gstate_dict, DocumentInfo, PageOutput, Resources, PDF_VERSION};
use super::fonts::standard_font_dict;
use super::images::deflate;
use super::objects::{PdfDictionary, PdfObject, PdfSerializer, PdfStream};
use super::options::PdfExportOptions;
use chrono::Utc;
use std::io::{self, Write};
use thiserror::Error;

/// Error type for PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    #[error("Compression error: {0}")]
    Compression(String),
    /// Image data that cannot be embedded
    #[error("Image error: {0}")]
    Image(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;

/// Low-level writer of indirect objects
pub struct PdfWriter<W: Write> {
    writer: W,
    position: u64,
    /// `(object number, byte offset)`
    offsets: Vec<(u32, u64)>,
    next_obj_num: u32,
    compress: bool,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            position: 0,
            offsets: Vec::new(),
            next_obj_num: 1,
            compress: true,
        }
    }

    pub fn set_compression(&mut self, compress: bool) {
        self.compress = compress;
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.position += data.len() as u64;
        Ok(())
    }

    pub fn allocate_object(&mut self) -> u32 {
        let num = self.next_obj_num;
        self.next_obj_num += 1;
        num
    }

    pub fn write_header(&mut self) -> Result<()> {
        self.write_bytes(format!("%PDF-{PDF_VERSION}\n").as_bytes())?;
        // Binary marker so transfer tools treat the file as binary
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])
    }

    pub fn write_object(&mut self, obj_num: u32, object: &PdfObject) -> Result<()> {
        self.offsets.push((obj_num, self.position));
        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_object(object)?;
        self.write_bytes(format!("{obj_num} 0 obj\n").as_bytes())?;
        self.write_bytes(&serializer.into_inner())?;
        self.write_bytes(b"\nendobj\n")
    }

    /// Write a stream, compressing it first unless it is already encoded
    pub fn write_stream_object(&mut self, obj_num: u32, mut stream: PdfStream) -> Result<()> {
        if self.compress && !stream.encoded {
            stream.data = deflate(&stream.data)?;
            stream.encoded = true;
            stream.dict.insert("Filter", PdfObject::name("FlateDecode"));
        }
        stream.dict.insert("Length", stream.data.len() as i64);
        self.write_object(obj_num, &PdfObject::Stream(stream))
    }

    pub fn write_xref_and_trailer(&mut self, catalog_ref: u32, info_ref: Option<u32>) -> Result<()> {
        let xref_offset = self.position;
        let mut offsets = std::mem::take(&mut self.offsets);
        offsets.sort_by_key(|(num, _)| *num);

        let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", self.next_obj_num);
        let mut expected = 1u32;
        for (num, offset) in offsets {
            while expected < num {
                table.push_str("0000000000 65535 f \n");
                expected += 1;
            }
            table.push_str(&format!("{offset:010} 00000 n \n"));
            expected = num + 1;
        }
        self.write_bytes(table.as_bytes())?;

        let mut trailer = PdfDictionary::new()
            .with("Size", self.next_obj_num)
            .with("Root", PdfObject::Reference(catalog_ref));
        if let Some(info) = info_ref {
            trailer.insert("Info", PdfObject::Reference(info));
        }
        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_object(&trailer.into())?;
        self.write_bytes(b"trailer\n")?;
        self.write_bytes(&serializer.into_inner())?;
        self.write_bytes(format!("\nstartxref\n{xref_offset}\n%%EOF\n").as_bytes())
    }

    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Write rendered pages and their shared resources as a complete file
pub fn write_document<W: Write>(
    pages: Vec<PageOutput>,
    resources: &Resources,
    options: &PdfExportOptions,
    writer: W,
) -> Result<W> {
    if pages.is_empty() {
        return Err(PdfError::InvalidDocument("No pages to export".to_string()));
    }

    let mut pdf = PdfWriter::new(writer);
    pdf.set_compression(options.compress);
    pdf.write_header()?;

    let catalog_ref = pdf.allocate_object();
    let pages_ref = pdf.allocate_object();
    let info_ref = options.include_metadata.then(|| pdf.allocate_object());

    // Shared resources, referenced from every page
    let mut resource_dict = PdfDictionary::new();

    if !resources.fonts().is_empty() {
        let mut fonts = PdfDictionary::new();
        for (name, face) in resources.fonts().iter() {
            let num = pdf.allocate_object();
            pdf.write_object(num, &standard_font_dict(face).into())?;
            fonts.insert(name, PdfObject::Reference(num));
        }
        resource_dict.insert("Font", fonts);
    }

    let mut states = PdfDictionary::new();
    for (name, alpha) in resources.opacities() {
        let num = pdf.allocate_object();
        pdf.write_object(num, &ext_gstate_dict(alpha).into())?;
        states.insert(name, PdfObject::Reference(num));
    }
    if !states.is_empty() {
        resource_dict.insert("ExtGState", states);
    }

    if !resources.images().is_empty() {
        let mut xobjects = PdfDictionary::new();
        for (i, image) in resources.images().iter().enumerate() {
            let smask_ref = match image.soft_mask_stream() {
                Some(mask) => {
                    let num = pdf.allocate_object();
                    pdf.write_stream_object(num, mask)?;
                    Some(num)
                }
                None => None,
            };
            let num = pdf.allocate_object();
            pdf.write_stream_object(num, image.xobject_stream(smask_ref))?;
            xobjects.insert(format!("Im{}", i + 1), PdfObject::Reference(num));
        }
        resource_dict.insert("XObject", xobjects);
    }

    resource_dict.insert(
        "ProcSet",
        vec![
            PdfObject::name("PDF"),
            PdfObject::name("Text"),
            PdfObject::name("ImageC"),
        ],
    );

    let mut page_refs = Vec::with_capacity(pages.len());
    for page in pages {
        let page_ref = pdf.allocate_object();
        let content_ref = pdf.allocate_object();
        let media_box = page.media_box();
        pdf.write_stream_object(content_ref, PdfStream::new(page.content.into_bytes()))?;

        let page_dict = PdfDictionary::new()
            .with_type("Page")
            .with("Parent", PdfObject::Reference(pages_ref))
            .with("MediaBox", media_box)
            .with("Contents", PdfObject::Reference(content_ref))
            .with("Resources", resource_dict.clone());
        pdf.write_object(page_ref, &page_dict.into())?;
        page_refs.push(page_ref);
    }

    let kids: Vec<PdfObject> = page_refs.iter().map(|r| PdfObject::Reference(*r)).collect();
    let page_tree = PdfDictionary::new()
        .with_type("Pages")
        .with("Count", page_refs.len() as i64)
        .with("Kids", kids);
    pdf.write_object(pages_ref, &page_tree.into())?;

    let catalog = PdfDictionary::new()
        .with_type("Catalog")
        .with("Pages", PdfObject::Reference(pages_ref));
    pdf.write_object(catalog_ref, &catalog.into())?;

    if let Some(info_ref) = info_ref {
        let info = DocumentInfo::from_options(options, Utc::now());
        pdf.write_object(info_ref, &info.to_dictionary().into())?;
    }

    pdf.write_xref_and_trailer(catalog_ref, info_ref)?;
    pdf.finish()
}
