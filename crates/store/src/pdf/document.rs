//! Paginated documents made of page images
//!
//! Page geometry is given in CSS pixels (96 dpi) and converted to PDF points
//! when written. Placements use a top-left origin; PDF's bottom-left origin
//! is applied here.

use super::objects::{PdfDictionary, PdfObject, PdfStream};
use super::writer::{PdfError, PdfWriter};
use crate::layout::Placement;
use crate::raster::RasterSurface;
use crate::ExportResult;

/// PDF points per CSS pixel
const PT_PER_PX: f64 = 72.0 / 96.0;

/// Creates a fresh paginated document per export
pub trait PaginatedWriter: Send + Sync {
    /// Start a document whose first page has the given size
    fn create(&self, first_page: (f64, f64)) -> Box<dyn PaginatedDocument>;

    fn media_type(&self) -> &'static str;

    /// File extension, without the dot
    fn extension(&self) -> &'static str;
}

/// A paginated document being assembled
pub trait PaginatedDocument: Send {
    /// Append a page and make it the target of `place_image`
    fn add_page(&mut self, size: (f64, f64));

    /// Draw a raster on the current page
    fn place_image(&mut self, raster: &RasterSurface, placement: Placement) -> ExportResult<()>;

    /// Produce the document bytes
    fn finish(self: Box<Self>) -> ExportResult<Vec<u8>>;
}

/// Writes PDFs whose pages carry JPEG images
#[derive(Debug, Clone, Copy)]
pub struct PdfImageWriter {
    jpeg_quality: u8,
}

impl PdfImageWriter {
    pub fn new(jpeg_quality: u8) -> Self {
        Self { jpeg_quality }
    }
}

impl Default for PdfImageWriter {
    fn default() -> Self {
        Self::new(95)
    }
}

impl PaginatedWriter for PdfImageWriter {
    fn create(&self, first_page: (f64, f64)) -> Box<dyn PaginatedDocument> {
        let mut document = PdfImageDocument::new(self.jpeg_quality);
        document.add_page(first_page);
        Box::new(document)
    }

    fn media_type(&self) -> &'static str {
        "application/pdf"
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }
}

/// An image placed on a page, in points with bottom-left origin
#[derive(Debug, Clone)]
struct PlacedImage {
    jpeg: Vec<u8>,
    pixel_size: (u32, u32),
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[derive(Debug, Clone)]
struct ImagePage {
    /// Size in points
    width: f64,
    height: f64,
    images: Vec<PlacedImage>,
}

/// In-memory PDF of image pages
#[derive(Debug)]
pub struct PdfImageDocument {
    jpeg_quality: u8,
    pages: Vec<ImagePage>,
}

impl PdfImageDocument {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality,
            pages: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn write(&self) -> Result<Vec<u8>, PdfError> {
        if self.pages.is_empty() {
            return Err(PdfError::InvalidDocument("No pages to export".to_string()));
        }

        let mut pdf = PdfWriter::new(Vec::new());
        pdf.write_header()?;

        let catalog_ref = pdf.allocate_object();
        let pages_ref = pdf.allocate_object();
        let info_ref = pdf.allocate_object();

        let mut page_refs = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let page_ref = pdf.allocate_object();
            let content_ref = pdf.allocate_object();
            page_refs.push(page_ref);

            let mut xobjects = PdfDictionary::new();
            let mut content = String::new();
            for (i, image) in page.images.iter().enumerate() {
                let image_ref = pdf.allocate_object();
                let name = format!("Im{}", i + 1);
                xobjects.insert(name.as_str(), PdfObject::Reference(image_ref));
                content.push_str(&format!(
                    "q {:.4} 0 0 {:.4} {:.4} {:.4} cm /{} Do Q\n",
                    image.width, image.height, image.x, image.y, name
                ));

                let dict = PdfDictionary::typed("XObject")
                    .with("Subtype", PdfObject::name("Image"))
                    .with("Width", image.pixel_size.0)
                    .with("Height", image.pixel_size.1)
                    .with("ColorSpace", PdfObject::name("DeviceRGB"))
                    .with("BitsPerComponent", 8i64);
                pdf.write_stream_object(image_ref, PdfStream::encoded(dict, "DCTDecode", image.jpeg.clone()))?;
            }

            pdf.write_stream_object(content_ref, PdfStream::new(content.into_bytes()))?;

            let resources = PdfDictionary::new().with("XObject", xobjects);
            let page_dict = PdfDictionary::typed("Page")
                .with("Parent", PdfObject::Reference(pages_ref))
                .with("MediaBox", PdfObject::rect(page.width, page.height))
                .with("Resources", resources)
                .with("Contents", PdfObject::Reference(content_ref));
            pdf.write_object(page_ref, &page_dict.into())?;
        }

        let kids = page_refs.iter().map(|&r| PdfObject::Reference(r)).collect();
        let pages = PdfDictionary::typed("Pages")
            .with("Kids", PdfObject::Array(kids))
            .with("Count", page_refs.len() as i64);
        pdf.write_object(pages_ref, &pages.into())?;

        let catalog = PdfDictionary::typed("Catalog").with("Pages", PdfObject::Reference(pages_ref));
        pdf.write_object(catalog_ref, &catalog.into())?;

        let created = chrono::Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
        let info = PdfDictionary::new()
            .with("Producer", PdfObject::string("Folio"))
            .with("CreationDate", PdfObject::string(created));
        pdf.write_object(info_ref, &info.into())?;

        pdf.write_xref_and_trailer(catalog_ref, Some(info_ref))?;
        Ok(pdf.finish()?)
    }
}

impl PaginatedDocument for PdfImageDocument {
    fn add_page(&mut self, size: (f64, f64)) {
        self.pages.push(ImagePage {
            width: size.0 * PT_PER_PX,
            height: size.1 * PT_PER_PX,
            images: Vec::new(),
        });
    }

    fn place_image(&mut self, raster: &RasterSurface, placement: Placement) -> ExportResult<()> {
        let jpeg = raster.encode_jpeg(self.jpeg_quality)?;
        let page = self
            .pages
            .last_mut()
            .ok_or_else(|| PdfError::InvalidDocument("image placed before any page".to_string()))?;

        let height = placement.height * PT_PER_PX;
        page.images.push(PlacedImage {
            jpeg,
            pixel_size: (raster.width(), raster.height()),
            x: placement.x * PT_PER_PX,
            y: page.height - placement.y * PT_PER_PX - height,
            width: placement.width * PT_PER_PX,
            height,
        });
        Ok(())
    }

    fn finish(self: Box<Self>) -> ExportResult<Vec<u8>> {
        Ok(self.write()?)
    }
}
