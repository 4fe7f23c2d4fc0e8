//! Export pipeline
//!
//! Turns a document snapshot into artifacts. Every page is rasterized
//! through the configured [`Rasterizer`] and the rasters are routed into one
//! of the assembly strategies: a single image, an archive of images, one
//! stitched image, or a paginated document. The rich-document export skips
//! rasterization and hands the page markup to a [`RichDocumentWriter`].
//!
//! A page that fails to render is logged and left out; the export fails only
//! when no page renders or a collaborator is unavailable.

use crate::archive::{ArchivePackager, ZipPackager};
use crate::docx::{DocxAltChunkWriter, RichDocumentOptions, RichDocumentWriter};
use crate::layout::fit_placement;
use crate::pdf::{PaginatedWriter, PdfImageWriter};
use crate::raster::{ImageFormat, RasterError, RasterSurface, Rasterizer, RenderRequest};
use crate::settings::ExportSettings;
use crate::{ExportError, ExportResult};
use doc_model::{Document, Orientation, PageSize};
use image::{imageops, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A produced file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Write the artifact into `dir` under its file name
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> crate::Result<PathBuf> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        tracing::debug!(path = %path.display(), bytes = self.bytes.len(), "artifact saved");
        Ok(path)
    }
}

/// An artifact plus the pages that were left out of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub artifact: Artifact,
    /// Zero-based indexes of pages that failed to render
    pub omitted_pages: Vec<usize>,
}

/// Page setup for paginated output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaperOptions {
    pub size: PageSize,
    pub orientation: Orientation,
}

impl PaperOptions {
    /// Resolve a paper name and orientation name; unknown papers are A4
    pub fn from_names(paper: &str, orientation: &str) -> Self {
        Self {
            size: PageSize::from_name(paper),
            orientation: Orientation::from_name(orientation),
        }
    }

    /// Page size in CSS pixels, oriented
    pub fn dimensions(&self) -> (f64, f64) {
        let (w, h) = self.size.oriented(self.orientation);
        (w as f64, h as f64)
    }
}

/// Rasters of the pages that rendered, and the indexes of those that did not
struct Rendered {
    rasters: Vec<(usize, RasterSurface)>,
    omitted: Vec<usize>,
}

/// The export pipeline and its collaborators
#[derive(Clone)]
pub struct ExportPipeline {
    settings: ExportSettings,
    rasterizer: Option<Arc<dyn Rasterizer>>,
    packager: Option<Arc<dyn ArchivePackager>>,
    paginated_writer: Option<Arc<dyn PaginatedWriter>>,
    rich_writer: Option<Arc<dyn RichDocumentWriter>>,
}

impl ExportPipeline {
    /// A pipeline with the default zip, PDF, and DOCX writers and no
    /// rasterizer
    pub fn new(settings: ExportSettings) -> Self {
        let jpeg_quality = settings.jpeg_quality;
        Self {
            settings,
            rasterizer: None,
            packager: Some(Arc::new(ZipPackager)),
            paginated_writer: Some(Arc::new(PdfImageWriter::new(jpeg_quality))),
            rich_writer: Some(Arc::new(DocxAltChunkWriter::new())),
        }
    }

    /// A pipeline with no collaborators at all
    pub fn bare(settings: ExportSettings) -> Self {
        Self {
            settings,
            rasterizer: None,
            packager: None,
            paginated_writer: None,
            rich_writer: None,
        }
    }

    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    pub fn with_packager(mut self, packager: Arc<dyn ArchivePackager>) -> Self {
        self.packager = Some(packager);
        self
    }

    pub fn with_paginated_writer(mut self, writer: Arc<dyn PaginatedWriter>) -> Self {
        self.paginated_writer = Some(writer);
        self
    }

    pub fn with_rich_document_writer(mut self, writer: Arc<dyn RichDocumentWriter>) -> Self {
        self.rich_writer = Some(writer);
        self
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    fn rasterizer(&self) -> ExportResult<&dyn Rasterizer> {
        self.rasterizer
            .as_deref()
            .ok_or_else(|| ExportError::CollaboratorUnavailable("no rasterizer configured".to_string()))
    }

    fn file_name(&self, suffix: &str, extension: &str) -> String {
        format!("{}{}.{}", self.settings.file_stem, suffix, extension)
    }

    // ========================================================================
    // Rasterization
    // ========================================================================

    fn request(&self, document: &Document, index: usize, scale: f32) -> Option<RenderRequest> {
        let page = document.page(index)?;
        Some(RenderRequest {
            page: index,
            markup: page.content.to_markup(),
            width: page.width(),
            padding: self.settings.padding,
            scale,
            background: self.settings.background.clone(),
        })
    }

    async fn render_page(
        &self,
        rasterizer: &dyn Rasterizer,
        document: &Document,
        index: usize,
        scale: f32,
    ) -> ExportResult<Result<RasterSurface, String>> {
        let request = self.request(document, index, scale).ok_or(ExportError::PageIndexOutOfRange {
            index,
            len: document.len(),
        })?;
        match rasterizer.render(request).await {
            Ok(raster) => Ok(Ok(raster)),
            Err(RasterError::Unavailable(reason)) => Err(ExportError::CollaboratorUnavailable(reason)),
            Err(RasterError::Failed(reason)) => Ok(Err(reason)),
        }
    }

    /// Render every page in order at the export scale
    async fn render_all(&self, document: &Document) -> ExportResult<Rendered> {
        let rasterizer = self.rasterizer()?;
        let mut rendered = Rendered {
            rasters: Vec::with_capacity(document.len()),
            omitted: Vec::new(),
        };

        for index in 0..document.len() {
            match self.render_page(rasterizer, document, index, self.settings.scale).await? {
                Ok(raster) => rendered.rasters.push((index, raster)),
                Err(reason) => {
                    tracing::warn!("Page {} failed to render and was omitted: {}", index + 1, reason);
                    rendered.omitted.push(index);
                }
            }
        }

        if rendered.rasters.is_empty() {
            return Err(ExportError::NoPagesRendered);
        }
        Ok(rendered)
    }

    // ========================================================================
    // Exports
    // ========================================================================

    /// One page as a PNG or JPEG image
    pub async fn export_single_page(
        &self,
        document: &Document,
        index: usize,
        format: ImageFormat,
    ) -> ExportResult<Artifact> {
        let rasterizer = self.rasterizer()?;
        let raster = self
            .render_page(rasterizer, document, index, self.settings.scale)
            .await?
            .map_err(|reason| ExportError::Rasterization { page: index, reason })?;

        let bytes = raster.encode(format, self.settings.jpeg_quality)?;
        let file_name = self.file_name(&format!("-page-{}", index + 1), format.extension());
        tracing::info!(page = index + 1, file = %file_name, "page exported");
        Ok(Artifact::new(file_name, format.media_type(), bytes))
    }

    /// Every page as a PNG entry `page-N.png` in one archive
    pub async fn export_archive(&self, document: &Document) -> ExportResult<ExportOutcome> {
        let packager = self
            .packager
            .clone()
            .ok_or_else(|| ExportError::CollaboratorUnavailable("no archive packager configured".to_string()))?;
        let rendered = self.render_all(document).await?;

        let mut builder = packager.create();
        for (index, raster) in &rendered.rasters {
            builder.add_entry(&format!("page-{}.png", index + 1), &raster.encode_png()?)?;
        }
        let bytes = builder.finalize()?;

        let artifact = Artifact::new(
            self.file_name("-pages", packager.extension()),
            packager.media_type(),
            bytes,
        );
        tracing::info!(
            entries = rendered.rasters.len(),
            omitted = rendered.omitted.len(),
            "archive exported"
        );
        Ok(ExportOutcome {
            artifact,
            omitted_pages: rendered.omitted,
        })
    }

    /// All pages stacked vertically in one PNG. The canvas is as wide as the
    /// first raster; rasters are drawn unscaled.
    pub async fn export_stitched(&self, document: &Document) -> ExportResult<ExportOutcome> {
        let rendered = self.render_all(document).await?;

        let width = rendered.rasters[0].1.width();
        let height = stacked_height(rendered.rasters.iter().map(|(_, r)| r.height()))?;
        let mut canvas = RgbaImage::new(width, height);

        let mut y: i64 = 0;
        for (_, raster) in &rendered.rasters {
            imageops::overlay(&mut canvas, raster.image(), 0, y);
            y += raster.height() as i64;
        }

        let bytes = RasterSurface::from_image(canvas).encode_png()?;
        tracing::info!(width, height, omitted = rendered.omitted.len(), "stitched image exported");
        Ok(ExportOutcome {
            artifact: Artifact::new(
                self.file_name("-stitched", ImageFormat::Png.extension()),
                ImageFormat::Png.media_type(),
                bytes,
            ),
            omitted_pages: rendered.omitted,
        })
    }

    /// One output page per rendered page, each raster scaled to fit the
    /// paper and centered
    pub async fn export_paginated(
        &self,
        document: &Document,
        paper: PaperOptions,
    ) -> ExportResult<ExportOutcome> {
        let writer = self
            .paginated_writer
            .clone()
            .ok_or_else(|| ExportError::CollaboratorUnavailable("no paginated writer configured".to_string()))?;
        let rendered = self.render_all(document).await?;
        let target = paper.dimensions();

        let mut output = writer.create(target);
        for (i, (_, raster)) in rendered.rasters.iter().enumerate() {
            if i > 0 {
                output.add_page(target);
            }
            let placement = fit_placement((raster.width(), raster.height()), target);
            output.place_image(raster, placement)?;
        }
        let bytes = output.finish()?;

        tracing::info!(
            pages = rendered.rasters.len(),
            paper = %paper.size.resolved(),
            orientation = paper.orientation.as_str(),
            "paginated document exported"
        );
        Ok(ExportOutcome {
            artifact: Artifact::new(self.file_name("", writer.extension()), writer.media_type(), bytes),
            omitted_pages: rendered.omitted,
        })
    }

    /// All pages as one HTML document with page breaks, converted by the
    /// rich-document writer
    pub async fn export_rich_document(
        &self,
        document: &Document,
        options: RichDocumentOptions,
    ) -> ExportResult<Artifact> {
        let writer = self
            .rich_writer
            .clone()
            .ok_or_else(|| ExportError::CollaboratorUnavailable("no rich document writer configured".to_string()))?;

        let html = rich_document_html(document);
        let bytes = writer.convert(&html, &options)?;
        tracing::info!(pages = document.len(), "rich document exported");
        Ok(Artifact::new(self.file_name("", writer.extension()), writer.media_type(), bytes))
    }

    /// Low-scale rasters for a page strip; pages that fail are `None`
    pub async fn render_thumbnails(&self, document: &Document) -> ExportResult<Vec<Option<RasterSurface>>> {
        let rasterizer = self.rasterizer()?;
        let mut thumbnails = Vec::with_capacity(document.len());
        for index in 0..document.len() {
            let thumbnail = self
                .render_page(rasterizer, document, index, self.settings.thumbnail_scale)
                .await?;
            if let Err(reason) = &thumbnail {
                tracing::debug!(page = index + 1, %reason, "thumbnail failed");
            }
            thumbnails.push(thumbnail.ok());
        }
        Ok(thumbnails)
    }
}

/// Total height of rasters stacked top to bottom
fn stacked_height(heights: impl IntoIterator<Item = u32>) -> ExportResult<u32> {
    let total: u64 = heights.into_iter().map(u64::from).sum();
    u32::try_from(total).map_err(|_| ExportError::CanvasTooLarge { height: total })
}

/// Wrap every page's markup in a page-breaking block inside one HTML
/// document
pub fn rich_document_html(document: &Document) -> String {
    let mut body = String::new();
    for page in document.pages() {
        body.push_str(r#"<div style="page-break-after:always">"#);
        body.push_str(&page.content.to_markup());
        body.push_str("</div>");
    }
    format!(
        "<!DOCTYPE html><html><head><meta charset='utf-8'></head><body>{}</body></html>",
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_options_from_names() {
        let paper = PaperOptions::from_names("letter", "Landscape");
        assert_eq!(paper.size, PageSize::Letter);
        assert_eq!(paper.dimensions(), (1056.0, 816.0));

        assert_eq!(PaperOptions::from_names("unknown", "").dimensions(), (794.0, 1123.0));
    }

    #[test]
    fn test_rich_document_html_wraps_each_page() {
        let mut document = Document::new();
        document.add_page(0);
        let html = rich_document_html(&document);

        assert!(html.starts_with("<!DOCTYPE html><html><head><meta charset='utf-8'></head><body>"));
        assert!(html.ends_with("</body></html>"));
        assert_eq!(html.matches(r#"<div style="page-break-after:always">"#).count(), 2);
        assert!(html.contains("Untitled document"));
        assert!(html.contains("New page"));
    }

    #[test]
    fn test_stacked_height_overflow_is_an_error() {
        assert_eq!(stacked_height([10, 20, 30]).unwrap(), 60);
        assert!(matches!(
            stacked_height([u32::MAX, 1]),
            Err(ExportError::CanvasTooLarge { height }) if height == u32::MAX as u64 + 1
        ));
    }

    #[test]
    fn test_zero_sided_custom_paper_is_a4() {
        let paper = PaperOptions {
            size: PageSize::Custom { width: 0, height: 0 },
            orientation: Orientation::Portrait,
        };
        assert_eq!(paper.dimensions(), (794.0, 1123.0));
    }

    #[tokio::test]
    async fn test_artifact_save_to() {
        let dir = tempfile::TempDir::new().unwrap();
        let artifact = Artifact::new("document.pdf", "application/pdf", b"%PDF".to_vec());
        let path = artifact.save_to(dir.path().join("out")).await.unwrap();

        assert_eq!(path.file_name().unwrap(), "document.pdf");
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF");
    }

    #[tokio::test]
    async fn test_missing_rasterizer_is_unavailable() {
        let pipeline = ExportPipeline::new(ExportSettings::default());
        let err = pipeline.export_archive(&Document::new()).await.unwrap_err();
        assert!(matches!(err, ExportError::CollaboratorUnavailable(_)));
    }
}
