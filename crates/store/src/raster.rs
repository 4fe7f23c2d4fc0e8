//! Raster surfaces and the rasterizer boundary
//!
//! The rasterizer turns a page's markup into pixels. It is an external
//! collaborator; the pipeline only sees the [`Rasterizer`] trait.

use crate::ExportResult;
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat as Codec, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;
use thiserror::Error;

/// Output encodings for single-image exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

/// What to rasterize for one page
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Zero-based page index, for diagnostics
    pub page: usize,
    /// Page content markup
    pub markup: String,
    /// Layout width in CSS pixels, before padding
    pub width: u32,
    /// Padding on every side, in CSS pixels
    pub padding: u32,
    /// Device pixels per CSS pixel
    pub scale: f32,
    /// CSS background color
    pub background: String,
}

impl RenderRequest {
    /// Width of the produced raster in device pixels, saturating at
    /// `u32::MAX`
    pub fn device_width(&self) -> u32 {
        let css = self.width as f64 + 2.0 * self.padding as f64;
        (css * self.scale as f64).round() as u32
    }
}

/// Failure reported by a rasterizer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RasterError {
    /// The rasterizer cannot be used at all
    #[error("rasterizer unavailable: {0}")]
    Unavailable(String),
    /// This page could not be rendered
    #[error("{0}")]
    Failed(String),
}

/// Renders page markup to pixels
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn render(&self, request: RenderRequest) -> Result<RasterSurface, RasterError>;
}

/// A rendered page: an RGBA pixel buffer
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSurface {
    image: RgbaImage,
}

impl RasterSurface {
    /// A surface filled with one color
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(color)),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Encode as PNG
    pub fn encode_png(&self) -> ExportResult<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(self.image.clone()).write_to(&mut buf, Codec::Png)?;
        Ok(buf.into_inner())
    }

    /// Encode as baseline JPEG. Transparent pixels are composited onto white.
    pub fn encode_jpeg(&self, quality: u8) -> ExportResult<Vec<u8>> {
        let rgb = self.flatten_onto_white();
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)).encode_image(&rgb)?;
        Ok(buf)
    }

    /// Encode in the given format
    pub fn encode(&self, format: ImageFormat, jpeg_quality: u8) -> ExportResult<Vec<u8>> {
        match format {
            ImageFormat::Png => self.encode_png(),
            ImageFormat::Jpeg => self.encode_jpeg(jpeg_quality),
        }
    }

    fn flatten_onto_white(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| {
            let Rgba([r, g, b, a]) = *self.image.get_pixel(x, y);
            let blend = |c: u8| ((c as u32 * a as u32 + 255 * (255 - a as u32)) / 255) as u8;
            Rgb([blend(r), blend(g), blend(b)])
        })
    }
}
