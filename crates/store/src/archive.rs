//! Archive packaging for multi-file exports

use crate::ExportResult;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Creates a fresh archive builder per export
pub trait ArchivePackager: Send + Sync {
    fn create(&self) -> Box<dyn ArchiveBuilder>;

    /// Media type of the finished archive
    fn media_type(&self) -> &'static str;

    /// File extension of the finished archive, without the dot
    fn extension(&self) -> &'static str;
}

/// Accumulates named entries, then produces the archive bytes
pub trait ArchiveBuilder: Send {
    fn add_entry(&mut self, name: &str, data: &[u8]) -> ExportResult<()>;

    fn finalize(self: Box<Self>) -> ExportResult<Vec<u8>>;
}

/// Zip archives
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipPackager;

impl ArchivePackager for ZipPackager {
    fn create(&self) -> Box<dyn ArchiveBuilder> {
        Box::new(ZipArchiveBuilder::new())
    }

    fn media_type(&self) -> &'static str {
        "application/zip"
    }

    fn extension(&self) -> &'static str {
        "zip"
    }
}

/// In-memory zip writer
pub struct ZipArchiveBuilder {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipArchiveBuilder {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Write a text part, deflated
    pub fn write_file(&mut self, path: &str, content: &str) -> ExportResult<()> {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        self.zip.start_file(path, options)?;
        self.zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write binary data as-is; images are already compressed
    pub fn write_binary(&mut self, path: &str, data: &[u8]) -> ExportResult<()> {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);

        self.zip.start_file(path, options)?;
        self.zip.write_all(data)?;
        Ok(())
    }

    pub fn finish(self) -> ExportResult<Vec<u8>> {
        Ok(self.zip.finish()?.into_inner())
    }
}

impl Default for ZipArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder for ZipArchiveBuilder {
    fn add_entry(&mut self, name: &str, data: &[u8]) -> ExportResult<()> {
        self.write_binary(name, data)
    }

    fn finalize(self: Box<Self>) -> ExportResult<Vec<u8>> {
        (*self).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_zip_entries_in_order() {
        let mut builder = ZipPackager.create();
        builder.add_entry("page-1.png", b"one").unwrap();
        builder.add_entry("page-2.png", b"two").unwrap();
        let bytes = builder.finalize().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_index(0).unwrap().name(), "page-1.png");

        let mut contents = String::new();
        archive.by_name("page-2.png").unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "two");
    }

    #[test]
    fn test_empty_archive_is_valid() {
        let bytes = Box::new(ZipArchiveBuilder::new()).finalize().unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert!(archive.is_empty());
    }
}
