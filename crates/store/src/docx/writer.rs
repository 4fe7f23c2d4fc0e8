//! DOCX writer
//!
//! Packages an HTML document as a DOCX "alternative format chunk": the
//! WordprocessingML body holds a single `altChunk` that points at the HTML
//! part, and the word processor converts it on open.

use super::content_types::ContentTypes;
use super::relationships::Relationships;
use super::{content_type_values, namespaces, relationship_types, RichDocumentOptions, RichDocumentWriter};
use crate::archive::ZipArchiveBuilder;
use crate::ExportResult;
use doc_model::Orientation;

/// Part name of the embedded HTML
const CHUNK_PART: &str = "word/afchunk.htm";

/// Twips per CSS pixel (1440 per inch, 96 px per inch)
const TWIPS_PER_PX: u32 = 15;

/// Writes DOCX files that embed HTML through `altChunk`
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxAltChunkWriter;

impl DocxAltChunkWriter {
    pub fn new() -> Self {
        Self
    }

    fn document_xml(&self, chunk_id: &str, options: &RichDocumentOptions) -> String {
        let (w, h) = options.page_size.oriented(options.orientation);
        let orient = match options.orientation {
            Orientation::Portrait => "",
            Orientation::Landscape => r#" w:orient="landscape""#,
        };

        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<w:document xmlns:w="{}" xmlns:r="{}"><w:body>"#,
            namespaces::W,
            namespaces::R
        ));
        xml.push_str(&format!(r#"<w:altChunk r:id="{}"/>"#, chunk_id));
        xml.push_str(&format!(
            r#"<w:sectPr><w:pgSz w:w="{}" w:h="{}"{}/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#,
            w * TWIPS_PER_PX,
            h * TWIPS_PER_PX,
            orient
        ));
        xml.push_str("</w:body></w:document>");
        xml
    }
}

impl RichDocumentWriter for DocxAltChunkWriter {
    fn convert(&self, html: &str, options: &RichDocumentOptions) -> ExportResult<Vec<u8>> {
        let mut content_types = ContentTypes::new();
        content_types.add_override("word/document.xml", content_type_values::DOCUMENT);
        content_types.add_override(CHUNK_PART, content_type_values::HTML);

        let mut root_rels = Relationships::new();
        root_rels.add(relationship_types::DOCUMENT, "word/document.xml");

        let mut doc_rels = Relationships::new();
        let chunk_target = CHUNK_PART.trim_start_matches("word/");
        let chunk_id = doc_rels.add(relationship_types::AF_CHUNK, chunk_target);

        let mut zip = ZipArchiveBuilder::new();
        zip.write_file("[Content_Types].xml", &content_types.to_xml())?;
        zip.write_file("_rels/.rels", &root_rels.to_xml())?;
        zip.write_file("word/document.xml", &self.document_xml(&chunk_id, options))?;
        zip.write_file("word/_rels/document.xml.rels", &doc_rels.to_xml())?;
        zip.write_file(CHUNK_PART, html)?;
        zip.finish()
    }

    fn media_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    }

    fn extension(&self) -> &'static str {
        "docx"
    }
}
