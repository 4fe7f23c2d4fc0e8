//! [Content_Types].xml generation

use quick_xml::escape::escape;

/// Content types of the parts in a package, in insertion order
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    /// (extension, content type)
    defaults: Vec<(String, String)>,
    /// (part name, content type)
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    /// Content types with the package-wide defaults
    pub fn new() -> Self {
        let mut ct = Self::default();
        ct.add_default("rels", "application/vnd.openxmlformats-package.relationships+xml");
        ct.add_default("xml", "application/xml");
        ct
    }

    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        self.defaults.push((extension.to_string(), content_type.to_string()));
    }

    /// Override the content type of one part; part names start with `/`
    pub fn add_override(&mut self, part: &str, content_type: &str) {
        let part = if part.starts_with('/') {
            part.to_string()
        } else {
            format!("/{}", part)
        };
        self.overrides.push((part, content_type.to_string()));
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);

        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape(ext.as_str()),
                escape(ct.as_str())
            ));
        }

        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape(part.as_str()),
                escape(ct.as_str())
            ));
        }

        xml.push_str("</Types>");
        xml
    }
}
