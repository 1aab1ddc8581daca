use super::ooxml::{collect_paragraphs, open_archive, read_entry};
use super::{DocumentFormat, ExtractionError, TextExtractor};

const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts body paragraphs from a Word document; empty paragraphs are dropped.
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut archive = open_archive(bytes, DocumentFormat::Docx)?;
        let xml = read_entry(&mut archive, DOCUMENT_PART, DocumentFormat::Docx)?;
        let paragraphs = collect_paragraphs(&xml, None, DocumentFormat::Docx)?;
        Ok(paragraphs.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use super::*;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default();
        writer.start_file("[Content_Types].xml", options).unwrap();
        writer.write_all(b"<Types/>").unwrap();
        writer.start_file(DOCUMENT_PART, options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs_joined_by_newline() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Hello </w:t></w:r><w:r><w:t>world</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t xml:space="preserve">   </w:t></w:r></w:p>
    <w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>Fish &amp; chips</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let text = DocxExtractor.extract(&build_docx(xml)).unwrap();
        assert_eq!(text, "Hello world\nFish & chips");
    }

    #[test]
    fn test_text_box_keeps_surrounding_paragraph() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t xml:space="preserve">Before box </w:t></w:r><w:r><w:pict><w:txbxContent><w:p><w:r><w:t>Inside</w:t></w:r></w:p></w:txbxContent></w:pict></w:r><w:r><w:t>after box.</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let text = DocxExtractor.extract(&build_docx(xml)).unwrap();
        assert_eq!(text, "Before box after box.\nInside");
    }

    #[test]
    fn test_alternate_content_fallback_read_once() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006">
  <w:body>
    <w:p><w:r><w:t>Intro</w:t></w:r></w:p>
    <w:p><w:r><mc:AlternateContent>
      <mc:Choice Requires="wps"><w:drawing><w:txbxContent><w:p><w:r><w:t>Boxed</w:t></w:r></w:p></w:txbxContent></w:drawing></mc:Choice>
      <mc:Fallback><w:pict><w:txbxContent><w:p><w:r><w:t>Boxed</w:t></w:r></w:p></w:txbxContent></w:pict></mc:Fallback>
    </mc:AlternateContent></w:r></w:p>
    <w:p><w:r><w:t>Outro</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let text = DocxExtractor.extract(&build_docx(xml)).unwrap();
        assert_eq!(text, "Intro\nBoxed\nOutro");
    }

    #[test]
    fn test_missing_document_part() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = DocxExtractor.extract(&bytes).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse DOCX:"));
        assert!(err.to_string().contains("word/document.xml"));
    }
}
