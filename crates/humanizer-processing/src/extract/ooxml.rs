//! Shared helpers for the zip-packaged Office Open XML formats.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{DocumentFormat, ExtractionError};

/// Decompressed size ceiling for a single archive entry.
const MAX_XML_ENTRY_BYTES: u64 = 64 * 1024 * 1024;

pub(crate) type Archive<'a> = zip::ZipArchive<Cursor<&'a [u8]>>;

pub(crate) fn open_archive(
    bytes: &[u8],
    format: DocumentFormat,
) -> Result<Archive<'_>, ExtractionError> {
    zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractionError::parse(format, e))
}

pub(crate) fn read_entry(
    archive: &mut Archive<'_>,
    name: &str,
    format: DocumentFormat,
) -> Result<Vec<u8>, ExtractionError> {
    let entry = archive
        .by_name(name)
        .map_err(|e| ExtractionError::parse(format, format!("{}: {}", name, e)))?;

    let mut out = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut out)
        .map_err(|e| ExtractionError::parse(format, e))?;

    if out.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(ExtractionError::parse(
            format,
            format!("{} exceeds size limit ({} bytes)", name, MAX_XML_ENTRY_BYTES),
        ));
    }

    Ok(out)
}

/// Collect paragraph text from a WordprocessingML or DrawingML part.
///
/// Text runs (`t`) are appended to the innermost open paragraph (`p`). Paragraphs nested
/// inside another (text boxes) are kept as separate entries in document order. Alternate
/// content fallbacks (`mc:Fallback`) are skipped so their text is not read twice. When
/// `group` is set, paragraphs are grouped per element with that local name (a slide
/// shape) and each group is returned joined by newlines; otherwise every paragraph is
/// returned on its own.
pub(crate) fn collect_paragraphs(
    xml: &[u8],
    group: Option<&[u8]>,
    format: DocumentFormat,
) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut out = Vec::new();
    // Paragraphs of the current group, in the order they were opened.
    let mut paragraphs: Vec<String> = Vec::new();
    // Indices into `paragraphs` of the paragraphs still open.
    let mut open: Vec<usize> = Vec::new();
    let mut in_group = group.is_none();
    let mut in_run = false;
    let mut fallback_depth = 0usize;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| ExtractionError::parse(format, e))?;

        if fallback_depth > 0 {
            match event {
                Event::Start(e) if e.local_name().as_ref() == b"Fallback" => fallback_depth += 1,
                Event::End(e) if e.local_name().as_ref() == b"Fallback" => fallback_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
            continue;
        }

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"Fallback" => fallback_depth = 1,
                b"t" if in_group => in_run = true,
                b"p" if in_group => {
                    paragraphs.push(String::new());
                    open.push(paragraphs.len() - 1);
                }
                b"br" if in_group => push_text(&mut paragraphs, &open, "\n"),
                name if Some(name) == group => {
                    in_group = true;
                    paragraphs.clear();
                    open.clear();
                }
                _ => {}
            },
            Event::Empty(e) if in_group && e.local_name().as_ref() == b"br" => {
                push_text(&mut paragraphs, &open, "\n");
            }
            Event::Text(te) if in_run => {
                let text = te.unescape().map_err(|e| ExtractionError::parse(format, e))?;
                push_text(&mut paragraphs, &open, &text);
            }
            Event::CData(cdata) if in_run => {
                push_text(&mut paragraphs, &open, &String::from_utf8_lossy(&cdata));
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_run = false,
                b"p" if in_group => {
                    open.pop();
                }
                name if Some(name) == group => {
                    in_group = false;
                    let text = std::mem::take(&mut paragraphs).join("\n");
                    if !text.trim().is_empty() {
                        out.push(text);
                    }
                    open.clear();
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if group.is_none() {
        out.extend(paragraphs.into_iter().filter(|p| !p.trim().is_empty()));
    }

    Ok(out)
}

fn push_text(paragraphs: &mut [String], open: &[usize], text: &str) {
    if let Some(&index) = open.last() {
        paragraphs[index].push_str(text);
    }
}
