use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::ooxml::{collect_paragraphs, open_archive, read_entry, Archive};
use super::{DocumentFormat, ExtractionError, TextExtractor};

const SLIDE_PREFIX: &str = "ppt/slides/slide";
const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";

/// Extracts the text of every shape on every slide, in slide order.
///
/// Slide order comes from the presentation's slide list; archives without one fall back
/// to the number in each slide's part name.
pub struct PptxExtractor;

impl TextExtractor for PptxExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pptx
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut archive = open_archive(bytes, DocumentFormat::Pptx)?;

        let slides = match presentation_order(&mut archive)? {
            Some(order) if !order.is_empty() => order,
            _ => numbered_slides(&archive),
        };

        let mut shapes = Vec::new();
        for name in slides {
            let xml = read_entry(&mut archive, &name, DocumentFormat::Pptx)?;
            shapes.extend(collect_paragraphs(&xml, Some(b"sp"), DocumentFormat::Pptx)?);
        }

        Ok(shapes.join("\n"))
    }
}

/// Slide part names in `sldIdLst` order, or `None` when the archive lacks the parts.
fn presentation_order(archive: &mut Archive<'_>) -> Result<Option<Vec<String>>, ExtractionError> {
    if !has_part(archive, PRESENTATION_PART) || !has_part(archive, PRESENTATION_RELS) {
        return Ok(None);
    }

    let mut targets = HashMap::new();
    let rels = read_entry(archive, PRESENTATION_RELS, DocumentFormat::Pptx)?;
    for_each_element(&rels, b"Relationship", |e| {
        if let (Some(id), Some(target)) = (attribute(e, false, b"Id")?, attribute(e, false, b"Target")?) {
            targets.insert(id, target);
        }
        Ok(())
    })?;

    let mut ids = Vec::new();
    let presentation = read_entry(archive, PRESENTATION_PART, DocumentFormat::Pptx)?;
    for_each_element(&presentation, b"sldId", |e| {
        // `id` is the numeric slide id; the relationship id is the namespaced `r:id`.
        if let Some(rel_id) = attribute(e, true, b"id")? {
            ids.push(rel_id);
        }
        Ok(())
    })?;

    let order = ids
        .iter()
        .filter_map(|id| targets.get(id))
        .map(|target| resolve_target(target))
        .filter(|name| has_part(archive, name))
        .collect();
    Ok(Some(order))
}

fn has_part(archive: &Archive<'_>, name: &str) -> bool {
    archive.file_names().any(|n| n == name)
}

fn numbered_slides(archive: &Archive<'_>) -> Vec<String> {
    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = name
                .strip_prefix(SLIDE_PREFIX)?
                .strip_suffix(".xml")?
                .parse::<u32>()
                .ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    slides.sort_unstable_by_key(|(number, _)| *number);
    slides.into_iter().map(|(_, name)| name).collect()
}

/// Relationship targets are relative to `ppt/` unless they start with `/`.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{}", target),
    }
}

fn for_each_element(
    xml: &[u8],
    name: &[u8],
    mut visit: impl FnMut(&BytesStart<'_>) -> Result<(), ExtractionError>,
) -> Result<(), ExtractionError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| ExtractionError::parse(DocumentFormat::Pptx, e))?
        {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == name => visit(&e)?,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}

fn attribute(
    element: &BytesStart<'_>,
    prefixed: bool,
    name: &[u8],
) -> Result<Option<String>, ExtractionError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| ExtractionError::parse(DocumentFormat::Pptx, e))?;
        if attr.key.local_name().as_ref() == name && attr.key.prefix().is_some() == prefixed {
            let value = attr
                .unescape_value()
                .map_err(|e| ExtractionError::parse(DocumentFormat::Pptx, e))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
