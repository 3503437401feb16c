//! Rewrites of the shared package parts for a given slide count.
//!
//! The template's parts are streamed through a reader/writer pair: events
//! describing existing slides are dropped, new ones are inserted at fixed
//! anchors, and everything else is copied through unchanged. The document
//! properties are generated from scratch.
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::common::unit::inches_to_emu;
use crate::layout::SlideGeometry;

use super::constants::content_type as ct;
use super::constants::namespace as ns;
use super::constants::relationship_type as rt;
use super::constants::{APPLICATION, FIRST_SLIDE_ID, THEME_TITLE, part};
use super::deck::Deck;
use super::error::{PptxError, Result};
use super::slide::{slide_rels_xml, slide_xml};
use super::template::{self, PartMap};
use super::xml::XmlWriter;

/// Builds every archive member for `deck`.
pub(crate) fn build_parts(deck: &Deck) -> Result<PartMap> {
    if deck.is_empty() {
        return Err(PptxError::EmptyDeck);
    }
    let style = deck.style();
    let count = deck.slides.len();
    let mut parts = template::baseline()?;

    let content_types = rewrite_content_types(parts.text(part::CONTENT_TYPES)?, count)?;
    let (rels, offset) = rewrite_presentation_rels(parts.text(part::PRESENTATION_RELS)?, count)?;
    let presentation = rewrite_presentation(
        parts.text(part::PRESENTATION)?,
        count,
        offset,
        &style.geometry,
    )?;
    debug!(slides = count, rel_offset = offset, "rewrote shared parts");

    parts.insert(part::CONTENT_TYPES, content_types);
    parts.insert(part::PRESENTATION_RELS, rels);
    parts.insert(part::PRESENTATION, presentation);
    parts.insert(part::APP_PROPS, app_props_xml(count)?);
    parts.insert(part::CORE_PROPS, core_props_xml(deck.created)?);

    for (index, slide) in deck.slides.iter().enumerate() {
        let n = index + 1;
        let name = part::slide(n);
        let rels_name = part::slide_rels(n);
        let xml = slide_xml(&name, slide, &style)?;
        let rels = slide_rels_xml(&rels_name)?;
        parts.insert(name, xml);
        parts.insert(rels_name, rels);
    }
    Ok(parts)
}

/// Drops slide overrides and appends one per slide before `</Types>`.
pub(crate) fn rewrite_content_types(xml: &str, slide_count: usize) -> Result<Vec<u8>> {
    let name = part::CONTENT_TYPES;
    let mut reader = Reader::from_str(xml);
    let mut out = XmlWriter::new(name);
    let mut closed = false;

    loop {
        match reader.read_event().map_err(|e| PptxError::template(name, e))? {
            Event::Eof => break,
            Event::Empty(e) if e.local_name().as_ref() == b"Override" => {
                if !attr_is(&e, "ContentType", ct::PML_SLIDE, name)? {
                    out.event(Event::Empty(e))?;
                }
            },
            Event::End(e) if e.local_name().as_ref() == b"Types" => {
                for n in 1..=slide_count {
                    let part_name = format!("/{}", part::slide(n));
                    out.empty("Override", &[("PartName", &part_name), ("ContentType", ct::PML_SLIDE)])?;
                }
                out.event(Event::End(e))?;
                closed = true;
            },
            event => out.event(event)?,
        }
    }

    if !closed {
        return Err(PptxError::template(name, "no </Types> to insert slide overrides before"));
    }
    Ok(out.finish())
}

/// Drops slide relationships and appends one per slide before
/// `</Relationships>`.
///
/// Returns the part and the offset the new ids were numbered from: the
/// highest numeric `rIdN` among the retained relationships.
pub(crate) fn rewrite_presentation_rels(xml: &str, slide_count: usize) -> Result<(Vec<u8>, usize)> {
    let name = part::PRESENTATION_RELS;
    let mut reader = Reader::from_str(xml);
    let mut out = XmlWriter::new(name);
    let mut offset = 0;
    let mut closed = false;

    loop {
        match reader.read_event().map_err(|e| PptxError::template(name, e))? {
            Event::Eof => break,
            Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if attr_is(&e, "Type", rt::SLIDE, name)? {
                    continue;
                }
                if let Some(id) = relationship_number(&e, name)? {
                    offset = offset.max(id);
                }
                out.event(Event::Empty(e))?;
            },
            Event::End(e) if e.local_name().as_ref() == b"Relationships" => {
                for n in 1..=slide_count {
                    let id = format!("rId{}", offset + n);
                    let target = part::slide_target(n);
                    out.empty("Relationship", &[("Id", &id), ("Type", rt::SLIDE), ("Target", &target)])?;
                }
                out.event(Event::End(e))?;
                closed = true;
            },
            event => out.event(event)?,
        }
    }

    if !closed {
        return Err(PptxError::template(name, "no </Relationships> to insert slide relationships before"));
    }
    Ok((out.finish(), offset))
}

/// Replaces the slide id list and the canvas size.
///
/// The new `sldIdLst` goes directly before `sldSz`, which is where the
/// schema orders it; slide `n` links to `rId{offset + n}`.
pub(crate) fn rewrite_presentation(
    xml: &str,
    slide_count: usize,
    offset: usize,
    geometry: &SlideGeometry,
) -> Result<Vec<u8>> {
    let name = part::PRESENTATION;
    let mut reader = Reader::from_str(xml);
    let mut out = XmlWriter::new(name);
    let mut sized = false;

    loop {
        match reader.read_event().map_err(|e| PptxError::template(name, e))? {
            Event::Eof => break,
            Event::Start(e) if e.local_name().as_ref() == b"sldIdLst" => {
                reader
                    .read_to_end(e.name())
                    .map_err(|err| PptxError::template(name, err))?;
            },
            Event::Empty(e) if e.local_name().as_ref() == b"sldIdLst" => {},
            Event::Start(e) if e.local_name().as_ref() == b"sldSz" => {
                reader
                    .read_to_end(e.name())
                    .map_err(|err| PptxError::template(name, err))?;
                write_slide_list(&mut out, &e, slide_count, offset, geometry)?;
                sized = true;
            },
            Event::Empty(e) if e.local_name().as_ref() == b"sldSz" => {
                write_slide_list(&mut out, &e, slide_count, offset, geometry)?;
                sized = true;
            },
            event => out.event(event)?,
        }
    }

    if !sized {
        return Err(PptxError::template(name, "no sldSz element to anchor the slide list"));
    }
    Ok(out.finish())
}

/// Writes `sldIdLst` followed by a replacement for the `sldSz` element `size`.
fn write_slide_list(
    out: &mut XmlWriter<'_>,
    size: &BytesStart<'_>,
    slide_count: usize,
    offset: usize,
    geometry: &SlideGeometry,
) -> Result<()> {
    let prefix = match size.name().prefix() {
        Some(prefix) => format!("{}:", String::from_utf8_lossy(prefix.as_ref())),
        None => String::new(),
    };

    if slide_count > 0 {
        let list = format!("{prefix}sldIdLst");
        let item = format!("{prefix}sldId");
        out.start(&list, &[])?;
        let mut id = itoa::Buffer::new();
        for n in 1..=slide_count {
            let rel = format!("rId{}", offset + n);
            out.empty(&item, &[("id", id.format(FIRST_SLIDE_ID as usize + n - 1)), ("r:id", &rel)])?;
        }
        out.end(&list)?;
    }

    out.empty_num(
        &format!("{prefix}sldSz"),
        &[
            ("cx", inches_to_emu(geometry.width)),
            ("cy", inches_to_emu(geometry.height)),
        ],
    )
}

/// Extended properties with consistent slide and title counts.
pub(crate) fn app_props_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new(part::APP_PROPS);
    let mut buf = itoa::Buffer::new();
    xml.declaration()?;
    xml.start(
        "Properties",
        &[("xmlns", ns::EXTENDED_PROPERTIES), ("xmlns:vt", ns::DOC_PROPS_VTYPES)],
    )?;
    xml.number_element("TotalTime", 0)?;
    xml.number_element("Words", 0)?;
    xml.text_element("Application", &[], APPLICATION)?;
    xml.text_element("PresentationFormat", &[], "Custom")?;
    xml.number_element("Paragraphs", 0)?;
    xml.number_element("Slides", slide_count)?;
    xml.number_element("Notes", 0)?;
    xml.number_element("HiddenSlides", 0)?;
    xml.number_element("MMClips", 0)?;
    xml.text_element("ScaleCrop", &[], "false")?;

    xml.start("HeadingPairs", &[])?;
    xml.start("vt:vector", &[("size", "4"), ("baseType", "variant")])?;
    for (heading, count) in [("Theme", 1), ("Slide Titles", slide_count)] {
        xml.start("vt:variant", &[])?;
        xml.text_element("vt:lpstr", &[], heading)?;
        xml.end("vt:variant")?;
        xml.start("vt:variant", &[])?;
        xml.text_element("vt:i4", &[], buf.format(count))?;
        xml.end("vt:variant")?;
    }
    xml.end("vt:vector")?;
    xml.end("HeadingPairs")?;

    xml.start("TitlesOfParts", &[])?;
    xml.start("vt:vector", &[("size", buf.format(slide_count + 1)), ("baseType", "lpstr")])?;
    xml.text_element("vt:lpstr", &[], THEME_TITLE)?;
    for n in 1..=slide_count {
        xml.text_element("vt:lpstr", &[], &format!("Slide {n}"))?;
    }
    xml.end("vt:vector")?;
    xml.end("TitlesOfParts")?;

    xml.text_element("LinksUpToDate", &[], "false")?;
    xml.text_element("SharedDoc", &[], "false")?;
    xml.text_element("HyperlinksChanged", &[], "false")?;
    xml.text_element("AppVersion", &[], "16.0000")?;
    xml.end("Properties")?;
    Ok(xml.finish())
}

/// Core properties stamped with `created` as both creation and modification time.
pub(crate) fn core_props_xml(created: DateTime<Utc>) -> Result<Vec<u8>> {
    let stamp = created.format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let mut xml = XmlWriter::new(part::CORE_PROPS);
    xml.declaration()?;
    xml.start(
        "cp:coreProperties",
        &[
            ("xmlns:cp", ns::CORE_PROPERTIES),
            ("xmlns:dc", ns::DC),
            ("xmlns:dcterms", ns::DCTERMS),
            ("xmlns:dcmitype", ns::DCMITYPE),
            ("xmlns:xsi", ns::XSI),
        ],
    )?;
    xml.text_element("dc:title", &[], APPLICATION)?;
    xml.text_element("dc:creator", &[], APPLICATION)?;
    xml.text_element("cp:lastModifiedBy", &[], APPLICATION)?;
    xml.text_element("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &stamp)?;
    xml.text_element("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")], &stamp)?;
    xml.end("cp:coreProperties")?;
    Ok(xml.finish())
}

fn attr_is(e: &BytesStart<'_>, key: &str, expected: &str, part: &str) -> Result<bool> {
    let attr = e
        .try_get_attribute(key)
        .map_err(|err| PptxError::template(part, err))?;
    Ok(attr.is_some_and(|attr| attr.value.as_ref() == expected.as_bytes()))
}

/// The `N` of an `Id="rIdN"` attribute, if it has that shape.
fn relationship_number(e: &BytesStart<'_>, part: &str) -> Result<Option<usize>> {
    let Some(attr) = e
        .try_get_attribute("Id")
        .map_err(|err| PptxError::template(part, err))?
    else {
        return Ok(None);
    };
    Ok(std::str::from_utf8(&attr.value)
        .ok()
        .and_then(|id| id.strip_prefix("rId"))
        .and_then(|n| n.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELS: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#,
        r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide9.xml"/>"#,
        r#"<Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="theme/theme1.xml"/>"#,
        r#"</Relationships>"#,
    );

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_rels_offset_follows_highest_retained_id() {
        let (xml, offset) = rewrite_presentation_rels(RELS, 2).unwrap();
        let xml = text(xml);
        assert_eq!(offset, 7);
        assert!(!xml.contains("slide9.xml"));
        assert!(xml.contains(r#"<Relationship Id="rId8" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/>"#));
        assert!(xml.contains(r#"Id="rId9""#));
        assert!(xml.ends_with("</Relationships>"));
    }

    #[test]
    fn test_content_types_replaces_slide_overrides() {
        let input = concat!(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            r#"<Override PartName="/ppt/slides/slide5.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
            r#"</Types>"#,
        );
        let xml = text(rewrite_content_types(input, 3).unwrap());
        assert!(!xml.contains("slide5.xml"));
        assert_eq!(xml.matches(ct::PML_SLIDE).count(), 3);
        assert!(xml.contains(r#"<Override PartName="/ppt/slides/slide3.xml""#));
        assert!(xml.contains(r#"<Default Extension="xml" ContentType="application/xml"/>"#));
    }

    #[test]
    fn test_presentation_slide_list_and_size() {
        let input = concat!(
            r#"<p:presentation xmlns:p="p" xmlns:r="r">"#,
            r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#,
            r#"<p:sldIdLst><p:sldId id="300" r:id="rId9"/></p:sldIdLst>"#,
            r#"<p:sldSz cx="1" cy="2" type="screen4x3"/>"#,
            r#"<p:notesSz cx="6858000" cy="9144000"/>"#,
            r#"</p:presentation>"#,
        );
        let xml = text(rewrite_presentation(input, 2, 5, &SlideGeometry::default()).unwrap());
        assert!(!xml.contains(r#"id="300""#));
        assert!(xml.contains(concat!(
            r#"</p:sldMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="rId6"/>"#,
            r#"<p:sldId id="257" r:id="rId7"/></p:sldIdLst><p:sldSz cx="12191695" cy="6858000"/>"#,
            r#"<p:notesSz"#,
        )));
    }

    #[test]
    fn test_presentation_without_size_is_a_template_error() {
        let err = rewrite_presentation("<p:presentation xmlns:p=\"p\"/>", 1, 5, &SlideGeometry::default())
            .unwrap_err();
        assert!(matches!(err, PptxError::Template { ref part, .. } if part == "ppt/presentation.xml"));
    }

    #[test]
    fn test_malformed_rels_is_a_template_error() {
        let err = rewrite_presentation_rels("<Relationships><Relationship></Relationships>", 1).unwrap_err();
        assert!(matches!(err, PptxError::Template { .. }));
    }

    #[test]
    fn test_app_props_counts_agree() {
        let xml = text(app_props_xml(3).unwrap());
        assert!(xml.contains("<Slides>3</Slides>"));
        assert!(xml.contains(r#"<vt:vector size="4" baseType="lpstr">"#));
        assert!(xml.contains("<vt:lpstr>Slide Titles</vt:lpstr></vt:variant><vt:variant><vt:i4>3</vt:i4>"));
        assert_eq!(xml.matches("<vt:lpstr>Slide ").count(), 4);
        assert!(xml.contains("<vt:lpstr>Office Theme</vt:lpstr>"));
    }

    #[test]
    fn test_core_props_timestamp() {
        let created = DateTime::parse_from_rfc3339("2024-05-06T07:08:09Z")
            .unwrap()
            .with_timezone(&Utc);
        let xml = text(core_props_xml(created).unwrap());
        assert_eq!(xml.matches("2024-05-06T07:08:09Z").count(), 2);
        assert!(xml.contains(r#"<dcterms:created xsi:type="dcterms:W3CDTF">"#));
    }
}
