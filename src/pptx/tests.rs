//! Package-level tests: produced archives are read back with `zip`.
use std::io::{Cursor, Read};

use chrono::{DateTime, Utc};
use zip::ZipArchive;

use super::*;
use crate::layout::{Column, ColumnCount, FitConfig, Side, Slide, fit};
use crate::markdown::{Block, Marker, ParseOptions, Parser, Run, RunStyle};

fn fixed_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-01-02T03:04:05Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn simple_slide(source: &str, target: &str) -> Slide {
    let parser = Parser::new(&ParseOptions::default()).unwrap();
    let (slide, _) = fit(parser.parse(source), parser.parse(target), &FitConfig::default());
    slide
}

fn deck(count: usize) -> Deck {
    let slides = (1..=count)
        .map(|n| simple_slide(&format!("Card {n}"), &format!("卡片 {n}")))
        .collect();
    Deck::new(slides).with_created(fixed_time())
}

fn open(bytes: Vec<u8>) -> ZipArchive<Cursor<Vec<u8>>> {
    ZipArchive::new(Cursor::new(bytes)).unwrap()
}

fn read(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
    let mut text = String::new();
    archive
        .by_name(name)
        .unwrap_or_else(|e| panic!("{name}: {e}"))
        .read_to_string(&mut text)
        .unwrap();
    text
}

#[test]
fn test_empty_deck_fails_without_creating_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("empty.pptx");

    let err = DeckWriter::write(&path, &Deck::new(Vec::new())).unwrap_err();
    assert!(matches!(err, PptxError::EmptyDeck));
    assert!(!path.exists());
    assert!(!dir.path().join("nested").exists());

    assert!(matches!(DeckWriter::to_bytes(&Deck::new(Vec::new())), Err(PptxError::EmptyDeck)));
}

#[test]
fn test_three_slides_have_matching_parts_and_relationships() {
    let mut archive = open(DeckWriter::to_bytes(&deck(3)).unwrap());
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();

    let slide_parts: Vec<_> = names
        .iter()
        .filter(|n| n.starts_with("ppt/slides/slide"))
        .collect();
    let slide_rels: Vec<_> = names
        .iter()
        .filter(|n| n.starts_with("ppt/slides/_rels/"))
        .collect();
    assert_eq!(slide_parts.len(), 3);
    assert_eq!(slide_rels.len(), 3);

    let rels = read(&mut archive, "ppt/_rels/presentation.xml.rels");
    assert_eq!(rels.matches(r#"/relationships/slide""#).count(), 3);
    for n in 1..=3 {
        assert!(rels.contains(&format!(r#"Target="slides/slide{n}.xml""#)));
    }

    let app = read(&mut archive, "docProps/app.xml");
    assert!(app.contains("<Slides>3</Slides>"));
    assert!(app.contains(r#"<vt:vector size="4" baseType="lpstr">"#));
    assert_eq!(app.matches("<vt:lpstr>").count() - 2, 4);

    let types = read(&mut archive, "[Content_Types].xml");
    assert_eq!(types.matches(constants::content_type::PML_SLIDE).count(), 3);
}

#[test]
fn test_slide_ids_reference_slide_relationships() {
    let mut archive = open(DeckWriter::to_bytes(&deck(2)).unwrap());
    let presentation = read(&mut archive, "ppt/presentation.xml");
    let rels = read(&mut archive, "ppt/_rels/presentation.xml.rels");

    // The baseline holds rId1..rId5, so slides start at rId6.
    assert!(presentation.contains(r#"<p:sldId id="256" r:id="rId6"/><p:sldId id="257" r:id="rId7"/>"#));
    assert!(rels.contains(r#"Id="rId6""#) && rels.contains(r#"Id="rId7""#));
    assert!(presentation.contains(r#"<p:sldSz cx="12191695" cy="6858000"/>"#));
    assert!(presentation.contains("<p:defaultTextStyle>"));
}

#[test]
fn test_entries_are_sorted_and_output_is_reproducible() {
    let first = DeckWriter::to_bytes(&deck(2)).unwrap();
    let second = DeckWriter::to_bytes(&deck(2)).unwrap();
    assert_eq!(first, second);

    let mut archive = open(first);
    let ordered: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    let mut sorted = ordered.clone();
    sorted.sort();
    assert_eq!(ordered, sorted);
    assert_eq!(ordered[0], "[Content_Types].xml");
}

#[test]
fn test_formula_runs_keep_delimiters_and_highlight() {
    let slide = simple_slide("Mass–energy: $E=mc^2$", "质能方程：$E=mc^2$");
    let mut archive = open(DeckWriter::to_bytes(&Deck::new(vec![slide])).unwrap());
    let xml = read(&mut archive, "ppt/slides/slide1.xml");

    assert_eq!(xml.matches("<a:t>$E=mc^2$</a:t>").count(), 2);
    assert_eq!(xml.matches(r#"<a:highlight><a:srgbClr val="FFF176"/></a:highlight>"#).count(), 2);
}

#[test]
fn test_control_characters_are_replaced_in_slide_text() {
    let slide = simple_slide("bell\u{8}char and \u{C}formfeed", "ok");
    let mut archive = open(DeckWriter::to_bytes(&Deck::new(vec![slide])).unwrap());
    let xml = read(&mut archive, "ppt/slides/slide1.xml");

    let restricted: Vec<u32> = xml
        .chars()
        .filter(|&c| (c < ' ' && !matches!(c, '\t' | '\n' | '\r')) || c == '\u{FFFE}' || c == '\u{FFFF}')
        .map(u32::from)
        .collect();
    assert!(restricted.is_empty(), "{restricted:?}");
    assert!(xml.contains("<a:t>bell\u{FFFD}char and \u{FFFD}formfeed</a:t>"));
}

#[test]
fn test_custom_palette_and_font_reach_slides() {
    let palette = StylePalette {
        formula: "#0000ff".into(),
        formula_highlight: "not-a-color".into(),
        ..StylePalette::default()
    };
    let deck = Deck::new(vec![simple_slide("$x$", "$y$")])
        .with_palette(palette)
        .with_font_family("Noto Sans CJK SC");
    let mut archive = open(DeckWriter::to_bytes(&deck).unwrap());
    let xml = read(&mut archive, "ppt/slides/slide1.xml");

    assert!(xml.contains(r#"<a:srgbClr val="0000FF"/>"#));
    assert!(xml.contains(r#"<a:highlight><a:srgbClr val="FFF176"/></a:highlight>"#));
    assert!(xml.contains(r#"<a:latin typeface="Noto Sans CJK SC"/><a:ea typeface="Noto Sans CJK SC"/>"#));
}

#[test]
fn test_truncated_slide_has_banner() {
    let notice = Block::new(Marker::Warn, vec![Run::new("[content truncated]", RunStyle::STRONG)]);
    let slide = Slide {
        font_size: 12,
        source_columns: ColumnCount::Double,
        target_columns: ColumnCount::Single,
        truncated: true,
        columns: [
            Column::new(Side::Source, vec![notice]),
            Column::new(Side::Target, Vec::new()),
        ],
    };
    let mut archive = open(DeckWriter::to_bytes(&Deck::new(vec![slide])).unwrap());
    let xml = read(&mut archive, "ppt/slides/slide1.xml");
    assert!(xml.contains("Truncation Badge"));
    assert!(xml.contains(r#"<a:bodyPr wrap="square" numCol="2""#));
    assert!(xml.contains("<a:t>▲ </a:t>"));
}

#[test]
fn test_core_properties_use_deck_time() {
    let mut archive = open(DeckWriter::to_bytes(&deck(1)).unwrap());
    let core = read(&mut archive, "docProps/core.xml");
    assert!(core.contains(r#"<dcterms:modified xsi:type="dcterms:W3CDTF">2025-01-02T03:04:05Z</dcterms:modified>"#));
}

#[test]
fn test_write_creates_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a").join("b").join("deck.pptx");
    DeckWriter::write(&path, &deck(1)).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], b"PK");
    let archive = open(bytes);
    assert!(archive.file_names().any(|n| n == "ppt/slides/slide1.xml"));
}

#[test]
fn test_unwritable_destination_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"x").unwrap();
    let path = blocker.join("deck.pptx");

    match DeckWriter::write(&path, &deck(1)) {
        Err(PptxError::Output { path: failed, .. }) => assert!(failed.starts_with(&blocker)),
        other => panic!("unexpected result: {other:?}"),
    }
}
