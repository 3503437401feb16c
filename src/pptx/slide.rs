//! Per-slide XML: two text boxes and an optional truncation banner.
use crate::common::unit::{inches_to_emu, pt_to_centipoints};
use crate::layout::{Column, ColumnCount, Side, Slide, SlideGeometry};
use crate::markdown::{Block, Marker, Run};

use super::constants::namespace as ns;
use super::constants::relationship_type as rt;
use super::deck::DeckStyle;
use super::error::Result;
use super::xml::XmlWriter;

const SOURCE_SHAPE_ID: i64 = 2;
const TARGET_SHAPE_ID: i64 = 3;
const BANNER_SHAPE_ID: i64 = 4;

const BANNER_TEXT: &str = "【本页内容有截断】";
const BANNER_WIDTH: f64 = 3.2;
const BANNER_HEIGHT: f64 = 0.32;
const BANNER_FILL: &str = "FFF3CD";
const BANNER_LINE: &str = "DC2626";
const BANNER_LINE_WIDTH: i64 = 12_700;
const BANNER_TEXT_COLOR: &str = "B91C1C";
const BANNER_FONT_SIZE: u32 = 12;

/// Position and size of a shape in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

/// Source and target text box frames, left to right.
pub(crate) fn column_frames(geometry: &SlideGeometry) -> [Frame; 2] {
    let pad = inches_to_emu(geometry.padding);
    let gap = inches_to_emu(geometry.gap);
    let usable = inches_to_emu(geometry.width) - 2 * pad - gap;
    let left = (usable as f64 * geometry.left_ratio) as i64;
    let height = inches_to_emu(geometry.height) - 2 * pad;
    [
        Frame { x: pad, y: pad, cx: left.max(0), cy: height.max(0) },
        Frame {
            x: pad + left + gap,
            y: pad,
            cx: (usable - left).max(0),
            cy: height.max(0),
        },
    ]
}

/// The banner frame: centered horizontally, resting on the bottom padding.
pub(crate) fn banner_frame(geometry: &SlideGeometry) -> Frame {
    let cx = inches_to_emu(BANNER_WIDTH);
    let cy = inches_to_emu(BANNER_HEIGHT);
    Frame {
        x: (inches_to_emu(geometry.width) - cx) / 2,
        y: inches_to_emu(geometry.height) - inches_to_emu(geometry.padding) - cy,
        cx,
        cy,
    }
}

/// Renders `slide` as the content of member `part`.
pub(crate) fn slide_xml(part: &str, slide: &Slide, style: &DeckStyle) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new(part);
    xml.declaration()?;
    xml.start("p:sld", &[("xmlns:a", ns::A), ("xmlns:r", ns::R), ("xmlns:p", ns::P)])?;
    xml.start("p:cSld", &[])?;
    xml.start("p:spTree", &[])?;
    xml.start("p:nvGrpSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    xml.empty("p:cNvGrpSpPr", &[])?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvGrpSpPr")?;
    xml.empty("p:grpSpPr", &[])?;

    let [source_frame, target_frame] = column_frames(&style.geometry);
    let source = TextBox {
        id: SOURCE_SHAPE_ID,
        name: "TextBox Source",
        frame: source_frame,
        columns: slide.source_columns,
        lang: &style.source_lang,
    };
    let target = TextBox {
        id: TARGET_SHAPE_ID,
        name: "TextBox Target",
        frame: target_frame,
        columns: slide.target_columns,
        lang: &style.target_lang,
    };
    source.write(&mut xml, slide.column(Side::Source), slide.font_size, style)?;
    target.write(&mut xml, slide.column(Side::Target), slide.font_size, style)?;
    if slide.truncated {
        write_banner(&mut xml, banner_frame(&style.geometry), &style.target_lang)?;
    }

    xml.end("p:spTree")?;
    xml.end("p:cSld")?;
    xml.start("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.end("p:clrMapOvr")?;
    xml.end("p:sld")?;
    Ok(xml.finish())
}

/// Relationships of a slide: only its layout.
pub(crate) fn slide_rels_xml(part: &str) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new(part);
    xml.declaration()?;
    xml.start("Relationships", &[("xmlns", ns::PKG_RELATIONSHIPS)])?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", rt::SLIDE_LAYOUT),
            ("Target", "../slideLayouts/slideLayout1.xml"),
        ],
    )?;
    xml.end("Relationships")?;
    Ok(xml.finish())
}

struct TextBox<'a> {
    id: i64,
    name: &'a str,
    frame: Frame,
    columns: ColumnCount,
    lang: &'a str,
}

impl TextBox<'_> {
    fn write(&self, xml: &mut XmlWriter<'_>, column: &Column, font_size: u32, style: &DeckStyle) -> Result<()> {
        let mut id = itoa::Buffer::new();
        xml.start("p:sp", &[])?;
        xml.start("p:nvSpPr", &[])?;
        xml.empty("p:cNvPr", &[("id", id.format(self.id)), ("name", self.name)])?;
        xml.empty("p:cNvSpPr", &[("txBox", "1")])?;
        xml.empty("p:nvPr", &[])?;
        xml.end("p:nvSpPr")?;

        xml.start("p:spPr", &[])?;
        write_xfrm(xml, self.frame)?;
        write_geometry(xml, "rect")?;
        xml.empty("a:noFill", &[])?;
        xml.end("p:spPr")?;

        xml.start("p:txBody", &[])?;
        let mut num_col = itoa::Buffer::new();
        let mut spc_col = itoa::Buffer::new();
        let mut body_attrs = vec![("wrap", "square"), ("numCol", num_col.format(self.columns.get()))];
        if self.columns == ColumnCount::Double {
            body_attrs.push(("spcCol", spc_col.format(inches_to_emu(style.geometry.inner_gap()))));
        }
        xml.start("a:bodyPr", &body_attrs)?;
        xml.empty("a:spAutoFit", &[])?;
        xml.end("a:bodyPr")?;
        xml.empty("a:lstStyle", &[])?;

        if column.blocks.is_empty() {
            self.write_empty_paragraph(xml)?;
        }
        for block in &column.blocks {
            self.write_paragraph(xml, block, font_size, style)?;
        }

        xml.end("p:txBody")?;
        xml.end("p:sp")
    }

    fn write_paragraph(&self, xml: &mut XmlWriter<'_>, block: &Block, font_size: u32, style: &DeckStyle) -> Result<()> {
        xml.start("a:p", &[])?;
        let color = style.palette.text_color(block.marker);
        if let Some(glyph) = block.marker.display_glyph() {
            let glyph_style = SpanStyle {
                bold: block.marker != Marker::Dot,
                italic: false,
                color,
                highlight: None,
            };
            self.write_span(xml, glyph, &glyph_style, font_size, &style.font_family)?;
        }
        for run in &block.runs {
            if run.text.is_empty() {
                continue;
            }
            self.write_run(xml, run, color, font_size, style)?;
        }
        xml.empty("a:endParaRPr", &[("lang", self.lang)])?;
        xml.end("a:p")
    }

    fn write_empty_paragraph(&self, xml: &mut XmlWriter<'_>) -> Result<()> {
        xml.start("a:p", &[])?;
        xml.empty("a:endParaRPr", &[("lang", self.lang)])?;
        xml.end("a:p")
    }

    fn write_run(&self, xml: &mut XmlWriter<'_>, run: &Run, color: &str, font_size: u32, style: &DeckStyle) -> Result<()> {
        let span = if run.is_formula() {
            SpanStyle {
                bold: run.is_strong(),
                italic: run.is_light(),
                color: style.palette.formula.as_str(),
                highlight: Some(style.palette.formula_highlight.as_str()),
            }
        } else {
            SpanStyle {
                bold: run.is_strong(),
                italic: run.is_light(),
                color,
                highlight: None,
            }
        };
        if run.is_formula() {
            let wrapped = format!("${}$", run.text);
            self.write_span(xml, &wrapped, &span, font_size, &style.font_family)
        } else {
            self.write_span(xml, &run.text, &span, font_size, &style.font_family)
        }
    }

    fn write_span(&self, xml: &mut XmlWriter<'_>, text: &str, span: &SpanStyle<'_>, font_size: u32, typeface: &str) -> Result<()> {
        let mut sz = itoa::Buffer::new();
        let mut attrs = vec![("lang", self.lang), ("sz", sz.format(pt_to_centipoints(font_size)))];
        if span.bold {
            attrs.push(("b", "1"));
        }
        if span.italic {
            attrs.push(("i", "1"));
        }

        xml.start("a:r", &[])?;
        xml.start("a:rPr", &attrs)?;
        write_solid_fill(xml, span.color)?;
        if let Some(highlight) = span.highlight {
            xml.start("a:highlight", &[])?;
            xml.empty("a:srgbClr", &[("val", highlight)])?;
            xml.end("a:highlight")?;
        }
        xml.empty("a:latin", &[("typeface", typeface)])?;
        xml.empty("a:ea", &[("typeface", typeface)])?;
        xml.end("a:rPr")?;
        xml.text_element("a:t", &[], text)?;
        xml.end("a:r")
    }
}

struct SpanStyle<'a> {
    bold: bool,
    italic: bool,
    color: &'a str,
    highlight: Option<&'a str>,
}

fn write_banner(xml: &mut XmlWriter<'_>, frame: Frame, lang: &str) -> Result<()> {
    let mut id = itoa::Buffer::new();
    xml.start("p:sp", &[])?;
    xml.start("p:nvSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", id.format(BANNER_SHAPE_ID)), ("name", "Truncation Badge")])?;
    xml.empty("p:cNvSpPr", &[("txBox", "1")])?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvSpPr")?;

    xml.start("p:spPr", &[])?;
    write_xfrm(xml, frame)?;
    write_geometry(xml, "roundRect")?;
    write_solid_fill(xml, BANNER_FILL)?;
    let mut width = itoa::Buffer::new();
    xml.start("a:ln", &[("w", width.format(BANNER_LINE_WIDTH))])?;
    write_solid_fill(xml, BANNER_LINE)?;
    xml.end("a:ln")?;
    xml.end("p:spPr")?;

    xml.start("p:txBody", &[])?;
    xml.empty("a:bodyPr", &[("wrap", "square")])?;
    xml.empty("a:lstStyle", &[])?;
    xml.start("a:p", &[])?;
    xml.empty("a:pPr", &[("algn", "ctr")])?;
    xml.start("a:r", &[])?;
    let mut sz = itoa::Buffer::new();
    xml.start(
        "a:rPr",
        &[("lang", lang), ("sz", sz.format(pt_to_centipoints(BANNER_FONT_SIZE))), ("b", "1")],
    )?;
    write_solid_fill(xml, BANNER_TEXT_COLOR)?;
    xml.end("a:rPr")?;
    xml.text_element("a:t", &[], BANNER_TEXT)?;
    xml.end("a:r")?;
    xml.empty("a:endParaRPr", &[("lang", lang)])?;
    xml.end("a:p")?;
    xml.end("p:txBody")?;
    xml.end("p:sp")
}

fn write_xfrm(xml: &mut XmlWriter<'_>, frame: Frame) -> Result<()> {
    xml.start("a:xfrm", &[])?;
    xml.empty_num("a:off", &[("x", frame.x), ("y", frame.y)])?;
    xml.empty_num("a:ext", &[("cx", frame.cx), ("cy", frame.cy)])?;
    xml.end("a:xfrm")
}

fn write_geometry(xml: &mut XmlWriter<'_>, preset: &str) -> Result<()> {
    xml.start("a:prstGeom", &[("prst", preset)])?;
    xml.empty("a:avLst", &[])?;
    xml.end("a:prstGeom")
}

fn write_solid_fill(xml: &mut XmlWriter<'_>, color: &str) -> Result<()> {
    xml.start("a:solidFill", &[])?;
    xml.empty("a:srgbClr", &[("val", color)])?;
    xml.end("a:solidFill")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::RunStyle;
    use crate::pptx::Deck;

    fn slide(source: Vec<Block>, target: Vec<Block>) -> Slide {
        Slide {
            font_size: 20,
            source_columns: ColumnCount::Single,
            target_columns: ColumnCount::Double,
            truncated: false,
            columns: [Column::new(Side::Source, source), Column::new(Side::Target, target)],
        }
    }

    fn render(slide: &Slide) -> String {
        let style = Deck::new(Vec::new()).style();
        String::from_utf8(slide_xml("ppt/slides/slide1.xml", slide, &style).unwrap()).unwrap()
    }

    #[test]
    fn test_default_frames() {
        let [source, target] = column_frames(&SlideGeometry::default());
        // 0.3in padding, 0.2in gap, 13.333in wide
        assert_eq!(source.x, 274_320);
        assert_eq!(source.y, 274_320);
        assert_eq!(source.cy, 6_858_000 - 2 * 274_320);
        assert_eq!(target.x, source.x + source.cx + 182_880);
        assert_eq!(source.cx + target.cx, 12_191_695 - 2 * 274_320 - 182_880);
    }

    #[test]
    fn test_banner_is_centered_at_bottom() {
        let geometry = SlideGeometry::default();
        let frame = banner_frame(&geometry);
        let width = inches_to_emu(geometry.width);
        assert_eq!(frame.x * 2 + frame.cx, width - (width - frame.cx) % 2);
        assert_eq!(frame.y + frame.cy, 6_858_000 - 274_320);
    }

    #[test]
    fn test_formula_run_is_wrapped_and_highlighted() {
        let block = Block::new(Marker::None, vec![
            Run::plain("area "),
            Run::new("a<b", RunStyle::FORMULA),
        ]);
        let out = render(&slide(vec![block], Vec::new()));
        assert!(out.contains("<a:t>$a&lt;b$</a:t>"));
        assert!(out.contains(r#"<a:highlight><a:srgbClr val="FFF176"/></a:highlight>"#));
        assert!(out.contains(r#"<a:srgbClr val="111827"/>"#));
    }

    #[test]
    fn test_marker_glyph_run() {
        let star = Block::new(Marker::Star, vec![Run::plain("key")]);
        let dot = Block::new(Marker::Dot, vec![Run::plain("point")]);
        let out = render(&slide(vec![star], vec![dot]));
        assert!(out.contains(r#"<a:rPr lang="en-US" sz="2000" b="1"><a:solidFill><a:srgbClr val="8A6D1D"/></a:solidFill>"#));
        assert!(out.contains("<a:t>★ </a:t>"));
        // The dot glyph is not bold.
        assert!(out.contains(r#"<a:rPr lang="zh-CN" sz="2000"><a:solidFill><a:srgbClr val="1F2937"/></a:solidFill>"#));
        assert!(out.contains("<a:t>● </a:t>"));
    }

    #[test]
    fn test_empty_runs_still_emit_paragraph() {
        let out = render(&slide(vec![Block::new(Marker::None, vec![Run::plain("")])], Vec::new()));
        assert!(out.contains(r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#));
        // The empty target column also gets one empty paragraph.
        assert!(out.contains(r#"<a:p><a:endParaRPr lang="zh-CN"/></a:p>"#));
    }

    #[test]
    fn test_column_counts_and_shape_names() {
        let out = render(&slide(Vec::new(), Vec::new()));
        assert!(out.contains(r#"<p:cNvPr id="2" name="TextBox Source"/>"#));
        assert!(out.contains(r#"<p:cNvPr id="3" name="TextBox Target"/>"#));
        assert!(out.contains(r#"<a:bodyPr wrap="square" numCol="1">"#));
        assert!(out.contains(r#"<a:bodyPr wrap="square" numCol="2" spcCol="91440">"#));
        assert!(!out.contains("Truncation Badge"));
    }

    #[test]
    fn test_banner_only_when_truncated() {
        let mut truncated = slide(Vec::new(), Vec::new());
        truncated.truncated = true;
        let out = render(&truncated);
        assert!(out.contains(r#"name="Truncation Badge""#));
        assert!(out.contains(r#"prst="roundRect""#));
        assert!(out.contains(BANNER_TEXT));
    }

    #[test]
    fn test_slide_rels_point_at_layout() {
        let out = String::from_utf8(slide_rels_xml("ppt/slides/_rels/slide1.xml.rels").unwrap()).unwrap();
        assert!(out.contains(r#"Target="../slideLayouts/slideLayout1.xml""#));
        assert!(out.contains(rt::SLIDE_LAYOUT));
    }
}
