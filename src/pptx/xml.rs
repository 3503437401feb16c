//! Thin event writer for generated parts.
//!
//! Wraps `quick_xml::Writer` so every failure is reported against the part
//! being generated.
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::error::{PptxError, Result};
use crate::common::xml::escape_xml;

pub(crate) struct XmlWriter<'p> {
    part: &'p str,
    inner: Writer<Vec<u8>>,
}

impl<'p> XmlWriter<'p> {
    pub(crate) fn new(part: &'p str) -> Self {
        Self {
            part,
            inner: Writer::new(Vec::with_capacity(4096)),
        }
    }

    /// `<?xml version="1.0" encoding="UTF-8" standalone="yes"?>`
    pub(crate) fn declaration(&mut self) -> Result<()> {
        self.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
    }

    pub(crate) fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.event(Event::Start(element(name, attrs)))
    }

    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.event(Event::Empty(element(name, attrs)))
    }

    /// Self-closing element whose attributes are all integers.
    pub(crate) fn empty_num(&mut self, name: &str, attrs: &[(&str, i64)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        let mut buf = itoa::Buffer::new();
        for &(key, value) in attrs {
            start.push_attribute((key, buf.format(value)));
        }
        self.event(Event::Empty(start))
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    pub(crate) fn text(&mut self, text: &str) -> Result<()> {
        self.event(Event::Text(BytesText::from_escaped(escape_xml(text))))
    }

    /// `<name>text</name>`
    pub(crate) fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    /// `<name>n</name>`
    pub(crate) fn number_element(&mut self, name: &str, value: usize) -> Result<()> {
        let mut buf = itoa::Buffer::new();
        self.text_element(name, &[], buf.format(value))
    }

    /// Write an event as-is; used to pass template content through.
    pub(crate) fn event(&mut self, event: Event<'_>) -> Result<()> {
        let part = self.part;
        self.inner
            .write_event(event)
            .map_err(|e| PptxError::xml(part, e))
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

fn element<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for &attr in attrs {
        start.push_attribute(attr);
    }
    start
}
