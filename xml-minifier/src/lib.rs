//! Compile-time XML minification for embedded package parts.
//!
//! Template parts are authored as indented, commented XML files next to the
//! code that embeds them. The macro here reads and minifies them while the
//! crate compiles, so a malformed template part is a build failure rather
//! than a runtime one.

use proc_macro::{TokenStream, TokenTree};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use quote::quote;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads an XML file at compile time, minifies it and embeds it as a `&'static str`.
///
/// The path is resolved relative to the source file invoking the macro, so
/// `minified_xml!("resources/presentation.xml")` inside `src/pptx/template.rs`
/// reads `src/pptx/resources/presentation.xml`.
#[proc_macro]
pub fn minified_xml(input: TokenStream) -> TokenStream {
    let relative = literal_argument(input);
    let path = resolve_relative_to_call_site(&relative);

    let xml = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read XML file '{}': {}", path.display(), e));
    let minified = minify_xml(&xml)
        .unwrap_or_else(|e| panic!("Failed to minify XML from '{}': {}", relative, e));

    // Keep the file tracked so edits to the part trigger a rebuild.
    let tracked = path.to_string_lossy().into_owned();
    TokenStream::from(quote! {
        {
            const _: &[u8] = include_bytes!(#tracked);
            #minified
        }
    })
}

fn resolve_relative_to_call_site(relative: &str) -> PathBuf {
    let source_file = proc_macro::Span::call_site()
        .local_file()
        .expect("Failed to get local file of macro call site");
    let target = source_file
        .parent()
        .expect("Failed to get parent directory of calling file")
        .join(Path::new(relative));
    target
        .canonicalize()
        .unwrap_or_else(|e| panic!("Failed to canonicalize file path '{}': {}", relative, e))
}

/// Extracts the value of the single string literal passed to a macro.
fn literal_argument(input: TokenStream) -> String {
    let mut tokens = input.into_iter();
    let (Some(TokenTree::Literal(literal)), None) = (tokens.next(), tokens.next()) else {
        panic!("Expected exactly one string literal");
    };
    unquote(&literal.to_string())
}

/// Strips the quotes of a `"..."` or `r#"..."#` literal and unescapes the former.
fn unquote(literal: &str) -> String {
    let start = literal.find('"').map(|i| i + 1);
    let end = literal.rfind('"');
    let body = match (start, end) {
        (Some(start), Some(end)) if start <= end => &literal[start..end],
        _ => panic!("Invalid string literal"),
    };

    if literal.starts_with('r') {
        return body.to_string();
    }
    body.replace("\\\"", "\"")
        .replace("\\n", "\n")
        .replace("\\r", "\r")
        .replace("\\t", "\t")
        .replace("\\\\", "\\")
}

/// Minifies XML: drops comments, processing instructions and whitespace-only
/// text, trims text at element boundaries, and collapses `<tag></tag>` into
/// `<tag/>`.
///
/// Text and entity references between two tags are collected first and
/// trimmed as one run, so `a &amp; b` keeps its inner spaces. At most one
/// start tag is held back at a time (the innermost one), which is the only
/// tag that can still collapse when its end tag arrives.
fn minify_xml(xml: &str) -> Result<String, Box<dyn std::error::Error>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut out = Minified::with_capacity(xml.len() / 2);
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Comment(_) | Event::PI(_) => {},
            Event::Text(e) => out.text.extend_from_slice(e.as_ref()),
            Event::GeneralRef(e) => {
                out.text.push(b'&');
                out.text.extend_from_slice(e.as_ref());
                out.text.push(b';');
            },
            Event::Decl(e) => {
                out.flush_text()?;
                out.flush_pending()?;
                out.raw(b"<?");
                out.raw(e.as_ref());
                out.raw(b"?>");
            },
            Event::DocType(e) => {
                out.flush_text()?;
                out.flush_pending()?;
                out.raw(b"<!DOCTYPE ");
                out.raw(e.as_ref());
                out.raw(b">");
            },
            Event::Start(e) => {
                out.flush_text()?;
                out.flush_pending()?;
                out.pending = Some(e.into_owned());
            },
            Event::Empty(e) => {
                out.flush_text()?;
                out.flush_pending()?;
                out.tag(&e, b"/>")?;
            },
            Event::End(e) => {
                out.flush_text()?;
                match out.pending.take() {
                    Some(start) if start.name() == e.name() => out.tag(&start, b"/>")?,
                    pending => {
                        if let Some(start) = pending {
                            out.tag(&start, b">")?;
                        }
                        out.raw(b"</");
                        out.raw(e.name().as_ref());
                        out.raw(b">");
                    },
                }
            },
            Event::CData(e) => {
                out.flush_text()?;
                out.flush_pending()?;
                out.raw(b"<![CDATA[");
                out.raw(e.as_ref());
                out.raw(b"]]>");
            },
        }
    }
    out.flush_text()?;
    out.flush_pending()?;

    Ok(String::from_utf8(out.bytes)?)
}

struct Minified {
    bytes: Vec<u8>,
    pending: Option<BytesStart<'static>>,
    /// Text collected since the last tag
    text: Vec<u8>,
}

impl Minified {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            pending: None,
            text: Vec::new(),
        }
    }

    fn raw(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Writes the collected text, trimmed; whitespace-only text is dropped.
    fn flush_text(&mut self) -> Result<(), quick_xml::Error> {
        let text = std::mem::take(&mut self.text);
        let trimmed = trim_whitespace(&text);
        if !trimmed.is_empty() {
            self.flush_pending()?;
            self.raw(trimmed);
        }
        Ok(())
    }

    fn flush_pending(&mut self) -> Result<(), quick_xml::Error> {
        match self.pending.take() {
            Some(start) => self.tag(&start, b">"),
            None => Ok(()),
        }
    }

    fn tag(&mut self, tag: &BytesStart, close: &[u8]) -> Result<(), quick_xml::Error> {
        self.raw(b"<");
        self.raw(tag.name().as_ref());
        for attr in tag.attributes() {
            let attr = attr?;
            self.raw(b" ");
            self.raw(attr.key.as_ref());
            self.raw(b"=\"");
            self.raw(&attr.value);
            self.raw(b"\"");
        }
        self.raw(close);
        Ok(())
    }
}

#[inline]
fn trim_whitespace(bytes: &[u8]) -> &[u8] {
    let is_space = |b: &u8| matches!(b, b' ' | b'\t' | b'\n' | b'\r');
    let Some(start) = bytes.iter().position(|b| !is_space(b)) else {
        return &[];
    };
    let end = bytes.iter().rposition(|b| !is_space(b)).map_or(start, |p| p + 1);
    &bytes[start..end]
}
