//! Content types, relationship types, namespaces and part names used by the
//! package synthesizer.

/// Content type identifiers.
pub mod content_type {
    pub const PML_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
}

/// Relationship type URIs.
pub mod relationship_type {
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
}

/// XML namespaces.
pub mod namespace {
    pub const A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
    pub const P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
    pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    pub const PKG_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships";
    pub const EXTENDED_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";
    pub const DOC_PROPS_VTYPES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";
    pub const DCTERMS: &str = "http://purl.org/dc/terms/";
    pub const DCMITYPE: &str = "http://purl.org/dc/dcmitype/";
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
}

/// Archive member names.
pub mod part {
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    pub const PACKAGE_RELS: &str = "_rels/.rels";
    pub const PRESENTATION: &str = "ppt/presentation.xml";
    pub const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";
    pub const APP_PROPS: &str = "docProps/app.xml";
    pub const CORE_PROPS: &str = "docProps/core.xml";
    pub const SLIDE_LAYOUT: &str = "ppt/slideLayouts/slideLayout1.xml";

    /// Member name of the 1-based slide `n`.
    pub fn slide(n: usize) -> String {
        format!("ppt/slides/slide{n}.xml")
    }

    /// Member name of the relationships of the 1-based slide `n`.
    pub fn slide_rels(n: usize) -> String {
        format!("ppt/slides/_rels/slide{n}.xml.rels")
    }

    /// Target of slide `n` relative to the presentation part.
    pub fn slide_target(n: usize) -> String {
        format!("slides/slide{n}.xml")
    }
}

/// First id of the presentation's slide id list.
pub const FIRST_SLIDE_ID: u32 = 256;

/// Title of the template theme, listed first in the extended properties.
pub const THEME_TITLE: &str = "Office Theme";

/// Application name recorded in the document properties.
pub const APPLICATION: &str = "bideck";
