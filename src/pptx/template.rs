//! Embedded baseline package.
//!
//! A minimal valid presentation with one master, one blank layout and no
//! slides. The parts are minified and embedded at compile time; at runtime
//! they are only ever copied, never mutated in place.
use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use xml_minifier::minified_xml;

use super::constants::part;
use super::error::{PptxError, Result};

/// Every member of the baseline package.
static BASELINE_PARTS: &[(&str, &str)] = &[
    (part::CONTENT_TYPES, minified_xml!("resources/[Content_Types].xml")),
    (part::PACKAGE_RELS, minified_xml!("resources/_rels/.rels")),
    (part::APP_PROPS, minified_xml!("resources/docProps/app.xml")),
    (part::CORE_PROPS, minified_xml!("resources/docProps/core.xml")),
    (part::PRESENTATION, minified_xml!("resources/ppt/presentation.xml")),
    (
        part::PRESENTATION_RELS,
        minified_xml!("resources/ppt/_rels/presentation.xml.rels"),
    ),
    ("ppt/presProps.xml", minified_xml!("resources/ppt/presProps.xml")),
    ("ppt/viewProps.xml", minified_xml!("resources/ppt/viewProps.xml")),
    ("ppt/tableStyles.xml", minified_xml!("resources/ppt/tableStyles.xml")),
    ("ppt/theme/theme1.xml", minified_xml!("resources/ppt/theme/theme1.xml")),
    (
        "ppt/slideMasters/slideMaster1.xml",
        minified_xml!("resources/ppt/slideMasters/slideMaster1.xml"),
    ),
    (
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        minified_xml!("resources/ppt/slideMasters/_rels/slideMaster1.xml.rels"),
    ),
    (
        part::SLIDE_LAYOUT,
        minified_xml!("resources/ppt/slideLayouts/slideLayout1.xml"),
    ),
    (
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        minified_xml!("resources/ppt/slideLayouts/_rels/slideLayout1.xml.rels"),
    ),
];

/// Parts the synthesizer rewrites or links to; all must be present.
const REQUIRED_PARTS: [&str; 7] = [
    part::CONTENT_TYPES,
    part::PACKAGE_RELS,
    part::PRESENTATION,
    part::PRESENTATION_RELS,
    part::APP_PROPS,
    part::CORE_PROPS,
    part::SLIDE_LAYOUT,
];

static BASELINE: Lazy<PartMap> = Lazy::new(|| {
    BASELINE_PARTS
        .iter()
        .map(|(name, xml)| (name.to_string(), xml.as_bytes().to_vec()))
        .collect()
});

/// Archive members keyed by name. Iteration is sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartMap {
    parts: BTreeMap<String, Vec<u8>>,
}

impl PartMap {
    pub fn insert(&mut self, name: impl Into<String>, blob: Vec<u8>) {
        self.parts.insert(name.into(), blob);
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    /// A part as UTF-8 text; missing or non-UTF-8 parts are template errors.
    pub fn text(&self, name: &str) -> Result<&str> {
        let blob = self
            .get(name)
            .ok_or_else(|| PptxError::template(name, "part is missing"))?;
        std::str::from_utf8(blob).map_err(|e| PptxError::template(name, e))
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.parts.iter().map(|(name, blob)| (name.as_str(), blob.as_slice()))
    }
}

impl FromIterator<(String, Vec<u8>)> for PartMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<u8>)>>(iter: I) -> Self {
        Self {
            parts: iter.into_iter().collect(),
        }
    }
}

/// A fresh copy of the baseline package.
pub fn baseline() -> Result<PartMap> {
    let parts = BASELINE.clone();
    if let Some(missing) = REQUIRED_PARTS.iter().find(|name| !parts.contains(name)) {
        return Err(PptxError::template(missing, "part is missing"));
    }
    Ok(parts)
}
