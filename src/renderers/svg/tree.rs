//! An in-memory XML element tree for SVG output.
//!
//! Builders assemble `SvgElement` values, mirroring the structure of the
//! document; serialization happens once at the end through quick-xml.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::SaveResult;

/// An XML element with insertion-ordered attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgElement {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<SvgElement>,
    text: Option<String>,
}

impl SvgElement {
    pub fn new(name: impl Into<String>) -> Self {
        SvgElement {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Adds an attribute. Attributes are written in insertion order.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.push((key.into(), value.into()));
    }

    pub fn append(&mut self, child: SvgElement) {
        self.children.push(child);
    }

    pub fn extend(&mut self, children: impl IntoIterator<Item = SvgElement>) {
        self.children.extend(children);
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[SvgElement] {
        &self.children
    }

    /// Serializes the element and its subtree as an SVG fragment.
    pub fn to_svg(&self) -> SaveResult<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_into(&mut writer)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }

    fn write_into(&self, writer: &mut Writer<Vec<u8>>) -> SaveResult<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attrs {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        if self.children.is_empty() && self.text.is_none() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        writer.write_event(Event::Start(start))?;
        if let Some(text) = &self.text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write_into(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}
