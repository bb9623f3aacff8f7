//! Element writer for the package's XML parts.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::Result;
use crate::error::DocumentError;

/// Writes one XML part through quick-xml.
///
/// Every `start_element` must be closed by a matching `end_element`; a
/// mismatched close or an element left open at [`XmlWriter::finish`] is an
/// error. Text and attribute values are escaped by quick-xml.
pub(crate) struct XmlWriter {
    writer: Writer<Vec<u8>>,
    open: Vec<String>,
}

impl XmlWriter {
    /// New part, starting with the standalone UTF-8 declaration.
    pub fn new() -> Result<Self> {
        let mut w = Self {
            writer: Writer::new(Vec::new()),
            open: Vec::new(),
        };
        w.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(w)
    }

    pub fn start_element(&mut self, name: &str) -> Result<()> {
        self.start_element_with_attrs(name, &[])
    }

    pub fn start_element_with_attrs(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Start(start))?;
        self.open.push(name.to_string());
        Ok(())
    }

    pub fn end_element(&mut self, name: &str) -> Result<()> {
        match self.open.pop() {
            Some(open) if open == name => self.event(Event::End(BytesEnd::new(name))),
            Some(open) => Err(DocumentError::Xml(format!("</{name}> closes <{open}>"))),
            None => Err(DocumentError::Xml(format!("</{name}> has no open element"))),
        }
    }

    pub fn empty_element(&mut self, name: &str) -> Result<()> {
        self.empty_element_with_attrs(name, &[])
    }

    pub fn empty_element_with_attrs(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Empty(element))
    }

    /// `<name w:val="value"/>`, the commonest WordprocessingML property.
    pub fn val_element(&mut self, name: &str, value: &str) -> Result<()> {
        self.empty_element_with_attrs(name, &[("w:val", value)])
    }

    pub fn text_element_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<()> {
        self.start_element_with_attrs(name, attrs)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end_element(name)
    }

    /// The finished part.
    pub fn finish(self) -> Result<Vec<u8>> {
        if let Some(open) = self.open.last() {
            return Err(DocumentError::Xml(format!("<{open}> is never closed")));
        }
        Ok(self.writer.into_inner())
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| DocumentError::Xml(e.to_string()))
    }
}
