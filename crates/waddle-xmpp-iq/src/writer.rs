//! Namespace-aware XML writer for IQ stanzas.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::parser::ns;
use crate::{Attr, CodecError, QName};

/// Serializer that tracks the default namespace in scope.
///
/// An `xmlns` declaration is written only when an element's namespace differs
/// from its parent's, so re-encoded stanzas stay as compact as the usual
/// hand-written XMPP.
pub struct XmlWriter {
    inner: Writer<Vec<u8>>,
    root_ns: String,
    open: Vec<QName>,
}

impl XmlWriter {
    /// Create a writer with no namespace in scope.
    pub fn new() -> Self {
        Self::with_default_namespace("")
    }

    /// Create a writer that assumes `ns` is already the default namespace,
    /// e.g. `jabber:client` for stanzas written into a client stream.
    pub fn with_default_namespace(ns: impl Into<String>) -> Self {
        Self {
            inner: Writer::new(Vec::new()),
            root_ns: ns.into(),
            open: Vec::new(),
        }
    }

    /// The default namespace at the current position.
    pub fn default_namespace(&self) -> &str {
        self.open
            .last()
            .map(|name| name.ns.as_str())
            .unwrap_or(&self.root_ns)
    }

    /// Write a start tag.
    pub fn start(&mut self, name: &QName, attrs: &[Attr]) -> Result<(), CodecError> {
        let tag = self.start_tag(name, attrs);
        self.inner.write_event(Event::Start(tag))?;
        self.open.push(name.clone());
        Ok(())
    }

    /// Write a self-closing element.
    pub fn empty(&mut self, name: &QName, attrs: &[Attr]) -> Result<(), CodecError> {
        let tag = self.start_tag(name, attrs);
        self.inner.write_event(Event::Empty(tag))?;
        Ok(())
    }

    /// Close the most recently started element.
    pub fn end(&mut self) -> Result<(), CodecError> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| CodecError::unbalanced("end tag without an open element"))?;
        self.inner.write_event(Event::End(BytesEnd::new(name.local)))?;
        Ok(())
    }

    /// Write escaped character data.
    pub fn text(&mut self, text: &str) -> Result<(), CodecError> {
        self.inner.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    /// Write `<name>text</name>`.
    pub fn text_element(&mut self, name: &QName, text: &str) -> Result<(), CodecError> {
        self.start(name, &[])?;
        if !text.is_empty() {
            self.text(text)?;
        }
        self.end()
    }

    /// Finish writing and return the document.
    pub fn into_string(self) -> Result<String, CodecError> {
        if let Some(name) = self.open.last() {
            return Err(CodecError::unbalanced(format!("unclosed element {}", name)));
        }
        Ok(String::from_utf8(self.inner.into_inner())?)
    }

    fn start_tag(&self, name: &QName, attrs: &[Attr]) -> BytesStart<'static> {
        let mut tag = BytesStart::new(name.local.clone());

        if name.ns != self.default_namespace() {
            tag.push_attribute(("xmlns", name.ns.as_str()));
        }

        let mut prefixes = 0usize;
        for attr in attrs {
            let local = attr.name.local.as_str();
            let value = attr.value.as_str();
            match attr.name.ns.as_str() {
                "" => tag.push_attribute((local, value)),
                ns::XML => tag.push_attribute((format!("xml:{local}").as_str(), value)),
                other => {
                    let prefix = format!("ns{prefixes}");
                    prefixes += 1;
                    tag.push_attribute((format!("xmlns:{prefix}").as_str(), other));
                    tag.push_attribute((format!("{prefix}:{local}").as_str(), value));
                }
            }
        }

        tag
    }
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}
