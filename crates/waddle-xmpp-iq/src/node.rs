//! Generic XML node used for payloads with no registered type.
//!
//! A `Node` keeps the qualified name, attributes and child elements of any
//! element, so unknown extensions survive a decode/encode cycle.
//!
//! ## Known limitation
//!
//! Character data is recorded in [`Node::content`] but only the child nodes
//! are written back by [`IqPayload::encode`]. An element that holds text and
//! no child elements therefore comes back empty:
//!
//! ```xml
//! <note xmlns='urn:example'>hello</note>   <!-- decoded -->
//! <note xmlns="urn:example"></note>        <!-- re-encoded -->
//! ```
//!
//! Callers that need the text must read `content` themselves.

use tracing::trace;

use crate::parser::{StartTag, Token, XmlReader};
use crate::payload::IqPayload;
use crate::writer::XmlWriter;
use crate::{Attr, CodecError, QName};

/// Schema-less element tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Qualified element name
    pub name: QName,
    /// Attributes in document order, namespace declarations excluded
    pub attrs: Vec<Attr>,
    /// Character data found directly inside this element
    pub content: String,
    /// Child elements in document order
    pub children: Vec<Node>,
}

impl Node {
    /// Create an empty node.
    pub fn new(name: QName) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    /// Add an attribute in no namespace.
    pub fn with_attr(mut self, local: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(Attr::new(local, value));
        self
    }

    /// Append a child node.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Set the character data.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Look up an attribute in no namespace by local name.
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.ns.is_empty() && a.name.local == local)
            .map(|a| a.value.as_str())
    }

    /// First child with the given qualified name.
    pub fn child(&self, ns: &str, local: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name.is(ns, local))
    }

    /// Decode the element opened by `start`, through its end tag.
    pub fn read(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self, CodecError> {
        let mut node = Node {
            name: start.name.clone(),
            attrs: start.attrs.clone(),
            ..Default::default()
        };

        loop {
            match reader.next_token()? {
                Token::Start(child) => node.children.push(Node::read(reader, &child)?),
                Token::Text(text) => node.content.push_str(&text),
                Token::End(_) => break,
            }
        }

        trace!(name = %node.name, children = node.children.len(), "Decoded generic node");
        Ok(node)
    }

    /// Write the node and its children. See the module docs for why
    /// `content` is not written.
    pub fn write(&self, writer: &mut XmlWriter) -> Result<(), CodecError> {
        writer.start(&self.name, &self.attrs)?;
        for child in &self.children {
            child.write(writer)?;
        }
        writer.end()
    }
}

impl IqPayload for Node {
    fn name(&self) -> QName {
        self.name.clone()
    }

    fn decode(&mut self, reader: &mut XmlReader<'_>, start: &StartTag) -> Result<(), CodecError> {
        *self = Node::read(reader, start)?;
        Ok(())
    }

    fn encode(&self, writer: &mut XmlWriter) -> Result<(), CodecError> {
        self.write(writer)
    }
}
