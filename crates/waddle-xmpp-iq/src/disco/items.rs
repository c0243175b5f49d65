//! Service Discovery: disco#items payload.
//!
//! Implements the XEP-0030 `query` element listing the items (services,
//! rooms, nodes) hosted by an entity.

use tracing::{debug, trace};

use crate::parser::{ns, StartTag, Token, XmlReader};
use crate::payload::IqPayload;
use crate::writer::XmlWriter;
use crate::{Attr, CodecError, QName};

/// Service Discovery items namespace (XEP-0030).
pub const DISCO_ITEMS_NS: &str = ns::DISCO_ITEMS;

/// disco#items `query` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoItems {
    /// Optional node being queried
    pub node: Option<String>,
    /// Items in document order
    pub items: Vec<DiscoItem>,
}

/// Item element for disco#items response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoItem {
    /// JID of the item
    pub jid: String,
    /// Optional name (human-readable)
    pub name: Option<String>,
    /// Optional node identifier
    pub node: Option<String>,
}

impl DiscoItem {
    /// Create a new disco item.
    pub fn new(jid: &str, name: Option<&str>, node: Option<&str>) -> Self {
        Self {
            jid: jid.to_string(),
            name: name.map(|s| s.to_string()),
            node: node.map(|s| s.to_string()),
        }
    }
}

impl DiscoItems {
    /// Build a response payload.
    pub fn new(items: Vec<DiscoItem>) -> Self {
        Self { node: None, items }
    }

    /// Set the node attribute.
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }
}

impl IqPayload for DiscoItems {
    fn name(&self) -> QName {
        QName::new(DISCO_ITEMS_NS, "query")
    }

    fn decode(&mut self, reader: &mut XmlReader<'_>, start: &StartTag) -> Result<(), CodecError> {
        *self = DiscoItems {
            node: start.attr("node").map(str::to_string),
            items: Vec::new(),
        };

        loop {
            match reader.next_token()? {
                Token::Start(tag) if tag.name.is(DISCO_ITEMS_NS, "item") => {
                    self.items.push(DiscoItem {
                        jid: tag.attr("jid").unwrap_or_default().to_string(),
                        name: tag.attr("name").map(str::to_string),
                        node: tag.attr("node").map(str::to_string),
                    });
                    reader.skip_element()?;
                }
                Token::Start(tag) => {
                    trace!(name = %tag.name, "Skipping unknown disco#items child");
                    reader.skip_element()?;
                }
                Token::Text(_) => {}
                Token::End(_) => break,
            }
        }

        debug!(node = ?self.node, items = self.items.len(), "Parsed disco#items query");
        Ok(())
    }

    fn encode(&self, writer: &mut XmlWriter) -> Result<(), CodecError> {
        let name = self.name();
        let mut attrs = Vec::new();
        if let Some(ref node) = self.node {
            attrs.push(Attr::new("node", node.clone()));
        }

        if self.items.is_empty() {
            return writer.empty(&name, &attrs);
        }

        writer.start(&name, &attrs)?;
        for item in &self.items {
            let mut attrs = vec![Attr::new("jid", item.jid.clone())];
            if let Some(ref name) = item.name {
                attrs.push(Attr::new("name", name.clone()));
            }
            if let Some(ref node) = item.node {
                attrs.push(Attr::new("node", node.clone()));
            }
            writer.empty(&QName::new(DISCO_ITEMS_NS, "item"), &attrs)?;
        }
        writer.end()
    }
}
