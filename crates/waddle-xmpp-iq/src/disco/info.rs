//! Service Discovery: disco#info payload.
//!
//! Implements the XEP-0030 `query` element used to ask for and report an
//! entity's identities and features.

use tracing::{debug, trace};

use crate::parser::{ns, StartTag, Token, XmlReader};
use crate::payload::IqPayload;
use crate::writer::XmlWriter;
use crate::{Attr, CodecError, QName};

/// Service Discovery info namespace (XEP-0030).
pub const DISCO_INFO_NS: &str = ns::DISCO_INFO;

/// disco#info `query` payload.
///
/// An empty value is the request form; a populated one is the response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoInfo {
    /// Optional node being queried
    pub node: Option<String>,
    /// Identities of the entity
    pub identities: Vec<Identity>,
    /// Features supported by the entity
    pub features: Vec<Feature>,
}

/// Identity element for disco#info response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// Category (e.g., "server", "client")
    pub category: String,
    /// Type (e.g., "im", "pc")
    pub type_: String,
    /// Optional name (human-readable)
    pub name: Option<String>,
}

impl Identity {
    /// Create a new identity.
    pub fn new(category: &str, type_: &str, name: Option<&str>) -> Self {
        Self {
            category: category.to_string(),
            type_: type_.to_string(),
            name: name.map(|s| s.to_string()),
        }
    }

    /// Server identity (category="server", type="im").
    pub fn server(name: Option<&str>) -> Self {
        Self::new("server", "im", name)
    }

    /// Client identity (category="client", type="pc").
    pub fn client(name: Option<&str>) -> Self {
        Self::new("client", "pc", name)
    }

    /// IoT device identity (category="client", type="device").
    pub fn device(name: Option<&str>) -> Self {
        Self::new("client", "device", name)
    }
}

/// Feature element for disco#info response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature(pub String);

impl Feature {
    /// Create a new feature.
    pub fn new(var: &str) -> Self {
        Self(var.to_string())
    }

    /// disco#info feature
    pub fn disco_info() -> Self {
        Self::new(DISCO_INFO_NS)
    }

    /// disco#items feature
    pub fn disco_items() -> Self {
        Self::new(super::items::DISCO_ITEMS_NS)
    }

    /// XEP-0325 IoT Control feature
    pub fn iot_control() -> Self {
        Self::new(ns::IOT_CONTROL)
    }

    /// XEP-0199 XMPP Ping feature
    pub fn ping() -> Self {
        Self::new("urn:xmpp:ping")
    }
}

impl DiscoInfo {
    /// Build a response payload.
    pub fn new(identities: Vec<Identity>, features: Vec<Feature>) -> Self {
        Self {
            node: None,
            identities,
            features,
        }
    }

    /// Set the node attribute.
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }

    /// Whether the entity advertises `var`.
    pub fn has_feature(&self, var: &str) -> bool {
        self.features.iter().any(|f| f.0 == var)
    }
}

impl IqPayload for DiscoInfo {
    fn name(&self) -> QName {
        QName::new(DISCO_INFO_NS, "query")
    }

    fn decode(&mut self, reader: &mut XmlReader<'_>, start: &StartTag) -> Result<(), CodecError> {
        *self = DiscoInfo {
            node: start.attr("node").map(str::to_string),
            ..Default::default()
        };

        loop {
            match reader.next_token()? {
                Token::Start(tag) if tag.name.is(DISCO_INFO_NS, "identity") => {
                    self.identities.push(Identity {
                        category: tag.attr("category").unwrap_or_default().to_string(),
                        type_: tag.attr("type").unwrap_or_default().to_string(),
                        name: tag.attr("name").map(str::to_string),
                    });
                    reader.skip_element()?;
                }
                Token::Start(tag) if tag.name.is(DISCO_INFO_NS, "feature") => {
                    if let Some(var) = tag.attr("var") {
                        self.features.push(Feature::new(var));
                    }
                    reader.skip_element()?;
                }
                Token::Start(tag) => {
                    trace!(name = %tag.name, "Skipping unknown disco#info child");
                    reader.skip_element()?;
                }
                Token::Text(_) => {}
                Token::End(_) => break,
            }
        }

        debug!(
            node = ?self.node,
            identities = self.identities.len(),
            features = self.features.len(),
            "Parsed disco#info query"
        );
        Ok(())
    }

    fn encode(&self, writer: &mut XmlWriter) -> Result<(), CodecError> {
        let name = self.name();
        let mut attrs = Vec::new();
        if let Some(ref node) = self.node {
            attrs.push(Attr::new("node", node.clone()));
        }

        if self.identities.is_empty() && self.features.is_empty() {
            return writer.empty(&name, &attrs);
        }

        writer.start(&name, &attrs)?;

        for identity in &self.identities {
            let mut attrs = vec![
                Attr::new("category", identity.category.clone()),
                Attr::new("type", identity.type_.clone()),
            ];
            if let Some(ref name) = identity.name {
                attrs.push(Attr::new("name", name.clone()));
            }
            writer.empty(&QName::new(DISCO_INFO_NS, "identity"), &attrs)?;
        }

        for feature in &self.features {
            writer.empty(
                &QName::new(DISCO_INFO_NS, "feature"),
                &[Attr::new("var", feature.0.clone())],
            )?;
        }

        writer.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(xml: &str) -> DiscoInfo {
        let mut reader = XmlReader::new(xml);
        let start = reader.next_start().unwrap();
        let mut info = DiscoInfo::default();
        info.decode(&mut reader, &start).unwrap();
        info
    }

    #[test]
    fn test_decode_disco_info_response() {
        let info = decode(
            "<query xmlns='http://jabber.org/protocol/disco#info' node='music'>\
               <identity category='client' type='device' name='Jukebox'/>\
               <feature var='http://jabber.org/protocol/disco#info'/>\
               <feature var='urn:xmpp:iot:control'/>\
             </query>",
        );

        assert_eq!(info.node.as_deref(), Some("music"));
        assert_eq!(info.identities, vec![Identity::device(Some("Jukebox"))]);
        assert_eq!(
            info.features,
            vec![Feature::disco_info(), Feature::iot_control()]
        );
        assert!(info.has_feature(ns::IOT_CONTROL));
        assert!(!info.has_feature("urn:xmpp:ping"));
    }

    #[test]
    fn test_decode_empty_query() {
        let info = decode("<query xmlns='http://jabber.org/protocol/disco#info'/>");
        assert_eq!(info, DiscoInfo::default());
    }

    #[test]
    fn test_unknown_children_are_skipped() {
        let info = decode(
            "<query xmlns='http://jabber.org/protocol/disco#info'>\
               <x xmlns='jabber:x:data' type='result'><field var='FORM_TYPE'/></x>\
               <feature var='urn:xmpp:ping'/>\
             </query>",
        );

        assert_eq!(info.features, vec![Feature::ping()]);
        assert!(info.identities.is_empty());
    }

    #[test]
    fn test_encode_request() {
        let info = DiscoInfo::default();
        let xml = (&info as &dyn IqPayload).to_xml().unwrap();

        assert_eq!(xml, r#"<query xmlns="http://jabber.org/protocol/disco#info"/>"#);
    }

    #[test]
    fn test_encode_response() {
        let info = DiscoInfo::new(
            vec![Identity::server(Some("Test Server"))],
            vec![Feature::disco_info(), Feature::disco_items()],
        )
        .with_node("n1");
        let xml = (&info as &dyn IqPayload).to_xml().unwrap();

        assert_eq!(
            xml,
            "<query xmlns=\"http://jabber.org/protocol/disco#info\" node=\"n1\">\
             <identity category=\"server\" type=\"im\" name=\"Test Server\"/>\
             <feature var=\"http://jabber.org/protocol/disco#info\"/>\
             <feature var=\"http://jabber.org/protocol/disco#items\"/>\
             </query>"
        );
        assert_eq!(decode(&xml), info);
    }

    #[test]
    fn test_identity_constructors() {
        let server = Identity::server(Some("My Server"));
        assert_eq!(server.category, "server");
        assert_eq!(server.type_, "im");
        assert_eq!(server.name, Some("My Server".to_string()));

        let client = Identity::client(None);
        assert_eq!(client.category, "client");
        assert_eq!(client.type_, "pc");
        assert!(client.name.is_none());
    }
}
