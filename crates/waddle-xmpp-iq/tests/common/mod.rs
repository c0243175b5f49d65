//! Test utilities for IQ codec integration tests.
//!
//! Provides tracing setup, isolated registries, a sample custom payload and
//! stanza fixtures.

#![allow(dead_code)]

use std::sync::Arc;

use waddle_xmpp_iq::{
    Attr, CodecConfig, CodecError, IqCodec, IqPayload, PayloadRegistry, QName, StartTag, Token,
    XmlReader, XmlWriter,
};

/// Namespace of the sample custom payload.
pub const CUSTOM_NS: &str = "urn:x";

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// A registry with the built-in payloads, private to the calling test.
pub fn default_registry() -> PayloadRegistry {
    PayloadRegistry::with_defaults()
}

/// A codec over an isolated registry.
pub fn codec_with(registry: PayloadRegistry) -> IqCodec {
    IqCodec::new(CodecConfig::default(), Arc::new(registry))
}

/// Sample application payload: `<y xmlns='urn:x' level='..'>` with any number
/// of `<tag/>` children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomY {
    pub level: Option<String>,
    pub tags: usize,
}

impl IqPayload for CustomY {
    fn name(&self) -> QName {
        QName::new(CUSTOM_NS, "y")
    }

    fn decode(&mut self, reader: &mut XmlReader<'_>, start: &StartTag) -> Result<(), CodecError> {
        self.level = start.attr("level").map(str::to_string);
        loop {
            match reader.next_token()? {
                Token::Start(tag) => {
                    if tag.name.is(CUSTOM_NS, "tag") {
                        self.tags += 1;
                    }
                    reader.skip_element()?;
                }
                Token::Text(_) => {}
                Token::End(_) => return Ok(()),
            }
        }
    }

    fn encode(&self, writer: &mut XmlWriter) -> Result<(), CodecError> {
        let attrs: Vec<_> = self
            .level
            .iter()
            .map(|level| Attr::new("level", level.clone()))
            .collect();
        writer.start(&self.name(), &attrs)?;
        for _ in 0..self.tags {
            writer.empty(&QName::new(CUSTOM_NS, "tag"), &[])?;
        }
        writer.end()
    }
}

/// Scenario A request: disco#items with no items.
pub const DISCO_ITEMS_SET: &str =
    r#"<iq type="set" id="1"><query xmlns="http://jabber.org/protocol/disco#items"/></iq>"#;

/// Scenario B: item-not-found error reply.
pub const ITEM_NOT_FOUND: &str = r#"<iq type="error" id="2"><error code="404" type="cancel"><item-not-found xmlns="urn:ietf:params:xml:ns:xmpp-stanzas"/></error></iq>"#;

/// IoT control request as sent to a jukebox device.
pub const CONTROL_SET: &str = "<iq xmlns='jabber:client' type='set' id='ctl-1' \
       from='controller@example.org/app' to='jukebox@example.org/device'>\
     <set xmlns='urn:xmpp:iot:control'>\
       <string name='url' value='https://soundcloud.com/radiohead/spectre'/>\
     </set>\
   </iq>";
