//! Resource binding payload (RFC 6120 Section 7).
//!
//! ```xml
//! <!-- Request -->
//! <iq type='set' id='bind_1'>
//!   <bind xmlns='urn:ietf:params:xml:ns:xmpp-bind'>
//!     <resource>balcony</resource>
//!   </bind>
//! </iq>
//!
//! <!-- Result -->
//! <iq type='result' id='bind_1'>
//!   <bind xmlns='urn:ietf:params:xml:ns:xmpp-bind'>
//!     <jid>juliet@example.com/balcony</jid>
//!   </bind>
//! </iq>
//! ```

use tracing::trace;

use crate::parser::{ns, StartTag, Token, XmlReader};
use crate::payload::IqPayload;
use crate::writer::XmlWriter;
use crate::{CodecError, QName};

/// `bind` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bind {
    /// Requested resource
    pub resource: Option<String>,
    /// Full JID assigned by the server
    pub jid: Option<String>,
}

impl Bind {
    /// Bind request for a specific resource.
    pub fn request(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            jid: None,
        }
    }

    /// Bind result carrying the assigned JID.
    pub fn result(jid: impl Into<String>) -> Self {
        Self {
            resource: None,
            jid: Some(jid.into()),
        }
    }
}

impl IqPayload for Bind {
    fn name(&self) -> QName {
        QName::new(ns::BIND, "bind")
    }

    fn decode(&mut self, reader: &mut XmlReader<'_>, _start: &StartTag) -> Result<(), CodecError> {
        *self = Bind::default();

        loop {
            match reader.next_token()? {
                Token::Start(tag) if tag.name.is(ns::BIND, "resource") => {
                    self.resource = Some(reader.read_text()?);
                }
                Token::Start(tag) if tag.name.is(ns::BIND, "jid") => {
                    self.jid = Some(reader.read_text()?);
                }
                Token::Start(tag) => {
                    trace!(name = %tag.name, "Skipping unknown bind child");
                    reader.skip_element()?;
                }
                Token::Text(_) => {}
                Token::End(_) => break,
            }
        }

        Ok(())
    }

    fn encode(&self, writer: &mut XmlWriter) -> Result<(), CodecError> {
        let name = self.name();
        if self.resource.is_none() && self.jid.is_none() {
            return writer.empty(&name, &[]);
        }

        writer.start(&name, &[])?;
        if let Some(ref resource) = self.resource {
            writer.text_element(&QName::new(ns::BIND, "resource"), resource)?;
        }
        if let Some(ref jid) = self.jid {
            writer.text_element(&QName::new(ns::BIND, "jid"), jid)?;
        }
        writer.end()
    }
}
