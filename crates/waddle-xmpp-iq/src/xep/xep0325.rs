//! XEP-0325: Internet of Things - Control
//!
//! A controller writes typed parameters to a device with an IQ `set`; the
//! device acknowledges with an empty `setResponse`.
//!
//! ## XML Format
//!
//! ```xml
//! <iq type='set' id='1' to='jukebox@example.org/device'>
//!   <set xmlns='urn:xmpp:iot:control'>
//!     <string name='url' value='https://soundcloud.com/radiohead/spectre'/>
//!     <boolean name='shuffle' value='true'/>
//!   </set>
//! </iq>
//!
//! <iq type='result' id='1' to='controller@example.org/ctl'>
//!   <setResponse xmlns='urn:xmpp:iot:control'/>
//! </iq>
//! ```

use tracing::debug;

use crate::parser::{ns, StartTag, Token, XmlReader};
use crate::payload::IqPayload;
use crate::writer::XmlWriter;
use crate::{Attr, CodecError, QName};

/// Namespace for XEP-0325 IoT Control.
pub const NS_IOT_CONTROL: &str = ns::IOT_CONTROL;

/// One control parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlField {
    /// Parameter type, i.e. the element's local name (`string`, `boolean`,
    /// `int`, `double`, `dateTime`, ...)
    pub kind: String,
    /// Parameter name
    pub name: String,
    /// Parameter value as written on the wire
    pub value: String,
}

impl ControlField {
    pub fn new(kind: &str, name: &str, value: &str) -> Self {
        Self {
            kind: kind.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// A `string` parameter.
    pub fn string(name: &str, value: &str) -> Self {
        Self::new("string", name, value)
    }

    /// A `boolean` parameter.
    pub fn boolean(name: &str, value: bool) -> Self {
        Self::new("boolean", name, if value { "true" } else { "false" })
    }
}

/// `set` payload: control parameters in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlSet {
    pub fields: Vec<ControlField>,
}

impl ControlSet {
    pub fn new(fields: Vec<ControlField>) -> Self {
        Self { fields }
    }

    /// First field with the given name.
    pub fn field(&self, name: &str) -> Option<&ControlField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Value of the first `string` field with the given name, trimmed.
    pub fn string_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.kind == "string" && f.name == name)
            .map(|f| f.value.trim())
    }

    /// Value of the first `boolean` field with the given name.
    ///
    /// Accepts the XML Schema lexical forms `true`, `false`, `1` and `0`.
    pub fn bool_value(&self, name: &str) -> Option<bool> {
        let field = self
            .fields
            .iter()
            .find(|f| f.kind == "boolean" && f.name == name)?;
        match field.value.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

impl IqPayload for ControlSet {
    fn name(&self) -> QName {
        QName::new(NS_IOT_CONTROL, "set")
    }

    fn decode(&mut self, reader: &mut XmlReader<'_>, _start: &StartTag) -> Result<(), CodecError> {
        self.fields.clear();

        loop {
            match reader.next_token()? {
                Token::Start(tag) => {
                    self.fields.push(ControlField {
                        kind: tag.name.local.clone(),
                        name: tag.attr("name").unwrap_or_default().to_string(),
                        value: tag.attr("value").unwrap_or_default().to_string(),
                    });
                    reader.skip_element()?;
                }
                Token::Text(_) => {}
                Token::End(_) => break,
            }
        }

        debug!(fields = self.fields.len(), "Parsed IoT control set");
        Ok(())
    }

    fn encode(&self, writer: &mut XmlWriter) -> Result<(), CodecError> {
        let name = self.name();
        if self.fields.is_empty() {
            return writer.empty(&name, &[]);
        }

        writer.start(&name, &[])?;
        for field in &self.fields {
            writer.empty(
                &QName::new(NS_IOT_CONTROL, field.kind.clone()),
                &[
                    Attr::new("name", field.name.clone()),
                    Attr::new("value", field.value.clone()),
                ],
            )?;
        }
        writer.end()
    }
}

/// `setResponse` payload acknowledging a [`ControlSet`].
///
/// Not in the default registry; a received `setResponse` decodes as a
/// generic node unless registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlSetResponse;

impl IqPayload for ControlSetResponse {
    fn name(&self) -> QName {
        QName::new(NS_IOT_CONTROL, "setResponse")
    }

    fn decode(&mut self, reader: &mut XmlReader<'_>, _start: &StartTag) -> Result<(), CodecError> {
        reader.skip_element()
    }

    fn encode(&self, writer: &mut XmlWriter) -> Result<(), CodecError> {
        writer.empty(&self.name(), &[])
    }
}
