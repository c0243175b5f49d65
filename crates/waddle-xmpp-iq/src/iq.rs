//! IQ (Info/Query) stanza envelope.
//!
//! An [`Iq`] carries routing attributes, an ordered list of first-level
//! payloads and, for type `error`, a [`StanzaError`]. Payloads are decoded
//! through a [`PayloadRegistry`]: registered names become their typed payload,
//! everything else becomes a generic [`Node`](crate::Node).

use tracing::debug;

use crate::parser::{ns, StartTag, Token, XmlReader};
use crate::payload::IqPayload;
use crate::registry::PayloadRegistry;
use crate::stanza_error::StanzaError;
use crate::writer::XmlWriter;
use crate::{Attr, CodecError, IqType, QName};

/// An IQ stanza.
#[derive(Debug, Clone, Default)]
pub struct Iq {
    /// Stanza id, echoed in the response
    pub id: String,
    /// The `type` attribute; `None` when absent
    pub kind: Option<IqType>,
    /// Sender address
    pub from: Option<String>,
    /// Recipient address
    pub to: Option<String>,
    /// The `xml:lang` attribute
    pub lang: Option<String>,
    /// First-level children in document order, duplicates included
    pub payloads: Vec<Box<dyn IqPayload>>,
    /// Inner markup exactly as received. Informational only: it is never
    /// written back by [`encode`](Self::encode).
    pub raw_xml: Option<String>,
    /// Error details for IQs of type `error`
    pub error: Option<StanzaError>,
}

impl Iq {
    /// Create an IQ with no addressing and no payload.
    pub fn new(kind: IqType, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// Set the sender address.
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Set the recipient address.
    pub fn with_to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Set `xml:lang`.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Append a payload (builder form of [`add_payload`](Self::add_payload)).
    pub fn with_payload<P: IqPayload>(mut self, payload: P) -> Self {
        self.add_payload(payload);
        self
    }

    /// Append a payload. No deduplication is done.
    pub fn add_payload<P: IqPayload>(&mut self, payload: P) {
        self.payloads.push(Box::new(payload));
    }

    /// Append an already boxed payload.
    pub fn push_payload(&mut self, payload: Box<dyn IqPayload>) {
        self.payloads.push(payload);
    }

    /// First payload of concrete type `T`.
    pub fn payload<T: IqPayload>(&self) -> Option<&T> {
        self.payloads.iter().find_map(|p| p.downcast_ref::<T>())
    }

    /// Build the error response to this IQ.
    ///
    /// Addressing is swapped, the type becomes `error`, and `id` and `lang`
    /// are kept. The payloads and captured raw markup of the request are
    /// copied into the response unchanged.
    pub fn make_error_response(&self, error: StanzaError) -> Iq {
        Iq {
            id: self.id.clone(),
            kind: Some(IqType::Error),
            from: self.to.clone(),
            to: self.from.clone(),
            lang: self.lang.clone(),
            payloads: self.payloads.clone(),
            raw_xml: self.raw_xml.clone(),
            error: Some(error),
        }
    }

    /// Build an empty `result` response to this IQ.
    pub fn make_result(&self) -> Iq {
        Iq {
            id: self.id.clone(),
            kind: Some(IqType::Result),
            from: self.to.clone(),
            to: self.from.clone(),
            lang: self.lang.clone(),
            ..Default::default()
        }
    }

    /// Read the next `<iq/>` element from `reader`.
    pub fn decode(reader: &mut XmlReader<'_>, registry: &PayloadRegistry) -> Result<Iq, CodecError> {
        let start = reader.next_start()?;
        Self::decode_element(reader, &start, registry)
    }

    /// Decode the `<iq/>` element opened by `start`, through its end tag.
    ///
    /// The root element name is not checked. A first-level `error` child in
    /// the stanza's own namespace becomes [`Iq::error`]; every other
    /// first-level child is resolved through `registry`.
    pub fn decode_element(
        reader: &mut XmlReader<'_>,
        start: &StartTag,
        registry: &PayloadRegistry,
    ) -> Result<Iq, CodecError> {
        let mut iq = Iq::default();

        for attr in &start.attrs {
            let value = attr.value.clone();
            match attr.name.local.as_str() {
                "id" => iq.id = value,
                "type" => iq.kind = Some(IqType::from_attr(&value)),
                "to" => iq.to = Some(value),
                "from" => iq.from = Some(value),
                "lang" => iq.lang = Some(value),
                _ => {}
            }
        }

        let inner_start = reader.position();
        loop {
            match reader.next_token()? {
                Token::Start(tag) if tag.name.is(&start.name.ns, "error") => {
                    iq.error = Some(StanzaError::read(reader, &tag)?);
                }
                Token::Start(tag) => {
                    let mut payload = registry.resolve(&tag.name.ns, &tag.name.local);
                    payload.decode(reader, &tag)?;
                    iq.payloads.push(payload);
                }
                Token::Text(_) => {}
                Token::End(_) => break,
            }
        }
        iq.raw_xml = reader.raw_inner(inner_start).map(str::to_string);

        debug!(
            id = %iq.id,
            kind = ?iq.kind,
            payloads = iq.payloads.len(),
            error = iq.error.is_some(),
            "Decoded IQ"
        );
        Ok(iq)
    }

    /// Parse a single IQ from a string.
    pub fn from_xml(xml: &str, registry: &PayloadRegistry) -> Result<Iq, CodecError> {
        Self::decode(&mut XmlReader::new(xml), registry)
    }

    /// Write the IQ.
    ///
    /// The `<iq/>` element takes the writer's default namespace. Attributes
    /// come out as `id`, `type`, `to`, `from`, `xml:lang`, each omitted when
    /// unset; then the payloads in order, then the error if it has a code.
    pub fn encode(&self, writer: &mut XmlWriter) -> Result<(), CodecError> {
        let mut attrs = Vec::new();
        if !self.id.is_empty() {
            attrs.push(Attr::new("id", self.id.clone()));
        }
        if let Some(ref kind) = self.kind {
            attrs.push(Attr::new("type", kind.as_str()));
        }
        if let Some(ref to) = self.to {
            attrs.push(Attr::new("to", to.clone()));
        }
        if let Some(ref from) = self.from {
            attrs.push(Attr::new("from", from.clone()));
        }
        if let Some(ref lang) = self.lang {
            attrs.push(Attr::namespaced(ns::XML, "lang", lang.clone()));
        }

        let name = QName::new(writer.default_namespace(), "iq");
        writer.start(&name, &attrs)?;
        for payload in &self.payloads {
            payload.encode(writer)?;
        }
        if let Some(ref error) = self.error {
            error.write(writer)?;
        }
        writer.end()
    }

    /// Serialize the IQ with no namespace in scope.
    pub fn to_xml(&self) -> Result<String, CodecError> {
        let mut writer = XmlWriter::new();
        self.encode(&mut writer)?;
        writer.into_string()
    }
}
