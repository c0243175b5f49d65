//! Streaming XML token reader for IQ stanzas.
//!
//! Wraps `quick_xml`'s namespace-aware reader so payload decoders only ever
//! see resolved [`QName`]s. Prefixes and `xmlns` declarations are consumed
//! here and never reach a [`StartTag`].

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{QName as RawName, ResolveResult};
use quick_xml::reader::NsReader;

use crate::{Attr, CodecError, QName};

/// Namespace URIs used by the codec
pub mod ns {
    /// XMPP client namespace
    pub const JABBER_CLIENT: &str = "jabber:client";
    /// XMPP server namespace
    pub const JABBER_SERVER: &str = "jabber:server";
    /// Resource binding namespace
    pub const BIND: &str = "urn:ietf:params:xml:ns:xmpp-bind";
    /// Stanza error namespace
    pub const STANZAS: &str = "urn:ietf:params:xml:ns:xmpp-stanzas";
    /// Service discovery info namespace (XEP-0030)
    pub const DISCO_INFO: &str = "http://jabber.org/protocol/disco#info";
    /// Service discovery items namespace (XEP-0030)
    pub const DISCO_ITEMS: &str = "http://jabber.org/protocol/disco#items";
    /// IoT control namespace (XEP-0325)
    pub const IOT_CONTROL: &str = "urn:xmpp:iot:control";
    /// The namespace bound to the reserved `xml` prefix
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
}

/// Default limit on element nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Hard ceiling on element nesting. Payloads are decoded recursively, so
/// larger configured limits are clamped to this.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// One unit of markup as seen by payload decoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Element start (empty elements are reported as start + end)
    Start(StartTag),
    /// Element end
    End(QName),
    /// Unescaped character data (including CDATA sections)
    Text(String),
}

/// A resolved element start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Qualified element name
    pub name: QName,
    /// Attributes in document order, without namespace declarations
    pub attrs: Vec<Attr>,
}

impl StartTag {
    /// Look up an attribute in no namespace by local name.
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.ns.is_empty() && a.name.local == local)
            .map(|a| a.value.as_str())
    }
}

/// Pull-based reader producing [`Token`]s from a byte stream.
///
/// A reader built with [`XmlReader::new`] keeps the source text so callers
/// can slice out the raw markup of an element; readers over arbitrary
/// `BufRead` streams cannot.
pub struct XmlReader<'r> {
    inner: NsReader<Box<dyn BufRead + 'r>>,
    buf: Vec<u8>,
    source: Option<&'r str>,
    depth: usize,
    max_depth: usize,
}

impl<'r> XmlReader<'r> {
    /// Create a reader over an in-memory document.
    pub fn new(source: &'r str) -> Self {
        let mut reader = Self::from_reader(source.as_bytes());
        reader.source = Some(source);
        reader
    }

    /// Create a reader over any buffered byte stream.
    pub fn from_reader<R: BufRead + 'r>(reader: R) -> Self {
        let boxed: Box<dyn BufRead + 'r> = Box::new(reader);
        let mut inner = NsReader::from_reader(boxed);
        inner.config_mut().expand_empty_elements = true;

        Self {
            inner,
            buf: Vec::with_capacity(1024),
            source: None,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the element nesting limit, clamped to [`MAX_DEPTH_LIMIT`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_LIMIT);
        self
    }

    /// Forget the source text, disabling raw markup capture.
    pub fn without_raw_capture(mut self) -> Self {
        self.source = None;
        self
    }

    /// Number of currently open elements.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Byte offset of the reader in the stream.
    pub fn position(&self) -> usize {
        self.inner.buffer_position() as usize
    }

    /// Raw markup between `inner_start` and the end tag just read.
    ///
    /// `inner_start` must be the [`position`](Self::position) taken right
    /// after the element's start tag. Returns `None` when the reader has no
    /// source text.
    pub fn raw_inner(&self, inner_start: usize) -> Option<&'r str> {
        let source = self.source?;
        let consumed = source.get(..self.position())?;
        let inner_end = consumed
            .rfind("</")
            .filter(|&end| end >= inner_start)
            .unwrap_or(inner_start);
        source.get(inner_start..inner_end)
    }

    /// Read the next token.
    ///
    /// Comments, processing instructions and declarations are skipped.
    /// Running out of input is an error: a well-formed stanza always ends
    /// with an end tag.
    pub fn next_token(&mut self) -> Result<Token, CodecError> {
        loop {
            self.buf.clear();
            match self.inner.read_event_into(&mut self.buf)? {
                Event::Start(start) => {
                    if self.depth >= self.max_depth {
                        return Err(CodecError::TooDeep(self.max_depth));
                    }
                    let tag = resolve_start(&self.inner, &start)?;
                    self.depth += 1;
                    return Ok(Token::Start(tag));
                }
                Event::End(end) => {
                    let name = resolve_name(&self.inner, end.name(), true)?;
                    self.depth = self.depth.saturating_sub(1);
                    return Ok(Token::End(name));
                }
                Event::Text(text) => return Ok(Token::Text(text.unescape()?.into_owned())),
                Event::CData(data) => {
                    return Ok(Token::Text(String::from_utf8(data.into_inner().into_owned())?))
                }
                Event::Eof => return Err(CodecError::UnexpectedEof),
                _ => {}
            }
        }
    }

    /// Skip character data and return the next start tag.
    pub fn next_start(&mut self) -> Result<StartTag, CodecError> {
        loop {
            match self.next_token()? {
                Token::Start(tag) => return Ok(tag),
                Token::Text(_) => {}
                Token::End(name) => return Err(CodecError::UnexpectedEnd(name.to_string())),
            }
        }
    }

    /// Consume the rest of the element whose start tag was just read.
    pub fn skip_element(&mut self) -> Result<(), CodecError> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.next_token()? {
                Token::Start(_) => depth += 1,
                Token::End(_) => depth -= 1,
                Token::Text(_) => {}
            }
        }
        Ok(())
    }

    /// Collect the character data of the element whose start tag was just
    /// read, through its end tag. Nested elements are skipped.
    pub fn read_text(&mut self) -> Result<String, CodecError> {
        let mut text = String::new();
        loop {
            match self.next_token()? {
                Token::Text(chunk) => text.push_str(&chunk),
                Token::Start(_) => self.skip_element()?,
                Token::End(_) => return Ok(text),
            }
        }
    }
}

fn resolve_start<R>(reader: &NsReader<R>, start: &BytesStart<'_>) -> Result<StartTag, CodecError> {
    let name = resolve_name(reader, start.name(), true)?;

    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        // xmlns and xmlns:prefix are bindings, not data
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        attrs.push(Attr {
            name: resolve_name(reader, attr.key, false)?,
            value: attr.unescape_value()?.into_owned(),
        });
    }

    Ok(StartTag { name, attrs })
}

fn resolve_name<R>(
    reader: &NsReader<R>,
    raw: RawName<'_>,
    element: bool,
) -> Result<QName, CodecError> {
    let local = String::from_utf8_lossy(raw.local_name().as_ref()).into_owned();

    if let Some(prefix) = raw.prefix() {
        if prefix.as_ref() == b"xml" {
            return Ok(QName::new(ns::XML, local));
        }
    }

    let (resolved, _) = if element {
        reader.resolve_element(raw)
    } else {
        reader.resolve_attribute(raw)
    };

    let ns = match resolved {
        ResolveResult::Bound(ns) => String::from_utf8_lossy(ns.as_ref()).into_owned(),
        ResolveResult::Unbound => String::new(),
        ResolveResult::Unknown(prefix) => {
            return Err(CodecError::UnboundPrefix(
                String::from_utf8_lossy(&prefix).into_owned(),
            ))
        }
    };

    Ok(QName { ns, local })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(xml: &str) -> Vec<Token> {
        let mut reader = XmlReader::new(xml);
        let mut tokens = Vec::new();
        loop {
            let token = reader.next_token().unwrap();
            let done = matches!(token, Token::End(_)) && reader.depth() == 0;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    #[test]
    fn test_empty_elements_are_expanded() {
        let tokens = collect("<a xmlns='urn:a'><b/></a>");
        assert_eq!(tokens.len(), 4);
        assert!(matches!(&tokens[1], Token::Start(tag) if tag.name.is("urn:a", "b")));
        assert!(matches!(&tokens[2], Token::End(name) if name.is("urn:a", "b")));
    }

    #[test]
    fn test_namespace_declarations_are_not_attributes() {
        let mut reader = XmlReader::new("<q xmlns='urn:q' xmlns:p='urn:p' node='n1'/>");
        let tag = reader.next_start().unwrap();

        assert_eq!(tag.name, QName::new("urn:q", "q"));
        assert_eq!(tag.attrs, vec![Attr::new("node", "n1")]);
        assert_eq!(tag.attr("node"), Some("n1"));
    }

    #[test]
    fn test_prefixes_resolve_to_namespaces() {
        let mut reader =
            XmlReader::new("<p:q xmlns:p='urn:p' p:kind='k' xml:lang='en'></p:q>");
        let tag = reader.next_start().unwrap();

        assert_eq!(tag.name, QName::new("urn:p", "q"));
        assert_eq!(tag.attrs[0], Attr::namespaced("urn:p", "kind", "k"));
        assert_eq!(tag.attrs[1], Attr::namespaced(ns::XML, "lang", "en"));
        // Prefixed attributes are not looked up by bare local name
        assert_eq!(tag.attr("kind"), None);
    }

    #[test]
    fn test_unbound_prefix_is_an_error() {
        let mut reader = XmlReader::new("<x:q/>");
        assert!(matches!(
            reader.next_start(),
            Err(CodecError::UnboundPrefix(prefix)) if prefix == "x"
        ));
    }

    #[test]
    fn test_text_is_unescaped() {
        let mut reader = XmlReader::new("<t>a &amp; b<![CDATA[ <c>]]></t>");
        reader.next_start().unwrap();
        assert_eq!(reader.read_text().unwrap(), "a & b <c>");
    }

    #[test]
    fn test_read_text_skips_nested_elements() {
        let mut reader = XmlReader::new("<t>one<skip>two</skip>three</t>");
        reader.next_start().unwrap();
        assert_eq!(reader.read_text().unwrap(), "onethree");
        assert_eq!(reader.depth(), 0);
    }

    #[test]
    fn test_truncated_input_fails() {
        let mut reader = XmlReader::new("<iq><query>");
        reader.next_start().unwrap();
        assert!(reader.skip_element().is_err());
    }

    #[test]
    fn test_depth_limit() {
        let mut reader = XmlReader::new("<a><b><c/></b></a>").with_max_depth(2);
        reader.next_start().unwrap();
        reader.next_start().unwrap();
        assert!(matches!(reader.next_token(), Err(CodecError::TooDeep(2))));
    }

    #[test]
    fn test_depth_limit_is_clamped() {
        let reader = XmlReader::new("<a/>").with_max_depth(100_000);
        assert_eq!(reader.max_depth, MAX_DEPTH_LIMIT);

        let reader = XmlReader::new("<a/>").with_max_depth(8);
        assert_eq!(reader.max_depth, 8);
    }

    #[test]
    fn test_raw_inner_capture() {
        let mut reader = XmlReader::new("<iq><x a='1'/>text</iq>");
        reader.next_start().unwrap();
        let mark = reader.position();
        reader.skip_element().unwrap();

        assert_eq!(reader.raw_inner(mark), Some("<x a='1'/>text"));
    }

    #[test]
    fn test_raw_inner_of_empty_element() {
        let mut reader = XmlReader::new("<r><a></a><iq/></r>");
        reader.next_start().unwrap();
        reader.next_start().unwrap();
        reader.skip_element().unwrap();
        reader.next_start().unwrap();
        let mark = reader.position();
        reader.skip_element().unwrap();

        assert_eq!(reader.raw_inner(mark), Some(""));
    }

    #[test]
    fn test_streaming_reader_has_no_raw_capture() {
        let mut reader = XmlReader::from_reader("<iq><x/></iq>".as_bytes());
        reader.next_start().unwrap();
        let mark = reader.position();
        reader.skip_element().unwrap();

        assert_eq!(reader.raw_inner(mark), None);
    }
}
