//! Payload registry: maps qualified element names to payload types.
//!
//! The registry is filled once during start-up and only read afterwards, so
//! a populated registry can be shared across threads behind an `Arc` with no
//! locking. Lookups that miss fall back to a generic [`Node`].

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::{debug, trace, warn};

use crate::bind::Bind;
use crate::disco::{DiscoInfo, DiscoItems};
use crate::parser::ns;
use crate::payload::IqPayload;
use crate::xep::xep0325::ControlSet;
use crate::{CodecError, Node, QName};

/// Builds a fresh, empty payload ready to decode into.
pub type PayloadFactory = fn() -> Box<dyn IqPayload>;

static GLOBAL: OnceLock<Arc<PayloadRegistry>> = OnceLock::new();

/// Table of known payload types keyed by namespace, then local name.
#[derive(Debug, Clone, Default)]
pub struct PayloadRegistry {
    factories: HashMap<String, HashMap<String, PayloadFactory>>,
}

impl PayloadRegistry {
    /// Create an empty registry: every payload decodes as a [`Node`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in payload types.
    ///
    /// - `{http://jabber.org/protocol/disco#info}query` → [`DiscoInfo`]
    /// - `{http://jabber.org/protocol/disco#items}query` → [`DiscoItems`]
    /// - `{urn:ietf:params:xml:ns:xmpp-bind}bind` → [`Bind`]
    /// - `{urn:xmpp:iot:control}set` → [`ControlSet`]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ns::DISCO_INFO, "query", || Box::new(DiscoInfo::default()));
        registry.register(ns::DISCO_ITEMS, "query", || Box::new(DiscoItems::default()));
        registry.register(ns::BIND, "bind", || Box::new(Bind::default()));
        registry.register(ns::IOT_CONTROL, "set", || Box::new(ControlSet::default()));
        registry
    }

    /// Register a payload type for a qualified name.
    ///
    /// Registering the same name twice replaces the earlier factory.
    pub fn register(&mut self, ns: &str, local: &str, factory: PayloadFactory) -> &mut Self {
        let previous = self
            .factories
            .entry(ns.to_string())
            .or_default()
            .insert(local.to_string(), factory);

        if previous.is_some() {
            warn!(ns, local, "Replacing registered IQ payload type");
        } else {
            debug!(ns, local, "Registered IQ payload type");
        }
        self
    }

    /// Whether a payload type is registered for the name.
    pub fn contains(&self, ns: &str, local: &str) -> bool {
        self.lookup(ns, local).is_some()
    }

    /// Create a fresh payload for the name: the registered type if any,
    /// otherwise an empty [`Node`].
    pub fn resolve(&self, ns: &str, local: &str) -> Box<dyn IqPayload> {
        match self.lookup(ns, local) {
            Some(factory) => factory(),
            None => {
                trace!(ns, local, "No registered payload type, using generic node");
                Box::new(Node::new(QName::new(ns, local)))
            }
        }
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<QName> {
        let mut names: Vec<QName> = self
            .factories
            .iter()
            .flat_map(|(ns, locals)| locals.keys().map(move |local| QName::new(ns, local)))
            .collect();
        names.sort();
        names
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.factories.values().map(HashMap::len).sum()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Install this registry as the process-wide one.
    ///
    /// Must happen during start-up, before the first call to
    /// [`global`](Self::global); the handle cannot be replaced afterwards.
    pub fn install(self) -> Result<Arc<PayloadRegistry>, CodecError> {
        let registry = Arc::new(self);
        GLOBAL
            .set(Arc::clone(&registry))
            .map_err(|_| CodecError::RegistryInstalled)?;
        debug!(payload_types = registry.len(), "Installed global IQ payload registry");
        Ok(registry)
    }

    /// The process-wide registry, initialized with the defaults when
    /// nothing was installed.
    pub fn global() -> Arc<PayloadRegistry> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(PayloadRegistry::with_defaults())))
    }

    fn lookup(&self, ns: &str, local: &str) -> Option<PayloadFactory> {
        self.factories.get(ns)?.get(local).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xep::xep0325::ControlSetResponse;

    #[test]
    fn test_defaults() {
        let registry = PayloadRegistry::with_defaults();

        assert_eq!(registry.len(), 4);
        assert!(registry.contains(ns::DISCO_INFO, "query"));
        assert!(registry.contains(ns::DISCO_ITEMS, "query"));
        assert!(registry.contains(ns::BIND, "bind"));
        assert!(registry.contains(ns::IOT_CONTROL, "set"));
        assert!(!registry.contains(ns::IOT_CONTROL, "setResponse"));
    }

    #[test]
    fn test_resolve_registered_types() {
        let registry = PayloadRegistry::with_defaults();

        assert!(registry.resolve(ns::DISCO_INFO, "query").is::<DiscoInfo>());
        assert!(registry.resolve(ns::DISCO_ITEMS, "query").is::<DiscoItems>());
        assert!(registry.resolve(ns::BIND, "bind").is::<Bind>());
        assert!(registry.resolve(ns::IOT_CONTROL, "set").is::<ControlSet>());
    }

    #[test]
    fn test_resolve_falls_back_to_node() {
        let registry = PayloadRegistry::with_defaults();
        let payload = registry.resolve("urn:unknown", "thing");

        let node = payload.downcast_ref::<Node>().unwrap();
        assert_eq!(node.name, QName::new("urn:unknown", "thing"));
    }

    #[test]
    fn test_namespace_and_local_name_both_matter() {
        let registry = PayloadRegistry::with_defaults();

        assert!(registry.resolve(ns::DISCO_INFO, "item").is::<Node>());
        assert!(registry.resolve("urn:other", "query").is::<Node>());
    }

    #[test]
    fn test_register_and_replace() {
        let mut registry = PayloadRegistry::new();
        assert!(registry.is_empty());

        registry.register(ns::IOT_CONTROL, "setResponse", || {
            Box::new(ControlSetResponse::default())
        });
        assert!(registry
            .resolve(ns::IOT_CONTROL, "setResponse")
            .is::<ControlSetResponse>());

        registry.register(ns::IOT_CONTROL, "setResponse", || {
            Box::new(Node::new(QName::new(ns::IOT_CONTROL, "setResponse")))
        });
        assert_eq!(registry.len(), 1);
        assert!(registry.resolve(ns::IOT_CONTROL, "setResponse").is::<Node>());
    }

    #[test]
    fn test_names_are_sorted() {
        let names = PayloadRegistry::with_defaults().names();
        let mut sorted = names.clone();
        sorted.sort();

        assert_eq!(names, sorted);
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PayloadRegistry>();
    }
}
