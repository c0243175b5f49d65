//! Process-wide registry installation.
//!
//! Kept in its own test binary: the global handle can only be set once per
//! process.

mod common;

use std::sync::Arc;

use common::{init_tracing, CustomY, CUSTOM_NS};
use waddle_xmpp_iq::{CodecError, IqCodec, PayloadRegistry};

#[test]
fn test_install_once_then_read_many() {
    init_tracing();

    let mut registry = PayloadRegistry::with_defaults();
    registry.register(CUSTOM_NS, "y", || Box::new(CustomY::default()));
    let installed = registry.install().unwrap();

    let global = PayloadRegistry::global();
    assert!(Arc::ptr_eq(&installed, &global));
    assert!(global.contains(CUSTOM_NS, "y"));

    let again = PayloadRegistry::new().install();
    assert!(matches!(again, Err(CodecError::RegistryInstalled)));

    let codec = IqCodec::with_defaults();
    let iq = codec
        .decode_str("<iq type='set' id='g'><y xmlns='urn:x'/></iq>")
        .unwrap();
    assert!(iq.payload::<CustomY>().is_some());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| {
                PayloadRegistry::global()
                    .resolve(CUSTOM_NS, "y")
                    .is::<CustomY>()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
