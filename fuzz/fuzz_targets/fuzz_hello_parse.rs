#![no_main]

//! Fuzz target for Hello message decoding.
//!
//! Inputs are fed to the envelope parser as-is, and also directly to each
//! body decoder. Anything that decodes must serialize back to bytes that
//! decode to the same message.

use libfuzzer_sys::fuzz_target;

use tlshake::{ClientHello, Handshake, HandshakeMessage, ServerHello};

fuzz_target!(|data: &[u8]| {
    // Each envelope consumes at least its header.
    let mut input = data;
    while let Ok((rest, handshake)) = Handshake::parse(input) {
        check(&handshake.message);
        input = rest;
    }

    if let Ok(hello) = ClientHello::parse(data) {
        check(&HandshakeMessage::ClientHello(hello));
    }

    if let Ok(hello) = ServerHello::parse(data) {
        check(&HandshakeMessage::ServerHello(hello));
    }

    // The legacy greeting has no modern re-encoding, it only must not panic.
    let _ = ClientHello::parse_legacy(data);
});

fn check(message: &HandshakeMessage) {
    let mut body = Vec::new();
    message.serialize(&mut body);

    let decoded = HandshakeMessage::decode(message.message_type(), &body)
        .expect("serialized message must decode");

    match (message, &decoded) {
        // Extensions are not re-encoded.
        (HandshakeMessage::ClientHello(a), HandshakeMessage::ClientHello(b)) => {
            assert_eq!(a.client_version, b.client_version);
            assert_eq!(a.random, b.random);
            assert_eq!(a.session_id, b.session_id);
            assert_eq!(a.cipher_suites, b.cipher_suites);
            assert_eq!(a.compression_methods, b.compression_methods);
        }
        _ => assert_eq!(message, &decoded),
    }
}
