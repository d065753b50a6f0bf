//! The Hello phase of an SSLv3 / TLS 1.0 / TLS 1.1 handshake.
//!
//! This crate builds, sends and decodes the four Hello messages
//! (HelloRequest, ClientHello, ServerHello, ServerHelloDone), and keeps
//! the running [`Transcript`] of the handshake that the Finished messages
//! are computed over.
//!
//! It does not own a socket or a record layer. Outgoing messages are framed
//! and handed to a [`RecordWriter`]. Incoming messages are decoded from
//! bytes the record layer has already reassembled.
//!
//! ```
//! use tlshake::{ClientHello, Config, ContentType, Handshake, HandshakeMessage, Transcript};
//!
//! let config = Config::builder().rng_seed(1).build().unwrap();
//! let mut rng = config.rng();
//! let mut transcript = Transcript::new();
//! let mut records: Vec<(ContentType, Vec<u8>)> = Vec::new();
//!
//! let hello = ClientHello::send_new(&mut rng, &config, &mut transcript, &mut records).unwrap();
//!
//! let (rest, received) = Handshake::parse(&records[0].1).unwrap();
//! assert!(rest.is_empty());
//! assert_eq!(received.message, HandshakeMessage::ClientHello(hello));
//! assert_eq!(transcript.as_bytes(), &records[0].1[..]);
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]

#[macro_use]
extern crate log;

mod config;
pub use config::{Config, ConfigBuilder};

mod error;
pub use error::{AlertDescription, Error};

mod provider;
pub use provider::{CertificateInfo, Policy, RecordWriter, SecureRandom};

mod rng;
pub use rng::SeededRng;

mod transcript;
pub use transcript::{Transcript, TRANSCRIPT_HASH_LEN};

pub mod message;
pub use message::{
    CipherSuite, ClientHello, CompressionMethod, ContentType, Handshake, HandshakeMessage,
    Inclusion, MessageType, ProtocolVersion, Random, ServerHello, SessionId,
};
