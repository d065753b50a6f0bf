use super::envelope::{self, Inclusion};
use super::{ClientHello, CipherSuite, CompressionMethod, FieldReader, MessageType};
use super::{ProtocolVersion, Random, SessionId};
use crate::error::AlertDescription;
use crate::provider::{CertificateInfo, Policy, RecordWriter, SecureRandom};
use crate::transcript::Transcript;
use crate::Error;

/// version(2) + random(32) + session id length(1) + suite(2) + compression(1).
const MIN_LEN: usize = 38;

const NO_SHARED_SUITE: &str = "Can't agree on a ciphersuite with client";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerHello {
    pub server_version: ProtocolVersion,
    pub random: Random,
    pub session_id: SessionId,
    pub cipher_suite: CipherSuite,
    pub compression_method: CompressionMethod,
}

impl ServerHello {
    /// Build a hello to send.
    ///
    /// Returns `Error::Encoding` unless `random` is the full 32 bytes.
    pub fn new(
        server_version: ProtocolVersion,
        random: Random,
        session_id: SessionId,
        cipher_suite: CipherSuite,
        compression_method: CompressionMethod,
    ) -> Result<Self, Error> {
        let hello = ServerHello {
            server_version,
            random,
            session_id,
            cipher_suite,
            compression_method,
        };
        hello.check_random()?;
        Ok(hello)
    }

    /// Only the legacy client greeting may carry a short random.
    fn check_random(&self) -> Result<(), Error> {
        if self.random.len() != Random::LEN {
            debug!("ServerHello random of {} bytes", self.random.len());
            return Err(Error::Encoding("ServerHello: random must be 32 bytes"));
        }
        Ok(())
    }

    /// Answer `client_hello` with a suite and compression method chosen by
    /// `policy`, given the kinds of keys found in `certs`.
    pub fn negotiate<C: CertificateInfo>(
        rng: &mut (impl SecureRandom + ?Sized),
        policy: &(impl Policy + ?Sized),
        certs: &[C],
        client_hello: &ClientHello,
        session_id: SessionId,
        version: ProtocolVersion,
    ) -> Result<Self, Error> {
        let have_rsa = certs.iter().any(|c| c.public_key_algorithm() == "RSA");
        let have_dsa = certs.iter().any(|c| c.public_key_algorithm() == "DSA");

        let cipher_suite = policy
            .choose_suite(&client_hello.cipher_suites, have_rsa, have_dsa)
            .filter(|s| s.as_u16() != 0 && client_hello.offered(*s))
            .ok_or_else(|| {
                debug!(
                    "No suite among {:?} (rsa: {}, dsa: {})",
                    client_hello.cipher_suites, have_rsa, have_dsa
                );
                Error::protocol(AlertDescription::HandshakeFailure, NO_SHARED_SUITE)
            })?;

        let compression_method = policy.choose_compression(&client_hello.compression_methods);

        debug!(
            "Negotiated {:?} with {:?} for {:?}",
            cipher_suite, compression_method, version
        );

        ServerHello::new(
            version,
            Random::new(rng)?,
            session_id,
            cipher_suite,
            compression_method,
        )
    }

    /// A hello for a selection made earlier, such as a resumed session.
    pub fn resume(
        rng: &mut (impl SecureRandom + ?Sized),
        session_id: SessionId,
        cipher_suite: CipherSuite,
        compression_method: CompressionMethod,
        version: ProtocolVersion,
    ) -> Result<Self, Error> {
        ServerHello::new(
            version,
            Random::new(rng)?,
            session_id,
            cipher_suite,
            compression_method,
        )
    }

    /// Frame and send this hello, recording it in the transcript.
    pub fn send<W: RecordWriter + ?Sized>(
        &self,
        transcript: &mut Transcript,
        writer: &mut W,
    ) -> Result<(), Error> {
        self.check_random()?;

        let mut body = Vec::new();
        self.serialize(&mut body);
        envelope::send(
            MessageType::ServerHello,
            &body,
            Inclusion::Authenticated,
            transcript,
            writer,
        )
    }

    /// Anything after the compression method, such as extensions, is
    /// ignored.
    pub fn parse(input: &[u8]) -> Result<ServerHello, Error> {
        if input.len() < MIN_LEN {
            debug!("ServerHello of {} bytes is too short", input.len());
            return Err(Error::Decoding("ServerHello: packet corrupted"));
        }

        let mut reader = FieldReader::new(input);

        let server_version = ProtocolVersion::from_u16(reader.read_u16()?);
        if !server_version.is_supported() {
            debug!("Server answered with {:?}", server_version);
            return Err(Error::protocol(
                AlertDescription::ProtocolVersion,
                "ServerHello: unsupported server version",
            ));
        }

        let random = Random::read_fixed(&mut reader)?;
        let session_id = SessionId::read(&mut reader)?;
        let cipher_suite = CipherSuite::from_u16(reader.read_u16()?);
        let compression_method = CompressionMethod::from_u8(reader.read_byte()?);

        if reader.has_remaining() {
            trace!("Ignore {} trailing ServerHello bytes", reader.remaining_len());
        }

        Ok(ServerHello {
            server_version,
            random,
            session_id,
            cipher_suite,
            compression_method,
        })
    }

    pub fn serialize(&self, output: &mut Vec<u8>) {
        self.server_version.serialize(output);
        self.random.serialize_fixed(output);
        self.session_id.serialize(output);
        output.extend_from_slice(&self.cipher_suite.as_u16().to_be_bytes());
        output.push(self.compression_method.as_u8());
    }
}

#[cfg(test)]
mod tests {
    use tinyvec::tiny_vec;

    use super::*;
    use crate::message::{CipherSuiteVec, CompressionMethodVec, ContentType};
    use crate::rng::SeededRng;
    use crate::Config;

    const MESSAGE: &[u8] = &[
        0x03, 0x02, // ProtocolVersion::TLS1_1
        // Random
        0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
        0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, 0x1C, 0x1D, 0x1E,
        0x1F, 0x20, //
        0x02, // SessionId length
        0xAA, 0xBB, // SessionId
        0x00, 0x35, // CipherSuite::RSA_WITH_AES_256_CBC_SHA
        0x00, // CompressionMethod::Null
    ];

    fn client_hello(suites: CipherSuiteVec, compression: CompressionMethodVec) -> ClientHello {
        let random = Random::try_new(&[0x11; 32]).unwrap();
        ClientHello::new(
            ProtocolVersion::TLS1_0,
            random,
            SessionId::empty(),
            suites,
            compression,
        )
        .unwrap()
    }

    #[test]
    fn roundtrip() {
        let server_hello = ServerHello::new(
            ProtocolVersion::TLS1_1,
            Random::try_new(&MESSAGE[2..34]).unwrap(),
            SessionId::try_new(&[0xAA, 0xBB]).unwrap(),
            CipherSuite::RSA_WITH_AES_256_CBC_SHA,
            CompressionMethod::Null,
        )
        .unwrap();

        let mut serialized = Vec::new();
        server_hello.serialize(&mut serialized);
        assert_eq!(serialized, MESSAGE);

        let parsed = ServerHello::parse(&serialized).unwrap();
        assert_eq!(parsed, server_hello);
    }

    #[test]
    fn short_random_is_rejected() {
        let short = Random::try_new(&MESSAGE[2..18]).unwrap();
        let result = ServerHello::new(
            ProtocolVersion::TLS1_0,
            short,
            SessionId::empty(),
            CipherSuite::RSA_WITH_AES_128_CBC_SHA,
            CompressionMethod::Null,
        );
        assert_eq!(
            result,
            Err(Error::Encoding("ServerHello: random must be 32 bytes"))
        );

        let mut server_hello = ServerHello::parse(MESSAGE).unwrap();
        server_hello.random = short;
        let mut transcript = Transcript::new();
        let mut records: Vec<(ContentType, Vec<u8>)> = Vec::new();
        assert!(matches!(
            server_hello.send(&mut transcript, &mut records),
            Err(Error::Encoding(_))
        ));
        assert!(records.is_empty());
        assert!(transcript.is_empty());
    }

    #[test]
    fn too_short() {
        let message = &MESSAGE[..MIN_LEN - 1];
        assert_eq!(
            ServerHello::parse(message),
            Err(Error::Decoding("ServerHello: packet corrupted"))
        );
    }

    #[test]
    fn minimum_length_with_empty_session() {
        let mut message = MESSAGE[..34].to_vec();
        message.push(0x00);
        message.extend_from_slice(&[0x00, 0x2F, 0x00]);
        assert_eq!(message.len(), 38);

        let parsed = ServerHello::parse(&message).unwrap();
        assert!(parsed.session_id.is_empty());
        assert_eq!(parsed.cipher_suite, CipherSuite::RSA_WITH_AES_128_CBC_SHA);
    }

    #[test]
    fn unsupported_version() {
        let mut message = MESSAGE.to_vec();
        message[1] = 0x03; // TLS 1.2

        let err = ServerHello::parse(&message).unwrap_err();
        assert_eq!(err.alert(), AlertDescription::ProtocolVersion);

        message[0] = 0x02;
        message[1] = 0x00; // SSLv2
        assert!(ServerHello::parse(&message).is_err());
    }

    #[test]
    fn known_versions() {
        for version in [0x0300u16, 0x0301, 0x0302] {
            let mut message = MESSAGE.to_vec();
            message[..2].copy_from_slice(&version.to_be_bytes());
            let parsed = ServerHello::parse(&message).unwrap();
            assert_eq!(parsed.server_version.as_u16(), version);
        }
    }

    #[test]
    fn trailing_bytes_ignored() {
        let mut message = MESSAGE.to_vec();
        message.extend_from_slice(&[0x00, 0x04, 0xFF, 0x01, 0x00, 0x00]);

        let parsed = ServerHello::parse(&message).unwrap();
        assert_eq!(parsed.cipher_suite, CipherSuite::RSA_WITH_AES_256_CBC_SHA);
    }

    #[test]
    fn session_id_too_long() {
        let mut message = MESSAGE[..34].to_vec();
        message.push(33);
        message.extend_from_slice(&[0x00; 36]);
        assert!(ServerHello::parse(&message).is_err());
    }

    #[test]
    fn negotiate_with_rsa() {
        let config = Config::default();
        let mut rng = SeededRng::new(Some(9));
        let hello = client_hello(
            tiny_vec![[CipherSuite; 32] =>
                CipherSuite::DHE_DSS_WITH_AES_128_CBC_SHA,
                CipherSuite::RSA_WITH_AES_128_CBC_SHA
            ],
            tiny_vec![[CompressionMethod; 4] => CompressionMethod::Deflate, CompressionMethod::Null],
        );

        let server_hello = ServerHello::negotiate(
            &mut rng,
            &config,
            &["RSA"],
            &hello,
            SessionId::try_new(&[0x01; 32]).unwrap(),
            ProtocolVersion::TLS1_0,
        )
        .unwrap();

        assert_eq!(
            server_hello.cipher_suite,
            CipherSuite::RSA_WITH_AES_128_CBC_SHA
        );
        assert_eq!(server_hello.compression_method, CompressionMethod::Null);
        assert_eq!(server_hello.server_version, ProtocolVersion::TLS1_0);
        assert_eq!(server_hello.session_id.len(), 32);
        assert_eq!(server_hello.random.len(), Random::LEN);
    }

    #[test]
    fn negotiate_with_dsa() {
        let config = Config::default();
        let mut rng = SeededRng::new(Some(9));
        let hello = client_hello(
            tiny_vec![[CipherSuite; 32] =>
                CipherSuite::RSA_WITH_AES_128_CBC_SHA,
                CipherSuite::DHE_DSS_WITH_AES_128_CBC_SHA
            ],
            tiny_vec![[CompressionMethod; 4] => CompressionMethod::Null],
        );

        let server_hello = ServerHello::negotiate(
            &mut rng,
            &config,
            &["DSA"],
            &hello,
            SessionId::empty(),
            ProtocolVersion::TLS1_0,
        )
        .unwrap();

        assert_eq!(
            server_hello.cipher_suite,
            CipherSuite::DHE_DSS_WITH_AES_128_CBC_SHA
        );
    }

    #[test]
    fn negotiate_without_shared_suite() {
        let config = Config::default();
        let mut rng = SeededRng::new(Some(9));
        let hello = client_hello(
            tiny_vec![[CipherSuite; 32] => CipherSuite::Unknown(0xC02F)],
            tiny_vec![[CompressionMethod; 4] => CompressionMethod::Null],
        );

        let err = ServerHello::negotiate(
            &mut rng,
            &config,
            &["RSA", "DSA"],
            &hello,
            SessionId::empty(),
            ProtocolVersion::TLS1_0,
        )
        .unwrap_err();

        assert_eq!(
            err,
            Error::protocol(AlertDescription::HandshakeFailure, NO_SHARED_SUITE)
        );
    }

    #[test]
    fn negotiate_without_matching_key() {
        let config = Config::default();
        let mut rng = SeededRng::new(Some(9));
        let hello = client_hello(
            tiny_vec![[CipherSuite; 32] => CipherSuite::RSA_WITH_AES_128_CBC_SHA],
            tiny_vec![[CompressionMethod; 4] => CompressionMethod::Null],
        );

        let certs: [&str; 0] = [];
        let err = ServerHello::negotiate(
            &mut rng,
            &config,
            &certs,
            &hello,
            SessionId::empty(),
            ProtocolVersion::TLS1_0,
        )
        .unwrap_err();

        assert_eq!(err.alert(), AlertDescription::HandshakeFailure);
    }

    /// A policy that always answers with the same suite.
    struct Fixed(CipherSuite);

    impl Policy for Fixed {
        fn ciphersuites(&self) -> CipherSuiteVec {
            tiny_vec![[CipherSuite; 32] => self.0]
        }

        fn compression(&self) -> CompressionMethodVec {
            tiny_vec![[CompressionMethod; 4] => CompressionMethod::Null]
        }

        fn pref_version(&self) -> ProtocolVersion {
            ProtocolVersion::TLS1_0
        }

        fn choose_suite(&self, _: &[CipherSuite], _: bool, _: bool) -> Option<CipherSuite> {
            Some(self.0)
        }

        fn choose_compression(&self, _: &[CompressionMethod]) -> CompressionMethod {
            CompressionMethod::Null
        }
    }

    #[test]
    fn negotiate_rejects_unoffered_choice() {
        let mut rng = SeededRng::new(Some(9));
        let hello = client_hello(
            tiny_vec![[CipherSuite; 32] => CipherSuite::RSA_WITH_AES_128_CBC_SHA],
            tiny_vec![[CompressionMethod; 4] => CompressionMethod::Null],
        );

        let err = ServerHello::negotiate(
            &mut rng,
            &Fixed(CipherSuite::RSA_WITH_RC4_128_MD5),
            &["RSA"],
            &hello,
            SessionId::empty(),
            ProtocolVersion::TLS1_0,
        )
        .unwrap_err();

        assert_eq!(err.alert(), AlertDescription::HandshakeFailure);
    }

    #[test]
    fn negotiate_rejects_offered_null_suite() {
        let mut rng = SeededRng::new(Some(9));
        let null_suite = CipherSuite::from_u16(0x0000);
        let hello = client_hello(
            tiny_vec![[CipherSuite; 32] => null_suite, CipherSuite::RSA_WITH_AES_128_CBC_SHA],
            tiny_vec![[CompressionMethod; 4] => CompressionMethod::Null],
        );
        assert!(hello.offered(null_suite));

        let err = ServerHello::negotiate(
            &mut rng,
            &Fixed(null_suite),
            &["RSA"],
            &hello,
            SessionId::empty(),
            ProtocolVersion::TLS1_0,
        )
        .unwrap_err();

        assert_eq!(
            err,
            Error::protocol(AlertDescription::HandshakeFailure, NO_SHARED_SUITE)
        );
    }

    #[test]
    fn negotiate_rejects_null_suite_from_legacy_hello() {
        const LEGACY: &[u8] = &[
            0x01, // Client hello
            0x03, 0x00, // ProtocolVersion::SSLv3
            0x00, 0x06, // Cipher spec length
            0x00, 0x00, // Session id length
            0x00, 0x10, // Challenge length
            0x00, 0x00, 0x00, // Null suite
            0x00, 0x00, 0x04, // RSA_WITH_RC4_128_MD5
            // Challenge
            0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x3B, 0x3C, 0x3D,
            0x3E, 0x3F,
        ];

        let mut rng = SeededRng::new(Some(9));
        let hello = ClientHello::parse_legacy(LEGACY).unwrap();
        assert_eq!(hello.cipher_suites[0].as_u16(), 0x0000);

        let err = ServerHello::negotiate(
            &mut rng,
            &Fixed(hello.cipher_suites[0]),
            &["RSA"],
            &hello,
            SessionId::empty(),
            ProtocolVersion::SSLv3,
        )
        .unwrap_err();
        assert_eq!(err.alert(), AlertDescription::HandshakeFailure);

        // The real suite next to it still negotiates.
        let server_hello = ServerHello::negotiate(
            &mut rng,
            &Fixed(CipherSuite::RSA_WITH_RC4_128_MD5),
            &["RSA"],
            &hello,
            SessionId::empty(),
            ProtocolVersion::SSLv3,
        )
        .unwrap();
        assert_eq!(server_hello.cipher_suite, CipherSuite::RSA_WITH_RC4_128_MD5);
    }

    #[test]
    fn resume_and_send() {
        let mut rng = SeededRng::new(Some(5));
        let session_id = SessionId::try_new(&[0x42; 16]).unwrap();

        let server_hello = ServerHello::resume(
            &mut rng,
            session_id,
            CipherSuite::RSA_WITH_3DES_EDE_CBC_SHA,
            CompressionMethod::Null,
            ProtocolVersion::SSLv3,
        )
        .unwrap();

        let mut transcript = Transcript::new();
        let mut records: Vec<(ContentType, Vec<u8>)> = Vec::new();
        server_hello.send(&mut transcript, &mut records).unwrap();

        let wire = &records[0].1;
        assert_eq!(wire[0], MessageType::ServerHello.as_u8());
        assert_eq!(&wire[1..4], &[0x00, 0x00, 38 + 16]);
        assert_eq!(transcript.as_bytes(), &wire[..]);

        let parsed = ServerHello::parse(&wire[4..]).unwrap();
        assert_eq!(parsed, server_hello);
        assert_eq!(parsed.session_id, session_id);
    }
}
