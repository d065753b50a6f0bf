use super::{CipherSuite, CipherSuiteVec, CompressionMethodVec, ProtocolVersion};
use super::envelope::{self, Inclusion};
use super::{Extension, FieldReader, MessageType, Random, SessionId};
use crate::provider::{Policy, RecordWriter, SecureRandom};
use crate::transcript::Transcript;
use crate::Error;

/// version(2) + random(32) + session id length(1) + suites length(2) +
/// one suite(2) + compression length(1) + one method(1).
const MIN_LEN: usize = 41;

/// Largest number of suites a hello can carry.
pub(crate) const MAX_SUITES: usize = 32767;

/// Largest number of compression methods a hello can carry.
pub(crate) const MAX_COMPRESSION: usize = 255;

/// tag(1) + version(2) + three 16 bit lengths.
const LEGACY_HEADER_LEN: usize = 9;
const LEGACY_MIN_LEN: usize = 12;
const LEGACY_CLIENT_HELLO: u8 = 1;
const LEGACY_CORRUPT: Error = Error::Decoding("ClientHello: SSLv2 hello corrupted");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHello {
    pub client_version: ProtocolVersion,
    /// 32 bytes, or 16 to 32 bytes when decoded from the legacy format.
    pub random: Random,
    pub session_id: SessionId,
    pub cipher_suites: CipherSuiteVec,
    pub compression_methods: CompressionMethodVec,
    /// From the server name extension, bytes as sent. Never serialized.
    pub requested_hostname: Option<Vec<u8>>,
    /// From the SRP extension, bytes as sent. Never serialized.
    pub srp_identifier: Option<Vec<u8>>,
}

impl ClientHello {
    /// Build a hello to send.
    ///
    /// Returns `Error::Encoding` unless the random is 32 bytes and there
    /// are 1 to 32767 suites and 1 to 255 compression methods.
    pub fn new(
        client_version: ProtocolVersion,
        random: Random,
        session_id: SessionId,
        cipher_suites: CipherSuiteVec,
        compression_methods: CompressionMethodVec,
    ) -> Result<Self, Error> {
        let hello = ClientHello::from_parts(
            client_version,
            random,
            session_id,
            cipher_suites,
            compression_methods,
        );
        hello.check_lengths()?;
        Ok(hello)
    }

    /// Decoders build through here, the legacy greeting may carry no
    /// compression methods at all.
    fn from_parts(
        client_version: ProtocolVersion,
        random: Random,
        session_id: SessionId,
        cipher_suites: CipherSuiteVec,
        compression_methods: CompressionMethodVec,
    ) -> Self {
        ClientHello {
            client_version,
            random,
            session_id,
            cipher_suites,
            compression_methods,
            requested_hostname: None,
            srp_identifier: None,
        }
    }

    /// A fresh hello offering what the policy allows.
    pub fn generate(
        rng: &mut (impl SecureRandom + ?Sized),
        policy: &(impl Policy + ?Sized),
    ) -> Result<Self, Error> {
        ClientHello::new(
            policy.pref_version(),
            Random::new(rng)?,
            SessionId::empty(),
            policy.ciphersuites(),
            policy.compression(),
        )
    }

    /// Generate a hello and send it through the envelope.
    pub fn send_new<W: RecordWriter + ?Sized>(
        rng: &mut (impl SecureRandom + ?Sized),
        policy: &(impl Policy + ?Sized),
        transcript: &mut Transcript,
        writer: &mut W,
    ) -> Result<Self, Error> {
        let hello = Self::generate(rng, policy)?;
        hello.send(transcript, writer)?;
        Ok(hello)
    }

    /// Frame and send this hello, recording it in the transcript.
    pub fn send<W: RecordWriter + ?Sized>(
        &self,
        transcript: &mut Transcript,
        writer: &mut W,
    ) -> Result<(), Error> {
        self.check_lengths()?;

        let mut body = Vec::new();
        self.serialize(&mut body);
        envelope::send(
            MessageType::ClientHello,
            &body,
            Inclusion::Authenticated,
            transcript,
            writer,
        )
    }

    /// The lists are public, so this is checked again before sending.
    fn check_lengths(&self) -> Result<(), Error> {
        if self.random.len() != Random::LEN {
            debug!("ClientHello random of {} bytes", self.random.len());
            return Err(Error::Encoding("ClientHello: random must be 32 bytes"));
        }

        let suites = self.cipher_suites.len();
        if suites == 0 || suites > MAX_SUITES {
            debug!("ClientHello with {} cipher suites", suites);
            return Err(Error::Encoding("ClientHello: 1 to 32767 cipher suites"));
        }

        let methods = self.compression_methods.len();
        if methods == 0 || methods > MAX_COMPRESSION {
            debug!("ClientHello with {} compression methods", methods);
            return Err(Error::Encoding("ClientHello: 1 to 255 compression methods"));
        }

        Ok(())
    }

    /// Whether the client offered `suite`.
    pub fn offered(&self, suite: CipherSuite) -> bool {
        self.cipher_suites.iter().any(|s| *s == suite)
    }

    pub fn parse(input: &[u8]) -> Result<ClientHello, Error> {
        if input.len() < MIN_LEN {
            debug!("ClientHello of {} bytes is too short", input.len());
            return Err(Error::Decoding("ClientHello: packet corrupted"));
        }

        let mut reader = FieldReader::new(input);

        let client_version = ProtocolVersion::from_u16(reader.read_u16()?);
        let random = Random::read_fixed(&mut reader)?;
        let session_id = SessionId::read(&mut reader)?;
        let cipher_suites = reader.read_length_prefixed_vector(2, 1, MAX_SUITES)?;
        let compression_methods = reader.read_length_prefixed_vector(1, 1, MAX_COMPRESSION)?;

        let mut hello = ClientHello::from_parts(
            client_version,
            random,
            session_id,
            cipher_suites,
            compression_methods,
        );

        if reader.has_remaining() {
            hello.parse_extensions(&mut reader)?;
        }

        Ok(hello)
    }

    /// Parse the `total_len(2)` prefixed extension block, which must run
    /// exactly to the end of the message.
    fn parse_extensions(&mut self, reader: &mut FieldReader<'_>) -> Result<(), Error> {
        let extensions_len = reader.read_u16()? as usize;

        if reader.remaining_len() != extensions_len {
            debug!(
                "Extensions length {} with {} bytes remaining",
                extensions_len,
                reader.remaining_len()
            );
            return Err(Error::Decoding("ClientHello: bad extension size"));
        }

        while reader.has_remaining() {
            match Extension::parse(reader)? {
                Extension::ServerName(Some(name)) => self.requested_hostname = Some(name),
                Extension::ServerName(None) => {}
                Extension::SrpIdentifier(id) => self.srp_identifier = Some(id),
                Extension::Unknown { .. } => {}
            }
        }

        Ok(())
    }

    /// Parse the pre-standard greeting:
    /// `tag(1)=1 | version(2) | cipher_spec_len(2) | session_id_len(2) |
    /// challenge_len(2) | cipher_specs(3 each) | challenge`.
    ///
    /// Only cipher specs with a zero first byte name a suite we can speak,
    /// the rest are dropped. The challenge becomes the random.
    pub fn parse_legacy(input: &[u8]) -> Result<ClientHello, Error> {
        if input.len() < LEGACY_MIN_LEN || input[0] != LEGACY_CLIENT_HELLO {
            debug!("Not a legacy client hello");
            return Err(LEGACY_CORRUPT);
        }

        let mut reader = FieldReader::new(input);
        reader.skip(1)?;

        let client_version = ProtocolVersion::from_u16(reader.read_u16()?);
        let cipher_spec_len = reader.read_u16()? as usize;
        let session_id_len = reader.read_u16()? as usize;
        let challenge_len = reader.read_u16()? as usize;

        let expected = LEGACY_HEADER_LEN + session_id_len + cipher_spec_len + challenge_len;
        if input.len() != expected {
            debug!(
                "Legacy client hello is {} bytes, expected {}",
                input.len(),
                expected
            );
            return Err(LEGACY_CORRUPT);
        }

        if session_id_len != 0
            || cipher_spec_len % 3 != 0
            || !(16..=32).contains(&challenge_len)
        {
            return Err(LEGACY_CORRUPT);
        }

        let cipher_specs = reader.read_fixed(cipher_spec_len)?;
        let cipher_suites = cipher_specs
            .chunks_exact(3)
            .filter(|spec| spec[0] == 0)
            .map(|spec| CipherSuite::from_u16(u16::from_be_bytes([spec[1], spec[2]])))
            .collect();

        let challenge = reader.read_fixed(challenge_len)?;
        let random = Random::try_new(challenge).map_err(|_| LEGACY_CORRUPT)?;

        Ok(ClientHello::from_parts(
            client_version,
            random,
            SessionId::empty(),
            cipher_suites,
            CompressionMethodVec::new(),
        ))
    }

    /// Extensions are not written. Lists beyond their length fields are
    /// caught by `new` and `send`, not here.
    pub fn serialize(&self, output: &mut Vec<u8>) {
        self.client_version.serialize(output);
        self.random.serialize_fixed(output);
        self.session_id.serialize(output);
        output.extend_from_slice(&((self.cipher_suites.len() * 2) as u16).to_be_bytes());
        for suite in self.cipher_suites.iter() {
            output.extend_from_slice(&suite.as_u16().to_be_bytes());
        }
        output.push(self.compression_methods.len() as u8);
        for method in self.compression_methods.iter() {
            output.push(method.as_u8());
        }
    }
}
