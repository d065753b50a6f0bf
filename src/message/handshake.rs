use super::envelope::{self, Inclusion};
use super::{ClientHello, FieldReader, ServerHello};
use crate::provider::RecordWriter;
use crate::transcript::Transcript;
use crate::Error;

/// Handshake envelope header: `type(1) | length(3)`.
#[derive(Debug, PartialEq, Eq, Default, Clone, Copy)]
pub struct Header {
    pub msg_type: MessageType,
    pub length: u32,
}

impl Header {
    pub const LEN: usize = 4;

    pub fn parse(reader: &mut FieldReader<'_>) -> Result<Header, Error> {
        let msg_type = MessageType::from_u8(reader.read_byte()?);
        let length = reader.read_u24()?;
        Ok(Header { msg_type, length })
    }
}

/// A framed handshake message read off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub header: Header,
    pub message: HandshakeMessage,
}

impl Handshake {
    /// Parse one envelope from `input`, returning the unread rest.
    pub fn parse(input: &[u8]) -> Result<(&[u8], Handshake), Error> {
        let mut reader = FieldReader::new(input);
        let header = Header::parse(&mut reader)?;

        let body = reader.read_fixed(header.length as usize).map_err(|_| {
            debug!(
                "{:?} declares {} bytes, {} available",
                header.msg_type,
                header.length,
                reader.remaining_len()
            );
            Error::Decoding("Handshake: truncated message")
        })?;

        let message = HandshakeMessage::decode(header.msg_type, body)?;

        Ok((reader.remaining(), Handshake { header, message }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    HelloRequest, // empty
    ClientHello,
    ServerHello,
    Certificate,
    ServerKeyExchange,
    CertificateRequest,
    ServerHelloDone, // empty
    CertificateVerify,
    ClientKeyExchange,
    Finished,
    Unknown(u8),
}

impl Default for MessageType {
    fn default() -> Self {
        Self::Unknown(255)
    }
}

impl MessageType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => MessageType::HelloRequest,
            1 => MessageType::ClientHello,
            2 => MessageType::ServerHello,
            11 => MessageType::Certificate,
            12 => MessageType::ServerKeyExchange,
            13 => MessageType::CertificateRequest,
            14 => MessageType::ServerHelloDone,
            15 => MessageType::CertificateVerify,
            16 => MessageType::ClientKeyExchange,
            20 => MessageType::Finished,
            _ => MessageType::Unknown(value),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            MessageType::HelloRequest => 0,
            MessageType::ClientHello => 1,
            MessageType::ServerHello => 2,
            MessageType::Certificate => 11,
            MessageType::ServerKeyExchange => 12,
            MessageType::CertificateRequest => 13,
            MessageType::ServerHelloDone => 14,
            MessageType::CertificateVerify => 15,
            MessageType::ClientKeyExchange => 16,
            MessageType::Finished => 20,
            MessageType::Unknown(value) => *value,
        }
    }
}

/// The Hello messages.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::large_enum_variant)]
pub enum HandshakeMessage {
    HelloRequest, // empty
    ClientHello(ClientHello),
    ServerHello(ServerHello),
    ServerHelloDone, // empty
}

impl HandshakeMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            HandshakeMessage::HelloRequest => MessageType::HelloRequest,
            HandshakeMessage::ClientHello(_) => MessageType::ClientHello,
            HandshakeMessage::ServerHello(_) => MessageType::ServerHello,
            HandshakeMessage::ServerHelloDone => MessageType::ServerHelloDone,
        }
    }

    /// Hello Request is never part of the authenticated transcript.
    pub fn inclusion(&self) -> Inclusion {
        match self {
            HandshakeMessage::HelloRequest => Inclusion::Excluded,
            _ => Inclusion::Authenticated,
        }
    }

    pub fn serialize(&self, output: &mut Vec<u8>) {
        match self {
            HandshakeMessage::HelloRequest | HandshakeMessage::ServerHelloDone => {}
            HandshakeMessage::ClientHello(m) => m.serialize(output),
            HandshakeMessage::ServerHello(m) => m.serialize(output),
        }
    }

    /// Decode a message body of the given type.
    pub fn decode(msg_type: MessageType, body: &[u8]) -> Result<HandshakeMessage, Error> {
        let message = match msg_type {
            MessageType::HelloRequest => {
                expect_empty(body, "HelloRequest: must be empty, and is not")?;
                HandshakeMessage::HelloRequest
            }
            MessageType::ClientHello => HandshakeMessage::ClientHello(ClientHello::parse(body)?),
            MessageType::ServerHello => HandshakeMessage::ServerHello(ServerHello::parse(body)?),
            MessageType::ServerHelloDone => {
                expect_empty(body, "ServerHelloDone: must be empty, and is not")?;
                HandshakeMessage::ServerHelloDone
            }
            _ => {
                debug!("No hello decoder for {:?}", msg_type);
                return Err(Error::Decoding("Handshake: unexpected message type"));
            }
        };
        Ok(message)
    }

    /// Frame and send this message, recording it in the transcript unless
    /// it is a Hello Request.
    pub fn send<W: RecordWriter + ?Sized>(
        &self,
        transcript: &mut Transcript,
        writer: &mut W,
    ) -> Result<(), Error> {
        match self {
            HandshakeMessage::ClientHello(hello) => hello.send(transcript, writer),
            HandshakeMessage::ServerHello(hello) => hello.send(transcript, writer),
            HandshakeMessage::HelloRequest | HandshakeMessage::ServerHelloDone => envelope::send(
                self.message_type(),
                &[],
                self.inclusion(),
                transcript,
                writer,
            ),
        }
    }
}

fn expect_empty(body: &[u8], reason: &'static str) -> Result<(), Error> {
    if !body.is_empty() {
        debug!("Expected empty body, got {} bytes", body.len());
        return Err(Error::Decoding(reason));
    }
    Ok(())
}

impl From<ClientHello> for HandshakeMessage {
    fn from(value: ClientHello) -> Self {
        HandshakeMessage::ClientHello(value)
    }
}

impl From<ServerHello> for HandshakeMessage {
    fn from(value: ServerHello) -> Self {
        HandshakeMessage::ServerHello(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ContentType;

    #[test]
    fn message_type_codes() {
        for v in 0..=255u8 {
            assert_eq!(MessageType::from_u8(v).as_u8(), v);
        }
        assert_eq!(MessageType::from_u8(0), MessageType::HelloRequest);
        assert_eq!(MessageType::from_u8(14), MessageType::ServerHelloDone);
    }

    #[test]
    fn empty_bodies() {
        assert_eq!(
            HandshakeMessage::decode(MessageType::HelloRequest, &[]).unwrap(),
            HandshakeMessage::HelloRequest
        );
        assert_eq!(
            HandshakeMessage::decode(MessageType::ServerHelloDone, &[]).unwrap(),
            HandshakeMessage::ServerHelloDone
        );
    }

    #[test]
    fn non_empty_bodies_fail() {
        let err = HandshakeMessage::decode(MessageType::HelloRequest, &[0x00]).unwrap_err();
        assert!(matches!(err, Error::Decoding(_)));

        let err = HandshakeMessage::decode(MessageType::ServerHelloDone, &[0x01, 0x02]).unwrap_err();
        assert!(matches!(err, Error::Decoding(_)));
    }

    #[test]
    fn other_types_are_rejected() {
        let err = HandshakeMessage::decode(MessageType::Finished, &[0; 12]).unwrap_err();
        assert_eq!(err, Error::Decoding("Handshake: unexpected message type"));
    }

    #[test]
    fn parse_envelope() {
        let input = [0x0E, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF];
        let (rest, hs) = Handshake::parse(&input).unwrap();
        assert_eq!(hs.header.msg_type, MessageType::ServerHelloDone);
        assert_eq!(hs.header.length, 0);
        assert_eq!(hs.message, HandshakeMessage::ServerHelloDone);

        let (rest, hs) = Handshake::parse(rest).unwrap();
        assert_eq!(hs.message, HandshakeMessage::HelloRequest);
        assert_eq!(rest, &[0xFF]);
    }

    #[test]
    fn parse_truncated_envelope() {
        let input = [0x0E, 0x00, 0x00, 0x02, 0x00];
        assert_eq!(
            Handshake::parse(&input),
            Err(Error::Decoding("Handshake: truncated message"))
        );
        assert!(Handshake::parse(&input[..3]).is_err());
    }

    #[test]
    fn hello_request_stays_out_of_transcript() {
        let mut transcript = Transcript::new();
        let mut records: Vec<(ContentType, Vec<u8>)> = Vec::new();

        HandshakeMessage::HelloRequest
            .send(&mut transcript, &mut records)
            .unwrap();
        assert!(transcript.is_empty());

        HandshakeMessage::ServerHelloDone
            .send(&mut transcript, &mut records)
            .unwrap();
        assert_eq!(transcript.as_bytes(), &[0x0E, 0x00, 0x00, 0x00]);

        assert_eq!(records[0].1, &[0x00, 0x00, 0x00, 0x00]);
        assert_eq!(records[1].1, &[0x0E, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn wrapped_hello_is_checked_before_sending() {
        const LEGACY: &[u8] = &[
            0x01, // Client hello
            0x03, 0x01, // ProtocolVersion::TLS1_0
            0x00, 0x03, // Cipher spec length
            0x00, 0x00, // Session id length
            0x00, 0x10, // Challenge length
            0x00, 0x00, 0x2F, // RSA_WITH_AES_128_CBC_SHA
            // Challenge
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D,
            0x0E, 0x0F,
        ];

        // No compression methods, and only 16 bytes of random.
        let hello = ClientHello::parse_legacy(LEGACY).unwrap();

        let mut transcript = Transcript::new();
        let mut records: Vec<(ContentType, Vec<u8>)> = Vec::new();
        let err = HandshakeMessage::ClientHello(hello)
            .send(&mut transcript, &mut records)
            .unwrap_err();

        assert!(matches!(err, Error::Encoding(_)));
        assert!(records.is_empty());
        assert!(transcript.is_empty());
    }
}
