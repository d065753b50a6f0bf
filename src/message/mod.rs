//! Hello message parsing and serialization.
//!
//! This module holds the wire-level types shared by the Hello messages
//! (versions, cipher suites, compression methods) together with the
//! messages themselves and the envelope that frames them for sending.

mod client_hello;
mod envelope;
mod extension;
mod handshake;
mod id;
mod reader;
mod server_hello;

pub use client_hello::ClientHello;
pub(crate) use client_hello::{MAX_COMPRESSION, MAX_SUITES};
pub use envelope::{encode, send, Inclusion};
pub use extension::{Extension, ExtensionType};
pub use handshake::{Handshake, HandshakeMessage, Header, MessageType};
pub use id::{InvalidLength, Random, SessionId};
pub use reader::{Field, FieldReader};
pub use server_hello::ServerHello;

use nom::number::complete::{be_u16, be_u8};
use nom::IResult;
use tinyvec::TinyVec;

pub type CipherSuiteVec = TinyVec<[CipherSuite; 32]>;
pub type CompressionMethodVec = TinyVec<[CompressionMethod; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    SSLv3,
    TLS1_0,
    TLS1_1,
    Unknown(u16),
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::Unknown(0)
    }
}

impl ProtocolVersion {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0300 => ProtocolVersion::SSLv3,
            0x0301 => ProtocolVersion::TLS1_0,
            0x0302 => ProtocolVersion::TLS1_1,
            _ => ProtocolVersion::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            ProtocolVersion::SSLv3 => 0x0300,
            ProtocolVersion::TLS1_0 => 0x0301,
            ProtocolVersion::TLS1_1 => 0x0302,
            ProtocolVersion::Unknown(value) => *value,
        }
    }

    /// Whether a server may answer with this version.
    pub fn is_supported(&self) -> bool {
        !matches!(self, ProtocolVersion::Unknown(_))
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], ProtocolVersion> {
        let (input, version) = be_u16(input)?;
        Ok((input, ProtocolVersion::from_u16(version)))
    }

    pub fn serialize(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&self.as_u16().to_be_bytes());
    }
}

/// How the server proves its identity for a cipher suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authentication {
    Rsa,
    Dss,
    Anonymous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyExchangeAlgorithm {
    Rsa,
    Dhe,
    DhAnon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum CipherSuite {
    RSA_WITH_RC4_128_MD5,           // 0x0004
    RSA_WITH_RC4_128_SHA,           // 0x0005
    RSA_WITH_3DES_EDE_CBC_SHA,      // 0x000A
    DHE_DSS_WITH_3DES_EDE_CBC_SHA,  // 0x0013
    DHE_RSA_WITH_3DES_EDE_CBC_SHA,  // 0x0016
    RSA_WITH_AES_128_CBC_SHA,       // 0x002F
    DHE_DSS_WITH_AES_128_CBC_SHA,   // 0x0032
    DHE_RSA_WITH_AES_128_CBC_SHA,   // 0x0033
    DH_ANON_WITH_AES_128_CBC_SHA,   // 0x0034
    RSA_WITH_AES_256_CBC_SHA,       // 0x0035
    DHE_DSS_WITH_AES_256_CBC_SHA,   // 0x0038
    DHE_RSA_WITH_AES_256_CBC_SHA,   // 0x0039
    DH_ANON_WITH_AES_256_CBC_SHA,   // 0x003A
    Unknown(u16),
}

impl Default for CipherSuite {
    fn default() -> Self {
        Self::Unknown(0)
    }
}

impl CipherSuite {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0004 => CipherSuite::RSA_WITH_RC4_128_MD5,
            0x0005 => CipherSuite::RSA_WITH_RC4_128_SHA,
            0x000A => CipherSuite::RSA_WITH_3DES_EDE_CBC_SHA,
            0x0013 => CipherSuite::DHE_DSS_WITH_3DES_EDE_CBC_SHA,
            0x0016 => CipherSuite::DHE_RSA_WITH_3DES_EDE_CBC_SHA,
            0x002F => CipherSuite::RSA_WITH_AES_128_CBC_SHA,
            0x0032 => CipherSuite::DHE_DSS_WITH_AES_128_CBC_SHA,
            0x0033 => CipherSuite::DHE_RSA_WITH_AES_128_CBC_SHA,
            0x0034 => CipherSuite::DH_ANON_WITH_AES_128_CBC_SHA,
            0x0035 => CipherSuite::RSA_WITH_AES_256_CBC_SHA,
            0x0038 => CipherSuite::DHE_DSS_WITH_AES_256_CBC_SHA,
            0x0039 => CipherSuite::DHE_RSA_WITH_AES_256_CBC_SHA,
            0x003A => CipherSuite::DH_ANON_WITH_AES_256_CBC_SHA,
            _ => CipherSuite::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CipherSuite::RSA_WITH_RC4_128_MD5 => 0x0004,
            CipherSuite::RSA_WITH_RC4_128_SHA => 0x0005,
            CipherSuite::RSA_WITH_3DES_EDE_CBC_SHA => 0x000A,
            CipherSuite::DHE_DSS_WITH_3DES_EDE_CBC_SHA => 0x0013,
            CipherSuite::DHE_RSA_WITH_3DES_EDE_CBC_SHA => 0x0016,
            CipherSuite::RSA_WITH_AES_128_CBC_SHA => 0x002F,
            CipherSuite::DHE_DSS_WITH_AES_128_CBC_SHA => 0x0032,
            CipherSuite::DHE_RSA_WITH_AES_128_CBC_SHA => 0x0033,
            CipherSuite::DH_ANON_WITH_AES_128_CBC_SHA => 0x0034,
            CipherSuite::RSA_WITH_AES_256_CBC_SHA => 0x0035,
            CipherSuite::DHE_DSS_WITH_AES_256_CBC_SHA => 0x0038,
            CipherSuite::DHE_RSA_WITH_AES_256_CBC_SHA => 0x0039,
            CipherSuite::DH_ANON_WITH_AES_256_CBC_SHA => 0x003A,
            CipherSuite::Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], CipherSuite> {
        let (input, value) = be_u16(input)?;
        Ok((input, CipherSuite::from_u16(value)))
    }

    /// The key exchange family, `None` for suites we do not know.
    pub fn key_exchange(&self) -> Option<KeyExchangeAlgorithm> {
        use CipherSuite::*;
        match self {
            RSA_WITH_RC4_128_MD5
            | RSA_WITH_RC4_128_SHA
            | RSA_WITH_3DES_EDE_CBC_SHA
            | RSA_WITH_AES_128_CBC_SHA
            | RSA_WITH_AES_256_CBC_SHA => Some(KeyExchangeAlgorithm::Rsa),

            DHE_DSS_WITH_3DES_EDE_CBC_SHA
            | DHE_RSA_WITH_3DES_EDE_CBC_SHA
            | DHE_DSS_WITH_AES_128_CBC_SHA
            | DHE_RSA_WITH_AES_128_CBC_SHA
            | DHE_DSS_WITH_AES_256_CBC_SHA
            | DHE_RSA_WITH_AES_256_CBC_SHA => Some(KeyExchangeAlgorithm::Dhe),

            DH_ANON_WITH_AES_128_CBC_SHA | DH_ANON_WITH_AES_256_CBC_SHA => {
                Some(KeyExchangeAlgorithm::DhAnon)
            }

            Unknown(_) => None,
        }
    }

    /// The kind of server key needed to use this suite.
    pub fn authentication(&self) -> Option<Authentication> {
        use CipherSuite::*;
        match self {
            DHE_DSS_WITH_3DES_EDE_CBC_SHA
            | DHE_DSS_WITH_AES_128_CBC_SHA
            | DHE_DSS_WITH_AES_256_CBC_SHA => Some(Authentication::Dss),

            DH_ANON_WITH_AES_128_CBC_SHA | DH_ANON_WITH_AES_256_CBC_SHA => {
                Some(Authentication::Anonymous)
            }

            Unknown(_) => None,

            _ => Some(Authentication::Rsa),
        }
    }

    /// Every named suite, in preference order.
    pub const fn all() -> &'static [CipherSuite; 13] {
        &[
            CipherSuite::RSA_WITH_AES_256_CBC_SHA,
            CipherSuite::DHE_RSA_WITH_AES_256_CBC_SHA,
            CipherSuite::DHE_DSS_WITH_AES_256_CBC_SHA,
            CipherSuite::RSA_WITH_AES_128_CBC_SHA,
            CipherSuite::DHE_RSA_WITH_AES_128_CBC_SHA,
            CipherSuite::DHE_DSS_WITH_AES_128_CBC_SHA,
            CipherSuite::RSA_WITH_3DES_EDE_CBC_SHA,
            CipherSuite::DHE_RSA_WITH_3DES_EDE_CBC_SHA,
            CipherSuite::DHE_DSS_WITH_3DES_EDE_CBC_SHA,
            CipherSuite::RSA_WITH_RC4_128_SHA,
            CipherSuite::RSA_WITH_RC4_128_MD5,
            CipherSuite::DH_ANON_WITH_AES_256_CBC_SHA,
            CipherSuite::DH_ANON_WITH_AES_128_CBC_SHA,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Null,
    Deflate,
    Unknown(u8),
}

impl Default for CompressionMethod {
    fn default() -> Self {
        Self::Null
    }
}

impl CompressionMethod {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x00 => CompressionMethod::Null,
            0x01 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            CompressionMethod::Null => 0x00,
            CompressionMethod::Deflate => 0x01,
            CompressionMethod::Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], CompressionMethod> {
        let (input, value) = be_u8(input)?;
        Ok((input, CompressionMethod::from_u8(value)))
    }
}

/// Record layer content types, as handed to the record writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    ChangeCipherSpec,
    Alert,
    Handshake,
    ApplicationData,
    Unknown(u8),
}

impl ContentType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            20 => ContentType::ChangeCipherSpec,
            21 => ContentType::Alert,
            22 => ContentType::Handshake,
            23 => ContentType::ApplicationData,
            _ => ContentType::Unknown(value),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            ContentType::ChangeCipherSpec => 20,
            ContentType::Alert => 21,
            ContentType::Handshake => 22,
            ContentType::ApplicationData => 23,
            ContentType::Unknown(value) => *value,
        }
    }
}

impl Field for CipherSuite {
    const WIDTH: usize = 2;

    fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        CipherSuite::parse(input)
    }
}

impl Field for CompressionMethod {
    const WIDTH: usize = 1;

    fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        CompressionMethod::parse(input)
    }
}
