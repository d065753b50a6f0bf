use std::fmt;

use thiserror::Error;

/// Errors produced while building, sending or decoding handshake messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed, truncated or size-inconsistent input.
    #[error("Decoding error: {0}")]
    Decoding(&'static str),

    /// Input that parsed but is not acceptable to the protocol.
    #[error("Protocol error ({alert}): {reason}")]
    Protocol {
        alert: AlertDescription,
        reason: &'static str,
    },

    /// A message that cannot be put on the wire as built.
    #[error("Encoding error: {0}")]
    Encoding(&'static str),

    #[error("Random source failed: {0}")]
    Random(String),

    #[error("Failed to send record: {0}")]
    Send(String),

    #[error("Invalid configuration: {0}")]
    Config(&'static str),
}

impl Error {
    pub(crate) fn protocol(alert: AlertDescription, reason: &'static str) -> Self {
        Error::Protocol { alert, reason }
    }

    /// The alert to signal to the peer for this error.
    pub fn alert(&self) -> AlertDescription {
        match self {
            Error::Decoding(_) => AlertDescription::DecodeError,
            Error::Protocol { alert, .. } => *alert,
            Error::Encoding(_) | Error::Random(_) | Error::Send(_) | Error::Config(_) => {
                AlertDescription::InternalError
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDescription {
    CloseNotify,
    UnexpectedMessage,
    BadRecordMac,
    RecordOverflow,
    DecompressionFailure,
    HandshakeFailure,
    NoCertificate,
    BadCertificate,
    UnsupportedCertificate,
    CertificateRevoked,
    CertificateExpired,
    CertificateUnknown,
    IllegalParameter,
    UnknownCa,
    AccessDenied,
    DecodeError,
    DecryptError,
    ExportRestriction,
    ProtocolVersion,
    InsufficientSecurity,
    InternalError,
    UserCanceled,
    NoRenegotiation,
    UnsupportedExtension,
    UnrecognizedName,
    UnknownPskIdentity,
    Unknown(u8),
}

impl AlertDescription {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => AlertDescription::CloseNotify,
            10 => AlertDescription::UnexpectedMessage,
            20 => AlertDescription::BadRecordMac,
            22 => AlertDescription::RecordOverflow,
            30 => AlertDescription::DecompressionFailure,
            40 => AlertDescription::HandshakeFailure,
            41 => AlertDescription::NoCertificate,
            42 => AlertDescription::BadCertificate,
            43 => AlertDescription::UnsupportedCertificate,
            44 => AlertDescription::CertificateRevoked,
            45 => AlertDescription::CertificateExpired,
            46 => AlertDescription::CertificateUnknown,
            47 => AlertDescription::IllegalParameter,
            48 => AlertDescription::UnknownCa,
            49 => AlertDescription::AccessDenied,
            50 => AlertDescription::DecodeError,
            51 => AlertDescription::DecryptError,
            60 => AlertDescription::ExportRestriction,
            70 => AlertDescription::ProtocolVersion,
            71 => AlertDescription::InsufficientSecurity,
            80 => AlertDescription::InternalError,
            90 => AlertDescription::UserCanceled,
            100 => AlertDescription::NoRenegotiation,
            110 => AlertDescription::UnsupportedExtension,
            112 => AlertDescription::UnrecognizedName,
            115 => AlertDescription::UnknownPskIdentity,
            _ => AlertDescription::Unknown(value),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            AlertDescription::CloseNotify => 0,
            AlertDescription::UnexpectedMessage => 10,
            AlertDescription::BadRecordMac => 20,
            AlertDescription::RecordOverflow => 22,
            AlertDescription::DecompressionFailure => 30,
            AlertDescription::HandshakeFailure => 40,
            AlertDescription::NoCertificate => 41,
            AlertDescription::BadCertificate => 42,
            AlertDescription::UnsupportedCertificate => 43,
            AlertDescription::CertificateRevoked => 44,
            AlertDescription::CertificateExpired => 45,
            AlertDescription::CertificateUnknown => 46,
            AlertDescription::IllegalParameter => 47,
            AlertDescription::UnknownCa => 48,
            AlertDescription::AccessDenied => 49,
            AlertDescription::DecodeError => 50,
            AlertDescription::DecryptError => 51,
            AlertDescription::ExportRestriction => 60,
            AlertDescription::ProtocolVersion => 70,
            AlertDescription::InsufficientSecurity => 71,
            AlertDescription::InternalError => 80,
            AlertDescription::UserCanceled => 90,
            AlertDescription::NoRenegotiation => 100,
            AlertDescription::UnsupportedExtension => 110,
            AlertDescription::UnrecognizedName => 112,
            AlertDescription::UnknownPskIdentity => 115,
            AlertDescription::Unknown(value) => *value,
        }
    }
}

impl fmt::Display for AlertDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertDescription::Unknown(v) => write!(f, "alert {}", v),
            _ => write!(f, "{:?}", self),
        }
    }
}
