use super::FieldReader;
use crate::Error;

/// Name type for a DNS host name in the server name list.
const NAME_TYPE_HOST_NAME: u8 = 0;

/// A hello extension as far as this layer understands it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extension {
    /// Requested host name as sent. `None` when the list held no DNS entry.
    ServerName(Option<Vec<u8>>),
    /// Requested SRP identity as sent.
    SrpIdentifier(Vec<u8>),
    /// Anything else, skipped over.
    Unknown {
        extension_type: ExtensionType,
        length: u16,
    },
}

impl Extension {
    /// Parse one extension: `type(2) | length(2) | payload`.
    ///
    /// The payload of a recognised extension must be consumed exactly.
    pub fn parse(reader: &mut FieldReader<'_>) -> Result<Extension, Error> {
        let extension_type = ExtensionType::from_u16(reader.read_u16()?);
        let length = reader.read_u16()?;
        let payload = reader.read_fixed(length as usize)?;
        let mut payload = FieldReader::new(payload);

        let extension = match extension_type {
            ExtensionType::ServerName => Extension::ServerName(parse_server_name(&mut payload)?),
            ExtensionType::Srp => {
                let id = payload.read_length_prefixed(1, 1, 255)?;
                Extension::SrpIdentifier(id.to_vec())
            }
            _ => {
                trace!("Skip extension {:?} ({} bytes)", extension_type, length);
                return Ok(Extension::Unknown {
                    extension_type,
                    length,
                });
            }
        };

        if payload.has_remaining() {
            debug!("Trailing bytes in {:?} extension", extension_type);
            return Err(Error::Decoding("ClientHello: bad extension payload"));
        }

        Ok(extension)
    }
}

/// `list_len(2)` then entries of `name_type(1)`. A host name entry is
/// followed by `name_len(2) + name`. Any other entry type ends the list.
fn parse_server_name(reader: &mut FieldReader<'_>) -> Result<Option<Vec<u8>>, Error> {
    let mut name_bytes = reader.read_u16()? as usize;
    let mut host_name = None;

    while name_bytes > 0 {
        let name_type = reader.read_byte()?;
        name_bytes -= 1;

        if name_type == NAME_TYPE_HOST_NAME {
            let name = reader.read_length_prefixed(2, 1, 65535)?;
            host_name = Some(name.to_vec());

            name_bytes = name_bytes
                .checked_sub(2 + name.len())
                .ok_or(Error::Decoding("ClientHello: bad server name list length"))?;
        } else {
            reader.skip(name_bytes)?;
            name_bytes = 0;
        }
    }

    Ok(host_name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionType {
    ServerName,
    MaxFragmentLength,
    ClientCertificateUrl,
    TrustedCaKeys,
    TruncatedHmac,
    StatusRequest,
    SupportedGroups,
    EcPointFormats,
    Srp,
    SignatureAlgorithms,
    SessionTicket,
    RenegotiationInfo,
    Unknown(u16),
}

impl ExtensionType {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0000 => ExtensionType::ServerName,
            0x0001 => ExtensionType::MaxFragmentLength,
            0x0002 => ExtensionType::ClientCertificateUrl,
            0x0003 => ExtensionType::TrustedCaKeys,
            0x0004 => ExtensionType::TruncatedHmac,
            0x0005 => ExtensionType::StatusRequest,
            0x000A => ExtensionType::SupportedGroups,
            0x000B => ExtensionType::EcPointFormats,
            0x000C => ExtensionType::Srp,
            0x000D => ExtensionType::SignatureAlgorithms,
            0x0023 => ExtensionType::SessionTicket,
            0xFF01 => ExtensionType::RenegotiationInfo,
            _ => ExtensionType::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            ExtensionType::ServerName => 0x0000,
            ExtensionType::MaxFragmentLength => 0x0001,
            ExtensionType::ClientCertificateUrl => 0x0002,
            ExtensionType::TrustedCaKeys => 0x0003,
            ExtensionType::TruncatedHmac => 0x0004,
            ExtensionType::StatusRequest => 0x0005,
            ExtensionType::SupportedGroups => 0x000A,
            ExtensionType::EcPointFormats => 0x000B,
            ExtensionType::Srp => 0x000C,
            ExtensionType::SignatureAlgorithms => 0x000D,
            ExtensionType::SessionTicket => 0x0023,
            ExtensionType::RenegotiationInfo => 0xFF01,
            ExtensionType::Unknown(value) => *value,
        }
    }
}
