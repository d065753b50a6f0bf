use super::{ContentType, MessageType};
use crate::provider::RecordWriter;
use crate::transcript::Transcript;
use crate::Error;

/// Largest body the 3 byte length field can carry.
const MAX_BODY_LEN: usize = 0xFF_FFFF;

/// Whether a sent message becomes part of the authenticated transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    Authenticated,
    Excluded,
}

/// Frame a body as `type(1) | length(3) | body`.
pub fn encode(msg_type: MessageType, body: &[u8]) -> Result<Vec<u8>, Error> {
    if body.len() > MAX_BODY_LEN {
        debug!("{:?} body of {} bytes", msg_type, body.len());
        return Err(Error::Encoding("Handshake: body does not fit the length field"));
    }

    let mut output = Vec::with_capacity(4 + body.len());
    output.push(msg_type.as_u8());
    output.extend_from_slice(&(body.len() as u32).to_be_bytes()[1..]);
    output.extend_from_slice(body);

    Ok(output)
}

/// Frame a body, record it in the transcript and hand it to the writer.
///
/// All outgoing handshake messages go through here so the transcript and
/// the wire always see the same bytes.
pub fn send<W: RecordWriter + ?Sized>(
    msg_type: MessageType,
    body: &[u8],
    inclusion: Inclusion,
    transcript: &mut Transcript,
    writer: &mut W,
) -> Result<(), Error> {
    let envelope = encode(msg_type, body)?;

    if inclusion == Inclusion::Authenticated {
        transcript.update(&envelope);
    }

    trace!(
        "Send {:?} ({} bytes, {:?})",
        msg_type,
        envelope.len(),
        inclusion
    );

    writer.send(ContentType::Handshake, &envelope)?;
    writer.flush()
}
