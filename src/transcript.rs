//! Running record of the handshake.
//!
//! Every handshake message that is authenticated by the Finished exchange
//! is appended here, exactly as framed on the wire, in the order it was
//! sent or received.

use md5::{Digest, Md5};
use sha1::Sha1;
use zeroize::{Zeroize, Zeroizing};

use crate::message::MessageType;

const PAD_INNER: u8 = 0x36;
const PAD_OUTER: u8 = 0x5C;

/// Pad length for MD5 in the SSLv3 construction.
const MD5_PAD_LEN: usize = 48;

/// Pad length for SHA-1 in the SSLv3 construction.
const SHA1_PAD_LEN: usize = 40;

/// Length of the output of both finalize operations.
pub const TRANSCRIPT_HASH_LEN: usize = 16 + 20;

/// Append-only accumulator of handshake bytes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transcript {
    data: Vec<u8>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append already framed handshake bytes.
    pub fn update(&mut self, bytes: &[u8]) {
        trace!("Transcript append {} bytes", bytes.len());
        self.data.extend_from_slice(bytes);
    }

    /// Append a received message body, framed as its sender framed it.
    pub fn update_message(&mut self, msg_type: MessageType, body: &[u8]) {
        trace!(
            "Transcript append {:?} with {} byte body",
            msg_type,
            body.len()
        );
        self.data.push(msg_type.as_u8());
        self.data
            .extend_from_slice(&(body.len() as u32).to_be_bytes()[1..]);
        self.data.extend_from_slice(body);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// MD5 followed by SHA-1 over everything appended so far.
    pub fn finalize(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(TRANSCRIPT_HASH_LEN);
        output.extend_from_slice(&Md5::digest(&self.data));
        output.extend_from_slice(&Sha1::digest(&self.data));
        output
    }

    /// The SSLv3 pad based construction keyed with `secret`.
    ///
    /// Each digest computes `H(secret ++ pad_outer ++ H(transcript ++ secret ++ pad_inner))`
    /// with 48 pad bytes for MD5 and 40 for SHA-1. The MD5 result comes first.
    pub fn finalize_ssl3(&self, secret: &[u8]) -> Zeroizing<Vec<u8>> {
        let md5 = ssl3_digest::<Md5>(&self.data, secret, MD5_PAD_LEN);
        let sha1 = ssl3_digest::<Sha1>(&self.data, secret, SHA1_PAD_LEN);

        let mut output = Zeroizing::new(Vec::with_capacity(TRANSCRIPT_HASH_LEN));
        output.extend_from_slice(&md5);
        output.extend_from_slice(&sha1);
        output
    }
}

fn ssl3_digest<D: Digest>(data: &[u8], secret: &[u8], pad_len: usize) -> Zeroizing<Vec<u8>> {
    let mut inner = D::new();
    inner.update(data);
    inner.update(secret);
    inner.update(&[PAD_INNER; MD5_PAD_LEN][..pad_len]);
    let mut inner_hash = inner.finalize();

    let mut outer = D::new();
    outer.update(secret);
    outer.update(&[PAD_OUTER; MD5_PAD_LEN][..pad_len]);
    outer.update(&inner_hash);
    inner_hash.as_mut_slice().zeroize();

    Zeroizing::new(outer.finalize().to_vec())
}
