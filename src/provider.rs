//! Collaborators the hello messages depend on.
//!
//! The handshake layer does not choose cipher suites, generate randomness
//! or write records itself. Those concerns are handed in through the
//! traits below so that the surrounding connection decides how they are
//! done.
//!
//! - [`SecureRandom`]: source of the hello randoms
//! - [`Policy`]: what a client offers and what a server accepts
//! - [`CertificateInfo`]: what kind of key a server certificate holds
//! - [`RecordWriter`]: hands framed handshake bytes to the record layer
//!
//! [`Config`](crate::Config) implements [`Policy`], and
//! [`SeededRng`](crate::SeededRng) implements [`SecureRandom`].

use crate::message::{CipherSuite, CipherSuiteVec, CompressionMethod, CompressionMethodVec};
use crate::message::{ContentType, ProtocolVersion};
use crate::Error;

/// Secure random number generator.
pub trait SecureRandom {
    /// Fill buffer with random bytes.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), String>;

    /// A vector of `n` random bytes.
    fn random_vec(&mut self, n: usize) -> Result<Vec<u8>, Error> {
        let mut out = vec![0; n];
        self.fill(&mut out).map_err(Error::Random)?;
        Ok(out)
    }
}

/// Negotiation policy.
pub trait Policy {
    /// Cipher suites a client offers, in preference order.
    fn ciphersuites(&self) -> CipherSuiteVec;

    /// Compression methods a client offers, in preference order.
    fn compression(&self) -> CompressionMethodVec;

    /// The version a client asks for.
    fn pref_version(&self) -> ProtocolVersion;

    /// Pick the suite a server answers with.
    ///
    /// `have_rsa` and `have_dsa` tell which kinds of keys the server
    /// certificates hold. `None` means no offered suite is acceptable.
    fn choose_suite(
        &self,
        offered: &[CipherSuite],
        have_rsa: bool,
        have_dsa: bool,
    ) -> Option<CipherSuite>;

    /// Pick the compression method a server answers with.
    fn choose_compression(&self, offered: &[CompressionMethod]) -> CompressionMethod;
}

/// The part of a certificate the server hello looks at.
pub trait CertificateInfo {
    /// Name of the subject public key algorithm, such as `"RSA"` or `"DSA"`.
    fn public_key_algorithm(&self) -> &str;
}

impl CertificateInfo for &str {
    fn public_key_algorithm(&self) -> &str {
        self
    }
}

/// Sink for outgoing records.
pub trait RecordWriter {
    fn send(&mut self, content_type: ContentType, data: &[u8]) -> Result<(), Error>;

    fn flush(&mut self) -> Result<(), Error>;
}

/// Collects records in memory. Flushing is a no-op.
impl RecordWriter for Vec<(ContentType, Vec<u8>)> {
    fn send(&mut self, content_type: ContentType, data: &[u8]) -> Result<(), Error> {
        self.push((content_type, data.to_vec()));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

impl<W: RecordWriter + ?Sized> RecordWriter for &mut W {
    fn send(&mut self, content_type: ContentType, data: &[u8]) -> Result<(), Error> {
        (**self).send(content_type, data)
    }

    fn flush(&mut self) -> Result<(), Error> {
        (**self).flush()
    }
}
