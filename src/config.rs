use tinyvec::tiny_vec;

use crate::message::{Authentication, CipherSuite, CipherSuiteVec};
use crate::message::{CompressionMethod, CompressionMethodVec, ProtocolVersion};
use crate::message::{MAX_COMPRESSION, MAX_SUITES};
use crate::provider::Policy;
use crate::rng::SeededRng;
use crate::Error;

/// Hello negotiation configuration
#[derive(Debug, Clone)]
pub struct Config {
    ciphersuites: CipherSuiteVec,
    compression: CompressionMethodVec,
    pref_version: ProtocolVersion,
    rng_seed: Option<u64>,
}

impl Config {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Seed for the random source, if any.
    #[inline(always)]
    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Random source for hello randoms.
    ///
    /// Deterministic when a seed is configured, otherwise backed by the
    /// operating system.
    pub fn rng(&self) -> SeededRng {
        SeededRng::new(self.rng_seed)
    }
}

impl Policy for Config {
    fn ciphersuites(&self) -> CipherSuiteVec {
        self.ciphersuites.clone()
    }

    fn compression(&self) -> CompressionMethodVec {
        self.compression.clone()
    }

    fn pref_version(&self) -> ProtocolVersion {
        self.pref_version
    }

    /// Our own preference order decides, not the client's.
    fn choose_suite(
        &self,
        offered: &[CipherSuite],
        have_rsa: bool,
        have_dsa: bool,
    ) -> Option<CipherSuite> {
        self.ciphersuites
            .iter()
            .copied()
            .filter(|s| offered.contains(s))
            .find(|s| match s.authentication() {
                Some(Authentication::Rsa) => have_rsa,
                Some(Authentication::Dss) => have_dsa,
                Some(Authentication::Anonymous) => true,
                None => false,
            })
    }

    fn choose_compression(&self, offered: &[CompressionMethod]) -> CompressionMethod {
        self.compression
            .iter()
            .copied()
            .find(|c| offered.contains(c))
            .unwrap_or(CompressionMethod::Null)
    }
}

impl Default for Config {
    fn default() -> Self {
        let builder = ConfigBuilder::default();
        Config {
            ciphersuites: builder.ciphersuites,
            compression: builder.compression,
            pref_version: builder.pref_version,
            rng_seed: builder.rng_seed,
        }
    }
}

/// Builder for hello negotiation configuration.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    ciphersuites: CipherSuiteVec,
    compression: CompressionMethodVec,
    pref_version: ProtocolVersion,
    rng_seed: Option<u64>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        ConfigBuilder {
            ciphersuites: CipherSuite::all()
                .iter()
                .copied()
                .filter(|s| s.authentication() != Some(Authentication::Anonymous))
                .collect(),
            compression: tiny_vec![[CompressionMethod; 4] => CompressionMethod::Null],
            pref_version: ProtocolVersion::TLS1_0,
            rng_seed: None,
        }
    }
}

impl ConfigBuilder {
    /// Set the cipher suites to offer and accept, most preferred first.
    ///
    /// Defaults to every named suite that authenticates the server.
    pub fn ciphersuites(mut self, suites: &[CipherSuite]) -> Self {
        self.ciphersuites = suites.iter().copied().collect();
        self
    }

    /// Set the compression methods to offer and accept, most preferred first.
    ///
    /// Defaults to `[Null]`.
    pub fn compression(mut self, methods: &[CompressionMethod]) -> Self {
        self.compression = methods.iter().copied().collect();
        self
    }

    /// Set the version a client asks for.
    ///
    /// Defaults to TLS 1.0.
    pub fn pref_version(mut self, version: ProtocolVersion) -> Self {
        self.pref_version = version;
        self
    }

    /// Set a seed for deterministic randoms.
    ///
    /// Only meant for tests and debugging.
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Build the configuration.
    ///
    /// Returns `Error::Config` if the suite or compression lists are empty
    /// or too long to fit a hello, or if the version is not one we speak.
    pub fn build(self) -> Result<Config, Error> {
        if self.ciphersuites.is_empty() || self.ciphersuites.len() > MAX_SUITES {
            return Err(Error::Config("cipher suite list must hold 1 to 32767 entries"));
        }

        if self.compression.is_empty() || self.compression.len() > MAX_COMPRESSION {
            return Err(Error::Config(
                "compression method list must hold 1 to 255 entries",
            ));
        }

        if !self.pref_version.is_supported() {
            return Err(Error::Config("preferred version is not supported"));
        }

        Ok(Config {
            ciphersuites: self.ciphersuites,
            compression: self.compression,
            pref_version: self.pref_version,
            rng_seed: self.rng_seed,
        })
    }
}
