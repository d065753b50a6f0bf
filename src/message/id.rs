use std::fmt;
use std::ops::Deref;

use super::FieldReader;
use crate::provider::SecureRandom;
use crate::Error;

pub struct InvalidLength(&'static str, usize, usize, usize);

impl fmt::Debug for InvalidLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::error::Error for InvalidLength {}

impl fmt::Display for InvalidLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Incorrect {} length: {} <= {} <= {}",
            self.0, self.1, self.3, self.2,
        )
    }
}

macro_rules! var_array {
    ($name:ident, $min:expr, $max:expr) => {
        #[derive(Clone, Copy)]
        pub struct $name([u8; $max], usize);

        impl $name {
            pub const MIN_LEN: usize = $min;
            pub const MAX_LEN: usize = $max;

            pub fn try_new(data: &[u8]) -> Result<Self, InvalidLength> {
                #[allow(unused_comparisons)]
                if data.len() < $min || data.len() > $max {
                    return Err(InvalidLength(stringify!($name), $min, $max, data.len()));
                }
                let mut array = [0; $max];
                array[..data.len()].copy_from_slice(data);
                Ok($name(array, data.len()))
            }

            /// Fill `len` bytes from the random source.
            pub fn generate(
                len: usize,
                rng: &mut (impl SecureRandom + ?Sized),
            ) -> Result<Self, Error> {
                #[allow(unused_comparisons)]
                if len < $min || len > $max {
                    debug!("{} of {} bytes", stringify!($name), len);
                    return Err(Error::Encoding(concat!(
                        stringify!($name),
                        ": length out of range"
                    )));
                }
                let mut array = [0; $max];
                rng.fill(&mut array[..len]).map_err(Error::Random)?;
                Ok($name(array, len))
            }

            /// Read the value with a one byte length prefix.
            pub fn read(reader: &mut FieldReader<'_>) -> Result<Self, Error> {
                let data = reader.read_length_prefixed(1, $min, $max)?;
                Self::try_new(data).map_err(|_| Error::Decoding(stringify!($name)))
            }

            /// Write the value with a one byte length prefix.
            pub fn serialize(&self, output: &mut Vec<u8>) {
                output.push(self.1 as u8);
                output.extend_from_slice(self);
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:02x?})", stringify!($name), &self.0[..self.1])
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.deref() == other.deref()
            }
        }

        impl Eq for $name {}

        impl Deref for $name {
            type Target = [u8];

            fn deref(&self) -> &Self::Target {
                &self.0[..self.1]
            }
        }

        impl<'a> TryFrom<&'a [u8]> for $name {
            type Error = InvalidLength;

            fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
                Self::try_new(value)
            }
        }
    };
}

var_array!(SessionId, 0, 32);

// A modern hello always carries 32 bytes. The legacy greeting carries a
// 16 to 32 byte challenge in its place, so the length is not fixed.
var_array!(Random, 16, 32);

impl SessionId {
    pub fn empty() -> Self {
        SessionId([0; 32], 0)
    }
}

impl Random {
    pub const LEN: usize = 32;

    /// A fresh 32 byte random.
    pub fn new(rng: &mut (impl SecureRandom + ?Sized)) -> Result<Self, Error> {
        Self::generate(Self::LEN, rng)
    }

    /// Read exactly 32 bytes, no length prefix.
    pub fn read_fixed(reader: &mut FieldReader<'_>) -> Result<Self, Error> {
        let data = reader.read_fixed(Self::LEN)?;
        Self::try_new(data).map_err(|_| Error::Decoding("Random"))
    }

    /// Write the random bytes, no length prefix.
    pub fn serialize_fixed(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(self);
    }
}
