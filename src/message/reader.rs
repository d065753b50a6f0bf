use nom::bytes::complete::take;
use nom::number::complete::{be_u16, be_u24, be_u8};
use nom::IResult;
use tinyvec::{Array, TinyVec};

use crate::Error;

const TRUNCATED: &str = "truncated input";
const OUT_OF_RANGE: &str = "length field out of range";
const NOT_MULTIPLE: &str = "vector length is not a multiple of the element width";

/// A fixed width element of a length prefixed vector.
pub trait Field: Sized {
    /// Encoded width in bytes.
    const WIDTH: usize;

    fn parse(input: &[u8]) -> IResult<&[u8], Self>;
}

impl Field for u8 {
    const WIDTH: usize = 1;

    fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        be_u8(input)
    }
}

impl Field for u16 {
    const WIDTH: usize = 2;

    fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        be_u16(input)
    }
}

/// Bounds checked cursor over an immutable byte buffer.
///
/// Every read either consumes exactly what it returns or fails without
/// moving the cursor.
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        FieldReader { input, position: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn has_remaining(&self) -> bool {
        !self.input.is_empty()
    }

    pub fn remaining_len(&self) -> usize {
        self.input.len()
    }

    /// The unread part of the buffer.
    pub fn remaining(&self) -> &'a [u8] {
        self.input
    }

    pub fn read_byte(&mut self) -> Result<u8, Error> {
        let result = be_u8(self.input);
        self.apply(result)
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        let result = be_u16(self.input);
        self.apply(result)
    }

    pub fn read_u24(&mut self) -> Result<u32, Error> {
        let result = be_u24(self.input);
        self.apply(result)
    }

    pub fn read_fixed(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let result = take_bytes(self.input, n);
        self.apply(result)
    }

    pub fn skip(&mut self, n: usize) -> Result<(), Error> {
        self.read_fixed(n).map(|_| ())
    }

    /// Read a `prefix_width` byte length followed by that many bytes.
    pub fn read_length_prefixed(
        &mut self,
        prefix_width: usize,
        min_len: usize,
        max_len: usize,
    ) -> Result<&'a [u8], Error> {
        let (rest, len) = read_prefix(self.input, prefix_width)?;

        if len < min_len || len > max_len {
            return Err(Error::Decoding(OUT_OF_RANGE));
        }

        let result = take_bytes(rest, len);
        let (rest, data) = result.map_err(|_| Error::Decoding(TRUNCATED))?;
        self.commit(rest);

        Ok(data)
    }

    /// Read a `prefix_width` byte length followed by a vector of fixed width elements.
    ///
    /// The bounds are element counts, not byte lengths.
    pub fn read_length_prefixed_vector<A>(
        &mut self,
        prefix_width: usize,
        min_count: usize,
        max_count: usize,
    ) -> Result<TinyVec<A>, Error>
    where
        A: Array,
        A::Item: Field,
    {
        let width = <A::Item as Field>::WIDTH;
        let (rest, len) = read_prefix(self.input, prefix_width)?;

        if len % width != 0 {
            return Err(Error::Decoding(NOT_MULTIPLE));
        }

        let count = len / width;
        if count < min_count || count > max_count {
            return Err(Error::Decoding(OUT_OF_RANGE));
        }

        let result = take_bytes(rest, len);
        let (rest, mut data) = result.map_err(|_| Error::Decoding(TRUNCATED))?;

        let mut items = TinyVec::with_capacity(count);
        while !data.is_empty() {
            let (next, item) =
                <A::Item as Field>::parse(data).map_err(|_| Error::Decoding(TRUNCATED))?;
            items.push(item);
            data = next;
        }

        self.commit(rest);

        Ok(items)
    }

    fn apply<O>(&mut self, result: IResult<&'a [u8], O>) -> Result<O, Error> {
        let (rest, out) = result.map_err(|_| Error::Decoding(TRUNCATED))?;
        self.commit(rest);
        Ok(out)
    }

    fn commit(&mut self, rest: &'a [u8]) {
        self.position += self.input.len() - rest.len();
        self.input = rest;
    }
}

fn take_bytes(input: &[u8], n: usize) -> IResult<&[u8], &[u8]> {
    take(n)(input)
}

fn read_prefix(input: &[u8], width: usize) -> Result<(&[u8], usize), Error> {
    let result: IResult<&[u8], usize> = match width {
        1 => be_u8(input).map(|(i, v)| (i, v as usize)),
        2 => be_u16(input).map(|(i, v)| (i, v as usize)),
        3 => be_u24(input).map(|(i, v)| (i, v as usize)),
        _ => return Err(Error::Decoding("unsupported length prefix width")),
    };
    result.map_err(|_| Error::Decoding(TRUNCATED))
}
