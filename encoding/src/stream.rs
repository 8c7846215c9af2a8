//! A growable in-memory byte buffer.
//!
//! [`ByteStream`] is the target of all encoding routines in this crate.
//! Multi-byte numbers are laid out by the element encoders,
//! in the byte order of the transfer syntax in use.
//! Data is accumulated in memory and retrieved as a whole
//! with [`ByteStream::into_buffer`].
use crate::encode::{InvalidHexSnafu, Result};
use snafu::OptionExt;
use std::io::{self, Write};

/// An in-memory byte buffer.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ByteStream {
    buffer: Vec<u8>,
}

impl ByteStream {
    /// Create an empty byte stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty byte stream
    /// with room for at least `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        ByteStream {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Write the bytes denoted by a string of hexadecimal digits,
    /// two digits per byte (e.g. `"0000"` writes two zero bytes).
    ///
    /// Fails if the string has an odd number of digits
    /// or contains anything other than hexadecimal digits.
    /// Nothing is written on failure.
    pub fn write_hex(&mut self, digits: &str) -> Result<()> {
        let bytes = hex::decode(digits)
            .ok()
            .context(InvalidHexSnafu { digits })?;
        self.buffer.extend_from_slice(&bytes);
        Ok(())
    }

    /// Write the bytes of the given text, with no terminator.
    pub fn write_string(&mut self, text: &str) {
        self.buffer.extend_from_slice(text.as_bytes());
    }

    /// Append the contents of another stream to this one.
    pub fn concat(&mut self, other: &ByteStream) {
        self.buffer.extend_from_slice(&other.buffer);
    }

    /// The number of bytes written so far.
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing was written to this stream.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// View the bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Finish the stream, retrieving all bytes written.
    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }
}

impl Write for ByteStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.buffer.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ByteStream;
    use crate::encode::Error;
    use std::io::Write;

    #[test]
    fn write_hex_digits() {
        let mut stream = ByteStream::new();
        stream.write_hex("00ff7FE0").unwrap();
        assert_eq!(stream.as_bytes(), &[0x00, 0xFF, 0x7F, 0xE0]);

        stream.write_hex(&"00".repeat(128)).unwrap();
        assert_eq!(stream.size(), 132);
    }

    #[test]
    fn write_hex_rejects_bad_digits() {
        let mut stream = ByteStream::new();
        assert!(matches!(
            stream.write_hex("abc"),
            Err(Error::InvalidHex { .. })
        ));
        assert!(matches!(
            stream.write_hex("zz00"),
            Err(Error::InvalidHex { .. })
        ));
        assert!(matches!(
            stream.write_hex("+1"),
            Err(Error::InvalidHex { .. })
        ));
        assert!(matches!(
            stream.write_hex("0 ff"),
            Err(Error::InvalidHex { .. })
        ));
        assert!(stream.is_empty());

        // a failed write leaves earlier bytes in place
        stream.write_hex("").unwrap();
        stream.write_hex("4449").unwrap();
        assert!(stream.write_hex("43g").is_err());
        assert_eq!(stream.as_bytes(), b"DI");
    }

    #[test]
    fn concat_streams() {
        let mut main = ByteStream::with_capacity(64);
        main.write_string("DICM");

        let mut other = ByteStream::new();
        other.write_all(&[1, 2, 3]).unwrap();

        main.concat(&other);
        assert_eq!(main.size(), 7);
        assert_eq!(main.into_buffer(), b"DICM\x01\x02\x03".to_vec());
        // the appended stream is left untouched
        assert_eq!(other.size(), 3);
    }
}
