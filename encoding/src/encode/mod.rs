//! This module contains all DICOM data element encoding logic.
use byteordered::Endianness;
use dicom_dict_core::{Tag, VR};
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::{self, Write};

pub mod basic;
pub mod explicit_be;
pub mod explicit_le;
pub mod implicit_le;
pub(crate) mod primitive_value;

/// Length value denoting an undefined length,
/// as used by sequences and items closed by a delimiter.
pub const UNDEFINED_LENGTH: u32 = 0xFFFF_FFFF;

/// Module-level error type:
/// for errors which may occur while encoding DICOM data.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Failed to write Data Element tag"))]
    WriteTag {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write Data Element header"))]
    WriteHeader {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write Item header"))]
    WriteItemHeader {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write Item delimiter"))]
    WriteItemDelimiter {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write Sequence delimiter"))]
    WriteSequenceDelimiter {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write value of {}", tag))]
    WriteValue {
        tag: Tag,
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write raw bytes"))]
    WriteBytes {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Unsupported transfer syntax `{}`", uid))]
    UnsupportedTransferSyntax { uid: String, backtrace: Backtrace },
    #[snafu(display("Invalid hexadecimal string `{}`", digits))]
    InvalidHex { digits: String, backtrace: Backtrace },
    #[snafu(display("Value `{}` of {} does not fit in VR {}", value, tag, vr))]
    ValueOutOfRange {
        tag: Tag,
        vr: VR,
        value: String,
        backtrace: Backtrace,
    },
    #[snafu(display("Value of {} is incompatible with VR {}: found {}", tag, vr, found))]
    IncompatibleValue {
        tag: Tag,
        vr: VR,
        found: String,
        backtrace: Backtrace,
    },
    #[snafu(display(
        "Value of {} is too long for VR {}: {} bytes, at most {} allowed",
        tag,
        vr,
        len,
        max
    ))]
    ValueTooLong {
        tag: Tag,
        vr: VR,
        len: usize,
        max: usize,
        backtrace: Backtrace,
    },
    #[snafu(display("Failed to deflate data set"))]
    Deflate {
        backtrace: Backtrace,
        source: io::Error,
    },
}

/// Type alias for a result from this module.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Type trait for an encoder of basic data properties.
pub trait BasicEncode {
    /// Retrieve the encoder's endianness.
    fn endianness(&self) -> Endianness;

    /// Encode an unsigned short value to the given writer.
    fn encode_us<W>(&self, to: W, value: u16) -> io::Result<()>
    where
        W: Write;

    /// Encode an unsigned long value to the given writer.
    fn encode_ul<W>(&self, to: W, value: u32) -> io::Result<()>
    where
        W: Write;

    /// Encode an unsigned very long value to the given writer.
    fn encode_uv<W>(&self, to: W, value: u64) -> io::Result<()>
    where
        W: Write;

    /// Encode a signed short value to the given writer.
    fn encode_ss<W>(&self, to: W, value: i16) -> io::Result<()>
    where
        W: Write;

    /// Encode a signed long value to the given writer.
    fn encode_sl<W>(&self, to: W, value: i32) -> io::Result<()>
    where
        W: Write;

    /// Encode a signed very long value to the given writer.
    fn encode_sv<W>(&self, to: W, value: i64) -> io::Result<()>
    where
        W: Write;

    /// Encode a single precision float value to the given writer.
    fn encode_fl<W>(&self, to: W, value: f32) -> io::Result<()>
    where
        W: Write;

    /// Encode a double precision float value to the given writer.
    fn encode_fd<W>(&self, to: W, value: f64) -> io::Result<()>
    where
        W: Write;
}

/// Type trait for a data element encoder.
pub trait Encode: BasicEncode {
    /// Whether data element headers carry the value representation.
    fn explicit_vr(&self) -> bool;

    /// Encode and write an element tag.
    fn encode_tag<W>(&self, to: W, tag: Tag) -> Result<()>
    where
        W: Write;

    /// Encode and write a data element header to the given destination.
    /// Returns the number of bytes effectively written on success.
    fn encode_element_header<W>(&self, to: W, tag: Tag, vr: VR, len: u32) -> Result<usize>
    where
        W: Write;

    /// Encode and write a DICOM sequence item header to the given destination.
    fn encode_item_header<W>(&self, mut to: W, len: u32) -> Result<()>
    where
        W: Write,
    {
        let mut buf = Vec::with_capacity(8);
        self.encode_us(&mut buf, 0xFFFE)
            .and_then(|_| self.encode_us(&mut buf, 0xE000))
            .and_then(|_| self.encode_ul(&mut buf, len))
            .and_then(|_| to.write_all(&buf))
            .context(WriteItemHeaderSnafu)
    }

    /// Encode and write a DICOM sequence item delimiter to the given destination.
    fn encode_item_delimiter<W>(&self, mut to: W) -> Result<()>
    where
        W: Write,
    {
        let mut buf = Vec::with_capacity(8);
        self.encode_us(&mut buf, 0xFFFE)
            .and_then(|_| self.encode_us(&mut buf, 0xE00D))
            .and_then(|_| self.encode_ul(&mut buf, 0))
            .and_then(|_| to.write_all(&buf))
            .context(WriteItemDelimiterSnafu)
    }

    /// Encode and write a DICOM sequence delimiter to the given destination.
    fn encode_sequence_delimiter<W>(&self, mut to: W) -> Result<()>
    where
        W: Write,
    {
        let mut buf = Vec::with_capacity(8);
        self.encode_us(&mut buf, 0xFFFE)
            .and_then(|_| self.encode_us(&mut buf, 0xE0DD))
            .and_then(|_| self.encode_ul(&mut buf, 0))
            .and_then(|_| to.write_all(&buf))
            .context(WriteSequenceDelimiterSnafu)
    }
}

impl<T: ?Sized> BasicEncode for &T
where
    T: BasicEncode,
{
    fn endianness(&self) -> Endianness {
        (**self).endianness()
    }

    fn encode_us<W: Write>(&self, to: W, value: u16) -> io::Result<()> {
        (**self).encode_us(to, value)
    }

    fn encode_ul<W: Write>(&self, to: W, value: u32) -> io::Result<()> {
        (**self).encode_ul(to, value)
    }

    fn encode_uv<W: Write>(&self, to: W, value: u64) -> io::Result<()> {
        (**self).encode_uv(to, value)
    }

    fn encode_ss<W: Write>(&self, to: W, value: i16) -> io::Result<()> {
        (**self).encode_ss(to, value)
    }

    fn encode_sl<W: Write>(&self, to: W, value: i32) -> io::Result<()> {
        (**self).encode_sl(to, value)
    }

    fn encode_sv<W: Write>(&self, to: W, value: i64) -> io::Result<()> {
        (**self).encode_sv(to, value)
    }

    fn encode_fl<W: Write>(&self, to: W, value: f32) -> io::Result<()> {
        (**self).encode_fl(to, value)
    }

    fn encode_fd<W: Write>(&self, to: W, value: f64) -> io::Result<()> {
        (**self).encode_fd(to, value)
    }
}

impl<T: ?Sized> Encode for &T
where
    T: Encode,
{
    fn explicit_vr(&self) -> bool {
        (**self).explicit_vr()
    }

    fn encode_tag<W>(&self, to: W, tag: Tag) -> Result<()>
    where
        W: Write,
    {
        (**self).encode_tag(to, tag)
    }

    fn encode_element_header<W>(&self, to: W, tag: Tag, vr: VR, len: u32) -> Result<usize>
    where
        W: Write,
    {
        (**self).encode_element_header(to, tag, vr, len)
    }

    fn encode_item_header<W>(&self, to: W, len: u32) -> Result<()>
    where
        W: Write,
    {
        (**self).encode_item_header(to, len)
    }

    fn encode_item_delimiter<W>(&self, to: W) -> Result<()>
    where
        W: Write,
    {
        (**self).encode_item_delimiter(to)
    }

    fn encode_sequence_delimiter<W>(&self, to: W) -> Result<()>
    where
        W: Write,
    {
        (**self).encode_sequence_delimiter(to)
    }
}
