//! The data element encoder:
//! serializes attribute maps and single attributes into a [`ByteStream`]
//! under a transfer syntax selected by its UID.
//!
//! Attributes are written in ascending tag order.
//! Sequence attributes (`SQ`) are written with undefined length,
//! each item closed by an item delimiter
//! and the sequence closed by a sequence delimiter.
use crate::encode::explicit_be::ExplicitVRBigEndianEncoder;
use crate::encode::explicit_le::ExplicitVRLittleEndianEncoder;
use crate::encode::implicit_le::ImplicitVRLittleEndianEncoder;
use crate::encode::primitive_value::encode_value;
use crate::encode::{
    Encode, IncompatibleValueSnafu, Result, UnsupportedTransferSyntaxSnafu, ValueTooLongSnafu,
    WriteValueSnafu, UNDEFINED_LENGTH,
};
use crate::stream::ByteStream;
use crate::transfer_syntax::{self, TransferSyntax};
use byteordered::Endianness;
use dicom_dict_core::{AttributeMap, Element, Tag, Value, VR};
use snafu::{ensure, OptionExt, ResultExt};
use std::io::Write;

/// Resolve the concrete encoder of a transfer syntax once,
/// then evaluate the expression with it bound to `$e`.
macro_rules! with_encoder {
    ($ts: expr, |$e: ident| $f: expr) => {
        match ($ts.explicit_vr(), $ts.endianness()) {
            (true, Endianness::Little) => {
                let $e = ExplicitVRLittleEndianEncoder::default();
                $f
            }
            (true, Endianness::Big) => {
                let $e = ExplicitVRBigEndianEncoder::default();
                $f
            }
            (false, Endianness::Little) => {
                let $e = ImplicitVRLittleEndianEncoder::default();
                $f
            }
            (false, Endianness::Big) => UnsupportedTransferSyntaxSnafu { uid: $ts.uid() }.fail(),
        }
    };
}

fn resolve(uid: &str) -> Result<&'static TransferSyntax> {
    transfer_syntax::get(uid).context(UnsupportedTransferSyntaxSnafu { uid })
}

/// Encode every attribute of `map` into `to`,
/// following the transfer syntax identified by `ts_uid`.
///
/// Under the deflated explicit VR little endian transfer syntax,
/// the encoded data set is compressed before it is appended
/// (requires the `deflate` feature).
pub fn write(map: &AttributeMap, to: &mut ByteStream, ts_uid: &str) -> Result<()> {
    let ts = resolve(ts_uid)?;
    tracing::debug!(
        "Encoding {} attributes in {}",
        map.len(),
        ts.name()
    );
    if ts.deflated() {
        return write_deflated(map, to, ts);
    }
    with_encoder!(ts, |enc| write_data_set(&enc, map, to))
}

/// Encode exactly one attribute into `to`,
/// following the transfer syntax identified by `ts_uid`.
///
/// The attribute is never deflated,
/// even if the transfer syntax is a deflated one.
pub fn write_tag_object(
    to: &mut ByteStream,
    tag: Tag,
    vr: VR,
    value: &Value,
    ts_uid: &str,
) -> Result<()> {
    let ts = resolve(ts_uid)?;
    with_encoder!(ts, |enc| write_attribute(&enc, to, tag, vr, Some(value)))
}

fn write_data_set<E, W>(enc: &E, map: &AttributeMap, to: &mut W) -> Result<()>
where
    E: Encode,
    W: Write,
{
    for (tag, attribute) in map {
        write_attribute(enc, to, *tag, attribute.vr, attribute.value.as_ref())?;
    }
    Ok(())
}

fn write_attribute<E, W>(enc: &E, to: &mut W, tag: Tag, vr: VR, value: Option<&Value>) -> Result<()>
where
    E: Encode,
    W: Write,
{
    if vr == VR::SQ {
        return write_sequence(enc, to, tag, value);
    }

    let bytes = encode_value(enc, tag, vr, value)?;
    let max: usize = if enc.explicit_vr() && vr.has_short_length() {
        0xFFFE
    } else {
        0xFFFF_FFFE
    };
    ensure!(
        bytes.len() <= max,
        ValueTooLongSnafu {
            tag,
            vr,
            len: bytes.len(),
            max,
        }
    );
    enc.encode_element_header(&mut *to, tag, vr, bytes.len() as u32)?;
    to.write_all(&bytes).context(WriteValueSnafu { tag })
}

fn write_sequence<E, W>(enc: &E, to: &mut W, tag: Tag, value: Option<&Value>) -> Result<()>
where
    E: Encode,
    W: Write,
{
    let items: &[Element] = match value {
        None => &[],
        Some(Value::Seq(items)) => items,
        Some(value) if value.is_empty() => &[],
        Some(Value::Str(_)) => {
            return IncompatibleValueSnafu {
                tag,
                vr: VR::SQ,
                found: "a string",
            }
            .fail()
        }
        Some(Value::Bulk(_)) => {
            return IncompatibleValueSnafu {
                tag,
                vr: VR::SQ,
                found: "a byte payload",
            }
            .fail()
        }
    };

    if items.is_empty() {
        enc.encode_element_header(&mut *to, tag, VR::SQ, 0)?;
        return Ok(());
    }

    enc.encode_element_header(&mut *to, tag, VR::SQ, UNDEFINED_LENGTH)?;
    for item in items {
        let Element::Item(item) = item else {
            return IncompatibleValueSnafu {
                tag,
                vr: VR::SQ,
                found: item.to_string(),
            }
            .fail();
        };
        enc.encode_item_header(&mut *to, UNDEFINED_LENGTH)?;
        write_data_set(enc, item, to)?;
        enc.encode_item_delimiter(&mut *to)?;
    }
    enc.encode_sequence_delimiter(&mut *to)
}

#[cfg(feature = "deflate")]
fn write_deflated(map: &AttributeMap, to: &mut ByteStream, _ts: &TransferSyntax) -> Result<()> {
    use crate::encode::{DeflateSnafu, WriteBytesSnafu};
    use flate2::{write::DeflateEncoder, Compression};

    let mut plain = ByteStream::new();
    write_data_set(&ExplicitVRLittleEndianEncoder::default(), map, &mut plain)?;

    let mut deflater = DeflateEncoder::new(Vec::new(), Compression::default());
    deflater.write_all(plain.as_bytes()).context(DeflateSnafu)?;
    let mut deflated = deflater.finish().context(DeflateSnafu)?;
    // PS3.5 A.5: an odd length deflated stream is padded with a null byte
    if deflated.len() % 2 == 1 {
        deflated.push(0);
    }
    to.write_all(&deflated).context(WriteBytesSnafu)
}

#[cfg(not(feature = "deflate"))]
fn write_deflated(_map: &AttributeMap, _to: &mut ByteStream, ts: &TransferSyntax) -> Result<()> {
    tracing::warn!("Support for deflated data sets requires the `deflate` feature");
    UnsupportedTransferSyntaxSnafu { uid: ts.uid() }.fail()
}
