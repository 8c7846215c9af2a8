//! Encoding of attribute values into their binary form,
//! according to the attribute's value representation.
use crate::encode::{
    BasicEncode, IncompatibleValueSnafu, Result, ValueOutOfRangeSnafu, WriteValueSnafu,
};
use dicom_dict_core::{Element, Tag, Value, VR};
use snafu::{OptionExt, ResultExt};

/// Encode the value of a non-sequence attribute,
/// padded to an even length.
///
/// Absent and empty values result in an empty byte vector.
pub(crate) fn encode_value<E>(encoder: &E, tag: Tag, vr: VR, value: Option<&Value>) -> Result<Vec<u8>>
where
    E: BasicEncode,
{
    let mut out = match value {
        None => return Ok(Vec::new()),
        Some(value) if value.is_empty() => return Ok(Vec::new()),
        Some(Value::Bulk(bytes)) => bytes.clone(),
        Some(Value::Str(s)) => encode_elements(encoder, tag, vr, std::slice::from_ref(&Element::Str(s.clone())))?,
        Some(Value::Seq(elements)) => encode_elements(encoder, tag, vr, elements)?,
    };

    if out.len() % 2 == 1 {
        out.push(vr.padding());
    }
    Ok(out)
}

fn encode_elements<E>(encoder: &E, tag: Tag, vr: VR, elements: &[Element]) -> Result<Vec<u8>>
where
    E: BasicEncode,
{
    if vr.is_textual() {
        return encode_text(tag, vr, elements);
    }

    let mut out = Vec::new();
    for element in elements {
        // pre-encoded payloads are written as is
        if let Element::Bytes(bytes) = element {
            out.extend_from_slice(bytes);
            continue;
        }

        let written = match vr {
            VR::US | VR::OW => {
                let v = integer_as::<u16>(tag, vr, element)?;
                encoder.encode_us(&mut out, v)
            }
            VR::SS => {
                let v = integer_as::<i16>(tag, vr, element)?;
                encoder.encode_ss(&mut out, v)
            }
            VR::UL | VR::OL => {
                let v = integer_as::<u32>(tag, vr, element)?;
                encoder.encode_ul(&mut out, v)
            }
            VR::SL => {
                let v = integer_as::<i32>(tag, vr, element)?;
                encoder.encode_sl(&mut out, v)
            }
            VR::UV | VR::OV => {
                let v = integer_as::<u64>(tag, vr, element)?;
                encoder.encode_uv(&mut out, v)
            }
            VR::SV => {
                let v = integer(tag, vr, element)?;
                encoder.encode_sv(&mut out, v)
            }
            VR::FL | VR::OF => {
                let v = float(tag, vr, element)?;
                let single = v as f32;
                if v.is_finite() && !single.is_finite() {
                    return ValueOutOfRangeSnafu {
                        tag,
                        vr,
                        value: v.to_string(),
                    }
                    .fail();
                }
                encoder.encode_fl(&mut out, single)
            }
            VR::FD | VR::OD => {
                let v = float(tag, vr, element)?;
                encoder.encode_fd(&mut out, v)
            }
            VR::OB | VR::UN => {
                let v = integer_as::<u8>(tag, vr, element)?;
                out.push(v);
                Ok(())
            }
            VR::AT => {
                let t = attribute_tag(tag, vr, element)?;
                encoder
                    .encode_us(&mut out, t.group())
                    .and_then(|_| encoder.encode_us(&mut out, t.element()))
            }
            _ => {
                return IncompatibleValueSnafu {
                    tag,
                    vr,
                    found: kind_of(element),
                }
                .fail()
            }
        };
        written.context(WriteValueSnafu { tag })?;
    }
    Ok(out)
}

/// Join the textual form of each element with a backslash.
fn encode_text(tag: Tag, vr: VR, elements: &[Element]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            out.push(b'\\');
        }
        let text = element.to_str().context(IncompatibleValueSnafu {
            tag,
            vr,
            found: kind_of(element),
        })?;
        out.extend_from_slice(text.as_bytes());
    }
    Ok(out)
}

fn kind_of(element: &Element) -> String {
    match element {
        Element::Str(_) => "a string",
        Element::Int(_) => "an integer",
        Element::Float(_) => "a floating point number",
        Element::Bytes(_) => "a byte payload",
        Element::Item(_) => "a sequence item",
    }
    .to_string()
}

fn integer(tag: Tag, vr: VR, element: &Element) -> Result<i64> {
    let incompatible = || IncompatibleValueSnafu {
        tag,
        vr,
        found: kind_of(element),
    };
    match element {
        Element::Int(i) => Ok(*i),
        Element::Float(f) if f.is_finite() && f.fract() == 0. => {
            if *f < i64::MIN as f64 || *f >= i64::MAX as f64 {
                return ValueOutOfRangeSnafu {
                    tag,
                    vr,
                    value: f.to_string(),
                }
                .fail();
            }
            Ok(*f as i64)
        }
        Element::Str(s) => s.trim().parse().ok().context(incompatible()),
        _ => incompatible().fail(),
    }
}

fn integer_as<T>(tag: Tag, vr: VR, element: &Element) -> Result<T>
where
    T: TryFrom<i64>,
{
    let v = integer(tag, vr, element)?;
    T::try_from(v).ok().context(ValueOutOfRangeSnafu {
        tag,
        vr,
        value: v.to_string(),
    })
}

fn float(tag: Tag, vr: VR, element: &Element) -> Result<f64> {
    let incompatible = || IncompatibleValueSnafu {
        tag,
        vr,
        found: kind_of(element),
    };
    match element {
        Element::Float(f) => Ok(*f),
        Element::Int(i) => Ok(*i as f64),
        Element::Str(s) => s.trim().parse().ok().context(incompatible()),
        _ => incompatible().fail(),
    }
}

/// Attribute tag values are given either as tag text or as a packed integer.
fn attribute_tag(tag: Tag, vr: VR, element: &Element) -> Result<Tag> {
    match element {
        Element::Str(s) => s.parse().ok().context(IncompatibleValueSnafu {
            tag,
            vr,
            found: format!("string `{}`", s),
        }),
        _ => integer_as::<u32>(tag, vr, element).map(Tag::from),
    }
}
