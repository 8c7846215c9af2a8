//! DICOM value serialization

use dicom_dict_core::{Element, VR};
use serde::ser::{Error as _, SerializeSeq};
use serde::Serialize;

use crate::{DicomJson, INFINITY, NAN, NEG_INFINITY};

/// The largest integer magnitude that a JSON number
/// holds without precision loss (2^53 - 1).
const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// Wrapper type for value elements
/// which should always be encoded as strings.
///
/// Should be used for the value representations
/// AE, AS, CS, DA, DT, LO, LT, SH, ST, TM, UC, UI, UR, and UT.
#[derive(Debug, Clone)]
pub struct AsStrings<'a>(pub &'a [Element]);

impl Serialize for AsStrings<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut ser = serializer.serialize_seq(Some(self.0.len()))?;
        for element in self.0 {
            let text = element
                .to_str()
                .ok_or_else(|| S::Error::custom(format!("cannot encode {} as text", element)))?;
            ser.serialize_element(&*text)?;
        }
        ser.end()
    }
}

/// Wrapper type for value elements
/// which should be encoded as attribute tags (`"GGGGEEEE"`).
///
/// Should only be used for the value representation AT.
#[derive(Debug, Clone)]
pub struct AsTags<'a>(pub &'a [Element]);

impl Serialize for AsTags<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut ser = serializer.serialize_seq(Some(self.0.len()))?;
        for element in self.0 {
            match element {
                Element::Str(s) => ser.serialize_element(s)?,
                Element::Int(i) => {
                    let tag = u32::try_from(*i).map_err(|_| {
                        S::Error::custom(format!("{} is not an attribute tag", i))
                    })?;
                    ser.serialize_element(&format!("{:08X}", tag))?
                }
                _ => {
                    return Err(S::Error::custom(format!(
                        "cannot encode {} as an attribute tag",
                        element
                    )))
                }
            }
        }
        ser.end()
    }
}

/// Wrapper type for value elements
/// which should preferably be encoded as numbers,
/// unless the value is already a string,
/// or if it is an integer beyond 2^53 - 1 in magnitude.
///
/// Should be used for the value representations
/// DS, FL, FD, IS, SL, SS, SV, UL, US, and UV.
#[derive(Debug, Clone)]
pub struct AsNumbers<'a>(pub &'a [Element]);

impl Serialize for AsNumbers<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut ser = serializer.serialize_seq(Some(self.0.len()))?;
        for element in self.0 {
            match element {
                Element::Str(s) => ser.serialize_element(s)?,
                Element::Int(number) => {
                    if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(number) {
                        ser.serialize_element(number)?;
                    } else {
                        ser.serialize_element(&number.to_string())?;
                    }
                }
                Element::Float(number) => {
                    if number.is_finite() {
                        ser.serialize_element(number)?;
                    } else if number.is_nan() {
                        ser.serialize_element(NAN)?;
                    } else if number.is_sign_positive() {
                        ser.serialize_element(INFINITY)?;
                    } else {
                        ser.serialize_element(NEG_INFINITY)?;
                    }
                }
                _ => {
                    return Err(S::Error::custom(format!(
                        "cannot encode {} as a number",
                        element
                    )))
                }
            }
        }
        ser.end()
    }
}

/// Wrapper type for the items of a sequence attribute.
#[derive(Debug, Clone)]
pub struct AsItems<'a>(pub &'a [Element]);

impl Serialize for AsItems<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut ser = serializer.serialize_seq(Some(self.0.len()))?;
        for element in self.0 {
            let Element::Item(item) = element else {
                return Err(S::Error::custom(format!(
                    "cannot encode {} as a sequence item",
                    element
                )));
            };
            ser.serialize_element(&DicomJson(item))?;
        }
        ser.end()
    }
}

/// Wrapper type for binary data,
/// to be encoded in base64.
#[derive(Debug, Clone)]
pub struct InlineBinary<'a>(pub &'a [u8]);

impl Serialize for InlineBinary<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use base64::Engine;
        let str = base64::engine::general_purpose::STANDARD.encode(self.0);
        serializer.serialize_str(&str)
    }
}

/// Gather the little endian bytes of the elements of a binary attribute.
///
/// Byte payloads are taken as is,
/// numbers are laid out in the width of the value representation.
pub fn binary_bytes(vr: VR, elements: &[Element]) -> Result<Vec<u8>, String> {
    let out_of_range = |i: &i64| format!("{} does not fit in VR {}", i, vr);
    let mut out = Vec::new();
    for element in elements {
        match (vr, element) {
            (_, Element::Bytes(bytes)) => out.extend_from_slice(bytes),
            (VR::OB | VR::UN, Element::Int(i)) => {
                out.push(u8::try_from(*i).map_err(|_| out_of_range(i))?);
            }
            (VR::OW, Element::Int(i)) => {
                let v = u16::try_from(*i).map_err(|_| out_of_range(i))?;
                out.extend_from_slice(&v.to_le_bytes());
            }
            (VR::OL, Element::Int(i)) => {
                let v = u32::try_from(*i).map_err(|_| out_of_range(i))?;
                out.extend_from_slice(&v.to_le_bytes());
            }
            (VR::OV, Element::Int(i)) => {
                let v = u64::try_from(*i).map_err(|_| out_of_range(i))?;
                out.extend_from_slice(&v.to_le_bytes());
            }
            (VR::OF, Element::Float(f)) => out.extend_from_slice(&(*f as f32).to_le_bytes()),
            (VR::OF, Element::Int(i)) => out.extend_from_slice(&(*i as f32).to_le_bytes()),
            (VR::OD, Element::Float(f)) => out.extend_from_slice(&f.to_le_bytes()),
            (VR::OD, Element::Int(i)) => out.extend_from_slice(&(*i as f64).to_le_bytes()),
            _ => return Err(format!("cannot encode {} as VR {} binary data", element, vr)),
        }
    }
    Ok(out)
}

/// Wrapper type for value elements
/// which should always be encoded as person names.
///
/// Should only used for the value representation PN.
#[derive(Debug, Clone)]
pub struct AsPersonNames<'a>(pub &'a [Element]);

impl Serialize for AsPersonNames<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut ser = serializer.serialize_seq(Some(self.0.len()))?;
        for element in self.0 {
            let name = element.as_str().ok_or_else(|| {
                S::Error::custom(format!("cannot encode {} as a person name", element))
            })?;
            ser.serialize_element(&PersonNameDef::from(name))?;
        }
        ser.end()
    }
}

/// Wrapper type for a string
/// to be interpreted as a person's name.
///
/// The component groups of the name are separated by `=`.
/// Should only used for the value representation PN.
#[derive(Debug, Clone, Serialize)]
pub struct PersonNameDef<'a> {
    #[serde(rename = "Alphabetic", skip_serializing_if = "Option::is_none")]
    alphabetic: Option<&'a str>,
    #[serde(rename = "Ideographic", skip_serializing_if = "Option::is_none")]
    ideographic: Option<&'a str>,
    #[serde(rename = "Phonetic", skip_serializing_if = "Option::is_none")]
    phonetic: Option<&'a str>,
}

impl<'a> From<&'a str> for PersonNameDef<'a> {
    fn from(value: &'a str) -> Self {
        let mut groups = value.splitn(3, '=').map(|g| Some(g).filter(|g| !g.is_empty()));
        PersonNameDef {
            alphabetic: groups.next().flatten(),
            ideographic: groups.next().flatten(),
            phonetic: groups.next().flatten(),
        }
    }
}
