//! DICOM JSON serialization module

use std::borrow::Cow;
use std::io::Write;

use crate::DicomJson;
use dicom_dict_core::{Attribute, AttributeMap, Element, Tag, Value, VR};
use serde::{ser::Error as _, ser::SerializeMap, Serialize, Serializer};

use self::value::{binary_bytes, AsItems, AsNumbers, AsPersonNames, AsStrings, AsTags, InlineBinary};
mod value;

/// Serialize a piece of DICOM data as a string of JSON.
pub fn to_string<T>(data: T) -> Result<String, serde_json::Error>
where
    DicomJson<T>: From<T> + Serialize,
{
    serde_json::to_string(&DicomJson::from(data))
}

/// Serialize a piece of DICOM data as a pretty-printed string of JSON.
pub fn to_string_pretty<T>(data: T) -> Result<String, serde_json::Error>
where
    DicomJson<T>: From<T> + Serialize,
{
    serde_json::to_string_pretty(&DicomJson::from(data))
}

/// Serialize a piece of DICOM data as a serde JSON value.
pub fn to_value<T>(data: T) -> Result<serde_json::Value, serde_json::Error>
where
    DicomJson<T>: From<T> + Serialize,
{
    serde_json::to_value(&DicomJson::from(data))
}

/// Serialize a piece of DICOM data to a vector of bytes.
pub fn to_vec<T>(data: T) -> Result<Vec<u8>, serde_json::Error>
where
    DicomJson<T>: From<T> + Serialize,
{
    serde_json::to_vec(&DicomJson::from(data))
}

/// Serialize a piece of DICOM data to a byte writer.
pub fn to_writer<W, T>(writer: W, data: T) -> Result<(), serde_json::Error>
where
    DicomJson<T>: From<T> + Serialize,
    W: Write,
{
    serde_json::to_writer(writer, &DicomJson::from(data))
}

impl<'a> From<&'a AttributeMap> for DicomJson<&'a AttributeMap> {
    fn from(value: &'a AttributeMap) -> Self {
        Self(value)
    }
}

impl Serialize for DicomJson<&'_ AttributeMap> {
    /// Serializes the attribute map as a JSON map
    /// containing one entry per attribute,
    /// indexed by tag.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(
            self.0
                .iter()
                .map(|(tag, attribute)| (DicomJson(*tag), DicomJson(attribute))),
        )
    }
}

impl From<AttributeMap> for DicomJson<AttributeMap> {
    fn from(value: AttributeMap) -> Self {
        Self(value)
    }
}

impl Serialize for DicomJson<AttributeMap> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        DicomJson(&self.0).serialize(serializer)
    }
}

impl<'a> From<&'a Attribute> for DicomJson<&'a Attribute> {
    fn from(value: &'a Attribute) -> Self {
        Self(value)
    }
}

impl Serialize for DicomJson<&'_ Attribute> {
    /// Serializes the attribute as a single JSON map.
    ///
    /// The fields present will be:
    /// - `"vr"`, containing the value representation;
    /// - Either `"Value"` (as an array of values)
    ///   or `"InlineBinary"` (binary data in base64),
    ///   if the value is not empty.
    ///
    /// The DICOM tag is not encoded,
    /// as it is typically serialized as the entry key within a data set.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut serializer = serializer.serialize_map(None)?;
        let vr = self.0.vr;
        serializer.serialize_entry("vr", vr.to_string())?;

        let elements: Cow<[Element]> = match &self.0.value {
            None => Cow::Borrowed(&[]),
            Some(Value::Bulk(bytes)) => {
                if !bytes.is_empty() {
                    serializer.serialize_entry("InlineBinary", &InlineBinary(bytes))?;
                }
                return serializer.end();
            }
            Some(Value::Str(s)) if s.is_empty() => Cow::Borrowed(&[]),
            Some(Value::Str(s)) => Cow::Owned(vec![Element::Str(s.clone())]),
            Some(Value::Seq(elements)) => Cow::Borrowed(elements),
        };

        if elements.is_empty() {
            // no-op
            return serializer.end();
        }

        match vr {
            VR::SQ => {
                serializer.serialize_entry("Value", &AsItems(&elements))?;
            }
            VR::AE
            | VR::AS
            | VR::CS
            | VR::DA
            | VR::DT
            | VR::LO
            | VR::LT
            | VR::SH
            | VR::UC
            | VR::UI
            | VR::UR
            | VR::TM
            | VR::ST
            | VR::UT => {
                serializer.serialize_entry("Value", &AsStrings(&elements))?;
            }
            VR::AT => {
                serializer.serialize_entry("Value", &AsTags(&elements))?;
            }
            VR::PN => {
                serializer.serialize_entry("Value", &AsPersonNames(&elements))?;
            }
            VR::FD
            | VR::IS
            | VR::FL
            | VR::DS
            | VR::SL
            | VR::SS
            | VR::SV
            | VR::UL
            | VR::US
            | VR::UV => {
                serializer.serialize_entry("Value", &AsNumbers(&elements))?;
            }
            VR::OB | VR::OD | VR::OF | VR::OL | VR::OV | VR::OW | VR::UN => {
                let bytes = binary_bytes(vr, &elements).map_err(S::Error::custom)?;
                serializer.serialize_entry("InlineBinary", &InlineBinary(&bytes))?;
            }
        }

        serializer.end()
    }
}

impl From<Tag> for DicomJson<Tag> {
    fn from(value: Tag) -> Self {
        Self(value)
    }
}

impl Serialize for DicomJson<Tag> {
    /// Serializes the DICOM tag as a single string in uppercase hexadecimal,
    /// with no separators or delimiters (`"GGGGEEEE"`).
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_hex_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use dicom_dict_core::{tags, Attribute, AttributeMap, Element, Tag, Value, VR};
    use serde_json::json;

    use super::*;

    #[test]
    fn serialize_simple_attributes() {
        let mut map = AttributeMap::new();
        map.insert(Tag(0x0008, 0x0005), Attribute::new(VR::CS, "ISO_IR 192"));
        map.insert(Tag(0x0008, 0x0020), Attribute::new(VR::DA, ["20130409"]));
        map.insert(Tag(0x0008, 0x0061), Attribute::new(VR::CS, ["CT", "PET"]));
        map.insert(Tag(0x0008, 0x0090), Attribute::new(VR::PN, ["^Bob^^Dr."]));
        map.insert(
            Tag(0x0009, 0x1002),
            Attribute::new(VR::UN, Value::Bulk(vec![0xcf, 0x4c, 0x7d, 0x73, 0xcb, 0xfb])),
        );
        map.insert(Tag(0x0010, 0x1010), Attribute::new(VR::AS, ["30Y"]));

        assert_eq!(
            to_value(&map).unwrap(),
            json!({
                "00080005": {
                    "vr": "CS",
                    "Value": [ "ISO_IR 192" ]
                },
                "00080020": {
                    "vr": "DA",
                    "Value": [ "20130409" ]
                },
                "00080061": {
                    "vr": "CS",
                    "Value": [
                        "CT",
                        "PET"
                    ]
                },
                "00080090": {
                    "vr": "PN",
                    "Value": [
                      {
                        "Alphabetic": "^Bob^^Dr."
                      }
                    ]
                },
                "00091002": {
                    "vr": "UN",
                    "InlineBinary": "z0x9c8v7"
                },
                "00101010": {
                    "vr": "AS",
                    "Value": [ "30Y" ]
                }
            }),
        );
    }

    #[test]
    fn serialize_empty_attributes() {
        let mut map = AttributeMap::new();
        map.insert(tags::PATIENT_NAME, Attribute::empty(VR::PN));
        map.insert(tags::PATIENT_ID, Attribute::new(VR::LO, ""));
        map.insert(Tag(0x0040, 0x0260), Attribute::new(VR::SQ, Value::Seq(vec![])));

        assert_eq!(
            to_value(&map).unwrap(),
            json!({
                "00100010": { "vr": "PN" },
                "00100020": { "vr": "LO" },
                "00400260": { "vr": "SQ" },
            }),
        );
    }

    #[test]
    fn serialize_numbers_and_tags() {
        let mut map = AttributeMap::new();
        map.insert(Tag(0x0018, 0x6020), Attribute::new(VR::SL, [-4_i32, 1024]));
        map.insert(Tag(0x0020, 0x0013), Attribute::new(VR::IS, ["5"]));
        map.insert(
            Tag(0x0028, 0x0030),
            Attribute::new(VR::FD, [0.5_f64, f64::NAN, f64::NEG_INFINITY]),
        );
        map.insert(
            Tag(0x0028, 0x0009),
            Attribute::new(
                VR::AT,
                Value::Seq(vec![Element::from("00181063"), Element::Int(0x0018_1065)]),
            ),
        );
        map.insert(Tag(0x0008, 0x1160), Attribute::new(VR::UL, [3_000_000_000_u32]));
        map.insert(
            Tag(0x0072, 0x0082),
            Attribute::new(VR::SV, [876_543_245_678_i64, i64::MAX]),
        );

        assert_eq!(
            to_value(&map).unwrap(),
            json!({
                "00186020": { "vr": "SL", "Value": [-4, 1024] },
                "00081160": { "vr": "UL", "Value": [3_000_000_000_u32] },
                "00200013": { "vr": "IS", "Value": ["5"] },
                "00280009": { "vr": "AT", "Value": ["00181063", "00181065"] },
                "00280030": { "vr": "FD", "Value": [0.5, "NaN", "-inf"] },
                // text only beyond the range of exact JSON numbers
                "00720082": { "vr": "SV", "Value": [876_543_245_678_i64, "9223372036854775807"] },
            }),
        );
    }

    #[test]
    fn serialize_binary_elements() {
        let mut map = AttributeMap::new();
        map.insert(Tag(0x7FE0, 0x0010), Attribute::new(VR::OW, [1_u16, 0x0203]));

        assert_eq!(
            to_value(&map).unwrap(),
            json!({
                "7FE00010": { "vr": "OW", "InlineBinary": "AQADAg==" },
            }),
        );

        // text cannot be made binary
        let mut map = AttributeMap::new();
        map.insert(Tag(0x7FE0, 0x0010), Attribute::new(VR::OB, ["pixels"]));
        assert!(to_value(&map).is_err());
    }

    #[test]
    fn serialize_sequence_attributes() {
        let mut inner = AttributeMap::new();
        inner.insert(Tag(0x0018, 0x9302), Attribute::new(VR::CS, ["SEQUENCED"]));
        inner.insert(Tag(0x0018, 0x9333), Attribute::new(VR::CS, ["NO"]));

        let mut item = AttributeMap::new();
        item.insert(Tag(0x0018, 0x9301), Attribute::new(VR::SQ, [inner]));

        let mut map = AttributeMap::new();
        map.insert(Tag(0x5200, 0x9229), Attribute::new(VR::SQ, [item]));

        assert_eq!(
            to_value(&map).unwrap(),
            json!({
                "52009229": {
                    "vr": "SQ",
                    "Value": [
                        {
                            "00189301": {
                                "vr": "SQ",
                                "Value": [
                                    {
                                        "00189302": {
                                            "vr": "CS",
                                            "Value": ["SEQUENCED"]
                                        },
                                        "00189333": {
                                            "vr": "CS",
                                            "Value": ["NO"]
                                        }
                                    }
                                ]
                            }
                        }
                    ]
                }
            }),
        );
    }

    #[test]
    fn serialize_tags() {
        assert_eq!(to_string(Tag(0x0008, 0x103e)).unwrap(), "\"0008103E\"");
    }
}
