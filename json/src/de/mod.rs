//! DICOM JSON deserialization module

use std::fmt::Display;
use std::str::FromStr;

use crate::DicomJson;
use dicom_dict_core::{Attribute, AttributeMap, Element, Tag, Value, VR};
use serde::de::{Deserialize, DeserializeOwned, Error as _, Visitor};

use self::value::{BulkDataUri, DicomJsonPerson, NumberOrText};

mod value;

/// Deserialize a piece of DICOM data from a string of JSON.
pub fn from_str<'a, T>(string: &'a str) -> Result<T, serde_json::Error>
where
    DicomJson<T>: Deserialize<'a>,
{
    serde_json::from_str::<DicomJson<T>>(string).map(DicomJson::into_inner)
}

/// Deserialize a piece of DICOM data from a byte slice.
pub fn from_slice<'a, T>(slice: &'a [u8]) -> Result<T, serde_json::Error>
where
    DicomJson<T>: Deserialize<'a>,
{
    serde_json::from_slice::<DicomJson<T>>(slice).map(DicomJson::into_inner)
}

/// Deserialize a piece of DICOM data from a standard byte reader.
pub fn from_reader<R, T>(reader: R) -> Result<T, serde_json::Error>
where
    R: std::io::Read,
    DicomJson<T>: DeserializeOwned,
{
    serde_json::from_reader::<_, DicomJson<T>>(reader).map(DicomJson::into_inner)
}

/// Deserialize a piece of DICOM data from a serde JSON value.
pub fn from_value<T>(value: serde_json::Value) -> Result<T, serde_json::Error>
where
    DicomJson<T>: DeserializeOwned,
{
    serde_json::from_value::<DicomJson<T>>(value).map(DicomJson::into_inner)
}

#[derive(Debug, Default)]
struct AttributeMapVisitor;

impl<'de> Visitor<'de> for AttributeMapVisitor {
    type Value = AttributeMap;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a DICOM data set map")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut out = AttributeMap::new();
        while let Some(e) = map.next_entry::<DicomJson<Tag>, JsonAttribute>()? {
            let (
                DicomJson(tag),
                JsonAttribute {
                    vr,
                    value,
                    bulk_data_uri,
                },
            ) = e;
            if let Some(uri) = bulk_data_uri {
                tracing::warn!(
                    "bulk data URI is not supported; skipping {} (at {})",
                    tag,
                    uri
                );
            } else {
                out.insert(tag, Attribute { vr, value });
            }
        }
        Ok(out)
    }
}

impl<'de> Deserialize<'de> for DicomJson<AttributeMap> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer
            .deserialize_map(AttributeMapVisitor)
            .map(DicomJson)
    }
}

#[derive(Debug)]
struct JsonAttribute {
    vr: VR,
    value: Option<Value>,
    bulk_data_uri: Option<BulkDataUri>,
}

#[derive(Debug)]
struct AttributeVisitor;

/// Read a JSON array of numbers or numeric strings.
fn numbers<N, E>(value: serde_json::Value) -> Result<Vec<N>, E>
where
    N: Clone + FromStr + DeserializeOwned,
    N::Err: Display,
    E: serde::de::Error,
{
    let items: Vec<NumberOrText<N>> = serde_json::from_value(value).map_err(E::custom)?;
    items
        .iter()
        .map(|v| v.to_num().map_err(E::custom))
        .collect()
}

impl<'de> Visitor<'de> for AttributeVisitor {
    type Value = JsonAttribute;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a data element object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut vr = None;
        let mut value: Option<serde_json::Value> = None;
        let mut inline_binary = None;
        let mut bulk_data_uri = None;

        while let Some(key) = map.next_key::<String>()? {
            match &*key {
                "vr" => {
                    if vr.is_some() {
                        return Err(A::Error::custom("\"vr\" should only be set once"));
                    }

                    let val: String = map.next_value()?;
                    vr = Some(VR::from_str(&val).unwrap_or(VR::UN));
                }
                "Value" => {
                    if inline_binary.is_some() {
                        return Err(A::Error::custom(
                            "\"Value\" conflicts with \"InlineBinary\"",
                        ));
                    }

                    if bulk_data_uri.is_some() {
                        return Err(A::Error::custom("\"Value\" conflicts with \"BulkDataURI\""));
                    }

                    value = Some(map.next_value()?);
                }
                "InlineBinary" => {
                    if value.is_some() {
                        return Err(A::Error::custom(
                            "\"InlineBinary\" conflicts with \"Value\"",
                        ));
                    }

                    if bulk_data_uri.is_some() {
                        return Err(A::Error::custom(
                            "\"InlineBinary\" conflicts with \"BulkDataURI\"",
                        ));
                    }
                    // read value as string
                    let val: String = map.next_value()?;
                    inline_binary = Some(val);
                }
                "BulkDataURI" => {
                    if value.is_some() {
                        return Err(A::Error::custom("\"BulkDataURI\" conflicts with \"Value\""));
                    }

                    if inline_binary.is_some() {
                        return Err(A::Error::custom(
                            "\"BulkDataURI\" conflicts with \"InlineBinary\"",
                        ));
                    }

                    let val: BulkDataUri = map.next_value()?;
                    bulk_data_uri = Some(val);
                }
                _ => {
                    return Err(A::Error::custom("Unrecognized data element field"));
                }
            }
        }

        // ensure that VR is present
        let Some(vr) = vr else {
            return Err(A::Error::custom("missing VR field"));
        };

        let mut values = None;
        if let Some(value) = value {
            // deserialize value in different ways
            // depending on VR
            let elements: Vec<Element> = match vr {
                // sequence
                VR::SQ => {
                    let items: Vec<DicomJson<AttributeMap>> =
                        serde_json::from_value(value).map_err(A::Error::custom)?;
                    items
                        .into_iter()
                        .map(|item| Element::Item(item.into_inner()))
                        .collect()
                }
                // always text
                VR::AE
                | VR::AS
                | VR::CS
                | VR::DA
                | VR::DT
                | VR::LO
                | VR::LT
                | VR::SH
                | VR::ST
                | VR::UT
                | VR::UR
                | VR::TM
                | VR::UC
                | VR::UI => {
                    let items: Vec<Option<String>> =
                        serde_json::from_value(value).map_err(A::Error::custom)?;
                    items
                        .into_iter()
                        .map(|v| Element::Str(v.unwrap_or_default()))
                        .collect()
                }
                // integers, sometimes given as text
                VR::SS
                | VR::US
                | VR::SL
                | VR::UL
                | VR::SV
                | VR::UV
                | VR::OB
                | VR::OW
                | VR::OL
                | VR::OV => numbers::<i64, A::Error>(value)?
                    .into_iter()
                    .map(Element::Int)
                    .collect(),
                // floating point, with non-finite values given as text
                VR::FL | VR::FD | VR::OF | VR::OD => numbers::<f64, A::Error>(value)?
                    .into_iter()
                    .map(Element::Float)
                    .collect(),
                // sometimes numbers, sometimes text,
                // but retain string form
                VR::DS | VR::IS => {
                    let items: Vec<NumberOrText<f64>> =
                        serde_json::from_value(value).map_err(A::Error::custom)?;
                    items
                        .into_iter()
                        .map(|v| Element::Str(v.to_string()))
                        .collect()
                }
                // person names
                VR::PN => {
                    let items: Vec<Option<DicomJsonPerson>> =
                        serde_json::from_value(value).map_err(A::Error::custom)?;
                    items
                        .into_iter()
                        .map(|v| Element::Str(v.map(|p| p.to_string()).unwrap_or_default()))
                        .collect()
                }
                // tags
                VR::AT => {
                    let items: Vec<DicomJson<Tag>> =
                        serde_json::from_value(value).map_err(A::Error::custom)?;
                    items
                        .into_iter()
                        .map(|t| Element::Str(t.into_inner().to_hex_string()))
                        .collect()
                }
                // unknown
                VR::UN => return Err(A::Error::custom("can't parse JSON Value in UN")),
            };
            values = Some(Value::Seq(elements));
        }

        let value = match (values, inline_binary) {
            (None, None) => None,
            (None, Some(inline_binary)) => {
                // decode from Base64
                use base64::Engine;
                let data = base64::engine::general_purpose::STANDARD
                    .decode(inline_binary)
                    .map_err(|_| A::Error::custom("inline binary data is not valid base64"))?;
                Some(Value::Bulk(data))
            }
            (Some(values), _) => Some(values),
        };

        Ok(JsonAttribute {
            vr,
            value,
            bulk_data_uri,
        })
    }
}

impl<'de> Deserialize<'de> for JsonAttribute {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_struct(
            "DataElement",
            &["vr", "Value", "InlineBinary", "BulkDataURI"],
            AttributeVisitor,
        )
    }
}

#[derive(Debug)]
struct TagVisitor;

impl Visitor<'_> for TagVisitor {
    type Value = Tag;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a DICOM tag string in the form \"GGGGEEEE\"")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for DicomJson<Tag> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(TagVisitor).map(DicomJson)
    }
}

#[cfg(test)]
mod tests {
    use super::{from_slice, from_str, from_value};
    use dicom_dict_core::{Attribute, AttributeMap, Element, Tag, Value, VR};
    use pretty_assertions::assert_eq;

    #[test]
    fn can_parse_tags() {
        let serialized = "\"00080010\"";
        let tag: Tag = from_str(serialized).unwrap();
        assert_eq!(tag, Tag(0x0008, 0x0010));

        let serialized = "\"00200013\"";
        let tag: Tag = from_str(serialized).unwrap();
        assert_eq!(tag, Tag(0x0020, 0x0013));

        assert!(from_str::<Tag>("\"0020001\"").is_err());
    }

    #[test]
    fn can_parse_simple_data_sets() {
        let serialized = serde_json::json!({
            "00080005": {
                "Value": [ "ISO_IR 192" ],
                "vr": "CS"
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
            },
            "00280010": {
                "vr": "US",
                "Value": [ 512 ]
            },
            "00200013": {
                "vr": "IS",
                "Value": [ 5 ]
            }
        });

        let map: AttributeMap = from_value(serialized).unwrap();

        assert_eq!(map.len(), 8);
        assert_eq!(
            map.get(&Tag(0x0008, 0x0005)),
            Some(&Attribute::new(VR::CS, ["ISO_IR 192"])),
        );
        assert_eq!(
            map.get(&Tag(0x0008, 0x0061)),
            Some(&Attribute::new(VR::CS, ["CT", "PET"])),
        );
        assert_eq!(
            map.get(&Tag(0x0008, 0x0090)),
            Some(&Attribute::new(VR::PN, ["^Bob^^Dr."])),
        );
        assert_eq!(
            map.get(&Tag(0x0009, 0x1002)),
            Some(&Attribute::new(
                VR::UN,
                Value::Bulk(vec![0xcf, 0x4c, 0x7d, 0x73, 0xcb, 0xfb])
            )),
        );
        assert_eq!(
            map.get(&Tag(0x0028, 0x0010)),
            Some(&Attribute::new(VR::US, [512_u16])),
        );
        assert_eq!(
            map.get(&Tag(0x0020, 0x0013)),
            Some(&Attribute::new(VR::IS, ["5"])),
        );
    }

    #[test]
    fn can_parse_null_values() {
        let serialized = serde_json::json!({
            "00080008": {
                "Value": [
                  "DERIVED",
                  "PRIMARY",
                  null,
                  "100000"
                ],
                "vr": "CS"
            },
            "00100010": {
                "vr": "PN"
            }
        });

        let map: AttributeMap = from_value(serialized).unwrap();

        assert_eq!(
            map.get(&Tag(0x0008, 0x0008)),
            Some(&Attribute::new(
                VR::CS,
                ["DERIVED", "PRIMARY", "", "100000"]
            )),
        );
        assert_eq!(
            map.get(&Tag(0x0010, 0x0010)),
            Some(&Attribute::empty(VR::PN)),
        );
    }

    #[test]
    fn skips_bulk_data() {
        let serialized = serde_json::json!({
            "00100010": {
                "vr": "PN",
                "Value": [ { "Alphabetic": "Doe^John" } ]
            },
            "7FE00010": {
                "vr": "OW",
                "BulkDataURI": "http://localhost:8042/dicom-web/studies/1.2.3/series/4.5.6/instances/7.8.9/bulk/7fe00010"
            }
        });

        let map: AttributeMap = from_value(serialized).unwrap();
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key(&Tag(0x7FE0, 0x0010)));
    }

    #[test]
    fn can_resolve_nan_and_inf_float() {
        let serialized = serde_json::json!({
            "0018605A": {
                "vr": "FL",
                "Value": [
                    5492.8545,
                    "NaN",
                    "-inf",
                    "inf"
                ]
            }
        });

        let map: AttributeMap = from_value(serialized).unwrap();
        let attribute = &map[&Tag(0x0018, 0x605A)];
        let Some(Value::Seq(elements)) = &attribute.value else {
            panic!("expected a sequence of elements, got {:?}", attribute.value);
        };

        assert_eq!(elements.len(), 4);
        assert_eq!(elements[0], Element::Float(5492.8545));
        assert!(matches!(elements[1], Element::Float(f) if f.is_nan()));
        assert_eq!(elements[2], Element::Float(f64::NEG_INFINITY));
        assert_eq!(elements[3], Element::Float(f64::INFINITY));
    }

    #[test]
    fn can_parse_sequences_and_tags() {
        let json = br#"{
            "00082218": {
                "vr": "SQ",
                "Value": [
                    {
                        "00080100": { "vr": "SH", "Value": ["T-D1100"] },
                        "00080102": { "vr": "SH", "Value": ["SRT"] }
                    }
                ]
            },
            "00209165": {
                "vr": "AT",
                "Value": ["0020000e", "00209111"]
            }
        }"#;

        let map: AttributeMap = from_slice(json).unwrap();

        let mut item = AttributeMap::new();
        item.insert(Tag(0x0008, 0x0100), Attribute::new(VR::SH, ["T-D1100"]));
        item.insert(Tag(0x0008, 0x0102), Attribute::new(VR::SH, ["SRT"]));
        assert_eq!(
            map.get(&Tag(0x0008, 0x2218)),
            Some(&Attribute::new(VR::SQ, [item])),
        );
        assert_eq!(
            map.get(&Tag(0x0020, 0x9165)),
            Some(&Attribute::new(VR::AT, ["0020000E", "00209111"])),
        );
    }

    #[test]
    fn unknown_vr_becomes_un() {
        let map: AttributeMap =
            from_str(r#"{"00091001": {"vr": "XX", "InlineBinary": "AAE="}}"#).unwrap();
        assert_eq!(
            map.get(&Tag(0x0009, 0x1001)),
            Some(&Attribute::new(VR::UN, Value::Bulk(vec![0, 1]))),
        );
    }

    #[test]
    fn rejects_malformed_attributes() {
        // no VR
        assert!(from_str::<AttributeMap>(r#"{"00100010": {"Value": ["A"]}}"#).is_err());
        // conflicting value fields
        assert!(from_str::<AttributeMap>(
            r#"{"00091001": {"vr": "OB", "Value": [1], "InlineBinary": "AAE="}}"#
        )
        .is_err());
        // bad base64
        assert!(
            from_str::<AttributeMap>(r#"{"00091001": {"vr": "OB", "InlineBinary": "!!"}}"#)
                .is_err()
        );
        // not a number
        assert!(from_str::<AttributeMap>(
            r#"{"00280010": {"vr": "US", "Value": ["many"]}}"#
        )
        .is_err());
    }
}
