//! DICOM JSON module
//!
//!
//! This library provides serialization of DICOM attribute maps to JSON
//! and deserialization of JSON to DICOM attribute maps,
//! as per the [DICOM standard part 18 chapter F][1].
//!
//! [1]: https://dicom.nema.org/medical/dicom/current/output/chtml/part18/chapter_F.html
//!
//! The easiest path to serialization is in
//! using the functions readily available [`to_string`] and [`to_value`].
//! Deserialization is done with [`from_str`], [`from_slice`],
//! [`from_reader`] or [`from_value`].
//!
//! # Example
//!
//! ```rust
//! # use dicom_dict_core::{Attribute, AttributeMap, Tag, VR};
//! let mut map = AttributeMap::new();
//! map.insert(Tag(0x0008, 0x0021), Attribute::new(VR::DA, ["20230610"]));
//! map.insert(Tag(0x0020, 0x0013), Attribute::new(VR::IS, ["5"]));
//!
//! let json = dicom_dict_json::to_string(&map)?;
//!
//! assert_eq!(
//!     json,
//!     r#"{"00080021":{"vr":"DA","Value":["20230610"]},"00200013":{"vr":"IS","Value":["5"]}}"#
//! );
//!
//! let back: AttributeMap = dicom_dict_json::from_str(&json)?;
//! assert_eq!(back, map);
//! Ok::<(), serde_json::Error>(())
//! ```

mod de;
mod ser;

pub use crate::de::{from_reader, from_slice, from_str, from_value};
pub use crate::ser::{to_string, to_string_pretty, to_value, to_vec, to_writer};

/// A wrapper type for DICOM JSON serialization using [Serde](serde).
///
/// Serializing this type will yield JSON data according to the standard.
///
/// Deserialization into this type is possible
/// for [attribute maps](dicom_dict_core::AttributeMap)
/// and [tags](dicom_dict_core::Tag).
#[derive(Debug, Clone, PartialEq)]
pub struct DicomJson<T>(T);

impl<T> DicomJson<T> {
    /// Unwrap the DICOM JSON wrapper,
    /// returning the underlying value.
    pub fn into_inner(self) -> T {
        self.0
    }

    /// Obtain a reference to the underlying value.
    pub fn inner(&self) -> &T {
        &self.0
    }
}

// Floating point values which JSON numbers cannot represent.
const NAN: &str = "NaN";
const INFINITY: &str = "inf";
const NEG_INFINITY: &str = "-inf";
