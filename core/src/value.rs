//! Attribute values, as held by in-memory DICOM dictionaries.
//!
//! An attribute is a pair of a value representation and an optional
//! [`Value`]. A value is logically plural: a scalar string stands for a
//! sequence of one element.
use crate::header::{Tag, VR};
use itertools::Itertools;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// A mapping of attribute tags to attributes.
///
/// Iteration is always in ascending tag order.
pub type AttributeMap = BTreeMap<Tag, Attribute>;

/// One member of a multi-valued attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A piece of text
    Str(String),
    /// An integer number
    Int(i64),
    /// A floating point number
    Float(f64),
    /// A raw byte payload
    Bytes(Vec<u8>),
    /// A nested data set, as found in sequence (SQ) attributes
    Item(AttributeMap),
}

impl Element {
    /// Obtain the text of this element, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Element::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Obtain a textual rendition of a string or number element.
    ///
    /// Returns `None` for byte payloads and sequence items.
    pub fn to_str(&self) -> Option<Cow<'_, str>> {
        match self {
            Element::Str(s) => Some(Cow::Borrowed(s)),
            Element::Int(i) => Some(Cow::Owned(i.to_string())),
            Element::Float(f) => Some(Cow::Owned(f.to_string())),
            Element::Bytes(_) | Element::Item(_) => None,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Element::Str(s) => f.write_str(s),
            Element::Int(i) => write!(f, "{}", i),
            Element::Float(v) => write!(f, "{}", v),
            Element::Bytes(bytes) => write!(f, "[{} bytes]", bytes.len()),
            Element::Item(item) => write!(f, "(item with {} attributes)", item.len()),
        }
    }
}

impl PartialEq<str> for Element {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Element {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::Str(value.to_owned())
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::Str(value)
    }
}

macro_rules! impl_from_int {
    ($($t: ty),*) => {
        $(
            impl From<$t> for Element {
                fn from(value: $t) -> Self {
                    Element::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i16, u16, i32, u32, i64);

impl From<f32> for Element {
    fn from(value: f32) -> Self {
        Element::Float(f64::from(value))
    }
}

impl From<f64> for Element {
    fn from(value: f64) -> Self {
        Element::Float(value)
    }
}

impl From<AttributeMap> for Element {
    fn from(value: AttributeMap) -> Self {
        Element::Item(value)
    }
}

/// The value of an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single string, equivalent to a sequence of one string element.
    Str(String),
    /// An ordered sequence of elements.
    Seq(Vec<Element>),
    /// A raw binary payload which is neither a string nor a sequence.
    Bulk(Vec<u8>),
}

impl Value {
    /// Whether the value holds no data:
    /// an empty string, an empty sequence, or an empty payload.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Str(s) => s.is_empty(),
            Value::Seq(elements) => elements.is_empty(),
            Value::Bulk(bytes) => bytes.is_empty(),
        }
    }

    /// The number of elements in this value.
    ///
    /// A non-empty string or payload counts as one.
    pub fn multiplicity(&self) -> usize {
        match self {
            Value::Seq(elements) => elements.len(),
            v if v.is_empty() => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Seq(elements) => write!(f, "{}", elements.iter().join("\\")),
            Value::Bulk(bytes) => write!(f, "[{} bytes]", bytes.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Element>> for Value {
    fn from(value: Vec<Element>) -> Self {
        Value::Seq(value)
    }
}

impl<T, const N: usize> From<[T; N]> for Value
where
    T: Into<Element>,
{
    fn from(value: [T; N]) -> Self {
        Value::Seq(value.into_iter().map(Into::into).collect())
    }
}

impl<T> FromIterator<T> for Value
where
    T: Into<Element>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Seq(iter.into_iter().map(Into::into).collect())
    }
}

/// A DICOM attribute: a value representation and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// The value representation
    pub vr: VR,
    /// The attribute's value, or `None` if the value is absent
    pub value: Option<Value>,
}

impl Attribute {
    /// Create an attribute with the given value.
    pub fn new<V>(vr: VR, value: V) -> Self
    where
        V: Into<Value>,
    {
        Attribute {
            vr,
            value: Some(value.into()),
        }
    }

    /// Create an attribute without a value.
    pub fn empty(vr: VR) -> Self {
        Attribute { vr, value: None }
    }
}
