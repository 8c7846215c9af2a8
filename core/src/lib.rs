#![crate_type = "lib"]
#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]

//! This is the core library of the DICOM dictionary writer,
//! containing the data types shared by the other crates in the workspace.
//!
//! - [`header`] comprises the definitions of DICOM tags
//!   and value representations.
//! - [`value`] holds the attribute value model:
//!   scalar strings, sequences of elements, and raw payloads.
//! - [`tags`] and [`uids`] declare the well-known attribute tags
//!   and transfer syntax UIDs used when writing DICOM files.
//!
//! [`header`]: ./header/index.html
//! [`value`]: ./value/index.html
//! [`tags`]: ./tags/index.html
//! [`uids`]: ./uids/index.html

pub mod header;
pub mod tags;
pub mod uids;
pub mod value;

pub use header::{ParseTagError, Tag, VR};
pub use value::{Attribute, AttributeMap, Element, Value};
