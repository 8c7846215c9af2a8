//! DICOM encoding primitives for the DICOM dictionary writer.
//!
//! This crate provides the two collaborators of the file writer:
//!
//! - [`ByteStream`], a growable in-memory byte buffer;
//! - the element encoder in [`write`], which serializes attribute maps
//!   and single attributes under a given [transfer syntax].
//!
//! All APIs work on in-memory buffers.
//!
//! [transfer syntax]: ./transfer_syntax/index.html
#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(missing_debug_implementations, unused_qualifications)]

pub mod encode;
pub mod stream;
pub mod transfer_syntax;
pub mod write;

pub use byteordered::Endianness;
pub use encode::{Encode, Error, Result};
pub use stream::ByteStream;
pub use transfer_syntax::TransferSyntax;
pub use write::{write, write_tag_object};
