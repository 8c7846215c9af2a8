//! This crate contains a high-level abstraction
//! for building DICOM objects in memory and writing them as DICOM files.
//!
//! A [`DicomDict`] is a dictionary of DICOM attributes
//! indexed by tag, paired with the attributes of a file meta group.
//! Attributes are inserted or updated with [`DicomDict::upsert_tag`]
//! and read back with [`DicomDict::get_value`] and [`DicomDict::get_values`].
//!
//! # Example
//!
//! ```no_run
//! use dicom_dict_object::{AttributeMap, DicomDict, Tag, VR};
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut dict = DicomDict::new(AttributeMap::new());
//! dict.upsert_tag(Tag(0x0010, 0x0010), VR::PN, ["Doe^John"]);
//! dict.upsert_tag(Tag(0x0010, 0x0020), VR::LO, ["12345"]);
//!
//! // obtain the bytes of a DICOM file
//! let bytes = dict.write()?;
//!
//! // or save them right away
//! dict.write_to_file("0001.dcm")?;
//! # Ok(())
//! # }
//! ```
//!
//! If the file meta group given to [`DicomDict::new`]
//! does not declare a transfer syntax,
//! explicit VR little endian is declared on the first write.
pub mod dict;
pub mod meta;

pub use crate::dict::DicomDict;
pub use dicom_dict_core::{Attribute, AttributeMap, Element, Tag, Value, VR};
pub use dicom_dict_encoding::Error as EncodeError;

use snafu::{Backtrace, Snafu};

/// An error which may occur when writing a DICOM file
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Could not encode DICOM object"))]
    Encode {
        #[snafu(backtrace)]
        source: dicom_dict_encoding::Error,
    },
    #[snafu(display("Could not write to file '{}'", filename.display()))]
    WriteFile {
        filename: std::path::PathBuf,
        backtrace: Backtrace,
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use crate::{DicomDict, Error};
    use dicom_dict_core::{Attribute, AttributeMap, Tag, VR};

    #[test]
    fn write_to_file_saves_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("0001.dcm");

        let mut dict = DicomDict::new(AttributeMap::new());
        dict.upsert_tag(Tag(0x0010, 0x0010), VR::PN, ["Doe^John"]);
        dict.write_to_file(&path).unwrap();

        let saved = std::fs::read(&path).unwrap();
        assert_eq!(saved, dict.write().unwrap());
    }

    #[test]
    fn write_to_file_reports_encoding_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("0002.dcm");

        let mut meta = AttributeMap::new();
        meta.insert(
            Tag(0x0002, 0x0010),
            Attribute::new(VR::UI, ["1.2.3.4"]),
        );
        let mut dict = DicomDict::new(meta);
        let err = dict.write_to_file(&path).unwrap_err();
        assert!(matches!(err, Error::Encode { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn write_to_file_reports_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("0003.dcm");

        let mut dict = DicomDict::new(AttributeMap::new());
        let err = dict.write_to_file(&path).unwrap_err();
        assert!(matches!(err, Error::WriteFile { .. }));
    }
}
