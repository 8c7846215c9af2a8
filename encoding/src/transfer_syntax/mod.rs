//! Module containing the DICOM transfer syntax data structure
//! and the table of transfer syntaxes known to the encoder.
//!
//! A [`TransferSyntax`] describes the byte level layout
//! of the data elements in a data set:
//! byte order, whether the value representation is explicit,
//! and whether the data set is deflated.
//! Encapsulated (compressed) pixel data transfer syntaxes
//! use the explicit VR little endian layout for their data elements.
use byteordered::Endianness;
use dicom_dict_core::uids;

/// A DICOM transfer syntax specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSyntax {
    /// The unique identifier of the transfer syntax.
    uid: &'static str,
    /// The name of the transfer syntax.
    name: &'static str,
    /// The byte order of data.
    byte_order: Endianness,
    /// Whether the transfer syntax mandates an explicit value representation,
    /// or the VR is implicit.
    explicit_vr: bool,
    /// Whether the data set is compressed with deflate after encoding.
    deflated: bool,
}

impl TransferSyntax {
    /// Create a new transfer syntax descriptor.
    pub const fn new(
        uid: &'static str,
        name: &'static str,
        byte_order: Endianness,
        explicit_vr: bool,
        deflated: bool,
    ) -> Self {
        TransferSyntax {
            uid,
            name,
            byte_order,
            explicit_vr,
            deflated,
        }
    }

    /// Create a new descriptor for an explicit VR little endian
    /// transfer syntax without deflate,
    /// such as those of encapsulated pixel data.
    pub const fn new_ele(uid: &'static str, name: &'static str) -> Self {
        TransferSyntax::new(uid, name, Endianness::Little, true, false)
    }

    /// Obtain this transfer syntax' unique identifier.
    pub const fn uid(&self) -> &'static str {
        self.uid
    }

    /// Obtain the name of this transfer syntax.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Obtain this transfer syntax' expected endianness.
    pub const fn endianness(&self) -> Endianness {
        self.byte_order
    }

    /// Check whether this transfer syntax specifies an explicit VR.
    pub const fn explicit_vr(&self) -> bool {
        self.explicit_vr
    }

    /// Check whether the data set is deflated.
    pub const fn deflated(&self) -> bool {
        self.deflated
    }
}

/// Implicit VR Little Endian: Default Transfer Syntax for DICOM
pub const IMPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax::new(
    uids::IMPLICIT_VR_LITTLE_ENDIAN,
    "Implicit VR Little Endian",
    Endianness::Little,
    false,
    false,
);

/// Explicit VR Little Endian
pub const EXPLICIT_VR_LITTLE_ENDIAN: TransferSyntax =
    TransferSyntax::new_ele(uids::EXPLICIT_VR_LITTLE_ENDIAN, "Explicit VR Little Endian");

/// Explicit VR Big Endian
pub const EXPLICIT_VR_BIG_ENDIAN: TransferSyntax = TransferSyntax::new(
    uids::EXPLICIT_VR_BIG_ENDIAN,
    "Explicit VR Big Endian",
    Endianness::Big,
    true,
    false,
);

/// Deflated Explicit VR Little Endian
pub const DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax::new(
    uids::DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN,
    "Deflated Explicit VR Little Endian",
    Endianness::Little,
    true,
    true,
);

/// All transfer syntaxes known to the encoder.
pub const ENTRIES: &[TransferSyntax] = &[
    IMPLICIT_VR_LITTLE_ENDIAN,
    EXPLICIT_VR_LITTLE_ENDIAN,
    EXPLICIT_VR_BIG_ENDIAN,
    DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN,
    TransferSyntax::new_ele(
        uids::ENCAPSULATED_UNCOMPRESSED_EXPLICIT_VR_LITTLE_ENDIAN,
        "Encapsulated Uncompressed Explicit VR Little Endian",
    ),
    TransferSyntax::new_ele(uids::JPEG_BASELINE8_BIT, "JPEG Baseline (Process 1)"),
    TransferSyntax::new_ele(uids::JPEG_EXTENDED12_BIT, "JPEG Extended (Process 2 & 4)"),
    TransferSyntax::new_ele(
        uids::JPEG_LOSSLESS,
        "JPEG Lossless, Non-Hierarchical (Process 14)",
    ),
    TransferSyntax::new_ele(
        uids::JPEG_LOSSLESS_SV1,
        "JPEG Lossless, Non-Hierarchical, First-Order Prediction",
    ),
    TransferSyntax::new_ele(uids::JPEGLS_LOSSLESS, "JPEG-LS Lossless Image Compression"),
    TransferSyntax::new_ele(
        uids::JPEGLS_NEAR_LOSSLESS,
        "JPEG-LS Lossy (Near-Lossless) Image Compression",
    ),
    TransferSyntax::new_ele(
        uids::JPEG2000_LOSSLESS,
        "JPEG 2000 Image Compression (Lossless Only)",
    ),
    TransferSyntax::new_ele(uids::JPEG2000, "JPEG 2000 Image Compression"),
    TransferSyntax::new_ele(uids::RLE_LOSSLESS, "RLE Lossless"),
];

/// Obtain a transfer syntax by its respective UID.
///
/// Trailing null characters and spaces in `uid`,
/// as left by value padding, are ignored.
pub fn get(uid: &str) -> Option<&'static TransferSyntax> {
    let uid = uid.trim_end_matches(|c: char| c == '\0' || c == ' ');
    ENTRIES.iter().find(|ts| ts.uid == uid)
}

#[cfg(test)]
mod tests {
    use super::get;
    use byteordered::Endianness;

    #[test]
    fn get_base_transfer_syntaxes() {
        let ts = get("1.2.840.10008.1.2").unwrap();
        assert!(!ts.explicit_vr());
        assert_eq!(ts.endianness(), Endianness::Little);
        assert_eq!(ts.name(), "Implicit VR Little Endian");

        let ts = get("1.2.840.10008.1.2.2").unwrap();
        assert!(ts.explicit_vr());
        assert_eq!(ts.endianness(), Endianness::Big);

        let ts = get("1.2.840.10008.1.2.1.99").unwrap();
        assert!(ts.deflated());
    }

    #[test]
    fn get_ignores_padding() {
        let ts = get("1.2.840.10008.1.2.1\0").unwrap();
        assert_eq!(ts.uid(), "1.2.840.10008.1.2.1");
        assert!(get("1.2.840.10008.1.2.4.50 ").is_some());
    }

    #[test]
    fn get_unknown() {
        assert_eq!(get("1.2.3.4"), None);
        assert_eq!(get(""), None);
    }
}
