//! File meta group policies.
//!
//! The file meta group of a DICOM file is always encoded
//! in explicit VR little endian,
//! and it declares the transfer syntax of the data set which follows it.
use dicom_dict_core::{tags, uids, Attribute, AttributeMap, Element, Value, VR};
use std::borrow::Cow;

/// The magic code which follows the preamble of every DICOM file.
pub const DICM_MAGIC_CODE: &str = "DICM";

/// The length of the file preamble, in bytes.
pub const PREAMBLE_LENGTH: usize = 128;

/// The transfer syntax assumed when the file meta group does not declare one.
pub const DEFAULT_TRANSFER_SYNTAX: &str = uids::EXPLICIT_VR_LITTLE_ENDIAN;

/// Make sure that the file meta group declares a transfer syntax.
///
/// If `meta` has no _Transfer Syntax UID_ attribute,
/// one is inserted with the explicit VR little endian transfer syntax.
/// An existing attribute is never touched, even if its value is empty.
///
/// Returns whether an attribute was inserted.
pub fn ensure_transfer_syntax(meta: &mut AttributeMap) -> bool {
    if meta.contains_key(&tags::TRANSFER_SYNTAX_UID) {
        return false;
    }
    tracing::debug!(
        "File meta group has no transfer syntax, assuming {}",
        DEFAULT_TRANSFER_SYNTAX
    );
    meta.insert(
        tags::TRANSFER_SYNTAX_UID,
        Attribute::new(VR::UI, [DEFAULT_TRANSFER_SYNTAX]),
    );
    true
}

/// Obtain the transfer syntax UID declared by the file meta group,
/// without trailing padding.
///
/// This is the first value of the _Transfer Syntax UID_ attribute.
/// When the attribute is missing or its value is empty,
/// the explicit VR little endian transfer syntax is assumed.
pub fn transfer_syntax_uid(meta: &AttributeMap) -> Cow<'_, str> {
    let declared = meta
        .get(&tags::TRANSFER_SYNTAX_UID)
        .and_then(|attribute| attribute.value.as_ref())
        .and_then(|value| match value {
            Value::Str(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Seq(elements) => elements.first().and_then(Element::to_str),
            Value::Bulk(_) => None,
        });

    match declared {
        Some(Cow::Borrowed(uid)) => trim_uid(uid).map(Cow::Borrowed),
        Some(Cow::Owned(uid)) => trim_uid(&uid).map(|uid| Cow::Owned(uid.to_owned())),
        None => None,
    }
    .unwrap_or(Cow::Borrowed(DEFAULT_TRANSFER_SYNTAX))
}

fn trim_uid(uid: &str) -> Option<&str> {
    let uid = uid.trim_end_matches(|c: char| c == '\0' || c == ' ');
    if uid.is_empty() {
        None
    } else {
        Some(uid)
    }
}

#[cfg(test)]
mod tests {
    use super::{ensure_transfer_syntax, transfer_syntax_uid};
    use dicom_dict_core::{tags, uids, Attribute, AttributeMap, Element, Value, VR};

    #[test]
    fn inserts_default_transfer_syntax() {
        let mut meta = AttributeMap::new();
        assert!(ensure_transfer_syntax(&mut meta));
        assert_eq!(
            meta.get(&tags::TRANSFER_SYNTAX_UID),
            Some(&Attribute::new(VR::UI, [uids::EXPLICIT_VR_LITTLE_ENDIAN]))
        );

        // second time around, nothing changes
        assert!(!ensure_transfer_syntax(&mut meta));
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn keeps_declared_transfer_syntax() {
        let mut meta = AttributeMap::new();
        meta.insert(
            tags::TRANSFER_SYNTAX_UID,
            Attribute::new(VR::UI, [uids::IMPLICIT_VR_LITTLE_ENDIAN]),
        );
        assert!(!ensure_transfer_syntax(&mut meta));
        assert_eq!(transfer_syntax_uid(&meta), uids::IMPLICIT_VR_LITTLE_ENDIAN);

        // an empty attribute is kept as is
        let mut meta = AttributeMap::new();
        meta.insert(tags::TRANSFER_SYNTAX_UID, Attribute::empty(VR::UI));
        assert!(!ensure_transfer_syntax(&mut meta));
        assert_eq!(meta[&tags::TRANSFER_SYNTAX_UID].value, None);
    }

    #[test]
    fn resolves_transfer_syntax_uid() {
        let mut meta = AttributeMap::new();
        assert_eq!(transfer_syntax_uid(&meta), uids::EXPLICIT_VR_LITTLE_ENDIAN);

        meta.insert(
            tags::TRANSFER_SYNTAX_UID,
            Attribute::new(VR::UI, "1.2.840.10008.1.2.2\0"),
        );
        assert_eq!(transfer_syntax_uid(&meta), uids::EXPLICIT_VR_BIG_ENDIAN);

        meta.insert(
            tags::TRANSFER_SYNTAX_UID,
            Attribute::new(VR::UI, Value::Seq(vec![Element::from("")])),
        );
        assert_eq!(transfer_syntax_uid(&meta), uids::EXPLICIT_VR_LITTLE_ENDIAN);

        meta.insert(
            tags::TRANSFER_SYNTAX_UID,
            Attribute::new(VR::UI, Value::Bulk(vec![b'1', b'.'])),
        );
        assert_eq!(transfer_syntax_uid(&meta), uids::EXPLICIT_VR_LITTLE_ENDIAN);
    }
}
