//! Separate test suite for building attribute maps
//! through the public API only.
use dicom_dict_core::{tags, uids, Attribute, AttributeMap, Element, Tag, Value, VR};

#[test]
fn attribute_maps_iterate_in_tag_order() {
    let mut map = AttributeMap::new();
    map.insert("00280010".parse().unwrap(), Attribute::new(VR::US, [512_u16]));
    map.insert(tags::PATIENT_NAME, Attribute::new(VR::PN, "Sim\u{f5}es^Jo\u{e3}o"));
    map.insert("(0008,0060)".parse().unwrap(), Attribute::new(VR::CS, ["MR"]));
    map.insert(tags::TRANSFER_SYNTAX_UID, Attribute::new(VR::UI, [uids::EXPLICIT_VR_LITTLE_ENDIAN]));

    let tags: Vec<String> = map.keys().map(|tag| tag.to_hex_string()).collect();
    assert_eq!(tags, ["00020010", "00080060", "00100010", "00280010"]);

    // one entry per tag
    map.insert(Tag(0x0008, 0x0060), Attribute::new(VR::CS, ["CT"]));
    assert_eq!(map.len(), 4);
    assert_eq!(
        map[&Tag(0x0008, 0x0060)].value,
        Some(Value::Seq(vec![Element::from("CT")]))
    );
}

#[test]
fn value_representations_from_text() {
    let vrs: Vec<VR> = ["UL", "SH", "SQ", "OB"]
        .iter()
        .map(|code| code.parse().unwrap())
        .collect();
    assert_eq!(vrs, [VR::UL, VR::SH, VR::SQ, VR::OB]);
    assert!("ZZ".parse::<VR>().is_err());
    assert_eq!(VR::from_binary(*b"PN"), Some(VR::PN));
}
