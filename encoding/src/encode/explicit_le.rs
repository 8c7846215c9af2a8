//! Explicit VR Little Endian syntax transfer implementation

use crate::encode::basic::LittleEndianBasicEncoder;
use crate::encode::{BasicEncode, Encode, Result, WriteHeaderSnafu, WriteTagSnafu};
use byteordered::byteorder::{ByteOrder, LittleEndian};
use byteordered::Endianness;
use dicom_dict_core::{Tag, VR};
use snafu::ResultExt;
use std::io::{self, Write};

/// A concrete encoder for the transfer syntax ExplicitVRLittleEndian
#[derive(Debug, Default, Clone)]
pub struct ExplicitVRLittleEndianEncoder {
    basic: LittleEndianBasicEncoder,
}

impl BasicEncode for ExplicitVRLittleEndianEncoder {
    fn endianness(&self) -> Endianness {
        Endianness::Little
    }

    fn encode_us<S>(&self, to: S, value: u16) -> io::Result<()>
    where
        S: Write,
    {
        self.basic.encode_us(to, value)
    }

    fn encode_ul<S>(&self, to: S, value: u32) -> io::Result<()>
    where
        S: Write,
    {
        self.basic.encode_ul(to, value)
    }

    fn encode_uv<S>(&self, to: S, value: u64) -> io::Result<()>
    where
        S: Write,
    {
        self.basic.encode_uv(to, value)
    }

    fn encode_ss<S>(&self, to: S, value: i16) -> io::Result<()>
    where
        S: Write,
    {
        self.basic.encode_ss(to, value)
    }

    fn encode_sl<S>(&self, to: S, value: i32) -> io::Result<()>
    where
        S: Write,
    {
        self.basic.encode_sl(to, value)
    }

    fn encode_sv<S>(&self, to: S, value: i64) -> io::Result<()>
    where
        S: Write,
    {
        self.basic.encode_sv(to, value)
    }

    fn encode_fl<S>(&self, to: S, value: f32) -> io::Result<()>
    where
        S: Write,
    {
        self.basic.encode_fl(to, value)
    }

    fn encode_fd<S>(&self, to: S, value: f64) -> io::Result<()>
    where
        S: Write,
    {
        self.basic.encode_fd(to, value)
    }
}

impl Encode for ExplicitVRLittleEndianEncoder {
    fn explicit_vr(&self) -> bool {
        true
    }

    fn encode_tag<W>(&self, mut to: W, tag: Tag) -> Result<()>
    where
        W: Write,
    {
        let mut buf = [0u8; 4];
        LittleEndian::write_u16(&mut buf[..], tag.group());
        LittleEndian::write_u16(&mut buf[2..], tag.element());
        to.write_all(&buf).context(WriteTagSnafu)
    }

    fn encode_element_header<W>(&self, mut to: W, tag: Tag, vr: VR, len: u32) -> Result<usize>
    where
        W: Write,
    {
        if vr.has_short_length() {
            // PS3.5 7.1.2:
            // the Value Length Field is the 16-bit unsigned integer
            // following the two byte VR Field (Table 7.1-2)
            let mut buf = [0u8; 8];
            LittleEndian::write_u16(&mut buf[0..], tag.group());
            LittleEndian::write_u16(&mut buf[2..], tag.element());
            let vr_bytes = vr.to_bytes();
            buf[4] = vr_bytes[0];
            buf[5] = vr_bytes[1];
            LittleEndian::write_u16(&mut buf[6..], len as u16);
            to.write_all(&buf).context(WriteHeaderSnafu)?;
            Ok(8)
        } else {
            // PS3.5 7.1.2:
            // for all other VRs the 16 bits following the two byte VR Field
            // are reserved and set to 0000H (Table 7.1-1).
            // The Value Length Field is a 32-bit unsigned integer.
            let mut buf = [0u8; 12];
            LittleEndian::write_u16(&mut buf[0..], tag.group());
            LittleEndian::write_u16(&mut buf[2..], tag.element());
            let vr_bytes = vr.to_bytes();
            buf[4] = vr_bytes[0];
            buf[5] = vr_bytes[1];
            // buf[6..8] is kept zero'd
            LittleEndian::write_u32(&mut buf[8..], len);
            to.write_all(&buf).context(WriteHeaderSnafu)?;
            Ok(12)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ExplicitVRLittleEndianEncoder;
    use crate::encode::Encode;
    use dicom_dict_core::{Tag, VR};
    use std::io::Write;

    // manually crafting some DICOM data elements
    #[rustfmt::skip]
    const RAW: &[u8] = &[
        0x02, 0x00, 0x10, 0x00,     // (0002,0010) (LE) Transfer Syntax UID
            b'U', b'I',             // VR: UI (UID)
            0x14, 0x00,             // Length: 20 bytes (LE)
                // UID: 1.2.840.10008.1.2.1 (ExplicitVRLittleEndian)
                b'1', b'.', b'2', b'.', b'8', b'4', b'0', b'.', b'1', b'0', b'0', b'0', b'8', b'.',
                b'1', b'.', b'2', b'.', b'1',
                0x00,               // Padding to make length even
        0x10, 0x00, 0x10, 0x00,     // (0010,0010) (LE) Patient Name
            b'P', b'N',             // VR: PN (Person Name)
            0x08, 0x00,             // Length: 8 bytes (LE)
                // String: "Doe^John"
                b'D', b'o', b'e', b'^', b'J', b'o', b'h', b'n',
        0x08, 0x00, 0x1B, 0x04,     // (0008,041B) (LE) RecordKey
            b'O', b'B',             // VR: OB (Other Byte)
            0x00, 0x00,             // Reserved, always 0
            0x02, 0x00, 0x00, 0x00, // Length: 2 bytes (LE)
                // Value: [0x12, 0x34]
                0x12, 0x34,
    ];

    #[test]
    fn encode_data_elements() {
        let mut buf = vec![];
        let enc = ExplicitVRLittleEndianEncoder::default();

        let len = enc
            .encode_element_header(&mut buf, Tag(0x0002, 0x0010), VR::UI, 20)
            .expect("should write it fine");
        assert_eq!(len, 8);
        buf.write_all(b"1.2.840.10008.1.2.1\0").unwrap();

        let len = enc
            .encode_element_header(&mut buf, Tag(0x0010, 0x0010), VR::PN, 8)
            .expect("should write it fine");
        assert_eq!(len, 8);
        buf.write_all(b"Doe^John").unwrap();

        let len = enc
            .encode_element_header(&mut buf, Tag(0x0008, 0x041B), VR::OB, 2)
            .expect("should write it fine");
        assert_eq!(len, 12);
        buf.write_all(&[0x12, 0x34]).unwrap();

        assert_eq!(&buf[..], RAW);
    }

    #[test]
    fn encode_items_and_delimiters() {
        let mut buf = vec![];
        let enc = ExplicitVRLittleEndianEncoder::default();
        enc.encode_item_header(&mut buf, 0xFFFF_FFFF).unwrap();
        enc.encode_item_delimiter(&mut buf).unwrap();
        enc.encode_sequence_delimiter(&mut buf).unwrap();

        #[rustfmt::skip]
        let expected: &[u8] = &[
            0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00,
            0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(&buf[..], expected);
    }
}
