//! Explicit VR Big Endian syntax transfer implementation

use crate::encode::basic::BigEndianBasicEncoder;
use crate::encode::{BasicEncode, Encode, Result, WriteHeaderSnafu, WriteTagSnafu};
use byteordered::byteorder::{BigEndian, ByteOrder};
use byteordered::Endianness;
use dicom_dict_core::{Tag, VR};
use snafu::ResultExt;
use std::io::{self, Write};

/// A concrete encoder for the transfer syntax ExplicitVRBigEndian
#[derive(Debug, Default, Clone)]
pub struct ExplicitVRBigEndianEncoder {
    basic: BigEndianBasicEncoder,
}

impl BasicEncode for ExplicitVRBigEndianEncoder {
    fn endianness(&self) -> Endianness {
        Endianness::Big
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

impl Encode for ExplicitVRBigEndianEncoder {
    fn explicit_vr(&self) -> bool {
        true
    }

    fn encode_tag<W>(&self, mut to: W, tag: Tag) -> Result<()>
    where
        W: Write,
    {
        let mut buf = [0u8; 4];
        BigEndian::write_u16(&mut buf[..], tag.group());
        BigEndian::write_u16(&mut buf[2..], tag.element());
        to.write_all(&buf).context(WriteTagSnafu)
    }

    fn encode_element_header<W>(&self, mut to: W, tag: Tag, vr: VR, len: u32) -> Result<usize>
    where
        W: Write,
    {
        if vr.has_short_length() {
            let mut buf = [0u8; 8];
            BigEndian::write_u16(&mut buf[0..], tag.group());
            BigEndian::write_u16(&mut buf[2..], tag.element());
            let vr_bytes = vr.to_bytes();
            buf[4] = vr_bytes[0];
            buf[5] = vr_bytes[1];
            BigEndian::write_u16(&mut buf[6..], len as u16);
            to.write_all(&buf).context(WriteHeaderSnafu)?;
            Ok(8)
        } else {
            let mut buf = [0u8; 12];
            BigEndian::write_u16(&mut buf[0..], tag.group());
            BigEndian::write_u16(&mut buf[2..], tag.element());
            let vr_bytes = vr.to_bytes();
            buf[4] = vr_bytes[0];
            buf[5] = vr_bytes[1];
            // buf[6..8] is kept zero'd
            BigEndian::write_u32(&mut buf[8..], len);
            to.write_all(&buf).context(WriteHeaderSnafu)?;
            Ok(12)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ExplicitVRBigEndianEncoder;
    use crate::encode::Encode;
    use dicom_dict_core::{Tag, VR};
    use std::io::Write;

    #[rustfmt::skip]
    const RAW: &[u8] = &[
        0x00, 0x08, 0x00, 0x16,     // (0008,0016) (BE) SOP Class UID
            b'U', b'I',             // VR: UI (UID)
            0x00, 0x1A,             // Length: 26 bytes (BE)
                // UID: 1.2.840.10008.5.1.4.1.1.1
                b'1', b'.', b'2', b'.', b'8', b'4', b'0', b'.', b'1', b'0', b'0', b'0', b'8', b'.',
                b'5', b'.', b'1', b'.', b'4', b'.', b'1', b'.', b'1', b'.', b'1',
                0x00,               // Padding to make length even
        0x00, 0x28, 0x00, 0x10,     // (0028,0010) (BE) Rows
            b'U', b'S',             // VR: US (Unsigned Short)
            0x00, 0x02,             // Length: 2 bytes (BE)
                0x02, 0x00,         // Value: 512 (BE)
        0x7F, 0xE0, 0x00, 0x10,     // (7FE0,0010) (BE) Pixel Data
            b'O', b'W',             // VR: OW (Other Word)
            0x00, 0x00,             // Reserved, always 0
            0x00, 0x00, 0x00, 0x02, // Length: 2 bytes (BE)
                0x12, 0x34,
    ];

    #[test]
    fn encode_data_elements() {
        let mut buf = vec![];
        let enc = ExplicitVRBigEndianEncoder::default();

        let len = enc
            .encode_element_header(&mut buf, Tag(0x0008, 0x0016), VR::UI, 26)
            .expect("should write it fine");
        assert_eq!(len, 8);
        buf.write_all(b"1.2.840.10008.5.1.4.1.1.1\0").unwrap();

        let len = enc
            .encode_element_header(&mut buf, Tag(0x0028, 0x0010), VR::US, 2)
            .expect("should write it fine");
        assert_eq!(len, 8);
        buf.write_all(&[0x02, 0x00]).unwrap();

        let len = enc
            .encode_element_header(&mut buf, Tag(0x7FE0, 0x0010), VR::OW, 2)
            .expect("should write it fine");
        assert_eq!(len, 12);
        buf.write_all(&[0x12, 0x34]).unwrap();

        assert_eq!(&buf[..], RAW);
    }

    #[test]
    fn encode_item_header_big_endian() {
        let mut buf = vec![];
        ExplicitVRBigEndianEncoder::default()
            .encode_item_header(&mut buf, 16)
            .unwrap();
        assert_eq!(buf, vec![0xFF, 0xFE, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x10]);
    }
}
